//! Fault classification for the tasks driving a connection.
//!
//! Every failure surfacing from the codec or the transport is sorted
//! into one of three kinds, and the loop's reaction follows from the
//! kind alone:
//!
//! - [`FaultKind::Transport`] — expected under normal network
//!   conditions; log it, exit the loop, tell the session the peer is
//!   gone.
//! - [`FaultKind::Protocol`] — the framing can no longer be trusted;
//!   the connection is torn down and must be re-established. Never
//!   retried in place.
//! - [`FaultKind::Fatal`] — an invariant may be violated; escalated to
//!   the process-level handler. A loop in that state is never silently
//!   continued, since the next frame it produced could be corrupt.

use std::io::ErrorKind;
use std::sync::OnceLock;

use crate::error::OcularError;

// ── FaultKind ────────────────────────────────────────────────────

/// How a connection loop must react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transport,
    Protocol,
    Fatal,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultKind::Transport => write!(f, "transport fault"),
            FaultKind::Protocol => write!(f, "protocol violation"),
            FaultKind::Fatal => write!(f, "fatal fault"),
        }
    }
}

/// Classify a failure from a read or write loop.
pub fn classify(err: &OcularError) -> FaultKind {
    match err {
        // Clean close, or the local consumer went away.
        OcularError::Closed | OcularError::ChannelClosed => FaultKind::Transport,

        OcularError::Io(e) => match e.kind() {
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
            | ErrorKind::TimedOut
            | ErrorKind::NotConnected => FaultKind::Transport,
            // Anything else from the I/O layer is outside the set of
            // faults a healthy connection produces.
            _ => FaultKind::Fatal,
        },

        OcularError::Truncated { .. }
        | OcularError::UnknownVariant { .. }
        | OcularError::UnexpectedMessage { .. }
        | OcularError::NegativeLength(_)
        | OcularError::PayloadTooLarge { .. } => FaultKind::Protocol,
    }
}

// ── Fatal escalation ─────────────────────────────────────────────

type FatalHandler = Box<dyn Fn(&OcularError) + Send + Sync>;

static FATAL_HANDLER: OnceLock<FatalHandler> = OnceLock::new();

/// Install a hook that runs before the process aborts on a fatal
/// fault. First installation wins; later calls are ignored.
pub fn install_fatal_handler<F>(handler: F)
where
    F: Fn(&OcularError) + Send + Sync + 'static,
{
    let _ = FATAL_HANDLER.set(Box::new(handler));
}

/// Escalate an unexpected fault and terminate the process.
///
/// Continuing a loop whose invariants may be violated risks silently
/// corrupting subsequent frames, so this never returns.
pub fn fatal(err: &OcularError) -> ! {
    tracing::error!("fatal protocol fault: {err}");
    if let Some(handler) = FATAL_HANDLER.get() {
        handler(err);
    }
    std::process::abort();
}

// ── Tests ────────────────────────────────────────────────────────
