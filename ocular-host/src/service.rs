//! Host-side service — accept a viewer, stream frames, take input.
//!
//! One viewer session at a time: the accept loop hands each incoming
//! connection to [`run_session`](HostService::run_session), which
//! paces capture frames at the configured rate and reacts to control
//! traffic until the viewer goes away, then returns to accepting.

use std::time::Duration;

use ocular_core::{Connection, ConnectionEvent, HelloMessage, Message, OcularError};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::producer::FrameProducer;

pub struct HostService {
    config: HostConfig,
}

impl HostService {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    /// Accept viewers until the surrounding task is cancelled.
    pub async fn run(&self) -> Result<(), OcularError> {
        let bind = format!(
            "{}:{}",
            self.config.network.listen_addr, self.config.network.port
        );
        let listener = TcpListener::bind(&bind).await?;
        info!("listening for a viewer on {bind}");

        loop {
            let (stream, peer) = listener.accept().await?;
            stream.set_nodelay(true)?;
            info!("viewer connected from {peer}");

            if let Err(err) = self.run_session(stream).await {
                warn!("session ended with error: {err}");
            }
            info!("session ended; waiting for the next viewer");
        }
    }

    async fn run_session(&self, stream: TcpStream) -> Result<(), OcularError> {
        let mut connection = Connection::new(stream);
        connection
            .send(Message::Hello(HelloMessage::current()))
            .await?;

        let mut producer = FrameProducer::new(&self.config.stream);
        let fps = self.config.stream.fps.clamp(1, 60);
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let frame = producer.next_frame()?;
                    debug!("sending {frame}");
                    connection.send(Message::Capture(frame)).await?;
                }
                event = connection.recv() => match event {
                    None => return Ok(()),
                    Some(ConnectionEvent::Message(message)) => {
                        if !self.handle_message(&connection, message).await? {
                            return Ok(());
                        }
                    }
                    Some(ConnectionEvent::Disconnected(reason)) => {
                        info!("viewer disconnected: {reason}");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// React to one inbound message. Returns `false` when the session
    /// should end.
    async fn handle_message(
        &self,
        connection: &Connection,
        message: Message,
    ) -> Result<bool, OcularError> {
        match message {
            Message::Hello(hello) => {
                info!("viewer speaks protocol {hello}");
            }
            Message::MouseControl(event) => {
                // Injection is the platform layer's job; record it here.
                debug!(
                    "viewer input: mouse {:?} at ({}, {})",
                    event.action(),
                    event.x(),
                    event.y()
                );
            }
            Message::KeyControl(event) => {
                debug!(
                    "viewer input: key {:?} code {}",
                    event.action(),
                    event.key_code()
                );
            }
            Message::Ping => {
                connection.send(Message::Ping).await?;
            }
            Message::Goodbye => {
                info!("viewer said goodbye");
                return Ok(false);
            }
            other => {
                debug!("ignoring {} from viewer", other.message_type());
            }
        }
        Ok(true)
    }
}
