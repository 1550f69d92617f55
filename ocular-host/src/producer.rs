//! Frame producer at the capture boundary.
//!
//! Real screen acquisition is platform work that lives outside this
//! service. The producer generates a moving test pattern instead and
//! compresses it exactly the way a capture pipeline would, so the
//! protocol path downstream is exercised end to end: frames carry a
//! monotonic id, the negotiated method, and an embedded configuration
//! whenever the codec parameters change.

use ocular_core::{
    CaptureMessage, CompressionMethod, CompressorConfigurationMessage, OcularError,
};

use crate::config::StreamConfig;

pub struct FrameProducer {
    width: usize,
    height: usize,
    method: CompressionMethod,
    level: i32,
    next_id: i32,
    /// Level the viewer has already been told about. A frame embeds a
    /// configuration whenever this diverges from `level`.
    announced_level: Option<i32>,
}

impl FrameProducer {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            width: config.frame_width,
            height: config.frame_height,
            method: config.compression_method(),
            level: config.level,
            next_id: 0,
            announced_level: None,
        }
    }

    /// Produce the next capture frame.
    pub fn next_frame(&mut self) -> Result<CaptureMessage, OcularError> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let raw = self.render_pattern(id);
        // Config parsing only ever yields `None` or `Zstd` here.
        let payload = match self.method {
            CompressionMethod::None => raw,
            _ => zstd::encode_all(raw.as_slice(), self.level).map_err(OcularError::Io)?,
        };

        let configuration = if self.announced_level != Some(self.level) {
            self.announced_level = Some(self.level);
            Some(CompressorConfigurationMessage::new(self.method, self.level))
        } else {
            None
        };

        CaptureMessage::new(id, self.method, configuration, payload)
    }

    /// One grayscale byte per pixel, drifting with the frame id so
    /// consecutive frames differ.
    fn render_pattern(&self, frame_id: i32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(((x + y + frame_id as usize) & 0xFF) as u8);
            }
        }
        pixels
    }
}

// ── Tests ────────────────────────────────────────────────────────
