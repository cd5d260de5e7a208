//! Frame animations a particle can play over its lifetime.

use serde::{Deserialize, Serialize};

/// A frame sequence for particle sprites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleAnimation {
    /// Sub-texture ids, in playback order.
    pub frames: Vec<u32>,
    /// Seconds each frame stays on screen when playback is time-driven.
    pub seconds_per_frame: f32,
}

impl ParticleAnimation {
    /// Create from an explicit frame list.
    pub fn from_frames(frames: Vec<u32>, fps: f32) -> Self {
        Self {
            frames,
            seconds_per_frame: 1.0 / fps,
        }
    }

    /// Consecutive frame ids `first..first + count`.
    pub fn strip(first: u32, count: u32, fps: f32) -> Self {
        Self::from_frames((first..first + count).collect(), fps)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total duration of one pass through the frames.
    pub fn total_duration(&self) -> f32 {
        self.seconds_per_frame * self.frames.len() as f32
    }

    /// Sub-texture id at a frame index, wrapping past the end.
    pub fn frame(&self, index: usize) -> Option<u32> {
        if self.frames.is_empty() {
            return None;
        }
        Some(self.frames[index % self.frames.len()])
    }
}
