//! Spinner for loading states.
//!
//! Based on the snake spinner pattern - a bar that sweeps across a dotted
//! track and back.

use std::time::Duration;

const TRACK: char = '⬝';
const SNAKE: char = '■';

/// Text spinner with precomputed frames.
#[derive(Clone, Debug)]
pub struct Spinner {
    /// Width of the track in characters.
    track_width: u16,
    /// Length of the snake/bar.
    snake_len: u16,
    /// Pause frames at right end.
    right_pause: usize,
    /// Pause frames at left end.
    left_pause: usize,
    /// Frame duration in milliseconds.
    frame_ms: u64,
    frames: Vec<String>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            track_width: 8,
            snake_len: 6,
            right_pause: 1,
            left_pause: 20,
            frame_ms: 60,
            frames: Vec::new(),
        }
        .regenerate()
    }
}

impl Spinner {
    /// Create a new spinner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Number of frames in one full cycle.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The frame to show `elapsed` after the spinner started.
    pub fn frame_at(&self, elapsed: Duration) -> &str {
        let tick = (elapsed.as_millis() / u128::from(self.frame_ms)) as usize;
        &self.frames[tick % self.frames.len()]
    }

    fn regenerate(mut self) -> Self {
        let track_width = self.track_width as i32;
        let snake_len = self.snake_len as i32;
        let travel = track_width + snake_len - 2;
        let mut frames = Vec::new();

        // Right pass: snake enters from left, travels across, exits right
        for head_pos in 0..=travel {
            frames.push(self.snake_frame(head_pos));
        }
        for _ in 0..self.right_pause {
            frames.push(self.empty_frame());
        }

        // Left pass
        for head_pos in (0..=travel).rev() {
            frames.push(self.snake_frame(head_pos));
        }
        for _ in 0..self.left_pause {
            frames.push(self.empty_frame());
        }

        self.frames = frames;
        self
    }

    fn empty_frame(&self) -> String {
        std::iter::repeat_n(TRACK, self.track_width as usize).collect()
    }

    fn snake_frame(&self, head_pos: i32) -> String {
        let snake_start = head_pos - self.snake_len as i32 + 1;
        (0..self.track_width as i32)
            .map(|i| {
                if i >= snake_start && i <= head_pos {
                    SNAKE
                } else {
                    TRACK
                }
            })
            .collect()
    }
}
