//! Scroll position tracking for infinite scroll.

/// Distance from the bottom, in scroll units, that still counts as "at the bottom".
pub const BOTTOM_THRESHOLD: u32 = 1;

/// Snapshot of a scrollable region at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Offset of the first visible unit.
    pub offset: u32,
    /// Number of visible units.
    pub viewport: u32,
    /// Total number of units in the content.
    pub content: u32,
}

impl ScrollMetrics {
    pub fn new(offset: u32, viewport: u32, content: u32) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Largest valid offset.
    pub fn max_offset(&self) -> u32 {
        self.content.saturating_sub(self.viewport)
    }

    /// Returns `true` if the bottom of the viewport is within
    /// [`BOTTOM_THRESHOLD`] of the end of the content.
    pub fn near_bottom(&self) -> bool {
        self.offset + self.viewport >= self.content.saturating_sub(BOTTOM_THRESHOLD)
    }

    /// Returns a copy scrolled by `delta`, clamped to the content.
    pub fn scrolled_by(self, delta: i64) -> Self {
        let offset = (i64::from(self.offset) + delta).clamp(0, i64::from(self.max_offset()));
        Self {
            offset: offset as u32,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_bottom_threshold() {
        // 100 rows of content, 20 visible.
        assert!(!ScrollMetrics::new(0, 20, 100).near_bottom());
        assert!(!ScrollMetrics::new(78, 20, 100).near_bottom());
        assert!(ScrollMetrics::new(79, 20, 100).near_bottom());
        assert!(ScrollMetrics::new(80, 20, 100).near_bottom());
    }

    #[test]
    fn test_short_content_is_at_bottom() {
        assert!(ScrollMetrics::new(0, 20, 5).near_bottom());
        assert!(ScrollMetrics::new(0, 20, 0).near_bottom());
    }

    #[test]
    fn test_scrolled_by_clamps() {
        let metrics = ScrollMetrics::new(10, 20, 100);
        assert_eq!(metrics.scrolled_by(-50).offset, 0);
        assert_eq!(metrics.scrolled_by(500).offset, 80);
        assert_eq!(metrics.scrolled_by(5).offset, 15);
        assert_eq!(ScrollMetrics::new(0, 20, 5).scrolled_by(3).offset, 0);
    }
}
