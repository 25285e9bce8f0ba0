//! Scroll geometry snapshots and the edge predicates evaluated against them.

/// One scroll or layout observation.
///
/// All three values share the same unit (terminal rows in the TUI, pixels
/// elsewhere). A snapshot is produced per event and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    /// Distance scrolled from the start of the content
    pub offset: f64,
    /// Length of the viewport
    pub visible_length: f64,
    /// Total length of the content
    pub content_length: f64,
}

impl ScrollGeometry {
    pub fn new(offset: f64, visible_length: f64, content_length: f64) -> Self {
        Self {
            offset,
            visible_length,
            content_length,
        }
    }

    /// Snapshot used for layout reconciliation, pinned at offset 0
    pub fn at_top(visible_length: f64, content_length: f64) -> Self {
        Self::new(0.0, visible_length, content_length)
    }

    /// Remaining distance between the bottom of the viewport and the end of content.
    /// Negative when the content is shorter than the viewport.
    #[inline]
    pub fn distance_from_end(&self) -> f64 {
        self.content_length - self.visible_length - self.offset
    }

    /// Whether the whole content fits inside the viewport
    #[inline]
    pub fn fits_viewport(&self) -> bool {
        self.visible_length >= self.content_length
    }
}

#[inline]
pub fn is_at_start(geometry: &ScrollGeometry, threshold: f64) -> bool {
    geometry.offset < threshold
}

#[inline]
pub fn is_at_end(geometry: &ScrollGeometry, threshold: f64) -> bool {
    geometry.distance_from_end() < threshold
}
