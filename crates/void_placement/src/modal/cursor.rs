//! Cursor delta tracking with edge warping.

use glam::Vec2;

/// One cursor sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorSample {
    /// Motion since the previous sample
    pub delta: Vec2,
    /// Where the host should move the cursor, if it got too close to an edge
    pub warp_to: Option<Vec2>,
}

/// Tracks cursor motion for delta-driven modal controls.
///
/// When the cursor nears the viewport edge it is sent back to the centre
/// and the centre becomes the reference point, so dragging never runs out
/// of screen.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    previous: Option<Vec2>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the reference point; the next sample has zero delta.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn previous(&self) -> Option<Vec2> {
        self.previous
    }

    pub fn sample(&mut self, cursor: Option<Vec2>, viewport: Option<Vec2>, margin: f32) -> CursorSample {
        let Some(cursor) = cursor else {
            return CursorSample::default();
        };
        let delta = self.previous.map(|p| cursor - p).unwrap_or(Vec2::ZERO);
        self.previous = Some(cursor);

        let warp_to = viewport.and_then(|size| {
            // Too small to warp without landing inside the margin again
            if size.min_element() <= margin * 2.0 + 1.0 {
                return None;
            }
            let near_edge = cursor.x < margin
                || cursor.y < margin
                || cursor.x > size.x - margin
                || cursor.y > size.y - margin;
            near_edge.then_some(size * 0.5)
        });

        if let Some(target) = warp_to {
            self.previous = Some(target);
        }

        CursorSample { delta, warp_to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_first_sample_has_no_delta() {
        let mut tracker = CursorTracker::new();
        let s = tracker.sample(Some(Vec2::new(400.0, 300.0)), Some(VIEWPORT), 24.0);
        assert_eq!(s.delta, Vec2::ZERO);
        assert!(s.warp_to.is_none());
    }

    #[test]
    fn test_delta_between_samples() {
        let mut tracker = CursorTracker::new();
        tracker.sample(Some(Vec2::new(400.0, 300.0)), Some(VIEWPORT), 24.0);
        let s = tracker.sample(Some(Vec2::new(430.0, 290.0)), Some(VIEWPORT), 24.0);
        assert_eq!(s.delta, Vec2::new(30.0, -10.0));
    }

    #[test]
    fn test_warp_keeps_delta_continuous() {
        let mut tracker = CursorTracker::new();
        tracker.sample(Some(Vec2::new(760.0, 300.0)), Some(VIEWPORT), 24.0);
        let s = tracker.sample(Some(Vec2::new(790.0, 300.0)), Some(VIEWPORT), 24.0);
        assert_eq!(s.delta, Vec2::new(30.0, 0.0));
        assert_eq!(s.warp_to, Some(Vec2::new(400.0, 300.0)));
        assert_eq!(tracker.previous(), Some(Vec2::new(400.0, 300.0)));

        // host moved the cursor; motion continues from the centre
        let s = tracker.sample(Some(Vec2::new(420.0, 300.0)), Some(VIEWPORT), 24.0);
        assert_eq!(s.delta, Vec2::new(20.0, 0.0));
        assert!(s.warp_to.is_none());
    }

    #[test]
    fn test_no_warp_without_viewport() {
        let mut tracker = CursorTracker::new();
        let s = tracker.sample(Some(Vec2::new(1.0, 1.0)), None, 24.0);
        assert!(s.warp_to.is_none());
    }

    #[test]
    fn test_missing_cursor_keeps_reference() {
        let mut tracker = CursorTracker::new();
        tracker.sample(Some(Vec2::new(100.0, 100.0)), Some(VIEWPORT), 24.0);
        assert_eq!(tracker.sample(None, Some(VIEWPORT), 24.0), CursorSample::default());
        let s = tracker.sample(Some(Vec2::new(110.0, 100.0)), Some(VIEWPORT), 24.0);
        assert_eq!(s.delta, Vec2::new(10.0, 0.0));
    }
}
