/// Share of a card that must be inside the viewport before it is revealed.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.15;

/// Latch for the entrance animation: fires the first time the card is
/// visible enough and never again for the card's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RevealOnce {
    threshold: f64,
    fired: bool,
}

impl Default for RevealOnce {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_THRESHOLD)
    }
}

impl RevealOnce {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            fired: false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns true exactly once, on the first observation at or above the
    /// threshold.
    pub fn observe(&mut self, visible_fraction: f64) -> bool {
        if self.fired || !(visible_fraction > 0.0 && visible_fraction >= self.threshold) {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Fraction of the span `[top, top + height)` that lies inside the viewport.
pub fn visible_fraction(top: f64, height: f64, viewport_top: f64, viewport_height: f64) -> f64 {
    if height <= 0.0 || viewport_height <= 0.0 {
        return 0.0;
    }
    let overlap_top = top.max(viewport_top);
    let overlap_bottom = (top + height).min(viewport_top + viewport_height);
    ((overlap_bottom - overlap_top) / height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut reveal = RevealOnce::default();
        assert!(!reveal.observe(0.0));
        assert!(!reveal.observe(0.1));
        assert!(reveal.observe(0.5));
        assert!(reveal.has_fired());
        assert!(!reveal.observe(0.0));
        assert!(!reveal.observe(1.0));
    }

    #[test]
    fn test_zero_threshold_still_needs_some_visibility() {
        let mut reveal = RevealOnce::new(0.0);
        assert!(!reveal.observe(0.0));
        assert!(reveal.observe(0.01));
    }

    #[test]
    fn test_visible_fraction() {
        assert_eq!(visible_fraction(0.0, 100.0, 0.0, 500.0), 1.0);
        assert_eq!(visible_fraction(450.0, 100.0, 0.0, 500.0), 0.5);
        assert_eq!(visible_fraction(600.0, 100.0, 0.0, 500.0), 0.0);
        assert_eq!(visible_fraction(-80.0, 100.0, 0.0, 500.0), 0.2);
        assert_eq!(visible_fraction(0.0, 0.0, 0.0, 500.0), 0.0);
        assert_eq!(visible_fraction(0.0, 100.0, 0.0, 0.0), 0.0);
    }
}
