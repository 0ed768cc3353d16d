use crate::tuning::PIP_CLICK_WINDOW_MS;

/// Which owned surface a native PIP signal resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipSurface {
    Floating,
    Inline,
}

/// Tracks which preview surface most recently entered PIP, or is suspected
/// of being about to. The click window bridges the gap between a click that
/// might trigger PIP and the asynchronous native PIP-entered signal.
#[derive(Debug, Default)]
pub struct PipWatch {
    bound: Option<PipSurface>,
    requested_at_ms: Option<f64>,
}

impl PipWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A click on the floating surface that might turn into a PIP request.
    pub fn note_click(&mut self, now_ms: f64) {
        self.requested_at_ms = Some(now_ms);
    }

    /// True while a recent click keeps the "PIP likely requested" window
    /// open.
    pub fn likely_requested(&self, now_ms: f64) -> bool {
        match self.requested_at_ms {
            Some(at) => now_ms - at < PIP_CLICK_WINDOW_MS,
            None => false,
        }
    }

    pub fn note_entered(&mut self, surface: PipSurface) {
        self.bound = Some(surface);
        self.requested_at_ms = None;
    }

    /// Clears the binding, returning the surface that had been bound.
    pub fn note_left(&mut self) -> Option<PipSurface> {
        self.requested_at_ms = None;
        self.bound.take()
    }

    pub fn bound(&self) -> Option<PipSurface> {
        self.bound
    }

    /// Whether the floating surface should be treated as PIP-active: either
    /// the native signal confirmed it, or a click just requested it.
    pub fn floating_active(&self, now_ms: f64) -> bool {
        self.bound == Some(PipSurface::Floating) || self.likely_requested(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_window_expires() {
        let mut watch = PipWatch::new();
        watch.note_click(10_000.0);
        assert!(watch.likely_requested(10_000.0 + PIP_CLICK_WINDOW_MS - 1.0));
        assert!(!watch.likely_requested(10_000.0 + PIP_CLICK_WINDOW_MS));
        assert!(watch.floating_active(10_500.0));
    }

    #[test]
    fn entering_pip_resets_the_click_window() {
        let mut watch = PipWatch::new();
        watch.note_click(10_000.0);
        watch.note_entered(PipSurface::Floating);
        assert!(!watch.likely_requested(10_001.0));
        assert!(watch.floating_active(10_001.0));
        assert_eq!(watch.bound(), Some(PipSurface::Floating));
    }

    #[test]
    fn leaving_pip_clears_the_binding() {
        let mut watch = PipWatch::new();
        watch.note_entered(PipSurface::Inline);
        assert!(!watch.floating_active(0.0));
        assert_eq!(watch.note_left(), Some(PipSurface::Inline));
        assert_eq!(watch.bound(), None);
        assert_eq!(watch.note_left(), None);
    }
}
