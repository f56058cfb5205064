//! Cue point detection on playback progress

/// Fires when playback crosses a fixed position
pub struct CueTrigger {
    cue_secs: f64,
    last_secs: Option<f64>,
}

impl CueTrigger {
    pub fn new(cue_secs: f64) -> Self {
        Self {
            cue_secs,
            last_secs: None,
        }
    }

    /// Record a progress report. True when it crosses the cue, i.e. the
    /// previous report was before it and this one is at or past it.
    /// The first report only records the position.
    pub fn observe(&mut self, secs: f64) -> bool {
        let crossed = matches!(self.last_secs, Some(prev) if prev < self.cue_secs && secs >= self.cue_secs);
        self.last_secs = Some(secs);
        crossed
    }

    /// Move the cue; position history is kept
    pub fn set_cue_secs(&mut self, cue_secs: f64) {
        self.cue_secs = cue_secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_crossing() {
        let mut cue = CueTrigger::new(24.0);
        assert!(!cue.observe(0.0));
        assert!(!cue.observe(23.4));
        assert!(cue.observe(24.2));
        assert!(!cue.observe(24.9));
        assert!(!cue.observe(30.0));
    }

    #[test]
    fn test_seek_back_rearms() {
        let mut cue = CueTrigger::new(24.0);
        cue.observe(20.0);
        assert!(cue.observe(25.0));
        assert!(!cue.observe(10.0));
        assert!(cue.observe(24.0));
    }

    #[test]
    fn test_first_report_past_cue_does_not_fire() {
        let mut cue = CueTrigger::new(24.0);
        assert!(!cue.observe(40.0));
    }
}
