/// Remembers the previous condition result of one monitor and reports
/// whether the current result is a transition.
///
/// The first observation is never a transition. After that, any change of
/// the boolean result fires.
#[derive(Debug, Default, Clone)]
pub struct TransitionTracker {
    previous: Option<bool>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` and return true if it differs from the previous result
    pub fn observe(&mut self, current: bool) -> bool {
        let fired = matches!(self.previous, Some(previous) if previous != current);
        self.previous = Some(current);
        fired
    }

    pub fn previous(&self) -> Option<bool> {
        self.previous
    }
}
