//! First-render tracking for a component instance.

/// Reports `true` exactly once, on the first check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FirstMount {
    pending: bool,
}

impl Default for FirstMount {
    fn default() -> Self {
        Self { pending: true }
    }
}

impl FirstMount {
    /// Consume the first-mount flag.
    pub const fn take(&mut self) -> bool {
        let first = self.pending;
        self.pending = false;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::FirstMount;

    #[test]
    fn only_first_take_is_true() {
        let mut tracker = FirstMount::default();
        assert!(tracker.take());
        assert!(!tracker.take());
        assert!(!tracker.take());
    }
}
