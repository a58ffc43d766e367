//! Cross-iteration loop state.

use serde::{Deserialize, Serialize};

/// Flags and counters carried from one iteration to the next.
///
/// Owned by the loop controller; reset to `LoopState::default()` at start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopState {
    /// The next targeted action must ask the operator for a target
    pub need_new_target: bool,
    /// Concealment state seen after the last action
    pub hidden: bool,
    /// Iterations started so far
    pub iteration: u64,
    /// Remediation attempts so far
    pub remediations: u32,
    /// A configured target object was rejected; operator picks replace it
    pub object_rejected: bool,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            need_new_target: true,
            hidden: false,
            iteration: 0,
            remediations: 0,
            object_rejected: false,
        }
    }
}

impl LoopState {
    /// The operator's pick was used and the action was not rejected for it
    pub fn confirm_target(&mut self) {
        self.need_new_target = false;
    }

    /// Force a manual pick on the next targeted action
    pub fn invalidate_target(&mut self) {
        self.need_new_target = true;
    }

    /// The configured object will not work; stop targeting it for this run
    pub fn reject_object(&mut self) {
        self.object_rejected = true;
        self.invalidate_target();
    }

    /// Count a remediation; any remediation invalidates the current target
    pub fn record_remediation(&mut self) {
        self.remediations += 1;
        self.invalidate_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_needing_a_target() {
        let state = LoopState::default();
        assert!(state.need_new_target);
        assert_eq!(state.iteration, 0);
        assert_eq!(state.remediations, 0);
    }

    #[test]
    fn test_target_transitions() {
        let mut state = LoopState::default();
        state.confirm_target();
        assert!(!state.need_new_target);
        state.invalidate_target();
        assert!(state.need_new_target);
    }

    #[test]
    fn test_remediation_invalidates_target() {
        let mut state = LoopState::default();
        state.confirm_target();
        state.record_remediation();
        assert!(state.need_new_target);
        assert_eq!(state.remediations, 1);
    }

    #[test]
    fn test_rejected_object_stays_rejected() {
        let mut state = LoopState::default();
        state.reject_object();
        assert!(state.need_new_target);
        state.confirm_target();
        assert!(!state.need_new_target);
        assert!(state.object_rejected);
    }
}
