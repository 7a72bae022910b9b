//! Two-step confirmation for destructive actions.
//!
//! The pending set holds at most one action, so it is modelled as an
//! `Option`. There is no timeout: only another user action clears it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedAction {
    Reset,
    Exit,
    ToggleBot,
}

impl fmt::Display for GatedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatedAction::Reset => f.write_str("reset"),
            GatedAction::Exit => f.write_str("exit"),
            GatedAction::ToggleBot => f.write_str("toggle-bot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// First trigger; the control is now armed and nothing runs.
    Armed,
    /// Second consecutive trigger; the action must run now.
    Confirmed,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    pending: Option<GatedAction>,
}

impl ConfirmationGate {
    pub fn trigger(&mut self, action: GatedAction) -> GateDecision {
        if self.pending == Some(action) {
            self.pending = None;
            GateDecision::Confirmed
        } else {
            self.pending = Some(action);
            GateDecision::Armed
        }
    }

    /// Cancel whatever is pending because some other control fired.
    /// Returns the action that was disarmed, if any.
    pub fn cancel(&mut self) -> Option<GatedAction> {
        self.pending.take()
    }

    #[inline]
    pub fn pending(&self) -> Option<GatedAction> {
        self.pending
    }

    #[inline]
    pub fn is_armed(&self, action: GatedAction) -> bool {
        self.pending == Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfirmationGate, GateDecision, GatedAction};

    #[test]
    fn second_identical_trigger_confirms() {
        let mut gate = ConfirmationGate::default();
        assert_eq!(gate.trigger(GatedAction::Reset), GateDecision::Armed);
        assert!(gate.is_armed(GatedAction::Reset));
        assert_eq!(gate.trigger(GatedAction::Reset), GateDecision::Confirmed);
        assert_eq!(gate.pending(), None);
    }

    #[test]
    fn different_gated_action_replaces_pending_one() {
        let mut gate = ConfirmationGate::default();
        gate.trigger(GatedAction::Reset);
        assert_eq!(gate.trigger(GatedAction::ToggleBot), GateDecision::Armed);
        assert!(!gate.is_armed(GatedAction::Reset));
        assert!(gate.is_armed(GatedAction::ToggleBot));
        // The reset is no longer pending, so it arms again instead of running.
        assert_eq!(gate.trigger(GatedAction::Reset), GateDecision::Armed);
    }

    #[test]
    fn cancel_disarms_without_confirming() {
        let mut gate = ConfirmationGate::default();
        gate.trigger(GatedAction::Exit);
        assert_eq!(gate.cancel(), Some(GatedAction::Exit));
        assert_eq!(gate.cancel(), None);
        assert_eq!(gate.trigger(GatedAction::Exit), GateDecision::Armed);
    }
}
