//! Action dispatch.
//!
//! The dispatcher performs exactly one host action per call (use an object,
//! invoke a skill, or drive a gump), answers the target cursor if the action
//! needs one, and reports what happened. It never retries; that is the loop
//! controller's job. `settle` is the bounded wait that follows every action.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;
use crate::error::Result;
use crate::host::{Completion, GumpId, Host, Serial};

/// How the target cursor of an action gets answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetChoice {
    /// Ask the operator to pick
    Manual,
    /// Reuse the previous target
    Last,
    /// A known object
    Object(Serial),
    /// The player
    Myself,
}

impl TargetChoice {
    /// `Last` turns into `Manual` while the loop needs a fresh target.
    ///
    /// Once a configured object has been rejected it is treated like `Last`,
    /// so the operator's picks take over.
    pub fn resolve(self, need_new_target: bool, object_rejected: bool) -> Self {
        match self {
            TargetChoice::Object(_) if object_rejected => TargetChoice::Last.resolve(need_new_target, false),
            TargetChoice::Last if need_new_target => TargetChoice::Manual,
            other => other,
        }
    }
}

/// The host action for one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    UseObject(Serial),
    UseSkill(String),
    /// Use an object, wait for its gump, press a button
    UseWithGump { item: Serial, gump: GumpId, button: u32 },
}

/// A planned action with its targeting and settle delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub target: Option<TargetChoice>,
    /// Time the host needs before the outcome is visible
    pub settle: Duration,
}

impl Action {
    pub fn use_object(item: Serial, settle: Duration) -> Self {
        Self {
            kind: ActionKind::UseObject(item),
            target: None,
            settle,
        }
    }

    pub fn use_skill(skill: impl Into<String>, settle: Duration) -> Self {
        Self {
            kind: ActionKind::UseSkill(skill.into()),
            target: None,
            settle,
        }
    }

    pub fn use_with_gump(item: Serial, gump: GumpId, button: u32, settle: Duration) -> Self {
        Self {
            kind: ActionKind::UseWithGump { item, gump, button },
            target: None,
            settle,
        }
    }

    pub fn targeting(mut self, target: TargetChoice) -> Self {
        self.target = Some(target);
        self
    }
}

/// What happened to the target cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The action takes no target
    NotRequired,
    /// The operator picked this object
    Acquired(Serial),
    /// The previous target was reused
    Reused,
    /// A known object or the player was targeted
    Explicit,
    /// No cursor appeared
    CursorMissing,
    /// The operator cancelled or let the prompt time out
    Cancelled,
    /// The host refused the target
    Rejected,
}

impl TargetStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, TargetStatus::CursorMissing | TargetStatus::Cancelled | TargetStatus::Rejected)
    }

    /// True when the operator supplied a new target this iteration
    pub fn is_manual_pick(self) -> bool {
        matches!(self, TargetStatus::Acquired(_))
    }
}

/// What happened to an expected gump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GumpStatus {
    NotRequired,
    Pressed,
    Missing,
}

/// Result of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub target: TargetStatus,
    pub gump: GumpStatus,
}

impl DispatchReport {
    pub fn untargeted() -> Self {
        Self {
            target: TargetStatus::NotRequired,
            gump: GumpStatus::NotRequired,
        }
    }
}

/// Issues actions against the host.
#[derive(Debug, Clone, Copy)]
pub struct ActionDispatcher<'a> {
    timing: &'a TimingConfig,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(timing: &'a TimingConfig) -> Self {
        Self { timing }
    }

    /// Perform one action. Host errors from the action itself propagate;
    /// targeting problems are reported in the `DispatchReport`.
    pub fn dispatch(&self, host: &mut dyn Host, action: &Action) -> Result<DispatchReport> {
        match &action.kind {
            ActionKind::UseObject(item) => host.use_object(*item)?,
            ActionKind::UseSkill(skill) => host.use_skill(skill)?,
            ActionKind::UseWithGump { item, .. } => host.use_object(*item)?,
        }

        let target = match action.target {
            Some(choice) => self.answer_target(host, choice),
            None => TargetStatus::NotRequired,
        };

        let gump = match &action.kind {
            ActionKind::UseWithGump { gump, button, .. } if !target.is_failure() => {
                if host.wait_for_gump(*gump, self.timing.gump_timeout()) {
                    host.press_gump_button(*gump, *button)?;
                    GumpStatus::Pressed
                } else {
                    log::debug!("Gump {} did not open", gump);
                    GumpStatus::Missing
                }
            }
            _ => GumpStatus::NotRequired,
        };

        Ok(DispatchReport { target, gump })
    }

    fn answer_target(&self, host: &mut dyn Host, choice: TargetChoice) -> TargetStatus {
        if !host.wait_for_target(self.timing.cursor_timeout()) {
            log::debug!("No target cursor appeared");
            return TargetStatus::CursorMissing;
        }

        let answered = match choice {
            TargetChoice::Manual => {
                return match host.prompt_target(self.timing.manual_target_timeout()) {
                    Some(serial) => {
                        log::info!("Operator selected target {}", serial);
                        TargetStatus::Acquired(serial)
                    }
                    None => TargetStatus::Cancelled,
                };
            }
            TargetChoice::Last => host.target_last().map(|_| TargetStatus::Reused),
            TargetChoice::Object(serial) => host.target(serial).map(|_| TargetStatus::Explicit),
            TargetChoice::Myself => host.target_self().map(|_| TargetStatus::Explicit),
        };

        answered.unwrap_or_else(|e| {
            log::warn!("Target rejected: {}", e);
            TargetStatus::Rejected
        })
    }

    /// Wait for the host to finish processing the last action.
    ///
    /// Uses the host's completion signal (bounded by `delay`) when enabled
    /// and available, otherwise sleeps for `delay`.
    pub fn settle(&self, host: &mut dyn Host, delay: Duration) -> Completion {
        if self.timing.prefer_completion_signal {
            match host.await_action_complete(delay) {
                Completion::Unsupported => {}
                completion => {
                    if completion == Completion::TimedOut {
                        log::warn!("Host did not signal completion within {:?}", delay);
                    }
                    return completion;
                }
            }
        }
        host.sleep(delay);
        Completion::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, Item, Response, Scenario, SimulatedHost};

    const POLE: u32 = 1;

    fn host_with(responses: Vec<Response>, targets: Vec<Option<Serial>>) -> SimulatedHost {
        SimulatedHost::new(Scenario {
            items: vec![Item::new(POLE, 0x0DC0, "fishing pole")],
            responses,
            targets,
            ..Default::default()
        })
    }

    #[test]
    fn test_last_resolves_to_manual_when_needed() {
        assert_eq!(TargetChoice::Last.resolve(true, false), TargetChoice::Manual);
        assert_eq!(TargetChoice::Last.resolve(false, false), TargetChoice::Last);
        assert_eq!(TargetChoice::Object(Serial(3)).resolve(true, false), TargetChoice::Object(Serial(3)));
    }

    #[test]
    fn test_rejected_object_falls_back_to_operator() {
        assert_eq!(TargetChoice::Object(Serial(3)).resolve(true, true), TargetChoice::Manual);
        assert_eq!(TargetChoice::Object(Serial(3)).resolve(false, true), TargetChoice::Last);
        assert_eq!(TargetChoice::Myself.resolve(true, true), TargetChoice::Myself);
    }

    #[test]
    fn test_manual_target_acquired() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![Response::journal(&["ok"])], vec![Some(Serial(77))]);

        let action = Action::use_object(Serial(POLE), Duration::from_secs(1)).targeting(TargetChoice::Manual);
        let report = dispatcher.dispatch(&mut host, &action).unwrap();

        assert_eq!(report.target, TargetStatus::Acquired(Serial(77)));
        assert!(report.target.is_manual_pick());
        assert_eq!(report.gump, GumpStatus::NotRequired);
    }

    #[test]
    fn test_cancelled_manual_target() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![Response::journal(&["ok"])], vec![None]);

        let action = Action::use_object(Serial(POLE), Duration::from_secs(1)).targeting(TargetChoice::Manual);
        let report = dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(report.target, TargetStatus::Cancelled);
        assert!(report.target.is_failure());
    }

    #[test]
    fn test_missing_cursor() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![Response::journal(&["ok"]).without_cursor()], vec![]);

        let action = Action::use_object(Serial(POLE), Duration::from_secs(1)).targeting(TargetChoice::Last);
        let report = dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(report.target, TargetStatus::CursorMissing);
    }

    #[test]
    fn test_target_last_without_history_is_rejected() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![Response::journal(&["ok"])], vec![]);

        let action = Action::use_object(Serial(POLE), Duration::from_secs(1)).targeting(TargetChoice::Last);
        let report = dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(report.target, TargetStatus::Rejected);
    }

    #[test]
    fn test_use_missing_object_is_an_error() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![], vec![]);

        let action = Action::use_object(Serial(999), Duration::from_secs(1));
        assert!(dispatcher.dispatch(&mut host, &action).is_err());
    }

    #[test]
    fn test_gump_pressed() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let gump = GumpId(0x38920ABD);
        let mut host = host_with(vec![Response::journal(&["You create"]).without_cursor().with_gump(gump)], vec![]);

        let action = Action::use_with_gump(Serial(POLE), gump, 21, Duration::from_secs(2));
        let report = dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(report.gump, GumpStatus::Pressed);
        assert_eq!(host.count_calls(|c| *c == HostCall::PressGumpButton(gump, 21)), 1);
    }

    #[test]
    fn test_gump_missing() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let gump = GumpId(0x38920ABD);
        let mut host = host_with(vec![Response::journal(&["You create"]).without_cursor()], vec![]);

        let action = Action::use_with_gump(Serial(POLE), gump, 21, Duration::from_secs(2));
        let report = dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(report.gump, GumpStatus::Missing);
        assert_eq!(host.count_calls(|c| matches!(c, HostCall::PressGumpButton(..))), 0);
    }

    #[test]
    fn test_dispatch_issues_exactly_one_action() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![Response::journal(&["nothing"])], vec![None]);

        let action = Action::use_object(Serial(POLE), Duration::from_secs(1)).targeting(TargetChoice::Manual);
        dispatcher.dispatch(&mut host, &action).unwrap();
        assert_eq!(host.count_calls(|c| matches!(c, HostCall::UseObject(_))), 1);
    }

    #[test]
    fn test_settle_falls_back_to_sleep() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = host_with(vec![], vec![]);

        let completion = dispatcher.settle(&mut host, Duration::from_secs(9));
        assert_eq!(completion, Completion::Unsupported);
        assert_eq!(host.elapsed(), Duration::from_secs(9));
    }

    #[test]
    fn test_settle_prefers_completion_signal() {
        let timing = TimingConfig::default();
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = SimulatedHost::new(Scenario {
            completion_signal: true,
            responses: vec![Response::journal(&["You have hidden yourself well."]).without_cursor()],
            ..Default::default()
        });
        host.use_skill("Hiding").unwrap();

        let completion = dispatcher.settle(&mut host, Duration::from_secs(10));
        assert_eq!(completion, Completion::Signaled);
        assert!(host.elapsed() < Duration::from_secs(10));
        assert_eq!(host.journal().len(), 1);
    }

    #[test]
    fn test_settle_ignores_signal_when_disabled() {
        let timing = TimingConfig {
            prefer_completion_signal: false,
            ..Default::default()
        };
        let dispatcher = ActionDispatcher::new(&timing);
        let mut host = SimulatedHost::new(Scenario {
            completion_signal: true,
            ..Default::default()
        });

        dispatcher.settle(&mut host, Duration::from_secs(4));
        assert_eq!(host.elapsed(), Duration::from_secs(4));
        assert_eq!(host.count_calls(|c| *c == HostCall::AwaitCompletion), 0);
    }
}
