//! Loop runner implementation - drives one activity through the loop phases.
//!
//! Each iteration walks `Idle -> CheckPrecondition -> Dispatch -> AwaitSettle
//! -> Classify -> React` and returns to `Idle`, or ends in `Terminate`. Every
//! phase is handled by `step`, which returns the next phase instead of jumping.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::activity::Activity;
use crate::classify::{Observation, Outcome, OutcomeCategory, OutcomeClassifier};
use crate::config::{GlobalConfig, TimingConfig};
use crate::dispatch::{ActionDispatcher, DispatchReport, TargetStatus};
use crate::domain::{LoopState, RunSummary, Termination};
use crate::error::Result;
use crate::feedback::FeedbackEmitter;
use crate::host::{Host, Item, Tone};
use crate::id::generate_run_id;
use crate::precondition::{Readiness, Remediation, perform_remediation};

/// A phase of the activity loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    CheckPrecondition,
    /// Dispatch with the tool found by the precondition check
    Dispatch { tool: Option<Item> },
    AwaitSettle { settle: Duration, report: DispatchReport },
    Classify { report: DispatchReport },
    React { outcome: Outcome, report: DispatchReport },
    Terminate(Termination),
}

impl LoopPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopPhase::Terminate(_))
    }
}

/// LoopRunner runs one activity against one host.
///
/// The runner owns the host, the activity and all cross-iteration state for
/// the lifetime of a run.
pub struct LoopRunner<H, A>
where
    H: Host,
    A: Activity,
{
    host: H,
    activity: A,
    timing: TimingConfig,
    max_iterations: Option<u64>,
    classifier: OutcomeClassifier,
    feedback: FeedbackEmitter,
    state: LoopState,
    outcomes: BTreeMap<Outcome, u64>,
    run_id: String,
    started_at: DateTime<Utc>,
}

impl<H, A> LoopRunner<H, A>
where
    H: Host,
    A: Activity,
{
    pub fn new(host: H, activity: A, config: &GlobalConfig) -> Self {
        let classifier = OutcomeClassifier::new(activity.rules());
        let feedback = FeedbackEmitter::new(activity.name());
        let run_id = generate_run_id(activity.name());
        Self {
            host,
            activity,
            timing: config.timing.clone(),
            max_iterations: config.max_iterations,
            classifier,
            feedback,
            state: LoopState::default(),
            outcomes: BTreeMap::new(),
            run_id,
            started_at: Utc::now(),
        }
    }

    /// Override the iteration limit from the configuration
    pub fn with_max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Give the host back once the run is over
    pub fn into_host(self) -> H {
        self.host
    }

    /// Run until the loop terminates.
    ///
    /// Only invariant violations are returned as errors; everything the game
    /// can do to a run ends in a `RunSummary`.
    pub fn run(&mut self) -> Result<RunSummary> {
        log::info!("Starting {} run {}", self.activity.name(), self.run_id);
        self.feedback
            .say(&mut self.host, &format!("Starting {}", self.activity.name()), Tone::Info);

        let mut phase = LoopPhase::Idle;
        let termination = loop {
            phase = match self.step(phase)? {
                LoopPhase::Terminate(termination) => break termination,
                next => next,
            };
        };

        log::info!(
            "Run {} finished after {} iterations: {}",
            self.run_id,
            self.state.iteration,
            termination
        );
        Ok(self.summary(termination))
    }

    /// Execute one phase and return the next.
    pub fn step(&mut self, phase: LoopPhase) -> Result<LoopPhase> {
        log::trace!("[{}] {:?}", self.run_id, phase);
        let next = match phase {
            LoopPhase::Idle => self.idle(),
            LoopPhase::CheckPrecondition => self.check_precondition(),
            LoopPhase::Dispatch { tool } => self.dispatch(tool.as_ref())?,
            LoopPhase::AwaitSettle { settle, report } => {
                ActionDispatcher::new(&self.timing).settle(&mut self.host, settle);
                LoopPhase::Classify { report }
            }
            LoopPhase::Classify { report } => LoopPhase::React {
                outcome: self.classify(&report),
                report,
            },
            LoopPhase::React { outcome, report } => self.react(outcome, &report),
            LoopPhase::Terminate(termination) => LoopPhase::Terminate(termination),
        };
        Ok(next)
    }

    fn idle(&mut self) -> LoopPhase {
        if !self.host.is_connected() {
            log::info!("[{}] host is no longer connected", self.run_id);
            return LoopPhase::Terminate(Termination::Disconnected);
        }
        if self.max_iterations.is_some_and(|max| self.state.iteration >= max) {
            self.feedback.say(&mut self.host, "Iteration limit reached", Tone::Info);
            return LoopPhase::Terminate(Termination::IterationLimit);
        }
        self.state.iteration += 1;
        log::debug!("[{}] iteration {}", self.run_id, self.state.iteration);
        LoopPhase::CheckPrecondition
    }

    fn check_precondition(&mut self) -> LoopPhase {
        match self.activity.check(&self.host, &self.state, &self.timing) {
            Readiness::Ready { tool } => LoopPhase::Dispatch { tool },
            Readiness::NotReady(shortfall) => {
                self.feedback.shortfall(&mut self.host, &shortfall);
                self.remediate(&shortfall.remediation)
            }
        }
    }

    fn dispatch(&mut self, tool: Option<&Item>) -> Result<LoopPhase> {
        let mut action = self.activity.plan(tool)?;
        let (need_new_target, object_rejected) = (self.state.need_new_target, self.state.object_rejected);
        action.target = action.target.map(|choice| choice.resolve(need_new_target, object_rejected));

        // Anything left in the journal belongs to an earlier action.
        self.host.clear_journal();

        match ActionDispatcher::new(&self.timing).dispatch(&mut self.host, &action) {
            Ok(report) => Ok(LoopPhase::AwaitSettle {
                settle: action.settle,
                report,
            }),
            Err(e) => {
                log::warn!("[{}] dispatch failed: {}", self.run_id, e);
                self.host.sleep(self.timing.cooldown_delay());
                Ok(LoopPhase::React {
                    outcome: Outcome::ActionFailed,
                    report: DispatchReport::untargeted(),
                })
            }
        }
    }

    fn classify(&mut self, report: &DispatchReport) -> Outcome {
        let journal = self.host.journal();
        self.state.hidden = self.host.is_hidden();
        let observation = Observation {
            journal: &journal,
            target: report.target,
            gump: report.gump,
            hidden: self.state.hidden,
        };
        match self.classifier.matching_rule(&observation) {
            Some(rule) => {
                log::debug!("[{}] matched {} -> {}", self.run_id, rule.signature, rule.outcome);
                rule.outcome
            }
            None => {
                log::debug!("[{}] no rule matched {} journal lines", self.run_id, journal.len());
                Outcome::Unclassified
            }
        }
    }

    fn react(&mut self, outcome: Outcome, report: &DispatchReport) -> LoopPhase {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        let text = self.activity.describe(outcome);
        self.feedback.outcome(&mut self.host, outcome, &text);

        let category = outcome.category();
        if report.target == TargetStatus::Explicit && category == OutcomeCategory::Retarget {
            log::info!("[{}] configured target rejected, asking the operator", self.run_id);
            self.state.reject_object();
        } else if report.target.is_failure() || category == OutcomeCategory::Retarget {
            self.state.invalidate_target();
        } else if report.target.is_manual_pick() && category != OutcomeCategory::Depleted {
            self.state.confirm_target();
        }

        match category {
            OutcomeCategory::Advance | OutcomeCategory::Retry | OutcomeCategory::Retarget => LoopPhase::Idle,
            OutcomeCategory::Cooldown => {
                self.host.sleep(self.timing.cooldown_delay());
                LoopPhase::Idle
            }
            OutcomeCategory::Depleted => {
                let remediation = self.activity.replenish(outcome);
                self.remediate(&remediation)
            }
            OutcomeCategory::Unclassified => {
                log::warn!("[{}] unclassified outcome, retrying", self.run_id);
                LoopPhase::Idle
            }
        }
    }

    /// One remediation attempt; a failure ends the run.
    fn remediate(&mut self, remediation: &Remediation) -> LoopPhase {
        log::info!("[{}] remediation: {:?}", self.run_id, remediation);
        let worked = perform_remediation(&mut self.host, remediation, &self.timing).unwrap_or_else(|e| {
            log::warn!("[{}] remediation error: {}", self.run_id, e);
            false
        });
        self.state.record_remediation();
        self.host.clear_journal();

        if worked {
            LoopPhase::Idle
        } else {
            let reason = remediation.failure_reason();
            self.feedback.fatal(&mut self.host, &reason);
            LoopPhase::Terminate(Termination::Fatal(reason))
        }
    }

    fn summary(&self, termination: Termination) -> RunSummary {
        RunSummary {
            run_id: self.run_id.clone(),
            activity: self.activity.name().to_string(),
            started_at: self.started_at,
            iterations: self.state.iteration,
            remediations: self.state.remediations,
            outcomes: self.outcomes.clone(),
            termination,
        }
    }
}
