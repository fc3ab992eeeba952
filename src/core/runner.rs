//! Step runner
//!
//! Executes a [`Plan`] in order through an [`Executor`], stopping at the first
//! failure. Completed steps are recorded in the [`SetupState`] so a re-run
//! resumes after the last successful step. A guarded step that failed half
//! way continues from its first unfinished action.

use serde::Serialize;
use std::path::PathBuf;

use super::plan::{Action, Guard, Plan, Step};
use super::state::SetupState;
use crate::error::SetupError;

/// Performs the side effects of individual actions
///
/// [`crate::infra::process::SystemExecutor`] talks to the real host; tests
/// substitute a recorder.
pub trait Executor {
    /// Perform one action
    ///
    /// `env` is applied to every spawned command. [`Action::Notice`] is
    /// handled by the runner and never reaches the executor.
    fn execute(&mut self, action: &Action, env: &[(String, String)]) -> Result<(), SetupError>;
}

/// What the runner will do with a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// Execute the step
    Run,
    /// Continue a step an earlier run left half done, skipping its first
    /// `from` actions
    Resume { from: usize },
    /// Completed by an earlier run with the same fingerprint
    Done,
    /// Guard says no
    Skipped { reason: String },
}

impl Decision {
    /// Whether the step's actions will be executed
    pub fn executes(&self) -> bool {
        matches!(self, Self::Run | Self::Resume { .. })
    }
}

/// Decide a step against the current state and filesystem
///
/// The filesystem wins over the state for guarded steps: a missing
/// destination is recreated even when an earlier run completed the step.
pub fn decide(step: &Step, state: &SetupState) -> Decision {
    let fingerprint = step.fingerprint();
    match &step.guard {
        Guard::Disabled { reason } => Decision::Skipped {
            reason: reason.clone(),
        },
        Guard::UnlessExists { path } if path.exists() => {
            match state.resume_point(&step.name, &fingerprint) {
                Some(from) if from > 0 => Decision::Resume { from },
                _ if state.is_done(&step.name, &fingerprint) => Decision::Done,
                _ => Decision::Skipped {
                    reason: format!("{} already exists", path.display()),
                },
            }
        }
        Guard::UnlessExists { .. } => Decision::Run,
        Guard::Always if state.is_done(&step.name, &fingerprint) => Decision::Done,
        Guard::Always => Decision::Run,
    }
}

/// Decisions for every step, without executing anything
pub fn preview<'p>(plan: &'p Plan, state: &SetupState) -> Vec<(&'p Step, Decision)> {
    plan.steps.iter().map(|step| (step, decide(step, state))).collect()
}

/// Progress notifications
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    Starting(&'a Step),
    Finished(&'a Step),
    AlreadyDone(&'a Step),
    Skipped(&'a Step, &'a str),
}

/// Per-step result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub name: String,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
    /// Messages collected from [`Action::Notice`]
    pub notices: Vec<String>,
}

impl RunReport {
    /// Names of the steps that were executed
    pub fn executed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.decision.executes())
            .map(|o| o.name.as_str())
            .collect()
    }
}

/// Sequential plan executor
pub struct Runner<'e, E: Executor> {
    executor: &'e mut E,
    state: SetupState,
    state_path: Option<PathBuf>,
}

impl<'e, E: Executor> Runner<'e, E> {
    /// Create a runner starting from `state`
    pub fn new(executor: &'e mut E, state: SetupState) -> Self {
        Self {
            executor,
            state,
            state_path: None,
        }
    }

    /// Save the state to `path` after every completed step
    #[must_use]
    pub fn persist_to(mut self, path: PathBuf) -> Self {
        self.state_path = Some(path);
        self
    }

    /// State including steps completed so far
    pub fn state(&self) -> &SetupState {
        &self.state
    }

    /// Run every step of the plan in order
    ///
    /// Returns the first error; the failing step is recorded as interrupted,
    /// not completed, and no later step runs.
    pub fn run<F>(&mut self, plan: &Plan, mut on_event: F) -> Result<RunReport, SetupError>
    where
        F: FnMut(RunEvent<'_>),
    {
        let mut report = RunReport::default();

        for step in &plan.steps {
            let decision = decide(step, &self.state);
            match &decision {
                Decision::Skipped { reason } => {
                    tracing::info!(step = %step.name, %reason, "Skipping step");
                    on_event(RunEvent::Skipped(step, reason));
                }
                Decision::Done => {
                    tracing::info!(step = %step.name, "Step already completed");
                    on_event(RunEvent::AlreadyDone(step));
                }
                Decision::Run => {
                    on_event(RunEvent::Starting(step));
                    self.run_step(step, 0, plan, &mut report)?;
                    on_event(RunEvent::Finished(step));
                }
                Decision::Resume { from } => {
                    tracing::info!(step = %step.name, from, "Resuming interrupted step");
                    on_event(RunEvent::Starting(step));
                    self.run_step(step, *from, plan, &mut report)?;
                    on_event(RunEvent::Finished(step));
                }
            }

            report.outcomes.push(StepOutcome {
                name: step.name.clone(),
                decision,
            });
        }

        Ok(report)
    }

    fn run_step(
        &mut self,
        step: &Step,
        from: usize,
        plan: &Plan,
        report: &mut RunReport,
    ) -> Result<(), SetupError> {
        tracing::info!(step = %step.name, "Running step");
        let fingerprint = step.fingerprint();

        for (index, action) in step.actions.iter().enumerate().skip(from) {
            if let Action::Notice { message } = action {
                report.notices.push(message.clone());
                continue;
            }
            tracing::debug!(step = %step.name, %action, "Executing action");
            if let Err(e) = self.executor.execute(action, &plan.environment) {
                tracing::error!(step = %step.name, error = %e, "Step failed");
                self.state.mark_interrupted(&step.name, &fingerprint, index);
                if let Err(save) = self.save_state() {
                    tracing::warn!(error = %save, "Could not record the failed step");
                }
                return Err(e);
            }
        }

        self.state.mark_done(&step.name, &fingerprint);
        self.save_state()?;
        Ok(())
    }

    fn save_state(&self) -> Result<(), SetupError> {
        if let Some(path) = &self.state_path {
            self.state.save(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_tool::BuildTool;
    use crate::core::command::CommandSpec;
    use crate::core::deps::{DependencySet, PackageManager};
    use crate::core::platform::Platform;
    use crate::core::settings::SkipFlags;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        actions: Vec<String>,
        fail_on: Option<String>,
    }

    impl Executor for Recorder {
        fn execute(&mut self, action: &Action, _env: &[(String, String)]) -> Result<(), SetupError> {
            let rendered = action.to_string();
            if self.fail_on.as_deref() == Some(rendered.as_str()) {
                return Err(SetupError::CommandFailed {
                    command: rendered,
                    status: "exit status: 1".to_string(),
                });
            }
            self.actions.push(rendered);
            Ok(())
        }
    }

    fn step(name: &str, guard: Guard, command: &str) -> Step {
        Step {
            name: name.to_string(),
            description: name.to_string(),
            guard,
            actions: vec![Action::Run(CommandSpec::new(command))],
        }
    }

    fn plan(steps: Vec<Step>) -> Plan {
        Plan {
            platform: Platform::RaspberryPi,
            model: None,
            build_tool: BuildTool::Make { jobs: 4 },
            skips: SkipFlags::default(),
            dependencies: DependencySet {
                manager: PackageManager::Apt,
                groups: Vec::new(),
            },
            environment: Vec::new(),
            steps,
        }
    }

    #[test]
    fn test_runs_steps_in_order() {
        let plan = plan(vec![
            step("a", Guard::Always, "first"),
            step("b", Guard::Always, "second"),
        ]);
        let mut recorder = Recorder::default();
        let report = Runner::new(&mut recorder, SetupState::default())
            .run(&plan, |_| {})
            .unwrap();

        assert_eq!(recorder.actions, ["first", "second"]);
        assert_eq!(report.executed(), ["a", "b"]);
    }

    #[test]
    fn test_disabled_step_is_skipped() {
        let plan = plan(vec![step(
            "a",
            Guard::Disabled {
                reason: "nope".to_string(),
            },
            "first",
        )]);
        let mut recorder = Recorder::default();
        let report = Runner::new(&mut recorder, SetupState::default())
            .run(&plan, |_| {})
            .unwrap();

        assert!(recorder.actions.is_empty());
        assert_eq!(
            report.outcomes[0].decision,
            Decision::Skipped {
                reason: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_unless_exists_skips_existing_path() {
        let dir = TempDir::new().unwrap();
        let plan = plan(vec![
            step(
                "present",
                Guard::UnlessExists {
                    path: dir.path().to_path_buf(),
                },
                "clone-present",
            ),
            step(
                "absent",
                Guard::UnlessExists {
                    path: dir.path().join("missing"),
                },
                "clone-absent",
            ),
        ]);
        let mut recorder = Recorder::default();
        Runner::new(&mut recorder, SetupState::default())
            .run(&plan, |_| {})
            .unwrap();

        assert_eq!(recorder.actions, ["clone-absent"]);
    }

    #[test]
    fn test_failure_stops_run_and_is_not_recorded() {
        let plan = plan(vec![
            step("a", Guard::Always, "ok"),
            step("b", Guard::Always, "boom"),
            step("c", Guard::Always, "never"),
        ]);
        let mut recorder = Recorder {
            fail_on: Some("boom".to_string()),
            ..Recorder::default()
        };
        let mut runner = Runner::new(&mut recorder, SetupState::default());
        let result = runner.run(&plan, |_| {});

        assert!(matches!(result, Err(SetupError::CommandFailed { .. })));
        let state = runner.state().clone();
        assert!(state.completed.contains_key("a"));
        assert!(!state.completed.contains_key("b"));
        assert!(!state.completed.contains_key("c"));
        assert_eq!(recorder.actions, ["ok"]);
    }

    #[test]
    fn test_completed_steps_are_not_repeated() {
        let plan = plan(vec![step("a", Guard::Always, "first")]);
        let mut state = SetupState::default();
        state.mark_done("a", &plan.steps[0].fingerprint());

        let mut recorder = Recorder::default();
        let report = Runner::new(&mut recorder, state).run(&plan, |_| {}).unwrap();

        assert!(recorder.actions.is_empty());
        assert_eq!(report.outcomes[0].decision, Decision::Done);
    }

    #[test]
    fn test_changed_fingerprint_reruns_step() {
        let plan = plan(vec![step("a", Guard::Always, "first")]);
        let mut state = SetupState::default();
        state.mark_done("a", "stale");

        let mut recorder = Recorder::default();
        Runner::new(&mut recorder, state).run(&plan, |_| {}).unwrap();
        assert_eq!(recorder.actions, ["first"]);
    }

    #[test]
    fn test_missing_destination_reruns_completed_step() {
        let dir = TempDir::new().unwrap();
        let plan = plan(vec![step(
            "clone",
            Guard::UnlessExists {
                path: dir.path().join("gone"),
            },
            "git clone",
        )]);
        let mut state = SetupState::default();
        state.mark_done("clone", &plan.steps[0].fingerprint());

        assert_eq!(decide(&plan.steps[0], &state), Decision::Run);
    }

    #[test]
    fn test_existing_destination_of_completed_step_is_done() {
        let dir = TempDir::new().unwrap();
        let plan = plan(vec![step(
            "clone",
            Guard::UnlessExists {
                path: dir.path().to_path_buf(),
            },
            "git clone",
        )]);
        let mut state = SetupState::default();
        state.mark_done("clone", &plan.steps[0].fingerprint());

        assert_eq!(decide(&plan.steps[0], &state), Decision::Done);
    }

    #[test]
    fn test_half_done_guarded_step_continues_after_failed_action() {
        let dir = TempDir::new().unwrap();
        let mut clone = step(
            "clone",
            Guard::UnlessExists {
                path: dir.path().to_path_buf(),
            },
            "git clone",
        );
        clone.actions.push(Action::Run(CommandSpec::new("submodules")));
        clone.actions.push(Action::Run(CommandSpec::new("export")));
        let plan = plan(vec![clone]);

        let mut failing = Recorder {
            fail_on: Some("submodules".to_string()),
            ..Recorder::default()
        };
        let mut runner = Runner::new(&mut failing, SetupState::default());
        assert!(runner.run(&plan, |_| {}).is_err());
        let state = runner.state().clone();
        assert_eq!(
            decide(&plan.steps[0], &state),
            Decision::Resume { from: 1 }
        );

        let mut recorder = Recorder::default();
        let mut runner = Runner::new(&mut recorder, state);
        let report = runner.run(&plan, |_| {}).unwrap();

        assert_eq!(report.executed(), ["clone"]);
        assert!(runner.state().interrupted.is_none());
        assert_eq!(recorder.actions, ["submodules", "export"]);
    }

    #[test]
    fn test_failed_first_action_leaves_existing_path_alone() {
        let dir = TempDir::new().unwrap();
        let plan = plan(vec![step(
            "clone",
            Guard::UnlessExists {
                path: dir.path().to_path_buf(),
            },
            "git clone",
        )]);
        let mut state = SetupState::default();
        state.mark_interrupted("clone", &plan.steps[0].fingerprint(), 0);

        assert!(matches!(
            decide(&plan.steps[0], &state),
            Decision::Skipped { .. }
        ));
    }

    #[test]
    fn test_notices_are_collected_not_executed() {
        let mut notice_step = step("uart", Guard::Always, "raspi-config");
        notice_step.actions.push(Action::Notice {
            message: "reboot".to_string(),
        });
        let plan = plan(vec![notice_step]);

        let mut recorder = Recorder::default();
        let report = Runner::new(&mut recorder, SetupState::default())
            .run(&plan, |_| {})
            .unwrap();

        assert_eq!(recorder.actions, ["raspi-config"]);
        assert_eq!(report.notices, ["reboot"]);
    }

    #[test]
    fn test_state_persisted_after_each_step() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".pico-setup").join("state.json");
        let plan = plan(vec![step("a", Guard::Always, "first")]);

        let mut recorder = Recorder::default();
        Runner::new(&mut recorder, SetupState::default())
            .persist_to(path.clone())
            .run(&plan, |_| {})
            .unwrap();

        let saved = SetupState::load(&path).unwrap();
        assert!(saved.is_done("a", &plan.steps[0].fingerprint()));
    }

    #[test]
    fn test_events_are_emitted() {
        let plan = plan(vec![
            step("a", Guard::Always, "first"),
            step(
                "b",
                Guard::Disabled {
                    reason: "off".to_string(),
                },
                "second",
            ),
        ]);
        let mut events = Vec::new();
        let mut recorder = Recorder::default();
        Runner::new(&mut recorder, SetupState::default())
            .run(&plan, |event| {
                events.push(match event {
                    RunEvent::Starting(s) => format!("start {}", s.name),
                    RunEvent::Finished(s) => format!("finish {}", s.name),
                    RunEvent::AlreadyDone(s) => format!("done {}", s.name),
                    RunEvent::Skipped(s, reason) => format!("skip {} ({reason})", s.name),
                });
            })
            .unwrap();

        assert_eq!(events, ["start a", "finish a", "skip b (off)"]);
    }
}
