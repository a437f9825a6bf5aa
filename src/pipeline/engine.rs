//! Runs a parsed [`Plan`] one action at a time.

use super::operation::{Effect, StepSpec};
use super::plan::{Action, Plan};
use super::signal_handler::InterruptFlag;
use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::subprocess::{ExitStatus, ProcessCommand, ProcessCommandBuilder, ProcessRunner};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// `code` is set when the collaborator exited on its own with a status.
    Failed { code: Option<i32>, message: String },
    /// Not run because an earlier action failed under [`FailurePolicy::Abort`].
    Skipped,
}

impl Outcome {
    fn failed(code: Option<i32>, message: impl Into<String>) -> Self {
        Outcome::Failed {
            code,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action: Action,
    pub outcome: Outcome,
}

/// Outcome of every action in the plan, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub actions: Vec<ActionReport>,
    /// Set when a failure under [`FailurePolicy::Abort`] ended the run.
    pub aborted: bool,
}

impl RunReport {
    pub fn attempted(&self) -> usize {
        self.actions
            .iter()
            .filter(|r| r.outcome != Outcome::Skipped)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionReport> {
        self.actions.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.actions.len() - self.attempted()
    }

    /// The error an aborted run exits with.
    pub fn abort_error(&self) -> Option<PipelineError> {
        if !self.aborted {
            return None;
        }
        self.actions.iter().find_map(|report| match &report.outcome {
            Outcome::Failed { message, .. } => Some(PipelineError::CollaboratorFailed {
                operation: report.action.operation.to_string(),
                message: message.clone(),
            }),
            _ => None,
        })
    }
}

pub struct Engine<W> {
    config: PipelineConfig,
    runner: Arc<dyn ProcessRunner>,
    interrupt: InterruptFlag,
    sink: W,
}

impl<W> Engine<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(config: PipelineConfig, runner: Arc<dyn ProcessRunner>, sink: W) -> Self {
        Self {
            config,
            runner,
            interrupt: InterruptFlag::new(),
            sink,
        }
    }

    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Execute every action in order.
    ///
    /// Collaborator failures are logged and, under
    /// [`FailurePolicy::Continue`], do not stop later actions. Under
    /// [`FailurePolicy::Abort`] the rest of the plan is reported as skipped
    /// and the report is marked aborted. An interrupt always ends the run.
    pub async fn execute(&mut self, plan: &Plan) -> Result<RunReport> {
        let mut report = RunReport::default();
        let total = plan.len();
        let mut actions = plan.actions.iter().enumerate();

        while let Some((index, action)) = actions.next() {
            self.check_interrupt()?;

            debug!("[{}/{}] {}", index + 1, total, action);
            let outcome = self.run_action(action).await;

            self.check_interrupt()?;

            let failed = outcome.is_failure();
            if let Outcome::Failed { ref message, .. } = outcome {
                warn!("Error: `{}` failed: {}", action.operation, message);
            }

            report.actions.push(ActionReport {
                action: action.clone(),
                outcome,
            });

            if failed && self.config.failure_policy == FailurePolicy::Abort {
                report.aborted = true;
                report.actions.extend(actions.by_ref().map(|(_, rest)| ActionReport {
                    action: rest.clone(),
                    outcome: Outcome::Skipped,
                }));
                if report.skipped_count() > 0 {
                    info!("Skipping {} remaining action(s)", report.skipped_count());
                }
            }
        }

        Ok(report)
    }

    fn check_interrupt(&self) -> Result<()> {
        if self.interrupt.is_raised() {
            return Err(PipelineError::Interrupted);
        }
        Ok(())
    }

    async fn run_action(&mut self, action: &Action) -> Outcome {
        match action.operation.spec().effect {
            Effect::Sink => self.sink_file(action).await,
            Effect::Invoke(steps) => self.invoke(action, steps).await,
            // Stack primitives never produce actions
            Effect::Discard | Effect::Duplicate => Outcome::Succeeded,
        }
    }

    async fn invoke(&self, action: &Action, steps: &[StepSpec]) -> Outcome {
        for step in steps {
            if self.interrupt.is_raised() {
                return Outcome::failed(None, "interrupted");
            }

            let command = self.step_command(step, action);
            match self.runner.run(command).await {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    return Outcome::failed(
                        output.status.code(),
                        format!("{} {}", step.tool, describe_status(&output.status)),
                    )
                }
                Err(e) => return Outcome::failed(None, format!("{}: {}", step.tool, e)),
            }
        }
        Outcome::Succeeded
    }

    /// Configured tool command line, then inputs, then selected outputs.
    fn step_command(&self, step: &StepSpec, action: &Action) -> ProcessCommand {
        let tool = self.config.tool_command(step.tool);
        let outputs = step
            .outputs
            .iter()
            .filter_map(|index| action.outputs.get(*index));

        let mut builder = ProcessCommandBuilder::new(&tool.program).args(&tool.args);
        if step.takes_inputs {
            builder = builder.path_args(&action.inputs);
        }

        builder
            .path_args(outputs)
            .current_dir(&self.config.root)
            .build()
    }

    async fn sink_file(&mut self, action: &Action) -> Outcome {
        let Some(path) = action.inputs.first() else {
            return Outcome::failed(None, "nothing to write");
        };

        let mut file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                return Outcome::failed(None, format!("cannot read '{}': {}", path.display(), e))
            }
        };

        match tokio::io::copy(&mut file, &mut self.sink).await {
            Ok(bytes) => debug!("Wrote {} bytes from {}", bytes, path.display()),
            Err(e) => {
                return Outcome::failed(None, format!("cannot write '{}': {}", path.display(), e))
            }
        }

        if let Err(e) = self.sink.flush().await {
            return Outcome::failed(None, format!("cannot flush output: {}", e));
        }

        Outcome::Succeeded
    }
}

fn describe_status(status: &ExitStatus) -> String {
    match status {
        ExitStatus::Success => "succeeded".to_string(),
        ExitStatus::Error(code) => format!("exited with code {}", code),
        ExitStatus::Signal(signal) => format!("terminated by signal {}", signal),
    }
}
