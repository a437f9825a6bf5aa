use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// `ProcessRunner` that answers with scripted exit statuses per program and
/// records every command it was handed.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    scripted: Arc<Mutex<HashMap<String, ExitStatus>>>,
    calls: Arc<Mutex<Vec<ProcessCommand>>>,
}

/// Pending script entry; registered by [`ScriptedCommand::finish`].
pub struct ScriptedCommand {
    runner: MockProcessRunner,
    program: String,
    status: ExitStatus,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_command(&mut self, program: &str) -> ScriptedCommand {
        ScriptedCommand {
            runner: self.clone(),
            program: program.to_string(),
            status: ExitStatus::Success,
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        self.get_call_history()
            .iter()
            .filter(|cmd| cmd.program == program)
            .count()
            == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl ScriptedCommand {
    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.status = match code {
            0 => ExitStatus::Success,
            code => ExitStatus::Error(code),
        };
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    pub fn finish(self) {
        self.runner
            .scripted
            .lock()
            .unwrap()
            .insert(self.program, self.status);
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.clone());

        let status = self.scripted.lock().unwrap().get(&command.program).cloned();
        match status {
            Some(status) => Ok(ProcessOutput {
                status,
                duration: Duration::ZERO,
            }),
            None => Err(ProcessError::MockExpectationNotMet(format!(
                "unscripted command: {}",
                command.display()
            ))),
        }
    }
}
