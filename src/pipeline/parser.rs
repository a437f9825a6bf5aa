//! Turns the token list into a [`Plan`] without touching the filesystem.
//!
//! Parsing is a pass of its own so that a structurally broken pipeline
//! (stack underflow, unconsumed filenames) is rejected before any
//! collaborator runs.

use super::operation::{Arity, Effect, OperationSpec};
use super::plan::{Action, Plan};
use super::registry::OperationRegistry;
use super::stack::FilenameStack;
use crate::error::{PipelineError, Result};
use crate::workspace::Workspace;
use std::path::PathBuf;
use tracing::{debug, trace};

pub fn parse<I, S>(tokens: I, registry: &OperationRegistry, workspace: &Workspace) -> Result<Plan>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut stream: Vec<String> = tokens.into_iter().map(Into::into).collect();
    stream.reverse();

    let mut stack = FilenameStack::new();
    let mut actions = Vec::new();

    while let Some(token) = stream.pop() {
        match registry.lookup(&token) {
            Some(spec) => {
                if let Some(action) = apply(spec, &token, &mut stack, workspace)? {
                    trace!("Recorded action: {}", action);
                    actions.push(action);
                }
            }
            None => {
                let path = workspace.resolve(&token);
                trace!("Pushing {}", path.display());
                stack.push(path);
            }
        }
    }

    if !stack.is_empty() {
        return Err(PipelineError::UnusedArguments {
            leftovers: stack.into_vec(),
        });
    }

    debug!("Parsed {} action(s)", actions.len());
    Ok(Plan::new(workspace.root(), actions))
}

fn apply(
    spec: &OperationSpec,
    token: &str,
    stack: &mut FilenameStack,
    workspace: &Workspace,
) -> Result<Option<Action>> {
    match spec.effect {
        Effect::Duplicate => {
            stack.dup(token)?;
            Ok(None)
        }
        Effect::Discard => {
            take_inputs(spec, token, stack)?;
            Ok(None)
        }
        Effect::Sink => {
            let inputs = take_inputs(spec, token, stack)?;
            Ok(Some(Action::new(spec.operation, inputs, Vec::new())))
        }
        Effect::Invoke(_) => {
            let inputs = take_inputs(spec, token, stack)?;
            let outputs = spec.output.derive(&inputs, workspace);
            for output in &outputs {
                stack.push(output.clone());
            }
            Ok(Some(Action::new(spec.operation, inputs, outputs)))
        }
    }
}

fn take_inputs(spec: &OperationSpec, token: &str, stack: &mut FilenameStack) -> Result<Vec<PathBuf>> {
    match spec.arity {
        Arity::Fixed(count) => stack.take(token, count),
        Arity::All => stack.drain(token),
    }
}

#[cfg(test)]
mod tests;
