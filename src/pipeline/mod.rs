//! The pipeline interpreter.
//!
//! Tokens are parsed into a [`Plan`] of deferred actions against a
//! [`FilenameStack`], then the [`Engine`] runs those actions in order.

pub mod engine;
pub mod operation;
pub mod parser;
pub mod plan;
pub mod registry;
pub mod signal_handler;
pub mod stack;

pub use engine::{ActionReport, Engine, Outcome, RunReport};
pub use operation::{Arity, Effect, Operation, OperationSpec, OutputRule, OPERATIONS};
pub use parser::parse;
pub use plan::{Action, Plan};
pub use registry::OperationRegistry;
pub use signal_handler::{setup_interrupt_handlers, InterruptFlag};
pub use stack::FilenameStack;
