//! CLI handling
//!
//! - Argument parsing structures
//! - Help text generation
//! - The stage/parse/execute entry point

pub mod args;
pub mod help;
pub mod run;

pub use args::Cli;
pub use help::operations_help;
pub use run::execute;
