//! # atto-pipe
//!
//! Chains the atto-8 toolchain stages (compiler, encoder, assembler,
//! emulator, simulator and friends) by treating the command line as a
//! stack program over filenames.
//!
//! ## Usage
//!
//! ```bash
//! atto-pipe [-v] [--fail-fast] [--dry-run [--json]] <TOKEN>...
//! atto-pipe test/fib.asm asm emu
//! atto-pipe libc/crt0.c prog.c cc asm dup emu sim
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup and fatal error reporting
//! - `cli` - Argument parsing and the stage/parse/execute entry point
//! - `config` - `atto.toml` loading, environment overrides and tool commands
//! - `error` - Error type shared by the pipeline stages
//! - `pipeline` - Operation table, filename stack, parser and execution engine
//! - `subprocess` - Process runner abstraction used to launch collaborators
//! - `workspace` - Fresh workspace staging from the project sources
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod subprocess;
pub mod workspace;

pub use error::{PipelineError, Result};
