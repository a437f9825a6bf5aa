//! Help text generation

use crate::pipeline::{Arity, OperationRegistry};
use std::fmt::Write;

/// The operation reference appended to `--help`.
pub fn operations_help() -> String {
    let registry = OperationRegistry::new();
    let mut help = String::from("Operations:\n");

    for (name, description) in registry.list_operations() {
        let arity = match registry.lookup(name).map(|spec| spec.arity) {
            Some(Arity::Fixed(n)) => n.to_string(),
            Some(Arity::All) => "all".to_string(),
            None => continue,
        };
        let _ = writeln!(help, "  {name:<6} [{arity:>3}]  {description}");
    }

    help.push_str("\nAny other token is pushed as a filename relative to the workspace.");
    help
}
