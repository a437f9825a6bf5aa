use super::operation::{OperationSpec, OPERATIONS};
use std::collections::HashMap;

/// Token lookup table over [`OPERATIONS`], built once per run.
pub struct OperationRegistry {
    operations: HashMap<&'static str, &'static OperationSpec>,
    aliases: HashMap<&'static str, &'static str>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            operations: HashMap::new(),
            aliases: HashMap::new(),
        };

        for spec in OPERATIONS {
            registry.register(spec);
        }

        registry
    }

    fn register(&mut self, spec: &'static OperationSpec) {
        for alias in spec.aliases {
            self.aliases.insert(*alias, spec.name);
        }

        self.operations.insert(spec.name, spec);
    }

    /// Resolve a token; `None` means the token is a literal filename.
    pub fn lookup(&self, token: &str) -> Option<&'static OperationSpec> {
        self.operations.get(token).copied().or_else(|| {
            self.aliases
                .get(token)
                .and_then(|actual_name| self.operations.get(actual_name).copied())
        })
    }

    /// `(name, description)` pairs sorted by name.
    pub fn list_operations(&self) -> Vec<(&'static str, &'static str)> {
        let mut operations: Vec<_> = self
            .operations
            .values()
            .map(|spec| (spec.name, spec.description))
            .collect();

        operations.sort_by_key(|(name, _)| *name);
        operations
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
