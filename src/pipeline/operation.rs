//! The closed set of pipeline operations.
//!
//! Each row of [`OPERATIONS`] fixes an operation's token name(s), how many
//! stack entries it consumes, how its outputs are named, and what it does
//! when executed. The table is never mutated at runtime.

use crate::config::Tool;
use crate::workspace::Workspace;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Cc,
    Enc,
    Asm,
    Dasm,
    Dec,
    Emu,
    Mic,
    Sim,
    Circ,
    Bf,
    Pop,
    Dup,
    Pipe,
}

/// Number of filename stack entries an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Every pending entry; at least one must be present.
    All,
}

/// How produced filenames are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRule {
    None,
    /// Primary input path with the suffix appended.
    Suffix(&'static str),
    /// A file of this name directly under the workspace root.
    Fixed(&'static str),
    /// Two suffixed outputs, pushed in this order.
    Pair(&'static str, &'static str),
}

/// One collaborator launch within an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub tool: Tool,
    /// Whether the action's inputs are passed to this step.
    pub takes_inputs: bool,
    /// Indices into the action's outputs passed after the inputs.
    pub outputs: &'static [usize],
}

/// What happens when the operation's token is parsed or executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Drop the consumed entry; nothing is recorded.
    Discard,
    /// Push a copy of the top entry; nothing is recorded.
    Duplicate,
    /// Stream the consumed file to stdout.
    Sink,
    /// Launch collaborators in order.
    Invoke(&'static [StepSpec]),
}

#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub arity: Arity,
    pub output: OutputRule,
    pub effect: Effect,
    pub description: &'static str,
}

pub const MICROCODE_IMAGE: &str = "microcode.mic";

pub static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::Cc,
        name: "cc",
        aliases: &[],
        arity: Arity::All,
        output: OutputRule::Suffix(".asm"),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Cc,
            takes_inputs: true,
            outputs: &[0],
        }]),
        description: "compile every pending C source into one assembly file",
    },
    OperationSpec {
        operation: Operation::Enc,
        name: "enc",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::Suffix(".mem"),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Enc,
            takes_inputs: true,
            outputs: &[0],
        }]),
        description: "encode a hex source into a memory image",
    },
    OperationSpec {
        operation: Operation::Asm,
        name: "asm",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::Suffix(".mem"),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Asm,
            takes_inputs: true,
            outputs: &[0],
        }]),
        description: "assemble a source file into a memory image",
    },
    OperationSpec {
        operation: Operation::Dasm,
        name: "dasm",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::Suffix(".asm"),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Dasm,
            takes_inputs: true,
            outputs: &[0],
        }]),
        description: "disassemble a memory image",
    },
    OperationSpec {
        operation: Operation::Dec,
        name: "dec",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::Suffix(".hex"),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Dec,
            takes_inputs: true,
            outputs: &[0],
        }]),
        description: "decode a memory image into a hex listing",
    },
    OperationSpec {
        operation: Operation::Emu,
        name: "emu",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::None,
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Emu,
            takes_inputs: true,
            outputs: &[],
        }]),
        description: "run a memory image on the emulator",
    },
    OperationSpec {
        operation: Operation::Mic,
        name: "mic",
        aliases: &[],
        arity: Arity::Fixed(0),
        output: OutputRule::Fixed(MICROCODE_IMAGE),
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Mic,
            takes_inputs: false,
            outputs: &[0],
        }]),
        description: "build the microcode image",
    },
    OperationSpec {
        operation: Operation::Sim,
        name: "sim",
        aliases: &[],
        arity: Arity::Fixed(2),
        output: OutputRule::None,
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Sim,
            takes_inputs: true,
            outputs: &[],
        }]),
        description: "simulate a memory image against a microcode image",
    },
    OperationSpec {
        operation: Operation::Circ,
        name: "circ",
        aliases: &[],
        arity: Arity::Fixed(3),
        output: OutputRule::None,
        effect: Effect::Invoke(&[StepSpec {
            tool: Tool::Circ,
            takes_inputs: true,
            outputs: &[],
        }]),
        description: "patch memory and microcode images into a circuit and open it",
    },
    OperationSpec {
        operation: Operation::Bf,
        name: "bf",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::Pair(".mem", ".mic"),
        effect: Effect::Invoke(&[
            StepSpec {
                tool: Tool::BfPad,
                takes_inputs: true,
                outputs: &[0],
            },
            StepSpec {
                tool: Tool::BfMic,
                takes_inputs: false,
                outputs: &[1],
            },
        ]),
        description: "pad a brainfuck source into a memory image plus its microcode",
    },
    OperationSpec {
        operation: Operation::Pop,
        name: "pop",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::None,
        effect: Effect::Discard,
        description: "discard the top filename",
    },
    OperationSpec {
        operation: Operation::Dup,
        name: "dup",
        aliases: &[],
        arity: Arity::Fixed(1),
        output: OutputRule::None,
        effect: Effect::Duplicate,
        description: "duplicate the top filename",
    },
    OperationSpec {
        operation: Operation::Pipe,
        name: "pipe",
        aliases: &["cat"],
        arity: Arity::Fixed(1),
        output: OutputRule::None,
        effect: Effect::Sink,
        description: "write the top file's bytes to stdout",
    },
];

impl Operation {
    pub fn spec(self) -> &'static OperationSpec {
        OPERATIONS
            .iter()
            .find(|spec| spec.operation == self)
            .unwrap_or_else(|| unreachable!("every operation has a table row"))
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl OutputRule {
    /// Derive the produced paths for `inputs`, in push order.
    pub fn derive(self, inputs: &[PathBuf], workspace: &Workspace) -> Vec<PathBuf> {
        match (self, inputs.first()) {
            (OutputRule::None, _) => Vec::new(),
            (OutputRule::Fixed(name), _) => vec![workspace.resolve(name)],
            (OutputRule::Suffix(suffix), Some(primary)) => vec![append_suffix(primary, suffix)],
            (OutputRule::Pair(first, second), Some(primary)) => vec![
                append_suffix(primary, first),
                append_suffix(primary, second),
            ],
            (OutputRule::Suffix(_) | OutputRule::Pair(..), None) => Vec::new(),
        }
    }
}

/// `a.hex` + `.mem` is `a.hex.mem`; the existing extension is kept.
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
