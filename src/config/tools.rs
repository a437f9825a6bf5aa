//! External collaborators and the command lines used to reach them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An external tool of the atto-8 toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Cc,
    Enc,
    Asm,
    Dasm,
    Dec,
    Emu,
    Mic,
    Sim,
    Circ,
    BfPad,
    BfMic,
}

impl Tool {
    pub const ALL: [Tool; 11] = [
        Tool::Cc,
        Tool::Enc,
        Tool::Asm,
        Tool::Dasm,
        Tool::Dec,
        Tool::Emu,
        Tool::Mic,
        Tool::Sim,
        Tool::Circ,
        Tool::BfPad,
        Tool::BfMic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Cc => "cc",
            Tool::Enc => "enc",
            Tool::Asm => "asm",
            Tool::Dasm => "dasm",
            Tool::Dec => "dec",
            Tool::Emu => "emu",
            Tool::Mic => "mic",
            Tool::Sim => "sim",
            Tool::Circ => "circ",
            Tool::BfPad => "bf-pad",
            Tool::BfMic => "bf-mic",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Environment variable that overrides this tool's command line.
    pub fn env_var(self) -> String {
        format!("ATTO_TOOL_{}", self.name().replace('-', "_").to_uppercase())
    }

    /// Command line used when no configuration names this tool.
    ///
    /// Rust tools are cargo binaries of the toolchain workspace; the byte
    /// converters are Python scripts living next to their sources.
    pub fn default_command(self) -> ToolCommand {
        match self {
            Tool::Enc => ToolCommand::python("enc/enc.py"),
            Tool::Dec => ToolCommand::python("dec/dec.py"),
            Tool::Circ => ToolCommand::skip_first_arg("python3 circ/circ.py"),
            Tool::BfPad => ToolCommand::python("bf/bf-pad.py"),
            tool => ToolCommand::cargo_bin(tool.name()),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Program plus leading arguments; inputs and outputs are appended after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn cargo_bin(name: &str) -> Self {
        Self::new(
            "cargo",
            ["run", "--quiet", "--bin", name, "--"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    fn python(script: &str) -> Self {
        Self::new("python3", vec![script.to_string()])
    }

    /// Run `command_line` without the first positional argument.
    ///
    /// `circ.py` patches the circuit bundled next to it and accepts only the
    /// memory and microcode images, so the circuit filename is shifted off.
    fn skip_first_arg(command_line: &str) -> Self {
        Self::new(
            "sh",
            vec![
                "-c".to_string(),
                format!("shift; exec {command_line} \"$@\""),
                "circ".to_string(),
            ],
        )
    }

    /// Parse a shell-style command line such as `python3 enc/enc.py`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = shell_words::split(line).map_err(|e| e.to_string())?;
        if words.is_empty() {
            return Err("empty command line".to_string());
        }
        let program = words.remove(0);
        Ok(Self::new(program, words))
    }
}
