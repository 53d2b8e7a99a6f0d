//! Line-oriented user interaction.
//!
//! Interactive parts of the engine only ever read a line and write a line,
//! so they can be driven by a terminal or by a script.

use std::collections::VecDeque;

pub trait Console {
    /// Next line of input without its line ending, or `None` at end of input.
    fn read_line(&mut self) -> Option<String>;
    fn write_line(&mut self, line: &str);
}

/// Console fed from a fixed list of lines. Everything written is kept.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }

    fn write_line(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }
}
