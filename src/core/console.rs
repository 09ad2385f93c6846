//! The player-facing text channel the game logic talks through.
//!
//! Battle, chest and floor logic only ever narrate, ask for a line, or wait
//! for an acknowledgement. How that reaches a human is up to the
//! implementor (see `ui::terminal`).

use std::collections::VecDeque;

pub trait Console {
    /// Shows one line of text. Must not fail.
    fn narrate(&mut self, text: &str);

    /// Blocks until the player acknowledges. A closed input stream must
    /// return instead of hanging.
    fn confirm(&mut self);

    /// Reads one line of player input. `None` means the input is closed.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Starts a fresh screen. Consoles without one may ignore it.
    fn clear_screen(&mut self) {}

    /// Impact effect played right after a critical hit lands.
    fn critical_flash(&mut self, banner: &str) {
        self.narrate(banner);
    }
}

/// One thing that happened on a [`ScriptedConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEntry {
    Line(String),
    Prompt(String),
    Flash(String),
    Confirm,
}

/// Console fed from a queue of lines that records everything shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<ConsoleEntry>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ConsoleEntry] {
        &self.transcript
    }

    /// All narrated lines joined with newlines.
    pub fn output(&self) -> String {
        self.transcript
            .iter()
            .filter_map(|entry| match entry {
                ConsoleEntry::Line(text) | ConsoleEntry::Flash(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn narrate(&mut self, text: &str) {
        self.transcript.push(ConsoleEntry::Line(text.to_string()));
    }

    fn confirm(&mut self) {
        self.transcript.push(ConsoleEntry::Confirm);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.transcript.push(ConsoleEntry::Prompt(prompt.to_string()));
        self.inputs.pop_front()
    }

    fn critical_flash(&mut self, banner: &str) {
        self.transcript.push(ConsoleEntry::Flash(banner.to_string()));
    }
}
