//! Tolerance prompts.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use super::InputPrompt;

/// Interactive prompt over a line-oriented reader and writer.
///
/// An empty line accepts the default. Out-of-range or unparsable input is
/// asked again. `cancel`, `q` or end of input cancels.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on the process terminal. Questions go to stderr so stdout stays
    /// clean for machine-readable output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> InputPrompt for TerminalPrompt<R, W> {
    fn get_real(&mut self, label: &str, default: f64, min: f64, max: Option<f64>) -> Option<f64> {
        loop {
            let _ = write!(self.output, "{} <{}>: ", label, default);
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Some(default);
            }
            if answer.eq_ignore_ascii_case("cancel") || answer.eq_ignore_ascii_case("q") {
                return None;
            }
            match answer.parse::<f64>() {
                Ok(value) if in_range(value, min, max) => return Some(value),
                Ok(value) => {
                    let _ = writeln!(self.output, "{} is out of range{}", value, range_hint(min, max));
                }
                Err(_) => {
                    let _ = writeln!(self.output, "'{}' is not a number", answer);
                }
            }
        }
    }
}

/// One pre-decided answer for a [`PresetPrompt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresetAnswer {
    /// Answer with this value.
    Value(f64),
    /// Accept the prompt's default.
    Default,
    /// Cancel the prompt.
    Cancel,
}

impl From<Option<f64>> for PresetAnswer {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Default, Self::Value)
    }
}

/// Non-interactive prompt answering from a fixed queue.
///
/// Once the queue is exhausted every further prompt is cancelled.
#[derive(Debug, Clone, Default)]
pub struct PresetPrompt {
    answers: VecDeque<PresetAnswer>,
}

impl PresetPrompt {
    #[must_use]
    pub fn new<I: IntoIterator<Item = PresetAnswer>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl InputPrompt for PresetPrompt {
    fn get_real(&mut self, label: &str, default: f64, min: f64, max: Option<f64>) -> Option<f64> {
        match self.answers.pop_front()? {
            PresetAnswer::Value(value) if in_range(value, min, max) => {
                log::debug!("{}: {}", label, value);
                Some(value)
            }
            PresetAnswer::Value(value) => {
                log::warn!("{}: {} is out of range{}", label, value, range_hint(min, max));
                None
            }
            PresetAnswer::Default => {
                log::debug!("{}: using default {}", label, default);
                Some(default)
            }
            PresetAnswer::Cancel => None,
        }
    }
}

fn in_range(value: f64, min: f64, max: Option<f64>) -> bool {
    value.is_finite() && value >= min && max.is_none_or(|m| value <= m)
}

fn range_hint(min: f64, max: Option<f64>) -> String {
    match max {
        Some(m) => format!(" (expected {} to {})", min, m),
        None => format!(" (expected at least {})", min),
    }
}
