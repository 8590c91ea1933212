//! I/O channels of the LMC.
//!
//! - the input queue consumed by INP
//! - the output log appended by OUT
//! - the input provider asked when the queue runs dry
//! - the diagnostic log for recoverable faults

use crate::word::Word;
use serde::{Serialize, Deserialize};
use std::collections::VecDeque;
use std::fmt;

/// Source of input when the queue is empty.
///
/// The engine calls [`InputProvider::read_input`] only for an INP that
/// finds the queue empty. Returning `None` leaves the accumulator
/// unchanged and records [`Diagnostic::InputStarved`].
pub trait InputProvider {
    fn read_input(&mut self) -> Option<Word>;
}

/// Never supplies input: starvation is reported and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn read_input(&mut self) -> Option<Word> {
        None
    }
}

/// Supplies the same value for every starved INP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInput(pub Word);

impl InputProvider for FixedInput {
    fn read_input(&mut self) -> Option<Word> {
        Some(self.0)
    }
}

impl<F> InputProvider for F
where
    F: FnMut() -> Option<Word>,
{
    fn read_input(&mut self) -> Option<Word> {
        self()
    }
}

/// Queued input and produced output of one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channels {
    input: VecDeque<Word>,
    output: Vec<Word>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one input value.
    pub fn push_input(&mut self, value: Word) {
        self.input.push_back(value);
    }

    /// Dequeue the next input value.
    pub fn pop_input(&mut self) -> Option<Word> {
        self.input.pop_front()
    }

    /// Pending input, front first.
    pub fn input(&self) -> impl ExactSizeIterator<Item = Word> + '_ {
        self.input.iter().copied()
    }

    /// Append to the output log.
    pub fn push_output(&mut self, value: Word) {
        self.output.push(value);
    }

    /// Everything written by OUT so far.
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// Drop pending input and produced output.
    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
    }
}

/// A recoverable condition reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A cell that is not an instruction was executed as a no-op.
    UnknownInstruction { pc: usize, raw: Word },
    /// INP found no queued input and the provider had none either.
    InputStarved { pc: usize },
    /// The program counter left memory; execution stopped.
    PcOutOfBounds { pc: usize },
    /// A value supplied from outside did not fit the word range.
    ValueClamped { value: Word, clamped: Word },
}

impl Diagnostic {
    /// Whether this diagnostic stopped the machine.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Diagnostic::PcOutOfBounds { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownInstruction { pc, raw } => {
                write!(f, "unknown instruction {:03} at {:02}", raw, pc)
            }
            Diagnostic::InputStarved { pc } => {
                write!(f, "no input available for INP at {:02}", pc)
            }
            Diagnostic::PcOutOfBounds { pc } => {
                write!(f, "program counter out of bounds: {}", pc)
            }
            Diagnostic::ValueClamped { value, clamped } => {
                write!(f, "value {} does not fit the word, clamped to {}", value, clamped)
            }
        }
    }
}
