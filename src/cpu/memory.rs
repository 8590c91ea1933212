//! LMC memory subsystem.
//!
//! One hundred mailboxes, addressed by the two low decimal digits of an
//! instruction.

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// The number of mailboxes.
pub const MEMORY_SIZE: usize = 100;

/// LMC memory: 100 word-sized cells.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE],
        }
    }

    /// Read a cell by address (0-99).
    ///
    /// # Panics
    /// Panics if address is out of range.
    #[inline]
    pub fn read(&self, addr: usize) -> Word {
        assert!(addr < MEMORY_SIZE, "Memory address {} out of range (0-{})", addr, MEMORY_SIZE - 1);
        self.cells[addr]
    }

    /// Write a cell by address (0-99).
    ///
    /// # Panics
    /// Panics if address is out of range.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) {
        assert!(addr < MEMORY_SIZE, "Memory address {} out of range (0-{})", addr, MEMORY_SIZE - 1);
        self.cells[addr] = value;
    }

    /// Read a cell, returning `None` outside 0-99.
    pub fn get(&self, addr: usize) -> Option<Word> {
        self.cells.get(addr).copied()
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Copy `program` into memory starting at `start_addr`.
    ///
    /// Anything past mailbox 99 is dropped. Returns the number of cells
    /// actually written.
    pub fn load_program(&mut self, start_addr: usize, program: &[Word]) -> usize {
        let available = MEMORY_SIZE.saturating_sub(start_addr);
        let count = program.len().min(available);
        self.cells[start_addr.min(MEMORY_SIZE)..][..count].copy_from_slice(&program[..count]);
        count
    }

    /// Non-zero cells in address order, for state dumps.
    pub fn non_zero(&self) -> impl Iterator<Item = (usize, Word)> + '_ {
        self.cells
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, cell)| *cell != 0)
    }

    /// Cells `start..=end` with their addresses, clipped to mailbox 99.
    pub fn range(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, Word)> + '_ {
        let end = end.min(MEMORY_SIZE - 1);
        self.cells
            .iter()
            .copied()
            .enumerate()
            .skip(start)
            .take((end + 1).saturating_sub(start))
    }

    /// All cells as a slice.
    pub fn cells(&self) -> &[Word] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("non_zero_cells", &self.non_zero().count())
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}
