//! LMC registers.
//!
//! The LMC has two programmer-visible registers:
//! - ACC: the accumulator every arithmetic and transfer goes through
//! - PC: the program counter (a mailbox address)

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// The LMC register file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Accumulator.
    pub acc: Word,

    /// Program counter. May step past 99; the engine faults on the next fetch.
    pub pc: usize,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self { acc: 0, pc: 0 }
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        self.acc = 0;
        self.pc = 0;
    }

    /// Increment the program counter by 1.
    /// Returns the old value.
    pub fn advance_pc(&mut self) -> usize {
        let old = self.pc;
        self.pc = self.pc.saturating_add(1);
        old
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: u8) {
        self.pc = addr as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_pc() {
        let mut regs = Registers::new();
        regs.pc = 10;

        let old = regs.advance_pc();
        assert_eq!(old, 10);
        assert_eq!(regs.pc, 11);
    }

    #[test]
    fn test_jump_and_reset() {
        let mut regs = Registers::new();
        regs.acc = 77;
        regs.jump(42);
        assert_eq!(regs.pc, 42);

        regs.reset();
        assert_eq!(regs, Registers::new());
    }
}
