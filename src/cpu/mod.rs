//! CPU emulation for the Little Man Computer.
//!
//! This module implements the LMC architecture:
//! - 100 mailboxes (memory cells)
//! - 2 registers: accumulator and program counter
//! - 10-instruction set with single-address architecture
//! - an input queue and an output log

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod io;
pub mod variant;

pub use memory::{Memory, MEMORY_SIZE};
pub use registers::Registers;
pub use decode::{Instruction, Opcode, decode, encode};
pub use execute::{Cpu, CpuError, CpuState, MachineSnapshot};
pub use io::{Diagnostic, FixedInput, InputProvider, NoInput};
pub use variant::{Variant, ParseVariantError};
