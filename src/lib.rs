//! # LMC Emulator
//!
//! An emulator of the Little Man Computer, the decimal teaching machine
//! with one accumulator and a hundred mailboxes.
//!
//! One engine covers the three common machines: the classic three-digit
//! decimal LMC and the 32-bit and 64-bit saturating variants. They differ
//! only in their [`WordPolicy`].

pub mod word;
pub mod cpu;
pub mod program;
pub mod logging;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use word::{Word, WordPolicy};
pub use cpu::{Cpu, CpuState, CpuError, Diagnostic, Instruction, InputProvider, Memory, Registers, Variant};
pub use program::{disassemble, parse_program, load_program_file, save_program_file, ProgramFile};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
