//! TUI debugger for the LMC emulator.
//!
//! Provides an interactive terminal-based single-step debugger with:
//! - Register and machine state view
//! - Memory view
//! - Input queue, output log and diagnostics
//! - Disassembly around the program counter

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger};
