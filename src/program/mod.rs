//! Program files, disassembly and built-in samples.
//!
//! This module provides:
//! - A loader/writer for line-delimited program files
//! - A disassembler (cells → readable text)
//! - A catalog of sample programs

pub mod file;
pub mod disasm;
pub mod samples;

pub use file::{ProgramFile, ProgramFileError, SkippedLine, parse_program, read_program, load_program_file, save_program_file};
pub use disasm::{disassemble, disassemble_instruction};
pub use samples::{Sample, SAMPLES};
