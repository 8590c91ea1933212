//! WebAssembly bindings for the LMC emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.

use wasm_bindgen::prelude::*;
use crate::{Cpu, CpuError, Variant, Word};
use crate::cpu::MEMORY_SIZE;
use crate::program::{parse_program, samples, SkippedLine};
use crate::program::disasm::{disassemble_instruction, format_instruction};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly machine wrapper.
///
/// There is no interactive fallback in the browser: a starved INP is
/// reported as a diagnostic.
#[wasm_bindgen]
pub struct WasmLmc {
    cpu: Cpu,
    program: Vec<Word>,
    inputs: Vec<Word>,
    skipped: Vec<SkippedLine>,
}

#[wasm_bindgen]
impl WasmLmc {
    /// Create a machine. `variant` is `classic`, `lmc32` or `lmc64`.
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> Result<WasmLmc, JsError> {
        let variant: Variant = variant.parse()
            .map_err(|e| JsError::new(&format!("{}", e)))?;

        Ok(Self {
            cpu: Cpu::for_variant(variant),
            program: Vec::new(),
            inputs: Vec::new(),
            skipped: Vec::new(),
        })
    }

    /// Load a program from line-delimited text. Returns the cell count;
    /// see `skipped_lines` for lines that were left out.
    #[wasm_bindgen]
    pub fn load_text(&mut self, source: &str) -> usize {
        let parsed = parse_program(source);
        self.program = parsed.cells;
        self.skipped = parsed.skipped;
        self.inputs.clear();
        self.reset();
        self.program.len()
    }

    /// Load a built-in sample with its default inputs.
    #[wasm_bindgen]
    pub fn load_sample(&mut self, name: &str) -> Result<(), JsError> {
        let sample = samples::find(name)
            .ok_or_else(|| JsError::new(&format!("unknown sample: {}", name)))?;

        sample.load_into(&mut self.cpu);
        self.program = self.cpu.memory().cells().to_vec();
        self.inputs = sample.inputs.to_vec();
        self.skipped.clear();
        Ok(())
    }

    /// 1-based numbers of the lines the last `load_text` skipped.
    #[wasm_bindgen]
    pub fn skipped_lines(&self) -> Vec<u32> {
        self.skipped.iter().map(|s| s.line as u32).collect()
    }

    /// Queue an input value. Kept across `reset`.
    #[wasm_bindgen]
    pub fn add_input(&mut self, value: i64) {
        self.inputs.push(value);
        self.cpu.add_input(value);
    }

    /// Step one instruction. Returns the disassembled instruction.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        let instr = self.cpu.step()
            .map_err(|e| JsError::new(&format!("{}", e)))?;

        Ok(format_instruction(&instr))
    }

    /// Run until halt or max cycles. Returns total cycles, or throws when
    /// the program counter leaves memory.
    #[wasm_bindgen]
    pub fn run(&mut self, max_cycles: u32) -> Result<u64, JsError> {
        self.run_cycles(max_cycles)
            .map_err(|e| JsError::new(&format!("{}", e)))
    }

    /// Reset to the loaded program and queued inputs.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.cpu.load_program(&self.program);
        self.cpu.add_inputs(&self.inputs);
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.cpu.is_running()
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> usize {
        self.cpu.pc()
    }

    #[wasm_bindgen]
    pub fn accumulator(&self) -> i64 {
        self.cpu.accumulator()
    }

    /// Get state as string.
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.cpu.state())
    }

    /// Get memory cell value at address (0-99).
    #[wasm_bindgen]
    pub fn memory_at(&self, addr: usize) -> i64 {
        self.cpu.memory().get(addr).unwrap_or(0)
    }

    /// Get all 100 mailboxes.
    #[wasm_bindgen]
    pub fn memory_all(&self) -> Vec<i64> {
        self.cpu.memory().cells().to_vec()
    }

    /// Get everything OUT has written.
    #[wasm_bindgen]
    pub fn output(&self) -> Vec<i64> {
        self.cpu.output().to_vec()
    }

    /// Get diagnostics as an array of messages.
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> js_sys::Array {
        self.cpu
            .diagnostics()
            .iter()
            .map(|d| JsValue::from_str(&d.to_string()))
            .collect()
    }

    /// Get the full machine state as JSON.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.cpu.snapshot())
            .map_err(|e| JsError::new(&format!("{}", e)))
    }
}

impl WasmLmc {
    fn run_cycles(&mut self, max_cycles: u32) -> Result<u64, CpuError> {
        self.cpu.run_limited(max_cycles as u64)?;
        Ok(self.cpu.cycles())
    }
}

/// Disassemble a single cell value.
#[wasm_bindgen]
pub fn wasm_disassemble(value: i64) -> String {
    disassemble_instruction(value)
}

/// Number of mailboxes.
#[wasm_bindgen]
pub fn wasm_memory_size() -> usize {
    MEMORY_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(variant: &str) -> WasmLmc {
        WasmLmc::new(variant).ok().unwrap()
    }

    #[test]
    fn test_run_reports_fault() {
        let mut lmc = machine("classic");
        // BRA 99, where an OUT runs off the end of memory
        lmc.load_text(&format!("699\n{}902\n", "0\n".repeat(98)));

        assert_eq!(lmc.run_cycles(1_000), Err(CpuError::PcOutOfBounds { pc: 100 }));
        assert_eq!(lmc.state(), "Faulted");
    }

    #[test]
    fn test_run_returns_cycles() {
        let mut lmc = machine("lmc64");
        lmc.load_sample("add").ok().unwrap();

        assert_eq!(lmc.run_cycles(1_000), Ok(6));
        assert_eq!(lmc.output(), vec![8]);
    }

    #[test]
    fn test_load_text_keeps_skipped_lines() {
        let mut lmc = machine("lmc32");

        assert_eq!(lmc.load_text("901\nINP\n902\n\n// end\noops\n000\n"), 3);
        assert_eq!(lmc.skipped_lines(), vec![2, 6]);

        lmc.load_sample("add").ok().unwrap();
        assert!(lmc.skipped_lines().is_empty());
    }
}
