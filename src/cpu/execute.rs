//! CPU execution engine for the LMC.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::word::{Word, WordPolicy};
use crate::cpu::{Memory, Registers, Variant};
use crate::cpu::decode::{self, Instruction};
use crate::cpu::io::{Channels, Diagnostic, InputProvider, NoInput};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HLT instruction).
    Halted,
    /// Program counter left memory. Inspectable; `reset` recovers.
    Faulted,
}

/// The Little Man Computer.
pub struct Cpu {
    regs: Registers,
    mem: Memory,
    state: CpuState,
    policy: WordPolicy,
    io: Channels,
    input: Box<dyn InputProvider>,
    diagnostics: Vec<Diagnostic>,
    /// Instruction count (for profiling).
    cycles: u64,
    /// Last executed instruction (for debugging).
    last_instr: Option<Instruction>,
}

impl Cpu {
    /// Create a classic decimal machine with zeroed state.
    pub fn new() -> Self {
        Self::with_policy(WordPolicy::Decimal)
    }

    /// Create a machine using `policy`. Starved INP only warns.
    pub fn with_policy(policy: WordPolicy) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: CpuState::Running,
            policy,
            io: Channels::new(),
            input: Box::new(NoInput),
            diagnostics: Vec::new(),
            cycles: 0,
            last_instr: None,
        }
    }

    /// Create a machine with the arithmetic of `variant`.
    ///
    /// The interactive fallback is up to the caller: install one with
    /// [`Cpu::with_input_provider`] when [`Variant::prompts_for_input`].
    pub fn for_variant(variant: Variant) -> Self {
        Self::with_policy(variant.policy())
    }

    /// Replace the provider asked when the input queue is empty.
    pub fn with_input_provider(mut self, provider: impl InputProvider + 'static) -> Self {
        self.set_input_provider(provider);
        self
    }

    pub fn set_input_provider(&mut self, provider: impl InputProvider + 'static) {
        self.input = Box::new(provider);
    }

    /// Reset registers, memory, I/O channels and diagnostics.
    ///
    /// The word policy and input provider are kept.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.state = CpuState::Running;
        self.io.clear();
        self.diagnostics.clear();
        self.cycles = 0;
        self.last_instr = None;
    }

    /// Load a program at mailbox 0.
    pub fn load_program(&mut self, program: &[Word]) -> usize {
        self.load_program_at(0, program)
    }

    /// Load values starting at `start`, dropping whatever passes mailbox 99.
    ///
    /// Returns the number of cells written.
    pub fn load_program_at(&mut self, start: usize, program: &[Word]) -> usize {
        let admitted: Vec<Word> = program.iter().map(|&v| self.admit(v)).collect();
        let written = self.mem.load_program(start, &admitted);
        if written < program.len() {
            log::debug!(
                "program truncated: {} of {} values fit from {:02}",
                written, program.len(), start
            );
        }
        written
    }

    /// Queue one input value for INP.
    pub fn add_input(&mut self, value: Word) {
        let value = self.admit(value);
        self.io.push_input(value);
    }

    /// Queue several input values, in order.
    pub fn add_inputs(&mut self, values: &[Word]) {
        for &value in values {
            self.add_input(value);
        }
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or an error.
    pub fn step(&mut self) -> Result<Instruction, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch
        let pc = self.regs.pc;
        let Some(raw) = self.mem.get(pc) else {
            self.state = CpuState::Faulted;
            self.report(Diagnostic::PcOutOfBounds { pc });
            return Err(CpuError::PcOutOfBounds { pc });
        };

        // Advance PC before execute; taken branches overwrite it
        self.regs.advance_pc();

        // Decode
        let instr = decode::decode(raw);
        log::trace!("{:02}: {:03} {:?} acc={}", pc, raw, instr, self.regs.acc);

        // Execute
        self.execute(pc, instr);

        // Update state
        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(instr)
    }

    /// Run until halt or fault.
    ///
    /// Returns the number of instructions executed. A program that never
    /// halts never returns; use [`Cpu::run_limited`] for a bound.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == CpuState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction fetched from `pc`.
    fn execute(&mut self, pc: usize, instr: Instruction) {
        match instr {
            Instruction::Hlt => {
                self.state = CpuState::Halted;
            }

            // ==================== Arithmetic ====================

            Instruction::Add { addr } => {
                let operand = self.mem.read(addr as usize);
                self.regs.acc = self.policy.add(self.regs.acc, operand);
            }

            Instruction::Sub { addr } => {
                let operand = self.mem.read(addr as usize);
                self.regs.acc = self.policy.sub(self.regs.acc, operand);
            }

            // ==================== Data Transfer ====================

            Instruction::Sta { addr } => {
                self.mem.write(addr as usize, self.regs.acc);
            }

            Instruction::Lda { addr } => {
                self.regs.acc = self.mem.read(addr as usize);
            }

            // ==================== Branches ====================

            Instruction::Bra { addr } => {
                self.regs.jump(addr);
            }

            Instruction::Brz { addr } => {
                if self.regs.acc == 0 {
                    self.regs.jump(addr);
                }
            }

            Instruction::Brp { addr } => {
                if self.policy.is_positive(self.regs.acc) {
                    self.regs.jump(addr);
                }
            }

            // ==================== I/O ====================

            Instruction::Inp => match self.next_input() {
                Some(value) => self.regs.acc = value,
                None => self.report(Diagnostic::InputStarved { pc }),
            },

            Instruction::Out => {
                self.io.push_output(self.regs.acc);
            }

            Instruction::Unknown { raw } => {
                self.report(Diagnostic::UnknownInstruction { pc, raw });
            }
        }
    }

    /// Next value for INP: the queue first, then the provider.
    fn next_input(&mut self) -> Option<Word> {
        if let Some(value) = self.io.pop_input() {
            return Some(value);
        }
        let value = self.input.read_input()?;
        Some(self.admit(value))
    }

    /// Clamp an external value into the word range.
    fn admit(&mut self, value: Word) -> Word {
        let clamped = self.policy.clamp(value);
        if clamped != value {
            self.report(Diagnostic::ValueClamped { value, clamped });
        }
        clamped
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_fatal() {
            log::error!("{}", diagnostic);
        } else {
            log::warn!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    // ==================== Accessors ====================

    pub fn accumulator(&self) -> Word {
        self.regs.acc
    }

    pub fn pc(&self) -> usize {
        self.regs.pc
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn policy(&self) -> WordPolicy {
        self.policy
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Snapshot of everything OUT has written.
    pub fn output(&self) -> &[Word] {
        self.io.output()
    }

    /// Input still waiting in the queue.
    pub fn pending_input(&self) -> Vec<Word> {
        self.io.input().collect()
    }

    /// Diagnostics reported since the last reset.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Check if the CPU stopped on an addressing fault.
    pub fn is_faulted(&self) -> bool {
        self.state == CpuState::Faulted
    }

    /// Serializable view of the machine.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            policy: self.policy,
            state: self.state,
            accumulator: self.regs.acc,
            pc: self.regs.pc,
            cycles: self.cycles,
            memory: self.mem.non_zero().collect(),
            input: self.pending_input(),
            output: self.io.output().to_vec(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .field("mem", &self.mem)
            .finish()
    }
}

/// Point-in-time view of a [`Cpu`], for state dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub policy: WordPolicy,
    pub state: CpuState,
    pub accumulator: Word,
    pub pc: usize,
    pub cycles: u64,
    /// Non-zero mailboxes as `(address, value)`.
    pub memory: Vec<(usize, Word)>,
    pub input: Vec<Word>,
    pub output: Vec<Word>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Errors that stop execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("program counter out of bounds: {pc}")]
    PcOutOfBounds { pc: usize },
}
