//! Instruction decoder for the LMC.
//!
//! Instructions are plain decimal numbers. Decoding is layered:
//! 1. Whole-value codes: `000` HLT, `901` INP, `902` OUT
//! 2. Digit-sliced codes: the hundreds digit picks the operation and the
//!    two low digits name a mailbox (`1xx` ADD ... `8xx` BRP)
//! 3. Everything else is [`Instruction::Unknown`]

use crate::word::Word;
use serde::{Serialize, Deserialize};
use std::fmt;

/// Operation selector, without operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Hlt,
    Add,
    Sub,
    Sta,
    Lda,
    Bra,
    Brz,
    Brp,
    Inp,
    Out,
    Unknown,
}

impl Opcode {
    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Sta => "STA",
            Opcode::Lda => "LDA",
            Opcode::Bra => "BRA",
            Opcode::Brz => "BRZ",
            Opcode::Brp => "BRP",
            Opcode::Inp => "INP",
            Opcode::Out => "OUT",
            Opcode::Unknown => "???",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Decoded LMC instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ==================== Control ====================

    /// Halt execution
    Hlt,

    // ==================== Arithmetic ====================

    /// ACC := policy.add(ACC, [addr])
    Add { addr: u8 },

    /// ACC := policy.sub(ACC, [addr])
    Sub { addr: u8 },

    // ==================== Data Transfer ====================

    /// [addr] := ACC (also known as STO)
    Sta { addr: u8 },

    /// ACC := [addr]
    Lda { addr: u8 },

    // ==================== Branches ====================

    /// PC := addr
    Bra { addr: u8 },

    /// if ACC = 0 then PC := addr
    Brz { addr: u8 },

    /// if policy.is_positive(ACC) then PC := addr
    Brp { addr: u8 },

    // ==================== I/O ====================

    /// ACC := next input
    Inp,

    /// Append ACC to the output log
    Out,

    /// A cell value that is not an instruction.
    Unknown { raw: Word },
}

/// Opcode values for decoding.
struct Code;

impl Code {
    // Whole-value codes
    const HLT: Word = 0;
    const INP: Word = 901;
    const OUT: Word = 902;

    // Hundreds digit
    const ADD: Word = 1;
    const SUB: Word = 2;
    const STA: Word = 3;
    const LDA: Word = 5;
    const BRA: Word = 6;
    const BRZ: Word = 7;
    const BRP: Word = 8;
}

impl Instruction {
    /// The operation, without its operand.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Hlt => Opcode::Hlt,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Sta { .. } => Opcode::Sta,
            Instruction::Lda { .. } => Opcode::Lda,
            Instruction::Bra { .. } => Opcode::Bra,
            Instruction::Brz { .. } => Opcode::Brz,
            Instruction::Brp { .. } => Opcode::Brp,
            Instruction::Inp => Opcode::Inp,
            Instruction::Out => Opcode::Out,
            Instruction::Unknown { .. } => Opcode::Unknown,
        }
    }

    /// The mailbox operand, if the instruction has one.
    pub fn operand(&self) -> Option<u8> {
        match *self {
            Instruction::Add { addr }
            | Instruction::Sub { addr }
            | Instruction::Sta { addr }
            | Instruction::Lda { addr }
            | Instruction::Bra { addr }
            | Instruction::Brz { addr }
            | Instruction::Brp { addr } => Some(addr),
            _ => None,
        }
    }

    /// Whether this instruction may replace the program counter.
    pub fn is_branch(&self) -> bool {
        matches!(self.opcode(), Opcode::Bra | Opcode::Brz | Opcode::Brp)
    }
}

/// Decode a raw cell value.
///
/// Never fails: values that are not instructions decode to
/// [`Instruction::Unknown`].
pub fn decode(raw: Word) -> Instruction {
    match raw {
        Code::HLT => return Instruction::Hlt,
        Code::INP => return Instruction::Inp,
        Code::OUT => return Instruction::Out,
        _ => {}
    }

    if !(100..1000).contains(&raw) {
        return Instruction::Unknown { raw };
    }

    let addr = (raw % 100) as u8;
    match raw / 100 {
        Code::ADD => Instruction::Add { addr },
        Code::SUB => Instruction::Sub { addr },
        Code::STA => Instruction::Sta { addr },
        Code::LDA => Instruction::Lda { addr },
        Code::BRA => Instruction::Bra { addr },
        Code::BRZ => Instruction::Brz { addr },
        Code::BRP => Instruction::Brp { addr },
        _ => Instruction::Unknown { raw },
    }
}

/// Encode an instruction back to its cell value.
///
/// Operands above 99 are reduced to their two low digits.
pub fn encode(instr: &Instruction) -> Word {
    let sliced = |code: Word, addr: u8| code * 100 + (addr as Word % 100);
    match *instr {
        Instruction::Hlt => Code::HLT,
        Instruction::Add { addr } => sliced(Code::ADD, addr),
        Instruction::Sub { addr } => sliced(Code::SUB, addr),
        Instruction::Sta { addr } => sliced(Code::STA, addr),
        Instruction::Lda { addr } => sliced(Code::LDA, addr),
        Instruction::Bra { addr } => sliced(Code::BRA, addr),
        Instruction::Brz { addr } => sliced(Code::BRZ, addr),
        Instruction::Brp { addr } => sliced(Code::BRP, addr),
        Instruction::Inp => Code::INP,
        Instruction::Out => Code::OUT,
        Instruction::Unknown { raw } => raw,
    }
}
