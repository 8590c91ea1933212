//! Disassembler for LMC programs.
//!
//! Renders cell values as mnemonics for listings, traces and the
//! debugger view. Cells that are not instructions are shown as `DAT`.

use crate::word::Word;
use crate::cpu::decode::{decode, Instruction};

/// Disassemble a single cell value to text.
pub fn disassemble_instruction(raw: Word) -> String {
    format_instruction(&decode(raw))
}

/// Disassemble a slice of cells, one line per mailbox.
pub fn disassemble(cells: &[Word]) -> String {
    let mut output = String::new();
    output.push_str("// LMC Disassembly\n");
    output.push_str("// ---------------\n\n");

    for (addr, &raw) in cells.iter().enumerate() {
        let line = disassemble_instruction(raw);
        output.push_str(&format!("{:02}: {:<8} // {:03}\n", addr, line, raw));
    }

    output
}

/// Format a decoded instruction as assembly text.
pub fn format_instruction(instr: &Instruction) -> String {
    match instr {
        Instruction::Hlt | Instruction::Inp | Instruction::Out => instr.opcode().to_string(),
        Instruction::Unknown { raw } => format!("DAT {}", raw),
        _ => match instr.operand() {
            Some(addr) => format!("{} {:02}", instr.opcode(), addr),
            None => instr.opcode().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_instruction() {
        assert_eq!(disassemble_instruction(0), "HLT");
        assert_eq!(disassemble_instruction(901), "INP");
        assert_eq!(disassemble_instruction(902), "OUT");
        assert_eq!(disassemble_instruction(505), "LDA 05");
        assert_eq!(disassemble_instruction(390), "STA 90");
        assert_eq!(disassemble_instruction(817), "BRP 17");
        assert_eq!(disassemble_instruction(95), "DAT 95");
        assert_eq!(disassemble_instruction(-4), "DAT -4");
    }

    #[test]
    fn test_disassemble_listing() {
        let listing = disassemble(&[901, 902, 0]);
        let lines: Vec<_> = listing.lines().skip(3).collect();

        assert_eq!(lines, vec![
            "00: INP      // 901",
            "01: OUT      // 902",
            "02: HLT      // 000",
        ]);
    }
}
