//! End-to-end programs run through the public API.

use lmc::{Cpu, CpuError, CpuState, Diagnostic, Instruction, Variant, WordPolicy};
use lmc::cpu::FixedInput;
use lmc::program::parse_program;

const ADD_TWO: [i64; 6] = [901, 300, 901, 100, 902, 0];

#[test]
fn add_two_numbers_decimal() {
    let mut cpu = Cpu::for_variant(Variant::Classic);
    cpu.load_program(&ADD_TWO);
    cpu.add_inputs(&[5, 3]);

    let executed = cpu.run().unwrap();

    assert_eq!(cpu.output(), &[8]);
    assert_eq!(executed, 6);
    assert!(cpu.is_halted());
}

#[test]
fn decimal_add_wraps_past_999() {
    let mut cpu = Cpu::for_variant(Variant::Classic);
    cpu.load_program(&ADD_TWO);
    cpu.add_inputs(&[700, 600]);
    cpu.run().unwrap();

    assert_eq!(cpu.output(), &[300]);
}

#[test]
fn countdown_program_as_encoded() {
    // LDA 05 loads the BRA cell (600), the first SUB stores 95 into
    // mailbox 0, which then runs as an unknown no-op; the next pass
    // reaches zero and BRZ 00 lands on the HLT left in mailbox 0.
    let mut cpu = Cpu::for_variant(Variant::Classic);
    cpu.load_program(&[505, 902, 200, 300, 700, 600, 0, 5, 1]);

    cpu.run().unwrap();

    assert_eq!(cpu.output(), &[600, 95]);
    assert!(cpu.is_halted());
    assert_eq!(cpu.diagnostics(), &[Diagnostic::UnknownInstruction { pc: 0, raw: 95 }]);
    assert_eq!(cpu.memory().read(0), 0);
}

#[test]
fn unknown_opcode_is_tolerated_on_32_bit() {
    let mut cpu = Cpu::for_variant(Variant::Lmc32);
    cpu.load_program(&[999, 902, 0]);

    assert_eq!(cpu.step(), Ok(Instruction::Unknown { raw: 999 }));
    assert_eq!(cpu.pc(), 1);
    assert_eq!(cpu.accumulator(), 0);
    assert_eq!(cpu.state(), CpuState::Running);
    assert_eq!(cpu.diagnostics(), &[Diagnostic::UnknownInstruction { pc: 0, raw: 999 }]);

    cpu.run().unwrap();
    assert_eq!(cpu.output(), &[0]);
}

#[test]
fn large_add_on_64_bit() {
    let mut cpu = Cpu::for_variant(Variant::Lmc64);
    cpu.load_program(&ADD_TWO);
    cpu.add_inputs(&[5_000_000_000_000_000_000, 2_000_000_000_000_000_000]);

    cpu.run().unwrap();

    assert_eq!(cpu.output(), &[7_000_000_000_000_000_000]);
}

#[test]
fn bounded_add_clamps_instead_of_wrapping() {
    let mut cpu = Cpu::for_variant(Variant::Lmc64);
    cpu.load_program(&ADD_TWO);
    cpu.add_inputs(&[i64::MAX - 1, 10]);
    cpu.run().unwrap();
    assert_eq!(cpu.output(), &[i64::MAX]);

    let mut cpu = Cpu::for_variant(Variant::Lmc32);
    cpu.load_program(&ADD_TWO);
    cpu.add_inputs(&[-2_000_000_000, -2_000_000_000]);
    cpu.run().unwrap();
    assert_eq!(cpu.output(), &[i32::MIN as i64]);
}

#[test]
fn reset_and_reload_gives_identical_output() {
    let program = [590, 902, 291, 390, 800, 0];
    let setup = |cpu: &mut Cpu| {
        cpu.load_program(&program);
        cpu.load_program_at(90, &[3, 1]);
    };

    for variant in Variant::ALL {
        let mut cpu = Cpu::for_variant(variant);
        setup(&mut cpu);
        cpu.run().unwrap();
        let first = cpu.output().to_vec();

        cpu.reset();
        setup(&mut cpu);
        cpu.run().unwrap();

        assert_eq!(first, vec![3, 2, 1, 0], "{}", variant);
        assert_eq!(cpu.output(), first.as_slice(), "{}", variant);
    }
}

#[test]
fn falling_off_memory_faults() {
    let mut cpu = Cpu::new();
    cpu.load_program(&[699]);
    cpu.load_program_at(99, &[902]);

    assert_eq!(cpu.run(), Err(CpuError::PcOutOfBounds { pc: 100 }));
    assert_eq!(cpu.state(), CpuState::Faulted);
    assert_eq!(cpu.output(), &[0]);
    assert_eq!(cpu.diagnostics().last(), Some(&Diagnostic::PcOutOfBounds { pc: 100 }));
}

#[test]
fn starved_input_depends_on_provider() {
    let mut warn = Cpu::for_variant(Variant::Classic);
    warn.load_program(&[901, 902, 0]);
    warn.run().unwrap();
    assert_eq!(warn.output(), &[0]);
    assert_eq!(warn.diagnostics(), &[Diagnostic::InputStarved { pc: 0 }]);

    let mut answers = vec![41, 40];
    let mut prompted = Cpu::for_variant(Variant::Lmc32)
        .with_input_provider(move || answers.pop());
    prompted.load_program(&[901, 902, 901, 902, 901, 902, 0]);
    prompted.add_input(1);
    prompted.run().unwrap();
    assert_eq!(prompted.output(), &[1, 40, 41]);
    assert!(prompted.diagnostics().is_empty());

    let mut zero = Cpu::with_policy(WordPolicy::Bounded64).with_input_provider(FixedInput(0));
    zero.load_program(&[510, 901, 902, 0]);
    zero.load_program_at(10, &[9]);
    zero.run().unwrap();
    assert_eq!(zero.output(), &[0]);
}

#[test]
fn program_text_loads_and_runs() {
    let source = "\
// add two numbers
901
390

901
190
902
oops
000
";
    let file = parse_program(source);
    assert_eq!(file.skipped.len(), 1);

    let mut cpu = Cpu::new();
    cpu.load_program(&file.cells);
    cpu.add_inputs(&[20, 22]);
    cpu.run().unwrap();

    assert_eq!(cpu.output(), &[42]);
}

#[test]
fn oversized_program_is_truncated() {
    let program = vec![0i64; 120];
    let mut cpu = Cpu::new();

    assert_eq!(cpu.load_program(&program), 100);
    assert_eq!(cpu.load_program_at(95, &[1, 2, 3, 4, 5, 6, 7]), 5);
    assert_eq!(cpu.memory().read(99), 5);
}
