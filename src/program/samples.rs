//! Built-in sample programs.
//!
//! Each sample comes with its preset data mailboxes, a default input
//! queue and the output it must produce on every variant it supports.
//! The large-value demos only fit the wider machines.

use crate::cpu::{Cpu, Variant};
use crate::word::Word;

/// A ready-to-run program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Short name used on the command line.
    pub name: &'static str,
    pub description: &'static str,
    /// Cells loaded from mailbox 0.
    pub cells: &'static [Word],
    /// Preset data as `(address, value)`.
    pub data: &'static [(usize, Word)],
    /// Default input queue.
    pub inputs: &'static [Word],
    /// Output for the default inputs.
    pub expected: &'static [Word],
    /// Machines whose word can hold the sample's values.
    pub variants: &'static [Variant],
}

impl Sample {
    /// Whether this sample runs as intended on `variant`.
    pub fn supports(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    /// Reset `cpu` and load this sample with its default inputs.
    pub fn load_into(&self, cpu: &mut Cpu) {
        self.load_with_inputs(cpu, self.inputs);
    }

    /// Reset `cpu` and load this sample with `inputs` queued.
    pub fn load_with_inputs(&self, cpu: &mut Cpu, inputs: &[Word]) {
        cpu.reset();
        cpu.load_program(self.cells);
        for &(addr, value) in self.data {
            cpu.load_program_at(addr, &[value]);
        }
        cpu.add_inputs(inputs);
    }
}

pub const ADD: Sample = Sample {
    name: "add",
    description: "Add two input numbers",
    cells: &[
        901, // 00: INP
        390, // 01: STA 90
        901, // 02: INP
        190, // 03: ADD 90
        902, // 04: OUT
        0,   // 05: HLT
    ],
    data: &[],
    inputs: &[5, 3],
    expected: &[8],
    variants: &Variant::ALL,
};

pub const COUNTDOWN: Sample = Sample {
    name: "countdown",
    description: "Count down from 10 to 0",
    cells: &[
        590, // 00: LDA 90
        902, // 01: OUT
        291, // 02: SUB 91
        390, // 03: STA 90
        800, // 04: BRP 00
        0,   // 05: HLT
    ],
    data: &[(90, 10), (91, 1)],
    inputs: &[],
    expected: &[10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
    variants: &Variant::ALL,
};

pub const MAX_OF_THREE: Sample = Sample {
    name: "max3",
    description: "Output the largest of three inputs",
    cells: &[
        901, // 00: INP
        390, // 01: STA 90      max := a
        901, // 02: INP
        391, // 03: STA 91
        590, // 04: LDA 90
        291, // 05: SUB 91
        809, // 06: BRP 09      max >= b
        591, // 07: LDA 91
        390, // 08: STA 90      max := b
        901, // 09: INP
        391, // 10: STA 91
        590, // 11: LDA 90
        291, // 12: SUB 91
        816, // 13: BRP 16      max >= c
        591, // 14: LDA 91
        390, // 15: STA 90      max := c
        590, // 16: LDA 90
        902, // 17: OUT
        0,   // 18: HLT
    ],
    data: &[],
    inputs: &[12, 47, 30],
    expected: &[47],
    variants: &Variant::ALL,
};

pub const MULTIPLY: Sample = Sample {
    name: "multiply",
    description: "Multiply two inputs by repeated addition (multiplier must be >= 0)",
    cells: &[
        901, // 00: INP
        390, // 01: STA 90      multiplicand
        901, // 02: INP
        391, // 03: STA 91      multiplier
        594, // 04: LDA 94
        392, // 05: STA 92      result := 0
        591, // 06: LDA 91
        715, // 07: BRZ 15
        592, // 08: LDA 92
        190, // 09: ADD 90
        392, // 10: STA 92
        591, // 11: LDA 91
        295, // 12: SUB 95
        391, // 13: STA 91
        606, // 14: BRA 06
        592, // 15: LDA 92
        902, // 16: OUT
        0,   // 17: HLT
    ],
    data: &[(94, 0), (95, 1)],
    inputs: &[6, 7],
    expected: &[42],
    variants: &Variant::ALL,
};

pub const FACTORIAL: Sample = Sample {
    name: "factorial",
    description: "Factorial of the input (input must be >= 0)",
    cells: &[
        901, // 00: INP
        390, // 01: STA 90      counter := n
        595, // 02: LDA 95
        391, // 03: STA 91      result := 1
        590, // 04: LDA 90
        724, // 05: BRZ 24
        393, // 06: STA 93      times := counter
        594, // 07: LDA 94
        392, // 08: STA 92      product := 0
        593, // 09: LDA 93
        718, // 10: BRZ 18
        592, // 11: LDA 92
        191, // 12: ADD 91
        392, // 13: STA 92      product += result
        593, // 14: LDA 93
        295, // 15: SUB 95
        393, // 16: STA 93
        609, // 17: BRA 09
        592, // 18: LDA 92
        391, // 19: STA 91      result := product
        590, // 20: LDA 90
        295, // 21: SUB 95
        390, // 22: STA 90
        604, // 23: BRA 04
        591, // 24: LDA 91
        902, // 25: OUT
        0,   // 26: HLT
    ],
    data: &[(94, 0), (95, 1)],
    inputs: &[5],
    expected: &[120],
    variants: &Variant::ALL,
};

pub const FIBONACCI: Sample = Sample {
    name: "fibonacci",
    description: "Output the first N Fibonacci numbers (N must be >= 0)",
    cells: &[
        901, // 00: INP
        390, // 01: STA 90      remaining := n
        594, // 02: LDA 94
        391, // 03: STA 91      a := 0
        595, // 04: LDA 95
        392, // 05: STA 92      b := 1
        590, // 06: LDA 90
        720, // 07: BRZ 20
        591, // 08: LDA 91
        902, // 09: OUT
        192, // 10: ADD 92
        393, // 11: STA 93      t := a + b
        592, // 12: LDA 92
        391, // 13: STA 91      a := b
        593, // 14: LDA 93
        392, // 15: STA 92      b := t
        590, // 16: LDA 90
        295, // 17: SUB 95
        390, // 18: STA 90
        606, // 19: BRA 06
        0,   // 20: HLT
    ],
    data: &[(94, 0), (95, 1)],
    inputs: &[15],
    expected: &[0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377],
    variants: &Variant::ALL,
};

pub const COUNTDOWN_BILLION: Sample = Sample {
    name: "countdown-big",
    description: "Count down from one billion in steps of 100 million",
    cells: COUNTDOWN.cells,
    data: &[(90, 1_000_000_000), (91, 100_000_000)],
    inputs: &[],
    expected: &[
        1_000_000_000, 900_000_000, 800_000_000, 700_000_000, 600_000_000, 500_000_000,
        400_000_000, 300_000_000, 200_000_000, 100_000_000, 0,
    ],
    variants: &[Variant::Lmc32, Variant::Lmc64],
};

pub const MAX_OF_THREE_BIG: Sample = Sample {
    name: "max3-big",
    description: "Largest of three 64-bit inputs",
    cells: MAX_OF_THREE.cells,
    data: &[],
    inputs: &[9_223_372_036_854_775_000, 5_000_000_000_000_000_000, 7_777_777_777_777_777_777],
    expected: &[9_223_372_036_854_775_000],
    variants: &[Variant::Lmc64],
};

pub const MULTIPLY_BIG: Sample = Sample {
    name: "multiply-big",
    description: "One billion times 5000 by repeated addition",
    cells: MULTIPLY.cells,
    data: MULTIPLY.data,
    inputs: &[1_000_000_000, 5_000],
    expected: &[5_000_000_000_000],
    variants: &[Variant::Lmc64],
};

/// Every built-in sample.
pub const SAMPLES: &[Sample] = &[
    ADD,
    COUNTDOWN,
    MAX_OF_THREE,
    MULTIPLY,
    FACTORIAL,
    FIBONACCI,
    COUNTDOWN_BILLION,
    MAX_OF_THREE_BIG,
    MULTIPLY_BIG,
];

/// Look up a sample by name.
pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_produce_expected_output() {
        for variant in Variant::ALL {
            for sample in SAMPLES.iter().filter(|s| s.supports(variant)) {
                let mut cpu = Cpu::for_variant(variant);
                sample.load_into(&mut cpu);

                cpu.run_limited(100_000).unwrap();

                assert!(cpu.is_halted(), "{} on {}", sample.name, variant);
                assert_eq!(cpu.output(), sample.expected, "{} on {}", sample.name, variant);
                assert!(cpu.diagnostics().is_empty(), "{} on {}", sample.name, variant);
            }
        }
    }

    #[test]
    fn test_max_of_three_orders() {
        for inputs in [[9, 2, 4], [2, 9, 4], [2, 4, 9], [7, 7, 7]] {
            let mut cpu = Cpu::for_variant(Variant::Lmc32);
            MAX_OF_THREE.load_with_inputs(&mut cpu, &inputs);
            cpu.run().unwrap();
            assert_eq!(cpu.output(), &[*inputs.iter().max().unwrap()]);
        }
    }

    #[test]
    fn test_factorial_inputs() {
        for (n, expected) in [(0, 1), (1, 1), (3, 6), (6, 720)] {
            let mut cpu = Cpu::for_variant(Variant::Lmc32);
            FACTORIAL.load_with_inputs(&mut cpu, &[n]);
            cpu.run().unwrap();
            assert_eq!(cpu.output(), &[expected], "{}!", n);
        }

        let mut cpu = Cpu::for_variant(Variant::Lmc64);
        FACTORIAL.load_with_inputs(&mut cpu, &[20]);
        cpu.run().unwrap();
        assert_eq!(cpu.output(), &[2_432_902_008_176_640_000]);
    }

    #[test]
    fn test_fibonacci_counts() {
        let mut cpu = Cpu::new();
        FIBONACCI.load_with_inputs(&mut cpu, &[0]);
        cpu.run().unwrap();
        assert!(cpu.output().is_empty());

        FIBONACCI.load_with_inputs(&mut cpu, &[1]);
        cpu.run().unwrap();
        assert_eq!(cpu.output(), &[0]);

        let mut cpu = Cpu::for_variant(Variant::Lmc64);
        FIBONACCI.load_with_inputs(&mut cpu, &[60]);
        cpu.run().unwrap();
        assert_eq!(cpu.output().len(), 60);
        assert_eq!(cpu.output().last(), Some(&956_722_026_041));
    }

    #[test]
    fn test_big_samples_need_a_wide_word() {
        assert!(!COUNTDOWN_BILLION.supports(Variant::Classic));
        assert!(COUNTDOWN_BILLION.supports(Variant::Lmc32));
        assert!(!MULTIPLY_BIG.supports(Variant::Lmc32));

        // 32-bit saturates long before 5e12
        let mut cpu = Cpu::for_variant(Variant::Lmc32);
        MULTIPLY_BIG.load_into(&mut cpu);
        cpu.run().unwrap();
        assert_eq!(cpu.output(), &[i32::MAX as Word]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("Countdown"), Some(&COUNTDOWN));
        assert_eq!(find("factorial"), Some(&FACTORIAL));
        assert!(find("sqrt").is_none());
    }
}
