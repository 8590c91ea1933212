//! LMC Emulator - CLI Entry Point
//!
//! Commands:
//! - `lmc-emu run <program>` - Run a program file, `sample:NAME` or `-` for stdin
//! - `lmc-emu debug <program>` - Interactive single-step debugger
//! - `lmc-emu disasm <program>` - Disassemble a program
//! - `lmc-emu export <program> -o <file>` - Write a program file
//! - `lmc-emu samples` - List the built-in samples
//! - `lmc-emu selftest` - Run every sample on every variant

use clap::{Args, Parser, Subcommand, ValueEnum};
use lmc::{Cpu, InputProvider, Variant, Word};
use lmc::cpu::{FixedInput, NoInput};
use lmc::program::{self, samples, Sample};
use std::io::Write;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "lmc-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the Little Man Computer")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv per-instruction trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Program file, or `sample:NAME` for a built-in sample
        program: String,
        #[command(flatten)]
        machine: MachineArgs,
        /// Maximum number of cycles to run, 0 for no limit
        #[arg(short, long, default_value = "100000")]
        max_cycles: u64,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
        /// Print the final machine state as JSON
        #[arg(long)]
        json: bool,
        /// Dump mailboxes START-END (either side may be omitted) instead of non-zero cells
        #[arg(long, value_name = "START-END", allow_hyphen_values = true)]
        memory: Option<AddressRange>,
    },
    /// Interactive single-step debugger
    Debug {
        /// Program file, or `sample:NAME` for a built-in sample
        program: String,
        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Disassemble a program
    Disasm {
        /// Program file, or `sample:NAME` for a built-in sample
        program: String,
    },
    /// Write a program (e.g. a sample) as a program file
    Export {
        /// Program file, or `sample:NAME` for a built-in sample
        program: String,
        /// Output program file
        #[arg(short, long)]
        output: String,
    },
    /// List the built-in sample programs
    Samples,
    /// Run every sample on every variant
    Selftest,
}

#[derive(Args)]
struct MachineArgs {
    /// Machine variant: classic, lmc32 or lmc64
    #[arg(long, default_value = "classic")]
    variant: Variant,
    /// Input values, queued in order (replaces a sample's default inputs)
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    input: Vec<Word>,
    /// What INP does when the queue is empty (default depends on variant)
    #[arg(long, value_enum)]
    on_empty_input: Option<EmptyInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmptyInput {
    /// Report and leave the accumulator unchanged
    Warn,
    /// Ask on the terminal
    Prompt,
    /// Read zero
    Zero,
}

/// Inclusive mailbox range for the state dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AddressRange {
    start: usize,
    end: usize,
}

impl FromStr for AddressRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str, default: usize| -> Result<usize, String> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(default);
            }
            match part.parse::<usize>() {
                Ok(addr) if addr < lmc::cpu::MEMORY_SIZE => Ok(addr),
                _ => Err(format!("`{}` is not a mailbox (0-99)", part)),
            }
        };

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse(start, 0)?, parse(end, 99)?),
            None => {
                let addr = parse(s, 0)?;
                (addr, addr)
            }
        };

        if start > end {
            return Err(format!("start {} is after end {}", start, end));
        }
        Ok(Self { start, end })
    }
}

/// Blocking terminal read for a starved INP.
struct StdinPrompt;

impl InputProvider for StdinPrompt {
    fn read_input(&mut self) -> Option<Word> {
        eprint!("INPUT required: ");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().parse().unwrap_or_else(|_| {
                eprintln!("Invalid input, using 0");
                0
            })),
        }
    }
}

/// A program to load: a file's cells or a built-in sample.
enum Source {
    File(Vec<Word>),
    Sample(&'static Sample),
}

fn main() {
    let cli = Cli::parse();
    lmc::logging::init(lmc::logging::level_from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Some(Commands::Run { program, machine, max_cycles, trace, json, memory }) => {
            run_program(&program, &machine, max_cycles, trace, json, memory);
        }
        Some(Commands::Debug { program, machine }) => {
            debug_program(&program, &machine);
        }
        Some(Commands::Disasm { program }) => {
            disassemble_program(&program);
        }
        Some(Commands::Export { program, output }) => {
            export_program(&program, &output);
        }
        Some(Commands::Samples) => {
            list_samples();
        }
        Some(Commands::Selftest) => {
            run_self_test();
        }
        None => {
            println!("LMC Emulator v0.1.0");
            println!("A Little Man Computer emulator");
            println!();
            println!("Use --help for available commands");
            println!();
            list_samples();
        }
    }
}

fn resolve_source(program: &str) -> Source {
    if let Some(name) = program.strip_prefix("sample:") {
        return match samples::find(name) {
            Some(sample) => Source::Sample(sample),
            None => {
                eprintln!("❌ Unknown sample `{}` (see `lmc-emu samples`)", name);
                std::process::exit(1);
            }
        };
    }

    let loaded = if program == "-" {
        eprintln!("Enter one value per line, end with Ctrl-D:");
        program::read_program(std::io::stdin().lock()).map_err(|e| e.to_string())
    } else {
        program::load_program_file(program).map_err(|e| e.to_string())
    };

    match loaded {
        Ok(file) => {
            for skipped in &file.skipped {
                eprintln!("⚠️  Skipped line {}: {}", skipped.line, skipped.text);
            }
            if file.is_empty() {
                eprintln!("❌ No instructions in {}", program);
                std::process::exit(1);
            }
            Source::File(file.cells)
        }
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    }
}

/// What a starved INP does. Prompting needs a line-mode terminal, so it
/// is only honoured when `interactive`.
fn empty_input_fallback(args: &MachineArgs, interactive: bool) -> EmptyInput {
    match args.on_empty_input {
        Some(EmptyInput::Prompt) if !interactive => {
            log::warn!("cannot prompt for input inside the debugger, starved INP will only warn");
            EmptyInput::Warn
        }
        Some(choice) => choice,
        None if interactive && args.variant.prompts_for_input() => EmptyInput::Prompt,
        None => EmptyInput::Warn,
    }
}

/// Build a machine for `args` and load `source` into it.
fn build_machine(source: &Source, args: &MachineArgs, interactive: bool) -> Cpu {
    let fallback = empty_input_fallback(args, interactive);

    let mut cpu = Cpu::for_variant(args.variant);
    match fallback {
        EmptyInput::Warn => cpu.set_input_provider(NoInput),
        EmptyInput::Prompt => cpu.set_input_provider(StdinPrompt),
        EmptyInput::Zero => cpu.set_input_provider(FixedInput(0)),
    }

    match source {
        Source::File(cells) => {
            let written = cpu.load_program(cells);
            if written < cells.len() {
                eprintln!("⚠️  Program truncated to {} of {} cells", written, cells.len());
            }
            cpu.add_inputs(&args.input);
        }
        Source::Sample(sample) if args.input.is_empty() => sample.load_into(&mut cpu),
        Source::Sample(sample) => sample.load_with_inputs(&mut cpu, &args.input),
    }

    cpu
}

fn run_program(
    program: &str,
    args: &MachineArgs,
    max_cycles: u64,
    trace: bool,
    json: bool,
    memory: Option<AddressRange>,
) {
    use lmc::program::disasm::format_instruction;

    let source = resolve_source(program);
    let mut cpu = build_machine(&source, args, true);

    if !json {
        println!("🔧 Running: {} ({})", program, args.variant);
        println!();
        println!("━━━ Execution ━━━");
    }

    let mut cycles = 0u64;
    while cpu.is_running() && (max_cycles == 0 || cycles < max_cycles) {
        let pc = cpu.pc();
        match cpu.step() {
            Ok(instr) => {
                if trace {
                    println!("{:02}: {:<8} ACC={}", pc, format_instruction(&instr), cpu.accumulator());
                }
                cycles += 1;
            }
            Err(e) => {
                eprintln!("❌ CPU error at PC={}: {}", pc, e);
                break;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&cpu.snapshot()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_state(&cpu, memory);
        if cpu.is_running() {
            println!();
            println!("⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.", max_cycles);
        }
    }

    if cpu.is_faulted() {
        std::process::exit(2);
    }
}

fn print_state(cpu: &Cpu, memory: Option<AddressRange>) {
    let join = |values: &[Word]| {
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
    };

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles:      {}", cpu.cycles());
    println!("State:       {:?}", cpu.state());
    println!("Word:        {}", cpu.policy());
    println!("Accumulator: {}", cpu.accumulator());
    println!("PC:          {:02}", cpu.pc());
    println!("Output:      [{}]", join(cpu.output()));

    let pending = cpu.pending_input();
    if !pending.is_empty() {
        println!("Input left:  [{}]", join(&pending));
    }

    if !cpu.diagnostics().is_empty() {
        println!("Diagnostics:");
        for diag in cpu.diagnostics() {
            println!("  {}", diag);
        }
    }

    match memory {
        Some(range) => {
            println!("Memory [{:02}-{:02}]:", range.start, range.end);
            for (addr, value) in cpu.memory().range(range.start, range.end) {
                println!("  [{:02}]: {}", addr, value);
            }
        }
        None => {
            println!("Memory (non-zero):");
            for (addr, value) in cpu.memory().non_zero() {
                println!("  [{:02}]: {}", addr, value);
            }
        }
    }
}

#[cfg(feature = "tui")]
fn debug_program(program: &str, args: &MachineArgs) {
    let source = resolve_source(program);
    let cpu = build_machine(&source, args, false);

    // Diagnostics are shown in the debugger; keep stderr quiet under the alternate screen
    log::set_max_level(log::LevelFilter::Off);

    println!("🚀 Launching debugger...");
    if let Err(e) = lmc::run_debugger(cpu) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_program(_program: &str, _args: &MachineArgs) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}

fn disassemble_program(program: &str) {
    let cells = match resolve_source(program) {
        Source::File(cells) => cells,
        Source::Sample(sample) => sample.cells.to_vec(),
    };

    println!("📖 Disassembling: {}", program);
    println!();
    println!("{}", program::disassemble(&cells));
}

fn export_program(program: &str, output: &str) {
    let cells = match resolve_source(program) {
        Source::File(cells) => cells,
        Source::Sample(sample) => {
            // Bake preset data into the image so the file runs stand-alone
            let mut cpu = Cpu::new();
            sample.load_into(&mut cpu);
            let image = cpu.memory().cells();
            let used = image.iter().rposition(|&v| v != 0).map_or(0, |i| i + 1);
            image[..used].to_vec()
        }
    };

    println!("📝 Exporting: {} → {}", program, output);

    if let Err(e) = program::save_program_file(output, &cells) {
        eprintln!("❌ Failed to save program: {}", e);
        std::process::exit(1);
    }

    println!("✓ Saved {} cells to {}", cells.len(), output);
}

fn list_samples() {
    println!("Sample programs (run with `lmc-emu run sample:NAME`):");
    for sample in samples::SAMPLES {
        let machines: Vec<_> = sample.variants.iter().map(|v| v.name()).collect();
        println!("  {:<14} {} [{}]", sample.name, sample.description, machines.join(", "));
    }
}

fn run_self_test() {
    println!("━━━ LMC Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    for variant in Variant::ALL {
        for sample in samples::SAMPLES.iter().filter(|s| s.supports(variant)) {
            print!("{:<8} {:<14}... ", variant, sample.name);

            let mut cpu = Cpu::for_variant(variant);
            sample.load_into(&mut cpu);
            let result = cpu.run_limited(100_000);

            if result.is_ok() && cpu.is_halted() && cpu.output() == sample.expected {
                println!("✓");
                passed += 1;
            } else {
                println!("✗ (got {:?}, expected {:?})", cpu.output(), sample.expected);
                failed += 1;
            }
        }
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(variant: Variant, on_empty_input: Option<EmptyInput>) -> MachineArgs {
        MachineArgs { variant, input: Vec::new(), on_empty_input }
    }

    #[test]
    fn test_debugger_never_prompts() {
        let args = machine(Variant::Lmc64, Some(EmptyInput::Prompt));
        assert_eq!(empty_input_fallback(&args, false), EmptyInput::Warn);
        assert_eq!(empty_input_fallback(&args, true), EmptyInput::Prompt);

        let args = machine(Variant::Lmc32, None);
        assert_eq!(empty_input_fallback(&args, false), EmptyInput::Warn);
        assert_eq!(empty_input_fallback(&args, true), EmptyInput::Prompt);

        let args = machine(Variant::Classic, Some(EmptyInput::Zero));
        assert_eq!(empty_input_fallback(&args, false), EmptyInput::Zero);
    }

    #[test]
    fn test_address_range_parsing() {
        assert_eq!("10-20".parse(), Ok(AddressRange { start: 10, end: 20 }));
        assert_eq!("-5".parse(), Ok(AddressRange { start: 0, end: 5 }));
        assert_eq!("90-".parse(), Ok(AddressRange { start: 90, end: 99 }));
        assert_eq!("42".parse(), Ok(AddressRange { start: 42, end: 42 }));
        assert!("20-10".parse::<AddressRange>().is_err());
        assert!("0-100".parse::<AddressRange>().is_err());
        assert!("a-b".parse::<AddressRange>().is_err());
    }
}
