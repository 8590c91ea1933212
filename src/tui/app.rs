//! Debugger application state and logic.

use crate::{Cpu, Word};
use crate::cpu::MEMORY_SIZE;
use crate::program::disasm::{disassemble_instruction, format_instruction};

/// Debugger application state.
pub struct DebuggerApp {
    /// The machine being debugged.
    pub cpu: Cpu,
    /// Memory image at start, restored on reset.
    image: Vec<Word>,
    /// Input queue at start, restored on reset.
    inputs: Vec<Word>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Memory view scroll offset.
    pub mem_scroll: usize,
}

impl DebuggerApp {
    /// Create a debugger around a loaded machine.
    pub fn new(cpu: Cpu) -> Self {
        let image = cpu.memory().cells().to_vec();
        let inputs = cpu.pending_input();

        Self {
            cpu,
            image,
            inputs,
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            mem_scroll: 0,
        }
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        if !self.cpu.is_running() {
            self.status = format!("CPU stopped: {:?}", self.cpu.state());
            self.running = false;
            return;
        }

        let pc = self.cpu.pc();
        let seen = self.cpu.diagnostics().len();
        match self.cpu.step() {
            Ok(instr) => {
                self.status = format!("PC={:02}: {}", pc, format_instruction(&instr));
                if let Some(diag) = self.cpu.diagnostics().get(seen) {
                    self.status = format!("PC={:02}: {}", pc, diag);
                }
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until halt or fault.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if !self.cpu.is_running() {
            self.running = false;
            self.status = format!("{:?} after {} cycles", self.cpu.state(), self.cpu.cycles());
            return;
        }

        self.step();
    }

    /// Reset the machine and reload the original program and inputs.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.cpu.load_program(&self.image);
        self.cpu.add_inputs(&self.inputs);
        self.running = false;
        self.status = "Reset. Ready.".into();
    }

    /// Scroll the memory view.
    pub fn scroll(&mut self, delta: isize) {
        self.mem_scroll = self
            .mem_scroll
            .saturating_add_signed(delta)
            .min(MEMORY_SIZE - 1);
    }

    /// Get disassembly around current PC.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(usize, String, bool)> {
        let pc = self.cpu.pc();
        let start = pc.saturating_sub(lines / 2).min(MEMORY_SIZE.saturating_sub(lines));

        (start..(start + lines).min(MEMORY_SIZE))
            .map(|addr| {
                let raw = self.cpu.memory().read(addr);
                (addr, disassemble_instruction(raw), addr == pc)
            })
            .collect()
    }
}

/// Run the debugger on a loaded machine.
pub fn run_debugger(cpu: Cpu) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app
    let mut app = DebuggerApp::new(cpu);

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        // Handle input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Up => app.scroll(-1),
                        KeyCode::Down => app.scroll(1),
                        _ => {}
                    }
                }
            }
        }

        // Tick for continuous running
        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::samples;

    fn app_with(sample: &samples::Sample) -> DebuggerApp {
        let mut cpu = Cpu::new();
        sample.load_into(&mut cpu);
        DebuggerApp::new(cpu)
    }

    #[test]
    fn test_step_updates_status() {
        let mut app = app_with(&samples::ADD);
        app.step();

        assert_eq!(app.status, "PC=00: INP");
        assert_eq!(app.cpu.accumulator(), 5);
    }

    #[test]
    fn test_run_to_halt_then_reset() {
        let mut app = app_with(&samples::ADD);
        app.run();
        while app.running {
            app.tick();
        }
        assert_eq!(app.cpu.output(), &[8]);

        app.reset();
        assert!(app.cpu.output().is_empty());
        assert_eq!(app.cpu.pending_input(), vec![5, 3]);
        assert_eq!(app.cpu.memory().read(0), 901);
    }

    #[test]
    fn test_disassembly_window() {
        let app = app_with(&samples::COUNTDOWN);
        let window = app.get_disassembly(5);

        assert_eq!(window.len(), 5);
        assert_eq!(window[0], (0, "LDA 90".to_string(), true));
        assert_eq!(app.get_disassembly(200).len(), MEMORY_SIZE);
    }
}
