//! Program file format for LMC programs.
//!
//! A program file is plain text:
//! - One cell value per line, loaded from mailbox 0 upwards
//! - Lines starting with `//` are comments
//! - Blank lines are ignored
//! - Lines that do not parse as an integer are skipped and reported

use crate::word::Word;
use std::path::Path;
use std::io::{BufRead, BufReader, Write};
use thiserror::Error;

/// A line the loader could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// The trimmed text of the line.
    pub text: String,
}

/// A parsed program file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFile {
    /// Cell values in load order.
    pub cells: Vec<Word>,
    /// Malformed lines that were left out.
    pub skipped: Vec<SkippedLine>,
}

impl ProgramFile {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parse program text.
pub fn parse_program(source: &str) -> ProgramFile {
    let mut program = ProgramFile::new();

    for (line_num, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        match trimmed.parse::<Word>() {
            Ok(value) => program.cells.push(value),
            Err(_) => {
                log::warn!("line {}: skipping `{}`, not an integer", line_num + 1, trimmed);
                program.skipped.push(SkippedLine {
                    line: line_num + 1,
                    text: trimmed.to_string(),
                });
            }
        }
    }

    program
}

/// Load a program file from disk.
pub fn load_program_file<P: AsRef<Path>>(path: P) -> Result<ProgramFile, ProgramFileError> {
    let path = path.as_ref();
    let io_err = |e: std::io::Error| ProgramFileError::Io { path: path.display().to_string(), source: e };

    let file = std::fs::File::open(path).map_err(io_err)?;
    let program = read_program(BufReader::new(file)).map_err(io_err)?;

    log::info!("loaded {} cells from {}", program.len(), path.display());
    Ok(program)
}

/// Read program text from any buffered reader, e.g. locked stdin.
pub fn read_program<R: BufRead>(reader: R) -> std::io::Result<ProgramFile> {
    let mut source = String::new();
    for line in reader.lines() {
        source.push_str(&line?);
        source.push('\n');
    }
    Ok(parse_program(&source))
}

/// Save cell values to disk, one per line.
pub fn save_program_file<P: AsRef<Path>>(path: P, cells: &[Word]) -> Result<(), ProgramFileError> {
    let path = path.as_ref();
    let io_err = |e: std::io::Error| ProgramFileError::Io { path: path.display().to_string(), source: e };

    let mut file = std::fs::File::create(path).map_err(io_err)?;
    write_program(&mut file, cells).map_err(io_err)
}

/// Write cell values in program file format.
pub fn write_program<W: Write>(out: &mut W, cells: &[Word]) -> std::io::Result<()> {
    writeln!(out, "// LMC program")?;
    writeln!(out, "// {} cells", cells.len())?;
    writeln!(out)?;

    for value in cells {
        writeln!(out, "{:03}", value)?;
    }

    Ok(())
}

/// Errors that can occur while reading or writing program files.
#[derive(Debug, Error)]
pub enum ProgramFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let source = "// add two numbers\n901\n\n  390  \n// second\n901\n190\n902\n000\n";
        let program = parse_program(source);

        assert_eq!(program.cells, vec![901, 390, 901, 190, 902, 0]);
        assert!(program.skipped.is_empty());
    }

    #[test]
    fn test_parse_reports_malformed_lines() {
        let program = parse_program("505\nLDA 5\n-12\n9x\n");

        assert_eq!(program.cells, vec![505, -12]);
        assert_eq!(
            program.skipped,
            vec![
                SkippedLine { line: 2, text: "LDA 5".into() },
                SkippedLine { line: 4, text: "9x".into() },
            ]
        );
    }

    #[test]
    fn test_written_program_parses_back() {
        let cells = vec![901, 390, 5, -7, 0];
        let mut buf = Vec::new();
        write_program(&mut buf, &cells).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("// LMC program"));
        assert_eq!(parse_program(&text).cells, cells);
    }

    #[test]
    fn test_read_from_reader() {
        let input = std::io::Cursor::new("// typed in\n505\n902\n\n000\n");
        let program = read_program(input).unwrap();

        assert_eq!(program.cells, vec![505, 902, 0]);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("lmc-save-{}.lmc", std::process::id()));
        save_program_file(&path, &[505, 902, 0, 42]).unwrap();

        let program = load_program_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(program.cells, vec![505, 902, 0, 42]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_program_file("/nonexistent/program.lmc").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/program.lmc"));
    }
}
