//! This module provides the `ProgramLoader` struct, responsible for loading batches of machine
//! codes from files and strings.
//!
//! A batch holds one machine per line as `[name:] code [symbols]`. Blank lines and lines starting
//! with `#` are skipped. Codes are not decoded here, so one malformed code never prevents the rest
//! of a batch from loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::machine::Machine;
use crate::types::{DecodeError, Symbol, TuringMachineError};

/// One machine of a batch, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineEntry {
    /// Optional label given before a `:`.
    pub name: Option<String>,
    /// The machine code.
    pub code: String,
    /// Alphabet size, when the line gives one.
    pub symbols: Option<usize>,
    /// 1-based line number in the source.
    pub line: usize,
}

impl MachineEntry {
    /// The name if there is one, the code otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }

    /// Decodes the entry, using `default_symbols` when the line gives no alphabet size.
    pub fn decode(&self, default_symbols: usize, all_tape: Symbol) -> Result<Machine, DecodeError> {
        Machine::new(
            &self.code,
            self.symbols.unwrap_or(default_symbols),
            all_tape,
        )
    }
}

/// `ProgramLoader` is a utility struct for loading machine batches.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a batch of machine codes from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<MachineEntry>)` if the file is read and every line is well formed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ValidationError)` if a line cannot be split into its fields.
    pub fn load_file(path: &Path) -> Result<Vec<MachineEntry>, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_str(&content)
    }

    /// Loads a batch of machine codes from string content.
    pub fn load_str(content: &str) -> Result<Vec<MachineEntry>, TuringMachineError> {
        content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                Some(parse_line(line, i + 1))
            })
            .collect()
    }
}

/// Splits a `[name:] code [symbols]` line.
fn parse_line(line: &str, number: usize) -> Result<MachineEntry, TuringMachineError> {
    let (name, rest) = match line.split_once(':') {
        Some((name, rest)) => (Some(name.trim().to_string()), rest.trim()),
        None => (None, line),
    };

    let mut fields = rest.split_whitespace();
    let code = fields.next().ok_or_else(|| {
        TuringMachineError::ValidationError(format!("Line {number}: missing machine code"))
    })?;

    let symbols = fields
        .next()
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                TuringMachineError::ValidationError(format!(
                    "Line {number}: invalid alphabet size {s:?}"
                ))
            })
        })
        .transpose()?;

    if let Some(extra) = fields.next() {
        return Err(TuringMachineError::ValidationError(format!(
            "Line {number}: unexpected field {extra:?}"
        )));
    }

    Ok(MachineEntry {
        name: name.filter(|n| !n.is_empty()),
        code: code.to_string(),
        symbols,
        line: number,
    })
}
