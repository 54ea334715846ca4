use crate::loader::{MachineEntry, ProgramLoader};
use crate::machine::Machine;
use crate::types::{TuringMachineError, DEFAULT_ALL_TAPE};

use tracing::warn;

// Embedded catalog of known machines
const KNOWN_MACHINES_TEXT: &str = include_str!("../machines/known.txt");

/// Alphabet size assumed for catalog entries that do not give one.
const CATALOG_SYMBOLS: usize = 2;

lazy_static::lazy_static! {
    pub static ref KNOWN_MACHINES: Vec<MachineEntry> = load_catalog();
}

fn load_catalog() -> Vec<MachineEntry> {
    ProgramLoader::load_str(KNOWN_MACHINES_TEXT).unwrap_or_else(|e| {
        warn!("failed to load the known machine catalog: {e}");
        Vec::new()
    })
}

pub struct KnownMachines;

impl KnownMachines {
    /// Get the number of known machines
    pub fn count() -> usize {
        KNOWN_MACHINES.len()
    }

    /// List all machine names
    pub fn names() -> Vec<&'static str> {
        KNOWN_MACHINES.iter().map(|entry| entry.label()).collect()
    }

    /// Get a catalog entry by its name
    pub fn get(name: &str) -> Result<&'static MachineEntry, TuringMachineError> {
        KNOWN_MACHINES
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine '{}' not found", name))
            })
    }

    /// Decode a known machine by its name
    pub fn decode(name: &str) -> Result<Machine, TuringMachineError> {
        let entry = Self::get(name)?;
        Ok(entry.decode(CATALOG_SYMBOLS, DEFAULT_ALL_TAPE)?)
    }

    /// Search for machines by name
    pub fn search(query: &str) -> Vec<&'static str> {
        let query = query.to_lowercase();
        Self::names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Limit, Limits, RunResult};
    use std::time::Duration;

    #[test]
    fn test_catalog_loads() {
        assert!(KnownMachines::count() >= 9);
        assert!(KnownMachines::names().contains(&"bb2"));
    }

    #[test]
    fn test_every_catalog_entry_decodes() {
        for name in KnownMachines::names() {
            assert!(KnownMachines::decode(name).is_ok(), "{name} failed to decode");
        }
    }

    #[test]
    fn test_unknown_machine() {
        assert!(matches!(
            KnownMachines::get("bb9"),
            Err(TuringMachineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_search() {
        let found = KnownMachines::search("CYCLER");
        assert_eq!(found, vec!["translated-cycler", "cycler"]);
    }

    #[test]
    fn test_known_outcomes() {
        let limits = Limits::new(10_000, Some(Duration::from_secs(60))).with_steps(100_000);

        let bb4 = KnownMachines::decode("bb4").unwrap();
        assert_eq!(
            bb4.run(&limits),
            RunResult::Halted {
                score: 13,
                steps: 107
            }
        );

        let bb3 = KnownMachines::decode("bb3").unwrap();
        assert_eq!(
            bb3.run(&limits),
            RunResult::Halted { score: 6, steps: 14 }
        );

        let cycler = KnownMachines::decode("translated-cycler").unwrap();
        assert_eq!(
            cycler.run(&limits),
            RunResult::ResourceLimitExceeded(Limit::Space)
        );
    }
}
