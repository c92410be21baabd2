//! Flat save record for the RPG, stored as JSON.
//!
//! There is no versioning: a file that does not parse into the current
//! [`SaveRecord`] is rejected as a whole.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Item, Position};

pub const DEFAULT_SAVE_FILE: &str = "savegame.json";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Save file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Save file is malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Saved position ({}, {}) is not a walkable cell", .0.row, .0.col)]
    InvalidPosition(Position),
    #[error("Saved health is zero")]
    DeadPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub position: Position,
    pub health: u32,
    pub inventory: Vec<Item>,
    pub quest_accepted: bool,
    pub goblins_defeated: u32,
}

impl SaveRecord {
    pub fn write_to(&self, path: &Path) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("grid_arcade_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn record_survives_disk() {
        let path = temp_path("record");
        let record = SaveRecord {
            position: Position::new(4, 9),
            health: 62,
            inventory: vec![Item::HealingPotion, Item::GoblinTooth],
            quest_accepted: true,
            goblins_defeated: 1,
        };
        record.write_to(&path).unwrap();
        let loaded = SaveRecord::read_from(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, record);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SaveRecord::read_from(&temp_path("missing")).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
    }

    #[test]
    fn garbage_is_format_error() {
        let path = temp_path("garbage");
        fs::write(&path, "{\"position\": 3}").unwrap();
        let err = SaveRecord::read_from(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, SaveError::Format(_)));
    }
}
