//! Game snapshots and the save file.
//!
//! The snapshot is a flat JSON record: floor number, player attributes and
//! the grid as one string per row. Skills are stored by name and looked up
//! in the catalog on load; names the catalog no longer has are dropped.

use super::player::Player;
use super::skills::skill_by_name;
use crate::dungeon::{Grid, GridError, Tile};
use crate::utils::persistence::{data_path, write_json};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SAVE_FILENAME: &str = "save.json";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("save file is not a valid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("saved grid is invalid: {0}")]
    Grid(#[from] GridError),

    #[error("saved {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

fn default_position() -> usize {
    1
}

/// The player's attributes as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default = "default_position")]
    pub row: usize,
    #[serde(default = "default_position")]
    pub col: usize,
    pub hp: i32,
    pub hp_max: i32,
    pub sp: i32,
    pub sp_max: i32,
    pub atk_min: i32,
    pub atk_max: i32,
    pub level: u32,
    pub exp: u32,
    #[serde(default)]
    pub potions: u32,
    #[serde(default)]
    pub sp_potions: u32,
    #[serde(default)]
    pub crit_chance: f64,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Player {
    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            row: self.row,
            col: self.col,
            hp: self.hp,
            hp_max: self.hp_max,
            sp: self.sp,
            sp_max: self.sp_max,
            atk_min: self.atk_min,
            atk_max: self.atk_max,
            level: self.level,
            exp: self.exp,
            potions: self.potions,
            sp_potions: self.sp_potions,
            crit_chance: self.crit_chance,
            skills: self.skills.iter().map(|s| s.name.to_string()).collect(),
        }
    }

    /// Rebuilds a player; skill names missing from the catalog are skipped.
    pub fn from_record(record: &PlayerRecord) -> Player {
        let skills = record
            .skills
            .iter()
            .filter_map(|name| {
                let skill = skill_by_name(name);
                if skill.is_none() {
                    debug!("dropping unknown skill {:?} from save", name);
                }
                skill
            })
            .collect();

        Player {
            row: record.row,
            col: record.col,
            hp: record.hp,
            hp_max: record.hp_max,
            sp: record.sp,
            sp_max: record.sp_max,
            atk_min: record.atk_min,
            atk_max: record.atk_max,
            level: record.level,
            exp: record.exp,
            potions: record.potions,
            sp_potions: record.sp_potions,
            crit_chance: record.crit_chance,
            skills,
            ..Player::default()
        }
    }
}

/// Everything needed to resume a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub floor: u32,
    pub player: PlayerRecord,
    pub grid: Vec<String>,
    /// Unix timestamp of the save
    #[serde(default)]
    pub saved_at: i64,
}

impl GameSnapshot {
    pub fn capture(player: &Player, floor: u32, grid: &Grid) -> Self {
        Self {
            floor,
            player: player.to_record(),
            grid: grid.to_rows(),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Validates the snapshot and rebuilds `(player, floor, grid)`.
    pub fn restore(&self) -> Result<(Player, u32, Grid), SaveError> {
        if self.floor == 0 {
            return Err(invalid("floor", "must be at least 1"));
        }
        let grid = Grid::from_rows(self.grid.as_slice())?;
        let exits = grid.count(Tile::Exit);
        if exits != 1 {
            return Err(invalid("grid", format!("has {} exits, expected 1", exits)));
        }

        let p = &self.player;
        if p.hp_max <= 0 {
            return Err(invalid("hp_max", format!("{} is not positive", p.hp_max)));
        }
        if p.sp_max <= 0 {
            return Err(invalid("sp_max", format!("{} is not positive", p.sp_max)));
        }
        if p.hp > p.hp_max {
            return Err(invalid("hp", format!("{} exceeds hp_max {}", p.hp, p.hp_max)));
        }
        if p.sp > p.sp_max {
            return Err(invalid("sp", format!("{} exceeds sp_max {}", p.sp, p.sp_max)));
        }
        if !(0.0..=1.0).contains(&p.crit_chance) {
            return Err(invalid(
                "crit_chance",
                format!("{} is outside [0, 1]", p.crit_chance),
            ));
        }
        if p.level == 0 {
            return Err(invalid("level", "must be at least 1"));
        }
        if p.atk_max <= p.atk_min {
            return Err(invalid(
                "atk_max",
                format!("{} is not above atk_min {}", p.atk_max, p.atk_min),
            ));
        }
        if !grid.get((p.row, p.col)).is_some_and(|t| t.is_walkable()) {
            return Err(invalid(
                "position",
                format!("({}, {}) is not a walkable tile", p.row, p.col),
            ));
        }

        Ok((Player::from_record(p), self.floor, grid))
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SaveError {
    SaveError::InvalidField {
        field,
        reason: reason.into(),
    }
}

/// Reads and writes the single save slot.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Save slot in the game data directory, or in the working directory
    /// when the data directory is unavailable.
    pub fn new() -> Self {
        Self::or_local(data_path(SAVE_FILENAME))
    }

    /// Uses `path` if it resolved, else a `save.json` in the working directory.
    pub fn or_local(path: io::Result<PathBuf>) -> Self {
        match path {
            Ok(save_path) => Self { save_path },
            Err(e) => {
                warn!("no data directory ({}), saving to ./{}", e, SAVE_FILENAME);
                Self::at(SAVE_FILENAME)
            }
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    pub fn exists(&self) -> bool {
        self.save_path.exists()
    }

    pub fn save(&self, snapshot: &GameSnapshot) -> Result<(), SaveError> {
        write_json(&self.save_path, snapshot)?;
        info!("game saved to {}", self.save_path.display());
        Ok(())
    }

    /// Loads and validates the save.
    pub fn load(&self) -> Result<(Player, u32, Grid), SaveError> {
        let json = fs::read_to_string(&self.save_path)?;
        GameSnapshot::from_json(&json)?.restore()
    }

    /// Removes the save; a missing file is not an error.
    pub fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.save_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Default for SaveManager {
    fn default() -> Self {
        Self::new()
    }
}
