//! Scenario files: a JSON description of a starting board.
//!
//! ```json
//! {
//!   "config": { "block_cols": 2, "block_rows": 1, "block_width": 3, "block_height": 3 },
//!   "map": ["......", "..P...", "C....c"],
//!   "portals": [ { "at": [3, 2], "dest_block": [2, 1], "dest_position": [1, 2] } ],
//!   "armies": [ { "at": [1, 1], "owner": "first", "spearmen": 10 } ],
//!   "bonus": [ { "at": [5, 1], "archers": 3 } ]
//! }
//! ```
//!
//! Map glyphs: `.` empty, `C`/`c` castle of the first/second player, `P`
//! portal (wired by the `portals` table). All positions are global and 1-based.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Army, BoardItem, CompositeBoard, Coord, ItemGrid, PlayerType, Portal};
use crate::combat::ArmyComposition;
use crate::config::BoardConfig;
use crate::error::ScenarioError;

/// A portal entry keyed by its global position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSpec {
    /// Global position of the `P` glyph.
    pub at: [u16; 2],
    /// Destination block address.
    pub dest_block: [u16; 2],
    /// Destination position inside that block.
    pub dest_position: [u16; 2],
}

/// An army placed on the item layer or the bonus layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmySpec {
    /// Global position.
    pub at: [u16; 2],
    /// Owning player.
    #[serde(default = "first_player")]
    pub owner: PlayerType,
    /// Number of spearmen.
    #[serde(default)]
    pub spearmen: u32,
    /// Number of archers.
    #[serde(default)]
    pub archers: u32,
    /// Number of cavalry.
    #[serde(default)]
    pub cavalry: u32,
    /// Experience multiplier.
    #[serde(default = "base_experience")]
    pub experience: f64,
}

const fn first_player() -> PlayerType {
    PlayerType::First
}

const fn base_experience() -> f64 {
    1.0
}

impl ArmySpec {
    fn composition(&self) -> Result<ArmyComposition, ScenarioError> {
        let composition =
            ArmyComposition::new(self.spearmen, self.archers, self.cavalry, self.experience)
                .map_err(|e| ScenarioError::Layout(format!("army at {:?}: {e}", self.at)))?;
        if composition.is_empty() {
            return Err(ScenarioError::Layout(format!("army at {:?} has no units", self.at)));
        }
        Ok(composition)
    }
}

/// A complete board description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Block grid and block dimensions.
    pub config: BoardConfig,
    /// One string per global row.
    pub map: Vec<String>,
    /// Portal wiring.
    #[serde(default)]
    pub portals: Vec<PortalSpec>,
    /// Field armies.
    #[serde(default)]
    pub armies: Vec<ArmySpec>,
    /// Reinforcements on the bonus layer.
    #[serde(default)]
    pub bonus: Vec<ArmySpec>,
}

impl Scenario {
    /// Parse a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Json`] if the text is not a scenario.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] or [`ScenarioError::Json`].
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the global item and bonus layers.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Layout`] if the map does not match the
    /// configuration or the side tables point at the wrong glyphs.
    pub fn to_grids(&self) -> Result<(ItemGrid, ItemGrid), ScenarioError> {
        self.config.validate()?;
        let width = u16::try_from(self.config.global_width())
            .map_err(|_| ScenarioError::Layout("board too wide".to_string()))?;
        let height = u16::try_from(self.config.global_height())
            .map_err(|_| ScenarioError::Layout("board too tall".to_string()))?;
        if self.map.len() != usize::from(height) {
            return Err(ScenarioError::Layout(format!(
                "expected {height} map rows, got {}",
                self.map.len()
            )));
        }

        let mut portals: HashMap<[u16; 2], &PortalSpec> = HashMap::new();
        for spec in &self.portals {
            if portals.insert(spec.at, spec).is_some() {
                return Err(ScenarioError::Layout(format!(
                    "portal at {:?} is wired twice",
                    spec.at
                )));
            }
        }
        let (Some(mut items), Some(mut bonus)) =
            (ItemGrid::new(width, height), ItemGrid::new(width, height))
        else {
            return Err(ScenarioError::Layout("empty board".to_string()));
        };

        for (row, line) in (1..=height).zip(&self.map) {
            if line.chars().count() != usize::from(width) {
                return Err(ScenarioError::Layout(format!(
                    "row {row} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for (col, glyph) in (1..=width).zip(line.chars()) {
                let item = match glyph {
                    '.' => BoardItem::Empty,
                    'C' => BoardItem::Castle {
                        owner: PlayerType::First,
                    },
                    'c' => BoardItem::Castle {
                        owner: PlayerType::Second,
                    },
                    'P' => {
                        let spec = portals.get(&[col, row]).ok_or_else(|| {
                            ScenarioError::Layout(format!("portal at ({col},{row}) has no wiring"))
                        })?;
                        BoardItem::Portal(Portal::new(
                            self.local_position(col, row),
                            Coord::new(spec.dest_block[0], spec.dest_block[1]),
                            Coord::new(spec.dest_position[0], spec.dest_position[1]),
                        ))
                    }
                    other => {
                        return Err(ScenarioError::Layout(format!(
                            "unknown glyph {other:?} at ({col},{row})"
                        )));
                    }
                };
                items.set(Coord::new(col, row), item)?;
            }
        }

        for spec in &self.portals {
            let at = Coord::new(spec.at[0], spec.at[1]);
            if items.get(at)?.portal().is_none() {
                return Err(ScenarioError::Layout(format!("portal wiring at {at} has no P glyph")));
            }
        }

        for spec in &self.armies {
            let at = Coord::new(spec.at[0], spec.at[1]);
            if !items.get(at)?.is_empty() {
                return Err(ScenarioError::Layout(format!("army at {at} is not on an empty cell")));
            }
            items.set(at, BoardItem::Army(Army::field(spec.owner, spec.composition()?)))?;
        }

        for spec in &self.bonus {
            let at = Coord::new(spec.at[0], spec.at[1]);
            let army = Army::reinforcement(spec.owner, spec.composition()?);
            bonus.set(at, BoardItem::Army(army))?;
        }

        Ok((items, bonus))
    }

    /// Local position of a global cell inside its block.
    fn local_position(&self, col: u16, row: u16) -> Coord {
        Coord::new(
            (col - 1) % self.config.block_width + 1,
            (row - 1) % self.config.block_height + 1,
        )
    }

    /// Build and fill a board from this scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Layout`] or [`ScenarioError::Board`] if the
    /// scenario is inconsistent.
    pub fn build_board(&self) -> Result<CompositeBoard, ScenarioError> {
        let (items, bonus) = self.to_grids()?;
        let mut board = CompositeBoard::new(self.config.block_cols, self.config.block_rows)?;
        board.fill(&items, &bonus)?;
        tracing::debug!(
            portals = self.portals.len(),
            armies = self.armies.len(),
            "scenario loaded"
        );
        Ok(board)
    }
}
