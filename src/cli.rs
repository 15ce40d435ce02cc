//! CLI command implementations for Portalwar.

pub(crate) mod distance;
pub(crate) mod evaluate;
pub(crate) mod fight;
pub(crate) mod show;

mod output;

use clap::ValueEnum;
use portalwar::board::{Coord, PlayerType};
use portalwar::combat::ArmyComposition;
use portalwar::error::{BoardError, CombatError, ScenarioError};
use portalwar::{CompositeBoard, Scenario};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output format for `show` and `evaluate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Player selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlayerArg {
    /// The player whose castles are upper case.
    First,
    /// The player whose castles are lower case.
    Second,
}

impl From<PlayerArg> for PlayerType {
    fn from(arg: PlayerArg) -> Self {
        match arg {
            PlayerArg::First => Self::First,
            PlayerArg::Second => Self::Second,
        }
    }
}

/// A coordinate written as `X,Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoordArg(pub(crate) Coord);

impl FromStr for CoordArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(s, 2)?;
        let parse = |field: &str| {
            field
                .parse::<u16>()
                .map_err(|e| format!("invalid coordinate {field:?}: {e}"))
        };
        Ok(Self(Coord::new(parse(fields[0])?, parse(fields[1])?)))
    }
}

/// An army written as `SPEARMEN,ARCHERS,CAVALRY,EXPERIENCE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ArmyArg(pub(crate) ArmyComposition);

impl FromStr for ArmyArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = split_fields(s, 4)?;
        let count = |field: &str| {
            field
                .parse::<u32>()
                .map_err(|e| format!("invalid unit count {field:?}: {e}"))
        };
        let experience = fields[3]
            .parse::<f64>()
            .map_err(|e| format!("invalid experience {:?}: {e}", fields[3]))?;
        ArmyComposition::new(count(fields[0])?, count(fields[1])?, count(fields[2])?, experience)
            .map(Self)
            .map_err(|e| e.to_string())
    }
}

/// Split a comma-separated argument into exactly `n` trimmed fields.
fn split_fields(s: &str, n: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    if fields.len() == n {
        Ok(fields)
    } else {
        Err(format!("expected {n} comma-separated values, got {s:?}"))
    }
}

/// Load a scenario file and build its board.
fn load_board(path: &Path) -> Result<CompositeBoard, CliError> {
    Scenario::load(path)
        .and_then(|scenario| scenario.build_board())
        .map_err(|e| CliError::new(format!("{}: {e}", path.display())))
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<BoardError> for CliError {
    fn from(e: BoardError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<CombatError> for CliError {
    fn from(e: CombatError) -> Self {
        Self::new(e.to_string())
    }
}
