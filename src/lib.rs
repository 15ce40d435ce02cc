// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Portalwar: a two-player strategy board of linked blocks and portals.
//!
//! This crate provides the board model and combat arithmetic for the game:
//! - A composite board of equally sized blocks with a per-player inversion
//! - Portals that make a distant cell adjacent, and a graph for distance
//!   queries across them
//! - Closed-form army merging and fight resolution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI  /  Scenario files  /  Render │
//! ├─────────────────────────────────────┤
//! │   Move resolution  /  Look-ahead    │
//! ├─────────────────────────────────────┤
//! │   Composite board  /  Portal graph  │
//! ├─────────────────────────────────────┤
//! │   Blocks  /  Items  /  Combat       │
//! └─────────────────────────────────────┘
//! ```

pub mod board;
pub mod combat;
pub mod config;
pub mod error;
pub mod lookahead;
pub mod moves;
pub mod render;
pub mod scenario;

pub use error::{BoardError, BoardResult, CombatError, CombatResult, ScenarioError};

// Re-export key board types at crate root for convenience
pub use board::{
    Army, ArmyKind, Block, BoardItem, Cell, CompositeBoard, Coord, ItemGrid, PlayerType, Portal,
    PortalGraph,
};
pub use combat::ArmyComposition;
pub use config::BoardConfig;
pub use scenario::Scenario;
