//! Board model.
//!
//! - Coordinates and cell handles
//! - Board items (armies, castles, portals)
//! - Blocks: the rectangular sub-grids of the board
//! - The composite board stitching blocks together through portals
//! - The portal graph answering shortest-path queries

mod block;
mod composite;
mod coord;
mod graph;
mod grid;
mod item;

pub use block::Block;
pub use composite::CompositeBoard;
pub use coord::{Cell, Coord};
pub use graph::PortalGraph;
pub use grid::ItemGrid;
pub use item::{Army, ArmyKind, BoardItem, PlayerType, Portal};
