//! Position commands

mod list;

pub use list::ListPositions;
