//! Floor grids, maze generation and movement.

#![allow(unused_imports)]

pub mod generation;
pub mod logic;
pub mod types;

pub use generation::*;
pub use logic::*;
pub use types::*;
