//! Monsters and the turn-based battle engine.

#![allow(unused_imports)]

pub mod logic;
pub mod monsters;
pub mod types;

pub use logic::*;
pub use monsters::*;
pub use types::*;
