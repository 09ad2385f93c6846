//! Mazecrawl - turn-based terminal dungeon crawler library
//!
//! This module exposes the game logic for testing and external use.

pub mod character;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod treasure;
pub mod ui;
pub mod utils;
