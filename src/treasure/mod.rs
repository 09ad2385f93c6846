//! Chest interactions: mimics, healing and permanent stat gambles.

#![allow(unused_imports)]

pub mod logic;

pub use logic::*;
