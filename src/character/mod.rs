//! Player stats, skills, and persistence.

#![allow(unused_imports)]

pub mod player;
pub mod save;
pub mod skills;

pub use player::*;
pub use save::*;
pub use skills::*;
