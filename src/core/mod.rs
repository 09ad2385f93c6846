//! Core plumbing: configuration, randomness, the console seam, tuning
//! constants and the exploration loop.

#![allow(unused_imports)]

pub mod config;
pub mod console;
pub mod constants;
pub mod dice;
pub mod game_loop;

pub use config::*;
pub use console::*;
pub use constants::*;
pub use dice::*;
pub use game_loop::*;
