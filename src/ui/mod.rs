//! Terminal front end.

#![allow(unused_imports)]

pub mod terminal;

pub use terminal::*;
