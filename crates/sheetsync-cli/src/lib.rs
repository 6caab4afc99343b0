//! Line-oriented console over the sheetsync view.

pub mod command;
pub mod config;
pub mod console;
pub mod render;
