pub mod chunker;
pub mod config;
pub mod tui;
pub mod viewer;
