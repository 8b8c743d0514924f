//! UI layer for the desktop assistant: the eframe app shell and its palette.

pub mod app;
pub mod theme;

pub use app::ChatApp;
