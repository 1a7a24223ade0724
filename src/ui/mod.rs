//! Terminal UI module using ratatui.
//!
//! Stateless renderers over the sync engine's display state:
//!
//! - `render`: frame layout, title, tabs row, status bar
//! - `input`: keyboard event handling
//! - `styles`: color schemes and text styling
//! - `tabs`: per-view content rendering (today, tomorrow, 5-day)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
