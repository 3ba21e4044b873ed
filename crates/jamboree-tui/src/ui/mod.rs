//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `form`: Create/edit form overlay
//! - `styles`: Color schemes and text styling
//! - `tabs`: Tab-specific content rendering (items, leaders, scouts, summary)

pub mod form;
pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
