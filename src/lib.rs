pub mod config;
pub mod error;
pub mod exit;
pub mod keybinding;
pub mod pane;
pub mod platform;
pub mod session;
pub mod terminal;
pub mod zoom;

pub use error::Error;
