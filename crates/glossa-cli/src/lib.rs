// Library interface for glossa-cli so integration tests can reach the UI pieces.

pub mod app;
pub mod commands;
pub mod input;
pub mod theme;

pub use commands::{handle_command, CommandResult};
pub use input::{InputBuffer, InputHistory};
pub use theme::Theme;
