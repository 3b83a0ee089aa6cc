pub mod app;
pub mod components;
pub mod keymap;
pub mod picker;
pub mod popups;
pub mod theme;

pub use app::{Shell, run};
pub use picker::CommandDirectoryPicker;
pub use theme::Theme;
