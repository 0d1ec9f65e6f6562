mod app;
mod colors;
mod widgets;

pub use app::{App, ControlEvent, MainTab, UiError};
pub use colors::{ColorLevel, Theme, ThemeMode, ThemeSettings};
