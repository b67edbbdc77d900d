pub mod app_theme;
mod screen_view;

pub use screen_view::{render_screen, ScreenViewMessage};
