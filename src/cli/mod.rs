pub mod commands;
pub mod render;
pub mod ui;

pub use ui::Output;
