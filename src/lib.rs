pub mod config;
pub mod events;
pub mod geometry;
pub mod ipc;
pub mod menu;
pub mod render;

pub use config::Config;
pub use events::MenuEvent;
pub use menu::Menu;
pub use render::{Renderer, Scene};
