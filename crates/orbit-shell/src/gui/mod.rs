pub mod app;
pub mod canvas;
pub mod icon;
pub mod theme;
pub mod view;
pub mod window;
