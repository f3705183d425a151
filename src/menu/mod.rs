pub mod effect;
pub mod item;
pub mod layout;
pub mod normalize;
pub mod pagination;
pub mod state;
pub mod viewport;

pub use effect::Effect;
pub use item::{ItemId, MenuItemSpec, MenuTree};
pub use layout::{LayoutEngine, LayoutKind};
pub use normalize::{LevelConfig, NormalizedLevels, normalize};
pub use pagination::{NavDirection, PageWindow, Paginator};
pub use state::{Menu, MenuAction, MenuId, MenuSettings, RenderedLevel};
pub use viewport::Adjustments;

pub const DEFAULT_MAX_VISIBLE: usize = 5; // slots per level when unconfigured
