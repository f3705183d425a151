use crate::geometry::{Point, Rect};
use crate::menu::effect::Effect;
use crate::menu::item::{ItemId, MenuItemSpec, MenuTree};
use crate::menu::layout::LayoutKind;
use crate::menu::pagination::{NavDirection, PageWindow};
use derive_more::{Display, From, Into};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub mod scene;

pub use scene::{Hit, Scene};

/// Identity of one placed entry: its depth and placement slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
#[display("{depth}:{slot}")]
pub struct SlotKey {
    pub depth: usize,
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, From, Into)]
pub struct LevelHandle(u64);

impl LevelHandle {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Item { id: ItemId, has_children: bool },
    Nav(NavDirection),
}

impl EntryKind {
    pub fn item(&self) -> Option<ItemId> {
        match self {
            Self::Item { id, .. } => Some(*id),
            Self::Nav(_) => None,
        }
    }

    pub fn is_item(&self) -> bool {
        self.item().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedEntry {
    pub key: SlotKey,
    pub kind: EntryKind,
    /// Offset from the trigger, in the menu's local frame.
    pub position: Point,
    pub delay: Option<Duration>,
}

/// Everything a renderer needs to draw one level.
#[derive(Debug, Clone)]
pub struct LevelFrame<'a> {
    pub handle: LevelHandle,
    pub depth: usize,
    pub layout: LayoutKind,
    pub effect: Option<Effect>,
    pub window: PageWindow,
    pub entries: Vec<PlacedEntry>,
    pub tree: &'a MenuTree,
}

impl LevelFrame<'_> {
    pub fn spec(&self, entry: &PlacedEntry) -> Option<&MenuItemSpec> {
        entry
            .kind
            .item()
            .and_then(|id| self.tree.get(id))
            .map(|node| &node.spec)
    }
}

/// Overlay navigation used by corner menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavArrows {
    pub depth: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Presentation side of a menu. The engine decides what is shown and where;
/// implementations create the visuals and report measured geometry.
pub trait Renderer {
    /// Creates or replaces the visuals of `frame.depth`.
    fn materialize_level(&mut self, frame: &LevelFrame<'_>);

    fn destroy_level(&mut self, handle: LevelHandle);

    fn set_active(&mut self, key: SlotKey, active: bool);

    fn set_dimmed(&mut self, key: SlotKey, dimmed: bool);

    fn set_trigger(&mut self, active: bool, dimmed: bool);

    /// Screen rectangle of a placed entry, if it is laid out.
    fn measure(&self, key: SlotKey) -> Option<Rect>;

    fn apply_offset(&mut self, key: SlotKey, offset: Point);

    fn viewport(&self) -> Rect;

    /// Screen position of the menu's local origin (the trigger center).
    fn origin(&self) -> Point;

    fn show_nav_arrows(&mut self, arrows: Option<NavArrows>);

    /// Called with `open = true` after a submenu is expanded and with
    /// `open = false` after it is collapsed.
    fn submenu_toggled(&mut self, _item: ItemId, _depth: usize, _open: bool) {}
}
