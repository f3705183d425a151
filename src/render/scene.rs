use super::{EntryKind, LevelFrame, LevelHandle, NavArrows, Renderer, SlotKey};
use crate::events::MenuEvent;
use crate::geometry::{Point, Rect};
use crate::menu::effect::Effect;
use crate::menu::item::{DEFAULT_TAG, ItemId};
use crate::menu::layout::LayoutKind;
use crate::menu::pagination::{NavDirection, PageWindow};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const ITEM_SIZE: f64 = 56.0;
pub const NAV_SIZE: f64 = 40.0;
pub const TRIGGER_RADIUS: f64 = 28.0;
pub const ARROW_SIZE: f64 = 36.0;
pub const ARROW_DX: f64 = 40.0; // arrows sit below the trigger, either side
pub const ARROW_DY: f64 = 60.0;

#[derive(Debug, Clone, Serialize)]
pub struct SceneItem {
    pub key: SlotKey,
    pub kind: EntryKind,
    pub label: String,
    pub tag: String,
    pub classes: Vec<String>,
    /// Markup shown in place of the icon.
    pub content: Option<String>,
    pub icon: Option<String>,
    pub offset: Point,
    pub delay: Option<Duration>,
    pub active: bool,
    pub dimmed: bool,
}

impl SceneItem {
    pub fn size(&self) -> f64 {
        match self.kind {
            EntryKind::Item { .. } => ITEM_SIZE,
            EntryKind::Nav(_) => NAV_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneLevel {
    pub handle: LevelHandle,
    pub depth: usize,
    pub layout: LayoutKind,
    pub effect: Option<Effect>,
    pub window: PageWindow,
    pub items: Vec<SceneItem>,
}

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Trigger,
    Item { depth: usize, id: ItemId },
    Nav { depth: usize, direction: NavDirection },
    Arrow { depth: usize, direction: NavDirection },
}

impl Hit {
    pub fn event(&self) -> MenuEvent {
        match *self {
            Self::Trigger => MenuEvent::TriggerActivated,
            Self::Item { depth, id } => MenuEvent::ItemActivated { depth, item: id },
            Self::Nav { depth, direction } | Self::Arrow { depth, direction } => {
                MenuEvent::NavRequested { depth, direction }
            }
        }
    }
}

/// Headless renderer that keeps the menu as plain data. Items are treated as
/// fixed size squares centered on their offset.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    origin: Point,
    viewport: Rect,
    levels: BTreeMap<usize, SceneLevel>,
    trigger_active: bool,
    trigger_dimmed: bool,
    arrows: Option<NavArrows>,
    #[serde(skip)]
    toggles: Vec<(ItemId, usize, bool)>,
}

impl Scene {
    pub fn new(origin: Point, viewport: Rect) -> Self {
        Self {
            origin,
            viewport,
            levels: BTreeMap::new(),
            trigger_active: false,
            trigger_dimmed: false,
            arrows: None,
            toggles: Vec::new(),
        }
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn levels(&self) -> impl Iterator<Item = &SceneLevel> {
        self.levels.values()
    }

    pub fn level(&self, depth: usize) -> Option<&SceneLevel> {
        self.levels.get(&depth)
    }

    pub fn item(&self, key: SlotKey) -> Option<&SceneItem> {
        self.levels
            .get(&key.depth)?
            .items
            .iter()
            .find(|i| i.key == key)
    }

    fn item_mut(&mut self, key: SlotKey) -> Option<&mut SceneItem> {
        self.levels
            .get_mut(&key.depth)?
            .items
            .iter_mut()
            .find(|i| i.key == key)
    }

    /// Labels of the entries at `depth` in slot order. Nav entries show as `<` and `>`.
    pub fn labels(&self, depth: usize) -> Vec<&str> {
        self.level(depth)
            .map(|l| l.items.iter().map(|i| i.label.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn trigger(&self) -> (bool, bool) {
        (self.trigger_active, self.trigger_dimmed)
    }

    pub fn arrows(&self) -> Option<NavArrows> {
        self.arrows
    }

    /// Submenu notifications received so far, oldest first.
    pub fn toggles(&self) -> &[(ItemId, usize, bool)] {
        &self.toggles
    }

    pub fn screen_position(&self, key: SlotKey) -> Option<Point> {
        self.item(key).map(|i| self.origin.offset_by(i.offset))
    }

    pub fn arrow_center(&self, direction: NavDirection) -> Point {
        match direction {
            NavDirection::Prev => self.origin.translate(-ARROW_DX, ARROW_DY),
            NavDirection::Next => self.origin.translate(ARROW_DX, ARROW_DY),
        }
    }

    /// Finds what lies under `point`, deepest level first.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        for level in self.levels.values().rev() {
            for item in &level.items {
                let rect = Rect::from_center(self.origin.offset_by(item.offset), item.size(), item.size());
                if !rect.contains_point(point) {
                    continue;
                }
                return Some(match item.kind {
                    EntryKind::Item { id, .. } => Hit::Item {
                        depth: level.depth,
                        id,
                    },
                    EntryKind::Nav(direction) => Hit::Nav {
                        depth: level.depth,
                        direction,
                    },
                });
            }
        }

        if let Some(arrows) = self.arrows {
            let shown = [
                (NavDirection::Prev, arrows.has_prev),
                (NavDirection::Next, arrows.has_next),
            ];
            for (direction, _) in shown.into_iter().filter(|(_, on)| *on) {
                let rect = Rect::from_center(self.arrow_center(direction), ARROW_SIZE, ARROW_SIZE);
                if rect.contains_point(point) {
                    return Some(Hit::Arrow {
                        depth: arrows.depth,
                        direction,
                    });
                }
            }
        }

        (self.origin.distance(point) <= TRIGGER_RADIUS).then_some(Hit::Trigger)
    }
}

impl Renderer for Scene {
    fn materialize_level(&mut self, frame: &LevelFrame<'_>) {
        let items = frame
            .entries
            .iter()
            .map(|entry| {
                let spec = frame.spec(entry);
                let label = match entry.kind {
                    EntryKind::Nav(NavDirection::Prev) => "<".to_string(),
                    EntryKind::Nav(NavDirection::Next) => ">".to_string(),
                    EntryKind::Item { .. } => spec
                        .and_then(|s| s.label.clone())
                        .unwrap_or_default(),
                };
                let content = spec.and_then(|s| s.custom_content.clone());
                SceneItem {
                    key: entry.key,
                    kind: entry.kind,
                    label,
                    tag: spec.map_or(DEFAULT_TAG, |s| s.tag_name()).to_string(),
                    classes: spec
                        .map(|s| s.classes().into_iter().map(String::from).collect())
                        .unwrap_or_default(),
                    icon: spec
                        .filter(|_| content.is_none())
                        .and_then(|s| s.icon.clone()),
                    content,
                    offset: entry.position,
                    delay: entry.delay,
                    active: false,
                    dimmed: false,
                }
            })
            .collect();

        self.levels.insert(
            frame.depth,
            SceneLevel {
                handle: frame.handle,
                depth: frame.depth,
                layout: frame.layout,
                effect: frame.effect,
                window: frame.window,
                items,
            },
        );
    }

    fn destroy_level(&mut self, handle: LevelHandle) {
        self.levels.retain(|_, l| l.handle != handle);
    }

    fn set_active(&mut self, key: SlotKey, active: bool) {
        if let Some(item) = self.item_mut(key) {
            item.active = active;
        }
    }

    fn set_dimmed(&mut self, key: SlotKey, dimmed: bool) {
        if let Some(item) = self.item_mut(key) {
            item.dimmed = dimmed;
        }
    }

    fn set_trigger(&mut self, active: bool, dimmed: bool) {
        self.trigger_active = active;
        self.trigger_dimmed = dimmed;
    }

    fn measure(&self, key: SlotKey) -> Option<Rect> {
        let item = self.item(key)?;
        Some(Rect::from_center(
            self.origin.offset_by(item.offset),
            item.size(),
            item.size(),
        ))
    }

    fn apply_offset(&mut self, key: SlotKey, offset: Point) {
        if let Some(item) = self.item_mut(key) {
            item.offset = offset;
        }
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn show_nav_arrows(&mut self, arrows: Option<NavArrows>) {
        self.arrows = arrows;
    }

    fn submenu_toggled(&mut self, item: ItemId, depth: usize, open: bool) {
        self.toggles.push((item, depth, open));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::{MenuItemSpec, MenuTree};
    use crate::render::PlacedEntry;

    fn frame(tree: &MenuTree, depth: usize) -> LevelFrame<'_> {
        let entries = tree
            .roots()
            .iter()
            .enumerate()
            .map(|(slot, &id)| PlacedEntry {
                key: SlotKey { depth, slot },
                kind: EntryKind::Item {
                    id,
                    has_children: false,
                },
                position: Point::new(100.0 * slot as f64, 0.0),
                delay: None,
            })
            .collect();
        LevelFrame {
            handle: LevelHandle::next(),
            depth,
            layout: LayoutKind::HorizontalLine,
            effect: None,
            window: PageWindow::default(),
            entries,
            tree,
        }
    }

    #[test]
    fn test_materialize_and_measure() {
        let tree = MenuTree::new(&[MenuItemSpec::labeled("a"), MenuItemSpec::labeled("b")]);
        let mut scene = Scene::new(Point::new(200.0, 200.0), Rect::new(0.0, 0.0, 800.0, 600.0));
        scene.materialize_level(&frame(&tree, 0));

        assert_eq!(scene.labels(0), vec!["a", "b"]);
        let rect = scene.measure(SlotKey { depth: 0, slot: 1 }).unwrap();
        assert_eq!(rect.center(), Point::new(300.0, 200.0));
        assert_eq!(rect.width, ITEM_SIZE);
        assert!(scene.measure(SlotKey { depth: 1, slot: 0 }).is_none());
    }

    #[test]
    fn test_hit_test_prefers_deeper_levels() {
        let tree = MenuTree::new(&[MenuItemSpec::labeled("a"), MenuItemSpec::labeled("b")]);
        let mut scene = Scene::new(Point::new(200.0, 200.0), Rect::new(0.0, 0.0, 800.0, 600.0));
        scene.materialize_level(&frame(&tree, 0));
        scene.materialize_level(&frame(&tree, 1));

        let hit = scene.hit_test(Point::new(305.0, 195.0));
        assert_eq!(
            hit,
            Some(Hit::Item {
                depth: 1,
                id: tree.roots()[1]
            })
        );
        // slot 0 of both levels overlaps the trigger
        assert!(matches!(
            scene.hit_test(Point::new(200.0, 200.0)),
            Some(Hit::Item { depth: 1, .. })
        ));
        assert_eq!(scene.hit_test(Point::new(700.0, 500.0)), None);
    }

    #[test]
    fn test_trigger_and_arrows() {
        let mut scene = Scene::new(Point::new(400.0, 300.0), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(scene.hit_test(Point::new(410.0, 300.0)), Some(Hit::Trigger));
        assert_eq!(scene.hit_test(Point::new(440.0, 360.0)), None);

        scene.show_nav_arrows(Some(NavArrows {
            depth: 2,
            has_prev: false,
            has_next: true,
        }));
        let hit = scene.hit_test(Point::new(440.0, 360.0)).unwrap();
        assert_eq!(
            hit.event(),
            MenuEvent::NavRequested {
                depth: 2,
                direction: NavDirection::Next
            }
        );
        assert_eq!(scene.hit_test(Point::new(360.0, 360.0)), None);
    }

    #[test]
    fn test_custom_content_replaces_icon() {
        let mut custom = MenuItemSpec::labeled("clock");
        custom.icon = Some("alarm".into());
        custom.custom_content = Some("<b>12:00</b>".into());
        custom.class_name = Some("wide accent".into());
        let mut plain = MenuItemSpec::labeled("files");
        plain.icon = Some("folder".into());

        let tree = MenuTree::new(&[custom, plain]);
        let mut scene = Scene::new(Point::default(), Rect::new(0.0, 0.0, 400.0, 400.0));
        scene.materialize_level(&frame(&tree, 0));

        let level = scene.level(0).unwrap();
        assert_eq!(level.items[0].icon, None);
        assert_eq!(level.items[0].content.as_deref(), Some("<b>12:00</b>"));
        assert_eq!(level.items[0].classes, vec!["wide", "accent"]);
        assert_eq!(level.items[0].tag, DEFAULT_TAG);
        assert_eq!(level.items[1].icon.as_deref(), Some("folder"));
        assert_eq!(level.items[1].content, None);
    }

    #[test]
    fn test_destroy_by_handle() {
        let tree = MenuTree::new(&[MenuItemSpec::labeled("a")]);
        let mut scene = Scene::new(Point::default(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let first = frame(&tree, 0);
        scene.materialize_level(&first);
        let second = frame(&tree, 0);
        scene.materialize_level(&second);

        // the replaced level's handle no longer matches anything
        scene.destroy_level(first.handle);
        assert!(scene.level(0).is_some());
        scene.destroy_level(second.handle);
        assert!(scene.level(0).is_none());
    }
}
