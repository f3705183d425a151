use super::effect::Effect;
use super::item::{ItemId, MenuTree};
use super::layout::LayoutEngine;
use super::normalize::{LevelConfig, NormalizedLevels, normalize};
use super::pagination::{NavDirection, PageWindow, Paginator};
use super::viewport::Adjustments;
use crate::config::{Config, Direction, MenuType};
use crate::events::MenuEvent;
use crate::geometry::Point;
use crate::render::{
    EntryKind, LevelFrame, LevelHandle, NavArrows, PlacedEntry, Renderer, SlotKey,
};
use derive_more::{Deref, Display};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("orbit-menu-{_0}")]
pub struct MenuId(u64);

impl MenuId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Behaviour flags taken from the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuSettings {
    pub direction: Direction,
    pub menu_type: MenuType,
    pub animations: bool,
    pub level1_effect: Effect,
    pub adjacent_levels_effect: Effect,
    pub auto_adjust_position: bool,
    pub close_on_click_outside: bool,
    pub label_hover: bool,
}

impl MenuSettings {
    pub fn effect_for(&self, depth: usize) -> Option<Effect> {
        self.animations.then_some(if depth == 0 {
            self.level1_effect
        } else {
            self.adjacent_levels_effect
        })
    }
}

impl From<&Config> for MenuSettings {
    fn from(config: &Config) -> Self {
        Self {
            direction: config.open_direction,
            menu_type: config.menu_type,
            animations: config.animations,
            level1_effect: config.level1_effect,
            adjacent_levels_effect: config.adjacent_levels_effect,
            auto_adjust_position: config.auto_adjust_position,
            close_on_click_outside: config.close_on_click_outside,
            label_hover: config.label_hover,
        }
    }
}

/// Depths of the expanded submenus, always `[1, 2, ..., n]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct OpenPath(Vec<usize>);

impl OpenPath {
    fn push(&mut self, depth: usize) {
        debug_assert_eq!(depth, self.0.len() + 1, "open path must stay contiguous");
        self.0.push(depth);
    }

    fn truncate_from(&mut self, depth: usize) {
        self.0.retain(|&d| d < depth);
    }

    pub fn deepest(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedSlot {
    pub key: SlotKey,
    pub kind: EntryKind,
    pub natural: Point,
    pub current: Point,
    pub dimmed: bool,
}

/// What the engine put on screen for one depth.
#[derive(Debug, Clone)]
pub struct RenderedLevel {
    pub handle: LevelHandle,
    pub depth: usize,
    /// Full item list of the level, across all pages.
    pub items: Vec<ItemId>,
    pub anchor: Option<Point>,
    pub config: LevelConfig,
    pub window: PageWindow,
    pub slots: Vec<PlacedSlot>,
    /// Item whose submenu is open at `depth + 1`.
    pub active: Option<ItemId>,
}

impl RenderedLevel {
    pub fn slot_of(&self, item: ItemId) -> Option<&PlacedSlot> {
        self.slots.iter().find(|s| s.kind.item() == Some(item))
    }

    pub fn visible_items(&self) -> Vec<ItemId> {
        self.slots.iter().filter_map(|s| s.kind.item()).collect()
    }

    pub fn page(&self) -> usize {
        self.window.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Viewport correction once the renderer has laid out the level.
    AdjustLevel(LevelHandle),
    RefreshNavArrows,
}

#[derive(Debug, Default)]
pub struct OpenMenu {
    open_path: OpenPath,
    rendered: BTreeMap<usize, RenderedLevel>,
    pages: HashMap<usize, usize>,
    adjustments: Adjustments,
    pending: VecDeque<Deferred>,
    trigger_dimmed: bool,
}

#[derive(Debug, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open(OpenMenu),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuAction {
    pub changed: bool,
    /// Leaf item the user picked.
    pub invoked: Option<ItemId>,
}

impl MenuAction {
    pub fn changed(changed: bool) -> Self {
        Self {
            changed,
            invoked: None,
        }
    }

    pub fn invoked(item: ItemId) -> Self {
        Self {
            changed: false,
            invoked: Some(item),
        }
    }
}

struct Ctx<'a> {
    tree: &'a MenuTree,
    settings: &'a MenuSettings,
    levels: &'a NormalizedLevels,
    engine: &'a LayoutEngine,
}

impl Ctx<'_> {
    fn paginator(&self, config: &LevelConfig) -> Paginator {
        Paginator::new(config.max_visible, self.settings.menu_type.nav_in_slots())
    }
}

impl OpenMenu {
    fn materialize(
        &mut self,
        ctx: &Ctx<'_>,
        depth: usize,
        items: Vec<ItemId>,
        anchor: Option<Point>,
        r: &mut impl Renderer,
    ) {
        if items.is_empty() {
            return;
        }

        let config = ctx.levels.level(depth);
        let paginator = ctx.paginator(&config);
        let total = items.len();
        let page = self
            .pages
            .get(&depth)
            .copied()
            .unwrap_or(0)
            .min(paginator.last_page(total));
        self.pages.insert(depth, page);

        let window = paginator.window(total, page);
        let slot_count = paginator.slot_count();
        let positions = ctx
            .engine
            .positions(config.layout, depth, slot_count, slot_count, anchor);
        let at = |slot: usize| positions.get(slot).copied().unwrap_or_default();

        let nav_in_slots = ctx.settings.menu_type.nav_in_slots();
        let effect = ctx.settings.effect_for(depth);
        let mut entries = Vec::with_capacity(slot_count);
        let mut place = |slot: usize, kind: EntryKind, delay: Option<Duration>| {
            entries.push(PlacedEntry {
                key: SlotKey { depth, slot },
                kind,
                position: at(slot),
                delay,
            });
        };

        let first = usize::from(nav_in_slots && window.has_prev);
        if first == 1 {
            place(0, EntryKind::Nav(NavDirection::Prev), None);
        }
        let visible = &items[window.range()];
        for (i, &id) in visible.iter().enumerate() {
            let has_children = !ctx.tree.children(id).is_empty();
            let delay = effect.map(|e| e.delay(i, visible.len()));
            place(first + i, EntryKind::Item { id, has_children }, delay);
        }
        if nav_in_slots && window.has_next {
            place(slot_count - 1, EntryKind::Nav(NavDirection::Next), None);
        }

        let frame = LevelFrame {
            handle: LevelHandle::next(),
            depth,
            layout: config.layout,
            effect,
            window,
            entries,
            tree: ctx.tree,
        };
        r.materialize_level(&frame);
        log::debug!(
            "Materialized level {} page {} (items {}..{} of {}) as {}",
            depth,
            page,
            window.start,
            window.end,
            total,
            config.layout
        );

        let slots = frame
            .entries
            .iter()
            .map(|e| PlacedSlot {
                key: e.key,
                kind: e.kind,
                natural: e.position,
                current: e.position,
                dimmed: false,
            })
            .collect();
        self.rendered.insert(
            depth,
            RenderedLevel {
                handle: frame.handle,
                depth,
                items,
                anchor,
                config,
                window,
                slots,
                active: None,
            },
        );

        if ctx.settings.auto_adjust_position {
            self.pending.push_back(Deferred::AdjustLevel(frame.handle));
        }
        self.queue_arrow_refresh(ctx);
    }

    fn queue_arrow_refresh(&mut self, ctx: &Ctx<'_>) {
        if ctx.settings.menu_type.is_corner() && !self.pending.contains(&Deferred::RefreshNavArrows)
        {
            self.pending.push_back(Deferred::RefreshNavArrows);
        }
    }

    /// Destroys levels at `depth` and below without touching their page cursors.
    fn remove_levels(&mut self, depth: usize, r: &mut impl Renderer) {
        let removed = self.rendered.split_off(&depth);
        for level in removed.values() {
            r.destroy_level(level.handle);
        }
        self.pending.retain(|task| match task {
            Deferred::AdjustLevel(handle) => removed.values().all(|l| l.handle != *handle),
            Deferred::RefreshNavArrows => true,
        });
        self.adjustments.forget_from(depth);
    }

    fn destroy_from(&mut self, depth: usize, r: &mut impl Renderer) {
        self.remove_levels(depth, r);
        self.pages.retain(|&d, _| d < depth);
        self.open_path.truncate_from(depth);
    }

    /// Closes the branch open under `depth`, if any.
    fn collapse(&mut self, ctx: &Ctx<'_>, depth: usize, r: &mut impl Renderer) {
        if let Some(level) = self.rendered.get_mut(&depth)
            && let Some(active) = level.active.take()
        {
            if let Some(slot) = level.slot_of(active) {
                r.set_active(slot.key, false);
            }
            r.submenu_toggled(active, depth + 1, false);
            log::debug!("Collapsed item {} at level {}", active, depth);
        }
        self.destroy_from(depth + 1, r);
        self.queue_arrow_refresh(ctx);
    }

    fn toggle(
        &mut self,
        ctx: &Ctx<'_>,
        depth: usize,
        item: ItemId,
        r: &mut impl Renderer,
    ) -> bool {
        let Some(level) = self.rendered.get(&depth) else {
            return false;
        };
        if level.slot_of(item).is_none() {
            return false;
        }
        let children = ctx.tree.children(item);
        if children.is_empty() {
            return false;
        }

        if level.active == Some(item) {
            self.collapse(ctx, depth, r);
            self.update_dimming(r);
            return true;
        }

        // one open branch per depth
        self.collapse(ctx, depth, r);

        let Some(level) = self.rendered.get_mut(&depth) else {
            return false;
        };
        let Some(slot) = level.slot_of(item).copied() else {
            return false;
        };
        level.active = Some(item);
        r.set_active(slot.key, true);
        self.open_path.push(depth + 1);
        log::debug!("Expanding item {} into level {}", item, depth + 1);

        self.materialize(ctx, depth + 1, children.to_vec(), Some(slot.current), r);
        self.update_dimming(r);
        r.submenu_toggled(item, depth + 1, true);
        true
    }

    fn navigate(
        &mut self,
        ctx: &Ctx<'_>,
        depth: usize,
        direction: NavDirection,
        r: &mut impl Renderer,
    ) -> bool {
        let Some(level) = self.rendered.get(&depth) else {
            return false;
        };
        let paginator = ctx.paginator(&level.config);
        let total = level.items.len();
        if !paginator.needs_navigation(total) {
            return false;
        }

        let page = paginator.navigate(level.page(), direction, total);
        let items = level.items.clone();
        let anchor = level.anchor;
        log::debug!("Level {} moves {} to page {}", depth, direction, page);

        self.collapse(ctx, depth, r);
        self.remove_levels(depth, r);
        self.pages.insert(depth, page);
        self.materialize(ctx, depth, items, anchor, r);
        self.update_dimming(r);
        true
    }

    fn update_dimming(&mut self, r: &mut impl Renderer) {
        let trigger_dimmed = !self.open_path.is_empty();
        if trigger_dimmed != self.trigger_dimmed {
            self.trigger_dimmed = trigger_dimmed;
            r.set_trigger(true, trigger_dimmed);
        }

        for (depth, level) in self.rendered.iter_mut() {
            let branch_open = self.open_path.contains(&(depth + 1));
            let active = level.active;
            for slot in level.slots.iter_mut() {
                let is_active = active.is_some() && slot.kind.item() == active;
                let dimmed = branch_open && !is_active;
                if slot.dimmed != dimmed {
                    slot.dimmed = dimmed;
                    r.set_dimmed(slot.key, dimmed);
                }
            }
        }
    }

    fn adjust_level(&mut self, handle: LevelHandle, r: &mut impl Renderer) -> bool {
        let Some(level) = self.rendered.values_mut().find(|l| l.handle == handle) else {
            return false;
        };
        let viewport = r.viewport();
        let mut moved = false;
        for slot in level.slots.iter_mut().filter(|s| s.kind.is_item()) {
            let Some(measured) = r.measure(slot.key) else {
                continue;
            };
            if let Some(offset) =
                self.adjustments
                    .adjust(slot.key, slot.natural, slot.current, &measured, &viewport)
            {
                slot.current = offset;
                r.apply_offset(slot.key, offset);
                moved = true;
            }
        }
        moved
    }

    fn restore_positions(&mut self, r: &mut impl Renderer) -> bool {
        let (origin, viewport) = (r.origin(), r.viewport());
        let mut moved = false;
        for level in self.rendered.values_mut() {
            for slot in level.slots.iter_mut() {
                if !self.adjustments.is_adjusted(slot.key) {
                    continue;
                }
                let Some(measured) = r.measure(slot.key) else {
                    continue;
                };
                if let Some(natural) =
                    self.adjustments
                        .restore(slot.key, origin, &measured, &viewport)
                {
                    slot.current = natural;
                    r.apply_offset(slot.key, natural);
                    moved = true;
                }
            }
        }
        moved
    }

    fn refresh_nav_arrows(&mut self, r: &mut impl Renderer) {
        let arrows = self
            .rendered
            .values()
            .rev()
            .find(|l| l.window.needs_navigation())
            .map(|l| NavArrows {
                depth: l.depth,
                has_prev: l.window.has_prev,
                has_next: l.window.has_next,
            });
        r.show_nav_arrows(arrows);
    }
}

/// A radial menu: item tree, per-level settings and the open/closed state.
#[derive(Debug)]
pub struct Menu {
    id: MenuId,
    tree: MenuTree,
    settings: MenuSettings,
    levels: NormalizedLevels,
    engine: LayoutEngine,
    state: MenuState,
}

impl Menu {
    pub fn new(config: &Config) -> Self {
        let tree = MenuTree::new(&config.items);
        let levels = normalize(
            &tree,
            &config.max_visible_items,
            &config.level_layouts,
            config.submenu_layout,
        );
        let settings = MenuSettings::from(config);
        Self {
            id: MenuId::next(),
            engine: LayoutEngine::new(settings.direction, settings.menu_type),
            tree,
            settings,
            levels,
            state: MenuState::Closed,
        }
    }

    fn parts(&mut self) -> Option<(Ctx<'_>, &mut OpenMenu)> {
        let ctx = Ctx {
            tree: &self.tree,
            settings: &self.settings,
            levels: &self.levels,
            engine: &self.engine,
        };
        match &mut self.state {
            MenuState::Open(open) => Some((ctx, open)),
            MenuState::Closed => None,
        }
    }

    fn open_state(&self) -> Option<&OpenMenu> {
        match &self.state {
            MenuState::Open(open) => Some(open),
            MenuState::Closed => None,
        }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    pub fn levels(&self) -> &NormalizedLevels {
        &self.levels
    }

    pub fn is_open(&self) -> bool {
        self.open_state().is_some()
    }

    pub fn open_path(&self) -> &[usize] {
        self.open_state().map_or(&[], |o| o.open_path.as_slice())
    }

    pub fn rendered_level(&self, depth: usize) -> Option<&RenderedLevel> {
        self.open_state()?.rendered.get(&depth)
    }

    pub fn rendered_levels(&self) -> Vec<&RenderedLevel> {
        self.open_state()
            .map(|o| o.rendered.values().collect())
            .unwrap_or_default()
    }

    pub fn page(&self, depth: usize) -> usize {
        self.open_state()
            .and_then(|o| o.pages.get(&depth).copied())
            .unwrap_or(0)
    }

    pub fn adjustments(&self) -> Option<&Adjustments> {
        self.open_state().map(|o| &o.adjustments)
    }

    pub fn has_pending(&self) -> bool {
        self.open_state().is_some_and(|o| !o.pending.is_empty())
    }

    pub fn open(&mut self, r: &mut impl Renderer) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = MenuState::Open(OpenMenu::default());
        r.set_trigger(true, false);
        log::debug!("Opening {}", self.id);

        let roots = self.tree.roots().to_vec();
        if let Some((ctx, open)) = self.parts() {
            open.materialize(&ctx, 0, roots, None, r);
        }
        true
    }

    pub fn close(&mut self, r: &mut impl Renderer) -> bool {
        let MenuState::Open(open) = std::mem::take(&mut self.state) else {
            return false;
        };
        for level in open.rendered.values() {
            r.destroy_level(level.handle);
        }
        if self.settings.menu_type.is_corner() {
            r.show_nav_arrows(None);
        }
        r.set_trigger(false, false);
        log::debug!(
            "Closed {} ({} deferred tasks dropped)",
            self.id,
            open.pending.len()
        );
        true
    }

    pub fn toggle_open(&mut self, r: &mut impl Renderer) -> bool {
        if self.is_open() {
            self.close(r)
        } else {
            self.open(r)
        }
    }

    /// Expands or collapses the submenu of `item`, placed at `depth`.
    pub fn toggle(&mut self, depth: usize, item: ItemId, r: &mut impl Renderer) -> bool {
        self.parts()
            .is_some_and(|(ctx, open)| open.toggle(&ctx, depth, item, r))
    }

    /// Branch items toggle their submenu, leaves are reported back as invoked.
    pub fn activate_item(&mut self, depth: usize, item: ItemId, r: &mut impl Renderer) -> MenuAction {
        let Some((ctx, open)) = self.parts() else {
            return MenuAction::default();
        };
        let placed = open
            .rendered
            .get(&depth)
            .is_some_and(|l| l.slot_of(item).is_some());
        if !placed {
            return MenuAction::default();
        }
        if ctx.tree.children(item).is_empty() {
            log::info!("Invoked item {} at level {}", item, depth);
            return MenuAction::invoked(item);
        }
        MenuAction::changed(open.toggle(&ctx, depth, item, r))
    }

    pub fn navigate(
        &mut self,
        depth: usize,
        direction: NavDirection,
        r: &mut impl Renderer,
    ) -> bool {
        self.parts()
            .is_some_and(|(ctx, open)| open.navigate(&ctx, depth, direction, r))
    }

    /// Moves adjusted items back to their natural offset where they fit again.
    pub fn viewport_reentry(&mut self, r: &mut impl Renderer) -> bool {
        if !self.settings.auto_adjust_position {
            return false;
        }
        self.parts()
            .is_some_and(|(_, open)| open.restore_positions(r))
    }

    pub fn viewport_resized(&mut self, r: &mut impl Renderer) -> bool {
        if !self.settings.auto_adjust_position {
            return false;
        }
        let Some((_, open)) = self.parts() else {
            return false;
        };
        let restored = open.restore_positions(r);
        let handles: Vec<LevelHandle> = open.rendered.values().map(|l| l.handle).collect();
        let adjusted = handles
            .into_iter()
            .fold(false, |moved, h| open.adjust_level(h, r) || moved);
        restored || adjusted
    }

    /// Runs work queued until the renderer committed its layout. Tasks for
    /// levels that are gone are skipped.
    pub fn run_deferred(&mut self, r: &mut impl Renderer) -> bool {
        let Some((_, open)) = self.parts() else {
            return false;
        };
        let mut moved = false;
        while let Some(task) = open.pending.pop_front() {
            match task {
                Deferred::AdjustLevel(handle) => moved |= open.adjust_level(handle, r),
                Deferred::RefreshNavArrows => open.refresh_nav_arrows(r),
            }
        }
        moved
    }

    /// Rebuilds the menu from a new config, reopening it if it was open.
    pub fn reconfigure(&mut self, config: &Config, r: &mut impl Renderer) {
        let was_open = self.close(r);
        let id = self.id;
        *self = Self { id, ..Self::new(config) };
        if was_open {
            self.open(r);
        }
    }

    pub fn handle(&mut self, event: MenuEvent, r: &mut impl Renderer) -> MenuAction {
        match event {
            MenuEvent::TriggerActivated => MenuAction::changed(self.toggle_open(r)),
            MenuEvent::ItemActivated { depth, item } => self.activate_item(depth, item, r),
            MenuEvent::NavRequested { depth, direction } => {
                MenuAction::changed(self.navigate(depth, direction, r))
            }
            MenuEvent::ViewportReentry => MenuAction::changed(self.viewport_reentry(r)),
            MenuEvent::ViewportResized => MenuAction::changed(self.viewport_resized(r)),
            MenuEvent::ClickOutside if self.settings.close_on_click_outside => {
                MenuAction::changed(self.close(r))
            }
            MenuEvent::ClickOutside => MenuAction::default(),
            MenuEvent::Close => MenuAction::changed(self.close(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::menu::item::MenuItemSpec;
    use crate::menu::layout::LayoutKind;
    use crate::menu::viewport::VIEWPORT_MARGIN;
    use crate::render::Scene;

    fn leaves(prefix: &str, count: usize) -> Vec<MenuItemSpec> {
        (0..count)
            .map(|i| MenuItemSpec::labeled(format!("{prefix}{i}")))
            .collect()
    }

    fn sample() -> Vec<MenuItemSpec> {
        vec![
            MenuItemSpec::labeled("A").with_children(vec![
                MenuItemSpec::labeled("a0").with_children(leaves("x", 2)),
                MenuItemSpec::labeled("a1"),
            ]),
            MenuItemSpec::labeled("B").with_children(leaves("b", 1)),
            MenuItemSpec::labeled("C"),
        ]
    }

    fn config(items: Vec<MenuItemSpec>) -> Config {
        Config {
            items,
            ..Config::default()
        }
    }

    fn scene() -> Scene {
        Scene::new(Point::new(400.0, 300.0), Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    fn root(menu: &Menu, index: usize) -> ItemId {
        menu.tree().roots()[index]
    }

    #[test]
    fn test_open_and_close() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        assert!(menu.open(&mut scene));
        assert!(!menu.open(&mut scene));

        assert!(menu.is_open());
        assert!(menu.open_path().is_empty());
        assert_eq!(scene.labels(0), vec!["A", "B", "C"]);
        assert_eq!(scene.trigger(), (true, false));
        assert!(scene.level(0).unwrap().effect.is_some());

        assert!(menu.close(&mut scene));
        assert!(!menu.close(&mut scene));
        assert!(menu.rendered_levels().is_empty());
        assert_eq!(scene.levels().count(), 0);
        assert_eq!(scene.trigger(), (false, false));
    }

    #[test]
    fn test_sibling_expand_keeps_one_branch() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        menu.open(&mut scene);
        let (a, b) = (root(&menu, 0), root(&menu, 1));

        assert!(menu.toggle(0, a, &mut scene));
        assert_eq!(menu.open_path(), &[1]);
        assert_eq!(scene.labels(1), vec!["a0", "a1"]);
        let anchor_a = menu.rendered_level(0).unwrap().slot_of(a).unwrap().current;
        assert_eq!(menu.rendered_level(1).unwrap().anchor, Some(anchor_a));

        assert!(menu.toggle(0, b, &mut scene));
        assert_eq!(menu.open_path(), &[1]);
        assert_eq!(scene.labels(1), vec!["b0"]);
        let level = menu.rendered_level(0).unwrap();
        assert_eq!(level.active, Some(b));
        assert_eq!(
            menu.rendered_level(1).unwrap().anchor,
            Some(level.slot_of(b).unwrap().current)
        );

        let active: Vec<_> = scene.level(0).unwrap().items.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "B");
        assert_eq!(scene.toggles(), &[(a, 1, true), (a, 1, false), (b, 1, true)]);
    }

    #[test]
    fn test_collapse_truncates_open_path() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        menu.open(&mut scene);
        let a = root(&menu, 0);
        let a0 = menu.tree().children(a)[0];

        menu.toggle(0, a, &mut scene);
        menu.toggle(1, a0, &mut scene);
        assert_eq!(menu.open_path(), &[1, 2]);
        assert_eq!(scene.labels(2), vec!["x0", "x1"]);

        assert!(menu.toggle(1, a0, &mut scene));
        assert_eq!(menu.open_path(), &[1]);
        assert!(scene.level(2).is_none());

        menu.toggle(1, a0, &mut scene);
        assert!(menu.toggle(0, a, &mut scene));
        assert!(menu.open_path().iter().all(|&d| d < 1));
        assert_eq!(menu.rendered_levels().len(), 1);
        assert_eq!(scene.levels().count(), 1);
    }

    #[test]
    fn test_close_from_any_open_path() {
        for depth in 0..3 {
            let mut menu = Menu::new(&config(sample()));
            let mut scene = scene();
            menu.open(&mut scene);
            let a = root(&menu, 0);
            if depth > 0 {
                menu.toggle(0, a, &mut scene);
            }
            if depth > 1 {
                menu.toggle(1, menu.tree().children(a)[0], &mut scene);
            }
            assert_eq!(menu.open_path().len(), depth);

            menu.handle(MenuEvent::Close, &mut scene);
            assert!(menu.open_path().is_empty());
            assert!(menu.rendered_levels().is_empty());
            assert_eq!(scene.levels().count(), 0);
        }
    }

    #[test]
    fn test_invalid_toggles_are_ignored() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        let a = root(&menu, 0);
        assert!(!menu.toggle(0, a, &mut scene));

        menu.open(&mut scene);
        let c = root(&menu, 2);
        let a0 = menu.tree().children(a)[0];
        assert!(!menu.toggle(0, c, &mut scene));
        // not placed at that depth
        assert!(!menu.toggle(0, a0, &mut scene));
        assert!(!menu.toggle(4, a, &mut scene));
        assert!(menu.open_path().is_empty());
    }

    #[test]
    fn test_leaf_activation_is_reported() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        menu.open(&mut scene);
        let (a, c) = (root(&menu, 0), root(&menu, 2));

        let action = menu.handle(MenuEvent::ItemActivated { depth: 0, item: c }, &mut scene);
        assert_eq!(action, MenuAction::invoked(c));
        assert!(menu.open_path().is_empty());

        let action = menu.handle(MenuEvent::ItemActivated { depth: 0, item: a }, &mut scene);
        assert_eq!(action, MenuAction::changed(true));
        assert_eq!(menu.open_path(), &[1]);
    }

    #[test]
    fn test_dimming_follows_open_branch() {
        let mut menu = Menu::new(&config(sample()));
        let mut scene = scene();
        menu.open(&mut scene);
        let a = root(&menu, 0);

        menu.toggle(0, a, &mut scene);
        assert_eq!(scene.trigger(), (true, true));
        let dimmed: Vec<&str> = scene
            .level(0)
            .unwrap()
            .items
            .iter()
            .filter(|i| i.dimmed)
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(dimmed, vec!["B", "C"]);
        assert!(scene.level(1).unwrap().items.iter().all(|i| !i.dimmed));

        menu.toggle(0, a, &mut scene);
        assert_eq!(scene.trigger(), (true, false));
        assert!(scene.level(0).unwrap().items.iter().all(|i| !i.dimmed && !i.active));
    }

    #[test]
    fn test_twelve_root_items_page_through() {
        let mut menu = Menu::new(&Config {
            max_visible_items: vec![5],
            ..config(leaves("i", 12))
        });
        let mut scene = scene();
        menu.open(&mut scene);
        assert_eq!(scene.labels(0), vec!["i0", "i1", "i2", "i3", ">"]);

        assert!(menu.navigate(0, NavDirection::Next, &mut scene));
        assert_eq!(menu.page(0), 1);
        assert_eq!(scene.labels(0), vec!["<", "i4", "i5", "i6", ">"]);

        menu.navigate(0, NavDirection::Next, &mut scene);
        menu.navigate(0, NavDirection::Next, &mut scene);
        assert_eq!(scene.labels(0), vec!["<", "i10", "i11"]);
        assert_eq!(scene.level(0).unwrap().items.len(), 3);

        let event = MenuEvent::NavRequested {
            depth: 0,
            direction: NavDirection::Next,
        };
        menu.handle(event, &mut scene);
        assert_eq!(menu.page(0), 0);
        menu.navigate(0, NavDirection::Prev, &mut scene);
        assert_eq!(menu.page(0), 3);
    }

    #[test]
    fn test_navigate_collapses_deeper_levels() {
        let mut items = sample();
        items.extend(leaves("i", 6));
        let mut menu = Menu::new(&config(items));
        let mut scene = scene();
        menu.open(&mut scene);
        let a = root(&menu, 0);

        menu.toggle(0, a, &mut scene);
        assert!(menu.navigate(0, NavDirection::Next, &mut scene));
        assert!(menu.open_path().is_empty());
        assert!(scene.level(1).is_none());
        assert_eq!(scene.toggles().last(), Some(&(a, 1, false)));
        assert_eq!(scene.trigger(), (true, false));

        // a level that fits on one page has nowhere to go
        let mut small = Menu::new(&config(sample()));
        small.open(&mut scene);
        assert!(!small.navigate(0, NavDirection::Next, &mut scene));
    }

    #[test]
    fn test_anchored_submenu_layout() {
        let mut menu = Menu::new(&Config {
            level_layouts: vec![LayoutKind::FullCircle, LayoutKind::SideArc],
            ..config(sample())
        });
        let mut scene = scene();
        menu.open(&mut scene);
        let a = root(&menu, 0);
        menu.toggle(0, a, &mut scene);

        let level = menu.rendered_level(1).unwrap();
        assert_eq!(level.config.layout, LayoutKind::SideArc);
        let anchor = level.anchor.unwrap();
        for slot in &level.slots {
            let distance = slot.natural.distance(anchor);
            assert!((distance - crate::menu::layout::SIDE_ARC_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn test_adjust_and_restore_positions() {
        let mut menu = Menu::new(&Config {
            auto_adjust_position: true,
            ..config(sample())
        });
        let mut scene = Scene::new(Point::new(760.0, 300.0), Rect::new(0.0, 0.0, 800.0, 600.0));
        menu.open(&mut scene);
        assert!(menu.has_pending());
        assert!(menu.adjustments().unwrap().is_empty());

        assert!(menu.run_deferred(&mut scene));
        assert!(!menu.has_pending());
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0).shrink(VIEWPORT_MARGIN - 1e-6);
        for slot in &menu.rendered_level(0).unwrap().slots {
            assert!(bounds.contains(&scene.measure(slot.key).unwrap()));
        }
        let adjusted = menu.adjustments().unwrap().adjusted_keys();
        assert!(!adjusted.is_empty());

        scene.set_origin(Point::new(300.0, 300.0));
        assert!(menu.handle(MenuEvent::ViewportReentry, &mut scene).changed);
        assert!(menu.adjustments().unwrap().adjusted_keys().is_empty());
        for slot in &menu.rendered_level(0).unwrap().slots {
            assert_eq!(slot.current, slot.natural);
            assert_eq!(scene.item(slot.key).unwrap().offset, slot.natural);
        }
    }

    #[test]
    fn test_resize_moves_items_back_inside() {
        let mut menu = Menu::new(&Config {
            auto_adjust_position: true,
            ..config(sample())
        });
        let mut scene = scene();
        menu.open(&mut scene);
        assert!(!menu.run_deferred(&mut scene));

        scene.set_viewport(Rect::new(0.0, 0.0, 500.0, 600.0));
        assert!(menu.viewport_resized(&mut scene));
        assert!(!menu.adjustments().unwrap().is_empty());

        scene.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(menu.viewport_resized(&mut scene));
        assert!(menu.adjustments().unwrap().adjusted_keys().is_empty());
    }

    #[test]
    fn test_deferred_work_dropped_with_levels() {
        let mut menu = Menu::new(&Config {
            auto_adjust_position: true,
            ..config(sample())
        });
        let mut scene = scene();
        menu.open(&mut scene);
        menu.run_deferred(&mut scene);

        let a = root(&menu, 0);
        menu.toggle(0, a, &mut scene);
        assert!(menu.has_pending());
        menu.toggle(0, a, &mut scene);
        assert!(!menu.has_pending());

        menu.toggle(0, a, &mut scene);
        menu.close(&mut scene);
        assert!(!menu.has_pending());
        assert!(!menu.run_deferred(&mut scene));
    }

    #[test]
    fn test_corner_menu_uses_overlay_arrows() {
        let mut menu = Menu::new(&Config {
            menu_type: MenuType::Corner,
            max_visible_items: vec![5],
            ..config(leaves("i", 12))
        });
        let mut scene = scene();
        menu.open(&mut scene);
        assert_eq!(scene.labels(0), vec!["i0", "i1", "i2", "i3", "i4"]);
        assert_eq!(scene.arrows(), None);

        menu.run_deferred(&mut scene);
        let arrows = scene.arrows().unwrap();
        assert_eq!((arrows.depth, arrows.has_prev, arrows.has_next), (0, false, true));

        let hit = scene.hit_test(Point::new(440.0, 360.0)).unwrap();
        menu.handle(hit.event(), &mut scene);
        menu.run_deferred(&mut scene);
        assert_eq!(scene.labels(0), vec!["i5", "i6", "i7", "i8", "i9"]);
        assert!(scene.arrows().unwrap().has_prev);

        menu.close(&mut scene);
        assert_eq!(scene.arrows(), None);
    }

    #[test]
    fn test_click_outside_honors_setting() {
        let mut scene = scene();
        let mut menu = Menu::new(&config(sample()));
        menu.open(&mut scene);
        assert!(!menu.handle(MenuEvent::ClickOutside, &mut scene).changed);
        assert!(menu.is_open());

        let mut menu = Menu::new(&Config {
            close_on_click_outside: true,
            ..config(sample())
        });
        menu.open(&mut scene);
        assert!(menu.handle(MenuEvent::ClickOutside, &mut scene).changed);
        assert!(!menu.is_open());
    }

    #[test]
    fn test_reconfigure_reopens() {
        let mut menu = Menu::new(&config(sample()));
        let id = menu.id();
        let mut scene = scene();
        menu.open(&mut scene);
        menu.toggle(0, root(&menu, 0), &mut scene);

        menu.reconfigure(&config(leaves("n", 2)), &mut scene);
        assert_eq!(menu.id(), id);
        assert!(menu.is_open());
        assert!(menu.open_path().is_empty());
        assert_eq!(scene.labels(0), vec!["n0", "n1"]);
        assert!(scene.level(1).is_none());
    }

    #[test]
    fn test_effects_follow_depth() {
        let mut menu = Menu::new(&Config {
            level1_effect: crate::menu::effect::Effect::Wave,
            adjacent_levels_effect: crate::menu::effect::Effect::Bounce,
            ..config(sample())
        });
        let mut scene = scene();
        menu.open(&mut scene);
        menu.toggle(0, root(&menu, 0), &mut scene);
        assert_eq!(scene.level(0).unwrap().effect, Some(Effect::Wave));
        assert_eq!(scene.level(1).unwrap().effect, Some(Effect::Bounce));

        let mut still = Menu::new(&Config {
            animations: false,
            ..config(sample())
        });
        still.open(&mut scene);
        assert!(scene.level(0).unwrap().items.iter().all(|i| i.delay.is_none()));
    }
}
