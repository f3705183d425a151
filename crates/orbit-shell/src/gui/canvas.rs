use super::icon;
use gdk_pixbuf::Pixbuf;
use orbit::geometry::{Point, Rect};
use orbit::menu::ItemId;
use orbit::render::{Hit, LevelFrame, LevelHandle, NavArrows, Renderer, Scene, SlotKey};
use std::collections::HashMap;

/// GTK side renderer: the headless scene plus decoded icons and hover state.
/// Drawing happens in `view::draw` from this data.
pub struct Canvas {
    scene: Scene,
    icons: HashMap<String, Option<Pixbuf>>,
    hover: Option<Hit>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(Point::default(), Rect::default()),
            icons: HashMap::new(),
            hover: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn place(&mut self, origin: Point, viewport: Rect) {
        self.scene.set_origin(origin);
        self.scene.set_viewport(viewport);
        self.hover = None;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.scene.set_viewport(viewport);
    }

    pub fn icon(&self, name: &str) -> Option<&Pixbuf> {
        self.icons.get(name)?.as_ref()
    }

    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.scene.hit_test(point)
    }

    pub fn hover(&self) -> Option<Hit> {
        self.hover
    }

    /// Returns whether the hovered target changed.
    pub fn set_hover(&mut self, hit: Option<Hit>) -> bool {
        let changed = self.hover != hit;
        self.hover = hit;
        changed
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for Canvas {
    fn materialize_level(&mut self, frame: &LevelFrame<'_>) {
        for spec in frame.entries.iter().filter_map(|e| frame.spec(e)) {
            if let Some(name) = &spec.icon
                && !self.icons.contains_key(name)
            {
                self.icons.insert(name.clone(), icon::load_icon(name));
            }
        }
        self.scene.materialize_level(frame);
    }

    fn destroy_level(&mut self, handle: LevelHandle) {
        self.scene.destroy_level(handle);
    }

    fn set_active(&mut self, key: SlotKey, active: bool) {
        self.scene.set_active(key, active);
    }

    fn set_dimmed(&mut self, key: SlotKey, dimmed: bool) {
        self.scene.set_dimmed(key, dimmed);
    }

    fn set_trigger(&mut self, active: bool, dimmed: bool) {
        self.scene.set_trigger(active, dimmed);
    }

    fn measure(&self, key: SlotKey) -> Option<Rect> {
        self.scene.measure(key)
    }

    fn apply_offset(&mut self, key: SlotKey, offset: Point) {
        self.scene.apply_offset(key, offset);
    }

    fn viewport(&self) -> Rect {
        self.scene.viewport()
    }

    fn origin(&self) -> Point {
        self.scene.origin()
    }

    fn show_nav_arrows(&mut self, arrows: Option<NavArrows>) {
        self.scene.show_nav_arrows(arrows);
    }

    fn submenu_toggled(&mut self, item: ItemId, depth: usize, open: bool) {
        log::debug!(
            "Submenu of item {} at level {} {}",
            item,
            depth,
            if open { "opened" } else { "closed" }
        );
        // hover points at entries that may be gone now
        self.hover = None;
    }
}
