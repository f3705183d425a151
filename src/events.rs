use crate::menu::item::ItemId;
use crate::menu::pagination::NavDirection;

/// Signals a renderer feeds back into the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    TriggerActivated,
    ItemActivated { depth: usize, item: ItemId },
    NavRequested { depth: usize, direction: NavDirection },
    /// Pointer entered the trigger or the menu area again.
    ViewportReentry,
    ViewportResized,
    ClickOutside,
    Close,
}
