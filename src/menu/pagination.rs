use super::DEFAULT_MAX_VISIBLE;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum::{Display as StrumDisplay, EnumString};

/// Upper bound on replayed pages, guards against malformed capacities.
pub const MAX_PAGES: usize = 1000;
/// Smallest capacity that can hold prev, next and one item at once.
pub const MIN_NAV_CAPACITY: usize = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Prev,
    Next,
}

impl NavDirection {
    pub fn from_step(step: i32) -> Option<Self> {
        match step.signum() {
            1 => Some(Self::Next),
            -1 => Some(Self::Prev),
            _ => None,
        }
    }
}

/// What one level shows for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageWindow {
    pub page: usize,
    pub start: usize,
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// Slots left for items once navigation controls are placed.
    pub item_slots: usize,
}

impl PageWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn needs_navigation(&self) -> bool {
        self.has_prev || self.has_next
    }
}

/// Splits an item list into pages of `capacity` slots.
///
/// Prev/next controls share the slot budget with items unless `nav_in_slots`
/// is false, in which case they live outside the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    capacity: usize,
    nav_in_slots: bool,
}

impl Paginator {
    pub fn new(capacity: usize, nav_in_slots: bool) -> Self {
        Self {
            capacity,
            nav_in_slots,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of placement slots the layout has to provide.
    pub fn slot_count(&self) -> usize {
        if self.capacity == 0 {
            DEFAULT_MAX_VISIBLE
        } else {
            self.capacity
        }
    }

    /// A capacity that cannot make progress once navigation is involved.
    fn is_malformed(&self, total: usize) -> bool {
        self.capacity == 0
            || (self.nav_in_slots && total > self.capacity && self.capacity < MIN_NAV_CAPACITY)
    }

    pub fn needs_navigation(&self, total: usize) -> bool {
        total > self.capacity && !self.is_malformed(total)
    }

    pub fn has_next(&self, total: usize, page: usize, shown_before: usize) -> bool {
        if total == 0 || !self.needs_navigation(total) {
            return false;
        }

        let mut available = self.capacity;
        if self.nav_in_slots {
            if page > 0 {
                available -= 1;
            }
            // reserving a next slot shrinks what fits, so check against what is left
            if total.saturating_sub(shown_before) > available {
                available -= 1;
            }
        }
        shown_before + available < total
    }

    fn item_slots(&self, has_prev: bool, has_next: bool) -> usize {
        if !self.nav_in_slots {
            return self.capacity;
        }
        self.capacity - usize::from(has_prev) - usize::from(has_next)
    }

    /// Items shown on pages `0..page`.
    pub fn shown_before(&self, total: usize, page: usize) -> usize {
        if !self.needs_navigation(total) {
            return 0;
        }
        (0..page.min(MAX_PAGES)).fold(0, |shown, p| {
            let has_next = self.has_next(total, p, shown);
            shown + self.item_slots(p > 0, has_next)
        })
    }

    pub fn window(&self, total: usize, page: usize) -> PageWindow {
        if !self.needs_navigation(total) {
            if self.is_malformed(total) {
                log::warn!(
                    "Capacity {} cannot paginate {} items, navigation disabled",
                    self.capacity,
                    total
                );
            }
            let item_slots = self.slot_count();
            return PageWindow {
                page: 0,
                start: 0,
                end: total.min(item_slots),
                has_prev: false,
                has_next: false,
                item_slots,
            };
        }

        let start = self.shown_before(total, page).min(total);
        let has_prev = page > 0;
        let has_next = self.has_next(total, page, start);
        let item_slots = self.item_slots(has_prev, has_next);
        PageWindow {
            page,
            start,
            end: (start + item_slots).min(total),
            has_prev,
            has_next,
            item_slots,
        }
    }

    pub fn last_page(&self, total: usize) -> usize {
        if !self.needs_navigation(total) {
            return 0;
        }

        let mut shown = 0;
        for page in 0..MAX_PAGES {
            let has_next = self.has_next(total, page, shown);
            shown += self.item_slots(page > 0, has_next);
            if !has_next || shown >= total {
                return page;
            }
        }
        log::warn!("Pagination stopped after {} pages", MAX_PAGES);
        MAX_PAGES - 1
    }

    /// Moves the page cursor one step, wrapping at both ends.
    pub fn navigate(&self, current: usize, direction: NavDirection, total: usize) -> usize {
        let last = self.last_page(total);
        match direction {
            NavDirection::Next if current >= last => 0,
            NavDirection::Next => current + 1,
            NavDirection::Prev => current.min(last + 1).checked_sub(1).unwrap_or(last),
        }
    }
}
