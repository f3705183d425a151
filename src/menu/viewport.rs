use crate::geometry::{Point, Rect};
use crate::render::SlotKey;
use std::collections::HashMap;

pub const VIEWPORT_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentRecord {
    /// Offset the layout engine assigned before any correction.
    pub natural: Point,
    pub adjusted: bool,
}

/// Minimal translation that brings `rect` back inside `bounds`, per axis.
///
/// The far edge (right, bottom) wins when the rectangle overflows both sides.
pub fn correction(rect: &Rect, bounds: &Rect) -> Option<(f64, f64)> {
    let axis = |low: f64, high: f64, min: f64, max: f64| {
        if high > max {
            max - high
        } else if low < min {
            min - low
        } else {
            0.0
        }
    };
    let dx = axis(rect.left(), rect.right(), bounds.left(), bounds.right());
    let dy = axis(rect.top(), rect.bottom(), bounds.top(), bounds.bottom());
    (dx != 0.0 || dy != 0.0).then_some((dx, dy))
}

/// Natural offsets of items moved back on-screen during one open session.
#[derive(Debug, Clone, Default)]
pub struct Adjustments {
    records: HashMap<SlotKey, AdjustmentRecord>,
}

impl Adjustments {
    pub fn get(&self, key: SlotKey) -> Option<&AdjustmentRecord> {
        self.records.get(&key)
    }

    pub fn is_adjusted(&self, key: SlotKey) -> bool {
        self.get(key).is_some_and(|r| r.adjusted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Checks a measured item against the viewport and returns its corrected
    /// offset when it overflows. The natural offset is remembered the first
    /// time the item is moved.
    pub fn adjust(
        &mut self,
        key: SlotKey,
        natural: Point,
        current: Point,
        measured: &Rect,
        viewport: &Rect,
    ) -> Option<Point> {
        let (dx, dy) = correction(measured, &viewport.shrink(VIEWPORT_MARGIN))?;
        let record = self.records.entry(key).or_insert(AdjustmentRecord {
            natural,
            adjusted: false,
        });
        record.adjusted = true;
        Some(current.translate(dx, dy))
    }

    /// Returns the natural offset of an adjusted item if, placed there with
    /// its current size, it would fit inside the viewport again. The flag is
    /// cleared when it does.
    pub fn restore(
        &mut self,
        key: SlotKey,
        origin: Point,
        measured: &Rect,
        viewport: &Rect,
    ) -> Option<Point> {
        let record = self.records.get_mut(&key).filter(|r| r.adjusted)?;
        let estimate = Rect::from_center(
            origin.offset_by(record.natural),
            measured.width,
            measured.height,
        );
        if !viewport.shrink(VIEWPORT_MARGIN).contains(&estimate) {
            return None;
        }
        record.adjusted = false;
        Some(record.natural)
    }

    pub fn adjusted_keys(&self) -> Vec<SlotKey> {
        let mut keys: Vec<SlotKey> = self
            .records
            .iter()
            .filter(|(_, r)| r.adjusted)
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    /// Drops records of levels at `depth` and deeper.
    pub fn forget_from(&mut self, depth: usize) {
        self.records.retain(|key, _| key.depth < depth);
    }
}
