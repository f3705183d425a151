use crate::config::{Direction, MenuType};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const RING_BASE_RADIUS: f64 = 140.0;
pub const CORNER_BASE_RADIUS: f64 = 120.0;
pub const RING_STEP: f64 = 80.0; // radius growth per level
pub const LINE_SPACING: f64 = 85.0;
pub const SPIRAL_BASE_RADIUS: f64 = 100.0;
pub const SPIRAL_RADIUS_STEP: f64 = 30.0;
pub const SPIRAL_ITEMS_PER_TURN: f64 = 5.0;
pub const SIDE_ARC_RADIUS: f64 = 120.0;
pub const SIDE_ARC_SPAN: f64 = PI * 0.7;
pub const RADIAL_LINE_START: f64 = 100.0;
pub const RADIAL_LINE_SPACING: f64 = 80.0;
pub const GRID_SPACING: f64 = 70.0;
pub const GRID_OFFSET: f64 = 100.0;
pub const START_OFFSET: f64 = -FRAC_PI_2; // full circles start at the top

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum LayoutKind {
    #[default]
    FullCircle,
    SemiCircle,
    QuarterCircle,
    HorizontalLine,
    VerticalLine,
    SpiralOut,
    /// Arc around the parent item. Submenus only.
    SideArc,
    /// Ray from the origin through the parent item. Submenus only.
    RadialLine,
    /// Grid next to the parent item. Submenus only.
    FloatingGrid,
}

impl LayoutKind {
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown layout '{}', using full-circle", name);
            Self::FullCircle
        })
    }

    /// Layouts computed relative to the parent item's position.
    pub fn is_anchored(&self) -> bool {
        matches!(self, Self::SideArc | Self::RadialLine | Self::FloatingGrid)
    }
}

impl From<String> for LayoutKind {
    fn from(name: String) -> Self {
        Self::parse_lenient(&name)
    }
}

fn ring_radius(base: f64, level: usize) -> f64 {
    base + level as f64 * RING_STEP
}

fn semi_circle_start(direction: Direction) -> f64 {
    match direction {
        Direction::Right => 0.0,
        Direction::Left => PI,
        Direction::Top => FRAC_PI_2,
        Direction::Bottom => -FRAC_PI_2,
    }
}

fn quarter_circle_start(direction: Direction) -> f64 {
    match direction {
        Direction::Right | Direction::Bottom => -FRAC_PI_4,
        Direction::Left | Direction::Top => 3.0 * FRAC_PI_4,
    }
}

// Corner menus open away from a fixed screen corner, hence a separate table.
fn corner_start(direction: Direction) -> f64 {
    match direction {
        Direction::Right => -FRAC_PI_2,
        Direction::Left => FRAC_PI_2,
        Direction::Top => PI,
        Direction::Bottom => 0.0,
    }
}

fn arc(count: usize, radius: f64, start: f64, step: f64) -> Vec<Point> {
    (0..count)
        .map(|i| Point::polar(start + step * i as f64, radius))
        .collect()
}

pub fn full_circle(level: usize, count: usize, capacity: usize) -> Vec<Point> {
    let step = 2.0 * PI / capacity.max(1) as f64;
    arc(count, ring_radius(RING_BASE_RADIUS, level), START_OFFSET, step)
}

pub fn semi_circle(level: usize, count: usize, capacity: usize, direction: Direction) -> Vec<Point> {
    let step = PI / capacity.saturating_sub(1).max(1) as f64;
    let radius = ring_radius(RING_BASE_RADIUS, level);
    arc(count, radius, semi_circle_start(direction), step)
}

pub fn quarter_circle(
    level: usize,
    count: usize,
    capacity: usize,
    direction: Direction,
) -> Vec<Point> {
    let step = FRAC_PI_2 / capacity.saturating_sub(1).max(1) as f64;
    let radius = ring_radius(RING_BASE_RADIUS, level);
    arc(count, radius, quarter_circle_start(direction), step)
}

/// Quarter circle with half a slot of margin on each end.
pub fn corner(level: usize, count: usize, capacity: usize, direction: Direction) -> Vec<Point> {
    let step = PI / (capacity + 1) as f64;
    let radius = ring_radius(CORNER_BASE_RADIUS, level);
    arc(count, radius, corner_start(direction) + step, step)
}

fn centered_offsets(count: usize) -> impl Iterator<Item = f64> {
    let start = -((count.saturating_sub(1)) as f64 * LINE_SPACING) / 2.0;
    (0..count).map(move |i| start + i as f64 * LINE_SPACING)
}

pub fn horizontal_line(count: usize, anchor: Point) -> Vec<Point> {
    centered_offsets(count)
        .map(|dx| anchor.translate(dx, 0.0))
        .collect()
}

pub fn vertical_line(count: usize, anchor: Point) -> Vec<Point> {
    centered_offsets(count)
        .map(|dy| anchor.translate(0.0, dy))
        .collect()
}

pub fn spiral(count: usize) -> Vec<Point> {
    let step = 2.0 * PI / SPIRAL_ITEMS_PER_TURN;
    (0..count)
        .map(|i| {
            let radius = SPIRAL_BASE_RADIUS + SPIRAL_RADIUS_STEP * i as f64;
            Point::polar(START_OFFSET + step * i as f64, radius)
        })
        .collect()
}

pub fn side_arc(count: usize, parent: Point) -> Vec<Point> {
    let step = if count > 1 {
        SIDE_ARC_SPAN / (count - 1) as f64
    } else {
        0.0
    };
    let start = parent.angle() - SIDE_ARC_SPAN / 2.0;
    (0..count)
        .map(|i| parent.offset_by(Point::polar(start + step * i as f64, SIDE_ARC_RADIUS)))
        .collect()
}

pub fn radial_line(count: usize, parent: Point) -> Vec<Point> {
    let angle = parent.angle();
    (0..count)
        .map(|i| {
            let distance = RADIAL_LINE_START + RADIAL_LINE_SPACING * i as f64;
            parent.offset_by(Point::polar(angle, distance))
        })
        .collect()
}

pub fn floating_grid(count: usize, parent: Point) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    let center = parent.offset_by(Point::polar(parent.angle(), GRID_OFFSET));
    let width = (cols - 1) as f64 * GRID_SPACING;
    let height = (rows - 1) as f64 * GRID_SPACING;

    (0..count)
        .map(|i| {
            let (col, row) = ((i % cols) as f64, (i / cols) as f64);
            center.translate(col * GRID_SPACING - width / 2.0, row * GRID_SPACING - height / 2.0)
        })
        .collect()
}

/// Maps a level's slots to offsets in the trigger's local frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    pub direction: Direction,
    pub menu_type: MenuType,
}

impl LayoutEngine {
    pub fn new(direction: Direction, menu_type: MenuType) -> Self {
        Self {
            direction,
            menu_type,
        }
    }

    /// Returns exactly `count` offsets, slot 0 first.
    ///
    /// Circular layouts are concentric around the trigger; `anchor` only moves
    /// the anchored layouts and the two line layouts.
    pub fn positions(
        &self,
        kind: LayoutKind,
        level: usize,
        count: usize,
        capacity: usize,
        anchor: Option<Point>,
    ) -> Vec<Point> {
        if self.menu_type.is_corner() {
            return corner(level, count, capacity, self.direction);
        }

        if kind.is_anchored() {
            return match anchor.filter(|_| level > 0) {
                Some(parent) => match kind {
                    LayoutKind::SideArc => side_arc(count, parent),
                    LayoutKind::RadialLine => radial_line(count, parent),
                    _ => floating_grid(count, parent),
                },
                None => {
                    log::warn!("Layout {} needs a parent item at level {}", kind, level);
                    full_circle(level, count, capacity)
                }
            };
        }

        match kind {
            LayoutKind::SemiCircle => semi_circle(level, count, capacity, self.direction),
            LayoutKind::QuarterCircle => quarter_circle(level, count, capacity, self.direction),
            LayoutKind::HorizontalLine => horizontal_line(count, anchor.unwrap_or_default()),
            LayoutKind::VerticalLine => vertical_line(count, anchor.unwrap_or_default()),
            LayoutKind::SpiralOut => spiral(count),
            _ => full_circle(level, count, capacity),
        }
    }
}
