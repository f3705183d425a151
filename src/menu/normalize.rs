use super::DEFAULT_MAX_VISIBLE;
use super::item::MenuTree;
use super::layout::LayoutKind;
use serde::Serialize;

/// Settings for one depth of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelConfig {
    pub layout: LayoutKind,
    pub max_visible: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::FullCircle,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

/// Per-level arrays with exactly one entry per menu level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedLevels {
    pub max_visible: Vec<usize>,
    pub layouts: Vec<LayoutKind>,
}

impl NormalizedLevels {
    pub fn depth(&self) -> usize {
        self.layouts.len()
    }

    pub fn level(&self, depth: usize) -> LevelConfig {
        let fallback = LevelConfig::default();
        LevelConfig {
            layout: self.layouts.get(depth).copied().unwrap_or(fallback.layout),
            max_visible: self
                .max_visible
                .get(depth)
                .copied()
                .unwrap_or(fallback.max_visible),
        }
    }
}

/// Pads with the last value (or `default` when empty) and truncates to `len`.
fn fit<T: Copy>(values: &[T], len: usize, default: T) -> Vec<T> {
    let filler = values.last().copied().unwrap_or(default);
    values
        .iter()
        .copied()
        .chain(std::iter::repeat(filler))
        .take(len)
        .collect()
}

pub fn normalize(
    tree: &MenuTree,
    max_visible: &[usize],
    layouts: &[LayoutKind],
    fallback: Option<LayoutKind>,
) -> NormalizedLevels {
    let depth = tree.levels();

    let layouts = if layouts.is_empty() {
        // level 0 stays a full circle unless configured explicitly
        std::iter::once(LayoutKind::FullCircle)
            .chain(std::iter::repeat(fallback.unwrap_or_default()))
            .take(depth)
            .collect()
    } else {
        fit(layouts, depth, LayoutKind::FullCircle)
    };

    NormalizedLevels {
        max_visible: fit(max_visible, depth, DEFAULT_MAX_VISIBLE),
        layouts,
    }
}
