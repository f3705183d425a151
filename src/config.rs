use crate::menu::effect::Effect;
use crate::menu::item::MenuItemSpec;
use crate::menu::layout::LayoutKind;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Side of the trigger the partial-circle layouts open towards.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Right,
    Left,
    Top,
    Bottom,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    #[default]
    Classic,
    Labeled,
    Modern,
    /// Quarter circle arrangement with navigation moved to overlay arrows.
    Corner,
}

impl MenuType {
    pub fn is_corner(&self) -> bool {
        matches!(self, Self::Corner)
    }

    /// Whether prev/next controls take placement slots away from items.
    pub fn nav_in_slots(&self) -> bool {
        !self.is_corner()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub menu_type: MenuType,
    pub open_direction: Direction,
    pub level_layouts: Vec<LayoutKind>,
    /// Layout for every submenu level when `level_layouts` is empty.
    pub submenu_layout: Option<LayoutKind>,
    pub max_visible_items: Vec<usize>,
    pub animations: bool,
    pub level1_effect: Effect,
    pub adjacent_levels_effect: Effect,
    pub auto_adjust_position: bool,
    pub close_on_click_outside: bool,
    pub label_hover: bool,
    pub items: Vec<MenuItemSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            menu_type: MenuType::Classic,
            open_direction: Direction::Right,
            level_layouts: Vec::new(),
            submenu_layout: None,
            max_visible_items: vec![crate::menu::DEFAULT_MAX_VISIBLE],
            animations: true,
            level1_effect: Effect::Radial,
            adjacent_levels_effect: Effect::Radial,
            auto_adjust_position: false,
            close_on_click_outside: false,
            label_hover: true,
            items: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn bundled() -> Self {
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!("Bundled config is invalid: {}", e);
            Self::default()
        })
    }
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("ORBIT"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        log::debug!("No config at {}, using bundled menu", path.display());
        return Config::bundled();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            Config::bundled()
        }
    }
}

pub fn write_default_config() -> Result<std::path::PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_deserialization() {
        let cases = vec![
            ("\"right\"", Direction::Right),
            ("\"Right\"", Direction::Right),
            ("\"LEFT\"", Direction::Left),
            ("\"top\"", Direction::Top),
            ("\"Bottom\"", Direction::Bottom),
        ];

        for (json, expected) in cases {
            let deserialized: Direction = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<Direction>("\"up\"").is_err());
    }

    #[test]
    fn test_menu_type_nav_slots() {
        let corner: MenuType = serde_json::from_str("\"corner\"").unwrap();
        assert!(!corner.nav_in_slots());
        assert!(MenuType::Modern.nav_in_slots());
    }

    #[test]
    fn test_bundled_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert!(!config.items.is_empty());
        assert!(config.items.iter().any(|i| !i.children.is_empty()));
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml(
            r#"
            menu_type = "corner"
            open_direction = "left"
            level_layouts = ["semi-circle", "no-such-layout"]
            max_visible_items = [6, 4]
            level1_effect = "wave"
            auto_adjust_position = true

            [[items]]
            label = "Files"
            icon = "folder"

            [[items.children]]
            label = "Home"
            href = "file:///home"
            "#,
        )
        .unwrap();

        assert_eq!(config.menu_type, MenuType::Corner);
        assert_eq!(config.open_direction, Direction::Left);
        assert_eq!(
            config.level_layouts,
            vec![LayoutKind::SemiCircle, LayoutKind::FullCircle]
        );
        assert_eq!(config.max_visible_items, vec![6, 4]);
        assert_eq!(config.level1_effect, Effect::Wave);
        assert_eq!(config.adjacent_levels_effect, Effect::Radial);
        assert!(config.auto_adjust_position);
        assert!(config.label_hover);
        assert_eq!(config.items[0].children[0].href.as_deref(), Some("file:///home"));
    }
}
