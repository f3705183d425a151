use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use std::path::{Path, PathBuf};

pub const ICON_SIZE: i32 = 128;

/// Resolves an absolute path or a themed icon name.
pub fn find_icon_path(icon_name: &str) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name);
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(icon_name).with_size(512).with_scale(1).find()
}

pub fn load_icon(icon_name: &str) -> Option<Pixbuf> {
    let path = find_icon_path(icon_name)?;
    Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
        .map_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
        .ok()
}
