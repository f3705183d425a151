use anyhow::Context;
use orbit::config;
use orbit::menu::MenuItemSpec;
use std::ffi::OsStr;
use std::process::Command;

/// Target that opens the user's config file, creating it from the bundled
/// default first.
pub const SETUP_TARGET: &str = "orbit:setup";

fn xdg_open(target: impl AsRef<OsStr>) -> anyhow::Result<()> {
    let target = target.as_ref();
    Command::new("xdg-open")
        .arg(target)
        .spawn()
        .with_context(|| format!("Failed to open {}", target.to_string_lossy()))?;
    Ok(())
}

/// Runs the action of a leaf item. Items without a target only report the click.
pub fn activate(spec: &MenuItemSpec) -> anyhow::Result<()> {
    match spec.target().as_deref() {
        Some(SETUP_TARGET) => {
            let path = config::write_default_config()?;
            xdg_open(path)
        }
        Some(href) => xdg_open(href),
        None => {
            log::info!(
                "Item '{}' has no target",
                spec.label.as_deref().unwrap_or_default()
            );
            Ok(())
        }
    }
}
