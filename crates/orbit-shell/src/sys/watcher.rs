use crate::events::AppEvent;
use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::config::{ConfigError, get_config_path};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Config path error: {0}")]
    Config(#[from] ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file has no parent directory")]
    NoParent,
}

fn is_reload_event(event: &Event, config_path: &Path) -> bool {
    let meaningful = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    meaningful && event.paths.iter().any(|p| p == config_path)
}

/// Watches the config directory and sends `ConfigReload` whenever the config
/// file changes. Returns once the UI side hangs up.
pub async fn run_async_watcher(tx: Sender<AppEvent>) -> Result<(), WatchError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .ok_or(WatchError::NoParent)?
        .to_path_buf();

    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_reload_event(&event, &config_path) && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    #[test]
    fn test_reload_only_for_config_file() {
        let config = PathBuf::from("/home/u/.config/orbit/config.toml");
        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(config.clone());
        assert!(is_reload_event(&modify, &config));

        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/u/.config/orbit/notes.txt"));
        assert!(!is_reload_event(&other, &config));

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(config.clone());
        assert!(!is_reload_event(&access, &config));
    }
}
