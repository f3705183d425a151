use anyhow::Context;
use clap::{Parser, Subcommand};
use orbit::config::{self, Config};
use orbit::geometry::Rect;
use orbit::ipc::{IpcCommand, SOCKET_PATH};
use orbit::menu::{ItemId, Menu, NavDirection};
use orbit::render::{EntryKind, Scene};
use std::fmt::Write as _;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the menu at the cursor
    Show,
    /// Hide the menu
    Hide,
    /// Show the menu, or hide it if it is visible
    Toggle,
    /// Write the default config unless one exists and print its path
    Init,
    /// Print where the configured menu places its items
    Preview {
        /// Config file to use instead of the user config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Expand these items in order, by label
        #[arg(short, long)]
        expand: Vec<String>,

        /// Page to show at the root level
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        #[arg(long, default_value_t = 1920.0)]
        width: f64,

        #[arg(long, default_value_t = 1080.0)]
        height: f64,

        /// Print the scene as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command(IpcCommand::Show),
        Commands::Hide => send_command(IpcCommand::Hide),
        Commands::Toggle => send_command(IpcCommand::Toggle),
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Preview {
            config,
            expand,
            page,
            width,
            height,
            json,
        } => {
            let config = match config {
                Some(path) => Config::from_toml(&fs_err::read_to_string(&path)?)?,
                None => config::load_or_default(),
            };
            let viewport = Rect::new(0.0, 0.0, width, height);
            let (menu, scene) = preview(&config, viewport, page, &expand)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scene)?);
            } else {
                print!("{}", describe(&menu, &scene));
            }
            Ok(())
        }
    }
}

fn send_command(command: IpcCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit-shell at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}

fn find_item(menu: &Menu, depth: usize, label: &str) -> Option<ItemId> {
    menu.rendered_level(depth)?
        .visible_items()
        .into_iter()
        .find(|&id| menu.tree().get(id).is_some_and(|n| n.label() == label))
}

/// Opens the menu in a headless scene centered in `viewport`.
fn preview(
    config: &Config,
    viewport: Rect,
    page: usize,
    expand: &[String],
) -> anyhow::Result<(Menu, Scene)> {
    let mut menu = Menu::new(config);
    let mut scene = Scene::new(viewport.center(), viewport);
    menu.open(&mut scene);

    for _ in 0..page {
        if !menu.navigate(0, NavDirection::Next, &mut scene) {
            break;
        }
    }

    for label in expand {
        let depth = menu.open_path().len();
        let item = find_item(&menu, depth, label)
            .with_context(|| format!("No item '{}' visible at level {}", label, depth))?;
        if !menu.toggle(depth, item, &mut scene) {
            anyhow::bail!("Item '{}' has no submenu", label);
        }
    }

    menu.run_deferred(&mut scene);
    Ok((menu, scene))
}

fn describe(menu: &Menu, scene: &Scene) -> String {
    let adjusted = menu
        .adjustments()
        .map(|a| a.adjusted_keys())
        .unwrap_or_default();

    let mut out = String::new();
    for level in scene.levels() {
        let window = level.window;
        let _ = writeln!(
            out,
            "level {} {} page {} items {}..{}",
            level.depth, level.layout, window.page, window.start, window.end
        );
        for item in &level.items {
            let position = scene.screen_position(item.key).unwrap_or_default();
            let mut flags = Vec::new();
            if let EntryKind::Item {
                has_children: true, ..
            } = item.kind
            {
                flags.push("submenu");
            }
            if item.active {
                flags.push("active");
            }
            if item.dimmed {
                flags.push("dimmed");
            }
            if adjusted.contains(&item.key) {
                flags.push("adjusted");
            }
            let _ = writeln!(
                out,
                "  [{}] {:<16} ({:.1}, {:.1}) {}",
                item.key,
                item.label,
                position.x,
                position.y,
                flags.join(" ")
            );
        }
    }
    if let Some(arrows) = scene.arrows() {
        let _ = writeln!(
            out,
            "arrows level {} prev={} next={}",
            arrows.depth, arrows.has_prev, arrows.has_next
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }

    #[test]
    fn test_preview_bundled_menu() {
        let config = Config::bundled();
        let (menu, scene) = preview(&config, viewport(), 0, &["Files".to_string()]).unwrap();
        assert_eq!(menu.open_path(), &[1]);
        assert_eq!(scene.labels(1), vec!["Home", "Documents", "Downloads"]);

        let text = describe(&menu, &scene);
        assert!(text.contains("level 0 full-circle page 0 items 0..4"));
        assert!(text.contains("level 1 side-arc"));
        assert!(text.lines().any(|l| l.contains("Files") && l.contains("active")));
    }

    #[test]
    fn test_preview_unknown_label() {
        let config = Config::bundled();
        let err = preview(&config, viewport(), 0, &["Nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn test_cli_parses_preview() {
        let cli = Cli::parse_from(["orbitctl", "preview", "-e", "Files", "--json"]);
        let Commands::Preview { expand, json, page, .. } = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(expand, vec!["Files"]);
        assert!(json);
        assert_eq!(page, 0);
    }
}
