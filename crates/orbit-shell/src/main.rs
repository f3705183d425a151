mod events;
mod gui;
mod sys;

use gui::app::{AppModel, Shell};
use orbit::config;
use relm4::prelude::*;
use sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();
    let shell = Shell::new(&config);

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.orbit.shell");

    app.run::<AppModel>((shell, rx));
}
