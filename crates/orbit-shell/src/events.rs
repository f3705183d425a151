use orbit::ipc::IpcCommand;

/// Messages from the background services to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Toggle,
    ConfigReload,
}

impl From<IpcCommand> for AppEvent {
    fn from(command: IpcCommand) -> Self {
        match command {
            IpcCommand::Show => AppEvent::Show,
            IpcCommand::Hide => AppEvent::Hide,
            IpcCommand::Toggle => AppEvent::Toggle,
        }
    }
}
