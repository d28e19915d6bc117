use prism::command::NavCommand;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Navigate(NavCommand),
    ConfigReload,
}
