use carousel::config;
use carousel::gui::app::AppModel;
use carousel::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.troia.prism");

    app.run::<AppModel>((config, rx));
}
