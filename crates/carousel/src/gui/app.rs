use crate::events::AppEvent;
use crate::gui::stage::{STAGE_NAME, StageRenderer};
use crate::gui::{theme, window};
use crate::sys::timers::GlibScheduler;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use prism::command::NavCommand;
use prism::{Carousel, CarouselConfig, TimerId};
use relm4::prelude::*;

pub struct AppModel {
    carousel: Carousel<StageRenderer, GlibScheduler>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMsg {
    Navigate(NavCommand),
    Timer(TimerId),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Navigate(command) => AppMsg::Navigate(command),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Keyboard bindings of the carousel window.
pub fn key_message(key: gdk::Key) -> Option<AppMsg> {
    if key == gdk::Key::Left {
        return Some(AppMsg::Navigate(NavCommand::Prev));
    }
    if key == gdk::Key::Right {
        return Some(AppMsg::Navigate(NavCommand::Next));
    }
    if key == gdk::Key::Home {
        return Some(AppMsg::Navigate(NavCommand::Show(0)));
    }
    if key == gdk::Key::Escape {
        return Some(AppMsg::Quit);
    }

    // 1-9 jump straight to a facet
    key.to_unicode()
        .and_then(|c| c.to_digit(10))
        .filter(|d| *d > 0)
        .map(|d| AppMsg::Navigate(NavCommand::Show(i64::from(d) - 1)))
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (CarouselConfig, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Prism"),
            add_css_class: "prism-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key_message(key) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[local_ref]
            drawing_area -> gtk::DrawingArea {
                set_widget_name: STAGE_NAME,
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "prism-stage",

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_released[sender] => move |gesture, _, _, _| {
                        match gesture.current_button() {
                            1 => sender.input(AppMsg::Navigate(NavCommand::Next)),
                            3 => sender.input(AppMsg::Navigate(NavCommand::Prev)),
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let drawing_area = &gtk::DrawingArea::default();
        let renderer = StageRenderer::new(drawing_area.clone());
        let scheduler = GlibScheduler::new(sender.input_sender().clone());

        let mut model = AppModel {
            carousel: Carousel::new(renderer, scheduler),
        };

        let widgets = view_output!();

        if let Err(e) = model.carousel.initialize(config) {
            log::error!("Failed to set up the carousel: {}", e);
            relm4::main_application().quit();
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(true);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Navigate(command) => {
                if let Err(e) = command.apply(&mut self.carousel) {
                    log::warn!("Ignoring '{}': {}", command, e);
                }
            }
            AppMsg::Timer(timer) => {
                if let Err(e) = self.carousel.fire(timer) {
                    log::warn!("Timer {} failed: {}", timer, e);
                }
            }
            AppMsg::ConfigReload => match prism::config::load_config() {
                Ok(new_config) => match self.carousel.initialize(new_config) {
                    Ok(()) => log::info!("Configuration reloaded"),
                    Err(e) => log::error!("Rejected reloaded config: {}", e),
                },
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}
