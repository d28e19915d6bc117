use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

/// Pins the window to the desktop layer when the compositor supports it,
/// otherwise leaves it a regular toplevel.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    if !gtk4_layer_shell::is_supported() {
        log::info!("Layer shell unavailable, running as a regular window");
        window.set_default_size(960, 600);
        return;
    }

    window.init_layer_shell();
    window.set_layer(Layer::Bottom);
    window.set_namespace(Some("prism"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
}
