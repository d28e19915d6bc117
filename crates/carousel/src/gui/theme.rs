use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub placeholder: Srgba<f64>,
    pub label: Srgba<f64>,
    pub shade: Srgba<f64>,
    pub edge: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            placeholder: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.18, 0.18, 0.2, 0.95),
                Some(0.95),
            ),
            label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 0.8),
                Some(0.8),
            ),
            shade: Srgba::new(0.0, 0.0, 0.0, 1.0),
            edge: Self::lookup_color(
                context,
                "borders",
                Srgba::new(1.0, 1.0, 1.0, 0.15),
                Some(0.15),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    alpha_override.unwrap_or(c.alpha() as f64),
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.prism-window, .prism-stage {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
