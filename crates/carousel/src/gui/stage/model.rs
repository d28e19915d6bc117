use super::view;
use super::{BACKFACE_EPSILON, EXTENT_SAMPLES, MAX_SHADE, PERSPECTIVE, STAGE_MARGIN};
use crate::gui::theme::ThemeColors;
use gdk_pixbuf::{InterpType, Pixbuf};
use gtk::prelude::*;
use gtk4 as gtk;
use prism::geometry::FULL_TURN;
use prism::{CarouselConfig, FacetSource, Layout, RenderMode, Renderer, SceneTarget, TimingCurve};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Where one facet lands on screen for a given ring rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetProjection {
    pub index: usize,
    pub offset_x: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub depth: f64,
    pub shade: f64,
}

/// Projects the ring rotated by `ring_angle` degrees. Facets turned away from
/// the viewer are dropped, the rest come back to front.
pub fn project(layout: &Layout, ring_angle: f64) -> Vec<FacetProjection> {
    let radius = layout.radius;

    let mut facets: Vec<FacetProjection> = (0..layout.facets)
        .filter_map(|index| {
            let yaw = (index as f64 * layout.angle_step + ring_angle).to_radians();
            let facing = yaw.cos();
            if facing <= BACKFACE_EPSILON {
                return None;
            }

            // the front facet sits on the screen plane
            let depth = radius * facing - radius;
            let perspective = PERSPECTIVE / (PERSPECTIVE - depth);

            Some(FacetProjection {
                index,
                offset_x: radius * yaw.sin() * perspective,
                scale_x: facing * perspective,
                scale_y: perspective,
                depth,
                shade: (1.0 - facing) * MAX_SHADE,
            })
        })
        .collect();

    facets.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    facets
}

/// Farthest a facet edge gets from the stage center while the ring turns
/// through a full revolution.
pub fn half_extent(layout: &Layout, facet_width: f64) -> f64 {
    (0..EXTENT_SAMPLES)
        .flat_map(|step| project(layout, step as f64 * FULL_TURN / EXTENT_SAMPLES as f64))
        .map(|p| p.offset_x.abs() + p.scale_x * facet_width / 2.0)
        .fold(facet_width / 2.0, f64::max)
}

#[derive(Clone)]
pub struct Facet {
    pub source: FacetSource,
    pub pixbuf: Option<Pixbuf>,
}

impl Facet {
    pub fn load(source: &FacetSource, width: f64, height: f64, mode: RenderMode) -> Self {
        let pixbuf = Self::load_pixbuf(source, width.round() as i32, height.round() as i32, mode);
        Self {
            source: source.clone(),
            pixbuf,
        }
    }

    fn load_pixbuf(source: &FacetSource, width: i32, height: i32, mode: RenderMode) -> Option<Pixbuf> {
        if source.is_blank() {
            return None;
        }

        let loaded = match mode {
            RenderMode::Image => Pixbuf::from_file_at_scale(source.as_str(), width, height, false),
            RenderMode::Background => Pixbuf::from_file(source.as_str()),
        };

        match loaded {
            Ok(pixbuf) if mode == RenderMode::Background => Self::cover(&pixbuf, width, height),
            Ok(pixbuf) => Some(pixbuf),
            Err(e) => {
                log::warn!("Failed to load facet '{}': {}", source, e);
                None
            }
        }
    }

    /// Scales `pixbuf` to fill `width` x `height` and crops the overflow evenly.
    fn cover(pixbuf: &Pixbuf, width: i32, height: i32) -> Option<Pixbuf> {
        let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
        let scale = (width as f64 / pw).max(height as f64 / ph);
        let (sw, sh) = (
            ((pw * scale).ceil() as i32).max(width),
            ((ph * scale).ceil() as i32).max(height),
        );

        let scaled = pixbuf.scale_simple(sw, sh, InterpType::Bilinear)?;
        Some(scaled.new_subpixbuf((sw - width) / 2, (sh - height) / 2, width, height))
    }

    pub fn is_placeholder(&self) -> bool {
        self.pixbuf.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    started: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    enabled: bool,
    duration: Duration,
    timing: TimingCurve,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: prism::config::DEFAULT_ANIMATION_DURATION,
            timing: TimingCurve::default(),
        }
    }
}

/// What is on screen: the mounted ring and the rotation currently displayed.
#[derive(Default)]
pub struct Stage {
    pub layout: Option<Layout>,
    pub facets: Vec<Facet>,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    animation: Animation,
    tween: Option<Tween>,
    first_paint: bool,
}

impl Stage {
    pub fn mount(&mut self, config: &CarouselConfig, layout: Layout, facets: Vec<Facet>) {
        self.layout = Some(layout);
        self.facets = facets;
        self.width = config.width;
        self.height = config.height;
        self.animation.duration = config.animation_duration;
        self.animation.timing = config.timing;
        self.tween = None;
        self.first_paint = true;
    }

    pub fn rotate_to(&mut self, angle: f64) {
        let animate = self.animation.enabled
            && !self.animation.duration.is_zero()
            && !std::mem::take(&mut self.first_paint);

        if animate {
            self.tween = Some(Tween {
                from: self.angle,
                to: angle,
                started: None,
            });
        } else {
            self.tween = None;
            self.angle = angle;
        }
    }

    /// Turning animation off lands a running rotation on its target at once.
    pub fn set_animated(&mut self, enabled: bool) {
        self.animation.enabled = enabled;
        if !enabled && let Some(tween) = self.tween.take() {
            self.angle = tween.to;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Moves the running rotation to `frame_time` (microseconds). Returns
    /// whether the displayed angle changed.
    pub fn tick(&mut self, frame_time: i64) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        let started = *tween.started.get_or_insert(frame_time);
        let (from, to) = (tween.from, tween.to);

        let elapsed = Duration::from_micros((frame_time - started).max(0) as u64);
        let progress = elapsed.as_secs_f64() / self.animation.duration.as_secs_f64();

        if progress >= 1.0 {
            self.angle = to;
            self.tween = None;
        } else {
            self.angle = from + (to - from) * self.animation.timing.sample(progress);
        }
        true
    }

    pub fn projections(&self) -> Vec<FacetProjection> {
        self.layout
            .as_ref()
            .map(|layout| project(layout, self.angle))
            .unwrap_or_default()
    }

    /// Room the ring needs so no facet is clipped at any rotation.
    pub fn content_size(&self) -> (i32, i32) {
        let reach = self
            .layout
            .as_ref()
            .map_or(self.width / 2.0, |layout| half_extent(layout, self.width));
        let width = 2.0 * reach + STAGE_MARGIN;
        let height = self.height + STAGE_MARGIN;
        (width.ceil() as i32, height.ceil() as i32)
    }
}

/// [`Renderer`] drawing the ring into a [`gtk::DrawingArea`].
pub struct StageRenderer {
    stage: Rc<RefCell<Stage>>,
    area: gtk::DrawingArea,
}

impl StageRenderer {
    pub fn new(area: gtk::DrawingArea) -> Self {
        let stage = Rc::new(RefCell::new(Stage::default()));

        let stage_draw = stage.clone();
        area.set_draw_func(move |area, cr, width, height| {
            let style_context = area.style_context();
            let colors = ThemeColors::from_context(&style_context);
            if let Err(e) = view::draw(cr, &stage_draw.borrow(), &colors, width, height) {
                log::error!("Drawing error: {}", e);
            }
        });

        let stage_tick = stage.clone();
        area.add_tick_callback(move |area, clock| {
            if stage_tick.borrow_mut().tick(clock.frame_time()) {
                area.queue_draw();
            }
            glib::ControlFlow::Continue
        });

        Self { stage, area }
    }
}

impl Renderer for StageRenderer {
    fn mount(&mut self, target: &SceneTarget, config: &CarouselConfig, layout: &Layout) -> bool {
        if self.area.widget_name().as_str() != target.as_str() {
            log::error!(
                "Scene '{}' not found, the stage is named '{}'",
                target,
                self.area.widget_name()
            );
            return false;
        }

        let facets = config
            .images
            .iter()
            .map(|source| Facet::load(source, config.width, config.height, config.render_mode))
            .collect();

        let (width, height) = {
            let mut stage = self.stage.borrow_mut();
            stage.mount(config, layout.clone(), facets);
            stage.content_size()
        };
        self.area.set_content_width(width);
        self.area.set_content_height(height);
        self.area.queue_draw();
        true
    }

    fn apply_rotation(&mut self, angle: f64) {
        self.stage.borrow_mut().rotate_to(angle);
        self.area.queue_draw();
    }

    fn set_animation_enabled(&mut self, enabled: bool) {
        let mut stage = self.stage.borrow_mut();
        // only a running rotation changes what is on screen
        let lands = !enabled && stage.is_animating();
        stage.set_animated(enabled);
        if lands {
            self.area.queue_draw();
        }
    }
}
