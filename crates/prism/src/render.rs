use crate::config::{CarouselConfig, SceneTarget};
use crate::geometry::Layout;

/// Presentation side of the carousel. The controller decides angles, the
/// renderer only shows them.
pub trait Renderer {
    /// Builds the scene named by `target`: facets, their placement and the
    /// animation settings. Returns `false` when no such scene exists.
    fn mount(&mut self, target: &SceneTarget, config: &CarouselConfig, layout: &Layout) -> bool;

    /// Sets the ring rotation in degrees.
    fn apply_rotation(&mut self, angle: f64);

    /// While disabled, rotation changes take effect instantly.
    fn set_animation_enabled(&mut self, enabled: bool);
}
