pub mod model;
pub mod view;

pub use model::{Facet, FacetProjection, Stage, StageRenderer, half_extent, project};
pub use view::draw;

/// Widget name the carousel target has to match.
pub const STAGE_NAME: &str = "prism-stage";
pub const PERSPECTIVE: f64 = 1200.0; // viewer distance from the front facet
pub const BACKFACE_EPSILON: f64 = 1e-3;
pub const MAX_SHADE: f64 = 0.55; // darkening of a facet seen edge-on
pub const STAGE_MARGIN: f64 = 8.0; // pixels around the outermost facet edge
pub const EXTENT_SAMPLES: usize = 360;
pub const LABEL_SIZE: f64 = 48.0;
pub const EDGE_WIDTH: f64 = 1.0;
