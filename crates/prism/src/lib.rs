//! Geometry and navigation core of the prism carousel.
//!
//! A [`Carousel`] owns the current slide, the slide to angle map and the
//! navigation debouncers, and drives a [`Renderer`] through a [`Scheduler`].

pub mod command;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod geometry;
pub mod macros;
pub mod render;
pub mod timer;
pub mod timing;

pub use config::{CarouselConfig, ConfigError, FacetSource, RenderMode, SceneTarget};
pub use controller::{Carousel, CarouselError, Phase};
pub use geometry::{Layout, PlacementRule, SlideMap};
pub use render::Renderer;
pub use timer::{ManualScheduler, Scheduler, TimerId};
pub use timing::TimingCurve;
