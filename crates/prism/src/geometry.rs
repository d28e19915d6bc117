use crate::config::ConfigError;
use std::f64::consts::PI;
use std::fmt;

pub const MIN_FACETS: usize = 2;
pub const FULL_TURN: f64 = 360.0;
pub const DEFAULT_SELECTOR: &str = ".scene .prism .slide";

/// Ring rotation (degrees) that brings each slide to the front, indexed by slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideMap(Vec<f64>);

impl SlideMap {
    fn new(facets: usize, angle_step: f64) -> Self {
        Self((0..facets).map(|i| -(i as f64 * angle_step)).collect())
    }

    /// # Panics
    ///
    /// Panics if `slide` is not below the facet count.
    pub fn angle(&self, slide: usize) -> f64 {
        self.0[slide]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

/// Resting transform of one facet, or the rule hiding surplus facets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementRule {
    Facet {
        index: usize,
        rotate_y: f64,
        translate_z: f64,
    },
    HideFrom {
        index: usize,
    },
}

impl fmt::Display for PlacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Facet {
                index,
                rotate_y,
                translate_z,
            } => write!(
                f,
                ":nth-child({}){{transform:rotateY({rotate_y}deg) translate3d(0, 0, {translate_z}px)}}",
                index + 1
            ),
            Self::HideFrom { index } => write!(f, ":nth-child(n+{}){{display:none}}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub facets: usize,
    pub radius: f64,
    pub angle_step: f64,
    pub slides: SlideMap,
    pub rules: Vec<PlacementRule>,
}

impl Layout {
    /// Places `facets` panels of `facet_width` (plus `gap`) on a regular polygon.
    ///
    /// The radius is rounded up so adjacent facets never leave a sub-pixel seam.
    pub fn compute(facets: usize, facet_width: f64, gap: f64) -> Result<Self, ConfigError> {
        if facets < MIN_FACETS {
            return Err(ConfigError::TooFewFacets(facets));
        }

        let slide_width = facet_width + gap;
        let radius = (slide_width / ((PI / facets as f64).tan() * 2.0)).ceil();
        let angle_step = FULL_TURN / facets as f64;

        let rules = (0..facets)
            .map(|index| PlacementRule::Facet {
                index,
                rotate_y: index as f64 * angle_step,
                translate_z: radius,
            })
            .chain(std::iter::once(PlacementRule::HideFrom { index: facets }))
            .collect();

        Ok(Self {
            facets,
            radius,
            angle_step,
            slides: SlideMap::new(facets, angle_step),
            rules,
        })
    }

    /// Wraps any slide number into `[0, facets)`, negative numbers counting back from the end.
    pub fn normalize(&self, slide: i64) -> usize {
        slide.rem_euclid(self.facets as i64) as usize
    }

    pub fn stylesheet(&self, selector_prefix: &str) -> String {
        self.rules
            .iter()
            .map(|rule| format!("{selector_prefix}{rule}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
