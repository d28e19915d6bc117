use crate::controller::{Carousel, CarouselError};
use crate::render::Renderer;
use crate::timer::Scheduler;
use derive_more::Display;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/prism.sock";

/// One line of the control socket protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NavCommand {
    #[display("next")]
    Next,
    #[display("prev")]
    Prev,
    #[display("show {_0}")]
    Show(i64),
}

impl NavCommand {
    pub fn apply<R: Renderer, S: Scheduler>(
        self,
        carousel: &mut Carousel<R, S>,
    ) -> Result<(), CarouselError> {
        match self {
            Self::Next => carousel.next(),
            Self::Prev => carousel.prev(),
            Self::Show(slide) => carousel.show_slide(slide),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command: '{0}'")]
    Unknown(String),
    #[error("Invalid slide index: '{0}'")]
    InvalidIndex(String),
}

impl FromStr for NavCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("next"), None, _) => Ok(Self::Next),
            (Some("prev"), None, _) => Ok(Self::Prev),
            (Some("show"), Some(slide), None) => slide
                .parse()
                .map(Self::Show)
                .map_err(|_| ParseCommandError::InvalidIndex(slide.to_string())),
            _ => Err(ParseCommandError::Unknown(s.trim().to_string())),
        }
    }
}
