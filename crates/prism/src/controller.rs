use crate::config::{CarouselConfig, ConfigError};
use crate::debounce::Debouncer;
use crate::geometry::{FULL_TURN, Layout};
use crate::render::Renderer;
use crate::timer::{ManualScheduler, Scheduler, TimerId};
use std::time::Duration;
use thiserror::Error;

/// Pause between snapping back after a wrap and re-enabling animation.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

const HALF_TURN: f64 = FULL_TURN / 2.0;

#[derive(Debug, Error)]
pub enum CarouselError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("The carousel has not been initialized yet")]
    NotInitialized,
}

/// Progress of a wrap-around transition.
///
/// A wrap rotates past the full turn (`Overshooting`), snaps back to the
/// canonical angle with animation off (`Settling`) and then turns animation
/// back on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Overshooting { target: f64, timer: TimerId },
    Settling { timer: TimerId },
}

impl Phase {
    pub fn timer(&self) -> Option<TimerId> {
        match self {
            Self::Idle => None,
            Self::Overshooting { timer, .. } | Self::Settling { timer } => Some(*timer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

#[derive(Debug)]
struct Ready {
    config: CarouselConfig,
    layout: Layout,
    current_slide: usize,
    applied_angle: f64,
    phase: Phase,
}

pub struct Carousel<R: Renderer, S: Scheduler> {
    renderer: R,
    scheduler: S,
    ready: Option<Ready>,
    animation_enabled: bool,
    forward: Debouncer,
    backward: Debouncer,
}

impl<R: Renderer, S: Scheduler> Carousel<R, S> {
    /// Creates an uninitialized carousel. Navigation fails until [`Self::initialize`] succeeds.
    pub fn new(renderer: R, scheduler: S) -> Self {
        Self {
            renderer,
            scheduler,
            ready: None,
            animation_enabled: true,
            forward: Debouncer::default(),
            backward: Debouncer::default(),
        }
    }

    pub fn with_config(
        config: CarouselConfig,
        renderer: R,
        scheduler: S,
    ) -> Result<Self, CarouselError> {
        let mut carousel = Self::new(renderer, scheduler);
        carousel.initialize(config)?;
        Ok(carousel)
    }

    /// Lays out the ring and shows the initial slide. Calling it again rebuilds
    /// everything and drops pending navigation.
    pub fn initialize(&mut self, config: CarouselConfig) -> Result<(), CarouselError> {
        config.validate()?;
        let layout = Layout::compute(config.images.len(), config.width, config.gap)?;

        if !self.renderer.mount(&config.target, &config, &layout) {
            return Err(ConfigError::TargetNotFound(config.target.clone()).into());
        }

        self.cancel_timers();
        if !self.animation_enabled {
            self.set_animation(true);
        }

        let current_slide = config.initial_slide;
        let applied_angle = layout.slides.angle(current_slide);
        self.renderer.apply_rotation(applied_angle);

        log::debug!(
            "Carousel '{}' ready: {} facets, radius {}px, showing slide {}",
            config.target,
            layout.facets,
            layout.radius,
            current_slide
        );

        self.ready = Some(Ready {
            config,
            layout,
            current_slide,
            applied_angle,
            phase: Phase::Idle,
        });
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), CarouselError> {
        self.nudge(Step::Forward)
    }

    pub fn prev(&mut self) -> Result<(), CarouselError> {
        self.nudge(Step::Backward)
    }

    fn nudge(&mut self, step: Step) -> Result<(), CarouselError> {
        let delay = self.ready()?.config.debounce;
        let timer = self.scheduler.schedule(delay);
        let debouncer = match step {
            Step::Forward => &mut self.forward,
            Step::Backward => &mut self.backward,
        };

        if let Some(preempted) = debouncer.on_trigger(timer) {
            self.scheduler.cancel(preempted);
            log::trace!(
                "{step:?} request preempted timer {preempted}, pending delta now {}",
                debouncer.pending()
            );
        }
        Ok(())
    }

    /// Rotates to `slide`, wrapped into the facet range.
    pub fn show_slide(&mut self, slide: i64) -> Result<(), CarouselError> {
        let ready = self.ready()?;
        let slide = ready.layout.normalize(slide);
        let previous = ready.layout.slides.angle(ready.current_slide);
        let target = ready.layout.slides.angle(slide);
        let duration = ready.config.animation_duration;

        self.settle_in_flight();
        if let Some(ready) = self.ready.as_mut() {
            ready.current_slide = slide;
        }

        if (previous - target).abs() > HALF_TURN {
            let overshoot = if target == 0.0 {
                -FULL_TURN
            } else {
                target + FULL_TURN
            };
            log::debug!("Wrapping to slide {slide} through {overshoot}° (settles at {target}°)");

            self.apply(overshoot);
            let timer = self.scheduler.schedule(duration);
            self.set_phase(Phase::Overshooting { target, timer });
        } else {
            log::debug!("Rotating to slide {slide} at {target}°");
            self.apply(target);
        }
        Ok(())
    }

    /// Handles an elapsed timer. Ids the carousel no longer waits for are ignored.
    pub fn fire(&mut self, timer: TimerId) -> Result<(), CarouselError> {
        if let Some(delta) = self.forward.on_fire(timer) {
            let current = self.ready()?.current_slide as i64;
            return self.show_slide(current + i64::from(delta));
        }
        if let Some(delta) = self.backward.on_fire(timer) {
            let current = self.ready()?.current_slide as i64;
            return self.show_slide(current - i64::from(delta));
        }

        match self.phase() {
            Some(Phase::Overshooting { target, timer: expected }) if expected == timer => {
                self.set_animation(false);
                self.apply(target);
                let restore = self.scheduler.schedule(SETTLE_DELAY);
                self.set_phase(Phase::Settling { timer: restore });
            }
            Some(Phase::Settling { timer: expected }) if expected == timer => {
                self.set_animation(true);
                self.set_phase(Phase::Idle);
            }
            _ => log::debug!("Ignoring stale timer {timer}"),
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.is_some()
    }

    pub fn current_slide(&self) -> Option<usize> {
        self.ready.as_ref().map(|r| r.current_slide)
    }

    pub fn applied_angle(&self) -> Option<f64> {
        self.ready.as_ref().map(|r| r.applied_angle)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.ready.as_ref().map(|r| r.phase)
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.ready.as_ref().map(|r| &r.layout)
    }

    pub fn config(&self) -> Option<&CarouselConfig> {
        self.ready.as_ref().map(|r| &r.config)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn ready(&self) -> Result<&Ready, CarouselError> {
        self.ready.as_ref().ok_or(CarouselError::NotInitialized)
    }

    fn apply(&mut self, angle: f64) {
        self.renderer.apply_rotation(angle);
        if let Some(ready) = self.ready.as_mut() {
            ready.applied_angle = angle;
        }
    }

    fn set_animation(&mut self, enabled: bool) {
        self.animation_enabled = enabled;
        self.renderer.set_animation_enabled(enabled);
    }

    fn set_phase(&mut self, phase: Phase) {
        if let Some(ready) = self.ready.as_mut() {
            ready.phase = phase;
        }
    }

    /// Completes an interrupted wrap on the spot so its timers never act on newer state.
    fn settle_in_flight(&mut self) {
        match self.phase() {
            None | Some(Phase::Idle) => return,
            Some(Phase::Overshooting { target, timer }) => {
                log::debug!("Wrap interrupted, snapping to {target}°");
                self.scheduler.cancel(timer);
                self.set_animation(false);
                self.apply(target);
                self.set_animation(true);
            }
            Some(Phase::Settling { timer }) => {
                self.scheduler.cancel(timer);
                self.set_animation(true);
            }
        }
        self.set_phase(Phase::Idle);
    }

    fn cancel_timers(&mut self) {
        let debounced = [self.forward.on_cancel(), self.backward.on_cancel()];
        let wrap = self.phase().and_then(|p| p.timer());
        for timer in debounced.into_iter().chain([wrap]).flatten() {
            self.scheduler.cancel(timer);
        }
        self.set_phase(Phase::Idle);
    }
}

impl<R: Renderer> Carousel<R, ManualScheduler> {
    /// Moves the virtual clock forward by `elapsed`, firing every timer that
    /// falls due on the way, including the ones scheduled while advancing.
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), CarouselError> {
        let deadline = self.scheduler.now() + elapsed;
        while let Some(timer) = self.scheduler.pop_due(deadline) {
            self.fire(timer)?;
        }
        self.scheduler.advance_to(deadline);
        Ok(())
    }
}

impl<R: Renderer, S: Scheduler> Drop for Carousel<R, S> {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneTarget;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Command {
        Rotate(f64),
        Animate(bool),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        missing_scene: bool,
        mounts: usize,
        commands: Vec<Command>,
    }

    impl Recorder {
        fn take(&mut self) -> Vec<Command> {
            std::mem::take(&mut self.commands)
        }
    }

    impl Renderer for Recorder {
        fn mount(&mut self, _: &SceneTarget, _: &CarouselConfig, _: &Layout) -> bool {
            self.mounts += 1;
            !self.missing_scene
        }

        fn apply_rotation(&mut self, angle: f64) {
            self.commands.push(Command::Rotate(angle));
        }

        fn set_animation_enabled(&mut self, enabled: bool) {
            self.commands.push(Command::Animate(enabled));
        }
    }

    /// Lets a test look at the clock after the carousel is gone.
    #[derive(Clone, Default)]
    struct SharedClock(Rc<RefCell<ManualScheduler>>);

    impl Scheduler for SharedClock {
        fn schedule(&mut self, delay: Duration) -> TimerId {
            self.0.borrow_mut().schedule(delay)
        }

        fn cancel(&mut self, timer: TimerId) {
            self.0.borrow_mut().cancel(timer);
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn config(facets: usize) -> CarouselConfig {
        let images = (0..facets).map(|i| format!("facet-{i}.png"));
        CarouselConfig::new("stage", images, 200.0, 150.0)
    }

    fn carousel(facets: usize) -> Carousel<Recorder, ManualScheduler> {
        let mut carousel =
            Carousel::with_config(config(facets), Recorder::default(), ManualScheduler::new())
                .unwrap();
        carousel.renderer_mut().take();
        carousel
    }

    #[test]
    fn test_navigation_before_initialize_fails() {
        let mut carousel = Carousel::new(Recorder::default(), ManualScheduler::new());

        assert!(matches!(
            carousel.show_slide(1),
            Err(CarouselError::NotInitialized)
        ));
        assert!(matches!(carousel.next(), Err(CarouselError::NotInitialized)));
        assert!(matches!(carousel.prev(), Err(CarouselError::NotInitialized)));
        assert_eq!(carousel.scheduler().pending(), 0);
        assert!(carousel.renderer().commands.is_empty());
    }

    #[test]
    fn test_initialize_shows_initial_slide() {
        let mut config = config(5);
        config.initial_slide = 2;
        let carousel =
            Carousel::with_config(config, Recorder::default(), ManualScheduler::new()).unwrap();

        assert_eq!(carousel.current_slide(), Some(2));
        assert_eq!(carousel.applied_angle(), Some(-144.0));
        assert_eq!(carousel.phase(), Some(Phase::Idle));
        assert_eq!(carousel.renderer().commands, vec![Command::Rotate(-144.0)]);
        assert_eq!(carousel.layout().map(|l| l.facets), Some(5));
    }

    #[test]
    fn test_initialize_rejects_bad_configuration() {
        let mut carousel = Carousel::new(Recorder::default(), ManualScheduler::new());
        assert!(matches!(
            carousel.initialize(config(1)),
            Err(CarouselError::Config(ConfigError::TooFewFacets(1)))
        ));

        let mut missing = config(3);
        missing.target = SceneTarget::default();
        assert!(matches!(
            carousel.initialize(missing),
            Err(CarouselError::Config(ConfigError::MissingTarget))
        ));
        assert!(!carousel.is_initialized());
    }

    #[test]
    fn test_initialize_fails_when_scene_is_missing() {
        let renderer = Recorder {
            missing_scene: true,
            ..Recorder::default()
        };
        let result = Carousel::with_config(config(3), renderer, ManualScheduler::new());

        assert!(matches!(
            result,
            Err(CarouselError::Config(ConfigError::TargetNotFound(_)))
        ));
    }

    #[test]
    fn test_show_slide_normalizes_index() {
        let mut carousel = carousel(5);

        carousel.show_slide(-1).unwrap();
        assert_eq!(carousel.current_slide(), Some(4));
        carousel.advance(ms(1000)).unwrap();

        carousel.show_slide(5).unwrap();
        assert_eq!(carousel.current_slide(), Some(0));
        carousel.advance(ms(1000)).unwrap();
        assert_eq!(carousel.applied_angle(), Some(0.0));
    }

    #[test]
    fn test_half_turn_is_direct() {
        let mut carousel = carousel(4);

        carousel.show_slide(2).unwrap();

        assert_eq!(carousel.renderer_mut().take(), vec![Command::Rotate(-180.0)]);
        assert_eq!(carousel.phase(), Some(Phase::Idle));
        assert_eq!(carousel.scheduler().pending(), 0);
    }

    #[test]
    fn test_wrap_overshoots_then_snaps_back() {
        let mut carousel = carousel(3);

        carousel.show_slide(2).unwrap();
        assert_eq!(carousel.current_slide(), Some(2));
        assert_eq!(carousel.applied_angle(), Some(120.0));
        assert!(matches!(
            carousel.phase(),
            Some(Phase::Overshooting { target, .. }) if target == -240.0
        ));
        assert_eq!(carousel.renderer_mut().take(), vec![Command::Rotate(120.0)]);

        carousel.advance(ms(499)).unwrap();
        assert!(carousel.renderer().commands.is_empty());

        carousel.advance(ms(1)).unwrap();
        assert_eq!(
            carousel.renderer_mut().take(),
            vec![Command::Animate(false), Command::Rotate(-240.0)]
        );
        assert!(!carousel.animation_enabled());
        assert!(matches!(carousel.phase(), Some(Phase::Settling { .. })));

        carousel.advance(ms(100)).unwrap();
        assert_eq!(carousel.renderer_mut().take(), vec![Command::Animate(true)]);
        assert!(carousel.animation_enabled());
        assert_eq!(carousel.phase(), Some(Phase::Idle));
        assert_eq!(carousel.applied_angle(), Some(-240.0));
    }

    #[test]
    fn test_wrap_onto_first_slide_goes_through_full_turn() {
        let mut carousel = carousel(3);
        carousel.show_slide(2).unwrap();
        carousel.advance(ms(1000)).unwrap();
        carousel.renderer_mut().take();

        carousel.show_slide(0).unwrap();
        assert_eq!(carousel.renderer_mut().take(), vec![Command::Rotate(-360.0)]);

        carousel.advance(ms(1000)).unwrap();
        assert_eq!(
            carousel.renderer_mut().take(),
            vec![
                Command::Animate(false),
                Command::Rotate(0.0),
                Command::Animate(true)
            ]
        );
        assert_eq!(carousel.applied_angle(), Some(0.0));
    }

    #[test]
    fn test_show_slide_is_idempotent() {
        let mut carousel = carousel(3);

        carousel.show_slide(2).unwrap();
        carousel.show_slide(2).unwrap();
        carousel.advance(ms(1000)).unwrap();

        assert_eq!(carousel.current_slide(), Some(2));
        assert_eq!(carousel.applied_angle(), Some(-240.0));
        assert_eq!(carousel.phase(), Some(Phase::Idle));
        assert!(carousel.animation_enabled());
    }

    #[test]
    fn test_rapid_next_coalesces_into_one_rotation() {
        let mut carousel = carousel(6);

        carousel.next().unwrap();
        carousel.advance(ms(100)).unwrap();
        carousel.next().unwrap();
        carousel.advance(ms(100)).unwrap();
        carousel.next().unwrap();
        assert_eq!(carousel.scheduler().pending(), 1);

        carousel.advance(ms(249)).unwrap();
        assert_eq!(carousel.current_slide(), Some(0));
        assert!(carousel.renderer().commands.is_empty());

        carousel.advance(ms(1)).unwrap();
        assert_eq!(carousel.current_slide(), Some(3));
        assert_eq!(carousel.renderer_mut().take(), vec![Command::Rotate(-180.0)]);
    }

    #[test]
    fn test_next_and_prev_debounce_independently() {
        let mut carousel = carousel(6);

        carousel.next().unwrap();
        carousel.advance(ms(50)).unwrap();
        carousel.prev().unwrap();
        carousel.prev().unwrap();
        assert_eq!(carousel.scheduler().pending(), 2);

        carousel.advance(ms(200)).unwrap();
        assert_eq!(carousel.current_slide(), Some(1));

        carousel.advance(ms(50)).unwrap();
        assert_eq!(carousel.current_slide(), Some(5));
        assert_eq!(
            carousel.renderer_mut().take(),
            vec![Command::Rotate(-60.0), Command::Rotate(60.0)]
        );
    }

    #[test]
    fn test_prev_from_first_slide_wraps() {
        let mut carousel = carousel(4);

        carousel.prev().unwrap();
        carousel.advance(ms(250)).unwrap();

        assert_eq!(carousel.current_slide(), Some(3));
        assert_eq!(carousel.renderer_mut().take(), vec![Command::Rotate(90.0)]);
        carousel.advance(ms(600)).unwrap();
        assert_eq!(carousel.applied_angle(), Some(-270.0));
    }

    #[test]
    fn test_interrupted_overshoot_snaps_before_moving_on() {
        let mut carousel = carousel(3);
        carousel.show_slide(2).unwrap();
        carousel.advance(ms(200)).unwrap();
        carousel.renderer_mut().take();

        carousel.show_slide(1).unwrap();
        assert_eq!(
            carousel.renderer_mut().take(),
            vec![
                Command::Animate(false),
                Command::Rotate(-240.0),
                Command::Animate(true),
                Command::Rotate(-120.0)
            ]
        );

        // the cancelled snap never fires
        carousel.advance(ms(1000)).unwrap();
        assert!(carousel.renderer().commands.is_empty());
        assert_eq!(carousel.current_slide(), Some(1));
        assert_eq!(carousel.applied_angle(), Some(-120.0));
    }

    #[test]
    fn test_interrupted_settle_restores_animation() {
        let mut carousel = carousel(3);
        carousel.show_slide(2).unwrap();
        carousel.advance(ms(550)).unwrap();
        carousel.renderer_mut().take();
        assert!(!carousel.animation_enabled());

        carousel.show_slide(1).unwrap();
        assert_eq!(
            carousel.renderer_mut().take(),
            vec![Command::Animate(true), Command::Rotate(-120.0)]
        );
        assert_eq!(carousel.scheduler().pending(), 0);
    }

    #[test]
    fn test_applied_angle_stays_bounded_across_laps() {
        let mut carousel = carousel(3);

        for _ in 0..10 {
            carousel.next().unwrap();
            carousel.advance(ms(1000)).unwrap();
            let angle = carousel.applied_angle().unwrap();
            assert!(angle <= 0.0 && angle > -FULL_TURN, "angle {angle}");
        }
        assert_eq!(carousel.current_slide(), Some(1));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut carousel = carousel(3);

        carousel.fire(TimerId::from(999)).unwrap();

        assert!(carousel.renderer().commands.is_empty());
        assert_eq!(carousel.current_slide(), Some(0));
    }

    #[test]
    fn test_reinitialize_drops_pending_work() {
        let mut carousel = carousel(3);
        carousel.next().unwrap();
        carousel.show_slide(2).unwrap();
        carousel.advance(ms(550)).unwrap();

        let mut config = config(4);
        config.initial_slide = 1;
        carousel.initialize(config).unwrap();

        assert_eq!(carousel.scheduler().pending(), 0);
        assert_eq!(carousel.current_slide(), Some(1));
        assert_eq!(carousel.applied_angle(), Some(-90.0));
        assert!(carousel.animation_enabled());
        assert_eq!(carousel.renderer().mounts, 2);
    }

    #[test]
    fn test_drop_cancels_timers() {
        let clock = SharedClock::default();
        let mut carousel =
            Carousel::with_config(config(3), Recorder::default(), clock.clone()).unwrap();
        carousel.next().unwrap();
        carousel.prev().unwrap();
        carousel.show_slide(2).unwrap();
        assert_eq!(clock.0.borrow().pending(), 3);

        drop(carousel);
        assert_eq!(clock.0.borrow().pending(), 0);
    }
}
