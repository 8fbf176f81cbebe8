//! The marquee controller: owns one loop timeline and drives it from the
//! shared ticker.

use super::measure::TrackSurface;
use super::navigator::{Navigator, Route};
use super::timeline::LoopTimeline;
use crate::config::LoopSettings;
use crate::gfx::anim::{Ease, Tween};
use crate::ticker::{Frame, Ticker, TickerId};
use crate::viewport::{ListenerId, Viewport};
use log::{debug, info, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Loop durations added to the play-head so reverse play never runs out of room.
const WRAP_CYCLES: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpOptions {
    /// Seconds; defaults to the play-head distance divided by the current speed.
    pub duration: Option<f64>,
    pub ease: Ease,
}

impl Default for JumpOptions {
    fn default() -> Self {
        Self {
            duration: None,
            ease: Ease::InOut,
        }
    }
}

struct Jump {
    tween: Tween,
    route: Route,
    /// Play state to restore once the jump lands.
    resume: bool,
}

struct LoopState {
    surface: Box<dyn TrackSurface>,
    settings: LoopSettings,
    timeline: LoopTimeline,
    navigator: Navigator,
    total_time: f64,
    time_scale: f64,
    direction: f64,
    jump: Option<Jump>,
    playing: bool,
    visible: bool,
    needs_remeasure: bool,
    disposed: bool,
}

impl LoopState {
    fn new(mut surface: Box<dyn TrackSurface>, settings: LoopSettings) -> Self {
        let metrics = surface.measure();
        let timeline = LoopTimeline::build(&metrics, &settings);
        timeline.rest(|i, x| surface.set_x_percent(i, x));
        info!(
            "marquee built: {} items, loop {:.1}px over {:.2}s",
            timeline.len(),
            timeline.total_width(),
            timeline.duration()
        );

        let mut state = Self {
            navigator: Navigator::new(timeline.len()),
            surface,
            playing: !settings.paused,
            settings,
            timeline,
            total_time: 0.0,
            time_scale: 1.0,
            direction: 1.0,
            jump: None,
            visible: true,
            needs_remeasure: false,
            disposed: false,
        };
        if state.settings.reversed {
            state.reverse();
        }
        state
    }

    fn repeats_forever(&self) -> bool {
        self.settings.repeats_forever()
    }

    fn end_time(&self) -> Option<f64> {
        if self.repeats_forever() {
            None
        } else {
            Some(self.timeline.duration() * (self.settings.repeat as f64 + 1.0))
        }
    }

    /// Runs whenever reverse play hits (or may hit) the start of the timeline.
    fn on_reverse_complete(&mut self) {
        if self.repeats_forever() && !self.timeline.is_static() {
            self.total_time += self.timeline.duration() * WRAP_CYCLES;
            trace!("play-head lifted to {:.3}s", self.total_time);
        }
    }

    fn rate(&self) -> f64 {
        self.time_scale * self.direction
    }

    fn reverse(&mut self) {
        self.direction = -self.direction;
        self.on_reverse_complete();
        info!("marquee direction now {:+}", self.direction);
    }

    fn advance(&mut self, dt: f64) {
        if self.disposed {
            return;
        }
        if self.needs_remeasure {
            self.remeasure();
        }
        if self.timeline.is_static() {
            return;
        }

        if let Some(mut jump) = self.jump.take() {
            self.total_time = jump.tween.advance(dt);
            if jump.tween.is_complete() {
                self.finish_jump(jump);
            } else {
                self.jump = Some(jump);
            }
        } else if self.playing && self.visible {
            self.step(dt * self.rate());
        } else {
            return;
        }
        self.render();
    }

    fn step(&mut self, delta: f64) {
        let next = self.total_time + delta;
        if delta < 0.0 && next <= 0.0 {
            if self.repeats_forever() {
                self.total_time = next;
                self.on_reverse_complete();
            } else {
                self.total_time = 0.0;
                self.playing = false;
                info!("marquee reached its start");
            }
            return;
        }
        match self.end_time() {
            Some(end) if delta > 0.0 && next >= end => {
                self.total_time = end;
                self.playing = false;
                info!("marquee finished after {:.2}s", end);
            }
            _ => self.total_time = next,
        }
    }

    fn render(&mut self) {
        let Self {
            timeline,
            surface,
            total_time,
            ..
        } = self;
        timeline.sample(*total_time, |i, x| surface.set_x_percent(i, x));
    }

    fn base_index(&self) -> usize {
        self.jump
            .as_ref()
            .map_or(self.navigator.current(), |jump| jump.route.to)
    }

    fn jump_to(&mut self, target: isize, options: JumpOptions) -> Route {
        let from = self.base_index();
        if self.disposed {
            return Route::stay(from);
        }
        let route = self.navigator.resolve_from(
            from,
            target,
            self.timeline.times(),
            self.total_time,
            self.timeline.duration(),
        );
        if route.is_noop() {
            if route.steps != 0 && self.jump.is_none() {
                self.navigator.commit(route.to);
            }
            return route;
        }

        let resume = match self.jump.take() {
            Some(previous) => previous.resume,
            None => self.playing,
        };
        let duration = options.duration.unwrap_or_else(|| {
            let distance = route.delta_time.abs();
            if self.time_scale > 0.0 {
                distance / self.time_scale
            } else {
                distance
            }
        });
        debug!(
            "jump {} -> {} over {:.3}s (play-head {:+.3}s)",
            route.from, route.to, duration, route.delta_time
        );
        self.jump = Some(Jump {
            tween: Tween::new(
                self.total_time,
                self.total_time + route.delta_time,
                duration,
                options.ease,
            ),
            route,
            resume,
        });
        self.playing = false;
        route
    }

    fn finish_jump(&mut self, jump: Jump) {
        self.navigator.commit(jump.route.to);
        if self.total_time < 0.0 {
            if self.repeats_forever() {
                self.on_reverse_complete();
            } else {
                self.total_time = self.timeline.local_time(self.total_time);
            }
        }
        if let Some(end) = self.end_time() {
            if self.total_time > end {
                self.total_time = self.timeline.local_time(self.total_time);
            }
        }
        self.playing = jump.resume;
        info!("landed on item {}", jump.route.to);
    }

    fn remeasure(&mut self) {
        self.needs_remeasure = false;
        let old_duration = self.timeline.duration();
        let progress = if old_duration > 0.0 {
            self.total_time / old_duration
        } else {
            0.0
        };
        {
            let Self {
                timeline, surface, ..
            } = self;
            timeline.rest(|i, x| surface.set_x_percent(i, x));
        }

        let metrics = self.surface.measure();
        self.timeline = LoopTimeline::build(&metrics, &self.settings);
        self.navigator.set_len(self.timeline.len());
        self.total_time = progress * self.timeline.duration();
        if let Some(jump) = self.jump.take() {
            self.playing = jump.resume;
        }
        info!(
            "marquee remeasured: loop {:.1}px over {:.2}s",
            self.timeline.total_width(),
            self.timeline.duration()
        );
        self.render();
    }
}

/// A looping strip bound to one [`TrackSurface`].
///
/// Registers itself with the ticker and the viewport on creation and
/// unregisters on [`Marquee::dispose`] or drop.
pub struct Marquee {
    state: Rc<RefCell<LoopState>>,
    ticker: Ticker,
    viewport: Viewport,
    ticker_id: Option<TickerId>,
    resize_id: Option<ListenerId>,
}

impl Marquee {
    pub fn new(
        surface: impl TrackSurface + 'static,
        settings: LoopSettings,
        ticker: &Ticker,
        viewport: &Viewport,
    ) -> Self {
        let state = Rc::new(RefCell::new(LoopState::new(Box::new(surface), settings)));

        let weak = Rc::downgrade(&state);
        let ticker_id = ticker.add(move |frame: &Frame| {
            if let Some(state) = weak.upgrade() {
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.advance(frame.delta);
                }
            }
        });

        let weak = Rc::downgrade(&state);
        let resize_id = viewport.on_resize(move |_| {
            if let Some(state) = weak.upgrade() {
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.needs_remeasure = true;
                }
            }
        });

        Self {
            state,
            ticker: ticker.clone(),
            viewport: viewport.clone(),
            ticker_id: Some(ticker_id),
            resize_id: Some(resize_id),
        }
    }

    pub fn play(&self) {
        let mut state = self.state.borrow_mut();
        match state.jump.as_mut() {
            Some(jump) => jump.resume = true,
            None => state.playing = true,
        }
    }

    pub fn pause(&self) {
        let mut state = self.state.borrow_mut();
        match state.jump.as_mut() {
            Some(jump) => jump.resume = false,
            None => state.playing = false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Start/stop hook for whatever decides the strip is on screen.
    pub fn set_visible(&self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn reverse(&self) {
        self.state.borrow_mut().reverse();
    }

    pub fn is_reversed(&self) -> bool {
        self.state.borrow().direction < 0.0
    }

    /// Scales playback speed. The sign of `scale` is ignored; use [`Marquee::reverse`].
    pub fn set_speed(&self, scale: f64) {
        if scale.is_finite() {
            self.state.borrow_mut().time_scale = scale.abs();
        }
    }

    pub fn speed(&self) -> f64 {
        self.state.borrow().time_scale
    }

    /// Signed playback rate: speed times direction.
    pub fn time_scale(&self) -> f64 {
        self.state.borrow().rate()
    }

    pub fn jump_to(&self, index: usize) -> Route {
        self.jump_to_with(index as isize, JumpOptions::default())
    }

    /// `target` may be out of range; it wraps around the loop.
    pub fn jump_to_with(&self, target: isize, options: JumpOptions) -> Route {
        self.state.borrow_mut().jump_to(target, options)
    }

    pub fn next(&self) -> Route {
        self.step_by(1)
    }

    pub fn previous(&self) -> Route {
        self.step_by(-1)
    }

    fn step_by(&self, steps: isize) -> Route {
        let mut state = self.state.borrow_mut();
        let target = state.base_index() as isize + steps;
        state.jump_to(target, JumpOptions::default())
    }

    pub fn current(&self) -> usize {
        self.state.borrow().navigator.current()
    }

    pub fn is_jumping(&self) -> bool {
        self.state.borrow().jump.is_some()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_static(&self) -> bool {
        self.state.borrow().timeline.is_static()
    }

    pub fn times(&self) -> Vec<f64> {
        self.state.borrow().timeline.times().to_vec()
    }

    pub fn duration(&self) -> f64 {
        self.state.borrow().timeline.duration()
    }

    pub fn total_width(&self) -> f64 {
        self.state.borrow().timeline.total_width()
    }

    /// Play-head position within the current loop.
    pub fn playhead(&self) -> f64 {
        let state = self.state.borrow();
        state.timeline.local_time(state.total_time)
    }

    pub fn total_time(&self) -> f64 {
        self.state.borrow().total_time
    }

    /// Measures again right away instead of waiting for the next resize frame.
    pub fn remeasure(&self) {
        let mut state = self.state.borrow_mut();
        if !state.disposed {
            state.remeasure();
        }
    }

    /// Stops the strip and unregisters it. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(id) = self.ticker_id.take() {
            self.ticker.remove(id);
        }
        if let Some(id) = self.resize_id.take() {
            self.viewport.remove_listener(id);
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if !state.disposed {
                state.disposed = true;
                state.playing = false;
                state.jump = None;
                info!("marquee disposed");
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.ticker_id.is_none()
    }
}

impl Drop for Marquee {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Marquee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Marquee")
            .field("items", &state.timeline.len())
            .field("total_time", &state.total_time)
            .field("rate", &state.rate())
            .field("playing", &state.playing)
            .field("disposed", &state.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::measure::ElementMetrics;
    use std::cell::Cell;

    /// Stands in for the DOM: reports layout plus the transforms written so far.
    #[derive(Clone, Default)]
    struct Strip {
        layout: Rc<RefCell<Vec<ElementMetrics>>>,
        x_percent: Rc<RefCell<Vec<f64>>>,
        writes: Rc<Cell<usize>>,
    }

    impl Strip {
        fn even(count: usize, width: f64, gap: f64) -> Self {
            let layout: Vec<_> = (0..count)
                .map(|i| ElementMetrics::new(i as f64 * (width + gap), width))
                .collect();
            Self {
                layout: Rc::new(RefCell::new(layout)),
                x_percent: Rc::new(RefCell::new(vec![0.0; count])),
                writes: Rc::new(Cell::new(0)),
            }
        }

        fn x(&self, index: usize) -> f64 {
            self.x_percent.borrow()[index]
        }
    }

    impl TrackSurface for Strip {
        fn measure(&self) -> Vec<ElementMetrics> {
            let x = self.x_percent.borrow();
            self.layout
                .borrow()
                .iter()
                .zip(x.iter())
                .map(|(m, x)| ElementMetrics {
                    x_percent: *x,
                    ..*m
                })
                .collect()
        }

        fn set_x_percent(&mut self, index: usize, x_percent: f64) {
            self.x_percent.borrow_mut()[index] = x_percent;
            self.writes.set(self.writes.get() + 1);
        }
    }

    fn settings(padding_right: f64) -> LoopSettings {
        LoopSettings {
            padding_right,
            ..LoopSettings::default()
        }
    }

    fn paused(padding_right: f64) -> LoopSettings {
        LoopSettings {
            paused: true,
            ..settings(padding_right)
        }
    }

    fn env() -> (Ticker, Viewport) {
        (Ticker::with_lag_smoothing(None), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn mount_writes_rest_transforms() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let marquee = Marquee::new(strip.clone(), settings(20.0), &ticker, &viewport);

        assert_eq!(strip.writes.get(), 5);
        assert_eq!(marquee.total_width(), 600.0);
        assert_eq!(marquee.duration(), 6.0);
        assert_eq!(ticker.len(), 1);
        assert_eq!(viewport.listener_count(), 1);
    }

    #[test]
    fn ticking_drifts_items_left() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let _marquee = Marquee::new(strip.clone(), settings(20.0), &ticker, &viewport);

        ticker.tick(0.5);
        assert_eq!(strip.x(2), -50.0);
        ticker.tick(0.5);
        assert_eq!(strip.x(2), -100.0);
    }

    #[test]
    fn reversed_strip_drifts_right_and_never_hits_zero() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let marquee = Marquee::new(
            strip.clone(),
            LoopSettings {
                reversed: true,
                ..settings(20.0)
            },
            &ticker,
            &viewport,
        );
        assert!(marquee.is_reversed());
        assert_eq!(marquee.time_scale(), -1.0);

        ticker.tick(0.5);
        assert_eq!(strip.x(2), 50.0);

        for _ in 0..2000 {
            ticker.tick(0.4);
            assert!(marquee.total_time() > 0.0);
        }
        assert!(marquee.is_playing());
    }

    #[test]
    fn reversing_twice_restores_direction_and_speed() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(3, 50.0, 0.0), settings(0.0), &ticker, &viewport);
        marquee.set_speed(2.5);
        marquee.reverse();
        assert_eq!(marquee.time_scale(), -2.5);
        marquee.reverse();
        assert_eq!(marquee.time_scale(), 2.5);
        assert!(!marquee.is_reversed());

        marquee.set_speed(-4.0);
        assert_eq!(marquee.time_scale(), 4.0);
    }

    #[test]
    fn every_flip_lifts_the_playhead_by_whole_loops() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(5, 100.0, 20.0), paused(20.0), &ticker, &viewport);
        let before = marquee.playhead();
        marquee.reverse();
        marquee.reverse();
        assert_eq!(marquee.total_time(), 2.0 * WRAP_CYCLES * 6.0);
        assert_eq!(marquee.playhead(), before);
    }

    #[test]
    fn finite_repeat_stops_at_the_end() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let marquee = Marquee::new(
            strip.clone(),
            LoopSettings {
                repeat: 0,
                ..settings(20.0)
            },
            &ticker,
            &viewport,
        );
        for _ in 0..20 {
            ticker.tick(0.4);
        }
        assert!(!marquee.is_playing());
        assert_eq!(marquee.total_time(), 6.0);

        let writes = strip.writes.get();
        ticker.tick(0.4);
        assert_eq!(strip.writes.get(), writes);
    }

    #[test]
    fn jump_to_current_is_zero_length() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(5, 100.0, 20.0), settings(20.0), &ticker, &viewport);
        let route = marquee.jump_to(0);
        assert!(route.is_noop());
        assert_eq!(route.delta_time, 0.0);
        assert!(!marquee.is_jumping());
    }

    #[test]
    fn next_lands_on_the_following_item() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let marquee = Marquee::new(strip.clone(), paused(20.0), &ticker, &viewport);

        let route = marquee.next();
        assert_eq!(route.to, 1);
        assert!(marquee.is_jumping());
        assert_eq!(marquee.current(), 0, "index commits when the jump lands");

        ticker.tick(0.6);
        ticker.tick(0.6);
        assert!(!marquee.is_jumping());
        assert_eq!(marquee.current(), 1);
        assert!((marquee.playhead() - 1.2).abs() < 1e-9);
        assert_eq!(strip.x(1), -120.0);
        assert!(!marquee.is_playing(), "stays paused");
    }

    #[test]
    fn previous_from_zero_crosses_the_seam_backwards() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(5, 100.0, 20.0), paused(20.0), &ticker, &viewport);
        let route = marquee.previous();
        assert_eq!(route.to, 4);
        assert!((route.delta_time + 1.2).abs() < 1e-9);

        ticker.tick(2.0);
        assert_eq!(marquee.current(), 4);
        assert!((marquee.playhead() - 4.8).abs() < 1e-9);
        assert!(marquee.total_time() > 0.0);
    }

    #[test]
    fn chained_jumps_start_from_the_pending_target() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(5, 100.0, 20.0), paused(20.0), &ticker, &viewport);
        marquee.next();
        ticker.tick(0.3);
        let second = marquee.next();
        assert_eq!((second.from, second.to), (1, 2));

        ticker.tick(5.0);
        assert_eq!(marquee.current(), 2);
        assert!((marquee.playhead() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn playing_strip_resumes_after_a_jump() {
        let (ticker, viewport) = env();
        let marquee = Marquee::new(Strip::even(5, 100.0, 20.0), settings(20.0), &ticker, &viewport);
        marquee.jump_to_with(
            2,
            JumpOptions {
                duration: Some(0.25),
                ease: Ease::ExpoOut,
            },
        );
        assert!(!marquee.is_playing());
        ticker.tick(0.25);
        assert!(marquee.is_playing());
        assert_eq!(marquee.current(), 2);

        ticker.tick(0.1);
        assert!((marquee.playhead() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn hidden_or_paused_strips_write_nothing() {
        let (ticker, viewport) = env();
        let strip = Strip::even(4, 60.0, 10.0);
        let marquee = Marquee::new(strip.clone(), settings(10.0), &ticker, &viewport);
        let writes = strip.writes.get();

        marquee.set_visible(false);
        ticker.tick(0.1);
        assert_eq!(strip.writes.get(), writes);

        marquee.set_visible(true);
        marquee.pause();
        ticker.tick(0.1);
        assert_eq!(strip.writes.get(), writes);

        marquee.play();
        ticker.tick(0.1);
        assert_eq!(strip.writes.get(), writes + 4);
    }

    #[test]
    fn dispose_unregisters_and_stops_writing() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let mut marquee = Marquee::new(strip.clone(), settings(20.0), &ticker, &viewport);
        ticker.tick(0.1);

        marquee.dispose();
        marquee.dispose();
        assert!(marquee.is_disposed());
        assert!(ticker.is_empty());
        assert_eq!(viewport.listener_count(), 0);

        let writes = strip.writes.get();
        let snapshot = strip.x_percent.borrow().clone();
        ticker.tick(0.1);
        viewport.resize(1024.0, 600.0);
        ticker.tick(0.1);
        assert_eq!(strip.writes.get(), writes);
        assert_eq!(*strip.x_percent.borrow(), snapshot);
        assert!(marquee.jump_to(3).is_noop());
    }

    #[test]
    fn drop_disposes() {
        let (ticker, viewport) = env();
        {
            let _marquee =
                Marquee::new(Strip::even(3, 10.0, 0.0), settings(0.0), &ticker, &viewport);
            assert_eq!(ticker.len(), 1);
        }
        assert!(ticker.is_empty());
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn instances_share_only_the_ticker() {
        let (ticker, viewport) = env();
        let first = Strip::even(3, 50.0, 0.0);
        let second = Strip::even(3, 50.0, 0.0);
        let mut a = Marquee::new(first.clone(), settings(0.0), &ticker, &viewport);
        let _b = Marquee::new(second.clone(), settings(0.0), &ticker, &viewport);

        a.dispose();
        ticker.tick(0.25);
        assert_eq!(first.x(1), 0.0);
        assert_eq!(second.x(1), -50.0);
    }

    #[test]
    fn resize_remeasures_on_the_next_frame() {
        let (ticker, viewport) = env();
        let strip = Strip::even(4, 100.0, 0.0);
        let marquee = Marquee::new(strip.clone(), paused(0.0), &ticker, &viewport);
        assert_eq!(marquee.total_width(), 400.0);

        *strip.layout.borrow_mut() = (0..4)
            .map(|i| ElementMetrics::new(i as f64 * 50.0, 50.0))
            .collect();
        viewport.resize(400.0, 600.0);
        assert_eq!(marquee.total_width(), 400.0, "waits for a frame");

        ticker.tick(0.016);
        assert_eq!(marquee.total_width(), 200.0);
        assert_eq!(marquee.duration(), 2.0);
    }

    #[test]
    fn remeasure_keeps_loop_progress() {
        let (ticker, viewport) = env();
        let strip = Strip::even(4, 100.0, 0.0);
        let marquee = Marquee::new(strip.clone(), settings(0.0), &ticker, &viewport);
        ticker.tick(1.0);
        assert!((marquee.playhead() - 1.0).abs() < 1e-9);

        *strip.layout.borrow_mut() = (0..4)
            .map(|i| ElementMetrics::new(i as f64 * 200.0, 200.0))
            .collect();
        marquee.remeasure();
        assert_eq!(marquee.duration(), 8.0);
        assert!((marquee.playhead() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_item_never_moves() {
        let (ticker, viewport) = env();
        let strip = Strip::even(1, 100.0, 0.0);
        let marquee = Marquee::new(strip.clone(), settings(20.0), &ticker, &viewport);
        assert!(marquee.is_static());
        ticker.tick(0.5);
        assert_eq!(strip.writes.get(), 1);
        assert!(marquee.next().is_noop());
    }

    #[test]
    fn stopped_strip_still_tracks_the_index() {
        let (ticker, viewport) = env();
        let strip = Strip::even(5, 100.0, 20.0);
        let still = LoopSettings {
            speed: 0.0,
            ..settings(20.0)
        };
        let marquee = Marquee::new(strip.clone(), still, &ticker, &viewport);
        assert!(marquee.is_static());

        let route = marquee.jump_to(2);
        assert!(route.is_noop());
        assert_eq!(route.to, 2);
        assert_eq!(marquee.current(), 2);
        assert!(!marquee.is_jumping());
        ticker.tick(0.5);
        assert_eq!(strip.writes.get(), 5);
    }

    #[test]
    fn empty_strip_is_a_no_op() {
        let (ticker, viewport) = env();
        let strip = Strip::even(0, 100.0, 0.0);
        let marquee = Marquee::new(strip.clone(), settings(0.0), &ticker, &viewport);
        assert!(marquee.is_empty());
        ticker.tick(0.5);
        assert_eq!(strip.writes.get(), 0);
        assert!(marquee.jump_to(2).is_noop());
    }
}
