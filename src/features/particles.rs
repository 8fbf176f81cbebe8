//! Particle fields.
//!
//! Every item in a field rides its own repeating path from `y_start` to
//! `y_end`. Each path gets a random length and a random start offset when the
//! field is built, so the items drift independently. The whole field shares one
//! play-head that the host starts and stops as the field scrolls in and out of
//! view.

use crate::config::ParticleSettings;
use crate::gfx::anim::lerp;
use crate::gfx::draw::DrawContext;
use crate::ticker::{Frame, Ticker, TickerId};
use crate::viewport::{ListenerId, Viewport};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTransform {
    /// Horizontal travel in px, when the field moves items sideways.
    pub x: Option<f64>,
    pub y: f64,
    pub opacity: f64,
}

/// Where particle items live: reports how many there are and takes their transforms.
pub trait ParticleSurface {
    fn len(&self) -> usize;
    fn set_transform(&mut self, index: usize, transform: ParticleTransform);
}

fn draw_between(rng: &mut StdRng, [a, b]: [f64; 2]) -> f64 {
    let (lo, hi) = (a.min(b), a.max(b));
    if !lo.is_finite() || !hi.is_finite() {
        0.0
    } else if lo == hi {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// One item's pass, drawn once and replayed every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePath {
    /// Field time at which the first pass starts.
    pub offset: f64,
    pub duration: f64,
    pub y: (f64, f64),
    pub x: Option<(f64, f64)>,
}

impl ParticlePath {
    pub fn random(settings: &ParticleSettings, rng: &mut StdRng) -> Self {
        Self {
            offset: draw_between(rng, settings.offset).max(0.0),
            duration: draw_between(rng, settings.duration).max(0.0),
            y: (settings.y_start, settings.y_end),
            x: settings.x_start.zip(settings.x_end),
        }
    }

    /// One pass: the travel, or the fade-in when that is longer.
    pub fn cycle(&self, settings: &ParticleSettings) -> f64 {
        self.duration.max(settings.fade_in_duration.max(0.0))
    }

    /// Field time at which a finite path stops. `None` when it repeats forever.
    pub fn end(&self, settings: &ParticleSettings) -> Option<f64> {
        (!settings.repeats_forever())
            .then(|| self.offset + self.cycle(settings) * (settings.repeat as f64 + 1.0))
    }

    /// The item's transform at field time `time`. Before its offset an item
    /// sits at the start of its path.
    pub fn sample(&self, settings: &ParticleSettings, time: f64) -> ParticleTransform {
        let cycle = self.cycle(settings);
        let local = time - self.offset;
        let t = if cycle <= 0.0 || local <= 0.0 {
            0.0
        } else if self.end(settings).is_some_and(|end| time >= end) {
            cycle
        } else {
            local.rem_euclid(cycle)
        };

        let progress = if self.duration > 0.0 {
            (t / self.duration).min(1.0)
        } else {
            1.0
        };
        let travel = settings.ease.apply(progress);

        let mut opacity = 1.0;
        let fade_in = settings.fade_in_duration;
        if fade_in > 0.0 {
            opacity *= settings.fade_in_ease.apply(t / fade_in);
        }
        let fade_out = settings.fade_out_duration;
        if fade_out > 0.0 {
            let start = cycle - fade_out;
            if t > start {
                opacity *= 1.0 - settings.fade_out_ease.apply((t - start) / fade_out);
            }
        }

        ParticleTransform {
            x: self.x.map(|(from, to)| lerp(from, to, travel)),
            y: lerp(self.y.0, self.y.1, travel),
            opacity,
        }
    }
}

struct FieldState {
    surface: Box<dyn ParticleSurface>,
    settings: ParticleSettings,
    paths: Vec<ParticlePath>,
    rng: StdRng,
    time: f64,
    time_scale: f64,
    playing: bool,
    needs_refresh: bool,
    destroyed: bool,
}

impl FieldState {
    fn new(surface: Box<dyn ParticleSurface>, settings: ParticleSettings, mut rng: StdRng) -> Self {
        let paths = (0..surface.len())
            .map(|_| ParticlePath::random(&settings, &mut rng))
            .collect();
        let time_scale = if settings.time_scale.is_finite() {
            settings.time_scale
        } else {
            1.0
        };
        Self {
            surface,
            settings,
            paths,
            rng,
            time: 0.0,
            time_scale,
            playing: false,
            needs_refresh: false,
            destroyed: false,
        }
    }

    fn end_time(&self) -> Option<f64> {
        self.paths
            .iter()
            .filter_map(|path| path.end(&self.settings))
            .reduce(f64::max)
    }

    /// Re-syncs the paths with the host's item count and repaints.
    fn refresh(&mut self) {
        self.needs_refresh = false;
        let count = self.surface.len();
        self.paths.truncate(count);
        while self.paths.len() < count {
            let path = ParticlePath::random(&self.settings, &mut self.rng);
            self.paths.push(path);
        }
        debug!("particle field refreshed with {} items", count);
        self.render();
    }

    fn advance(&mut self, dt: f64) {
        if self.destroyed {
            return;
        }
        if self.needs_refresh {
            self.refresh();
        }
        if !self.playing || self.paths.is_empty() {
            return;
        }

        let delta = dt * self.time_scale;
        let next = self.time + delta;
        let end = self.end_time().filter(|end| delta > 0.0 && next >= *end);
        if delta < 0.0 && next <= 0.0 {
            self.time = 0.0;
            self.playing = false;
            info!("particle field reached its start");
        } else if let Some(end) = end {
            self.time = end;
            self.playing = false;
            info!("particle field finished after {:.2}s", end);
        } else {
            self.time = next;
        }
        self.render();
    }

    fn render(&mut self) {
        let Self {
            surface,
            paths,
            settings,
            time,
            ..
        } = self;
        for (i, path) in paths.iter().enumerate() {
            surface.set_transform(i, path.sample(settings, *time));
        }
    }
}

/// A running particle field bound to one [`ParticleSurface`].
///
/// Registers with the ticker and the viewport on creation. A viewport resize
/// refreshes the field on the next frame. [`Particles::destroy`] (or drop)
/// removes both registrations.
pub struct Particles {
    state: Rc<RefCell<FieldState>>,
    ticker: Ticker,
    viewport: Viewport,
    ticker_id: Option<TickerId>,
    resize_id: Option<ListenerId>,
}

impl Particles {
    pub fn new(
        surface: impl ParticleSurface + 'static,
        settings: ParticleSettings,
        ticker: &Ticker,
        viewport: &Viewport,
    ) -> Self {
        Self::with_rng(surface, settings, ticker, viewport, StdRng::from_entropy())
    }

    /// Like [`Particles::new`] with a caller-supplied random source.
    pub fn with_rng(
        surface: impl ParticleSurface + 'static,
        settings: ParticleSettings,
        ticker: &Ticker,
        viewport: &Viewport,
        rng: StdRng,
    ) -> Self {
        let mut state = FieldState::new(Box::new(surface), settings, rng);
        // An observable field waits for `set_visible(true)`.
        state.playing = !state.settings.observable;
        let seek = state.settings.initial_seek;
        if state.settings.repeats_forever() && seek.is_finite() {
            state.time = seek.max(0.0);
        }
        state.render();
        info!(
            "particle field built: {} items at {:.2}s",
            state.paths.len(),
            state.time
        );

        let state = Rc::new(RefCell::new(state));

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
                    state.needs_refresh = true;
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

    pub fn start(&self) {
        let mut state = self.state.borrow_mut();
        if !state.destroyed {
            state.playing = true;
        }
    }

    pub fn stop(&self) {
        self.state.borrow_mut().playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Start/stop hook for whatever watches the field's visibility.
    pub fn set_visible(&self, visible: bool) {
        if !visible {
            self.stop();
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        if state.settings.refresh_on_visible {
            state.refresh();
        }
        state.playing = true;
    }

    /// Signed playback rate; negative runs the field backwards.
    pub fn set_time_scale(&self, scale: f64) {
        if scale.is_finite() {
            self.state.borrow_mut().time_scale = scale;
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.state.borrow().time_scale
    }

    pub fn is_reversed(&self) -> bool {
        self.time_scale() < 0.0
    }

    /// Flips the rate's sign when it does not match `reversed`.
    pub fn set_reversed(&self, reversed: bool) -> bool {
        let mut state = self.state.borrow_mut();
        if reversed != (state.time_scale < 0.0) {
            state.time_scale = -state.time_scale;
        }
        state.time_scale < 0.0
    }

    pub fn time(&self) -> f64 {
        self.state.borrow().time
    }

    pub fn seek(&self, time: f64) {
        let mut state = self.state.borrow_mut();
        if !state.destroyed && time.is_finite() {
            state.time = time.max(0.0);
            state.render();
        }
    }

    pub fn paths(&self) -> Vec<ParticlePath> {
        self.state.borrow().paths.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn refresh(&self) {
        let mut state = self.state.borrow_mut();
        if !state.destroyed {
            state.refresh();
        }
    }

    /// Stops the field, drops its paths and unregisters it. Safe to call more than once.
    pub fn destroy(&mut self) {
        if let Some(id) = self.ticker_id.take() {
            self.ticker.remove(id);
        }
        if let Some(id) = self.resize_id.take() {
            self.viewport.remove_listener(id);
        }
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if !state.destroyed {
                state.destroyed = true;
                state.playing = false;
                state.paths.clear();
                info!("particle field destroyed");
            }
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.ticker_id.is_none()
    }
}

impl Drop for Particles {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Particles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Particles")
            .field("items", &state.paths.len())
            .field("time", &state.time)
            .field("time_scale", &state.time_scale)
            .field("playing", &state.playing)
            .finish()
    }
}

struct FieldLayout {
    columns: usize,
    cell_px: f64,
    transforms: Vec<ParticleTransform>,
}

/// Terminal host for a particle field: items are spread evenly across the
/// width and drawn as dots, brighter ones as stars.
#[derive(Clone)]
pub struct ParticleField {
    layout: Rc<RefCell<FieldLayout>>,
    rows: usize,
}

impl ParticleField {
    pub fn new(count: usize, columns: usize, rows: usize, cell_px: f64) -> Self {
        let hidden = ParticleTransform {
            x: None,
            y: 0.0,
            opacity: 0.0,
        };
        Self {
            layout: Rc::new(RefCell::new(FieldLayout {
                columns,
                cell_px,
                transforms: vec![hidden; count],
            })),
            rows,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_columns(&self, columns: usize) {
        self.layout.borrow_mut().columns = columns;
    }

    pub fn draw(&self, draw: &mut DrawContext, first_row: usize) {
        let layout = self.layout.borrow();
        let count = layout.transforms.len();
        if layout.cell_px <= 0.0 || count == 0 {
            return;
        }
        for (i, transform) in layout.transforms.iter().enumerate() {
            if transform.opacity < 0.05 {
                continue;
            }
            let row = (transform.y / layout.cell_px).floor();
            if !(row >= 0.0 && row < self.rows as f64) {
                continue;
            }
            let home = ((i as f64 + 0.5) * layout.columns as f64 / count as f64).floor();
            let col = home + transform.x.unwrap_or(0.0) / layout.cell_px;
            let glyph = if transform.opacity >= 0.5 { "*" } else { "." };
            draw.text(col.floor(), first_row + row as usize, glyph);
        }
    }
}

impl ParticleSurface for ParticleField {
    fn len(&self) -> usize {
        self.layout.borrow().transforms.len()
    }

    fn set_transform(&mut self, index: usize, transform: ParticleTransform) {
        if let Some(slot) = self.layout.borrow_mut().transforms.get_mut(index) {
            *slot = transform;
        }
    }
}
