use crate::config::Config;
use crate::features::capabilities::{CapabilityTable, NodeSnapshot};
use crate::features::catalog::CatalogRow;
use crate::features::cursor::{Cursor, CursorFrame};
use crate::features::particles::{ParticleField, Particles};
use crate::gfx::{draw::DrawContext, math::Vec2};
use crate::ticker::{Frame, LagSmoothing, Ticker, TickerId};
use crate::track::Marquee;
use crate::viewport::Viewport;
use log::info;
use std::cell::RefCell;
use std::rc::Rc;

const SPEED_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Reverse,
    TogglePause,
    FocusUp,
    FocusDown,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    PointerEnter,
    PointerLeave,
    PointerMove { pos: Vec2 },
    Scroll { delta: f64 },
    Key(Command),
    Resize { width: f64, height: f64 },
    /// The host's marked-up nodes after a DOM change.
    Mutation(Vec<NodeSnapshot>),
    /// A row scrolled into or out of view.
    Visibility { row: usize, visible: bool },
    /// The particle field scrolled into or out of view.
    ParticleVisibility { visible: bool },
}

pub struct App {
    pub config: Config,
    pub ticker: Ticker,
    pub viewport: Viewport,
    pub rows: Vec<CatalogRow>,
    pub marquees: Vec<Marquee>,
    pub cursor: Rc<RefCell<Cursor>>,
    pub capabilities: CapabilityTable,
    pub field: Option<ParticleField>,
    pub particles: Option<Particles>,
    pub focused_row: usize,
    /// Canvas width in cells; follows terminal resizes.
    pub columns: usize,
    pub time: f64,
    cursor_tick: Option<TickerId>,
    draw: DrawContext,
}

impl App {
    pub fn new(config: Config) -> Self {
        let lag = LagSmoothing {
            threshold: config.lag_smoothing.threshold,
            adjusted: config.lag_smoothing.adjusted,
        };
        let ticker = Ticker::with_lag_smoothing(Some(lag));
        let field_rows = if config.particles.count > 0 {
            config.particles.rows
        } else {
            0
        };
        let viewport = Viewport::new(
            config.columns as f64 * config.cell_px,
            (config.rows.len() + field_rows) as f64 * config.cell_px,
        );

        let mut rows = Vec::with_capacity(config.rows.len());
        let mut marquees = Vec::with_capacity(config.rows.len());
        for row_config in &config.rows {
            let row = CatalogRow::new(row_config.items.clone(), row_config.gap, config.cell_px);
            // The gap after the last item doubles as the loop padding.
            let mut motion = row_config.motion.clone();
            motion.padding_right = row.gap_px();
            marquees.push(Marquee::new(row.clone(), motion, &ticker, &viewport));
            rows.push(row);
        }

        let cursor = Rc::new(RefCell::new(Cursor::new(config.cursor.clone())));
        let handle = Rc::clone(&cursor);
        let cursor_tick = ticker.add(move |frame: &Frame| {
            if let Ok(mut cursor) = handle.try_borrow_mut() {
                cursor.update(frame.delta);
            }
        });

        let (field, particles) = if field_rows > 0 {
            let field = ParticleField::new(
                config.particles.count,
                config.columns,
                field_rows,
                config.cell_px,
            );
            let particles =
                Particles::new(field.clone(), config.particles.clone(), &ticker, &viewport);
            // The field starts on screen.
            particles.set_visible(true);
            (Some(field), Some(particles))
        } else {
            (None, None)
        };

        info!("app ready with {} rows", rows.len());
        let columns = config.columns;
        Self {
            config,
            ticker,
            viewport,
            rows,
            marquees,
            cursor,
            capabilities: CapabilityTable::new(),
            field,
            particles,
            focused_row: 0,
            columns,
            time: 0.0,
            cursor_tick: Some(cursor_tick),
            draw: DrawContext::new(),
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PointerEnter => self.cursor.borrow_mut().pointer_entered_window(),
            UiEvent::PointerLeave => self.cursor.borrow_mut().pointer_left_window(),
            UiEvent::PointerMove { pos } => {
                self.cursor
                    .borrow_mut()
                    .pointer_move(pos, &self.capabilities);
            }
            UiEvent::Scroll { delta } => {
                // Scroll changes the focused row's speed
                if let Some(marquee) = self.marquees.get(self.focused_row) {
                    let speed = if delta > 0.0 {
                        marquee.speed() + SPEED_STEP
                    } else if delta < 0.0 {
                        (marquee.speed() - SPEED_STEP).max(SPEED_STEP)
                    } else {
                        marquee.speed()
                    };
                    marquee.set_speed(speed);
                    info!("row {} speed now {:.2}", self.focused_row, speed);
                }
            }
            UiEvent::Key(command) => self.run(command),
            UiEvent::Resize { width, height } => self.resize(width, height),
            UiEvent::Mutation(nodes) => {
                let changes = self.capabilities.sync(&nodes);
                if !changes.is_empty() {
                    info!("cursor capabilities changed: {} updates", changes.len());
                }
                self.cursor.borrow_mut().sync(&self.capabilities);
            }
            UiEvent::Visibility { row, visible } => {
                if let Some(marquee) = self.marquees.get(row) {
                    marquee.set_visible(visible);
                }
            }
            UiEvent::ParticleVisibility { visible } => {
                if let Some(particles) = &self.particles {
                    particles.set_visible(visible);
                }
            }
        }
    }

    /// Follows a new window size. Rows that no longer fit stop animating.
    fn resize(&mut self, width: f64, height: f64) {
        let cell_px = self.config.cell_px;
        if cell_px > 0.0 && width.is_finite() && width > 0.0 {
            self.columns = ((width / cell_px).floor() as usize).max(1);
            if let Some(field) = &self.field {
                field.set_columns(self.columns);
            }
        }
        self.viewport.resize(width, height);

        if !(cell_px > 0.0 && height.is_finite()) {
            return;
        }
        let visible_rows = (height / cell_px).floor().max(0.0) as usize;
        for (i, marquee) in self.marquees.iter().enumerate() {
            marquee.set_visible(i < visible_rows);
        }
        if let Some(particles) = &self.particles {
            let visible = self.rows.len() < visible_rows;
            if visible != particles.is_playing() {
                particles.set_visible(visible);
            }
        }
    }

    fn run(&mut self, command: Command) {
        let count = self.marquees.len();
        if count == 0 {
            return;
        }
        let marquee = &self.marquees[self.focused_row.min(count - 1)];
        match command {
            Command::Next => {
                marquee.next();
            }
            Command::Previous => {
                marquee.previous();
            }
            Command::Reverse => marquee.reverse(),
            Command::TogglePause => {
                if marquee.is_playing() || marquee.is_jumping() {
                    marquee.pause();
                } else {
                    marquee.play();
                }
            }
            Command::FocusUp => {
                self.focused_row = if self.focused_row == 0 {
                    count - 1
                } else {
                    self.focused_row - 1
                };
            }
            Command::FocusDown => self.focused_row = (self.focused_row + 1) % count,
        }
    }

    pub fn update(&mut self, dt: f64) -> Frame {
        let frame = self.ticker.tick(dt);
        self.time = frame.time;
        frame
    }

    pub fn finished(&self) -> bool {
        self.config.run_seconds > 0.0 && self.time >= self.config.run_seconds
    }

    pub fn cursor_frame(&self) -> CursorFrame {
        self.cursor.borrow().frame()
    }

    pub fn render(&mut self) -> String {
        let field_rows = self.field.as_ref().map_or(0, ParticleField::rows);
        self.draw.begin([self.columns, self.rows.len() + field_rows]);
        for (i, row) in self.rows.iter().enumerate() {
            row.draw(&mut self.draw, i);
        }
        if let Some(field) = &self.field {
            field.draw(&mut self.draw, self.rows.len());
        }
        self.draw.flush()
    }

    pub fn shutdown(&mut self) {
        for marquee in &mut self.marquees {
            marquee.dispose();
        }
        if let Some(particles) = &mut self.particles {
            particles.destroy();
        }
        if let Some(id) = self.cursor_tick.take() {
            self.ticker.remove(id);
        }
        info!("app shut down");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
