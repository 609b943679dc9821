use eframe::egui;
use eframe::egui::{Color32, ScrollArea, Ui};
use eframe::run_native;
use life::{CallbackResult, Frame, Observer, Session, SessionConfig};

const WORLD_SIZE: usize = 500;
const CELL_SIZE: f32 = 2.0;
// Below this many pixels a cell is drawn as a plain square.
const MIN_ROUND_CELL_SIZE: f32 = 3.0;
const DEFAULT_DENSITY_PERCENT: f64 = 25.0;
const CELL_COLOR: Color32 = Color32::GREEN;
const BACKGROUND_COLOR: Color32 = Color32::BLACK;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let session = Session::new(SessionConfig::new(
        WORLD_SIZE,
        DEFAULT_DENSITY_PERCENT / 100.0,
    ))?;

    run_native(
        "Game of Life GUI",
        eframe::NativeOptions::default(),
        Box::new(move |cc| Ok(Box::new(GuiOfLife::new(cc, session)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}

/// What the sampler last handed us.
#[derive(Default)]
struct WorldView {
    size: usize,
    alive: Vec<(usize, usize)>,
    generation: u64,
    population: usize,
}

impl Observer for WorldView {
    fn on_generation(&mut self, frame: &Frame) -> CallbackResult {
        self.size = frame.size();
        self.alive.clear();
        self.alive.extend(frame.alive_cells());
        self.generation = frame.generation();
        self.population = frame.population();
        Ok(())
    }

    fn on_cycle_detected(&mut self) -> CallbackResult {
        log::info!("world is repeating at generation {}, stopped", self.generation);
        Ok(())
    }
}

struct GuiOfLife {
    session: Session,
    view: WorldView,
    density_percent: f64,
    running: bool,
    fit: bool,
    error: Option<String>,
}

impl GuiOfLife {
    fn new(_cc: &eframe::CreationContext<'_>, session: Session) -> Self {
        Self {
            session,
            view: WorldView::default(),
            density_percent: DEFAULT_DENSITY_PERCENT,
            running: false,
            fit: false,
            error: None,
        }
    }

    fn report(&mut self, result: life::error::Result<()>) {
        if let Err(err) = result {
            log::error!("{err}");
            self.error = Some(err.to_string());
        }
    }

    fn toggle_run(&mut self) {
        let result = if self.running {
            self.session.resume()
        } else {
            self.session.stop().map(|outcome| {
                if let Some(outcome) = outcome {
                    log::info!("stopped at generation {}", outcome.generation);
                }
            })
        };
        self.report(result);
    }

    fn reset(&mut self) {
        let config = SessionConfig {
            density: self.density_percent / 100.0,
            seed: None,
            ..self.session.config().clone()
        };
        let result = self.session.reset(config);
        self.error = None;
        self.report(result);
    }

    fn controls(&mut self, ui: &mut Ui) {
        ui.heading("Game of Life");
        ui.horizontal(|ui| {
            let label = if self.running { "Stop" } else { "Start" };
            if ui.toggle_value(&mut self.running, label).changed() {
                self.toggle_run();
            }
            if ui.add_enabled(!self.running, egui::Button::new("Reset")).clicked() {
                self.reset();
            }
            ui.add(
                egui::Slider::new(&mut self.density_percent, 0.0..=100.0)
                    .text("Density")
                    .suffix("%"),
            );
            ui.checkbox(&mut self.fit, "Fit");
        });
        ui.horizontal(|ui| {
            ui.label(format!("Generation: {}", self.view.generation));
            ui.separator();
            ui.label(format!("Population: {}", self.view.population));
        });
        if let Some(error) = &self.error {
            ui.colored_label(Color32::RED, error);
        }
    }

    fn draw_world(&self, ui: &mut Ui) {
        let size = self.view.size.max(1) as f32;
        let cell_size = if self.fit {
            let available = ui.available_size();
            available.x.min(available.y) / size
        } else {
            CELL_SIZE
        };

        let side = cell_size * size;
        let (response, painter) = ui.allocate_painter(egui::vec2(side, side), egui::Sense::hover());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, BACKGROUND_COLOR);

        let cell = egui::vec2(cell_size, cell_size);
        for &(row, col) in &self.view.alive {
            let pos = origin + egui::vec2(col as f32 * cell_size, row as f32 * cell_size);
            if cell_size < MIN_ROUND_CELL_SIZE {
                painter.rect_filled(egui::Rect::from_min_size(pos, cell), 0.0, CELL_COLOR);
            } else {
                painter.circle_filled(pos + cell / 2.0, cell_size / 2.0, CELL_COLOR);
            }
        }
    }
}

impl eframe::App for GuiOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Each repaint is one tick of the display sampler.
        let sampled = self.session.sample(&mut self.view).map(|_| ());
        self.report(sampled);
        self.running = self.session.is_running();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.fit {
                self.draw_world(ui);
            } else {
                ScrollArea::both().show(ui, |ui| self.draw_world(ui));
            }
        });

        if self.session.needs_redraw() {
            ctx.request_repaint();
        }
    }
}
