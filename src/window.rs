use crate::chart::{LiveChart, DRAG_LABEL, TITLE};
use crate::monitor::Poller;
use crate::MonitorError;
use egui::Color32;
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotBounds, Points, VLine};
use log::error;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const DRAG_COLOR: Color32 = Color32::from_rgb(0, 122, 204);
const STEADY_COLOR: Color32 = Color32::from_rgb(255, 102, 0);
// grey at 60% opacity
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(77, 77, 77, 153);

/// The live drag window: polls on its interval and redraws the last chart.
pub struct LiveApp {
    poller: Poller,
    chart: Option<LiveChart>,
    status: String,
    gave_up: Rc<RefCell<Option<MonitorError>>>,
}

impl LiveApp {
    pub fn new(poller: Poller, gave_up: Rc<RefCell<Option<MonitorError>>>) -> Self {
        LiveApp {
            poller,
            chart: None,
            status: String::from("waiting for data..."),
            gave_up,
        }
    }

    fn update_chart(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if !self.poller.is_due(now) {
            return;
        }
        match self.poller.poll(now) {
            Ok(Some(chart)) => {
                self.status = format!("{} points, updated {}", chart.npoints, chart.updated);
                self.chart = Some(chart);
            }
            Ok(None) => {}
            Err(e @ MonitorError::TooManyFailures { .. }) => {
                error!("{}", e);
                *self.gave_up.borrow_mut() = Some(e);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Err(e) => {
                error!("error reading file: {}", e);
                self.status = format!("error reading file: {}", e);
            }
        }
    }
}

impl eframe::App for LiveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_chart(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| match &self.chart {
            Some(chart) => draw_chart(ui, chart),
            None => {
                ui.heading(TITLE);
            }
        });

        ctx.request_repaint_after(self.poller.until_due(Instant::now()));
    }
}

/// Draws the drag line, the dashed steady drag, the dashed grid,
/// always on y in [0, 0.02].
fn draw_chart(ui: &mut egui::Ui, chart: &LiveChart) {
    ui.heading(&chart.title);
    let frame = chart.frame;
    Plot::new("live_drag")
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .legend(Legend::default())
        .show_grid(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [frame.xmin, frame.ymin],
                [frame.xmax, frame.ymax],
            ));
            for x in &chart.xgrid {
                plot_ui.vline(
                    VLine::new(*x)
                        .color(GRID_COLOR)
                        .width(1.0)
                        .style(LineStyle::dashed_dense()),
                );
            }
            for y in &chart.ygrid {
                plot_ui.hline(
                    HLine::new(*y)
                        .color(GRID_COLOR)
                        .width(1.0)
                        .style(LineStyle::dashed_dense()),
                );
            }
            for piece in &chart.drag_pieces {
                if piece.len() == 1 {
                    plot_ui.points(
                        Points::new(piece.clone())
                            .color(DRAG_COLOR)
                            .radius(3.0)
                            .name(DRAG_LABEL),
                    );
                } else {
                    plot_ui.line(
                        Line::new(piece.clone())
                            .color(DRAG_COLOR)
                            .width(2.0)
                            .name(DRAG_LABEL),
                    );
                }
            }
            plot_ui.hline(
                HLine::new(frame.steady_drag)
                    .color(STEADY_COLOR)
                    .width(2.0)
                    .style(LineStyle::dashed_loose())
                    .name(&chart.steady_label),
            );
        });
}

/// Opens the window and keeps it updating until it is closed.
pub fn run_window(poller: Poller) -> Result<(), MonitorError> {
    let gave_up = Rc::new(RefCell::new(None));
    let app = LiveApp::new(poller, Rc::clone(&gave_up));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([1200.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(TITLE, native_options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| MonitorError::Window(e.to_string()))?;
    let outcome = gave_up.borrow_mut().take();
    match outcome {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
