use crate::{ChartFrame, StepDrag, DT_FORMAT};
use chrono::prelude::*;

pub const TITLE: &str = "Live Drag Plot";
pub const X_LABEL: &str = "Time Step";
pub const Y_LABEL: &str = "Drag";
pub const DRAG_LABEL: &str = "Drag";

/// about this many grid lines per axis
const GRID_LINES: usize = 10;

/// Everything one redraw of the window shows, rebuilt from the series at every update.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub npoints: usize,
    /// drag line cut at the y limits, a piece with a single point is drawn as a marker
    pub drag_pieces: Vec<Vec<[f64; 2]>>,
    pub steady_label: String,
    pub frame: ChartFrame,
    pub xgrid: Vec<f64>,
    pub ygrid: Vec<f64>,
    pub updated: String,
}

impl LiveChart {
    pub fn new(stepdrag: &StepDrag, steady_drag: f64) -> Option<LiveChart> {
        let frame = ChartFrame::new(stepdrag, steady_drag)?;
        let points: Vec<[f64; 2]> = stepdrag.points().map(|(s, d)| [s as f64, d]).collect();
        Some(LiveChart {
            title: TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            npoints: stepdrag.len(),
            drag_pieces: clip_to_range(&points, frame.ymin, frame.ymax),
            steady_label: format!("Steady Drag ({})", steady_drag),
            frame,
            xgrid: nice_ticks(frame.xmin, frame.xmax, GRID_LINES),
            ygrid: nice_ticks(frame.ymin, frame.ymax, GRID_LINES),
            updated: Local::now().format(DT_FORMAT).to_string(),
        })
    }
}

/// Cuts the polyline where it leaves [ymin, ymax].
/// The pieces end exactly on the limit they cross, non-finite values break the line.
pub fn clip_to_range(points: &[[f64; 2]], ymin: f64, ymax: f64) -> Vec<Vec<[f64; 2]>> {
    let mut pieces: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    if let Some(first) = points.first() {
        if first[1] >= ymin && first[1] <= ymax {
            current.push(*first);
        }
    }
    for w in points.windows(2) {
        let q = w[1];
        match clip_segment(w[0], q, ymin, ymax) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if !current.is_empty() {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.push(a);
                }
                current.push(b);
                if b != q {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            None => {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                if q[1] >= ymin && q[1] <= ymax {
                    current.push(q);
                }
            }
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn clip_segment(
    p: [f64; 2],
    q: [f64; 2],
    ymin: f64,
    ymax: f64,
) -> Option<([f64; 2], [f64; 2])> {
    let (y0, y1) = (p[1], q[1]);
    if !(y0.is_finite() && y1.is_finite()) {
        return None;
    }
    let dy = y1 - y0;
    if dy == 0. {
        if y0 < ymin || y0 > ymax {
            return None;
        }
        return Some((p, q));
    }
    let ta = (ymin - y0) / dy;
    let tb = (ymax - y0) / dy;
    let (tlo, ylo, thi, yhi) = if ta < tb {
        (ta, ymin, tb, ymax)
    } else {
        (tb, ymax, ta, ymin)
    };
    let t0 = tlo.max(0.);
    let t1 = thi.min(1.);
    if t0 > t1 {
        return None;
    }
    let x_at = |t: f64| p[0] + (q[0] - p[0]) * t;
    let a = if t0 > 0. { [x_at(t0), ylo] } else { p };
    let b = if t1 < 1. { [x_at(t1), yhi] } else { q };
    Some((a, b))
}

/// Grid positions on multiples of 1, 2 or 5 times a power of ten.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || target == 0 || !(max - min).is_finite() {
        return Vec::new();
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1., 2., 5.]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1. - 1e-9))
        .unwrap_or(10. * magnitude);
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}
