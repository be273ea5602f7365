pub mod chart;
pub mod error;
pub mod live;
pub mod monitor;
pub mod window;

pub use error::MonitorError;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fluent report file written by the drag monitor of the solver.
pub const DRAG_FILENAME: &str = "drag-rfile.out";
pub const DEFAULT_DIRECTORY: &str =
    r"E:\Projects\Cav_Design_haack_Geom\Cav_hack_series_files\dp0\FFF-10\Fluent";

pub const STEADY_DRAG: f64 = 0.0026;
pub const DRAG_YMIN: f64 = 0.0;
pub const DRAG_YMAX: f64 = 0.02;

pub const DEFAULT_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_MIN_LINES: usize = 3;

/// The drag time series, one entry per solver time step
#[derive(Debug, Clone, PartialEq)]
pub struct StepDrag {
    pub step: Vec<u64>,
    pub drag: Vec<f64>,
}

impl StepDrag {
    pub fn new(capacity: usize) -> StepDrag {
        StepDrag {
            step: Vec::with_capacity(capacity),
            drag: Vec::with_capacity(capacity),
        }
    }

    /// Init a StepDrag from the lines of a report file.
    /// Headers, blank lines and rows that do not convert are skipped silently,
    /// the remaining rows keep the file order.
    pub fn from_lines<'a, I>(lines: I) -> StepDrag
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines = lines.into_iter();
        let mut stepdrag = StepDrag::new(lines.size_hint().0);
        for (s, d) in lines.filter_map(parse_row) {
            stepdrag.step.push(s);
            stepdrag.drag.push(d);
        }
        stepdrag
    }

    pub fn len(&self) -> usize {
        self.step.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.step.iter().copied().zip(self.drag.iter().copied())
    }
}

impl std::fmt::Display for StepDrag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "time step, drag")?;
        for (s, d) in self.points() {
            writeln!(f, "{},{}", s, d)?
        }
        Ok(())
    }
}

/// A data row has at least two tokens and an all-digit first token.
/// Rows of that shape whose numbers do not convert are dropped too.
pub fn parse_row(line: &str) -> Option<(u64, f64)> {
    let mut tokens = line.split_whitespace();
    let step = tokens.next()?;
    let drag = tokens.next()?;
    if !step.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((step.parse().ok()?, drag.parse().ok()?))
}

/// Axis ranges and reference value of one redraw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub steady_drag: f64,
}

impl ChartFrame {
    /// x follows the current steps with a 5% margin, y is always [0, 0.02].
    /// A single step is widened by at least 1, relative for large steps.
    /// None for an empty series.
    pub fn new(stepdrag: &StepDrag, steady_drag: f64) -> Option<ChartFrame> {
        let (smin, smax) = min_and_max(&stepdrag.step[..])?;
        let (smin, smax) = (smin as f64, smax as f64);
        let (xmin, xmax) = if smin == smax {
            let pad = (smin.abs() * 1e-6).max(1.);
            (smin - pad, smax + pad)
        } else {
            let xmargin = (smax - smin) / 20.;
            (smin - xmargin, smax + xmargin)
        };
        Some(ChartFrame {
            xmin,
            xmax,
            ymin: DRAG_YMIN,
            ymax: DRAG_YMAX,
            steady_drag,
        })
    }
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut s_iter = s.iter();
    let first = *s_iter.next()?;
    let (mut min, mut max) = (first, first);
    for es in s_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_is_excluded() {
        let lines = vec!["1 0.001", "2 0.002", "abc x", "3 0.003"];
        let sd = StepDrag::from_lines(lines);
        assert_eq!(sd.step, vec![1, 2, 3]);
        assert_eq!(sd.drag, vec![0.001, 0.002, 0.003]);
    }

    #[test]
    fn test_row_shape() {
        assert_eq!(parse_row("12 0.0031"), Some((12, 0.0031)));
        assert_eq!(parse_row("  7\t0.5  extra cols "), Some((7, 0.5)));
        assert_eq!(parse_row("12"), None);
        assert_eq!(parse_row(""), None);
        assert_eq!(parse_row("   "), None);
        assert_eq!(parse_row("-3 0.1"), None);
        assert_eq!(parse_row("3.0 0.1"), None);
        assert_eq!(parse_row("\"Time Step\" \"drag\""), None);
        assert_eq!(parse_row("(\"Time Step\" \"drag-rfile\")"), None);
    }

    #[test]
    fn test_unconvertible_drag_is_dropped() {
        assert_eq!(parse_row("10 notanumber"), None);
        let sd = StepDrag::from_lines(vec!["9 0.004", "10 notanumber", "11 0.005"]);
        assert_eq!(sd.step, vec![9, 11]);
        assert_eq!(sd.drag, vec![0.004, 0.005]);
    }

    #[test]
    fn test_step_overflow_is_dropped() {
        assert_eq!(parse_row("99999999999999999999999 0.1"), None);
    }

    #[test]
    fn test_rows_keep_file_order_and_duplicates() {
        let sd = StepDrag::from_lines(vec!["3 0.3", "1 0.1", "3 0.3"]);
        assert_eq!(sd.step, vec![3, 1, 3]);
        assert_eq!(sd.len(), 3);
    }

    #[test]
    fn test_header_and_single_row() {
        let sd = StepDrag::from_lines(vec!["\"Drag Convergence History\"", "5 0.0021"]);
        assert_eq!(sd.points().collect::<Vec<_>>(), vec![(5, 0.0021)]);
        let frame = ChartFrame::new(&sd, STEADY_DRAG).unwrap();
        assert_eq!(frame.xmin, 4.);
        assert_eq!(frame.xmax, 6.);
        assert_eq!(frame.ymin, 0.);
        assert_eq!(frame.ymax, 0.02);
        assert_eq!(frame.steady_drag, 0.0026);
    }

    #[test]
    fn test_frame_margin() {
        let sd = StepDrag::from_lines(vec!["0 0.01", "100 0.002", "50 0.03"]);
        let frame = ChartFrame::new(&sd, STEADY_DRAG).unwrap();
        assert_eq!(frame.xmin, -5.);
        assert_eq!(frame.xmax, 105.);
        assert_eq!(frame.ymax, DRAG_YMAX);
    }

    #[test]
    fn test_frame_of_single_large_step() {
        let sd = StepDrag::from_lines(vec!["100000000000000000 0.002"]);
        let frame = ChartFrame::new(&sd, STEADY_DRAG).unwrap();
        assert!(frame.xmin < frame.xmax);
        assert!(frame.xmin < 1e17 && 1e17 < frame.xmax);
    }

    #[test]
    fn test_frame_of_empty_series() {
        assert_eq!(ChartFrame::new(&StepDrag::new(0), STEADY_DRAG), None);
    }

    #[test]
    fn test_min_and_max() {
        assert_eq!(min_and_max(&[3, 9, 1, 4]), Some((1, 9)));
        assert_eq!(min_and_max::<f64>(&[]), None);
    }

    #[test]
    fn test_display() {
        let sd = StepDrag::from_lines(vec!["1 0.5", "2 0.25"]);
        assert_eq!(sd.to_string(), "time step, drag\n1,0.5\n2,0.25\n");
    }
}
