//! Windowed spatiotemporal autocorrelation histogram.
//!
//! For every logged step `j` far enough from its run's edges, and every
//! signed lag `i` in `[-W, W]`, the pass bins the displacement between
//! step `j` and step `j + i` against the lag. Lags are rescaled by the
//! momentum so that ballistic walks land on the diagonal.
//!
//! ```text
//! scale   = max(0.2, |m.x|, |m.y|)
//! max_lag = ceil(W * scale)
//! nt      = 2 * max_lag + 1
//! hist[axis][max_lag + dpos][max_lag + round(i * scale)] += 1
//! ```
//!
//! Indices that fall outside `[0, nt)` saturate at the nearest edge bin.
//! Only rows `j` in `[W, steps_per_run - W)` are used as centers, so a
//! lag window never crosses into a neighbouring run's rows.

use log::{debug, info};
use smatrix_core::{Axis, WalkParams};

use crate::log_table::LogTable;
use crate::stop::StopHandle;

/// Fraction of the peak bin suggested as a renderer's colour ceiling.
const DISPLAY_MAX_FRACTION: f32 = 0.8;

/// Histogram of position deltas versus scaled time lag.
///
/// Shape `[2, nt, nt]`: axis plane, spatial delta bin, lag bin.
#[derive(Clone, Debug, PartialEq)]
pub struct AutocorrHistogram {
    max_lag: usize,
    bins: usize,
    counts: Vec<f32>,
    peak: f32,
    runs_scanned: usize,
}

impl AutocorrHistogram {
    fn zeros(max_lag: usize) -> Self {
        let bins = 2 * max_lag + 1;
        Self {
            max_lag,
            bins,
            counts: vec![0.0; 2 * bins * bins],
            peak: 0.0,
            runs_scanned: 0,
        }
    }

    /// Scan the first `runs` runs of `log`.
    ///
    /// `stop` is polled after each run; when set, the histogram covers
    /// only the runs scanned so far. The result depends on nothing but
    /// the log and the parameters, so repeated calls agree.
    ///
    /// `params` should have passed [`WalkParams::validate`]. The
    /// half-width is clamped to [`WalkParams::MAX_HISTOGRAM_LAG`] either way.
    pub fn compute(log: &LogTable, params: &WalkParams, runs: usize, stop: &StopHandle) -> Self {
        let window = params.stat_window;
        let scale = params.initial_momentum.lag_scale();
        let max_lag = params.histogram_max_lag().min(WalkParams::MAX_HISTOGRAM_LAG);
        let mut hist = Self::zeros(max_lag);

        let origin = hist.max_lag as i64;
        let lag_bins: Vec<usize> = (-(window as i64)..=window as i64)
            .map(|i| hist.clip((i as f32 * scale).round() as i64 + origin))
            .collect();

        let steps = log.steps_per_run();
        for run in 0..runs.min(log.runs()) {
            let rows = log.run_rows(run);
            for j in window..steps.saturating_sub(window) {
                let center = rows[j];
                for (k, &lag_bin) in lag_bins.iter().enumerate() {
                    let other = rows[j + k - window];
                    let dx = hist.clip(origin + i64::from(other.pos_x - center.pos_x));
                    hist.bump(Axis::X, dx, lag_bin);
                    let dy = hist.clip(origin + i64::from(other.pos_y - center.pos_y));
                    hist.bump(Axis::Y, dy, lag_bin);
                }
            }
            hist.runs_scanned += 1;
            debug!("autocorrelation: scanned run {run}");
            if stop.is_requested() {
                break;
            }
        }

        info!(
            "autocorrelation pass done: {} runs, {} lag bins, peak {}",
            hist.runs_scanned, hist.bins, hist.peak
        );
        hist
    }

    fn clip(&self, bin: i64) -> usize {
        bin.clamp(0, (self.bins - 1) as i64) as usize
    }

    fn offset(&self, axis: Axis, delta_bin: usize, lag_bin: usize) -> usize {
        (axis.index() * self.bins + delta_bin) * self.bins + lag_bin
    }

    fn bump(&mut self, axis: Axis, delta_bin: usize, lag_bin: usize) {
        let i = self.offset(axis, delta_bin, lag_bin);
        self.counts[i] += 1.0;
        self.peak = self.peak.max(self.counts[i]);
    }

    /// `[2, nt, nt]`.
    pub fn shape(&self) -> [usize; 3] {
        [2, self.bins, self.bins]
    }

    /// Half-width of the binned range; bin `max_lag` means zero.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Count at `(axis, delta_bin, lag_bin)`, or `None` off the grid.
    pub fn get(&self, axis: Axis, delta_bin: usize, lag_bin: usize) -> Option<f32> {
        if delta_bin >= self.bins || lag_bin >= self.bins {
            return None;
        }
        Some(self.counts[self.offset(axis, delta_bin, lag_bin)])
    }

    /// Row-major `[nt, nt]` plane for one axis.
    pub fn plane(&self, axis: Axis) -> &[f32] {
        let len = self.bins * self.bins;
        let start = axis.index() * len;
        &self.counts[start..start + len]
    }

    /// Sum over both planes.
    pub fn total(&self) -> f64 {
        self.counts.iter().map(|&v| f64::from(v)).sum()
    }

    /// Largest single bin count.
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Suggested colour-scale ceiling for renderers.
    pub fn display_max(&self) -> f32 {
        DISPLAY_MAX_FRACTION * self.peak
    }

    /// Number of runs that contributed.
    pub fn runs_scanned(&self) -> usize {
        self.runs_scanned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_table::LogRow;
    use smatrix_core::Momentum;

    fn log_from(runs: &[Vec<(i32, i32)>]) -> LogTable {
        let steps = runs.first().map_or(0, Vec::len);
        let mut log = LogTable::new(runs.len(), steps);
        for (run, path) in runs.iter().enumerate() {
            for (t, &(x, y)) in path.iter().enumerate() {
                log.record(LogRow {
                    run,
                    time: t as u64,
                    pos_x: x,
                    pos_y: y,
                });
            }
        }
        log
    }

    fn params(window: usize, m: Momentum) -> WalkParams {
        WalkParams {
            stat_window: window,
            initial_momentum: m,
            ..WalkParams::default()
        }
    }

    #[test]
    fn max_lag_uses_floor_of_point_two() {
        let log = log_from(&[vec![(0, 0); 4]]);
        let stop = StopHandle::new();
        let h = AutocorrHistogram::compute(&log, &params(100, Momentum::default()), 1, &stop);
        assert_eq!(h.max_lag(), 20);
        let h = AutocorrHistogram::compute(&log, &params(7, Momentum::new(0.0, -0.5)), 1, &stop);
        assert_eq!(h.max_lag(), 4);
    }

    #[test]
    fn unvalidated_window_is_clamped() {
        let p = params(usize::MAX, Momentum::new(1.0, 0.0));
        let log = log_from(&[vec![(0, 0); 10]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        assert_eq!(h.max_lag(), WalkParams::MAX_HISTOGRAM_LAG);
        assert_eq!(h.total(), 0.0);
    }

    #[test]
    fn stationary_particle_concentrates_at_zero_delta() {
        let p = params(2, Momentum::default());
        let log = log_from(&[vec![(5, 5); 10]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());

        // scale 0.2 and max_lag 1: every lag in -2..=2 rounds into bin 1.
        assert_eq!(h.max_lag(), 1);
        assert_eq!(h.shape(), [2, 3, 3]);
        let hits = (5 * (10 - 2 * 2)) as f32;
        for axis in Axis::ALL {
            assert_eq!(h.get(axis, 1, 1), Some(hits));
            for delta in 0..3 {
                for lag in 0..3 {
                    if (delta, lag) != (1, 1) {
                        assert_eq!(h.get(axis, delta, lag), Some(0.0));
                    }
                }
            }
        }
        assert_eq!(h.peak(), hits);
        assert!((h.display_max() - 0.8 * hits).abs() < 1e-5);
    }

    #[test]
    fn moving_particle_spreads_over_lag_bins() {
        // scale 0.5, max_lag 1: lags -2..=2 map to bins 0, 0, 1, 2, 2
        // since halves round away from zero.
        let p = params(2, Momentum::new(0.0, -0.5));
        let log = log_from(&[vec![(3, 3); 6]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        assert_eq!(h.max_lag(), 1);
        assert_eq!(h.get(Axis::X, 1, 0), Some(4.0));
        assert_eq!(h.get(Axis::X, 1, 1), Some(2.0));
        assert_eq!(h.get(Axis::X, 1, 2), Some(4.0));
    }

    #[test]
    fn ballistic_walk_lands_on_diagonal() {
        // Unit drift on x with scale 1: delta equals lag.
        let p = params(3, Momentum::new(1.0, 0.0));
        let path: Vec<(i32, i32)> = (0..12).map(|t| (t, 0)).collect();
        let log = log_from(&[path]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());

        assert_eq!(h.max_lag(), 3);
        let centers = (12 - 6) as f32;
        for lag in 0..7 {
            assert_eq!(h.get(Axis::X, lag, lag), Some(centers));
            assert_eq!(h.get(Axis::Y, 3, lag), Some(centers));
        }
        assert_eq!(h.total(), f64::from(2.0 * 7.0 * centers));
    }

    #[test]
    fn large_deltas_saturate_at_edge_bins() {
        let p = params(1, Momentum::default());
        // max_lag = ceil(0.2) = 1, so any |delta| > 1 clips.
        let log = log_from(&[vec![(0, 0), (10, -10), (0, 0)]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        // Center j = 1 at (10, -10); lags -1 and +1 see (0, 0), all in lag bin 1.
        assert_eq!(h.get(Axis::X, 0, 1), Some(2.0));
        assert_eq!(h.get(Axis::X, 1, 1), Some(1.0));
        assert_eq!(h.get(Axis::Y, 2, 1), Some(2.0));
        assert_eq!(h.get(Axis::Y, 1, 1), Some(1.0));
        assert_eq!(h.total(), 6.0);
    }

    #[test]
    fn window_never_reads_across_runs() {
        let p = params(1, Momentum::default());
        // Two runs far apart; a crossing read would saturate an edge bin.
        let log = log_from(&[vec![(0, 0); 4], vec![(50, 50); 4]]);
        let h = AutocorrHistogram::compute(&log, &p, 2, &StopHandle::new());
        for axis in Axis::ALL {
            for lag in 0..3 {
                assert_eq!(h.get(axis, 0, lag), Some(0.0));
                assert_eq!(h.get(axis, 2, lag), Some(0.0));
            }
        }
        assert_eq!(h.runs_scanned(), 2);
    }

    #[test]
    fn short_runs_contribute_nothing() {
        let p = params(5, Momentum::default());
        let log = log_from(&[vec![(1, 1); 9]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        assert_eq!(h.total(), 0.0);
        assert_eq!(h.peak(), 0.0);
    }

    #[test]
    fn stop_limits_scan_to_first_run() {
        let p = params(1, Momentum::default());
        let log = log_from(&[vec![(0, 0); 5], vec![(0, 0); 5], vec![(0, 0); 5]]);
        let stop = StopHandle::new();
        stop.request();
        let h = AutocorrHistogram::compute(&log, &p, 3, &stop);
        assert_eq!(h.runs_scanned(), 1);
    }

    #[test]
    fn run_limit_is_respected() {
        let p = params(1, Momentum::default());
        let log = log_from(&[vec![(0, 0); 5], vec![(0, 0); 5]]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        assert_eq!(h.runs_scanned(), 1);
        let all = AutocorrHistogram::compute(&log, &p, 10, &StopHandle::new());
        assert_eq!(all.runs_scanned(), 2);
        assert_eq!(all.total(), 2.0 * h.total());
    }

    #[test]
    fn planes_partition_counts() {
        let p = params(2, Momentum::new(0.5, 0.5));
        let path: Vec<(i32, i32)> = (0..20).map(|t| (t / 2, t % 3)).collect();
        let log = log_from(&[path]);
        let h = AutocorrHistogram::compute(&log, &p, 1, &StopHandle::new());
        let x: f64 = h.plane(Axis::X).iter().map(|&v| f64::from(v)).sum();
        let y: f64 = h.plane(Axis::Y).iter().map(|&v| f64::from(v)).sum();
        assert_eq!(x, y);
        assert_eq!(x + y, h.total());
        assert_eq!(x, (16 * 5) as f64);
    }
}
