//! Per-step trajectory log.
//!
//! One row per step, laid out run-major: row `run * steps_per_run + time`.
//! Rows are zero-initialized when the table is allocated, so rows past an
//! early stop keep their default value.

use smatrix_core::LatticePos;

/// One logged step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogRow {
    /// Run index.
    pub run: usize,
    /// Step index within the run.
    pub time: u64,
    /// Particle x after the step.
    pub pos_x: i32,
    /// Particle y after the step.
    pub pos_y: i32,
}

impl LogRow {
    /// Logged position as a lattice coordinate.
    pub fn position(&self) -> LatticePos {
        LatticePos::new(self.pos_x, self.pos_y)
    }
}

/// Fixed-capacity table of [`LogRow`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogTable {
    runs: usize,
    steps_per_run: usize,
    rows: Vec<LogRow>,
}

impl LogTable {
    /// Allocate `runs * steps_per_run` zeroed rows.
    ///
    /// Callers validate the product first; see
    /// [`WalkParams::log_rows`](smatrix_core::WalkParams::log_rows).
    pub fn new(runs: usize, steps_per_run: usize) -> Self {
        Self {
            runs,
            steps_per_run,
            rows: vec![LogRow::default(); runs.saturating_mul(steps_per_run)],
        }
    }

    /// Number of runs the table was sized for.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Steps per run the table was sized for.
    pub fn steps_per_run(&self) -> usize {
        self.steps_per_run
    }

    /// Total row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flat index of `(run, time)`, or `None` if outside the table.
    pub fn row_index(&self, run: usize, time: usize) -> Option<usize> {
        if run >= self.runs || time >= self.steps_per_run {
            return None;
        }
        Some(run * self.steps_per_run + time)
    }

    /// Write `row` at the slot named by its own `run` and `time`.
    ///
    /// Returns `false` and leaves the table untouched if the slot does
    /// not exist.
    pub fn record(&mut self, row: LogRow) -> bool {
        let Ok(time) = usize::try_from(row.time) else {
            return false;
        };
        match self.row_index(row.run, time) {
            Some(i) => {
                self.rows[i] = row;
                true
            }
            None => false,
        }
    }

    /// Row at `(run, time)`.
    pub fn row(&self, run: usize, time: usize) -> Option<&LogRow> {
        self.row_index(run, time).map(|i| &self.rows[i])
    }

    /// All rows belonging to `run`, in step order.
    pub fn run_rows(&self, run: usize) -> &[LogRow] {
        if run >= self.runs {
            return &[];
        }
        let start = run * self.steps_per_run;
        &self.rows[start..start + self.steps_per_run]
    }

    /// Every row, run-major.
    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }
}
