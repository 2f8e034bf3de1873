//! Test utilities for SolidMatrix development.
//!
//! Provides displacement samplers with scripted or throttled behaviour
//! and parameter/log fixtures for engine and statistics tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;
use std::time::Duration;

use smatrix_core::Axis;
use smatrix_engine::DisplacementSampler;

pub use fixtures::{log_from_paths, small_params, stationary_params};

/// Plays back fixed displacement sequences, one per axis.
///
/// Once a sequence runs out the sampler returns `0` for that axis.
/// [`reseed`](DisplacementSampler::reseed) rewinds both sequences, so a
/// session's `initialize()` replays the script from the start.
#[derive(Clone, Debug)]
pub struct ScriptedSampler {
    x_script: Vec<i32>,
    y_script: Vec<i32>,
    x: VecDeque<i32>,
    y: VecDeque<i32>,
    draws: usize,
}

impl ScriptedSampler {
    pub fn new(x: impl Into<Vec<i32>>, y: impl Into<Vec<i32>>) -> Self {
        let x_script = x.into();
        let y_script = y.into();
        Self {
            x: x_script.iter().copied().collect(),
            y: y_script.iter().copied().collect(),
            x_script,
            y_script,
            draws: 0,
        }
    }

    /// Total draws served, across both axes.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl DisplacementSampler for ScriptedSampler {
    fn draw(&mut self, axis: Axis, _momentum: f32) -> i32 {
        self.draws += 1;
        let queue = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };
        queue.pop_front().unwrap_or(0)
    }

    fn reseed(&mut self, _seed: u64) {
        self.x = self.x_script.iter().copied().collect();
        self.y = self.y_script.iter().copied().collect();
    }
}

/// Never moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct StationarySampler;

impl DisplacementSampler for StationarySampler {
    fn draw(&mut self, _axis: Axis, _momentum: f32) -> i32 {
        0
    }
}

/// Wraps another sampler and sleeps before every draw.
///
/// Slows a run down enough for stop-flag tests to act mid-run.
#[derive(Clone, Debug)]
pub struct ThrottledSampler<S> {
    inner: S,
    delay: Duration,
}

impl<S> ThrottledSampler<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<S: DisplacementSampler> DisplacementSampler for ThrottledSampler<S> {
    fn draw(&mut self, axis: Axis, momentum: f32) -> i32 {
        std::thread::sleep(self.delay);
        self.inner.draw(axis, momentum)
    }

    fn reseed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }
}
