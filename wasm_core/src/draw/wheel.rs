//! Spinning wheel state machine.
//!
//! Slice `k` of `n` spans wheel-frame angles `[k*w, (k+1)*w)` with
//! `w = 2π/n`. The renderer draws the wheel rotated by `-rotation` relative
//! to the pointer, so the slice under the pointer is the one containing the
//! normalized rotation.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CandidateList, DrawPhase, RandomSource, parse_candidates};

// Fraction of a slice kept clear on each side of the landing point so the
// pointer never rests on a divider.
const LANDING_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelConfig {
    pub duration_ms: f64,
    /// Inclusive lower bound of whole extra turns.
    pub min_turns: u32,
    /// Exclusive upper bound of whole extra turns.
    pub max_turns: u32,
    pub min_candidates: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            duration_ms: 4000.0,
            min_turns: 5,
            max_turns: 10,
            min_candidates: 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WheelState {
    Idle,
    Running {
        started_at: f64,
        from: f64,
        to: f64,
    },
    Revealed {
        winner: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelFrame {
    pub phase: DrawPhase,
    /// Absolute rotation in radians; renderers rotate by its negation.
    pub rotation: f64,
    /// Linear progress in `[0, 1]` while running.
    pub progress: f64,
    pub winner: Option<String>,
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Maps any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if normalized >= TAU { 0.0 } else { normalized }
}

/// Index of the slice under the pointer for a given rotation.
pub fn slice_at(rotation: f64, slices: usize) -> usize {
    if slices == 0 {
        return 0;
    }
    let width = TAU / slices as f64;
    let idx = (normalize_angle(rotation) / width).floor() as usize;
    idx.min(slices - 1)
}

/// Wheel-frame `[start, end)` angles of slice `index`.
pub fn slice_bounds(index: usize, slices: usize) -> (f64, f64) {
    let width = TAU / slices.max(1) as f64;
    (index as f64 * width, (index + 1) as f64 * width)
}

#[derive(Debug, Clone)]
pub struct SpinWheel {
    config: WheelConfig,
    candidates: CandidateList,
    rotation: f64,
    state: WheelState,
}

impl SpinWheel {
    pub fn new(candidates: CandidateList) -> Self {
        Self::with_config(candidates, WheelConfig::default())
    }

    pub fn with_config(candidates: CandidateList, config: WheelConfig) -> Self {
        Self {
            config,
            candidates,
            rotation: 0.0,
            state: WheelState::Idle,
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> DrawPhase {
        match self.state {
            WheelState::Idle => DrawPhase::Idle,
            WheelState::Running { .. } => DrawPhase::Running,
            WheelState::Revealed { .. } => DrawPhase::Revealed,
        }
    }

    pub fn can_start(&self) -> bool {
        !matches!(self.state, WheelState::Running { .. })
            && self.candidates.len() >= self.config.min_candidates.max(2)
    }

    /// Starts a spin. The landing slice is drawn uniformly here; the
    /// animation only interpolates towards it.
    pub fn start(&mut self, now_ms: f64, rng: &mut dyn RandomSource) -> bool {
        if !self.can_start() {
            return false;
        }
        let slices = self.candidates.len();
        let width = TAU / slices as f64;
        let target_slice = rng.next_index(slices);
        let offset = LANDING_MARGIN + rng.next_unit() * (1.0 - 2.0 * LANDING_MARGIN);
        let landing = (target_slice as f64 + offset) * width;

        let span = self.config.max_turns.saturating_sub(self.config.min_turns).max(1) as usize;
        let turns = self.config.min_turns as usize + rng.next_index(span);
        let delta = normalize_angle(landing - normalize_angle(self.rotation));
        let to = self.rotation + turns as f64 * TAU + delta;

        debug!(slices, turns, target_slice, "wheel spin started");
        self.state = WheelState::Running {
            started_at: now_ms,
            from: self.rotation,
            to,
        };
        true
    }

    fn animated_rotation(&self, now_ms: f64) -> (f64, f64) {
        match self.state {
            WheelState::Running {
                started_at,
                from,
                to,
            } => {
                let duration = self.config.duration_ms.max(1.0);
                let progress = ((now_ms - started_at) / duration).clamp(0.0, 1.0);
                (from + (to - from) * ease_out_cubic(progress), progress)
            }
            _ => (self.rotation, 0.0),
        }
    }

    /// Advances the spin to `now_ms` and returns the frame to draw.
    pub fn frame(&mut self, now_ms: f64) -> WheelFrame {
        let (rotation, progress) = self.animated_rotation(now_ms);
        if let WheelState::Running { to, .. } = self.state {
            if progress >= 1.0 {
                self.rotation = to;
                let winner = slice_at(to, self.candidates.len());
                self.state = WheelState::Revealed { winner };
                debug!(winner, "wheel revealed");
            } else {
                return WheelFrame {
                    phase: DrawPhase::Running,
                    rotation,
                    progress,
                    winner: None,
                };
            }
        }
        WheelFrame {
            phase: self.phase(),
            rotation: self.rotation,
            progress: if self.phase() == DrawPhase::Revealed {
                1.0
            } else {
                0.0
            },
            winner: self.winner().map(str::to_string),
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self.state {
            WheelState::Revealed { winner } => self.candidates.get(winner),
            _ => None,
        }
    }

    pub fn dismiss(&mut self) {
        if matches!(self.state, WheelState::Revealed { .. }) {
            self.state = WheelState::Idle;
        }
    }

    /// Replaces the candidates and returns to idle. A spin in progress stops
    /// at the angle it showed at `now_ms`.
    pub fn set_candidates(&mut self, candidates: CandidateList, now_ms: f64) {
        let (rotation, _) = self.animated_rotation(now_ms);
        self.rotation = rotation;
        self.candidates = candidates;
        self.state = WheelState::Idle;
    }

    pub fn edit_text(&mut self, text: &str, dedupe: bool, now_ms: f64) {
        self.set_candidates(parse_candidates(text, dedupe), now_ms);
    }

    /// Places the wheel at a fixed rotation, e.g. restoring a rendered state.
    pub fn set_rotation(&mut self, rotation: f64) {
        if !matches!(self.state, WheelState::Running { .. }) {
            self.rotation = rotation;
        }
    }
}
