use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CandidateList, DrawPhase, RandomSource, parse_candidates};

/// Completed draws remembered by one picker; older winners are dropped.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Countdown ticks shown before the reveal.
    pub ticks: u32,
    pub tick_ms: f64,
    pub min_candidates: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            ticks: 3,
            tick_ms: 1000.0,
            min_candidates: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PickerState {
    Idle,
    Running { started_at: f64, winner: usize },
    Revealed { winner: usize },
}

/// Snapshot handed to the renderer for one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerFrame {
    pub phase: DrawPhase,
    /// Remaining countdown tick (3, 2, 1) while running.
    pub countdown: Option<u32>,
    pub winner: Option<String>,
}

/// Countdown-style picker: one uniform draw, revealed after a fixed delay.
#[derive(Debug, Clone)]
pub struct WinnerPicker {
    config: PickerConfig,
    candidates: CandidateList,
    state: PickerState,
    history: Vec<String>,
}

impl WinnerPicker {
    pub fn new(candidates: CandidateList) -> Self {
        Self::with_config(candidates, PickerConfig::default())
    }

    pub fn with_config(candidates: CandidateList, config: PickerConfig) -> Self {
        Self {
            config,
            candidates,
            state: PickerState::Idle,
            history: Vec::new(),
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn phase(&self) -> DrawPhase {
        match self.state {
            PickerState::Idle => DrawPhase::Idle,
            PickerState::Running { .. } => DrawPhase::Running,
            PickerState::Revealed { .. } => DrawPhase::Revealed,
        }
    }

    /// Whether the start affordance should be enabled.
    pub fn can_start(&self) -> bool {
        !matches!(self.state, PickerState::Running { .. })
            && self.candidates.len() >= self.config.min_candidates.max(1)
    }

    /// Starts a draw. Ignored while running or with too few candidates.
    pub fn start(&mut self, now_ms: f64, rng: &mut dyn RandomSource) -> bool {
        if !self.can_start() {
            return false;
        }
        let winner = rng.next_index(self.candidates.len());
        debug!(candidates = self.candidates.len(), "picker draw started");
        self.state = PickerState::Running {
            started_at: now_ms,
            winner,
        };
        true
    }

    fn total_ms(&self) -> f64 {
        self.config.ticks as f64 * self.config.tick_ms
    }

    /// Moves Running → Revealed once the countdown has elapsed.
    pub fn advance(&mut self, now_ms: f64) -> DrawPhase {
        if let PickerState::Running { started_at, winner } = self.state {
            if now_ms - started_at >= self.total_ms() {
                self.state = PickerState::Revealed { winner };
                if let Some(name) = self.candidates.get(winner) {
                    if self.history.len() == HISTORY_LIMIT {
                        self.history.remove(0);
                    }
                    self.history.push(name.to_string());
                }
                debug!(winner, "picker revealed");
            }
        }
        self.phase()
    }

    /// Advances the machine and describes what should be on screen.
    pub fn frame(&mut self, now_ms: f64) -> PickerFrame {
        self.advance(now_ms);
        match self.state {
            PickerState::Idle => PickerFrame {
                phase: DrawPhase::Idle,
                countdown: None,
                winner: None,
            },
            PickerState::Running { started_at, .. } => {
                let elapsed = (now_ms - started_at).max(0.0);
                let passed = (elapsed / self.config.tick_ms).floor() as u32;
                PickerFrame {
                    phase: DrawPhase::Running,
                    countdown: Some(self.config.ticks.saturating_sub(passed).max(1)),
                    winner: None,
                }
            }
            PickerState::Revealed { winner } => PickerFrame {
                phase: DrawPhase::Revealed,
                countdown: None,
                winner: self.candidates.get(winner).map(str::to_string),
            },
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self.state {
            PickerState::Revealed { winner } => self.candidates.get(winner),
            _ => None,
        }
    }

    /// Hides a revealed winner; the candidate list is untouched.
    pub fn dismiss(&mut self) {
        if matches!(self.state, PickerState::Revealed { .. }) {
            self.state = PickerState::Idle;
        }
    }

    /// Replaces the candidates. Any winner or in-flight draw is dropped.
    pub fn set_candidates(&mut self, candidates: CandidateList) {
        self.candidates = candidates;
        self.state = PickerState::Idle;
    }

    /// Re-parses the text box contents; see [`Self::set_candidates`].
    pub fn edit_text(&mut self, text: &str, dedupe: bool) {
        self.set_candidates(parse_candidates(text, dedupe));
    }

    /// Removes the revealed winner from the list and returns it.
    pub fn remove_winner(&mut self) -> Option<String> {
        let PickerState::Revealed { winner } = self.state else {
            return None;
        };
        self.state = PickerState::Idle;
        self.candidates.remove(winner)
    }

    /// Winners of the last [`HISTORY_LIMIT`] completed draws, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}
