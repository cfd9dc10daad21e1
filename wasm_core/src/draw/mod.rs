//! Randomized selection widgets: the countdown winner picker and the
//! spinning wheel. Both are explicit `Idle → Running → Revealed` machines
//! driven by timestamps handed in by the caller's animation loop; the
//! outcome is drawn once at start and only exposed after the reveal.

pub mod candidates;
pub mod picker;
pub mod random;
pub mod wheel;

use serde::Serialize;

pub use candidates::{CandidateList, parse_candidates};
pub use picker::{PickerConfig, PickerFrame, WinnerPicker};
pub use random::{DrawRng, RandomSource};
pub use wheel::{SpinWheel, WheelConfig, WheelFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPhase {
    Idle,
    Running,
    Revealed,
}
