//! Run-level policies and lifecycle states.

use serde::{Deserialize, Serialize};

/// What a run does after a shot fails.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failed shot and report the run as aborted
    #[default]
    Halt,
    /// Record the failure and move on to the next shot
    Continue,
}

/// Terminal state of a run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SequenceStatus {
    /// Every shot was recorded, whether or not it succeeded
    Completed,
    /// The run stopped early because of the failure policy or cancellation
    Aborted,
}

/// Lifecycle of a single shot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShotPhase {
    /// Waiting for the previous shot to be recorded
    Pending,
    /// Applying the state delta and building the request
    Compiling,
    /// Waiting on the provider gateway
    Dispatching,
    /// Result appended to the run
    Recorded,
}
