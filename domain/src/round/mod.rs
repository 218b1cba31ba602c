//! Round lifecycle

pub mod controller;

pub use controller::{RoundController, RoundPhase, RoundProgress, RoundStatistics};
