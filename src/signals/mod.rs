// =============================================================================
// Signals Module
// =============================================================================
//
// Turns indicator readings into labels and labels into a directional bias:
// - Threshold classifier (one label per indicator family)
// - Keyword-weight aggregator (score + recommendation)

pub mod aggregator;
pub mod classifier;

pub use aggregator::{Recommendation, ScoringResult, SignalContribution};
pub use classifier::{classify, Signal, SignalSet};
