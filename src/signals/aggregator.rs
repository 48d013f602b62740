// =============================================================================
// Signal Aggregator — keyword-weight table scoring
// =============================================================================
//
// Each label is worth +1 when it sits in the bullish table, -1 in the bearish
// table, 0 otherwise. Neutral zones, `bb_inside` and `volume_weak` count for
// nothing; `volume_confirm` only ever reinforces the bullish side.
//
// With eight families the score lies in -7..=+8.
// =============================================================================

use std::fmt;

use serde::Serialize;

use super::classifier::{
    BandPosition, MacdDirection, Momentum, Signal, Trend, VolumeConfirmation, Zone,
};

/// Score at or above which the bias is bullish.
pub const BULLISH_THRESHOLD: i32 = 2;
/// Score at or below which the bias is bearish.
pub const BEARISH_THRESHOLD: i32 = -2;

/// Labels that add one point.
pub const BULLISH_SIGNALS: [Signal; 8] = [
    Signal::Trend(Trend::AboveMa),
    Signal::Momentum(Momentum::BullishCross),
    Signal::Macd(MacdDirection::Bullish),
    Signal::Rsi(Zone::Oversold),
    Signal::Bollinger(BandPosition::BreakoutUp),
    Signal::Stochastic(Zone::Oversold),
    Signal::StochRsi(Zone::Oversold),
    Signal::Volume(VolumeConfirmation::Confirm),
];

/// Labels that remove one point.
pub const BEARISH_SIGNALS: [Signal; 7] = [
    Signal::Trend(Trend::BelowMa),
    Signal::Momentum(Momentum::BearishCross),
    Signal::Macd(MacdDirection::Bearish),
    Signal::Rsi(Zone::Overbought),
    Signal::Bollinger(BandPosition::BreakoutDown),
    Signal::Stochastic(Zone::Overbought),
    Signal::StochRsi(Zone::Overbought),
];

/// Three-way directional bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Bullish,
    Bearish,
    Neutral,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score >= BULLISH_THRESHOLD {
            Self::Bullish
        } else if score <= BEARISH_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    /// Human-readable guidance shown to end users.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Bullish => {
                "Bullish — bias to long (consider small position / confirm with risk management)"
            }
            Self::Bearish => "Bearish — bias to avoid longs or consider shorts when appropriate",
            Self::Neutral => "Neutral — wait for clearer signals or manage risk tightly",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// The contribution of a single label to the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalContribution {
    pub signal: Signal,
    pub contribution: i32,
}

/// Result of scoring one label set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub score: i32,
    pub recommendation: Recommendation,
    pub contributions: Vec<SignalContribution>,
}

/// Weight of one label in the fixed table.
pub fn weight(signal: &Signal) -> i32 {
    if BULLISH_SIGNALS.contains(signal) {
        1
    } else if BEARISH_SIGNALS.contains(signal) {
        -1
    } else {
        0
    }
}

/// Score a set of labels and derive the recommendation.
pub fn score(signals: &[Signal]) -> ScoringResult {
    let contributions: Vec<SignalContribution> = signals
        .iter()
        .map(|s| SignalContribution {
            signal: *s,
            contribution: weight(s),
        })
        .collect();
    let score = contributions.iter().map(|c| c.contribution).sum();

    ScoringResult {
        score,
        recommendation: Recommendation::from_score(score),
        contributions,
    }
}
