// =============================================================================
// Key Levels — support / resistance, liquidity zones and a trade plan
// =============================================================================
//
// Derived from the same candle series as the indicator report:
//
//   Supports      Swing-low pivots (lowest first), topped up from the lowest
//                 distinct lows when fewer than two pivots exist.
//   Resistances   Swing-high pivots (highest first), topped up from the highest
//                 distinct highs, then padded at +1% / +2% / +3% of the last
//                 close.
//   Liquidity     Closes rounded to two decimals, ranked by how often they
//                 occur (first occurrence breaks ties).
//   Plan          Entry at the first support, stop 0.5% below it, targets at
//                 the three resistances (nearest first).
//   Opportunity   Close vs the short SMA, filtered by RSI extremes.
//
// A swing low at `i` needs the two bars before it stepping down and the two
// bars after it stepping up; a swing high is the mirror image.
// =============================================================================

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::market_data::OhlcvSeries;
use crate::report::IndicatorSnapshot;
use crate::signals::classifier::{RSI_OVERBOUGHT, RSI_OVERSOLD};

pub const MAX_SUPPORTS: usize = 2;
pub const MAX_RESISTANCES: usize = 3;
pub const MAX_LIQUIDITY_ZONES: usize = 5;

/// Stop-loss distance below the entry as a fraction of the entry.
const STOP_LOSS_FACTOR: f64 = 0.995;

/// Spacing of synthetic resistances above the last close, in percent.
const TARGET_STEP_PCT: f64 = 1.0;

// =============================================================================
// Types
// =============================================================================

/// A price closes keep returning to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiquidityZone {
    pub price: f64,
    /// Number of closes that round to `price`.
    pub touches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradePlan {
    pub entry: f64,
    pub stop_loss: f64,
    /// TP1..TP3, ascending.
    pub targets: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Opportunity {
    Buy,
    Sell,
    Unclear,
}

impl Opportunity {
    pub fn from_readings(close: f64, sma_short: f64, rsi: f64) -> Self {
        if close > sma_short && rsi < RSI_OVERBOUGHT {
            Self::Buy
        } else if close < sma_short && rsi > RSI_OVERSOLD {
            Self::Sell
        } else {
            Self::Unclear
        }
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "✅ Buying opportunity available now"),
            Self::Sell => write!(f, "⛔ Selling opportunity available now"),
            Self::Unclear => write!(f, "ℹ️ No clear opportunity right now"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyLevels {
    /// Ascending.
    pub supports: Vec<f64>,
    /// Descending.
    pub resistances: Vec<f64>,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub plan: TradePlan,
    pub opportunity: Opportunity,
}

// =============================================================================
// Computation
// =============================================================================

/// Compute every level for `series`. `snapshot` must come from the same
/// series; `series` must be non-empty.
pub fn key_levels(series: &OhlcvSeries, snapshot: &IndicatorSnapshot) -> KeyLevels {
    let last_close = snapshot.last_close;

    let mut lows = series.low.clone();
    sort_dedup(&mut lows);
    let mut supports = swing_lows(&series.low);
    sort_dedup(&mut supports);
    top_up(&mut supports, &lows, MAX_SUPPORTS);
    supports.sort_by(|a, b| a.total_cmp(b));
    supports.truncate(MAX_SUPPORTS);

    let mut highs = series.high.clone();
    sort_dedup(&mut highs);
    highs.reverse();
    let mut resistances = swing_highs(&series.high);
    sort_dedup(&mut resistances);
    resistances.reverse();
    top_up(&mut resistances, &highs, MAX_RESISTANCES);
    resistances.sort_by(|a, b| b.total_cmp(a));
    resistances.truncate(MAX_RESISTANCES);
    while resistances.len() < MAX_RESISTANCES {
        let step = (resistances.len() + 1) as f64 * TARGET_STEP_PCT / 100.0;
        resistances.push(last_close * (1.0 + step));
    }

    let entry = supports.first().copied().unwrap_or(last_close);
    let mut targets = [resistances[0], resistances[1], resistances[2]];
    targets.sort_by(|a, b| a.total_cmp(b));

    KeyLevels {
        supports,
        resistances,
        liquidity_zones: liquidity_zones(&series.close, MAX_LIQUIDITY_ZONES),
        plan: TradePlan {
            entry,
            stop_loss: entry * STOP_LOSS_FACTOR,
            targets,
        },
        opportunity: Opportunity::from_readings(last_close, snapshot.sma_short, snapshot.rsi),
    }
}

/// Swing-low pivot values, in series order.
pub fn swing_lows(lows: &[f64]) -> Vec<f64> {
    pivots(lows, |a, b| a < b)
}

/// Swing-high pivot values, in series order.
pub fn swing_highs(highs: &[f64]) -> Vec<f64> {
    pivots(highs, |a, b| a > b)
}

fn pivots(values: &[f64], beats: impl Fn(f64, f64) -> bool) -> Vec<f64> {
    if values.len() < 5 {
        return Vec::new();
    }
    (2..values.len() - 2)
        .filter(|&i| {
            let v = &values[i - 2..=i + 2];
            beats(v[2], v[1]) && beats(v[2], v[3]) && beats(v[3], v[4]) && beats(v[1], v[0])
        })
        .map(|i| values[i])
        .collect()
}

/// Most frequent closes rounded to two decimals.
pub fn liquidity_zones(closes: &[f64], max: usize) -> Vec<LiquidityZone> {
    let mut order: Vec<i64> = Vec::new();
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &c in closes {
        let cents = (c * 100.0).round() as i64;
        let n = counts.entry(cents).or_insert(0);
        if *n == 0 {
            order.push(cents);
        }
        *n += 1;
    }

    let mut zones: Vec<LiquidityZone> = order
        .into_iter()
        .map(|cents| LiquidityZone {
            price: cents as f64 / 100.0,
            touches: counts[&cents],
        })
        .collect();
    // stable: ties keep first-occurrence order
    zones.sort_by(|a, b| b.touches.cmp(&a.touches));
    zones.truncate(max);
    zones
}

fn sort_dedup(values: &mut Vec<f64>) {
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
}

/// Append `candidates` in order until `levels` holds `want` distinct entries.
fn top_up(levels: &mut Vec<f64>, candidates: &[f64], want: usize) {
    for &c in candidates {
        if levels.len() >= want {
            break;
        }
        if !levels.contains(&c) {
            levels.push(c);
        }
    }
}
