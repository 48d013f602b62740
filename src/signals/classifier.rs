// =============================================================================
// Signal Classifier — threshold rules over the latest indicator readings
// =============================================================================
//
// Each indicator family maps to exactly one label from a closed enumeration.
// All comparisons are strict: a reading sitting exactly on a threshold falls
// through to the last (neutral / negative) branch.
//
//   Family           Rule                               Labels
//   trend            close vs SMA(long)                 above / below
//   momentum         EMA(fast) vs EMA(slow)             bull / bear
//   macd             histogram sign                     bull / bear
//   rsi              > 70 / < 30 / else                 overbought / oversold / neutral
//   bollinger        close vs upper / lower band        breakout up / down / inside
//   stochastic       K and D > 80 / K and D < 20 / else overbought / oversold / neutral
//   stoch rsi        K > 80 / K < 20 / else             overbought / oversold / neutral
//   volume           volume vs volume MA                confirm / weak
// =============================================================================

use std::fmt;

use serde::{Serialize, Serializer};

use crate::report::IndicatorSnapshot;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;
pub const STOCH_OVERSOLD: f64 = 20.0;

// =============================================================================
// Label enumerations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    AboveMa,
    BelowMa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Momentum {
    BullishCross,
    BearishCross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdDirection {
    Bullish,
    Bearish,
}

/// Oscillator zone shared by RSI, stochastic and stochastic RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    BreakoutUp,
    BreakoutDown,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeConfirmation {
    Confirm,
    Weak,
}

/// One label from one indicator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Trend(Trend),
    Momentum(Momentum),
    Macd(MacdDirection),
    Rsi(Zone),
    Bollinger(BandPosition),
    Stochastic(Zone),
    StochRsi(Zone),
    Volume(VolumeConfirmation),
}

impl Signal {
    /// Stable keyword used in reports and the aggregation tables.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Trend(Trend::AboveMa) => "price_above_sma",
            Self::Trend(Trend::BelowMa) => "price_below_sma",
            Self::Momentum(Momentum::BullishCross) => "ema_bull",
            Self::Momentum(Momentum::BearishCross) => "ema_bear",
            Self::Macd(MacdDirection::Bullish) => "macd_bull",
            Self::Macd(MacdDirection::Bearish) => "macd_bear",
            Self::Rsi(Zone::Overbought) => "rsi_overbought",
            Self::Rsi(Zone::Oversold) => "rsi_oversold",
            Self::Rsi(Zone::Neutral) => "rsi_neutral",
            Self::Bollinger(BandPosition::BreakoutUp) => "bb_breakout_up",
            Self::Bollinger(BandPosition::BreakoutDown) => "bb_breakout_down",
            Self::Bollinger(BandPosition::Inside) => "bb_inside",
            Self::Stochastic(Zone::Overbought) => "stoch_overbought",
            Self::Stochastic(Zone::Oversold) => "stoch_oversold",
            Self::Stochastic(Zone::Neutral) => "stoch_neutral",
            Self::StochRsi(Zone::Overbought) => "stochrsi_overbought",
            Self::StochRsi(Zone::Oversold) => "stochrsi_oversold",
            Self::StochRsi(Zone::Neutral) => "stochrsi_neutral",
            Self::Volume(VolumeConfirmation::Confirm) => "volume_confirm",
            Self::Volume(VolumeConfirmation::Weak) => "volume_weak",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

/// Exactly one label per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSet {
    pub trend: Trend,
    pub momentum: Momentum,
    pub macd: MacdDirection,
    pub rsi: Zone,
    pub bollinger: BandPosition,
    pub stochastic: Zone,
    pub stoch_rsi: Zone,
    pub volume: VolumeConfirmation,
}

impl SignalSet {
    /// Labels in fixed family order.
    pub fn labels(&self) -> [Signal; 8] {
        [
            Signal::Trend(self.trend),
            Signal::Momentum(self.momentum),
            Signal::Macd(self.macd),
            Signal::Rsi(self.rsi),
            Signal::Bollinger(self.bollinger),
            Signal::Stochastic(self.stochastic),
            Signal::StochRsi(self.stoch_rsi),
            Signal::Volume(self.volume),
        ]
    }
}

// =============================================================================
// Rules
// =============================================================================

pub fn classify_trend(close: f64, sma_long: f64) -> Trend {
    if close > sma_long {
        Trend::AboveMa
    } else {
        Trend::BelowMa
    }
}

pub fn classify_momentum(ema_fast: f64, ema_slow: f64) -> Momentum {
    if ema_fast > ema_slow {
        Momentum::BullishCross
    } else {
        Momentum::BearishCross
    }
}

pub fn classify_macd(histogram: f64) -> MacdDirection {
    if histogram > 0.0 {
        MacdDirection::Bullish
    } else {
        MacdDirection::Bearish
    }
}

pub fn classify_rsi(rsi: f64) -> Zone {
    if rsi > RSI_OVERBOUGHT {
        Zone::Overbought
    } else if rsi < RSI_OVERSOLD {
        Zone::Oversold
    } else {
        Zone::Neutral
    }
}

pub fn classify_bollinger(close: f64, upper: f64, lower: f64) -> BandPosition {
    if close > upper {
        BandPosition::BreakoutUp
    } else if close < lower {
        BandPosition::BreakoutDown
    } else {
        BandPosition::Inside
    }
}

/// Both %K and %D have to agree for an extreme zone.
pub fn classify_stochastic(k: f64, d: f64) -> Zone {
    if k > STOCH_OVERBOUGHT && d > STOCH_OVERBOUGHT {
        Zone::Overbought
    } else if k < STOCH_OVERSOLD && d < STOCH_OVERSOLD {
        Zone::Oversold
    } else {
        Zone::Neutral
    }
}

pub fn classify_stoch_rsi(k: f64) -> Zone {
    if k > STOCH_OVERBOUGHT {
        Zone::Overbought
    } else if k < STOCH_OVERSOLD {
        Zone::Oversold
    } else {
        Zone::Neutral
    }
}

pub fn classify_volume(volume: f64, volume_ma: f64) -> VolumeConfirmation {
    if volume > volume_ma {
        VolumeConfirmation::Confirm
    } else {
        VolumeConfirmation::Weak
    }
}

/// Classify every family from one indicator snapshot.
pub fn classify(s: &IndicatorSnapshot) -> SignalSet {
    SignalSet {
        trend: classify_trend(s.last_close, s.sma_long),
        momentum: classify_momentum(s.ema_fast, s.ema_slow),
        macd: classify_macd(s.macd_hist),
        rsi: classify_rsi(s.rsi),
        bollinger: classify_bollinger(s.last_close, s.bb_upper, s.bb_lower),
        stochastic: classify_stochastic(s.stoch_k, s.stoch_d),
        stoch_rsi: classify_stoch_rsi(s.stoch_rsi_k),
        volume: classify_volume(s.last_volume, s.volume_ma),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify_rsi(70.0), Zone::Neutral);
        assert_eq!(classify_rsi(30.0), Zone::Neutral);
        assert_eq!(classify_rsi(70.01), Zone::Overbought);
        assert_eq!(classify_rsi(29.99), Zone::Oversold);

        assert_eq!(classify_stoch_rsi(80.0), Zone::Neutral);
        assert_eq!(classify_stoch_rsi(20.0), Zone::Neutral);

        assert_eq!(classify_trend(100.0, 100.0), Trend::BelowMa);
        assert_eq!(classify_momentum(5.0, 5.0), Momentum::BearishCross);
        assert_eq!(classify_macd(0.0), MacdDirection::Bearish);
        assert_eq!(classify_volume(10.0, 10.0), VolumeConfirmation::Weak);
    }

    #[test]
    fn bollinger_touching_a_band_is_inside() {
        assert_eq!(classify_bollinger(110.0, 110.0, 90.0), BandPosition::Inside);
        assert_eq!(classify_bollinger(90.0, 110.0, 90.0), BandPosition::Inside);
        assert_eq!(classify_bollinger(110.5, 110.0, 90.0), BandPosition::BreakoutUp);
        assert_eq!(classify_bollinger(89.5, 110.0, 90.0), BandPosition::BreakoutDown);
    }

    #[test]
    fn bollinger_zero_width_is_inside() {
        assert_eq!(classify_bollinger(100.0, 100.0, 100.0), BandPosition::Inside);
    }

    #[test]
    fn stochastic_needs_both_lines() {
        assert_eq!(classify_stochastic(85.0, 81.0), Zone::Overbought);
        assert_eq!(classify_stochastic(85.0, 75.0), Zone::Neutral);
        assert_eq!(classify_stochastic(10.0, 15.0), Zone::Oversold);
        assert_eq!(classify_stochastic(10.0, 25.0), Zone::Neutral);
        assert_eq!(classify_stochastic(50.0, 50.0), Zone::Neutral);
    }

    #[test]
    fn stochastic_threshold_ties_are_neutral() {
        assert_eq!(classify_stochastic(80.0, 80.0), Zone::Neutral);
        assert_eq!(classify_stochastic(20.0, 20.0), Zone::Neutral);
        assert_eq!(classify_stochastic(80.0, 95.0), Zone::Neutral);
        assert_eq!(classify_stochastic(5.0, 20.0), Zone::Neutral);
    }

    #[test]
    fn labels_keep_family_order() {
        let set = SignalSet {
            trend: Trend::AboveMa,
            momentum: Momentum::BullishCross,
            macd: MacdDirection::Bearish,
            rsi: Zone::Neutral,
            bollinger: BandPosition::Inside,
            stochastic: Zone::Oversold,
            stoch_rsi: Zone::Overbought,
            volume: VolumeConfirmation::Weak,
        };
        let keywords: Vec<&str> = set.labels().iter().map(Signal::keyword).collect();
        assert_eq!(
            keywords,
            vec![
                "price_above_sma",
                "ema_bull",
                "macd_bear",
                "rsi_neutral",
                "bb_inside",
                "stoch_oversold",
                "stochrsi_overbought",
                "volume_weak",
            ]
        );
    }

    #[test]
    fn signal_serialises_as_keyword() {
        let json = serde_json::to_string(&Signal::Rsi(Zone::Oversold)).unwrap();
        assert_eq!(json, "\"rsi_oversold\"");
        assert_eq!(Signal::Volume(VolumeConfirmation::Confirm).to_string(), "volume_confirm");
    }
}
