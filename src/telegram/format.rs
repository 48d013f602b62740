// =============================================================================
// Reply formatting
// =============================================================================

use crate::coingecko::SpotPrice;
use crate::levels::KeyLevels;
use crate::report::Report;

const DISCLAIMER: &str = "(Note: these are educational indicators, not investment advice)";

/// Render an analysis report as a chat message.
pub fn format_report(pair: &str, interval: &str, report: &Report) -> String {
    let i = &report.indicators;
    let mut lines = vec![
        format!("📊 Technical analysis for {pair} ({interval})"),
        format!("Last price: {}", i.last_close),
        format!("SMA short: {:.6} | SMA long: {:.6}", i.sma_short, i.sma_long),
        format!("EMA fast: {:.6} | EMA slow: {:.6}", i.ema_fast, i.ema_slow),
        format!("RSI: {:.2} | ATR: {:.6} ({:.2}%)", i.rsi, i.atr, i.atr_pct),
        format!(
            "MACD (hist): {:.6} | BB upper/lower: {:.6}/{:.6}",
            i.macd_hist, i.bb_upper, i.bb_lower
        ),
        format!(
            "Stoch K/D: {:.1}/{:.1} | StochRSI K: {:.1}",
            i.stoch_k, i.stoch_d, i.stoch_rsi_k
        ),
        format!(
            "Last volume: {:.6} | Volume MA: {:.6} | OBV: {:.2}",
            i.last_volume, i.volume_ma, i.obv
        ),
    ];
    lines.extend(format_levels(&report.levels));
    lines.extend([
        String::new(),
        format!("⚡ Signals: {}", report.signal_summary()),
        String::new(),
        format!(
            "🔎 Final assessment (score={}): {}",
            report.score,
            report.recommendation.advice()
        ),
        String::new(),
        DISCLAIMER.to_string(),
    ]);
    lines.join("\n")
}

fn format_levels(levels: &KeyLevels) -> Vec<String> {
    let join = |values: &[f64]| {
        values
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    let zones = levels
        .liquidity_zones
        .iter()
        .map(|z| format!("{:.2} (x{})", z.price, z.touches))
        .collect::<Vec<_>>()
        .join(", ");
    let plan = &levels.plan;

    vec![
        String::new(),
        format!("✅ Support: {}", join(&levels.supports)),
        format!("⛔ Resistance: {}", join(&levels.resistances)),
        format!("📍 Liquidity zones: {zones}"),
        format!(
            "💡 Entry: {:.4} | Stop loss: {:.4}",
            plan.entry, plan.stop_loss
        ),
        format!("📈 Targets: {}", join(&plan.targets).replace(" | ", " → ")),
        format!("📢 {}", levels.opportunity),
    ]
}

/// Render a spot price as a one-line chat message.
pub fn format_price(price: &SpotPrice) -> String {
    let mut text = format!(
        "{} = {} {}",
        price.coin_id.to_uppercase(),
        price.price,
        price.vs_currency.to_uppercase()
    );
    if let Some(change) = price.change_24h {
        text.push_str(&format!(" (24h {change:+.2}%)"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;
    use crate::market_data::Candle;
    use crate::runtime_config::IndicatorParams;

    #[test]
    fn report_message_lists_values_and_verdict() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let c = 100.0 + i as f64;
                Candle::new(i, c, c + 1.0, c - 1.0, c, 10.0)
            })
            .collect();
        let report = analyze(&candles, &IndicatorParams::default()).unwrap();
        let text = format_report("BTCUSDT", "1h", &report);

        assert!(text.starts_with("📊 Technical analysis for BTCUSDT (1h)"));
        assert!(text.contains("Last price: 159"));
        assert!(text.contains("RSI: 100.00"));
        assert!(text.contains("price_above_sma, ema_bull, macd_bull"));
        assert!(text.contains("✅ Support: "));
        assert!(text.contains("📈 Targets: "));
        assert!(text.contains(&format!("Stop loss: {:.4}", report.levels.plan.stop_loss)));
        assert!(text.contains(&format!("score={}", report.score)));
        assert!(text.contains(report.recommendation.advice()));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn price_message_with_and_without_change() {
        let mut p = SpotPrice {
            coin_id: "bitcoin".into(),
            vs_currency: "usd".into(),
            price: 64000.5,
            change_24h: Some(2.345),
        };
        assert_eq!(format_price(&p), "BITCOIN = 64000.5 USD (24h +2.35%)");
        p.change_24h = None;
        assert_eq!(format_price(&p), "BITCOIN = 64000.5 USD");
    }
}
