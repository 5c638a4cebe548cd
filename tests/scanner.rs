//! Pattern scanner integration tests
//!
//! Exercises the classifiers and the sequence scanner through the public API:
//! hammer thresholds, the three white soldiers window, and match ordering.

use candle_pattern_detector::error::PatternError;
use candle_pattern_detector::models::Bar;
use candle_pattern_detector::patterns::{
    is_hammer, is_three_white_soldiers, InvalidBarPolicy, PatternKind, PatternMatch,
    PatternRecognizer,
};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn bar(t: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(t, open, high, low, close, 1.0)
}

/// Bullish bar with small shadows on both sides.
fn bullish(t: i64, open: f64, close: f64) -> Bar {
    bar(t, open, close + 0.2, open - 0.2, close)
}

// ============================================================================
// Hammer
// ============================================================================

#[test]
fn test_hammer_threshold_arithmetic() {
    // body 0.1 -> 2*body = 0.2, 0.5*body = 0.05; upper shadow 0.1 is not below 0.05
    let candle = Bar::new(0, 10.0, 10.1, 7.0, 9.9, 1.0);
    assert!(!is_hammer(&candle).unwrap());
}

#[test]
fn test_doji_is_never_a_hammer() {
    for high in [10.0, 10.01, 12.0] {
        for low in [10.0, 9.0, 1.0] {
            let candle = bar(0, 10.0, high, low, 10.0);
            assert!(!is_hammer(&candle).unwrap(), "high={} low={}", high, low);
        }
    }
}

#[test]
fn test_hammer_rejects_malformed_bar() {
    let candle = bar(42, 10.0, 11.0, 9.0, f64::NAN);
    assert!(matches!(
        is_hammer(&candle),
        Err(PatternError::InvalidBar { open_time: 42, .. })
    ));
}

proptest! {
    // Any bar built as low <= body <= high with both hammer conditions holding is a hammer
    #[test]
    fn prop_hammer_conditions_hold(
        base in 1.0f64..1_000.0,
        body in 0.01f64..10.0,
        lower_factor in 2.01f64..20.0,
        upper_factor in 0.0f64..0.49,
        bullish_body in any::<bool>(),
    ) {
        let body_low = base;
        let body_high = base + body;
        let low = body_low - lower_factor * body;
        let high = body_high + upper_factor * body;
        prop_assume!(low >= 0.0);

        let (open, close) = if bullish_body { (body_low, body_high) } else { (body_high, body_low) };
        let candle = bar(0, open, high, low, close);
        prop_assume!(candle.validate().is_ok());

        let real_body = (open - close).abs();
        let lower = open.min(close) - low;
        let upper = high - open.max(close);
        prop_assume!(real_body > 0.0 && lower > 2.0 * real_body && upper < 0.5 * real_body);

        prop_assert!(is_hammer(&candle).unwrap());
    }

    // Breaking the lower shadow condition always clears the verdict
    #[test]
    fn prop_short_lower_shadow_not_hammer(
        base in 1.0f64..1_000.0,
        body in 0.01f64..10.0,
        lower_factor in 0.0f64..2.0,
        upper_factor in 0.0f64..0.49,
    ) {
        let low = base - lower_factor * body;
        let high = base + body + upper_factor * body;
        let candle = bar(0, base, high, low, base + body);
        prop_assume!(candle.validate().is_ok());

        prop_assert!(!is_hammer(&candle).unwrap());
    }

    // Breaking the upper shadow condition always clears the verdict
    #[test]
    fn prop_long_upper_shadow_not_hammer(
        base in 1.0f64..1_000.0,
        body in 0.01f64..10.0,
        lower_factor in 2.01f64..20.0,
        upper_factor in 0.51f64..5.0,
    ) {
        let low = base - lower_factor * body;
        prop_assume!(low >= 0.0);
        let high = base + body + upper_factor * body;
        let candle = bar(0, base, high, low, base + body);
        prop_assume!(candle.validate().is_ok());

        prop_assert!(!is_hammer(&candle).unwrap());
    }

    // Zero-body bars are never hammers
    #[test]
    fn prop_zero_body_never_hammer(
        price in 0.0f64..1_000.0,
        up in 0.0f64..100.0,
        down in 0.0f64..1.0,
    ) {
        let candle = bar(0, price, price + up, price * (1.0 - down), price);
        prop_assume!(candle.validate().is_ok());

        prop_assert!(!is_hammer(&candle).unwrap());
    }
}

// ============================================================================
// Three White Soldiers
// ============================================================================

#[test]
fn test_soldiers_rising_closes() {
    let window = [bullish(0, 9.5, 10.0), bullish(1, 10.0, 11.0), bullish(2, 11.0, 12.0)];
    assert!(is_three_white_soldiers(&window).unwrap());
}

#[test]
fn test_soldiers_ignore_first_bar_direction() {
    let window = [
        bar(0, 12.0, 12.5, 9.5, 10.0),
        bullish(1, 10.2, 11.0),
        bullish(2, 11.0, 12.0),
    ];
    assert!(is_three_white_soldiers(&window).unwrap());
}

#[test]
fn test_soldiers_need_three_bars() {
    let window = [bullish(0, 9.5, 10.0), bullish(1, 10.0, 11.0)];
    assert!(!is_three_white_soldiers(&window).unwrap());
    assert!(!is_three_white_soldiers(&window[..1]).unwrap());
    assert!(!is_three_white_soldiers(&[]).unwrap());
}

#[test]
fn test_soldiers_third_close_below_second() {
    let window = [bullish(0, 9.5, 10.0), bullish(1, 10.0, 11.0), bullish(2, 10.0, 10.8)];
    assert!(!is_three_white_soldiers(&window).unwrap());
}

// ============================================================================
// Scanner
// ============================================================================

#[test]
fn test_scan_empty_sequence() {
    let recognizer = PatternRecognizer::default();
    let report = recognizer.scan(&[]);
    assert!(report.matches.is_empty());
    assert!(report.rejected.is_empty());
}

#[test]
fn test_scan_single_bar() {
    let recognizer = PatternRecognizer::default();
    let report = recognizer.scan(&[bar(0, 10.0, 11.2, 6.0, 11.0)]);
    assert_eq!(report.matches, vec![PatternMatch::new(PatternKind::Hammer, 0)]);
}

#[test]
fn test_scan_hammer_then_soldiers() {
    let bars = vec![
        bar(0, 10.0, 11.2, 6.0, 11.0), // hammer
        bar(1, 11.0, 11.5, 10.0, 10.5),
        bullish(2, 9.5, 10.0),
        bullish(3, 10.0, 11.0),
        bullish(4, 11.0, 12.0),
    ];

    let report = PatternRecognizer::default().scan(&bars);

    assert_eq!(
        report.matches,
        vec![
            PatternMatch::new(PatternKind::Hammer, 0),
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 2),
        ]
    );
    assert!(report.is_complete());
}

#[test]
fn test_scan_overlapping_soldiers_not_deduplicated() {
    let bars: Vec<Bar> = (0..5)
        .map(|i| bullish(i, 10.0 + i as f64, 11.0 + i as f64))
        .collect();

    let matches = PatternRecognizer::default().scan_strict(&bars).unwrap();

    assert_eq!(
        matches,
        vec![
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 0),
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 1),
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 2),
        ]
    );
}

#[test]
fn test_scan_skip_and_strict_agree_on_clean_input() {
    let bars = vec![
        bar(0, 10.0, 11.2, 6.0, 11.0),
        bullish(1, 11.0, 11.5),
        bullish(2, 11.5, 12.0),
        bar(3, 12.0, 12.1, 9.0, 11.8),
    ];
    let recognizer = PatternRecognizer::new(InvalidBarPolicy::Skip);

    assert_eq!(recognizer.scan(&bars).matches, recognizer.scan_strict(&bars).unwrap());
}

#[test]
fn test_scan_invalid_bar_never_contributes() {
    // bars[3] violates high >= max(open, close); every window through it is skipped
    let bars = vec![
        bullish(0, 9.5, 10.0),
        bullish(1, 10.0, 11.0),
        bullish(2, 11.0, 12.0),
        bar(3, 12.0, 12.5, 11.8, 13.0),
        bullish(4, 13.0, 14.0),
        bullish(5, 14.0, 15.0),
        bullish(6, 15.0, 16.0),
    ];

    let skip = PatternRecognizer::new(InvalidBarPolicy::Skip).scan(&bars);
    assert_eq!(
        skip.matches,
        vec![
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 0),
            PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 4),
        ]
    );
    assert_eq!(skip.rejected.len(), 1);
    assert_eq!(skip.rejected[0].index, 3);

    let abort = PatternRecognizer::new(InvalidBarPolicy::Abort).scan(&bars);
    assert_eq!(
        abort.matches,
        vec![PatternMatch::new(PatternKind::ThreeWhiteSoldiers, 0)]
    );
    assert_eq!(abort.rejected.len(), 1);

    assert!(PatternRecognizer::default().scan_strict(&bars).is_err());
}

proptest! {
    // Match counts are bounded by N hammers and N-2 soldiers, and output is ordered
    #[test]
    fn prop_scan_bounds_and_order(
        raw in prop::collection::vec((1.0f64..100.0, 0.0f64..5.0, 0.0f64..5.0, -5.0f64..5.0), 0..40)
    ) {
        let bars: Vec<Bar> = raw
            .iter()
            .enumerate()
            .map(|(i, &(open, up, down, delta))| {
                let close = (open + delta).max(0.0);
                let high = open.max(close) + up;
                let low = (open.min(close) - down).max(0.0);
                bar(i as i64, open, high, low, close)
            })
            .collect();

        let matches = PatternRecognizer::default().scan_strict(&bars).unwrap();
        let hammers = matches.iter().filter(|m| m.pattern == PatternKind::Hammer).count();
        let soldiers = matches.len() - hammers;

        prop_assert!(hammers <= bars.len());
        prop_assert!(soldiers <= bars.len().saturating_sub(2));

        // Evaluation index is start for hammers and start + 2 for soldiers
        let eval_index = |m: &PatternMatch| m.start_index + m.pattern.span() - 1;
        for pair in matches.windows(2) {
            let (a, b) = (eval_index(&pair[0]), eval_index(&pair[1]));
            prop_assert!(a < b || (a == b && pair[0].pattern == PatternKind::Hammer));
        }
    }
}
