use crate::error::PatternError;
use crate::models::Bar;
use crate::patterns::utils::*;

/// Three White Soldiers over the first three bars of `window`.
///
/// The second and third bars must each close bullish and above the previous
/// close. The first bar only anchors the rising-close check and may be
/// bearish. A window shorter than three bars is `Ok(false)`.
pub fn is_three_white_soldiers(window: &[Bar]) -> Result<bool, PatternError> {
    if window.len() < 3 {
        return Ok(false);
    }

    let window = &window[..3];
    for bar in window {
        ensure_valid(bar)?;
    }

    for i in 1..3 {
        let curr = &window[i];
        let prev = &window[i - 1];

        if !is_bullish(curr.open, curr.close) || curr.close <= prev.close {
            return Ok(false);
        }
    }

    Ok(true)
}
