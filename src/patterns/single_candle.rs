use crate::error::PatternError;
use crate::models::Bar;
use crate::patterns::utils::*;

// Hammer: long lower shadow (more than twice the body) and an upper
// shadow under half the body. A zero-body bar can never satisfy the
// second condition.
pub fn is_hammer(bar: &Bar) -> Result<bool, PatternError> {
    ensure_valid(bar)?;

    let body = body_size(bar.open, bar.close);
    let lower = lower_shadow(bar.low, bar.open, bar.close);
    let upper = upper_shadow(bar.high, bar.open, bar.close);

    Ok(lower > 2.0 * body && upper < 0.5 * body)
}
