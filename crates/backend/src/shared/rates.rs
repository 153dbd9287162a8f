//! Division helpers for rates and shares.
//!
//! A zero (or non-finite) denominator yields `0`, never NaN or infinity.

pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

/// Percentage rounded to the nearest whole number, floored at zero
pub fn percent(numerator: f64, denominator: f64) -> u32 {
    let value = (ratio(numerator, denominator) * 100.0).round();
    if value <= 0.0 {
        0
    } else {
        value as u32
    }
}

/// Percentage rounded to the nearest whole number, sign preserved
pub fn percent_signed(numerator: f64, denominator: f64) -> i32 {
    (ratio(numerator, denominator) * 100.0).round() as i32
}

/// Percentage with one decimal: `33.3`
pub fn percent_one_decimal(numerator: f64, denominator: f64) -> f64 {
    (ratio(numerator, denominator) * 1000.0).round() / 10.0
}

/// Rounded mean, `0` for an empty sample
pub fn mean_rounded(total: f64, count: usize) -> u32 {
    let value = ratio(total, count as f64).round();
    if value <= 0.0 {
        0
    } else {
        value as u32
    }
}
