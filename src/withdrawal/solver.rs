//! Closed-form solver for a level withdrawal that lands on a target balance

/// Below this distance from 1.0 the growth factor is treated as no growth
const NO_GROWTH_TOLERANCE: f64 = 1e-9;

/// Solve for the constant per-period withdrawal `W`.
///
/// The balance starts at `principal`, grows each period at the after-tax rate
/// `rate * (1 - tax_rate)`, then has `W` taken out. After `periods` periods it
/// must equal `target`:
///
/// `W = (P * R - T) * r_net / (R - 1)` with `R = (1 + r_net)^n`.
///
/// Returns 0 when there are no periods left or when even `W = 0` misses the
/// target.
pub fn sustainable_withdrawal(
    principal: f64,
    target: f64,
    rate: f64,
    periods: i64,
    tax_rate: f64,
) -> f64 {
    if periods <= 0 {
        return 0.0;
    }

    let n = periods as f64;
    let r_net = rate * (1.0 - tax_rate);
    let growth = (1.0 + r_net).powf(n);

    let withdrawal = if (growth - 1.0).abs() < NO_GROWTH_TOLERANCE {
        (principal - target) / n
    } else {
        (principal * growth - target) * r_net / (growth - 1.0)
    };

    withdrawal.max(0.0)
}
