// Position sizing helpers for acting on an opportunity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Stop price `stop_loss_pct` percent below `entry_price`.
pub fn stop_loss_price(entry_price: Decimal, stop_loss_pct: Decimal) -> Decimal {
    entry_price * (Decimal::ONE - stop_loss_pct / dec!(100))
}

/// Units to hold so that hitting the stop loses `risk_pct` percent of `balance`.
/// Zero when the stop sits at the current price.
pub fn position_size(
    balance: Decimal,
    risk_pct: Decimal,
    stop_loss_price: Decimal,
    current_price: Decimal,
) -> Decimal {
    let risk_per_unit = (current_price - stop_loss_price).abs();
    if risk_per_unit.is_zero() {
        return Decimal::ZERO;
    }
    balance * risk_pct / dec!(100) / risk_per_unit
}
