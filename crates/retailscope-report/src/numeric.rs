use rust_decimal::{Decimal, RoundingStrategy};

/// Round like SQL `ROUND(x, dp)`: halves go away from zero and the result
/// always carries `dp` fractional digits.
pub fn round_sql(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// `part / whole * 100` rounded to `dp`, or zero when `whole` is zero.
///
/// Ratios beyond the `Decimal` range saturate.
pub fn percentage(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled.checked_div(whole),
        None => part
            .checked_div(whole)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED)),
    };
    round_sql(ratio.unwrap_or_else(|| saturated(part, whole)), dp)
}

fn saturated(part: Decimal, whole: Decimal) -> Decimal {
    if part.is_sign_negative() == whole.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_sql(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_sql(dec!(-2.345), 2), dec!(-2.35));
        assert_eq!(round_sql(dec!(1.0005), 3), dec!(1.001));
    }

    #[test]
    fn percentage_saturates_instead_of_overflowing() {
        assert_eq!(percentage(Decimal::MAX, dec!(1), 2), round_sql(Decimal::MAX, 2));
        assert_eq!(percentage(Decimal::MAX, dec!(0.5), 2), round_sql(Decimal::MAX, 2));
        assert_eq!(percentage(Decimal::MIN, dec!(0.5), 2), round_sql(Decimal::MIN, 2));
        assert_eq!(percentage(Decimal::MAX, Decimal::MAX, 3), dec!(100.000));
    }

    #[test]
    fn rounding_pads_to_scale() {
        assert_eq!(round_sql(dec!(20), 2).to_string(), "20.00");
        assert_eq!(percentage(dec!(1), dec!(2), 3).to_string(), "50.000");
    }

    #[test]
    fn percentage_of_zero_is_zero() {
        assert_eq!(percentage(dec!(5), Decimal::ZERO, 2), Decimal::ZERO);
        assert_eq!(percentage(dec!(50), dec!(1000), 2), dec!(5.00));
        assert_eq!(percentage(dec!(1), dec!(3), 3), dec!(33.333));
    }
}
