//! 表單輸入清理
//!
//! 表單欄位可能是空字串、NaN 或負數；進入彙總前一律轉成非負的 Decimal。

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// 負數視為零
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// 從浮點表單值轉換，NaN / 無限大 / 負數視為零
pub fn from_form_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .map(non_negative)
        .unwrap_or(Decimal::ZERO)
}

/// 從字串表單值轉換，無法解析時視為零
pub fn from_form_str(value: &str) -> Decimal {
    let trimmed = value.trim().trim_start_matches('$').replace(',', "");
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&trimmed)
        .map(non_negative)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(f64::NAN, dec!(0))]
    #[case(f64::INFINITY, dec!(0))]
    #[case(-3.0, dec!(0))]
    #[case(2.5, dec!(2.5))]
    fn test_from_form_f64(#[case] input: f64, #[case] expected: Decimal) {
        assert_eq!(from_form_f64(input), expected);
    }

    #[rstest]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("-12", dec!(0))]
    #[case(" 42 ", dec!(42))]
    #[case("$1,250.50", dec!(1250.50))]
    fn test_from_form_str(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(from_form_str(input), expected);
    }
}
