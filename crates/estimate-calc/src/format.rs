//! 摘要格式化
//!
//! 金額與百分比一律四捨五入（half-up）至小數兩位。

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::totals::BidTotals;
use crate::CategoryTotals;

/// 一列格式化後的類別摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub revenue: String,
    pub cost: String,
    pub gross_profit: String,
    pub gross_margin: String,
}

/// 摘要格式化器
pub struct SummaryFormatter;

impl SummaryFormatter {
    /// 四捨五入至分
    pub fn round_currency(value: Decimal) -> Decimal {
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// 金額，例如 `$1,234.57`、`-$12.00`
    pub fn currency(value: Decimal) -> String {
        let rounded = Self::round_currency(value);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        format!("{}${}", sign, group_thousands(rounded.abs()))
    }

    /// 百分比，例如 `40.00%`
    pub fn percent(value: Decimal) -> String {
        let rounded = Self::round_currency(value);
        if rounded.is_zero() {
            return "0.00%".to_string();
        }
        format!("{:.2}%", rounded)
    }

    pub fn format_category(label: &str, totals: &CategoryTotals) -> SummaryRow {
        SummaryRow {
            label: label.to_string(),
            revenue: Self::currency(totals.revenue),
            cost: Self::currency(totals.cost),
            gross_profit: Self::currency(totals.gross_profit),
            gross_margin: Self::percent(totals.gross_margin_percent),
        }
    }

    /// 各類別一列，最後一列為合計
    pub fn format_totals(totals: &BidTotals) -> Vec<SummaryRow> {
        totals
            .categories()
            .map(|(category, values)| Self::format_category(category.label(), values))
            .chain(std::iter::once(Self::format_category("Total", &totals.total)))
            .collect()
    }
}

/// 非負值加上千分位並固定兩位小數
fn group_thousands(value: Decimal) -> String {
    let fixed = format!("{:.2}", value);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    format!("{}.{}", grouped, fraction)
}
