//! 銷售品毛利

use estimate_core::sanitize::non_negative;
use estimate_core::SaleItem;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{margin_percent, CategoryTotals};

/// 單一銷售品毛利
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItemMargin {
    pub item_number: String,
    pub name: String,
    /// 含加成的單位售價
    pub unit_sale_price: Decimal,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub gross_profit: Decimal,
    pub gross_margin_percent: Decimal,
}

impl SaleItemMargin {
    /// 營收 = 報價 × (1 + 加成) × 數量，成本 = 報價 × 數量
    pub fn calculate(item: &SaleItem) -> Self {
        let quantity = non_negative(item.quantity);
        let quote_price = non_negative(item.quote_price);
        let unit_sale_price =
            quote_price * (Decimal::ONE + item.markup_percentage / Decimal::ONE_HUNDRED);
        let revenue = unit_sale_price * quantity;
        let cost = quote_price * quantity;
        let gross_profit = revenue - cost;

        Self {
            item_number: item.item_number.clone(),
            name: item.name.clone(),
            unit_sale_price,
            revenue,
            cost,
            gross_profit,
            gross_margin_percent: margin_percent(gross_profit, revenue),
        }
    }
}

/// 銷售品摘要
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SaleSummary {
    pub items: Vec<SaleItemMargin>,
    pub totals: CategoryTotals,
}

impl SaleSummary {
    pub fn calculate(items: &[SaleItem]) -> Self {
        let items: Vec<SaleItemMargin> = items.iter().map(SaleItemMargin::calculate).collect();
        let totals = items
            .iter()
            .map(|i| CategoryTotals::from_revenue_cost(i.revenue, i.cost))
            .sum();
        Self { items, totals }
    }
}
