//! 設備租賃
//!
//! 依名稱分組；分組中任一項目標記轉租時以轉租成本計算，否則以折舊計算。

use estimate_core::sanitize::non_negative;
use estimate_core::{EquipmentRentalItem, PricingConfig};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{margin_percent, CategoryTotals};

/// 單一設備租賃摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalItemSummary {
    pub name: String,
    pub total_quantity: Decimal,
    pub total_months: Decimal,
    pub revenue: Decimal,
    /// 轉租成本或折舊
    pub cost: Decimal,
    pub re_rent: bool,
}

impl RentalItemSummary {
    pub fn gross_profit(&self) -> Decimal {
        self.revenue - self.cost
    }

    pub fn gross_margin_percent(&self) -> Decimal {
        margin_percent(self.gross_profit(), self.revenue)
    }
}

/// 設備租賃摘要
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RentalSummary {
    pub items: Vec<RentalItemSummary>,
    pub totals: CategoryTotals,
}

impl RentalSummary {
    /// 計算租賃摘要（空名稱的項目略過，分組依首次出現順序）
    pub fn calculate(items: &[EquipmentRentalItem], config: &PricingConfig) -> Self {
        let mut groups: Vec<(&str, Vec<&EquipmentRentalItem>)> = Vec::new();
        for item in items.iter().filter(|i| !i.name.trim().is_empty()) {
            match groups.iter_mut().find(|(name, _)| *name == item.name) {
                Some((_, members)) => members.push(item),
                None => groups.push((item.name.as_str(), vec![item])),
            }
        }

        let summaries: Vec<RentalItemSummary> = groups
            .into_iter()
            .filter_map(|(name, members)| summarize_group(name, &members, config))
            .collect();

        let revenue: Decimal = summaries.iter().map(|s| s.revenue).sum();
        let cost: Decimal = summaries.iter().map(|s| s.cost).sum();

        Self {
            items: summaries,
            totals: CategoryTotals::from_revenue_cost(revenue, cost),
        }
    }
}

fn summarize_group(
    name: &str,
    members: &[&EquipmentRentalItem],
    config: &PricingConfig,
) -> Option<RentalItemSummary> {
    let first = members.first()?;
    let total_quantity: Decimal = members.iter().map(|i| non_negative(i.quantity)).sum();
    let total_months: Decimal = members.iter().map(|i| non_negative(i.months)).sum();

    let re_rent_item = members.iter().find(|i| i.re_rent_for_current_job);
    let (revenue, cost) = match re_rent_item {
        Some(item) => {
            let revenue = total_quantity * non_negative(item.rent_price) * total_months;
            let cost = non_negative(item.re_rent_price)
                * config.re_rent_markup
                * total_months
                * total_quantity;
            (revenue, cost)
        }
        None => {
            let revenue = total_quantity * non_negative(first.rent_price) * total_months;
            let cost = if first.useful_life_yrs > Decimal::ZERO {
                non_negative(first.total_cost) / (first.useful_life_yrs * Decimal::from(12))
                    * total_months
                    * total_quantity
            } else {
                Decimal::ZERO
            };
            (revenue, cost)
        }
    };

    Some(RentalItemSummary {
        name: name.to_string(),
        total_quantity,
        total_months,
        revenue,
        cost,
        re_rent: re_rent_item.is_some(),
    })
}
