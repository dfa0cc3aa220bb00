//! 明細彙總
//!
//! 將各類明細加總為數量、平方呎與成本。負數一律視為零，
//! 四捨五入只在格式化時進行。

use estimate_core::sanitize::non_negative;
use estimate_core::{
    EquipmentCatalog, EquipmentType, FlaggingEquipment, Phase, SaleItem, SheetingType, Sign,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// 單一類別的彙總結果
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Aggregate {
    pub total_quantity: Decimal,
    /// 平方呎（僅標誌類別適用）
    pub total_sqft: Option<Decimal>,
    pub total_cost: Decimal,
}

impl Aggregate {
    fn add(&mut self, quantity: Decimal, cost: Decimal) {
        self.total_quantity += quantity;
        self.total_cost += cost;
    }
}

/// 設備跨階段數量與天數
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EquipmentTotal {
    pub total_quantity: Decimal,
    /// 有使用該設備的階段天數總和
    pub total_days: u32,
}

/// 明細彙總器
pub struct LineItemAggregator;

impl LineItemAggregator {
    /// 彙總標誌（數量、平方呎、依反光膜單價計算的成本）
    pub fn signs<'a>(
        signs: impl IntoIterator<Item = &'a Sign>,
        catalog: &EquipmentCatalog,
    ) -> Aggregate {
        let mut aggregate = Aggregate {
            total_sqft: Some(Decimal::ZERO),
            ..Aggregate::default()
        };
        let mut sqft_total = Decimal::ZERO;

        for sign in signs.into_iter().filter(|s| s.is_countable()) {
            let sqft = sign.square_footage();
            let unit_price = catalog
                .sheeting_info(sign.sheeting)
                .map(|info| info.price)
                .unwrap_or(Decimal::ZERO);
            sqft_total += sqft;
            aggregate.add(sign.quantity, sqft * unit_price);
        }

        aggregate.total_sqft = Some(sqft_total);
        aggregate
    }

    /// 彙總所有階段的標準設備（數量 × 購置價）
    pub fn equipment(phases: &[Phase], catalog: &EquipmentCatalog) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for phase in phases {
            for (equipment_type, quantity) in &phase.standard_equipment {
                let quantity = non_negative(*quantity);
                let price = catalog
                    .equipment_info(*equipment_type)
                    .map(|info| info.price)
                    .unwrap_or(Decimal::ZERO);
                aggregate.add(quantity, quantity * price);
            }
        }
        aggregate
    }

    /// 彙總銷售品（數量 × 報價）
    pub fn sale_items(items: &[SaleItem]) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for item in items {
            let quantity = non_negative(item.quantity);
            aggregate.add(quantity, quantity * non_negative(item.quote_price));
        }
        aggregate
    }

    /// 彙總交通管制附帶設備（不論是否計入包價）
    pub fn flagging_equipment<'a>(
        items: impl IntoIterator<Item = &'a FlaggingEquipment>,
    ) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for item in items {
            let quantity = non_negative(item.quantity);
            aggregate.add(quantity, quantity * non_negative(item.cost));
        }
        aggregate
    }

    /// 各設備類型的跨階段數量與天數
    pub fn equipment_totals(phases: &[Phase]) -> BTreeMap<EquipmentType, EquipmentTotal> {
        let mut totals: BTreeMap<EquipmentType, EquipmentTotal> = EquipmentType::ALL
            .iter()
            .map(|e| (*e, EquipmentTotal::default()))
            .collect();

        for phase in phases {
            for (equipment_type, quantity) in &phase.standard_equipment {
                let entry = totals.entry(*equipment_type).or_default();
                entry.total_quantity += non_negative(*quantity);
                entry.total_days += phase.days;
            }
        }

        totals
    }

    /// 各反光膜類型的總平方呎
    pub fn sign_square_footage(phases: &[Phase]) -> BTreeMap<SheetingType, Decimal> {
        let mut totals: BTreeMap<SheetingType, Decimal> = SheetingType::ALL
            .iter()
            .map(|s| (*s, Decimal::ZERO))
            .collect();

        for sign in phases.iter().flat_map(|p| p.signs.iter()) {
            *totals.entry(sign.sheeting).or_default() += sign.square_footage();
        }

        totals
    }

    /// 設備加權平均天數（Σ 數量 × 天數 / Σ 數量），僅供顯示
    pub fn weighted_equipment_days(phases: &[Phase]) -> BTreeMap<EquipmentType, Decimal> {
        let mut weighted: BTreeMap<EquipmentType, (Decimal, Decimal)> = BTreeMap::new();

        for phase in phases {
            let days = Decimal::from(phase.days);
            for (equipment_type, quantity) in &phase.standard_equipment {
                let quantity = non_negative(*quantity);
                let entry = weighted.entry(*equipment_type).or_default();
                entry.0 += quantity * days;
                entry.1 += quantity;
            }
        }

        EquipmentType::ALL
            .iter()
            .map(|e| {
                let (day_product, quantity) = weighted.get(e).copied().unwrap_or_default();
                (*e, weighted_average(day_product, quantity))
            })
            .collect()
    }

    /// 反光膜加權平均天數（以平方呎加權），僅供顯示
    pub fn weighted_sheeting_days(phases: &[Phase]) -> BTreeMap<SheetingType, Decimal> {
        let mut weighted: BTreeMap<SheetingType, (Decimal, Decimal)> = BTreeMap::new();

        for phase in phases {
            let days = Decimal::from(phase.days);
            for sign in &phase.signs {
                let sqft = sign.square_footage();
                let entry = weighted.entry(sign.sheeting).or_default();
                entry.0 += sqft * days;
                entry.1 += sqft;
            }
        }

        SheetingType::ALL
            .iter()
            .map(|s| {
                let (day_product, sqft) = weighted.get(s).copied().unwrap_or_default();
                (*s, weighted_average(day_product, sqft))
            })
            .collect()
    }

    /// 主標誌所需的結構物、遮罩與警示燈數量
    pub fn associated_sign_equipment(phase: &Phase) -> BTreeMap<EquipmentType, Decimal> {
        let mut totals = BTreeMap::new();

        for sign in phase.signs.iter().filter(|s| s.is_countable()) {
            *totals.entry(EquipmentType::BLights).or_insert(Decimal::ZERO) +=
                non_negative(sign.b_lights) * sign.quantity;

            if sign.cover {
                *totals.entry(EquipmentType::Covers).or_insert(Decimal::ZERO) += sign.quantity;
            }

            if let Some(structure) = sign.structure.equipment_type() {
                *totals.entry(structure).or_insert(Decimal::ZERO) += sign.quantity;
            }
        }

        totals
    }
}

fn weighted_average(weighted_sum: Decimal, weight: Decimal) -> Decimal {
    if weight.is_zero() {
        Decimal::ZERO
    } else {
        weighted_sum / weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::{AssociatedStructure, EquipmentInfo};
    use rust_decimal_macros::dec;

    fn catalog() -> EquipmentCatalog {
        EquipmentCatalog::new()
            .with_equipment(
                EquipmentType::FourFootTypeIII,
                EquipmentInfo::new(dec!(150), dec!(0), dec!(10)),
            )
            .with_equipment(EquipmentType::Post, EquipmentInfo::new(dec!(44), dec!(0), dec!(7)))
            .with_sheeting(SheetingType::Dg, EquipmentInfo::new(dec!(12), dec!(0), dec!(3)))
    }

    #[test]
    fn test_empty_lists_are_zero() {
        let empty_signs: Vec<Sign> = Vec::new();
        let signs = LineItemAggregator::signs(&empty_signs, &catalog());
        assert_eq!(signs.total_quantity, Decimal::ZERO);
        assert_eq!(signs.total_cost, Decimal::ZERO);
        assert_eq!(signs.total_sqft, Some(Decimal::ZERO));

        let sale = LineItemAggregator::sale_items(&[]);
        assert_eq!(sale, Aggregate::default());

        let equipment = LineItemAggregator::equipment(&[], &catalog());
        assert_eq!(equipment.total_quantity, Decimal::ZERO);
        assert_eq!(equipment.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_sign_aggregate() {
        let signs = vec![
            Sign::new("W20-1".to_string(), dec!(48), dec!(48), dec!(2), SheetingType::Dg),
            Sign::new("W20-4".to_string(), dec!(36), dec!(36), dec!(4), SheetingType::Dg),
            Sign::new("BAD".to_string(), dec!(0), dec!(36), dec!(4), SheetingType::Dg),
        ];
        let aggregate = LineItemAggregator::signs(&signs, &catalog());
        // 16 × 2 + 9 × 4 = 68 平方呎
        assert_eq!(aggregate.total_sqft, Some(dec!(68)));
        assert_eq!(aggregate.total_quantity, dec!(6));
        assert_eq!(aggregate.total_cost, dec!(816));
    }

    #[test]
    fn test_negative_quantities_are_zero() {
        let items = vec![
            SaleItem::new("1".to_string(), "Cone".to_string(), dec!(-5), dec!(10), dec!(20)),
            SaleItem::new("2".to_string(), "Drum".to_string(), dec!(3), dec!(40), dec!(20)),
        ];
        let aggregate = LineItemAggregator::sale_items(&items);
        assert_eq!(aggregate.total_quantity, dec!(3));
        assert_eq!(aggregate.total_cost, dec!(120));
    }

    #[test]
    fn test_equipment_totals_and_weighted_days() {
        let phases = vec![
            Phase::new("A".to_string(), 10, 2, 1)
                .with_equipment(EquipmentType::FourFootTypeIII, dec!(10)),
            Phase::new("B".to_string(), 20, 2, 1)
                .with_equipment(EquipmentType::FourFootTypeIII, dec!(30)),
        ];

        let totals = LineItemAggregator::equipment_totals(&phases);
        let four_foot = totals[&EquipmentType::FourFootTypeIII];
        assert_eq!(four_foot.total_quantity, dec!(40));
        assert_eq!(four_foot.total_days, 30);

        // (10 × 10 + 30 × 20) / 40 = 17.5
        let weighted = LineItemAggregator::weighted_equipment_days(&phases);
        assert_eq!(weighted[&EquipmentType::FourFootTypeIII], dec!(17.5));
        assert_eq!(weighted[&EquipmentType::Post], Decimal::ZERO);

        let equipment = LineItemAggregator::equipment(&phases, &catalog());
        assert_eq!(equipment.total_cost, dec!(6000));
    }

    #[test]
    fn test_associated_sign_equipment() {
        let phase = Phase::new("A".to_string(), 5, 2, 1)
            .with_sign(
                Sign::new("W3-1".to_string(), dec!(48), dec!(48), dec!(2), SheetingType::Hi)
                    .with_structure(AssociatedStructure::FourFootTypeIII)
                    .with_b_lights(dec!(2))
                    .with_cover(true),
            )
            .with_sign(
                Sign::new("R2-1".to_string(), dec!(24), dec!(30), dec!(3), SheetingType::Hi)
                    .with_structure(AssociatedStructure::Post),
            );

        let totals = LineItemAggregator::associated_sign_equipment(&phase);
        assert_eq!(totals[&EquipmentType::FourFootTypeIII], dec!(2));
        assert_eq!(totals[&EquipmentType::Post], dec!(3));
        assert_eq!(totals[&EquipmentType::BLights], dec!(4));
        assert_eq!(totals[&EquipmentType::Covers], dec!(2));
    }

    #[test]
    fn test_flagging_equipment_aggregate() {
        let arrow = FlaggingEquipment::new(dec!(2), dec!(100), true);
        let tma = FlaggingEquipment::new(dec!(1), dec!(500), false);
        let aggregate = LineItemAggregator::flagging_equipment([&arrow, &tma]);
        assert_eq!(aggregate.total_quantity, dec!(3));
        assert_eq!(aggregate.total_cost, dec!(700));
    }
}
