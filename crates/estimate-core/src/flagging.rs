//! 交通管制（flagging）配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 計價模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMode {
    /// 標準包價（依縣別費率推算每人包價）
    Standard,
    /// 自訂（成本 / (1 - 加成率)）
    Custom,
}

/// 附帶設備（箭頭板、訊息板、TMA）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlaggingEquipment {
    pub quantity: Decimal,
    pub cost: Decimal,
    /// 是否計入包價
    pub include_in_lump_sum: bool,
}

impl FlaggingEquipment {
    pub fn new(quantity: Decimal, cost: Decimal, include_in_lump_sum: bool) -> Self {
        Self {
            quantity,
            cost,
            include_in_lump_sum,
        }
    }
}

/// 交通管制配置
///
/// 只保存輸入值；標準包價每次由計算器推導，不另行儲存。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggingConfig {
    /// 人數
    pub personnel: u32,

    /// 計價模式
    pub pricing_mode: PricingMode,

    /// 每車派遣費
    pub truck_dispatch_fee: Decimal,

    /// 現場工作時間（分鐘）
    pub on_site_job_minutes: Decimal,

    /// 車輛數
    pub number_trucks: u32,

    /// 油耗（英里/加侖），零時使用預設值
    pub fuel_economy_mpg: Decimal,

    /// 每加侖燃料價格
    pub fuel_cost_per_gallon: Decimal,

    /// 勞工保險費率（百分比），零時使用預設值
    pub worker_comp: Decimal,

    /// 一般責任險（每千元），零時使用預設值
    pub general_liability: Decimal,

    /// 自訂模式加成率（百分比）
    pub markup_rate: Decimal,

    /// 其他設備成本
    pub additional_equipment_cost: Decimal,

    pub arrow_boards: FlaggingEquipment,
    pub message_boards: FlaggingEquipment,
    pub tma: FlaggingEquipment,
}

impl FlaggingConfig {
    /// 創建新的配置（標準包價模式）
    pub fn new(personnel: u32) -> Self {
        Self {
            personnel,
            pricing_mode: PricingMode::Standard,
            truck_dispatch_fee: Decimal::ZERO,
            on_site_job_minutes: Decimal::ZERO,
            number_trucks: 0,
            fuel_economy_mpg: Decimal::ZERO,
            fuel_cost_per_gallon: Decimal::ZERO,
            worker_comp: Decimal::ZERO,
            general_liability: Decimal::ZERO,
            markup_rate: Decimal::ZERO,
            additional_equipment_cost: Decimal::ZERO,
            arrow_boards: FlaggingEquipment::default(),
            message_boards: FlaggingEquipment::default(),
            tma: FlaggingEquipment::default(),
        }
    }

    /// 建構器模式：改為自訂模式並設置加成率
    pub fn with_custom_pricing(mut self, markup_rate: Decimal) -> Self {
        self.pricing_mode = PricingMode::Custom;
        self.markup_rate = markup_rate;
        self
    }

    /// 建構器模式：設置派遣費
    pub fn with_dispatch_fee(mut self, fee: Decimal) -> Self {
        self.truck_dispatch_fee = fee;
        self
    }

    /// 建構器模式：設置現場工作時間（分鐘）
    pub fn with_on_site_minutes(mut self, minutes: Decimal) -> Self {
        self.on_site_job_minutes = minutes;
        self
    }

    /// 建構器模式：設置車輛與燃料
    pub fn with_trucks(mut self, trucks: u32, mpg: Decimal, fuel_cost_per_gallon: Decimal) -> Self {
        self.number_trucks = trucks;
        self.fuel_economy_mpg = mpg;
        self.fuel_cost_per_gallon = fuel_cost_per_gallon;
        self
    }

    /// 建構器模式：設置保險費率
    pub fn with_insurance(mut self, general_liability: Decimal, worker_comp: Decimal) -> Self {
        self.general_liability = general_liability;
        self.worker_comp = worker_comp;
        self
    }

    /// 建構器模式：設置附帶設備
    pub fn with_equipment(
        mut self,
        arrow_boards: FlaggingEquipment,
        message_boards: FlaggingEquipment,
        tma: FlaggingEquipment,
    ) -> Self {
        self.arrow_boards = arrow_boards;
        self.message_boards = message_boards;
        self.tma = tma;
        self
    }

    /// 建構器模式：設置其他設備成本
    pub fn with_additional_equipment_cost(mut self, cost: Decimal) -> Self {
        self.additional_equipment_cost = cost;
        self
    }

    pub fn is_standard_pricing(&self) -> bool {
        self.pricing_mode == PricingMode::Standard
    }

    /// 現場工作時數
    pub fn on_site_hours(&self) -> Decimal {
        self.on_site_job_minutes / Decimal::from(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_standard() {
        let flagging = FlaggingConfig::new(2);
        assert!(flagging.is_standard_pricing());
        assert_eq!(flagging.personnel, 2);
    }

    #[test]
    fn test_custom_pricing_builder() {
        let flagging = FlaggingConfig::new(3)
            .with_custom_pricing(dec!(30))
            .with_on_site_minutes(dec!(600));
        assert_eq!(flagging.pricing_mode, PricingMode::Custom);
        assert_eq!(flagging.on_site_hours(), dec!(10));
    }
}
