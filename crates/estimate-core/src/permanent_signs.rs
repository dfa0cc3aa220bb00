//! 永久標誌（PMS）安裝、重設、拆除項目

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::flagging::PricingMode;

/// 永久標誌作業類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermanentSignKind {
    /// 立柱式安裝 Type B
    InstallTypeB,
    /// 立柱式安裝 Type C
    InstallTypeC,
    /// 立柱式安裝 Type F（沿用既有立柱）
    InstallTypeF,
    /// 重設 Type B
    ResetTypeB,
    /// 重設 Type F
    ResetTypeF,
    /// 拆除 Type B
    RemoveTypeB,
    /// 拆除 Type F
    RemoveTypeF,
    /// 彈性導標安裝
    FlexibleDelineator,
}

impl PermanentSignKind {
    /// 是否為新標誌安裝（需計算標誌面板平方呎成本）
    pub fn is_install(&self) -> bool {
        matches!(
            self,
            PermanentSignKind::InstallTypeB
                | PermanentSignKind::InstallTypeC
                | PermanentSignKind::InstallTypeF
        )
    }

    /// 是否需要新立柱
    pub fn uses_post(&self) -> bool {
        matches!(
            self,
            PermanentSignKind::InstallTypeB
                | PermanentSignKind::InstallTypeC
                | PermanentSignKind::ResetTypeB
                | PermanentSignKind::ResetTypeF
        )
    }
}

/// 五金材料明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareLine {
    /// 價目表中的材料名稱（例如 antiTheftBolts、chevronBrackets）
    pub name: String,
    pub quantity: Decimal,
}

impl HardwareLine {
    pub fn new(name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// 永久標誌項目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermanentSignItem {
    pub id: Uuid,

    pub kind: PermanentSignKind,

    /// 數量（標誌或導標）
    pub quantity: Decimal,

    /// 施工人數
    pub personnel: u32,

    /// 車輛數
    pub number_trucks: u32,

    /// 所需安裝工時
    pub install_hours_required: Decimal,

    /// 標誌面板平方呎
    pub sign_sq_footage: Decimal,

    /// 每平方呎成本覆寫
    pub cost_per_sq_ft: Option<Decimal>,

    /// 五金材料
    pub hardware: Vec<HardwareLine>,

    /// 是否需單獨動員（不與其他項目共用工作日）
    pub separate_mobilization: bool,

    /// 計價模式
    pub pricing_mode: PricingMode,

    /// 自訂毛利率（百分比）
    pub custom_margin: Decimal,
}

impl PermanentSignItem {
    pub fn new(
        kind: PermanentSignKind,
        quantity: Decimal,
        personnel: u32,
        number_trucks: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            quantity,
            personnel,
            number_trucks,
            install_hours_required: Decimal::ZERO,
            sign_sq_footage: Decimal::ZERO,
            cost_per_sq_ft: None,
            hardware: Vec::new(),
            separate_mobilization: false,
            pricing_mode: PricingMode::Standard,
            custom_margin: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置安裝工時
    pub fn with_install_hours(mut self, hours: Decimal) -> Self {
        self.install_hours_required = hours;
        self
    }

    /// 建構器模式：設置標誌面板平方呎
    pub fn with_sign_sq_footage(mut self, sq_footage: Decimal) -> Self {
        self.sign_sq_footage = sq_footage;
        self
    }

    /// 建構器模式：覆寫每平方呎成本
    pub fn with_cost_per_sq_ft(mut self, cost: Decimal) -> Self {
        self.cost_per_sq_ft = Some(cost);
        self
    }

    /// 建構器模式：加入五金材料
    pub fn with_hardware(mut self, line: HardwareLine) -> Self {
        self.hardware.push(line);
        self
    }

    /// 建構器模式：單獨動員
    pub fn with_separate_mobilization(mut self, separate: bool) -> Self {
        self.separate_mobilization = separate;
        self
    }

    /// 建構器模式：自訂毛利率計價
    pub fn with_custom_margin(mut self, margin: Decimal) -> Self {
        self.pricing_mode = PricingMode::Custom;
        self.custom_margin = margin;
        self
    }
}

/// 永久標誌價目表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermanentSignsCatalog {
    /// 五金材料單價
    pub hardware_prices: BTreeMap<String, Decimal>,

    /// 立柱單價
    pub post_price: Decimal,

    /// 標誌面板每平方呎成本
    pub cost_per_sq_ft: Decimal,

    /// 標誌面板每平方呎售價
    pub price_per_sq_ft: Decimal,

    /// 彈性導標單價
    pub flexible_delineator_cost: Decimal,

    /// 材料加成（百分比）
    pub item_markup: Decimal,

    /// 每日最大安裝工時（排定天數與趟次用；未設定時以每日標準工時計）
    pub max_daily_hours: Decimal,
}

impl PermanentSignsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hardware_price(mut self, name: impl Into<String>, price: Decimal) -> Self {
        self.hardware_prices.insert(name.into(), price);
        self
    }

    pub fn with_post_price(mut self, price: Decimal) -> Self {
        self.post_price = price;
        self
    }

    pub fn with_sq_ft_pricing(mut self, cost: Decimal, price: Decimal) -> Self {
        self.cost_per_sq_ft = cost;
        self.price_per_sq_ft = price;
        self
    }

    pub fn with_flexible_delineator_cost(mut self, cost: Decimal) -> Self {
        self.flexible_delineator_cost = cost;
        self
    }

    pub fn with_item_markup(mut self, markup: Decimal) -> Self {
        self.item_markup = markup;
        self
    }

    pub fn with_max_daily_hours(mut self, hours: Decimal) -> Self {
        self.max_daily_hours = hours;
        self
    }

    /// 材料單價，未登錄時為零
    pub fn hardware_price(&self, name: &str) -> Decimal {
        self.hardware_prices
            .get(name)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// 永久標誌區塊（項目 + 價目表）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermanentSigns {
    pub items: Vec<PermanentSignItem>,
    pub catalog: PermanentSignsCatalog,
}

impl PermanentSigns {
    pub fn new(catalog: PermanentSignsCatalog) -> Self {
        Self {
            items: Vec::new(),
            catalog,
        }
    }

    pub fn with_item(mut self, item: PermanentSignItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_flags() {
        assert!(PermanentSignKind::InstallTypeF.is_install());
        assert!(!PermanentSignKind::InstallTypeF.uses_post());
        assert!(PermanentSignKind::ResetTypeF.uses_post());
        assert!(!PermanentSignKind::RemoveTypeB.uses_post());
        assert!(!PermanentSignKind::FlexibleDelineator.is_install());
    }

    #[test]
    fn test_catalog_missing_hardware_is_zero() {
        let catalog =
            PermanentSignsCatalog::new().with_hardware_price("antiTheftBolts", dec!(1.25));
        assert_eq!(catalog.hardware_price("antiTheftBolts"), dec!(1.25));
        assert_eq!(catalog.hardware_price("jennyBrackets"), Decimal::ZERO);
    }
}
