//! 估價明細項目（標誌、自訂燈具、設備租賃、銷售品）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::equipment::{AssociatedStructure, SheetingType};
use crate::sanitize::{from_form_f64, from_form_str};

/// 施工標誌
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sign {
    /// 標誌ID
    pub id: Uuid,

    /// MUTCD 編號
    pub designation: String,

    /// 寬（吋）
    pub width: Decimal,

    /// 高（吋）
    pub height: Decimal,

    /// 數量
    pub quantity: Decimal,

    /// 反光膜
    pub sheeting: SheetingType,

    /// 掛載結構物
    pub structure: AssociatedStructure,

    /// 每面標誌的 B 型警示燈數
    pub b_lights: Decimal,

    /// 是否附遮罩
    pub cover: bool,
}

impl Sign {
    /// 創建新的標誌（預設散裝、無燈、無遮罩）
    pub fn new(
        designation: String,
        width: Decimal,
        height: Decimal,
        quantity: Decimal,
        sheeting: SheetingType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            designation,
            width,
            height,
            quantity,
            sheeting,
            structure: AssociatedStructure::None,
            b_lights: Decimal::ZERO,
            cover: false,
        }
    }

    /// 從表單數值建立（NaN、無限大與負數視為零）
    pub fn from_form(
        designation: String,
        width: f64,
        height: f64,
        quantity: f64,
        sheeting: SheetingType,
    ) -> Self {
        Self::new(
            designation,
            from_form_f64(width),
            from_form_f64(height),
            from_form_f64(quantity),
            sheeting,
        )
    }

    /// 建構器模式：設置結構物
    pub fn with_structure(mut self, structure: AssociatedStructure) -> Self {
        self.structure = structure;
        self
    }

    /// 建構器模式：設置警示燈數
    pub fn with_b_lights(mut self, b_lights: Decimal) -> Self {
        self.b_lights = b_lights;
        self
    }

    /// 建構器模式：設置遮罩
    pub fn with_cover(mut self, cover: bool) -> Self {
        self.cover = cover;
        self
    }

    /// 尺寸與數量皆為正才納入計算
    pub fn is_countable(&self) -> bool {
        self.width > Decimal::ZERO && self.height > Decimal::ZERO && self.quantity > Decimal::ZERO
    }

    /// 總平方呎數（寬 × 高 / 144 × 數量）
    pub fn square_footage(&self) -> Decimal {
        if !self.is_countable() {
            return Decimal::ZERO;
        }
        self.width * self.height / Decimal::from(144) * self.quantity
    }
}

/// 自訂燈具/筒錐項目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomLightItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    /// 購置單價
    pub cost: Decimal,
    /// 耐用年限（年）
    pub useful_life: Decimal,
}

impl CustomLightItem {
    pub fn new(name: String, quantity: Decimal, cost: Decimal, useful_life: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            quantity,
            cost,
            useful_life,
        }
    }
}

/// 設備租賃項目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRentalItem {
    /// 設備名稱（同名項目合併計算）
    pub name: String,

    /// 數量
    pub quantity: Decimal,

    /// 租期（月）
    pub months: Decimal,

    /// 每月租金
    pub rent_price: Decimal,

    /// 每月轉租成本
    pub re_rent_price: Decimal,

    /// 是否為本案轉租
    pub re_rent_for_current_job: bool,

    /// 購置成本
    pub total_cost: Decimal,

    /// 耐用年限（年）
    pub useful_life_yrs: Decimal,
}

impl EquipmentRentalItem {
    pub fn new(name: String, quantity: Decimal, months: Decimal, rent_price: Decimal) -> Self {
        Self {
            name,
            quantity,
            months,
            rent_price,
            re_rent_price: Decimal::ZERO,
            re_rent_for_current_job: false,
            total_cost: Decimal::ZERO,
            useful_life_yrs: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置自有設備的購置成本與耐用年限
    pub fn with_ownership(mut self, total_cost: Decimal, useful_life_yrs: Decimal) -> Self {
        self.total_cost = total_cost;
        self.useful_life_yrs = useful_life_yrs;
        self
    }

    /// 建構器模式：改為轉租
    pub fn with_re_rent(mut self, re_rent_price: Decimal) -> Self {
        self.re_rent_price = re_rent_price;
        self.re_rent_for_current_job = true;
        self
    }
}

/// 銷售品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub item_number: String,
    pub name: String,
    pub vendor: Option<String>,
    pub quantity: Decimal,
    /// 供應商報價（單位成本）
    pub quote_price: Decimal,
    /// 加成（百分比）
    pub markup_percentage: Decimal,
}

impl SaleItem {
    pub fn new(
        item_number: String,
        name: String,
        quantity: Decimal,
        quote_price: Decimal,
        markup_percentage: Decimal,
    ) -> Self {
        Self {
            item_number,
            name,
            vendor: None,
            quantity,
            quote_price,
            markup_percentage,
        }
    }

    /// 從表單字串建立，無法解析的欄位視為零
    pub fn from_form(
        item_number: String,
        name: String,
        quantity: &str,
        quote_price: &str,
        markup_percentage: &str,
    ) -> Self {
        Self::new(
            item_number,
            name,
            from_form_str(quantity),
            from_form_str(quote_price),
            from_form_str(markup_percentage),
        )
    }

    pub fn with_vendor(mut self, vendor: String) -> Self {
        self.vendor = Some(vendor);
        self
    }
}
