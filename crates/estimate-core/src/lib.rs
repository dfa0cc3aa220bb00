//! # Estimate Core
//!
//! 估價核心資料模型與類型定義

pub mod admin;
pub mod bid;
pub mod config;
pub mod county;
pub mod equipment;
pub mod flagging;
pub mod line_items;
pub mod permanent_signs;
pub mod phase;
pub mod quote;
pub mod sanitize;

// Re-export 主要類型
pub use admin::{AdminData, EmergencyRates};
pub use bid::BidDraft;
pub use config::PricingConfig;
pub use county::{County, Market, RatedStatus};
pub use equipment::{
    AssociatedStructure, EquipmentCatalog, EquipmentInfo, EquipmentType, SheetingType,
};
pub use flagging::{FlaggingConfig, FlaggingEquipment, PricingMode};
pub use line_items::{CustomLightItem, EquipmentRentalItem, SaleItem, Sign};
pub use permanent_signs::{
    HardwareLine, PermanentSignItem, PermanentSignKind, PermanentSigns, PermanentSignsCatalog,
};
pub use phase::Phase;
pub use quote::{Quote, QuoteItem, QuoteTerms};

/// 估價錯誤類型
///
/// 缺少參考資料（例如尚未選擇縣別）不屬於錯誤，計算器會以零值與警告呈現；
/// 這裡只列出必須回報給使用者的資料完整性錯誤。
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("縣別 {county} 的目標毛利率無效: {percent}%（必須小於 100%）")]
    InvalidTargetMargin {
        county: String,
        percent: rust_decimal::Decimal,
    },

    #[error("{context} 的加成/毛利率無效: {percent}%（必須小於 100%）")]
    InvalidMarkup {
        context: String,
        percent: rust_decimal::Decimal,
    },

    #[error("估價單至少需要一個工程階段才能定稿")]
    NoPhases,

    #[error("縣別資料無效: {0}")]
    InvalidCounty(String),

    #[error("定價配置無效: {0}")]
    InvalidConfig(String),

    #[error("計算錯誤: {0}")]
    Calculation(String),
}

impl EstimateError {
    /// 是否為配置錯誤（縣別費率、定價參數或階段結構不完整）
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, EstimateError::Calculation(_))
    }
}

pub type Result<T> = std::result::Result<T, EstimateError>;
