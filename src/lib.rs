//! # Estimate
//!
//! 交通管制工程估價引擎。
//!
//! - [`model`]：資料模型、定價配置與錯誤類型
//! - [`calc`]：費率解析、明細彙總、成本/營收推導、階段彙總與格式化
//!
//! ```no_run
//! use estimate::{AdminData, BidDraft, EstimateCalculator, PricingConfig, RatedStatus};
//!
//! let calculator = EstimateCalculator::new(PricingConfig::default())?;
//! let bid = BidDraft::new(AdminData::new("C-1".to_string(), RatedStatus::Rated));
//! let result = calculator.calculate(&bid)?;
//! println!("{}", result.totals.total.revenue);
//! # Ok::<(), estimate::EstimateError>(())
//! ```

pub use estimate_calc as calc;
pub use estimate_core as model;

pub use estimate_core::{
    AdminData, AssociatedStructure, BidDraft, County, CustomLightItem, EmergencyRates,
    EquipmentCatalog, EquipmentInfo, EquipmentRentalItem, EquipmentType, EstimateError,
    FlaggingConfig, FlaggingEquipment, HardwareLine, Market, PermanentSignItem,
    PermanentSignKind, PermanentSigns, PermanentSignsCatalog, Phase, PricingConfig, PricingMode,
    Quote, QuoteItem, QuoteTerms, RatedStatus, Result, SaleItem, SheetingType, Sign,
};

pub use estimate_calc::{
    BidTotals, CategoryTotals, EstimateCalculator, EstimateResult, EstimateWarning,
    FlaggingCalculator, FlaggingSummary, FlaggingWork, PhaseSummary, QuoteCalculator,
    RollupTotals, SummaryFormatter, SummaryRow, WarningSeverity,
};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
