//! # Estimate Calculation Engine
//!
//! 估價計算引擎：費率解析、明細彙總、成本/營收推導、階段彙總與格式化。
//! 所有計算皆為純函數，不做 I/O，也不保存跨呼叫的狀態。

pub mod aggregation;
pub mod calculator;
pub mod flagging;
pub mod format;
pub mod mpt;
pub mod permanent_signs;
pub mod phase_rollup;
pub mod quote;
pub mod rates;
pub mod rental;
pub mod sale;
pub mod totals;

use rust_decimal::Decimal;
use serde::Serialize;

// Re-export 主要類型
pub use aggregation::{Aggregate, EquipmentTotal, LineItemAggregator};
pub use calculator::EstimateCalculator;
pub use flagging::{FlaggingCalculator, FlaggingSummary, FlaggingWork, MarkupOption};
pub use format::{SummaryFormatter, SummaryRow};
pub use mpt::{CostMetrics, LaborSummary, MptCalculator, PhaseSummary, TruckSummary};
pub use permanent_signs::{
    schedule_trips, PermanentSignLine, PermanentSignsCalculator, PermanentSignsSummary,
    ScheduledTrips, TripSchedule,
};
pub use phase_rollup::{PhaseRollup, RollupTotals};
pub use quote::{QuoteCalculator, QuoteTotals};
pub use rates::{RateResolver, ResolvedRates};
pub use rental::{RentalItemSummary, RentalSummary};
pub use sale::{SaleItemMargin, SaleSummary};
pub use totals::{BidTotals, Category, RevenueShare};

/// 單一類別的營收、成本、毛利與毛利率
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryTotals {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub gross_profit: Decimal,
    /// 毛利率（百分比），營收為零時為零
    pub gross_margin_percent: Decimal,
}

impl CategoryTotals {
    /// 由營收與成本推導
    pub fn from_revenue_cost(revenue: Decimal, cost: Decimal) -> Self {
        let gross_profit = revenue - cost;
        Self {
            revenue,
            cost,
            gross_profit,
            gross_margin_percent: margin_percent(gross_profit, revenue),
        }
    }

    /// 合併兩個類別
    pub fn combine(&self, other: &CategoryTotals) -> Self {
        Self::from_revenue_cost(self.revenue + other.revenue, self.cost + other.cost)
    }

    pub fn is_zero(&self) -> bool {
        self.revenue.is_zero() && self.cost.is_zero()
    }
}

impl std::iter::Sum for CategoryTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(CategoryTotals::default(), |acc, t| acc.combine(&t))
    }
}

/// 毛利 / 營收 × 100，營收為零時為零
pub fn margin_percent(gross_profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue.is_zero() {
        Decimal::ZERO
    } else {
        gross_profit / revenue * Decimal::ONE_HUNDRED
    }
}

/// 估價計算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    /// 估價單ID
    pub bid_id: uuid::Uuid,

    /// 各類別與總計
    pub totals: BidTotals,

    /// 各階段推導結果
    pub phases: Vec<PhaseSummary>,

    /// 階段彙總
    pub rollup: RollupTotals,

    /// 交通管制
    pub flagging: Option<FlaggingSummary>,

    /// 服務工作
    pub service_work: Option<FlaggingSummary>,

    /// 設備租賃
    pub rental: RentalSummary,

    /// 銷售品
    pub sale: SaleSummary,

    /// 永久標誌
    pub permanent_signs: PermanentSignsSummary,

    /// 警告信息
    pub warnings: Vec<EstimateWarning>,
}

impl EstimateResult {
    /// 添加警告
    pub fn add_warning(&mut self, warning: EstimateWarning) {
        self.warnings.push(warning);
    }

    /// 是否有指定嚴重度以上的警告
    pub fn has_warnings_at_least(&self, severity: WarningSeverity) -> bool {
        self.warnings.iter().any(|w| w.severity >= severity)
    }
}

/// 估價警告（缺少參考資料、輸入被清理等非致命狀況）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateWarning {
    /// 來源（例如 county、phase:Phase 1、flagging）
    pub source: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl EstimateWarning {
    pub fn new(source: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            source,
            message,
            severity,
        }
    }

    pub fn info(source: String, message: String) -> Self {
        Self::new(source, message, WarningSeverity::Info)
    }

    pub fn warning(source: String, message: String) -> Self {
        Self::new(source, message, WarningSeverity::Warning)
    }

    pub fn error(source: String, message: String) -> Self {
        Self::new(source, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
