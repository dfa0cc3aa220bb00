//! 定價配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::county::RatedStatus;
use crate::{EstimateError, Result};

/// 定價參數配置
///
/// 集中所有估價公式中使用的業務常數。分數欄位（如加班毛利率）以 0~1 表示，
/// 百分比欄位以 0~100 表示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// 每日標準工時
    pub hours_per_day: Decimal,

    /// 加班倍率
    pub overtime_multiplier: Decimal,

    /// rated 加班毛利率（分數）
    pub rated_overtime_margin: Decimal,

    /// non-rated 加班毛利率（分數）
    pub non_rated_overtime_margin: Decimal,

    /// 動員市場每人加收費用
    pub mobilization_fee_per_person: Decimal,

    /// 施工人工加成（百分比，100 代表成本加倍）
    pub labor_markup_percent: Decimal,

    /// MPT 每車每趟派遣費
    pub mpt_dispatch_fee: Decimal,

    /// MPT 車輛油耗（英里/加侖）
    pub mpg_per_truck: Decimal,

    /// 燈具目標投資倍數（MOIC）
    pub target_moic: Decimal,

    /// 燈具回收期（年）
    pub payback_period_years: Decimal,

    /// 燈具年使用率（分數）
    pub annual_utilization: Decimal,

    /// 轉租成本係數
    pub re_rent_markup: Decimal,

    /// 交通管制預設一般責任險（每千元人工）
    pub default_general_liability: Decimal,

    /// 交通管制預設勞工保險費率（百分比）
    pub default_worker_comp: Decimal,

    /// 交通管制預設油耗
    pub default_fuel_economy_mpg: Decimal,

    /// 交通管制預設派遣費
    pub default_truck_dispatch_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            hours_per_day: Decimal::from(8),
            overtime_multiplier: Decimal::new(15, 1),
            rated_overtime_margin: Decimal::new(40, 2),
            non_rated_overtime_margin: Decimal::new(55, 2),
            mobilization_fee_per_person: Decimal::from(175),
            labor_markup_percent: Decimal::ONE_HUNDRED,
            mpt_dispatch_fee: Decimal::from(50),
            mpg_per_truck: Decimal::from(8),
            target_moic: Decimal::from(2),
            payback_period_years: Decimal::from(5),
            annual_utilization: Decimal::new(75, 2),
            re_rent_markup: Decimal::new(106, 2),
            default_general_liability: Decimal::new(11355, 2),
            default_worker_comp: Decimal::new(496, 2),
            default_fuel_economy_mpg: Decimal::from(20),
            default_truck_dispatch_fee: Decimal::new(1875, 2),
        }
    }
}

impl PricingConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EstimateError::InvalidConfig(format!("JSON 解析失敗: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置加班毛利率（分數）
    pub fn with_overtime_margins(mut self, rated: Decimal, non_rated: Decimal) -> Self {
        self.rated_overtime_margin = rated;
        self.non_rated_overtime_margin = non_rated;
        self
    }

    /// 建構器模式：設置動員費
    pub fn with_mobilization_fee(mut self, fee: Decimal) -> Self {
        self.mobilization_fee_per_person = fee;
        self
    }

    /// 建構器模式：設置 MPT 車輛參數
    pub fn with_mpt_trucks(mut self, dispatch_fee: Decimal, mpg: Decimal) -> Self {
        self.mpt_dispatch_fee = dispatch_fee;
        self.mpg_per_truck = mpg;
        self
    }

    /// 建構器模式：設置燈具回收參數
    pub fn with_light_recovery(
        mut self,
        target_moic: Decimal,
        payback_period_years: Decimal,
        annual_utilization: Decimal,
    ) -> Self {
        self.target_moic = target_moic;
        self.payback_period_years = payback_period_years;
        self.annual_utilization = annual_utilization;
        self
    }

    /// 建構器模式：設置人工加成
    pub fn with_labor_markup(mut self, percent: Decimal) -> Self {
        self.labor_markup_percent = percent;
        self
    }

    /// 依工資分類取得加班毛利率
    pub fn overtime_margin(&self, rated: RatedStatus) -> Decimal {
        match rated {
            RatedStatus::Rated => self.rated_overtime_margin,
            RatedStatus::NonRated => self.non_rated_overtime_margin,
        }
    }

    /// 燈具回收天數（回收期 × 使用率 × 365）
    pub fn light_recovery_days(&self) -> Decimal {
        self.payback_period_years * self.annual_utilization * Decimal::from(365)
    }

    /// 檢查配置是否會造成除以零或無意義的結果
    pub fn validate(&self) -> Result<()> {
        if self.hours_per_day <= Decimal::ZERO {
            return Err(EstimateError::InvalidConfig(
                "每日工時必須大於 0".to_string(),
            ));
        }

        for (name, margin) in [
            ("rated_overtime_margin", self.rated_overtime_margin),
            ("non_rated_overtime_margin", self.non_rated_overtime_margin),
        ] {
            if margin < Decimal::ZERO || margin >= Decimal::ONE {
                return Err(EstimateError::InvalidConfig(format!(
                    "{} 必須介於 0 與 1 之間: {}",
                    name, margin
                )));
            }
        }

        if self.mpg_per_truck <= Decimal::ZERO || self.default_fuel_economy_mpg <= Decimal::ZERO {
            return Err(EstimateError::InvalidConfig(
                "車輛油耗必須大於 0".to_string(),
            ));
        }

        if self.light_recovery_days() <= Decimal::ZERO {
            return Err(EstimateError::InvalidConfig(
                "燈具回收期與使用率必須大於 0".to_string(),
            ));
        }

        Ok(())
    }
}
