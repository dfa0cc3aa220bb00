//! 縣別費率模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EstimateError, Result};

/// 市場分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    /// 需加收動員費的偏遠市場
    Mobilization,
    /// 本地市場
    Local,
    /// 核心市場
    Core,
}

impl Market {
    /// 是否需要加收每人動員費
    pub fn is_mobilization(&self) -> bool {
        matches!(self, Market::Mobilization)
    }
}

/// 工資分類（政府工資標準 vs 一般工資）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatedStatus {
    /// 適用政府工資標準（prevailing wage）
    Rated,
    /// 一般工資
    NonRated,
}

impl RatedStatus {
    pub fn is_rated(&self) -> bool {
        matches!(self, RatedStatus::Rated)
    }
}

/// 縣別費率區
///
/// 由後台維護，估價單只引用不擁有。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct County {
    /// 縣別ID
    pub id: i64,

    /// 縣名
    pub name: String,

    /// 州別
    pub state: String,

    /// 所屬分公司
    pub branch: Option<String>,

    /// 市場分類
    pub market: Market,

    /// 交通管制員基本時薪（rated）
    pub base_rate: Decimal,

    /// 交通管制員附加福利時薪（rated）
    pub fringe_rate: Decimal,

    /// 交通管制員一般時薪（non-rated）
    pub flagging_rate: Decimal,

    /// 施工人員時薪（MPT / 服務工作）
    pub labor_rate: Decimal,

    /// 施工人員附加福利時薪
    pub labor_fringe_rate: Decimal,

    /// 廠內時薪（非 rated 工時、路程工時）
    pub shop_rate: Decimal,

    /// 每人燃料成本
    pub fuel_cost: Decimal,

    /// 每人保險成本
    pub insurance_cost: Decimal,

    /// rated 工作目標毛利率（百分比，例如 40 代表 40%）
    pub rated_target_gm: Decimal,

    /// non-rated 工作目標毛利率（百分比）
    pub non_rated_target_gm: Decimal,
}

impl County {
    /// 創建新的縣別（所有費率為零）
    pub fn new(id: i64, name: String, state: String, market: Market) -> Self {
        Self {
            id,
            name,
            state,
            branch: None,
            market,
            base_rate: Decimal::ZERO,
            fringe_rate: Decimal::ZERO,
            flagging_rate: Decimal::ZERO,
            labor_rate: Decimal::ZERO,
            labor_fringe_rate: Decimal::ZERO,
            shop_rate: Decimal::ZERO,
            fuel_cost: Decimal::ZERO,
            insurance_cost: Decimal::ZERO,
            rated_target_gm: Decimal::ZERO,
            non_rated_target_gm: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置交通管制員費率（基本、福利、一般）
    pub fn with_flagging_rates(
        mut self,
        base: Decimal,
        fringe: Decimal,
        flagging: Decimal,
    ) -> Self {
        self.base_rate = base;
        self.fringe_rate = fringe;
        self.flagging_rate = flagging;
        self
    }

    /// 建構器模式：設置施工人員費率（時薪、福利、廠內）
    pub fn with_labor_rates(mut self, labor: Decimal, fringe: Decimal, shop: Decimal) -> Self {
        self.labor_rate = labor;
        self.labor_fringe_rate = fringe;
        self.shop_rate = shop;
        self
    }

    /// 建構器模式：設置燃料與保險成本
    pub fn with_overhead(mut self, fuel: Decimal, insurance: Decimal) -> Self {
        self.fuel_cost = fuel;
        self.insurance_cost = insurance;
        self
    }

    /// 建構器模式：設置目標毛利率（百分比）
    pub fn with_target_gm(mut self, rated: Decimal, non_rated: Decimal) -> Self {
        self.rated_target_gm = rated;
        self.non_rated_target_gm = non_rated;
        self
    }

    /// 建構器模式：設置分公司
    pub fn with_branch(mut self, branch: String) -> Self {
        self.branch = Some(branch);
        self
    }

    /// 依工資分類取得目標毛利率（百分比）
    pub fn target_gm(&self, rated: RatedStatus) -> Decimal {
        match rated {
            RatedStatus::Rated => self.rated_target_gm,
            RatedStatus::NonRated => self.non_rated_target_gm,
        }
    }

    /// 檢查費率資料完整性
    ///
    /// 費率欄位不得為負，目標毛利率必須小於 100%。
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("base_rate", self.base_rate),
            ("fringe_rate", self.fringe_rate),
            ("flagging_rate", self.flagging_rate),
            ("labor_rate", self.labor_rate),
            ("labor_fringe_rate", self.labor_fringe_rate),
            ("shop_rate", self.shop_rate),
            ("fuel_cost", self.fuel_cost),
            ("insurance_cost", self.insurance_cost),
            ("rated_target_gm", self.rated_target_gm),
            ("non_rated_target_gm", self.non_rated_target_gm),
        ];

        if let Some((field, value)) = rates.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(EstimateError::InvalidCounty(format!(
                "{} 的 {} 為負值: {}",
                self.name, field, value
            )));
        }

        for percent in [self.rated_target_gm, self.non_rated_target_gm] {
            if percent >= Decimal::ONE_HUNDRED {
                return Err(EstimateError::InvalidTargetMargin {
                    county: self.name.clone(),
                    percent,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_county() -> County {
        County::new(1, "Bedford".to_string(), "PA".to_string(), Market::Local)
            .with_flagging_rates(dec!(10), dec!(5), dec!(20))
            .with_overhead(dec!(2), dec!(1))
            .with_target_gm(dec!(40), dec!(55))
    }

    #[test]
    fn test_target_gm_by_status() {
        let county = sample_county();
        assert_eq!(county.target_gm(RatedStatus::Rated), dec!(40));
        assert_eq!(county.target_gm(RatedStatus::NonRated), dec!(55));
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_county().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_full_margin() {
        let county = sample_county().with_target_gm(dec!(100), dec!(55));
        assert!(matches!(
            county.validate(),
            Err(EstimateError::InvalidTargetMargin { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let county = sample_county().with_overhead(dec!(-1), dec!(1));
        assert!(matches!(county.validate(), Err(EstimateError::InvalidCounty(_))));
    }

    #[test]
    fn test_market_serde() {
        let json = serde_json::to_string(&Market::Mobilization).unwrap();
        assert_eq!(json, "\"MOBILIZATION\"");
        assert!(Market::Mobilization.is_mobilization());
        assert!(!Market::Core.is_mobilization());
    }
}
