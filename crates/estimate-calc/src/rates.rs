//! 費率解析

use estimate_core::{County, EstimateError, RatedStatus};
use rust_decimal::Decimal;
use serde::Serialize;

/// 解析後的費率
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRates {
    /// 來源縣別（缺少縣別時為 None）
    pub county_name: Option<String>,

    pub base_rate: Decimal,
    pub fringe_rate: Decimal,
    pub flagging_rate: Decimal,
    pub fuel_cost: Decimal,
    pub insurance_cost: Decimal,

    /// 適用時薪：rated 為基本 + 福利，non-rated 為一般時薪
    pub hourly_rate: Decimal,

    /// 目標毛利率（百分比）
    pub target_gm: Decimal,
}

impl ResolvedRates {
    /// 全零費率（尚未選擇縣別）
    pub fn zero() -> Self {
        Self {
            county_name: None,
            base_rate: Decimal::ZERO,
            fringe_rate: Decimal::ZERO,
            flagging_rate: Decimal::ZERO,
            fuel_cost: Decimal::ZERO,
            insurance_cost: Decimal::ZERO,
            hourly_rate: Decimal::ZERO,
            target_gm: Decimal::ZERO,
        }
    }

    /// 是否缺少縣別資料
    pub fn is_missing(&self) -> bool {
        self.county_name.is_none()
    }

    /// 日薪（時薪 × 每日工時）
    pub fn day_rate(&self, hours_per_day: Decimal) -> Decimal {
        self.hourly_rate * hours_per_day
    }

    /// 以目標毛利率回推售價的除數 (1 - 毛利率)
    ///
    /// 毛利率 >= 100% 會造成除以零或負售價，視為縣別資料錯誤。
    pub fn margin_divisor(&self) -> estimate_core::Result<Decimal> {
        let fraction = self.target_gm / Decimal::ONE_HUNDRED;
        if fraction >= Decimal::ONE {
            return Err(EstimateError::InvalidTargetMargin {
                county: self.county_name.clone().unwrap_or_default(),
                percent: self.target_gm,
            });
        }
        Ok(Decimal::ONE - fraction)
    }
}

/// 費率解析器
pub struct RateResolver;

impl RateResolver {
    /// 解析交通管制費率
    ///
    /// 缺少縣別時回傳全零費率，不會失敗。
    pub fn resolve(county: Option<&County>, rated: RatedStatus) -> ResolvedRates {
        let Some(county) = county else {
            tracing::debug!("未選擇縣別，交通管制費率以零計算");
            return ResolvedRates::zero();
        };

        let hourly_rate = match rated {
            RatedStatus::Rated => county.base_rate + county.fringe_rate,
            RatedStatus::NonRated => county.flagging_rate,
        };

        ResolvedRates {
            county_name: Some(county.name.clone()),
            base_rate: county.base_rate,
            fringe_rate: county.fringe_rate,
            flagging_rate: county.flagging_rate,
            fuel_cost: county.fuel_cost,
            insurance_cost: county.insurance_cost,
            hourly_rate,
            target_gm: county.target_gm(rated),
        }
    }

    /// 解析施工人員費率（MPT 人工、服務工作、永久標誌）
    ///
    /// rated 時薪為施工時薪 + 福利，non-rated 為廠內時薪；
    /// 回傳值的 `flagging_rate` 欄位為廠內時薪（路程與 non-rated 工時使用）。
    pub fn resolve_service(county: Option<&County>, rated: RatedStatus) -> ResolvedRates {
        let Some(county) = county else {
            tracing::debug!("未選擇縣別，施工人員費率以零計算");
            return ResolvedRates::zero();
        };

        let hourly_rate = match rated {
            RatedStatus::Rated => county.labor_rate + county.labor_fringe_rate,
            RatedStatus::NonRated => county.shop_rate,
        };

        ResolvedRates {
            county_name: Some(county.name.clone()),
            base_rate: county.labor_rate,
            fringe_rate: county.labor_fringe_rate,
            flagging_rate: county.shop_rate,
            fuel_cost: county.fuel_cost,
            insurance_cost: county.insurance_cost,
            hourly_rate,
            target_gm: county.target_gm(rated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::Market;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn county() -> County {
        County::new(7, "Blair".to_string(), "PA".to_string(), Market::Core)
            .with_flagging_rates(dec!(10), dec!(5), dec!(20))
            .with_labor_rates(dec!(30), dec!(12), dec!(25))
            .with_overhead(dec!(2), dec!(1))
            .with_target_gm(dec!(40), dec!(55))
    }

    #[test]
    fn test_rated_rates() {
        let rates = RateResolver::resolve(Some(&county()), RatedStatus::Rated);
        assert_eq!(rates.hourly_rate, dec!(15));
        assert_eq!(rates.target_gm, dec!(40));
        assert_eq!(rates.day_rate(dec!(8)), dec!(120));
        assert_eq!(rates.margin_divisor().unwrap(), dec!(0.6));
    }

    #[test]
    fn test_non_rated_rates() {
        let rates = RateResolver::resolve(Some(&county()), RatedStatus::NonRated);
        assert_eq!(rates.hourly_rate, dec!(20));
        assert_eq!(rates.target_gm, dec!(55));
    }

    #[test]
    fn test_service_rates() {
        let rated = RateResolver::resolve_service(Some(&county()), RatedStatus::Rated);
        assert_eq!(rated.hourly_rate, dec!(42));
        assert_eq!(rated.flagging_rate, dec!(25));

        let non_rated = RateResolver::resolve_service(Some(&county()), RatedStatus::NonRated);
        assert_eq!(non_rated.hourly_rate, dec!(25));
    }

    #[test]
    fn test_missing_county_is_zero() {
        let rates = RateResolver::resolve(None, RatedStatus::Rated);
        assert!(rates.is_missing());
        assert_eq!(rates, ResolvedRates::zero());
        assert_eq!(rates.margin_divisor().unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_full_margin_is_config_error() {
        let county = county().with_target_gm(dec!(100), dec!(55));
        let rates = RateResolver::resolve(Some(&county), RatedStatus::Rated);
        assert!(matches!(
            rates.margin_divisor(),
            Err(EstimateError::InvalidTargetMargin { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_rate_selection(
            base in 0u32..10_000,
            fringe in 0u32..10_000,
            flagging in 0u32..10_000,
        ) {
            let base = Decimal::new(base as i64, 2);
            let fringe = Decimal::new(fringe as i64, 2);
            let flagging = Decimal::new(flagging as i64, 2);
            let county = County::new(1, "Any".to_string(), "PA".to_string(), Market::Local)
                .with_flagging_rates(base, fringe, flagging);

            let rated = RateResolver::resolve(Some(&county), RatedStatus::Rated);
            prop_assert_eq!(rated.hourly_rate, base + fringe);

            let non_rated = RateResolver::resolve(Some(&county), RatedStatus::NonRated);
            prop_assert_eq!(non_rated.hourly_rate, flagging);
        }
    }
}
