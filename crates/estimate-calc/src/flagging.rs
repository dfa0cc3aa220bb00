//! 交通管制與服務工作計價
//!
//! 標準包價：每人 = 派遣費 + 燃料 + 保險 + 日薪 / (1 - 目標毛利率)，
//! 動員市場每人另加固定費用。成本摘要依現場工時、路程、保險負擔與燃料推導。

use estimate_core::sanitize::non_negative;
use estimate_core::{
    AdminData, County, EstimateError, FlaggingConfig, PricingConfig, RatedStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::rates::{RateResolver, ResolvedRates};
use crate::CategoryTotals;

/// 工作類型（決定使用哪一組縣別費率）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlaggingWork {
    /// 交通管制（flagging 費率表）
    Flagging,
    /// 服務工作（施工人員費率表）
    ServiceWork,
}

impl FlaggingWork {
    pub fn resolve_rates(&self, county: Option<&County>, rated: RatedStatus) -> ResolvedRates {
        match self {
            FlaggingWork::Flagging => RateResolver::resolve(county, rated),
            FlaggingWork::ServiceWork => RateResolver::resolve_service(county, rated),
        }
    }

    pub fn context(&self) -> &'static str {
        match self {
            FlaggingWork::Flagging => "flagging",
            FlaggingWork::ServiceWork => "service_work",
        }
    }
}

/// 交通管制成本摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggingSummary {
    pub work: FlaggingWork,

    /// 現場工時成本（含加班）
    pub on_site_hours_cost: Decimal,
    /// 加班部分成本
    pub overtime_hours_cost: Decimal,
    /// 加班計價時薪
    pub overtime_rate: Decimal,
    /// 來回路程成本
    pub rt_travel_hours_cost: Decimal,
    /// 工時成本小計
    pub total_hours_cost: Decimal,
    /// 人工成本（含一般責任險與勞保）
    pub total_labor_cost: Decimal,
    pub total_fuel_cost: Decimal,
    /// 總成本
    pub total_flagging_cost: Decimal,
    /// 每人每小時成本
    pub total_cost_per_hour: Decimal,
    /// 計入包價的設備成本
    pub total_equipment_cost: Decimal,

    /// 推導出的標準包價（不論計價模式皆計算）
    pub standard_lump_sum: Decimal,
    pub total_revenue: Decimal,
    /// 現場 + 來回路程時數
    pub total_hours: Decimal,
}

impl FlaggingSummary {
    /// 轉為類別合計（營收 vs 總成本）
    pub fn category(&self) -> CategoryTotals {
        CategoryTotals::from_revenue_cost(self.total_revenue, self.total_flagging_cost)
    }
}

/// 自訂加成試算結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkupOption {
    /// 加成率（百分比）
    pub markup_rate: Decimal,
    pub lump_sum_with_equipment: Decimal,
    pub hourly_rate: Decimal,
}

/// 交通管制計算器
pub struct FlaggingCalculator<'a> {
    config: &'a PricingConfig,
}

impl<'a> FlaggingCalculator<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }

    /// 每人包價
    ///
    /// 缺少縣別時費率全為零，結果只剩派遣費。
    pub fn per_person_lump_sum(
        &self,
        rates: &ResolvedRates,
        dispatch_fee: Decimal,
    ) -> estimate_core::Result<Decimal> {
        let day_rate = rates.day_rate(self.config.hours_per_day);
        let divisor = rates.margin_divisor()?;

        Ok(non_negative(dispatch_fee) + rates.fuel_cost + rates.insurance_cost + day_rate / divisor)
    }

    /// 動員市場加收費用（每人一次，與天數無關）
    pub fn mobilization_surcharge(&self, county: Option<&County>, personnel: u32) -> Decimal {
        match county {
            Some(county) if county.market.is_mobilization() => {
                self.config.mobilization_fee_per_person * Decimal::from(personnel)
            }
            _ => Decimal::ZERO,
        }
    }

    /// 標準包價 = 每人包價 × 人數 + 動員加收
    ///
    /// 未選擇縣別時回傳零，讓表單維持可用。
    pub fn standard_lump_sum(
        &self,
        county: Option<&County>,
        rated: RatedStatus,
        flagging: &FlaggingConfig,
        work: FlaggingWork,
    ) -> estimate_core::Result<Decimal> {
        if county.is_none() {
            return Ok(Decimal::ZERO);
        }

        let rates = work.resolve_rates(county, rated);
        let per_person = self.per_person_lump_sum(&rates, flagging.truck_dispatch_fee)?;
        let personnel = Decimal::from(flagging.personnel);

        Ok(per_person * personnel + self.mobilization_surcharge(county, flagging.personnel))
    }

    /// 加班時薪 = 時薪 × 加班倍率 / (1 - 加班毛利率)
    pub fn overtime_rate(
        &self,
        rates: &ResolvedRates,
        rated: RatedStatus,
    ) -> estimate_core::Result<Decimal> {
        let margin = self.config.overtime_margin(rated);
        if margin >= Decimal::ONE {
            return Err(EstimateError::InvalidConfig(format!(
                "加班毛利率必須小於 1: {}",
                margin
            )));
        }
        Ok(rates.hourly_rate * self.config.overtime_multiplier / (Decimal::ONE - margin))
    }

    /// 成本摘要
    pub fn cost_summary(
        &self,
        admin: &AdminData,
        flagging: &FlaggingConfig,
        work: FlaggingWork,
    ) -> estimate_core::Result<FlaggingSummary> {
        let rates = work.resolve_rates(admin.county.as_ref(), admin.rated);
        let hours_per_day = self.config.hours_per_day;
        let overtime = self.config.overtime_multiplier;
        let personnel = Decimal::from(flagging.personnel);

        // 現場工時，超過每日工時的部分以加班倍率計
        let on_site_hours = non_negative(flagging.on_site_hours());
        let straight_hours = on_site_hours.min(hours_per_day);
        let overtime_hours = on_site_hours - straight_hours;
        let straight_cost = straight_hours * personnel * rates.hourly_rate;
        let overtime_hours_cost = rates.hourly_rate * overtime * overtime_hours * personnel;
        let on_site_hours_cost = straight_cost + overtime_hours_cost;

        // 來回路程以一般時薪計，當天進入加班時同樣加倍
        let rt_travel_hours = non_negative(admin.ow_travel_hours()) * Decimal::from(2);
        let travel_pay_rate = if on_site_hours > hours_per_day {
            rates.flagging_rate * overtime
        } else {
            rates.flagging_rate
        };
        let rt_travel_hours_cost = rt_travel_hours * travel_pay_rate * personnel;

        let total_hours_cost = on_site_hours_cost + rt_travel_hours_cost;
        let general_liability =
            or_default(flagging.general_liability, self.config.default_general_liability);
        let worker_comp = or_default(flagging.worker_comp, self.config.default_worker_comp);
        let total_labor_cost = total_hours_cost
            + total_hours_cost / Decimal::from(1000) * general_liability
            + total_hours_cost / Decimal::ONE_HUNDRED * worker_comp;

        let total_fuel_cost = if flagging.number_trucks > 0 {
            let mpg = or_default(flagging.fuel_economy_mpg, self.config.default_fuel_economy_mpg);
            let dispatch =
                or_default(flagging.truck_dispatch_fee, self.config.default_truck_dispatch_fee);
            Decimal::from(flagging.number_trucks)
                * non_negative(admin.ow_mileage)
                * non_negative(flagging.fuel_cost_per_gallon)
                / mpg
                + dispatch
        } else {
            Decimal::ZERO
        };

        let total_flagging_cost =
            total_labor_cost + total_fuel_cost + non_negative(flagging.additional_equipment_cost);

        let total_hours = on_site_hours + rt_travel_hours;
        let total_cost_per_hour = if total_hours > Decimal::ZERO && flagging.personnel > 0 {
            total_flagging_cost / (total_hours * personnel)
        } else {
            Decimal::ZERO
        };

        let overtime_rate = self.overtime_rate(&rates, admin.rated)?;
        let total_equipment_cost = lump_sum_equipment_cost(flagging);
        let standard_lump_sum =
            self.standard_lump_sum(admin.county.as_ref(), admin.rated, flagging, work)?;

        let revenue_without_equipment = if flagging.is_standard_pricing() {
            standard_lump_sum
        } else {
            total_flagging_cost / markup_divisor(flagging.markup_rate, work.context())?
        };

        tracing::debug!(
            "{} 成本摘要：成本 {}，營收 {}",
            work.context(),
            total_flagging_cost,
            revenue_without_equipment + total_equipment_cost
        );

        Ok(FlaggingSummary {
            work,
            on_site_hours_cost,
            overtime_hours_cost,
            overtime_rate,
            rt_travel_hours_cost,
            total_hours_cost,
            total_labor_cost,
            total_fuel_cost,
            total_flagging_cost,
            total_cost_per_hour,
            total_equipment_cost,
            standard_lump_sum,
            total_revenue: revenue_without_equipment + total_equipment_cost,
            total_hours,
        })
    }

    /// 以多個加成率試算自訂包價與每人時薪
    pub fn markup_options(
        &self,
        summary: &FlaggingSummary,
        flagging: &FlaggingConfig,
        markup_rates: &[Decimal],
    ) -> estimate_core::Result<Vec<MarkupOption>> {
        let personnel = Decimal::from(flagging.personnel);

        markup_rates
            .iter()
            .map(|rate| {
                let lump_sum =
                    summary.total_flagging_cost / markup_divisor(*rate, summary.work.context())?;
                let hourly_rate = if personnel.is_zero() || summary.total_hours.is_zero() {
                    Decimal::ZERO
                } else {
                    lump_sum / (personnel * summary.total_hours)
                };
                Ok(MarkupOption {
                    markup_rate: *rate,
                    lump_sum_with_equipment: lump_sum + summary.total_equipment_cost,
                    hourly_rate,
                })
            })
            .collect()
    }
}

/// 計入包價的附帶設備成本
fn lump_sum_equipment_cost(flagging: &FlaggingConfig) -> Decimal {
    [&flagging.arrow_boards, &flagging.message_boards, &flagging.tma]
        .into_iter()
        .filter(|e| e.include_in_lump_sum)
        .map(|e| non_negative(e.quantity) * non_negative(e.cost))
        .sum()
}

/// 零值（或負值）欄位使用預設值
fn or_default(value: Decimal, default: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        default
    } else {
        value
    }
}

/// (1 - 加成率)，加成率 >= 100% 時為配置錯誤
pub(crate) fn markup_divisor(percent: Decimal, context: &str) -> estimate_core::Result<Decimal> {
    let fraction = percent / Decimal::ONE_HUNDRED;
    if fraction >= Decimal::ONE {
        return Err(EstimateError::InvalidMarkup {
            context: context.to_string(),
            percent,
        });
    }
    Ok(Decimal::ONE - fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::{FlaggingEquipment, Market};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn county(market: Market) -> County {
        County::new(1, "Centre".to_string(), "PA".to_string(), market)
            .with_flagging_rates(dec!(10), dec!(5), dec!(20))
            .with_overhead(dec!(2), dec!(1))
            .with_target_gm(dec!(40), dec!(55))
    }

    fn admin(market: Market) -> AdminData {
        AdminData::new("C-100".to_string(), RatedStatus::Rated).with_county(county(market))
    }

    #[test]
    fn test_standard_lump_sum() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2).with_dispatch_fee(dec!(50));
        let county = county(Market::Core);

        let rates = RateResolver::resolve(Some(&county), RatedStatus::Rated);
        assert_eq!(rates.day_rate(config.hours_per_day), dec!(120));
        assert_eq!(calculator.per_person_lump_sum(&rates, dec!(50)).unwrap(), dec!(253));

        let total = calculator
            .standard_lump_sum(
                Some(&county),
                RatedStatus::Rated,
                &flagging,
                FlaggingWork::Flagging,
            )
            .unwrap();
        assert_eq!(total, dec!(506));
    }

    #[test]
    fn test_mobilization_lump_sum() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2).with_dispatch_fee(dec!(50));
        let county = county(Market::Mobilization);

        let total = calculator
            .standard_lump_sum(
                Some(&county),
                RatedStatus::Rated,
                &flagging,
                FlaggingWork::Flagging,
            )
            .unwrap();
        assert_eq!(total, dec!(856));
    }

    #[test]
    fn test_non_rated_lump_sum() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2).with_dispatch_fee(dec!(50));
        let core = county(Market::Core).with_target_gm(dec!(40), dec!(60));
        let mobilization = county(Market::Mobilization).with_target_gm(dec!(40), dec!(60));

        // non-rated 以一般時薪 20 計：20 × 8 / (1 - 0.6) = 400
        let rates = RateResolver::resolve(Some(&core), RatedStatus::NonRated);
        assert_eq!(rates.hourly_rate, dec!(20));
        assert_eq!(rates.target_gm, dec!(60));
        // 50 + 2 + 1 + 400
        assert_eq!(calculator.per_person_lump_sum(&rates, dec!(50)).unwrap(), dec!(453));

        let total = calculator
            .standard_lump_sum(
                Some(&core),
                RatedStatus::NonRated,
                &flagging,
                FlaggingWork::Flagging,
            )
            .unwrap();
        assert_eq!(total, dec!(906));

        let total = calculator
            .standard_lump_sum(
                Some(&mobilization),
                RatedStatus::NonRated,
                &flagging,
                FlaggingWork::Flagging,
            )
            .unwrap();
        assert_eq!(total, dec!(1256));
    }

    #[test]
    fn test_missing_county_lump_sum_is_zero() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(4).with_dispatch_fee(dec!(50));

        let total = calculator
            .standard_lump_sum(None, RatedStatus::Rated, &flagging, FlaggingWork::Flagging)
            .unwrap();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_full_target_margin_is_error() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2);
        let county = county(Market::Core).with_target_gm(dec!(100), dec!(55));

        let result = calculator.standard_lump_sum(
            Some(&county),
            RatedStatus::Rated,
            &flagging,
            FlaggingWork::Flagging,
        );
        assert!(matches!(result, Err(EstimateError::InvalidTargetMargin { .. })));
    }

    #[test]
    fn test_overtime_rate() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let county = county(Market::Core);

        // 15 × 1.5 / 0.6
        let rated = RateResolver::resolve(Some(&county), RatedStatus::Rated);
        assert_eq!(calculator.overtime_rate(&rated, RatedStatus::Rated).unwrap(), dec!(37.5));

        // 20 × 1.5 / 0.45
        let non_rated = RateResolver::resolve(Some(&county), RatedStatus::NonRated);
        let rate = calculator.overtime_rate(&non_rated, RatedStatus::NonRated).unwrap();
        assert_eq!(rate.round_dp(4), dec!(66.6667));
    }

    #[test]
    fn test_custom_cost_summary() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let admin = admin(Market::Core).with_travel(dec!(20), dec!(30));
        let flagging = FlaggingConfig::new(2)
            .with_custom_pricing(dec!(20))
            .with_on_site_minutes(dec!(600))
            .with_trucks(1, dec!(0), dec!(4))
            .with_equipment(
                FlaggingEquipment::new(dec!(1), dec!(100), true),
                FlaggingEquipment::new(dec!(1), dec!(300), false),
                FlaggingEquipment::default(),
            );

        let summary = calculator
            .cost_summary(&admin, &flagging, FlaggingWork::Flagging)
            .unwrap();

        // 8h × 2 × 15 + 2h × 22.5 × 2
        assert_eq!(summary.on_site_hours_cost, dec!(330));
        assert_eq!(summary.overtime_hours_cost, dec!(90));
        // 1h 來回 × 30 × 2
        assert_eq!(summary.rt_travel_hours_cost, dec!(60));
        assert_eq!(summary.total_hours_cost, dec!(390));
        assert_eq!(summary.total_labor_cost, dec!(453.6285));
        // 1 × 20 × 4 / 20 + 18.75
        assert_eq!(summary.total_fuel_cost, dec!(22.75));
        assert_eq!(summary.total_flagging_cost, dec!(476.3785));
        assert_eq!(summary.total_equipment_cost, dec!(100));
        assert_eq!(summary.total_revenue, dec!(695.473125));
        assert_eq!(summary.total_hours, dec!(11));
        assert_eq!(summary.standard_lump_sum, dec!(406));
        // 15 × 1.5 / 0.6
        assert_eq!(summary.overtime_rate, dec!(37.5));
    }

    #[test]
    fn test_non_rated_cost_summary() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let county = county(Market::Core).with_target_gm(dec!(40), dec!(60));
        let admin = AdminData::new("C-101".to_string(), RatedStatus::NonRated)
            .with_county(county)
            .with_travel(dec!(20), dec!(30));
        let flagging = FlaggingConfig::new(2)
            .with_custom_pricing(dec!(20))
            .with_on_site_minutes(dec!(600))
            .with_trucks(1, dec!(0), dec!(4));

        let summary = calculator
            .cost_summary(&admin, &flagging, FlaggingWork::Flagging)
            .unwrap();

        // 8h × 2 × 20 + 2h × 30 × 2
        assert_eq!(summary.on_site_hours_cost, dec!(440));
        assert_eq!(summary.overtime_hours_cost, dec!(120));
        // 1h 來回 × 30 × 2
        assert_eq!(summary.rt_travel_hours_cost, dec!(60));
        assert_eq!(summary.total_hours_cost, dec!(500));
        // 500 + 500 / 1000 × 113.55 + 500 / 100 × 4.96
        assert_eq!(summary.total_labor_cost, dec!(581.575));
        assert_eq!(summary.total_fuel_cost, dec!(22.75));
        assert_eq!(summary.total_flagging_cost, dec!(604.325));
        assert_eq!(summary.total_revenue, dec!(755.40625));
        // 未設派遣費：2 × (2 + 1 + 400)
        assert_eq!(summary.standard_lump_sum, dec!(806));
        // 20 × 1.5 / 0.45
        assert_eq!(summary.overtime_rate.round_dp(4), dec!(66.6667));
    }

    #[test]
    fn test_standard_revenue_uses_lump_sum() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2).with_dispatch_fee(dec!(50));

        let summary = calculator
            .cost_summary(&admin(Market::Mobilization), &flagging, FlaggingWork::Flagging)
            .unwrap();
        assert_eq!(summary.total_revenue, dec!(856));
        assert_eq!(summary.category().revenue, dec!(856));
    }

    #[test]
    fn test_markup_at_hundred_percent_is_error() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2).with_custom_pricing(dec!(100));

        let result =
            calculator.cost_summary(&admin(Market::Core), &flagging, FlaggingWork::Flagging);
        assert!(matches!(result, Err(EstimateError::InvalidMarkup { .. })));
    }

    #[test]
    fn test_markup_options() {
        let config = PricingConfig::default();
        let calculator = FlaggingCalculator::new(&config);
        let flagging = FlaggingConfig::new(2)
            .with_custom_pricing(dec!(20))
            .with_on_site_minutes(dec!(480));
        let summary = calculator
            .cost_summary(&admin(Market::Core), &flagging, FlaggingWork::Flagging)
            .unwrap();

        let options = calculator
            .markup_options(&summary, &flagging, &[dec!(0), dec!(50)])
            .unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].lump_sum_with_equipment, summary.total_flagging_cost);
        assert_eq!(options[1].lump_sum_with_equipment, summary.total_flagging_cost * dec!(2));
    }

    proptest! {
        #[test]
        fn prop_mobilization_surcharge_additive(personnel in 0u32..500) {
            let config = PricingConfig::default();
            let calculator = FlaggingCalculator::new(&config);
            let flagging = FlaggingConfig::new(personnel).with_dispatch_fee(dec!(50));

            let standard = calculator
                .standard_lump_sum(
                    Some(&county(Market::Core)),
                    RatedStatus::Rated,
                    &flagging,
                    FlaggingWork::Flagging,
                )
                .unwrap();
            let mobilization = calculator
                .standard_lump_sum(
                    Some(&county(Market::Mobilization)),
                    RatedStatus::Rated,
                    &flagging,
                    FlaggingWork::Flagging,
                )
                .unwrap();

            prop_assert_eq!(mobilization, standard + dec!(175) * Decimal::from(personnel));
        }
    }
}
