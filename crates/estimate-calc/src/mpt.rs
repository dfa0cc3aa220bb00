//! MPT（維持交通）逐階段推導
//!
//! 每個階段獨立計算設備、標誌、燈具、人工與車輛，
//! 營收與成本在階段間可直接相加。

use estimate_core::sanitize::non_negative;
use estimate_core::{
    AdminData, EmergencyRates, EquipmentCatalog, EquipmentInfo, EquipmentType, Phase,
    PricingConfig,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::rates::{RateResolver, ResolvedRates};
use crate::CategoryTotals;

/// 設備類成本指標
///
/// `purchase_cost` 為購置總額，僅供參考；毛利以折舊成本計算。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostMetrics {
    pub purchase_cost: Decimal,
    pub revenue: Decimal,
    pub depreciation_cost: Decimal,
}

impl CostMetrics {
    fn add(&mut self, purchase_cost: Decimal, revenue: Decimal, depreciation_cost: Decimal) {
        self.purchase_cost += purchase_cost;
        self.revenue += revenue;
        self.depreciation_cost += depreciation_cost;
    }

    pub fn combine(&self, other: &CostMetrics) -> Self {
        Self {
            purchase_cost: self.purchase_cost + other.purchase_cost,
            revenue: self.revenue + other.revenue,
            depreciation_cost: self.depreciation_cost + other.depreciation_cost,
        }
    }

    pub fn gross_profit(&self) -> Decimal {
        self.revenue - self.depreciation_cost
    }

    pub fn category(&self) -> CategoryTotals {
        CategoryTotals::from_revenue_cost(self.revenue, self.depreciation_cost)
    }
}

/// 施工人工
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LaborSummary {
    pub rated_hours: Decimal,
    pub non_rated_hours: Decimal,
    pub rated_cost: Decimal,
    pub non_rated_cost: Decimal,
    pub revenue: Decimal,
}

impl LaborSummary {
    pub fn total_cost(&self) -> Decimal {
        self.rated_cost + self.non_rated_cost
    }

    pub fn total_hours(&self) -> Decimal {
        self.rated_hours + self.non_rated_hours
    }

    pub fn combine(&self, other: &LaborSummary) -> Self {
        Self {
            rated_hours: self.rated_hours + other.rated_hours,
            non_rated_hours: self.non_rated_hours + other.non_rated_hours,
            rated_cost: self.rated_cost + other.rated_cost,
            non_rated_cost: self.non_rated_cost + other.non_rated_cost,
            revenue: self.revenue + other.revenue,
        }
    }

    pub fn category(&self) -> CategoryTotals {
        CategoryTotals::from_revenue_cost(self.revenue, self.total_cost())
    }
}

/// 車輛派遣與燃料（成本只計燃料，派遣費即毛利）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TruckSummary {
    pub dispatch_fee: Decimal,
    pub fuel_cost: Decimal,
}

impl TruckSummary {
    pub fn revenue(&self) -> Decimal {
        self.dispatch_fee + self.fuel_cost
    }

    pub fn combine(&self, other: &TruckSummary) -> Self {
        Self {
            dispatch_fee: self.dispatch_fee + other.dispatch_fee,
            fuel_cost: self.fuel_cost + other.fuel_cost,
        }
    }

    pub fn category(&self) -> CategoryTotals {
        CategoryTotals::from_revenue_cost(self.revenue(), self.fuel_cost)
    }
}

/// 單一階段推導結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub name: String,
    pub days: u32,
    pub personnel: u32,
    pub number_trucks: u32,
    /// 總趟次（含維護趟次）
    pub trips: u32,

    /// 一般設備（不含燈具與筒錐）
    pub equipment: CostMetrics,
    /// 燈具與筒錐（含自訂項目）
    pub lights: CostMetrics,
    /// 標誌反光膜
    pub signs: CostMetrics,
    pub labor: LaborSummary,
    pub truck: TruckSummary,
}

impl PhaseSummary {
    pub fn rated_hours(&self) -> Decimal {
        self.labor.rated_hours
    }

    pub fn non_rated_hours(&self) -> Decimal {
        self.labor.non_rated_hours
    }

    pub fn total_hours(&self) -> Decimal {
        self.labor.total_hours()
    }

    /// 階段 MPT 合計
    pub fn category(&self) -> CategoryTotals {
        [
            self.equipment.category(),
            self.lights.category(),
            self.signs.category(),
            self.labor.category(),
            self.truck.category(),
        ]
        .into_iter()
        .sum()
    }
}

/// MPT 計算器
pub struct MptCalculator<'a> {
    config: &'a PricingConfig,
}

impl<'a> MptCalculator<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }

    /// 推導單一階段
    pub fn phase_summary(
        &self,
        admin: &AdminData,
        phase: &Phase,
        catalog: &EquipmentCatalog,
    ) -> PhaseSummary {
        let rates = RateResolver::resolve_service(admin.county.as_ref(), admin.rated);
        let trips = self.trips(phase);

        let summary = PhaseSummary {
            name: phase.name.clone(),
            days: phase.days,
            personnel: phase.personnel,
            number_trucks: phase.number_trucks,
            trips,
            equipment: self.equipment_metrics(phase, catalog),
            lights: self.light_metrics(admin, phase, catalog),
            signs: self.sign_metrics(phase, catalog),
            labor: self.labor(admin, phase, &rates),
            truck: self.truck(admin, phase),
        };

        tracing::debug!(
            "階段 {}：趟次 {}，工時 {}，營收 {}",
            phase.name,
            summary.trips,
            summary.total_hours(),
            summary.category().revenue
        );

        summary
    }

    /// 一般設備：營收 = 數量 × 折扣後單價，成本 = 每日折舊 × 天數 × 數量
    pub fn equipment_metrics(&self, phase: &Phase, catalog: &EquipmentCatalog) -> CostMetrics {
        let days = Decimal::from(phase.days);
        let mut metrics = CostMetrics::default();

        for equipment_type in EquipmentType::ALL.iter().filter(|e| !e.is_light_and_drum()) {
            let Some(info) = catalog.equipment_info(*equipment_type) else {
                continue;
            };
            let quantity = non_negative(phase.equipment_quantity(*equipment_type));
            metrics.add(
                quantity * info.price,
                quantity * info.discounted_price(),
                info.daily_depreciation() * days * quantity,
            );
        }

        metrics
    }

    /// 標誌：以平方呎為數量，套用反光膜單價
    pub fn sign_metrics(&self, phase: &Phase, catalog: &EquipmentCatalog) -> CostMetrics {
        let days = Decimal::from(phase.days);
        let mut metrics = CostMetrics::default();

        for sign in &phase.signs {
            let Some(info) = catalog.sheeting_info(sign.sheeting) else {
                continue;
            };
            let sqft = sign.square_footage();
            metrics.add(
                sqft * info.price,
                sqft * info.discounted_price(),
                info.daily_depreciation() * days * sqft,
            );
        }

        metrics
    }

    /// 燈具與筒錐：營收 = 數量 × 天數 × 日租
    ///
    /// 緊急工程（整張估價單）或緊急階段改用緊急單價覆寫日租。
    pub fn light_metrics(
        &self,
        admin: &AdminData,
        phase: &Phase,
        catalog: &EquipmentCatalog,
    ) -> CostMetrics {
        let emergency = admin.emergency_job || phase.emergency;
        let days = Decimal::from(phase.days);
        let mut metrics = CostMetrics::default();
        if phase.days == 0 {
            return metrics;
        }

        for equipment_type in EquipmentType::ALL.iter().filter(|e| e.is_light_and_drum()) {
            let quantity = non_negative(phase.equipment_quantity(*equipment_type));
            let Some(info) = catalog.equipment_info(*equipment_type) else {
                continue;
            };
            if quantity.is_zero() {
                continue;
            }

            let daily_rate = if emergency {
                emergency_rate(&admin.emergency_rates, *equipment_type)
                    .unwrap_or_else(|| self.light_daily_rate(info.price))
            } else {
                self.light_daily_rate(info.price)
            };

            metrics.add(
                quantity * info.price,
                quantity * days * daily_rate,
                info.daily_depreciation() * days * quantity,
            );
        }

        for item in &phase.custom_light_items {
            let quantity = non_negative(item.quantity);
            let info = EquipmentInfo::new(non_negative(item.cost), Decimal::ZERO, item.useful_life);
            metrics.add(
                quantity * info.price,
                quantity * days * self.light_daily_rate(info.price),
                info.daily_depreciation() * days * quantity,
            );
        }

        metrics
    }

    /// 燈具日租 = 單價 × 目標 MOIC / 回收天數
    pub fn light_daily_rate(&self, price: Decimal) -> Decimal {
        let recovery_days = self.config.light_recovery_days();
        if recovery_days <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        price * self.config.target_moic / recovery_days
    }

    /// 總趟次 = 維護趟次 + ceil(結構物 / 30) × 2
    pub fn trips(&self, phase: &Phase) -> u32 {
        let structure_trips =
            (phase.structure_count() / Decimal::from(30)).ceil() * Decimal::from(2);
        phase.maintenance_trips + structure_trips.to_u32().unwrap_or(0)
    }

    /// rated 工時 = ceil(結構物 / 10 × 人數 × 2) + 額外 rated 工時
    pub fn rated_hours(&self, phase: &Phase) -> Decimal {
        let additional = non_negative(phase.additional_rated_hours);
        if phase.personnel == 0 {
            return additional;
        }
        let base = (phase.structure_count() / Decimal::from(10)
            * Decimal::from(phase.personnel)
            * Decimal::from(2))
        .ceil();
        base + additional
    }

    /// non-rated 工時 = 單程路程時數 × 總趟次 × 2 × 人數 + 額外 non-rated 工時
    pub fn non_rated_hours(&self, admin: &AdminData, phase: &Phase) -> Decimal {
        let additional = non_negative(phase.additional_non_rated_hours);
        if phase.personnel == 0 {
            return additional;
        }
        let travel = non_negative(admin.ow_travel_hours())
            * Decimal::from(self.trips(phase))
            * Decimal::from(2)
            * Decimal::from(phase.personnel);
        travel + additional
    }

    /// 施工人工：rated 時薪為施工 + 福利（non-rated 案件為廠內時薪），路程工時以廠內時薪計
    pub fn labor(&self, admin: &AdminData, phase: &Phase, rates: &ResolvedRates) -> LaborSummary {
        let rated_hours = self.rated_hours(phase);
        let non_rated_hours = self.non_rated_hours(admin, phase);
        let rated_cost = rated_hours * rates.hourly_rate;
        let non_rated_cost = non_rated_hours * rates.flagging_rate;
        let markup = Decimal::ONE + self.config.labor_markup_percent / Decimal::ONE_HUNDRED;

        LaborSummary {
            rated_hours,
            non_rated_hours,
            rated_cost,
            non_rated_cost,
            revenue: (rated_cost + non_rated_cost) * markup,
        }
    }

    /// 車輛：派遣費 = 費率 × 趟次 × 車數，燃料 = 趟次 × 車數 × 2 × 里程 / MPG × 油價
    pub fn truck(&self, admin: &AdminData, phase: &Phase) -> TruckSummary {
        let trips = Decimal::from(self.trips(phase));
        let trucks = Decimal::from(phase.number_trucks);
        let dispatch_fee = self.config.mpt_dispatch_fee * trips * trucks;

        let fuel_cost = if self.config.mpg_per_truck > Decimal::ZERO {
            trips * trucks * Decimal::from(2) * non_negative(admin.ow_mileage)
                / self.config.mpg_per_truck
                * non_negative(admin.fuel_cost_per_gallon)
        } else {
            Decimal::ZERO
        };

        TruckSummary {
            dispatch_fee,
            fuel_cost,
        }
    }

    /// 價目表缺少的設備/反光膜（有數量卻無單價）
    pub fn missing_catalog_entries(phase: &Phase, catalog: &EquipmentCatalog) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = EquipmentType::ALL
            .iter()
            .filter(|e| phase.equipment_quantity(**e) > Decimal::ZERO)
            .filter(|e| catalog.equipment_info(**e).is_none())
            .map(|e| e.label())
            .collect();

        for sign in phase.signs.iter().filter(|s| s.is_countable()) {
            if catalog.sheeting_info(sign.sheeting).is_none() {
                let label = sign.sheeting.label();
                if !missing.contains(&label) {
                    missing.push(label);
                }
            }
        }

        missing
    }
}

/// 緊急單價覆寫（零或未設置時不覆寫）
fn emergency_rate(rates: &EmergencyRates, equipment_type: EquipmentType) -> Option<Decimal> {
    let rate = match equipment_type {
        EquipmentType::BLights => rates.b_lights,
        EquipmentType::AcLights => rates.ac_lights,
        EquipmentType::HiVerticalPanel => rates.hi_vertical_panels,
        EquipmentType::TypeXiVerticalPanel => rates.type_xi_vertical_panels,
        EquipmentType::Sharps => rates.sharps,
        _ => None,
    };
    rate.filter(|r| *r > Decimal::ZERO)
}
