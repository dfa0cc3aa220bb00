//! 永久標誌（PMS）成本與營收
//!
//! 成本 = 人工 + 材料 + 燃料 + 面板平方呎成本（僅新安裝）。
//! 標準計價對人工與材料加成；自訂計價以成本 / (1 - 毛利率) 回推。

use estimate_core::sanitize::non_negative;
use estimate_core::{
    AdminData, PermanentSignItem, PermanentSignKind, PermanentSigns, PermanentSignsCatalog,
    PricingConfig, PricingMode,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::flagging::markup_divisor;
use crate::rates::RateResolver;
use crate::{margin_percent, CategoryTotals};

/// 所需安裝工時 = 數量 / 每小時產能 × 人數（四捨五入至小數兩位）
pub fn required_install_hours(
    number_installs: Decimal,
    productivity_rate: Decimal,
    personnel: u32,
) -> Decimal {
    if productivity_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (non_negative(number_installs) / productivity_rate * Decimal::from(personnel))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 所需天數 = ceil(安裝工時 / 每日最大工時)
pub fn days_required(install_hours: Decimal, max_daily_hours: Decimal) -> u32 {
    if max_daily_hours <= Decimal::ZERO {
        return 0;
    }
    (non_negative(install_hours) / max_daily_hours)
        .ceil()
        .to_u32()
        .unwrap_or(0)
}

/// 單一項目排定的天數與趟次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledTrips {
    pub id: Uuid,
    pub days: u32,
    pub number_trips: u32,
}

impl ScheduledTrips {
    pub fn new(id: Uuid, days: u32, number_trips: u32) -> Self {
        Self {
            id,
            days,
            number_trips,
        }
    }
}

/// 趟次排程結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSchedule {
    /// 與輸入項目同序
    pub items: Vec<ScheduledTrips>,
    pub total_trips: u32,
}

/// 排定趟次
///
/// 一般項目共用工作日：前一項目當天剩餘工時足夠時不另開新的一天。
/// 單獨動員的項目各自出車，趟次 = 天數 × 車數。
pub fn schedule_trips(items: &[PermanentSignItem], max_daily_hours: Decimal) -> TripSchedule {
    let mut scheduled: Vec<ScheduledTrips> = items
        .iter()
        .map(|item| ScheduledTrips::new(item.id, 0, 0))
        .collect();
    let mut total_trips = 0u32;
    let mut remaining_hours = Decimal::ZERO;

    for (item, slot) in items.iter().zip(scheduled.iter_mut()) {
        if item.separate_mobilization {
            continue;
        }
        let install_hours = non_negative(item.install_hours_required);
        if remaining_hours >= install_hours {
            remaining_hours -= install_hours;
        } else {
            let hours_needed = install_hours - remaining_hours;
            let days = days_required(hours_needed, max_daily_hours);
            slot.days = days;
            slot.number_trips = days * item.number_trucks;
            total_trips += days;
            remaining_hours = Decimal::from(days) * max_daily_hours - hours_needed;
        }
    }

    for (item, slot) in items.iter().zip(scheduled.iter_mut()) {
        if !item.separate_mobilization {
            continue;
        }
        let days = days_required(item.install_hours_required, max_daily_hours);
        slot.days = days;
        slot.number_trips = days * item.number_trucks;
        total_trips += slot.number_trips;
    }

    TripSchedule {
        items: scheduled,
        total_trips,
    }
}

/// 單一永久標誌項目的成本明細
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermanentSignLine {
    pub id: Uuid,
    pub kind: PermanentSignKind,
    pub days: u32,
    pub number_trips: u32,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub fuel_cost: Decimal,
    pub sq_ft_cost: Decimal,
    pub total_cost: Decimal,
    pub revenue: Decimal,
    pub gross_margin_percent: Decimal,
}

/// 永久標誌摘要
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PermanentSignsSummary {
    pub items: Vec<PermanentSignLine>,
    /// 排程後的總趟次
    pub total_trips: u32,
    pub totals: CategoryTotals,
}

/// 永久標誌計算器
pub struct PermanentSignsCalculator<'a> {
    config: &'a PricingConfig,
}

impl<'a> PermanentSignsCalculator<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }

    /// 每日最大工時：價目表未設定時使用每日標準工時
    pub fn max_daily_hours(&self, catalog: &PermanentSignsCatalog) -> Decimal {
        if catalog.max_daily_hours > Decimal::ZERO {
            catalog.max_daily_hours
        } else {
            self.config.hours_per_day
        }
    }

    /// 材料成本：五金明細 + 立柱（需要時）+ 彈性導標本體
    pub fn material_cost(
        &self,
        item: &PermanentSignItem,
        catalog: &PermanentSignsCatalog,
    ) -> Decimal {
        let quantity = non_negative(item.quantity);
        let hardware: Decimal = item
            .hardware
            .iter()
            .map(|line| non_negative(line.quantity) * catalog.hardware_price(&line.name))
            .sum();

        let post = if item.kind.uses_post() {
            quantity * catalog.post_price
        } else {
            Decimal::ZERO
        };

        let delineator = if item.kind == PermanentSignKind::FlexibleDelineator {
            quantity * catalog.flexible_delineator_cost
        } else {
            Decimal::ZERO
        };

        hardware + post + delineator
    }

    /// 面板平方呎成本（僅新安裝），項目單價優先於價目表
    pub fn sq_ft_cost(&self, item: &PermanentSignItem, catalog: &PermanentSignsCatalog) -> Decimal {
        if !item.kind.is_install() {
            return Decimal::ZERO;
        }
        let cost_per_sq_ft = item.cost_per_sq_ft.unwrap_or(catalog.cost_per_sq_ft);
        non_negative(cost_per_sq_ft) * non_negative(item.sign_sq_footage)
    }

    /// 人工 = (施工 + 福利) × 安裝工時 × 人數 + 人數 × 廠內時薪 × 趟次 × 來回路程時數
    pub fn labor_cost(&self, item: &PermanentSignItem, trips: u32, admin: &AdminData) -> Decimal {
        let rates = RateResolver::resolve_service(admin.county.as_ref(), admin.rated);
        let personnel = Decimal::from(item.personnel);
        let install = (rates.base_rate + rates.fringe_rate)
            * non_negative(item.install_hours_required)
            * personnel;
        let travel = personnel
            * rates.flagging_rate
            * Decimal::from(trips)
            * non_negative(admin.ow_travel_hours())
            * Decimal::from(2);
        install + travel
    }

    /// 燃料 = 來回里程 × 趟次 / MPG × 油價 + 派遣費 × 趟次
    pub fn fuel_cost(&self, trips: u32, admin: &AdminData) -> Decimal {
        let trips = Decimal::from(trips);
        let travel = if self.config.mpg_per_truck > Decimal::ZERO {
            non_negative(admin.ow_mileage) * Decimal::from(2) * trips
                / self.config.mpg_per_truck
                * non_negative(admin.fuel_cost_per_gallon)
        } else {
            Decimal::ZERO
        };
        travel + self.config.mpt_dispatch_fee * trips
    }

    /// 單一項目成本與營收（天數與趟次取自排程）
    pub fn line(
        &self,
        item: &PermanentSignItem,
        schedule: &ScheduledTrips,
        catalog: &PermanentSignsCatalog,
        admin: &AdminData,
    ) -> estimate_core::Result<PermanentSignLine> {
        let material_cost = self.material_cost(item, catalog);
        let labor_cost = self.labor_cost(item, schedule.number_trips, admin);
        let fuel_cost = self.fuel_cost(schedule.number_trips, admin);
        let sq_ft_cost = self.sq_ft_cost(item, catalog);
        let total_cost = material_cost + labor_cost + fuel_cost + sq_ft_cost;

        let revenue = match item.pricing_mode {
            PricingMode::Standard => {
                let labor_markup =
                    Decimal::ONE + self.config.labor_markup_percent / Decimal::ONE_HUNDRED;
                let item_markup = Decimal::ONE + catalog.item_markup / Decimal::ONE_HUNDRED;
                let sign_price = if item.kind.is_install() {
                    non_negative(catalog.price_per_sq_ft) * non_negative(item.sign_sq_footage)
                } else {
                    Decimal::ZERO
                };
                labor_cost * labor_markup + material_cost * item_markup + fuel_cost + sign_price
            }
            PricingMode::Custom => {
                total_cost / markup_divisor(item.custom_margin, "permanent_signs")?
            }
        };

        Ok(PermanentSignLine {
            id: item.id,
            kind: item.kind,
            days: schedule.days,
            number_trips: schedule.number_trips,
            material_cost,
            labor_cost,
            fuel_cost,
            sq_ft_cost,
            total_cost,
            revenue,
            gross_margin_percent: margin_percent(revenue - total_cost, revenue),
        })
    }

    /// 排定趟次後彙總所有永久標誌項目
    pub fn summary(
        &self,
        permanent_signs: &PermanentSigns,
        admin: &AdminData,
    ) -> estimate_core::Result<PermanentSignsSummary> {
        let catalog = &permanent_signs.catalog;
        let schedule = schedule_trips(&permanent_signs.items, self.max_daily_hours(catalog));

        let items = permanent_signs
            .items
            .iter()
            .zip(schedule.items.iter())
            .map(|(item, scheduled)| self.line(item, scheduled, catalog, admin))
            .collect::<estimate_core::Result<Vec<_>>>()?;

        let revenue: Decimal = items.iter().map(|l| l.revenue).sum();
        let cost: Decimal = items.iter().map(|l| l.total_cost).sum();
        tracing::debug!(
            "永久標誌 {} 項，{} 趟：營收 {}，成本 {}",
            items.len(),
            schedule.total_trips,
            revenue,
            cost
        );

        Ok(PermanentSignsSummary {
            items,
            total_trips: schedule.total_trips,
            totals: CategoryTotals::from_revenue_cost(revenue, cost),
        })
    }
}
