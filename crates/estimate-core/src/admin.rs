//! 估價單行政資料

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::county::{County, RatedStatus};

/// 緊急工程的每日單價覆寫
///
/// 欄位為 `None` 或零時，使用標準日租公式。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyRates {
    pub b_lights: Option<Decimal>,
    pub ac_lights: Option<Decimal>,
    pub hi_vertical_panels: Option<Decimal>,
    pub type_xi_vertical_panels: Option<Decimal>,
    pub sharps: Option<Decimal>,
}

/// 估價單行政資料（每張估價單獨有一份）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminData {
    /// 合約編號
    pub contract_number: String,

    /// 業主
    pub owner: Option<String>,

    /// 業務部門
    pub division: Option<String>,

    /// 工資分類
    pub rated: RatedStatus,

    /// 開工日期
    pub start_date: Option<NaiveDate>,

    /// 完工日期
    pub end_date: Option<NaiveDate>,

    /// 縣別（尚未選擇時為 None）
    pub county: Option<County>,

    /// 單程里程（英里）
    pub ow_mileage: Decimal,

    /// 單程路程時間（分鐘）
    pub ow_travel_time_mins: Decimal,

    /// 每加侖燃料價格
    pub fuel_cost_per_gallon: Decimal,

    /// 是否為緊急工程（所有階段的燈具改用緊急單價）
    pub emergency_job: bool,

    /// 緊急工程單價覆寫
    pub emergency_rates: EmergencyRates,
}

impl AdminData {
    /// 創建新的行政資料
    pub fn new(contract_number: String, rated: RatedStatus) -> Self {
        Self {
            contract_number,
            owner: None,
            division: None,
            rated,
            start_date: None,
            end_date: None,
            county: None,
            ow_mileage: Decimal::ZERO,
            ow_travel_time_mins: Decimal::ZERO,
            fuel_cost_per_gallon: Decimal::ZERO,
            emergency_job: false,
            emergency_rates: EmergencyRates::default(),
        }
    }

    /// 建構器模式：設置縣別
    pub fn with_county(mut self, county: County) -> Self {
        self.county = Some(county);
        self
    }

    /// 建構器模式：設置業主與部門
    pub fn with_owner(mut self, owner: String, division: Option<String>) -> Self {
        self.owner = Some(owner);
        self.division = division;
        self
    }

    /// 建構器模式：設置工期
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// 建構器模式：設置路程（單程里程、單程分鐘數）
    pub fn with_travel(mut self, ow_mileage: Decimal, ow_travel_time_mins: Decimal) -> Self {
        self.ow_mileage = ow_mileage;
        self.ow_travel_time_mins = ow_travel_time_mins;
        self
    }

    /// 建構器模式：設置燃料價格
    pub fn with_fuel_cost_per_gallon(mut self, price: Decimal) -> Self {
        self.fuel_cost_per_gallon = price;
        self
    }

    /// 建構器模式：標記為緊急工程並設置單價覆寫
    pub fn with_emergency(mut self, rates: EmergencyRates) -> Self {
        self.emergency_job = true;
        self.emergency_rates = rates;
        self
    }

    /// 單程路程時數
    pub fn ow_travel_hours(&self) -> Decimal {
        self.ow_travel_time_mins / Decimal::from(60)
    }

    /// 工期天數（含首尾），日期不完整時為 None
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => Some((end - start).num_days() + 1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_travel_hours() {
        let admin = AdminData::new("C-100".to_string(), RatedStatus::Rated)
            .with_travel(dec!(40), dec!(90));
        assert_eq!(admin.ow_travel_hours(), dec!(1.5));
    }

    #[test]
    fn test_duration_days() {
        let admin = AdminData::new("C-100".to_string(), RatedStatus::NonRated).with_dates(
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
        );
        assert_eq!(admin.duration_days(), Some(10));

        let incomplete = AdminData::new("C-101".to_string(), RatedStatus::NonRated);
        assert_eq!(incomplete.duration_days(), None);
    }
}
