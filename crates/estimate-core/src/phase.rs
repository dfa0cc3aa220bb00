//! 工程階段模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::equipment::EquipmentType;
use crate::line_items::{CustomLightItem, Sign};

/// 工程階段
///
/// 天數、人員、車輛與趟次屬於階段本身；額外工時在彙總時跨階段累加。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    /// 階段名稱
    pub name: String,

    /// 開始日期
    pub start_date: Option<NaiveDate>,

    /// 結束日期
    pub end_date: Option<NaiveDate>,

    /// 工作天數
    pub days: u32,

    /// 施工人數
    pub personnel: u32,

    /// 車輛數
    pub number_trucks: u32,

    /// 維護趟次
    pub maintenance_trips: u32,

    /// 額外 rated 工時
    pub additional_rated_hours: Decimal,

    /// 額外 non-rated 工時
    pub additional_non_rated_hours: Decimal,

    /// 是否為緊急階段（燈具改用緊急單價）
    pub emergency: bool,

    /// 標準設備數量
    pub standard_equipment: BTreeMap<EquipmentType, Decimal>,

    /// 自訂燈具/筒錐
    pub custom_light_items: Vec<CustomLightItem>,

    /// 標誌
    pub signs: Vec<Sign>,
}

impl Phase {
    /// 創建新的階段
    pub fn new(name: String, days: u32, personnel: u32, number_trucks: u32) -> Self {
        Self {
            name,
            start_date: None,
            end_date: None,
            days,
            personnel,
            number_trucks,
            maintenance_trips: 0,
            additional_rated_hours: Decimal::ZERO,
            additional_non_rated_hours: Decimal::ZERO,
            emergency: false,
            standard_equipment: BTreeMap::new(),
            custom_light_items: Vec::new(),
            signs: Vec::new(),
        }
    }

    /// 建構器模式：設置日期
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// 建構器模式：設置維護趟次
    pub fn with_maintenance_trips(mut self, trips: u32) -> Self {
        self.maintenance_trips = trips;
        self
    }

    /// 建構器模式：設置額外工時
    pub fn with_additional_hours(mut self, rated: Decimal, non_rated: Decimal) -> Self {
        self.additional_rated_hours = rated;
        self.additional_non_rated_hours = non_rated;
        self
    }

    /// 建構器模式：標記緊急
    pub fn with_emergency(mut self, emergency: bool) -> Self {
        self.emergency = emergency;
        self
    }

    /// 建構器模式：設置設備數量
    pub fn with_equipment(mut self, equipment_type: EquipmentType, quantity: Decimal) -> Self {
        self.standard_equipment.insert(equipment_type, quantity);
        self
    }

    /// 建構器模式：加入標誌
    pub fn with_sign(mut self, sign: Sign) -> Self {
        self.signs.push(sign);
        self
    }

    /// 建構器模式：加入自訂燈具
    pub fn with_custom_light(mut self, item: CustomLightItem) -> Self {
        self.custom_light_items.push(item);
        self
    }

    /// 取得設備數量（未設置為零）
    pub fn equipment_quantity(&self, equipment_type: EquipmentType) -> Decimal {
        self.standard_equipment
            .get(&equipment_type)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 拒馬 + H 架 + 標誌柱的總數
    pub fn structure_count(&self) -> Decimal {
        EquipmentType::ALL
            .iter()
            .filter(|e| e.is_structure())
            .map(|e| self.equipment_quantity(*e).max(Decimal::ZERO))
            .sum()
    }
}
