//! 估價單草稿（聚合根）

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admin::AdminData;
use crate::equipment::EquipmentCatalog;
use crate::flagging::FlaggingConfig;
use crate::line_items::{EquipmentRentalItem, SaleItem};
use crate::permanent_signs::PermanentSigns;
use crate::phase::Phase;

/// 估價單草稿
///
/// 編輯中的估價單以值物件傳入計算器；階段可以逐步加入，
/// 定稿時才要求至少一個階段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDraft {
    /// 估價單ID
    pub id: Uuid,

    /// 行政資料
    pub admin: AdminData,

    /// 工程階段（依序）
    pub phases: Vec<Phase>,

    /// MPT 設備價目
    pub equipment_catalog: EquipmentCatalog,

    /// 設備租賃
    pub rental_items: Vec<EquipmentRentalItem>,

    /// 交通管制
    pub flagging: Option<FlaggingConfig>,

    /// 服務工作（沿用交通管制結構，改用施工人員費率）
    pub service_work: Option<FlaggingConfig>,

    /// 銷售品
    pub sale_items: Vec<SaleItem>,

    /// 永久標誌
    pub permanent_signs: PermanentSigns,

    /// 備註
    pub notes: Option<String>,
}

impl BidDraft {
    /// 創建空白草稿
    pub fn new(admin: AdminData) -> Self {
        Self {
            id: Uuid::new_v4(),
            admin,
            phases: Vec::new(),
            equipment_catalog: EquipmentCatalog::default(),
            rental_items: Vec::new(),
            flagging: None,
            service_work: None,
            sale_items: Vec::new(),
            permanent_signs: PermanentSigns::default(),
            notes: None,
        }
    }

    /// 建構器模式：加入階段
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    /// 建構器模式：設置設備價目
    pub fn with_equipment_catalog(mut self, catalog: EquipmentCatalog) -> Self {
        self.equipment_catalog = catalog;
        self
    }

    /// 建構器模式：加入租賃項目
    pub fn with_rental_item(mut self, item: EquipmentRentalItem) -> Self {
        self.rental_items.push(item);
        self
    }

    /// 建構器模式：設置交通管制
    pub fn with_flagging(mut self, flagging: FlaggingConfig) -> Self {
        self.flagging = Some(flagging);
        self
    }

    /// 建構器模式：設置服務工作
    pub fn with_service_work(mut self, service_work: FlaggingConfig) -> Self {
        self.service_work = Some(service_work);
        self
    }

    /// 建構器模式：加入銷售品
    pub fn with_sale_item(mut self, item: SaleItem) -> Self {
        self.sale_items.push(item);
        self
    }

    /// 建構器模式：設置永久標誌
    pub fn with_permanent_signs(mut self, permanent_signs: PermanentSigns) -> Self {
        self.permanent_signs = permanent_signs;
        self
    }

    /// 加入階段
    pub fn add_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    /// 移除階段（索引超出範圍時回傳 None）
    pub fn remove_phase(&mut self, index: usize) -> Option<Phase> {
        if index < self.phases.len() {
            Some(self.phases.remove(index))
        } else {
            None
        }
    }

    /// 所有階段的工作天數總和
    pub fn total_days(&self) -> u32 {
        self.phases.iter().map(|p| p.days).sum()
    }

    /// 是否已有任何可計價內容
    pub fn has_priced_items(&self) -> bool {
        !self.phases.is_empty()
            || !self.rental_items.is_empty()
            || !self.sale_items.is_empty()
            || !self.permanent_signs.is_empty()
            || self.flagging.is_some()
            || self.service_work.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::county::RatedStatus;

    #[test]
    fn test_incremental_phases() {
        let mut bid = BidDraft::new(AdminData::new("C-200".to_string(), RatedStatus::Rated));
        assert!(!bid.has_priced_items());

        bid.add_phase(Phase::new("Phase 1".to_string(), 5, 2, 1));
        bid.add_phase(Phase::new("Phase 2".to_string(), 3, 2, 1));
        assert_eq!(bid.total_days(), 8);
        assert!(bid.has_priced_items());

        let removed = bid.remove_phase(0).unwrap();
        assert_eq!(removed.name, "Phase 1");
        assert!(bid.remove_phase(5).is_none());
        assert_eq!(bid.phases.len(), 1);
    }
}
