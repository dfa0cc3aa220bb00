//! MPT 設備與標誌反光膜類型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 標準 MPT 設備類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentType {
    /// 4 呎 Type III 拒馬
    FourFootTypeIII,
    /// 6 呎側翼
    SixFootWings,
    /// H 型支架
    HStand,
    /// 標誌柱
    Post,
    /// 沙包
    Sandbag,
    /// 標誌遮罩
    Covers,
    /// 金屬支架
    MetalStands,
    /// HI 直立面板
    HiVerticalPanel,
    /// Type XI 直立面板
    TypeXiVerticalPanel,
    /// B 型警示燈
    BLights,
    /// AC 型警示燈
    AcLights,
    /// 尖頭錐
    Sharps,
}

impl EquipmentType {
    /// 所有設備類型
    pub const ALL: [EquipmentType; 12] = [
        EquipmentType::FourFootTypeIII,
        EquipmentType::SixFootWings,
        EquipmentType::HStand,
        EquipmentType::Post,
        EquipmentType::Sandbag,
        EquipmentType::Covers,
        EquipmentType::MetalStands,
        EquipmentType::HiVerticalPanel,
        EquipmentType::TypeXiVerticalPanel,
        EquipmentType::BLights,
        EquipmentType::AcLights,
        EquipmentType::Sharps,
    ];

    /// 是否屬於燈具與筒錐類（以日租公式計價）
    pub fn is_light_and_drum(&self) -> bool {
        matches!(
            self,
            EquipmentType::HiVerticalPanel
                | EquipmentType::TypeXiVerticalPanel
                | EquipmentType::BLights
                | EquipmentType::AcLights
                | EquipmentType::Sharps
        )
    }

    /// 是否為決定施工工時與趟次的結構物（拒馬、H 架、標誌柱）
    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            EquipmentType::FourFootTypeIII | EquipmentType::HStand | EquipmentType::Post
        )
    }

    /// 顯示名稱
    pub fn label(&self) -> &'static str {
        match self {
            EquipmentType::FourFootTypeIII => "4' Ft Type III",
            EquipmentType::SixFootWings => "6 Ft Wings",
            EquipmentType::HStand => "H Stand",
            EquipmentType::Post => "Post",
            EquipmentType::Sandbag => "Sandbag",
            EquipmentType::Covers => "Covers",
            EquipmentType::MetalStands => "Metal Stands",
            EquipmentType::HiVerticalPanel => "HI Vertical Panels",
            EquipmentType::TypeXiVerticalPanel => "Type XI Vertical Panels",
            EquipmentType::BLights => "B-Lites",
            EquipmentType::AcLights => "A/C-Lites",
            EquipmentType::Sharps => "Sharps",
        }
    }
}

/// 標誌反光膜類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SheetingType {
    /// 高強度（High Intensity）
    Hi,
    /// 鑽石級（Diamond Grade）
    Dg,
    /// 特殊
    Special,
}

impl SheetingType {
    pub const ALL: [SheetingType; 3] = [SheetingType::Hi, SheetingType::Dg, SheetingType::Special];

    pub fn label(&self) -> &'static str {
        match self {
            SheetingType::Hi => "HI Signs",
            SheetingType::Dg => "DG Signs",
            SheetingType::Special => "Special Signs",
        }
    }
}

/// 主標誌所掛載的結構物
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociatedStructure {
    FourFootTypeIII,
    HStand,
    Post,
    /// 無結構物（散裝）
    None,
}

impl AssociatedStructure {
    /// 對應的設備類型
    pub fn equipment_type(&self) -> Option<EquipmentType> {
        match self {
            AssociatedStructure::FourFootTypeIII => Some(EquipmentType::FourFootTypeIII),
            AssociatedStructure::HStand => Some(EquipmentType::HStand),
            AssociatedStructure::Post => Some(EquipmentType::Post),
            AssociatedStructure::None => None,
        }
    }
}

/// 設備靜態資訊（購置價、折扣、耐用年限）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentInfo {
    /// 購置單價（標誌為每平方呎）
    pub price: Decimal,

    /// 報價折扣率（百分比）
    pub discount_rate: Decimal,

    /// 耐用年限（年）
    pub useful_life: Decimal,
}

impl EquipmentInfo {
    pub fn new(price: Decimal, discount_rate: Decimal, useful_life: Decimal) -> Self {
        Self {
            price,
            discount_rate,
            useful_life,
        }
    }

    /// 每日折舊額，耐用年限為零時視為不折舊
    pub fn daily_depreciation(&self) -> Decimal {
        if self.useful_life <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.price / (self.useful_life * Decimal::from(365))
    }

    /// 扣除折扣後的單價
    pub fn discounted_price(&self) -> Decimal {
        self.price - self.price * (self.discount_rate / Decimal::ONE_HUNDRED)
    }
}

/// 設備價目表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub equipment: BTreeMap<EquipmentType, EquipmentInfo>,
    pub sheeting: BTreeMap<SheetingType, EquipmentInfo>,
}

impl EquipmentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置設備資訊
    pub fn with_equipment(mut self, equipment_type: EquipmentType, info: EquipmentInfo) -> Self {
        self.equipment.insert(equipment_type, info);
        self
    }

    /// 建構器模式：設置反光膜資訊（每平方呎）
    pub fn with_sheeting(mut self, sheeting: SheetingType, info: EquipmentInfo) -> Self {
        self.sheeting.insert(sheeting, info);
        self
    }

    pub fn equipment_info(&self, equipment_type: EquipmentType) -> Option<&EquipmentInfo> {
        self.equipment.get(&equipment_type)
    }

    pub fn sheeting_info(&self, sheeting: SheetingType) -> Option<&EquipmentInfo> {
        self.sheeting.get(&sheeting)
    }
}
