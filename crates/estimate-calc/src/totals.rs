//! 估價單總計

use rust_decimal::Decimal;
use serde::Serialize;

use crate::CategoryTotals;

/// 估價類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Mpt,
    Rental,
    PermanentSigns,
    Sale,
    Flagging,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Mpt,
        Category::Rental,
        Category::PermanentSigns,
        Category::Sale,
        Category::Flagging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Mpt => "MPT",
            Category::Rental => "Equipment Rental",
            Category::PermanentSigns => "Permanent Signs",
            Category::Sale => "Sale Items",
            Category::Flagging => "Flagging",
        }
    }
}

/// 各類別占總營收的百分比
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RevenueShare {
    pub mpt: Decimal,
    pub rental: Decimal,
    pub permanent_signs: Decimal,
    pub sale: Decimal,
    pub flagging: Decimal,
}

/// 各類別與估價單合計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BidTotals {
    pub mpt: CategoryTotals,
    pub rental: CategoryTotals,
    pub permanent_signs: CategoryTotals,
    pub sale: CategoryTotals,
    /// 交通管制 + 服務工作
    pub flagging: CategoryTotals,

    pub total: CategoryTotals,
    pub revenue_share: RevenueShare,
}

impl BidTotals {
    pub fn new(
        mpt: CategoryTotals,
        rental: CategoryTotals,
        permanent_signs: CategoryTotals,
        sale: CategoryTotals,
        flagging: CategoryTotals,
    ) -> Self {
        let total: CategoryTotals = [mpt, rental, permanent_signs, sale, flagging]
            .into_iter()
            .sum();
        let share = |category: &CategoryTotals| {
            if total.revenue.is_zero() {
                Decimal::ZERO
            } else {
                category.revenue / total.revenue * Decimal::ONE_HUNDRED
            }
        };

        Self {
            revenue_share: RevenueShare {
                mpt: share(&mpt),
                rental: share(&rental),
                permanent_signs: share(&permanent_signs),
                sale: share(&sale),
                flagging: share(&flagging),
            },
            mpt,
            rental,
            permanent_signs,
            sale,
            flagging,
            total,
        }
    }

    pub fn category(&self, category: Category) -> &CategoryTotals {
        match category {
            Category::Mpt => &self.mpt,
            Category::Rental => &self.rental,
            Category::PermanentSigns => &self.permanent_signs,
            Category::Sale => &self.sale,
            Category::Flagging => &self.flagging,
        }
    }

    /// 依固定順序列出各類別
    pub fn categories(&self) -> impl Iterator<Item = (Category, &CategoryTotals)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.category(c)))
    }
}
