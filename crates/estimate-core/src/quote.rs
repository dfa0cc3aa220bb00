//! 報價單模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 報價單所附條款
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteTerms {
    pub standard_terms: bool,
    pub rental_agreements: bool,
    pub equipment_sale: bool,
    pub flagging_terms: bool,
}

/// 報價明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// 折扣（百分比）
    pub discount_percent: Decimal,
    /// 是否課稅
    pub taxable: bool,
}

impl QuoteItem {
    pub fn new(description: String, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            quantity,
            unit_price,
            discount_percent: Decimal::ZERO,
            taxable: false,
        }
    }

    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn with_tax(mut self, taxable: bool) -> Self {
        self.taxable = taxable;
        self
    }
}

/// 報價單（引用估價單或工程，消費其計算結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,

    /// 來源估價單
    pub bid_id: Option<Uuid>,

    /// 收件人 email
    pub recipients: Vec<String>,

    pub items: Vec<QuoteItem>,

    /// 稅率（百分比）
    pub tax_rate: Decimal,

    pub terms: QuoteTerms,
}

impl Quote {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            bid_id: None,
            recipients: Vec::new(),
            items: Vec::new(),
            tax_rate: Decimal::ZERO,
            terms: QuoteTerms::default(),
        }
    }

    pub fn for_bid(bid_id: Uuid) -> Self {
        Self {
            bid_id: Some(bid_id),
            ..Self::new()
        }
    }

    pub fn with_recipient(mut self, email: String) -> Self {
        self.recipients.push(email);
        self
    }

    pub fn with_item(mut self, item: QuoteItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_terms(mut self, terms: QuoteTerms) -> Self {
        self.terms = terms;
        self
    }
}

impl Default for Quote {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_builder() {
        let bid_id = Uuid::new_v4();
        let quote = Quote::for_bid(bid_id)
            .with_recipient("pm@example.com".to_string())
            .with_tax_rate(dec!(6))
            .with_item(
                QuoteItem::new("Flagging".to_string(), dec!(1), dec!(506)).with_discount(dec!(5)),
            );

        assert_eq!(quote.bid_id, Some(bid_id));
        assert_eq!(quote.recipients, vec!["pm@example.com".to_string()]);
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items[0].discount_percent, dec!(5));
        assert!(!quote.items[0].taxable);
        assert_eq!(quote.terms, QuoteTerms::default());
    }
}
