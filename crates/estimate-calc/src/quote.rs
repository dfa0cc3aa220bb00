//! 報價單合計

use estimate_core::sanitize::non_negative;
use estimate_core::{Quote, QuoteItem, QuoteTerms};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::format::SummaryFormatter;
use crate::totals::{BidTotals, Category};

/// 報價單合計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub taxable_subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// 報價單計算器
pub struct QuoteCalculator;

impl QuoteCalculator {
    /// 明細金額 = 數量 × 單價 × (1 - 折扣)
    pub fn line_total(item: &QuoteItem) -> Decimal {
        let discount = non_negative(item.discount_percent).min(Decimal::ONE_HUNDRED);
        non_negative(item.quantity)
            * non_negative(item.unit_price)
            * (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
    }

    pub fn totals(quote: &Quote) -> QuoteTotals {
        let subtotal: Decimal = quote.items.iter().map(Self::line_total).sum();
        let taxable_subtotal: Decimal = quote
            .items
            .iter()
            .filter(|i| i.taxable)
            .map(Self::line_total)
            .sum();
        let tax = taxable_subtotal * non_negative(quote.tax_rate) / Decimal::ONE_HUNDRED;

        QuoteTotals {
            subtotal,
            taxable_subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// 以估價結果建立報價單草稿：每個有營收的類別一筆明細，並勾選對應條款
    pub fn seed_from_totals(bid_id: Uuid, totals: &BidTotals) -> Quote {
        let items: Vec<QuoteItem> = totals
            .categories()
            .filter(|(_, values)| values.revenue > Decimal::ZERO)
            .map(|(category, values)| {
                QuoteItem::new(
                    category.label().to_string(),
                    Decimal::ONE,
                    SummaryFormatter::round_currency(values.revenue),
                )
                .with_tax(category == Category::Sale)
            })
            .collect();

        let terms = QuoteTerms {
            standard_terms: true,
            rental_agreements: totals.rental.revenue > Decimal::ZERO,
            equipment_sale: totals.sale.revenue > Decimal::ZERO,
            flagging_terms: totals.flagging.revenue > Decimal::ZERO,
        };

        let mut quote = Quote::for_bid(bid_id).with_terms(terms);
        quote.items = items;
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryTotals;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total_with_discount() {
        let item =
            QuoteItem::new("Arrow board".to_string(), dec!(2), dec!(150)).with_discount(dec!(10));
        assert_eq!(QuoteCalculator::line_total(&item), dec!(270));
    }

    #[test]
    fn test_quote_totals() {
        let quote = Quote::new()
            .with_tax_rate(dec!(6))
            .with_item(QuoteItem::new("Flagging".to_string(), dec!(1), dec!(856)))
            .with_item(QuoteItem::new("Cones".to_string(), dec!(10), dec!(20)).with_tax(true));

        let totals = QuoteCalculator::totals(&quote);
        assert_eq!(totals.subtotal, dec!(1056));
        assert_eq!(totals.taxable_subtotal, dec!(200));
        assert_eq!(totals.tax, dec!(12));
        assert_eq!(totals.total, dec!(1068));
    }

    #[test]
    fn test_empty_quote() {
        assert_eq!(QuoteCalculator::totals(&Quote::new()), QuoteTotals::default());
    }

    #[test]
    fn test_seed_from_totals() {
        let totals = BidTotals::new(
            CategoryTotals::from_revenue_cost(dec!(1000.005), dec!(500)),
            CategoryTotals::default(),
            CategoryTotals::default(),
            CategoryTotals::from_revenue_cost(dec!(120), dec!(100)),
            CategoryTotals::from_revenue_cost(dec!(506), dec!(300)),
        );
        let bid_id = Uuid::new_v4();
        let quote = QuoteCalculator::seed_from_totals(bid_id, &totals);

        assert_eq!(quote.bid_id, Some(bid_id));
        assert_eq!(quote.items.len(), 3);
        assert_eq!(quote.items[0].description, "MPT");
        assert_eq!(quote.items[0].unit_price, dec!(1000.01));
        assert!(quote.items[1].taxable);
        assert!(quote.terms.standard_terms);
        assert!(quote.terms.equipment_sale);
        assert!(quote.terms.flagging_terms);
        assert!(!quote.terms.rental_agreements);
    }
}
