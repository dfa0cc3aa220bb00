//! 交通管制估價與報價示例

use estimate::{
    AdminData, BidDraft, County, EquipmentCatalog, EquipmentInfo, EquipmentType,
    EstimateCalculator, FlaggingConfig, HardwareLine, Market, PermanentSignItem,
    PermanentSignKind, PermanentSigns, PermanentSignsCatalog, Phase, PricingConfig,
    QuoteCalculator, RatedStatus, SaleItem, SummaryFormatter,
};
use rust_decimal_macros::dec;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 交通管制估價示例 ===\n");

    // 縣別費率（動員市場）
    let county = County::new(14, "Centre".to_string(), "PA".to_string(), Market::Mobilization)
        .with_flagging_rates(dec!(22.5), dec!(12.75), dec!(28))
        .with_labor_rates(dec!(35), dec!(18.5), dec!(27))
        .with_overhead(dec!(3.5), dec!(2))
        .with_target_gm(dec!(40), dec!(55));

    let admin = AdminData::new("SR-0322".to_string(), RatedStatus::Rated)
        .with_county(county)
        .with_travel(dec!(45), dec!(50))
        .with_fuel_cost_per_gallon(dec!(3.85));

    let catalog = EquipmentCatalog::new()
        .with_equipment(
            EquipmentType::FourFootTypeIII,
            EquipmentInfo::new(dec!(365), dec!(10), dec!(5)),
        )
        .with_equipment(EquipmentType::Post, EquipmentInfo::new(dec!(48), dec!(0), dec!(3)));

    let permanent_signs = PermanentSigns::new(
        PermanentSignsCatalog::new()
            .with_hardware_price("antiTheftBolts", dec!(2))
            .with_post_price(dec!(60))
            .with_sq_ft_pricing(dec!(10), dec!(25))
            .with_item_markup(dec!(50))
            .with_max_daily_hours(dec!(8)),
    )
    .with_item(
        PermanentSignItem::new(PermanentSignKind::InstallTypeB, dec!(6), 2, 1)
            .with_install_hours(dec!(8))
            .with_sign_sq_footage(dec!(30))
            .with_hardware(HardwareLine::new("antiTheftBolts", dec!(12))),
    );

    let bid = BidDraft::new(admin)
        .with_equipment_catalog(catalog)
        .with_phase(
            Phase::new("Stage 1 - 右側車道封閉".to_string(), 12, 3, 2)
                .with_equipment(EquipmentType::FourFootTypeIII, dec!(40))
                .with_equipment(EquipmentType::Post, dec!(12))
                .with_maintenance_trips(2),
        )
        .with_flagging(FlaggingConfig::new(3).with_dispatch_fee(dec!(75)))
        .with_sale_item(SaleItem::new(
            "S-100".to_string(),
            "28\" Traffic cone".to_string(),
            dec!(50),
            dec!(18.4),
            dec!(30),
        ))
        .with_permanent_signs(permanent_signs);

    let calculator = EstimateCalculator::new(PricingConfig::default())?;
    let result = calculator.finalize(&bid)?;

    println!("{:<18} {:>14} {:>14} {:>14} {:>9}", "類別", "營收", "成本", "毛利", "毛利率");
    for row in SummaryFormatter::format_totals(&result.totals) {
        println!(
            "{:<18} {:>14} {:>14} {:>14} {:>9}",
            row.label, row.revenue, row.cost, row.gross_profit, row.gross_margin
        );
    }

    if !result.warnings.is_empty() {
        println!("\n警告:");
        for warning in &result.warnings {
            println!("  - [{:?}] {}: {}", warning.severity, warning.source, warning.message);
        }
    }

    // 以估價結果建立報價單
    let quote = QuoteCalculator::seed_from_totals(result.bid_id, &result.totals)
        .with_recipient("estimating@example.com".to_string())
        .with_tax_rate(dec!(6));
    let totals = QuoteCalculator::totals(&quote);

    println!("\n報價單明細:");
    for item in &quote.items {
        println!(
            "  - {}: {} × {}",
            item.description,
            item.quantity,
            SummaryFormatter::currency(item.unit_price)
        );
    }
    println!("小計: {}", SummaryFormatter::currency(totals.subtotal));
    println!("稅額: {}", SummaryFormatter::currency(totals.tax));
    println!("總計: {}", SummaryFormatter::currency(totals.total));

    Ok(())
}
