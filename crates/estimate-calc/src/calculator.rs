//! 估價主計算器

use estimate_core::{AdminData, BidDraft, FlaggingConfig, PricingConfig};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::flagging::{FlaggingCalculator, FlaggingSummary, FlaggingWork};
use crate::mpt::{MptCalculator, PhaseSummary};
use crate::permanent_signs::PermanentSignsCalculator;
use crate::phase_rollup::PhaseRollup;
use crate::rental::RentalSummary;
use crate::sale::SaleSummary;
use crate::totals::BidTotals;
use crate::{CategoryTotals, EstimateResult, EstimateWarning};

/// 估價計算器
///
/// 只持有定價配置；估價單內容每次以參數傳入，不保留任何中間狀態。
#[derive(Debug, Clone)]
pub struct EstimateCalculator {
    config: PricingConfig,
}

impl EstimateCalculator {
    /// 創建計算器（配置會先驗證）
    pub fn new(config: PricingConfig) -> estimate_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// 草稿預覽
    ///
    /// 缺少縣別或價目資料時以零計算並附上警告；只有配置錯誤會回傳 Err。
    pub fn calculate(&self, bid: &BidDraft) -> estimate_core::Result<EstimateResult> {
        tracing::info!(
            "開始估價計算：估價單 {}，階段 {} 個",
            bid.id,
            bid.phases.len()
        );

        let start_time = std::time::Instant::now();
        let mut warnings = Vec::new();

        // Step 1: 縣別資料
        tracing::debug!("Step 1: 檢查縣別資料");
        match &bid.admin.county {
            Some(county) => county.validate()?,
            None => {
                tracing::warn!("估價單 {} 尚未選擇縣別，費率以零計算", bid.id);
                warnings.push(EstimateWarning::warning(
                    "county".to_string(),
                    "尚未選擇縣別，費率以零計算".to_string(),
                ));
            }
        }

        // Step 2: MPT 逐階段推導
        tracing::debug!("Step 2: MPT 逐階段推導");
        if bid.phases.is_empty() {
            warnings.push(EstimateWarning::info(
                "phases".to_string(),
                "尚未建立工程階段".to_string(),
            ));
        }

        let mpt = MptCalculator::new(&self.config);
        let phases: Vec<PhaseSummary> = bid
            .phases
            .iter()
            .map(|phase| {
                for label in MptCalculator::missing_catalog_entries(phase, &bid.equipment_catalog) {
                    tracing::warn!("階段 {} 的 {} 缺少價目資料", phase.name, label);
                    warnings.push(EstimateWarning::warning(
                        format!("phase:{}", phase.name),
                        format!("價目表缺少 {}，以零計算", label),
                    ));
                }
                mpt.phase_summary(&bid.admin, phase, &bid.equipment_catalog)
            })
            .collect();
        let rollup = PhaseRollup::rollup(&phases);
        tracing::debug!(
            "MPT 合計：營收 {}，工時 {}",
            rollup.mpt.revenue,
            rollup.total_hours
        );

        // Step 3: 交通管制與服務工作
        tracing::debug!("Step 3: 交通管制與服務工作");
        let flagging_calculator = FlaggingCalculator::new(&self.config);
        let flagging = self.flagging_summary(
            &flagging_calculator,
            &bid.admin,
            bid.flagging.as_ref(),
            FlaggingWork::Flagging,
            &mut warnings,
        )?;
        let service_work = self.flagging_summary(
            &flagging_calculator,
            &bid.admin,
            bid.service_work.as_ref(),
            FlaggingWork::ServiceWork,
            &mut warnings,
        )?;

        // Step 4: 租賃、銷售、永久標誌
        tracing::debug!("Step 4: 租賃、銷售、永久標誌");
        let skipped_rentals = bid
            .rental_items
            .iter()
            .filter(|i| i.name.trim().is_empty())
            .count();
        if skipped_rentals > 0 {
            warnings.push(EstimateWarning::info(
                "rental".to_string(),
                format!("{} 筆租賃項目未填名稱，已略過", skipped_rentals),
            ));
        }
        let rental = RentalSummary::calculate(&bid.rental_items, &self.config);
        let sale = SaleSummary::calculate(&bid.sale_items);
        let permanent_signs =
            PermanentSignsCalculator::new(&self.config).summary(&bid.permanent_signs, &bid.admin)?;

        // Step 5: 總計
        tracing::debug!("Step 5: 彙總各類別");
        let flagging_totals: CategoryTotals = flagging
            .iter()
            .chain(service_work.iter())
            .map(FlaggingSummary::category)
            .sum();
        let totals = BidTotals::new(
            rollup.mpt,
            rental.totals,
            permanent_signs.totals,
            sale.totals,
            flagging_totals,
        );

        tracing::info!(
            "估價計算完成：營收 {}，毛利率 {}%，警告 {} 筆，耗時 {:?}",
            totals.total.revenue,
            totals.total.gross_margin_percent.round_dp(2),
            warnings.len(),
            start_time.elapsed()
        );

        Ok(EstimateResult {
            bid_id: bid.id,
            totals,
            phases,
            rollup,
            flagging,
            service_work,
            rental,
            sale,
            permanent_signs,
            warnings,
        })
    }

    /// 定稿：除了 `calculate` 的檢查外，估價單至少需要一個階段
    pub fn finalize(&self, bid: &BidDraft) -> estimate_core::Result<EstimateResult> {
        tracing::info!("定稿估價單 {}", bid.id);
        PhaseRollup::require_phases(&bid.phases)?;
        self.calculate(bid)
    }

    /// 並行計算多張估價單（各估價單互相獨立，結果順序與輸入一致）
    pub fn calculate_batch(&self, bids: &[BidDraft]) -> Vec<estimate_core::Result<EstimateResult>> {
        tracing::info!("批次估價：{} 張", bids.len());
        bids.par_iter().map(|bid| self.calculate(bid)).collect()
    }

    /// 交通管制標準包價（依人數、工資分類與縣別即時推導）
    pub fn standard_lump_sum(
        &self,
        admin: &AdminData,
        flagging: &FlaggingConfig,
    ) -> estimate_core::Result<Decimal> {
        FlaggingCalculator::new(&self.config).standard_lump_sum(
            admin.county.as_ref(),
            admin.rated,
            flagging,
            FlaggingWork::Flagging,
        )
    }

    fn flagging_summary(
        &self,
        calculator: &FlaggingCalculator<'_>,
        admin: &AdminData,
        flagging: Option<&FlaggingConfig>,
        work: FlaggingWork,
        warnings: &mut Vec<EstimateWarning>,
    ) -> estimate_core::Result<Option<FlaggingSummary>> {
        let Some(flagging) = flagging else {
            return Ok(None);
        };

        if flagging.personnel == 0 {
            warnings.push(EstimateWarning::info(
                work.context().to_string(),
                "人數為零".to_string(),
            ));
        }

        calculator.cost_summary(admin, flagging, work).map(Some)
    }
}
