//! 階段彙總

use estimate_core::{EstimateError, Phase};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::mpt::{CostMetrics, LaborSummary, PhaseSummary, TruckSummary};
use crate::CategoryTotals;

/// 估價單層級的 MPT 合計
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RollupTotals {
    pub phase_count: usize,
    pub total_days: u32,
    pub total_trips: u32,

    pub total_rated_hours: Decimal,
    pub total_non_rated_hours: Decimal,
    pub total_hours: Decimal,

    pub equipment: CostMetrics,
    pub lights: CostMetrics,
    pub signs: CostMetrics,
    pub labor: LaborSummary,
    pub truck: TruckSummary,

    /// MPT 類別合計
    pub mpt: CategoryTotals,
}

/// 階段彙總器
pub struct PhaseRollup;

impl PhaseRollup {
    /// 將各階段推導結果相加
    ///
    /// 天數、人數與趟次屬於階段本身，這裡只做加總供顯示。
    pub fn rollup(phases: &[PhaseSummary]) -> RollupTotals {
        let mut totals = phases.iter().fold(RollupTotals::default(), |mut acc, phase| {
            acc.phase_count += 1;
            acc.total_days += phase.days;
            acc.total_trips += phase.trips;
            acc.total_rated_hours += phase.rated_hours();
            acc.total_non_rated_hours += phase.non_rated_hours();
            acc.equipment = acc.equipment.combine(&phase.equipment);
            acc.lights = acc.lights.combine(&phase.lights);
            acc.signs = acc.signs.combine(&phase.signs);
            acc.labor = acc.labor.combine(&phase.labor);
            acc.truck = acc.truck.combine(&phase.truck);
            acc
        });

        totals.total_hours = totals.total_rated_hours + totals.total_non_rated_hours;
        totals.mpt = [
            totals.equipment.category(),
            totals.lights.category(),
            totals.signs.category(),
            totals.labor.category(),
            totals.truck.category(),
        ]
        .into_iter()
        .sum();

        totals
    }

    /// 定稿前檢查：至少需要一個階段
    pub fn require_phases(phases: &[Phase]) -> estimate_core::Result<()> {
        if phases.is_empty() {
            return Err(EstimateError::NoPhases);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn summary(name: &str, days: u32, rated: Decimal, non_rated: Decimal) -> PhaseSummary {
        PhaseSummary {
            name: name.to_string(),
            days,
            personnel: 2,
            number_trucks: 1,
            trips: 2,
            equipment: CostMetrics {
                purchase_cost: dec!(1000),
                revenue: dec!(900),
                depreciation_cost: dec!(100),
            },
            lights: CostMetrics::default(),
            signs: CostMetrics::default(),
            labor: LaborSummary {
                rated_hours: rated,
                non_rated_hours: non_rated,
                rated_cost: rated * dec!(40),
                non_rated_cost: non_rated * dec!(25),
                revenue: (rated * dec!(40) + non_rated * dec!(25)) * dec!(2),
            },
            truck: TruckSummary::default(),
        }
    }

    #[test]
    fn test_rollup_sums_phases() {
        let phases = vec![
            summary("A", 10, dec!(10), dec!(6)),
            summary("B", 5, dec!(4), dec!(2)),
        ];
        let totals = PhaseRollup::rollup(&phases);

        assert_eq!(totals.phase_count, 2);
        assert_eq!(totals.total_days, 15);
        assert_eq!(totals.total_trips, 4);
        assert_eq!(totals.total_rated_hours, dec!(14));
        assert_eq!(totals.total_non_rated_hours, dec!(8));
        assert_eq!(totals.total_hours, dec!(22));
        assert_eq!(totals.equipment.revenue, dec!(1800));
        assert_eq!(
            totals.mpt.revenue,
            phases.iter().map(|p| p.category().revenue).sum::<Decimal>()
        );
    }

    #[test]
    fn test_empty_rollup_is_zero() {
        let totals = PhaseRollup::rollup(&[]);
        assert_eq!(totals, RollupTotals::default());
    }

    #[test]
    fn test_require_phases() {
        assert!(matches!(
            PhaseRollup::require_phases(&[]),
            Err(EstimateError::NoPhases)
        ));
        let phases = vec![Phase::new("A".to_string(), 1, 1, 0)];
        assert!(PhaseRollup::require_phases(&phases).is_ok());
    }

    proptest! {
        #[test]
        fn prop_total_hours_additive(
            hours in proptest::collection::vec((0u32..1000, 0u32..1000), 0..12)
        ) {
            let phases: Vec<PhaseSummary> = hours
                .iter()
                .enumerate()
                .map(|(i, (r, n))| {
                    summary(&format!("P{}", i), 1, Decimal::from(*r), Decimal::from(*n))
                })
                .collect();

            let totals = PhaseRollup::rollup(&phases);
            let expected: Decimal = phases
                .iter()
                .map(|p| p.rated_hours() + p.non_rated_hours())
                .sum();
            prop_assert_eq!(totals.total_hours, expected);
        }
    }
}
