// ==========================================
// 矿石配矿系统 - 被拒批次回收轮
// ==========================================
// 职责: 以"累计加权平均补偿"重新评估贪心轮被拒批次
// 策略: 仅复核 Fe 与 SiO2；Al2O3 / P 在本轮不复核
// ==========================================
// 说明: 只复核两项指标是沿用的既有行为（是否有意尚未确认），
//       保持不变；Al2O3 / P 超标会体现在最终合格判定与反向调整中
// ==========================================

use crate::domain::lot::Lot;
use crate::domain::spec::SpecSet;
use crate::domain::types::{AllocationStatus, ChemParam};
use crate::engine::running_blend::AllocationState;
use tracing::{debug, info, instrument};

/// 回收轮复核的指标
pub const RECOVERY_CHECKED_PARAMS: [ChemParam; 2] = [ChemParam::Fe, ChemParam::SiO2];

pub struct RecoveryPass {
    // 无状态引擎
}

impl RecoveryPass {
    pub fn new() -> Self {
        Self {}
    }

    /// 第二轮: 回收被拒批次
    ///
    /// 按被拒队列顺序，当剩余目标 > 0:
    /// - take = min(批次吨位, 剩余目标)
    /// - 候选累计 Fe ≥ fe_min 且 SiO2 ≤ sio2_max → 提交 RECOVERED，移出队列
    /// - 否则留在队列，交由强制分配轮
    #[instrument(skip(self, lots, spec, state), fields(queued = state.rejected.len(), remaining_t = state.remaining_t))]
    pub fn recover(&self, lots: &[Lot], spec: &SpecSet, state: &mut AllocationState) {
        if !state.has_remaining() || state.rejected.is_empty() {
            return;
        }

        info!(
            count = state.rejected.len(),
            "尝试以加权平均补偿回收被拒批次"
        );

        let queue = std::mem::take(&mut state.rejected);
        let mut still_rejected = Vec::with_capacity(queue.len());

        for rejected in queue {
            if !state.has_remaining() {
                still_rejected.push(rejected);
                continue;
            }

            let lot = &lots[rejected.lot_index];
            let take_t = lot.tonnage_t.min(state.remaining_t);
            let candidate = state.running.candidate(lot, take_t);

            let passes = RECOVERY_CHECKED_PARAMS
                .iter()
                .all(|param| spec.satisfies(*param, candidate.get(*param)));

            if passes {
                state.commit(lots, rejected.lot_index, take_t, AllocationStatus::Recovered);
                info!(
                    lot_id = %lot.lot_id,
                    take_t,
                    "回收批次: 加权平均 Fe={:.3}%, SiO2={:.3}%",
                    candidate.fe,
                    candidate.sio2
                );
            } else {
                debug!(
                    lot_id = %lot.lot_id,
                    "回收失败: 加权平均 Fe={:.3}%, SiO2={:.3}%",
                    candidate.fe,
                    candidate.sio2
                );
                still_rejected.push(rejected);
            }
        }

        state.rejected = still_rejected;
    }
}

impl Default for RecoveryPass {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lot::Chemistry;
    use crate::domain::types::ProductSize;
    use crate::engine::running_blend::RejectedLot;

    fn lot(id: &str, tonnage: f64, fe: f64, sio2: f64, al2o3: f64, p: f64) -> Lot {
        Lot::new(id, tonnage, Chemistry::new(fe, sio2, al2o3, p), ProductSize::Lump10To40)
    }

    fn queued(lot_index: usize) -> RejectedLot {
        RejectedLot {
            lot_index,
            candidate: Chemistry::default(),
        }
    }

    #[test]
    fn test_recovery_ignores_alumina_and_phosphorus() {
        let pass = RecoveryPass::new();
        let spec = SpecSet::new(62.0, 6.0, 1.5, 0.06);
        let lots = vec![
            lot("BASE", 1000.0, 65.0, 3.0, 1.0, 0.03),
            lot("HIGH_AL", 500.0, 63.0, 3.0, 4.0, 0.03),
        ];
        let mut state = AllocationState::new(lots.len(), 1500.0);
        state.commit(&lots, 0, 1000.0, AllocationStatus::Accepted);
        state.rejected.push(queued(1));

        pass.recover(&lots, &spec, &mut state);

        // 累计 Al2O3 = 2.0% > 1.5%，但回收轮不复核 Al2O3
        assert_eq!(state.ledger.len(), 2);
        assert_eq!(state.ledger[1].status, AllocationStatus::Recovered);
        assert!(state.rejected.is_empty());
        assert_eq!(state.remaining_t, 0.0);
    }

    #[test]
    fn test_failing_lot_stays_queued() {
        let pass = RecoveryPass::new();
        let spec = SpecSet::new(62.0, 6.0, 1.5, 0.06);
        let lots = vec![
            lot("BASE", 1000.0, 63.0, 3.0, 1.0, 0.03),
            lot("LOW_FE", 1000.0, 55.0, 3.0, 1.0, 0.03),
        ];
        let mut state = AllocationState::new(lots.len(), 2000.0);
        state.commit(&lots, 0, 1000.0, AllocationStatus::Accepted);
        state.rejected.push(queued(1));

        pass.recover(&lots, &spec, &mut state);

        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.rejected.len(), 1);
        assert_eq!(state.remaining_t, 1000.0);
    }

    #[test]
    fn test_no_remaining_is_noop() {
        let pass = RecoveryPass::new();
        let lots = vec![lot("A", 100.0, 65.0, 3.0, 1.0, 0.03)];
        let mut state = AllocationState::new(lots.len(), 100.0);
        state.commit(&lots, 0, 100.0, AllocationStatus::Accepted);
        state.rejected.push(queued(0));

        pass.recover(&lots, &SpecSet::default(), &mut state);
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.rejected.len(), 1);
    }
}
