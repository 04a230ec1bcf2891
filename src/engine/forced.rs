// ==========================================
// 矿石配矿系统 - 强制分配轮
// ==========================================
// 职责: 目标吨位仍未满足时，从仍被拒的批次无条件补足
// 红线: 不做规格校验；结果标记 FORCED，由反向调整报告升级为高等级告警
// ==========================================

use crate::domain::lot::Lot;
use crate::domain::types::AllocationStatus;
use crate::engine::running_blend::AllocationState;
use tracing::{info, instrument, warn};

pub struct ForcedAllocationPass {
    // 无状态引擎
}

impl ForcedAllocationPass {
    pub fn new() -> Self {
        Self {}
    }

    /// 第三轮: 强制分配
    ///
    /// 按队列顺序: take = min(批次吨位 - 该批次已分配, 剩余目标)，take > 0 即提交
    ///
    /// 批次总量 < 目标时，结束后剩余目标仍 > 0（残余缺口，不视为错误）
    #[instrument(skip(self, lots, state), fields(queued = state.rejected.len(), remaining_t = state.remaining_t))]
    pub fn force(&self, lots: &[Lot], state: &mut AllocationState) {
        if !state.has_remaining() || state.rejected.is_empty() {
            return;
        }

        info!(remaining_t = state.remaining_t, "从被拒批次强制分配剩余吨位");

        let queue: Vec<usize> = state.rejected.iter().map(|r| r.lot_index).collect();
        for lot_index in queue {
            if !state.has_remaining() {
                break;
            }

            let lot = &lots[lot_index];
            let available_t = lot.tonnage_t - state.allocated_per_lot[lot_index];
            let take_t = available_t.min(state.remaining_t);
            if take_t > 0.0 {
                state.commit(lots, lot_index, take_t, AllocationStatus::Forced);
                warn!(lot_id = %lot.lot_id, take_t, "强制分配（指标超限）");
            }
        }
    }
}

impl Default for ForcedAllocationPass {
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

    fn lot(id: &str, tonnage: f64, fe: f64) -> Lot {
        Lot::new(id, tonnage, Chemistry::new(fe, 3.0, 1.0, 0.03), ProductSize::Fines)
    }

    fn queue(state: &mut AllocationState, indices: &[usize]) {
        for &lot_index in indices {
            state.rejected.push(RejectedLot {
                lot_index,
                candidate: Chemistry::default(),
            });
        }
    }

    #[test]
    fn test_force_fills_remaining_in_queue_order() {
        let pass = ForcedAllocationPass::new();
        let lots = vec![lot("A", 300.0, 50.0), lot("B", 300.0, 52.0), lot("C", 300.0, 51.0)];
        let mut state = AllocationState::new(lots.len(), 500.0);
        queue(&mut state, &[1, 2, 0]);

        pass.force(&lots, &mut state);

        let ids: Vec<&str> = state.ledger.iter().map(|a| a.lot_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(state.ledger[0].allocated_t, 300.0);
        assert_eq!(state.ledger[1].allocated_t, 200.0);
        assert!(state.ledger.iter().all(|a| a.status == AllocationStatus::Forced));
        assert_eq!(state.remaining_t, 0.0);
    }

    #[test]
    fn test_force_residual_shortfall() {
        let pass = ForcedAllocationPass::new();
        let lots = vec![lot("A", 300.0, 50.0)];
        let mut state = AllocationState::new(lots.len(), 1000.0);
        queue(&mut state, &[0]);

        pass.force(&lots, &mut state);

        assert_eq!(state.running.tonnage_t, 300.0);
        assert_eq!(state.remaining_t, 700.0);
    }

    #[test]
    fn test_force_respects_already_allocated() {
        let pass = ForcedAllocationPass::new();
        let lots = vec![lot("A", 300.0, 50.0)];
        let mut state = AllocationState::new(lots.len(), 1000.0);
        state.allocated_per_lot[0] = 100.0;
        queue(&mut state, &[0]);

        pass.force(&lots, &mut state);

        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.ledger[0].allocated_t, 200.0);
    }
}
