// ==========================================
// 矿石配矿系统 - 贪心分配引擎
// ==========================================
// 职责: 按 Fe 降序逐批次分配，直至目标吨位满足或批次耗尽
// 判定: 以"候选累计加权平均"对照有效规格（四项全查）
// 红线: 局部、顺序相关的贪心决策，不做全局搜索
// ==========================================

use crate::domain::lot::Lot;
use crate::domain::spec::SpecSet;
use crate::domain::types::AllocationStatus;
use crate::engine::running_blend::{AllocationState, RejectedLot};
use tracing::{debug, instrument};

pub struct GreedyAllocator {
    // 无状态引擎
}

impl GreedyAllocator {
    pub fn new() -> Self {
        Self {}
    }

    /// Fe 降序的批次下标；Fe 相同时保持输入顺序（稳定排序）
    pub fn fe_descending_order(&self, lots: &[Lot]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..lots.len()).collect();
        order.sort_by(|&a, &b| lots[b].chemistry.fe.total_cmp(&lots[a].chemistry.fe));
        order
    }

    /// 第一轮: 贪心分配
    ///
    /// 对每个批次（Fe 降序），当剩余目标 > 0:
    /// - take = min(批次吨位, 剩余目标)
    /// - 候选累计 Fe ≥ fe_min 且 SiO2/Al2O3/P ≤ 上限 → 提交 ACCEPTED
    /// - 否则进入被拒队列（记录候选值）
    ///
    /// # 返回
    /// 分配状态（台账、累计和、剩余目标、被拒队列），交由回收轮继续
    #[instrument(skip(self, lots, spec), fields(lot_count = lots.len()))]
    pub fn allocate(&self, lots: &[Lot], target_t: f64, spec: &SpecSet) -> AllocationState {
        let mut state = AllocationState::new(lots.len(), target_t);

        for lot_index in self.fe_descending_order(lots) {
            if !state.has_remaining() {
                break;
            }

            let lot = &lots[lot_index];
            let take_t = lot.tonnage_t.min(state.remaining_t);
            let candidate = state.running.candidate(lot, take_t);

            if spec.satisfied_by(&candidate) {
                state.commit(lots, lot_index, take_t, AllocationStatus::Accepted);
                debug!(
                    lot_id = %lot.lot_id,
                    take_t,
                    remaining_t = state.remaining_t,
                    "批次接受"
                );
            } else {
                let rejected = RejectedLot {
                    lot_index,
                    candidate,
                };
                debug!(lot_id = %lot.lot_id, reason = %rejected.reason(spec), "批次拒绝");
                state.rejected.push(rejected);
            }
        }

        state.rejected_count = state.rejected.len();
        state
    }
}

impl Default for GreedyAllocator {
    fn default() -> Self {
        Self::new()
    }
}
