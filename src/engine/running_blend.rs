// ==========================================
// 矿石配矿系统 - 累计配矿状态
// ==========================================
// 职责: 三轮分配共享的累计吨位/加权和、剩余目标、台账、被拒队列
// 红线: 仅在单粒级一次运行内存在，不跨粒级、不跨运行
// ==========================================

use crate::domain::blend::Allocation;
use crate::domain::lot::{Chemistry, Lot};
use crate::domain::spec::SpecSet;
use crate::domain::types::AllocationStatus;

// ==========================================
// RunningBlend - 累计吨位与加权和
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningBlend {
    pub tonnage_t: f64,
    pub sums: Chemistry,
}

impl RunningBlend {
    /// 候选累计百分比: (累计和 + take×指标) / (累计吨位 + take)
    ///
    /// 不修改累计状态
    pub fn candidate(&self, lot: &Lot, take_t: f64) -> Chemistry {
        self.sums
            .plus(&lot.chemistry.scaled(take_t))
            .divided(self.tonnage_t + take_t)
    }

    /// 提交吨位
    pub fn commit(&mut self, lot: &Lot, take_t: f64) {
        self.sums = self.sums.plus(&lot.chemistry.scaled(take_t));
        self.tonnage_t += take_t;
    }

    /// 当前加权平均；尚无吨位时为 None
    pub fn average(&self) -> Option<Chemistry> {
        if self.tonnage_t > 0.0 {
            Some(self.sums.divided(self.tonnage_t))
        } else {
            None
        }
    }
}

// ==========================================
// RejectedLot - 被拒批次
// ==========================================
// 拒绝原因以贪心轮当时的四项候选值编码
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RejectedLot {
    pub lot_index: usize,
    pub candidate: Chemistry,
}

impl RejectedLot {
    /// 诊断文本，例如 `Fe=61.500% (min=62%), SiO2=...`
    pub fn reason(&self, spec: &SpecSet) -> String {
        format!(
            "Fe={:.3}% (min={}%), SiO2={:.3}% (max={}%), Al2O3={:.4}% (max={}%), P={:.4}% (max={}%)",
            self.candidate.fe,
            spec.fe_min,
            self.candidate.sio2,
            spec.sio2_max,
            self.candidate.al2o3,
            spec.al_max,
            self.candidate.p,
            spec.p_max
        )
    }
}

// ==========================================
// AllocationState - 分配过程状态
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationState {
    pub target_t: f64,
    pub remaining_t: f64,
    pub running: RunningBlend,
    /// 按输入顺序记录每个批次已分配吨位
    pub allocated_per_lot: Vec<f64>,
    /// 按提交顺序
    pub ledger: Vec<Allocation>,
    /// 待回收/强制的批次（队列顺序 = 贪心轮拒绝顺序）
    pub rejected: Vec<RejectedLot>,
    /// 贪心轮结束时的被拒批次数
    pub rejected_count: usize,
}

impl AllocationState {
    /// 目标吨位非正（或非数）时剩余目标视为 0
    pub fn new(lot_count: usize, target_t: f64) -> Self {
        let remaining_t = if target_t > 0.0 { target_t } else { 0.0 };
        Self {
            target_t,
            remaining_t,
            running: RunningBlend::default(),
            allocated_per_lot: vec![0.0; lot_count],
            ledger: Vec::new(),
            rejected: Vec::new(),
            rejected_count: 0,
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining_t > 0.0
    }

    /// 提交一笔分配: 更新累计和、剩余目标、批次已分配量与台账
    pub fn commit(&mut self, lots: &[Lot], lot_index: usize, take_t: f64, status: AllocationStatus) {
        let lot = &lots[lot_index];
        self.running.commit(lot, take_t);
        self.remaining_t -= take_t;
        self.allocated_per_lot[lot_index] += take_t;
        self.ledger.push(Allocation::new(lot, take_t, status));
    }
}
