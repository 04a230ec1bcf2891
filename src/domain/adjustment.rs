// ==========================================
// 矿石配矿系统 - 反向调整报告
// ==========================================
// 职责: 超标指标所需的参考品位物料估算 + 强制分配告警
// 红线: 只读分析，不修改 BlendSummary
// ==========================================

use crate::domain::blend::BlendSummary;
use crate::domain::spec::ResolvedSpec;
use crate::domain::types::{AdjustmentStatus, AlarmSeverity, AlarmType, ChemParam, ProductSize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ParameterAdjustment - 单指标调整估算
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAdjustment {
    pub param: ChemParam,
    pub status: AdjustmentStatus,
    pub current: f64,
    pub target: f64,
    pub reference_grade: f64,
    /// 界限值 - 当前值（Fe 为正缺口，杂质为负超出量）
    pub gap: f64,
    /// 所需参考品位物料吨位；MET 为 0，UNREACHABLE 为 None
    pub required_t: Option<f64>,
    pub method: Option<String>,
}

// ==========================================
// ForcedLotEntry / BlendAlarm - 强制分配告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedLotEntry {
    pub lot_id: String,
    pub allocated_t: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendAlarm {
    pub alarm_type: AlarmType,
    pub severity: AlarmSeverity,
    pub message: String,
    pub forced_lots: Vec<ForcedLotEntry>,
    pub total_forced_t: f64,
}

// ==========================================
// AdjustmentReport
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentReport {
    /// 固定顺序: Fe, SiO2, Al2O3, P
    pub parameters: Vec<ParameterAdjustment>,
    pub alarms: Vec<BlendAlarm>,
    pub recommendations: Vec<String>,
}

impl AdjustmentReport {
    pub fn parameter(&self, param: ChemParam) -> Option<&ParameterAdjustment> {
        self.parameters.iter().find(|p| p.param == param)
    }

    pub fn has_high_severity_alarm(&self) -> bool {
        self.alarms.iter().any(|a| a.severity == AlarmSeverity::High)
    }
}

// ==========================================
// 结果映射（供展示层）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBlendResult {
    pub product_size: ProductSize,
    pub resolved_spec: ResolvedSpec,
    pub summary: BlendSummary,
    pub adjustments: AdjustmentReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendRunResult {
    pub target_t: f64,
    /// 键为粒级字面标签；无批次的粒级不出现
    pub results: BTreeMap<ProductSize, SizeBlendResult>,
}

impl BlendRunResult {
    pub fn get(&self, size: ProductSize) -> Option<&SizeBlendResult> {
        self.results.get(&size)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 是否存在需人工关注的强制分配
    pub fn requires_attention(&self) -> bool {
        self.results
            .values()
            .any(|r| r.adjustments.has_high_severity_alarm())
    }
}
