// ==========================================
// 矿石配矿系统 - 反向调整估算
// ==========================================
// 职责: 对已完成（可能超标）的配矿，估算每项超标指标
//       需混入多少"理想参考品位"物料才能回到规格内
// 公式: required = (gap × 当前总吨位) / (参考品位 - 当前品位)
//       gap = 界限值 - 当前值
// 红线: 只读分析，不修改 BlendSummary
// ==========================================

use crate::domain::adjustment::{AdjustmentReport, BlendAlarm, ForcedLotEntry, ParameterAdjustment};
use crate::domain::blend::BlendSummary;
use crate::domain::types::{AdjustmentStatus, AlarmSeverity, AlarmType, ChemParam};
use crate::i18n::t_with_args;
use tracing::{instrument, warn};

// ==========================================
// 参考品位（策略常量，不由数据推导）
// ==========================================
pub const REFERENCE_FE: f64 = 65.0;
pub const REFERENCE_SIO2: f64 = 2.0;
pub const REFERENCE_AL2O3: f64 = 0.8;
pub const REFERENCE_P: f64 = 0.01;

/// 指标对应的参考品位
pub fn reference_grade(param: ChemParam) -> f64 {
    match param {
        ChemParam::Fe => REFERENCE_FE,
        ChemParam::SiO2 => REFERENCE_SIO2,
        ChemParam::Al2O3 => REFERENCE_AL2O3,
        ChemParam::P => REFERENCE_P,
    }
}

pub struct ReverseAdjustmentEstimator {
    // 无状态引擎
}

impl ReverseAdjustmentEstimator {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成反向调整报告
    ///
    /// - 合格指标: MET，所需吨位 0
    /// - 超标指标: 线性混合方程估算所需参考品位物料吨位
    /// - 参考品位无法弥补（分母为 0 或方向相反）: UNREACHABLE
    /// - 台账含 FORCED: 高等级告警，列出受影响批次与吨位
    #[instrument(skip(self, summary), fields(product_size = %summary.product_size))]
    pub fn estimate(&self, summary: &BlendSummary) -> AdjustmentReport {
        let mut recommendations = Vec::new();
        let parameters = ChemParam::ALL
            .iter()
            .map(|param| {
                let adjustment = self.estimate_parameter(summary, *param);
                if let Some(text) = self.recommendation(&adjustment) {
                    recommendations.push(text);
                }
                adjustment
            })
            .collect();

        let alarms = self.forced_alarm(summary).into_iter().collect();

        AdjustmentReport {
            parameters,
            alarms,
            recommendations,
        }
    }

    /// 单指标估算
    fn estimate_parameter(&self, summary: &BlendSummary, param: ChemParam) -> ParameterAdjustment {
        let current = summary.chemistry.get(param);
        let target = summary.spec.bound(param);
        let reference = reference_grade(param);
        let gap = target - current;

        if summary.met_specs.get(param) {
            return ParameterAdjustment {
                param,
                status: AdjustmentStatus::Met,
                current,
                target,
                reference_grade: reference,
                gap,
                required_t: Some(0.0),
                method: None,
            };
        }

        let denominator = reference - current;
        let required = gap * summary.total_allocated_t / denominator;
        let reachable = denominator != 0.0 && required.is_finite() && required >= 0.0;

        let reference_text = reference.to_string();
        let method = t_with_args(
            &format!("adjustment.method.{}", param.key()),
            &[("reference", reference_text.as_str())],
        );

        ParameterAdjustment {
            param,
            status: if reachable {
                AdjustmentStatus::Required
            } else {
                AdjustmentStatus::Unreachable
            },
            current,
            target,
            reference_grade: reference,
            gap,
            required_t: if reachable { Some(required) } else { None },
            method: Some(method),
        }
    }

    /// 超标指标的建议文本
    fn recommendation(&self, adjustment: &ParameterAdjustment) -> Option<String> {
        let precision = adjustment.param.precision();
        let current = format!("{:.*}", precision, adjustment.current);
        let target = adjustment.target.to_string();

        match (adjustment.status, adjustment.required_t) {
            (AdjustmentStatus::Required, Some(required)) => {
                let required = format!("{:.2}", required);
                Some(t_with_args(
                    &format!("adjustment.recommendation.{}", adjustment.param.key()),
                    &[
                        ("current", current.as_str()),
                        ("target", target.as_str()),
                        ("required", required.as_str()),
                    ],
                ))
            }
            (AdjustmentStatus::Unreachable, _) => {
                let param = adjustment.param.to_string();
                let reference = adjustment.reference_grade.to_string();
                Some(t_with_args(
                    "adjustment.unreachable",
                    &[
                        ("param", param.as_str()),
                        ("current", current.as_str()),
                        ("target", target.as_str()),
                        ("reference", reference.as_str()),
                    ],
                ))
            }
            _ => None,
        }
    }

    /// 强制分配告警（无 FORCED 时为 None）
    fn forced_alarm(&self, summary: &BlendSummary) -> Option<BlendAlarm> {
        let forced_lots: Vec<ForcedLotEntry> = summary
            .forced_allocations()
            .map(|a| ForcedLotEntry {
                lot_id: a.lot_id.clone(),
                allocated_t: a.allocated_t,
            })
            .collect();

        if forced_lots.is_empty() {
            return None;
        }

        let total_forced_t: f64 = forced_lots.iter().map(|f| f.allocated_t).sum();
        let count = forced_lots.len().to_string();
        let total = format!("{:.2}", total_forced_t);
        let message = t_with_args(
            "alarm.sidecast",
            &[("count", count.as_str()), ("total", total.as_str())],
        );
        warn!(
            product_size = %summary.product_size,
            forced_lots = forced_lots.len(),
            total_forced_t,
            "存在强制分配批次，需人工处置"
        );

        Some(BlendAlarm {
            alarm_type: AlarmType::SidecastRequired,
            severity: AlarmSeverity::High,
            message,
            forced_lots,
            total_forced_t,
        })
    }
}

impl Default for ReverseAdjustmentEstimator {
    fn default() -> Self {
        Self::new()
    }
}
