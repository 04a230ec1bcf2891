// ==========================================
// 矿石配矿系统 - 配矿编排器
// ==========================================
// 职责: 按粒级划分批次，逐粒级执行完整配矿流程
// 流程: 规格解析 → 贪心分配 → 回收轮 → 强制轮 → 结果汇总 → 反向调整
// 红线: 纯函数；粒级之间无共享累计状态；无批次的粒级不输出
// ==========================================

use crate::domain::adjustment::{BlendRunResult, SizeBlendResult};
use crate::domain::lot::Lot;
use crate::domain::spec::SpecConfig;
use crate::domain::types::ProductSize;
use crate::engine::aggregator::ResultAggregator;
use crate::engine::forced::ForcedAllocationPass;
use crate::engine::greedy_allocator::GreedyAllocator;
use crate::engine::recovery::RecoveryPass;
use crate::engine::reverse_adjustment::ReverseAdjustmentEstimator;
use crate::engine::spec_resolver::SpecResolver;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// BlendOrchestrator - 配矿编排器
// ==========================================
pub struct BlendOrchestrator {
    spec_resolver: SpecResolver,
    greedy_allocator: GreedyAllocator,
    recovery_pass: RecoveryPass,
    forced_pass: ForcedAllocationPass,
    aggregator: ResultAggregator,
    estimator: ReverseAdjustmentEstimator,
}

impl BlendOrchestrator {
    pub fn new() -> Self {
        Self {
            spec_resolver: SpecResolver::new(),
            greedy_allocator: GreedyAllocator::new(),
            recovery_pass: RecoveryPass::new(),
            forced_pass: ForcedAllocationPass::new(),
            aggregator: ResultAggregator::new(),
            estimator: ReverseAdjustmentEstimator::new(),
        }
    }

    /// 执行一次配矿
    ///
    /// # 参数
    /// - `lots`: 全部批次（只读，保持输入顺序）
    /// - `target_t`: 每个粒级的目标吨位
    /// - `spec_config`: 全局规格 + 粒级覆写（按值快照）
    ///
    /// # 返回
    /// 粒级 → 配矿汇总 + 反向调整报告
    #[instrument(skip(self, lots, spec_config), fields(lot_count = lots.len()))]
    pub fn run(&self, lots: &[Lot], target_t: f64, spec_config: &SpecConfig) -> BlendRunResult {
        let mut results = BTreeMap::new();

        for size in ProductSize::ALL {
            let partition: Vec<Lot> = lots
                .iter()
                .filter(|lot| lot.product_size == size)
                .cloned()
                .collect();

            match self.run_size(size, &partition, target_t, spec_config) {
                Some(result) => {
                    results.insert(size, result);
                }
                None => debug!(product_size = %size, "粒级无批次，跳过"),
            }
        }

        info!(sizes = results.len(), "配矿运行完成");
        BlendRunResult { target_t, results }
    }

    /// 单粒级配矿；批次为空时返回 None
    pub fn run_size(
        &self,
        size: ProductSize,
        lots: &[Lot],
        target_t: f64,
        spec_config: &SpecConfig,
    ) -> Option<SizeBlendResult> {
        if lots.is_empty() {
            return None;
        }

        let resolved_spec = self.spec_resolver.resolve(
            &spec_config.global,
            &spec_config.size_overrides,
            size,
            lots,
        );
        let spec = resolved_spec.spec;

        let mut state = self.greedy_allocator.allocate(lots, target_t, &spec);
        self.recovery_pass.recover(lots, &spec, &mut state);
        self.forced_pass.force(lots, &mut state);

        let summary = self.aggregator.aggregate(size, lots, &spec, state);
        let adjustments = self.estimator.estimate(&summary);

        Some(SizeBlendResult {
            product_size: size,
            resolved_spec,
            summary,
            adjustments,
        })
    }
}

impl Default for BlendOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lot::Chemistry;
    use crate::domain::spec::SpecSet;

    fn lot(id: &str, tonnage: f64, fe: f64, size: ProductSize) -> Lot {
        Lot::new(id, tonnage, Chemistry::new(fe, 3.0, 1.0, 0.03), size)
    }

    #[test]
    fn test_partition_by_size_and_omit_empty() {
        let orchestrator = BlendOrchestrator::new();
        let lots = vec![
            lot("F1", 500.0, 63.0, ProductSize::Fines),
            lot("F2", 500.0, 64.0, ProductSize::Fines),
        ];

        let result = orchestrator.run(&lots, 800.0, &SpecConfig::new(SpecSet::default()));

        assert_eq!(result.results.len(), 1);
        assert!(result.get(ProductSize::Lump10To40).is_none());
        let fines = result.get(ProductSize::Fines).unwrap();
        assert_eq!(fines.summary.total_allocated_t, 800.0);
        assert_eq!(fines.summary.allocations[0].lot_id, "F2");
    }

    #[test]
    fn test_sizes_are_independent() {
        let orchestrator = BlendOrchestrator::new();
        let lots = vec![
            lot("L1", 1000.0, 64.0, ProductSize::Lump10To40),
            lot("F1", 1000.0, 63.0, ProductSize::Fines),
        ];

        let result = orchestrator.run(&lots, 600.0, &SpecConfig::new(SpecSet::default()));

        // 每个粒级各自满足目标吨位
        for size in ProductSize::ALL {
            let r = result.get(size).unwrap();
            assert_eq!(r.summary.total_allocated_t, 600.0);
            assert_eq!(r.summary.allocations.len(), 1);
        }
    }

    #[test]
    fn test_empty_input() {
        let orchestrator = BlendOrchestrator::new();
        let result = orchestrator.run(&[], 1000.0, &SpecConfig::default());
        assert!(result.is_empty());
        assert!(!result.requires_attention());
    }
}
