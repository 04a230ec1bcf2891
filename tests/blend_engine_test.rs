// ==========================================
// 配矿引擎集成测试
// ==========================================
// 测试目标: 验证三轮分配 + 汇总 + 反向调整的端到端行为
// 覆盖范围: 标准配矿场景、吨位不足、回收、强制分配告警、规格来源
// ==========================================

use ore_blending::domain::lot::{Chemistry, Lot, LotSpecOverride};
use ore_blending::domain::spec::{SizeSpecOverride, SpecConfig, SpecSet};
use ore_blending::domain::types::{
    AdjustmentStatus, AlarmSeverity, AlarmType, AllocationStatus, ChemParam, ChemistryBasis,
    ProductSize, SpecSource,
};
use ore_blending::engine::BlendOrchestrator;

// ==========================================
// 测试辅助函数
// ==========================================

fn standard_spec() -> SpecConfig {
    SpecConfig::new(SpecSet::new(62.0, 6.0, 1.5, 0.06))
}

fn create_lot(id: &str, tonnage: f64, fe: f64, sio2: f64, al2o3: f64, p: f64) -> Lot {
    Lot::new(
        id,
        tonnage,
        Chemistry::new(fe, sio2, al2o3, p),
        ProductSize::Lump10To40,
    )
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "期望 {} ± {}，实际 {}",
        expected,
        tolerance,
        actual
    );
}

// ==========================================
// 标准两批次场景
// ==========================================

#[test]
fn test_two_lot_blend_meets_all_specs() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![
        create_lot("HIGH", 6000.0, 65.0, 2.0, 0.5, 0.02),
        create_lot("LOW", 6000.0, 58.0, 8.0, 2.0, 0.08),
    ];

    let result = orchestrator.run(&lots, 10000.0, &standard_spec());
    let size = result.get(ProductSize::Lump10To40).unwrap();
    let summary = &size.summary;

    assert_eq!(summary.allocations.len(), 2);
    assert_eq!(summary.allocations[0].lot_id, "HIGH");
    assert_eq!(summary.allocations[0].allocated_t, 6000.0);
    assert_eq!(summary.allocations[1].lot_id, "LOW");
    assert_eq!(summary.allocations[1].allocated_t, 4000.0);
    assert!(summary
        .allocations
        .iter()
        .all(|a| a.status == AllocationStatus::Accepted));

    assert_eq!(summary.total_allocated_t, 10000.0);
    assert_eq!(summary.shortfall_t, 0.0);
    assert_close(summary.chemistry.fe, 62.2, 1e-9);
    assert_close(summary.chemistry.sio2, 4.4, 1e-9);
    assert_close(summary.chemistry.al2o3, 1.1, 1e-9);
    assert_close(summary.chemistry.p, 0.044, 1e-9);
    assert!(summary.met_specs.all_met());
    assert_eq!(summary.rejected_count, 0);

    // 全部合格: 无调整需求、无告警
    assert!(size
        .adjustments
        .parameters
        .iter()
        .all(|p| p.status == AdjustmentStatus::Met && p.required_t == Some(0.0)));
    assert!(size.adjustments.alarms.is_empty());
    assert!(!result.requires_attention());
    assert_eq!(size.resolved_spec.source, SpecSource::Global);
}

#[test]
fn test_weighted_fe_matches_contributions() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![
        create_lot("A", 3200.0, 64.37, 3.12, 1.104, 0.0412),
        create_lot("B", 2750.0, 62.91, 4.55, 1.321, 0.0533),
        create_lot("C", 4100.0, 63.48, 5.02, 0.987, 0.0491),
    ];

    let result = orchestrator.run(&lots, 9000.0, &standard_spec());
    let summary = &result.get(ProductSize::Lump10To40).unwrap().summary;

    let fe_contrib: f64 = summary.allocations.iter().map(|a| a.contribution.fe).sum();
    let p_contrib: f64 = summary.allocations.iter().map(|a| a.contribution.p).sum();

    assert_close(summary.chemistry.fe * summary.total_allocated_t, fe_contrib, 1e-3);
    assert_close(summary.chemistry.p * summary.total_allocated_t, p_contrib, 1e-4);
    assert_close(summary.contribution_total.fe, fe_contrib, 1e-6);
}

// ==========================================
// 吨位不足
// ==========================================

#[test]
fn test_single_lot_below_target_reports_shortfall() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![create_lot("ONLY", 4000.0, 64.0, 3.0, 1.0, 0.03)];

    let result = orchestrator.run(&lots, 10000.0, &standard_spec());
    let summary = &result.get(ProductSize::Lump10To40).unwrap().summary;

    assert_eq!(summary.total_allocated_t, 4000.0);
    assert_eq!(summary.shortfall_t, 6000.0);
    assert!(summary.has_shortfall());
    assert_eq!(summary.allocations.len(), 1);
    assert_eq!(summary.allocations[0].status, AllocationStatus::Accepted);
    assert!(!result.requires_attention());
}

// ==========================================
// 回收轮
// ==========================================

#[test]
fn test_rejected_lot_recovered_by_blending() {
    let orchestrator = BlendOrchestrator::new();
    // HIGH_SI 的 Fe 最高，先被单独评估: SiO2=7% 超限被拒；
    // BASE 入配后，二者加权 SiO2=3.25% 合格，回收轮收回
    let lots = vec![
        create_lot("HIGH_SI", 1000.0, 66.0, 7.0, 1.0, 0.03),
        create_lot("BASE", 3000.0, 64.0, 2.0, 1.0, 0.03),
    ];

    let result = orchestrator.run(&lots, 10000.0, &standard_spec());
    let summary = &result.get(ProductSize::Lump10To40).unwrap().summary;

    assert_eq!(summary.rejected_count, 1);
    assert_eq!(summary.recovered_count, 1);
    assert_eq!(summary.forced_count, 0);

    assert_eq!(summary.allocations[0].lot_id, "BASE");
    assert_eq!(summary.allocations[0].status, AllocationStatus::Accepted);
    assert_eq!(summary.allocations[1].lot_id, "HIGH_SI");
    assert_eq!(summary.allocations[1].status, AllocationStatus::Recovered);

    assert_eq!(summary.total_allocated_t, 4000.0);
    assert_close(summary.chemistry.fe, 64.5, 1e-9);
    assert_close(summary.chemistry.sio2, 3.25, 1e-9);
    assert!(summary.met_specs.all_met());
}

// ==========================================
// 强制分配
// ==========================================

#[test]
fn test_forced_allocation_raises_sidecast_alarm() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![
        create_lot("GOOD", 1000.0, 64.0, 3.0, 1.0, 0.03),
        create_lot("LOW_FE", 5000.0, 55.0, 3.0, 1.0, 0.03),
    ];

    let result = orchestrator.run(&lots, 3000.0, &standard_spec());
    let size = result.get(ProductSize::Lump10To40).unwrap();
    let summary = &size.summary;

    assert_eq!(summary.total_allocated_t, 3000.0);
    assert_eq!(summary.forced_count, 1);
    let forced: Vec<_> = summary.forced_allocations().collect();
    assert_eq!(forced.len(), 1);
    assert_eq!(forced[0].lot_id, "LOW_FE");
    assert_eq!(forced[0].allocated_t, 2000.0);

    // 强制分配后至少一项不合格
    assert_close(summary.chemistry.fe, 58.0, 1e-9);
    assert!(!summary.met_specs.fe);
    assert!(!summary.met_specs.all_met());

    let report = &size.adjustments;
    assert_eq!(report.alarms.len(), 1);
    let alarm = &report.alarms[0];
    assert_eq!(alarm.alarm_type, AlarmType::SidecastRequired);
    assert_eq!(alarm.severity, AlarmSeverity::High);
    assert_eq!(alarm.forced_lots.len(), 1);
    assert_eq!(alarm.forced_lots[0].lot_id, "LOW_FE");
    assert_eq!(alarm.total_forced_t, 2000.0);
    assert!(result.requires_attention());

    // Fe 缺口 4%，需 65% 参考品位物料 4 × 3000 / (65 - 58)
    let fe = report.parameter(ChemParam::Fe).unwrap();
    assert_eq!(fe.status, AdjustmentStatus::Required);
    assert_close(fe.gap, 4.0, 1e-9);
    assert_close(fe.required_t.unwrap(), 12000.0 / 7.0, 1e-6);
    assert!(fe.method.is_some());
    assert!(!report.recommendations.is_empty());
}

#[test]
fn test_impurity_excess_estimates_dilution() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![create_lot("HIGH_P", 2000.0, 63.0, 4.0, 1.0, 0.09)];

    let result = orchestrator.run(&lots, 1000.0, &standard_spec());
    let size = result.get(ProductSize::Lump10To40).unwrap();

    // 单批次候选 P=0.09% 被拒，回收轮不复核 P，仍然回收
    assert_eq!(size.summary.recovered_count, 1);
    assert!(!size.summary.met_specs.p);
    assert!(size.adjustments.alarms.is_empty());

    // P: 0.06 - 0.09 = -0.03；required = -0.03 × 1000 / (0.01 - 0.09) = 375
    let p = size.adjustments.parameter(ChemParam::P).unwrap();
    assert_eq!(p.status, AdjustmentStatus::Required);
    assert_close(p.required_t.unwrap(), 375.0, 1e-6);
}

// ==========================================
// 所有批次合格
// ==========================================

#[test]
fn test_all_conforming_lots_accepted_in_greedy_pass() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![
        create_lot("A", 2500.0, 63.5, 4.0, 1.2, 0.05),
        create_lot("B", 2500.0, 65.1, 2.5, 0.9, 0.03),
        create_lot("C", 2500.0, 62.0, 6.0, 1.5, 0.06),
        create_lot("D", 2500.0, 64.2, 3.3, 1.0, 0.04),
    ];

    let result = orchestrator.run(&lots, 8000.0, &standard_spec());
    let summary = &result.get(ProductSize::Lump10To40).unwrap().summary;

    assert_eq!(summary.total_allocated_t, 8000.0);
    assert!(summary
        .allocations
        .iter()
        .all(|a| a.status == AllocationStatus::Accepted));
    let ids: Vec<&str> = summary.allocations.iter().map(|a| a.lot_id.as_str()).collect();
    assert_eq!(ids, vec!["B", "D", "A", "C"]);
    assert_eq!(summary.allocations[3].allocated_t, 500.0);
}

// ==========================================
// 规格来源与兜底
// ==========================================

#[test]
fn test_size_override_and_lot_embedded_spec() {
    let orchestrator = BlendOrchestrator::new();
    let fines = Lot::new(
        "F1",
        1000.0,
        Chemistry::new(59.0, 5.0, 1.0, 0.03),
        ProductSize::Fines,
    );
    let lump = Lot::new(
        "L1",
        1000.0,
        Chemistry::new(61.0, 5.0, 1.0, 0.03),
        ProductSize::Lump10To40,
    )
    .with_spec_override(LotSpecOverride {
        fe_spec_min: Some(60.0),
        sio2_spec_max: None,
    });

    let config = standard_spec().with_size_override(
        ProductSize::Fines,
        SizeSpecOverride {
            fe_min: Some(58.0),
            ..Default::default()
        },
    );

    let result = orchestrator.run(&[fines, lump], 1000.0, &config);

    let fines_result = result.get(ProductSize::Fines).unwrap();
    assert_eq!(fines_result.resolved_spec.source, SpecSource::SizeOverride);
    assert_eq!(fines_result.resolved_spec.spec.fe_min, 58.0);
    assert_eq!(fines_result.resolved_spec.spec.sio2_max, 6.0);
    assert_eq!(
        fines_result.summary.allocations[0].status,
        AllocationStatus::Accepted
    );

    let lump_result = result.get(ProductSize::Lump10To40).unwrap();
    assert_eq!(lump_result.resolved_spec.source, SpecSource::LotEmbedded);
    assert_eq!(lump_result.resolved_spec.spec.fe_min, 60.0);
    assert!(lump_result.summary.met_specs.fe);
}

#[test]
fn test_zero_target_falls_back_to_full_lot_set() {
    let orchestrator = BlendOrchestrator::new();
    let lots = vec![
        create_lot("A", 1000.0, 64.0, 3.0, 1.0, 0.03),
        create_lot("B", 3000.0, 60.0, 5.0, 1.0, 0.03),
    ];

    let result = orchestrator.run(&lots, 0.0, &standard_spec());
    let summary = &result.get(ProductSize::Lump10To40).unwrap().summary;

    assert!(summary.allocations.is_empty());
    assert_eq!(summary.total_allocated_t, 0.0);
    assert_eq!(summary.shortfall_t, 0.0);
    assert_eq!(summary.chemistry_basis, ChemistryBasis::FullLotSet);
    assert_close(summary.chemistry.fe, 61.0, 1e-9);
}
