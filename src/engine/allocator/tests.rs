use super::*;
use crate::domain::error::EstimateError;
use crate::domain::profile::ThicknessProfile;
use crate::domain::section::{
    AllocationRow, ExcavationTarget, LayoutDefaults, RowSplit, RowTemplate, Section,
};
use crate::domain::types::{ItemKind, RockLayer, TerrainType, WorkType};

// ==========================================
// 测试辅助函数
// ==========================================

const EPS: f64 = 1e-9;

fn scenario_profile() -> ThicknessProfile {
    ThicknessProfile::three_layer(21.475, 0.75, 7.8).unwrap()
}

fn default_rows(terrain: TerrainType) -> Vec<AllocationRow> {
    let layout = RowTemplate::default_layout(terrain, &LayoutDefaults::default());
    Section::new("t-1", terrain, 100.0, 0.0, vec![0.0], &layout)
        .unwrap()
        .rows
}

fn targets(depths: &[f64]) -> Vec<ExcavationTarget> {
    depths.iter().map(|d| ExcavationTarget::new(*d)).collect()
}

fn layer_sum(rows: &[AllocationRow], thicknesses: &[f64], layer: RockLayer) -> f64 {
    rows.iter()
        .zip(thicknesses)
        .filter(|(row, _)| row.layer == layer)
        .map(|(_, t)| *t)
        .sum()
}

// ==========================================
// 单阶段
// ==========================================

#[test]
fn test_plane_section_depth_28() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[28.0]), &rows, Some(5.0))
        .unwrap();

    let t = &outcome.thicknesses;
    assert!((t[0] - 5.0).abs() < EPS);
    assert!((t[1] - 16.475).abs() < EPS);
    assert!((t[2] - 0.75).abs() < EPS);
    assert!((t[3] - 5.775).abs() < EPS);
    assert!((outcome.total_m() - 28.0).abs() < 0.01);
    assert!(outcome.phases[0].unallocated_m.abs() < EPS);
}

#[test]
fn test_deeper_target_absorbed_by_soft_rock() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[35.805]), &rows, Some(5.0))
        .unwrap();

    let t = &outcome.thicknesses;
    assert!((layer_sum(&rows, t, RockLayer::Landfill) - 21.475).abs() < EPS);
    assert!((t[2] - 0.75).abs() < EPS);
    assert!((t[3] - 13.58).abs() < 1e-6);
    assert!((outcome.total_m() - 35.805).abs() < 0.01);
}

#[test]
fn test_shallow_target_leaves_deeper_rows_zero() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[12.0]), &rows, Some(5.0))
        .unwrap();

    assert_eq!(outcome.thicknesses, vec![5.0, 7.0, 0.0, 0.0]);
}

#[test]
fn test_first_row_clamped_to_target_depth() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[3.0]), &rows, Some(5.0))
        .unwrap();

    assert_eq!(outcome.thicknesses, vec![3.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_zero_profile_fully_absorbed_by_last_layer() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);
    let profile = ThicknessProfile::three_layer(0.0, 0.0, 0.0).unwrap();

    let outcome = allocator
        .allocate(&profile, &targets(&[10.0]), &rows, Some(0.0))
        .unwrap();

    assert_eq!(outcome.thicknesses, vec![0.0, 0.0, 0.0, 10.0]);
}

#[test]
fn test_manual_overflow_charged_to_deeper_layers() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);
    // 填土仅 2 m，首行手动 5 m，多出的 3 m 扣减风化岩(0.75)与软岩
    let profile = ThicknessProfile::three_layer(2.0, 0.75, 7.8).unwrap();

    let outcome = allocator
        .allocate(&profile, &targets(&[20.0]), &rows, Some(5.0))
        .unwrap();

    let t = &outcome.thicknesses;
    assert_eq!(t[0], 5.0);
    assert_eq!(t[1], 0.0);
    assert_eq!(t[2], 0.0);
    assert!((t[3] - 15.0).abs() < EPS);
}

#[test]
fn test_override_none_uses_row_split() {
    let allocator = DepthAllocator::new();
    let mut rows = default_rows(TerrainType::Plane);
    rows[0].split = RowSplit::Manual { thickness_m: 2.5 };

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[28.0]), &rows, None)
        .unwrap();
    assert_eq!(outcome.thicknesses[0], 2.5);
    assert!((outcome.thicknesses[1] - 18.975).abs() < EPS);

    rows[0].split = RowSplit::Auto;
    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[28.0]), &rows, None)
        .unwrap();
    assert!((outcome.thicknesses[0] - 21.475).abs() < EPS);
    assert_eq!(outcome.thicknesses[1], 0.0);
}

#[test]
fn test_allocation_is_idempotent() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Plane);
    let first = allocator
        .allocate(&scenario_profile(), &targets(&[28.0]), &rows, Some(5.0))
        .unwrap();
    let second = allocator
        .allocate(&scenario_profile(), &targets(&[28.0]), &rows, Some(5.0))
        .unwrap();
    assert_eq!(first, second);
}

// ==========================================
// 多阶段
// ==========================================

#[test]
fn test_slope_second_phase_gets_increment() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Slope);
    let phase_targets = targets(&[28.05 + 0.56, 28.05 + 1.76]);

    let outcome = allocator
        .allocate(&scenario_profile(), &phase_targets, &rows, Some(5.0))
        .unwrap();

    let phase_one: f64 = outcome.thicknesses[..4].iter().sum();
    assert!((phase_one - 28.61).abs() < 1e-6);
    assert!((outcome.thicknesses[4] - 1.2).abs() < 1e-6);
    assert_eq!(outcome.phases.len(), 2);
    assert!((outcome.phases[1].budget_m - 1.2).abs() < 1e-6);
}

#[test]
fn test_non_increasing_second_phase_is_zero() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Slope);

    let outcome = allocator
        .allocate(&scenario_profile(), &targets(&[28.61, 27.0]), &rows, Some(5.0))
        .unwrap();

    assert_eq!(outcome.thicknesses[4], 0.0);
    assert_eq!(outcome.phases[1].budget_m, 0.0);
}

#[test]
fn test_second_phase_respects_non_absorbing_budget() {
    let allocator = DepthAllocator::new();
    let layout = vec![
        RowTemplate {
            layer: RockLayer::Landfill,
            work_type: WorkType::Direct,
            item: ItemKind::General,
            split: RowSplit::Auto,
            phase: 0,
            application_rate_pct: 100.0,
        },
        RowTemplate {
            layer: RockLayer::Landfill,
            work_type: WorkType::Clamshell,
            item: ItemKind::General,
            split: RowSplit::Auto,
            phase: 1,
            application_rate_pct: 100.0,
        },
        RowTemplate {
            layer: RockLayer::SoftRock,
            work_type: WorkType::Clamshell,
            item: ItemKind::General,
            split: RowSplit::Auto,
            phase: 1,
            application_rate_pct: 100.0,
        },
    ];
    let rows = Section::new("t-2", TerrainType::Slope, 1.0, 0.0, vec![0.0], &layout)
        .unwrap()
        .rows;
    let profile = ThicknessProfile::three_layer(6.0, 0.0, 10.0).unwrap();

    let outcome = allocator
        .allocate(&profile, &targets(&[4.0, 9.0]), &rows, None)
        .unwrap();

    assert_eq!(outcome.thicknesses, vec![4.0, 2.0, 3.0]);
}

// ==========================================
// 写回与前置条件
// ==========================================

#[test]
fn test_allocate_rows_marks_override_manual() {
    let allocator = DepthAllocator::new();
    let mut rows = default_rows(TerrainType::Plane);
    rows[0].split = RowSplit::Auto;

    let allocated = allocator
        .allocate_rows(&scenario_profile(), &targets(&[28.0]), &rows, Some(4.0))
        .unwrap();

    assert_eq!(allocated[0].split, RowSplit::Manual { thickness_m: 4.0 });
    assert_eq!(allocated[0].thickness_m, 4.0);
    assert_eq!(allocated[3].id, rows[3].id);
}

#[test]
fn test_preconditions_rejected() {
    let allocator = DepthAllocator::new();
    let rows = default_rows(TerrainType::Slope);
    let profile = scenario_profile();

    assert_eq!(
        allocator.allocate(&profile, &[], &rows, None),
        Err(EstimateError::EmptyTargets)
    );
    assert_eq!(
        allocator.allocate(&profile, &targets(&[28.0]), &[], None),
        Err(EstimateError::EmptyLayout)
    );
    assert!(matches!(
        allocator.allocate(&profile, &targets(&[28.0]), &rows, None),
        Err(EstimateError::PhaseOutOfRange { row: 4, phase: 1, phases: 1 })
    ));
    assert!(matches!(
        allocator.allocate(&profile, &targets(&[28.0, 29.0]), &rows, Some(-1.0)),
        Err(EstimateError::InvalidManualThickness { row: 0, .. })
    ));

    let mut bad_rate = rows.clone();
    bad_rate[2].application_rate_pct = -5.0;
    assert!(matches!(
        allocator.allocate(&profile, &targets(&[28.0, 29.0]), &bad_rate, None),
        Err(EstimateError::InvalidApplicationRate { row: 2, .. })
    ));
}

#[test]
fn test_absorbing_layer_is_deepest_row_layer() {
    let rows = default_rows(TerrainType::Plane);
    assert_eq!(DepthAllocator::absorbing_layer(&rows), Some(RockLayer::SoftRock));
    assert_eq!(DepthAllocator::absorbing_layer(&[]), None);
}
