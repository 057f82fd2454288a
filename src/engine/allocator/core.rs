// ==========================================
// 土方工程量估算 - 深度分配引擎
// ==========================================
// 规则（逐阶段、逐行，按行布局顺序）:
// 1) 阶段可分配深度 = max(0, 开挖深度 - 之前阶段累计分配)
// 2) 手动行: min(固定层厚, 剩余深度)
// 3) 吸收层行: 剩余深度（不受自身层厚限制）
// 4) 其他行: max(0, min(剩余深度, 该层剩余层厚))
// 5) 每次分配同时扣减剩余深度与层厚；手动行超出本层层厚的部分
//    依次扣减更深岩层的层厚
// ==========================================

use crate::domain::error::{is_non_negative_finite, EstimateError, EstimateResult};
use crate::domain::profile::ThicknessProfile;
use crate::domain::section::{validate_targets, AllocationRow, ExcavationTarget, RowSplit, Section};
use crate::domain::types::RockLayer;
use tracing::{debug, info, instrument, warn};

use super::report::{AllocationOutcome, PhaseAllocation};

const LAYER_COUNT: usize = RockLayer::STRATIGRAPHIC_ORDER.len();

// ==========================================
// DepthAllocator - 深度分配引擎
// ==========================================
pub struct DepthAllocator {
    // 无状态引擎，纯函数
}

impl DepthAllocator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配开挖深度
    ///
    /// # 参数
    /// - `profile`: 层厚剖面（各岩层可用总厚度）
    /// - `targets`: 开挖深度列表（第 k 个对应第 k 阶段）
    /// - `rows`: 行布局（读取岩层、手动标记、阶段、适用率）
    /// - `first_row_override`: 首行固定层厚；None 时沿用首行自身的手动/自动标记
    ///
    /// # 返回
    /// - `Ok(AllocationOutcome)`: 与 rows 一一对应的层厚 + 各阶段情况
    /// - `Err`: 边界前置条件违反（深度/适用率/手动层厚/阶段序号）
    #[instrument(skip_all, fields(
        row_count = rows.len(),
        phase_count = targets.len(),
        profile_total_m = profile.total_m()
    ))]
    pub fn allocate(
        &self,
        profile: &ThicknessProfile,
        targets: &[ExcavationTarget],
        rows: &[AllocationRow],
        first_row_override: Option<f64>,
    ) -> EstimateResult<AllocationOutcome> {
        self.validate_inputs(targets, rows, first_row_override)?;

        let absorbing_layer = Self::absorbing_layer(rows);
        let mut budgets = [0.0_f64; LAYER_COUNT];
        for layer in RockLayer::STRATIGRAPHIC_ORDER {
            budgets[layer.depth_index()] = profile.thickness(layer);
        }

        if profile.total_m() <= 0.0 {
            debug!(absorbing_layer = ?absorbing_layer, "层厚剖面合计为 0，全部深度由吸收层承担");
        }

        let mut thicknesses = vec![0.0_f64; rows.len()];
        let mut phases = Vec::with_capacity(targets.len());
        let mut cumulative_m = 0.0_f64;

        for (phase, target) in targets.iter().enumerate() {
            let budget_m = (target.depth_m - cumulative_m).max(0.0);
            let mut remaining_m = budget_m;

            if budget_m <= 0.0 && phase > 0 {
                debug!(
                    phase,
                    target_m = target.depth_m,
                    cumulative_m,
                    "开挖深度未超过之前阶段，本阶段分配为 0"
                );
            }

            for (idx, row) in rows.iter().enumerate() {
                if row.phase != phase {
                    continue;
                }

                let fixed_m = match (idx, first_row_override) {
                    (0, Some(value)) => Some(value),
                    _ => match row.split {
                        RowSplit::Manual { thickness_m } => Some(thickness_m),
                        RowSplit::Auto => None,
                    },
                };

                let layer_index = row.layer.depth_index();
                let allocated_m = match fixed_m {
                    Some(fixed_m) => {
                        if fixed_m > remaining_m {
                            warn!(
                                row_id = %row.id,
                                fixed_m,
                                remaining_m,
                                "手动层厚超过剩余开挖深度，按剩余深度计"
                            );
                        }
                        fixed_m.min(remaining_m).max(0.0)
                    }
                    None if Some(row.layer) == absorbing_layer => remaining_m,
                    None => remaining_m.min(budgets[layer_index]).max(0.0),
                };

                Self::charge_budget(&mut budgets, layer_index, allocated_m);
                remaining_m = (remaining_m - allocated_m).max(0.0);
                cumulative_m += allocated_m;
                thicknesses[idx] = allocated_m;
            }

            phases.push(PhaseAllocation {
                phase,
                target_m: target.depth_m,
                budget_m,
                allocated_m: budget_m - remaining_m,
                unallocated_m: remaining_m,
            });
        }

        info!(
            total_allocated_m = cumulative_m,
            final_target_m = targets.last().map(|t| t.depth_m).unwrap_or(0.0),
            "深度分配完成"
        );

        Ok(AllocationOutcome {
            thicknesses,
            phases,
        })
    }

    /// 分配并写回行层厚（行的其他字段保持不变，体积由体积计算器更新）
    ///
    /// 指定首行覆写时，首行标记为手动
    pub fn allocate_rows(
        &self,
        profile: &ThicknessProfile,
        targets: &[ExcavationTarget],
        rows: &[AllocationRow],
        first_row_override: Option<f64>,
    ) -> EstimateResult<Vec<AllocationRow>> {
        let outcome = self.allocate(profile, targets, rows, first_row_override)?;

        let allocated = rows
            .iter()
            .zip(outcome.thicknesses)
            .enumerate()
            .map(|(idx, (row, thickness_m))| {
                let mut row = row.clone();
                if let (0, Some(value)) = (idx, first_row_override) {
                    row.split = RowSplit::Manual { thickness_m: value };
                }
                row.thickness_m = thickness_m;
                row
            })
            .collect();

        Ok(allocated)
    }

    /// 分配区段（开挖深度取自区段的原地面高程与开挖底高程）
    pub fn allocate_section(
        &self,
        section: &Section,
        profile: &ThicknessProfile,
        first_row_override: Option<f64>,
    ) -> EstimateResult<Section> {
        debug!(section = %section.name, terrain = %section.terrain, "分配区段");
        let rows = self.allocate_rows(profile, &section.targets(), &section.rows, first_row_override)?;
        Ok(Section {
            rows,
            ..section.clone()
        })
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 吸收层: 布局中出现的最深岩层
    pub fn absorbing_layer(rows: &[AllocationRow]) -> Option<RockLayer> {
        rows.iter().map(|row| row.layer).max()
    }

    /// 扣减层厚；超出本层的部分依次扣减更深岩层
    fn charge_budget(budgets: &mut [f64; LAYER_COUNT], layer_index: usize, amount_m: f64) {
        let mut left_m = amount_m;
        for budget in budgets.iter_mut().skip(layer_index) {
            if left_m <= 0.0 {
                break;
            }
            let taken_m = left_m.min(*budget);
            *budget -= taken_m;
            left_m -= taken_m;
        }
    }

    fn validate_inputs(
        &self,
        targets: &[ExcavationTarget],
        rows: &[AllocationRow],
        first_row_override: Option<f64>,
    ) -> EstimateResult<()> {
        validate_targets(targets)?;
        if rows.is_empty() {
            return Err(EstimateError::EmptyLayout);
        }

        if let Some(value) = first_row_override {
            if !is_non_negative_finite(value) {
                return Err(EstimateError::InvalidManualThickness { row: 0, value });
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.phase >= targets.len() {
                return Err(EstimateError::PhaseOutOfRange {
                    row: idx,
                    phase: row.phase,
                    phases: targets.len(),
                });
            }
            row.validate(idx)?;
        }

        Ok(())
    }
}

impl Default for DepthAllocator {
    fn default() -> Self {
        Self::new()
    }
}
