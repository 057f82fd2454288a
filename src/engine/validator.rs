// ==========================================
// 土方工程量估算 - 层厚校验引擎
// ==========================================
// 职责: 校验分配合计与开挖深度（及各岩层层厚）是否一致
// 规则: pass = |累计分配 - 开挖深度| < 容差（默认 0.01 m）
// 严格模式: 末阶段各岩层分配合计 = 层厚剖面
// ==========================================
// 红线: 校验结果仅供提示，不阻断体积计算
// ==========================================

use crate::domain::profile::ThicknessProfile;
use crate::domain::section::{AllocationRow, ExcavationTarget, Section};
use crate::domain::types::{RockLayer, ValidationMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// 默认校验容差（m）
pub const DEFAULT_TOLERANCE_M: f64 = 0.01;

// ==========================================
// 校验结果
// ==========================================

/// 单岩层校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCheck {
    pub layer: RockLayer,
    pub allocated_m: f64, // 该岩层分配合计
    pub expected_m: f64,  // 层厚剖面值
    pub discrepancy_m: f64,
    pub pass: bool,
}

/// 单阶段校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseValidation {
    pub phase: usize,
    pub target_m: f64,
    pub allocated_m: f64,   // 截至本阶段的累计分配
    pub discrepancy_m: f64, // allocated - target
    pub pass: bool,         // 含岩层校验结果
    pub layer_checks: Vec<LayerCheck>,
}

/// 区段校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionValidation {
    pub section: String,
    pub pass: bool,
    pub phases: Vec<PhaseValidation>,
}

impl SectionValidation {
    /// 最大偏差（绝对值）
    pub fn max_discrepancy_m(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| p.discrepancy_m.abs())
            .fold(0.0, f64::max)
    }
}

// ==========================================
// ThicknessValidator - 层厚校验引擎
// ==========================================
pub struct ThicknessValidator {
    tolerance_m: f64,
}

impl ThicknessValidator {
    /// # 参数
    /// - `tolerance_m`: 容差；非有限或负值时回退为默认容差
    pub fn new(tolerance_m: f64) -> Self {
        let tolerance_m = if tolerance_m.is_finite() && tolerance_m >= 0.0 {
            tolerance_m
        } else {
            warn!(tolerance_m, "校验容差无效，使用默认值");
            DEFAULT_TOLERANCE_M
        };
        Self { tolerance_m }
    }

    pub fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    /// 校验各阶段
    ///
    /// # 参数
    /// - `rows`: 已分配的清单行
    /// - `targets`: 开挖深度列表
    /// - `profile`: 层厚剖面（严格模式使用）
    /// - `mode`: TotalOnly / TotalAndPerLayer
    ///
    /// # 返回
    /// 每个阶段一条校验结果（阶段 k 使用 phase <= k 的行累计）
    pub fn validate(
        &self,
        rows: &[AllocationRow],
        targets: &[ExcavationTarget],
        profile: &ThicknessProfile,
        mode: ValidationMode,
    ) -> Vec<PhaseValidation> {
        let last_phase = targets.len().saturating_sub(1);

        targets
            .iter()
            .enumerate()
            .map(|(phase, target)| {
                let allocated_m: f64 = rows
                    .iter()
                    .filter(|row| row.phase <= phase)
                    .map(|row| row.thickness_m)
                    .sum();
                let discrepancy_m = allocated_m - target.depth_m;
                let total_pass = discrepancy_m.abs() < self.tolerance_m;

                let layer_checks = match mode {
                    ValidationMode::TotalAndPerLayer if phase == last_phase => {
                        self.check_layers(rows, profile)
                    }
                    _ => Vec::new(),
                };
                let pass = total_pass && layer_checks.iter().all(|c| c.pass);

                PhaseValidation {
                    phase,
                    target_m: target.depth_m,
                    allocated_m,
                    discrepancy_m,
                    pass,
                    layer_checks,
                }
            })
            .collect()
    }

    /// 校验区段；不通过时记录 warn，但不返回错误
    pub fn validate_section(
        &self,
        section: &Section,
        profile: &ThicknessProfile,
        mode: ValidationMode,
    ) -> SectionValidation {
        let phases = self.validate(&section.rows, &section.targets(), profile, mode);
        let pass = phases.iter().all(|p| p.pass);

        let result = SectionValidation {
            section: section.name.clone(),
            pass,
            phases,
        };

        if pass {
            debug!(section = %section.name, mode = %mode, "层厚校验通过");
        } else {
            warn!(
                section = %section.name,
                mode = %mode,
                max_discrepancy_m = result.max_discrepancy_m(),
                "层厚校验未通过"
            );
        }

        result
    }

    /// 各岩层分配合计与层厚剖面比较（剖面中的岩层 + 行中出现的岩层）
    fn check_layers(&self, rows: &[AllocationRow], profile: &ThicknessProfile) -> Vec<LayerCheck> {
        let layers: BTreeSet<RockLayer> = profile
            .layers()
            .iter()
            .map(|entry| entry.layer)
            .chain(rows.iter().map(|row| row.layer))
            .collect();

        layers
            .into_iter()
            .map(|layer| {
                let allocated_m: f64 = rows
                    .iter()
                    .filter(|row| row.layer == layer)
                    .map(|row| row.thickness_m)
                    .sum();
                let expected_m = profile.thickness(layer);
                let discrepancy_m = allocated_m - expected_m;
                LayerCheck {
                    layer,
                    allocated_m,
                    expected_m,
                    discrepancy_m,
                    pass: discrepancy_m.abs() < self.tolerance_m,
                }
            })
            .collect()
    }
}

impl Default for ThicknessValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_M)
    }
}
