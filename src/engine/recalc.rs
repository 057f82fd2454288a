// ==========================================
// 土方工程量估算 - 重算/联动引擎
// ==========================================
// 职责: 输入变化后重算区段（显式入口，无隐式调度）
// 输入: 上一版区段 + 层厚剖面 + 变化
// 输出: 新区段（行 id 保持不变）
// ==========================================
// 红线: 不修改输入区段，返回新值
// 红线: 岩层首行层厚变化触发整段重新分配；其他行只重算本行体积
// ==========================================

use crate::domain::error::{is_non_negative_finite, EstimateError, EstimateResult};
use crate::domain::profile::ThicknessProfile;
use crate::domain::section::{AllocationRow, LayoutDefaults, RowSplit, RowTemplate, Section};
use crate::domain::types::{ItemKind, TerrainType, WorkType};
use crate::engine::allocator::DepthAllocator;
use crate::engine::volume::VolumeCalculator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ==========================================
// SectionChange - 区段输入变化
// ==========================================
// 行序号均为 0 起的下标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionChange {
    /// 区段面积（未覆写面积的行随之变化）
    Area { area_m2: f64 },
    /// 原地面高程
    GroundLevel { original_ground_level_m: f64 },
    /// 各阶段开挖底高程
    ExcavationLevels { levels_m: Vec<f64> },
    /// 层厚剖面已更新（使用传入的剖面重新分配）
    ProfileUpdated,
    /// 地形变化，按新地形重建默认行布局
    Terrain {
        terrain: TerrainType,
        defaults: LayoutDefaults,
    },
    /// 区段名（显示用）
    Label { label: String },
    /// 行层厚（标记为手动）
    RowThickness { row: usize, thickness_m: f64 },
    /// 行恢复为自动分配
    RowAuto { row: usize },
    RowRate { row: usize, application_rate_pct: f64 },
    /// 行面积（标记为已覆写）
    RowArea { row: usize, area_m2: f64 },
    RowWorkType { row: usize, work_type: WorkType },
    RowItem { row: usize, item: ItemKind },
}

impl SectionChange {
    /// 该变化是否需要重新分配深度
    pub fn requires_reallocation(&self, rows: &[AllocationRow]) -> bool {
        match self {
            SectionChange::GroundLevel { .. }
            | SectionChange::ExcavationLevels { .. }
            | SectionChange::ProfileUpdated
            | SectionChange::Terrain { .. }
            | SectionChange::RowAuto { .. } => true,
            SectionChange::RowThickness { row, .. } => AllocationRow::is_first_of_layer(rows, *row),
            _ => false,
        }
    }
}

// ==========================================
// RecalcEngine - 重算引擎
// ==========================================
pub struct RecalcEngine {
    allocator: DepthAllocator,
    volume_calculator: VolumeCalculator,
}

impl RecalcEngine {
    pub fn new() -> Self {
        Self {
            allocator: DepthAllocator::new(),
            volume_calculator: VolumeCalculator::new(),
        }
    }

    /// 应用变化并重算
    ///
    /// # 参数
    /// - `previous`: 变化前的区段
    /// - `profile`: 当前层厚剖面
    /// - `change`: 输入变化
    ///
    /// # 返回
    /// - `Ok(Section)`: 重算后的区段
    /// - `Err`: 变化值违反前置条件，或行下标不存在
    #[instrument(skip(self, previous, profile), fields(section = %previous.name))]
    pub fn recompute(
        &self,
        previous: &Section,
        profile: &ThicknessProfile,
        change: SectionChange,
    ) -> EstimateResult<Section> {
        let reallocate = change.requires_reallocation(&previous.rows);
        let mut section = previous.clone();

        match change {
            SectionChange::Area { area_m2 } => {
                ensure_area(&section.name, area_m2)?;
                section.area_m2 = area_m2;
                for row in section.rows.iter_mut().filter(|r| !r.area_overridden) {
                    row.area_m2 = area_m2;
                }
            }
            SectionChange::GroundLevel {
                original_ground_level_m,
            } => {
                section.original_ground_level_m = original_ground_level_m;
            }
            SectionChange::ExcavationLevels { levels_m } => {
                section.excavation_levels_m = levels_m;
            }
            SectionChange::ProfileUpdated => {}
            SectionChange::Terrain { terrain, defaults } => {
                Self::rebuild_layout(&mut section, terrain, &defaults);
            }
            SectionChange::Label { label } => {
                section.label = label;
            }
            SectionChange::RowThickness { row, thickness_m } => {
                if !is_non_negative_finite(thickness_m) {
                    return Err(EstimateError::InvalidManualThickness {
                        row,
                        value: thickness_m,
                    });
                }
                let target = row_mut(&mut section, row)?;
                target.split = RowSplit::Manual { thickness_m };
                target.thickness_m = thickness_m;
            }
            SectionChange::RowAuto { row } => {
                row_mut(&mut section, row)?.split = RowSplit::Auto;
            }
            SectionChange::RowRate {
                row,
                application_rate_pct,
            } => {
                let target = row_mut(&mut section, row)?;
                target.application_rate_pct = application_rate_pct;
                target.validate(row)?;
            }
            SectionChange::RowArea { row, area_m2 } => {
                ensure_area(&section.name, area_m2)?;
                let target = row_mut(&mut section, row)?;
                target.area_m2 = area_m2;
                target.area_overridden = true;
            }
            SectionChange::RowWorkType { row, work_type } => {
                row_mut(&mut section, row)?.work_type = work_type;
            }
            SectionChange::RowItem { row, item } => {
                row_mut(&mut section, row)?.item = item;
            }
        }

        if reallocate {
            debug!(section = %section.name, "级联重新分配深度");
            section = self.allocator.allocate_section(&section, profile, None)?;
        }

        let section = self.volume_calculator.apply_to_section(&section);
        info!(
            section = %section.name,
            reallocated = reallocate,
            subtotal_m3 = section.subtotal_m3(),
            "区段重算完成"
        );
        Ok(section)
    }

    /// 层厚剖面变化后重算全部区段
    pub fn recompute_all(
        &self,
        sections: &[Section],
        profile: &ThicknessProfile,
    ) -> EstimateResult<Vec<Section>> {
        sections
            .iter()
            .map(|section| self.recompute(section, profile, SectionChange::ProfileUpdated))
            .collect()
    }

    /// 按新地形重建行布局；斜面需要两级开挖底高程，平面只保留第一级
    fn rebuild_layout(section: &mut Section, terrain: TerrainType, defaults: &LayoutDefaults) {
        let layout = RowTemplate::default_layout(terrain, defaults);
        let phase_count = layout.iter().map(|t| t.phase + 1).max().unwrap_or(1);

        let last_level = section.excavation_levels_m.last().copied().unwrap_or(0.0);
        section.excavation_levels_m.resize(phase_count, last_level);

        section.terrain = terrain;
        section.rows = layout
            .iter()
            .enumerate()
            .map(|(idx, template)| {
                AllocationRow::from_template(&section.name, idx + 1, template, section.area_m2)
            })
            .collect();
    }
}

impl Default for RecalcEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_area(section: &str, area_m2: f64) -> EstimateResult<()> {
    if is_non_negative_finite(area_m2) {
        Ok(())
    } else {
        Err(EstimateError::InvalidArea {
            section: section.to_string(),
            value: area_m2,
        })
    }
}

fn row_mut(section: &mut Section, row: usize) -> EstimateResult<&mut AllocationRow> {
    let name = section.name.clone();
    section
        .rows
        .get_mut(row)
        .ok_or(EstimateError::RowNotFound { section: name, row })
}
