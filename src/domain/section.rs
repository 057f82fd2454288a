// ==========================================
// 土方工程量估算 - 开挖区段领域模型
// ==========================================
// 职责: 开挖深度、清单行、区段及默认行布局
// 红线: 行按岩层地层顺序分组；行在输入变化时重算，不重建
// ==========================================

use crate::domain::error::{is_non_negative_finite, EstimateError, EstimateResult};
use crate::domain::types::{ItemKind, RockLayer, TerrainType, WorkType};
use serde::{Deserialize, Serialize};

// ==========================================
// ExcavationTarget - 开挖深度（一个开挖阶段）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcavationTarget {
    pub depth_m: f64,
}

impl ExcavationTarget {
    pub fn new(depth_m: f64) -> Self {
        Self { depth_m }
    }

    /// 굴착길이 = 원지반고 + 터파기고
    ///
    /// # 参数
    /// - `original_ground_level_m`: 原地面高程 (EL)
    /// - `excavation_level_m`: 开挖底高程（输入为 -EL 的绝对值）
    pub fn from_levels(original_ground_level_m: f64, excavation_level_m: f64) -> Self {
        Self {
            depth_m: original_ground_level_m + excavation_level_m,
        }
    }
}

/// 校验开挖深度列表（非空，且每个深度为非负有限值）
///
/// 深度不要求递增：后一阶段不深于前一阶段时该阶段分配为 0
pub fn validate_targets(targets: &[ExcavationTarget]) -> EstimateResult<()> {
    if targets.is_empty() {
        return Err(EstimateError::EmptyTargets);
    }
    for (phase, target) in targets.iter().enumerate() {
        if !is_non_negative_finite(target.depth_m) {
            return Err(EstimateError::InvalidTargetDepth {
                phase,
                value: target.depth_m,
            });
        }
    }
    Ok(())
}

// ==========================================
// RowSplit - 手动/自动分配标记
// ==========================================
// Manual: 层厚由用户指定（分配边界条件）; Auto: 由分配器推导
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowSplit {
    Auto,
    Manual { thickness_m: f64 },
}

impl RowSplit {
    pub fn is_manual(&self) -> bool {
        matches!(self, RowSplit::Manual { .. })
    }
}

// ==========================================
// RowTemplate - 行布局模板
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowTemplate {
    pub layer: RockLayer,
    pub work_type: WorkType,
    pub item: ItemKind,
    pub split: RowSplit,
    pub phase: usize, // 所属开挖阶段（0 起）
    pub application_rate_pct: f64,
}

/// 默认布局参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefaults {
    pub first_row_thickness_m: f64,   // 首行固定层厚
    pub application_rate_pct: f64,    // 常规适用率
    pub second_phase_rate_pct: f64,   // 斜面第二阶段适用率
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            first_row_thickness_m: 5.0,
            application_rate_pct: 100.0,
            second_phase_rate_pct: 50.0,
        }
    }
}

impl RowTemplate {
    fn auto(layer: RockLayer, work_type: WorkType, item: ItemKind, phase: usize, rate: f64) -> Self {
        Self {
            layer,
            work_type,
            item,
            split: RowSplit::Auto,
            phase,
            application_rate_pct: rate,
        }
    }

    /// 按地形生成默认行布局
    ///
    /// 平面（4 行，单阶段）:
    /// 1) 매립토 직 일반（手动首行）
    /// 2) 매립토 크 일반
    /// 3) 풍화암 크 일반
    /// 4) 연암 크 마사토
    ///
    /// 斜面在此基础上追加第 5 行: 연암 크 일반，第二阶段，适用率取 second_phase_rate_pct
    pub fn default_layout(terrain: TerrainType, defaults: &LayoutDefaults) -> Vec<RowTemplate> {
        let rate = defaults.application_rate_pct;
        let mut layout = vec![
            RowTemplate {
                layer: RockLayer::Landfill,
                work_type: WorkType::Direct,
                item: ItemKind::General,
                split: RowSplit::Manual {
                    thickness_m: defaults.first_row_thickness_m,
                },
                phase: 0,
                application_rate_pct: rate,
            },
            Self::auto(RockLayer::Landfill, WorkType::Clamshell, ItemKind::General, 0, rate),
            Self::auto(RockLayer::WeatheredRock, WorkType::Clamshell, ItemKind::General, 0, rate),
            Self::auto(
                RockLayer::SoftRock,
                WorkType::Clamshell,
                ItemKind::DecomposedGranite,
                0,
                rate,
            ),
        ];

        if terrain == TerrainType::Slope {
            layout.push(Self::auto(
                RockLayer::SoftRock,
                WorkType::Clamshell,
                ItemKind::General,
                1,
                defaults.second_phase_rate_pct,
            ));
        }

        layout
    }
}

// ==========================================
// AllocationRow - 工程量清单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub id: String,             // {区段名}-{序号}
    pub seq_no: usize,          // 구분（1 起）
    pub layer: RockLayer,       // 암종
    pub work_type: WorkType,    // 작업
    pub item: ItemKind,         // 항목
    pub split: RowSplit,
    pub phase: usize,

    // ===== 面积 =====
    pub area_m2: f64,
    pub area_overridden: bool,  // true: 不随区段面积变化

    // ===== 派生值 =====
    pub thickness_m: f64,       // 수정층후（分配结果）
    pub application_rate_pct: f64,
    pub volume_m3: i64,         // 부피（整数立方米）
}

impl AllocationRow {
    pub fn from_template(section_name: &str, seq_no: usize, template: &RowTemplate, area_m2: f64) -> Self {
        let thickness_m = match template.split {
            RowSplit::Manual { thickness_m } => thickness_m,
            RowSplit::Auto => 0.0,
        };
        Self {
            id: format!("{}-{}", section_name, seq_no),
            seq_no,
            layer: template.layer,
            work_type: template.work_type,
            item: template.item,
            split: template.split,
            phase: template.phase,
            area_m2,
            area_overridden: false,
            thickness_m,
            application_rate_pct: template.application_rate_pct,
            volume_m3: 0,
        }
    }

    /// 校验行级输入（适用率、手动层厚、面积）
    ///
    /// # 参数
    /// - `row_index`: 行下标（用于错误定位）
    pub fn validate(&self, row_index: usize) -> EstimateResult<()> {
        let rate = self.application_rate_pct;
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Err(EstimateError::InvalidApplicationRate {
                row: row_index,
                value: rate,
            });
        }
        if let RowSplit::Manual { thickness_m } = self.split {
            if !is_non_negative_finite(thickness_m) {
                return Err(EstimateError::InvalidManualThickness {
                    row: row_index,
                    value: thickness_m,
                });
            }
        }
        if !is_non_negative_finite(self.area_m2) {
            return Err(EstimateError::InvalidArea {
                section: self.id.clone(),
                value: self.area_m2,
            });
        }
        Ok(())
    }

    /// 是否为所属岩层的第一行（手动覆写该行会触发级联重算）
    pub fn is_first_of_layer(rows: &[AllocationRow], index: usize) -> bool {
        match rows.get(index) {
            Some(row) => !rows[..index].iter().any(|prev| prev.layer == row.layer),
            None => false,
        }
    }
}

// ==========================================
// Section - 开挖区段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,  // p-1 / s-2
    pub label: String, // 用户输入的区段名
    pub terrain: TerrainType,
    pub area_m2: f64,
    pub original_ground_level_m: f64,  // 원지반고 (EL)
    pub excavation_levels_m: Vec<f64>, // 터파기고（每个阶段一个）
    pub rows: Vec<AllocationRow>,
}

impl Section {
    /// 按模板创建区段（行层厚/体积待分配器与体积计算器填充）
    pub fn new(
        name: impl Into<String>,
        terrain: TerrainType,
        area_m2: f64,
        original_ground_level_m: f64,
        excavation_levels_m: Vec<f64>,
        layout: &[RowTemplate],
    ) -> EstimateResult<Self> {
        let name = name.into();
        if !is_non_negative_finite(area_m2) {
            return Err(EstimateError::InvalidArea {
                section: name,
                value: area_m2,
            });
        }

        let rows = layout
            .iter()
            .enumerate()
            .map(|(idx, template)| AllocationRow::from_template(&name, idx + 1, template, area_m2))
            .collect();

        Ok(Self {
            label: String::new(),
            name,
            terrain,
            area_m2,
            original_ground_level_m,
            excavation_levels_m,
            rows,
        })
    }

    /// 各阶段开挖深度（原地面高程 + 开挖底高程）
    pub fn targets(&self) -> Vec<ExcavationTarget> {
        self.excavation_levels_m
            .iter()
            .map(|level| ExcavationTarget::from_levels(self.original_ground_level_m, *level))
            .collect()
    }

    /// 소계: 区段体积合计
    pub fn subtotal_m3(&self) -> i64 {
        self.rows.iter().map(|row| row.volume_m3).sum()
    }

    /// 标题（P-xxx / S-xxx），未填写区段名时使用内部名称
    pub fn title(&self) -> String {
        let display = if self.label.trim().is_empty() {
            self.name.as_str()
        } else {
            self.label.trim()
        };
        format!("{}-{}", self.terrain.name_prefix().to_uppercase(), display)
    }
}

/// 生成下一个区段名称
///
/// 编号 = 已有 p-N / s-N 中最大的 N + 1（平面与斜面共用编号）
pub fn next_section_name<'a, I>(existing_names: I, terrain: TerrainType) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max_number = existing_names
        .into_iter()
        .filter_map(|name| {
            let (prefix, number) = name.split_once('-')?;
            if prefix != "p" && prefix != "s" {
                return None;
            }
            number.parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0);

    format!("{}-{}", terrain.name_prefix(), max_number + 1)
}
