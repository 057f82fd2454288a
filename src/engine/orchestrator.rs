// ==========================================
// 土方工程量估算 - 引擎编排器
// ==========================================
// 用途: 协调各计算引擎的执行顺序
// 流程: 柱状图汇总 -> 修正层厚 -> 区段分配 -> 体积 -> 汇总 -> 校验
// ==========================================
// 红线: 纯计算，不持有跨调用状态；每次调用基于输入快照返回新结果
// ==========================================

use crate::config::{EstimateConfigReader, EstimateSettings};
use crate::domain::error::EstimateResult;
use crate::domain::geology::{BoreholeRecord, ColumnAverages, GeologicalSummary, GroundLevelSurvey};
use crate::domain::profile::{ModifiedThicknessReport, ThicknessProfile};
use crate::domain::section::{
    next_section_name, AllocationRow, ExcavationTarget, RowTemplate, Section,
};
use crate::domain::summary::{EstimateSummary, SummaryEntry};
use crate::domain::types::{CalculationType, TerrainType, ValidationMode};
use crate::engine::{
    DepthAllocator, GeologicalAggregator, PhaseValidation, RecalcEngine, SectionChange,
    SectionValidation, ThicknessValidator, VolumeCalculator,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ==========================================
// SectionInput - 新区段输入
// ==========================================
// 未填写的字段使用估算参数中的默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionInput {
    pub terrain: Option<TerrainType>, // 未指定时为平面
    pub label: String,
    pub area_m2: Option<f64>,
    pub original_ground_level_m: Option<f64>,
    pub excavation_levels_m: Option<Vec<f64>>,
    pub first_row_thickness_m: Option<f64>,
}

impl SectionInput {
    pub fn plane() -> Self {
        Self {
            terrain: Some(TerrainType::Plane),
            ..Default::default()
        }
    }

    pub fn slope() -> Self {
        Self {
            terrain: Some(TerrainType::Slope),
            ..Default::default()
        }
    }
}

// ==========================================
// EstimateInput / EstimateReport - 完整流程输入输出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateInput {
    pub boreholes: Vec<BoreholeRecord>,
    pub ground_levels: GroundLevelSurvey,
    pub calculation_type: Option<CalculationType>,
    pub validation_mode: Option<ValidationMode>,
    pub sections: Vec<SectionInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub geology: GeologicalSummary,
    pub site_ground_level_m: f64,
    pub thickness: ModifiedThicknessReport,
    pub sections: Vec<Section>,
    pub validations: Vec<SectionValidation>,
    pub summary: EstimateSummary,
    pub generated_at: DateTime<Utc>,
}

impl EstimateReport {
    /// 全部区段校验通过
    pub fn all_valid(&self) -> bool {
        self.validations.iter().all(|v| v.pass)
    }
}

// ==========================================
// EarthworkEstimator - 引擎编排器
// ==========================================
pub struct EarthworkEstimator {
    settings: EstimateSettings,
    aggregator: GeologicalAggregator,
    allocator: DepthAllocator,
    volume_calculator: VolumeCalculator,
    validator: ThicknessValidator,
    recalc: RecalcEngine,
}

impl EarthworkEstimator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - settings: 估算参数
    pub fn new(settings: EstimateSettings) -> Self {
        Self {
            validator: ThicknessValidator::new(settings.validation_tolerance_m),
            aggregator: GeologicalAggregator::new(),
            allocator: DepthAllocator::new(),
            volume_calculator: VolumeCalculator::new(),
            recalc: RecalcEngine::new(),
            settings,
        }
    }

    /// 从配置读取器创建
    pub fn from_config<C: EstimateConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(EstimateSettings::from_reader(config))
    }

    pub fn settings(&self) -> &EstimateSettings {
        &self.settings
    }

    // ==========================================
    // 单步操作
    // ==========================================

    /// 柱状图汇总: 行合计 + 列平均 + 平均地面高程
    pub fn aggregate_geological(
        &self,
        boreholes: &[BoreholeRecord],
        calculation_type: CalculationType,
    ) -> GeologicalSummary {
        self.aggregator.aggregate(boreholes, calculation_type)
    }

    /// 修正层厚剖面（填土层做地面高程修正）
    pub fn compute_thickness_profile(
        &self,
        averages: &ColumnAverages,
        site_ground_level_m: f64,
        calculation_type: CalculationType,
    ) -> EstimateResult<ThicknessProfile> {
        self.aggregator
            .compute_thickness_profile(averages, site_ground_level_m, calculation_type)
    }

    /// 深度分配（写回行层厚）
    pub fn allocate_depth(
        &self,
        profile: &ThicknessProfile,
        targets: &[ExcavationTarget],
        rows: &[AllocationRow],
        first_row_override: Option<f64>,
    ) -> EstimateResult<Vec<AllocationRow>> {
        self.allocator
            .allocate_rows(profile, targets, rows, first_row_override)
    }

    /// 行体积重算
    pub fn compute_volumes(&self, rows: &[AllocationRow]) -> Vec<AllocationRow> {
        self.volume_calculator.compute_volumes(rows)
    }

    /// 按分组键汇总
    pub fn aggregate_by_key<'a, K, F, I>(&self, sections: I, key_fn: F) -> Vec<SummaryEntry<K>>
    where
        K: Ord + Clone,
        F: Fn(&AllocationRow) -> K,
        I: IntoIterator<Item = &'a Section>,
    {
        self.volume_calculator.aggregate_by_key(sections, key_fn)
    }

    /// 层厚校验
    pub fn validate(
        &self,
        rows: &[AllocationRow],
        targets: &[ExcavationTarget],
        profile: &ThicknessProfile,
        mode: ValidationMode,
    ) -> Vec<PhaseValidation> {
        self.validator.validate(rows, targets, profile, mode)
    }

    /// 区段校验（使用参数中的校验模式）
    pub fn validate_section(&self, section: &Section, profile: &ThicknessProfile) -> SectionValidation {
        self.validator
            .validate_section(section, profile, self.settings.validation_mode)
    }

    /// 工程量汇总
    pub fn summarize(&self, sections: &[Section]) -> EstimateSummary {
        self.volume_calculator.summarize(sections)
    }

    // ==========================================
    // 区段
    // ==========================================

    /// 新建区段: 命名、默认布局、分配、体积
    ///
    /// # 参数
    /// - existing: 已有区段（用于编号）
    /// - input: 区段输入
    /// - profile: 层厚剖面
    #[instrument(skip_all, fields(existing = existing.len()))]
    pub fn create_section(
        &self,
        existing: &[Section],
        input: &SectionInput,
        profile: &ThicknessProfile,
    ) -> EstimateResult<Section> {
        let terrain = input.terrain.unwrap_or(TerrainType::Plane);
        let name = next_section_name(existing.iter().map(|s| s.name.as_str()), terrain);

        let layout = RowTemplate::default_layout(terrain, &self.settings.layout_defaults());
        let mut section = Section::new(
            name,
            terrain,
            input
                .area_m2
                .unwrap_or_else(|| self.settings.default_area_m2(terrain)),
            input
                .original_ground_level_m
                .unwrap_or(self.settings.original_ground_level_m),
            input
                .excavation_levels_m
                .clone()
                .unwrap_or_else(|| self.settings.default_excavation_levels_m(terrain)),
            &layout,
        )?;
        section.label = input.label.trim().to_string();

        debug!(
            section = %section.name,
            terrain = %terrain,
            area_m2 = section.area_m2,
            "新建区段"
        );

        let section = self
            .allocator
            .allocate_section(&section, profile, input.first_row_thickness_m)?;
        Ok(self.volume_calculator.apply_to_section(&section))
    }

    /// 输入变化后重算区段
    pub fn recompute(
        &self,
        previous: &Section,
        profile: &ThicknessProfile,
        change: SectionChange,
    ) -> EstimateResult<Section> {
        self.recalc.recompute(previous, profile, change)
    }

    /// 层厚剖面变化后重算全部区段
    pub fn recompute_all(
        &self,
        sections: &[Section],
        profile: &ThicknessProfile,
    ) -> EstimateResult<Vec<Section>> {
        self.recalc.recompute_all(sections, profile)
    }

    // ==========================================
    // 完整流程
    // ==========================================

    /// 执行完整估算流程
    ///
    /// # 返回
    /// - Ok(EstimateReport): 柱状图汇总、修正层厚、区段、校验、汇总表
    /// - Err: 区段输入违反前置条件
    ///
    /// # 说明
    /// - 平均地面高程无测点时使用钻孔平均地面高程（不做修正）
    /// - 校验不通过只记录在报告中
    #[instrument(skip_all, fields(
        borehole_count = input.boreholes.len(),
        section_count = input.sections.len()
    ))]
    pub fn run(&self, input: &EstimateInput) -> EstimateResult<EstimateReport> {
        let calculation_type = input
            .calculation_type
            .unwrap_or(self.settings.calculation_type);
        let mode = input
            .validation_mode
            .unwrap_or(self.settings.validation_mode);

        info!(calculation_type = %calculation_type, mode = %mode, "开始执行估算流程");

        // 步骤1: 柱状图汇总
        let geology = self.aggregate_geological(&input.boreholes, calculation_type);

        // 步骤2: 修正层厚
        let site_ground_level_m = if input.ground_levels.point_count() == 0 {
            warn!(
                borehole_ground_level_m = geology.ground_level_average_m(),
                "无平均地面高程测点，使用钻孔平均地面高程"
            );
            geology.ground_level_average_m()
        } else {
            input.ground_levels.average_m
        };
        let thickness = self
            .aggregator
            .modified_thickness_report(&geology, site_ground_level_m)?;

        // 步骤3: 区段分配 + 体积
        let mut sections: Vec<Section> = Vec::with_capacity(input.sections.len());
        for section_input in &input.sections {
            let section = self.create_section(&sections, section_input, &thickness.modified)?;
            sections.push(section);
        }

        // 步骤4: 校验（仅提示）
        let validations: Vec<SectionValidation> = sections
            .iter()
            .map(|s| self.validator.validate_section(s, &thickness.modified, mode))
            .collect();

        // 步骤5: 汇总
        let summary = self.summarize(&sections);

        let failed = validations.iter().filter(|v| !v.pass).count();
        info!(
            sections = sections.len(),
            failed_validations = failed,
            grand_total_volume_m3 = summary.grand_total_volume_m3,
            "估算流程完成"
        );

        Ok(EstimateReport {
            geology,
            site_ground_level_m,
            thickness,
            sections,
            validations,
            summary,
            generated_at: Utc::now(),
        })
    }
}

impl Default for EarthworkEstimator {
    fn default() -> Self {
        Self::new(EstimateSettings::default())
    }
}
