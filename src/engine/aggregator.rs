// ==========================================
// 土方工程量估算 - 地质柱状图汇总引擎
// ==========================================
// 职责: 钻孔行合计、列平均、平均地面高程、修正层厚
// 输入: 钻孔记录 + 计算类型 (+ 场地平均地面高程)
// 输出: GeologicalSummary / ThicknessProfile / ModifiedThicknessReport
// ==========================================
// 红线: 数值异常就地按 0 处理，不报错
// 红线: 仅填土层做地面高程修正，风化岩/软岩/硬岩原样使用
// ==========================================

use crate::domain::error::EstimateResult;
use crate::domain::geology::{
    BoreholeRecord, BoreholeRowSum, ColumnAverages, GeologicalColumn, GeologicalSummary,
};
use crate::domain::profile::{LayerThickness, ModifiedThicknessReport, ThicknessProfile};
use crate::domain::types::{CalculationType, RockLayer};
use tracing::{debug, info, instrument, warn};

// ==========================================
// GeologicalAggregator - 柱状图汇总引擎
// ==========================================
pub struct GeologicalAggregator {
    // 无状态引擎
}

impl GeologicalAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总钻孔柱状图
    ///
    /// # 参数
    /// - `records`: 钻孔记录（已完成宽松数值解析）
    /// - `calculation_type`: TYPE1 分列 / TYPE2 合并 토사
    ///
    /// # 返回
    /// 行合计 + 列平均 + 平均地面高程；0 个钻孔时全部为 0
    #[instrument(skip_all, fields(borehole_count = records.len(), calculation_type = %calculation_type))]
    pub fn aggregate(
        &self,
        records: &[BoreholeRecord],
        calculation_type: CalculationType,
    ) -> GeologicalSummary {
        let columns = GeologicalColumn::active_columns(calculation_type);

        let row_sums: Vec<BoreholeRowSum> = records
            .iter()
            .map(|record| {
                let values: Vec<(GeologicalColumn, f64)> = columns
                    .iter()
                    .map(|column| (*column, record.column_value(*column)))
                    .collect();
                let total_m = values.iter().map(|(_, v)| *v).sum();
                BoreholeRowSum {
                    name: record.name.clone(),
                    ground_level_m: finite_or_zero(record.ground_level_m),
                    columns: values,
                    total_m,
                }
            })
            .collect();

        let count = records.len();
        let mean = |sum: f64| if count == 0 { 0.0 } else { sum / count as f64 };

        let column_averages = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let sum: f64 = row_sums.iter().map(|row| row.columns[idx].1).sum();
                (*column, mean(sum))
            })
            .collect();

        let averages = ColumnAverages {
            borehole_count: count,
            ground_level_m: mean(row_sums.iter().map(|row| row.ground_level_m).sum()),
            columns: column_averages,
            total_m: mean(row_sums.iter().map(|row| row.total_m).sum()),
            landfill_m: mean(
                records
                    .iter()
                    .map(|r| r.column_value(GeologicalColumn::Landfill))
                    .sum(),
            ),
            weathered_soil_m: mean(
                records
                    .iter()
                    .map(|r| r.column_value(GeologicalColumn::WeatheredSoil))
                    .sum(),
            ),
        };

        if count == 0 {
            debug!("无钻孔记录，平均值全部为 0");
        }

        info!(
            borehole_count = count,
            ground_level_avg = averages.ground_level_m,
            total_avg = averages.total_m,
            "柱状图汇总完成"
        );

        GeologicalSummary {
            calculation_type,
            row_sums,
            averages,
        }
    }

    /// 计算修正层厚剖面
    ///
    /// 填土 = 场地平均地面高程 - 钻孔平均地面高程 + 平均填土厚度（매립층 + 풍화토）
    ///
    /// # 参数
    /// - `averages`: 柱状图列平均
    /// - `site_ground_level_m`: 场地平均地面高程（평균지반고）
    /// - `calculation_type`: TYPE2 时平均填土取 토사 列
    ///
    /// # 返回
    /// - 修正后为负的填土按 0 计（记录 warn）
    /// - 경암 平均 > 0 时追加第四层
    #[instrument(skip(self, averages), fields(borehole_ground_level_m = averages.ground_level_m))]
    pub fn compute_thickness_profile(
        &self,
        averages: &ColumnAverages,
        site_ground_level_m: f64,
        calculation_type: CalculationType,
    ) -> EstimateResult<ThicknessProfile> {
        let raw_landfill_m = Self::raw_landfill_m(averages, calculation_type);
        let offset_m = site_ground_level_m - averages.ground_level_m;
        let mut landfill_m = raw_landfill_m + offset_m;

        if landfill_m < 0.0 {
            warn!(
                raw_landfill_m,
                offset_m, "修正后填土层厚为负，按 0 计"
            );
            landfill_m = 0.0;
        }

        let mut layers = vec![
            LayerThickness {
                layer: RockLayer::Landfill,
                thickness_m: landfill_m,
            },
            LayerThickness {
                layer: RockLayer::WeatheredRock,
                thickness_m: averages.average(GeologicalColumn::WeatheredRock),
            },
            LayerThickness {
                layer: RockLayer::SoftRock,
                thickness_m: averages.average(GeologicalColumn::SoftRock),
            },
        ];

        let hard_rock_m = averages.average(GeologicalColumn::HardRock);
        if hard_rock_m > 0.0 {
            layers.push(LayerThickness {
                layer: RockLayer::HardRock,
                thickness_m: hard_rock_m,
            });
        }

        let profile = ThicknessProfile::new(layers)?;
        debug!(
            landfill_m,
            total_m = profile.total_m(),
            layer_count = profile.layers().len(),
            "修正层厚计算完成"
        );
        Ok(profile)
    }

    /// 生成修正层厚对照表（原始平均 / 修正 / 累计）
    pub fn modified_thickness_report(
        &self,
        summary: &GeologicalSummary,
        site_ground_level_m: f64,
    ) -> EstimateResult<ModifiedThicknessReport> {
        let averages = &summary.averages;
        let modified =
            self.compute_thickness_profile(averages, site_ground_level_m, summary.calculation_type)?;

        let original = modified
            .layers()
            .iter()
            .map(|entry| LayerThickness {
                layer: entry.layer,
                thickness_m: match entry.layer {
                    RockLayer::Landfill => Self::raw_landfill_m(averages, summary.calculation_type),
                    RockLayer::WeatheredRock => averages.average(GeologicalColumn::WeatheredRock),
                    RockLayer::SoftRock => averages.average(GeologicalColumn::SoftRock),
                    RockLayer::HardRock => averages.average(GeologicalColumn::HardRock),
                },
            })
            .collect();

        Ok(ModifiedThicknessReport {
            borehole_ground_level_m: averages.ground_level_m,
            site_ground_level_m,
            original,
            cumulative: modified.cumulative(),
            modified,
        })
    }

    fn raw_landfill_m(averages: &ColumnAverages, calculation_type: CalculationType) -> f64 {
        match calculation_type {
            CalculationType::Type1 => averages.combined_landfill_m(),
            CalculationType::Type2 => averages.average(GeologicalColumn::Soil),
        }
    }
}

impl Default for GeologicalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
