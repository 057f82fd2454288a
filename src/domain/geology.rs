// ==========================================
// 土方工程量估算 - 地质柱状图领域模型
// ==========================================
// 职责: 钻孔记录、平均地面高程测量、柱状图汇总结果
// 红线: 不含解析逻辑（由 importer 负责）
// ==========================================

use crate::domain::types::CalculationType;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// GeologicalColumn - 柱状图列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeologicalColumn {
    Landfill,      // 매립층
    WeatheredSoil, // 풍화토
    Soil,          // 토사 = 매립층 + 풍화토（仅 TYPE2）
    WeatheredRock, // 풍화암
    SoftRock,      // 연암
    HardRock,      // 경암
}

impl GeologicalColumn {
    /// 源文件列名
    pub fn label(self) -> &'static str {
        match self {
            GeologicalColumn::Landfill => "매립층",
            GeologicalColumn::WeatheredSoil => "풍화토",
            GeologicalColumn::Soil => "토사",
            GeologicalColumn::WeatheredRock => "풍화암",
            GeologicalColumn::SoftRock => "연암",
            GeologicalColumn::HardRock => "경암",
        }
    }

    /// 按计算类型给出参与行合计的列
    ///
    /// 경암 在两种类型中都参与，缺失时按 0 计
    pub fn active_columns(calculation_type: CalculationType) -> &'static [GeologicalColumn] {
        match calculation_type {
            CalculationType::Type1 => &[
                GeologicalColumn::Landfill,
                GeologicalColumn::WeatheredSoil,
                GeologicalColumn::WeatheredRock,
                GeologicalColumn::SoftRock,
                GeologicalColumn::HardRock,
            ],
            CalculationType::Type2 => &[
                GeologicalColumn::Soil,
                GeologicalColumn::WeatheredRock,
                GeologicalColumn::SoftRock,
                GeologicalColumn::HardRock,
            ],
        }
    }
}

impl fmt::Display for GeologicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// BoreholeRecord - 单个钻孔记录
// ==========================================
// 所有数值已完成宽松解析（无法解析/缺失 = 0）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoreholeRecord {
    pub name: String,            // 구분（钻孔编号）
    pub ground_level_m: f64,     // 지반고
    pub landfill_m: f64,         // 매립층
    pub weathered_soil_m: f64,   // 풍화토
    pub weathered_rock_m: f64,   // 풍화암
    pub soft_rock_m: f64,        // 연암
    pub hard_rock_m: f64,        // 경암
}

impl BoreholeRecord {
    /// 读取某列的层厚；토사 为 매립층 + 풍화토
    ///
    /// 负值按 0 处理（层厚不可能为负）
    pub fn column_value(&self, column: GeologicalColumn) -> f64 {
        let raw = match column {
            GeologicalColumn::Landfill => self.landfill_m,
            GeologicalColumn::WeatheredSoil => self.weathered_soil_m,
            GeologicalColumn::Soil => {
                non_negative(self.landfill_m) + non_negative(self.weathered_soil_m)
            }
            GeologicalColumn::WeatheredRock => self.weathered_rock_m,
            GeologicalColumn::SoftRock => self.soft_rock_m,
            GeologicalColumn::HardRock => self.hard_rock_m,
        };
        non_negative(raw)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ==========================================
// GroundLevelSurvey - 平均地面高程测量
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundLevelSurvey {
    pub values: Vec<f64>, // 所有可解析的测点高程
    pub average_m: f64,   // 算术平均（无数据时为 0）
}

impl GroundLevelSurvey {
    /// 由测点高程构造，忽略非有限值
    pub fn from_values(values: Vec<f64>) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let average_m = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        Self { values, average_m }
    }

    pub fn point_count(&self) -> usize {
        self.values.len()
    }
}

// ==========================================
// BoreholeRowSum - 单钻孔行汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreholeRowSum {
    pub name: String,
    pub ground_level_m: f64,
    pub columns: Vec<(GeologicalColumn, f64)>, // 按计算类型的列顺序
    pub total_m: f64,                          // 합계（不含地面高程）
}

// ==========================================
// ColumnAverages - 平均层厚行（평균층후）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAverages {
    pub borehole_count: usize,
    pub ground_level_m: f64,                   // 钻孔平均地面高程
    pub columns: Vec<(GeologicalColumn, f64)>, // 各列平均层厚
    pub total_m: f64,                          // 行合计的平均
    /// 매립층 与 풍화토 的平均（TYPE1/TYPE2 均保留，用于修正层厚）
    pub landfill_m: f64,
    pub weathered_soil_m: f64,
}

impl ColumnAverages {
    /// 读取某列平均值；未参与的列返回 0
    pub fn average(&self, column: GeologicalColumn) -> f64 {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    /// 修正前的填土总厚度（매립층 + 풍화토）
    pub fn combined_landfill_m(&self) -> f64 {
        self.landfill_m + self.weathered_soil_m
    }
}

// ==========================================
// GeologicalSummary - 柱状图计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologicalSummary {
    pub calculation_type: CalculationType,
    pub row_sums: Vec<BoreholeRowSum>,
    pub averages: ColumnAverages,
}

impl GeologicalSummary {
    /// 钻孔平均地面高程
    pub fn ground_level_average_m(&self) -> f64 {
        self.averages.ground_level_m
    }
}
