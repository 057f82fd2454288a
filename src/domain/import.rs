// ==========================================
// 土方工程量估算 - 导入批次与数据质量模型
// ==========================================
// 职责: 导入批次、数据质量记录、导入结果
// 红线: 数据质量问题只记录，不阻断导入（数值按 0 处理）
// ==========================================

use crate::domain::geology::{BoreholeRecord, GroundLevelSurvey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Warning, // 警告（值已替换为 0）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,             // 原始文件行号（表头为第 1 行）
    pub borehole: Option<String>,      // 钻孔编号（如果可解析）
    pub level: DqLevel,
    pub field: String,                 // 列名
    pub message: String,
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,              // 批次 ID（UUID）
    pub file_name: Option<String>,     // 源文件名
    pub total_rows: usize,             // 数据行数
    pub warning_rows: usize,           // 含警告的行数
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

impl ImportBatch {
    pub fn new(file_name: Option<String>) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            file_name,
            total_rows: 0,
            warning_rows: 0,
            imported_at: Utc::now(),
            elapsed_ms: 0,
        }
    }
}

// ==========================================
// BoreholeImport - 柱状图导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreholeImport {
    pub batch: ImportBatch,
    pub records: Vec<BoreholeRecord>,
    pub violations: Vec<DqViolation>,
    pub has_hard_rock_column: bool, // 源文件是否包含 경암 列
}

// ==========================================
// GroundLevelImport - 平均地面高程导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundLevelImport {
    pub batch: ImportBatch,
    pub survey: GroundLevelSurvey,
    pub skipped_cells: usize, // 无法解析的单元格数
}
