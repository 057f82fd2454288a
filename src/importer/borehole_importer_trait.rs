// ==========================================
// 土方工程量估算 - 导入管道 Trait
// ==========================================
// 职责: 定义柱状图/地面高程导入各阶段接口（不包含实现）
// 阶段: 文件解析 -> 字段映射 -> 数值清洗
// ==========================================

use crate::domain::geology::BoreholeRecord;
use crate::domain::import::DqViolation;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析带表头的文件为行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(Vec<HashMap<String, String>>): 行记录列表（跳过全空行）
    /// - Err: 文件不存在、格式错误
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>>;

    /// 解析无表头的文件为单元格网格
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 列名 -> 钻孔记录映射
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录映射为钻孔记录
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - row_number: 文件行号（用于数据质量记录）
    ///
    /// # 返回
    /// 钻孔记录 + 该行的数据质量记录（无法解析的数值已按 0 计）
    fn map_to_borehole(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> (BoreholeRecord, Vec<DqViolation>);
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本/数值清洗
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// TRIM，并去除 BOM
    fn clean_text(&self, value: &str) -> String;

    /// 空白字符串标准化为 None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 宽松数值解析
    ///
    /// # 返回
    /// - Exact: 完整解析
    /// - Prefix: 仅前导数值可解析（如 "12.5m"）
    /// - Missing: 空白
    /// - Invalid: 无法解析
    fn parse_lenient_f64(&self, value: &str) -> NumericCell;
}

/// 宽松数值解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Exact(f64),
    Prefix(f64),
    Missing,
    Invalid,
}

impl NumericCell {
    /// 数值（缺失/无法解析按 0）
    pub fn value_or_zero(self) -> f64 {
        match self {
            NumericCell::Exact(v) | NumericCell::Prefix(v) => v,
            NumericCell::Missing | NumericCell::Invalid => 0.0,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            NumericCell::Exact(v) | NumericCell::Prefix(v) => Some(v),
            NumericCell::Missing | NumericCell::Invalid => None,
        }
    }
}
