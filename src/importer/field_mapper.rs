// ==========================================
// 土方工程量估算 - 字段映射器实现
// ==========================================
// 职责: 柱状图列名 -> BoreholeRecord + 宽松数值转换
// 列: 구분 / 지반고 / 매립층 / 풍화토 / 풍화암 / 연암 / 경암（可选）
// ==========================================

use crate::domain::geology::BoreholeRecord;
use crate::domain::import::{DqLevel, DqViolation};
use crate::importer::borehole_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait, NumericCell,
};
use crate::importer::data_cleaner::DataCleaner;
use std::collections::HashMap;

/// 钻孔编号列（必需）
pub const NAME_COLUMN: &str = "구분";
/// 钻孔编号缺失时使用的名称
pub const UNKNOWN_BOREHOLE: &str = "Unknown";

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 列名别名
    fn aliases(key: &str) -> &'static [&'static str] {
        match key {
            "구분" => &["구분", "공번", "시추공"],
            "지반고" => &["지반고", "지반고(EL)", "EL"],
            "매립층" => &["매립층", "매립토"],
            "풍화토" => &["풍화토"],
            "풍화암" => &["풍화암"],
            "연암" => &["연암"],
            "경암" => &["경암"],
            _ => &[],
        }
    }

    /// 按别名取原始值；列不存在时返回 None
    fn get_raw<'a>(&self, row: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
        Self::aliases(key)
            .iter()
            .find_map(|alias| row.get(*alias))
            .map(String::as_str)
    }

    /// 文件是否包含某列（按别名）
    pub fn has_column(&self, row: &HashMap<String, String>, key: &str) -> bool {
        self.get_raw(row, key).is_some()
    }

    /// 解析数值列；无法解析按 0 并记录
    fn parse_number(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
        borehole: &str,
        thickness: bool,
        violations: &mut Vec<DqViolation>,
    ) -> f64 {
        let Some(raw) = self.get_raw(row, key) else {
            return 0.0;
        };

        let mut note = |level: DqLevel, message: String| {
            violations.push(DqViolation {
                row_number,
                borehole: Some(borehole.to_string()),
                level,
                field: key.to_string(),
                message,
            });
        };

        let value = match self.cleaner.parse_lenient_f64(raw) {
            NumericCell::Exact(v) => v,
            NumericCell::Prefix(v) => {
                note(DqLevel::Info, format!("仅解析前导数值: {} -> {}", raw.trim(), v));
                v
            }
            NumericCell::Missing => 0.0,
            NumericCell::Invalid => {
                note(DqLevel::Warning, format!("无法解析为数值，按 0 计: {}", raw.trim()));
                0.0
            }
        };

        if thickness && value < 0.0 {
            note(DqLevel::Warning, format!("层厚为负，按 0 计: {}", value));
            return 0.0;
        }
        value
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_borehole(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> (BoreholeRecord, Vec<DqViolation>) {
        let mut violations = Vec::new();

        let name = match self.cleaner.normalize_null(self.get_raw(row, NAME_COLUMN)) {
            Some(name) => name,
            None => {
                violations.push(DqViolation {
                    row_number,
                    borehole: None,
                    level: DqLevel::Warning,
                    field: NAME_COLUMN.to_string(),
                    message: format!("钻孔编号为空，使用 {}", UNKNOWN_BOREHOLE),
                });
                UNKNOWN_BOREHOLE.to_string()
            }
        };

        let mut number = |key: &str, thickness: bool| {
            self.parse_number(row, key, row_number, &name, thickness, &mut violations)
        };

        let record = BoreholeRecord {
            ground_level_m: number("지반고", false),
            landfill_m: number("매립층", true),
            weathered_soil_m: number("풍화토", true),
            weathered_rock_m: number("풍화암", true),
            soft_rock_m: number("연암", true),
            hard_rock_m: number("경암", true),
            name: name.clone(),
        };

        (record, violations)
    }
}
