// ==========================================
// 土方工程量估算 - 柱状图/地面高程导入器
// ==========================================
// 流程:
// 1) 文件读取与解析（CSV / Excel）
// 2) 字段映射与宽松数值转换（无法解析 -> 0 + 数据质量记录）
// 3) 生成导入批次（UUID + 时间戳 + 行数统计）
// ==========================================
// 红线: 单元格数值异常不报错；仅文件级问题返回 ImportError
// ==========================================

use crate::domain::geology::GroundLevelSurvey;
use crate::domain::import::{BoreholeImport, DqLevel, GroundLevelImport, ImportBatch};
use crate::importer::borehole_importer_trait::{DataCleaner as _, FieldMapper as _, FileParser};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, NAME_COLUMN};
use crate::importer::file_parser::UniversalFileParser;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

// ==========================================
// BoreholeImporter - 导入器
// ==========================================
pub struct BoreholeImporter {
    parser: Box<dyn FileParser>,
    mapper: FieldMapper,
    cleaner: DataCleaner,
}

impl BoreholeImporter {
    /// 默认导入器（按扩展名选择 CSV/Excel 解析器）
    pub fn new() -> Self {
        Self::with_parser(Box::new(UniversalFileParser))
    }

    pub fn with_parser(parser: Box<dyn FileParser>) -> Self {
        Self {
            parser,
            mapper: FieldMapper::new(),
            cleaner: DataCleaner,
        }
    }

    // ==========================================
    // 柱状图
    // ==========================================

    /// 从文件导入钻孔柱状图
    ///
    /// # 返回
    /// - Ok(BoreholeImport): 钻孔记录 + 数据质量记录 + 批次
    /// - Err: 文件不存在/格式不支持/解析失败/缺少 구분 列/无数据
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_boreholes<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<BoreholeImport> {
        let path = file_path.as_ref();
        let started = Instant::now();

        let rows = self.parser.parse_to_raw_records(path)?;
        let mut result = self.import_boreholes_from_rows(&rows, file_name(path))?;

        result.batch.elapsed_ms = started.elapsed().as_millis() as i64;
        Ok(result)
    }

    /// 从已解析的行记录导入（宿主已自行读取文件时使用）
    pub fn import_boreholes_from_rows(
        &self,
        rows: &[HashMap<String, String>],
        file_name: Option<String>,
    ) -> ImportResult<BoreholeImport> {
        let source = file_name.clone().unwrap_or_default();
        let first = rows.first().ok_or_else(|| ImportError::EmptyFile(source))?;
        if !self.mapper.has_column(first, NAME_COLUMN) {
            return Err(ImportError::MissingColumn(NAME_COLUMN.to_string()));
        }
        let has_hard_rock_column = self.mapper.has_column(first, "경암");

        let mut batch = ImportBatch::new(file_name);
        let mut records = Vec::with_capacity(rows.len());
        let mut violations = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            // 表头为第 1 行
            let (record, row_violations) = self.mapper.map_to_borehole(row, idx + 2);
            records.push(record);
            violations.extend(row_violations);
        }

        let warning_rows: BTreeSet<usize> = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .map(|v| v.row_number)
            .collect();

        batch.total_rows = records.len();
        batch.warning_rows = warning_rows.len();
        batch.imported_at = Utc::now();

        if !warning_rows.is_empty() {
            warn!(
                batch_id = %batch.batch_id,
                warning_rows = batch.warning_rows,
                "柱状图存在无法解析的数值，已按 0 计"
            );
        }
        info!(
            batch_id = %batch.batch_id,
            total_rows = batch.total_rows,
            has_hard_rock_column,
            "柱状图导入完成"
        );

        Ok(BoreholeImport {
            batch,
            records,
            violations,
            has_hard_rock_column,
        })
    }

    // ==========================================
    // 平均地面高程
    // ==========================================

    /// 从无表头文件导入平均地面高程测点
    ///
    /// 每个可解析的单元格都是一个测点；无法解析的单元格跳过
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_ground_levels<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<GroundLevelImport> {
        let path = file_path.as_ref();
        let started = Instant::now();

        let grid = self.parser.parse_to_grid(path)?;
        let mut result = self.ground_levels_from_grid(&grid, file_name(path));

        result.batch.elapsed_ms = started.elapsed().as_millis() as i64;
        Ok(result)
    }

    /// 从单元格网格计算平均地面高程
    pub fn ground_levels_from_grid(
        &self,
        grid: &[Vec<String>],
        file_name: Option<String>,
    ) -> GroundLevelImport {
        let mut values = Vec::new();
        let mut skipped_cells = 0;

        for cell in grid.iter().flatten() {
            match self.cleaner.parse_lenient_f64(cell).value() {
                Some(value) => values.push(value),
                None if cell.trim().is_empty() => {}
                None => skipped_cells += 1,
            }
        }

        let survey = GroundLevelSurvey::from_values(values);
        let mut batch = ImportBatch::new(file_name);
        batch.total_rows = grid.len();

        if survey.point_count() == 0 {
            warn!(batch_id = %batch.batch_id, "平均地面高程无有效测点，平均值按 0 计");
        }
        info!(
            batch_id = %batch.batch_id,
            point_count = survey.point_count(),
            average_m = survey.average_m,
            skipped_cells,
            "平均地面高程导入完成"
        );

        GroundLevelImport {
            batch,
            survey,
            skipped_cells,
        }
    }
}

impl Default for BoreholeImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}
