// ==========================================
// 土方工程量估算 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，第一个工作表) / CSV (.csv)
// 模式: 带表头（柱状图）/ 无表头网格（平均地面高程）
// ==========================================

use crate::importer::borehole_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

/// 去除 UTF-8 BOM 与首尾空白
fn clean_cell(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// 表头 + 数据行 -> 行记录（跳过全空行）
fn rows_to_records<I>(headers: &[String], rows: I) -> Vec<HashMap<String, String>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut records = Vec::new();
    for values in rows {
        let mut row_map = HashMap::new();
        for (col_idx, value) in values.into_iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if !header.is_empty() {
                    row_map.insert(header.clone(), value);
                }
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(row_map);
    }
    records
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn open(&self, path: &Path, has_headers: bool) -> ImportResult<csv::Reader<File>> {
        ensure_exists(path)?;

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        Ok(ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true) // 允许行长度不一致
            .from_reader(file))
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        let mut reader = self.open(file_path, true)?;

        let headers: Vec<String> = reader.headers()?.iter().map(clean_cell).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(clean_cell).collect::<Vec<_>>());
        }

        let records = rows_to_records(&headers, rows);
        debug!(path = %file_path.display(), rows = records.len(), "CSV 解析完成");
        Ok(records)
    }

    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        let mut reader = self.open(file_path, false)?;

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(clean_cell).collect();
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            grid.push(row);
        }
        Ok(grid)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 读取第一个工作表
    fn first_sheet(&self, path: &Path) -> ImportResult<Range<Data>> {
        ensure_exists(path)?;

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        Ok(workbook.worksheet_range(&sheet_name)?)
    }

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            other => clean_cell(&other.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        let range = self.first_sheet(file_path)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptyFile(file_path.display().to_string()))?;
        let headers: Vec<String> = header_row.iter().map(Self::cell_text).collect();

        let records = rows_to_records(
            &headers,
            rows.map(|row| row.iter().map(Self::cell_text).collect::<Vec<_>>()),
        );
        debug!(path = %file_path.display(), rows = records.len(), "Excel 解析完成");
        Ok(records)
    }

    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        let range = self.first_sheet(file_path)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(Self::cell_text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|v| !v.is_empty()))
            .collect())
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn select(path: &Path) -> ImportResult<Box<dyn FileParser>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xls" => Ok(Box::new(ExcelParser)),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        Self::select(file_path)?.parse_to_raw_records(file_path)
    }

    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        Self::select(file_path)?.parse_to_grid(file_path)
    }
}
