// ==========================================
// 土方工程量估算 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 宽松数值解析
// ==========================================

use crate::importer::borehole_importer_trait::{DataCleaner as DataCleanerTrait, NumericCell};

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim_start_matches('\u{feff}').trim().to_string()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = self.clean_text(v);
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    fn parse_lenient_f64(&self, value: &str) -> NumericCell {
        let text = self.clean_text(value);
        if text.is_empty() {
            return NumericCell::Missing;
        }

        if let Ok(parsed) = text.parse::<f64>() {
            return if parsed.is_finite() {
                NumericCell::Exact(parsed)
            } else {
                NumericCell::Invalid
            };
        }

        match leading_number(&text).and_then(|prefix| prefix.parse::<f64>().ok()) {
            Some(parsed) if parsed.is_finite() => NumericCell::Prefix(parsed),
            _ => NumericCell::Invalid,
        }
    }
}

/// 截取前导数值部分（符号、数字、一个小数点、指数）
fn leading_number(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // 指数部分（仅在完整时保留）
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    Some(&text[..end])
}
