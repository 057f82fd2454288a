// ==========================================
// 土方工程量估算 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: 内存键值表（可由 JSON 文件加载）
// ==========================================

use crate::config::estimate_config_trait::EstimateConfigReader;
use crate::config::settings::EstimateSettings;
use crate::domain::types::{CalculationType, ValidationMode};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置格式错误: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: RwLock<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// 从 JSON 文本加载
    ///
    /// # 参数
    /// - json_text: 形如 {"key": "value"} 的 JSON 对象；数值/布尔值按文本保存
    pub fn from_json_str(json_text: &str) -> ConfigResult<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json_text)?;
        let values = raw
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self::from_map(values))
    }

    /// 从 JSON 文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let manager = Self::from_json_str(&text)?;
        debug!(path = %path.as_ref().display(), "配置文件已加载");
        Ok(manager)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// 写入配置值（覆盖已有值）
    pub fn set_config_value(&self, key: &str, value: impl Into<String>) {
        self.write().insert(key.to_string(), value.into());
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// 读取数值配置；无法解析或非有限值时使用默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> f64 {
        let Some(raw) = self.get_config_value(key) else {
            return default;
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                warn!(config_key = key, raw_value = %raw, default, "数值配置格式错误，使用默认值");
                default
            }
        }
    }

    /// 获取所有配置的快照（JSON格式，键有序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let ordered: std::collections::BTreeMap<String, String> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(serde_json::to_string(&json!(ordered))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名配置；`__meta_` 前缀的元信息不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut values = self.write();
        let mut count = 0;
        for (key, value) in config_map {
            if key.starts_with("__meta_") {
                continue;
            }
            values.insert(key, value);
            count += 1;
        }

        Ok(count)
    }

    /// 生成估算参数
    pub fn load_settings(&self) -> EstimateSettings {
        EstimateSettings::from_reader(self)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// EstimateConfigReader Trait 实现
// ==========================================
impl EstimateConfigReader for ConfigManager {
    // ===== 校验 =====

    fn get_validation_tolerance_m(&self) -> f64 {
        let value = self.get_f64_or_default(config_keys::VALIDATION_TOLERANCE_M, 0.01);
        if value < 0.0 {
            warn!(value, "校验容差为负，使用默认值");
            return 0.01;
        }
        value
    }

    fn get_validation_mode(&self) -> ValidationMode {
        let value = self.get_config_or_default(config_keys::VALIDATION_MODE, "TOTAL_ONLY");
        ValidationMode::parse(&value).unwrap_or_else(|| {
            warn!(raw_value = %value, "校验模式配置无效，使用 TOTAL_ONLY");
            ValidationMode::TotalOnly
        })
    }

    // ===== 柱状图 =====

    fn get_calculation_type(&self) -> CalculationType {
        let value = self.get_config_or_default(config_keys::CALCULATION_TYPE, "TYPE1");
        CalculationType::parse(&value).unwrap_or_else(|| {
            warn!(raw_value = %value, "计算类型配置无效，使用 TYPE1");
            CalculationType::Type1
        })
    }

    // ===== 区段默认值 =====

    fn get_first_row_thickness_m(&self) -> f64 {
        self.get_f64_or_default(config_keys::FIRST_ROW_THICKNESS_M, 5.0)
    }

    fn get_original_ground_level_m(&self) -> f64 {
        self.get_f64_or_default(config_keys::ORIGINAL_GROUND_LEVEL_M, 28.05)
    }

    fn get_excavation_level_m(&self) -> f64 {
        self.get_f64_or_default(config_keys::EXCAVATION_LEVEL_M, 0.56)
    }

    fn get_slope_second_level_m(&self) -> f64 {
        self.get_f64_or_default(config_keys::SLOPE_SECOND_LEVEL_M, 1.76)
    }

    fn get_plane_area_m2(&self) -> f64 {
        self.get_f64_or_default(config_keys::PLANE_AREA_M2, 213.23)
    }

    fn get_slope_area_m2(&self) -> f64 {
        self.get_f64_or_default(config_keys::SLOPE_AREA_M2, 18.01)
    }

    fn get_application_rate_pct(&self) -> f64 {
        self.get_f64_or_default(config_keys::APPLICATION_RATE_PCT, 100.0)
    }

    fn get_slope_second_phase_rate_pct(&self) -> f64 {
        self.get_f64_or_default(config_keys::SLOPE_SECOND_PHASE_RATE_PCT, 50.0)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 校验
    pub const VALIDATION_TOLERANCE_M: &str = "validation_tolerance_m";
    pub const VALIDATION_MODE: &str = "validation_mode";

    // 柱状图
    pub const CALCULATION_TYPE: &str = "calculation_type";

    // 区段默认值
    pub const FIRST_ROW_THICKNESS_M: &str = "first_row_thickness_m";
    pub const ORIGINAL_GROUND_LEVEL_M: &str = "original_ground_level_m";
    pub const EXCAVATION_LEVEL_M: &str = "excavation_level_m";
    pub const SLOPE_SECOND_LEVEL_M: &str = "slope_second_level_m";
    pub const PLANE_AREA_M2: &str = "plane_area_m2";
    pub const SLOPE_AREA_M2: &str = "slope_area_m2";

    // 适用率
    pub const APPLICATION_RATE_PCT: &str = "application_rate_pct";
    pub const SLOPE_SECOND_PHASE_RATE_PCT: &str = "slope_second_phase_rate_pct";
}
