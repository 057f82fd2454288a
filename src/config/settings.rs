// ==========================================
// 土方工程量估算 - 估算参数
// ==========================================
// 职责: 计算引擎使用的默认值与参数集合
// 来源: ConfigManager::load_settings()，或直接使用 Default
// ==========================================

use crate::config::estimate_config_trait::EstimateConfigReader;
use crate::domain::section::LayoutDefaults;
use crate::domain::types::{CalculationType, TerrainType, ValidationMode};
use serde::{Deserialize, Serialize};

// ==========================================
// EstimateSettings - 估算参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSettings {
    // ===== 校验 =====
    pub validation_tolerance_m: f64,
    pub validation_mode: ValidationMode,

    // ===== 柱状图 =====
    pub calculation_type: CalculationType,

    // ===== 区段默认值 =====
    pub first_row_thickness_m: f64,
    pub original_ground_level_m: f64,     // 원지반고 EL
    pub excavation_level_m: f64,          // 터파기고（平面 / 斜面第一级）
    pub slope_second_level_m: f64,        // 斜面第二级开挖底高程
    pub plane_area_m2: f64,
    pub slope_area_m2: f64,
    pub application_rate_pct: f64,
    pub slope_second_phase_rate_pct: f64,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            validation_tolerance_m: 0.01,
            validation_mode: ValidationMode::TotalOnly,
            calculation_type: CalculationType::Type1,
            first_row_thickness_m: 5.0,
            original_ground_level_m: 28.05,
            excavation_level_m: 0.56,
            slope_second_level_m: 1.76,
            plane_area_m2: 213.23,
            slope_area_m2: 18.01,
            application_rate_pct: 100.0,
            slope_second_phase_rate_pct: 50.0,
        }
    }
}

impl EstimateSettings {
    /// 从配置读取器生成（缺失项由读取器回退为默认值）
    pub fn from_reader<R: EstimateConfigReader + ?Sized>(reader: &R) -> Self {
        Self {
            validation_tolerance_m: reader.get_validation_tolerance_m(),
            validation_mode: reader.get_validation_mode(),
            calculation_type: reader.get_calculation_type(),
            first_row_thickness_m: reader.get_first_row_thickness_m(),
            original_ground_level_m: reader.get_original_ground_level_m(),
            excavation_level_m: reader.get_excavation_level_m(),
            slope_second_level_m: reader.get_slope_second_level_m(),
            plane_area_m2: reader.get_plane_area_m2(),
            slope_area_m2: reader.get_slope_area_m2(),
            application_rate_pct: reader.get_application_rate_pct(),
            slope_second_phase_rate_pct: reader.get_slope_second_phase_rate_pct(),
        }
    }

    /// 默认行布局参数
    pub fn layout_defaults(&self) -> LayoutDefaults {
        LayoutDefaults {
            first_row_thickness_m: self.first_row_thickness_m,
            application_rate_pct: self.application_rate_pct,
            second_phase_rate_pct: self.slope_second_phase_rate_pct,
        }
    }

    pub fn default_area_m2(&self, terrain: TerrainType) -> f64 {
        match terrain {
            TerrainType::Plane => self.plane_area_m2,
            TerrainType::Slope => self.slope_area_m2,
        }
    }

    /// 默认开挖底高程（平面一级，斜面两级）
    pub fn default_excavation_levels_m(&self, terrain: TerrainType) -> Vec<f64> {
        match terrain {
            TerrainType::Plane => vec![self.excavation_level_m],
            TerrainType::Slope => vec![self.excavation_level_m, self.slope_second_level_m],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EstimateSettings::default();
        assert_eq!(settings.default_area_m2(TerrainType::Plane), 213.23);
        assert_eq!(settings.default_area_m2(TerrainType::Slope), 18.01);
        assert_eq!(settings.default_excavation_levels_m(TerrainType::Slope), vec![0.56, 1.76]);
        assert_eq!(settings.layout_defaults(), LayoutDefaults::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: EstimateSettings =
            serde_json::from_str(r#"{"first_row_thickness_m": 4.5, "calculation_type": "TYPE2"}"#).unwrap();
        assert_eq!(settings.first_row_thickness_m, 4.5);
        assert_eq!(settings.calculation_type, CalculationType::Type2);
        assert_eq!(settings.plane_area_m2, 213.23);
    }
}
