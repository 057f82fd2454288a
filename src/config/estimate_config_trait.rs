// ==========================================
// 土方工程量估算 - 估算配置读取 Trait
// ==========================================
// 职责: 定义计算引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含计算逻辑
// ==========================================

use crate::domain::types::{CalculationType, ValidationMode};

// ==========================================
// EstimateConfigReader Trait
// ==========================================
// 实现者: ConfigManager（键值配置）
// 约定: 配置缺失或无法解析时返回默认值，不报错
pub trait EstimateConfigReader: Send + Sync {
    // ===== 校验 =====

    /// 校验容差（m）
    ///
    /// # 默认值
    /// - 0.01
    fn get_validation_tolerance_m(&self) -> f64;

    /// 校验模式
    ///
    /// # 默认值
    /// - TOTAL_ONLY
    fn get_validation_mode(&self) -> ValidationMode;

    // ===== 柱状图 =====

    /// # 默认值
    /// - TYPE1
    fn get_calculation_type(&self) -> CalculationType;

    // ===== 区段默认值 =====

    /// 首行固定层厚
    ///
    /// # 默认值
    /// - 5.0
    fn get_first_row_thickness_m(&self) -> f64;

    /// 原地面高程（默认 28.05）
    fn get_original_ground_level_m(&self) -> f64;

    /// 开挖底高程（默认 0.56）
    fn get_excavation_level_m(&self) -> f64;

    /// 斜面第二级开挖底高程（默认 1.76）
    fn get_slope_second_level_m(&self) -> f64;

    /// 平面默认面积（默认 213.23）
    fn get_plane_area_m2(&self) -> f64;

    /// 斜面默认面积（默认 18.01）
    fn get_slope_area_m2(&self) -> f64;

    fn get_application_rate_pct(&self) -> f64;

    fn get_slope_second_phase_rate_pct(&self) -> f64;
}
