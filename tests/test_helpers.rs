// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的钻孔记录、层厚剖面、区段与临时文件
// ==========================================

#![allow(dead_code)]

use earthwork_estimator::domain::geology::BoreholeRecord;
use earthwork_estimator::domain::profile::ThicknessProfile;
use earthwork_estimator::domain::section::{LayoutDefaults, RowTemplate, Section};
use earthwork_estimator::domain::types::TerrainType;
use earthwork_estimator::engine::{DepthAllocator, VolumeCalculator};
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

pub const EPS: f64 = 1e-9;

/// 典型层厚剖面: 매립토 21.475 / 풍화암 0.75 / 연암 7.8
pub fn scenario_profile() -> ThicknessProfile {
    ThicknessProfile::three_layer(21.475, 0.75, 7.8).expect("创建层厚剖面失败")
}

/// 创建钻孔记录
pub fn borehole(
    name: &str,
    ground_level_m: f64,
    landfill_m: f64,
    weathered_soil_m: f64,
    weathered_rock_m: f64,
    soft_rock_m: f64,
) -> BoreholeRecord {
    BoreholeRecord {
        name: name.to_string(),
        ground_level_m,
        landfill_m,
        weathered_soil_m,
        weathered_rock_m,
        soft_rock_m,
        hard_rock_m: 0.0,
    }
}

/// 单孔柱状图，地面高程 28.0 时修正层厚恰为典型剖面
pub fn scenario_boreholes() -> Vec<BoreholeRecord> {
    vec![borehole("BH-1", 28.0, 20.0, 1.475, 0.75, 7.8)]
}

/// 创建已分配、已计算体积的区段
///
/// # 参数
/// - name: 区段名（p-1 / s-1）
/// - levels: 各阶段开挖底高程
pub fn allocated_section(
    name: &str,
    terrain: TerrainType,
    area_m2: f64,
    original_ground_level_m: f64,
    levels: Vec<f64>,
    profile: &ThicknessProfile,
) -> Section {
    let layout = RowTemplate::default_layout(terrain, &LayoutDefaults::default());
    let section = Section::new(name, terrain, area_m2, original_ground_level_m, levels, &layout)
        .expect("创建区段失败");
    let section = DepthAllocator::new()
        .allocate_section(&section, profile, None)
        .expect("分配失败");
    VolumeCalculator::new().apply_to_section(&section)
}

/// 写入临时 CSV 文件（扩展名 .csv）
pub fn write_temp_csv(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
