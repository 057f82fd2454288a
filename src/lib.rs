// ==========================================
// 土方工程量估算 - 核心库
// ==========================================
// 流程: 柱状图导入 -> 修正层厚 -> 开挖深度分配 -> 体积 -> 汇总
// 系统定位: 计算库 (区段编辑由调用方负责)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 引擎层 - 计算规则
pub mod engine;

// 导入层 - 柱状图 / 平均地面高程文件
pub mod importer;

// 配置层 - 估算参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CalculationType, ItemKind, RockLayer, TerrainType, ValidationMode, WorkType,
};

// 领域值对象
pub use domain::{
    AllocationRow, BoreholeRecord, EstimateError, EstimateResult, EstimateSummary,
    ExcavationTarget, GeologicalSummary, GroundLevelSurvey, ModifiedThicknessReport, RowSplit,
    Section, ThicknessProfile,
};

// 引擎
pub use engine::{
    DepthAllocator, EarthworkEstimator, EstimateInput, EstimateReport, GeologicalAggregator,
    RecalcEngine, SectionChange, SectionInput, ThicknessValidator, VolumeCalculator,
};

// 导入与配置
pub use config::{ConfigManager, EstimateSettings};
pub use importer::{BoreholeImporter, ImportError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "土方工程量估算";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
