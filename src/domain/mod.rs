// ==========================================
// 土方工程量估算 - 领域模型层
// ==========================================
// 职责: 定义岩层、层厚剖面、区段、清单行与汇总等值对象
// 红线: 不含解析逻辑,不含引擎逻辑
// ==========================================

pub mod error;
pub mod geology;
pub mod import;
pub mod profile;
pub mod section;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use error::{EstimateError, EstimateResult};
pub use geology::{
    BoreholeRecord, BoreholeRowSum, ColumnAverages, GeologicalColumn, GeologicalSummary,
    GroundLevelSurvey,
};
pub use import::{BoreholeImport, DqLevel, DqViolation, GroundLevelImport, ImportBatch};
pub use profile::{LayerThickness, ModifiedThicknessReport, ThicknessProfile};
pub use section::{
    next_section_name, AllocationRow, ExcavationTarget, LayoutDefaults, RowSplit, RowTemplate,
    Section,
};
pub use summary::{EstimateSummary, SummaryEntry, SummaryKey, TerrainSummary};
pub use types::{CalculationType, ItemKind, RockLayer, TerrainType, ValidationMode, WorkType};
