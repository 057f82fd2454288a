// ==========================================
// 土方工程量估算 - 引擎层
// ==========================================
// 职责: 实现计算规则引擎,不做文件 I/O
// 红线: 引擎无状态，输入不变则输出不变
// ==========================================

pub mod aggregator;
pub mod allocator;
pub mod orchestrator;
pub mod recalc;
pub mod validator;
pub mod volume;

// 重导出核心引擎
pub use aggregator::GeologicalAggregator;
pub use allocator::{AllocationOutcome, DepthAllocator, PhaseAllocation};
pub use orchestrator::{EarthworkEstimator, EstimateInput, EstimateReport, SectionInput};
pub use recalc::{RecalcEngine, SectionChange};
pub use validator::{LayerCheck, PhaseValidation, SectionValidation, ThicknessValidator};
pub use volume::VolumeCalculator;
