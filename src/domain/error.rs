// ==========================================
// 土方工程量估算 - 计算层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 范围: 仅边界前置条件违反（录入错误）
// 说明: 数值异常（无法解析/缺失）就地按 0 处理，不进入此类型；
//       分配合计不一致由校验器以通过/不通过报告，也不进入此类型
// ==========================================

use crate::domain::types::RockLayer;
use thiserror::Error;

/// 计算层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    // ===== 区段输入 =====
    #[error("面积无效 (区段 {section}): {value} m²，必须为非负有限值")]
    InvalidArea { section: String, value: f64 },

    #[error("开挖深度无效 (第 {phase} 阶段): {value} m，必须为非负有限值")]
    InvalidTargetDepth { phase: usize, value: f64 },

    #[error("开挖深度列表为空")]
    EmptyTargets,

    #[error("行布局为空，无法分配")]
    EmptyLayout,

    // ===== 行输入 =====
    #[error("适用率超出范围 (行 {row}): {value}%，有效范围 [0, 100]")]
    InvalidApplicationRate { row: usize, value: f64 },

    #[error("手动层厚无效 (行 {row}): {value} m，必须为非负有限值")]
    InvalidManualThickness { row: usize, value: f64 },

    #[error("行 {row} 的阶段序号 {phase} 超出开挖深度数量 {phases}")]
    PhaseOutOfRange {
        row: usize,
        phase: usize,
        phases: usize,
    },

    #[error("区段 {section} 不存在第 {row} 行")]
    RowNotFound { section: String, row: usize },

    // ===== 层厚剖面 =====
    #[error("层厚无效 ({layer}): {value} m，必须为非负有限值")]
    InvalidProfileThickness { layer: RockLayer, value: f64 },

    #[error("层厚剖面中岩层重复: {0}")]
    DuplicateLayer(RockLayer),
}

/// Result 类型别名
pub type EstimateResult<T> = Result<T, EstimateError>;

/// 校验非负有限值（面积、深度、层厚共用）
pub(crate) fn is_non_negative_finite(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
