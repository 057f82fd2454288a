// ==========================================
// 土方工程量估算 - 配置层
// ==========================================
// 职责: 估算默认值与参数管理,支持键值覆写
// 存储: 内存键值表 / JSON 文件
// ==========================================

pub mod config_manager;
pub mod estimate_config_trait;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use estimate_config_trait::EstimateConfigReader;
pub use settings::EstimateSettings;
