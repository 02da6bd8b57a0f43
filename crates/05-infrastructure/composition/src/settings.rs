//! 容器设置
//!
//! 从可选的 TOML 文件和 `INJECT__*` 环境变量加载，缺省时使用默认值。
//!
//! ```toml
//! naming = "snake_case"
//!
//! [logging]
//! enabled = true
//! level = "debug"
//! json = false
//! ```

use crate::logging::LoggingConfig;
use config::{Config, Environment, File, FileFormat};
use inject_common::{BootstrapError, BootstrapResult, NamingPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "INJECT";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 容器设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 按类型注册时的命名约定
    pub naming: NamingPolicy,
    /// 日志设置
    pub logging: LoggingSettings,
}

/// 日志设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 是否由构建器初始化日志
    pub enabled: bool,
    /// 日志级别
    pub level: String,
    /// 是否输出 JSON
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            json: false,
            show_target: true,
        }
    }
}

impl LoggingSettings {
    /// 转换为日志配置
    pub fn to_logging_config(&self) -> BootstrapResult<LoggingConfig> {
        let level =
            tracing::Level::from_str(&self.level).map_err(|e| BootstrapError::Logging {
                message: format!("无效的日志级别 '{}': {}", self.level, e),
            })?;

        Ok(LoggingConfig {
            level,
            show_target: self.show_target,
            json_format: self.json,
            ..LoggingConfig::default()
        })
    }
}

impl ContainerSettings {
    /// 从可选的配置文件和进程环境变量加载
    ///
    /// 文件不存在时忽略，环境变量覆盖文件中的值
    pub fn load(path: Option<&Path>) -> BootstrapResult<Self> {
        Self::load_with(path, default_environment())
    }

    /// 使用指定的环境变量源加载
    pub fn load_with(path: Option<&Path>, environment: Environment) -> BootstrapResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("加载容器设置文件: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Self = builder
            .add_source(environment)
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        debug!("容器设置: {:?}", settings);
        Ok(settings)
    }

    /// 从 TOML 文本加载，不读取环境变量
    pub fn from_toml_str(text: &str) -> BootstrapResult<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }
}

/// 进程环境变量源：`INJECT__NAMING`、`INJECT__LOGGING__LEVEL` 等
pub fn default_environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn config_error(error: config::ConfigError) -> BootstrapError {
    BootstrapError::ConfigLoad {
        source: Box::new(error),
    }
}
