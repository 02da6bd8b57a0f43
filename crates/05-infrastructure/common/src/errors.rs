//! 错误类型定义

use thiserror::Error;

/// 依赖注入错误类型
///
/// 解析算法自身只会产生 [`InjectError::CircularReference`] 和
/// [`InjectError::NotRegistered`] 两类失败，其余变体来自绑定约定被违反
/// 或用户构造代码的失败。
#[derive(Error, Debug)]
pub enum InjectError {
    #[error("inject: '{name}' has circular reference")]
    CircularReference {
        name: String,
        /// 检测到循环时的解析链（最后一个元素为重复的名称）
        chain: Vec<String>,
    },

    #[error("inject: '{name}' is not registered")]
    NotRegistered { name: String },

    #[error("inject: '{name}' is not of type {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("inject: '{target}' has no argument at position {index}")]
    MissingArgument { target: String, index: usize },

    #[error("inject: '{type_name}' has no injectable property '{key}'")]
    UnknownProperty { type_name: String, key: String },

    #[error("inject: '{type_name}' has no post-construct method '{method}'")]
    UnknownMethod { type_name: String, method: String },

    #[error("inject: no injector factory installed")]
    NoInjectorFactory,

    #[error("inject: construction of '{target}' failed: {source}")]
    ConstructionFailed {
        target: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl InjectError {
    /// 创建未注册错误
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::NotRegistered { name: name.into() }
    }

    /// 创建未知属性错误
    pub fn unknown_property(type_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            key: key.into(),
        }
    }

    /// 创建未知方法错误
    pub fn unknown_method(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// 包装用户构造代码产生的错误
    pub fn construction_failed<E>(target: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ConstructionFailed {
            target: target.into(),
            source: source.into(),
        }
    }

    /// 是否为解析算法本身产生的失败（循环引用或未注册）
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::CircularReference { .. } | Self::NotRegistered { .. }
        )
    }

    /// 失败涉及的依赖名称
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::CircularReference { name, .. }
            | Self::NotRegistered { name }
            | Self::TypeMismatch { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// 容器启动错误类型
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("配置加载失败: {source}")]
    ConfigLoad {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("日志初始化失败: {message}")]
    Logging { message: String },

    #[error("注册模块执行失败: {module}, 原因: {source}")]
    Registration {
        module: String,
        #[source]
        source: InjectError,
    },

    #[error("依赖注入错误: {source}")]
    Inject {
        #[from]
        source: InjectError,
    },
}

/// 结果类型别名
pub type InjectResult<T> = Result<T, InjectError>;
pub type BootstrapResult<T> = Result<T, BootstrapError>;
