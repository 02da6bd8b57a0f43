//! 注册模块
//!
//! 一个模块是一组命名的注册调用，在加载阶段由构建器按添加顺序执行

use inject_common::InjectResult;
use inject_registry::Registry;

/// 注册模块 trait
pub trait RegistrationModule: Send + Sync {
    /// 模块名称，用于日志和错误报告
    fn name(&self) -> &str;

    /// 向注册表写入绑定和元数据
    fn register(&self, registry: &Registry) -> InjectResult<()>;
}

/// 由闭包实现的注册模块
pub struct FnModule<F> {
    name: String,
    register: F,
}

impl<F> FnModule<F>
where
    F: Fn(&Registry) -> InjectResult<()> + Send + Sync,
{
    /// 创建新的闭包模块
    pub fn new(name: impl Into<String>, register: F) -> Self {
        Self {
            name: name.into(),
            register,
        }
    }
}

impl<F> RegistrationModule for FnModule<F>
where
    F: Fn(&Registry) -> InjectResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, registry: &Registry) -> InjectResult<()> {
        (self.register)(registry)
    }
}

impl<F> std::fmt::Debug for FnModule<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModule").field("name", &self.name).finish()
    }
}
