//! 依赖注入容器抽象接口
//!
//! 提供容器的核心抽象，具体实现通过注册表的工厂钩子提供

use crate::registry::Registry;
use inject_common::{downcast, Callable, InjectResult, Instance, Locals, ServiceType};
use std::any::Any;
use std::sync::Arc;

/// 依赖注入容器 trait
///
/// 一个实例即一个容器，拥有独立的实例缓存
pub trait Inject: Send + Sync {
    /// 解析指定名称的依赖
    fn get(&self, name: &str) -> InjectResult<Instance>;

    /// 名称是否已缓存或已注册，不会触发解析
    fn has(&self, name: &str) -> bool;

    /// 解析可调用对象的依赖并调用，结果不缓存
    fn invoke(
        &self,
        callable: &Callable,
        this: Option<Instance>,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance>;

    /// 构造类型实例并完成属性注入和构造后回调，结果不缓存
    fn instantiate(&self, service_type: &ServiceType, locals: Option<&Locals>)
        -> InjectResult<Instance>;
}

/// 容器的类型化辅助方法
pub trait InjectExt: Inject {
    /// 解析并还原为具体类型
    fn get_as<T: Any + Send + Sync>(&self, name: &str) -> InjectResult<Arc<T>> {
        downcast(name, self.get(name)?)
    }

    /// 调用并还原返回值类型
    fn invoke_as<T: Any + Send + Sync>(
        &self,
        callable: &Callable,
        this: Option<Instance>,
        locals: Option<&Locals>,
    ) -> InjectResult<Arc<T>> {
        downcast(callable.name(), self.invoke(callable, this, locals)?)
    }

    /// 构造并还原为具体类型
    fn instantiate_as<T: Any + Send + Sync>(
        &self,
        service_type: &ServiceType,
        locals: Option<&Locals>,
    ) -> InjectResult<Arc<T>> {
        downcast(service_type.name(), self.instantiate(service_type, locals)?)
    }
}

impl<I: Inject + ?Sized> InjectExt for I {}

/// 容器工厂
///
/// 注册表不依赖具体容器实现，由实现方在加载时安装工厂
pub type InjectorFactory = Arc<dyn Fn(Arc<Registry>) -> Box<dyn Inject> + Send + Sync>;
