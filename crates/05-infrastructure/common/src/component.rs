//! 组件基础接口定义
//!
//! 提供实例表示、可注入组件 trait 以及构造参数容器

use crate::errors::{InjectError, InjectResult};
use crate::factory::Dependencies;
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// 已解析的实例
///
/// 容器中的所有值都以共享指针保存，缓存命中时返回同一个指针
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 调用方提供的本地依赖，仅在名称未注册时查询
pub type Locals = HashMap<String, Instance>;

/// 将值包装为实例
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
    Arc::new(value)
}

/// 将实例还原为具体类型
pub fn downcast<T: Any + Send + Sync>(name: &str, instance: Instance) -> InjectResult<Arc<T>> {
    instance.downcast::<T>().map_err(|_| InjectError::TypeMismatch {
        name: name.to_string(),
        expected: std::any::type_name::<T>(),
    })
}

/// 由 `Arc<Self>` 转换为共享实例
///
/// 对所有 `Any + Send + Sync` 类型自动实现，使 `Arc<dyn Injectable>`
/// 可以在不复制对象的情况下转为 [`Instance`]，两者指向同一份数据
pub trait IntoInstance {
    fn into_instance(self: Arc<Self>) -> Instance;
}

impl<T: Any + Send + Sync> IntoInstance for T {
    fn into_instance(self: Arc<Self>) -> Instance {
        self
    }
}

/// 可注入组件 trait
///
/// 由类型绑定构造出的对象先写入缓存，再经历属性注入和构造后回调，
/// 因此两个方法都通过共享引用调用，需要写入的字段使用内部可变性
/// （例如 `OnceCell`）。默认实现拒绝所有属性和方法，只有声明了对应
/// 元数据的类型才需要覆盖。
pub trait Injectable: IntoInstance + Send + Sync + 'static {
    /// 注入一个属性
    fn inject_property(&self, key: &str, _value: Instance) -> InjectResult<()> {
        Err(InjectError::unknown_property(
            std::any::type_name::<Self>(),
            key,
        ))
    }

    /// 执行构造后回调
    fn post_construct(&self, method: &str) -> InjectResult<()> {
        Err(InjectError::unknown_method(
            std::any::type_name::<Self>(),
            method,
        ))
    }
}

/// 可构造组件 trait
///
/// 声明构造依赖并从解析好的参数中构建自身
pub trait Constructible: Injectable + Sized {
    /// 构造函数依赖声明
    fn dependencies() -> Dependencies;

    /// 使用解析好的参数创建实例
    fn construct(args: &mut Args) -> InjectResult<Self>;
}

/// 构造参数
///
/// 按声明顺序保存已解析的依赖，以及 `invoke` 时绑定的接收者
#[derive(Clone)]
pub struct Args {
    target: String,
    values: VecDeque<(String, Instance)>,
    this: Option<Instance>,
    position: usize,
}

impl Args {
    /// 创建新的参数列表
    pub fn new(
        target: impl Into<String>,
        values: Vec<(String, Instance)>,
        this: Option<Instance>,
    ) -> Self {
        Self {
            target: target.into(),
            values: values.into(),
            this,
            position: 0,
        }
    }

    /// 取出下一个参数并还原为具体类型
    pub fn next<T: Any + Send + Sync>(&mut self) -> InjectResult<Arc<T>> {
        let (name, value) = self.pop()?;
        downcast::<T>(&name, value)
    }

    /// 取出下一个参数，不做类型还原
    pub fn next_instance(&mut self) -> InjectResult<Instance> {
        self.pop().map(|(_, value)| value)
    }

    /// 绑定的接收者
    pub fn this<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.this.clone().and_then(|this| this.downcast::<T>().ok())
    }

    /// 绑定的接收者（原始实例）
    pub fn this_instance(&self) -> Option<&Instance> {
        self.this.as_ref()
    }

    /// 正在构造的目标名称
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 剩余参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有剩余参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn pop(&mut self) -> InjectResult<(String, Instance)> {
        let index = self.position;
        let entry = self
            .values
            .pop_front()
            .ok_or_else(|| InjectError::MissingArgument {
                target: self.target.clone(),
                index,
            })?;
        self.position += 1;
        Ok(entry)
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("target", &self.target)
            .field(
                "names",
                &self.values.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("has_this", &self.this.is_some())
            .finish()
    }
}
