//! 类型绑定与工厂绑定的描述
//!
//! [`ServiceType`] 描述一个可构造的类型，[`Callable`] 描述一个工厂函数。
//! 两者都携带一份依赖声明 [`DependencyList`]，依赖名称只计算一次并在
//! 所有克隆之间共享。

use crate::component::{instance, Args, Constructible, Injectable, Instance};
use crate::errors::InjectResult;
use crate::metadata::TypeInfo;
use crate::signature;
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::sync::Arc;

/// 依赖声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependencies {
    /// 显式的有序依赖名称列表，原样使用
    Explicit(Vec<String>),
    /// 声明的签名文本，首次使用时解析出参数名
    Signature(Cow<'static, str>),
}

impl Dependencies {
    /// 无依赖
    pub fn none() -> Self {
        Self::Explicit(Vec::new())
    }

    /// 显式依赖列表
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(names.into_iter().map(Into::into).collect())
    }

    /// 由签名文本推断依赖
    pub fn signature(text: impl Into<Cow<'static, str>>) -> Self {
        Self::Signature(text.into())
    }
}

/// 带缓存的依赖列表
#[derive(Debug)]
pub struct DependencyList {
    declared: Dependencies,
    names: OnceCell<Vec<String>>,
}

impl DependencyList {
    /// 创建新的依赖列表
    pub fn new(declared: Dependencies) -> Self {
        Self {
            declared,
            names: OnceCell::new(),
        }
    }

    /// 有序的依赖名称
    pub fn names(&self) -> &[String] {
        self.names.get_or_init(|| match &self.declared {
            Dependencies::Explicit(names) => names.clone(),
            Dependencies::Signature(text) => signature::parse_parameters(text),
        })
    }

    /// 声明是否为显式列表
    pub fn is_explicit(&self) -> bool {
        matches!(self.declared, Dependencies::Explicit(_))
    }

    /// 原始声明
    pub fn declared(&self) -> &Dependencies {
        &self.declared
    }
}

/// 类型构造函数
pub type ConstructorFn = Arc<dyn Fn(&mut Args) -> InjectResult<Arc<dyn Injectable>> + Send + Sync>;

/// 工厂函数
pub type FactoryFn = Arc<dyn Fn(&mut Args) -> InjectResult<Instance> + Send + Sync>;

/// 可构造类型描述
#[derive(Clone)]
pub struct ServiceType {
    type_info: TypeInfo,
    dependencies: Arc<DependencyList>,
    constructor: ConstructorFn,
}

impl ServiceType {
    /// 从实现了 [`Constructible`] 的类型创建
    pub fn of<T: Constructible>() -> Self {
        Self::new::<T, _>(T::dependencies(), T::construct)
    }

    /// 使用自定义构造函数创建
    pub fn new<T, F>(dependencies: Dependencies, constructor: F) -> Self
    where
        T: Injectable,
        F: Fn(&mut Args) -> InjectResult<T> + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            dependencies: Arc::new(DependencyList::new(dependencies)),
            constructor: Arc::new(move |args: &mut Args| {
                let object = constructor(args)?;
                Ok(Arc::new(object) as Arc<dyn Injectable>)
            }),
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 类型的短名称
    pub fn name(&self) -> &str {
        &self.type_info.name
    }

    /// 构造函数依赖名称
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.names()
    }

    /// 依赖声明
    pub fn dependency_list(&self) -> &DependencyList {
        &self.dependencies
    }

    /// 使用解析好的参数构造实例
    pub fn construct(&self, args: &mut Args) -> InjectResult<Arc<dyn Injectable>> {
        (self.constructor)(args)
    }
}

impl std::fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceType")
            .field("type_info", &self.type_info)
            .field("dependencies", &self.dependencies)
            .field("constructor", &"<function>")
            .finish()
    }
}

/// 工厂函数描述
#[derive(Clone)]
pub struct Callable {
    name: Cow<'static, str>,
    dependencies: Arc<DependencyList>,
    func: FactoryFn,
}

impl Callable {
    /// 显式依赖列表形式：依赖名称在前，函数在后
    pub fn explicit<I, S, F>(names: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut Args) -> InjectResult<Instance> + Send + Sync + 'static,
    {
        Self::new(Dependencies::explicit(names), func)
    }

    /// 由签名文本推断依赖
    pub fn introspect<F>(signature: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&mut Args) -> InjectResult<Instance> + Send + Sync + 'static,
    {
        Self::new(Dependencies::signature(signature), func)
    }

    /// 使用任意依赖声明创建
    pub fn new<F>(dependencies: Dependencies, func: F) -> Self
    where
        F: Fn(&mut Args) -> InjectResult<Instance> + Send + Sync + 'static,
    {
        Self {
            name: Cow::Borrowed("<anonymous>"),
            dependencies: Arc::new(DependencyList::new(dependencies)),
            func: Arc::new(func),
        }
    }

    /// 返回固定值的无依赖工厂
    pub fn returning<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::new(Dependencies::none(), move |_| Ok(instance(value.clone())))
    }

    /// 设置诊断名称
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// 诊断名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 依赖名称
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.names()
    }

    /// 依赖声明
    pub fn dependency_list(&self) -> &DependencyList {
        &self.dependencies
    }

    /// 使用解析好的参数调用
    pub fn call(&self, args: &mut Args) -> InjectResult<Instance> {
        (self.func)(args)
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("func", &"<function>")
            .finish()
    }
}

/// 由带类型参数的闭包构建 [`Callable`]
///
/// 参数必须写成 `name: Arc<T>`。不带依赖列表时，依赖名称从闭包头的
/// 文本推断；以 `["a", "b"] =>` 开头时使用显式列表，参数名被忽略。
/// 无参数闭包 `|| expr` 生成无依赖的工厂。
///
/// ```rust
/// use inject_common::inject_fn;
/// use std::sync::Arc;
///
/// let add = inject_fn!(|left: Arc<i32>, right: Arc<i32>| *left + *right);
/// assert_eq!(add.dependencies(), ["left", "right"]);
///
/// let renamed = inject_fn!(["base", "offset"] => |a: Arc<i32>, b: Arc<i32>| *a + *b);
/// assert_eq!(renamed.dependencies(), ["base", "offset"]);
///
/// let constant = inject_fn!(|| 42_i32);
/// assert!(constant.dependencies().is_empty());
/// ```
#[macro_export]
macro_rules! inject_fn {
    ([$($dep:expr),* $(,)?] => |$($arg:ident : Arc<$ty:ty>),* $(,)?| $body:expr) => {
        $crate::Callable::explicit(
            ::std::vec![$(::std::string::String::from($dep)),*],
            $crate::inject_fn!(@body |$($arg : $ty),*| $body),
        )
    };
    (|$($arg:ident : Arc<$ty:ty>),* $(,)?| $body:expr) => {
        $crate::Callable::introspect(
            ::std::stringify!(|$($arg : Arc<$ty>),*|),
            $crate::inject_fn!(@body |$($arg : $ty),*| $body),
        )
    };
    (|| $body:expr) => {
        $crate::Callable::new(
            $crate::Dependencies::none(),
            move |_: &mut $crate::Args| -> $crate::InjectResult<$crate::Instance> {
                ::std::result::Result::Ok($crate::instance($body))
            },
        )
    };
    (@body |$($arg:ident : $ty:ty),*| $body:expr) => {
        move |args: &mut $crate::Args| -> $crate::InjectResult<$crate::Instance> {
            $(
                #[allow(non_snake_case)]
                let $arg: ::std::sync::Arc<$ty> = args.next::<$ty>()?;
            )*
            let _ = &args;
            ::std::result::Result::Ok($crate::instance($body))
        }
    };
}
