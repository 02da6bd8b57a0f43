//! # Inject Common
//!
//! 这个 crate 提供了 Lorn Inject 容器的公共数据模型和工具。
//!
//! ## 核心组件
//!
//! - [`Instance`] / [`Locals`] - 已解析实例与本地依赖
//! - [`Injectable`] / [`Constructible`] - 可注入组件 trait
//! - [`ServiceType`] / [`Callable`] - 类型绑定与工厂绑定描述
//! - [`Binding`] - 绑定元数据
//! - [`NamingPolicy`] - 命名约定
//! - [`signature`] - 签名内省
//!
//! ## 设计原则
//!
//! - 绑定按名称查找，类型只用于属性注入和构造后回调的元数据
//! - 显式依赖列表总是优先于签名推断
//! - 解析失败只有循环引用和未注册两类

pub mod component;
pub mod conventions;
pub mod errors;
pub mod factory;
pub mod metadata;
pub mod signature;

pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use factory::*;
pub use metadata::*;
