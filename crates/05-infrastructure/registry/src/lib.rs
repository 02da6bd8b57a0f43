//! # Inject Registry
//!
//! 绑定注册表与容器抽象层。
//!
//! ## 核心接口
//!
//! - [`Registry`] - 绑定注册表，记录名称绑定、属性注入和构造后回调
//! - [`Inject`] - 容器接口
//! - [`InjectExt`] - 容器的类型化辅助方法
//! - [`InjectorFactory`] - 容器工厂钩子

pub mod container;
pub mod registry;

pub use container::*;
pub use registry::*;
