//! # 容器组合层
//!
//! 这个 crate 负责 Lorn Inject 的加载阶段：读取设置、初始化日志、
//! 执行注册模块，最终交出一个装好默认容器工厂的注册表。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 使用构建者模式组装注册表
//! - **设置加载**: TOML 文件与 `INJECT__*` 环境变量
//! - **注册模块**: 以模块为单位组织注册代码
//! - **日志初始化**: 开发与生产两种预设
//!
//! ## 基本使用
//!
//! ```rust
//! use inject_composition::ContainerBuilder;
//! use inject_common::instance;
//! use inject_registry::InjectExt;
//!
//! let injector = ContainerBuilder::new()
//!     .with_settings(Default::default())
//!     .add_fn_module("values", |registry| {
//!         registry.register_value("greeting", instance("hello"));
//!         Ok(())
//!     })
//!     .build_injector()
//!     .unwrap();
//!
//! assert_eq!(*injector.get_as::<&str>("greeting").unwrap(), "hello");
//! ```

pub mod builder;
pub mod logging;
pub mod module;
pub mod settings;

// 重新导出主要类型
pub use builder::ContainerBuilder;
pub use logging::LoggingConfig;
pub use module::{FnModule, RegistrationModule};
pub use settings::{ContainerSettings, LoggingSettings};

// 重新导出错误类型
pub use inject_common::{BootstrapError, BootstrapResult};
