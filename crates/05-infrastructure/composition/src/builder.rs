//! 容器构建器

use crate::logging::LoggingConfig;
use crate::module::{FnModule, RegistrationModule};
use crate::settings::ContainerSettings;
use inject_common::{BootstrapError, BootstrapResult, InjectResult, NameResolver};
use inject_impl::Injector;
use inject_registry::{Inject, Registry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 容器构建器
///
/// 使用建造者模式完成加载阶段：读取设置、初始化日志、安装默认容器工厂、
/// 应用命名约定，然后按添加顺序执行注册模块
pub struct ContainerBuilder {
    /// 目标注册表
    registry: Arc<Registry>,
    /// 显式给出的设置
    settings: Option<ContainerSettings>,
    /// 设置文件路径
    settings_path: Option<PathBuf>,
    /// 显式给出的日志配置
    logging_config: Option<LoggingConfig>,
    /// 显式给出的命名函数，优先于设置中的命名约定
    name_resolver: Option<NameResolver>,
    /// 注册模块列表
    modules: Vec<Box<dyn RegistrationModule>>,
}

impl ContainerBuilder {
    /// 创建新的构建器，使用全新的注册表
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// 在已有的注册表上构建
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            settings: None,
            settings_path: None,
            logging_config: None,
            name_resolver: None,
            modules: Vec::new(),
        }
    }

    /// 使用给定的设置，不再读取文件和环境变量
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 从 TOML 文件和环境变量读取设置
    pub fn with_settings_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        info!("添加设置文件: {}", path.display());
        self.settings_path = Some(path.to_path_buf());
        self
    }

    /// 配置日志，优先于设置中的日志选项
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 替换命名函数
    pub fn with_name_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.name_resolver = Some(Arc::new(resolver));
        self
    }

    /// 添加注册模块
    pub fn add_module<M: RegistrationModule + 'static>(mut self, module: M) -> Self {
        debug!("添加注册模块: {}", module.name());
        self.modules.push(Box::new(module));
        self
    }

    /// 以闭包添加注册模块
    pub fn add_fn_module<F>(self, name: impl Into<String>, register: F) -> Self
    where
        F: Fn(&Registry) -> InjectResult<()> + Send + Sync + 'static,
    {
        self.add_module(FnModule::new(name, register))
    }

    /// 完成加载阶段，返回注册表
    pub fn build(self) -> BootstrapResult<Arc<Registry>> {
        let settings = match self.settings {
            Some(settings) => settings,
            None => ContainerSettings::load(self.settings_path.as_deref())?,
        };

        match self.logging_config {
            Some(config) => config.try_init()?,
            None if settings.logging.enabled => settings.logging.to_logging_config()?.try_init()?,
            None => {}
        }

        info!("开始构建容器 ({} 个注册模块)", self.modules.len());

        let registry = self.registry;
        Injector::install(&registry);

        let resolver = self
            .name_resolver
            .unwrap_or_else(|| settings.naming.resolver());
        registry.set_name_resolver(move |name| resolver(name));
        debug!("命名约定: {:?}", settings.naming);

        for module in &self.modules {
            debug!("执行注册模块: {}", module.name());
            module.register(&registry).map_err(|source| {
                error!("注册模块 {} 执行失败: {}", module.name(), source);
                BootstrapError::Registration {
                    module: module.name().to_string(),
                    source,
                }
            })?;
        }

        info!("容器构建完成，共 {} 个绑定", registry.len());
        Ok(registry)
    }

    /// 完成加载阶段并创建一个容器
    pub fn build_injector(self) -> BootstrapResult<Box<dyn Inject>> {
        let registry = self.build()?;
        Ok(registry.create_injector()?)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("settings", &self.settings)
            .field("settings_path", &self.settings_path)
            .field("logging_config", &self.logging_config)
            .field("has_name_resolver", &self.name_resolver.is_some())
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
