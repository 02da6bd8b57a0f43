//! # 依赖注入具体实现
//!
//! 提供基于名称的解析引擎 [`Injector`]。一个 `Injector` 即一个容器，
//! 拥有自己的实例缓存；每个名称在同一容器内只会成功解析一次。
//!
//! ## 解析顺序
//!
//! 1. 缓存命中直接返回（不再检查循环）
//! 2. 名称已在解析路径上则报告循环引用
//! 3. 查询注册表：未注册时回退到调用方提供的本地依赖
//! 4. 类型绑定：解析构造依赖并构造，写入缓存，再做属性注入和构造后回调
//! 5. 工厂绑定：解析依赖、调用，然后缓存
//! 6. 值绑定：直接缓存
//!
//! 类型绑定在属性注入之前就已缓存，所以属性之间可以互相引用，
//! 也可以引用自身；构造函数依赖之间的循环仍然报告为循环引用。
//! 属性注入或构造后回调失败时，缓存项会被移除。

pub mod path;

pub use path::ResolutionPath;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use inject_common::{
    Args, Binding, Callable, InjectError, InjectResult, Injectable, Instance, Locals, ServiceType,
    TypeInfo,
};
use inject_registry::{Inject, Registry};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// 依赖注入容器
pub struct Injector {
    /// 容器标识，用于日志
    id: Uuid,
    /// 绑定注册表
    registry: Arc<Registry>,
    /// 实例缓存，每个名称只写入一次
    cached: DashMap<String, Instance>,
}

impl Injector {
    /// 创建新的容器，缓存为空
    pub fn new(registry: Arc<Registry>) -> Self {
        let id = Uuid::new_v4();
        info!("创建容器: {} ({} 个绑定)", id, registry.len());
        Self {
            id,
            registry,
            cached: DashMap::new(),
        }
    }

    /// 将本实现安装为注册表的容器工厂
    pub fn install(registry: &Registry) {
        registry.set_injector_factory(Arc::new(|registry: Arc<Registry>| {
            Box::new(Injector::new(registry)) as Box<dyn Inject>
        }));
        debug!("已安装默认容器工厂");
    }

    /// 容器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 绑定注册表
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// 名称是否已缓存
    pub fn is_cached(&self, name: &str) -> bool {
        self.cached.contains_key(name)
    }

    /// 已缓存的实例数量
    pub fn cached_count(&self) -> usize {
        self.cached.len()
    }

    fn resolve(
        &self,
        name: &str,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        if let Some(hit) = self.cached.get(name) {
            trace!("缓存命中: {}", name);
            return Ok(Arc::clone(hit.value()));
        }

        path.enter(name)?;
        let result = self.resolve_binding(name, path, locals);
        path.leave();
        result
    }

    fn resolve_binding(
        &self,
        name: &str,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        let Some(metadata) = self.registry.get_metadata(name) else {
            // 本地依赖不进入缓存
            return locals
                .and_then(|locals| locals.get(name))
                .cloned()
                .ok_or_else(|| InjectError::not_registered(name));
        };

        debug!(
            "解析依赖: {} ({}, 深度 {})",
            name,
            metadata.binding.kind(),
            path.depth()
        );

        let value = match metadata.binding {
            Binding::Type(service_type) => {
                return self.resolve_type(name, &service_type, path, locals)
            }
            Binding::Factory(callable) => self.call(name, &callable, None, path, locals)?,
            Binding::Value(value) => value,
        };

        let cached = self.cached.entry(name.to_string()).or_insert(value);
        Ok(Arc::clone(cached.value()))
    }

    fn resolve_type(
        &self,
        name: &str,
        service_type: &ServiceType,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        let object = self.construct(name, service_type, path, locals)?;
        let value = Arc::clone(&object).into_instance();

        // 分片锁必须在属性注入之前释放
        match self.cached.entry(name.to_string()) {
            Entry::Occupied(existing) => return Ok(Arc::clone(existing.get())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&value));
            }
        }

        if let Err(error) = self.initialize(object.as_ref(), service_type.type_info(), path, locals)
        {
            self.cached.remove(name);
            return Err(error);
        }
        Ok(value)
    }

    fn resolve_arguments(
        &self,
        target: &str,
        dependencies: &[String],
        this: Option<Instance>,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Args> {
        let values = dependencies
            .iter()
            .map(|dependency| {
                self.resolve(dependency, path, locals)
                    .map(|value| (dependency.clone(), value))
            })
            .collect::<InjectResult<Vec<_>>>()?;
        Ok(Args::new(target, values, this))
    }

    fn call(
        &self,
        target: &str,
        callable: &Callable,
        this: Option<Instance>,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        let mut args =
            self.resolve_arguments(target, callable.dependencies(), this, path, locals)?;
        callable.call(&mut args)
    }

    fn construct(
        &self,
        target: &str,
        service_type: &ServiceType,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<Arc<dyn Injectable>> {
        let mut args =
            self.resolve_arguments(target, service_type.dependencies(), None, path, locals)?;
        service_type.construct(&mut args)
    }

    fn initialize(
        &self,
        object: &dyn Injectable,
        type_info: &TypeInfo,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<()> {
        self.inject_properties(object, type_info, path, locals)?;
        self.post_construct(object, type_info)
    }

    fn inject_properties(
        &self,
        object: &dyn Injectable,
        type_info: &TypeInfo,
        path: &mut ResolutionPath,
        locals: Option<&Locals>,
    ) -> InjectResult<()> {
        let Some(properties) = self.registry.get_property_metadata(type_info) else {
            return Ok(());
        };

        for property in &properties {
            let value = self.resolve(&property.name, path, locals)?;
            trace!(
                "注入属性: {}.{} <- {}",
                type_info.name,
                property.property_key,
                property.name
            );
            object.inject_property(&property.property_key, value)?;
        }
        Ok(())
    }

    fn post_construct(&self, object: &dyn Injectable, type_info: &TypeInfo) -> InjectResult<()> {
        if let Some(hook) = self.registry.get_post_construct_metadata(type_info) {
            trace!("构造后回调: {}.{}", type_info.name, hook.method);
            object.post_construct(&hook.method)?;
        }
        Ok(())
    }

    fn report(&self, error: InjectError) -> InjectError {
        warn!("容器 {} 解析失败: {}", self.id, error);
        error
    }
}

impl Inject for Injector {
    fn get(&self, name: &str) -> InjectResult<Instance> {
        let mut path = ResolutionPath::new();
        self.resolve(name, &mut path, None)
            .map_err(|error| self.report(error))
    }

    fn has(&self, name: &str) -> bool {
        self.is_cached(name) || self.registry.contains(name)
    }

    fn invoke(
        &self,
        callable: &Callable,
        this: Option<Instance>,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        let mut path = ResolutionPath::new();
        self.call(callable.name(), callable, this, &mut path, locals)
            .map_err(|error| self.report(error))
    }

    fn instantiate(
        &self,
        service_type: &ServiceType,
        locals: Option<&Locals>,
    ) -> InjectResult<Instance> {
        let mut path = ResolutionPath::new();
        let target = service_type.name();
        self.construct(target, service_type, &mut path, locals)
            .and_then(|object| {
                self.initialize(object.as_ref(), service_type.type_info(), &mut path, locals)?;
                Ok(object.into_instance())
            })
            .map_err(|error| self.report(error))
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("id", &self.id)
            .field("cached", &self.cached.len())
            .field("registry", &self.registry)
            .finish()
    }
}
