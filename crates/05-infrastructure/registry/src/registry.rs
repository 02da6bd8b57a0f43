//! 绑定注册表
//!
//! 纯元数据存储：按名称记录绑定，按类型记录属性注入表和构造后回调，
//! 以及命名函数和容器工厂两个可替换策略。不包含任何解析逻辑。

use crate::container::{Inject, InjectorFactory};
use inject_common::{
    naming, Binding, BindingMetadata, Callable, InjectError, InjectResult, Instance, NameResolver,
    PostConstructMetadata, PropertyBindings, PropertyMetadata, ServiceType, TypeInfo,
};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// 绑定注册表
///
/// 通过 `Arc<Registry>` 在注册代码和容器之间共享。读取方法返回克隆，
/// 调用方执行用户代码时不持有任何锁。
pub struct Registry {
    /// 名称到绑定
    bindings: RwLock<HashMap<String, BindingMetadata>>,
    /// 类型到属性注入表
    properties: RwLock<HashMap<TypeId, PropertyBindings>>,
    /// 类型到构造后回调
    post_constructs: RwLock<HashMap<TypeId, PostConstructMetadata>>,
    /// 命名函数
    name_resolver: RwLock<NameResolver>,
    /// 容器工厂
    injector_factory: RwLock<Option<InjectorFactory>>,
}

impl Registry {
    /// 创建新的注册表，默认使用驼峰命名
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            properties: RwLock::new(HashMap::new()),
            post_constructs: RwLock::new(HashMap::new()),
            name_resolver: RwLock::new(Arc::new(naming::camel_case)),
            injector_factory: RwLock::new(None),
        }
    }

    /// 注册类型绑定
    pub fn register_service(&self, name: impl Into<String>, service_type: ServiceType) {
        self.insert_binding(name.into(), Binding::Type(service_type));
    }

    /// 以命名函数推导的名称注册类型绑定，返回使用的名称
    pub fn register_service_by_type(&self, service_type: ServiceType) -> String {
        let name = self.resolve_name(service_type.name());
        self.insert_binding(name.clone(), Binding::Type(service_type));
        name
    }

    /// 注册工厂绑定
    pub fn register_factory(&self, name: impl Into<String>, factory: Callable) {
        self.insert_binding(name.into(), Binding::Factory(factory));
    }

    /// 注册值绑定
    pub fn register_value(&self, name: impl Into<String>, value: Instance) {
        self.insert_binding(name.into(), Binding::Value(value));
    }

    fn insert_binding(&self, name: String, binding: Binding) {
        let kind = binding.kind();
        let previous = self
            .bindings
            .write()
            .insert(name.clone(), BindingMetadata::new(name.clone(), binding));

        match previous {
            Some(old) => debug!(
                "覆盖绑定: {} ({} -> {})",
                name,
                old.binding.kind(),
                kind
            ),
            None => debug!("注册绑定: {} ({})", name, kind),
        }
    }

    /// 注册属性注入
    pub fn register_property(
        &self,
        name: impl Into<String>,
        type_info: TypeInfo,
        property_key: impl Into<String>,
    ) {
        let metadata = PropertyMetadata {
            name: name.into(),
            property_key: property_key.into(),
            type_info,
        };
        debug!(
            "注册属性注入: {}.{} <- {}",
            metadata.type_info.name, metadata.property_key, metadata.name
        );

        self.properties
            .write()
            .entry(metadata.type_info.id)
            .or_default()
            .insert(metadata);
    }

    /// 注册构造后回调，同一类型只保留最后一次注册
    pub fn register_post_construct(&self, type_info: TypeInfo, method: impl Into<String>) {
        let metadata = PostConstructMetadata {
            method: method.into(),
            type_info,
        };
        debug!(
            "注册构造后回调: {}.{}",
            metadata.type_info.name, metadata.method
        );

        self.post_constructs
            .write()
            .insert(metadata.type_info.id, metadata);
    }

    /// 获取绑定元数据
    pub fn get_metadata(&self, name: &str) -> Option<BindingMetadata> {
        self.bindings.read().get(name).cloned()
    }

    /// 名称是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// 获取类型的属性注入表
    pub fn get_property_metadata(&self, type_info: &TypeInfo) -> Option<PropertyBindings> {
        self.properties.read().get(&type_info.id).cloned()
    }

    /// 获取类型的构造后回调
    pub fn get_post_construct_metadata(&self, type_info: &TypeInfo) -> Option<PostConstructMetadata> {
        self.post_constructs.read().get(&type_info.id).cloned()
    }

    /// 所有已注册的绑定名称
    pub fn get_names(&self) -> BTreeSet<String> {
        self.bindings.read().keys().cloned().collect()
    }

    /// 已注册的绑定数量
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// 替换命名函数
    pub fn set_name_resolver<F>(&self, resolver: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        *self.name_resolver.write() = Arc::new(resolver);
    }

    /// 使用命名函数推导名称
    pub fn resolve_name(&self, name: &str) -> String {
        let resolver = self.name_resolver.read().clone();
        resolver(name)
    }

    /// 安装容器工厂
    pub fn set_injector_factory(&self, factory: InjectorFactory) {
        *self.injector_factory.write() = Some(factory);
    }

    /// 是否已安装容器工厂
    pub fn has_injector_factory(&self) -> bool {
        self.injector_factory.read().is_some()
    }

    /// 使用最近安装的工厂创建新容器
    pub fn create_injector(self: &Arc<Self>) -> InjectResult<Box<dyn Inject>> {
        let factory = self
            .injector_factory
            .read()
            .clone()
            .ok_or(InjectError::NoInjectorFactory)?;
        Ok(factory(Arc::clone(self)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.get_names())
            .field("property_types", &self.properties.read().len())
            .field("post_construct_types", &self.post_constructs.read().len())
            .field("has_injector_factory", &self.has_injector_factory())
            .finish()
    }
}
