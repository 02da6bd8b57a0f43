//! 元数据定义
//!
//! 提供绑定、属性注入和构造后回调的元数据

use crate::component::Instance;
use crate::factory::{Callable, ServiceType};
use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

/// 去掉模块路径，保留泛型参数之前的最后一段
fn short_type_name(full_name: &str) -> &str {
    let head = full_name.split('<').next().unwrap_or(full_name);
    head.rsplit("::").next().unwrap_or(head)
}

/// 绑定
#[derive(Clone)]
pub enum Binding {
    /// 类型绑定，构造函数参数来自依赖声明
    Type(ServiceType),
    /// 工厂绑定，返回值即解析结果
    Factory(Callable),
    /// 值绑定，原样返回
    Value(Instance),
}

impl Binding {
    /// 绑定种类名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Type(_) => "type",
            Self::Factory(_) => "factory",
            Self::Value(_) => "value",
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(service) => f.debug_tuple("Type").field(service).finish(),
            Self::Factory(callable) => f.debug_tuple("Factory").field(callable).finish(),
            Self::Value(_) => f.debug_tuple("Value").field(&"<instance>").finish(),
        }
    }
}

/// 绑定元数据
#[derive(Debug, Clone)]
pub struct BindingMetadata {
    /// 绑定名称
    pub name: String,
    /// 绑定内容
    pub binding: Binding,
}

impl BindingMetadata {
    /// 创建新的绑定元数据
    pub fn new(name: impl Into<String>, binding: Binding) -> Self {
        Self {
            name: name.into(),
            binding,
        }
    }
}

/// 属性注入元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMetadata {
    /// 依赖名称
    pub name: String,
    /// 所属类型
    pub type_info: TypeInfo,
    /// 属性键
    pub property_key: String,
}

/// 单个类型的属性注入表
///
/// 保持注册顺序；同一属性键再次注册时原地覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBindings {
    entries: Vec<PropertyMetadata>,
}

impl PropertyBindings {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一个属性
    pub fn insert(&mut self, metadata: PropertyMetadata) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.property_key == metadata.property_key)
        {
            Some(entry) => *entry = metadata,
            None => self.entries.push(metadata),
        }
    }

    /// 按属性键查找
    pub fn get(&self, property_key: &str) -> Option<&PropertyMetadata> {
        self.entries
            .iter()
            .find(|entry| entry.property_key == property_key)
    }

    /// 按注册顺序遍历
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyMetadata> {
        self.entries.iter()
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyBindings {
    type Item = &'a PropertyMetadata;
    type IntoIter = std::slice::Iter<'a, PropertyMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 构造后回调元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostConstructMetadata {
    /// 所属类型
    pub type_info: TypeInfo,
    /// 回调方法名
    pub method: String,
}
