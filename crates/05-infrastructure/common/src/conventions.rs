//! 命名约定规范
//!
//! 按类型注册而未给出名称时，注册表通过可替换的命名函数由类型名
//! 推导绑定名称

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 命名函数
pub type NameResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 内置命名函数
pub mod naming {
    /// 驼峰命名：首字母小写（`ClassA` → `classA`）
    pub fn camel_case(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 蛇形命名（`ReportService` → `report_service`）
    pub fn snake_case(name: &str) -> String {
        let mut result = String::new();
        let mut chars = name.chars().peekable();
        let mut previous: Option<char> = None;

        while let Some(ch) = chars.next() {
            if ch.is_uppercase() && !result.is_empty() {
                let after_lower = previous.is_some_and(char::is_lowercase);
                let before_lower = chars.peek().is_some_and(|next| next.is_lowercase());
                if after_lower || before_lower {
                    result.push('_');
                }
            }
            result.extend(ch.to_lowercase());
            previous = Some(ch);
        }

        result
    }

    /// 保持原样
    pub fn identity(name: &str) -> String {
        name.to_string()
    }
}

/// 命名策略，可由配置选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// 首字母小写
    #[default]
    CamelCase,
    /// 蛇形命名
    SnakeCase,
    /// 保持原样
    Identity,
}

impl NamingPolicy {
    /// 对应的命名函数
    pub fn resolver(self) -> NameResolver {
        match self {
            Self::CamelCase => Arc::new(naming::camel_case),
            Self::SnakeCase => Arc::new(naming::snake_case),
            Self::Identity => Arc::new(naming::identity),
        }
    }
}
