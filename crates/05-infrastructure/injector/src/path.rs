//! 解析路径
//!
//! 记录一次顶层调用中正在解析的名称链，用于检测循环引用

use inject_common::{InjectError, InjectResult};

/// 解析路径
///
/// 每次顶层调用（`get`/`invoke`/`instantiate`）新建一个，不在调用之间共享。
/// 名称在进入解析时压入，离开时弹出，因此路径上只有当前分支的祖先。
#[derive(Debug, Default)]
pub struct ResolutionPath {
    chain: Vec<String>,
}

impl ResolutionPath {
    /// 创建空路径
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入一个名称的解析
    pub fn enter(&mut self, name: &str) -> InjectResult<()> {
        if self.contains(name) {
            let mut chain = self.chain.clone();
            chain.push(name.to_string());
            return Err(InjectError::CircularReference {
                name: name.to_string(),
                chain,
            });
        }
        self.chain.push(name.to_string());
        Ok(())
    }

    /// 离开最近进入的名称
    pub fn leave(&mut self) {
        self.chain.pop();
    }

    /// 名称是否在路径上
    pub fn contains(&self, name: &str) -> bool {
        self.chain.iter().any(|entry| entry == name)
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// 当前路径
    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}
