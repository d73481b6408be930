//! 状态表：状态名 → 有序规则列表
//!
//! 纯数据，构造 lexer 时解析为按 `StateId` 索引的形式，之后不可变。

use std::collections::HashMap;

use super::error::ConfigError;
use super::rule::Rule;
use super::token::Token;

/// 状态在表中的下标
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 用户声明的状态表
///
/// 扁平规则列表（`From<Vec<Rule>>`）隐式成为基础状态。
pub struct StateTable<T = Token> {
    /// `None` 表示隐式的基础状态
    entries: Vec<(Option<String>, Vec<Rule<T>>)>,
}

impl<T> StateTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 追加一个命名状态
    pub fn state(mut self, name: impl Into<String>, rules: Vec<Rule<T>>) -> Self {
        self.entries.push((Some(name.into()), rules));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 解析为按下标访问的形式，校验基础状态存在且状态名唯一
    pub(crate) fn resolve(self, base: &str) -> Result<(StateNames, Vec<Vec<Rule<T>>>), ConfigError> {
        let mut names = Vec::with_capacity(self.entries.len());
        let mut index = HashMap::with_capacity(self.entries.len());
        let mut rules = Vec::with_capacity(self.entries.len());

        for (name, state_rules) in self.entries {
            let name = name.unwrap_or_else(|| base.to_string());
            let id = StateId(names.len());
            if index.insert(name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateState(name));
            }
            names.push(name);
            rules.push(state_rules);
        }

        let base = index
            .get(base)
            .copied()
            .ok_or_else(|| ConfigError::MissingBaseState(base.to_string()))?;

        Ok((StateNames { names, index, base }, rules))
    }
}

impl<T> Default for StateTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<Rule<T>>> for StateTable<T> {
    fn from(rules: Vec<Rule<T>>) -> Self {
        Self {
            entries: vec![(None, rules)],
        }
    }
}

/// 状态名与下标的双向映射
#[derive(Debug, Clone, PartialEq)]
pub struct StateNames {
    names: Vec<String>,
    index: HashMap<String, StateId>,
    base: StateId,
}

impl StateNames {
    pub fn lookup(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: StateId) -> &str {
        &self.names[id.0]
    }

    pub fn base(&self) -> StateId {
        self.base
    }

    pub fn base_name(&self) -> &str {
        self.name(self.base)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 按声明顺序遍历状态名
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
