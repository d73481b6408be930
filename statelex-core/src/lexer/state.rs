//! 运行期状态栈
//!
//! 栈空时当前状态为基础状态。每个状态保留自己的锚点（上次匹配位置），
//! 切换状态时把新状态的锚点同步到切换前的锚点。
//! 每次 `tokenize` 调用新建一个，不在调用间共享。

use statelex_config::targets;
use std::sync::Arc;
use tracing::debug;

use super::error::StateError;
use super::table::{StateId, StateNames};

#[derive(Debug, Clone)]
pub struct StateStack {
    names: Arc<StateNames>,
    stack: Vec<StateId>,
    /// 按 `StateId` 索引的锚点
    anchors: Vec<usize>,
}

impl StateStack {
    pub fn new(names: Arc<StateNames>, start: usize) -> Self {
        let anchors = vec![start; names.len()];
        Self {
            names,
            stack: Vec::new(),
            anchors,
        }
    }

    /// 当前状态：栈顶，栈空时为基础状态
    pub fn current(&self) -> StateId {
        self.stack.last().copied().unwrap_or(self.names.base())
    }

    pub fn current_name(&self) -> &str {
        self.names.name(self.current())
    }

    /// 压入的状态数（不含隐式基础状态）
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// 当前状态的锚点
    pub fn anchor(&self) -> usize {
        self.anchors[self.current().index()]
    }

    pub fn set_anchor(&mut self, position: usize) {
        let current = self.current().index();
        self.anchors[current] = position;
    }

    pub fn push(&mut self, name: &str) -> Result<(), StateError> {
        if name == self.names.base_name() {
            return Err(StateError::PushBase(name.to_string()));
        }
        let id = self
            .names
            .lookup(name)
            .ok_or_else(|| StateError::Unknown(name.to_string()))?;

        let previous = self.current();
        self.stack.push(id);
        self.resume(previous);
        debug!(
            target: targets::ENGINE,
            state = name,
            depth = self.depth(),
            anchor = self.anchor(),
            "Pushed state"
        );
        Ok(())
    }

    pub fn pop(&mut self) -> Result<(), StateError> {
        let previous = self.current();
        if self.stack.pop().is_none() {
            return Err(StateError::PopEmpty);
        }
        self.resume(previous);
        debug!(
            target: targets::ENGINE,
            state = self.current_name(),
            depth = self.depth(),
            anchor = self.anchor(),
            "Popped state"
        );
        Ok(())
    }

    /// 新的当前状态从切换前的位置继续
    fn resume(&mut self, previous: StateId) {
        let position = self.anchors[previous.index()];
        self.set_anchor(position);
    }
}
