//! Lexer 错误类型
//!
//! 所有错误对当前 `tokenize` 调用都是致命的；谓词拒绝不是错误。

use thiserror::Error;

/// 构造期（或首次编译）错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 模式语法错误，原样透传正则编译器的错误
    #[error(transparent)]
    Pattern(#[from] regex_automata::meta::BuildError),

    #[error("base state `{0}` is not defined")]
    MissingBaseState(String),

    #[error("state `{0}` is defined more than once")]
    DuplicateState(String),
}

/// 状态栈的非法操作
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cannot push the base state `{0}`")]
    PushBase(String),

    #[error("cannot pop state: the state stack is empty")]
    PopEmpty,

    #[error("unknown state `{0}`")]
    Unknown(String),
}

/// fetch 阶段的非法游标移动
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// 回退到当前匹配结束位置之前
    #[error("cannot back up {count} character(s) from offset {cursor}: the match ends at {boundary}")]
    BeforeBoundary {
        cursor: usize,
        count: usize,
        boundary: usize,
    },

    #[error("cannot advance backwards from offset {cursor} to {target}")]
    Backwards { cursor: usize, target: usize },

    #[error("offset {offset} is past the end of the input (length {len})")]
    OutOfBounds { offset: usize, len: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// 词法分析错误
#[derive(Debug, Error)]
pub enum LexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// 当前位置没有任何规则能被接受
    #[error("no rule matches at offset {offset} in state `{state}`")]
    NoMatch { offset: usize, state: String },

    /// 由 hook 主动抛出的错误
    #[error("{0}")]
    Custom(String),
}

impl LexError {
    /// hook 中构造自定义错误
    pub fn custom(message: impl Into<String>) -> Self {
        LexError::Custom(message.into())
    }
}
