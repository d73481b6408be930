//! Token 与 token 工厂
//!
//! 引擎只依赖 `{kind, value, range}`（[`BaseToken`]）；最终的 token 形状由
//! [`TokenFactory`] 决定，这是唯一的定制点。

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Token 的值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{}", text),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// 引擎交给工厂的最小 token 信息
#[derive(Debug, Clone, PartialEq)]
pub struct BaseToken {
    pub kind: String,
    pub value: Value,
    pub range: Range<usize>,
}

/// Token 构造点
pub trait TokenFactory {
    type Token: Clone;

    /// `source` 是整个输入，用于截取子串
    fn token(&self, base: BaseToken, source: &Arc<str>) -> Self::Token;
}

/// 默认 token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
    pub range: Range<usize>,
    /// 输入中 `range` 对应的子串
    #[serde(rename = "string")]
    pub text: String,
    #[serde(skip)]
    pub source: Arc<str>,
}

impl Token {
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// 构造 [`Token`] 的默认工厂
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenFactory;

impl TokenFactory for DefaultTokenFactory {
    type Token = Token;

    fn token(&self, base: BaseToken, source: &Arc<str>) -> Token {
        Token {
            text: source[base.range.clone()].to_string(),
            kind: base.kind,
            value: base.value,
            range: base.range,
            source: Arc::clone(source),
        }
    }
}
