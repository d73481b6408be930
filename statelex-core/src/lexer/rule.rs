//! 规则定义
//!
//! 一条规则 = 模式 + 可选的类型 / 值 / 谓词 / 生命周期 hook。
//! 规则在所属状态中的声明顺序决定了它在交替式中的优先级。

use std::fmt;
use std::sync::Arc;

use super::context::{AfterContext, BeforeContext, FetchContext, MatchContext, ValueContext};
use super::error::LexError;
use super::token::{Token, Value};

/// 谓词：返回 false 时拒绝本次匹配，交给后续规则
pub type Predicate<T> = Arc<dyn Fn(&MatchContext<'_, T>) -> bool + Send + Sync>;
/// 计算 token 的值
pub type ValueFn = Arc<dyn Fn(&ValueContext<'_>) -> Value + Send + Sync>;
/// 匹配后、消费前运行，可切换状态或中止
pub type BeforeHook = Arc<dyn Fn(&mut BeforeContext<'_>) -> Result<(), LexError> + Send + Sync>;
/// 手动扩展 / 回退消费范围
pub type FetchHook = Arc<dyn Fn(&mut FetchContext<'_>) -> Result<(), LexError> + Send + Sync>;
/// token 产出后运行，可切换状态
pub type AfterHook<T> =
    Arc<dyn Fn(&mut AfterContext<'_, T>) -> Result<(), LexError> + Send + Sync>;
/// 从匹配文本推导 token 类型
pub type DeriveFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 规则模式：源码文本或预编译的正则
///
/// 预编译正则只取其源码拼接进交替式，通过 `RegexBuilder` 设置的标志不会保留，
/// 需要时请使用内联标志（如 `(?i)`）。
#[derive(Clone, Debug)]
pub enum Pattern {
    Source(String),
    Compiled(regex::Regex),
}

impl Pattern {
    /// 参与拼接的模式源码
    pub fn source(&self) -> &str {
        match self {
            Pattern::Source(source) => source,
            Pattern::Compiled(regex) => regex.as_str(),
        }
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::Source(source.to_string())
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::Source(source)
    }
}

impl From<regex::Regex> for Pattern {
    fn from(regex: regex::Regex) -> Self {
        Pattern::Compiled(regex)
    }
}

/// token 类型解析方式
#[derive(Clone, Default)]
pub enum TokenType {
    /// 类型即匹配文本本身
    #[default]
    Default,
    /// 固定类型名
    Literal(String),
    /// 由匹配文本计算
    Derived(DeriveFn),
}

impl TokenType {
    /// 每次匹配解析一次
    pub fn resolve(&self, matched: &str) -> String {
        match self {
            TokenType::Default => matched.to_string(),
            TokenType::Literal(kind) => kind.clone(),
            TokenType::Derived(derive) => derive(matched),
        }
    }
}

impl fmt::Debug for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Default => write!(f, "Default"),
            TokenType::Literal(kind) => f.debug_tuple("Literal").field(kind).finish(),
            TokenType::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

/// 词法规则
///
/// `T` 是谓词与 after hook 可见的 token 类型，由 lexer 的 token 工厂决定。
pub struct Rule<T = Token> {
    pub(crate) pattern: Pattern,
    pub(crate) token_type: TokenType,
    pub(crate) predicate: Option<Predicate<T>>,
    pub(crate) value: Option<ValueFn>,
    pub(crate) before: Option<BeforeHook>,
    pub(crate) fetch: Option<FetchHook>,
    pub(crate) after: Option<AfterHook<T>>,
}

impl<T> Rule<T> {
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self {
            pattern: pattern.into(),
            token_type: TokenType::Default,
            predicate: None,
            value: None,
            before: None,
            fetch: None,
            after: None,
        }
    }

    /// 固定 token 类型
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.token_type = TokenType::Literal(kind.into());
        self
    }

    /// 由匹配文本推导 token 类型
    pub fn kind_with<F>(mut self, derive: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.token_type = TokenType::Derived(Arc::new(derive));
        self
    }

    /// 上下文谓词
    pub fn test<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&MatchContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn value<V>(mut self, value: V) -> Self
    where
        V: Fn(&ValueContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(value));
        self
    }

    pub fn before<H>(mut self, hook: H) -> Self
    where
        H: Fn(&mut BeforeContext<'_>) -> Result<(), LexError> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    pub fn fetch<H>(mut self, hook: H) -> Self
    where
        H: Fn(&mut FetchContext<'_>) -> Result<(), LexError> + Send + Sync + 'static,
    {
        self.fetch = Some(Arc::new(hook));
        self
    }

    pub fn after<H>(mut self, hook: H) -> Self
    where
        H: Fn(&mut AfterContext<'_, T>) -> Result<(), LexError> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn token_type(&self) -> &TokenType {
        &self.token_type
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            token_type: self.token_type.clone(),
            predicate: self.predicate.clone(),
            value: self.value.clone(),
            before: self.before.clone(),
            fetch: self.fetch.clone(),
            after: self.after.clone(),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<&str> = [
            ("test", self.predicate.is_some()),
            ("value", self.value.is_some()),
            ("before", self.before.is_some()),
            ("fetch", self.fetch.is_some()),
            ("after", self.after.is_some()),
        ]
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect();

        f.debug_struct("Rule")
            .field("pattern", &self.pattern.source())
            .field("type", &self.token_type)
            .field("hooks", &hooks)
            .finish()
    }
}
