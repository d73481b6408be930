//! Statelex - a stateful regex lexer
//!
//! Rules are grouped into named states. Each state compiles into one
//! anchored alternation; the earliest declared rule that matches wins unless
//! its predicate rejects the match, in which case the later rules are tried
//! at the same offset. Hooks around each match can push and pop states,
//! extend the token past the regex match, or compute a custom value.
//!
//! # Architecture
//!
//! ```text
//! statelex-config/  - Pure configuration data (no logic)
//! statelex-core/    - Lexer engine and logging setup
//! src/              - This facade
//! ```
//!
//! # Quick Start
//!
//! ```
//! use statelex::prelude::*;
//!
//! let lexer = Lexer::new(vec![
//!     Rule::new(r"[a-z]+").kind("id"),
//!     Rule::new(r"[0-9]+")
//!         .kind("int")
//!         .value(|ctx| ctx.text().parse::<i64>().map(Value::Int).unwrap_or(Value::Null)),
//!     Rule::new(r"\s+").kind("ws"),
//! ])
//! .unwrap();
//!
//! let tokens: Vec<Token> = lexer.tokenize("abc 42").collect::<Result<_, _>>().unwrap();
//! assert_eq!(tokens[2].value, Value::Int(42));
//! ```

pub use statelex_config as config;
pub use statelex_core::lexer;
pub use statelex_core::logging;

// 重导出常用类型
pub use statelex_core::{
    AfterContext, BaseToken, BeforeContext, ConfigError, CursorError, DefaultTokenFactory,
    FetchContext, LexError, Lexer, LexerConfig, LogConfig, LogFormat, LogLevel, MatchContext,
    Pattern, ReadContext, Rule, Stage, StateControl, StateError, StateTable, Token, TokenFactory,
    TokenType, Tokens, Value, ValueContext,
};

/// 常用类型与 trait，`use statelex::prelude::*;`
pub mod prelude {
    pub use statelex_core::{
        LexError, Lexer, LexerConfig, ReadContext, Rule, StateControl, StateTable, Token,
        TokenFactory, Value,
    };
}

/// 按 lexer 配置中的日志部分安装全局订阅者
///
/// lexer 本身只发事件；不调用时日志被丢弃。
///
/// # Example
/// ```ignore
/// use statelex::{init_logging, LexerConfig};
///
/// init_logging(&LexerConfig::default()).unwrap();
/// ```
pub fn init_logging(config: &LexerConfig) -> Result<(), logging::InitError> {
    logging::init(&config.log)
}

/// 一次性分词，收集全部 token
///
/// 遇到第一个错误即返回。
///
/// # Example
/// ```
/// use statelex::{tokenize, Rule};
///
/// let tokens = tokenize(vec![Rule::new("a"), Rule::new("b")], "ab").unwrap();
/// assert_eq!(tokens.len(), 2);
/// ```
pub fn tokenize(rules: Vec<Rule>, input: &str) -> Result<Vec<Token>, LexError> {
    let lexer = Lexer::new(rules)?;
    let tokens = lexer.tokenize(input).collect();
    tokens
}
