//! 状态化正则词法分析器
//!
//! 数据流：
//! `StateTable` → `RegexCompiler`（惰性、缓存）→ `MatchResolver`（每步）
//! → `Tokens` 驱动循环 → `TokenFactory` → token
//!
//! # 示例
//!
//! ```
//! use statelex_core::{Lexer, Rule};
//!
//! let lexer = Lexer::new(vec![
//!     Rule::new(r"[0-9]+").kind("int"),
//!     Rule::new(r"\s+").kind("ws"),
//! ])
//! .unwrap();
//!
//! let kinds: Vec<String> = lexer
//!     .tokenize("1 2")
//!     .map(|t| t.unwrap().kind)
//!     .collect();
//! assert_eq!(kinds, ["int", "ws", "int"]);
//! ```

pub mod compiler;
pub mod context;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod rule;
pub mod state;
pub mod table;
pub mod token;

pub use context::{
    AfterContext, BeforeContext, FetchContext, MatchContext, ReadContext, StateControl,
    ValueContext,
};
pub use engine::{Lexer, Tokens};
pub use error::{ConfigError, CursorError, LexError, StateError};
pub use rule::{Pattern, Rule, TokenType};
pub use table::StateTable;
pub use token::{BaseToken, DefaultTokenFactory, Token, TokenFactory, Value};
