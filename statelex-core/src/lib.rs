//! Statelex Core - stateful regex lexer engine (pure logic, no IO)
//!
//! Rules are grouped into named states; each state compiles into one
//! anchored alternation. Rules may reject a match through a predicate, and
//! before/fetch/value/after hooks drive the state stack and the cursor.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod lexer;
pub mod logging;

// Re-export common types
pub use lexer::{
    AfterContext, BaseToken, BeforeContext, ConfigError, CursorError, DefaultTokenFactory,
    FetchContext, LexError, Lexer, MatchContext, Pattern, ReadContext, Rule, StateControl,
    StateError, StateTable, Token, TokenFactory, TokenType, Tokens, Value, ValueContext,
};

// Re-export config types from statelex-config
pub use statelex_config::{LexerConfig, LogConfig, LogFormat, LogLevel, Stage};
