//! Lexer 主入口与驱动循环
//!
//! 每一步：裁决规则 → before → fetch → value → 解析类型 → 产出 token
//! → （下次拉取时）after → 锚点推进到游标。
//!
//! `tokenize` 返回惰性迭代器，消费方决定节奏；中途丢弃迭代器不需要任何清理。
//! 每次调用各自拥有游标、状态栈和锚点，同一个 `Lexer` 可以被多个调用并发使用。

use statelex_config::{targets, LexerConfig};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::compiler::RegexCompiler;
use super::context::{AfterContext, BeforeContext, FetchContext, Shared, ValueContext};
use super::error::{ConfigError, CursorError, LexError};
use super::resolver::MatchResolver;
use super::rule::Rule;
use super::state::StateStack;
use super::table::{StateId, StateNames, StateTable};
use super::token::{BaseToken, DefaultTokenFactory, TokenFactory, Value};

/// 状态化正则 lexer
///
/// 规则表和交替式缓存在构造后只读。
pub struct Lexer<F: TokenFactory = DefaultTokenFactory> {
    config: LexerConfig,
    names: Arc<StateNames>,
    rules: Vec<Vec<Rule<F::Token>>>,
    compiler: RegexCompiler,
    factory: F,
}

impl Lexer {
    /// 扁平规则列表，全部属于基础状态
    pub fn new(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        Self::with_states(StateTable::from(rules))
    }

    pub fn with_states(table: StateTable) -> Result<Self, ConfigError> {
        Self::with_config(table, LexerConfig::default())
    }

    pub fn with_config(table: StateTable, config: LexerConfig) -> Result<Self, ConfigError> {
        Lexer::with_factory(table, config, DefaultTokenFactory)
    }
}

impl<F: TokenFactory> Lexer<F> {
    /// 使用自定义 token 工厂
    pub fn with_factory(
        table: StateTable<F::Token>,
        config: LexerConfig,
        factory: F,
    ) -> Result<Self, ConfigError> {
        debug!(
            target: targets::ENGINE,
            states = table.len(),
            base = config.base_state.as_str(),
            eager = config.eager_compile,
            "Creating lexer"
        );

        let (names, rules) = table.resolve(&config.base_state)?;
        let names = Arc::new(names);
        let compiler = RegexCompiler::new(Arc::clone(&names), &rules)?;
        if config.eager_compile {
            compiler.compile_all()?;
        }

        Ok(Self {
            config,
            names,
            rules,
            compiler,
            factory,
        })
    }

    /// 从头开始分词
    pub fn tokenize(&self, input: &str) -> Tokens<'_, F> {
        self.tokenize_from(input, 0)
    }

    /// 从 `start`（字节偏移）开始分词
    ///
    /// `start` 越界或不在字符边界上时，迭代器的第一项就是错误。
    pub fn tokenize_from(&self, input: &str, start: usize) -> Tokens<'_, F> {
        debug!(
            target: targets::ENGINE,
            len = input.len(),
            start,
            "Starting tokenization"
        );

        let start_error = if start > input.len() {
            Some(LexError::from(CursorError::OutOfBounds {
                offset: start,
                len: input.len(),
            }))
        } else if !input.is_char_boundary(start) {
            Some(LexError::from(CursorError::NotCharBoundary(start)))
        } else {
            None
        };
        let start = if start_error.is_some() { 0 } else { start };

        Tokens {
            lexer: self,
            source: Arc::from(input),
            cursor: start,
            states: StateStack::new(Arc::clone(&self.names), start),
            last_token: None,
            pending: None,
            start_error,
            done: false,
        }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn base_state(&self) -> &str {
        self.names.base_name()
    }

    /// 按声明顺序遍历状态名
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.names.iter()
    }

    pub fn rules(&self, state: &str) -> Option<&[Rule<F::Token>]> {
        let id = self.names.lookup(state)?;
        Some(&self.rules[id.index()])
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: TokenFactory> fmt::Debug for Lexer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<(&str, usize)> = self
            .names
            .iter()
            .zip(self.rules.iter().map(Vec::len))
            .collect();
        f.debug_struct("Lexer")
            .field("config", &self.config)
            .field("states", &states)
            .field("compiled", &self.compiler.compiled_count())
            .finish()
    }
}

/// 已产出、after hook 尚未运行的 token
#[derive(Debug, Clone, Copy)]
struct Pending {
    state: StateId,
    rule: usize,
    start: usize,
    match_end: usize,
}

/// 惰性 token 序列
///
/// 出错后迭代器结束（之后总是返回 `None`）。
pub struct Tokens<'l, F: TokenFactory> {
    lexer: &'l Lexer<F>,
    source: Arc<str>,
    cursor: usize,
    states: StateStack,
    last_token: Option<F::Token>,
    pending: Option<Pending>,
    start_error: Option<LexError>,
    done: bool,
}

impl<F: TokenFactory> Tokens<'_, F> {
    /// 当前游标
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// 当前状态名
    pub fn state(&self) -> &str {
        self.states.current_name()
    }

    /// 状态栈深度（不含基础状态）
    pub fn depth(&self) -> usize {
        self.states.depth()
    }

    fn step(&mut self) -> Result<Option<F::Token>, LexError> {
        if let Some(err) = self.start_error.take() {
            return Err(err);
        }
        self.finish_pending()?;

        let lexer = self.lexer;
        let source = Arc::clone(&self.source);
        let input: &str = &source;

        while self.cursor < input.len() {
            let state = self.states.current();
            let state_name = lexer.names.name(state);
            let rules = &lexer.rules[state.index()];
            let start = self.states.anchor();

            let resolver = MatchResolver::new(&lexer.compiler, rules, state, state_name);
            let Some(found) = resolver.resolve(input, start, self.last_token.as_ref())? else {
                return Err(LexError::NoMatch {
                    offset: start,
                    state: state_name.to_string(),
                });
            };
            self.states.set_anchor(found.end);

            let rule = &rules[found.rule];
            let shared = Shared {
                input,
                matched: &input[start..found.end],
                start,
            };

            if let Some(before) = &rule.before {
                let aborted = {
                    let mut ctx = BeforeContext {
                        shared,
                        position: self.cursor,
                        states: &mut self.states,
                        aborted: false,
                    };
                    before(&mut ctx)?;
                    ctx.aborted
                };
                if aborted {
                    trace!(
                        target: targets::ENGINE,
                        rule = found.rule,
                        start,
                        state = self.states.current_name(),
                        "Match aborted, re-evaluating position"
                    );
                    self.cursor = start;
                    self.states.set_anchor(start);
                    continue;
                }
            }

            self.cursor = self.states.anchor();

            if let Some(fetch) = &rule.fetch {
                let mut ctx = FetchContext {
                    shared,
                    state: lexer.names.name(self.states.current()),
                    cursor: self.cursor,
                    boundary: self.cursor,
                };
                fetch(&mut ctx)?;
                self.cursor = ctx.cursor;
            }

            let value = match &rule.value {
                Some(value) => value(&ValueContext {
                    shared,
                    state: lexer.names.name(self.states.current()),
                    position: self.cursor,
                }),
                None => Value::Text(input[start..self.cursor].to_string()),
            };

            let base = BaseToken {
                kind: rule.token_type.resolve(shared.matched),
                value,
                range: start..self.cursor,
            };
            trace!(
                target: targets::ENGINE,
                kind = base.kind.as_str(),
                start,
                end = self.cursor,
                state = state_name,
                "Produced token"
            );

            let token = lexer.factory.token(base, &self.source);
            self.last_token = Some(token.clone());
            self.pending = Some(Pending {
                state,
                rule: found.rule,
                start,
                match_end: found.end,
            });
            return Ok(Some(token));
        }

        trace!(target: targets::ENGINE, position = self.cursor, "Reached end of input");
        Ok(None)
    }

    /// 运行上一个 token 的 after hook，并把当前状态的锚点推进到游标
    fn finish_pending(&mut self) -> Result<(), LexError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let rule = &self.lexer.rules[pending.state.index()][pending.rule];
        if let (Some(after), Some(token)) = (&rule.after, self.last_token.as_ref()) {
            let input: &str = &self.source;
            let mut ctx = AfterContext {
                shared: Shared {
                    input,
                    matched: &input[pending.start..pending.match_end],
                    start: pending.start,
                },
                position: self.cursor,
                states: &mut self.states,
                token,
            };
            after(&mut ctx)?;
        }

        self.states.set_anchor(self.cursor);
        Ok(())
    }
}

impl<F: TokenFactory> Iterator for Tokens<'_, F> {
    type Item = Result<F::Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                warn!(
                    target: targets::ENGINE,
                    position = self.cursor,
                    state = self.states.current_name(),
                    "Tokenization failed: {}",
                    err
                );
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<F: TokenFactory> FusedIterator for Tokens<'_, F> {}
