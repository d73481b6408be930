//! 交替式编译器
//!
//! 把一个状态的规则列表（或其后缀）拼成单个锚定交替式：
//! `(?:(p0)|(p1)|...)`，每条规则一个外层捕获组，按声明顺序排列。
//! 完整交替式按状态缓存，后缀交替式按 (状态, 起始规则) 缓存；
//! 缓存项只构建一次，之后只读。

use once_cell::sync::OnceCell;
use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input, PatternID};
use statelex_config::targets;
use std::sync::Arc;
use tracing::{debug, trace};

use super::error::ConfigError;
use super::rule::{Pattern, Rule};
use super::table::{StateId, StateNames};

/// 交替式在某位置的匹配结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltMatch {
    /// 原规则表中的下标
    pub rule: usize,
    pub start: usize,
    pub end: usize,
}

/// 编译好的锚定交替式
#[derive(Debug)]
pub struct Alternation {
    regex: Regex,
    source: String,
    /// 每条规则外层捕获组的下标（规则自身可能含捕获组）
    groups: Vec<usize>,
    /// 覆盖的第一条规则在原表中的下标
    first: usize,
}

impl Alternation {
    fn build(sources: &[String], inner_groups: &[usize], first: usize) -> Result<Self, ConfigError> {
        let mut source = String::from("(?:");
        let mut groups = Vec::with_capacity(sources.len());
        let mut next_group = 1;

        for (offset, (pattern, inner)) in sources.iter().zip(inner_groups).enumerate() {
            if offset > 0 {
                source.push('|');
            }
            source.push('(');
            source.push_str(pattern);
            source.push(')');
            groups.push(next_group);
            next_group += 1 + inner;
        }
        source.push(')');

        let regex = Regex::new(&source)?;
        Ok(Self {
            regex,
            source,
            groups,
            first,
        })
    }

    /// 在 `at` 处做锚定匹配，返回捕获到文本的最低编号规则
    pub fn match_at(&self, input: &str, at: usize) -> Option<AltMatch> {
        let mut caps = self.regex.create_captures();
        let search = Input::new(input)
            .span(at..input.len())
            .anchored(Anchored::Yes);
        self.regex.search_captures(&search, &mut caps);
        if !caps.is_match() {
            return None;
        }

        self.groups.iter().enumerate().find_map(|(offset, &group)| {
            caps.get_group(group).map(|span| AltMatch {
                rule: self.first + offset,
                start: span.start,
                end: span.end,
            })
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn first(&self) -> usize {
        self.first
    }

    /// 覆盖的规则数
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}

struct StatePatterns {
    sources: Vec<String>,
    inner_groups: Vec<usize>,
    /// 下标 = 起始规则；0 号即完整交替式
    alternations: Vec<OnceCell<Alternation>>,
}

/// 每个 lexer 实例一份的交替式缓存
pub struct RegexCompiler {
    names: Arc<StateNames>,
    states: Vec<StatePatterns>,
}

impl RegexCompiler {
    /// 逐条校验规则模式并记录其内部捕获组数；交替式本身惰性编译
    pub fn new<T>(names: Arc<StateNames>, rules: &[Vec<Rule<T>>]) -> Result<Self, ConfigError> {
        let mut states = Vec::with_capacity(rules.len());
        for state_rules in rules {
            let mut sources = Vec::with_capacity(state_rules.len());
            let mut inner_groups = Vec::with_capacity(state_rules.len());
            for rule in state_rules {
                inner_groups.push(inner_group_count(&rule.pattern)?);
                sources.push(rule.pattern.source().to_string());
            }
            let alternations = (0..state_rules.len()).map(|_| OnceCell::new()).collect();
            states.push(StatePatterns {
                sources,
                inner_groups,
                alternations,
            });
        }
        Ok(Self { names, states })
    }

    /// 预编译所有状态的完整交替式
    pub fn compile_all(&self) -> Result<(), ConfigError> {
        for index in 0..self.states.len() {
            self.full(StateId(index))?;
        }
        Ok(())
    }

    /// 状态的完整交替式；状态没有规则时为 `None`
    pub fn full(&self, state: StateId) -> Result<Option<&Alternation>, ConfigError> {
        self.alternation(state, 0)
    }

    /// 覆盖 `from..` 规则的后缀交替式；没有剩余规则时为 `None`
    pub fn suffix(&self, state: StateId, from: usize) -> Result<Option<&Alternation>, ConfigError> {
        self.alternation(state, from)
    }

    fn alternation(&self, state: StateId, from: usize) -> Result<Option<&Alternation>, ConfigError> {
        let patterns = &self.states[state.index()];
        let Some(cell) = patterns.alternations.get(from) else {
            trace!(
                target: targets::COMPILER,
                state = self.names.name(state),
                from,
                "No rules left for suffix alternation"
            );
            return Ok(None);
        };

        let alternation = cell.get_or_try_init(|| {
            let alternation = Alternation::build(
                &patterns.sources[from..],
                &patterns.inner_groups[from..],
                from,
            )?;
            debug!(
                target: targets::COMPILER,
                state = self.names.name(state),
                from,
                rules = alternation.len(),
                source = alternation.source(),
                "Compiled alternation"
            );
            Ok::<_, ConfigError>(alternation)
        })?;
        Ok(Some(alternation))
    }

    /// 已编译的交替式数量（含后缀）
    pub fn compiled_count(&self) -> usize {
        self.states
            .iter()
            .flat_map(|s| s.alternations.iter())
            .filter(|cell| cell.get().is_some())
            .count()
    }
}

/// 规则模式自身的捕获组数，同时校验模式语法
fn inner_group_count(pattern: &Pattern) -> Result<usize, ConfigError> {
    match pattern {
        Pattern::Compiled(regex) => Ok(regex.captures_len() - 1),
        Pattern::Source(source) => {
            let regex = Regex::new(source)?;
            Ok(regex.group_info().group_len(PatternID::ZERO) - 1)
        }
    }
}
