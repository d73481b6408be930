//! 匹配裁决
//!
//! 在当前位置做锚定匹配，找出唯一胜出的规则：
//! 1. 交替式无匹配 → 失败
//! 2. 取捕获到文本的最低编号规则 i
//! 3. 规则 i 的谓词拒绝 → 用 i 之后的后缀交替式在同一位置重试
//! 4. 否则规则 i 胜出
//!
//! 后缀交替式直接报告原表下标，重试次数不超过该状态的规则数。

use statelex_config::targets;
use tracing::trace;

use super::compiler::{AltMatch, RegexCompiler};
use super::context::{MatchContext, Shared};
use super::error::ConfigError;
use super::rule::Rule;
use super::table::StateId;

pub struct MatchResolver<'l, T> {
    compiler: &'l RegexCompiler,
    rules: &'l [Rule<T>],
    state: StateId,
    state_name: &'l str,
}

impl<'l, T> MatchResolver<'l, T> {
    pub fn new(
        compiler: &'l RegexCompiler,
        rules: &'l [Rule<T>],
        state: StateId,
        state_name: &'l str,
    ) -> Self {
        Self {
            compiler,
            rules,
            state,
            state_name,
        }
    }

    /// 在 `at` 处裁决；`Ok(None)` 表示没有规则被接受
    pub fn resolve(
        &self,
        input: &str,
        at: usize,
        last_token: Option<&T>,
    ) -> Result<Option<AltMatch>, ConfigError> {
        let mut from = 0;
        loop {
            let Some(alternation) = self.compiler.suffix(self.state, from)? else {
                return Ok(None);
            };
            let Some(found) = alternation.match_at(input, at) else {
                trace!(
                    target: targets::RESOLVER,
                    state = self.state_name,
                    at,
                    from,
                    "No alternative matched"
                );
                return Ok(None);
            };

            if let Some(predicate) = &self.rules[found.rule].predicate {
                let ctx = MatchContext {
                    shared: Shared {
                        input,
                        matched: &input[found.start..found.end],
                        start: found.start,
                    },
                    state: self.state_name,
                    last_token,
                };
                if !predicate(&ctx) {
                    trace!(
                        target: targets::RESOLVER,
                        state = self.state_name,
                        rule = found.rule,
                        at,
                        "Predicate rejected match, retrying later rules"
                    );
                    from = found.rule + 1;
                    continue;
                }
            }

            trace!(
                target: targets::RESOLVER,
                state = self.state_name,
                rule = found.rule,
                start = found.start,
                end = found.end,
                "Resolved rule"
            );
            return Ok(Some(found));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::context::ReadContext;
    use crate::lexer::table::StateTable;
    use crate::lexer::token::Token;
    use std::sync::Arc;

    fn resolve(rules: Vec<Rule>, input: &str, at: usize) -> Option<usize> {
        let (names, rules) = StateTable::from(rules).resolve("start").unwrap();
        let compiler = RegexCompiler::new(Arc::new(names), &rules).unwrap();
        let resolver = MatchResolver::new(&compiler, &rules[0], StateId(0), "start");
        resolver
            .resolve(input, at, None::<&Token>)
            .unwrap()
            .map(|m| m.rule)
    }

    fn percent_rules() -> Vec<Rule> {
        vec![
            Rule::new("[a-z]+"),
            Rule::new("%[a-z]+").test(|ctx| ctx.matched().contains("ya")),
            Rule::new("%[a-z]+"),
        ]
    }

    #[test]
    fn test_predicate_accepts() {
        assert_eq!(resolve(percent_rules(), "%yay", 0), Some(1));
    }

    #[test]
    fn test_predicate_rejects_falls_through() {
        assert_eq!(resolve(percent_rules(), "%is", 0), Some(2));
    }

    #[test]
    fn test_consecutive_rejections_keep_original_index() {
        let rules = vec![
            Rule::new("x").test(|_| false),
            Rule::new("x").test(|_| false),
            Rule::new("y"),
            Rule::new("x").test(|_| false),
            Rule::new("x"),
        ];
        assert_eq!(resolve(rules, "x", 0), Some(4));
    }

    #[test]
    fn test_all_rejected_is_failure() {
        let rules = vec![Rule::new("x").test(|_| false), Rule::new("x").test(|_| false)];
        assert_eq!(resolve(rules, "x", 0), None);
    }

    #[test]
    fn test_rejection_retries_at_same_offset() {
        // 后面的规则可能匹配得更长
        let rules = vec![
            Rule::new("ab").test(|ctx| ctx.start() != 2),
            Rule::new("abc"),
        ];
        assert_eq!(resolve(rules, "ababc", 2), Some(1));
    }

    #[test]
    fn test_predicate_sees_match_context() {
        let rules = vec![Rule::new("[0-9]+").test(|ctx| {
            ctx.start() == 2 && ctx.matched() == "34" && ctx.input() == "ab34" && ctx.state() == "start"
        })];
        assert_eq!(resolve(rules, "ab34", 2), Some(0));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve(percent_rules(), "#", 0), None);
    }
}
