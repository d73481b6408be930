//! 测试辅助工具
//!
//! 提供端到端测试共用的规则集和收集函数

#![allow(dead_code)]

use statelex_core::{
    LexError, Lexer, ReadContext, Rule, StateControl, StateTable, Token, Value,
};

/// 收集全部 token，遇错 panic
pub fn lex_all(lexer: &Lexer, input: &str) -> Vec<Token> {
    lexer
        .tokenize(input)
        .collect::<Result<_, _>>()
        .unwrap_or_else(|err| panic!("tokenize {:?} failed: {}", input, err))
}

/// 收集直到第一个错误
pub fn lex_until_error(lexer: &Lexer, input: &str) -> (Vec<Token>, Option<LexError>) {
    let mut tokens = Vec::new();
    for item in lexer.tokenize(input) {
        match item {
            Ok(token) => tokens.push(token),
            Err(err) => return (tokens, Some(err)),
        }
    }
    (tokens, None)
}

pub fn kinds(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.kind.as_str()).collect()
}

pub fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// 去掉空白 token
pub fn without_ws(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| t.kind != "ws").collect()
}

/// 运算符 / 空白 / 标识符 / 整数，外加带谓词的 `%word`
pub fn arith_rules() -> Vec<Rule> {
    vec![
        Rule::new(r"[*/+\-^]"),
        Rule::new(r"[ \t\n]+").kind("ws"),
        Rule::new("[a-z]+").kind("id"),
        Rule::new("[0-9]+").kind("int"),
        Rule::new("%[a-z]+")
            .kind_with(|matched| matched[1..].to_string())
            .test(|ctx| ctx.matched().contains("ya")),
        Rule::new("%[a-z]+").kind("invalid"),
    ]
}

pub fn arith_lexer() -> Lexer {
    Lexer::new(arith_rules()).expect("arith rules are valid")
}

/// 与 [`arith_rules`] 相同，但整数的值解析为数字
pub fn arith_lexer_with_ints() -> Lexer {
    let mut rules = arith_rules();
    rules[3] = Rule::new("[0-9]+")
        .kind("int")
        .value(|ctx| ctx.text().parse::<i64>().map(Value::Int).unwrap_or(Value::Null));
    Lexer::new(rules).expect("arith rules are valid")
}

/// 两个状态的模板语言：`start` 里是文本和 `{表达式}`，`tag` 里是标签内容
///
/// `<` 在 `start` 中切换到 `tag` 并中止，由 `tag` 重新匹配；
/// `>` 产出后弹回 `start`。
pub fn template_lexer() -> Lexer {
    let table = StateTable::new()
        .state(
            "start",
            vec![
                Rule::new("<").before(|ctx| {
                    ctx.push_state("tag")?;
                    ctx.abort();
                    Ok(())
                }),
                Rule::new(r"\{[^}]*\}").kind("expression"),
                Rule::new(r"[^<{]+").kind("text"),
            ],
        )
        .state(
            "tag",
            vec![
                Rule::new("<"),
                Rule::new("/"),
                Rule::new("[a-z]+").kind("name"),
                Rule::new(r"\s+").kind("ws"),
                Rule::new(">").after(|ctx| {
                    ctx.pop_state()?;
                    Ok(())
                }),
            ],
        );
    Lexer::with_states(table).expect("template table is valid")
}
