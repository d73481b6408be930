//! 性质测试：覆盖、确定性、谓词拒绝后的规则编号

mod common;

use common::*;
use proptest::prelude::*;
use statelex_core::{LexError, Lexer, Rule};

/// 由 token 形状的片段拼成，保证每个位置都有规则能匹配
fn arith_input() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "%[a-z]{1,5}",
        "[a-z]{1,4}",
        "[0-9]{1,3}",
        "[+*^\\-]",
        "[ \t\n]{1,2}",
    ];
    prop::collection::vec(piece, 1..16).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn tokens_cover_input_without_gaps(input in arith_input()) {
        let tokens = lex_all(&arith_lexer(), &input);

        let mut cursor = 0;
        for token in &tokens {
            prop_assert_eq!(token.start(), cursor);
            prop_assert!(!token.is_empty());
            cursor = token.end();
        }
        prop_assert_eq!(cursor, input.len());
        prop_assert_eq!(texts(&tokens).concat(), input);
    }

    #[test]
    fn tokenize_is_deterministic(input in arith_input()) {
        let lexer = arith_lexer();
        let first: Vec<_> = lexer.tokenize(&input).map(|r| r.map_err(|e| e.to_string())).collect();
        let second: Vec<_> = lexer.tokenize(&input).map(|r| r.map_err(|e| e.to_string())).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tokenize_from_token_start_yields_suffix(input in arith_input(), pick in any::<prop::sample::Index>()) {
        let lexer = arith_lexer();
        let tokens = lex_all(&lexer, &input);

        let k = pick.index(tokens.len());
        let suffix: Vec<_> = lexer
            .tokenize_from(&input, tokens[k].start())
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(suffix, tokens[k..].to_vec());
    }

    #[test]
    fn rejections_resolve_to_first_accepting_rule(accepts in prop::collection::vec(any::<bool>(), 1..12)) {
        // 所有规则都匹配 `x`，谓词按 `accepts` 接受或拒绝
        let rules: Vec<Rule> = accepts
            .iter()
            .enumerate()
            .map(|(i, &accept)| Rule::new("x").kind(format!("r{}", i)).test(move |_| accept))
            .collect();
        let lexer = Lexer::new(rules).unwrap();

        let mut tokens = lexer.tokenize("x");
        match accepts.iter().position(|&accept| accept) {
            Some(winner) => {
                let token = tokens.next().unwrap().unwrap();
                prop_assert_eq!(token.kind, format!("r{}", winner));
            }
            None => {
                let is_no_match = matches!(tokens.next(), Some(Err(LexError::NoMatch { offset: 0, .. })));
                prop_assert!(is_no_match);
            }
        }
    }

    #[test]
    fn rejections_with_mixed_patterns_keep_indices(
        patterns in prop::collection::vec(prop::sample::select(vec!["x", "y", "x+", "[xy]"]), 1..10),
        accepts in prop::collection::vec(any::<bool>(), 10),
        input in "[xy]{1,3}",
    ) {
        let rules: Vec<Rule> = patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| {
                let accept = accepts[i];
                Rule::new(*pattern).kind(format!("r{}", i)).test(move |_| accept)
            })
            .collect();
        let lexer = Lexer::new(rules).unwrap();

        // 参照实现：逐条规则做锚定匹配，取第一条既匹配又被接受的
        let expected = patterns.iter().enumerate().find_map(|(i, pattern)| {
            let re = regex::Regex::new(&format!("^(?:{})", pattern)).unwrap();
            re.find(&input).filter(|_| accepts[i]).map(|m| (format!("r{}", i), m.end()))
        });

        match (lexer.tokenize(&input).next(), expected) {
            (Some(Ok(token)), Some((kind, end))) => {
                prop_assert_eq!(token.end(), end);
                prop_assert_eq!(token.kind, kind);
            }
            (Some(Err(LexError::NoMatch { .. })), None) => {}
            (actual, expected) => {
                prop_assert!(false, "got {:?}, expected {:?}", actual, expected);
            }
        }
    }
}
