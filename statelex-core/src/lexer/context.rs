//! Hook 上下文
//!
//! 每种 hook 拿到刚好够用的能力：
//!
//! | hook | 类型 | 能力 |
//! |------|------|------|
//! | test | [`MatchContext`] | 只读 + 上一个 token |
//! | before | [`BeforeContext`] | 只读 + 状态切换 + 中止 |
//! | fetch | [`FetchContext`] | 只读 + 游标窗口 |
//! | value | [`ValueContext`] | 只读 |
//! | after | [`AfterContext`] | 只读 + 状态切换 + 最终 token |

use super::error::{CursorError, StateError};
use super::state::StateStack;

/// 所有 hook 共有的只读视图
pub trait ReadContext {
    /// 整个输入
    fn input(&self) -> &str;
    /// 交替式匹配到的原始文本（不含 fetch 扩展）
    fn matched(&self) -> &str;
    /// 匹配起点
    fn start(&self) -> usize;
    /// 当前游标
    fn position(&self) -> usize;
    /// 当前状态名
    fn state(&self) -> &str;
}

/// 状态栈操作
pub trait StateControl {
    fn push_state(&mut self, name: &str) -> Result<(), StateError>;
    fn pop_state(&mut self) -> Result<(), StateError>;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Shared<'c> {
    pub input: &'c str,
    pub matched: &'c str,
    pub start: usize,
}

/// 谓词上下文；游标尚未移动，`position() == start()`
pub struct MatchContext<'c, T> {
    pub(crate) shared: Shared<'c>,
    pub(crate) state: &'c str,
    pub(crate) last_token: Option<&'c T>,
}

impl<T> MatchContext<'_, T> {
    /// 上一个产出的 token
    pub fn last_token(&self) -> Option<&T> {
        self.last_token
    }
}

impl<T> ReadContext for MatchContext<'_, T> {
    fn input(&self) -> &str {
        self.shared.input
    }

    fn matched(&self) -> &str {
        self.shared.matched
    }

    fn start(&self) -> usize {
        self.shared.start
    }

    fn position(&self) -> usize {
        self.shared.start
    }

    fn state(&self) -> &str {
        self.state
    }
}

/// value hook 上下文
pub struct ValueContext<'c> {
    pub(crate) shared: Shared<'c>,
    pub(crate) state: &'c str,
    pub(crate) position: usize,
}

impl ValueContext<'_> {
    /// 最终的 token 文本（包含 fetch 扩展）
    pub fn text(&self) -> &str {
        &self.shared.input[self.shared.start..self.position]
    }
}

impl ReadContext for ValueContext<'_> {
    fn input(&self) -> &str {
        self.shared.input
    }

    fn matched(&self) -> &str {
        self.shared.matched
    }

    fn start(&self) -> usize {
        self.shared.start
    }

    fn position(&self) -> usize {
        self.position
    }

    fn state(&self) -> &str {
        self.state
    }
}

/// before hook 上下文
///
/// 中止后引擎丢弃本次匹配，在（可能已切换的）状态下从同一位置重新匹配。
/// 中止却不切换状态会在同一位置无限重试，由调用方负责避免。
pub struct BeforeContext<'c> {
    pub(crate) shared: Shared<'c>,
    pub(crate) position: usize,
    pub(crate) states: &'c mut StateStack,
    pub(crate) aborted: bool,
}

impl BeforeContext<'_> {
    pub fn abort(&mut self) {
        self.aborted = true;
    }
}

impl ReadContext for BeforeContext<'_> {
    fn input(&self) -> &str {
        self.shared.input
    }

    fn matched(&self) -> &str {
        self.shared.matched
    }

    fn start(&self) -> usize {
        self.shared.start
    }

    fn position(&self) -> usize {
        self.position
    }

    fn state(&self) -> &str {
        self.states.current_name()
    }
}

impl StateControl for BeforeContext<'_> {
    fn push_state(&mut self, name: &str) -> Result<(), StateError> {
        self.states.push(name)
    }

    fn pop_state(&mut self) -> Result<(), StateError> {
        self.states.pop()
    }
}

/// fetch hook 上下文：`[start, position)` 是 token 的范围
///
/// 游标可以越过匹配结束位置继续消费，但回退不能早于匹配结束位置。
/// 所有偏移都是字节偏移，逐字符操作按完整 `char` 前进 / 后退。
pub struct FetchContext<'c> {
    pub(crate) shared: Shared<'c>,
    pub(crate) state: &'c str,
    pub(crate) cursor: usize,
    /// 匹配结束位置，回退下界
    pub(crate) boundary: usize,
}

impl FetchContext<'_> {
    /// 查看下一个字符，不消费
    pub fn peek(&self) -> Option<char> {
        self.shared.input[self.cursor..].chars().next()
    }

    /// 消费并返回下一个字符；输入结束时返回 `None` 且不移动
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// 回退 `count` 个字符
    pub fn back(&mut self, count: usize) -> Result<(), CursorError> {
        let error = CursorError::BeforeBoundary {
            cursor: self.cursor,
            count,
            boundary: self.boundary,
        };
        let mut target = self.cursor;
        for _ in 0..count {
            match self.shared.input[..target].chars().next_back() {
                Some(c) => target -= c.len_utf8(),
                None => return Err(error),
            }
            if target < self.boundary {
                return Err(error);
            }
        }
        self.cursor = target;
        Ok(())
    }

    /// 跳到 `index`（字节偏移），不能后退
    pub fn advance_to(&mut self, index: usize) -> Result<(), CursorError> {
        let input = self.shared.input;
        if index < self.cursor {
            return Err(CursorError::Backwards {
                cursor: self.cursor,
                target: index,
            });
        }
        if index > input.len() {
            return Err(CursorError::OutOfBounds {
                offset: index,
                len: input.len(),
            });
        }
        if !input.is_char_boundary(index) {
            return Err(CursorError::NotCharBoundary(index));
        }
        self.cursor = index;
        Ok(())
    }

    /// 到目前为止的 token 文本
    pub fn text(&self) -> &str {
        &self.shared.input[self.shared.start..self.cursor]
    }

    /// 尚未消费的输入
    pub fn rest(&self) -> &str {
        &self.shared.input[self.cursor..]
    }
}

impl ReadContext for FetchContext<'_> {
    fn input(&self) -> &str {
        self.shared.input
    }

    fn matched(&self) -> &str {
        self.shared.matched
    }

    fn start(&self) -> usize {
        self.shared.start
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn state(&self) -> &str {
        self.state
    }
}

/// after hook 上下文
pub struct AfterContext<'c, T> {
    pub(crate) shared: Shared<'c>,
    pub(crate) position: usize,
    pub(crate) states: &'c mut StateStack,
    pub(crate) token: &'c T,
}

impl<T> AfterContext<'_, T> {
    /// 刚产出的 token
    pub fn token(&self) -> &T {
        self.token
    }
}

impl<T> ReadContext for AfterContext<'_, T> {
    fn input(&self) -> &str {
        self.shared.input
    }

    fn matched(&self) -> &str {
        self.shared.matched
    }

    fn start(&self) -> usize {
        self.shared.start
    }

    fn position(&self) -> usize {
        self.position
    }

    fn state(&self) -> &str {
        self.states.current_name()
    }
}

impl<T> StateControl for AfterContext<'_, T> {
    fn push_state(&mut self, name: &str) -> Result<(), StateError> {
        self.states.push(name)
    }

    fn pop_state(&mut self) -> Result<(), StateError> {
        self.states.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch(input: &str, start: usize, end: usize) -> FetchContext<'_> {
        FetchContext {
            shared: Shared {
                input,
                matched: &input[start..end],
                start,
            },
            state: "start",
            cursor: end,
            boundary: end,
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let ctx = fetch("\"ab\"", 0, 1);
        assert_eq!(ctx.peek(), Some('a'));
        assert_eq!(ctx.position(), 1);
    }

    #[test]
    fn test_next_extends_text() {
        let mut ctx = fetch("\"ab\"", 0, 1);
        assert_eq!(ctx.next(), Some('a'));
        assert_eq!(ctx.next(), Some('b'));
        assert_eq!(ctx.text(), "\"ab");
        assert_eq!(ctx.rest(), "\"");
        assert_eq!(ctx.matched(), "\"");
    }

    #[test]
    fn test_next_at_end_of_input() {
        let mut ctx = fetch("ab", 0, 2);
        assert_eq!(ctx.next(), None);
        assert_eq!(ctx.position(), 2);
    }

    #[test]
    fn test_next_steps_over_multibyte_chars() {
        let mut ctx = fetch("'é'", 0, 1);
        assert_eq!(ctx.next(), Some('é'));
        assert_eq!(ctx.position(), 3);
        ctx.back(1).unwrap();
        assert_eq!(ctx.position(), 1);
    }

    #[test]
    fn test_back_stops_at_match_end() {
        let mut ctx = fetch("abcdef", 0, 2);
        ctx.advance_to(5).unwrap();
        ctx.back(3).unwrap();
        assert_eq!(ctx.position(), 2);

        let err = ctx.back(1).unwrap_err();
        assert_eq!(
            err,
            CursorError::BeforeBoundary {
                cursor: 2,
                count: 1,
                boundary: 2
            }
        );
        assert_eq!(ctx.position(), 2);
    }

    #[test]
    fn test_back_past_input_start() {
        let mut ctx = fetch("ab", 0, 0);
        assert!(matches!(ctx.back(1), Err(CursorError::BeforeBoundary { .. })));
    }

    #[test]
    fn test_advance_to_rejects_backwards() {
        let mut ctx = fetch("abcdef", 0, 3);
        assert_eq!(
            ctx.advance_to(1),
            Err(CursorError::Backwards {
                cursor: 3,
                target: 1
            })
        );
    }

    #[test]
    fn test_advance_to_bounds() {
        let mut ctx = fetch("aé", 0, 1);
        assert_eq!(ctx.advance_to(2), Err(CursorError::NotCharBoundary(2)));
        assert_eq!(
            ctx.advance_to(9),
            Err(CursorError::OutOfBounds { offset: 9, len: 3 })
        );
        ctx.advance_to(3).unwrap();
        assert_eq!(ctx.rest(), "");
    }
}
