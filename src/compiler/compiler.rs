//! 规则编译器核心
//! 将规则编译为整串锚定的正则；regex 引擎不支持环视，
//! 模式开头的 `(?!...)` 会被拆为独立的排除正则，其余位置的环视直接拒绝

use std::time::Instant;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::pattern::{CompiledBrowserPattern, PatternTable};
use crate::rule::{BrowserRule, RuleLibrary};
use crate::error::{AcResult, AuthCharsetError};

/// 单条正则编译后的大小上限（字节）
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

// `.` 不匹配任何行终止符：\n \r U+0085 U+2028 U+2029
const LINE_DOT: &str = r"[^\n\r\x{85}\x{2028}\x{2029}]";

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则库（默认大小上限）
    pub fn compile(rule_lib: &RuleLibrary) -> AcResult<PatternTable> {
        Self::compile_with_limit(rule_lib, DEFAULT_SIZE_LIMIT)
    }

    /// 编译规则库，保持声明顺序
    pub fn compile_with_limit(rule_lib: &RuleLibrary, size_limit: usize) -> AcResult<PatternTable> {
        let start = Instant::now();
        let mut stats = CompileStats::default();

        let mut patterns = Vec::with_capacity(rule_lib.len());
        for rule in &rule_lib.rules {
            patterns.push(Self::compile_rule(rule, size_limit, &mut stats)?);
        }

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：规则{}条、排除条件{}条",
            stats.rule_count, stats.exclude_count
        );

        Ok(PatternTable::new(patterns))
    }

    /// 编译单条规则
    fn compile_rule(
        rule: &BrowserRule,
        size_limit: usize,
        stats: &mut CompileStats,
    ) -> AcResult<CompiledBrowserPattern> {
        let unsupported = || AuthCharsetError::UnsupportedLookaround {
            rule: rule.name.clone(),
            pattern: rule.pattern.clone(),
        };

        // 1. 拆出开头的否定先行断言
        let (exclude_sources, body) =
            Self::split_leading_lookaheads(&rule.pattern).ok_or_else(unsupported)?;

        // 2. 其余位置不允许出现环视
        if Self::contains_lookaround(body)
            || exclude_sources.iter().any(|source| Self::contains_lookaround(source))
        {
            return Err(unsupported());
        }

        // 3. 主正则整串锚定，排除正则只锚定开头（与断言在位置0求值一致）
        let matcher = Self::build_regex(
            &format!("^(?:{})$", Self::rewrite_dots(body)),
            size_limit,
        )?;
        let excludes = exclude_sources
            .iter()
            .map(|source| {
                Self::build_regex(&format!("^(?:{})", Self::rewrite_dots(source)), size_limit)
            })
            .collect::<AcResult<Vec<Regex>>>()?;

        stats.rule_count += 1;
        stats.exclude_count += excludes.len();

        Ok(CompiledBrowserPattern {
            name: rule.name.clone(),
            matcher,
            excludes,
            charset: rule.charset,
        })
    }

    fn build_regex(source: &str, size_limit: usize) -> AcResult<Regex> {
        Ok(RegexBuilder::new(source)
            .size_limit(size_limit)
            .dfa_size_limit(size_limit)
            .build()?)
    }

    /// 将字符类之外未转义的 `.` 替换为 [`LINE_DOT`]
    fn rewrite_dots(s: &str) -> String {
        let bytes = s.as_bytes();
        let mut result = String::with_capacity(s.len());
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    // 跳过整个被转义的字符（可能是多字节）
                    i += 1;
                    if let Some(c) = s.get(i..).and_then(|tail| tail.chars().next()) {
                        i += c.len_utf8() - 1;
                    }
                }
                b'[' => match Self::skip_class(bytes, i) {
                    Some(end) => i = end,
                    None => break,
                },
                b'.' => {
                    result.push_str(&s[copied..i]);
                    result.push_str(LINE_DOT);
                    copied = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        result.push_str(&s[copied..]);
        result
    }

    /// 拆分模式开头连续的 `(?!...)`，返回（断言内容列表，剩余主体）
    ///
    /// 断言括号不闭合时返回 None
    fn split_leading_lookaheads(pattern: &str) -> Option<(Vec<&str>, &str)> {
        let mut excludes = Vec::new();
        let mut rest = pattern;

        while rest.starts_with("(?!") {
            let end = Self::find_group_end(rest)?;
            excludes.push(&rest[3..end]);
            rest = &rest[end + 1..];
        }

        Some((excludes, rest))
    }

    /// 找到与开头 `(` 配对的 `)` 下标（跳过转义与字符类）
    fn find_group_end(s: &str) -> Option<usize> {
        let bytes = s.as_bytes();
        let mut depth = 0usize;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'[' => i = Self::skip_class(bytes, i)?,
                b'(' => depth += 1,
                b')' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        None
    }

    /// 跳过字符类，返回结尾 `]` 的下标（支持嵌套字符类）
    fn skip_class(bytes: &[u8], open: usize) -> Option<usize> {
        let mut i = open + 1;
        if bytes.get(i) == Some(&b'^') {
            i += 1;
        }
        // 开头的 ] 是字面量
        if bytes.get(i) == Some(&b']') {
            i += 1;
        }

        let mut depth = 1usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        None
    }

    /// 是否含有环视语法：`(?=` `(?!` `(?<=` `(?<!`
    fn contains_lookaround(s: &str) -> bool {
        let bytes = s.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'[' => match Self::skip_class(bytes, i) {
                    Some(end) => i = end,
                    // 字符类不闭合交给 regex 报错
                    None => return false,
                },
                b'(' => {
                    let tail = &bytes[i + 1..];
                    if tail.starts_with(b"?=")
                        || tail.starts_with(b"?!")
                        || tail.starts_with(b"?<=")
                        || tail.starts_with(b"?<!")
                    {
                        return true;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        false
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    rule_count: usize,
    exclude_count: usize,
}
