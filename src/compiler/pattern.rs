//! 编译后模式模型
//! 正则编译后的结构

use regex::Regex;

use crate::charset::Charset;

/// 编译后的浏览器模式
#[derive(Debug, Clone)]
pub struct CompiledBrowserPattern {
    pub name: String,
    /// 整串锚定的主正则 `^(?:...)$`
    pub matcher: Regex,
    /// 排除条件（对应原模式开头的 `(?!...)`），任一命中即判定不匹配
    pub excludes: Vec<Regex>,
    pub charset: Charset,
}

impl CompiledBrowserPattern {
    /// 整串匹配判断
    pub fn is_match(&self, user_agent: &str) -> bool {
        !self.excludes.iter().any(|exclude| exclude.is_match(user_agent))
            && self.matcher.is_match(user_agent)
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        self.matcher.as_str()
    }
}

/// 有序模式表，按声明顺序求值
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<CompiledBrowserPattern>,
}

impl PatternTable {
    pub(crate) fn new(patterns: Vec<CompiledBrowserPattern>) -> Self {
        Self { patterns }
    }

    /// 返回第一个匹配的模式
    pub fn find(&self, user_agent: &str) -> Option<&CompiledBrowserPattern> {
        self.patterns.iter().find(|pattern| pattern.is_match(user_agent))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledBrowserPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
