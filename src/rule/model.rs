//! 规则数据模型定义
//! 仅存储规则数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::charset::Charset;

/// 浏览器识别规则（未编译）
///
/// `pattern` 需匹配整个 User-Agent；开头可带若干 `(?!...)` 排除条件，
/// 编译时会被拆成独立的排除正则。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserRule {
    pub name: String,
    pub pattern: String,
    pub charset: Charset,
}

impl BrowserRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, charset: Charset) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            charset,
        }
    }
}

impl fmt::Display for BrowserRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.charset)
    }
}

/// 有序规则库：按声明顺序求值，先匹配者胜出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleLibrary {
    pub rules: Vec<BrowserRule>,
}

impl RuleLibrary {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<BrowserRule>> for RuleLibrary {
    fn from(rules: Vec<BrowserRule>) -> Self {
        Self { rules }
    }
}
