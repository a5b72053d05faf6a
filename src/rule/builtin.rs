//! 内置浏览器规则表
//! 顺序有意义：Opera 与 Chrome 的 UA 都带 Safari 兼容标记，Opera 的 UA 还带 Chrome 标记，
//! 因此更具体的规则必须排在前面，Safari 规则同时排除 OPR 与 Chrome。

use super::model::{BrowserRule, RuleLibrary};
use crate::charset::Charset;

pub const OPERA: &str = "Opera";
pub const CHROME: &str = "Chrome";
pub const FIREFOX: &str = "Firefox";
pub const IE11: &str = "IE11";
pub const IE10: &str = "IE10";
pub const SAFARI: &str = "Safari";

const OPERA_USER_AGENT: &str = r"Mozilla/5\.0 \(.*\) .* OPR/.*";
// 与 Opera 唯一的区别是没有 OPR 标记
const CHROME_USER_AGENT: &str = r"(?!.*OPR)Mozilla/5\.0 \(.*\) Chrome/.*";
const FIREFOX_USER_AGENT: &str = r"Mozilla/5\.0 \(.*\) Gecko/.* Firefox/.*";
const IE11_USER_AGENT: &str = r"Mozilla/5\.0 \(.*; Trident/.*; rv:.*\).*";
const IE10_USER_AGENT: &str = r"Mozilla/5\.0 \(.* MSIE.* Trident/.*\)";
const SAFARI_USER_AGENT: &str = r"(?!.*OPR)(?!.*Chrome)Mozilla/5\.0 \(.*\).* Safari/.*";

/// 内置的六条规则（固定顺序）
pub fn builtin_rules() -> RuleLibrary {
    RuleLibrary::from(vec![
        BrowserRule::new(OPERA, OPERA_USER_AGENT, Charset::Utf8),
        BrowserRule::new(CHROME, CHROME_USER_AGENT, Charset::Utf8),
        BrowserRule::new(FIREFOX, FIREFOX_USER_AGENT, Charset::Iso8859_1),
        BrowserRule::new(IE11, IE11_USER_AGENT, Charset::Iso8859_1),
        BrowserRule::new(IE10, IE10_USER_AGENT, Charset::Iso8859_1),
        BrowserRule::new(SAFARI, SAFARI_USER_AGENT, Charset::Iso8859_1),
    ])
}
