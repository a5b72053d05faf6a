//! Header读取工具
//! 从不同格式的请求头中取出 User-Agent / Authorization

use std::borrow::Cow;
use std::collections::HashMap;
use http::header::{AUTHORIZATION, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use tracing::warn;

/// Header读取工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 从HeaderMap读取第一个 User-Agent（名称不区分大小写）
    ///
    /// 非可见ASCII的值按 ISO-8859-1 逐字节还原，不会丢弃
    pub fn user_agent(headers: &HeaderMap) -> Option<Cow<'_, str>> {
        headers.get(USER_AGENT).map(Self::value_to_str)
    }

    /// 从 HashMap<String, Vec<String>> 读取第一个 User-Agent
    pub fn user_agent_from_hashmap(headers: &HashMap<String, Vec<String>>) -> Option<&str> {
        Self::first_value(headers, USER_AGENT.as_str())
    }

    /// 从HeaderMap读取第一个 Authorization
    pub fn authorization(headers: &HeaderMap) -> Option<&str> {
        let value = headers.get(AUTHORIZATION)?;
        match value.to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                warn!("Authorization头包含非ASCII字符，忽略");
                None
            }
        }
    }

    /// 从 HashMap<String, Vec<String>> 读取第一个 Authorization
    pub fn authorization_from_hashmap(headers: &HashMap<String, Vec<String>>) -> Option<&str> {
        Self::first_value(headers, AUTHORIZATION.as_str())
    }

    fn first_value<'a>(headers: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    fn value_to_str(value: &HeaderValue) -> Cow<'_, str> {
        match value.to_str() {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => Cow::Owned(value.as_bytes().iter().map(|&b| char::from(b)).collect()),
        }
    }
}
