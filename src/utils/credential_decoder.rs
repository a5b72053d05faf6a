//! Basic认证凭据解码
//! 解析 `Authorization: Basic <base64>`，按指定字符集还原用户名与密码

use std::fmt;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::charset::Charset;
use crate::error::{AcResult, AuthCharsetError};

static BASIC_AUTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?i:basic)\s+(\S+)\s*$").unwrap()
});

/// 解码后的用户名/密码
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

// 密码不进日志
impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Basic认证凭据解码器
pub struct CredentialDecoder;

impl CredentialDecoder {
    /// 解析 Authorization 头的值
    ///
    /// # 参数
    /// - `authorization`: 头的值，如 `Basic Zm9vOmJhcg==`（scheme 不区分大小写）
    /// - `charset`: 浏览器编码凭据时使用的字符集
    ///
    /// # 返回值
    /// 以第一个 `:` 分割出的用户名与密码
    pub fn decode(authorization: &str, charset: Charset) -> AcResult<BasicCredentials> {
        // 1. 提取 base64 部分
        let captures = BASIC_AUTH_REGEX
            .captures(authorization)
            .ok_or(AuthCharsetError::NotBasicAuth)?;
        let token = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        // 2. base64 解码并按字符集还原
        let raw = BASE64_STANDARD.decode(token)?;
        let userpass = charset.decode(&raw)?;

        // 3. 分割用户名与密码
        let (username, password) = userpass
            .split_once(':')
            .ok_or(AuthCharsetError::MissingSeparator)?;

        Ok(BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
