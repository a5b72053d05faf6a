//! 凭据字符集
//! Basic认证只涉及两种编码：UTF-8 与 ISO-8859-1

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AcResult, AuthCharsetError};

/// 浏览器编码Basic认证凭据时使用的字符集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Iso8859_1,
}

impl Charset {
    /// 规范名称（IANA）
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// 按当前字符集将字节解码为字符串
    ///
    /// - UTF-8：严格解码，非法序列返回错误
    /// - ISO-8859-1：每个字节直接映射到 U+0000..=U+00FF，不会失败
    pub fn decode(&self, bytes: &[u8]) -> AcResult<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| {
                AuthCharsetError::MalformedCredentials { charset: self.name() }
            }),
            Charset::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = AuthCharsetError;

    /// 解析字符集标签（忽略大小写）
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Ok(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "iso_8859_1" | "iso88591" | "latin1"
            | "latin-1" | "l1" | "cp819" | "ibm819" => Ok(Charset::Iso8859_1),
            _ => Err(AuthCharsetError::UnknownCharset(label.to_string())),
        }
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Charset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
