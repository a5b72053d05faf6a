//! 全局错误类型定义
//! 仅构建/配置与凭据解码会返回错误，编码检测本身永不失败

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum AuthCharsetError {
    // 规则相关错误
    #[error("规则解析失败：{0}")]
    RuleParseError(String),
    #[error("规则表无效：{0}")]
    InvalidRuleTable(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),
    #[error("不支持的环视语法（规则 {rule}）：{pattern}")]
    UnsupportedLookaround { rule: String, pattern: String },

    // 字符集相关错误
    #[error("未知字符集：{0}")]
    UnknownCharset(String),

    // 检测器相关错误
    #[error("检测器未初始化")]
    DetectorNotInitialized,

    // 凭据解码错误
    #[error("Authorization头缺失或不是Basic认证")]
    NotBasicAuth,
    #[error("Base64解码失败：{0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("凭据缺少':'分隔符")]
    MissingSeparator,
    #[error("凭据不是合法的{charset}字节序列")]
    MalformedCredentials { charset: &'static str },

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type AcResult<T> = Result<T, AuthCharsetError>;
