//! rsauthcharset - 根据 User-Agent 判断浏览器编码 HTTP Basic 认证凭据所用的字符集
//!
//! Chromium 系浏览器（Chrome、Opera）使用 UTF-8，Firefox、IE、Safari 使用 ISO-8859-1，
//! 无法识别时回退到配置的默认字符集。
//!
//! ```
//! use rsauthcharset::{Charset, EncodingDetector};
//!
//! let detector = EncodingDetector::new(Charset::Utf8);
//! let ua = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko";
//! assert_eq!(detector.detect(Some(ua)), Charset::Iso8859_1);
//! assert_eq!(detector.detect(None), Charset::Utf8);
//! ```

// 导出全局错误类型
pub use self::error::{AuthCharsetError, AcResult};

// 导出字符集
pub use self::charset::Charset;

// 导出配置模块
pub use self::config::{GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{BrowserRule, RuleLibrary, RuleLoader, builtin_rules};

// 导出编译模块核心接口
pub use self::compiler::{CompiledBrowserPattern, PatternTable, RuleCompiler};

// 导出工具模块核心接口
pub use self::utils::{BasicCredentials, CredentialDecoder, HeaderConverter};

// 导出检测模块核心接口
pub use self::detector::{
    EncodingDetector,
    init_detector,
    init_detector_with_config,
    detect_basic_auth_charset,
    detect_basic_auth_charset_from_headers,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod charset;
pub mod rule;
pub mod utils;
pub mod compiler;
pub mod detector;
