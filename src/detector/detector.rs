//! 检测器核心：按 User-Agent 判断浏览器编码 Basic 认证凭据时使用的字符集
use std::collections::HashMap;
use std::sync::Arc;

use http::HeaderMap;
use once_cell::sync::Lazy;
use tracing::trace;

use crate::charset::Charset;
use crate::compiler::{CompiledBrowserPattern, PatternTable, RuleCompiler};
use crate::config::GlobalConfig;
use crate::error::{AcResult, AuthCharsetError};
use crate::rule::{RuleLibrary, RuleLoader};
use crate::utils::{BasicCredentials, CredentialDecoder, HeaderConverter};

/// 内置规则表只编译一次，所有检测器共享
static BUILTIN_TABLE: Lazy<Arc<PatternTable>> = Lazy::new(|| {
    Arc::new(RuleCompiler::compile(&RuleLoader::load_builtin()).expect("内置规则编译失败"))
});

/// Basic认证编码检测器
///
/// 构建后只读，可在线程间任意共享；克隆只复制 `Arc`
#[derive(Debug, Clone)]
pub struct EncodingDetector {
    table: Arc<PatternTable>,
    default_charset: Charset,
}

impl EncodingDetector {
    /// 使用内置规则表创建检测器
    pub fn new(default_charset: Charset) -> Self {
        Self {
            table: Arc::clone(&BUILTIN_TABLE),
            default_charset,
        }
    }

    /// 按配置创建检测器（自定义规则表需要编译，可能失败）
    pub fn with_config(config: &GlobalConfig) -> AcResult<Self> {
        match &config.rules {
            None => Ok(Self::new(config.default_charset)),
            Some(_) => {
                let rule_lib = config.rule_library()?;
                let table = RuleCompiler::compile_with_limit(&rule_lib, config.max_pattern_size)?;
                Ok(Self {
                    table: Arc::new(table),
                    default_charset: config.default_charset,
                })
            }
        }
    }

    /// 使用自定义规则表创建检测器
    pub fn from_rules(rule_lib: &RuleLibrary, default_charset: Charset) -> AcResult<Self> {
        RuleLoader::validate(rule_lib)?;
        Ok(Self {
            table: Arc::new(RuleCompiler::compile(rule_lib)?),
            default_charset,
        })
    }

    pub fn default_charset(&self) -> Charset {
        self.default_charset
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// 返回第一个整串匹配的规则
    pub fn classify(&self, user_agent: &str) -> Option<&CompiledBrowserPattern> {
        self.table.find(user_agent)
    }

    /// 返回命中的浏览器家族名称
    pub fn detect_family(&self, user_agent: Option<&str>) -> Option<&str> {
        user_agent
            .and_then(|ua| self.classify(ua))
            .map(|pattern| pattern.name.as_str())
    }

    /// 核心检测接口
    ///
    /// 缺少 User-Agent 或没有规则命中时返回默认字符集，永不失败
    pub fn detect(&self, user_agent: Option<&str>) -> Charset {
        let Some(user_agent) = user_agent else {
            trace!("缺少User-Agent，使用默认字符集{}", self.default_charset);
            return self.default_charset;
        };

        match self.classify(user_agent) {
            Some(pattern) => {
                trace!("User-Agent命中规则：{}，字符集：{}", pattern.name, pattern.charset);
                pattern.charset
            }
            None => {
                trace!("User-Agent未命中任何规则，使用默认字符集{}", self.default_charset);
                self.default_charset
            }
        }
    }

    /// 检测接口（HeaderMap 头）
    pub fn detect_from_headers(&self, headers: &HeaderMap) -> Charset {
        self.detect(HeaderConverter::user_agent(headers).as_deref())
    }

    /// 检测接口（HashMap<String, Vec<String>> 头）
    pub fn detect_from_hashmap(&self, headers: &HashMap<String, Vec<String>>) -> Charset {
        self.detect(HeaderConverter::user_agent_from_hashmap(headers))
    }

    /// 检测字符集并解码 Authorization 头中的凭据
    pub fn decode_credentials(&self, headers: &HeaderMap) -> AcResult<BasicCredentials> {
        let authorization =
            HeaderConverter::authorization(headers).ok_or(AuthCharsetError::NotBasicAuth)?;
        CredentialDecoder::decode(authorization, self.detect_from_headers(headers))
    }

    /// 检测字符集并解码凭据（HashMap头）
    pub fn decode_credentials_hashmap(
        &self,
        headers: &HashMap<String, Vec<String>>,
    ) -> AcResult<BasicCredentials> {
        let authorization = HeaderConverter::authorization_from_hashmap(headers)
            .ok_or(AuthCharsetError::NotBasicAuth)?;
        CredentialDecoder::decode(authorization, self.detect_from_hashmap(headers))
    }
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self::new(Charset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::prelude::BASE64_STANDARD;
    use http::header::{AUTHORIZATION, USER_AGENT};
    use http::HeaderValue;

    use crate::rule::BrowserRule;
    use crate::rule::builtin::{CHROME, FIREFOX, IE10, IE11, OPERA, SAFARI};

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
    const OPERA_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 OPR/77.0.4054.203";
    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15";
    const IPHONE_SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1";
    const FIREFOX_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0";
    const IE11_UA: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko";
    const IE10_UA: &str = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)";
    const EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59";

    #[test]
    fn test_detect_chromium_family_utf8() {
        // 测试场景：Opera / Chrome / Chromium Edge 使用 UTF-8
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        assert_eq!(detector.detect(Some(OPERA_UA)), Charset::Utf8);
        assert_eq!(detector.detect(Some(CHROME_UA)), Charset::Utf8);
        assert_eq!(detector.detect(Some(EDGE_UA)), Charset::Utf8);
    }

    #[test]
    fn test_detect_latin1_browsers() {
        // 测试场景：Firefox / IE11 / IE10 / Safari 使用 ISO-8859-1
        let detector = EncodingDetector::new(Charset::Utf8);
        for ua in [FIREFOX_UA, IE11_UA, IE10_UA, SAFARI_UA, IPHONE_SAFARI_UA] {
            assert_eq!(detector.detect(Some(ua)), Charset::Iso8859_1, "UA: {}", ua);
        }
    }

    #[test]
    fn test_detect_family_names() {
        // 测试场景：每个样例 UA 命中预期规则
        let detector = EncodingDetector::default();
        let cases = [
            (OPERA_UA, OPERA),
            (CHROME_UA, CHROME),
            (FIREFOX_UA, FIREFOX),
            (IE11_UA, IE11),
            (IE10_UA, IE10),
            (SAFARI_UA, SAFARI),
        ];
        for (ua, family) in cases {
            assert_eq!(detector.detect_family(Some(ua)), Some(family), "UA: {}", ua);
        }
    }

    #[test]
    fn test_opera_never_classified_as_chrome_or_safari() {
        // 测试场景：Opera UA 同时带 Chrome 与 Safari 标记
        let detector = EncodingDetector::default();
        assert_eq!(detector.detect_family(Some(OPERA_UA)), Some(OPERA));
    }

    #[test]
    fn test_chrome_and_safari_tokens_classify_as_chrome() {
        // 测试场景：同时包含 Chrome 与 Safari 标记的构造串
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Chrome/1.0 Safari/1.0";
        assert_eq!(detector.detect_family(Some(ua)), Some(CHROME));
        assert_eq!(detector.detect(Some(ua)), Charset::Utf8);
    }

    #[test]
    fn test_safari_excludes_opr_anywhere() {
        // 测试场景：不带 Chrome/ 前缀但带 OPR 的 Safari 形串
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        let ua = "Mozilla/5.0 (Macintosh) AppleWebKit/605.1.15 Safari/605.1.15 xOPRx";
        assert_eq!(detector.detect_family(Some(ua)), None);
        assert_eq!(detector.detect(Some(ua)), Charset::Iso8859_1);
    }

    #[test]
    fn test_absent_or_empty_user_agent_uses_default() {
        // 测试场景：缺少或空的 User-Agent
        let utf8 = EncodingDetector::new(Charset::Utf8);
        let latin1 = EncodingDetector::new(Charset::Iso8859_1);
        assert_eq!(utf8.detect(None), Charset::Utf8);
        assert_eq!(utf8.detect(Some("")), Charset::Utf8);
        assert_eq!(latin1.detect(None), Charset::Iso8859_1);
        assert_eq!(latin1.detect(Some("")), Charset::Iso8859_1);
    }

    #[test]
    fn test_non_browser_user_agent_uses_default() {
        // 测试场景：服务间调用等非浏览器客户端
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        for ua in ["curl/7.68.0", "Java/11.0.2", "python-requests/2.25.1", "Mozilla/4.0"] {
            assert_eq!(detector.detect(Some(ua)), Charset::Iso8859_1, "UA: {}", ua);
            assert_eq!(detector.detect_family(Some(ua)), None);
        }
    }

    #[test]
    fn test_substring_does_not_match() {
        // 测试场景：浏览器 UA 前面有多余内容时不能命中（整串匹配）
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        let ua = format!("proxy {}", CHROME_UA);
        assert_eq!(detector.detect(Some(&ua)), Charset::Iso8859_1);
    }

    #[test]
    fn test_line_terminator_in_user_agent_uses_default() {
        // 测试场景：UA 中的 \r U+0085 U+2028 不能被 `.` 跨过，回退默认字符集
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        for ua in [
            "Mozilla/5.0 (X11\u{85}) Chrome/1",
            "Mozilla/5.0 (X11\r) Chrome/1",
            "Mozilla/5.0 (X11\u{2028}) Chrome/1",
        ] {
            assert_eq!(detector.detect_family(Some(ua)), None, "UA: {:?}", ua);
            assert_eq!(detector.detect(Some(ua)), Charset::Iso8859_1);
        }

        // obs-text 字节 0x85 经 HeaderMap 还原后同样回退
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_bytes(b"Mozilla/5.0 (X11\x85) Chrome/1").unwrap(),
        );
        assert_eq!(detector.detect_from_headers(&headers), Charset::Iso8859_1);
    }

    #[test]
    fn test_detect_is_idempotent() {
        // 测试场景：相同输入多次调用结果一致
        let detector = EncodingDetector::default();
        for ua in [Some(CHROME_UA), Some(SAFARI_UA), Some("curl/7.68.0"), None] {
            assert_eq!(detector.detect(ua), detector.detect(ua));
        }
    }

    #[test]
    fn test_long_user_agent_completes() {
        // 测试场景：超长的攻击性 UA 也能在线性时间内完成
        let detector = EncodingDetector::new(Charset::Utf8);
        let ua = format!("Mozilla/5.0 ({}", "(; Trident/; rv:".repeat(20_000));
        assert_eq!(detector.detect(Some(&ua)), Charset::Utf8);
    }

    #[test]
    fn test_detect_from_headers() {
        // 测试场景：从 HeaderMap / HashMap 读取 User-Agent
        let detector = EncodingDetector::new(Charset::Utf8);

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(FIREFOX_UA));
        assert_eq!(detector.detect_from_headers(&headers), Charset::Iso8859_1);
        assert_eq!(detector.detect_from_headers(&HeaderMap::new()), Charset::Utf8);

        let mut map = HashMap::new();
        map.insert("user-agent".to_string(), vec![SAFARI_UA.to_string()]);
        assert_eq!(detector.detect_from_hashmap(&map), Charset::Iso8859_1);
        assert_eq!(detector.detect_from_hashmap(&HashMap::new()), Charset::Utf8);
    }

    #[test]
    fn test_decode_credentials_uses_detected_charset() {
        // 测试场景：Firefox 发来的 ISO-8859-1 凭据被正确还原
        let detector = EncodingDetector::new(Charset::Utf8);
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(FIREFOX_UA));
        let value = format!("Basic {}", BASE64_STANDARD.encode(b"m\xfcller:geheim"));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());

        let creds = detector.decode_credentials(&headers).unwrap();
        assert_eq!(creds.username, "müller");
        assert_eq!(creds.password, "geheim");
    }

    #[test]
    fn test_decode_credentials_hashmap_chrome_utf8() {
        // 测试场景：Chrome 发来的 UTF-8 凭据
        let detector = EncodingDetector::new(Charset::Iso8859_1);
        let mut map = HashMap::new();
        map.insert("User-Agent".to_string(), vec![CHROME_UA.to_string()]);
        map.insert(
            "Authorization".to_string(),
            vec![format!("Basic {}", BASE64_STANDARD.encode("müller:geheim".as_bytes()))],
        );

        let creds = detector.decode_credentials_hashmap(&map).unwrap();
        assert_eq!(creds.username, "müller");
    }

    #[test]
    fn test_decode_credentials_missing_header() {
        // 测试场景：没有 Authorization 头
        let detector = EncodingDetector::default();
        assert!(matches!(
            detector.decode_credentials(&HeaderMap::new()),
            Err(AuthCharsetError::NotBasicAuth)
        ));
    }

    #[test]
    fn test_custom_rules_preserve_order() {
        // 测试场景：自定义规则表按声明顺序求值
        let rule_lib = RuleLibrary::from(vec![
            BrowserRule::new("Specific", r"curl/7\..*", Charset::Iso8859_1),
            BrowserRule::new("Generic", r"curl/.*", Charset::Utf8),
        ]);
        let detector = EncodingDetector::from_rules(&rule_lib, Charset::Utf8).unwrap();
        assert_eq!(detector.detect_family(Some("curl/7.68.0")), Some("Specific"));
        assert_eq!(detector.detect(Some("curl/7.68.0")), Charset::Iso8859_1);
        assert_eq!(detector.detect_family(Some("curl/8.0.1")), Some("Generic"));
    }

    #[test]
    fn test_with_config() {
        // 测试场景：默认配置共享内置规则表，自定义配置重新编译
        let default = EncodingDetector::with_config(&GlobalConfig::default()).unwrap();
        assert_eq!(default.table().len(), 6);

        let config = crate::config::ConfigManager::custom()
            .default_charset(Charset::Iso8859_1)
            .rules(RuleLibrary::from(vec![BrowserRule::new("Curl", "curl/.*", Charset::Utf8)]))
            .build();
        let custom = EncodingDetector::with_config(&config).unwrap();
        assert_eq!(custom.table().len(), 1);
        assert_eq!(custom.detect(Some("curl/7.68.0")), Charset::Utf8);
        assert_eq!(custom.detect(Some(FIREFOX_UA)), Charset::Iso8859_1);
    }

    #[test]
    fn test_concurrent_detect() {
        // 测试场景：多线程共享同一检测器
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EncodingDetector>();

        let detector = EncodingDetector::new(Charset::Utf8);
        std::thread::scope(|scope| {
            for i in 0..8 {
                let detector = &detector;
                scope.spawn(move || {
                    for _ in 0..200 {
                        let (ua, expected) = if i % 2 == 0 {
                            (SAFARI_UA, Charset::Iso8859_1)
                        } else {
                            (CHROME_UA, Charset::Utf8)
                        };
                        assert_eq!(detector.detect(Some(ua)), expected);
                    }
                });
            }
        });
    }
}
