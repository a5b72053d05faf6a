//! 全局配置管理,存储所有可配置项

#[cfg(feature = "async-io")]
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charset::Charset;
use crate::compiler::DEFAULT_SIZE_LIMIT;
use crate::error::{AcResult, AuthCharsetError};
use crate::rule::{BrowserRule, RuleLibrary, RuleLoader};

/// 全局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    // 无规则命中时使用的字符集（通常取自服务器全局编码配置）
    pub default_charset: Charset,
    // 自定义规则表，None 表示使用内置六条规则
    pub rules: Option<Vec<BrowserRule>>,
    // 自定义规则中单条正则的编译大小上限（字节）
    pub max_pattern_size: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_charset: Charset::Utf8,
            rules: None,
            max_pattern_size: DEFAULT_SIZE_LIMIT,
        }
    }
}

impl GlobalConfig {
    /// 生效的规则表
    pub fn rule_library(&self) -> AcResult<RuleLibrary> {
        match &self.rules {
            Some(rules) => {
                let rule_lib = RuleLibrary::from(rules.clone());
                RuleLoader::validate(&rule_lib)?;
                Ok(rule_lib)
            }
            None => Ok(RuleLoader::load_builtin()),
        }
    }
}

/// 配置管理器（单例）
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }

    /// 从JSON文本解析配置，缺省字段取默认值
    pub fn from_json_str(json: &str) -> AcResult<GlobalConfig> {
        let config: GlobalConfig = serde_json::from_str(json)?;
        if config.max_pattern_size == 0 {
            return Err(AuthCharsetError::InvalidInput("max_pattern_size 不能为0".to_string()));
        }
        debug!(
            "配置解析成功，默认字符集：{}，自定义规则：{}",
            config.default_charset,
            config.rules.as_ref().map_or(0, Vec::len)
        );
        Ok(config)
    }

    /// 从本地JSON文件加载配置
    #[cfg(feature = "async-io")]
    pub async fn load_from_file(path: impl AsRef<Path>) -> AcResult<GlobalConfig> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&content)
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn default_charset(mut self, charset: Charset) -> Self {
        self.config.default_charset = charset;
        self
    }

    pub fn rules(mut self, rule_lib: RuleLibrary) -> Self {
        self.config.rules = Some(rule_lib.rules);
        self
    }

    pub fn max_pattern_size(mut self, size: usize) -> Self {
        self.config.max_pattern_size = size;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
