//! 规则加载管理器
//! 负责从JSON文本或本地文件加载自定义规则表

use std::collections::HashSet;
#[cfg(feature = "async-io")]
use std::path::Path;
use tracing::{debug, warn};

use super::builtin::builtin_rules;
use super::model::RuleLibrary;
use crate::error::{AcResult, AuthCharsetError};

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 加载内置规则表
    pub fn load_builtin() -> RuleLibrary {
        builtin_rules()
    }

    /// 从JSON数组文本解析规则表
    ///
    /// 格式：`[{"name": "...", "pattern": "...", "charset": "UTF-8"}, ...]`
    pub fn from_json_str(json: &str) -> AcResult<RuleLibrary> {
        let rule_lib: RuleLibrary = serde_json::from_str(json)
            .map_err(|e| AuthCharsetError::RuleParseError(e.to_string()))?;
        Self::validate(&rule_lib)?;

        debug!("规则表解析成功，规则数：{}", rule_lib.len());
        Ok(rule_lib)
    }

    /// 从本地JSON文件加载规则表
    #[cfg(feature = "async-io")]
    pub async fn load_from_file(path: impl AsRef<Path>) -> AcResult<RuleLibrary> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        debug!("读取规则文件：{}，大小：{} 字节", path.display(), content.len());
        Self::from_json_str(&content)
    }

    /// 校验规则表：不能为空，名称与模式不能为空
    pub fn validate(rule_lib: &RuleLibrary) -> AcResult<()> {
        if rule_lib.is_empty() {
            return Err(AuthCharsetError::InvalidRuleTable("规则表为空".to_string()));
        }

        let mut seen = HashSet::new();
        for (index, rule) in rule_lib.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(AuthCharsetError::InvalidRuleTable(format!(
                    "第{}条规则缺少名称",
                    index + 1
                )));
            }
            if rule.pattern.is_empty() {
                return Err(AuthCharsetError::InvalidRuleTable(format!(
                    "规则 {} 的模式为空",
                    rule.name
                )));
            }
            if !seen.insert(rule.name.as_str()) {
                // 重名不影响匹配，只有第一条可能被报告为命中家族
                warn!("规则名称重复：{}", rule.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;

    #[test]
    fn test_from_json_str_keeps_order() {
        // 测试场景：JSON数组顺序即求值顺序
        let json = r#"[
            {"name": "Edge", "pattern": "Mozilla/5\\.0 .* Edg/.*", "charset": "UTF-8"},
            {"name": "Any", "pattern": "Mozilla/.*", "charset": "latin1"}
        ]"#;
        let lib = RuleLoader::from_json_str(json).unwrap();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.rules[0].name, "Edge");
        assert_eq!(lib.rules[1].charset, Charset::Iso8859_1);
    }

    #[test]
    fn test_from_json_str_rejects_empty_table() {
        // 测试场景：空规则表无意义，直接报错
        assert!(matches!(
            RuleLoader::from_json_str("[]"),
            Err(AuthCharsetError::InvalidRuleTable(_))
        ));
    }

    #[test]
    fn test_from_json_str_rejects_unknown_charset() {
        // 测试场景：字符集只允许 UTF-8 / ISO-8859-1
        let json = r#"[{"name": "X", "pattern": "x", "charset": "Shift_JIS"}]"#;
        assert!(matches!(
            RuleLoader::from_json_str(json),
            Err(AuthCharsetError::RuleParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        // 测试场景：名称为空白的规则
        let json = r#"[{"name": " ", "pattern": "x", "charset": "UTF-8"}]"#;
        assert!(matches!(
            RuleLoader::from_json_str(json),
            Err(AuthCharsetError::InvalidRuleTable(_))
        ));
    }

    #[cfg(feature = "async-io")]
    #[tokio::test]
    async fn test_load_from_file() {
        // 测试场景：从临时文件异步加载
        let path = std::env::temp_dir().join(format!("rsauthcharset_rules_{}.json", std::process::id()));
        tokio::fs::write(&path, r#"[{"name": "Curl", "pattern": "curl/.*", "charset": "ISO-8859-1"}]"#)
            .await
            .unwrap();

        let lib = RuleLoader::load_from_file(&path).await.unwrap();
        assert_eq!(lib.rules[0].name, "Curl");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
