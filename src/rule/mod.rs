//! 规则模块：负责浏览器规则的数据模型、内置规则表与加载
pub mod model;
pub mod builtin;
pub mod loader;

// 导出核心接口
pub use self::model::{BrowserRule, RuleLibrary};
pub use self::builtin::builtin_rules;
pub use self::loader::RuleLoader;
