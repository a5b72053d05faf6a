//! 编译模块：将原始规则编译为可执行的锚定正则
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledBrowserPattern, PatternTable};
pub use self::compiler::{RuleCompiler, DEFAULT_SIZE_LIMIT};
