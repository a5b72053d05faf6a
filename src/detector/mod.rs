//! 检测模块：浏览器编码检测核心逻辑
pub mod global;
pub mod detector;

// 导出核心接口
pub use self::global::{
    init_detector,
    init_detector_with_config,
    detect_basic_auth_charset,
    detect_basic_auth_charset_from_headers,
};
pub use self::detector::EncodingDetector;
