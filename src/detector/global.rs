//! 全局检测器单例管理
use http::HeaderMap;
use once_cell::sync::OnceCell;

use super::detector::EncodingDetector;
use crate::charset::Charset;
use crate::config::{ConfigManager, GlobalConfig};
use crate::error::{AcResult, AuthCharsetError};

/// 全局检测器实例
static GLOBAL_DETECTOR: OnceCell<EncodingDetector> = OnceCell::new();

/// 初始化全局检测器（默认配置）
pub fn init_detector() -> AcResult<()> {
    init_detector_with_config(ConfigManager::get_default())
}

/// 带自定义配置初始化全局检测器，重复调用时保留第一次的实例
pub fn init_detector_with_config(config: GlobalConfig) -> AcResult<()> {
    GLOBAL_DETECTOR.get_or_try_init(|| EncodingDetector::with_config(&config))?;
    Ok(())
}

/// 获取全局检测器
pub(crate) fn get_global_detector() -> AcResult<&'static EncodingDetector> {
    GLOBAL_DETECTOR.get()
        .ok_or(AuthCharsetError::DetectorNotInitialized)
}

// 对外暴露的简化接口
pub fn detect_basic_auth_charset(user_agent: Option<&str>) -> AcResult<Charset> {
    let detector = get_global_detector()?;
    Ok(detector.detect(user_agent))
}

pub fn detect_basic_auth_charset_from_headers(headers: &HeaderMap) -> AcResult<Charset> {
    let detector = get_global_detector()?;
    Ok(detector.detect_from_headers(headers))
}
