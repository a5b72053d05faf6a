//! 工具模块：请求头读取与凭据解码
pub mod header_converter;
pub mod credential_decoder;

pub use self::header_converter::HeaderConverter;
pub use self::credential_decoder::{BasicCredentials, CredentialDecoder};
