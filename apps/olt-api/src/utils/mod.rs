//! 工具模块：响应构造、DTO 转换与请求解析。

pub mod response;
pub mod validation;

pub use validation::{parse_json, parse_query};
