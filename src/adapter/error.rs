// src/adapter/error.rs

use thiserror::Error;

/// 适配器错误分类。
/// 所有错误单次返回给调用方，本层不做重试、缓存或限流。
#[derive(Debug, Error)]
pub enum AdapterError {
    /// BidRequest 无法序列化为线上格式，本次询价不产出请求
    #[error("failed to serialize bid request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// imp.ext 存在但结构不合法（与 ext 缺失是两种不同的结果）
    #[error("invalid imp.ext in bid request: {0}")]
    ExtensionParse(#[source] serde_json::Error),

    /// DSP 返回 400，入参被判定为非法
    #[error("Unexpected status code: 400. Bad request from publisher. Run with request.debug = 1 for more info.")]
    BadInput,

    /// DSP 返回了 200/204/400 之外的状态码
    #[error("Unexpected status code: {0}. Run with request.debug = 1 for more info.")]
    BadServerResponse(u16),

    /// 200 响应但响应体无法解析，不返回部分结果
    #[error("failed to decode bid response: {0}")]
    ResponseParse(#[source] serde_json::Error),
}
