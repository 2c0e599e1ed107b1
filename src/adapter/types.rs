// src/adapter/types.rs

use serde::{Deserialize, Serialize};

use crate::openrtb::response::Bid;

/// 单次询价产出的出站 HTTP 请求描述，构造后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct DspRequest {
    pub method: String,
    pub url: String,
    /// 序列化后的完整 BidRequest（发布商标识只进入 URL，不写入请求体）
    pub body: Vec<u8>,
    /// 原始请求完整 imp 序列的 id 列表
    pub imp_ids: Vec<String>,
}

/// 传输层回传的入站响应
#[derive(Debug, Clone, PartialEq)]
pub struct DspResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

/// 标准化竞价结果：币种加有序的带类型出价列表
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DspBids {
    pub currency: String,
    pub bids: Vec<TypedBid>,
}

impl DspBids {
    /// 按预估出价数量预留容量（性能提示，实际条数可以不同）
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            currency: String::new(),
            bids: Vec::with_capacity(capacity),
        }
    }
}

/// 单个出价及其推断出的创意类型
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TypedBid {
    pub bid: Bid,
    pub bid_type: BidType,
    /// 仅当 bid_type 为 Video 时存在
    pub bid_video: Option<VideoMeta>,
}

/// 出价创意类型（封闭枚举，未识别的 markup 取值一律回退为 Banner）
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    Banner,
    Video,
}

/// 视频出价的附加元数据
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VideoMeta {
    /// 时长（整秒，小数截断）
    pub duration: i64,
    /// 分类列表的第一项，列表为空时为空字符串
    pub primary_category: String,
}
