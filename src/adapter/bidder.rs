// src/adapter/bidder.rs

use crate::adapter::error::AdapterError;
use crate::adapter::types::{BidType, DspBids, DspRequest, DspResponse, TypedBid, VideoMeta};
use crate::model::demand::Demand;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{Bid, BidResponse, MarkupType};

/// 宿主竞价引擎约定的适配器接口：构造、出站请求翻译、入站响应翻译。
/// 实现必须是无共享可变状态的纯值类型，单次请求/响应即完整工作单元，
/// 可被多线程并发调用而无需加锁。
pub trait BidderAdapter: Send + Sync {
    /// 绑定静态配置中的 endpoint。构造阶段不做任何校验，永不失败。
    fn build(demand: &Demand) -> Self
    where
        Self: Sized;

    /// 将标准 BidRequest 翻译为出站请求描述。
    /// 每次调用至多产出一个请求；出错时产出零个请求和一个错误。
    fn make_requests(&self, request: &BidRequest) -> Result<Vec<DspRequest>, AdapterError>;

    /// 将出站请求对应的 HTTP 响应翻译回标准化竞价结果。
    /// Ok(None) 表示 204 无填充：成功但没有出价，也没有错误。
    fn make_bids(
        &self,
        request: &BidRequest,
        dsp_request: &DspRequest,
        response: &DspResponse,
    ) -> Result<Option<DspBids>, AdapterError>;
}

/// 面向单一 DSP 的适配器实例，仅持有构造时绑定的不可变 endpoint
#[derive(Debug, Clone)]
pub struct DemandAdapter {
    endpoint: String,
}

impl BidderAdapter for DemandAdapter {
    fn build(demand: &Demand) -> Self {
        Self {
            endpoint: demand.endpoint.clone(),
        }
    }

    fn make_requests(&self, request: &BidRequest) -> Result<Vec<DspRequest>, AdapterError> {
        let body = serde_json::to_vec(request).map_err(AdapterError::Serialization)?;

        // 只读第一个 imp 的扩展参数；ext 缺失不是错误，标识退化为空字符串
        let mut publisher_id = String::new();
        if let Some(imp) = request.imp.first() {
            if let Some(ext) = imp.ext_params().map_err(AdapterError::ExtensionParse)? {
                publisher_id = ext.bidder.resolve_publisher_id();
            }
        }

        Ok(vec![DspRequest {
            method: "POST".to_string(),
            url: format!("{}?publisherId={}", self.endpoint, publisher_id),
            body,
            imp_ids: request.imp_ids(),
        }])
    }

    fn make_bids(
        &self,
        request: &BidRequest,
        _dsp_request: &DspRequest,
        response: &DspResponse,
    ) -> Result<Option<DspBids>, AdapterError> {
        if response.status_code == 204 {
            return Ok(None);
        }

        if response.status_code == 400 {
            return Err(AdapterError::BadInput);
        }

        if response.status_code != 200 {
            return Err(AdapterError::BadServerResponse(response.status_code));
        }

        let bid_response: BidResponse =
            serde_json::from_slice(&response.body).map_err(AdapterError::ResponseParse)?;

        let mut dsp_bids = DspBids::with_capacity(request.imp.len());
        // 仅在响应未携带币种时回填 currency，其余情况保持默认空值
        let cur = bid_response.cur.clone().unwrap_or_default();
        if cur.is_empty() {
            dsp_bids.currency = cur;
        }

        // 逐个 seatbid 展平出价，保持组间与组内的相对顺序
        for seat_bid in &bid_response.seatbid {
            for bid in &seat_bid.bid {
                let bid_type = get_bid_type(bid);
                dsp_bids.bids.push(TypedBid {
                    bid: bid.clone(),
                    bid_type,
                    bid_video: get_bid_video(bid_type, bid),
                });
            }
        }

        Ok(Some(dsp_bids))
    }
}

/// 由 mtype 推断创意类型：video 映射为 Video，
/// 其余（banner/audio/native/未识别/缺失）一律回退为 Banner
fn get_bid_type(bid: &Bid) -> BidType {
    match bid.mtype.and_then(|m| MarkupType::try_from(m).ok()) {
        Some(MarkupType::Video) => BidType::Video,
        _ => BidType::Banner,
    }
}

/// 仅为 Video 出价构造附加元数据；Banner 出价为 None（真正缺失，不是空结构）
fn get_bid_video(bid_type: BidType, bid: &Bid) -> Option<VideoMeta> {
    if bid_type != BidType::Video {
        return None;
    }

    let primary_category = bid
        .cat
        .as_ref()
        .and_then(|cat| cat.first())
        .cloned()
        .unwrap_or_default();

    Some(VideoMeta {
        // 截断到整秒
        duration: bid.dur.unwrap_or(0.0) as i64,
        primary_category,
    })
}
