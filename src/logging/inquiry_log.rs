// src/logging/inquiry_log.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// **DSP 询价日志**（一次竞价请求对应一条记录）
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InquiryLog {
    pub timestamp: String,       // 记录时间
    pub log_type: String,        // 日志类型，固定 "dsp_inquiry"
    pub request_id: String,      // OpenRTB `BidRequest.id`
    pub inquiry_attempts: usize, // 询价的 DSP 数量
    pub status: String,          // "success" / "no_fill"
    pub bids_returned: usize,    // 汇总的出价条数
    pub dsp_inquiry_log: Vec<DspInquiryLog>, // 各 DSP 询价明细
}

/// **单个 DSP 的询价明细**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DspInquiryLog {
    pub dsp_name: String,   // DSP 名称
    pub endpoint: String,   // DSP 请求地址
    pub status: String,     // "success" / "no_fill" / 错误描述
    pub bid_count: usize,   // 该 DSP 返回的出价条数
    pub elapsed_ms: u64,    // 询价耗时（毫秒）
}

impl InquiryLog {
    /// **创建一条询价日志**
    pub fn new(request_id: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "dsp_inquiry".to_string(),
            request_id: request_id.to_string(),
            inquiry_attempts: 0,
            status: "no_fill".to_string(), // 默认无填充，有出价后更新
            bids_returned: 0,
            dsp_inquiry_log: Vec::new(),
        }
    }

    /// **记录单个 DSP 的询价结果**
    pub fn add_dsp_inquiry(
        &mut self,
        dsp_name: &str,
        endpoint: &str,
        status: &str,
        bid_count: usize,
        elapsed_ms: u64,
    ) {
        self.dsp_inquiry_log.push(DspInquiryLog {
            dsp_name: dsp_name.to_string(),
            endpoint: endpoint.to_string(),
            status: status.to_string(),
            bid_count,
            elapsed_ms,
        });
        self.inquiry_attempts += 1;
        self.bids_returned += bid_count;
        if bid_count > 0 {
            self.status = "success".to_string();
        }
    }
}
