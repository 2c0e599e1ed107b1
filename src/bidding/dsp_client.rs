// src/bidding/dsp_client.rs

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::adapter::{AdapterError, BidderAdapter, DemandAdapter, DspBids, DspRequest, DspResponse};
use crate::model::demand::Demand;
use crate::openrtb::request::BidRequest;

/// 询价层错误：适配器错误之外再区分传输失败与超时，
/// 适配器自身的错误分类保持不被污染
#[derive(Debug, Error)]
pub enum InquiryError {
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("dsp timed out after {0} ms")]
    Timeout(u64),
}

/// 单个 DSP 的询价结果
#[derive(Debug)]
pub struct DspInquiry {
    pub demand_id: u64,
    pub demand_name: String,
    pub endpoint: String,
    /// Ok(None) 表示 204 无填充
    pub outcome: Result<Option<DspBids>, InquiryError>,
    pub elapsed_ms: u128,
}

pub struct DspClient {
    client: Client,
    demands: Vec<Demand>,
}

impl DspClient {
    pub fn new(demands: Vec<Demand>) -> Self {
        Self {
            client: Client::new(),
            demands,
        }
    }

    /// 并发向所有启用的 DSP 询价，每个 DSP 经由各自的适配器完成两阶段翻译
    pub async fn fetch_bids(&self, request: &Arc<BidRequest>) -> Vec<DspInquiry> {
        let tasks: Vec<_> = self
            .demands
            .iter()
            .filter(|demand| demand.status)
            .cloned()
            .map(|demand| {
                let client = self.client.clone();
                let req = Arc::clone(request);
                tokio::spawn(async move {
                    let start = Instant::now();
                    let outcome = Self::inquire(&client, &demand, &req).await;
                    DspInquiry {
                        demand_id: demand.id,
                        demand_name: demand.name.clone(),
                        endpoint: demand.endpoint.clone(),
                        outcome,
                        elapsed_ms: start.elapsed().as_millis(),
                    }
                })
            })
            .collect();

        join_all(tasks)
            .await
            .into_iter()
            .filter_map(|res| res.ok())
            .collect()
    }

    /// 单个 DSP 的完整询价：请求翻译 -> HTTP 调用 -> 响应翻译
    async fn inquire(
        client: &Client,
        demand: &Demand,
        request: &BidRequest,
    ) -> Result<Option<DspBids>, InquiryError> {
        let adapter = DemandAdapter::build(demand);

        let Some(dsp_request) = adapter.make_requests(request)?.into_iter().next() else {
            return Ok(None);
        };

        let timeout_ms = demand.timeout.unwrap_or(request.tmax.unwrap_or(250));
        let response = timeout(
            Duration::from_millis(timeout_ms),
            Self::send(client, &dsp_request),
        )
        .await
        .map_err(|_| InquiryError::Timeout(timeout_ms))??;

        debug!(
            "DSP {} answered {} with {} bytes",
            demand.name,
            response.status_code,
            response.body.len()
        );

        Ok(adapter.make_bids(request, &dsp_request, &response)?)
    }

    /// 执行实际的 HTTP 调用，收集状态码与完整响应体
    async fn send(client: &Client, dsp_request: &DspRequest) -> Result<DspResponse, InquiryError> {
        let response = client
            .post(&dsp_request.url)
            .header("Content-Type", "application/json")
            .body(dsp_request.body.clone())
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(DspResponse { status_code, body })
    }
}
