// src/mock_dsp.rs

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{serve, Json, Router, routing::post};
use rand::Rng;
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};
use tracing::info;

use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{Bid, BidResponse, SeatBid};

/// 模拟 DSP 竞价响应。
/// - URL 中缺少 publisherId 查询参数时返回 400
/// - 小概率返回 204（无填充）
/// - 其余情况按 imp 逐个生成出价；video imp 的出价带 mtype=2、小数 dur 和 IAB 分类，
///   banner imp 的出价带 mtype=1
async fn handle_dsp_bid(
    Query(params): Query<HashMap<String, String>>,
    Json(request): Json<BidRequest>,
) -> Response {
    info!(
        "Mock DSP received BidRequest: id={}, imp_count={}, publisherId={:?}",
        request.id,
        request.imp.len(),
        params.get("publisherId")
    );

    if !params.contains_key("publisherId") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    // 模拟 DSP 处理延迟（10 ~ 80 毫秒）
    let delay_ms = rand::thread_rng().gen_range(10..80);
    sleep(Duration::from_millis(delay_ms)).await;

    // 约十分之一概率无填充
    if rand::thread_rng().gen_range(0..10) == 0 {
        return StatusCode::NO_CONTENT.into_response();
    }

    let mut bids = Vec::new();
    for imp in &request.imp {
        let bid_id = format!("bid-{}", imp.id);
        // 读取 bidfloor，若为 None 则按 0.1 起价
        let bidfloor = imp.bidfloor.unwrap_or(0.1);
        let price = bidfloor * rand::thread_rng().gen_range(1.0..3.0);

        let bid = if imp.video.is_some() {
            Bid {
                id: bid_id,
                impid: imp.id.clone(),
                price,
                adm: Some("<VAST version=\"3.0\"></VAST>".to_string()),
                mtype: Some(2),
                dur: Some(rand::thread_rng().gen_range(5.0..30.0)),
                cat: Some(vec!["IAB1".to_string()]),
                ..Bid::default()
            }
        } else {
            Bid {
                id: bid_id,
                impid: imp.id.clone(),
                price,
                adm: Some("<html><body>Mock DSP Banner Ad</body></html>".to_string()),
                mtype: Some(1),
                ..Bid::default()
            }
        };
        bids.push(bid);
    }

    let response = BidResponse {
        id: request.id.clone(),
        seatbid: vec![SeatBid {
            bid: bids,
            seat: Some("mock_seat".to_string()),
            group: Some(0),
        }],
        cur: Some("USD".to_string()),
        ..BidResponse::default()
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// 启动 Mock DSP 服务
/// 服务监听指定端口（例如 9001），路由为 `/bid`
pub async fn start_mock_dsp_server(port: u16) {
    let app = Router::new().route("/bid", post(handle_dsp_bid));

    let addr = format!("0.0.0.0:{}", port);
    info!("Mock DSP running at http://{}", addr);

    let listener = TcpListener::bind(&addr).await.unwrap();
    serve(listener, app).await.unwrap();
}
