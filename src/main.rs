// src/main.rs

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};
use uuid::Uuid;

use rust_adx_adapter::bidding::dsp_client::DspClient;
use rust_adx_adapter::config::ConfigManager;
use rust_adx_adapter::logging::inquiry_log::InquiryLog;
use rust_adx_adapter::mock_dsp;
use rust_adx_adapter::model::demand;
use rust_adx_adapter::openrtb::request::{Banner, BidRequest, Imp, Site, Video};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "An OpenRTB DSP adapter demo")]
struct CliArgs {
    /// Mock DSP 监听端口
    #[arg(short, long, default_value_t = 9001)]
    port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// Demand 配置文件（JSON），缺失时自动生成随机 Demand
    #[arg(long, default_value = "static/demands.json")]
    demands_file: String,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志
    let log_file = rolling::hourly(&args.log_dir, "adx_adapter_log.json");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)
        .expect("Unable to set global tracing subscriber");
    info!("ADX adapter demo starting, mock DSP on port {}", args.port);

    // 启动 Mock DSP 服务器
    let mock_port = args.port;
    let dsp_mock_server = tokio::spawn(async move {
        mock_dsp::start_mock_dsp_server(mock_port).await;
    });

    // 读取 Demand 配置；文件缺失时退化为随机生成的演示配置
    let mut config = ConfigManager::from_file(&args.demands_file);
    if config.is_empty() {
        config = ConfigManager::new(demand::init(args.port));
    }

    // 等待 Mock DSP 完成端口绑定
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    // 构造示例 BidRequest：第一个 imp 的 ext 携带 bidder.pid
    let mut ext_raw = br#"{"bidder":{"pid":"pub-1001","publisherId":42},"tid":"demo-tid"}"#.to_vec();
    let ext = simd_json::to_owned_value(&mut ext_raw).expect("Unable to parse demo imp.ext");

    let bid_request = Arc::new(BidRequest {
        id: Uuid::new_v4().to_string(),
        imp: vec![
            Imp {
                id: "imp-1".to_string(),
                bidfloor: Some(0.5),
                banner: Some(Banner {
                    w: Some(300),
                    h: Some(250),
                }),
                ext: Some(Box::new(ext)),
                ..Imp::default()
            },
            Imp {
                id: "imp-2".to_string(),
                bidfloor: Some(1.2),
                video: Some(Video {
                    mimes: vec!["video/mp4".to_string()],
                    minduration: Some(5),
                    maxduration: Some(30),
                    w: Some(640),
                    h: Some(360),
                }),
                ..Imp::default()
            },
        ],
        site: Some(Site {
            id: Some("site-1".to_string()),
            domain: Some("demo.rust-adx.com".to_string()),
            ..Site::default()
        }),
        tmax: Some(500),
        ..BidRequest::default()
    });

    // 经适配器向所有启用的 DSP 询价
    let dsp_client = DspClient::new(config.active_demands());
    let inquiries = dsp_client.fetch_bids(&bid_request).await;

    let mut inquiry_log = InquiryLog::new(&bid_request.id);
    for inquiry in &inquiries {
        let (status, bid_count) = match &inquiry.outcome {
            Ok(Some(bids)) => ("success".to_string(), bids.bids.len()),
            Ok(None) => ("no_fill".to_string(), 0),
            Err(e) => (e.to_string(), 0),
        };
        inquiry_log.add_dsp_inquiry(
            &inquiry.demand_name,
            &inquiry.endpoint,
            &status,
            bid_count,
            inquiry.elapsed_ms as u64,
        );

        if let Ok(Some(bids)) = &inquiry.outcome {
            for typed in &bids.bids {
                info!(
                    "DSP {} bid: id={}, impid={}, price={}, type={:?}, video={:?}",
                    inquiry.demand_name,
                    typed.bid.id,
                    typed.bid.impid,
                    typed.bid.price,
                    typed.bid_type,
                    typed.bid_video
                );
            }
        }
    }
    info!("{}", serde_json::to_string(&inquiry_log).unwrap_or_default());

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down gracefully...");
        }
    }

    dsp_mock_server.abort();
    info!("ADX adapter demo shut down.");
}
