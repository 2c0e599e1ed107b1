// src/model/demand.rs

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use serde::{Deserialize, Serialize};

/// DSP 接入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demand {
    pub id: u64,              // DSP ID（从 1 开始增长）
    pub name: String,         // DSP 名称（不含空格，并以 _dsp 结尾）
    pub endpoint: String,     // DSP 竞价 API 地址（publisherId 以查询参数追加）
    pub status: bool,         // 是否启用
    pub timeout: Option<u64>, // 每个 DSP 的超时（毫秒），至少 100
}

impl Demand {
    pub fn new(id: u64, name: &str, endpoint: &str, status: bool, timeout: Option<u64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            status,
            timeout,
        }
    }
}

/// 使用 proptest 生成随机的 Demand
/// endpoint 固定指向本地 mock DSP 的竞价 API；
/// id 使用占位值 0，由 generate_demands 统一赋值；
/// timeout 值在 [100, 1000) 范围内生成；
/// 名称由正则表达式 "[a-zA-Z]{5,15}" 生成（不含空格），然后追加后缀 "_dsp"
fn generate_demand(mock_port: u16) -> impl Strategy<Value = Demand> {
    (
        "[a-zA-Z]{5,15}".prop_map(|s| format!("{}{}", s, "_dsp")),
        any::<bool>(),
        prop::option::of(100..1000u64),
    )
        .prop_map(move |(name, status, timeout)| Demand {
            id: 0, // 占位 id
            name,
            endpoint: format!("http://localhost:{}/bid", mock_port),
            status,
            timeout,
        })
}

/// 生成 3~6 个 Demand；若全部为禁用则把第一个置为启用，
/// 并为所有 Demand 分配顺序 id（从 1 开始）
fn generate_demands(mock_port: u16) -> impl Strategy<Value = Vec<Demand>> {
    prop::collection::vec(generate_demand(mock_port), 3..6).prop_map(|mut demands| {
        if !demands.iter().any(|d| d.status) {
            if let Some(first) = demands.first_mut() {
                first.status = true;
            }
        }
        for (i, demand) in demands.iter_mut().enumerate() {
            demand.id = (i as u64) + 1;
        }
        demands
    })
}

/// 初始化一组随机 Demand（没有配置文件时的演示回退）
pub fn init(mock_port: u16) -> Vec<Demand> {
    let mut runner = proptest::test_runner::TestRunner::default();
    let demands = generate_demands(mock_port)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    tracing::info!("Generated {} demands", demands.len());
    for demand in &demands {
        tracing::info!(
            "ID: {}, Name: {}, Endpoint: {}, Status: {}, Timeout: {:?}",
            demand.id,
            demand.name,
            demand.endpoint,
            demand.status,
            demand.timeout
        );
    }

    demands
}
