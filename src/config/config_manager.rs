// src/config/config_manager.rs

use std::fs;

use crate::model::demand::Demand;

/// 持有 DSP 适配器的静态配置，构造后不可变
#[derive(Clone, Debug, Default)]
pub struct ConfigManager {
    demands: Vec<Demand>,
}

impl ConfigManager {
    pub fn new(demands: Vec<Demand>) -> Self {
        ConfigManager { demands }
    }

    /// 从 JSON 配置文件读取 Demand 列表；文件缺失或解析失败时退化为空配置
    pub fn from_file(path: &str) -> Self {
        let content = fs::read_to_string(path).unwrap_or_else(|_| "[]".to_string());
        let demands: Vec<Demand> = serde_json::from_str(&content).unwrap_or_default();
        ConfigManager::new(demands)
    }

    /// 从逗号分隔的 endpoint 列表构造（命令行调试用）
    pub fn from_args(endpoints: &str) -> Self {
        let demands = endpoints
            .split(',')
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, endpoint)| {
                Demand::new((i as u64) + 1, &format!("dsp_{}", i + 1), endpoint, true, None)
            })
            .collect();
        ConfigManager::new(demands)
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// 所有启用状态的 DSP
    pub fn active_demands(&self) -> Vec<Demand> {
        self.demands.iter().filter(|d| d.status).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }
}
