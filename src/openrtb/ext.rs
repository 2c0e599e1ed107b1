// src/openrtb/ext.rs

use serde::{Deserialize, Serialize};

/// imp.ext 的标准信封：bidder 参数加事务 id。
/// tid 仅随请求体透传，不参与任何翻译逻辑。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ImpExt {
    #[serde(default)]
    pub bidder: DemandParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
}

/// DSP 侧发布商参数，两个字段均可缺省
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DemandParams {
    #[serde(default)]
    pub pid: String,
    #[serde(default, rename = "publisherId")]
    pub publisher_id: i64,
}

impl DemandParams {
    /// 解析最终的发布商标识：
    /// pid 非空时优先；否则 publisherId 为正时转为十进制字符串；
    /// 否则为空字符串（允许的退化标识，不是错误）。
    pub fn resolve_publisher_id(&self) -> String {
        if !self.pid.is_empty() {
            self.pid.clone()
        } else if self.publisher_id > 0 {
            self.publisher_id.to_string()
        } else {
            String::new()
        }
    }
}
