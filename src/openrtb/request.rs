// src/openrtb/request.rs

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use simd_json::OwnedValue;

use crate::openrtb::ext::ImpExt;

/// OpenRTB BidRequest 结构体。
/// imp.ext 为半结构化的扩展字段，存储为 OwnedValue（owned, 'static），
/// 由 [`Imp::ext_params`] 延迟解析并缓存。
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct BidRequest {
    pub id: String,

    /// 广告展示请求列表（imp），有序
    pub imp: Vec<Imp>,

    /// 网站信息
    pub site: Option<Site>,
    /// 应用信息
    pub app: Option<App>,
    /// 设备信息
    pub device: Option<Device>,
    /// 用户信息
    pub user: Option<User>,

    // 其它简单字段
    pub test: Option<i32>,
    pub at: Option<i32>,
    pub tmax: Option<u64>,
    pub cur: Option<Vec<String>>,
    pub bcat: Option<Vec<String>>,
    pub badv: Option<Vec<String>>,
}

impl BidRequest {
    /// 收集完整 imp 序列的 id 列表（保持原始顺序）
    pub fn imp_ids(&self) -> Vec<String> {
        self.imp.iter().map(|imp| imp.id.clone()).collect()
    }
}

/// 单个广告展示请求
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Imp {
    pub id: String,
    pub bidfloor: Option<f64>,

    /// banner 信息
    pub banner: Option<Banner>,
    /// video 信息
    pub video: Option<Video>,
    /// native 信息
    pub native: Option<Native>,

    /// DSP 扩展参数原始 JSON，延迟解析
    pub ext: Option<Box<OwnedValue>>,
    #[serde(skip)]
    pub ext_detail: OnceCell<ImpExt>,
}

impl Imp {
    /// 解析 imp.ext 中的标准信封。
    /// ext 缺失返回 Ok(None)；存在但结构不合法返回 Err —— 两种结果严格区分。
    /// 解析成功后缓存，重复调用不重复解析。
    pub fn ext_params(&self) -> Result<Option<&ImpExt>, serde_json::Error> {
        let Some(raw) = self.ext.as_ref() else {
            return Ok(None);
        };
        let parsed = self.ext_detail.get_or_try_init(|| {
            let s = serde_json::to_string(&**raw)?;
            serde_json::from_str::<ImpExt>(&s)
        })?;
        Ok(Some(parsed))
    }
}

/// Banner 广告位尺寸信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Banner {
    pub w: Option<i32>,
    pub h: Option<i32>,
}

/// Video 广告位信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Video {
    pub mimes: Vec<String>,
    pub minduration: Option<i32>,
    pub maxduration: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
}

/// Native 广告位信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Native {
    pub request: String,
}

/// 网站信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Site {
    pub id: Option<String>,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub page: Option<String>,
}

/// 应用信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct App {
    pub id: Option<String>,
    pub name: Option<String>,
    pub bundle: Option<String>,
}

/// 设备信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Device {
    pub ua: Option<String>,
    pub ip: Option<String>,
}

/// 用户信息
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct User {
    pub id: Option<String>,
}
