// src/openrtb/response.rs

use serde::{Deserialize, Serialize};
use simd_json::OwnedValue;

/// OpenRTB Bid Response
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BidResponse {
    pub id: String,
    pub seatbid: Vec<SeatBid>,
    pub bidid: Option<String>,
    pub cur: Option<String>,
    pub customdata: Option<String>,
    pub nbr: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SeatBid {
    pub bid: Vec<Bid>,
    pub seat: Option<String>,
    pub group: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Bid {
    pub id: String,
    pub impid: String,
    pub price: f64,
    /// Ad markup (HTML or VAST)
    pub adm: Option<String>,
    pub nurl: Option<String>,
    pub adid: Option<String>,
    pub adomain: Option<Vec<String>>,
    pub cid: Option<String>,
    pub crid: Option<String>,
    /// IAB 分类列表
    pub cat: Option<Vec<String>>,
    pub attr: Option<Vec<i32>>,
    pub dealid: Option<String>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    /// 创意形态（mtype）。保留原始整数：未识别的取值在翻译时回退为 banner 处理，
    /// 不在反序列化阶段拒绝
    pub mtype: Option<i32>,
    /// 视频时长（秒），可能带小数
    pub dur: Option<f64>,
    pub ext: Option<Box<OwnedValue>>,
}

/// 创意形态枚举（OpenRTB mtype 取值）
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "i32", into = "i32")]
pub enum MarkupType {
    Banner = 1,
    Video = 2,
    Audio = 3,
    Native = 4,
}

impl TryFrom<i32> for MarkupType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MarkupType::Banner),
            2 => Ok(MarkupType::Video),
            3 => Ok(MarkupType::Audio),
            4 => Ok(MarkupType::Native),
            _ => Err(format!("Invalid value for MarkupType: {}", value)),
        }
    }
}

impl From<MarkupType> for i32 {
    fn from(mtype: MarkupType) -> Self {
        mtype as i32
    }
}
