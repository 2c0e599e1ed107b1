// src/adapter/mod.rs

pub mod bidder;
pub mod error;
pub mod types;

pub use bidder::{BidderAdapter, DemandAdapter};
pub use error::AdapterError;
pub use types::{BidType, DspBids, DspRequest, DspResponse, TypedBid, VideoMeta};
