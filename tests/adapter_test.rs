//! Request/response translation tests for the DSP adapter.

use proptest::prelude::*;

use rust_adx_adapter::adapter::{
    AdapterError, BidType, BidderAdapter, DemandAdapter, DspRequest, DspResponse,
};
use rust_adx_adapter::model::demand::Demand;
use rust_adx_adapter::openrtb::request::{Banner, BidRequest, Imp};

const BID_REQUEST_JSON: &str = include_str!("fixtures/bid_request.json");
const BID_RESPONSE_VIDEO_JSON: &str = include_str!("fixtures/bid_response_video.json");
const BID_RESPONSE_MIXED_JSON: &str = include_str!("fixtures/bid_response_mixed.json");

const ENDPOINT: &str = "http://dsp.test/bid";

fn adapter() -> DemandAdapter {
    DemandAdapter::build(&Demand::new(1, "test_dsp", ENDPOINT, true, Some(200)))
}

fn owned_json(raw: &str) -> Box<simd_json::OwnedValue> {
    let mut buf = raw.as_bytes().to_vec();
    Box::new(simd_json::to_owned_value(&mut buf).expect("fixture JSON must parse"))
}

/// Two-imp request whose first imp optionally carries a raw ext payload.
fn request_with_ext(ext: Option<&str>) -> BidRequest {
    BidRequest {
        id: "req-1".to_string(),
        imp: vec![
            Imp {
                id: "imp-1".to_string(),
                bidfloor: Some(0.5),
                banner: Some(Banner {
                    w: Some(300),
                    h: Some(250),
                }),
                ext: ext.map(owned_json),
                ..Imp::default()
            },
            Imp {
                id: "imp-2".to_string(),
                ..Imp::default()
            },
        ],
        tmax: Some(500),
        ..BidRequest::default()
    }
}

fn single_request(request: &BidRequest) -> DspRequest {
    let mut requests = adapter()
        .make_requests(request)
        .expect("make_requests should succeed");
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

fn response(status_code: u16, body: &str) -> DspResponse {
    DspResponse {
        status_code,
        body: body.as_bytes().to_vec(),
    }
}

#[test]
fn make_requests_prefers_pid_over_publisher_id() {
    let request = request_with_ext(Some(r#"{"bidder":{"pid":"pub-123","publisherId":42}}"#));
    let dsp_request = single_request(&request);

    assert_eq!(dsp_request.method, "POST");
    assert_eq!(dsp_request.url, format!("{}?publisherId=pub-123", ENDPOINT));
    assert_eq!(dsp_request.imp_ids, vec!["imp-1", "imp-2"]);
}

#[test]
fn make_requests_falls_back_to_numeric_publisher_id() {
    let request = request_with_ext(Some(r#"{"bidder":{"pid":"","publisherId":42}}"#));
    let dsp_request = single_request(&request);

    assert_eq!(dsp_request.url, format!("{}?publisherId=42", ENDPOINT));
}

#[test]
fn make_requests_without_ext_resolves_empty_identifier() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    assert_eq!(dsp_request.url, format!("{}?publisherId=", ENDPOINT));
}

#[test]
fn make_requests_ignores_non_positive_publisher_id() {
    for raw in [
        r#"{"bidder":{"pid":"","publisherId":0}}"#,
        r#"{"bidder":{"pid":"","publisherId":-5}}"#,
        r#"{"bidder":{}}"#,
    ] {
        let request = request_with_ext(Some(raw));
        let dsp_request = single_request(&request);
        assert_eq!(dsp_request.url, format!("{}?publisherId=", ENDPOINT));
    }
}

#[test]
fn make_requests_only_reads_first_imp_ext() {
    // 第二个 imp 的 ext 不参与标识解析
    let mut request = request_with_ext(None);
    request.imp[1].ext = Some(owned_json(r#"{"bidder":{"pid":"ignored"}}"#));

    let dsp_request = single_request(&request);
    assert_eq!(dsp_request.url, format!("{}?publisherId=", ENDPOINT));
}

#[test]
fn make_requests_body_round_trips() {
    let request: BidRequest =
        serde_json::from_str(BID_REQUEST_JSON).expect("fixture request must deserialize");
    let dsp_request = single_request(&request);

    let body: serde_json::Value =
        serde_json::from_slice(&dsp_request.body).expect("outbound body must be valid JSON");
    let original = serde_json::to_value(&request).expect("request must serialize");
    assert_eq!(body, original);

    // 标识只进入 URL，不写入请求体
    assert_eq!(dsp_request.url, format!("{}?publisherId=pub-123", ENDPOINT));
}

#[test]
fn make_requests_rejects_malformed_ext() {
    let request = request_with_ext(Some(r#"{"bidder":5}"#));
    let err = adapter()
        .make_requests(&request)
        .expect_err("malformed ext must fail");

    assert!(matches!(err, AdapterError::ExtensionParse(_)));
}

#[test]
fn make_bids_no_content_returns_empty_success() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let result = adapter()
        .make_bids(&request, &dsp_request, &response(204, "ignored"))
        .expect("204 must not be an error");
    assert!(result.is_none());
}

#[test]
fn make_bids_bad_request_maps_to_bad_input() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let err = adapter()
        .make_bids(&request, &dsp_request, &response(400, ""))
        .expect_err("400 must be an error");
    assert!(matches!(err, AdapterError::BadInput));
    assert!(err.to_string().contains("400"));
}

#[test]
fn make_bids_unexpected_status_embeds_code() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    for status in [301u16, 500, 503] {
        let err = adapter()
            .make_bids(&request, &dsp_request, &response(status, ""))
            .expect_err("non-200 must be an error");
        assert!(matches!(err, AdapterError::BadServerResponse(code) if code == status));
        assert!(err.to_string().contains(&status.to_string()));
    }
}

#[test]
fn make_bids_rejects_undecodable_body() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let err = adapter()
        .make_bids(&request, &dsp_request, &response(200, "not-json"))
        .expect_err("garbage body must fail");
    assert!(matches!(err, AdapterError::ResponseParse(_)));
}

#[test]
fn make_bids_video_bid_carries_video_meta() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, BID_RESPONSE_VIDEO_JSON))
        .expect("valid 200 body must parse")
        .expect("200 with bids must produce a result");

    assert_eq!(bids.bids.len(), 1);
    let typed = &bids.bids[0];
    assert_eq!(typed.bid_type, BidType::Video);

    let video = typed.bid_video.as_ref().expect("video bid must carry meta");
    assert_eq!(video.duration, 30); // 30.7 截断到整秒
    assert_eq!(video.primary_category, "IAB1");
}

#[test]
fn make_bids_flattens_seatbids_in_order() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, BID_RESPONSE_MIXED_JSON))
        .expect("valid 200 body must parse")
        .expect("200 with bids must produce a result");

    let ids: Vec<&str> = bids.bids.iter().map(|b| b.bid.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "b1"]);

    // mtype=1 与 mtype=4 均回退为 Banner，且没有视频元数据
    assert_eq!(bids.bids[0].bid_type, BidType::Banner);
    assert!(bids.bids[0].bid_video.is_none());
    assert_eq!(bids.bids[1].bid_type, BidType::Banner);
    assert!(bids.bids[1].bid_video.is_none());

    // 多分类取第一项，小数时长截断
    let video = bids.bids[2].bid_video.as_ref().expect("b1 is a video bid");
    assert_eq!(bids.bids[2].bid_type, BidType::Video);
    assert_eq!(video.duration, 15);
    assert_eq!(video.primary_category, "IAB2");
}

#[test]
fn make_bids_banner_bid_without_categories() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    let body = r#"{"seatbid":[{"bid":[{"id":"b1","impid":"imp-1","price":1.5}]}]}"#;
    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, body))
        .expect("valid 200 body must parse")
        .expect("200 with bids must produce a result");

    assert_eq!(bids.bids.len(), 1);
    assert_eq!(bids.bids[0].bid_type, BidType::Banner);
    assert!(bids.bids[0].bid_video.is_none());
}

#[test]
fn currency_is_only_assigned_when_empty() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);

    // 响应携带非空币种时，输出 currency 保持默认空值（既有行为，勿"修正"）
    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, BID_RESPONSE_VIDEO_JSON))
        .expect("valid 200 body must parse")
        .expect("200 with bids must produce a result");
    assert_eq!(bids.currency, "");

    // 响应未携带币种时同样为空（显式的 no-op 赋值）
    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, r#"{"seatbid":[]}"#))
        .expect("valid 200 body must parse")
        .expect("200 must produce a result");
    assert_eq!(bids.currency, "");

    let bids = adapter()
        .make_bids(&request, &dsp_request, &response(200, r#"{"cur":"","seatbid":[]}"#))
        .expect("valid 200 body must parse")
        .expect("200 must produce a result");
    assert_eq!(bids.currency, "");
}

#[test]
fn make_bids_is_idempotent() {
    let request = request_with_ext(None);
    let dsp_request = single_request(&request);
    let inbound = response(200, BID_RESPONSE_MIXED_JSON);

    let first = adapter()
        .make_bids(&request, &dsp_request, &inbound)
        .expect("valid 200 body must parse");
    let second = adapter()
        .make_bids(&request, &dsp_request, &inbound)
        .expect("valid 200 body must parse");

    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn nonempty_pid_always_wins(pid in "[a-zA-Z0-9]{1,12}", publisher_id in any::<i64>()) {
        let raw = format!(r#"{{"bidder":{{"pid":"{}","publisherId":{}}}}}"#, pid, publisher_id);
        let request = request_with_ext(Some(&raw));
        let dsp_request = adapter()
            .make_requests(&request)
            .expect("make_requests should succeed")
            .remove(0);
        prop_assert_eq!(dsp_request.url, format!("{}?publisherId={}", ENDPOINT, pid));
    }

    #[test]
    fn positive_publisher_id_renders_base10(publisher_id in 1i64..=i64::MAX) {
        let raw = format!(r#"{{"bidder":{{"publisherId":{}}}}}"#, publisher_id);
        let request = request_with_ext(Some(&raw));
        let dsp_request = adapter()
            .make_requests(&request)
            .expect("make_requests should succeed")
            .remove(0);
        prop_assert_eq!(dsp_request.url, format!("{}?publisherId={}", ENDPOINT, publisher_id));
    }

    #[test]
    fn non_positive_publisher_id_resolves_empty(publisher_id in i64::MIN..=0i64) {
        let raw = format!(r#"{{"bidder":{{"publisherId":{}}}}}"#, publisher_id);
        let request = request_with_ext(Some(&raw));
        let dsp_request = adapter()
            .make_requests(&request)
            .expect("make_requests should succeed")
            .remove(0);
        prop_assert_eq!(dsp_request.url, format!("{}?publisherId=", ENDPOINT));
    }
}
