use kiosk_hardware::error::HwError;
use kiosk_hardware::payload::{parse_classification_body, parse_weight_body};
use kiosk_hardware::util::with_cache_buster;
use rstest::rstest;

#[rstest]
#[case(r#"{"data":{"weight":0.8}}"#, Some(0.8))]
#[case(r#"{"data":{"weight":0}}"#, Some(0.0))]
#[case(r#"{"data":{"weight":null}}"#, None)]
#[case(r#"{"data":{}}"#, None)]
#[case(r#"{"data":null}"#, None)]
#[case(r#"{}"#, None)]
#[case(r#"{"data":{"weight":1.25,"unit":"kg"},"ok":true}"#, Some(1.25))]
fn weight_body_variants(#[case] body: &str, #[case] expected: Option<f64>) {
    assert_eq!(parse_weight_body(body).unwrap(), expected);
}

#[test]
fn weight_body_garbage_is_decode_error() {
    match parse_weight_body("<html>502</html>") {
        Err(HwError::Decode(_)) => {}
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[rstest]
#[case(r#"{"is_box":true}"#, true)]
#[case(r#"{"is_box":false,"confidence":0.2}"#, false)]
fn classification_body_variants(#[case] body: &str, #[case] expected: bool) {
    assert_eq!(parse_classification_body(body).unwrap(), expected);
}

#[test]
fn classification_without_flag_is_rejected() {
    assert!(matches!(
        parse_classification_body(r#"{"result":"box"}"#),
        Err(HwError::Decode(_))
    ));
}

#[rstest]
#[case("http://cam/detect", "http://cam/detect?t=42")]
#[case("http://cam/detect?mode=fast", "http://cam/detect?mode=fast&t=42")]
fn cache_buster_appends_query(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(with_cache_buster(url, 42), expected);
}
