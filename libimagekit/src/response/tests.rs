use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    #[serde(default)]
    name: String,
    #[serde(default)]
    count: u32,
}

#[test]
fn test_is_success() {
    assert!(Response::new(200, "").is_success());
    assert!(Response::new(204, "").is_success());
    assert!(!Response::new(199, "").is_success());
    assert!(!Response::new(301, "").is_success());
    assert!(!Response::new(404, "").is_success());
}

#[test]
fn test_body_is_kept_verbatim() {
    let response = Response::new(200, b"\xff{\"a\":1}".to_vec());
    assert_eq!(response.body(), b"\xff{\"a\":1}".as_slice());
    assert_eq!(response.body_lossy(), "\u{fffd}{\"a\":1}");
}

#[test]
fn test_decode_ignores_unknown_fields() {
    let response = Response::new(200, r#"{"name":"speed","extra":true}"#);
    let sample: Sample = response.decode().unwrap();
    assert_eq!(
        sample,
        Sample {
            name: "speed".to_string(),
            count: 0
        }
    );
}

#[test]
fn test_decode_error_keeps_envelope() {
    let response = Response::new(200, r#"{"name":"speed","count":"many"}"#);
    match response.decode::<Sample>() {
        Err(ImageKitError::Decode {
            path,
            response: kept,
            ..
        }) => {
            assert_eq!(path.as_deref(), Some("count"));
            assert_eq!(kept, response);
        }
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[test]
fn test_parse_error_structured() {
    let response = Response::new(
        400,
        r#"{"message":"Invalid schema","help":"For support kindly contact us"}"#,
    );
    match response.parse_error() {
        ImageKitError::Service {
            status_code,
            message,
            help,
            response: kept,
        } => {
            assert_eq!(status_code, 400);
            assert_eq!(message, "Invalid schema");
            assert_eq!(help.as_deref(), Some("For support kindly contact us"));
            assert_eq!(kept, response);
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[test]
fn test_parse_error_without_help() {
    let response = Response::new(404, r#"{"message":"Not found"}"#);
    assert!(matches!(
        response.parse_error(),
        ImageKitError::Service { help: None, .. }
    ));
}

#[test]
fn test_parse_error_unstructured() {
    for body in ["<html>Bad Gateway</html>", "", r#"{"help":"no message"}"#] {
        let response = Response::new(502, body);
        match response.parse_error() {
            ImageKitError::UnexpectedResponse {
                status_code,
                response: kept,
            } => {
                assert_eq!(status_code, 502);
                assert_eq!(kept.body(), body.as_bytes());
            }
            other => panic!("Expected UnexpectedResponse, got {:?}", other),
        }
    }
}

#[test]
fn test_expect_status() {
    assert!(Response::new(201, "{}").expect_status(201).is_ok());

    // A success status that is not the expected one is still an error
    let err = Response::new(200, "{}").expect_status(204).unwrap_err();
    assert!(matches!(err, ImageKitError::UnexpectedResponse { .. }));
    assert_eq!(err.status_code(), Some(200));
}

#[test]
fn test_api_response_decode() {
    let response = Response::new(200, r#"{"name":"speed","count":3}"#);
    let api = ApiResponse::<Sample>::decode(response.clone()).unwrap();
    assert_eq!(api.data.count, 3);
    assert_eq!(api.response, response);
}
