use super::*;
use crate::client::Transport;
use crate::error::TransportKind;
use mockito::Matcher;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const PRIVATE_KEY: &str = "private_XxZH+I8BfOoIsY0M9CQtS4nyNSk=";
const PUBLIC_KEY: &str = "public_fGfgv45RjwmkbzGMRy1gKTcHf4M=";
const URL_ENDPOINT: &str = "https://ik.imagekit.io/dk1m7xkgi/";

const METADATA_BODY: &str = r#"{"height":801,"width":597,"size":59718,"format":"jpg","hasColorProfile":true,"quality":0,"density":72,"hasTransparency":false,"exif":{},"pHash":"85d07f1fe4ae8be2"}"#;

const FULL_EXIF_BODY: &str = r#"{
  "height": 68,
  "width": 100,
  "size": 7749,
  "format": "jpg",
  "hasColorProfile": false,
  "quality": 0,
  "density": 72,
  "hasTransparency": false,
  "pHash": "f06830ca9f1e3e90",
  "exif": {
    "image": {
      "Make": "Canon",
      "Model": "Canon EOS 40D",
      "Orientation": 1,
      "XResolution": 72,
      "YResolution": 72,
      "ResolutionUnit": 2,
      "Software": "GIMP 2.4.5",
      "ModifyDate": "2008:07:31 10:38:11",
      "YCbCrPositioning": 2,
      "ExifOffset": 214,
      "GPSInfo": 978
    },
    "thumbnail": {
      "Compression": 6,
      "XResolution": 72,
      "YResolution": 72,
      "ResolutionUnit": 2,
      "ThumbnailOffset": 1090,
      "ThumbnailLength": 1378
    },
    "exif": {
      "ExposureTime": 0.00625,
      "FNumber": 7.1,
      "ExposureProgram": 1,
      "ISO": 100,
      "ExifVersion": "0221",
      "DateTimeOriginal": "2008:05:30 15:56:01",
      "CreateDate": "2008:05:30 15:56:01",
      "ShutterSpeedValue": 7.375,
      "ApertureValue": 5.625,
      "ExposureCompensation": 0,
      "MeteringMode": 5,
      "Flash": 9,
      "FocalLength": 135,
      "SubSecTime": "00",
      "SubSecTimeOriginal": "00",
      "SubSecTimeDigitized": "00",
      "FlashpixVersion": "0100",
      "ColorSpace": 1,
      "ExifImageWidth": 100,
      "ExifImageHeight": 68,
      "InteropOffset": 948,
      "FocalPlaneXResolution": 4438.356164383562,
      "FocalPlaneYResolution": 4445.969125214408,
      "FocalPlaneResolutionUnit": 2,
      "CustomRendered": 0,
      "ExposureMode": 1,
      "WhiteBalance": 0,
      "SceneCaptureType": 0
    },
    "gps": { "GPSVersionID": [2, 2, 0, 0] },
    "interoperability": { "InteropIndex": "R98", "InteropVersion": "0100" },
    "makernote": { "AFPointsInFocus": [1, 5], "LensModel": "EF-S 55-250mm", "Nested": { "a": null } }
  }
}"#;

fn config_for(server: &mockito::ServerGuard) -> Config {
    let mut config = Config::from_params(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT);
    config.api.prefix = format!("{}/", server.url());
    config
}

fn api_for(server: &mockito::ServerGuard) -> MetadataApi {
    MetadataApi::from_config(&config_for(server)).unwrap()
}

fn auth_header() -> String {
    crate::auth::Credentials::new(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT).to_header_value()
}

fn expected_metadata() -> Metadata {
    Metadata {
        height: 801,
        width: 597,
        size: 59718,
        format: "jpg".to_string(),
        has_color_profile: true,
        quality: 0,
        density: 72,
        has_transparency: false,
        p_hash: "85d07f1fe4ae8be2".to_string(),
        exif: ExifTree::default(),
    }
}

/// Delegates to reqwest and counts how many requests were handed over.
#[derive(Debug, Clone, Default)]
struct CountingTransport {
    inner: reqwest::Client,
    calls: Arc<AtomicUsize>,
}

impl Transport for CountingTransport {
    fn execute(
        &self,
        request: reqwest::Request,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(request)
    }
}

/// Never answers.
#[derive(Debug, Clone, Default)]
struct StalledTransport;

impl Transport for StalledTransport {
    fn execute(
        &self,
        _request: reqwest::Request,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send {
        std::future::pending()
    }
}

#[test]
fn test_metadata_decodes_fixture() {
    let metadata: Metadata = serde_json::from_str(METADATA_BODY).unwrap();
    assert_eq!(metadata, expected_metadata());
    assert_eq!(metadata.exif.exif.iso, 0);
    assert!(metadata.exif.makernote.is_empty());
}

#[test]
fn test_metadata_round_trip() {
    let metadata: Metadata = serde_json::from_str(FULL_EXIF_BODY).unwrap();
    let encoded = serde_json::to_string(&metadata).unwrap();
    let decoded: Metadata = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, metadata);
}

#[test]
fn test_metadata_decodes_full_exif_tree() {
    let metadata: Metadata = serde_json::from_str(FULL_EXIF_BODY).unwrap();
    let exif = &metadata.exif;

    assert_eq!(exif.image.make, "Canon");
    assert_eq!(exif.image.model, "Canon EOS 40D");
    assert_eq!(exif.image.orientation, 1);
    assert_eq!(exif.image.y_cb_cr_positioning, 2);
    assert_eq!(exif.image.gps_info, 978);
    assert_eq!(
        exif.image.modify_date_time().unwrap().to_string(),
        "2008-07-31 10:38:11"
    );

    assert_eq!(exif.thumbnail.thumbnail_length, 1378);

    assert_eq!(exif.exif.exposure_time, 0.00625);
    assert_eq!(exif.exif.f_number, 7.1);
    assert_eq!(exif.exif.iso, 100);
    assert_eq!(exif.exif.focal_length, 135.0);
    assert_eq!(exif.exif.focal_plane_x_resolution, 4438.356164383562);
    assert_eq!(exif.exif.sub_sec_time_digitized, "00");
    assert!(exif.exif.original_date_time().is_some());

    assert_eq!(exif.gps.gps_version_id, vec![2, 2, 0, 0]);
    assert_eq!(exif.interoperability.interop_index, "R98");

    assert_eq!(exif.makernote.len(), 3);
    assert_eq!(exif.makernote["LensModel"], "EF-S 55-250mm");
    assert_eq!(exif.makernote["AFPointsInFocus"], serde_json::json!([1, 5]));
}

#[test]
fn test_metadata_null_exif_is_zero_value() {
    let metadata: Metadata =
        serde_json::from_str(r#"{"height":10,"exif":{"image":null,"makernote":null}}"#).unwrap();
    assert_eq!(metadata.height, 10);
    assert_eq!(metadata.exif, ExifTree::default());
}

#[tokio::test]
async fn test_fetch_from_asset() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/3325344545345/metadata")
        .match_header("authorization", auth_header().as_str())
        .with_status(200)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let api = api_for(&server);
    let result = api
        .fetch_from_asset(&Context::background(), "3325344545345")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.data, expected_metadata());
    assert_eq!(result.response.status_code(), 200);
    assert_eq!(result.response.body(), METADATA_BODY.as_bytes());
}

#[tokio::test]
async fn test_fetch_from_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/metadata")
        .match_query(Matcher::UrlEncoded(
            "url".into(),
            "https://ik.imagekit.io/xk1m7xkgi/default-image.jpg".into(),
        ))
        .match_header("authorization", auth_header().as_str())
        .with_status(200)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let api = api_for(&server);
    let result = api
        .fetch_from_url(
            &Context::background(),
            "https://ik.imagekit.io/xk1m7xkgi/default-image.jpg",
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.data, expected_metadata());
}

#[tokio::test]
async fn test_fetch_from_asset_full_exif() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/abc/metadata")
        .with_status(200)
        .with_body(FULL_EXIF_BODY)
        .create_async()
        .await;

    let api = api_for(&server);
    let result = api
        .fetch_from_asset(&Context::background(), "abc")
        .await
        .unwrap();

    mock.assert_async().await;
    let expected: Metadata = serde_json::from_str(FULL_EXIF_BODY).unwrap();
    assert_eq!(result.data, expected);
}

#[tokio::test]
async fn test_fetch_from_asset_empty_id_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let transport = CountingTransport::default();
    let api = MetadataApi::with_transport(&config_for(&server), transport.clone());
    let result = api.fetch_from_asset(&Context::background(), "").await;

    mock.assert_async().await;
    assert!(matches!(
        result.unwrap_err(),
        ImageKitError::InvalidArgument { .. }
    ));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_from_url_empty_url_sends_nothing() {
    let transport = CountingTransport::default();
    let config = Config::from_params(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT);
    let api = MetadataApi::with_transport(&config, transport.clone());

    let result = api.fetch_from_url(&Context::background(), "").await;

    assert!(matches!(
        result.unwrap_err(),
        ImageKitError::InvalidArgument { .. }
    ));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_from_asset_service_error() {
    let body = r#"{"message":"The requested file does not exist.","help":"For support kindly contact us at support@imagekit.io ."}"#;
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/missing/metadata")
        .with_status(404)
        .with_body(body)
        .create_async()
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_from_asset(&Context::background(), "missing")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.response().unwrap().body(), body.as_bytes());
    match err {
        ImageKitError::Service {
            status_code,
            message,
            help,
            ..
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "The requested file does not exist.");
            assert!(help.unwrap().contains("support@imagekit.io"));
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_from_url_unexpected_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/metadata")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_from_url(&Context::background(), "https://example.com/a.jpg")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        ImageKitError::UnexpectedResponse {
            status_code: 502,
            ..
        }
    ));
    assert_eq!(
        err.response().unwrap().body(),
        b"<html>Bad Gateway</html>".as_slice()
    );
}

#[tokio::test]
async fn test_fetch_from_asset_unexpected_success_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/abc/metadata")
        .with_status(202)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_from_asset(&Context::background(), "abc")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        ImageKitError::UnexpectedResponse {
            status_code: 202,
            ..
        }
    ));
}

#[tokio::test]
async fn test_fetch_from_asset_decode_error_keeps_body() {
    let body = r#"{"height":801,"width":"wide"}"#;
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/abc/metadata")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let api = api_for(&server);
    let err = api
        .fetch_from_asset(&Context::background(), "abc")
        .await
        .unwrap_err();

    mock.assert_async().await;
    match &err {
        ImageKitError::Decode { path, response, .. } => {
            assert_eq!(path.as_deref(), Some("width"));
            assert_eq!(response.body(), body.as_bytes());
            assert_eq!(response.status_code(), 200);
        }
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_from_asset_encodes_path_segment() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/files/a%20b%2Fc/metadata")
        .with_status(200)
        .with_body(METADATA_BODY)
        .create_async()
        .await;

    let api = api_for(&server);
    let result = api.fetch_from_asset(&Context::background(), "a b/c").await;

    mock.assert_async().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fetch_from_asset_canceled_while_in_flight() {
    let config = Config::from_params(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT);
    let api = MetadataApi::with_transport(&config, StalledTransport);
    let (ctx, handle) = Context::background().with_cancel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });

    let err = api.fetch_from_asset(&ctx, "abc").await.unwrap_err();

    assert!(err.is_canceled());
    assert!(matches!(
        err,
        ImageKitError::Transport {
            kind: TransportKind::Canceled,
            ..
        }
    ));
}

#[tokio::test]
async fn test_fetch_from_url_deadline_exceeded() {
    let config = Config::from_params(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT);
    let api = MetadataApi::with_transport(&config, StalledTransport);
    let ctx = Context::background().with_timeout(Duration::from_millis(20));

    let err = api
        .fetch_from_url(&ctx, "https://example.com/a.jpg")
        .await
        .unwrap_err();

    assert!(err.is_canceled());
    assert!(matches!(
        err,
        ImageKitError::Transport {
            kind: TransportKind::DeadlineExceeded,
            ..
        }
    ));
}

#[tokio::test]
async fn test_fetch_from_asset_canceled_before_send() {
    let transport = CountingTransport::default();
    let config = Config::from_params(PRIVATE_KEY, PUBLIC_KEY, URL_ENDPOINT);
    let api = MetadataApi::with_transport(&config, transport.clone());
    let (ctx, handle) = Context::background().with_cancel();
    handle.cancel();

    let err = api.fetch_from_asset(&ctx, "abc").await.unwrap_err();

    assert!(err.is_canceled());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_api() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/files/[a-z]+/metadata$".to_string()))
        .with_status(200)
        .with_body(METADATA_BODY)
        .expect(3)
        .create_async()
        .await;

    let api = api_for(&server);
    let ctx = Context::background();
    let (a, b, c) = tokio::join!(
        api.fetch_from_asset(&ctx, "one"),
        api.fetch_from_asset(&ctx, "two"),
        api.fetch_from_asset(&ctx, "three"),
    );

    mock.assert_async().await;
    for result in [a, b, c] {
        assert_eq!(result.unwrap().data, expected_metadata());
    }
}
