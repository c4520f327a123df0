// tests/api_tests.rs

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use restoration_server::web::{configure_app_routes, ROUTES};
use restoration_server::{AppConfig, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

const BOUNDARY: &str = "----restoration-test-boundary";
const UPLOAD_LIMIT: u64 = 1024;

async fn test_state(dir: &TempDir) -> AppState {
  let config = AppConfig {
    orders_dir: dir.path().join("orders"),
    upload_dir: dir.path().join("uploads"),
    max_upload_bytes: UPLOAD_LIMIT,
    ..AppConfig::default()
  };
  AppState::from_config(config).await.expect("state")
}

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
  let mut body = Vec::new();
  body.extend_from_slice(
    format!(
      "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
      BOUNDARY, field, filename
    )
    .as_bytes(),
  );
  body.extend_from_slice(content);
  body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
  (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

fn upload_request(uri: &str, field: &str, filename: &str, content: &[u8]) -> test::TestRequest {
  let (content_type, body) = multipart(field, filename, content);
  test::TestRequest::post()
    .uri(uri)
    .insert_header((header::CONTENT_TYPE, content_type))
    .set_payload(body)
}

fn order_payload() -> Value {
  json!({
    "customer_email": "a@b.com",
    "customer_name": "A",
    "service_type": "restore",
    "price": 50
  })
}

macro_rules! create_order {
  ($app:expr) => {{
    let req = test::TestRequest::post()
      .uri("/api/create-order")
      .set_json(order_payload())
      .to_request();
    let body: Value = test::call_and_read_body_json(&$app, req).await;
    body["order_id"].as_str().expect("order_id").to_string()
  }};
}

#[actix_web::test]
async fn create_then_fetch_order() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let req = test::TestRequest::post()
    .uri("/api/create-order")
    .set_json(order_payload())
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["message"], "Order created successfully");
  let order_id = body["order_id"].as_str().unwrap();
  assert_eq!(order_id.len(), 12);
  assert!(order_id.starts_with("WAR-"));

  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["status"], "pending_payment");
  assert_eq!(order["file_uploaded"], false);
  assert_eq!(order["payment_completed"], false);
  assert_eq!(order["price"], 50.0);
  assert_eq!(order["rush_delivery"], false);
}

#[actix_web::test]
async fn missing_field_is_400_with_field_name() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let req = test::TestRequest::post()
    .uri("/api/create-order")
    .set_json(json!({ "customer_email": "a@b.com", "customer_name": "A", "price": 10 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Missing required field: service_type");
}

#[actix_web::test]
async fn malformed_json_is_400() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let req = test::TestRequest::post()
    .uri("/api/create-order")
    .insert_header((header::CONTENT_TYPE, "application/json"))
    .set_payload("{ nope")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_order_is_404() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  for uri in ["/api/order/WAR-00000000", "/api/order/not-an-id"] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Order not found");
  }
}

#[actix_web::test]
async fn upload_for_order_binds_file_without_exposing_path() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);
  let order_id = create_order!(app);

  let req = upload_request(
    &format!("/api/upload-file/{}", order_id),
    "file",
    "side a.wav",
    b"RIFFdata",
  )
  .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order_id"], order_id.as_str());
  assert_eq!(body["filename"], "side_a.wav");
  assert_eq!(body["file_size"], 8);

  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["status"], "file_uploaded");
  assert_eq!(order["file_uploaded"], true);
  assert_eq!(order["original_filename"], "side_a.wav");
  assert!(order.get("file_path").is_none());

  let stored: Vec<_> = std::fs::read_dir(dir.path().join("uploads"))
    .unwrap()
    .map(|e| e.unwrap().file_name().into_string().unwrap())
    .collect();
  assert_eq!(stored.len(), 1);
  assert!(stored[0].starts_with(&format!("{}_", order_id)));
  assert!(stored[0].ends_with(".wav"));
}

#[actix_web::test]
async fn upload_to_unknown_order_is_404_and_writes_nothing() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let req = upload_request("/api/upload-file/WAR-ABCDEF12", "file", "a.wav", b"x").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
}

#[actix_web::test]
async fn rejected_uploads_are_400() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);
  let order_id = create_order!(app);
  let bound = format!("/api/upload-file/{}", order_id);
  let too_big = vec![0u8; UPLOAD_LIMIT as usize + 1];

  let invalid_type = "Invalid file type. Please upload an audio or video file.";
  let too_large = "File size exceeds 1024 bytes limit";
  let cases: Vec<(&str, &str, &str, &[u8], &str)> = vec![
    ("/api/upload", "file", "setup.exe", &b"MZ"[..], invalid_type),
    (bound.as_str(), "file", "setup.exe", &b"MZ"[..], invalid_type),
    ("/api/upload", "file", "big.mp3", too_big.as_slice(), too_large),
    (bound.as_str(), "file", "big.mp3", too_big.as_slice(), too_large),
    ("/api/upload", "attachment", "a.wav", &b"x"[..], "No file provided"),
    (bound.as_str(), "file", "", &b"x"[..], "No file selected"),
  ];

  for (uri, field, filename, content, message) in cases {
    let resp = test::call_service(&app, upload_request(uri, field, filename, content).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {}", uri, filename);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], message);
  }

  assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["file_uploaded"], false);
}

#[actix_web::test]
async fn unbound_upload_can_be_downloaded() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let resp = test::call_service(&app, upload_request("/api/upload", "file", "tape.flac", b"fLaC-bytes").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let file_id = body["file_id"].as_str().unwrap().to_string();
  assert_eq!(body["filename"], "tape.flac");
  assert_eq!(body["file_size"], 10);

  let req = test::TestRequest::get().uri(&format!("/api/download/{}", file_id)).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let disposition = resp
    .headers()
    .get(header::CONTENT_DISPOSITION)
    .and_then(|v| v.to_str().ok())
    .unwrap()
    .to_string();
  assert!(disposition.starts_with("attachment"));
  assert!(disposition.contains(&format!("{}.flac", file_id)));
  let bytes = test::read_body(resp).await;
  assert_eq!(&bytes[..], b"fLaC-bytes");
}

#[actix_web::test]
async fn download_of_unknown_or_traversing_id_is_404() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  for uri in ["/api/download/00000000-0000-0000-0000-000000000000", "/api/download/..%2F..%2Forders"] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
  }
}

#[actix_web::test]
async fn payment_intent_then_success_marks_order_paid() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);
  let order_id = create_order!(app);

  let req = test::TestRequest::post()
    .uri(&format!("/api/create-payment-intent/{}", order_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let intent: Value = test::read_body_json(resp).await;
  assert_eq!(intent["amount"], 5000);
  assert_eq!(intent["currency"], "usd");
  let intent_id = intent["payment_intent_id"].as_str().unwrap().to_string();
  assert!(intent["client_secret"].as_str().unwrap().starts_with(&intent_id));

  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["payment_intent_id"], intent_id.as_str());
  assert_eq!(order["payment_completed"], false);

  // No body at all: the intent recorded earlier stays.
  let req = test::TestRequest::post()
    .uri(&format!("/api/payment-success/{}", order_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Payment recorded successfully");
  assert_eq!(body["order_id"], order_id.as_str());

  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["status"], "paid");
  assert_eq!(order["payment_completed"], true);
  assert_eq!(order["payment_intent_id"], intent_id.as_str());
  assert!(order["payment_completed_at"].is_string());
}

#[actix_web::test]
async fn payment_success_records_supplied_intent() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);
  let order_id = create_order!(app);

  let req = test::TestRequest::post()
    .uri(&format!("/api/payment-success/{}", order_id))
    .set_json(json!({ "payment_intent_id": "pi_external" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = test::TestRequest::get().uri(&format!("/api/order/{}", order_id)).to_request();
  let order: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(order["payment_intent_id"], "pi_external");
}

#[actix_web::test]
async fn payment_endpoints_404_for_unknown_order() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  for uri in ["/api/payment-success/WAR-00000000", "/api/create-payment-intent/WAR-00000000"] {
    let resp = test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
  }
}

#[actix_web::test]
async fn zero_price_intent_is_refused_with_402() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let req = test::TestRequest::post()
    .uri("/api/create-order")
    .set_json(json!({
      "customer_email": "a@b.com",
      "customer_name": "A",
      "service_type": "consultation",
      "price": 0
    }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let order_id = body["order_id"].as_str().unwrap();

  let req = test::TestRequest::post()
    .uri(&format!("/api/create-payment-intent/{}", order_id))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
}

#[actix_web::test]
async fn order_listing_is_sanitized() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);
  let first = create_order!(app);
  let _second = create_order!(app);
  let req = upload_request(&format!("/api/upload-file/{}", first), "file", "a.mp3", b"ID3").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = test::TestRequest::get().uri("/api/orders").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let orders = body["orders"].as_array().unwrap();
  assert_eq!(orders.len(), 2);
  for order in orders {
    let obj = order.as_object().unwrap();
    assert!(!obj.contains_key("price"));
    assert!(!obj.contains_key("file_path"));
    assert!(obj.contains_key("customer_email"));
  }
  let uploaded = orders.iter().find(|o| o["order_id"] == first.as_str()).unwrap();
  assert_eq!(uploaded["status"], "file_uploaded");
}

#[actix_web::test]
async fn health_and_route_listing() {
  let dir = TempDir::new().unwrap();
  let app = init_app!(test_state(&dir).await);

  let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(body["status"], "healthy");
  assert!(body["timestamp"].is_string());

  let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/test").to_request()).await;
  assert_eq!(body["message"], "Test endpoint working");
  assert_eq!(body["routes"].as_array().unwrap().len(), ROUTES.len());
}
