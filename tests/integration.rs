//! Integration tests for the overlap engine.
//!
//! This test suite covers:
//! - Pipeline behaviour on complete CSV inputs
//! - Date format handling end to end
//! - Error propagation for malformed input
//! - The HTTP upload endpoint, success and error responses

use std::io::Cursor;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use overlap_engine::api::{AppState, NO_PAIRS_MESSAGE, UPLOAD_PATH, create_router};
use overlap_engine::calculation::compute_pairs;
use overlap_engine::cancellation::CancellationToken;
use overlap_engine::config::ConfigLoader;
use overlap_engine::error::{EngineError, EngineResult};
use overlap_engine::models::CalculationResult;

// =============================================================================
// Test Helpers
// =============================================================================

const BOUNDARY: &str = "overlap-engine-test-boundary";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 1).unwrap()
}

fn compute(csv: &str) -> EngineResult<CalculationResult> {
    compute_pairs(Cursor::new(csv), &CancellationToken::new(), today())
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(ConfigLoader::defaults()).with_reference_date(today()))
}

fn multipart_body(field: &str, file_name: &str, contents: &str) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\
         \r\n\
         {contents}\r\n\
         --{boundary}--\r\n",
        boundary = BOUNDARY,
    )
}

async fn post_upload(router: Router, content_type: &str, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(UPLOAD_PATH)
                .header("Content-Type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn upload(file_name: &str, contents: &str) -> (StatusCode, Value) {
    post_upload(
        create_router_for_test(),
        &format!("multipart/form-data; boundary={}", BOUNDARY),
        multipart_body("file", file_name, contents),
    )
    .await
}

// =============================================================================
// Pipeline: documented properties
// =============================================================================

#[test]
fn test_pair_identity_independent_of_row_order() {
    let forward = compute("5,1,2020-01-01,2020-01-31\n3,1,2020-01-01,2020-01-31\n").unwrap();
    let backward = compute("3,1,2020-01-01,2020-01-31\n5,1,2020-01-01,2020-01-31\n").unwrap();

    assert_eq!(forward, backward);
    let top = forward.top_pair.unwrap();
    assert_eq!(top.employee_id_low, 3);
    assert_eq!(top.employee_id_high, 5);
}

#[test]
fn test_full_leap_year_counts_366_days() {
    let result = compute("1,1,2020-01-01,2020-12-31\n2,1,2020-01-01,2020-12-31\n").unwrap();
    assert_eq!(result.top_pair.unwrap().total_days, 366);
}

#[test]
fn test_null_date_to_uses_reference_date() {
    let with_null = compute("1,1,2020-05-01,NULL\n2,1,2020-01-01,2020-12-31\n").unwrap();
    let explicit = compute("1,1,2020-05-01,2020-06-01\n2,1,2020-01-01,2020-12-31\n").unwrap();
    assert_eq!(with_null, explicit);
}

#[test]
fn test_disjoint_ranges_produce_no_pair() {
    let result = compute("1,1,2020-01-01,2020-06-30\n2,1,2020-07-01,2020-12-31\n").unwrap();
    assert!(result.all_pairs.is_empty());
    assert!(result.top_pair.is_none());
}

#[test]
fn test_multi_project_accumulation() {
    let csv = "EmpID,ProjectID,DateFrom,DateTo\n\
               1,100,2020-01-01,2020-04-09\n\
               2,100,2020-01-01,2020-04-09\n\
               1,200,2020-05-01,2020-06-19\n\
               2,200,2020-05-01,2020-06-19\n";
    let result = compute(csv).unwrap();

    let top = result.top_pair.unwrap();
    assert_eq!(top.total_days, 150);
    assert_eq!(top.projects.len(), 2);
    assert_eq!(top.projects[0].days_worked, 100);
    assert_eq!(top.projects[1].days_worked, 50);
}

#[test]
fn test_empty_and_header_only_inputs() {
    assert_eq!(compute("").unwrap(), CalculationResult::empty());
    assert_eq!(
        compute("EmpID,ProjectID,DateFrom,DateTo\n").unwrap(),
        CalculationResult::empty()
    );
}

#[test]
fn test_idempotent_on_identical_input() {
    let csv = "143,12,2013-11-01,2014-01-05\n\
               218,10,2012-05-16,NULL\n\
               143,10,2009-01-01,2011-04-27\n\
               218,12,2013-12-01,2014-03-01\n\
               300,10,2010-01-01,2013-01-01\n";
    assert_eq!(compute(csv).unwrap(), compute(csv).unwrap());
}

#[test]
fn test_missing_column_rejects_whole_input() {
    let result = compute("1,1,2020-01-01,2020-12-31\n2,1\n");
    assert!(matches!(result, Err(EngineError::Format { line: Some(2), .. })));
}

#[test]
fn test_range_violation_is_error() {
    let result = compute("1,1,1900-01-01,2020-01-01\n2,1,1900-01-01,2020-01-01\n");
    assert!(matches!(result, Err(EngineError::OverlapOutOfRange { .. })));
}

// =============================================================================
// Pipeline: realistic inputs
// =============================================================================

#[test]
fn test_ranking_across_several_pairs() {
    let csv = "EmpID, ProjectID, DateFrom, DateTo\n\
               143, 12, 2013-11-01, 2014-01-05\n\
               218, 10, 2012-05-16, 2013-05-16\n\
               143, 10, 2009-01-01, 2013-01-01\n\
               218, 12, 2013-12-01, 2014-03-01\n\
               300, 10, 2012-06-01, 2012-06-30\n";
    let result = compute(csv).unwrap();

    let summary: Vec<(i64, i64, i64)> = result
        .all_pairs
        .iter()
        .map(|p| (p.employee_id_low, p.employee_id_high, p.total_days))
        .collect();
    // 143/218: project 10 2012-05-16..2013-01-01 (231) + project 12 2013-12-01..2014-01-05 (36)
    assert_eq!(summary, vec![(143, 218, 267), (143, 300, 30), (218, 300, 30)]);
}

#[test]
fn test_mixed_date_formats_and_header_order() {
    let csv = "DateFrom;ProjectID;EmpID;DateTo\n";
    // Semicolons are not separators: the header lacks the required columns
    assert!(matches!(compute(csv), Err(EngineError::Format { .. })));

    let csv = "DateTo,DateFrom,ProjectID,EmpID\n\
               31/01/2020,2020-01-01,7,1\n\
               2020/02/28,01/15/2020,7,2\n\
               NULL,\"January 20, 2020\",7,3\n";
    let result = compute(csv).unwrap();

    let summary: Vec<(i64, i64, i64)> = result
        .all_pairs
        .iter()
        .map(|p| (p.employee_id_low, p.employee_id_high, p.total_days))
        .collect();
    assert_eq!(summary, vec![(2, 3, 40), (1, 2, 17), (1, 3, 12)]);
}

#[test]
fn test_unparseable_date_names_value() {
    let error = compute("1,1,2020-01-01,2020-02-30\n").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid date format in DateTo: '2020-02-30'"
    );
}

// =============================================================================
// HTTP: success responses
// =============================================================================

#[tokio::test]
async fn test_upload_returns_ranked_pairs() {
    let csv = "EmpID,ProjectID,DateFrom,DateTo\n\
               1,10,2020-01-01,2020-04-09\n\
               2,10,2020-01-01,NULL\n\
               3,20,2020-03-01,2020-03-10\n\
               4,20,2020-03-01,2020-03-10\n";
    let (status, json) = upload("employees.csv", csv).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["message"],
        "Top pair: Employees 1 and 2 worked together for 100 days"
    );
    assert_eq!(json["totalPairsFound"], 2);
    assert_eq!(json["topPair"]["employeeIdA"], 1);
    assert_eq!(json["topPair"]["employeeIdB"], 2);
    assert_eq!(json["topPair"]["totalDays"], 100);
    assert_eq!(json["topPair"]["projects"][0]["projectId"], 10);
    assert_eq!(json["topPair"]["projects"][0]["startDate"], "2020-01-01");
    assert_eq!(json["topPair"]["projects"][0]["endDate"], "2020-04-09");
    assert_eq!(json["allPairs"][1]["totalDays"], 10);
}

#[tokio::test]
async fn test_upload_null_end_date_uses_state_reference_date() {
    let (status, json) = upload("employees.csv", "1,1,2020-05-01,NULL\n2,1,2020-05-01,NULL\n").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["topPair"]["totalDays"], 32);
    assert_eq!(json["topPair"]["projects"][0]["endDate"], "2020-06-01");
}

#[tokio::test]
async fn test_upload_without_pairs_returns_message() {
    let (status, json) = upload("employees.csv", "1,10,2020-01-01,2020-12-31\n").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], NO_PAIRS_MESSAGE);
    assert!(json["topPair"].is_null());
    assert_eq!(json["allPairs"], serde_json::json!([]));
    assert_eq!(json["totalPairsFound"], 0);
}

// =============================================================================
// HTTP: error responses
// =============================================================================

#[tokio::test]
async fn test_upload_missing_file_part() {
    let (status, json) = post_upload(
        create_router_for_test(),
        &format!("multipart/form-data; boundary={}", BOUNDARY),
        multipart_body("attachment", "employees.csv", "1,1,2020-01-01,NULL"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "NO_FILE");
    assert_eq!(json["message"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_empty_file() {
    let (status, json) = upload("employees.csv", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "NO_FILE");
}

#[tokio::test]
async fn test_upload_wrong_extension() {
    let (status, json) = upload("employees.txt", "1,1,2020-01-01,NULL").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_FILE_TYPE");
    assert_eq!(json["message"], "Only CSV files are allowed");
}

#[tokio::test]
async fn test_upload_malformed_row() {
    let (status, json) = upload("employees.csv", "1,1,2020-01-01,NULL\nabc,1,2020-01-01,NULL\n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_CSV_FORMAT");
    assert_eq!(json["message"], "Invalid CSV format");
    assert_eq!(
        json["details"],
        "CSV parsing error at line 2: EmpID must be an integer, found 'abc'"
    );
}

#[tokio::test]
async fn test_upload_bad_date() {
    let (status, json) = upload("employees.csv", "1,1,someday,NULL\n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_CSV_FORMAT");
    assert_eq!(json["details"], "Invalid date format in DateFrom: 'someday'");
}

#[tokio::test]
async fn test_upload_implausible_range() {
    let (status, json) =
        upload("employees.csv", "1,1,1800-01-01,2020-01-01\n2,1,1800-01-01,2020-01-01\n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_DATA");
    assert_eq!(json["message"], "Invalid data");
}

#[tokio::test]
async fn test_upload_requires_multipart_body() {
    let (status, json) = post_upload(
        create_router_for_test(),
        "text/csv",
        "1,1,2020-01-01,NULL".to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_UPLOAD");
}

#[tokio::test]
async fn test_upload_over_size_limit_rejected() {
    let mut loader = ConfigLoader::defaults();
    loader.config_mut().upload.max_bytes = 64;
    let router = create_router(AppState::new(loader).with_reference_date(today()));

    let rows = "1,1,2020-01-01,2020-12-31\n".repeat(20);
    let (status, json) = post_upload(
        router,
        &format!("multipart/form-data; boundary={}", BOUNDARY),
        multipart_body("file", "employees.csv", &rows),
    )
    .await;

    assert!(status.is_client_error(), "unexpected status {}", status);
    assert_eq!(json["code"], "INVALID_UPLOAD");
}
