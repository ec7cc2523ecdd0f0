use super::*;
use crate::error::{Operation, UNREACHABLE_MESSAGE};
use crate::web::http::{HttpBody, MockHttpClient};
use serde_json::json;

const BASE: &str = "http://localhost:5001";

fn api() -> BudgetWiseApi<MockHttpClient> {
    BudgetWiseApi::new("http://localhost:5001/", MockHttpClient::new())
}

fn statement() -> PdfFile {
    PdfFile::new("may.pdf", "application/pdf", b"%PDF-1.4".to_vec())
}

fn user() -> UserId {
    UserId::from(42)
}

// =========================================================
// 登录 / 注册
// =========================================================

#[tokio::test]
async fn login_success_returns_id_and_name() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/login"),
        200,
        json!({"user_id": 42, "name": "Ada"}),
    );

    let res = api.login("ada@test.com", "secret").await.unwrap();
    assert_eq!(res.user_id, UserId::from("42"));
    assert_eq!(res.name.as_deref(), Some("Ada"));

    let requests = api.client.requests.borrow();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(
        requests[0].body,
        HttpBody::Json(r#"{"email":"ada@test.com","password":"secret"}"#.to_string())
    );
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/login"),
        401,
        json!({"error": "Login failed."}),
    );

    let err = api.login("user@test.com", "wrongpass").await.unwrap_err();
    // 登录接口的 401 不视为会话失效
    assert!(!err.is_unauthorized());
    assert_eq!(err.user_message(Operation::Login), "Login failed.");
}

#[tokio::test]
async fn signup_returns_confirmation() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/signup"),
        201,
        json!({"message": "User created"}),
    );

    let message = api.signup("Ada", "ada@test.com", "secret").await.unwrap();
    assert_eq!(message, "User created");
}

#[tokio::test]
async fn signup_conflict_keeps_backend_text() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/signup"),
        409,
        json!({"error": "Email already exists"}),
    );

    let err = api.signup("Ada", "ada@test.com", "secret").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 409,
            message: Some("Email already exists".to_string())
        }
    );
}

#[tokio::test]
async fn unreachable_server_maps_to_network_message() {
    let api = api();
    api.client.mock_unreachable(&format!("{BASE}/api/login"));

    let err = api.login("ada@test.com", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message(Operation::Login), UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn non_json_error_body_uses_fallback() {
    let api = api();
    api.client
        .mock_raw(&format!("{BASE}/api/signup"), 500, "<html>Internal Error</html>");

    let err = api.signup("Ada", "ada@test.com", "secret").await.unwrap_err();
    assert_eq!(
        err.user_message(Operation::Signup),
        Operation::Signup.fallback_message()
    );
}

// =========================================================
// 上传
// =========================================================

#[tokio::test]
async fn non_pdf_upload_never_hits_network() {
    let api = api();
    let image = PdfFile::new("receipt.png", "image/png", vec![1, 2, 3]);

    for mode in [UploadMode::OneStep, UploadMode::TwoStep] {
        let err = api.upload_statement(&image, &user(), mode).await.unwrap_err();
        assert_eq!(err, ApiError::validation(SELECT_PDF_MESSAGE));
    }
    assert_eq!(api.client.request_count(), 0);
}

#[tokio::test]
async fn upload_without_session_is_rejected_locally() {
    let api = api();
    let err = api
        .upload_statement(&statement(), &UserId::new(""), UploadMode::TwoStep)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(Operation::Upload), LOGIN_TO_UPLOAD_MESSAGE);
    assert_eq!(api.client.request_count(), 0);
}

#[tokio::test]
async fn two_step_upload_processes_returned_filename() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/upload-pdf"),
        200,
        json!({"filename": "42 may.pdf"}),
    );
    api.client.mock_response(
        &format!("{BASE}/api/process-pdf/42%20may.pdf"),
        200,
        json!({"transactions_count": 17}),
    );

    let count = api
        .upload_statement(&statement(), &user(), UploadMode::TwoStep)
        .await
        .unwrap();
    assert_eq!(count, 17);
    assert_eq!(
        api.client.urls(),
        vec![
            format!("{BASE}/api/upload-pdf"),
            format!("{BASE}/api/process-pdf/42%20may.pdf"),
        ]
    );

    let requests = api.client.requests.borrow();
    match &requests[0].body {
        HttpBody::Multipart(fields) => {
            assert!(fields.contains(&FormField::Text {
                name: "user_id".to_string(),
                value: "42".to_string()
            }));
            assert!(matches!(&fields[0], FormField::File { name, filename, .. }
                if name == "file" && filename == "may.pdf"));
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
    assert_eq!(
        requests[1].body,
        HttpBody::Json(r#"{"user_id":"42"}"#.to_string())
    );
}

#[tokio::test]
async fn one_step_upload_uses_combined_endpoint() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/upload-and-analyze-pdf"),
        200,
        json!({"message": "ok", "transactions_count": 8}),
    );

    let count = api
        .upload_statement(&statement(), &user(), UploadMode::OneStep)
        .await
        .unwrap();
    assert_eq!(count, 8);
    assert_eq!(api.client.request_count(), 1);
}

#[tokio::test]
async fn parse_failure_on_server_is_reported() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/upload-and-analyze-pdf"),
        422,
        json!({"error": "Could not extract transactions from PDF"}),
    );

    let err = api
        .upload_statement(&statement(), &user(), UploadMode::OneStep)
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(Operation::Upload),
        "Could not extract transactions from PDF"
    );
}

#[tokio::test]
async fn upload_response_without_filename_is_unexpected() {
    let api = api();
    api.client
        .mock_response(&format!("{BASE}/api/upload-pdf"), 200, json!({}));

    let err = api.upload_pdf(&statement(), &user()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected(_)));
    assert_eq!(api.client.request_count(), 1);
}

// =========================================================
// 查询
// =========================================================

#[tokio::test]
async fn summary_and_transactions_use_get_without_body() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/check-transactions/42"),
        200,
        json!({
            "category_summary": [{"expense_category": "Food", "count": 3, "total_amount": -50.0}],
            "monthly_spending": [{"month": "2025-01", "total_amount": -50.0}]
        }),
    );
    api.client.mock_response(
        &format!("{BASE}/api/transactions/42"),
        200,
        json!({"transactions": [{
            "id": 1,
            "transaction_date": "Tue, 14 Jan 2025 00:00:00 GMT",
            "description": "GROCER",
            "amount": -12.5,
            "expense_category": "Food"
        }]}),
    );

    let summary = api.fetch_transaction_summary(&user()).await.unwrap();
    assert_eq!(summary.category_summary.len(), 1);
    assert_eq!(summary.category_summary[0].transaction_count, 3);
    assert_eq!(summary.monthly_spending[0].total, -50.0);

    let transactions = api.fetch_transactions(&user()).await.unwrap();
    assert_eq!(transactions[0].description, "GROCER");

    for req in api.client.requests.borrow().iter() {
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.body, HttpBody::Empty);
    }
}

#[tokio::test]
async fn analysis_passes_through_both_fields() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/analyze-spending/42"),
        200,
        json!({"analysis": "raw", "formatted_analysis": "**formatted**"}),
    );

    let analysis = api.analyze_spending(&user()).await.unwrap();
    assert_eq!(analysis.analysis.as_deref(), Some("raw"));
    assert_eq!(analysis.formatted_analysis.as_deref(), Some("**formatted**"));
}

#[tokio::test]
async fn expired_session_is_reported_as_unauthorized() {
    let api = api();
    api.client.mock_response(
        &format!("{BASE}/api/transactions/42"),
        401,
        json!({"error": "Unknown user"}),
    );

    let err = api.fetch_transactions(&user()).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn malformed_success_body_is_unexpected() {
    let api = api();
    api.client
        .mock_raw(&format!("{BASE}/api/transactions/42"), 200, "not json");

    let err = api.fetch_transactions(&user()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected(_)));
}
