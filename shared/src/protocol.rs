use crate::{
    LoginRequest, LoginResponse, ProcessPdfResponse, SignupRequest, SignupResponse,
    SpendingAnalysis, TransactionList, TransactionSummary, UserId,
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for a JSON endpoint.
///
/// Path parameters (user id, filename) live on the request struct and are
/// skipped during serialization, so `path()` is a method rather than a constant.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path, relative to the backend base URL.
    fn path(&self) -> String;
}

/// Everything outside the RFC 3986 unreserved set gets escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a single path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

// =========================================================
// Request Definitions
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/login".to_string()
    }
}

impl ApiRequest for SignupRequest {
    type Response = SignupResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/api/signup".to_string()
    }
}

/// Second step of the two-step upload: extract transactions from an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPdfRequest {
    #[serde(skip)]
    pub filename: String,
    pub user_id: UserId,
}

impl ApiRequest for ProcessPdfRequest {
    type Response = ProcessPdfResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/api/process-pdf/{}", encode_path_segment(&self.filename))
    }
}

/// Narrative spending analysis for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeSpendingRequest {
    #[serde(skip)]
    pub user_id: UserId,
}

impl ApiRequest for AnalyzeSpendingRequest {
    type Response = SpendingAnalysis;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/api/analyze-spending/{}",
            encode_path_segment(self.user_id.as_str())
        )
    }
}

/// Category and monthly aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTransactionsRequest {
    #[serde(skip)]
    pub user_id: UserId,
}

impl ApiRequest for CheckTransactionsRequest {
    type Response = TransactionSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/api/check-transactions/{}",
            encode_path_segment(self.user_id.as_str())
        )
    }
}

/// Raw transaction list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTransactionsRequest {
    #[serde(skip)]
    pub user_id: UserId,
}

impl ApiRequest for ListTransactionsRequest {
    type Response = TransactionList;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!(
            "/api/transactions/{}",
            encode_path_segment(self.user_id.as_str())
        )
    }
}

// =========================================================
// Multipart Upload Endpoints
// =========================================================

/// Statement upload endpoints (multipart `file` + `user_id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadEndpoint {
    /// `/api/upload-pdf`, answers `{filename}`; extraction happens in a second call
    UploadPdf,
    /// `/api/upload-and-analyze-pdf`, answers `{transactions_count}`
    UploadAndAnalyze,
}

impl UploadEndpoint {
    pub const METHOD: HttpMethod = HttpMethod::Post;

    pub fn path(&self) -> &'static str {
        match self {
            UploadEndpoint::UploadPdf => "/api/upload-pdf",
            UploadEndpoint::UploadAndAnalyze => "/api/upload-and-analyze-pdf",
        }
    }
}
