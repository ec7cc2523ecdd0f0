//! BudgetWise REST 客户端
//!
//! 所有调用都通过 `HttpClient` 发出，浏览器中使用 `FetchClient`，测试中使用 `MockHttpClient`。
//! 不重试，不设超时。

use budgetwise_shared::protocol::{
    AnalyzeSpendingRequest, ApiRequest, CheckTransactionsRequest, HttpMethod,
    ListTransactionsRequest, ProcessPdfRequest, UploadEndpoint,
};
use budgetwise_shared::{
    ErrorBody, LoginRequest, LoginResponse, SignupRequest, SpendingAnalysis, Transaction,
    TransactionSummary, UploadResponse, UserId,
};
use leptos::logging::{log, warn};
use leptos::prelude::expect_context;
use serde::de::DeserializeOwned;

use crate::config::UploadMode;
use crate::error::ApiError;
use crate::statement::PdfFile;
use crate::web::http::{FetchClient, FormField, HttpClient, HttpRequest, HttpResponse};

pub const SELECT_PDF_MESSAGE: &str = "Please select a PDF file";
pub const LOGIN_TO_UPLOAD_MESSAGE: &str = "Please log in to upload files";

/// 浏览器中使用的客户端
pub type BrowserApi = BudgetWiseApi<FetchClient>;

#[derive(Debug, Clone)]
pub struct BudgetWiseApi<C: HttpClient> {
    base_url: String,
    pub(crate) client: C,
}

impl<C: HttpClient> BudgetWiseApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个 JSON 端点请求
    ///
    /// GET 不带请求体；POST 以 JSON 发送请求结构体（路径参数已被跳过序列化）。
    async fn execute<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let url = self.url(&req.path());
        let mut http = HttpRequest::new(&url, R::METHOD);
        if R::METHOD == HttpMethod::Post {
            http = http.with_json(req)?;
        }

        let res = self.client.send(http).await?;
        Self::decode(R::METHOD, &url, res)
    }

    fn decode<T: DeserializeOwned>(
        method: HttpMethod,
        url: &str,
        res: HttpResponse,
    ) -> Result<T, ApiError> {
        if !res.ok() {
            // 错误体不是 JSON 时按无消息处理
            let message = serde_json::from_str::<ErrorBody>(&res.body)
                .ok()
                .and_then(|b| b.message().map(str::to_string));
            warn!(
                "[Api] {} {} failed with status {}",
                method.as_str(),
                url,
                res.status
            );
            return Err(if res.status == 401 {
                ApiError::Unauthorized(message)
            } else {
                ApiError::Server {
                    status: res.status,
                    message,
                }
            });
        }

        Ok(res.json::<T>()?)
    }

    /// 登录，返回 `{user_id, name}`；会话由调用方写入
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let res = self.execute(&req).await;
        // /api/login 的 401 只是登录失败，不是会话失效
        res.map_err(|e| match e {
            ApiError::Unauthorized(message) => ApiError::Server {
                status: 401,
                message,
            },
            other => other,
        })
    }

    /// 注册，返回后端的确认消息
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let req = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let res = self.execute(&req).await?;
        Ok(res.message)
    }

    async fn post_statement(
        &self,
        endpoint: UploadEndpoint,
        file: &PdfFile,
        user_id: &UserId,
    ) -> Result<UploadResponse, ApiError> {
        let url = self.url(endpoint.path());
        let fields = vec![
            FormField::File {
                name: "file".to_string(),
                filename: file.name.clone(),
                content_type: file.mime().to_string(),
                bytes: file.bytes.clone(),
            },
            FormField::Text {
                name: "user_id".to_string(),
                value: user_id.to_string(),
            },
        ];
        let http = HttpRequest::new(&url, UploadEndpoint::METHOD).with_form(fields);
        let res = self.client.send(http).await?;
        Self::decode(UploadEndpoint::METHOD, &url, res)
    }

    /// 上传前的本地校验，失败时不发出任何请求
    fn check_upload(file: &PdfFile, user_id: &UserId) -> Result<(), ApiError> {
        if !file.is_pdf() {
            return Err(ApiError::validation(SELECT_PDF_MESSAGE));
        }
        if user_id.is_empty() {
            return Err(ApiError::validation(LOGIN_TO_UPLOAD_MESSAGE));
        }
        Ok(())
    }

    /// 两步上传的第一步：仅上传文件，返回后端保存的文件名
    pub async fn upload_pdf(&self, file: &PdfFile, user_id: &UserId) -> Result<String, ApiError> {
        Self::check_upload(file, user_id)?;
        let res = self
            .post_statement(UploadEndpoint::UploadPdf, file, user_id)
            .await?;
        res.filename
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ApiError::Unexpected("upload response carried no filename".to_string()))
    }

    /// 两步上传的第二步：解析已上传的文件，返回导入的交易数
    pub async fn process_pdf(&self, filename: &str, user_id: &UserId) -> Result<u32, ApiError> {
        if user_id.is_empty() {
            return Err(ApiError::validation(LOGIN_TO_UPLOAD_MESSAGE));
        }
        let req = ProcessPdfRequest {
            filename: filename.to_string(),
            user_id: user_id.clone(),
        };
        let res = self.execute(&req).await?;
        Ok(res.transactions_count)
    }

    /// 上传账单并解析，返回导入的交易数
    pub async fn upload_statement(
        &self,
        file: &PdfFile,
        user_id: &UserId,
        mode: UploadMode,
    ) -> Result<u32, ApiError> {
        Self::check_upload(file, user_id)?;
        log!("[Api] uploading statement {} ({:?})", file.name, mode);

        match mode {
            UploadMode::OneStep => {
                let res = self
                    .post_statement(UploadEndpoint::UploadAndAnalyze, file, user_id)
                    .await?;
                res.transactions_count.ok_or_else(|| {
                    ApiError::Unexpected("upload response carried no transactions_count".to_string())
                })
            }
            UploadMode::TwoStep => {
                let filename = self.upload_pdf(file, user_id).await?;
                self.process_pdf(&filename, user_id).await
            }
        }
    }

    /// 消费分析
    pub async fn analyze_spending(&self, user_id: &UserId) -> Result<SpendingAnalysis, ApiError> {
        let req = AnalyzeSpendingRequest {
            user_id: user_id.clone(),
        };
        self.execute(&req).await
    }

    /// 分类与月度汇总
    pub async fn fetch_transaction_summary(
        &self,
        user_id: &UserId,
    ) -> Result<TransactionSummary, ApiError> {
        let req = CheckTransactionsRequest {
            user_id: user_id.clone(),
        };
        self.execute(&req).await
    }

    /// 交易明细
    pub async fn fetch_transactions(&self, user_id: &UserId) -> Result<Vec<Transaction>, ApiError> {
        let req = ListTransactionsRequest {
            user_id: user_id.clone(),
        };
        let res = self.execute(&req).await?;
        Ok(res.transactions)
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> BrowserApi {
    expect_context::<BrowserApi>()
}

#[cfg(test)]
mod tests;
