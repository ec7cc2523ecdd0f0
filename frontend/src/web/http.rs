//! HTTP 请求封装模块
//!
//! - `HttpClient`: 传输层抽象，API 客户端只依赖此 trait
//! - `FetchClient`: 基于 `web_sys::fetch` 的浏览器实现
//! - `MockHttpClient`: 测试用实现，记录请求并返回预设响应

use async_trait::async_trait;
use budgetwise_shared::protocol::HttpMethod;
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败（服务器不可达、CORS 等）
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

// =========================================================
// 请求 / 响应结构
// =========================================================

/// multipart 表单字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Json(String),
    Multipart(Vec<FormField>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: HttpBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置 JSON 请求体（同时写入 Content-Type）
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self, HttpError> {
        let json = serde_json::to_string(body)
            .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;
        let mut req = self.with_header("Content-Type", "application/json");
        req.body = HttpBody::Json(json);
        Ok(req)
    }

    /// 设置 multipart 表单（Content-Type 及 boundary 由浏览器生成）
    pub fn with_form(mut self, fields: Vec<FormField>) -> Self {
        self.body = HttpBody::Multipart(fields);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 客户端特性
///
/// (?Send) 是因为浏览器环境下 JS 相关类型不是 Send 的
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: Fetch 客户端
// =========================================================

/// 基于 `window.fetch` 的客户端
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchClient;

impl FetchClient {
    fn build_form(fields: &[FormField]) -> Result<FormData, HttpError> {
        let form = FormData::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 FormData 失败: {:?}", e)))?;

        for field in fields {
            match field {
                FormField::Text { name, value } => form.append_with_str(name, value),
                FormField::File {
                    name,
                    filename,
                    content_type,
                    bytes,
                } => {
                    let array = js_sys::Uint8Array::from(bytes.as_slice());
                    let parts = js_sys::Array::of1(&array);
                    let opts = BlobPropertyBag::new();
                    opts.set_type(content_type);
                    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
                        .map_err(|e| {
                            HttpError::RequestBuildFailed(format!("创建 Blob 失败: {:?}", e))
                        })?;
                    form.append_with_blob_and_filename(name, &blob, filename)
                }
            }
            .map_err(|e| HttpError::RequestBuildFailed(format!("写入表单字段失败: {:?}", e)))?;
        }

        Ok(form)
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            HttpBody::Empty => {}
            HttpBody::Json(body) => opts.set_body(&JsValue::from_str(body)),
            HttpBody::Multipart(fields) => {
                let form = Self::build_form(fields)?;
                opts.set_body(form.as_ref());
            }
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
        })?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub use mock::MockHttpClient;
