use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存用户 ID 的键
pub const STORAGE_USER_ID_KEY: &str = "user_id";
/// LocalStorage 中缓存用户名的键
pub const STORAGE_USER_NAME_KEY: &str = "user_name";

/// 会话包含的全部存储键，`clear` 时按此顺序删除（先删 user_id）
pub const SESSION_KEYS: [&str; 2] = [STORAGE_USER_ID_KEY, STORAGE_USER_NAME_KEY];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户标识
///
/// 后端可能返回字符串或整数，这里统一保存为字符串形式。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => UserId::new(text),
            Raw::Number(n) => UserId::from(n),
        })
    }
}

/// 客户端缓存的会话记录
///
/// 只是上一次成功登录响应的缓存，不做任何签名或过期校验。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
}

impl Session {
    pub fn new(user_id: UserId, user_name: Option<String>) -> Self {
        Self {
            user_id: Some(user_id),
            user_name,
        }
    }

    /// `user_id` 存在且非空即视为已认证
    pub fn is_authenticated(&self) -> bool {
        self.user_id.as_ref().is_some_and(|id| !id.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl From<&LoginResponse> for Session {
    fn from(resp: &LoginResponse) -> Self {
        Self::new(resp.user_id.clone(), resp.name.clone())
    }
}

// =========================================================
// 请求 / 响应模型 (Wire Models)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub transactions_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPdfResponse {
    pub transactions_count: u32,
}

/// 消费分析结果
///
/// `formatted_analysis` 存在时优先展示。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub formatted_analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub expense_category: String,
    #[serde(default, alias = "count")]
    pub transaction_count: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub first_date: Option<String>,
    #[serde(default)]
    pub last_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: String,
    #[serde(default, alias = "total_amount")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub category_summary: Vec<CategorySummary>,
    #[serde(default)]
    pub monthly_spending: Vec<MonthlySpending>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub transaction_date: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub expense_category: String,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionList {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// 后端错误响应体 `{ "error": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// 非空的错误消息
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
    }
}
