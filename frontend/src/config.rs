//! 运行时配置
//!
//! 构建时通过环境变量注入（`option_env!`），缺省时使用默认值。
//! 启动时创建一次，通过 Context 提供给各页面。

use std::time::Duration;

use leptos::logging::warn;
use leptos::prelude::*;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5001";

/// 账单上传流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    /// `/api/upload-pdf` 之后再调用 `/api/process-pdf/{filename}`
    #[default]
    TwoStep,
    /// `/api/upload-and-analyze-pdf`
    OneStep,
}

impl UploadMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "two-step" | "two_step" | "twostep" => Some(Self::TwoStep),
            "one-step" | "one_step" | "onestep" => Some(Self::OneStep),
            _ => None,
        }
    }
}

/// 界面主题，写入 `<html data-theme>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub upload_mode: UploadMode,
    pub theme: Theme,
    /// 注册成功后跳转登录页前的停留时间
    pub signup_redirect_delay: Duration,
    /// 通知自动消失时间
    pub notice_duration: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            upload_mode: UploadMode::default(),
            theme: Theme::default(),
            signup_redirect_delay: Duration::from_millis(1500),
            notice_duration: Duration::from_secs(3),
        }
    }
}

impl AppConfig {
    /// 从构建时环境变量读取
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("BUDGETWISE_BACKEND_URL"),
            option_env!("BUDGETWISE_UPLOAD_MODE"),
            option_env!("BUDGETWISE_THEME"),
        )
    }

    /// 无法识别的值记录警告并回落到默认值
    pub fn from_values(
        backend_url: Option<&str>,
        upload_mode: Option<&str>,
        theme: Option<&str>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(url) = backend_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.backend_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = upload_mode {
            match UploadMode::parse(raw) {
                Some(mode) => config.upload_mode = mode,
                None => warn!("[Config] unknown upload mode {:?}, using default", raw),
            }
        }

        if let Some(raw) = theme {
            match Theme::parse(raw) {
                Some(t) => config.theme = t,
                None => warn!("[Config] unknown theme {:?}, using default", raw),
            }
        }

        config
    }

    /// 把主题写到根元素
    pub fn apply_theme(&self) {
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("data-theme", self.theme.as_str());
        }
    }
}

pub fn use_config() -> AppConfig {
    expect_context::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::from_values(None, None, None);
        assert_eq!(config.backend_url, "http://localhost:5001");
        assert_eq!(config.upload_mode, UploadMode::TwoStep);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.signup_redirect_delay, Duration::from_millis(1500));
    }

    #[test]
    fn overrides() {
        let config = AppConfig::from_values(
            Some("https://api.budgetwise.app/"),
            Some("one-step"),
            Some("Dark"),
        );
        assert_eq!(config.backend_url, "https://api.budgetwise.app");
        assert_eq!(config.upload_mode, UploadMode::OneStep);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_values(Some("  "), Some("three-step"), Some("neon"));
        assert_eq!(config, AppConfig::default());
    }
}
