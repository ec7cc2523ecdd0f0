//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问分类。

use std::fmt::Display;

/// 路由访问分类
///
/// 每个路由恰好属于一类，由 `AppRoute::access` 的穷尽匹配保证。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// 仅未登录用户可见（落地页、注册、登录）
    Public,
    /// 需要登录
    Private,
    /// 任何状态都可访问（404 页面）
    Open,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    /// 注册
    SignUp,
    /// 登录
    Login,
    /// 控制面板：消费概览与分析
    Chat,
    /// 上传银行账单
    Upload,
    /// 交易历史
    Transactions,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 全部路由，用于校验分类与路径映射
    #[cfg(test)]
    pub const ALL: [AppRoute; 7] = [
        AppRoute::Landing,
        AppRoute::SignUp,
        AppRoute::Login,
        AppRoute::Chat,
        AppRoute::Upload,
        AppRoute::Transactions,
        AppRoute::NotFound,
    ];

    /// 将 URL path 解析为路由枚举，末尾的 `/` 会被忽略
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" => Self::Landing,
            "/signup" => Self::SignUp,
            "/login" => Self::Login,
            "/chat" => Self::Chat,
            "/upload" => Self::Upload,
            // 旧版本使用的路径
            "/transactions" | "/history" => Self::Transactions,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::SignUp => "/signup",
            Self::Login => "/login",
            Self::Chat => "/chat",
            Self::Upload => "/upload",
            Self::Transactions => "/transactions",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫分类：定义该路由的访问级别**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Landing | Self::SignUp | Self::Login => RouteAccess::Public,
            Self::Chat | Self::Upload | Self::Transactions => RouteAccess::Private,
            Self::NotFound => RouteAccess::Open,
        }
    }

    /// 未认证访问私有路由时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已认证访问公开路由时的重定向目标（控制面板）
    pub fn auth_success_redirect() -> Self {
        Self::Chat
    }

    /// 页面标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "BudgetWise",
            Self::SignUp => "Sign Up · BudgetWise",
            Self::Login => "Login · BudgetWise",
            Self::Chat => "Dashboard · BudgetWise",
            Self::Upload => "Upload Statement · BudgetWise",
            Self::Transactions => "Transactions · BudgetWise",
            Self::NotFound => "Not Found · BudgetWise",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in AppRoute::ALL {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn trailing_slash_and_alias() {
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path(""), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/history"), AppRoute::Transactions);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/chat/extra"), AppRoute::NotFound);
        assert_eq!(AppRoute::NotFound.access(), RouteAccess::Open);
    }

    #[test]
    fn redirect_targets_have_the_expected_class() {
        assert_eq!(AppRoute::auth_failure_redirect().access(), RouteAccess::Public);
        assert_eq!(AppRoute::auth_success_redirect().access(), RouteAccess::Private);
    }
}
