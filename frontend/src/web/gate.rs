//! 路由守卫模块
//!
//! 每次导航都会经过守卫：根据会话状态与目标路由的访问分类，
//! 决定是渲染目标页面还是重定向。检查是同步的，只看本地缓存。

use super::route::{AppRoute, RouteAccess};

/// 认证状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Authenticated,
}

#[cfg(test)]
impl AuthStatus {
    pub fn from_session(session: &budgetwise_shared::Session) -> Self {
        Self::from(session.is_authenticated())
    }
}

impl From<bool> for AuthStatus {
    fn from(is_authenticated: bool) -> Self {
        if is_authenticated {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

/// 守卫结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// 放行，渲染目标路由
    Render(AppRoute),
    /// 拦截，重定向到另一路由（替换历史记录）
    Redirect(AppRoute),
}

impl GateDecision {
    /// 最终落地的路由
    pub fn route(&self) -> AppRoute {
        match self {
            Self::Render(route) | Self::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// 路由守卫
///
/// Public 守卫：已登录用户离开公开页面，跳转到控制面板。
/// Private 守卫：未登录用户离开私有页面，跳转到登录页。
pub struct AuthGate;

impl AuthGate {
    pub fn evaluate(target: AppRoute, status: AuthStatus) -> GateDecision {
        match (target.access(), status) {
            (RouteAccess::Public, AuthStatus::Authenticated) => {
                GateDecision::Redirect(AppRoute::auth_success_redirect())
            }
            (RouteAccess::Private, AuthStatus::Unauthenticated) => {
                GateDecision::Redirect(AppRoute::auth_failure_redirect())
            }
            _ => GateDecision::Render(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_shared::{Session, UserId};

    fn routes_with(access: RouteAccess) -> Vec<AppRoute> {
        AppRoute::ALL
            .into_iter()
            .filter(|r| r.access() == access)
            .collect()
    }

    #[test]
    fn unauthenticated_private_routes_redirect_to_login() {
        let private = routes_with(RouteAccess::Private);
        assert!(!private.is_empty());
        for route in private {
            assert_eq!(
                AuthGate::evaluate(route, AuthStatus::Unauthenticated),
                GateDecision::Redirect(AppRoute::Login)
            );
        }
    }

    #[test]
    fn authenticated_public_routes_redirect_to_dashboard() {
        let public = routes_with(RouteAccess::Public);
        assert_eq!(public.len(), 3);
        for route in public {
            assert_eq!(
                AuthGate::evaluate(route, AuthStatus::Authenticated),
                GateDecision::Redirect(AppRoute::Chat)
            );
        }
    }

    #[test]
    fn permitted_requests_render_the_target() {
        for route in routes_with(RouteAccess::Public) {
            assert_eq!(
                AuthGate::evaluate(route, AuthStatus::Unauthenticated),
                GateDecision::Render(route)
            );
        }
        for route in routes_with(RouteAccess::Private) {
            assert_eq!(
                AuthGate::evaluate(route, AuthStatus::Authenticated),
                GateDecision::Render(route)
            );
        }
    }

    #[test]
    fn not_found_renders_in_both_states() {
        for status in [AuthStatus::Authenticated, AuthStatus::Unauthenticated] {
            assert_eq!(
                AuthGate::evaluate(AppRoute::NotFound, status),
                GateDecision::Render(AppRoute::NotFound)
            );
        }
    }

    #[test]
    fn status_follows_user_id_presence() {
        assert_eq!(
            AuthStatus::from_session(&Session::default()),
            AuthStatus::Unauthenticated
        );
        assert_eq!(
            AuthStatus::from_session(&Session::new(UserId::new(""), None)),
            AuthStatus::Unauthenticated
        );
        assert_eq!(
            AuthStatus::from_session(&Session::new(UserId::from(1), None)),
            AuthStatus::Authenticated
        );
    }

    #[test]
    fn redirect_targets_are_never_redirected_again() {
        for status in [AuthStatus::Authenticated, AuthStatus::Unauthenticated] {
            for route in AppRoute::ALL {
                let landed = AuthGate::evaluate(route, status).route();
                assert!(!AuthGate::evaluate(landed, status).is_redirect());
            }
        }
    }
}
