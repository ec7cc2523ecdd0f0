//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态，
//! 登录、登出以及 401 导致的会话清除都只修改这里的状态，重定向由路由服务完成。

use budgetwise_shared::{LoginResponse, Session, UserId};
use leptos::logging::{log, warn};
use leptos::prelude::*;

use crate::error::ApiError;
use crate::session::SessionStore;

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// 当前会话（`SessionStore` 的内存镜像）
    pub session: Session,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    set_state: WriteSignal<AuthState>,
    store: StoredValue<SessionStore>,
}

impl AuthContext {
    /// 创建认证上下文，并从会话存储恢复上次的会话
    pub fn new(store: SessionStore) -> Self {
        let session = store.load();
        if session.is_authenticated() {
            log!(
                "[Auth] restored session for user {}",
                session.user_id.as_ref().map(UserId::as_str).unwrap_or_default()
            );
        }
        let (state, set_state) = signal(AuthState { session });
        Self {
            state,
            set_state,
            store: StoredValue::new(store),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::is_authenticated))
    }

    /// 导航栏显示的用户名
    pub fn display_name(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.display_name().map(str::to_string)))
    }

    /// 当前用户 ID（不追踪）
    pub fn user_id(&self) -> Option<UserId> {
        self.state.with_untracked(|s| s.session.user_id.clone())
    }

    /// 私有页面取用户 ID；会话缺失时同步清理状态，交给路由重定向
    pub fn require_user(&self) -> Option<UserId> {
        let id = self.user_id();
        if id.is_none() {
            warn!("[Auth] private page opened without a session");
            self.sign_out();
        }
        id
    }

    /// 登录成功：写入会话存储并更新状态
    pub fn sign_in(&self, res: &LoginResponse) {
        let session = Session::from(res);
        self.store.with_value(|store| store.save(&session));
        log!("[Auth] signed in as user {}", res.user_id);
        self.set_state.set(AuthState { session });
    }

    /// 登出：清除全部会话字段
    ///
    /// 导航将由路由服务的认证状态监听自动处理。
    pub fn sign_out(&self) {
        self.store.with_value(SessionStore::clear);
        if self.state.with_untracked(AuthState::is_authenticated) {
            log!("[Auth] signed out");
        }
        self.set_state.set(AuthState::default());
    }

    /// 处理私有接口返回的错误：401 视为会话失效并清除会话
    ///
    /// 返回 `true` 表示会话已被清除。
    pub fn handle_error(&self, err: &ApiError) -> bool {
        if err.is_unauthorized() {
            warn!("[Auth] backend rejected the session, signing out");
            self.sign_out();
            true
        } else {
            false
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
