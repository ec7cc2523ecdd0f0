//! BudgetWise 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（localStorage 的显式封装）
//! - `web::gate`: 认证守卫（公开 / 私有页面）
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `api`: 后端 REST 客户端
//! - `components`: UI 组件层

#![recursion_limit = "256"]

mod api;
mod auth;
mod components {
    pub mod chat;
    mod forms;
    pub mod landing;
    pub mod login;
    mod navbar;
    mod notice;
    pub mod signup;
    pub mod transactions;
    pub mod upload;
}
mod config;
mod error;
mod history;
mod session;
mod statement;
mod summary;

use crate::api::BrowserApi;
use crate::auth::AuthContext;
use crate::components::chat::ChatPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::signup::SignUpPage;
use crate::components::transactions::TransactionsPage;
use crate::components::upload::UploadPage;
use crate::config::AppConfig;
use crate::session::SessionStore;

use leptos::logging::log;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod gate;
    pub mod http;
    pub mod route;
    pub mod router;
    mod storage;
    pub mod task;

    pub use storage::LocalStorage;
}

use web::http::FetchClient;
use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::SignUp => view! { <SignUpPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Chat => view! { <ChatPage /> }.into_any(),
        AppRoute::Upload => view! { <UploadPage /> }.into_any(),
        AppRoute::Transactions => view! { <TransactionsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to=AppRoute::Landing class="btn btn-primary">"Back to BudgetWise"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 运行时配置与 API 客户端
    let config = AppConfig::from_build_env();
    config.apply_theme();
    log!(
        "[App] backend {} ({:?} upload)",
        config.backend_url,
        config.upload_mode
    );
    provide_context(BrowserApi::new(&config.backend_url, FetchClient));
    provide_context(config);

    // 2. 创建认证上下文（从会话存储恢复上次的会话）
    let auth_ctx = AuthContext::new(SessionStore::browser());
    provide_context(auth_ctx);

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
