//! 路由服务模块 - 核心引擎
//!
//! 所有对浏览器 History 的操作都通过 `HistoryBackend` 进行。
//! 实现了"请求 -> 守卫 -> 处理 -> 加载"的导航流程：
//! 普通导航使用 pushState，守卫重定向一律使用 replaceState，
//! 这样后退键不会回到被拦截的页面。

use std::sync::Arc;

use leptos::logging::log;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::gate::{AuthGate, AuthStatus, GateDecision};
use super::route::AppRoute;

// ============================================================================
// History 后端
// ============================================================================

/// 历史记录后端
pub trait HistoryBackend: Send + Sync {
    /// 当前路径
    fn current_path(&self) -> String;
    /// 新增一条历史记录
    fn push(&self, path: &str);
    /// 替换当前历史记录（用于重定向）
    fn replace(&self, path: &str);
}

/// 浏览器 History API
pub struct BrowserHistory;

impl HistoryBackend for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
            }
        }
    }

    fn replace(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
            }
        }
    }
}

/// 导航对历史记录的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    /// 用户导航：放行时 push
    Push,
    /// 浏览器已处于目标路径（首次加载、前进/后退、认证状态变化）：放行时不动历史
    Keep,
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证状态以信号形式注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由
    current_route: RwSignal<AppRoute>,
    /// 认证状态检查（注入的信号）
    is_authenticated: Signal<bool>,
    history: StoredValue<Arc<dyn HistoryBackend>>,
}

impl RouterService {
    /// 创建路由服务，并对初始路径执行一次守卫
    pub fn new(is_authenticated: Signal<bool>, history: Arc<dyn HistoryBackend>) -> Self {
        let path = history.current_path();
        let router = Self {
            current_route: RwSignal::new(AppRoute::from_path(&path)),
            is_authenticated,
            history: StoredValue::new(history),
        };
        router.resolve(&path, HistoryMode::Keep);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    fn current_path(&self) -> String {
        self.history.with_value(|h| h.current_path())
    }

    fn auth_status(&self) -> AuthStatus {
        AuthStatus::from(self.is_authenticated.get_untracked())
    }

    /// 按原始路径导航（可能是未知路径）
    #[cfg(test)]
    pub fn navigate(&self, path: &str) -> GateDecision {
        self.resolve(path, HistoryMode::Push)
    }

    /// **核心方法：导航与守卫**
    pub fn navigate_to(&self, route: AppRoute) -> GateDecision {
        self.resolve(route.to_path(), HistoryMode::Push)
    }

    /// 按当前浏览器地址重新执行守卫（popstate）
    pub fn sync_with_location(&self) -> GateDecision {
        let path = self.current_path();
        self.resolve(&path, HistoryMode::Keep)
    }

    /// 认证状态变化后重新检查当前路由
    pub fn recheck(&self) -> GateDecision {
        let route = self.current_route.get_untracked();
        let path = self.current_path();
        // 未知路径保持原 URL
        let path = if route == AppRoute::NotFound {
            path
        } else {
            route.to_path().to_string()
        };
        self.resolve(&path, HistoryMode::Keep)
    }

    fn resolve(&self, path: &str, mode: HistoryMode) -> GateDecision {
        let target = AppRoute::from_path(path);
        let decision = AuthGate::evaluate(target, self.auth_status());

        match decision {
            GateDecision::Redirect(redirect) => {
                log!("[Router] {} blocked by auth gate, redirecting to {}", target, redirect);
                self.history.with_value(|h| h.replace(redirect.to_path()));
            }
            GateDecision::Render(route) => {
                if mode == HistoryMode::Push {
                    // 未知路径保留用户请求的 URL
                    let url = if route == AppRoute::NotFound {
                        path
                    } else {
                        route.to_path()
                    };
                    if self.current_path() != url {
                        self.history.with_value(|h| h.push(url));
                    }
                }
            }
        }

        if self.current_route.get_untracked() != decision.route() {
            self.current_route.set(decision.route());
        }
        decision
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.sync_with_location();
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时自动重定向
    ///
    /// 登录后离开公开页面，登出（包括 401 清除会话）后离开私有页面。
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let decision = router.recheck();
            if decision.is_redirect() {
                log!(
                    "[Router] Auth state changed (authenticated: {}), now at {}",
                    is_auth,
                    decision.route()
                );
            }
        });
    }

    /// 页面标题随路由变化
    fn setup_document_title(&self) {
        let current_route = self.current_route;
        Effect::new(move |_| {
            let title = current_route.get().title();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.set_title(title);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, Arc::new(BrowserHistory));

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();
    router.setup_document_title();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 客户端导航链接
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}

// ============================================================================
// 测试工具: MemoryHistory
// ============================================================================

#[cfg(test)]
pub use memory::MemoryHistory;

#[cfg(test)]
mod memory {
    use super::HistoryBackend;
    use std::sync::{Arc, Mutex};

    /// 记录 push/replace 调用的内存历史
    pub struct MemoryHistory {
        entries: Mutex<Vec<String>>,
        log: Mutex<Vec<String>>,
    }

    impl MemoryHistory {
        pub fn starting_at(path: &str) -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(vec![path.to_string()]),
                log: Mutex::new(Vec::new()),
            })
        }

        pub fn entries(&self) -> Vec<String> {
            self.entries.lock().unwrap().clone()
        }

        pub fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl HistoryBackend for MemoryHistory {
        fn current_path(&self) -> String {
            self.entries.lock().unwrap().last().cloned().unwrap_or_default()
        }

        fn push(&self, path: &str) {
            self.log.lock().unwrap().push(format!("push:{}", path));
            self.entries.lock().unwrap().push(path.to_string());
        }

        fn replace(&self, path: &str) {
            self.log.lock().unwrap().push(format!("replace:{}", path));
            let mut entries = self.entries.lock().unwrap();
            entries.pop();
            entries.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests;
