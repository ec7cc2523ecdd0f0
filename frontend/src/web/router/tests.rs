use super::*;

fn setup(path: &str, authenticated: bool) -> (RwSignal<bool>, Arc<MemoryHistory>, RouterService) {
    let auth = RwSignal::new(authenticated);
    let history = MemoryHistory::starting_at(path);
    let router = RouterService::new(auth.into(), history.clone());
    (auth, history, router)
}

// =========================================================
// 初始加载
// =========================================================

#[test]
fn initial_private_path_without_session_lands_on_login() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/upload", false);
    assert_eq!(router.current_route().get_untracked(), AppRoute::Login);
    assert_eq!(history.entries(), vec!["/login"]);
    assert_eq!(history.log(), vec!["replace:/login"]);
}

#[test]
fn initial_public_path_with_session_lands_on_dashboard() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/", true);
    assert_eq!(router.current_route().get_untracked(), AppRoute::Chat);
    assert_eq!(history.entries(), vec!["/chat"]);
}

#[test]
fn initial_unknown_path_keeps_url() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/does-not-exist", false);
    assert_eq!(router.current_route().get_untracked(), AppRoute::NotFound);
    assert_eq!(history.entries(), vec!["/does-not-exist"]);
    assert!(history.log().is_empty());
}

// =========================================================
// 导航
// =========================================================

#[test]
fn permitted_navigation_pushes() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/", false);
    let decision = router.navigate("/signup");
    assert_eq!(decision, GateDecision::Render(AppRoute::SignUp));
    assert_eq!(history.entries(), vec!["/", "/signup"]);
}

#[test]
fn blocked_navigation_replaces_instead_of_pushing() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/login", false);
    for path in ["/chat", "/upload", "/transactions", "/history"] {
        let decision = router.navigate(path);
        assert_eq!(decision, GateDecision::Redirect(AppRoute::Login));
    }
    // 没有任何一次 push，后退不会回到被拦截的页面
    assert_eq!(history.entries(), vec!["/login"]);
    assert!(history.log().iter().all(|op| op == "replace:/login"));
}

#[test]
fn navigating_to_current_path_does_not_duplicate_entry() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/chat", true);
    router.navigate_to(AppRoute::Chat);
    assert_eq!(history.entries(), vec!["/chat"]);
}

#[test]
fn unknown_path_navigation_keeps_requested_url() {
    let owner = Owner::new();
    owner.set();

    let (_, history, router) = setup("/chat", true);
    router.navigate("/nope");
    assert_eq!(router.current_route().get_untracked(), AppRoute::NotFound);
    assert_eq!(history.entries(), vec!["/chat", "/nope"]);
}

// =========================================================
// 认证状态变化
// =========================================================

#[test]
fn logout_then_recheck_redirects_to_login() {
    let owner = Owner::new();
    owner.set();

    let (auth, history, router) = setup("/upload", true);
    assert_eq!(router.current_route().get_untracked(), AppRoute::Upload);

    auth.set(false);
    let decision = router.recheck();
    assert_eq!(decision, GateDecision::Redirect(AppRoute::Login));
    assert_eq!(history.entries(), vec!["/login"]);

    // 登出后所有私有路由都被拦截
    for route in [AppRoute::Chat, AppRoute::Upload, AppRoute::Transactions] {
        assert_eq!(
            router.navigate_to(route),
            GateDecision::Redirect(AppRoute::Login)
        );
    }
}

#[test]
fn login_then_recheck_leaves_public_page() {
    let owner = Owner::new();
    owner.set();

    let (auth, history, router) = setup("/login", false);
    auth.set(true);
    assert_eq!(router.recheck(), GateDecision::Redirect(AppRoute::Chat));
    assert_eq!(history.entries(), vec!["/chat"]);
}

#[test]
fn popstate_into_blocked_page_is_redirected() {
    let owner = Owner::new();
    owner.set();

    let (auth, history, router) = setup("/chat", true);
    router.navigate("/upload");
    auth.set(false);

    // 模拟浏览器后退到 /chat
    history.replace("/chat");
    let decision = router.sync_with_location();
    assert_eq!(decision, GateDecision::Redirect(AppRoute::Login));
    assert_eq!(history.current_path(), "/login");
}
