use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 私有页面顶部导航栏
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let current = router.current_route();
    let user_name = auth.display_name();

    let nav_class = move |route: AppRoute| {
        if current.get() == route {
            "btn btn-ghost btn-active"
        } else {
            "btn btn-ghost"
        }
    };

    // 路由服务监听认证状态，登出后会自动跳转到登录页
    let on_sign_out = move |_| auth.sign_out();

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Chat class="btn btn-ghost text-xl">"BudgetWise"</Link>
            </div>
            <div class="flex-none gap-2">
                <a
                    href=AppRoute::Chat.to_path()
                    class=move || nav_class(AppRoute::Chat)
                    on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate_to(AppRoute::Chat);
                    }
                >
                    "Dashboard"
                </a>
                <a
                    href=AppRoute::Upload.to_path()
                    class=move || nav_class(AppRoute::Upload)
                    on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate_to(AppRoute::Upload);
                    }
                >
                    "Upload"
                </a>
                <a
                    href=AppRoute::Transactions.to_path()
                    class=move || nav_class(AppRoute::Transactions)
                    on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate_to(AppRoute::Transactions);
                    }
                >
                    "Transactions"
                </a>
                {move || user_name.get().map(|name| view! { <span class="badge badge-neutral hidden md:inline-flex">{name}</span> })}
                <button on:click=on_sign_out class="btn btn-outline btn-error">
                    "Sign out"
                </button>
            </div>
        </div>
    }
}
