use std::rc::Rc;

use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{BudgetWiseApi, use_api};
use crate::auth::{AuthContext, use_auth};
use crate::components::forms::LoginForm;
use crate::components::notice::{InlineNotice, Notice, NoticeSlot};
use crate::error::Operation;
use crate::web::http::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService, use_router};
use crate::web::task::{InFlight, PageScope};

/// 登录页状态与提交流程
pub struct LoginController<C: HttpClient> {
    api: BudgetWiseApi<C>,
    auth: AuthContext,
    router: RouterService,
    scope: PageScope,
    pub form: LoginForm,
    pub error: NoticeSlot,
    pub submitting: InFlight,
}

impl<C: HttpClient> LoginController<C> {
    pub fn new(
        api: BudgetWiseApi<C>,
        auth: AuthContext,
        router: RouterService,
        scope: PageScope,
    ) -> Self {
        Self {
            api,
            auth,
            router,
            scope,
            form: LoginForm::new(),
            error: NoticeSlot::new(),
            submitting: InFlight::new(),
        }
    }

    /// 校验表单并登录，成功后进入控制面板
    ///
    /// 校验失败或已有请求在途时不发请求。
    pub async fn submit(&self) {
        let input = match self.form.validate() {
            Ok(input) => input,
            Err(msg) => {
                self.error.show(Notice::error(msg));
                return;
            }
        };
        let Some(_guard) = self.submitting.begin() else {
            return;
        };
        self.error.clear();

        let res = self.api.login(&input.email, &input.password).await;

        let (auth, router, error) = (self.auth, self.router, self.error);
        self.scope.deliver(res, move |res| match res {
            Ok(user) => {
                auth.sign_in(&user);
                router.navigate_to(AppRoute::Chat);
            }
            Err(e) => {
                warn!("[Auth] login failed: {}", e);
                error.show(Notice::error(e.user_message(Operation::Login)));
            }
        });
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let controller = LoginController::new(use_api(), use_auth(), use_router(), PageScope::attach());
    login_view(Rc::new(controller))
}

fn login_view<C: HttpClient + 'static>(controller: Rc<LoginController<C>>) -> impl IntoView {
    let form = controller.form;
    let error = controller.error;
    let submitting = controller.submitting;

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let controller = controller.clone();
        spawn_local(async move { controller.submit().await });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Log In"</h1>
                    <p class="text-base-content/70">"Welcome back to BudgetWise"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <InlineNotice notice=error />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| form.email.set(event_target_value(&ev))
                                prop:value=move || form.email.get()
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| form.password.set(event_target_value(&ev))
                                prop:value=move || form.password.get()
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || submitting.is_pending()>
                                {move || if submitting.is_pending() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log In".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to=AppRoute::SignUp class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
