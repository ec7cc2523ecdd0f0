use std::rc::Rc;
use std::time::Duration;

use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{BudgetWiseApi, use_api};
use crate::components::forms::SignupForm;
use crate::components::notice::{InlineNotice, Notice, NoticeSlot};
use crate::config::use_config;
use crate::error::Operation;
use crate::web::http::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService, use_router};
use crate::web::task::{InFlight, PageScope};

/// 注册页状态与提交流程
pub struct SignupController<C: HttpClient> {
    api: BudgetWiseApi<C>,
    router: RouterService,
    scope: PageScope,
    redirect_delay: Duration,
    pub form: SignupForm,
    pub status: NoticeSlot,
    pub submitting: InFlight,
}

impl<C: HttpClient> SignupController<C> {
    pub fn new(
        api: BudgetWiseApi<C>,
        router: RouterService,
        scope: PageScope,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            api,
            router,
            scope,
            redirect_delay,
            form: SignupForm::new(),
            status: NoticeSlot::new(),
            submitting: InFlight::new(),
        }
    }

    /// 校验并注册；成功后显示后端消息，延时跳到登录页
    pub async fn submit(&self) {
        let input = match self.form.validate() {
            Ok(input) => input,
            Err(msg) => {
                self.status.show(Notice::error(msg));
                return;
            }
        };
        let Some(_guard) = self.submitting.begin() else {
            return;
        };
        self.status.clear();

        let res = self
            .api
            .signup(&input.name, &input.email, &input.password)
            .await;

        let (router, status, form) = (self.router, self.status, self.form);
        let (redirect_scope, redirect_delay) = (self.scope.clone(), self.redirect_delay);
        self.scope.deliver(res, move |res| match res {
            Ok(message) => {
                log!("[Auth] account created, redirecting to login");
                status.show(Notice::success(message));
                form.reset();
                // 注册不会登录
                redirect_scope.after(redirect_delay, move || {
                    router.navigate_to(AppRoute::Login);
                });
            }
            Err(e) => {
                warn!("[Auth] signup failed: {}", e);
                status.show(Notice::error(e.user_message(Operation::Signup)));
            }
        });
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let config = use_config();
    let controller = SignupController::new(
        use_api(),
        use_router(),
        PageScope::attach(),
        config.signup_redirect_delay,
    );
    signup_view(Rc::new(controller))
}

fn signup_view<C: HttpClient + 'static>(controller: Rc<SignupController<C>>) -> impl IntoView {
    let form = controller.form;
    let status = controller.status;
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
                    <h1 class="text-3xl font-bold">"Sign Up"</h1>
                    <p class="text-base-content/70">"Start tracking where your money goes"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <InlineNotice notice=status />

                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=move || form.name.get()
                                class="input input-bordered"
                                required
                            />
                        </div>
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
                                on:input=move |ev| form.password.set(event_target_value(&ev))
                                prop:value=move || form.password.get()
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || submitting.is_pending()>
                                {move || if submitting.is_pending() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign Up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
