use leptos::logging::warn;
use leptos::prelude::*;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use crate::components::notice::{InlineNotice, Notice, NoticeSlot};
use crate::error::Operation;
use crate::history::category_color;
use crate::summary::{SpendingOverview, analysis_text, format_currency};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::web::task::{InFlight, PageScope};

const NO_ANALYSIS: &str = "No analysis available yet. Upload a statement first.";

/// 仪表盘：消费汇总与分析
#[component]
pub fn ChatPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = PageScope::attach();

    let overview = RwSignal::new(Option::<SpendingOverview>::None);
    let summary_error = NoticeSlot::new();
    let analysis = RwSignal::new(Option::<String>::None);
    let analysis_error = NoticeSlot::new();
    let loading = InFlight::new();
    let analyzing = InFlight::new();

    let load_summary = {
        let api = api.clone();
        let scope = scope.clone();
        move || {
            let Some(user_id) = auth.require_user() else {
                return;
            };
            let Some(guard) = loading.begin() else {
                return;
            };
            summary_error.clear();

            let api = api.clone();
            scope.spawn(
                async move {
                    let _guard = guard;
                    api.fetch_transaction_summary(&user_id).await
                },
                move |res| match res {
                    Ok(summary) => overview.set(Some(SpendingOverview::from_summary(&summary))),
                    Err(e) => {
                        warn!("[Dashboard] loading summary failed: {}", e);
                        if !auth.handle_error(&e) {
                            summary_error.show(Notice::error(e.user_message(Operation::Summary)));
                        }
                    }
                },
            );
        }
    };

    // 初始加载
    load_summary();

    let on_analyze = move |_: leptos::ev::MouseEvent| {
        let Some(user_id) = auth.require_user() else {
            return;
        };
        let Some(guard) = analyzing.begin() else {
            return;
        };
        analysis_error.clear();

        let api = api.clone();
        scope.spawn(
            async move {
                let _guard = guard;
                api.analyze_spending(&user_id).await
            },
            move |res| match res {
                Ok(result) => {
                    let text = analysis_text(&result).unwrap_or(NO_ANALYSIS).to_string();
                    analysis.set(Some(text));
                }
                Err(e) => {
                    warn!("[Dashboard] analysis failed: {}", e);
                    if !auth.handle_error(&e) {
                        analysis_error.show(Notice::error(e.user_message(Operation::Analyze)));
                    }
                }
            },
        );
    };

    let summary_view = move || {
        overview.get().map(|o| {
            if o.is_empty() {
                return view! {
                    <div class="text-center py-8 text-base-content/50">
                        "No transactions yet. "
                        <Link to=AppRoute::Upload class="link link-primary">"Upload a statement"</Link>
                        " to get started."
                    </div>
                }
                .into_any();
            }

            let peak = o.peak_month();
            view! {
                <div class="stats shadow w-full bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Total Expense"</div>
                        <div class="stat-value text-primary">{format_currency(o.total_expense)}</div>
                        <div class="stat-desc">{format!("{} categories", o.categories.len())}</div>
                    </div>
                </div>

                <div class="grid md:grid-cols-2 gap-6">
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">"Spending by Category"</h3>
                            <ul class="space-y-3">
                                {o.categories.into_iter().map(|c| {
                                    let color = category_color(&c.name);
                                    view! {
                                        <li>
                                            <div class="flex justify-between text-sm">
                                                <span class="flex items-center gap-2">
                                                    <span class="w-3 h-3 rounded-full inline-block" style=format!("background-color: {}", color)></span>
                                                    {c.name.clone()}
                                                </span>
                                                <span>{format_currency(c.total)} " · " {format!("{:.1}%", c.percent)}</span>
                                            </div>
                                            <progress class="progress w-full" value=format!("{:.1}", c.percent) max="100"></progress>
                                        </li>
                                    }
                                }).collect_view()}
                            </ul>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">"Monthly Spending"</h3>
                            <ul class="space-y-3">
                                {o.months.into_iter().map(|m| {
                                    let width = if peak > 0.0 { m.total / peak * 100.0 } else { 0.0 };
                                    view! {
                                        <li>
                                            <div class="flex justify-between text-sm">
                                                <span>{m.label.clone()}</span>
                                                <span>{format_currency(m.total)}</span>
                                            </div>
                                            <progress class="progress progress-secondary w-full" value=format!("{:.1}", width) max="100"></progress>
                                        </li>
                                    }
                                }).collect_view()}
                            </ul>
                        </div>
                    </div>
                </div>
            }
            .into_any()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-8">
                <Navbar />

                <InlineNotice notice=summary_error />
                <Show when=move || loading.is_pending() && overview.with(Option::is_none)>
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>
                {summary_view}

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <div class="flex items-center justify-between">
                            <h3 class="card-title">"Spending Insights"</h3>
                            <button class="btn btn-primary" on:click=on_analyze disabled=move || analyzing.is_pending()>
                                {move || if analyzing.is_pending() {
                                    view! { <span class="loading loading-spinner"></span> "Analyzing..." }.into_any()
                                } else {
                                    "Analyze My Spending".into_any()
                                }}
                            </button>
                        </div>
                        <InlineNotice notice=analysis_error />
                        {move || analysis.get().map(|text| view! {
                            <p class="whitespace-pre-wrap leading-relaxed">{text}</p>
                        })}
                    </div>
                </div>
            </div>
        </div>
    }
}
