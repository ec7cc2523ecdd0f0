use budgetwise_shared::Transaction;
use leptos::logging::warn;
use leptos::prelude::*;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use crate::error::Operation;
use crate::history::{
    ALL, TransactionFilter, available_categories, available_months, category_color, group_by_day,
    parse_category_choice, parse_month_choice,
};
use crate::summary::format_currency;
use crate::web::task::PageScope;

/// 页面加载状态
#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(Vec<Transaction>),
    Failed(String),
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = PageScope::attach();

    let state = RwSignal::new(LoadState::Loading);
    let month_choice = RwSignal::new(ALL.to_string());
    let category_choice = RwSignal::new(ALL.to_string());

    if let Some(user_id) = auth.require_user() {
        scope.spawn(
            async move { api.fetch_transactions(&user_id).await },
            move |res| match res {
                Ok(list) => state.set(LoadState::Loaded(list)),
                Err(e) => {
                    warn!("[Transactions] loading failed: {}", e);
                    if !auth.handle_error(&e) {
                        state.set(LoadState::Failed(e.user_message(Operation::Transactions)));
                    }
                }
            },
        );
    }

    let transactions = Memo::new(move |_| match state.get() {
        LoadState::Loaded(list) => list,
        _ => Vec::new(),
    });
    let groups = Memo::new(move |_| transactions.with(|t| group_by_day(t)));
    let months = Memo::new(move |_| transactions.with(|t| available_months(t)));
    let categories = Memo::new(move |_| transactions.with(|t| available_categories(t)));

    let filtered = Memo::new(move |_| {
        let filter = TransactionFilter {
            month: parse_month_choice(&month_choice.get()),
            category: parse_category_choice(&category_choice.get()),
        };
        groups.with(|g| filter.apply(g))
    });

    let body = move || match state.get() {
        LoadState::Loading => view! {
            <div class="flex justify-center py-8">
                <span class="loading loading-spinner loading-lg text-primary"></span>
                <span class="ml-2">"Loading transactions..."</span>
            </div>
        }
        .into_any(),
        LoadState::Failed(message) => view! {
            <div role="alert" class="alert alert-error">{message}</div>
        }
        .into_any(),
        LoadState::Loaded(_) => view! {
            <div class="space-y-6">
                {move || {
                    let groups = filtered.get();
                    if groups.is_empty() {
                        return view! {
                            <div class="text-center py-8 text-base-content/50">
                                "No transactions found for the selected filters"
                            </div>
                        }
                        .into_any();
                    }
                    groups
                        .into_iter()
                        .map(|group| {
                            view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body p-4">
                                        <h3 class="font-semibold text-base-content/70">{group.label}</h3>
                                        <ul class="divide-y divide-base-200">
                                            {group.transactions.into_iter().map(transaction_row).collect_view()}
                                        </ul>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-4xl mx-auto space-y-8">
                <Navbar />

                <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                    <h1 class="text-3xl font-bold">"Transaction History"</h1>
                    <div class="flex gap-2">
                        <select
                            class="select select-bordered"
                            on:change=move |ev| month_choice.set(event_target_value(&ev))
                            prop:value=move || month_choice.get()
                        >
                            <option value=ALL>"All Months"</option>
                            {move || months.get().into_iter().map(|m| view! {
                                <option value=m.to_string()>{m.label()}</option>
                            }).collect_view()}
                        </select>
                        <select
                            class="select select-bordered"
                            on:change=move |ev| category_choice.set(event_target_value(&ev))
                            prop:value=move || category_choice.get()
                        >
                            <option value=ALL>"All Categories"</option>
                            {move || categories.get().into_iter().map(|c| view! {
                                <option value=c.clone()>{c.clone()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>

                {body}
            </div>
        </div>
    }
}

fn transaction_row(t: Transaction) -> impl IntoView {
    let amount_class = if t.amount < 0.0 {
        "font-mono text-error"
    } else {
        "font-mono text-success"
    };
    view! {
        <li class="flex items-center justify-between py-3">
            <div>
                <div class="flex items-center gap-2 text-sm font-medium">
                    <span
                        class="w-3 h-3 rounded-full inline-block"
                        style=format!("background-color: {}", category_color(&t.expense_category))
                    ></span>
                    {t.expense_category.clone()}
                </div>
                <div class="text-base-content/70">{t.description}</div>
            </div>
            <div class=amount_class>{format_currency(t.amount)}</div>
        </li>
    }
}
