use leptos::prelude::*;

use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="absolute top-4 right-4">
                <Link to=AppRoute::Login class="btn btn-ghost">"Log In"</Link>
            </div>
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <h1 class="text-5xl font-bold">"Welcome to BudgetWise"</h1>
                    <h2 class="text-2xl text-base-content/70">"Save More. Live Better."</h2>
                    <Link to=AppRoute::SignUp class="btn btn-primary">"Sign Up"</Link>
                </div>
            </div>
        </div>
    }
}
