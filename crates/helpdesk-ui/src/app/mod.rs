//! Application shell: router, route guard, session boot and the pages
//! that do not belong to a feature slice.
//!
//! # Design
//! - One API client per boot, shared through context; one expiry watch
//!   interval owned by the shell for the whole session.
//! - Redirects are declarative: the guard observes `(route, session)` and
//!   navigates, so no flow ever has to push a redirect by hand.

use crate::core::guard::{self, GuardVerdict};
use crate::core::store::AppStore;
use crate::features::tickets::view::{TicketDetailPage, TicketsPage};
use crate::services::api::api_base_url;
use gloo_timers::callback::Interval;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

pub(crate) mod api;
pub(crate) mod routes;
mod session;

use api::ApiCtx;
use routes::Route;

/// Expiry watch period: five minutes, matching the refresh horizon.
const EXPIRY_WATCH_MS: u32 = 300_000;

#[function_component(HelpdeskApp)]
fn helpdesk_app() -> Html {
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());
    let expiry_watch = use_mut_ref(|| None as Option<Interval>);

    {
        let api_ctx = (*api_ctx).clone();
        let expiry_watch = expiry_watch.clone();
        use_effect_with_deps(
            move |_| {
                session::hydrate();
                let client = api_ctx.client.clone();
                {
                    let client = client.clone();
                    yew::platform::spawn_local(async move {
                        session::check_expiry(&client).await;
                    });
                }
                let interval = Interval::new(EXPIRY_WATCH_MS, move || {
                    let client = client.clone();
                    yew::platform::spawn_local(async move {
                        session::check_expiry(&client).await;
                    });
                });
                expiry_watch.borrow_mut().replace(interval);
                move || {
                    expiry_watch.borrow_mut().take();
                }
            },
            (),
        );
    }

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <BrowserRouter>
                <RouteGuard />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <Redirect<Route> to={Route::Dashboard} /> },
        Route::Login => html! { <LoginPage /> },
        Route::Signup => html! { <SignupPage /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Tickets => html! { <TicketsPage /> },
        Route::TicketDetail { id } => html! { <TicketDetailPage {id} /> },
        Route::Profile => html! { <ProfilePage /> },
        Route::NotFound => html! {
            <main class="page">
                <h1>{"Not found"}</h1>
                <p class="muted">{"Use navigation to return to a supported view."}</p>
                <Link<Route> to={Route::Dashboard}>{"Dashboard"}</Link<Route>>
            </main>
        },
    }
}

/// Applies the access policy for the current location.
#[function_component(RouteGuard)]
fn route_guard() -> Html {
    let navigator = use_navigator();
    let route = use_route::<Route>();
    let authenticated = use_selector(|store: &AppStore| store.session.authenticated);
    let hydrated = use_selector(|store: &AppStore| store.session.hydrated);

    let verdict = route.as_ref().map_or(GuardVerdict::Stay, |route| {
        guard::evaluate(&route.to_path(), *authenticated, *hydrated)
    });
    use_effect_with_deps(
        move |verdict| {
            if let Some(navigator) = navigator {
                match verdict {
                    GuardVerdict::RedirectToLogin => navigator.push(&Route::Login),
                    GuardVerdict::RedirectToDashboard => navigator.push(&Route::Dashboard),
                    GuardVerdict::Stay => {}
                }
            }
            || ()
        },
        verdict,
    );
    html! {}
}

#[function_component(LoginPage)]
fn login_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let loading = use_selector(|store: &AppStore| store.session.loading);
    let error = use_selector(|store: &AppStore| store.session.error.clone());

    let Some(api_ctx) = api_ctx else {
        return html! { <p class="text-error">{"Missing API context."}</p> };
    };

    let on_submit = {
        let client = api_ctx.client.clone();
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(email) = email_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let Some(password) = password_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let client = client.clone();
            yew::platform::spawn_local(async move {
                session::login(&client, &email.value(), &password.value()).await;
            });
        })
    };

    html! {
        <main class="page auth-page">
            <h1>{"Sign in"}</h1>
            <input ref={email_ref} type="email" placeholder="Email" />
            <input ref={password_ref} type="password" placeholder="Password" />
            <button onclick={on_submit} disabled={*loading}>
                { if *loading { "Signing in..." } else { "Sign in" } }
            </button>
            { error.as_ref().as_ref().map_or_else(|| html! {}, |message| html! {
                <p class="text-error">{message}</p>
            }) }
            <Link<Route> to={Route::Signup}>{"Need an account?"}</Link<Route>>
        </main>
    }
}

#[function_component(SignupPage)]
fn signup_page() -> Html {
    html! {
        <main class="page auth-page">
            <h1>{"Create an account"}</h1>
            <p class="muted">
                {"Accounts are provisioned by your tenant administrator. \
                  Contact them for an invitation."}
            </p>
            <Link<Route> to={Route::Login}>{"Back to sign in"}</Link<Route>>
        </main>
    }
}

#[function_component(DashboardPage)]
fn dashboard_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let user = use_selector(|store: &AppStore| store.session.user.clone());
    let error = use_selector(|store: &AppStore| store.session.error.clone());

    let on_logout = api_ctx.map(|api_ctx| {
        Callback::from(move |_: MouseEvent| {
            let client = api_ctx.client.clone();
            yew::platform::spawn_local(async move {
                session::logout(&client).await;
            });
        })
    });

    let greeting = user.as_ref().as_ref().map_or_else(
        || "Welcome".to_string(),
        |user| format!("Welcome, {}", user.username),
    );

    html! {
        <main class="page dashboard-page">
            <h1>{greeting}</h1>
            { error.as_ref().as_ref().map_or_else(|| html! {}, |message| html! {
                <p class="text-error">{message}</p>
            }) }
            <nav class="dashboard-nav">
                <Link<Route> to={Route::Tickets}>{"Tickets"}</Link<Route>>
                <Link<Route> to={Route::Profile}>{"Profile"}</Link<Route>>
            </nav>
            { on_logout.map_or_else(|| html! {}, |on_logout| html! {
                <button onclick={on_logout}>{"Sign out"}</button>
            }) }
        </main>
    }
}

#[function_component(ProfilePage)]
fn profile_page() -> Html {
    let user = use_selector(|store: &AppStore| store.session.user.clone());
    let body = user.as_ref().as_ref().map_or_else(
        || html! { <p class="muted">{"Not signed in."}</p> },
        |user| {
            html! {
                <dl class="profile-fields">
                    <dt>{"Username"}</dt>
                    <dd>{&user.username}</dd>
                    <dt>{"Role"}</dt>
                    <dd>{&user.role}</dd>
                    <dt>{"Tenants"}</dt>
                    <dd>{user.tenants.join(", ")}</dd>
                </dl>
            }
        },
    );
    html! {
        <main class="page profile-page">
            <h1>{"Profile"}</h1>
            {body}
            <Link<Route> to={Route::Dashboard}>{"Back to dashboard"}</Link<Route>>
        </main>
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<HelpdeskApp>::with_root(root).render();
    } else {
        yew::Renderer::<HelpdeskApp>::new().render();
    }
}
