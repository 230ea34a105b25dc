//! Ticket listing and detail views.
//!
//! # Design
//! - The listing drives itself from the signed-in role; the detail page
//!   merges the REST history page with live channel frames through the
//!   shared comment stream.
//! - The channel handle lives in a component ref so re-renders never
//!   reopen the socket; only an id change or an explicit reconnect does.

use crate::app::api::ApiCtx;
use crate::core::store::AppStore;
use crate::features::tickets::api;
use crate::features::tickets::state::new_ticket_draft;
use crate::services::ws::CommentChannel;
use helpdesk_api_models::{Comment, Ticket, TicketPriority, TicketStatus, UserClaims};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::routes::Route;

const fn status_label(status: Option<TicketStatus>) -> &'static str {
    match status {
        Some(TicketStatus::Open) => "Open",
        Some(TicketStatus::InProgress) => "In progress",
        Some(TicketStatus::Resolved) => "Resolved",
        Some(TicketStatus::Closed) => "Closed",
        None => "Pending",
    }
}

const fn priority_label(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "Low",
        TicketPriority::Medium => "Medium",
        TicketPriority::High => "High",
        TicketPriority::Urgent => "Urgent",
    }
}

/// Ticket listing with a minimal creation form.
#[function_component(TicketsPage)]
pub(crate) fn tickets_page() -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = Dispatch::<AppStore>::new();
    let rows = use_selector(|store: &AppStore| store.tickets.rows.clone());
    let loading = use_selector(|store: &AppStore| store.tickets.loading);
    let error = use_selector(|store: &AppStore| store.tickets.error.clone());
    let role = use_selector(|store: &AppStore| {
        store.session.user.as_ref().map(UserClaims::role_kind)
    });
    let user = use_selector(|store: &AppStore| store.session.user.clone());

    let title_ref = use_node_ref();
    let description_ref = use_node_ref();
    let creating = use_state(|| false);
    let form_error = use_state(|| None as Option<String>);

    let Some(api_ctx) = api_ctx else {
        return html! { <p class="text-error">{"Missing API context."}</p> };
    };

    {
        let client = api_ctx.client.clone();
        let dispatch = dispatch.clone();
        let role = *role;
        use_effect_with_deps(
            move |_| {
                if let Some(role) = role {
                    dispatch.reduce_mut(|store| store.tickets.load_started());
                    yew::platform::spawn_local(async move {
                        match api::list_tickets(&client, role).await {
                            Ok(rows) => dispatch.reduce_mut(|store| store.tickets.loaded(rows)),
                            Err(err) => dispatch
                                .reduce_mut(|store| store.tickets.load_failed(err.to_string())),
                        }
                    });
                }
                || ()
            },
            role,
        );
    }

    let on_create = {
        let client = api_ctx.client.clone();
        let dispatch = dispatch.clone();
        let title_ref = title_ref.clone();
        let description_ref = description_ref.clone();
        let user = user.clone();
        let creating = creating.clone();
        let form_error = form_error.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(title_input) = title_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let title = title_input.value().trim().to_string();
            if title.is_empty() {
                form_error.set(Some("Title is required".to_string()));
                return;
            }
            let Some(user) = (*user).clone() else {
                form_error.set(Some("Not signed in".to_string()));
                return;
            };
            let description = description_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value().trim().to_string())
                .filter(|value| !value.is_empty());
            let Some(draft) = new_ticket_draft(&user, &title, description) else {
                form_error.set(Some("This account has no tenant membership".to_string()));
                return;
            };
            creating.set(true);
            form_error.set(None);
            let client = client.clone();
            let dispatch = dispatch.clone();
            let creating = creating.clone();
            let form_error = form_error.clone();
            let title_ref = title_ref.clone();
            let description_ref = description_ref.clone();
            yew::platform::spawn_local(async move {
                match api::create_ticket(&client, &draft).await {
                    Ok(created) => {
                        dispatch.reduce_mut(|store| store.tickets.rows.insert(0, created));
                        if let Some(input) = title_ref.cast::<HtmlInputElement>() {
                            input.set_value("");
                        }
                        if let Some(input) = description_ref.cast::<HtmlInputElement>() {
                            input.set_value("");
                        }
                    }
                    Err(err) => form_error.set(Some(err.to_string())),
                }
                creating.set(false);
            });
        })
    };

    html! {
        <div class="tickets-page">
            <h1>{"Tickets"}</h1>
            <div class="ticket-create">
                <input ref={title_ref} type="text" placeholder="Title" />
                <input ref={description_ref} type="text" placeholder="Description (optional)" />
                <button onclick={on_create} disabled={*creating}>
                    { if *creating { "Creating..." } else { "New ticket" } }
                </button>
                { form_error.as_ref().map_or_else(|| html! {}, |message| html! {
                    <p class="text-error">{message}</p>
                }) }
            </div>
            { error.as_ref().as_ref().map_or_else(|| html! {}, |message| html! {
                <p class="text-error">{message}</p>
            }) }
            { if *loading {
                html! { <p class="muted">{"Loading tickets..."}</p> }
            } else if rows.is_empty() {
                html! { <p class="muted">{"No tickets yet."}</p> }
            } else {
                html! {
                    <table class="ticket-table">
                        <thead>
                            <tr>
                                <th>{"Title"}</th>
                                <th>{"Status"}</th>
                                <th>{"Priority"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for rows.iter().map(ticket_row) }
                        </tbody>
                    </table>
                }
            } }
        </div>
    }
}

fn ticket_row(ticket: &Ticket) -> Html {
    let title = match &ticket.id {
        Some(id) => html! {
            <Link<Route> to={Route::TicketDetail { id: id.clone() }}>
                {&ticket.title}
            </Link<Route>>
        },
        None => html! { {&ticket.title} },
    };
    html! {
        <tr>
            <td>{title}</td>
            <td>{status_label(ticket.status)}</td>
            <td>{priority_label(ticket.priority)}</td>
        </tr>
    }
}

/// Props for [`TicketDetailPage`].
#[derive(Properties, PartialEq)]
pub(crate) struct TicketDetailProps {
    /// Ticket to display.
    pub id: String,
}

/// Ticket detail with history plus the live comment panel.
#[function_component(TicketDetailPage)]
pub(crate) fn ticket_detail_page(props: &TicketDetailProps) -> Html {
    let api_ctx = use_context::<ApiCtx>();
    let dispatch = Dispatch::<AppStore>::new();
    let stream = use_selector(|store: &AppStore| store.tickets.stream.clone());
    let channel = use_mut_ref(CommentChannel::new);
    let ticket = use_state(|| None as Option<Ticket>);
    let detail_error = use_state(|| None as Option<String>);
    let send_error = use_state(|| None as Option<String>);
    let closing = use_state(|| false);
    let reconnect_tick = use_state(|| 0u32);
    let comment_ref = use_node_ref();

    let Some(api_ctx) = api_ctx else {
        return html! { <p class="text-error">{"Missing API context."}</p> };
    };

    {
        let client = api_ctx.client.clone();
        let dispatch = dispatch.clone();
        let channel = channel.clone();
        let ticket = ticket.clone();
        let detail_error = detail_error.clone();
        use_effect_with_deps(
            move |(id, _): &(String, u32)| {
                let id = id.clone();
                dispatch.reduce_mut(|store| {
                    store.tickets.stream.clear();
                    store.tickets.stream.loading = true;
                });
                let attach_channel = channel.clone();
                yew::platform::spawn_local(async move {
                    match api::fetch_ticket(&client, &id).await {
                        Ok(fetched) => ticket.set(Some(fetched)),
                        Err(err) => detail_error.set(Some(err.to_string())),
                    }
                    match api::fetch_comment_history(&client, &id).await {
                        Ok(history) => dispatch
                            .reduce_mut(|store| store.tickets.stream.seed(id.clone(), history)),
                        Err(err) => {
                            dispatch.reduce_mut(|store| store.tickets.stream.loading = false);
                            detail_error.set(Some(err.to_string()));
                            return;
                        }
                    }
                    let Some(token) = Dispatch::<AppStore>::new().get().session.token.clone()
                    else {
                        return;
                    };
                    let on_comment = {
                        let dispatch = dispatch.clone();
                        Callback::from(move |comment: Comment| {
                            dispatch.reduce_mut(|store| {
                                store.tickets.stream.append_live(comment);
                            });
                        })
                    };
                    let on_closed = {
                        let dispatch = dispatch.clone();
                        Callback::from(move |()| {
                            dispatch.reduce_mut(|store| store.tickets.stream.live = false);
                        })
                    };
                    let attached = attach_channel.borrow().attach(
                        client.base_url(),
                        &id,
                        &token,
                        on_comment,
                        on_closed,
                    );
                    match attached {
                        Ok(()) => {
                            dispatch.reduce_mut(|store| store.tickets.stream.live = true);
                        }
                        Err(err) => detail_error.set(Some(err.to_string())),
                    }
                });
                move || channel.borrow().detach()
            },
            (props.id.clone(), *reconnect_tick),
        );
    }

    let on_send = {
        let channel = channel.clone();
        let comment_ref = comment_ref.clone();
        let send_error = send_error.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(input) = comment_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let content = input.value().trim().to_string();
            if content.is_empty() {
                return;
            }
            match channel.borrow().send(&content) {
                Ok(()) => {
                    input.set_value("");
                    send_error.set(None);
                }
                Err(err) => send_error.set(Some(err.to_string())),
            }
        })
    };

    let on_close_ticket = {
        let client = api_ctx.client.clone();
        let ticket = ticket.clone();
        let detail_error = detail_error.clone();
        let closing = closing.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*ticket).clone() else {
                return;
            };
            let Some(ticket_id) = current.id.clone() else {
                return;
            };
            let mut updated = current;
            updated.status = Some(TicketStatus::Closed);
            closing.set(true);
            let client = client.clone();
            let ticket = ticket.clone();
            let detail_error = detail_error.clone();
            let closing = closing.clone();
            yew::platform::spawn_local(async move {
                match api::update_ticket(&client, &ticket_id, &updated).await {
                    Ok(saved) => ticket.set(Some(saved)),
                    Err(err) => detail_error.set(Some(err.to_string())),
                }
                closing.set(false);
            });
        })
    };

    let on_reconnect = {
        let reconnect_tick = reconnect_tick.clone();
        Callback::from(move |_: MouseEvent| reconnect_tick.set(*reconnect_tick + 1))
    };

    let header = ticket.as_ref().map_or_else(
        || html! { <h1>{"Ticket"}</h1> },
        |ticket| {
            let closable = ticket.status != Some(TicketStatus::Closed);
            html! {
                <div class="ticket-header">
                    <h1>{&ticket.title}</h1>
                    <p class="muted">
                        {status_label(ticket.status)}{" / "}{priority_label(ticket.priority)}
                    </p>
                    { ticket.description.as_ref().map_or_else(|| html! {}, |text| html! {
                        <p>{text}</p>
                    }) }
                    { if closable {
                        html! {
                            <button onclick={on_close_ticket.clone()} disabled={*closing}>
                                { if *closing { "Closing..." } else { "Close ticket" } }
                            </button>
                        }
                    } else { html! {} } }
                </div>
            }
        },
    );

    html! {
        <div class="ticket-detail">
            <Link<Route> to={Route::Tickets}>{"Back to tickets"}</Link<Route>>
            {header}
            { detail_error.as_ref().map_or_else(|| html! {}, |message| html! {
                <p class="text-error">{message}</p>
            }) }
            <section class="comments">
                <h2>{"Comments"}</h2>
                { if stream.loading {
                    html! { <p class="muted">{"Loading comments..."}</p> }
                } else if stream.comments.is_empty() {
                    html! { <p class="muted">{"No comments yet."}</p> }
                } else {
                    html! { <ul>{ for stream.comments.iter().map(comment_item) }</ul> }
                } }
                { if stream.live {
                    html! {
                        <div class="comment-compose">
                            <input ref={comment_ref} type="text" placeholder="Add a comment" />
                            <button onclick={on_send}>{"Send"}</button>
                        </div>
                    }
                } else if stream.loading {
                    html! {}
                } else {
                    html! {
                        <div class="comment-compose">
                            <p class="muted">{"Live updates disconnected."}</p>
                            <button onclick={on_reconnect}>{"Reconnect"}</button>
                        </div>
                    }
                } }
                { send_error.as_ref().map_or_else(|| html! {}, |message| html! {
                    <p class="text-error">{message}</p>
                }) }
            </section>
        </div>
    }
}

fn comment_item(comment: &Comment) -> Html {
    let author = comment.username.clone().unwrap_or_else(|| "system".to_string());
    html! {
        <li class="comment">
            <span class="comment-author">{author}</span>
            <span class="comment-time muted">
                {comment.created_at.format("%Y-%m-%d %H:%M").to_string()}
            </span>
            <p>{&comment.comment}</p>
        </li>
    }
}
