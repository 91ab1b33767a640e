//! Home feed: composer, newest-first post list, likes, and edit/delete of
//! the user's own posts.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable behind `RequireAuth`, so a user id is always present while
//! this page is mounted. Every write goes through `FeedService`; the list
//! signal is replaced with the reloaded feed or patched locally for edits
//! and deletes.

use leptos::prelude::*;
use mayfly::feed::{self, MAX_POST_CHARS, Post, Segment};
use time::OffsetDateTime;

use crate::state::auth::use_auth;
use crate::state::backend::{Backend, BackendHandle, use_backend};

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

/// Composer accepts non-blank text within the character budget.
#[must_use]
pub fn can_publish(content: &str) -> bool {
    !content.trim().is_empty() && feed::remaining_chars(content) >= 0
}

/// Modifier class for the remaining-characters counter.
#[must_use]
pub fn counter_class(remaining: i64) -> &'static str {
    match remaining {
        ..0 => "composer__counter composer__counter--over",
        0..20 => "composer__counter composer__counter--warn",
        _ => "composer__counter",
    }
}

fn render_content(content: &str) -> impl IntoView + use<> {
    feed::link_segments(content)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => view! { <span>{text.to_owned()}</span> }.into_any(),
            Segment::Link(url) => {
                let url = url.to_owned();
                view! {
                    <a href=url.clone() target="_blank" rel="noopener noreferrer">
                        {url}
                    </a>
                }
                .into_any()
            }
        })
        .collect_view()
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let posts = RwSignal::new(Vec::<Post>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let draft = RwSignal::new(String::new());
    let publishing = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        let service = backend.with_value(Backend::feed);
        leptos::task::spawn_local(async move {
            match service.load().await {
                Ok(list) => posts.set(list),
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    }

    let on_publish = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let content = draft.get();
        if publishing.get() || !can_publish(&content) {
            return;
        }
        let Some(user_id) = auth.user_id() else {
            return;
        };
        publishing.set(true);
        let service = backend.with_value(Backend::feed);
        leptos::task::spawn_local(async move {
            match service.create_post(&user_id, &content).await {
                Ok(list) => {
                    posts.set(list);
                    draft.set(String::new());
                    error.set(None);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            publishing.set(false);
        });
    };

    view! {
        <section class="feed">
            <form class="composer" on:submit=on_publish>
                <textarea
                    class="composer__input"
                    placeholder="What's happening?"
                    rows="3"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                ></textarea>
                <div class="composer__footer">
                    {move || {
                        let remaining = feed::remaining_chars(&draft.get());
                        view! { <span class=counter_class(remaining)>{remaining}</span> }
                    }}
                    <button
                        class="composer__submit"
                        type="submit"
                        disabled=move || publishing.get() || !can_publish(&draft.get())
                    >
                        "Post"
                    </button>
                </div>
                <p class="composer__hint">{format!("Up to {MAX_POST_CHARS} characters.")}</p>
            </form>
            <Show when=move || error.with(Option::is_some)>
                <p class="notice notice--error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p class="feed__loading">"Loading posts..."</p> }>
                <Show
                    when=move || posts.with(|p| !p.is_empty())
                    fallback=|| view! { <p class="feed__empty">"No posts yet. Be the first!"</p> }
                >
                    <ul class="feed__list">
                        {move || {
                            posts
                                .get()
                                .into_iter()
                                .map(|post| view! { <PostCard post=post backend=backend posts=posts error=error/> })
                                .collect_view()
                        }}
                    </ul>
                </Show>
            </Show>
        </section>
    }
}

#[component]
fn PostCard(
    post: Post,
    backend: BackendHandle,
    posts: RwSignal<Vec<Post>>,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let auth = use_auth();
    let user_id = auth.user_id().unwrap_or_default();
    let liked = post.liked_by(&user_id);
    let own = post.is_own(&user_id);
    let editing = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let post_id = StoredValue::new(post.id.clone());
    let author = post.author_name().to_owned();
    let initial = post.author_initial();
    let avatar = post.author.as_ref().and_then(|a| a.avatar_url.clone());
    let age = feed::age_label(&post.created_at, OffsetDateTime::now_utc()).unwrap_or_default();
    let likes = post.likes_count();
    let like_class = if liked { "post__like post__like--active" } else { "post__like" };
    let like_icon = if liked { "♥ " } else { "♡ " };
    let content = StoredValue::new(post.content.clone());

    let uid = user_id.clone();
    let on_like = move |_: leptos::ev::MouseEvent| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let service = backend.with_value(Backend::feed);
        let current = posts.get_untracked();
        let id = post_id.get_value();
        let uid = uid.clone();
        leptos::task::spawn_local(async move {
            match service.toggle_like(&current, &id, &uid).await {
                Ok(list) => posts.set(list),
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    let uid = user_id.clone();
    let on_delete = move |_: leptos::ev::MouseEvent| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let service = backend.with_value(Backend::feed);
        let id = post_id.get_value();
        let uid = uid.clone();
        leptos::task::spawn_local(async move {
            match service.delete_post(&id, &uid).await {
                Ok(()) => posts.update(|list| feed::remove_post(list, &id)),
                Err(err) => {
                    error.set(Some(err.to_string()));
                    busy.set(false);
                }
            }
        });
    };

    let uid = user_id;
    let on_save = move |_: leptos::ev::MouseEvent| {
        let Some(text) = editing.get() else {
            return;
        };
        if busy.get() {
            return;
        }
        busy.set(true);
        let service = backend.with_value(Backend::feed);
        let id = post_id.get_value();
        let uid = uid.clone();
        leptos::task::spawn_local(async move {
            match service.update_post(&id, &uid, &text).await {
                Ok(stored) => {
                    posts.update(|list| feed::replace_content(list, &id, &stored));
                    editing.set(None);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    view! {
        <li class="post">
            <div class="post__avatar">
                {match avatar {
                    Some(url) => view! { <img src=url alt=author.clone()/> }.into_any(),
                    None => view! { <span class="post__initial">{initial}</span> }.into_any(),
                }}
            </div>
            <div class="post__body">
                <header class="post__header">
                    <span class="post__author">{author.clone()}</span>
                    <span class="post__age">{age}</span>
                </header>
                <Show
                    when=move || editing.with(Option::is_some)
                    fallback=move || view! { <p class="post__content">{render_content(&content.get_value())}</p> }
                >
                    <textarea
                        class="post__editor"
                        prop:value=move || editing.get().unwrap_or_default()
                        on:input=move |ev| editing.set(Some(event_target_value(&ev)))
                    ></textarea>
                    <div class="post__edit-actions">
                        <button on:click=move |_| editing.set(None)>"Cancel"</button>
                        <button on:click=on_save.clone() disabled=move || busy.get()>"Save"</button>
                    </div>
                </Show>
                <footer class="post__actions">
                    <button
                        class=like_class
                        on:click=on_like
                        disabled=move || busy.get()
                    >
                        {like_icon}
                        {likes}
                    </button>
                    <Show when=move || own>
                        <button on:click=move |_| editing.set(Some(content.get_value()))>"Edit"</button>
                        <button on:click=on_delete.clone() disabled=move || busy.get()>"Delete"</button>
                    </Show>
                </footer>
            </div>
        </li>
    }
}
