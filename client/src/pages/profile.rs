//! Profile editor with avatar upload.

use leptos::prelude::*;
use mayfly::profiles::{AVATAR_EXTENSIONS, Profile};

use crate::state::auth::use_auth;
use crate::state::backend::{Backend, use_backend};

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

/// `accept` attribute for the avatar file input.
#[must_use]
pub fn avatar_accept() -> String {
    AVATAR_EXTENSIONS.iter().map(|ext| format!(".{ext}")).collect::<Vec<_>>().join(",")
}

/// Blank optional fields are stored as absent.
#[must_use]
pub fn optional_field(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Trim the editable fields before saving.
#[must_use]
pub fn normalized(profile: &Profile) -> Profile {
    Profile {
        username: profile.username.trim().to_owned(),
        full_name: optional_field(profile.full_name.as_deref()),
        bio: optional_field(profile.bio.as_deref()),
        ..profile.clone()
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let profile = RwSignal::new(None::<Profile>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let file_input = NodeRef::<leptos::html::Input>::new();

    #[cfg(feature = "hydrate")]
    if let Some(user_id) = auth.user_id() {
        let service = backend.with_value(Backend::profiles);
        leptos::task::spawn_local(async move {
            match service.load(&user_id).await {
                Ok(loaded) => profile.set(Some(loaded)),
                Err(err) => info.set(err.to_string()),
            }
        });
    }

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = profile.get().as_ref().map(normalized) else {
            return;
        };
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Saving...".to_owned());
        profile.set(Some(current.clone()));
        let service = backend.with_value(Backend::profiles);
        leptos::task::spawn_local(async move {
            match service.save(&current).await {
                Ok(()) => info.set("Profile saved.".to_owned()),
                Err(err) => info.set(err.to_string()),
            }
            busy.set(false);
        });
    };

    let on_avatar = move |_: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let (Some(input), Some(current)) = (file_input.get(), profile.get()) else {
                return;
            };
            if busy.get() {
                return;
            }
            busy.set(true);
            info.set("Uploading...".to_owned());
            let service = backend.with_value(Backend::profiles);
            leptos::task::spawn_local(async move {
                let Some(file) = crate::util::files::read_first(&input).await else {
                    busy.set(false);
                    info.set(String::new());
                    return;
                };
                let outcome = match service.change_avatar(&current, &file.name, file.bytes).await {
                    Ok(updated) => {
                        let saved = service.save(&updated).await;
                        profile.set(Some(updated));
                        saved.map(|()| "Avatar updated.".to_owned()).map_err(|e| e.to_string())
                    }
                    Err(err) => Err(err.to_string()),
                };
                info.set(outcome.unwrap_or_else(|message| message));
                input.set_value("");
                busy.set(false);
            });
        }
    };

    let field = move |read: fn(&Profile) -> String| move || profile.with(|p| p.as_ref().map(read).unwrap_or_default());

    view! {
        <section class="profile">
            <h1>"Your profile"</h1>
            <Show when=move || profile.with(Option::is_some) fallback=|| view! { <p>"Loading profile..."</p> }>
                <div class="profile__avatar">
                    {move || {
                        profile
                            .with(|p| p.as_ref().and_then(|p| p.avatar_url.clone()))
                            .map(|url| view! { <img src=url alt="Avatar"/> })
                    }}
                    <label class="profile__upload">
                        "Change avatar"
                        <input
                            type="file"
                            accept=avatar_accept()
                            node_ref=file_input
                            on:change=on_avatar
                            disabled=move || busy.get()
                        />
                    </label>
                </div>
                <form class="profile__form" on:submit=on_save>
                    <label>
                        "Username"
                        <input
                            type="text"
                            prop:value=field(|p| p.username.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                profile.update(|p| {
                                    if let Some(p) = p {
                                        p.username = value;
                                    }
                                });
                            }
                        />
                    </label>
                    <label>
                        "Full name"
                        <input
                            type="text"
                            prop:value=field(|p| p.full_name.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = Some(event_target_value(&ev));
                                profile.update(|p| {
                                    if let Some(p) = p {
                                        p.full_name = value;
                                    }
                                });
                            }
                        />
                    </label>
                    <label>
                        "Bio"
                        <textarea
                            rows="4"
                            prop:value=field(|p| p.bio.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = Some(event_target_value(&ev));
                                profile.update(|p| {
                                    if let Some(p) = p {
                                        p.bio = value;
                                    }
                                });
                            }
                        ></textarea>
                    </label>
                    <button type="submit" disabled=move || busy.get()>"Save profile"</button>
                </form>
            </Show>
            <Show when=move || !info.get().is_empty()>
                <p class="profile__message">{move || info.get()}</p>
            </Show>
        </section>
    }
}
