//! Profile, post, like and avatar storage over PostgREST and the object
//! storage API.
//!
//! Requests carry the signed-in user's access token when there is one and
//! fall back to the anonymous key otherwise; row-level security on the
//! backend decides what each caller may touch.

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{SupabaseAuth, authorize, send_checked};
use crate::config::SupabaseConfig;
use crate::error::ProviderError;
use crate::feed::{Post, PostRepository};
use crate::profiles::{AvatarStore, NewProfile, Profile, ProfileRepository};

const AVATAR_BUCKET: &str = "avatars";
const PROFILE_COLUMNS: &str = "id,username,full_name,avatar_url,bio";
const MINIMAL: &str = "return=minimal";
const POST_COLUMNS: &str = "id,content,created_at,user_id,profiles(username,avatar_url),likes(id,user_id)";

pub struct SupabaseRest {
    http: Client,
    base_url: String,
    anon_key: String,
    auth: Rc<SupabaseAuth>,
}

#[derive(Debug, Serialize)]
struct ProfileUpsert<'a> {
    #[serde(flatten)]
    profile: &'a Profile,
    updated_at: String,
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

impl SupabaseRest {
    #[must_use]
    pub fn new(config: &SupabaseConfig, auth: Rc<SupabaseAuth>) -> Self {
        Self { http: Client::new(), base_url: config.url.clone(), anon_key: config.anon_key.clone(), auth }
    }

    /// User token, refreshed first when it is about to expire. Falls back to
    /// the anonymous key when nobody is signed in.
    async fn bearer(&self) -> Result<String, ProviderError> {
        Ok(self.auth.fresh_access_token().await?.unwrap_or_else(|| self.anon_key.clone()))
    }

    async fn table(&self, method: reqwest::Method, table: &str) -> Result<RequestBuilder, ProviderError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        Ok(authorize(self.http.request(method, url), &self.anon_key, &self.bearer().await?))
    }

    async fn object(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, ProviderError> {
        let url = format!("{}/storage/v1/object/{AVATAR_BUCKET}/{path}", self.base_url);
        Ok(authorize(self.http.request(method, url), &self.anon_key, &self.bearer().await?))
    }

    async fn write(&self, request: RequestBuilder, prefer: &str) -> Result<(), ProviderError> {
        send_checked(request.header("Prefer", prefer)).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl ProfileRepository for SupabaseRest {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, ProviderError> {
        let id = eq(user_id);
        let request = self
            .table(reqwest::Method::GET, "profiles").await?
            .query(&[("select", PROFILE_COLUMNS), ("id", id.as_str()), ("limit", "1")]);
        let rows: Vec<Profile> = send_checked(request).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, ProviderError> {
        let name = eq(username);
        let request = self
            .table(reqwest::Method::GET, "profiles").await?
            .query(&[("select", "username"), ("username", name.as_str()), ("limit", "1")]);
        let rows: Vec<serde_json::Value> = send_checked(request).await?.json().await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, profile: &NewProfile) -> Result<(), ProviderError> {
        self.write(self.table(reqwest::Method::POST, "profiles").await?.json(&[profile]), MINIMAL).await
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), ProviderError> {
        let updated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let body = ProfileUpsert { profile, updated_at };
        let request = self.table(reqwest::Method::POST, "profiles").await?.json(&[body]);
        self.write(request, "resolution=merge-duplicates,return=minimal").await
    }
}

#[async_trait(?Send)]
impl PostRepository for SupabaseRest {
    async fn list(&self) -> Result<Vec<Post>, ProviderError> {
        let request = self
            .table(reqwest::Method::GET, "posts").await?
            .query(&[("select", POST_COLUMNS), ("order", "created_at.desc")]);
        Ok(send_checked(request).await?.json().await?)
    }

    async fn insert(&self, user_id: &str, content: &str) -> Result<(), ProviderError> {
        let body = json!([{ "content": content, "user_id": user_id }]);
        self.write(self.table(reqwest::Method::POST, "posts").await?.json(&body), MINIMAL).await
    }

    async fn update(&self, post_id: &str, user_id: &str, content: &str) -> Result<(), ProviderError> {
        let request = self
            .table(reqwest::Method::PATCH, "posts").await?
            .query(&[("id", eq(post_id)), ("user_id", eq(user_id))])
            .json(&json!({ "content": content }));
        self.write(request, MINIMAL).await
    }

    async fn delete(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        let request = self
            .table(reqwest::Method::DELETE, "posts").await?
            .query(&[("id", eq(post_id)), ("user_id", eq(user_id))]);
        self.write(request, MINIMAL).await
    }

    async fn like(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        let body = json!([{ "post_id": post_id, "user_id": user_id }]);
        self.write(self.table(reqwest::Method::POST, "likes").await?.json(&body), MINIMAL).await
    }

    async fn unlike(&self, post_id: &str, user_id: &str) -> Result<(), ProviderError> {
        let request = self
            .table(reqwest::Method::DELETE, "likes").await?
            .query(&[("post_id", eq(post_id)), ("user_id", eq(user_id))]);
        self.write(request, MINIMAL).await
    }
}

#[async_trait(?Send)]
impl AvatarStore for SupabaseRest {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), ProviderError> {
        let request = self
            .object(reqwest::Method::POST, path).await?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        send_checked(request).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), ProviderError> {
        let url = format!("{}/storage/v1/object/{AVATAR_BUCKET}", self.base_url);
        let request = authorize(self.http.delete(url), &self.anon_key, &self.bearer().await?).json(&json!({ "prefixes": [path] }));
        send_checked(request).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{AVATAR_BUCKET}/{path}", self.base_url)
    }
}
