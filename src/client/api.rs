//! REST API Client
//!
//! Typed wrappers over the REST routes the UI uses most. The session is
//! injected at construction; authenticated calls fail with
//! `ClientError::NotAuthenticated` before touching the network when it has no
//! token.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::session::Session;
use crate::shared::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::shared::social::{
    validate_avatar, AvatarResponse, FollowStatus, LikeStatus, OnlineUsersResponse,
    UpdateProfileRequest, UserProfile,
};

/// Error body returned by the server
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    config: ClientConfig,
    http: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Session) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            config,
            http,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Swap in a new session, e.g. after login or logout
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Create an account; the returned session is also installed on `self`
    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let request = SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .execute(self.http.post(self.config.api_url("/api/auth/signup")).json(&request))
            .await?;
        Ok(self.install(auth))
    }

    /// Log in by username or email; the returned session is also installed
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .execute(self.http.post(self.config.api_url("/api/auth/login")).json(&request))
            .await?;
        Ok(self.install(auth))
    }

    pub async fn follow(&self, user_id: Uuid) -> Result<FollowStatus, ClientError> {
        let url = self.config.api_url(&format!("/api/follow/{}", user_id));
        self.execute(self.authed(self.http.post(url))?).await
    }

    pub async fn unfollow(&self, user_id: Uuid) -> Result<FollowStatus, ClientError> {
        let url = self.config.api_url(&format!("/api/follow/{}", user_id));
        self.execute(self.authed(self.http.delete(url))?).await
    }

    pub async fn follow_status(&self, user_id: Uuid) -> Result<FollowStatus, ClientError> {
        let url = self.config.api_url(&format!("/api/follow/{}/status", user_id));
        self.execute(self.authed(self.http.get(url))?).await
    }

    pub async fn like_poem(&self, poem_id: Uuid) -> Result<LikeStatus, ClientError> {
        let url = self.config.api_url(&format!("/api/poems/{}/like", poem_id));
        self.execute(self.authed(self.http.post(url))?).await
    }

    pub async fn unlike_poem(&self, poem_id: Uuid) -> Result<LikeStatus, ClientError> {
        let url = self.config.api_url(&format!("/api/poems/{}/like", poem_id));
        self.execute(self.authed(self.http.delete(url))?).await
    }

    /// Update the signed-in user's display name and/or bio
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<UserProfile, ClientError> {
        update.validate()?;
        let user_id = self.current_user_id()?;
        let url = self.config.api_url(&format!("/api/users/{}", user_id));
        self.execute(self.authed(self.http.put(url))?.json(update)).await
    }

    /// Upload a new avatar for the signed-in user.
    ///
    /// Size and MIME type are checked locally before anything is sent.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        mime: &str,
        data: Vec<u8>,
    ) -> Result<AvatarResponse, ClientError> {
        validate_avatar(mime, data.len())?;
        let user_id = self.current_user_id()?;
        let url = self.config.api_url(&format!("/api/users/{}/avatar", user_id));

        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("avatar", part);
        self.execute(self.authed(self.http.post(url))?.multipart(form)).await
    }

    /// REST view of the presence set
    pub async fn online_users(&self) -> Result<OnlineUsersResponse, ClientError> {
        self.execute(self.http.get(self.config.api_url("/api/online-users")))
            .await
    }

    fn install(&mut self, auth: AuthResponse) -> Session {
        self.session = Session::from(auth);
        self.session.clone()
    }

    fn current_user_id(&self) -> Result<Uuid, ClientError> {
        self.session
            .user()
            .map(|user| user.id)
            .ok_or(ClientError::NotAuthenticated)
    }

    fn authed(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        tracing::debug!("[Api] Request failed with {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
