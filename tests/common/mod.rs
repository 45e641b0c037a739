#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use flickgram::build_app;
use flickgram::config::{AppState, Config};
use flickgram::entities::post;
use flickgram::middleware::rate_limiter::RateLimiter;
use flickgram::seeders;
use flickgram::services::scraper_service::{PhotoSource, ScrapeError, ScrapedPhoto, IMAGE_SELECTOR};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryOrder};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const PHOTO_URL: &str = "https://www.flickr.com/photos/someone/123/";
pub const BROKEN_URL: &str = "https://example.com/not-a-photo-page/";

/// Peer address attached to requests unless a test picks another client.
pub const DEFAULT_PEER: &str = "127.0.0.1:40000";

/// Serves a canned photo for Flickr photo URLs and fails for anything else.
pub struct StubSource;

#[async_trait]
impl PhotoSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<ScrapedPhoto, ScrapeError> {
        if url.starts_with("https://www.flickr.com/photos/") {
            Ok(ScrapedPhoto {
                image: "https://live.staticflickr.com/65535/123_b.jpg".to_string(),
                title: "Harbour at dusk".to_string(),
                artist: "Someone".to_string(),
            })
        } else {
            Err(ScrapeError::Missing(IMAGE_SELECTOR))
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_limit(1000).await
}

pub async fn spawn_app_with_limit(rate_limit_max: usize) -> TestApp {
    // One connection: every connection to sqlite::memory: is its own database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");

    Migrator::up(&db, None).await.expect("migrate");
    seeders::run_seeders(&db).await.expect("seed");

    let mut config = Config::with_defaults("sqlite::memory:".to_string(), "test-secret".to_string());
    config.rate_limit_max = rate_limit_max;

    let state = AppState {
        db: db.clone(),
        photo_source: Arc::new(StubSource),
        rate_limiter: Arc::new(RateLimiter::new(rate_limit_max, Duration::from_secs(60))),
        config,
    };

    TestApp { app: build_app(state), db }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        fragment: bool,
    ) -> TestResponse {
        self.request_from(DEFAULT_PEER, method, uri, token, body, fragment).await
    }

    /// Same as [`TestApp::request`], arriving from the given peer address.
    pub async fn request_from(
        &self,
        peer: &str,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        fragment: bool,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if fragment {
            builder = builder.header("HX-Request", "true");
        }
        let mut request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let peer: SocketAddr = peer.parse().expect("peer address");
        request.extensions_mut().insert(ConnectInfo(peer));

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body").to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", uri, token, None, false).await
    }

    pub async fn get_fragment(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", uri, token, None, true).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request("POST", uri, token, body, false).await
    }

    /// Signs up and logs in, returning the bearer token.
    pub async fn register(&self, username: &str) -> String {
        let res = self
            .post(
                "/accounts/signup/",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "secret-password",
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "signup {}", username);

        let res = self
            .post(
                "/accounts/login/",
                None,
                Some(json!({ "login_id": username, "password": "secret-password" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login {}", username);
        res.json()["data"]["token"].as_str().expect("token").to_string()
    }

    /// Creates a post through the API and returns its public id.
    pub async fn create_post(&self, token: &str, body: &str) -> Uuid {
        let res = self
            .post("/post/create/", Some(token), Some(json!({ "url": PHOTO_URL, "body": body })))
            .await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        self.latest_post().await.expect("post stored").public_id
    }

    pub async fn latest_post(&self) -> Option<post::Model> {
        post::Entity::find()
            .order_by_desc(post::Column::Id)
            .one(&self.db)
            .await
            .expect("query posts")
    }

    /// Adds a comment and returns its public id.
    pub async fn comment(&self, token: &str, post_id: Uuid, body: &str) -> String {
        let res = self
            .post(&format!("/commentsent/{}/", post_id), Some(token), Some(json!({ "body": body })))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        res.json()["data"]["comment"]["id"].as_str().expect("comment id").to_string()
    }

    /// Adds a reply and returns its public id.
    pub async fn reply(&self, token: &str, comment_id: &str, body: &str) -> String {
        let res = self
            .post(&format!("/reply-sent/{}/", comment_id), Some(token), Some(json!({ "body": body })))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        res.json()["data"]["reply"]["id"].as_str().expect("reply id").to_string()
    }
}
