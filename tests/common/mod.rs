#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::Layer;

use linkguard::application::services::auth_service::hash_token;
use linkguard::domain::click_event::ClickEvent;
use linkguard::domain::entities::{
    Click, Creator, Link, LinkWithCreator, NewClick, NewLink, Role, SessionUser,
};
use linkguard::domain::repositories::{
    ApiToken, ClickRepository, LinkRepository, TokenRepository,
};
use linkguard::error::AppError;
use linkguard::infrastructure::cache::NullCache;
use linkguard::routes::router;
use linkguard::state::{AppState, Repositories, Settings};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const PEER: &str = "127.0.0.1:12345";

// ─── In-memory repositories ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    users: Mutex<HashMap<i64, (String, String)>>,
}

impl MemoryLinkRepository {
    /// Registers a profile shown in the admin listing.
    pub fn add_user(&self, id: i64, name: &str, email: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(id, (name.to_string(), email.to_string()));
    }

    /// Inserts a link with an explicit creation time.
    pub fn insert_at(&self, slug: &str, url: &str, creator: Creator, at: DateTime<Utc>) -> Link {
        let mut links = self.links.lock().unwrap();
        let link = Link {
            id: links.len() as i64 + 1,
            slug: slug.to_string(),
            original_url: url.to_string(),
            user_id: creator.user_id(),
            creator_ip: creator.creator_ip().map(str::to_string),
            clicks: 0,
            created_at: at,
        };
        links.push(link.clone());
        link
    }

    pub fn all(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    fn newest_first<F: Fn(&Link) -> bool>(&self, filter: F) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter(l))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        links
    }
}

fn page<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        if self
            .links
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.slug == new_link.slug)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_slug_key" }),
            ));
        }

        Ok(self.insert_at(
            &new_link.slug,
            &new_link.original_url,
            new_link.creator,
            Utc::now(),
        ))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        Ok(page(
            self.newest_first(|l| l.user_id == Some(user_id)),
            offset,
            limit,
        ))
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError> {
        Ok(self.newest_first(|l| l.user_id == Some(user_id)).len() as i64)
    }

    async fn list_with_creator(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LinkWithCreator>, AppError> {
        let users = self.users.lock().unwrap().clone();

        Ok(page(self.newest_first(|_| true), offset, limit)
            .into_iter()
            .map(|link| {
                let profile = link.user_id.and_then(|id| users.get(&id).cloned());
                LinkWithCreator {
                    link,
                    user_name: profile.as_ref().map(|(name, _)| name.clone()),
                    user_email: profile.map(|(_, email)| email),
                }
            })
            .collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.len() as i64)
    }

    async fn count_by_user_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        Ok(self
            .newest_first(|l| l.user_id == Some(user_id) && l.created_at >= since)
            .len() as i64)
    }

    async fn count_anonymous_by_ip_since(
        &self,
        ip: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        Ok(self
            .newest_first(|l| {
                l.user_id.is_none() && l.creator_ip.as_deref() == Some(ip) && l.created_at >= since
            })
            .len() as i64)
    }
}

#[derive(Default)]
pub struct MemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
}

#[async_trait]
impl ClickRepository for MemoryClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<(), AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        let id = clicks.len() as i64 + 1;
        clicks.push(Click {
            id,
            link_id: new_click.link_id,
            clicked_at: Utc::now(),
            user_agent: new_click.user_agent,
            referer: new_click.referer,
            ip: new_click.ip,
        });
        Ok(())
    }

    async fn list_for_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let mut clicks: Vec<Click> = self
            .clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        Ok(page(clicks, offset, limit))
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self
            .clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .count() as i64)
    }
}

/// Sessions keyed by token hash.
#[derive(Default)]
pub struct MemoryTokenRepository {
    sessions: Mutex<HashMap<String, SessionUser>>,
}

impl MemoryTokenRepository {
    /// Issues `raw_token` for a user, hashed the way the admin CLI does.
    pub fn issue(&self, raw_token: &str, user_id: i64, role: Role) {
        self.sessions.lock().unwrap().insert(
            hash_token(SIGNING_SECRET, raw_token),
            SessionUser { user_id, role },
        );
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_session(&self, token_hash: &str) -> Result<Option<SessionUser>, AppError> {
        Ok(self.sessions.lock().unwrap().get(token_hash).cloned())
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(
        &self,
        _user_id: i64,
        _name: &str,
        _token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        unimplemented!("not used over HTTP")
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(None)
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(None)
    }

    async fn revoke_token(&self, _id: i64) -> Result<(), AppError> {
        Ok(())
    }
}

// ─── Connect info ────────────────────────────────────────────────────────────

/// Inserts a fixed socket peer, as `into_make_service_with_connect_info` would.
#[derive(Clone, Copy)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

// ─── App builder ─────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<MemoryLinkRepository>,
    pub clicks: Arc<MemoryClickRepository>,
    pub tokens: Arc<MemoryTokenRepository>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

pub fn test_settings() -> Settings {
    Settings {
        base_url: "https://lg.example".to_string(),
        token_signing_secret: SIGNING_SECRET.to_string(),
        ..Settings::default()
    }
}

/// Full router with the default peer address and settings.
pub fn spawn_app() -> TestApp {
    spawn_app_with(test_settings(), PEER)
}

pub fn spawn_app_with(settings: Settings, peer: &str) -> TestApp {
    let links = Arc::new(MemoryLinkRepository::default());
    let clicks = Arc::new(MemoryClickRepository::default());
    let tokens = Arc::new(MemoryTokenRepository::default());
    let (tx, rx) = mpsc::channel(100);

    let repositories = Repositories {
        links: links.clone(),
        clicks: clicks.clone(),
        tokens: tokens.clone(),
    };
    let state = AppState::new(repositories, settings, Arc::new(NullCache::new()), tx);

    let app = router(state).layer(MockConnectInfoLayer(peer.parse().unwrap()));
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        links,
        clicks,
        tokens,
        click_rx: rx,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
