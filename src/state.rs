//! Shared application state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AuthService, ClickService, LinkService, RateLimitPolicy, RateLimitService,
};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;
use crate::utils::client_ip::ClientIpPolicy;
use crate::utils::slug::DEFAULT_SLUG_LENGTH;

/// Repository handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

/// Request-path settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token_signing_secret: String,
    pub slug_length: usize,
    pub cache_ttl_seconds: u64,
    pub rate_limit: RateLimitPolicy,
    pub client_ip: ClientIpPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            token_signing_secret: String::new(),
            slug_length: DEFAULT_SLUG_LENGTH,
            cache_ttl_seconds: 3600,
            rate_limit: RateLimitPolicy::default(),
            client_ip: ClientIpPolicy::default(),
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            slug_length: config.slug_length,
            cache_ttl_seconds: config.cache_ttl_seconds,
            rate_limit: config.rate_limit_policy(),
            client_ip: config.client_ip_policy(),
        }
    }
}

/// Services and channels shared across requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub rate_limit_service: Arc<RateLimitService<dyn LinkRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub click_service: Arc<ClickService<dyn LinkRepository, dyn ClickRepository>>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub client_ip_policy: ClientIpPolicy,
    pub base_url: Arc<str>,
    pub cache_ttl_seconds: u64,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        settings: Settings,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        let Repositories {
            links,
            clicks,
            tokens,
        } = repositories;

        Self {
            link_service: Arc::new(LinkService::with_slug_length(
                links.clone(),
                settings.slug_length,
            )),
            rate_limit_service: Arc::new(RateLimitService::new(
                links.clone(),
                settings.rate_limit,
            )),
            auth_service: Arc::new(AuthService::new(tokens, settings.token_signing_secret)),
            click_service: Arc::new(ClickService::new(links, clicks)),
            cache,
            click_sender,
            client_ip_policy: settings.client_ip,
            base_url: Arc::from(settings.base_url.trim_end_matches('/')),
            cache_ttl_seconds: settings.cache_ttl_seconds,
        }
    }
}
