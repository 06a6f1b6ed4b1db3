use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use seolens_core::ApiSettings;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Bearer tokens accepted on protected routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    tokens: Arc<[String]>,
}

impl AuthState {
    /// Outside development an empty token list is a startup error.
    pub fn from_settings(settings: &ApiSettings, is_development: bool) -> anyhow::Result<Self> {
        if !settings.api_keys.is_empty() {
            return Ok(Self {
                tokens: settings.api_keys.clone().into(),
            });
        }
        if is_development {
            tracing::warn!("SEOLENS_API_KEYS is empty, bearer auth is off in development");
            return Ok(Self::disabled());
        }
        anyhow::bail!("SEOLENS_API_KEYS must list at least one bearer token outside development")
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            tokens: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    fn accepts(&self, presented: &str) -> bool {
        // Every token is compared so timing does not reveal which one matched.
        self.tokens.iter().fold(false, |matched, token| {
            matched | bool::from(token.as_bytes().ct_eq(presented.as_bytes()))
        })
    }
}

#[derive(Debug)]
struct Window {
    opened: Instant,
    admitted: u32,
}

/// Fixed-window request budget shared by every protected route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    budget: u32,
    length: Duration,
    window: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(budget: u32, length: Duration) -> Self {
        Self {
            budget,
            length,
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                admitted: 0,
            })),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(
            settings.rate_limit_requests,
            Duration::from_secs(settings.rate_limit_window_secs),
        )
    }

    /// Admits one request, or returns how long until the window reopens.
    async fn admit(&self) -> Result<(), Duration> {
        let mut window = self.window.lock().await;
        let age = window.opened.elapsed();
        if age >= self.length {
            *window = Window {
                opened: Instant::now(),
                admitted: 0,
            };
        } else if window.admitted >= self.budget {
            return Err(self.length - age);
        }
        window.admitted += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` or mints a `UUIDv4`, exposes it to
/// handlers as [`RequestId`], and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", value);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.is_enabled() {
        return next.run(req).await;
    }
    let authorized = bearer_token(req.headers().get(AUTHORIZATION))
        .is_some_and(|token| auth.accepts(token));
    if authorized {
        return next.run(req).await;
    }
    tracing::debug!("rejected request without a valid bearer token");
    ApiError::new(
        request_id_of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

/// Rejects with 429 and `Retry-After` once the window's budget is spent.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.admit().await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = wait.as_secs().max(1);
            tracing::warn!(retry_after, "request budget exhausted");
            let mut res =
                ApiError::new(request_id_of(&req), "rate_limited", "rate limit exceeded")
                    .into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
            res
        }
    }
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
