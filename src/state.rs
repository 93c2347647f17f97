//! Shared application state: rate limiter, quotas, mailer, metrics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::mailer::Mailer;
use crate::metrics::{Form, Metrics};
use crate::rate_limit::{Quota, RateLimiter};

/// Per-form admission quotas, built once at startup.
///
/// [`Quota::new`] panics on a zeroed limit or window, so a misconfigured
/// endpoint fails at boot rather than running unthrottled.
#[derive(Debug, Clone, Copy)]
pub struct Quotas {
    pub contact: Quota,
    pub careers: Quota,
}

impl Quotas {
    pub fn from_config(config: &Config) -> Self {
        Self {
            contact: Quota::new(
                config.contact_limit,
                Duration::from_secs(config.contact_window),
            ),
            careers: Quota::new(
                config.careers_limit,
                Duration::from_secs(config.careers_window),
            ),
        }
    }

    pub fn get(&self, form: Form) -> Quota {
        match form {
            Form::Contact => self.contact,
            Form::Careers => self.careers,
        }
    }
}

/// Shared application state, cloneable across handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    rate_limiter: RateLimiter,
    quotas: Quotas,
    mailer: Mailer,
    metrics: Metrics,
    cors_origins: Vec<String>,
    start_time: Instant,
}

impl AppState {
    /// Creates application state from config.
    pub fn new(config: &Config) -> Self {
        let mailer = Mailer::new(
            config.mail_endpoint.clone(),
            config.mail_token.clone(),
            config.mail_from.clone(),
            config.mail_to.clone(),
        );
        Self::build(
            RateLimiter::new(),
            Quotas::from_config(config),
            mailer,
            config.cors_origins.clone(),
        )
    }

    /// Creates state with a log-only mailer and no CORS (tests).
    pub fn new_in_memory(quotas: Quotas) -> Self {
        Self::build(RateLimiter::new(), quotas, Mailer::disabled(), vec![])
    }

    /// Creates in-memory state around a caller-supplied limiter, e.g. one
    /// with a manual clock (tests).
    pub fn new_in_memory_with_limiter(quotas: Quotas, rate_limiter: RateLimiter) -> Self {
        Self::build(rate_limiter, quotas, Mailer::disabled(), vec![])
    }

    fn build(
        rate_limiter: RateLimiter,
        quotas: Quotas,
        mailer: Mailer,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                rate_limiter,
                quotas,
                mailer,
                metrics: Metrics::new(),
                cors_origins,
                start_time: Instant::now(),
            }),
        }
    }

    /// Returns a reference to the rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.rate_limiter
    }

    /// Returns the per-form quotas.
    pub fn quotas(&self) -> Quotas {
        self.inner.quotas
    }

    /// Returns a reference to the mailer.
    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    /// Returns a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Returns the configured CORS allowed origins.
    pub fn cors_origins(&self) -> &[String] {
        &self.inner.cors_origins
    }

    /// Returns the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }
}
