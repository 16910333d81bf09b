//! Middleware de Rate Limiting
//!
//! Ventana fija por IP para los endpoints de sign-in y sign-up.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Estructura para almacenar información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_proxy: bool,
}

impl RateLimitState {
    /// Crear nuevo estado de rate limiting
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            trust_proxy: config.trust_proxy,
            ..Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window))
        }
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_proxy: false,
        }
    }

    /// Clave del cliente: la IP del socket, o la que agregó el proxy si se confía en él
    pub fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy {
            // El proxy agrega la IP que ve al final de la lista
            let forwarded = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.rsplit(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());
            if let Some(ip) = forwarded {
                return ip.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = state.rate_limit.client_key(&request);

    state.rate_limit.check_rate_limit(&ip).await?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_ip() {
        let limiter = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            limiter.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));

        // Otra IP tiene su propia ventana
        assert!(limiter.check_rate_limit("10.0.0.2").await.is_ok());
    }

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/auth/sign-in");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_header_ignored_without_trusted_proxy() {
        let limiter = RateLimitState::with_limits(2, Duration::from_secs(60));
        let request = request_from("203.0.113.7:5000", Some("10.9.9.9"));
        assert_eq!(limiter.client_key(&request), "203.0.113.7");
    }

    #[test]
    fn test_trusted_proxy_uses_last_forwarded_hop() {
        let config = EnvironmentConfig {
            trust_proxy: true,
            ..EnvironmentConfig::default()
        };
        let limiter = RateLimitState::new(&config);

        let request = request_from("10.0.0.1:443", Some("1.1.1.1, 198.51.100.4"));
        assert_eq!(limiter.client_key(&request), "198.51.100.4");

        let request = request_from("10.0.0.1:443", None);
        assert_eq!(limiter.client_key(&request), "10.0.0.1");
    }

    #[test]
    fn test_missing_connect_info_is_unknown() {
        let limiter = RateLimitState::with_limits(2, Duration::from_secs(60));
        let request = axum::http::Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(limiter.client_key(&request), "unknown");
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimitState::with_limits(1, Duration::from_millis(0));
        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(limiter.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
