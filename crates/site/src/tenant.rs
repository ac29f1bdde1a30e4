//! Tenant resolution from the request host.
//!
//! `{username}.{base_domain}` serves that tenant's site, the base domain
//! itself serves the platform landing pages, and any other host is treated
//! as a candidate custom domain. A `/u/{username}` path prefix exists as a
//! development fallback for environments without wildcard DNS.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::RepositoryError;
use crate::db::tenants::{TenantRepository, TenantSite};
use crate::error::AppError;
use crate::state::AppState;

/// What a request host refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The platform's own landing pages.
    Apex,
    /// A tenant subdomain label under the base domain.
    Subdomain(String),
    /// Some other host; resolved as a custom domain.
    External(String),
}

/// Classify a request host against the configured base domain.
///
/// Ports are stripped and comparison is case-insensitive. `www.` on the
/// base domain is treated as the apex.
#[must_use]
pub fn classify_host(host: &str, base_domain: &str) -> HostClass {
    let host = host
        .rsplit_once(':')
        .map_or(host, |(h, port)| {
            // Keep IPv6 literals intact; only strip numeric ports
            if port.chars().all(|c| c.is_ascii_digit()) {
                h
            } else {
                host
            }
        })
        .trim_end_matches('.')
        .to_ascii_lowercase();

    if host == base_domain || host == format!("www.{base_domain}") {
        return HostClass::Apex;
    }

    if let Some(label) = host.strip_suffix(&format!(".{base_domain}")) {
        // Nested labels (a.b.example.com) are not tenant subdomains
        if !label.is_empty() && !label.contains('.') {
            return HostClass::Subdomain(label.to_owned());
        }
    }

    HostClass::External(host)
}

/// Resolve a host to a tenant through the state's cache.
///
/// Returns `Ok(None)` for the apex host and for hosts no tenant claims.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup query fails.
pub async fn resolve_host(
    state: &AppState,
    host: &str,
) -> Result<Option<Arc<TenantSite>>, AppError> {
    let class = classify_host(host, &state.config().base_domain);
    let (cache_key, class) = match class {
        HostClass::Apex => return Ok(None),
        HostClass::Subdomain(label) => (format!("sub:{label}"), HostClass::Subdomain(label)),
        HostClass::External(host) => (format!("ext:{host}"), HostClass::External(host)),
    };

    let state_for_load = state.clone();
    let resolved = state
        .tenants()
        .try_get_with(cache_key, async move {
            let pool = state_for_load.pool();
            let repo = TenantRepository::new(pool);
            let site = match &class {
                HostClass::Subdomain(label) => repo.get_by_username(label).await?,
                HostClass::External(host) => repo.get_by_custom_domain(host).await?,
                HostClass::Apex => None,
            };
            Ok::<_, RepositoryError>(site.map(Arc::new))
        })
        .await
        .map_err(|e: Arc<RepositoryError>| AppError::Internal(e.to_string()))?;

    Ok(resolved)
}

/// Resolve a tenant by username (the `/u/{username}` development fallback).
///
/// # Errors
///
/// Returns `AppError::UnknownSite` if no such tenant exists, or
/// `AppError::Database` if the query fails.
pub async fn resolve_username(state: &AppState, username: &str) -> Result<Arc<TenantSite>, AppError> {
    let repo = TenantRepository::new(state.pool());
    let site = repo
        .get_by_username(&username.to_ascii_lowercase())
        .await?
        .ok_or_else(|| AppError::UnknownSite(username.to_owned()))?;
    Ok(Arc::new(site))
}

/// Extractor for the request host (the `Host` header).
pub struct SiteHost(pub String);

impl<S> FromRequestParts<S> for SiteHost
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.host().map(str::to_owned))
            .ok_or_else(|| AppError::BadRequest("missing Host header".to_owned()))?;
        Ok(Self(host))
    }
}

/// Extractor that requires the request host to resolve to a tenant.
///
/// Apex and unclaimed hosts are rejected with 404.
pub struct Tenant(pub Arc<TenantSite>);

impl FromRequestParts<AppState> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SiteHost(host) = SiteHost::from_request_parts(parts, state).await?;
        let site = resolve_host(state, &host)
            .await?
            .ok_or(AppError::UnknownSite(host))?;
        Ok(Self(site))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_apex() {
        assert_eq!(classify_host("minispace.dev", "minispace.dev"), HostClass::Apex);
        assert_eq!(
            classify_host("www.minispace.dev", "minispace.dev"),
            HostClass::Apex
        );
        assert_eq!(
            classify_host("MiniSpace.Dev:3000", "minispace.dev"),
            HostClass::Apex
        );
    }

    #[test]
    fn test_classify_subdomain() {
        assert_eq!(
            classify_host("ada.minispace.dev", "minispace.dev"),
            HostClass::Subdomain("ada".to_owned())
        );
        assert_eq!(
            classify_host("ada.localhost:3000", "localhost"),
            HostClass::Subdomain("ada".to_owned())
        );
    }

    #[test]
    fn test_classify_nested_label_is_external() {
        assert_eq!(
            classify_host("a.b.minispace.dev", "minispace.dev"),
            HostClass::External("a.b.minispace.dev".to_owned())
        );
    }

    #[test]
    fn test_classify_custom_domain() {
        assert_eq!(
            classify_host("ada-lovelace.com", "minispace.dev"),
            HostClass::External("ada-lovelace.com".to_owned())
        );
    }

    #[test]
    fn test_classify_strips_trailing_dot() {
        assert_eq!(
            classify_host("ada.minispace.dev.", "minispace.dev"),
            HostClass::Subdomain("ada".to_owned())
        );
    }
}
