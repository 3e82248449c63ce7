//! Request attribution for audit entries.
//!
//! The actor comes from the `x-actor-id`, `x-actor-name` and `x-actor-role`
//! headers. The source address is the first hop of `x-forwarded-for`, or the
//! peer address when the header is absent.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use portal_audit::entry::truncate_chars;
use portal_audit::{Actor, AuditContext};
use std::convert::Infallible;
use std::net::SocketAddr;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Longest stored source address (an IPv6 address with an embedded IPv4 tail).
pub const SOURCE_ADDRESS_MAX_LEN: usize = 45;

/// Extractor yielding the [`AuditContext`] of the current request.
#[derive(Debug, Clone)]
pub struct RequestContext(pub AuditContext);

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self(audit_context(&parts.headers, peer)))
    }
}

/// Build the audit context from request headers and the peer address.
pub fn audit_context(headers: &HeaderMap, peer: Option<SocketAddr>) -> AuditContext {
    let mut context = AuditContext::new();

    if let Some(id) = header(headers, ACTOR_ID_HEADER) {
        let mut actor = Actor::new(id);
        if let Some(name) = header(headers, ACTOR_NAME_HEADER) {
            actor = actor.with_name(name);
        }
        if let Some(role) = header(headers, ACTOR_ROLE_HEADER) {
            actor = actor.with_role(role);
        }
        context = context.with_actor(actor);
    }

    let forwarded = header(headers, FORWARDED_FOR_HEADER)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string);

    if let Some(source) = forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())) {
        context = context.with_source_address(truncate_chars(source, SOURCE_ADDRESS_MAX_LEN));
    }

    context
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
