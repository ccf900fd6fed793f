pub mod items;
pub mod plugins;
pub mod system;

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use userdata_core::QueryParams;

/// Raw query string of the request as a case-insensitive multimap.
///
/// Used instead of `Query<T>` because clients repeat keys such as
/// `includeItemTypes`, and parameter names arrive in any letter case.
#[derive(Debug, Clone, Default)]
pub struct HostQuery(pub QueryParams);

impl<S> FromRequestParts<S> for HostQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(QueryParams::from_optional(parts.uri.query())))
    }
}
