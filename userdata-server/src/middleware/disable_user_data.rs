//! Tower middleware applying the Disable UserData plugin to item routes.
//!
//! For every request the layer:
//! - takes a snapshot of the plugin configuration
//! - classifies the path and query string
//! - on suppression, rewrites the query so it carries exactly one
//!   `enableUserData=false` and tags the request with [`UserDataSuppressed`]
//!
//! Classification never fails, so the inner service is always called.

use axum::{
    body::Body,
    extract::Request,
    http::{Uri, uri::PathAndQuery},
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};
use userdata_core::{
    Decision, QueryParams, RequestDescriptor, SuppressionClassifier,
    SuppressionRule,
};

use crate::infra::{app_state::AppState, settings_store::PluginSettingsStore};

/// Query parameter the host's item handlers read.
pub const ENABLE_USER_DATA: &str = "enableUserData";

/// Request extension set when the layer suppressed UserData.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDataSuppressed {
    pub rule: SuppressionRule,
}

/// Layer for the Disable UserData middleware
#[derive(Clone, Debug)]
pub struct DisableUserDataLayer {
    classifier: Arc<SuppressionClassifier>,
    settings: Arc<PluginSettingsStore>,
}

impl DisableUserDataLayer {
    pub fn new(
        classifier: Arc<SuppressionClassifier>,
        settings: Arc<PluginSettingsStore>,
    ) -> Self {
        Self {
            classifier,
            settings,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.classifier.clone(), state.settings.clone())
    }
}

impl<S> Layer<S> for DisableUserDataLayer {
    type Service = DisableUserDataMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        debug!("installing disable userdata middleware layer");
        DisableUserDataMiddleware {
            inner,
            classifier: self.classifier.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// Disable UserData middleware
#[derive(Clone, Debug)]
pub struct DisableUserDataMiddleware<S> {
    inner: S,
    classifier: Arc<SuppressionClassifier>,
    settings: Arc<PluginSettingsStore>,
}

impl<S> Service<Request<Body>> for DisableUserDataMiddleware<S>
where
    S: Service<Request<Body>> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<
        Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // The clone may not be ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let config = self.settings.disable_user_data();
        let classifier = self.classifier.clone();

        Box::pin(async move {
            if config.is_active() {
                let path = req.uri().path().to_owned();
                let query = QueryParams::from_optional(req.uri().query());

                let decision = classifier
                    .classify(&config, &RequestDescriptor::new(&path, &query))
                    .await;

                if let Decision::Suppress(rule) = decision {
                    match force_user_data_off(req.uri(), query) {
                        Ok(uri) => *req.uri_mut() = uri,
                        Err(err) => {
                            warn!(%path, error = %err, "failed to rewrite request query")
                        }
                    }
                    req.extensions_mut().insert(UserDataSuppressed { rule });
                }
            }

            inner.call(req).await
        })
    }
}

/// Rebuilds `uri` with `query` plus a single `enableUserData=false`.
///
/// Any client supplied `enableUserData`, in any letter case, is dropped.
pub fn force_user_data_off(
    uri: &Uri,
    mut query: QueryParams,
) -> Result<Uri, axum::http::Error> {
    query.set(ENABLE_USER_DATA, "false");

    let path_and_query = PathAndQuery::try_from(format!(
        "{}?{}",
        uri.path(),
        query.to_query_string()
    ))?;

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Response, StatusCode};
    use std::convert::Infallible;
    use tower::{ServiceBuilder, ServiceExt, service_fn};
    use userdata_core::{
        DisableUserDataConfig, InMemoryCatalog, PluginSettings,
    };
    use userdata_model::{CatalogItem, ItemKind};

    /// Echoes the URI the handler saw and whether the extension was set.
    async fn echo(req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let rule = req
            .extensions()
            .get::<UserDataSuppressed>()
            .map(|tag| tag.rule.to_string())
            .unwrap_or_default();
        Ok(Response::builder()
            .status(StatusCode::OK)
            .header("x-suppressed-rule", rule)
            .body(Body::from(req.uri().to_string()))
            .expect("response"))
    }

    fn layer_with(
        config: DisableUserDataConfig,
        catalog: InMemoryCatalog,
    ) -> DisableUserDataLayer {
        let settings = PluginSettings {
            disable_user_data: config,
            ..PluginSettings::default()
        };
        DisableUserDataLayer::new(
            Arc::new(SuppressionClassifier::new(Arc::new(catalog))),
            Arc::new(PluginSettingsStore::in_memory(settings)),
        )
    }

    async fn run(
        layer: DisableUserDataLayer,
        uri: &str,
    ) -> (String, String) {
        let service =
            ServiceBuilder::new().layer(layer).service(service_fn(echo));
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = service.oneshot(request).await.expect("infallible");

        let rule = response
            .headers()
            .get("x-suppressed-rule")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (String::from_utf8(bytes.to_vec()).expect("utf8"), rule)
    }

    #[test]
    fn rewrite_keeps_other_parameters() {
        let uri: Uri = "/Items?ParentId=abc&EnableUserData=true&limit=5"
            .parse()
            .expect("uri");
        let query = QueryParams::from_optional(uri.query());
        let rewritten = force_user_data_off(&uri, query).expect("rewrite");

        let params = QueryParams::from_optional(rewritten.query());
        assert_eq!(rewritten.path(), "/Items");
        assert_eq!(
            params.get_all(ENABLE_USER_DATA).collect::<Vec<_>>(),
            ["false"]
        );
        assert_eq!(params.first("parentId"), Some("abc"));
        assert_eq!(params.first("limit"), Some("5"));
    }

    #[test]
    fn rewrite_adds_a_query_when_there_was_none() {
        let uri: Uri = "/Shows/NextUp".parse().expect("uri");
        let rewritten =
            force_user_data_off(&uri, QueryParams::new()).expect("rewrite");
        assert_eq!(rewritten.to_string(), "/Shows/NextUp?enableUserData=false");
    }

    #[tokio::test]
    async fn suppressed_request_reaches_handler_rewritten() {
        let layer = layer_with(
            DisableUserDataConfig::default()
                .with_rule(SuppressionRule::NextUp, true),
            InMemoryCatalog::new(),
        );

        let (uri, rule) =
            run(layer, "/Shows/NextUp?userId=1&enableUserData=true").await;
        let params =
            QueryParams::parse(uri.split_once('?').map_or("", |(_, q)| q));

        assert_eq!(
            params.get_all(ENABLE_USER_DATA).collect::<Vec<_>>(),
            ["false"]
        );
        assert_eq!(params.first("userId"), Some("1"));
        assert_eq!(rule, "next_up");
    }

    #[tokio::test]
    async fn passthrough_leaves_request_untouched() {
        let layer = layer_with(
            DisableUserDataConfig::default()
                .with_rule(SuppressionRule::NextUp, true),
            InMemoryCatalog::new(),
        );

        let (uri, rule) = run(layer, "/Items/Latest?limit=3").await;
        assert_eq!(uri, "/Items/Latest?limit=3");
        assert!(rule.is_empty());
    }

    #[tokio::test]
    async fn globally_disabled_plugin_is_inert() {
        let mut config = DisableUserDataConfig::all();
        config.enabled = false;
        let layer = layer_with(config, InMemoryCatalog::new());

        let (uri, rule) =
            run(layer, "/UserItems/Resume?enableUserData=true").await;
        assert_eq!(uri, "/UserItems/Resume?enableUserData=true");
        assert!(rule.is_empty());
    }

    #[tokio::test]
    async fn collection_folder_parent_is_resolved_through_catalog() {
        let library = CatalogItem::new("Movies", ItemKind::CollectionFolder);
        let shelf = CatalogItem::new("Shelf", ItemKind::Folder);
        let config = DisableUserDataConfig::default()
            .with_rule(SuppressionRule::Collections, true);

        let catalog = || {
            let catalog = InMemoryCatalog::new();
            catalog.insert(library.clone());
            catalog.insert(shelf.clone());
            catalog
        };

        let (_, rule) = run(
            layer_with(config, catalog()),
            &format!("/Items?parentId={}", library.id),
        )
        .await;
        assert_eq!(rule, "collections");

        let (uri, rule) = run(
            layer_with(config, catalog()),
            &format!("/Items?parentId={}", shelf.id),
        )
        .await;
        assert!(rule.is_empty());
        assert!(!uri.contains(ENABLE_USER_DATA));
    }
}
