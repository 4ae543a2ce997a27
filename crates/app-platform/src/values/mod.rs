//! Assembles the values handed to Helm from the catalog, app and user level sources.
//!
//! Each level may reference a ConfigMap and a Secret. Both kinds are merged separately with the
//! precedence catalog < app < user, then the Secret values are merged over the ConfigMap values.
use std::sync::Arc;

use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::ResourceExt;
use snafu::OptionExt;
use tracing::instrument;

use crate::{
    crd::{App, Catalog, ResourceReference},
    error::{NotFoundSnafu, ParsingFailedSnafu, Result},
    store::ClusterObjectStore,
};

mod extract;
mod merge;

pub use extract::{ExtractError, RawValues, SourceKind, SourceLevel, ValueSource, extract};
pub use merge::{merge_into, merge_layers};

/// A generic, arbitrarily nested values document.
pub type ValueTree = serde_json::Map<String, serde_json::Value>;

/// Resolves the merged values of Apps.
#[derive(Clone, Debug)]
pub struct Values {
    store: Arc<dyn ClusterObjectStore>,
}

impl Values {
    pub fn new(store: Arc<dyn ClusterObjectStore>) -> Self {
        Self { store }
    }

    /// Returns the values of `app`, installed from `catalog`.
    ///
    /// An App without any configured source resolves to an empty tree.
    #[instrument(skip_all, fields(app = %app.name_any(), catalog = %catalog.name_any()))]
    pub async fn resolve_values(&self, app: &App, catalog: &Catalog) -> Result<ValueTree> {
        let config_map_values = self.merge_config_map_data(app, catalog).await?;
        let secret_values = self.merge_secret_data(app, catalog).await?;

        Ok(merge_layers([config_map_values, secret_values]))
    }

    /// Merges the ConfigMap values of all levels.
    pub async fn merge_config_map_data(&self, app: &App, catalog: &Catalog) -> Result<ValueTree> {
        self.merge_sources(SourceKind::ConfigMap, [
            (SourceLevel::Catalog, catalog.config_map()),
            (SourceLevel::App, app.app_config_map()),
            (SourceLevel::User, app.user_config_map()),
        ])
        .await
    }

    /// Merges the Secret values of all levels.
    pub async fn merge_secret_data(&self, app: &App, catalog: &Catalog) -> Result<ValueTree> {
        self.merge_sources(SourceKind::Secret, [
            (SourceLevel::Catalog, catalog.secret()),
            (SourceLevel::App, app.app_secret()),
            (SourceLevel::User, app.user_secret()),
        ])
        .await
    }

    /// Fetches and merges the given sources in order. Unconfigured sources are skipped.
    async fn merge_sources(
        &self,
        kind: SourceKind,
        sources: [(SourceLevel, Option<&ResourceReference>); 3],
    ) -> Result<ValueTree> {
        let mut layers = Vec::with_capacity(sources.len());

        for (level, reference) in sources {
            let Some(reference) = reference else {
                continue;
            };

            let data = self.fetch(kind, reference).await?;
            let values = extract(ValueSource { level, kind }, Some(&data)).map_err(|error| {
                ParsingFailedSnafu {
                    message: error.to_string(),
                }
                .build()
            })?;

            layers.push(values);
        }

        Ok(merge_layers(layers))
    }

    async fn fetch(&self, kind: SourceKind, reference: &ResourceReference) -> Result<RawValues> {
        let ResourceReference { name, namespace } = reference;
        tracing::debug!(%kind, %name, %namespace, "looking up values");

        let data = match kind {
            SourceKind::ConfigMap => self
                .store
                .get_config_map(namespace, name)
                .await?
                .map(config_map_data),
            SourceKind::Secret => self
                .store
                .get_secret(namespace, name)
                .await?
                .map(secret_data),
        };

        let data = data.with_context(|| NotFoundSnafu {
            message: format!("{kind} {name:?} in namespace {namespace:?} not found"),
        })?;

        tracing::debug!(%kind, %name, %namespace, keys = data.len(), "found values");
        Ok(data)
    }
}

fn config_map_data(config_map: ConfigMap) -> RawValues {
    config_map
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.into_bytes()))
        .collect()
}

fn secret_data(secret: Secret) -> RawValues {
    secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.0))
        .collect()
}
