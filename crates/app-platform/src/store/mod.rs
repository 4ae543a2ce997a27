//! Read access to the cluster objects the engines depend on.
//!
//! A lookup that finds nothing returns `Ok(None)`. Errors are reserved for failed requests.
use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use snafu::Snafu;

use crate::{
    constants::CATALOG_FALLBACK_NAMESPACES,
    crd::{App, AppCatalogEntry, Catalog},
};

mod kube_store;
mod memory;

pub use kube_store::KubeStore;
pub use memory::InMemoryStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to get {kind} {name:?} in namespace {namespace:?}"))]
    GetObject {
        source: kube::Error,
        kind: String,
        name: String,
        namespace: String,
    },

    #[snafu(display("failed to list {kind} in namespace {namespace:?}"))]
    ListObjects {
        source: kube::Error,
        kind: String,
        namespace: String,
    },

    #[snafu(display("failed to parse manifests"))]
    ParseManifests { source: crate::yaml::Error },

    #[snafu(display("failed to parse manifest of kind {kind:?}"))]
    ParseManifest {
        source: serde_yaml::Error,
        kind: String,
    },

    #[snafu(display("manifest #{index} has no kind"))]
    MissingKind { index: usize },

    #[snafu(display("manifest of kind {kind:?} is not supported"))]
    UnsupportedKind { kind: String },

    #[snafu(display("{kind} manifest has no name"))]
    MissingName { kind: String },
}

/// Lookups of the objects referenced by Apps, keyed by namespace and name.
///
/// Implementations hold no per-call state, so a single store can serve concurrent calls. The
/// store is object safe and is passed to the engines as an `Arc<dyn ClusterObjectStore>`.
//
// We still need to use the async-trait crate, as native async functions in traits do not
// support dynamic dispatch.
#[async_trait]
pub trait ClusterObjectStore: Debug + Send + Sync {
    async fn get_catalog(&self, namespace: &str, name: &str) -> Result<Option<Catalog>>;

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<Option<ConfigMap>>;

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    /// Lists the Apps in `namespace`, except the one named `exclude_name`.
    async fn list_sibling_apps(&self, namespace: &str, exclude_name: &str) -> Result<Vec<App>>;

    async fn get_catalog_entry(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<AppCatalogEntry>>;
}

/// Looks up the Catalog `app` is installed from.
///
/// The namespace named by the App is searched, or if there is none, each of
/// [`CATALOG_FALLBACK_NAMESPACES`] in order. Returns [`None`] if the App names no catalog.
pub async fn find_catalog(store: &dyn ClusterObjectStore, app: &App) -> Result<Option<Catalog>> {
    let catalog_name = app.catalog_name();
    if catalog_name.is_empty() {
        return Ok(None);
    }

    let namespaces = match app.catalog_namespace() {
        Some(namespace) => vec![namespace],
        None => CATALOG_FALLBACK_NAMESPACES.to_vec(),
    };

    for namespace in namespaces {
        if let Some(catalog) = store.get_catalog(namespace, catalog_name).await? {
            tracing::debug!(catalog = catalog_name, namespace, "found catalog");
            return Ok(Some(catalog));
        }
    }

    Ok(None)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Fails every lookup with a store error and counts the lookups made.
    #[derive(Debug, Default)]
    pub(crate) struct FailingStore {
        lookups: AtomicUsize,
    }

    impl FailingStore {
        pub(crate) fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        fn fail<T>(&self, kind: &str) -> Result<T> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            MissingNameSnafu { kind }.fail()
        }
    }

    #[async_trait]
    impl ClusterObjectStore for FailingStore {
        async fn get_catalog(&self, _namespace: &str, _name: &str) -> Result<Option<Catalog>> {
            self.fail("Catalog")
        }

        async fn get_config_map(
            &self,
            _namespace: &str,
            _name: &str,
        ) -> Result<Option<ConfigMap>> {
            self.fail("ConfigMap")
        }

        async fn get_secret(&self, _namespace: &str, _name: &str) -> Result<Option<Secret>> {
            self.fail("Secret")
        }

        async fn list_sibling_apps(
            &self,
            _namespace: &str,
            _exclude_name: &str,
        ) -> Result<Vec<App>> {
            self.fail("App")
        }

        async fn get_catalog_entry(
            &self,
            _namespace: &str,
            _name: &str,
        ) -> Result<Option<AppCatalogEntry>> {
            self.fail("AppCatalogEntry")
        }
    }
}
