use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::{
    NamespaceResourceScope,
    api::core::v1::{ConfigMap, Secret},
};
use kube::{Api, Resource, api::ListParams};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::{
    crd::{App, AppCatalogEntry, Catalog},
    store::{ClusterObjectStore, GetObjectSnafu, ListObjectsSnafu, Result},
};

/// A [`ClusterObjectStore`] backed by the Kubernetes API.
///
/// It wraps an underlying [`kube::Client`], which is cheap to clone.
#[derive(Clone)]
pub struct KubeStore {
    client: kube::Client,
}

impl Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Returns a [`kube::Client`] that can be freely used.
    pub fn as_kube_client(&self) -> kube::Client {
        self.client.clone()
    }

    /// Retrieves a single object, mapping a `404` response to [`None`].
    async fn get_opt<T>(&self, namespace: &str, name: &str) -> Result<Option<T>>
    where
        T: Clone
            + Debug
            + DeserializeOwned
            + Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        tracing::debug!(kind = %T::kind(&()), name, namespace, "looking up object");

        let api: Api<T> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await.with_context(|_| GetObjectSnafu {
            kind: T::kind(&()),
            name,
            namespace,
        })
    }
}

#[async_trait]
impl ClusterObjectStore for KubeStore {
    async fn get_catalog(&self, namespace: &str, name: &str) -> Result<Option<Catalog>> {
        self.get_opt(namespace, name).await
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<Option<ConfigMap>> {
        self.get_opt(namespace, name).await
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        self.get_opt(namespace, name).await
    }

    async fn list_sibling_apps(&self, namespace: &str, exclude_name: &str) -> Result<Vec<App>> {
        let api: Api<App> = Api::namespaced(self.client.clone(), namespace);
        let list_params = ListParams::default().fields(&format!("metadata.name!={exclude_name}"));

        let apps = api
            .list(&list_params)
            .await
            .with_context(|_| ListObjectsSnafu {
                kind: App::kind(&()),
                namespace,
            })?;

        Ok(apps.items)
    }

    async fn get_catalog_entry(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<AppCatalogEntry>> {
        self.get_opt(namespace, name).await
    }
}
