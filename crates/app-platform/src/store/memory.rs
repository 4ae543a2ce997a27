use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::{
    ByteString,
    api::core::v1::{ConfigMap, Secret},
};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use snafu::{OptionExt, ResultExt, ensure};

use crate::{
    crd::{App, AppCatalogEntry, Catalog},
    store::{
        ClusterObjectStore, MissingKindSnafu, MissingNameSnafu, ParseManifestSnafu,
        ParseManifestsSnafu, Result, UnsupportedKindSnafu,
    },
    yaml,
};

type ObjectKey = (String, String);

/// A [`ClusterObjectStore`] serving a fixed set of objects from memory.
///
/// It is filled either programmatically or from YAML manifests, which makes it usable for
/// offline validation as well as in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    apps: BTreeMap<ObjectKey, App>,
    catalogs: BTreeMap<ObjectKey, Catalog>,
    catalog_entries: BTreeMap<ObjectKey, AppCatalogEntry>,
    config_maps: BTreeMap<ObjectKey, ConfigMap>,
    secrets: BTreeMap<ObjectKey, Secret>,
}

fn key_of<K: ResourceExt>(object: &K) -> ObjectKey {
    (object.namespace().unwrap_or_default(), object.name_any())
}

fn lookup<T: Clone>(objects: &BTreeMap<ObjectKey, T>, namespace: &str, name: &str) -> Option<T> {
    objects
        .get(&(namespace.to_owned(), name.to_owned()))
        .cloned()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a multi-document YAML stream.
    ///
    /// Supported kinds are `App`, `Catalog`, `AppCatalogEntry`, `ConfigMap` and `Secret`. Objects
    /// without a namespace are stored in the empty namespace.
    pub fn from_manifests(input: &str) -> Result<Self> {
        let mut store = Self::new();
        store.load_manifests(input)?;
        Ok(store)
    }

    /// Adds all objects of a multi-document YAML stream to the store, replacing objects with the
    /// same kind, namespace and name.
    pub fn load_manifests(&mut self, input: &str) -> Result<()> {
        let documents = yaml::parse_documents(input).context(ParseManifestsSnafu)?;

        for (index, document) in documents.into_iter().enumerate() {
            let kind = document
                .get("kind")
                .and_then(serde_yaml::Value::as_str)
                .context(MissingKindSnafu { index })?
                .to_owned();

            match kind.as_str() {
                "App" => self.insert_app(parse_manifest(document, &kind)?),
                "Catalog" => self.insert_catalog(parse_manifest(document, &kind)?),
                "AppCatalogEntry" => self.insert_catalog_entry(parse_manifest(document, &kind)?),
                "ConfigMap" => self.insert_config_map(parse_manifest(document, &kind)?),
                "Secret" => self.insert_secret(parse_manifest(document, &kind)?),
                _ => return UnsupportedKindSnafu { kind: &kind }.fail(),
            };
        }

        Ok(())
    }

    pub fn with_app(mut self, app: App) -> Self {
        self.insert_app(app);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.insert_catalog(catalog);
        self
    }

    pub fn with_catalog_entry(mut self, entry: AppCatalogEntry) -> Self {
        self.insert_catalog_entry(entry);
        self
    }

    pub fn with_config_map(mut self, config_map: ConfigMap) -> Self {
        self.insert_config_map(config_map);
        self
    }

    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.insert_secret(secret);
        self
    }

    pub fn insert_app(&mut self, app: App) {
        self.apps.insert(key_of(&app), app);
    }

    pub fn insert_catalog(&mut self, catalog: Catalog) {
        self.catalogs.insert(key_of(&catalog), catalog);
    }

    pub fn insert_catalog_entry(&mut self, entry: AppCatalogEntry) {
        self.catalog_entries.insert(key_of(&entry), entry);
    }

    pub fn insert_config_map(&mut self, config_map: ConfigMap) {
        self.config_maps.insert(key_of(&config_map), config_map);
    }

    /// Adds a Secret. Like the API server, entries of `stringData` are moved into `data`.
    pub fn insert_secret(&mut self, mut secret: Secret) {
        if let Some(string_data) = secret.string_data.take() {
            secret.data.get_or_insert_default().extend(
                string_data
                    .into_iter()
                    .map(|(key, value)| (key, ByteString(value.into_bytes()))),
            );
        }
        self.secrets.insert(key_of(&secret), secret);
    }
}

fn parse_manifest<K>(document: serde_yaml::Value, kind: &str) -> Result<K>
where
    K: DeserializeOwned + Resource,
{
    let object: K = serde_yaml::from_value(document).context(ParseManifestSnafu { kind })?;
    ensure!(object.meta().name.is_some(), MissingNameSnafu { kind });
    Ok(object)
}

#[async_trait]
impl ClusterObjectStore for InMemoryStore {
    async fn get_catalog(&self, namespace: &str, name: &str) -> Result<Option<Catalog>> {
        Ok(lookup(&self.catalogs, namespace, name))
    }

    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<Option<ConfigMap>> {
        Ok(lookup(&self.config_maps, namespace, name))
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        Ok(lookup(&self.secrets, namespace, name))
    }

    async fn list_sibling_apps(&self, namespace: &str, exclude_name: &str) -> Result<Vec<App>> {
        Ok(self
            .apps
            .iter()
            .filter(|((app_namespace, app_name), _)| {
                app_namespace == namespace && app_name != exclude_name
            })
            .map(|(_, app)| app.clone())
            .collect())
    }

    async fn get_catalog_entry(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<AppCatalogEntry>> {
        Ok(lookup(&self.catalog_entries, namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;

    use super::*;
    use crate::store::{Error, find_catalog};

    const MANIFESTS: &str = indoc! {"
        ---
        apiVersion: application.giantswarm.io/v1alpha1
        kind: Catalog
        metadata:
          name: control-plane-catalog
          namespace: default
        spec:
          title: Control Plane Catalog
        ---
        apiVersion: v1
        kind: ConfigMap
        metadata:
          name: dex-app-values
          namespace: giantswarm
        data:
          values: |
            replicas: 2
        ---
        apiVersion: application.giantswarm.io/v1alpha1
        kind: App
        metadata:
          name: dex-app-unique
          namespace: giantswarm
        spec:
          catalog: control-plane-catalog
          name: dex-app
          namespace: giantswarm
          version: 1.2.2
          kubeConfig:
            inCluster: true
        ---
        apiVersion: application.giantswarm.io/v1alpha1
        kind: App
        metadata:
          name: kiam
          namespace: giantswarm
        spec:
          catalog: default
          name: kiam
          namespace: kube-system
          version: 1.4.0
          kubeConfig:
            inCluster: true
    "};

    #[tokio::test]
    async fn lookups_by_namespace_and_name() {
        let store = InMemoryStore::from_manifests(MANIFESTS).expect("test manifests are valid");

        assert!(
            store
                .get_catalog("default", "control-plane-catalog")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .get_catalog("giantswarm", "control-plane-catalog")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .get_config_map("giantswarm", "dex-app-values")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .get_secret("giantswarm", "dex-app-values")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn siblings_exclude_the_named_app() {
        let store = InMemoryStore::from_manifests(MANIFESTS).expect("test manifests are valid");

        let siblings = store
            .list_sibling_apps("giantswarm", "dex-app-unique")
            .await
            .unwrap();

        let names: Vec<_> = siblings.iter().map(ResourceExt::name_any).collect();
        assert_eq!(names, vec!["kiam"]);
    }

    #[tokio::test]
    async fn find_catalog_searches_fallback_namespaces() {
        let store = InMemoryStore::from_manifests(MANIFESTS).expect("test manifests are valid");
        let apps = store.list_sibling_apps("giantswarm", "kiam").await.unwrap();

        let catalog = find_catalog(&store, &apps[0]).await.unwrap();

        assert_eq!(
            catalog.map(|catalog| catalog.name_any()).as_deref(),
            Some("control-plane-catalog")
        );
    }

    #[tokio::test]
    async fn secret_string_data_is_moved_into_data() {
        let store = InMemoryStore::from_manifests(indoc! {"
            apiVersion: v1
            kind: Secret
            metadata:
              name: dex-app-secrets
              namespace: giantswarm
            stringData:
              values: |
                clientSecret: hunter2
        "})
        .expect("test manifests are valid");

        let secret = store
            .get_secret("giantswarm", "dex-app-secrets")
            .await
            .unwrap()
            .expect("secret was loaded");

        assert!(secret.string_data.is_none());
        assert_eq!(
            secret.data.unwrap()["values"],
            ByteString(b"clientSecret: hunter2\n".to_vec())
        );
    }

    #[rstest]
    #[case("kind: Deployment\nmetadata:\n  name: foo\n", "UnsupportedKind")]
    #[case("metadata:\n  name: foo\n", "MissingKind")]
    #[case("apiVersion: v1\nkind: ConfigMap\nmetadata: {}\n", "MissingName")]
    fn invalid_manifests(#[case] input: &str, #[case] expected: &str) {
        let error = InMemoryStore::from_manifests(input).unwrap_err();

        let actual = match error {
            Error::UnsupportedKind { .. } => "UnsupportedKind",
            Error::MissingKind { .. } => "MissingKind",
            Error::MissingName { .. } => "MissingName",
            _ => "other",
        };
        assert_eq!(actual, expected);
    }
}
