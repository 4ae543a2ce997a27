use kube::ResourceExt;

use crate::{
    constants::{CATALOG_TYPE_LABEL, CATALOG_VISIBILITY_LABEL},
    crd::{ResourceReference, catalog::v1alpha1::Catalog},
};

impl Catalog {
    pub fn title(&self) -> &str {
        &self.spec.title
    }

    pub fn storage_url(&self) -> &str {
        &self.spec.storage.url
    }

    pub fn config_map(&self) -> Option<&ResourceReference> {
        self.spec
            .config
            .as_ref()
            .and_then(|config| config.config_map.as_ref())
            .and_then(ResourceReference::configured)
    }

    pub fn secret(&self) -> Option<&ResourceReference> {
        self.spec
            .config
            .as_ref()
            .and_then(|config| config.secret.as_ref())
            .and_then(ResourceReference::configured)
    }

    pub fn catalog_type(&self) -> Option<&str> {
        self.labels().get(CATALOG_TYPE_LABEL).map(String::as_str)
    }

    pub fn visibility(&self) -> Option<&str> {
        self.labels()
            .get(CATALOG_VISIBILITY_LABEL)
            .map(String::as_str)
    }
}
