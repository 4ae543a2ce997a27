//! Custom resources of the App Platform (`application.giantswarm.io/v1alpha1`).
//!
//! The accessors in the `v1alpha1_impl` modules are the only way the engines read these
//! resources. They never mutate them.
use std::io::Write;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::yaml;

pub mod app;
pub mod catalog;
pub mod catalog_entry;

pub use app::v1alpha1::App;
pub use catalog::v1alpha1::Catalog;
pub use catalog_entry::v1alpha1::AppCatalogEntry;

/// Points to a namespaced object, typically a ConfigMap or Secret.
///
/// An empty `name` means the reference is not configured.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

impl ResourceReference {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Returns the reference if it names an object.
    pub fn configured(&self) -> Option<&Self> {
        (!self.name.is_empty()).then_some(self)
    }
}

/// The CustomResourceDefinitions of all App Platform resources.
pub fn crds() -> [CustomResourceDefinition; 3] {
    [App::crd(), Catalog::crd(), AppCatalogEntry::crd()]
}

/// Writes [`crds`] to `writer` as a stream of explicit YAML documents.
pub fn write_crds<W: Write>(mut writer: W) -> Result<(), yaml::Error> {
    for crd in crds() {
        yaml::serialize_to_explicit_document(&mut writer, &crd)?;
    }

    Ok(())
}
