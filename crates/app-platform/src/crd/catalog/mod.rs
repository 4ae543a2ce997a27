mod v1alpha1_impl;

pub mod v1alpha1 {
    use kube::CustomResource;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    use crate::crd::ResourceReference;

    /// A source of installable application charts.
    #[derive(CustomResource, Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[kube(
        group = "application.giantswarm.io",
        version = "v1alpha1",
        kind = "Catalog",
        plural = "catalogs",
        namespaced
    )]
    #[serde(rename_all = "camelCase")]
    pub struct CatalogSpec {
        pub title: String,

        #[serde(default)]
        pub description: String,

        /// Catalog level values, used as the base for every App installed from this catalog.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub config: Option<CatalogSpecConfig>,

        #[serde(default)]
        pub storage: CatalogSpecStorage,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CatalogSpecConfig {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub config_map: Option<ResourceReference>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub secret: Option<ResourceReference>,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CatalogSpecStorage {
        #[serde(default, rename = "type")]
        pub storage_type: String,

        #[serde(rename = "URL", default)]
        pub url: String,
    }
}
