mod v1alpha1_impl;

pub mod v1alpha1 {
    use kube::CustomResource;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    /// Metadata of one chart version published in a catalog.
    #[derive(CustomResource, Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[kube(
        group = "application.giantswarm.io",
        version = "v1alpha1",
        kind = "AppCatalogEntry",
        plural = "appcatalogentries",
        namespaced
    )]
    #[serde(rename_all = "camelCase")]
    pub struct AppCatalogEntrySpec {
        pub app_name: String,

        pub app_version: String,

        #[serde(default)]
        pub catalog: AppCatalogEntrySpecCatalog,

        /// Chart version.
        pub version: String,

        /// Install restrictions. No restriction applies when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub restrictions: Option<Restrictions>,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppCatalogEntrySpecCatalog {
        #[serde(default)]
        pub name: String,

        #[serde(default)]
        pub namespace: String,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Restrictions {
        /// The app may only be installed once per originating namespace.
        #[serde(default)]
        pub cluster_singleton: bool,

        /// Providers the app can be installed on. Empty means all providers.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub compatible_providers: Vec<String>,

        /// The only namespace the app can be installed into.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub fixed_namespace: String,

        #[serde(default)]
        pub gpu_instances: bool,

        /// The app may only be installed once per target namespace.
        #[serde(default)]
        pub namespace_singleton: bool,
    }
}
