mod v1alpha1_impl;

pub mod v1alpha1 {
    use std::collections::BTreeMap;

    use kube::CustomResource;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    use crate::crd::ResourceReference;

    /// Describes an application that should be installed as a Helm release into a cluster.
    #[derive(CustomResource, Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[kube(
        group = "application.giantswarm.io",
        version = "v1alpha1",
        kind = "App",
        plural = "apps",
        status = "AppStatus",
        derive = "PartialEq",
        namespaced
    )]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpec {
        /// Name of the Catalog to install the chart from.
        pub catalog: String,

        /// Namespace of the Catalog. When empty the well-known catalog namespaces are searched.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub catalog_namespace: String,

        /// App level values, usually generated by the platform.
        #[serde(default)]
        pub config: AppSpecConfig,

        #[serde(default)]
        pub install: AppSpecInstall,

        /// Cluster the chart is installed into.
        pub kube_config: AppSpecKubeConfig,

        /// Name of the chart in the catalog.
        pub name: String,

        /// Namespace the chart is installed into.
        pub namespace: String,

        /// Labels and annotations applied to the target namespace.
        #[serde(default)]
        pub namespace_config: AppSpecNamespaceConfig,

        /// User level values, overriding both catalog and app level values.
        #[serde(default)]
        pub user_config: AppSpecConfig,

        /// Version of the chart.
        pub version: String,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpecConfig {
        #[serde(default)]
        pub config_map: ResourceReference,

        #[serde(default)]
        pub secret: ResourceReference,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpecInstall {
        #[serde(default)]
        pub skip_crds: bool,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpecKubeConfig {
        #[serde(default)]
        pub context: AppSpecKubeConfigContext,

        /// Install into the cluster the App lives in. The kubeconfig secret is ignored.
        #[serde(default)]
        pub in_cluster: bool,

        #[serde(default)]
        pub secret: ResourceReference,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpecKubeConfigContext {
        #[serde(default)]
        pub name: String,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppSpecNamespaceConfig {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub annotations: Option<BTreeMap<String, String>>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub labels: Option<BTreeMap<String, String>>,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppStatus {
        #[serde(default)]
        pub app_version: String,

        #[serde(default)]
        pub release: AppStatusRelease,

        #[serde(default)]
        pub version: String,
    }

    #[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppStatusRelease {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub reason: String,

        #[serde(default)]
        pub status: String,
    }
}
