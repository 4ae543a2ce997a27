use std::collections::BTreeMap;

use kube::ResourceExt;

use crate::{
    constants::{
        APP_OPERATOR_CORDON_REASON_ANNOTATION, APP_OPERATOR_CORDON_UNTIL_ANNOTATION,
        APP_OPERATOR_VERSION_LABEL, CHART_OPERATOR_CORDON_REASON_ANNOTATION,
        CHART_OPERATOR_CORDON_UNTIL_ANNOTATION, CLUSTER_LABEL, INGRESS_CONTROLLER_CONFIG_MAP_NAME,
        NGINX_INGRESS_CONTROLLER_APP_NAME, ORGANIZATION_LABEL, TEAM_ANNOTATION,
    },
    crd::{ResourceReference, app::v1alpha1::App, catalog_entry::v1alpha1::AppCatalogEntry},
};

impl App {
    /// Name of the chart to install, which is also used as the Helm release name.
    pub fn app_name(&self) -> &str {
        &self.spec.name
    }

    /// Namespace the chart is installed into.
    pub fn target_namespace(&self) -> &str {
        &self.spec.namespace
    }

    pub fn version(&self) -> &str {
        &self.spec.version
    }

    pub fn catalog_name(&self) -> &str {
        &self.spec.catalog
    }

    pub fn catalog_namespace(&self) -> Option<&str> {
        (!self.spec.catalog_namespace.is_empty()).then_some(self.spec.catalog_namespace.as_str())
    }

    /// Name of the AppCatalogEntry describing the chart version this App installs.
    pub fn catalog_entry_name(&self) -> String {
        AppCatalogEntry::entry_name(self.catalog_name(), self.app_name(), self.version())
    }

    pub fn app_config_map(&self) -> Option<&ResourceReference> {
        self.spec.config.config_map.configured()
    }

    pub fn app_secret(&self) -> Option<&ResourceReference> {
        self.spec.config.secret.configured()
    }

    pub fn user_config_map(&self) -> Option<&ResourceReference> {
        self.spec.user_config.config_map.configured()
    }

    pub fn user_secret(&self) -> Option<&ResourceReference> {
        self.spec.user_config.secret.configured()
    }

    pub fn in_cluster(&self) -> bool {
        self.spec.kube_config.in_cluster
    }

    /// The kubeconfig secret reference. Only meaningful when [`Self::in_cluster`] is `false`, in
    /// which case an empty name or namespace is a misconfiguration.
    pub fn kube_config_secret(&self) -> &ResourceReference {
        &self.spec.kube_config.secret
    }

    pub fn kube_config_context_name(&self) -> &str {
        &self.spec.kube_config.context.name
    }

    pub fn namespace_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.namespace_config.annotations.as_ref()
    }

    pub fn namespace_labels(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.namespace_config.labels.as_ref()
    }

    pub fn install_skip_crds(&self) -> bool {
        self.spec.install.skip_crds
    }

    /// Value of the `app-operator.giantswarm.io/version` label, if set.
    pub fn version_label(&self) -> Option<&str> {
        self.label(APP_OPERATOR_VERSION_LABEL)
    }

    pub fn cluster_id(&self) -> Option<&str> {
        self.label(CLUSTER_LABEL)
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.label(ORGANIZATION_LABEL)
    }

    pub fn team(&self) -> Option<&str> {
        self.annotation(TEAM_ANNOTATION)
    }

    pub fn is_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    /// An App is cordoned for app-operator when both its cordon reason and cordon until
    /// annotations are set.
    pub fn is_cordoned(&self) -> bool {
        let annotations = self.annotations();
        annotations.contains_key(APP_OPERATOR_CORDON_REASON_ANNOTATION)
            && annotations.contains_key(APP_OPERATOR_CORDON_UNTIL_ANNOTATION)
    }

    /// Reason chart-operator was asked to stop reconciling the release.
    pub fn cordon_reason(&self) -> Option<&str> {
        self.annotation(CHART_OPERATOR_CORDON_REASON_ANNOTATION)
    }

    pub fn cordon_until(&self) -> Option<&str> {
        self.annotation(CHART_OPERATOR_CORDON_UNTIL_ANNOTATION)
    }

    /// Name of the ConfigMap holding the cluster values generated for the App's namespace.
    pub fn cluster_values_config_map_name(&self) -> String {
        // The ingress controller reads its values from a dedicated ConfigMap.
        if self.app_name() == NGINX_INGRESS_CONTROLLER_APP_NAME {
            return INGRESS_CONTROLLER_CONFIG_MAP_NAME.to_owned();
        }

        format!("{}-cluster-values", self.namespace().unwrap_or_default())
    }

    pub fn cluster_kube_config_secret_name(&self) -> String {
        format!("{}-kubeconfig", self.namespace().unwrap_or_default())
    }

    pub fn chart_config_map_name(&self) -> String {
        format!("{}-chart-values", self.name_any())
    }

    pub fn chart_secret_name(&self) -> String {
        format!("{}-chart-secrets", self.name_any())
    }

    pub fn kube_config_finalizer(&self) -> String {
        format!("app-operator.giantswarm.io/app-{}", self.name_any())
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.labels().get(key).map(String::as_str)
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations().get(key).map(String::as_str)
    }
}
