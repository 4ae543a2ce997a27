//! Construction of new App resources.
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use snafu::{ResultExt, Snafu};

use crate::{
    constants::{
        APP_OPERATOR_VERSION_LABEL, FORCE_HELM_UPGRADE_ANNOTATION, UNIQUE_APP_VERSION_LABEL_VALUE,
    },
    crd::{
        App,
        app::v1alpha1::{AppSpec, AppSpecKubeConfig},
    },
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize App as JSON"))]
    SerializeJson { source: serde_json::Error },

    #[snafu(display("failed to serialize App as YAML"))]
    SerializeYaml { source: serde_yaml::Error },
}

/// Namespace new Apps are created in unless set otherwise.
pub const DEFAULT_APP_NAMESPACE: &str = "giantswarm";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

/// Builds an App installed in-cluster and reconciled by the unique app-operator.
///
/// ```
/// # use app_platform::builder::AppBuilder;
/// let app = AppBuilder::new("dex-app-unique")
///     .catalog("control-plane-catalog")
///     .app_name("dex-app")
///     .target_namespace("giantswarm")
///     .version("1.2.2")
///     .build();
///
/// assert_eq!(app.version_label(), Some("0.0.0"));
/// assert!(app.in_cluster());
/// ```
#[derive(Clone, Debug)]
pub struct AppBuilder {
    name: String,
    namespace: String,
    catalog: String,
    app_name: String,
    target_namespace: String,
    version: String,
    force_upgrade: bool,
}

impl AppBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: DEFAULT_APP_NAMESPACE.to_owned(),
            catalog: String::new(),
            app_name: String::new(),
            target_namespace: String::new(),
            version: String::new(),
            force_upgrade: true,
        }
    }

    /// Namespace of the App resource itself.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Name of the chart in the catalog.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Namespace the chart is installed into.
    pub fn target_namespace(mut self, target_namespace: impl Into<String>) -> Self {
        self.target_namespace = target_namespace.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Omits the annotation making chart-operator force Helm upgrades.
    pub fn disable_force_upgrade(mut self) -> Self {
        self.force_upgrade = false;
        self
    }

    pub fn build(self) -> App {
        let annotations = self.force_upgrade.then(|| {
            BTreeMap::from([(FORCE_HELM_UPGRADE_ANNOTATION.to_owned(), "true".to_owned())])
        });

        let mut app = App::new(&self.name, AppSpec {
            catalog: self.catalog,
            kube_config: AppSpecKubeConfig {
                in_cluster: true,
                ..AppSpecKubeConfig::default()
            },
            name: self.app_name,
            namespace: self.target_namespace,
            version: self.version,
            ..AppSpec::default()
        });

        app.metadata = ObjectMeta {
            name: Some(self.name),
            namespace: Some(self.namespace),
            annotations,
            labels: Some(BTreeMap::from([(
                APP_OPERATOR_VERSION_LABEL.to_owned(),
                UNIQUE_APP_VERSION_LABEL_VALUE.to_owned(),
            )])),
            ..ObjectMeta::default()
        };

        app
    }
}

/// Renders `app` in the given format.
pub fn marshal(app: &App, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(app).context(SerializeJsonSnafu),
        OutputFormat::Yaml => serde_yaml::to_string(app).context(SerializeYamlSnafu),
    }
}
