//! Admission validation of App resources.
//!
//! A [`Validator`] runs the [`Rule`]s in their declaration order and returns the error of the
//! first rule that fails. Later rules are not evaluated.
use std::sync::Arc;

use kube::ResourceExt;
use snafu::ensure;
use strum::IntoEnumIterator;
use tracing::instrument;

use crate::{
    crd::App,
    error::{InvalidConfigSnafu, Result},
    store::ClusterObjectStore,
};

mod app;

/// A single check of [`Validator::validate_app`].
///
/// The variant order is the order the checks run in, and therefore decides which error is
/// reported when an App violates more than one rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Rule {
    /// The app-operator version label is set and not the legacy value.
    Labels,

    /// The referenced Catalog exists.
    Catalog,

    /// The app level ConfigMap and Secret exist.
    Config,

    /// The kubeconfig Secret exists, unless the App is installed in-cluster.
    KubeConfig,

    /// Namespace labels and annotations do not contradict those of other Apps targeting the same
    /// namespace.
    NamespaceConfig,

    /// The restrictions of the AppCatalogEntry are met.
    MetadataConstraints,

    /// The name is usable as a Helm release name.
    Name,

    /// The user level ConfigMap and Secret exist and are named correctly.
    UserConfig,
}

#[derive(Clone, Debug)]
pub struct Validator {
    store: Arc<dyn ClusterObjectStore>,
    provider: String,
}

impl Validator {
    /// Creates a validator for the cluster served by `store`.
    ///
    /// `provider` identifies the platform the cluster runs on (e.g. `aws`) and is matched against
    /// the compatible providers of AppCatalogEntries. It must not be empty.
    pub fn new(store: Arc<dyn ClusterObjectStore>, provider: impl Into<String>) -> Result<Self> {
        let provider = provider.into();
        ensure!(
            !provider.is_empty(),
            InvalidConfigSnafu {
                message: "Validator.provider must not be empty",
            }
        );

        Ok(Self { store, provider })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Validates `app`, returning the error of the first failing [`Rule`].
    #[instrument(skip_all, fields(app = %app.name_any(), namespace = app.namespace().as_deref()))]
    pub async fn validate_app(&self, app: &App) -> Result<()> {
        for rule in Rule::iter() {
            self.check(rule, app)
                .await
                .inspect_err(|error| tracing::debug!(%rule, %error, "app failed validation"))?;
        }

        tracing::debug!("app is valid");
        Ok(())
    }

    /// Runs a single [`Rule`] against `app`.
    pub async fn check(&self, rule: Rule, app: &App) -> Result<()> {
        tracing::trace!(%rule, "checking rule");

        match rule {
            Rule::Labels => Self::validate_labels(app),
            Rule::Catalog => self.validate_catalog(app).await,
            Rule::Config => self.validate_config(app).await,
            Rule::KubeConfig => self.validate_kube_config(app).await,
            Rule::NamespaceConfig => self.validate_namespace_config(app).await,
            Rule::MetadataConstraints => self.validate_metadata_constraints(app).await,
            Rule::Name => Self::validate_name(app),
            Rule::UserConfig => self.validate_user_config(app).await,
        }
    }
}
