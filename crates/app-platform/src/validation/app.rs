use std::{collections::BTreeMap, fmt::Display};

use kube::ResourceExt;
use snafu::ensure;

use crate::{
    constants::{
        APP_OPERATOR_VERSION_LABEL, CATALOG_ENTRY_NAMESPACE, DEFAULT_CATALOG_NAME,
        LEGACY_APP_VERSION_LABEL_VALUE, RELEASE_NAME_MAX_LENGTH, USER_CONFIG_MAP_SUFFIX,
        USER_SECRET_SUFFIX,
    },
    crd::{App, ResourceReference},
    error::{AppConfigMapNotFoundSnafu, KubeConfigNotFoundSnafu, Result, ValidationSnafu},
    store,
    validation::Validator,
    values::SourceKind,
};

const KUBE_CONFIG_SECRET: &str = "kubeconfig secret";

fn not_found_message(kind: impl Display, reference: &ResourceReference) -> String {
    format!(
        "{kind} {name:?} in namespace {namespace:?} not found",
        name = reference.name,
        namespace = reference.namespace
    )
}

/// Returns the namespace of `reference`, failing if it is empty.
fn require_namespace(kind: impl Display, reference: &ResourceReference) -> Result<&str> {
    ensure!(
        !reference.namespace.is_empty(),
        ValidationSnafu {
            message: format!(
                "namespace is not specified for {kind} {name:?}",
                name = reference.name
            ),
        }
    );

    Ok(&reference.namespace)
}

/// Finds a key set to different values in both overlays, returning the key with our and their
/// value.
fn find_collision<'a>(
    ours: Option<&'a BTreeMap<String, String>>,
    theirs: Option<&'a BTreeMap<String, String>>,
) -> Option<(&'a str, &'a str, &'a str)> {
    let (ours, theirs) = (ours?, theirs?);

    theirs.iter().find_map(|(key, their_value)| {
        ours.get(key)
            .filter(|our_value| *our_value != their_value)
            .map(|our_value| (key.as_str(), our_value.as_str(), their_value.as_str()))
    })
}

impl Validator {
    pub(super) fn validate_labels(app: &App) -> Result<()> {
        let version_label = app.version_label().unwrap_or_default();

        ensure!(
            !version_label.is_empty(),
            ValidationSnafu {
                message: format!("label {APP_OPERATOR_VERSION_LABEL:?} not found"),
            }
        );
        ensure!(
            version_label != LEGACY_APP_VERSION_LABEL_VALUE,
            ValidationSnafu {
                message: format!(
                    "label {APP_OPERATOR_VERSION_LABEL:?} has invalid value {version_label:?}"
                ),
            }
        );

        Ok(())
    }

    pub(super) async fn validate_catalog(&self, app: &App) -> Result<()> {
        let catalog_name = app.catalog_name();
        if catalog_name.is_empty() {
            return Ok(());
        }

        ensure!(
            store::find_catalog(self.store.as_ref(), app).await?.is_some(),
            ValidationSnafu {
                message: format!("catalog {catalog_name:?} not found"),
            }
        );

        Ok(())
    }

    pub(super) async fn validate_config(&self, app: &App) -> Result<()> {
        if let Some(config_map) = app.app_config_map() {
            let namespace = require_namespace(SourceKind::ConfigMap, config_map)?;

            // A missing ConfigMap gets its own kind, as the cluster values ConfigMap is generated
            // shortly after the cluster is created.
            ensure!(
                self.store
                    .get_config_map(namespace, &config_map.name)
                    .await?
                    .is_some(),
                AppConfigMapNotFoundSnafu {
                    message: not_found_message(SourceKind::ConfigMap, config_map),
                }
            );
        }

        if let Some(secret) = app.app_secret() {
            let namespace = require_namespace(SourceKind::Secret, secret)?;

            ensure!(
                self.store
                    .get_secret(namespace, &secret.name)
                    .await?
                    .is_some(),
                ValidationSnafu {
                    message: not_found_message(SourceKind::Secret, secret),
                }
            );
        }

        Ok(())
    }

    pub(super) async fn validate_kube_config(&self, app: &App) -> Result<()> {
        if app.in_cluster() {
            return Ok(());
        }

        let secret = app.kube_config_secret();
        let namespace = require_namespace(KUBE_CONFIG_SECRET, secret)?;

        // Like the cluster values ConfigMap, the kubeconfig Secret shows up with a delay.
        ensure!(
            !secret.name.is_empty()
                && self
                    .store
                    .get_secret(namespace, &secret.name)
                    .await?
                    .is_some(),
            KubeConfigNotFoundSnafu {
                message: not_found_message(KUBE_CONFIG_SECRET, secret),
            }
        );

        Ok(())
    }

    pub(super) async fn validate_namespace_config(&self, app: &App) -> Result<()> {
        let annotations = app.namespace_annotations();
        let labels = app.namespace_labels();
        if annotations.is_none() && labels.is_none() {
            return Ok(());
        }

        let siblings = self
            .store
            .list_sibling_apps(&app.namespace().unwrap_or_default(), &app.name_any())
            .await?;

        for sibling in siblings
            .iter()
            .filter(|sibling| sibling.target_namespace() == app.target_namespace())
        {
            let collisions = [
                (
                    "annotation",
                    find_collision(annotations, sibling.namespace_annotations()),
                ),
                ("label", find_collision(labels, sibling.namespace_labels())),
            ];

            for (overlay, collision) in collisions {
                if let Some((key, our_value, their_value)) = collision {
                    return ValidationSnafu {
                        message: format!(
                            "app {app_name:?} {overlay} {key:?} with value {our_value:?} for target namespace {target_namespace:?} collides with value {their_value:?} for app {sibling_name:?}",
                            app_name = app.app_name(),
                            target_namespace = app.target_namespace(),
                            sibling_name = sibling.name_any(),
                        ),
                    }
                    .fail();
                }
            }
        }

        Ok(())
    }

    pub(super) async fn validate_metadata_constraints(&self, app: &App) -> Result<()> {
        let entry_name = app.catalog_entry_name();

        let Some(entry) = self
            .store
            .get_catalog_entry(CATALOG_ENTRY_NAMESPACE, &entry_name)
            .await?
        else {
            tracing::debug!(
                entry = %entry_name,
                "appcatalogentry not found, skipping metadata validation"
            );
            return Ok(());
        };

        let Some(restrictions) = entry.restrictions() else {
            return Ok(());
        };

        let app_name = app.app_name();
        let target_namespace = app.target_namespace();

        ensure!(
            restrictions.is_compatible_with(&self.provider),
            ValidationSnafu {
                message: format!(
                    "app {app_name:?} can only be installed for providers {providers:?} not {provider:?}",
                    providers = restrictions.compatible_providers,
                    provider = self.provider,
                ),
            }
        );

        let fixed_namespace = restrictions.fixed_namespace.as_str();
        ensure!(
            fixed_namespace.is_empty() || fixed_namespace == target_namespace,
            ValidationSnafu {
                message: format!(
                    "app {app_name:?} can only be installed in namespace {fixed_namespace:?}, not {target_namespace:?}"
                ),
            }
        );

        if !restrictions.requires_singleton() {
            return Ok(());
        }

        let namespace = app.namespace().unwrap_or_default();
        let siblings = self
            .store
            .list_sibling_apps(&namespace, &app.name_any())
            .await?;

        for sibling in siblings
            .iter()
            .filter(|sibling| sibling.app_name() == app_name)
        {
            ensure!(
                !restrictions.cluster_singleton,
                ValidationSnafu {
                    message: format!(
                        "app {app_name:?} can only be installed once in cluster {namespace:?}"
                    ),
                }
            );
            ensure!(
                !(restrictions.namespace_singleton
                    && sibling.target_namespace() == target_namespace),
                ValidationSnafu {
                    message: format!(
                        "app {app_name:?} can only be installed once in namespace {target_namespace:?}"
                    ),
                }
            );
        }

        Ok(())
    }

    pub(super) fn validate_name(app: &App) -> Result<()> {
        let name = app.name_any();
        let length = name.chars().count();

        ensure!(
            length <= RELEASE_NAME_MAX_LENGTH,
            ValidationSnafu {
                message: format!(
                    "name {name:?} is {length} chars and exceeds max length of {RELEASE_NAME_MAX_LENGTH} chars"
                ),
            }
        );

        Ok(())
    }

    pub(super) async fn validate_user_config(&self, app: &App) -> Result<()> {
        let in_default_catalog = app.catalog_name() == DEFAULT_CATALOG_NAME;

        if let Some(config_map) = app.user_config_map() {
            if in_default_catalog {
                let expected = format!("{}{USER_CONFIG_MAP_SUFFIX}", app.name_any());
                ensure!(
                    config_map.name == expected,
                    ValidationSnafu {
                        message: format!(
                            "user configmap must be named {expected:?} for app in default catalog"
                        ),
                    }
                );
            }

            let namespace = require_namespace(SourceKind::ConfigMap, config_map)?;
            ensure!(
                self.store
                    .get_config_map(namespace, &config_map.name)
                    .await?
                    .is_some(),
                ValidationSnafu {
                    message: not_found_message(SourceKind::ConfigMap, config_map),
                }
            );
        }

        if let Some(secret) = app.user_secret() {
            if in_default_catalog {
                let expected = format!("{}{USER_SECRET_SUFFIX}", app.name_any());
                ensure!(
                    secret.name == expected,
                    ValidationSnafu {
                        message: format!(
                            "user secret must be named {expected:?} for app in default catalog"
                        ),
                    }
                );
            }

            let namespace = require_namespace(SourceKind::Secret, secret)?;
            ensure!(
                self.store
                    .get_secret(namespace, &secret.name)
                    .await?
                    .is_some(),
                ValidationSnafu {
                    message: not_found_message(SourceKind::Secret, secret),
                }
            );
        }

        Ok(())
    }
}
