//! The error taxonomy shared by the validation and values engines.
//!
//! Callers classify errors by kind, not by concrete type. The `is_*` predicates accept any error
//! and walk its source chain. Each link is matched as an [`Error`] or, failing that, by its
//! rendered message. Errors returned by the admission controller only reach clients as text,
//! prefixed with [`APP_ADMISSION_CONTROLLER_TEXT`] and often wrapped by the client library.
use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use snafu::Snafu;
use strum::IntoEnumIterator;

use crate::{constants::APP_ADMISSION_CONTROLLER_TEXT, store};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Finds a rendered [`Error`] anywhere in a message, optionally behind the admission controller
/// prefix, and captures its kind tag. Wrapping errors often put their own text in front.
static KIND_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let tags = ErrorKind::iter()
        .map(|kind| regex::escape(<&'static str>::from(kind)))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(
        r"(?:{prefix}\s*)?\b(?P<tag>{tags}): ",
        prefix = regex::escape(APP_ADMISSION_CONTROLLER_TEXT)
    ))
    .expect("failed to compile error kind tag regex")
});

/// The class of an [`Error`]. The string form is the tag rendered in front of every message.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum ErrorKind {
    #[strum(serialize = "validation error")]
    Validation,

    /// A ConfigMap generated by the platform is missing. It usually shows up shortly after a
    /// cluster is created, so callers may retry.
    #[strum(serialize = "app config map not found error")]
    AppConfigMapNotFound,

    /// Same as [`Self::AppConfigMapNotFound`], for the kubeconfig Secret of a workload cluster.
    #[strum(serialize = "kube config not found error")]
    KubeConfigNotFound,

    #[strum(serialize = "app dependency not ready error")]
    AppDependencyNotReady,

    #[strum(serialize = "not found error")]
    NotFound,

    #[strum(serialize = "parsing failed error")]
    ParsingFailed,

    #[strum(serialize = "invalid config error")]
    InvalidConfig,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("validation error: {message}"))]
    Validation { message: String },

    #[snafu(display("app config map not found error: {message}"))]
    AppConfigMapNotFound { message: String },

    #[snafu(display("kube config not found error: {message}"))]
    KubeConfigNotFound { message: String },

    #[snafu(display("app dependency not ready error: {message}"))]
    AppDependencyNotReady { message: String },

    #[snafu(display("not found error: {message}"))]
    NotFound { message: String },

    #[snafu(display("parsing failed error: {message}"))]
    ParsingFailed { message: String },

    #[snafu(display("invalid config error: {message}"))]
    InvalidConfig { message: String },

    #[snafu(transparent)]
    Store { source: store::Error },
}

impl Error {
    /// Returns the kind of this error, or [`None`] for store failures, which are passed through
    /// unclassified.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Validation { .. } => Some(ErrorKind::Validation),
            Self::AppConfigMapNotFound { .. } => Some(ErrorKind::AppConfigMapNotFound),
            Self::KubeConfigNotFound { .. } => Some(ErrorKind::KubeConfigNotFound),
            Self::AppDependencyNotReady { .. } => Some(ErrorKind::AppDependencyNotReady),
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::ParsingFailed { .. } => Some(ErrorKind::ParsingFailed),
            Self::InvalidConfig { .. } => Some(ErrorKind::InvalidConfig),
            Self::Store { .. } => None,
        }
    }
}

impl ErrorKind {
    /// Classifies `error` by walking its source chain. Each link is either an [`Error`] or has
    /// its rendered message searched with [`Self::from_message`]; the first classified link wins.
    pub fn of(error: &(dyn std::error::Error + 'static)) -> Option<Self> {
        let mut current = Some(error);
        while let Some(error) = current {
            let kind = match error.downcast_ref::<Error>() {
                Some(error) => error.kind(),
                None => Self::from_message(&error.to_string()),
            };
            if kind.is_some() {
                return kind;
            }
            current = error.source();
        }

        None
    }

    /// Finds the kind tag of a rendered [`Error`] within `message`. The admission controller
    /// prefix is optional.
    pub fn from_message(message: &str) -> Option<Self> {
        let captures = KIND_TAG_REGEX.captures(message)?;
        Self::from_str(&captures["tag"]).ok()
    }

    pub fn matches(self, error: &(dyn std::error::Error + 'static)) -> bool {
        Self::of(error) == Some(self)
    }
}

pub fn is_validation(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::Validation.matches(error)
}

pub fn is_app_config_map_not_found(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::AppConfigMapNotFound.matches(error)
}

pub fn is_kube_config_not_found(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::KubeConfigNotFound.matches(error)
}

pub fn is_app_dependency_not_ready(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::AppDependencyNotReady.matches(error)
}

pub fn is_not_found(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::NotFound.matches(error)
}

pub fn is_parsing_failed(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::ParsingFailed.matches(error)
}

pub fn is_invalid_config(error: &(dyn std::error::Error + 'static)) -> bool {
    ErrorKind::InvalidConfig.matches(error)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use snafu::ResultExt;

    use super::*;

    /// Stands in for an error returned by the Kubernetes API, which only carries text.
    #[derive(Debug, Snafu)]
    #[snafu(display("{message}"))]
    struct RemoteError {
        message: String,
    }

    /// Wraps a remote error the way client libraries do, with their own text in front.
    #[derive(Debug, Snafu)]
    #[snafu(display("ApiError: {source}"))]
    struct ApiError {
        source: RemoteError,
    }

    #[derive(Debug, Snafu)]
    enum CallerError {
        #[snafu(display("failed to validate app"))]
        ValidateApp { source: Error },

        #[snafu(display("failed to read remote state"))]
        ReadRemote { source: ApiError },
    }

    #[rstest]
    #[case(
        r#"admission webhook "apps.app-admission-controller-unique.giantswarm.io" denied the request: app config map not found error: configmap "u9q0r-cluster-values" in namespace "u9q0r" not found"#,
        Some(ErrorKind::AppConfigMapNotFound)
    )]
    #[case(
        r#"admission webhook "apps.app-admission-controller-unique.giantswarm.io" denied the request: validation error: kubeconfig secret "u9q0r-cluster-values" in namespace "u9q0r" not found"#,
        Some(ErrorKind::Validation)
    )]
    #[case(
        r#"kube config not found error: kubeconfig secret "u9q0r-kubeconfig" in namespace "u9q0r" not found"#,
        Some(ErrorKind::KubeConfigNotFound)
    )]
    #[case(
        r#"ApiError: admission webhook "apps.app-admission-controller-unique.giantswarm.io" denied the request: app config map not found error: configmap "u9q0r-cluster-values" in namespace "u9q0r" not found (ErrorResponse)"#,
        Some(ErrorKind::AppConfigMapNotFound)
    )]
    #[case("something else entirely: went wrong", None)]
    #[case("validation errors: 3", None)]
    #[case("", None)]
    fn kind_from_message(#[case] message: &str, #[case] expected: Option<ErrorKind>) {
        assert_eq!(ErrorKind::from_message(message), expected);
    }

    #[test]
    fn every_kind_round_trips_through_its_message() {
        for kind in ErrorKind::iter() {
            let message = format!("{kind}: some details");
            assert_eq!(ErrorKind::from_message(&message), Some(kind));
        }
    }

    #[test]
    fn predicates_match_remote_text() {
        let remote = RemoteError {
            message: format!(
                r#"{APP_ADMISSION_CONTROLLER_TEXT} app config map not found error: configmap "u9q0r-cluster-values" in namespace "u9q0r" not found"#
            ),
        };

        assert!(is_app_config_map_not_found(&remote));
        assert!(!is_kube_config_not_found(&remote));
        assert!(!is_validation(&remote));
    }

    #[test]
    fn predicates_search_source_chain() {
        let result: Result<(), Error> = KubeConfigNotFoundSnafu {
            message: r#"kubeconfig secret "eggs2-kubeconfig" in namespace "eggs2" not found"#,
        }
        .fail();
        let error = result.context(ValidateAppSnafu).unwrap_err();

        assert!(is_kube_config_not_found(&error));
        assert!(!is_app_config_map_not_found(&error));
    }

    #[test]
    fn display_carries_kind_tag() {
        let error = ValidationSnafu {
            message: r#"catalog "control-plane-catalog" not found"#,
        }
        .build();

        assert_eq!(
            error.to_string(),
            r#"validation error: catalog "control-plane-catalog" not found"#
        );
        assert_eq!(error.kind(), Some(ErrorKind::Validation));
    }

    #[test]
    fn predicates_match_wrapped_remote_text() {
        let remote = RemoteError {
            message: format!(
                r#"{APP_ADMISSION_CONTROLLER_TEXT} app config map not found error: configmap "u9q0r-cluster-values" in namespace "u9q0r" not found"#
            ),
        };
        let error = ApiError { source: remote };

        assert!(is_app_config_map_not_found(&error));
        assert!(!is_not_found(&error));
        assert!(!is_validation(&error));
    }

    #[test]
    fn predicates_match_remote_text_below_unrelated_wrapper() {
        let remote = RemoteError {
            message: r#"kube config not found error: kubeconfig secret "u9q0r-kubeconfig" in namespace "u9q0r" not found"#.to_owned(),
        };
        let wrapped = ApiError { source: remote };
        let result: Result<(), ApiError> = Err(wrapped);
        let error = result
            .context(ReadRemoteSnafu)
            .unwrap_err();

        assert!(is_kube_config_not_found(&error));
    }
}
