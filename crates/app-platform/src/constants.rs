//! Well-known names, keys and limits shared by the validation and values engines.
use const_format::concatcp;

/// The API group all App Platform custom resources belong to.
pub const APPLICATION_GROUP: &str = "application.giantswarm.io";

const APP_OPERATOR_KEY_PREFIX: &str = "app-operator.giantswarm.io/";
const CHART_OPERATOR_KEY_PREFIX: &str = "chart-operator.giantswarm.io/";
const GIANTSWARM_KEY_PREFIX: &str = "giantswarm.io/";
const APPLICATION_KEY_PREFIX: &str = concatcp!(APPLICATION_GROUP, "/");

/// The label every App must carry. It selects the app-operator instance that
/// reconciles the App, e.g. `0.0.0` for the unique instance.
pub const APP_OPERATOR_VERSION_LABEL: &str = concatcp!(APP_OPERATOR_KEY_PREFIX, "version");

/// Value of [`APP_OPERATOR_VERSION_LABEL`] selecting the unique app-operator instance.
pub const UNIQUE_APP_VERSION_LABEL_VALUE: &str = "0.0.0";

/// Value of [`APP_OPERATOR_VERSION_LABEL`] used by the retired per-cluster app-operator. Apps
/// carrying it are rejected.
pub const LEGACY_APP_VERSION_LABEL_VALUE: &str = "1.0.0";

pub const APP_OPERATOR_CORDON_REASON_ANNOTATION: &str =
    concatcp!(APP_OPERATOR_KEY_PREFIX, "cordon-reason");
pub const APP_OPERATOR_CORDON_UNTIL_ANNOTATION: &str =
    concatcp!(APP_OPERATOR_KEY_PREFIX, "cordon-until");

pub const CHART_OPERATOR_CORDON_REASON_ANNOTATION: &str =
    concatcp!(CHART_OPERATOR_KEY_PREFIX, "cordon-reason");
pub const CHART_OPERATOR_CORDON_UNTIL_ANNOTATION: &str =
    concatcp!(CHART_OPERATOR_KEY_PREFIX, "cordon-until");

/// Makes chart-operator run `helm upgrade --force` for the release.
pub const FORCE_HELM_UPGRADE_ANNOTATION: &str =
    concatcp!(CHART_OPERATOR_KEY_PREFIX, "force-helm-upgrade");

pub const CLUSTER_LABEL: &str = concatcp!(GIANTSWARM_KEY_PREFIX, "cluster");
pub const ORGANIZATION_LABEL: &str = concatcp!(GIANTSWARM_KEY_PREFIX, "organization");
pub const CATALOG_TYPE_LABEL: &str = concatcp!(APPLICATION_KEY_PREFIX, "catalog-type");
pub const CATALOG_VISIBILITY_LABEL: &str = concatcp!(APPLICATION_KEY_PREFIX, "catalog-visibility");

pub const TEAM_ANNOTATION: &str = concatcp!(APPLICATION_KEY_PREFIX, "team");
pub const OWNERS_ANNOTATION: &str = concatcp!(APPLICATION_KEY_PREFIX, "owners");

/// Catalog whose Apps must follow the user config naming convention.
pub const DEFAULT_CATALOG_NAME: &str = "default";

/// Namespaces searched, in order, for a catalog when the App does not name one.
pub const CATALOG_FALLBACK_NAMESPACES: [&str; 2] = ["default", "giantswarm"];

/// Namespace holding the AppCatalogEntry resources.
pub const CATALOG_ENTRY_NAMESPACE: &str = "default";

pub const USER_CONFIG_MAP_SUFFIX: &str = "-user-values";
pub const USER_SECRET_SUFFIX: &str = "-user-secrets";

/// Maximum length of a Helm release name.
pub const RELEASE_NAME_MAX_LENGTH: usize = 53;

/// Text the Kubernetes API server puts in front of errors returned by the app admission
/// controller.
pub const APP_ADMISSION_CONTROLLER_TEXT: &str =
    r#"admission webhook "apps.app-admission-controller-unique.giantswarm.io" denied the request:"#;

pub const NGINX_INGRESS_CONTROLLER_APP_NAME: &str = "nginx-ingress-controller-app";
pub const INGRESS_CONTROLLER_CONFIG_MAP_NAME: &str = "ingress-controller-values";
