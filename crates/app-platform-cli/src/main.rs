//! `appctl` renders, validates and inspects App Platform resources.
//!
//! Lookups go to the cluster of the current kubeconfig, or to a directory of manifests when
//! `--manifests` is given.
use std::{path::PathBuf, sync::Arc};

use app_platform::{
    builder::{self, AppBuilder, DEFAULT_APP_NAMESPACE, OutputFormat},
    crd,
    kube::ResourceExt,
    logging::{LogFormat, initialize_logging},
    store,
    validation::Validator,
    values::Values,
    yaml,
};
use clap::{Args, Parser, Subcommand};
use snafu::{OptionExt, ResultExt, Snafu, ensure};

use crate::source::SourceArgs;

mod source;

const APP_NAME: &str = "appctl";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to read {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to read manifests directory {path:?}"))]
    ReadManifestsDirectory {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse YAML documents of {path:?}"))]
    ParseApps { source: yaml::Error, path: PathBuf },

    #[snafu(display("failed to parse document {index} of {path:?} as App"))]
    ParseApp {
        source: serde_yaml::Error,
        path: PathBuf,
        index: usize,
    },

    #[snafu(display("failed to load manifests from {path:?}"))]
    LoadManifests {
        source: store::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to create Kubernetes client"))]
    CreateClient { source: app_platform::kube::Error },

    #[snafu(display("failed to create validator"))]
    CreateValidator { source: app_platform::error::Error },

    #[snafu(display("failed to write CustomResourceDefinitions"))]
    WriteCrds { source: yaml::Error },

    #[snafu(display("failed to render App"))]
    RenderApp { source: builder::Error },

    #[snafu(display("failed to look up catalog"))]
    FindCatalog { source: store::Error },

    #[snafu(display("catalog {catalog:?} not found"))]
    CatalogNotFound { catalog: String },

    #[snafu(display("failed to resolve values"))]
    ResolveValues { source: app_platform::error::Error },

    #[snafu(display("failed to write values"))]
    WriteValues { source: yaml::Error },

    #[snafu(display("{invalid} of {total} Apps are invalid"))]
    InvalidApps { invalid: usize, total: usize },

    #[snafu(display("expected {path:?} to contain exactly one App but found {count}"))]
    ExactlyOneApp { path: PathBuf, count: usize },
}

#[derive(Debug, Parser)]
#[command(name = APP_NAME, author, version, about)]
struct Cli {
    /// Format of the log lines written to stderr.
    #[arg(long, value_enum, default_value_t, env = "APPCTL_LOG_FORMAT", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the CustomResourceDefinitions of App, Catalog and AppCatalogEntry.
    Crd,

    /// Print a new App deployed in-cluster by the unique app-operator.
    Template(TemplateArgs),

    /// Validate Apps the way the admission controller does.
    Validate(ValidateArgs),

    /// Print the merged values of an App.
    Values(ValuesArgs),
}

#[derive(Debug, Args)]
struct TemplateArgs {
    /// Name of the App resource.
    #[arg(long)]
    name: String,

    /// Namespace of the App resource.
    #[arg(long, default_value = DEFAULT_APP_NAMESPACE)]
    namespace: String,

    #[arg(long)]
    catalog: String,

    /// Name of the chart in the catalog.
    #[arg(long)]
    app_name: String,

    /// Namespace the chart is installed into.
    #[arg(long)]
    target_namespace: String,

    #[arg(long)]
    version: String,

    /// Do not annotate the App to force Helm upgrades.
    #[arg(long)]
    disable_force_upgrade: bool,

    #[arg(long, short, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// File with one or more App documents.
    #[arg(long, short)]
    file: PathBuf,

    /// Provider of the management cluster, e.g. aws or kvm.
    #[arg(long, env = "APPCTL_PROVIDER")]
    provider: String,

    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Args)]
struct ValuesArgs {
    /// File with exactly one App document.
    #[arg(long, short)]
    file: PathBuf,

    #[command(flatten)]
    source: SourceArgs,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    initialize_logging("APPCTL_LOG", APP_NAME, cli.log_format);

    match cli.command {
        Command::Crd => crd::write_crds(std::io::stdout().lock()).context(WriteCrdsSnafu),
        Command::Template(args) => template(args),
        Command::Validate(args) => validate(args).await,
        Command::Values(args) => values(args).await,
    }
}

fn template(args: TemplateArgs) -> Result<(), Error> {
    let mut app_builder = AppBuilder::new(args.name)
        .namespace(args.namespace)
        .catalog(args.catalog)
        .app_name(args.app_name)
        .target_namespace(args.target_namespace)
        .version(args.version);
    if args.disable_force_upgrade {
        app_builder = app_builder.disable_force_upgrade();
    }

    let rendered = builder::marshal(&app_builder.build(), args.output).context(RenderAppSnafu)?;
    print!("{rendered}");
    Ok(())
}

async fn validate(args: ValidateArgs) -> Result<(), Error> {
    let apps = source::read_apps(&args.file).await?;
    let store = args.source.store().await?;
    let validator = Validator::new(store, args.provider).context(CreateValidatorSnafu)?;

    let mut invalid: usize = 0;
    for app in &apps {
        let name = app.name_any();
        match validator.validate_app(app).await {
            Ok(()) => println!("{name}: valid"),
            Err(error) => {
                invalid += 1;
                println!("{name}: {error}");
            }
        }
    }

    ensure!(invalid == 0, InvalidAppsSnafu {
        invalid,
        total: apps.len(),
    });
    Ok(())
}

async fn values(args: ValuesArgs) -> Result<(), Error> {
    let apps = source::read_apps(&args.file).await?;
    let [app] = apps.as_slice() else {
        return ExactlyOneAppSnafu {
            path: args.file,
            count: apps.len(),
        }
        .fail();
    };

    let store = args.source.store().await?;
    let catalog = store::find_catalog(store.as_ref(), app)
        .await
        .context(FindCatalogSnafu)?
        .with_context(|| CatalogNotFoundSnafu {
            catalog: app.catalog_name(),
        })?;

    let values = Values::new(Arc::clone(&store))
        .resolve_values(app, &catalog)
        .await
        .context(ResolveValuesSnafu)?;

    yaml::serialize_to_explicit_document(std::io::stdout().lock(), &values)
        .context(WriteValuesSnafu)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn template_defaults() {
        let cli = Cli::try_parse_from([
            "appctl",
            "template",
            "--name=dex-app-unique",
            "--catalog=control-plane-catalog",
            "--app-name=dex-app",
            "--target-namespace=giantswarm",
            "--version=1.2.2",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Plain);
        let Command::Template(args) = cli.command else {
            panic!("expected template command, got {:?}", cli.command);
        };
        assert_eq!(args.namespace, DEFAULT_APP_NAMESPACE);
        assert_eq!(args.output, OutputFormat::Yaml);
        assert!(!args.disable_force_upgrade);
    }

    #[rstest]
    #[case(&["appctl", "values", "-f", "app.yaml"], None)]
    #[case(
        &["appctl", "--log-format=json", "values", "-f", "app.yaml", "--manifests", "fixtures"],
        Some("fixtures")
    )]
    fn values_arguments(#[case] args: &[&str], #[case] manifests: Option<&str>) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();

        let Command::Values(values) = cli.command else {
            panic!("expected values command, got {:?}", cli.command);
        };
        assert_eq!(values.file, PathBuf::from("app.yaml"));
        assert_eq!(values.source.manifests, manifests.map(PathBuf::from));
    }

    #[test]
    fn log_format_is_global() {
        let cli = Cli::try_parse_from(["appctl", "crd", "--log-format", "json"]).unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn template_requires_a_version() {
        let result = Cli::try_parse_from([
            "appctl",
            "template",
            "--name=dex-app-unique",
            "--catalog=control-plane-catalog",
            "--app-name=dex-app",
            "--target-namespace=giantswarm",
        ]);

        assert!(result.is_err());
    }
}
