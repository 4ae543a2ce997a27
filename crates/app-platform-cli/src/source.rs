use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

use app_platform::{
    crd::App,
    kube,
    store::{ClusterObjectStore, InMemoryStore, KubeStore},
    yaml,
};
use clap::Args;
use snafu::ResultExt;

use crate::{
    CreateClientSnafu, Error, LoadManifestsSnafu, ParseAppSnafu, ParseAppsSnafu, ReadFileSnafu,
    ReadManifestsDirectorySnafu,
};

/// Where Catalogs, AppCatalogEntries, Apps, ConfigMaps and Secrets are looked up.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Directory of YAML manifests to use instead of the cluster of the current kubeconfig.
    #[arg(long, env = "APPCTL_MANIFESTS")]
    pub manifests: Option<PathBuf>,
}

impl SourceArgs {
    pub async fn store(&self) -> Result<Arc<dyn ClusterObjectStore>, Error> {
        match &self.manifests {
            Some(directory) => Ok(Arc::new(load_manifests(directory).await?)),
            None => {
                let client = kube::Client::try_default()
                    .await
                    .context(CreateClientSnafu)?;
                Ok(Arc::new(KubeStore::new(client)))
            }
        }
    }
}

/// Loads all `.yaml` and `.yml` files of `directory`, in file name order.
async fn load_manifests(directory: &Path) -> Result<InMemoryStore, Error> {
    let mut entries = tokio::fs::read_dir(directory)
        .await
        .context(ReadManifestsDirectorySnafu { path: directory })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .context(ReadManifestsDirectorySnafu { path: directory })?
    {
        let path = entry.path();
        if is_manifest(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut store = InMemoryStore::new();
    for path in paths {
        let input = read_file(&path).await?;
        store
            .load_manifests(&input)
            .context(LoadManifestsSnafu { path: &path })?;
        tracing::debug!(path = %path.display(), "loaded manifests");
    }

    Ok(store)
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("yaml" | "yml")
    )
}

async fn read_file(path: &Path) -> Result<String, Error> {
    tokio::fs::read_to_string(path)
        .await
        .context(ReadFileSnafu { path })
}

/// Reads all App documents of the file at `path`.
pub async fn read_apps(path: &Path) -> Result<Vec<App>, Error> {
    let input = read_file(path).await?;
    parse_apps(&input, path)
}

fn parse_apps(input: &str, path: &Path) -> Result<Vec<App>, Error> {
    yaml::parse_documents(input)
        .context(ParseAppsSnafu { path })?
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            serde_yaml::from_value(document).context(ParseAppSnafu { path, index })
        })
        .collect()
}
