use kube::ResourceExt;

use crate::{
    constants::{OWNERS_ANNOTATION, TEAM_ANNOTATION},
    crd::catalog_entry::v1alpha1::{AppCatalogEntry, Restrictions},
};

impl AppCatalogEntry {
    /// Name of the entry for the given chart version, `<catalog>-<app>-<version>`.
    pub fn entry_name(catalog_name: &str, app_name: &str, app_version: &str) -> String {
        format!("{catalog_name}-{app_name}-{app_version}")
    }

    pub fn restrictions(&self) -> Option<&Restrictions> {
        self.spec.restrictions.as_ref()
    }

    pub fn team(&self) -> Option<&str> {
        self.annotations().get(TEAM_ANNOTATION).map(String::as_str)
    }

    pub fn owners(&self) -> Option<&str> {
        self.annotations().get(OWNERS_ANNOTATION).map(String::as_str)
    }
}

impl Restrictions {
    pub fn is_compatible_with(&self, provider: &str) -> bool {
        self.compatible_providers.is_empty()
            || self
                .compatible_providers
                .iter()
                .any(|compatible| compatible == provider)
    }

    pub fn requires_singleton(&self) -> bool {
        self.cluster_singleton || self.namespace_singleton
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&[], "aws", true)]
    #[case(&["aws", "azure"], "aws", true)]
    #[case(&["azure"], "aws", false)]
    fn provider_compatibility(
        #[case] providers: &[&str],
        #[case] provider: &str,
        #[case] expected: bool,
    ) {
        let restrictions = Restrictions {
            compatible_providers: providers.iter().map(|p| (*p).to_owned()).collect(),
            ..Default::default()
        };

        assert_eq!(restrictions.is_compatible_with(provider), expected);
    }

    #[test]
    fn entry_name() {
        assert_eq!(
            AppCatalogEntry::entry_name("control-plane-catalog", "dex-app", "1.2.2"),
            "control-plane-catalog-dex-app-1.2.2"
        );
    }
}
