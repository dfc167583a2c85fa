use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tb_fs::{TreePath, dir};

use super::DirectoryFormat;

/// A `(deployment, device)` pair: the unit both layouts organise sync data
/// by, nested in opposite orders.
///
/// Names compare case-insensitively; a device copied between a Windows
/// laptop and a case-sensitive disk keeps its identity.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentPerDevice {
    pub deployment: String,
    pub device: String,
}

impl DeploymentPerDevice {
    pub fn new(deployment: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            device: device.into(),
        }
    }

    /// Directory holding this pair's villages, resolved against what exists
    /// below `root`.
    pub fn root(&self, root: &Path, format: DirectoryFormat) -> PathBuf {
        match format {
            DirectoryFormat::Sync => dir::resolve_ignore_case(
                root,
                &[&self.device, TreePath::CollectedData.as_str(), &self.deployment],
            ),
            DirectoryFormat::Archive => {
                let talking_book_data =
                    dir::child_ignore_case(root, TreePath::TalkingBookData.as_str());
                let base = if talking_book_data.is_dir() {
                    talking_book_data
                } else {
                    root.to_path_buf()
                };
                dir::resolve_ignore_case(&base, &[&self.deployment, &self.device])
            }
        }
    }

    /// Like [`DeploymentPerDevice::root`], but always in the current layout.
    /// Used when writing a tree that may not exist yet.
    pub fn canonical_root(&self, root: &Path, format: DirectoryFormat) -> PathBuf {
        match format {
            DirectoryFormat::Sync => self.root(root, format),
            DirectoryFormat::Archive => dir::resolve_ignore_case(
                root,
                &[
                    TreePath::TalkingBookData.as_str(),
                    &self.deployment,
                    &self.device,
                ],
            ),
        }
    }
}

impl PartialEq for DeploymentPerDevice {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DeploymentPerDevice {}

impl PartialOrd for DeploymentPerDevice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeploymentPerDevice {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.device, &other.device)
            .then_with(|| cmp_ignore_case(&self.deployment, &other.deployment))
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_orders_by_device_then_deployment_ignoring_case() {
        let set: BTreeSet<_> = [
            DeploymentPerDevice::new("2013-05", "laptop-b"),
            DeploymentPerDevice::new("2013-04", "Laptop-B"),
            DeploymentPerDevice::new("2013-05", "LAPTOP-a"),
            DeploymentPerDevice::new("2013-05", "laptop-A"),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = set
            .iter()
            .map(|d| format!("{}/{}", d.device, d.deployment))
            .collect();
        assert_eq!(order, ["LAPTOP-a/2013-05", "Laptop-B/2013-04", "laptop-b/2013-05"]);
    }

    #[test]
    fn test_archive_root_falls_back_to_older_layout() {
        let temp = TempDir::new().unwrap();
        let dpd = DeploymentPerDevice::new("2013-05", "laptop");
        assert_eq!(
            dpd.root(temp.path(), DirectoryFormat::Archive),
            temp.path().join("2013-05").join("laptop")
        );

        fs::create_dir_all(temp.path().join("talkingbookdata/2013-05/LAPTOP")).unwrap();
        assert_eq!(
            dpd.root(temp.path(), DirectoryFormat::Archive),
            temp.path().join("talkingbookdata/2013-05/LAPTOP")
        );
    }

    #[test]
    fn test_sync_root_resolves_case_insensitively() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("laptop/Collected-Data/2013-05")).unwrap();
        let dpd = DeploymentPerDevice::new("2013-05", "laptop");
        assert_eq!(
            dpd.root(temp.path(), DirectoryFormat::Sync),
            temp.path().join("laptop/Collected-Data/2013-05")
        );
    }
}
