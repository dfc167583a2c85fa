//! Where things live in each tree layout.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tb_fs::{TreePath, dir, is_visible_name};

use crate::Result;
use crate::model::{DeploymentPerDevice, DirectoryFormat};

/// Deployment directory names: `2013-05`, `2014-02b`.
pub static DEPLOYMENT_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\w+)$").unwrap());

/// `tbData-2013-05-02...`, written by older loaders without a header row.
pub static LEDGER_LEGACY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tbData-(\d+)-(\d+)-(\d+).*$").unwrap());

/// `tbData-v03-2014y05m02d-9d8839de.csv`
pub static LEDGER_VERSIONED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^tbData-v(\d+)-(\d+)y(\d+)m(\d+)d-(.*)\.csv$").unwrap()
});

const UNKNOWN_DEPLOYMENT: &str = "UNKNOWN";

/// Find the processing roots below a directory a package was unpacked into.
///
/// Packages arrive in a few shapes: the tree itself, a tree wrapped in
/// `collected-data`, an account folder holding `collected-data/<project>`,
/// or several trees side by side.
pub fn detect_roots(unpacked: &Path) -> Result<Vec<PathBuf>> {
    let base = unwrap_package(unpacked)?;

    if is_single_root(&base)? {
        return Ok(vec![base]);
    }
    Ok(dir::list_visible_dirs(&base)?)
}

fn unwrap_package(unpacked: &Path) -> Result<PathBuf> {
    let collected = dir::child_ignore_case(unpacked, TreePath::CollectedData.as_str());
    if collected.is_dir() {
        return Ok(collected);
    }

    let Some(account) = dir::list_visible_dirs(unpacked)?.into_iter().next() else {
        return Ok(unpacked.to_path_buf());
    };
    let collected = dir::child_ignore_case(&account, TreePath::CollectedData.as_str());
    if !collected.is_dir() {
        return Ok(unpacked.to_path_buf());
    }

    let projects = dir::list_visible_dirs(&collected)?;
    // Deployments directly below mean `account` is a device of a sync tree.
    if projects
        .iter()
        .any(|p| DEPLOYMENT_DIR.is_match(&dir::file_name(p)))
    {
        return Ok(unpacked.to_path_buf());
    }

    match projects.as_slice() {
        [project] => {
            tracing::debug!(project = %project.display(), "using project directory");
            Ok(project.clone())
        }
        _ => Ok(collected),
    }
}

fn is_single_root(base: &Path) -> Result<bool> {
    if dir::child_ignore_case(base, TreePath::TalkingBookData.as_str()).is_dir()
        || base.join(TreePath::Manifest.as_str()).is_file()
    {
        return Ok(true);
    }

    // A device of a sync tree, or a deployment of the older archive layout.
    Ok(dir::list_visible_dirs(base)?.iter().any(|child| {
        dir::child_ignore_case(child, TreePath::CollectedData.as_str()).is_dir()
            || DEPLOYMENT_DIR.is_match(&dir::file_name(child))
    }))
}

/// Every `(deployment, device)` pair present under `root`.
pub fn discover_deployments(
    root: &Path,
    format: DirectoryFormat,
) -> Result<BTreeSet<DeploymentPerDevice>> {
    let mut found = BTreeSet::new();

    match format {
        DirectoryFormat::Sync => {
            for device in dir::list_visible_dirs(root)? {
                let collected = dir::child_ignore_case(&device, TreePath::CollectedData.as_str());
                if !collected.is_dir() {
                    continue;
                }
                for deployment in dir::list_dirs(&collected)? {
                    let name = dir::file_name(&deployment);
                    if DEPLOYMENT_DIR.is_match(&name) {
                        found.insert(DeploymentPerDevice::new(name, dir::file_name(&device)));
                    }
                }
            }
        }
        DirectoryFormat::Archive => {
            let talking_book_data =
                dir::child_ignore_case(root, TreePath::TalkingBookData.as_str());
            let base = if talking_book_data.is_dir() {
                talking_book_data
            } else {
                root.to_path_buf()
            };
            for deployment in dir::list_visible_dirs(&base)? {
                let name = dir::file_name(&deployment);
                if !DEPLOYMENT_DIR.is_match(&name) && !name.eq_ignore_ascii_case(UNKNOWN_DEPLOYMENT) {
                    continue;
                }
                for device in dir::list_visible_dirs(&deployment)? {
                    found.insert(DeploymentPerDevice::new(name.clone(), dir::file_name(&device)));
                }
            }
        }
    }

    Ok(found)
}

/// Devices with operational data, unioned with the devices of
/// `deployments`. Sorted and distinct, ignoring case.
pub fn operational_devices(
    root: &Path,
    format: DirectoryFormat,
    deployments: &BTreeSet<DeploymentPerDevice>,
) -> Result<Vec<String>> {
    let mut devices: BTreeMap<String, String> = BTreeMap::new();
    let mut add = |name: String| {
        devices.entry(name.to_lowercase()).or_insert(name);
    };

    for deployment in deployments {
        add(deployment.device.clone());
    }

    match format {
        DirectoryFormat::Sync => {
            for device in dir::list_visible_dirs(root)? {
                if dir::child_ignore_case(&device, TreePath::CollectedData.as_str()).is_dir() {
                    add(dir::file_name(&device));
                }
            }
        }
        DirectoryFormat::Archive => {
            for base in [
                dir::resolve_ignore_case(root, &[TreePath::OperationalData.as_str()]),
                dir::resolve_ignore_case(
                    root,
                    &[TreePath::Operations.as_str(), TreePath::TbData.as_str()],
                ),
            ] {
                if base.is_dir() {
                    for device in dir::list_visible_dirs(&base)? {
                        add(dir::file_name(&device));
                    }
                }
            }
        }
    }

    Ok(devices.into_values().collect())
}

/// Directory holding `device`'s ledger files.
pub fn ledger_dir(root: &Path, device: &str, format: DirectoryFormat) -> PathBuf {
    match format {
        DirectoryFormat::Sync => {
            dir::resolve_ignore_case(root, &[device, TreePath::CollectedData.as_str()])
        }
        DirectoryFormat::Archive => {
            let current = canonical_ledger_dir(root, device, format);
            if current.is_dir() {
                return current;
            }
            let older = dir::resolve_ignore_case(
                root,
                &[TreePath::Operations.as_str(), TreePath::TbData.as_str(), device],
            );
            if older.is_dir() { older } else { current }
        }
    }
}

/// Ledger directory in the current layout, existing or not.
pub fn canonical_ledger_dir(root: &Path, device: &str, format: DirectoryFormat) -> PathBuf {
    match format {
        DirectoryFormat::Sync => ledger_dir(root, device, format),
        DirectoryFormat::Archive => dir::resolve_ignore_case(
            root,
            &[TreePath::OperationalData.as_str(), device, TreePath::TbData.as_str()],
        ),
    }
}

/// Directory holding `device`'s TB-loader logs.
pub fn tbloader_log_dir(root: &Path, device: &str, format: DirectoryFormat) -> PathBuf {
    match format {
        DirectoryFormat::Sync => dir::resolve_ignore_case(
            root,
            &[device, TreePath::CollectedData.as_str(), TreePath::TbLoaderLogs.as_str()],
        ),
        DirectoryFormat::Archive => dir::resolve_ignore_case(
            root,
            &[TreePath::OperationalData.as_str(), device, TreePath::TbLoaderLogs.as_str()],
        ),
    }
}

/// Ledger files for `device`, sorted, each with whether its first row is a
/// header.
pub fn ledger_files(
    root: &Path,
    device: &str,
    format: DirectoryFormat,
) -> Result<Vec<(PathBuf, bool)>> {
    let dir_path = ledger_dir(root, device, format);
    if !dir_path.is_dir() {
        return Ok(Vec::new());
    }

    let files = match format {
        DirectoryFormat::Sync => dir::list_files_where(&dir_path, |name| {
            LEDGER_LEGACY.is_match(name) || LEDGER_VERSIONED.is_match(name)
        })?,
        DirectoryFormat::Archive => {
            dir::list_files_where(&dir_path, |name| LEDGER_VERSIONED.is_match(name))?
        }
    };
    let includes_headers = format == DirectoryFormat::Archive;
    Ok(files.into_iter().map(|f| (f, includes_headers)).collect())
}

/// TB-loader log files for `device`, sorted.
pub fn tbloader_log_files(root: &Path, device: &str, format: DirectoryFormat) -> Result<Vec<PathBuf>> {
    let dir_path = tbloader_log_dir(root, device, format);
    if !dir_path.is_dir() {
        return Ok(Vec::new());
    }
    Ok(dir::list_files_where(&dir_path, is_visible_name)?)
}
