//! Directory listing and case-insensitive lookup.
//!
//! Trees are assembled on FAT-formatted devices and Windows laptops, so the
//! casing of well-known directory names (`collected-data`, `TalkingBookData`,
//! `tbdata`) is not reliable. Lookups match case-insensitively against what
//! is actually on disk and fall back to the literal name when nothing matches.

use std::fs;
use std::path::{Path, PathBuf};

use crate::path::is_visible_name;
use crate::{Error, Result};

/// Resolve `name` inside `dir`, preferring an existing entry whose name
/// matches case-insensitively.
pub fn child_ignore_case(dir: &Path, name: &str) -> PathBuf {
    let exact = dir.join(name);
    if exact.exists() {
        return exact;
    }

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let entry_name = entry.file_name();
            if entry_name.to_string_lossy().eq_ignore_ascii_case(name) {
                return entry.path();
            }
        }
    }

    exact
}

/// Resolve a chain of segments below `dir`, each one case-insensitively.
pub fn resolve_ignore_case(dir: &Path, segments: &[&str]) -> PathBuf {
    segments
        .iter()
        .fold(dir.to_path_buf(), |acc, segment| child_ignore_case(&acc, segment))
}

/// List subdirectories of `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_dir())
}

/// List subdirectories of `dir` that are not hidden or extraction cruft.
pub fn list_visible_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_dirs(dir)?
        .into_iter()
        .filter(|path| is_visible_name(&file_name(path)))
        .collect())
}

/// List regular files of `dir` whose name satisfies `accept`, sorted by name.
pub fn list_files_where(dir: &Path, accept: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    list_entries(dir, |path| path.is_file() && accept(&file_name(path)))
}

/// True when `dir` exists and contains no entries at all.
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    Ok(entries.next().is_none())
}

/// Recursively copy `src` into `dest`, keeping existing files in `dest`
/// unless `src` has a file of the same name.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<u64> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(|e| Error::io(src, e))? {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if from.is_dir() {
            copied += copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Final component of `path` as an owned string, trimmed.
///
/// Device, village and talking-book directory names are typed by hand in the
/// field and often carry stray whitespace.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

fn list_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if keep(&path) {
            out.push(path);
        }
    }
    out.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));
    Ok(out)
}
