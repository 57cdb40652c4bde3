//! Copy, append and cleanup primitives
//!
//! Symbolic links are never dereferenced: a link in the source becomes a link
//! in the destination, and an existing link at the destination is replaced
//! rather than written through.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Append one line to a file, creating the file and its parents if needed.
///
/// The file is opened, written and closed on every call so each line is on
/// disk before the caller moves on.
pub fn append_line(path: &NormalizedPath, line: &str) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())
        .map_err(|e| Error::io(&native_path, e))
}

/// Check whether a directory has no entries.
pub fn is_dir_empty(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    let mut entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(entries.next().is_none())
}

/// Create a directory and all of its parents.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Delete a single file or symbolic link.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Copy one file, preserving a symbolic link as a link.
///
/// The destination's parent directory is created when missing. Whatever
/// currently occupies the destination is replaced.
pub fn copy_file(source: &NormalizedPath, destination: &NormalizedPath) -> Result<()> {
    let src = source.to_native();
    let dst = destination.to_native();

    if let Some(parent) = dst.parent()
        && !parent.exists()
    {
        tracing::debug!(?parent, "Creating destination directory");
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    copy_entry(&src, &dst)
}

/// Recursively copy a directory tree into `destination`.
///
/// Entries already present in the destination are overwritten; entries only
/// present in the destination are left alone. Returns the number of files and
/// links written.
pub fn copy_tree(source: &NormalizedPath, destination: &NormalizedPath) -> Result<usize> {
    let src = source.to_native();
    let dst = destination.to_native();

    ensure_real_dir(&dst)?;

    let mut written = 0;
    let walker = WalkDir::new(&src)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.clone());
            Error::io(path, e.into())
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(&src)
            .map_err(|e| Error::io(entry.path(), std::io::Error::other(e)))?;
        let new_path = dst.join(rel_path);

        if entry.file_type().is_dir() {
            ensure_real_dir(&new_path)?;
        } else {
            copy_entry(entry.path(), &new_path)?;
            written += 1;
        }
    }

    Ok(written)
}

/// Remove every empty directory below `root`, children before parents.
///
/// `root` itself is never removed. Directories for which `keep` returns true
/// are neither descended into nor removed. Returns the number of directories
/// removed.
pub fn remove_empty_dirs(root: &NormalizedPath, keep: impl Fn(&Path) -> bool) -> Result<usize> {
    let native_root = root.to_native();
    if !native_root.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    sweep_empty_children(&native_root, &keep, &mut removed)?;
    Ok(removed)
}

/// Post-order pass over `dir`. Returns true when `dir` is empty afterwards.
fn sweep_empty_children(
    dir: &Path,
    keep: &dyn Fn(&Path) -> bool,
    removed: &mut usize,
) -> Result<bool> {
    let mut remaining = 0usize;

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() && !keep(&path) && sweep_empty_children(&path, keep, removed)? {
            fs::remove_dir(&path).map_err(|e| Error::io(&path, e))?;
            tracing::debug!(?path, "Removed empty directory");
            *removed += 1;
            continue;
        }

        remaining += 1;
    }

    Ok(remaining == 0)
}

/// Copy a single non-directory entry, replacing what is at `dst`.
fn copy_entry(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(|e| Error::io(src, e))?;

    if meta.file_type().is_symlink() {
        let target = fs::read_link(src).map_err(|e| Error::io(src, e))?;
        clear_destination(dst)?;
        make_symlink(&target, dst).map_err(|e| Error::io(dst, e))?;
        return Ok(());
    }

    // fs::copy onto an existing link would write into the link target
    if let Ok(existing) = fs::symlink_metadata(dst)
        && (existing.file_type().is_symlink() || existing.is_dir())
    {
        clear_destination(dst)?;
    }

    fs::copy(src, dst).map_err(|e| Error::io(dst, e))?;
    Ok(())
}

/// Make sure `path` is a real directory, replacing a file or link in the way.
fn ensure_real_dir(path: &Path) -> Result<()> {
    if let Ok(existing) = fs::symlink_metadata(path)
        && !existing.is_dir()
    {
        clear_destination(path)?;
    }
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

fn clear_destination(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(|e| Error::io(path, e)),
        Ok(_) => fs::remove_file(path).map_err(|e| Error::io(path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
