use std::collections::HashSet;

use confsync_fs::{NormalizedPath, is_path_inside};

/// Store paths that must survive a sweep.
///
/// Built fresh on every run and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidSet {
    files: HashSet<NormalizedPath>,
    directories: Vec<NormalizedPath>,
}

impl ValidSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&mut self, path: NormalizedPath) {
        self.files.insert(path);
    }

    pub fn insert_directory(&mut self, path: NormalizedPath) {
        if !self.directories.contains(&path) {
            self.directories.push(path);
        }
    }

    pub fn files(&self) -> &HashSet<NormalizedPath> {
        &self.files
    }

    pub fn directories(&self) -> &[NormalizedPath] {
        &self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Whether a store file is still referenced: it is a valid file itself or
    /// lies below a valid directory.
    pub fn retains(&self, path: &NormalizedPath) -> bool {
        self.files.contains(path) || self.directories.iter().any(|dir| is_path_inside(path, dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retains_marked_files() {
        let mut set = ValidSet::new();
        set.insert_file("/backup/.bashrc".into());

        assert!(set.retains(&"/backup/.bashrc".into()));
        assert!(!set.retains(&"/backup/.bashrc.bak".into()));
    }

    #[test]
    fn test_retains_anything_below_marked_directory() {
        let mut set = ValidSet::new();
        set.insert_directory("/backup/.vim".into());

        assert!(set.retains(&"/backup/.vim/colors/x.vim".into()));
        assert!(!set.retains(&"/backup/.vimrc".into()));
        assert!(!set.retains(&"/backup/.vim2/file".into()));
    }

    #[test]
    fn test_directories_are_not_duplicated() {
        let mut set = ValidSet::new();
        set.insert_directory("/backup/.vim".into());
        set.insert_directory("/backup/.vim".into());
        assert_eq!(set.directories().len(), 1);
    }
}
