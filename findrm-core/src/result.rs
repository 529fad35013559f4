use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// 已删除（试运行时为将被删除）的路径集合
///
/// 序列化为 `{ "<path>": true }` 形式的映射。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedPaths {
    paths: BTreeSet<PathBuf>,
}

impl RemovedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.paths.contains(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl Extend<PathBuf> for RemovedPaths {
    fn extend<T: IntoIterator<Item = PathBuf>>(&mut self, iter: T) {
        self.paths.extend(iter);
    }
}

impl FromIterator<PathBuf> for RemovedPaths {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RemovedPaths {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl Serialize for RemovedPaths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.paths.len()))?;
        for path in &self.paths {
            map.serialize_entry(&path.to_string_lossy(), &true)?;
        }
        map.end()
    }
}

/// 一次删除调用的完整报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalReport {
    pub removed: RemovedPaths,
    /// 删除调用失败的条目
    pub failed: Vec<PathBuf>,
    /// 无法读取元数据或目录内容而被跳过的条目
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl RemovalReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn add_removed(&mut self, path: PathBuf) {
        self.removed.insert(path);
    }

    pub fn add_failure(&mut self, path: PathBuf) {
        self.failed.push(path);
    }

    pub fn add_skipped(&mut self, path: PathBuf) {
        self.skipped.push(path);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}
