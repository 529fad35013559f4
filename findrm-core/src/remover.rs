use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, debug, info, warn};
use walkdir::WalkDir;

use crate::context::TraversalContext;
use crate::error::{RemoveError, Result};
use crate::filter::{should_delete_dir, should_delete_file};
use crate::options::RemoveOptions;
use crate::pattern::{ANY_DIR, ANY_FILE};
use crate::result::{RemovalReport, RemovedPaths};

/// 目录树删除器
///
/// 深度优先、单线程地遍历目录，删除匹配过滤条件的文件和目录。
/// 目录在处理子条目之前做出判断，在子条目处理完之后才真正删除。
#[derive(Debug, Clone, Default)]
pub struct TreeRemover {
    options: RemoveOptions,
}

impl TreeRemover {
    /// 创建新的删除器
    pub fn new(options: RemoveOptions) -> Self {
        Self { options }
    }

    /// 删除匹配的条目，返回已删除的路径
    pub fn remove<P: AsRef<Path>>(&self, root: P) -> Result<RemovedPaths> {
        Ok(self.remove_with_report(root)?.removed)
    }

    /// 删除匹配的条目，返回包含失败和跳过条目的完整报告
    pub fn remove_with_report<P: AsRef<Path>>(&self, root: P) -> Result<RemovalReport> {
        let root = root.as_ref();

        if !root.exists() {
            debug!("路径不存在，跳过: {:?}", root);
            return Ok(RemovalReport::new(self.options.test));
        }

        let start_time = Instant::now();
        let mut ctx = TraversalContext::new(&self.options)?;

        if ctx.is_test_run() {
            info!("DRY RUN: 开始查找 {:?}", root);
        } else {
            info!("开始查找并删除: {:?}", root);
        }

        Self::walk(root, 0, &mut ctx)?;

        let mut report = ctx.into_report();
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "完成: 删除 {} 个条目，失败 {} 个，跳过 {} 个，耗时 {}ms",
            report.removed.len(),
            report.failed.len(),
            report.skipped.len(),
            report.duration_ms
        );

        Ok(report)
    }

    /// 删除目录下的所有内容以及目录本身
    ///
    /// 只使用选项中的 `test` 字段，其他过滤条件全部忽略。
    pub fn remove_all<P: AsRef<Path>>(&self, root: P) -> Result<RemovedPaths> {
        let root = root.as_ref();

        if !root.exists() {
            return Ok(RemovedPaths::new());
        }

        let everything = RemoveOptions::new()
            .with_files(ANY_FILE)
            .with_dir(ANY_DIR)
            .with_test(self.options.test);
        let mut removed = TreeRemover::new(everything).remove(root)?;

        if !self.options.test {
            if let Err(e) = fs::remove_dir_all(root) {
                warn!("删除目录失败 {:?}: {}", root, e);
                return Ok(removed);
            }
        }

        removed.insert(root.to_path_buf());
        Ok(removed)
    }

    /// 递归处理一个目录
    ///
    /// 只有列出目录内容失败时才返回错误，单个条目的失败只记录在报告中。
    fn walk(dir: &Path, level: usize, ctx: &mut TraversalContext<'_>) -> Result<()> {
        if ctx.budget.is_exhausted() || !dir.exists() {
            return Ok(());
        }

        // 在删除子条目之前判断，子条目删除会改变目录的修改时间。根目录本身不删除
        let delete_dir = level > 0 && should_delete_dir(dir, level, ctx);

        if ctx.options.max_level.is_none_or(|max_level| level < max_level) {
            let entries = fs::read_dir(dir).map_err(|source| RemoveError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        debug!("读取目录条目失败 {:?}: {}", dir, e);
                        continue;
                    }
                };

                let path = entry.path();
                let metadata = match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        // 失效的符号链接或已被外部删除
                        debug!("跳过无法访问的条目 {:?}: {}", path, e);
                        ctx.report.add_skipped(path);
                        continue;
                    }
                };

                if metadata.is_dir() {
                    if let Err(e) = Self::walk(&path, level + 1, ctx) {
                        warn!("跳过目录 {:?}: {}", path, e);
                        ctx.report.add_skipped(path);
                    }
                } else if should_delete_file(&path, ctx) {
                    Self::remove_file(path, ctx);
                }
            }
        }

        if delete_dir {
            Self::remove_directory(dir, ctx);
        }

        Ok(())
    }

    fn remove_file(path: PathBuf, ctx: &mut TraversalContext<'_>) {
        if !ctx.test_run {
            if let Err(e) = fs::remove_file(&path) {
                warn!("删除文件失败 {:?}: {}", path, e);
                ctx.report.add_failure(path);
                return;
            }
        }

        debug!("删除文件: {:?}", path);
        ctx.budget.record();
        ctx.report.add_removed(path);
    }

    fn remove_directory(dir: &Path, ctx: &mut TraversalContext<'_>) {
        // 子条目可能已经用完了预算
        if ctx.budget.is_exhausted() {
            debug!("已达到删除上限，保留目录 {:?}", dir);
            return;
        }

        if !ctx.test_run {
            let remaining = if tracing::enabled!(Level::DEBUG) {
                count_entries(dir)
            } else {
                0
            };

            if let Err(e) = fs::remove_dir_all(dir) {
                warn!("删除目录失败 {:?}: {}", dir, e);
                ctx.report.add_failure(dir.to_path_buf());
                return;
            }

            debug!("删除目录: {:?}（包含 {} 个剩余条目）", dir, remaining);
        }

        // 设置了数量上限时只统计文件
        if !ctx.budget.is_limited() {
            ctx.report.add_removed(dir.to_path_buf());
        }
    }
}

/// 计算目录中剩余的条目数量
fn count_entries(dir: &Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .count()
}

/// 从 `root` 开始查找并删除匹配 `options` 的条目
pub fn remove_matching<P: AsRef<Path>>(root: P, options: &RemoveOptions) -> Result<RemovedPaths> {
    TreeRemover::new(options.clone()).remove(root)
}

/// 删除 `root` 下的所有内容以及 `root` 本身
pub fn remove_all<P: AsRef<Path>>(root: P) -> Result<RemovedPaths> {
    TreeRemover::default().remove_all(root)
}
