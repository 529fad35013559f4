use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

use crate::error::Result;
use crate::options::RemoveOptions;
use crate::pattern::{ANY_DIR, ANY_FILE, NamePattern};
use crate::result::RemovalReport;

/// 删除数量预算，在一次顶层调用的所有递归层级间共享
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalBudget {
    limit: Option<usize>,
    removed: usize,
}

impl RemovalBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit, removed: 0 }
    }

    /// 是否配置了数量上限
    pub fn is_limited(&self) -> bool {
        self.limit.is_some()
    }

    /// 已达到上限后不再删除任何内容
    pub fn is_exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.removed >= limit)
    }

    pub fn record(&mut self) {
        if self.is_limited() {
            self.removed += 1;
        }
    }

    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// 一次顶层调用的遍历状态
///
/// 在最外层调用时创建，以可变引用贯穿整个递归过程，调用结束即丢弃。
#[derive(Debug)]
pub struct TraversalContext<'a> {
    pub(crate) options: &'a RemoveOptions,
    pub(crate) dir_pattern: Option<NamePattern>,
    pub(crate) file_pattern: Option<NamePattern>,
    pub(crate) now: SystemTime,
    pub(crate) test_run: bool,
    pub(crate) budget: RemovalBudget,
    pub(crate) report: RemovalReport,
}

impl<'a> TraversalContext<'a> {
    /// 编译过滤条件并记录当前时间
    pub fn new(options: &'a RemoveOptions) -> Result<Self> {
        Self::with_now(options, SystemTime::now())
    }

    /// 使用指定的时间快照创建上下文
    pub fn with_now(options: &'a RemoveOptions, now: SystemTime) -> Result<Self> {
        let dir_pattern = match &options.dir {
            Some(dir) => NamePattern::compile(dir, ANY_DIR, options.regex)?,
            None => None,
        };
        let file_pattern = match &options.files {
            Some(files) => NamePattern::compile(files, ANY_FILE, options.regex)?,
            None => None,
        };

        Ok(Self {
            options,
            dir_pattern,
            file_pattern,
            now,
            test_run: options.test,
            budget: RemovalBudget::new(options.limit),
            report: RemovalReport::new(options.test),
        })
    }

    pub fn is_test_run(&self) -> bool {
        self.test_run
    }

    /// 判断路径的最后修改时间是否早于 `now - age`
    pub fn is_older_than(&self, path: &Path, age: Duration) -> bool {
        let modified = match std::fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                debug!("无法获取修改时间 {:?}: {}", path, e);
                return false;
            }
        };

        match self.now.duration_since(modified) {
            Ok(elapsed) => elapsed > age,
            // 修改时间在未来
            Err(_) => false,
        }
    }

    pub(crate) fn into_report(self) -> RemovalReport {
        self.report
    }
}
