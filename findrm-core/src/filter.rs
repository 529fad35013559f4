use std::path::Path;
use tracing::debug;

use crate::context::TraversalContext;

/// 获取路径的最后一段名称
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 获取文件扩展名（包含前导点）
///
/// 从最后一个点开始截取。最后一个点位于开头（如 `.bashrc`）或名称为 `..` 时没有扩展名。
pub fn extension_with_dot(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(_) if name == ".." => "",
        Some(pos) => &name[pos..],
    }
}

/// 判断目录是否应该删除
///
/// 只根据目录自身的名称、深度和年龄做出判断，目录内容由调用方处理。
pub fn should_delete_dir(dir_path: &Path, level: usize, ctx: &TraversalContext<'_>) -> bool {
    let Some(pattern) = &ctx.dir_pattern else {
        return false;
    };

    let name = basename(dir_path);
    if !pattern.matches(&name) {
        return false;
    }

    // 检查数量预算
    if ctx.budget.is_exhausted() {
        debug!("已达到删除上限，保留目录 {:?}", dir_path);
        return false;
    }

    // 检查深度
    if let Some(max_level) = ctx.options.max_level {
        if level > max_level {
            debug!("目录 {:?} 深度 {} 超过 {}，保留", dir_path, level, max_level);
            return false;
        }
    }

    // 检查年龄
    if let Some(age) = ctx.options.age_threshold() {
        if !ctx.is_older_than(dir_path, age) {
            debug!("目录 {:?} 最近被修改过，保留", dir_path);
            return false;
        }
    }

    true
}

/// 判断文件是否应该删除
///
/// 默认不删除任何文件，只有 `files`、`extensions` 或 `prefix` 命中时才会删除。
pub fn should_delete_file(file_path: &Path, ctx: &TraversalContext<'_>) -> bool {
    let options = ctx.options;
    let name = basename(file_path);

    let mut matched = ctx
        .file_pattern
        .as_ref()
        .is_some_and(|pattern| pattern.matches(&name));

    if !matched {
        if let Some(extensions) = options.extensions() {
            matched = extensions.contains(extension_with_dot(&name));
        }
    }

    if !matched {
        if let Some(prefix) = options.prefix() {
            matched = name.starts_with(prefix);
        }
    }

    if !matched {
        return false;
    }

    if ctx.budget.is_exhausted() {
        return false;
    }

    // 忽略列表优先于所有匹配条件
    if options.ignore().is_some_and(|ignore| ignore.contains(&name)) {
        debug!("文件 {:?} 在忽略列表中，保留", file_path);
        return false;
    }

    if let Some(age) = options.age_threshold() {
        if !ctx.is_older_than(file_path, age) {
            debug!("文件 {:?} 最近被修改过，保留", file_path);
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RemoveOptions;
    use std::fs::File;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn file_matches(options: &RemoveOptions, path: &str) -> bool {
        let ctx = TraversalContext::new(options).unwrap();
        should_delete_file(Path::new(path), &ctx)
    }

    fn dir_matches(options: &RemoveOptions, path: &str, level: usize) -> bool {
        let ctx = TraversalContext::new(options).unwrap();
        should_delete_dir(Path::new(path), level, &ctx)
    }

    #[test]
    fn test_extension_with_dot() {
        assert_eq!(extension_with_dot("a.bak"), ".bak");
        assert_eq!(extension_with_dot("archive.tar.gz"), ".gz");
        assert_eq!(extension_with_dot("README"), "");
        assert_eq!(extension_with_dot(".bashrc"), "");
        assert_eq!(extension_with_dot(".config.toml"), ".toml");
        assert_eq!(extension_with_dot("trailing."), ".");
        assert_eq!(extension_with_dot("..foo"), ".foo");
        assert_eq!(extension_with_dot("..."), ".");
        assert_eq!(extension_with_dot(".."), "");
    }

    #[test]
    fn test_no_options_deletes_nothing() {
        let options = RemoveOptions::default();
        assert!(!file_matches(&options, "root/a.log"));
        assert!(!dir_matches(&options, "root/sub", 1));

        // 只有maxLevel时同样不删除
        let options = RemoveOptions::new().with_max_level(3);
        assert!(!file_matches(&options, "root/a.log"));
        assert!(!dir_matches(&options, "root/sub", 1));
    }

    #[test]
    fn test_file_filter_by_files() {
        let options = RemoveOptions::new().with_files("a.log");
        assert!(file_matches(&options, "root/a.log"));
        assert!(!file_matches(&options, "root/b.log"));

        let options = RemoveOptions::new().with_files("*.*");
        assert!(file_matches(&options, "root/anything"));

        let options = RemoveOptions::new().with_files(vec!["a.log", "c.log"]);
        assert!(file_matches(&options, "root/sub/c.log"));
        assert!(!file_matches(&options, "root/b.log"));
    }

    #[test]
    fn test_file_filter_by_extension_and_prefix() {
        let options = RemoveOptions::new().with_extensions(".bak");
        assert!(file_matches(&options, "root/a.bak"));
        assert!(!file_matches(&options, "root/a.BAK"));
        assert!(!file_matches(&options, "root/bak"));
        assert!(file_matches(&options, "root/..bak"));

        let options = RemoveOptions::new().with_extensions(vec![".bak", ".log"]);
        assert!(file_matches(&options, "root/a.log"));
        assert!(!file_matches(&options, "root/a.csv"));

        let options = RemoveOptions::new().with_prefix("someth");
        assert!(file_matches(&options, "root/something.jpg"));
        assert!(!file_matches(&options, "root/nothing.jpg"));
    }

    #[test]
    fn test_file_filter_regex() {
        let options = RemoveOptions::new().with_files("thing").with_regex(true);
        assert!(file_matches(&options, "root/something.jpg"));
        assert!(!file_matches(&options, "root/other.jpg"));
    }

    #[test]
    fn test_ignore_wins() {
        let options = RemoveOptions::new()
            .with_files("*.*")
            .with_ignore(vec!["keep.jpg", "keep.png"]);
        assert!(!file_matches(&options, "root/keep.jpg"));
        assert!(!file_matches(&options, "root/keep.png"));
        assert!(file_matches(&options, "root/drop.png"));

        let options = RemoveOptions::new()
            .with_extensions(".jpg")
            .with_prefix("keep")
            .with_ignore("keep.jpg");
        assert!(!file_matches(&options, "root/keep.jpg"));
    }

    #[test]
    fn test_budget_exhausted_blocks_matches() {
        let options = RemoveOptions::new()
            .with_files("*.*")
            .with_dir("*")
            .with_limit(0);
        assert!(!file_matches(&options, "root/a.log"));
        assert!(!dir_matches(&options, "root/sub", 1));
    }

    #[test]
    fn test_dir_filter() {
        let options = RemoveOptions::new().with_dir("CVS");
        assert!(dir_matches(&options, "root/CVS", 1));
        assert!(dir_matches(&options, "root/a/CVS", 2));
        assert!(!dir_matches(&options, "root/CVSROOT", 1));

        let options = RemoveOptions::new().with_dir(vec!["a", "b"]);
        assert!(dir_matches(&options, "root/b", 1));
        assert!(!dir_matches(&options, "root/c", 1));

        let options = RemoveOptions::new().with_dir("^token").with_regex(true);
        assert!(dir_matches(&options, "root/token_dir", 1));
        assert!(!dir_matches(&options, "root/dir_token", 1));
    }

    #[test]
    fn test_dir_filter_max_level() {
        let options = RemoveOptions::new().with_dir("*").with_max_level(2);
        assert!(dir_matches(&options, "root/a", 1));
        assert!(dir_matches(&options, "root/a/b", 2));
        assert!(!dir_matches(&options, "root/a/b/c", 3));
    }

    #[test]
    fn test_age_filters() {
        let temp_dir = TempDir::new().unwrap();
        let old_file: PathBuf = temp_dir.path().join("old.log");
        let new_file: PathBuf = temp_dir.path().join("new.log");
        let now = SystemTime::now();

        File::create(&old_file)
            .unwrap()
            .set_modified(now - Duration::from_secs(5))
            .unwrap();
        File::create(&new_file).unwrap().set_modified(now).unwrap();

        let options = RemoveOptions::new()
            .with_extensions(".log")
            .with_age_seconds(3);
        let ctx = TraversalContext::with_now(&options, now).unwrap();

        assert!(should_delete_file(&old_file, &ctx));
        assert!(!should_delete_file(&new_file, &ctx));

        let old_dir = temp_dir.path().join("old_dir");
        std::fs::create_dir(&old_dir).unwrap();
        let options = RemoveOptions::new().with_dir("old_dir").with_age_seconds(3);
        let ctx = TraversalContext::with_now(&options, now).unwrap();
        assert!(!should_delete_dir(&old_dir, 1, &ctx));

        let later = SystemTime::now() + Duration::from_secs(60);
        let ctx = TraversalContext::with_now(&options, later).unwrap();
        assert!(should_delete_dir(&old_dir, 1, &ctx));
    }
}
