use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{RemoveError, Result};

/// 单个值或值列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// 判断是否包含给定的值
    pub fn contains(&self, value: &str) -> bool {
        match self {
            OneOrMany::One(one) => one == value,
            OneOrMany::Many(many) => many.iter().any(|item| item == value),
        }
    }

    /// 空字符串视为未设置
    pub fn is_unset(&self) -> bool {
        matches!(self, OneOrMany::One(one) if one.is_empty())
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// 年龄过滤选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeOptions {
    /// 距离最后修改时间的最少秒数
    pub seconds: Option<u64>,
}

/// 查找删除选项
///
/// 所有字段默认均为“未设置”，此时不会删除任何内容。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoveOptions {
    /// 要删除的目录名（`"*"` 匹配所有目录）
    pub dir: Option<OneOrMany>,
    /// 要删除的文件名（`"*.*"` 匹配所有文件）
    pub files: Option<OneOrMany>,
    /// 要删除的扩展名，包含前导点，例如 `".bak"`
    pub extensions: Option<OneOrMany>,
    /// 永不删除的文件名
    pub ignore: Option<OneOrMany>,
    /// 文件名前缀
    pub prefix: Option<String>,
    /// 将 `dir` / `files` 作为正则表达式匹配
    pub regex: bool,
    /// 最大深度（包含），根目录为0
    pub max_level: Option<usize>,
    /// 最小年龄
    pub age: Option<AgeOptions>,
    /// 最多删除的文件数
    pub limit: Option<usize>,
    /// 试运行，不修改文件系统
    pub test: bool,
}

impl RemoveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, dir: impl Into<OneOrMany>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_files(mut self, files: impl Into<OneOrMany>) -> Self {
        self.files = Some(files.into());
        self
    }

    pub fn with_extensions(mut self, extensions: impl Into<OneOrMany>) -> Self {
        self.extensions = Some(extensions.into());
        self
    }

    pub fn with_ignore(mut self, ignore: impl Into<OneOrMany>) -> Self {
        self.ignore = Some(ignore.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = Some(max_level);
        self
    }

    pub fn with_age_seconds(mut self, seconds: u64) -> Self {
        self.age = Some(AgeOptions {
            seconds: Some(seconds),
        });
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// 年龄阈值，0秒视为未设置
    pub fn age_threshold(&self) -> Option<Duration> {
        self.age
            .as_ref()
            .and_then(|age| age.seconds)
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }

    /// 非空的前缀
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|prefix| !prefix.is_empty())
    }

    /// 非空的忽略列表
    pub fn ignore(&self) -> Option<&OneOrMany> {
        self.ignore.as_ref().filter(|ignore| !ignore.is_unset())
    }

    /// 非空的扩展名列表
    pub fn extensions(&self) -> Option<&OneOrMany> {
        self.extensions
            .as_ref()
            .filter(|extensions| !extensions.is_unset())
    }

    /// 从TOML字符串解析选项
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 从TOML配置文件加载选项
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RemoveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let options = Self::from_toml_str(&content).map_err(|source| RemoveError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("已加载配置文件: {:?}", path);
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_options_are_inert() {
        let options = RemoveOptions::default();
        assert!(options.dir.is_none());
        assert!(options.files.is_none());
        assert!(options.extensions().is_none());
        assert!(options.ignore().is_none());
        assert!(options.prefix().is_none());
        assert!(options.age_threshold().is_none());
        assert!(options.limit.is_none());
        assert!(options.max_level.is_none());
        assert!(!options.regex);
        assert!(!options.test);
    }

    #[test]
    fn test_one_or_many_contains() {
        let one = OneOrMany::from(".bak");
        assert!(one.contains(".bak"));
        assert!(!one.contains(".log"));

        let many = OneOrMany::from(vec![".bak", ".log"]);
        assert!(many.contains(".log"));
        assert!(!many.contains(".csv"));
        assert_eq!(
            many,
            OneOrMany::Many(vec![".bak".to_string(), ".log".to_string()])
        );
    }

    #[test]
    fn test_empty_values_are_unset() {
        let options = RemoveOptions::new()
            .with_prefix("")
            .with_ignore("")
            .with_extensions("")
            .with_age_seconds(0);

        assert!(options.prefix().is_none());
        assert!(options.ignore().is_none());
        assert!(options.extensions().is_none());
        assert!(options.age_threshold().is_none());
    }

    #[test]
    fn test_from_toml_str() {
        let options = RemoveOptions::from_toml_str(
            r#"
dir = ["CVS", "node_modules"]
extensions = ".bak"
maxLevel = 3
limit = 10
test = true

[age]
seconds = 3600
"#,
        )
        .unwrap();

        assert_eq!(
            options.dir,
            Some(OneOrMany::from(vec!["CVS", "node_modules"]))
        );
        assert_eq!(options.extensions, Some(OneOrMany::from(".bak")));
        assert_eq!(options.max_level, Some(3));
        assert_eq!(options.limit, Some(10));
        assert!(options.test);
        assert_eq!(options.age_threshold(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_load_missing_and_invalid_file() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(
            RemoveOptions::load(&missing),
            Err(RemoveError::Io { .. })
        ));

        let invalid = temp_dir.path().join("invalid.toml");
        std::fs::write(&invalid, "limit = \"many\"").unwrap();
        assert!(matches!(
            RemoveOptions::load(&invalid),
            Err(RemoveError::Config { .. })
        ));
    }
}
