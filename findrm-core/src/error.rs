use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 删除操作的错误类型
///
/// 单个条目的删除失败不会产生错误，只会记录日志并出现在
/// [`RemovalReport::failed`](crate::RemovalReport) 中。
#[derive(Debug, Error)]
pub enum RemoveError {
    /// 无法列出根目录内容（例如根路径是一个普通文件）
    #[error("无法读取目录 {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 正则表达式无法编译
    #[error("无效的正则表达式 {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 配置文件解析失败
    #[error("无法解析配置文件 {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 其他I/O错误
    #[error("I/O错误 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RemoveError {
    /// 获取与错误关联的路径
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadDir { path, .. } | Self::Config { path, .. } | Self::Io { path, .. } => {
                Some(path)
            }
            Self::InvalidPattern { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RemoveError>;
