use regex::Regex;

use crate::error::{RemoveError, Result};
use crate::options::OneOrMany;

/// 匹配所有目录的通配符
pub const ANY_DIR: &str = "*";
/// 匹配所有文件的通配符
pub const ANY_FILE: &str = "*.*";

/// 文件名匹配策略
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// 通配符，匹配任意名称
    Any,
    /// 精确匹配
    Exact(String),
    /// 列表成员匹配
    List(Vec<String>),
    /// 正则表达式（精确相等也算匹配）
    Regex { source: String, regex: Regex },
}

impl NamePattern {
    /// 根据选项值编译匹配策略
    ///
    /// `wildcard` 是该类别的通配符（目录为 `"*"`，文件为 `"*.*"`），
    /// 列表中出现通配符同样匹配所有名称。`regex` 只作用于单个字符串。
    pub fn compile(value: &OneOrMany, wildcard: &str, regex: bool) -> Result<Option<Self>> {
        let pattern = match value {
            OneOrMany::One(one) if one.is_empty() => return Ok(None),
            OneOrMany::One(one) if one == wildcard => NamePattern::Any,
            OneOrMany::One(one) if regex => {
                let compiled = Regex::new(one).map_err(|source| RemoveError::InvalidPattern {
                    pattern: one.clone(),
                    source,
                })?;
                NamePattern::Regex {
                    source: one.clone(),
                    regex: compiled,
                }
            }
            OneOrMany::One(one) => NamePattern::Exact(one.clone()),
            OneOrMany::Many(many) if many.iter().any(|item| item == wildcard) => NamePattern::Any,
            OneOrMany::Many(many) => NamePattern::List(many.clone()),
        };

        Ok(Some(pattern))
    }

    /// 判断名称是否匹配
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Any => true,
            NamePattern::Exact(exact) => exact == name,
            NamePattern::List(names) => names.iter().any(|item| item == name),
            NamePattern::Regex { source, regex } => regex.is_match(name) || source == name,
        }
    }
}
