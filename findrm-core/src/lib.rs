pub mod context;
pub mod error;
pub mod filter;
pub mod options;
pub mod pattern;
pub mod remover;
pub mod result;

pub use context::{RemovalBudget, TraversalContext};
pub use error::RemoveError;
pub use options::{AgeOptions, OneOrMany, RemoveOptions};
pub use pattern::NamePattern;
pub use remover::{TreeRemover, remove_all, remove_matching};
pub use result::{RemovalReport, RemovedPaths};

/// 将路径显示为相对于 `base` 的形式
pub fn display_relative(path: &std::path::Path, base: &std::path::Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/tmp/root/a.bak"), Path::new("/tmp/root")),
            Path::new("a.bak").display().to_string()
        );
        assert_eq!(
            display_relative(Path::new("/other/a.bak"), Path::new("/tmp/root")),
            Path::new("/other/a.bak").display().to_string()
        );
    }
}
