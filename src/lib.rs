//! # findrm
//!
//! Find and remove files and directories matching a set of filters.
//!
//! The tree is walked depth-first and synchronously. Files are removed as they
//! are found; a matching directory is judged before its children are visited
//! and removed after them.
//!
//! ## Usage
//!
//! ### Command Line
//!
//! ```bash
//! # Show which .bak files would be removed
//! findrm find . --ext .bak
//!
//! # Remove every CVS directory and all .log files, at most 3 levels deep
//! findrm remove . --dir CVS --ext .log --max-level 3
//!
//! # Remove a directory and everything in it
//! findrm purge ./build --yes
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use findrm_core::{RemoveOptions, remove_matching};
//!
//! let options = RemoveOptions::new()
//!     .with_extensions(vec![".bak", ".tmp"])
//!     .with_ignore("keep.bak")
//!     .with_test(true); // dry run
//! let removed = remove_matching(".", &options)?;
//! for path in removed.iter() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core functionality
pub use findrm_core::*;
