//! PromptPix Storage Library
//!
//! Output artifacts live as flat files in a single output directory.
//!
//! # Filename format
//!
//! Every stored artifact is named `generated_<YYYYmmdd>_<HHMMSS>_<8 hex>.png`. Names are
//! generated and validated in the `naming` module; delivery code only ever opens names
//! that match this pattern exactly, so no user input reaches the filesystem as a path.

pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use local::LocalOutputStore;
pub use naming::{generate_filename, is_valid_filename};
pub use traits::{OutputStore, StorageError, StorageResult};
