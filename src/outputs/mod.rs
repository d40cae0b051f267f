//! Output generation for the per-pair dataset files and the metadata index.
//!
//! # Submodules
//!
//! - [`json`]: writes one `data/<category>_<lang>.json` array per
//!   (category, language) pair
//! - [`metadata`]: writes the aggregate `metadata.json` index
//!
//! # Output structure
//!
//! ```text
//! output_dir/
//! ├── data/
//! │   ├── codes_ru.json
//! │   ├── codes_uz_Cyrl.json
//! │   ├── ...
//! │   └── news_en.json
//! └── metadata.json
//! ```
//!
//! Unlike fetching, persistence failures are fatal: a dataset file that the
//! metadata index counts but that never landed on disk would break the
//! file/count contract.

pub mod json;
pub mod metadata;
