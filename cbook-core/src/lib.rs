//! cbook core library
//!
//! Content model and runtime services for an interactive book about the C
//! programming language. Chapters are registered as lazily-loadable sources,
//! loaded at most once per session through a shared [`ModuleCache`], and
//! exposed to readers through a per-consumer [`ChapterLoader`] whose
//! [`LoadState`] can be observed for `(content, loading, error)` changes.
//!
//! Supporting reader features live alongside: table-of-contents extraction,
//! search, reading progress, preferences and stepped code playback.

pub mod animation;
pub mod cache;
pub mod error;
pub mod loader;
pub mod preferences;
pub mod progress;
pub mod registry;
pub mod search;
pub mod state;
pub mod storage;
pub mod toc;
pub mod types;

pub use cache::{LoadResult, ModuleCache};
pub use error::{CbookError, ContentError, LoadError, Result, StorageError};
pub use loader::ChapterLoader;
pub use registry::{ChapterSource, ContentRegistry};
pub use state::{LoadSnapshot, LoadState, LoadView};
pub use types::{
    ChapterContent, ChapterId, CodeStep, ContentBlock, NoteKind, SectionId, TocEntry,
};
