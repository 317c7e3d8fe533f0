//! Core types for chapter content and identifiers

mod block;
mod chapter;
mod identifier;
mod toc;

pub use block::{CodeStep, ContentBlock, NoteKind};
pub use chapter::ChapterContent;
pub use identifier::{ChapterId, SectionId};
pub use toc::TocEntry;
