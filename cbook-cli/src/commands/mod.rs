//! CLI command implementations

mod progress;
mod read;
mod search;
mod sections;
mod steps;
mod theme;
mod toc;

pub use progress::{complete, progress};
pub use read::read;
pub use search::search;
pub use sections::sections;
pub use steps::steps;
pub use theme::theme;
pub use toc::toc;
