pub mod generator;
pub mod progress;
pub mod reports;

pub use generator::{GenerationSummary, SitemapGenerator};
pub use progress::{Progress, ProgressTracker};
