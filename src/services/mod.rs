pub mod cache;
pub mod fetcher;
pub mod scanner;
pub mod series_store;
pub mod signals;

pub use cache::{Cache, ScanCache};
pub use fetcher::{BatchFetcher, ChunkOutcome, FetchFailure};
pub use scanner::{merge_signals, ScanPhase, ScanPlan, Scanner};
pub use series_store::SeriesStore;
