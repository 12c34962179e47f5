//! Dataset records, file I/O and the scan loop.

pub mod io;
pub mod record;
pub mod scanner;
pub mod split;
pub mod summary;

pub use io::{load_records, resolve_input, write_annotated, write_cleaned};
pub use record::Record;
pub use scanner::DatasetScanner;
pub use split::Split;
pub use summary::IssueSummary;
