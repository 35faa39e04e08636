//! Domain module - Core entities and rules
//!
//! Pure types with no I/O: the job record, text normalization and the
//! pagination discovery rule.

pub mod job_record;
pub mod pagination;
pub mod text;

pub use job_record::JobRecord;
pub use pagination::{PageCount, PaginationStep};
pub use text::clean_text;
