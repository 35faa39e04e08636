//! CSV output sink
//!
//! One header row followed by one row per record, in aggregate order. The
//! ID column carries the canonical detail URL rather than the bare id.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use super::error::ScrapeResult;
use crate::domain::JobRecord;

pub const CSV_HEADERS: [&str; 4] = ["ID", "Title", "CompanyName", "Location"];

/// Write `jobs` as CSV to any writer. Returns the number of data rows.
pub fn write_jobs<W: Write>(writer: W, jobs: &[JobRecord], detail_url_prefix: &str) -> ScrapeResult<usize> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for job in jobs {
        csv_writer.write_record([
            job.detail_url(detail_url_prefix).as_str(),
            job.title.as_str(),
            job.company_name.as_str(),
            job.location.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(jobs.len())
}

/// Create (or truncate) `path` and write `jobs` to it.
pub fn write_jobs_csv(path: &Path, jobs: &[JobRecord], detail_url_prefix: &str) -> ScrapeResult<usize> {
    let file = File::create(path)?;
    let rows = write_jobs(file, jobs, detail_url_prefix)?;
    info!("💾 Wrote {} jobs to {}", rows, path.display());
    Ok(rows)
}

/// Render `jobs` into an in-memory CSV document.
pub fn render_jobs_csv(jobs: &[JobRecord], detail_url_prefix: &str) -> ScrapeResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_jobs(&mut buffer, jobs, detail_url_prefix)?;
    Ok(buffer)
}
