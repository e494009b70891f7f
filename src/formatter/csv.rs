//! CSV report writer
//!
//! The report has a fixed six-column header followed by one record per
//! [`SecretExportRow`], in the order the rows were produced. Quoting and
//! escaping are left to the `csv` crate.
//!
//! Reports bound for a file are staged in a temporary file in the destination
//! directory and only moved into place by [`ReportWriter::persist`], so a
//! failed export never leaves a partial report behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};
use crate::types::SecretExportRow;

pub const REPORT_HEADER: [&str; 6] = [
    "SecretLevel",
    "SecretType",
    "SecretName",
    "SecretAccess",
    "RepositoryName",
    "RepositoryID",
];

pub struct ReportWriter<W: Write> {
    writer: ::csv::Writer<W>,
    rows_written: usize,
}

impl ReportWriter<NamedTempFile> {
    /// Stages a report for `path` in a temporary file next to it.
    ///
    /// Fails with [`ExportError::OutputExists`] when `path` already exists.
    pub fn stage(path: &Path) -> Result<Self> {
        if path.try_exists()? {
            return Err(ExportError::OutputExists(path.to_path_buf()));
        }

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".report-")
            .suffix(".csv.tmp")
            .tempfile_in(directory)?;

        Self::new(staging)
    }

    /// Flushes the staged report and moves it to `path`, never overwriting.
    pub fn persist(self, path: &Path) -> Result<()> {
        let staging = self.finish()?;
        staging.persist_noclobber(path).map_err(|e| match e.error.kind() {
            std::io::ErrorKind::AlreadyExists => ExportError::OutputExists(path.to_path_buf()),
            _ => ExportError::Io(e.error),
        })?;
        Ok(())
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wraps `inner` and writes the header immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(REPORT_HEADER)?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &SecretExportRow) -> Result<()> {
        self.writer.write_record(&row.to_record())?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_rows<'a, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SecretExportRow>,
    {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes buffered records and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}
