// SPDX-License-Identifier: Apache-2.0

//! Writes search results to the terminal or to files.
//!
//! One-shot searches go through [`Output`], which renders a complete
//! result set as a table, a JSON array, or a CSV or JSON file. Monitor
//! mode streams results as they arrive through a [`Sink`].
//!
//! Files are never written in place: results are written to a temporary
//! file next to the destination, which is then renamed over it, so an
//! interrupted write cannot leave a truncated file behind.

use crate::error::Error;
use crate::record::ResultRecord;
use crate::view::{ViewOptions, Viewable};
use log::debug;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where and how a result set is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// A human-readable listing on stdout.
    Table,

    /// A JSON array on stdout.
    Json,

    /// A CSV file with a header row.
    CsvFile(PathBuf),

    /// A JSON array in a file.
    JsonFile(PathBuf),
}

impl OutputFormat {
    /// Chooses a format from command-line options.
    ///
    /// An output `path` takes precedence over `json`, and its extension
    /// (`.csv` or `.json`) picks the file format. Any other extension is a
    /// configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use subscout::output::OutputFormat;
    /// let format = OutputFormat::from_args(false, Some(Path::new("results.csv"))).unwrap();
    /// assert_eq!(format, OutputFormat::CsvFile("results.csv".into()));
    /// assert_eq!(OutputFormat::from_args(true, None).unwrap(), OutputFormat::Json);
    /// assert_eq!(OutputFormat::from_args(false, None).unwrap(), OutputFormat::Table);
    /// ```
    pub fn from_args(json: bool, path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => {
                let extension = path
                    .extension()
                    .and_then(OsStr::to_str)
                    .map(str::to_ascii_lowercase);
                match extension.as_deref() {
                    Some("csv") => Ok(OutputFormat::CsvFile(path.to_path_buf())),
                    Some("json") => Ok(OutputFormat::JsonFile(path.to_path_buf())),
                    _ => Err(Error::Configuration(format!(
                        "cannot tell output format of {}: use a .csv or .json extension",
                        path.display()
                    ))),
                }
            }
            None if json => Ok(OutputFormat::Json),
            None => Ok(OutputFormat::Table),
        }
    }
}

/// Renders a complete result set.
#[derive(Debug)]
pub struct Output {
    format: OutputFormat,
    opts: ViewOptions,
}

impl Output {
    pub fn new(format: OutputFormat, opts: ViewOptions) -> Self {
        Self { format, opts }
    }

    /// Writes `records` to stdout or to the output file.
    pub fn write(&self, records: &[ResultRecord]) -> Result<(), Error> {
        match &self.format {
            OutputFormat::Table | OutputFormat::Json => {
                let stdout = io::stdout();
                let mut stdout = stdout.lock();
                self.render(records, &mut stdout)
                    .and_then(|_| stdout.flush())
                    .map_err(|err| Error::output("stdout", err))
            }
            OutputFormat::CsvFile(path) | OutputFormat::JsonFile(path) => {
                self.write_file(records, path)?;
                eprintln!("Saved {} results to {}", records.len(), path.display());
                Ok(())
            }
        }
    }

    /// Renders `records` in this output's format to any writer.
    pub fn render<W: Write>(&self, records: &[ResultRecord], writer: &mut W) -> io::Result<()> {
        match &self.format {
            OutputFormat::Table => write!(writer, "{}", records.view(&self.opts)),
            OutputFormat::Json | OutputFormat::JsonFile(_) => write_json(records, writer),
            OutputFormat::CsvFile(_) => write_csv(records, writer),
        }
    }

    fn write_file(&self, records: &[ResultRecord], path: &Path) -> Result<(), Error> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        debug!("Writing {} records to {}", records.len(), path.display());

        let mut file = NamedTempFile::new_in(dir).map_err(|err| Error::output(path, err))?;
        self.render(records, &mut file)
            .and_then(|_| file.as_file_mut().sync_all())
            .map_err(|err| Error::output(path, err))?;
        file.persist(path).map_err(|err| Error::output(path, err))?;
        Ok(())
    }
}

/// Writes `records` as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[ResultRecord], writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)
}

/// Writes `records` as CSV with a header row of field names.
pub fn write_csv<W: Write>(records: &[ResultRecord], writer: &mut W) -> io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv.write_record(CSV_HEADER)?;
    }
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()
}

const CSV_HEADER: [&str; 8] = [
    "title",
    "body",
    "subreddit",
    "score",
    "comments",
    "url",
    "created",
    "author",
];

/// Receives results as they arrive.
pub trait Sink {
    /// Emits a batch of records. The batch is written in full or not at all
    /// from the sink's point of view; errors are fatal to the caller.
    fn emit(&mut self, records: &[ResultRecord]) -> Result<(), Error>;
}

/// How a [`StreamSink`] writes each record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamFormat {
    /// The same entry used in table output, followed by a blank line.
    #[default]
    Table,

    /// One compact JSON object per line.
    JsonLines,
}

/// A sink that writes each record to a writer (usually stdout) and flushes
/// after every batch.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    writer: W,
    format: StreamFormat,
    opts: ViewOptions,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, format: StreamFormat, opts: ViewOptions) -> Self {
        Self {
            writer,
            format,
            opts,
        }
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_batch(&mut self, records: &[ResultRecord]) -> io::Result<()> {
        for record in records {
            match self.format {
                StreamFormat::Table => writeln!(self.writer, "{}\n", record.view(&self.opts))?,
                StreamFormat::JsonLines => {
                    serde_json::to_writer(&mut self.writer, record)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn emit(&mut self, records: &[ResultRecord]) -> Result<(), Error> {
        self.write_batch(records)
            .map_err(|err| Error::output("stdout", err))
    }
}
