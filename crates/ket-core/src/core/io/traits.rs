use crate::core::models::document::KetDocument;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle format-specific parsing and serialization of a whole
/// [`KetDocument`]. Local problems found along the way are returned in the
/// format's `Report` rather than as errors.
pub trait StructureFile {
    /// Options controlling how documents are written.
    type Options;

    /// Non-fatal findings of a read or write pass.
    type Report;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a document from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed document and the report of the pass.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(KetDocument, Self::Report), Self::Error>;

    /// Writes a document to a writer.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to write.
    /// * `options` - Format options for this pass.
    /// * `writer` - The writer to output to.
    ///
    /// # Return
    ///
    /// Returns the report of the pass on success.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails. Output written before a failure is
    /// incomplete and must be discarded.
    fn write_to(
        document: &KetDocument,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<Self::Report, Self::Error>;

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(KetDocument, Self::Report), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a document to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        document: &KetDocument,
        options: &Self::Options,
        path: P,
    ) -> Result<Self::Report, Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let report = Self::write_to(document, options, &mut writer)?;
        writer.flush()?;
        Ok(report)
    }
}
