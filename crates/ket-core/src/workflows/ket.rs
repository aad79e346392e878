use crate::core::io::traits::StructureFile;
use crate::core::models::document::KetDocument;
use crate::engine::config::SaverConfig;
use crate::engine::diagnostics::Diagnostics;
use crate::engine::error::{LoadError, SaveError};
use crate::engine::loader::KetLoader;
use crate::engine::saver::KetSaver;
use std::io::{self, BufRead, Read, Write};
use thiserror::Error;
use tracing::{info, instrument};

/// Serializes `document` to a KET string.
///
/// # Return
///
/// The document text and the diagnostics of the pass.
///
/// # Errors
///
/// Returns [`SaveError`] if the document is empty or emission fails.
#[instrument(skip_all, name = "save_ket")]
pub fn save_ket(
    document: &KetDocument,
    config: &SaverConfig,
) -> Result<(String, Diagnostics), SaveError> {
    let mut buffer = Vec::new();
    let diagnostics = save_ket_to(document, config, &mut buffer)?;
    // The writer only ever emits UTF-8.
    let text = String::from_utf8_lossy(&buffer).into_owned();
    Ok((text, diagnostics))
}

/// Serializes `document` into `out`.
///
/// # Errors
///
/// Returns [`SaveError`] if the document is empty or emission fails. On error
/// `out` holds truncated output.
#[instrument(skip_all, name = "save_ket_to")]
pub fn save_ket_to<W: Write>(
    document: &KetDocument,
    config: &SaverConfig,
    out: W,
) -> Result<Diagnostics, SaveError> {
    let mut writer = config.writer(out);
    let diagnostics = KetSaver::new(config).save(document, &mut writer)?;
    info!(
        nodes = document.nodes.len(),
        diagnostics = diagnostics.len(),
        "KET document saved."
    );
    Ok(diagnostics)
}

/// Parses a KET document.
///
/// # Errors
///
/// Returns [`LoadError`] if `text` is not a readable KET document.
#[instrument(skip_all, name = "load_ket")]
pub fn load_ket(text: &str) -> Result<(KetDocument, Diagnostics), LoadError> {
    let (document, diagnostics) = KetLoader::new().load(text)?;
    info!(
        nodes = document.nodes.len(),
        diagnostics = diagnostics.len(),
        "KET document loaded."
    );
    Ok((document, diagnostics))
}

#[derive(Debug, Error)]
pub enum KetFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),
}

/// The KET format as a [`StructureFile`].
pub struct KetFile;

impl StructureFile for KetFile {
    type Options = SaverConfig;
    type Report = Diagnostics;
    type Error = KetFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<(KetDocument, Self::Report), Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(load_ket(&text)?)
    }

    fn write_to(
        document: &KetDocument,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<Self::Report, Self::Error> {
        Ok(save_ket_to(document, options, writer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::writer::WriterMode;
    use crate::core::models::atom::Atom;
    use crate::core::models::document::KetNode;
    use crate::core::models::molecule::Molecule;
    use crate::core::models::sgroup::SGroup;
    use crate::core::models::stereo::{CipDescriptor, StereoCenter};
    use crate::core::models::topology::BondOrder;
    use crate::engine::config::SaverConfigBuilder;
    use crate::engine::diagnostics::DiagnosticKind;
    use nalgebra::Point3;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn ethanol() -> Molecule {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new("C", Point3::new(0.0, 0.0, 0.0)));
        mol.add_atom(Atom::new("C", Point3::new(1.3, 0.75, 0.0)));
        mol.add_atom(Atom::new("O", Point3::new(2.6, 0.0, 0.0)));
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        mol.add_bond(1, 2, BondOrder::Single).unwrap();
        mol
    }

    #[test]
    fn save_then_load_returns_the_same_molecule() {
        let mut mol = ethanol();
        mol.stereocenters
            .push(StereoCenter::absolute(1, CipDescriptor::S));
        let document: KetDocument = mol.into();

        let (text, diags) = save_ket(&document, &SaverConfig::default()).unwrap();
        assert!(diags.is_empty());
        let (loaded, diags) = load_ket(&text).unwrap();
        assert!(diags.is_empty());
        assert_eq!(loaded, document);
    }

    #[test]
    fn pretty_output_is_indented() {
        let config = SaverConfigBuilder::new()
            .mode(WriterMode::Pretty)
            .indent(2)
            .build()
            .unwrap();
        let (text, _) = save_ket(&ethanol().into(), &config).unwrap();
        assert!(text.starts_with("{\n  \"root\": {"));
        let (compact, _) = save_ket(&ethanol().into(), &SaverConfig::default()).unwrap();
        assert!(!compact.contains('\n'));
        let a: serde_json::Value = serde_json::from_str(&text).unwrap();
        let b: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn local_problems_do_not_fail_the_save() {
        let mut mol = ethanol();
        mol.sgroups.push(SGroup::data("broken", "x", vec![0, 999]));
        let (text, diags) = save_ket(&mol.into(), &SaverConfig::default()).unwrap();
        assert_eq!(diags.count(DiagnosticKind::DanglingReference), 1);
        assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = save_ket(&KetDocument::new(), &SaverConfig::default()).unwrap_err();
        assert!(matches!(err, SaveError::MissingInput("document")));
    }

    #[test]
    fn file_round_trip_through_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ethanol.ket");
        let document: KetDocument = ethanol().into();

        KetFile::write_to_path(&document, &SaverConfig::pretty(), &path).unwrap();
        let (loaded, diags) = KetFile::read_from_path(&path).unwrap();
        assert!(diags.is_empty());
        assert_eq!(loaded, document);
    }

    #[test]
    fn reading_garbage_is_a_load_error() {
        let mut reader = Cursor::new("not json");
        assert!(matches!(
            KetFile::read_from(&mut reader),
            Err(KetFileError::Load(LoadError::Json { .. }))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = KetFile::read_from_path(dir.path().join("absent.ket"));
        assert!(matches!(result, Err(KetFileError::Io(_))));
    }

    #[test]
    fn written_document_lists_its_nodes() {
        let mut document = KetDocument::new();
        document.push_molecule(ethanol());
        document.push_molecule(ethanol());
        let mut out = Vec::new();
        KetFile::write_to(&document, &SaverConfig::default(), &mut out).unwrap();
        let (loaded, _) = KetFile::read_from(&mut Cursor::new(out)).unwrap();
        assert_eq!(loaded.nodes.len(), 2);
        assert!(matches!(loaded.nodes[1], KetNode::Molecule(_)));
    }
}
