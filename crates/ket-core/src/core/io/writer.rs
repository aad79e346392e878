//! Event-driven JSON writer with compact and indented output.
//!
//! [`JsonWriter`] validates the event sequence (keys only inside objects, one
//! value per key, balanced containers, a single root value) and delegates every
//! whitespace decision to a [`Layout`] chosen once at construction. Any
//! `serde_json` [`Formatter`] is a layout; the two modes use
//! [`CompactFormatter`] and [`PrettyFormatter`]. Both produce well-formed JSON
//! for the same event sequence and differ only in whitespace.

use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io::{self, Write};
use thiserror::Error;

/// Widest indentation accepted for pretty output.
pub const MAX_INDENT: usize = 16;

static SPACES: [u8; MAX_INDENT] = [b' '; MAX_INDENT];

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Writer is not bound to an output sink")]
    Unbound,
    #[error("Object member written without a preceding key")]
    ValueWithoutKey,
    #[error("Key written outside of an object or while a value is pending")]
    MisplacedKey,
    #[error("Container end does not match the innermost open container")]
    UnbalancedEnd,
    #[error("Document already holds a complete root value")]
    DocumentComplete,
    #[error("Non-finite number {0} cannot be represented in JSON")]
    NonFiniteNumber(f64),
}

/// Output formatting mode of a [`JsonWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterMode {
    #[default]
    Compact,
    Pretty,
}

impl WriterMode {
    /// The layout of this mode. `indent` is the number of spaces per level in
    /// pretty mode, capped at [`MAX_INDENT`].
    pub fn layout(self, indent: usize) -> Box<dyn Layout> {
        match self {
            Self::Compact => Box::new(CompactFormatter),
            Self::Pretty => Box::new(PrettyFormatter::with_indent(
                &SPACES[..indent.min(MAX_INDENT)],
            )),
        }
    }
}

/// Whitespace policy of a writer: the structural half of a `serde_json`
/// [`Formatter`], callable through a trait object.
pub trait Layout {
    fn begin_array(&mut self, out: &mut dyn Write) -> io::Result<()>;
    fn end_array(&mut self, out: &mut dyn Write) -> io::Result<()>;
    fn begin_array_value(&mut self, out: &mut dyn Write, first: bool) -> io::Result<()>;
    fn end_array_value(&mut self, out: &mut dyn Write) -> io::Result<()>;
    fn begin_object(&mut self, out: &mut dyn Write) -> io::Result<()>;
    fn end_object(&mut self, out: &mut dyn Write) -> io::Result<()>;
    /// Everything between the previous member and the key string.
    fn begin_object_key(&mut self, out: &mut dyn Write, first: bool) -> io::Result<()>;
    /// Everything between the key string and the value.
    fn begin_object_value(&mut self, out: &mut dyn Write) -> io::Result<()>;
    fn end_object_value(&mut self, out: &mut dyn Write) -> io::Result<()>;
}

impl<F: Formatter> Layout for F {
    fn begin_array(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::begin_array(self, out)
    }

    fn end_array(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::end_array(self, out)
    }

    fn begin_array_value(&mut self, out: &mut dyn Write, first: bool) -> io::Result<()> {
        Formatter::begin_array_value(self, out, first)
    }

    fn end_array_value(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::end_array_value(self, out)
    }

    fn begin_object(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::begin_object(self, out)
    }

    fn end_object(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::end_object(self, out)
    }

    fn begin_object_key(&mut self, out: &mut dyn Write, first: bool) -> io::Result<()> {
        Formatter::begin_object_key(self, out, first)
    }

    fn begin_object_value(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::end_object_key(self, out)?;
        Formatter::begin_object_value(self, out)
    }

    fn end_object_value(&mut self, out: &mut dyn Write) -> io::Result<()> {
        Formatter::end_object_value(self, out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Object,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    count: usize,
    value_pending: bool,
}

/// A single-use JSON writer over an output sink.
///
/// Not meant to be shared: each save pass owns its writer. [`JsonWriter::reset`]
/// rebinds the writer to a new sink and clears all nesting state.
pub struct JsonWriter<W: Write> {
    out: Option<W>,
    mode: Option<(WriterMode, usize)>,
    layout: Box<dyn Layout>,
    frames: Vec<Frame>,
    root_written: bool,
    max_decimal_places: Option<usize>,
}

impl<W: Write> JsonWriter<W> {
    /// Creates a writer bound to `out`.
    pub fn new(mode: WriterMode, out: W) -> Self {
        let mut writer = Self::unbound(mode);
        writer.out = Some(out);
        writer
    }

    /// Creates a writer with no sink yet; every emission fails until
    /// [`JsonWriter::reset`] binds one.
    pub fn unbound(mode: WriterMode) -> Self {
        Self::with_mode(mode, 4, None)
    }

    /// Creates a writer for `mode` with `indent` spaces per pretty level.
    pub fn with_mode(mode: WriterMode, indent: usize, out: Option<W>) -> Self {
        let mut writer = Self::with_layout(mode.layout(indent), out);
        writer.mode = Some((mode, indent));
        writer
    }

    /// Creates a writer with a custom layout.
    pub fn with_layout(layout: Box<dyn Layout>, out: Option<W>) -> Self {
        Self {
            out,
            mode: None,
            layout,
            frames: Vec::new(),
            root_written: false,
            max_decimal_places: None,
        }
    }

    /// Binds a new sink and clears nesting state, returning the previous sink.
    ///
    /// A writer built from a [`WriterMode`] also gets a fresh layout; a custom
    /// layout is kept as is.
    pub fn reset(&mut self, out: W) -> Option<W> {
        self.frames.clear();
        self.root_written = false;
        if let Some((mode, indent)) = self.mode {
            self.layout = mode.layout(indent);
        }
        self.out.replace(out)
    }

    pub fn into_inner(self) -> Option<W> {
        self.out
    }

    pub fn is_bound(&self) -> bool {
        self.out.is_some()
    }

    /// True once a complete root value has been written.
    pub fn is_complete(&self) -> bool {
        self.root_written && self.frames.is_empty()
    }

    pub fn max_decimal_places(&self) -> Option<usize> {
        self.max_decimal_places
    }

    /// Rounds every subsequent floating point value to at most `places` decimals.
    pub fn set_max_decimal_places(&mut self, places: Option<usize>) {
        self.max_decimal_places = places;
    }

    pub fn null(&mut self) -> Result<(), WriterError> {
        self.raw_value(b"null")
    }

    pub fn bool(&mut self, value: bool) -> Result<(), WriterError> {
        self.raw_value(if value { b"true" } else { b"false" })
    }

    pub fn int(&mut self, value: i32) -> Result<(), WriterError> {
        self.raw_value(value.to_string().as_bytes())
    }

    pub fn uint(&mut self, value: u32) -> Result<(), WriterError> {
        self.raw_value(value.to_string().as_bytes())
    }

    pub fn int64(&mut self, value: i64) -> Result<(), WriterError> {
        self.raw_value(value.to_string().as_bytes())
    }

    pub fn uint64(&mut self, value: u64) -> Result<(), WriterError> {
        self.raw_value(value.to_string().as_bytes())
    }

    /// Writes a float in its shortest round-trip form (`1.0`, `0.25`, `1e-7`).
    pub fn double(&mut self, value: f64) -> Result<(), WriterError> {
        if !value.is_finite() {
            return Err(WriterError::NonFiniteNumber(value));
        }
        let value = match self.max_decimal_places {
            Some(places) => {
                let factor = 10f64.powi(places as i32);
                let rounded = (value * factor).round() / factor;
                if rounded.is_finite() { rounded } else { value }
            }
            None => value,
        };
        let text = serde_json::to_string(&value).map_err(io::Error::from)?;
        self.raw_value(text.as_bytes())
    }

    pub fn string(&mut self, value: &str) -> Result<(), WriterError> {
        self.begin_value()?;
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        serde_json::to_writer(out, value).map_err(io::Error::from)?;
        self.end_value()
    }

    pub fn key(&mut self, key: &str) -> Result<(), WriterError> {
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        let frame = match self.frames.last_mut() {
            Some(frame) if frame.kind == FrameKind::Object && !frame.value_pending => frame,
            _ => return Err(WriterError::MisplacedKey),
        };
        self.layout.begin_object_key(&mut *out, frame.count == 0)?;
        serde_json::to_writer(&mut *out, key).map_err(io::Error::from)?;
        self.layout.begin_object_value(out)?;
        frame.count += 1;
        frame.value_pending = true;
        Ok(())
    }

    pub fn start_object(&mut self) -> Result<(), WriterError> {
        self.start_container(FrameKind::Object)
    }

    pub fn end_object(&mut self) -> Result<(), WriterError> {
        self.end_container(FrameKind::Object)
    }

    pub fn start_array(&mut self) -> Result<(), WriterError> {
        self.start_container(FrameKind::Array)
    }

    pub fn end_array(&mut self) -> Result<(), WriterError> {
        self.end_container(FrameKind::Array)
    }

    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.out.as_mut().ok_or(WriterError::Unbound)?.flush()?;
        Ok(())
    }

    fn raw_value(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.begin_value()?;
        self.out
            .as_mut()
            .ok_or(WriterError::Unbound)?
            .write_all(bytes)?;
        self.end_value()
    }

    /// Validates that a value may start here and writes its prefix.
    fn begin_value(&mut self) -> Result<(), WriterError> {
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        match self.frames.last_mut() {
            None if self.root_written => Err(WriterError::DocumentComplete),
            None => Ok(()),
            Some(frame) => match frame.kind {
                FrameKind::Object if frame.value_pending => {
                    frame.value_pending = false;
                    Ok(())
                }
                FrameKind::Object => Err(WriterError::ValueWithoutKey),
                FrameKind::Array => {
                    self.layout.begin_array_value(out, frame.count == 0)?;
                    frame.count += 1;
                    Ok(())
                }
            },
        }
    }

    /// Closes the value just written inside its parent container.
    fn end_value(&mut self) -> Result<(), WriterError> {
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        match self.frames.last().map(|frame| frame.kind) {
            None => self.root_written = true,
            Some(FrameKind::Array) => self.layout.end_array_value(out)?,
            Some(FrameKind::Object) => self.layout.end_object_value(out)?,
        }
        Ok(())
    }

    fn start_container(&mut self, kind: FrameKind) -> Result<(), WriterError> {
        self.begin_value()?;
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        match kind {
            FrameKind::Array => self.layout.begin_array(out)?,
            FrameKind::Object => self.layout.begin_object(out)?,
        }
        self.frames.push(Frame {
            kind,
            count: 0,
            value_pending: false,
        });
        Ok(())
    }

    fn end_container(&mut self, kind: FrameKind) -> Result<(), WriterError> {
        let out = self.out.as_mut().ok_or(WriterError::Unbound)?;
        match self.frames.last() {
            Some(frame) if frame.kind == kind && !frame.value_pending => {}
            _ => return Err(WriterError::UnbalancedEnd),
        }
        self.frames.pop();
        match kind {
            FrameKind::Array => self.layout.end_array(out)?,
            FrameKind::Object => self.layout.end_object(out)?,
        }
        self.end_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn emit<W: Write>(w: &mut JsonWriter<W>) -> Result<(), WriterError> {
        w.start_object()?;
        w.key("name")?;
        w.string("caf\u{e9} \"quoted\"")?;
        w.key("atoms")?;
        w.start_array()?;
        w.int(-1)?;
        w.uint(2)?;
        w.int64(-3_000_000_000)?;
        w.uint64(u64::MAX)?;
        w.double(1.0)?;
        w.double(0.125)?;
        w.end_array()?;
        w.key("empty")?;
        w.start_object()?;
        w.end_object()?;
        w.key("none")?;
        w.start_array()?;
        w.end_array()?;
        w.key("flags")?;
        w.start_array()?;
        w.bool(true)?;
        w.null()?;
        w.end_array()?;
        w.end_object()
    }

    fn render(mode: WriterMode) -> String {
        let mut w = JsonWriter::new(mode, Vec::new());
        emit(&mut w).unwrap();
        assert!(w.is_complete());
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        let text = render(WriterMode::Compact);
        assert_eq!(
            text,
            r#"{"name":"café \"quoted\"","atoms":[-1,2,-3000000000,18446744073709551615,1.0,0.125],"empty":{},"none":[],"flags":[true,null]}"#
        );
    }

    #[test]
    fn pretty_output_indents_by_four_spaces() {
        let mut w = JsonWriter::new(WriterMode::Pretty, Vec::new());
        w.start_object().unwrap();
        w.key("a").unwrap();
        w.start_array().unwrap();
        w.int(1).unwrap();
        w.int(2).unwrap();
        w.end_array().unwrap();
        w.key("b").unwrap();
        w.start_object().unwrap();
        w.end_object().unwrap();
        w.end_object().unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": {}\n}");
    }

    #[test]
    fn both_modes_parse_to_the_same_tree() {
        let compact: Value = serde_json::from_str(&render(WriterMode::Compact)).unwrap();
        let pretty: Value = serde_json::from_str(&render(WriterMode::Pretty)).unwrap();
        assert_eq!(compact, pretty);
        assert_eq!(compact["atoms"][4], json!(1.0));
    }

    #[test]
    fn value_without_key_is_rejected() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.start_object().unwrap();
        assert!(matches!(w.int(1), Err(WriterError::ValueWithoutKey)));
    }

    #[test]
    fn key_outside_object_is_rejected() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.start_array().unwrap();
        assert!(matches!(w.key("x"), Err(WriterError::MisplacedKey)));
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.start_object().unwrap();
        w.key("x").unwrap();
        assert!(matches!(w.key("y"), Err(WriterError::MisplacedKey)));
    }

    #[test]
    fn mismatched_end_is_rejected() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.start_object().unwrap();
        assert!(matches!(w.end_array(), Err(WriterError::UnbalancedEnd)));
        w.key("k").unwrap();
        assert!(matches!(w.end_object(), Err(WriterError::UnbalancedEnd)));
    }

    #[test]
    fn second_root_value_is_rejected() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.int(1).unwrap();
        assert!(w.is_complete());
        assert!(matches!(w.int(2), Err(WriterError::DocumentComplete)));
    }

    #[test]
    fn unbound_writer_fails_until_reset() {
        let mut w: JsonWriter<Vec<u8>> = JsonWriter::unbound(WriterMode::Pretty);
        assert!(!w.is_bound());
        assert!(matches!(w.start_object(), Err(WriterError::Unbound)));
        assert!(w.reset(Vec::new()).is_none());
        w.null().unwrap();
        assert_eq!(w.into_inner().unwrap(), b"null");
    }

    #[test]
    fn reset_returns_previous_sink_and_clears_state() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.start_array().unwrap();
        w.int(7).unwrap();
        let previous = w.reset(Vec::new()).unwrap();
        assert_eq!(previous, b"[7");
        assert!(!w.is_complete());
        w.start_object().unwrap();
        w.end_object().unwrap();
        assert!(w.is_complete());
        assert_eq!(w.into_inner().unwrap(), b"{}");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        assert!(matches!(w.double(f64::NAN), Err(WriterError::NonFiniteNumber(_))));
        assert!(matches!(
            w.double(f64::INFINITY),
            Err(WriterError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn max_decimal_places_rounds_values() {
        let mut w = JsonWriter::new(WriterMode::Compact, Vec::new());
        w.set_max_decimal_places(Some(2));
        w.start_array().unwrap();
        w.double(1.23456).unwrap();
        w.double(-0.004).unwrap();
        w.end_array().unwrap();
        let values: Vec<f64> = serde_json::from_slice(&w.into_inner().unwrap()).unwrap();
        assert_eq!(values, vec![1.23, 0.0]);
    }

    #[test]
    fn pretty_reset_starts_again_at_column_zero() {
        let mut w = JsonWriter::new(WriterMode::Pretty, Vec::new());
        w.start_array().unwrap();
        w.start_array().unwrap();
        w.reset(Vec::new());
        w.start_array().unwrap();
        w.int(1).unwrap();
        w.end_array().unwrap();
        assert_eq!(w.into_inner().unwrap(), b"[\n    1\n]");
    }

    #[test]
    fn any_serde_json_formatter_works_as_layout() {
        let layout = Box::new(PrettyFormatter::with_indent(b"\t"));
        let mut w = JsonWriter::with_layout(layout, Some(Vec::new()));
        w.start_object().unwrap();
        w.key("a").unwrap();
        w.int(1).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.into_inner().unwrap(), b"{\n\t\"a\": 1\n}");
    }
}
