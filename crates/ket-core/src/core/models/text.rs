//! Rich-text annotation blocks and their inline style model.
//!
//! A text meta-object stores its content as a JSON payload of blocks, each with
//! a `text` and a list of `inlineStyleRanges` (`{offset, length, style}`). Each
//! block is parsed into a [`TextLine`]: the raw text plus an ordered map from
//! character offset to the style events (opens and closes) happening there.
//!
//! Offsets count Unicode scalar values. Offsets `0` and the text length are
//! always present as boundaries, even when no styles apply.

use crate::core::tables::{CUSTOM_FONT_SIZE_PREFIX, CUSTOM_FONT_SIZE_UNITS, TEXT_STYLES};
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// A resolved inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextStyle {
    Bold,
    Italic,
    Superscript,
    Subscript,
    /// Custom font size in points.
    FontSize(u32),
    /// A style name that matched neither a built-in style nor the custom size
    /// convention. It still occupies boundary events.
    Unrecognized,
}

impl TextStyle {
    /// Resolves a style name.
    ///
    /// Built-in names are looked up first, then the `CUSTOM_FONT_SIZE_<n>px`
    /// convention; anything else is [`TextStyle::Unrecognized`].
    pub fn resolve(name: &str) -> Self {
        if let Some(style) = TEXT_STYLES.get(name) {
            return *style;
        }
        name.strip_prefix(CUSTOM_FONT_SIZE_PREFIX)
            .and_then(|rest| rest.strip_suffix(CUSTOM_FONT_SIZE_UNITS))
            .and_then(|points| points.parse().ok())
            .map(TextStyle::FontSize)
            .unwrap_or(TextStyle::Unrecognized)
    }

    /// Numeric style code: 1-4 for the built-in styles, the point size for a
    /// custom font size and -1 for an unrecognized style.
    pub fn code(self) -> i64 {
        match self {
            Self::Bold => 1,
            Self::Italic => 2,
            Self::Superscript => 3,
            Self::Subscript => 4,
            Self::FontSize(points) => points as i64,
            Self::Unrecognized => -1,
        }
    }
}

/// One open or close event at a boundary.
///
/// Ordering is `(open, style)` ascending, so within one boundary every close
/// event enumerates before any open event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleEvent {
    pub style: TextStyle,
    pub open: bool,
}

impl StyleEvent {
    pub fn open(style: TextStyle) -> Self {
        Self { style, open: true }
    }

    pub fn close(style: TextStyle) -> Self {
        Self { style, open: false }
    }
}

impl Ord for StyleEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.open, self.style).cmp(&(other.open, other.style))
    }
}

impl PartialOrd for StyleEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An inline style range as found in the content payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

impl StyleRange {
    pub fn new(offset: usize, length: usize, style: &str) -> Self {
        Self {
            offset,
            length,
            style: style.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    text: String,
    boundaries: BTreeMap<usize, BTreeSet<StyleEvent>>,
}

impl TextLine {
    /// Creates a line with only the two sentinel boundaries.
    pub fn new(text: &str) -> Self {
        let mut boundaries = BTreeMap::new();
        boundaries.insert(0, BTreeSet::new());
        boundaries.insert(text.chars().count(), BTreeSet::new());
        Self {
            text: text.to_string(),
            boundaries,
        }
    }

    pub fn with_ranges<'a, I>(text: &str, ranges: I) -> Self
    where
        I: IntoIterator<Item = &'a StyleRange>,
    {
        let mut line = Self::new(text);
        for range in ranges {
            line.add_range(range);
        }
        line
    }

    /// Adds one style range. Ranges are additive and may overlap; positions
    /// past the end of the text are clamped to its length.
    pub fn add_range(&mut self, range: &StyleRange) {
        let len = self.len();
        let begin = range.offset.min(len);
        let end = range.offset.saturating_add(range.length).min(len);
        let style = TextStyle::resolve(&range.style);

        self.boundaries
            .entry(begin)
            .or_default()
            .insert(StyleEvent::open(style));
        self.boundaries
            .entry(end)
            .or_default()
            .insert(StyleEvent::close(style));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn boundaries(&self) -> &BTreeMap<usize, BTreeSet<StyleEvent>> {
        &self.boundaries
    }

    /// Rebuilds the set of styles active right after `offset` by replaying the
    /// boundary events in increasing order.
    ///
    /// Counts are signed so that a zero-length range, whose close sorts before
    /// its open at the same boundary, nets out to nothing.
    pub fn active_styles(&self, offset: usize) -> BTreeSet<TextStyle> {
        let mut depth: BTreeMap<TextStyle, isize> = BTreeMap::new();
        for (_, events) in self.boundaries.range(..=offset) {
            for event in events {
                *depth.entry(event.style).or_default() += if event.open { 1 } else { -1 };
            }
        }
        depth
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(style, _)| style)
            .collect()
    }
}

#[derive(Deserialize)]
struct RawContent {
    blocks: Vec<RawBlock>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_style_ranges: Vec<serde_json::Value>,
}

/// A positioned rich-text block.
///
/// The content payload is parsed eagerly. Parsing never fails hard: a payload
/// that is not valid JSON yields no lines, and a block whose style ranges do not
/// parse falls back to its sentinel boundaries. Each such problem is kept in
/// [`TextObject::issues`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub position: Point3<f64>,
    content: String,
    lines: Vec<TextLine>,
    issues: Vec<String>,
}

impl TextObject {
    pub fn new(position: Point3<f64>, content: &str) -> Self {
        let mut lines = Vec::new();
        let mut issues = Vec::new();

        match serde_json::from_str::<RawContent>(content) {
            Ok(raw) => {
                for (index, block) in raw.blocks.into_iter().enumerate() {
                    let text = block.text.unwrap_or_default();
                    let ranges: Result<Vec<StyleRange>, _> = block
                        .inline_style_ranges
                        .into_iter()
                        .map(serde_json::from_value)
                        .collect();
                    match ranges {
                        Ok(ranges) => lines.push(TextLine::with_ranges(&text, &ranges)),
                        Err(e) => {
                            tracing::warn!("Ignoring styles of text block {}: {}", index, e);
                            issues.push(format!("block {}: {}", index, e));
                            lines.push(TextLine::new(&text));
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Text content is not a valid block payload: {}", e);
                issues.push(format!("content: {}", e));
            }
        }

        Self {
            position,
            content: content.to_string(),
            lines,
            issues,
        }
    }

    /// Builds a single-block text object from plain text and style ranges.
    pub fn from_plain(position: Point3<f64>, text: &str, ranges: &[StyleRange]) -> Self {
        let ranges: Vec<serde_json::Value> = ranges
            .iter()
            .map(|r| {
                serde_json::json!({ "offset": r.offset, "length": r.length, "style": r.style })
            })
            .collect();
        let content = serde_json::json!({
            "blocks": [{ "text": text, "inlineStyleRanges": ranges }],
            "entityMap": {},
        });
        Self::new(position, &content.to_string())
    }

    /// The raw content payload, kept verbatim for serialization.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(line: &TextLine, offset: usize) -> Vec<StyleEvent> {
        line.boundaries()[&offset].iter().copied().collect()
    }

    #[test]
    fn resolve_recognizes_built_in_styles() {
        assert_eq!(TextStyle::resolve("BOLD"), TextStyle::Bold);
        assert_eq!(TextStyle::resolve("ITALIC"), TextStyle::Italic);
        assert_eq!(TextStyle::resolve("SUPERSCRIPT"), TextStyle::Superscript);
        assert_eq!(TextStyle::resolve("SUBSCRIPT"), TextStyle::Subscript);
        assert_eq!(TextStyle::resolve("bold"), TextStyle::Unrecognized);
    }

    #[test]
    fn resolve_parses_custom_font_size() {
        let style = TextStyle::resolve("CUSTOM_FONT_SIZE_18px");
        assert_eq!(style, TextStyle::FontSize(18));
        assert_eq!(style.code(), 18);
    }

    #[test]
    fn resolve_marks_malformed_custom_size_unrecognized() {
        assert_eq!(TextStyle::resolve("CUSTOM_FONT_SIZE_px"), TextStyle::Unrecognized);
        assert_eq!(TextStyle::resolve("CUSTOM_FONT_SIZE_12pt"), TextStyle::Unrecognized);
        assert_eq!(TextStyle::resolve("CUSTOM_FONT_SIZE_-3px"), TextStyle::Unrecognized);
        assert_eq!(TextStyle::Unrecognized.code(), -1);
    }

    #[test]
    fn plain_line_has_only_sentinel_boundaries() {
        let line = TextLine::new("Nitrogen");
        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0, 8]);
        assert!(line.boundaries().values().all(|events| events.is_empty()));
    }

    #[test]
    fn bold_prefix_produces_open_and_close_events() {
        let line = TextLine::with_ranges("Nitrogen", &[StyleRange::new(0, 3, "BOLD")]);
        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0, 3, 8]);
        assert_eq!(events(&line, 0), vec![StyleEvent::open(TextStyle::Bold)]);
        assert_eq!(events(&line, 3), vec![StyleEvent::close(TextStyle::Bold)]);
        assert!(events(&line, 8).is_empty());
    }

    #[test]
    fn overlapping_ranges_are_additive() {
        let line = TextLine::with_ranges(
            "CH3CH2OH",
            &[
                StyleRange::new(0, 8, "ITALIC"),
                StyleRange::new(2, 1, "SUBSCRIPT"),
                StyleRange::new(5, 1, "SUBSCRIPT"),
            ],
        );
        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0, 2, 3, 5, 6, 8]);
        assert_eq!(
            line.active_styles(2),
            BTreeSet::from([TextStyle::Italic, TextStyle::Subscript])
        );
        assert_eq!(line.active_styles(3), BTreeSet::from([TextStyle::Italic]));
        assert!(line.active_styles(8).is_empty());
    }

    #[test]
    fn closes_enumerate_before_opens_at_shared_boundary() {
        let line = TextLine::with_ranges(
            "abcdef",
            &[StyleRange::new(3, 3, "BOLD"), StyleRange::new(0, 3, "ITALIC")],
        );
        assert_eq!(
            events(&line, 3),
            vec![
                StyleEvent::close(TextStyle::Italic),
                StyleEvent::open(TextStyle::Bold)
            ]
        );
    }

    #[test]
    fn ranges_past_the_end_are_clamped() {
        let line = TextLine::with_ranges("abc", &[StyleRange::new(1, 10, "BOLD")]);
        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 3]);
        assert_eq!(events(&line, 3), vec![StyleEvent::close(TextStyle::Bold)]);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let line = TextLine::new("Å→B");
        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0, 3]);
    }

    #[test]
    fn unrecognized_style_still_occupies_boundaries() {
        let line = TextLine::with_ranges("abcd", &[StyleRange::new(1, 2, "UNDERLINE")]);
        assert_eq!(events(&line, 1), vec![StyleEvent::open(TextStyle::Unrecognized)]);
        assert_eq!(events(&line, 3), vec![StyleEvent::close(TextStyle::Unrecognized)]);
    }

    #[test]
    fn text_object_parses_blocks_eagerly() {
        let content = r#"{"blocks":[
            {"text":"Nitrogen","inlineStyleRanges":[{"offset":0,"length":3,"style":"BOLD"}]},
            {"text":"x2","inlineStyleRanges":[{"offset":1,"length":1,"style":"CUSTOM_FONT_SIZE_18px"}]}
        ],"entityMap":{}}"#;
        let text = TextObject::new(Point3::new(1.0, 2.0, 0.0), content);
        assert!(text.issues().is_empty());
        assert_eq!(text.lines().len(), 2);
        assert_eq!(text.lines()[0].text(), "Nitrogen");
        assert_eq!(
            events(&text.lines()[1], 1),
            vec![StyleEvent::open(TextStyle::FontSize(18))]
        );
        assert_eq!(text.content(), content);
    }

    #[test]
    fn malformed_range_falls_back_to_sentinels_for_that_line_only() {
        let content = r#"{"blocks":[
            {"text":"bad","inlineStyleRanges":[{"offset":-1,"length":2,"style":"BOLD"}]},
            {"text":"good","inlineStyleRanges":[{"offset":0,"length":4,"style":"BOLD"}]}
        ]}"#;
        let text = TextObject::new(Point3::origin(), content);
        assert_eq!(text.issues().len(), 1);
        let bad: Vec<usize> = text.lines()[0].boundaries().keys().copied().collect();
        assert_eq!(bad, vec![0, 3]);
        assert_eq!(events(&text.lines()[1], 0), vec![StyleEvent::open(TextStyle::Bold)]);
    }

    #[test]
    fn unparsable_content_yields_no_lines() {
        let text = TextObject::new(Point3::origin(), "not json");
        assert!(text.lines().is_empty());
        assert_eq!(text.issues().len(), 1);
        assert_eq!(text.content(), "not json");
    }

    #[test]
    fn block_without_text_becomes_empty_line() {
        let text = TextObject::new(Point3::origin(), r#"{"blocks":[{}]}"#);
        assert_eq!(text.lines().len(), 1);
        let keys: Vec<usize> = text.lines()[0].boundaries().keys().copied().collect();
        assert_eq!(keys, vec![0]);
    }

    #[test]
    fn from_plain_builds_single_block_payload() {
        let text = TextObject::from_plain(
            Point3::origin(),
            "Nitrogen",
            &[StyleRange::new(0, 3, "BOLD")],
        );
        assert_eq!(text.lines().len(), 1);
        assert_eq!(events(&text.lines()[0], 3), vec![StyleEvent::close(TextStyle::Bold)]);
    }

    #[test]
    fn clone_is_an_independent_copy() {
        let original = TextObject::from_plain(Point3::origin(), "abc", &[]);
        let mut copy = original.clone();
        copy.position.x = 5.0;
        copy.lines[0].add_range(&StyleRange::new(0, 1, "BOLD"));
        assert_eq!(original.position.x, 0.0);
        assert_eq!(original.lines()[0].boundaries().len(), 2);
        assert_eq!(copy.lines()[0].boundaries().len(), 3);
    }

    #[test]
    fn zero_length_range_leaves_no_active_style() {
        let line = TextLine::with_ranges("abcdef", &[StyleRange::new(2, 0, "BOLD")]);
        assert_eq!(
            events(&line, 2),
            vec![StyleEvent::close(TextStyle::Bold), StyleEvent::open(TextStyle::Bold)]
        );
        assert!(line.active_styles(2).is_empty());
        assert!(line.active_styles(6).is_empty());
    }

    #[test]
    fn boundaries_stay_well_formed_over_a_grid_of_ranges() {
        let texts = ["", "abc", "Å→B", "Nitrogen"];
        let offsets = [0, 1, 2, 3, 8, 20];
        let lengths = [0, 1, 2, 5, usize::MAX];
        let styles = ["BOLD", "SUBSCRIPT", "CUSTOM_FONT_SIZE_12px", "UNDERLINE"];

        for text in texts {
            let len = text.chars().count();
            for offset in offsets {
                for length in lengths {
                    for style in styles {
                        let ranges = [
                            StyleRange::new(offset, length, style),
                            StyleRange::new(0, len, "ITALIC"),
                        ];
                        let line = TextLine::with_ranges(text, &ranges);
                        let case = format!("{:?} {}+{} {}", text, offset, length, style);

                        let keys: Vec<usize> = line.boundaries().keys().copied().collect();
                        assert_eq!(keys.first(), Some(&0), "{}", case);
                        assert_eq!(keys.last(), Some(&len), "{}", case);
                        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{}", case);

                        for events in line.boundaries().values() {
                            let flags: Vec<bool> = events.iter().map(|e| e.open).collect();
                            assert!(flags.windows(2).all(|w| w[0] <= w[1]), "{}", case);
                        }

                        assert!(line.active_styles(len).is_empty(), "{}", case);
                        if length > 0 && offset < len {
                            let resolved = TextStyle::resolve(style);
                            assert!(line.active_styles(offset).contains(&resolved), "{}", case);
                        }
                    }
                }
            }
        }
    }
}
