//! Front matter parsing for Markdown content files.
//!
//! A content file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Sample Blog Post
//! publication_time: 2023-01-15T09:00:00
//! section: Technology
//! image: https://example.com/image.jpg
//! tags: [rust, web]
//! ---
//! # Sample Blog Post
//! ```
//!
//! Parsing happens in two steps. [`split_front_matter`] separates the block
//! from the body and resolves it into a [`Metadata`] map of typed
//! [`MetaValue`]s. [`parse_front_matter`] then validates that map into a
//! [`FrontMatter`] record.
//!
//! ## Timestamps
//!
//! Scalars shaped like YAML 1.1 timestamps (`2023-01-15T09:00:00`,
//! `2023-01-15 09:00:00+01:00`, `2023-01-15`) resolve to [`MetaValue::DateTime`]
//! or [`MetaValue::Date`] during the first step. The validator never parses
//! text itself: `publication_time` must already be a `DateTime`, and anything
//! else (free text, a bare date, a number) is rejected. The YAML reader does
//! not report whether a scalar was quoted, so a quoted timestamp resolves the
//! same way as a plain one.

use crate::opengraph::{Author, Gender};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Words per minute used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})(?:(?:[Tt]|[ \t]+)(?P<H>\d{1,2}):(?P<M>\d{2}):(?P<S>\d{2})(?:\.(?P<frac>\d*))?(?:[ \t]*(?P<tz>Z|[-+]\d{1,2}(?::?\d{2})?))?)?$",
    )
    .unwrap()
});

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter block opened with `---` is never closed")]
    Unterminated,
    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
    #[error("title is missing")]
    MissingTitle,
    #[error("publication_time is missing")]
    MissingPublicationTime,
    #[error("`{field}` must be a date-time value, found {found}")]
    NotADateTime { field: &'static str, found: String },
    #[error("date-time in `{field}` is out of range")]
    TimeOutOfRange { field: &'static str },
    #[error("tags must be a list of strings")]
    InvalidTags,
    #[error("invalid section label: {}", .attempted.as_deref().unwrap_or("<missing>"))]
    InvalidSection { attempted: Option<String> },
    #[error("author #{index} is invalid: {reason}")]
    InvalidAuthor { index: usize, reason: String },
    #[error("`{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

// =============================================================================
// Metadata values
// =============================================================================

/// A timestamp as written in front matter: wall-clock time plus an optional
/// UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishTime {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl PublishTime {
    pub fn naive(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }

    /// ISO 8601 text: `2023-01-15T09:00:00`, with `.ffffff` only for non-zero
    /// sub-seconds and `+HH:MM` only when an offset is known.
    pub fn iso_format(&self) -> String {
        let mut out = self.local.format("%Y-%m-%dT%H:%M:%S").to_string();
        if self.local.nanosecond() != 0 {
            out.push_str(&self.local.format("%.6f").to_string());
        }
        if let Some(offset) = self.offset {
            let secs = offset.local_minus_utc();
            let sign = if secs < 0 { '-' } else { '+' };
            let secs = secs.abs();
            out.push_str(&format!("{sign}{:02}:{:02}", secs / 3600, (secs % 3600) / 60));
        }
        out
    }

    /// Shift by whole days, keeping the offset.
    pub fn checked_add_days(&self, days: u32) -> Option<Self> {
        let delta = TimeDelta::try_days(i64::from(days))?;
        Some(Self {
            local: self.local.checked_add_signed(delta)?,
            offset: self.offset,
        })
    }

    /// Instant used for ordering. Offset-less times are taken as UTC.
    fn utc_instant(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => self
                .local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(self.local),
            None => self.local,
        }
    }
}

impl Ord for PublishTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc_instant()
            .cmp(&other.utc_instant())
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for PublishTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PublishTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso_format())
    }
}

impl Serialize for PublishTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.iso_format())
    }
}

/// One resolved front matter value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    DateTime(PublishTime),
    Date(NaiveDate),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    fn kind(&self) -> &'static str {
        match self {
            MetaValue::Null => "null",
            MetaValue::Bool(_) => "a boolean",
            MetaValue::Integer(_) | MetaValue::Float(_) => "a number",
            MetaValue::String(_) => "a string",
            MetaValue::DateTime(_) => "a date-time",
            MetaValue::Date(_) => "a date",
            MetaValue::List(_) => "a list",
            MetaValue::Map(_) => "a mapping",
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_yaml::Value> for MetaValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Integer(i),
                None => MetaValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => resolve_timestamp(&s).unwrap_or(MetaValue::String(s)),
            Value::Sequence(items) => MetaValue::List(items.into_iter().map(Into::into).collect()),
            Value::Mapping(map) => MetaValue::Map(
                map.into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, v.into())))
                    .collect(),
            ),
            Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Resolve a YAML 1.1 timestamp scalar, or `None` if the text isn't one.
fn resolve_timestamp(text: &str) -> Option<MetaValue> {
    let caps = TIMESTAMP.captures(text.trim())?;
    let num = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    let date = NaiveDate::from_ymd_opt(caps["y"].parse().ok()?, num("m")?, num("d")?)?;
    let Some(hour) = num("H") else {
        return Some(MetaValue::Date(date));
    };

    let nanos = match caps.name("frac").map(|m| m.as_str()) {
        Some(frac) if !frac.is_empty() => {
            let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
            digits.parse::<u32>().ok()?
        }
        _ => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(hour, num("M")?, num("S")?, nanos)?;

    let offset = match caps.name("tz").map(|m| m.as_str()) {
        None => None,
        Some("Z") => FixedOffset::east_opt(0),
        Some(tz) => Some(parse_offset(tz)?),
    };

    Some(MetaValue::DateTime(PublishTime {
        local: NaiveDateTime::new(date, time),
        offset,
    }))
}

/// `+9`, `-05`, `+0530`, `+05:30`
fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, rest) = tz.split_at(1);
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    let (hours, minutes) = if rest.contains(':') {
        let (h, m) = rest.split_once(':')?;
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else if digits.len() > 2 {
        let (h, m) = digits.split_at(digits.len() - 2);
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else {
        (digits.parse::<i32>().ok()?, 0)
    };
    let secs = hours * 3600 + minutes * 60;
    if sign == "-" {
        FixedOffset::west_opt(secs)
    } else {
        FixedOffset::east_opt(secs)
    }
}

/// The key/value mapping of a front matter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match self.0.get(key) {
            None | Some(MetaValue::Null) => None,
            Some(value) => Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        Metadata(iter.into_iter().collect())
    }
}

// =============================================================================
// Splitting
// =============================================================================

/// Separate the leading `---` block from the Markdown body.
///
/// A document without an opening fence has empty metadata and is all body.
/// The body is trimmed of surrounding whitespace.
pub fn split_front_matter(text: &str) -> Result<(Metadata, String), FrontMatterError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut lines = text.split_inclusive('\n');

    let first = lines.next();
    if !first.is_some_and(|line| line.trim_end() == "---") {
        return Ok((Metadata::default(), text.trim().to_string()));
    }

    let mut yaml = String::new();
    let mut consumed = first.map_or(0, str::len);
    let mut closed = false;
    for line in lines {
        consumed += line.len();
        let bare = line.trim_end();
        if bare == "---" || bare == "..." {
            closed = true;
            break;
        }
        yaml.push_str(line);
    }
    if !closed {
        return Err(FrontMatterError::Unterminated);
    }

    let body = text[consumed..].trim().to_string();
    let metadata = match serde_yaml::from_str::<serde_yaml::Value>(&yaml)? {
        serde_yaml::Value::Null => Metadata::default(),
        value => match MetaValue::from(value) {
            MetaValue::Map(map) => Metadata(map),
            _ => return Err(FrontMatterError::NotAMapping),
        },
    };

    Ok((metadata, body))
}

// =============================================================================
// Validation
// =============================================================================

/// Validated post metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub publication_time: PublishTime,
    pub modified_time: PublishTime,
    pub expiration_time: PublishTime,
    pub authors: Vec<Author>,
    pub tags: Vec<String>,
    pub section: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub language: String,
    pub draft: bool,
}

/// The author credited when a post names none.
pub fn default_author() -> Author {
    Author {
        first_name: "João".into(),
        last_name: "Monteiro".into(),
        username: "Portugapt".into(),
        url: "https://portugapt.github.io/about".into(),
        gender: Gender::Male,
        email: Some("monteiro (dot) joao (dot) ps (at) gmail (dot) com".into()),
    }
}

/// Validate a front matter map. Fields are checked in declaration order and
/// the first problem is returned.
///
/// `expiration_days` is added to the publication time to get the expiration
/// time.
pub fn parse_front_matter(
    metadata: &Metadata,
    expiration_days: u32,
) -> Result<FrontMatter, FrontMatterError> {
    let title = match metadata.get("title") {
        None => return Err(FrontMatterError::MissingTitle),
        Some(MetaValue::String(s)) => s.clone(),
        Some(_) => {
            return Err(FrontMatterError::InvalidField {
                field: "title",
                expected: "a string",
            });
        }
    };

    let publication_time = match metadata.get("publication_time") {
        None => return Err(FrontMatterError::MissingPublicationTime),
        Some(value) => expect_datetime("publication_time", value)?,
    };
    let modified_time = match metadata.get("modified_time") {
        None => publication_time,
        Some(value) => expect_datetime("modified_time", value)?,
    };
    let expiration_time = publication_time
        .checked_add_days(expiration_days)
        .ok_or(FrontMatterError::TimeOutOfRange {
            field: "publication_time",
        })?;

    let authors = parse_authors(metadata)?;
    let tags = parse_tags(metadata)?;
    let section = parse_section(metadata)?;

    let image = match metadata.get("image") {
        None => None,
        Some(MetaValue::String(s)) => Some(s.clone()).filter(|s| !s.is_empty()),
        Some(MetaValue::Map(map)) => match map.get("src") {
            Some(MetaValue::String(src)) => Some(src.clone()).filter(|s| !s.is_empty()),
            _ => {
                return Err(FrontMatterError::InvalidField {
                    field: "image",
                    expected: "a string or a mapping with a `src` string",
                });
            }
        },
        Some(_) => {
            return Err(FrontMatterError::InvalidField {
                field: "image",
                expected: "a string or a mapping with a `src` string",
            });
        }
    };

    let description = optional_string(metadata, "description")?;
    let thumbnail = optional_string(metadata, "thumbnail")?;
    let language = optional_string(metadata, "language")?.unwrap_or_else(|| "en".to_string());

    let draft = match metadata.get("draft") {
        None => false,
        Some(MetaValue::Bool(b)) => *b,
        Some(_) => {
            return Err(FrontMatterError::InvalidField {
                field: "draft",
                expected: "a boolean",
            });
        }
    };

    Ok(FrontMatter {
        title,
        publication_time,
        modified_time,
        expiration_time,
        authors,
        tags,
        section,
        description,
        thumbnail,
        image,
        language,
        draft,
    })
}

fn expect_datetime(field: &'static str, value: &MetaValue) -> Result<PublishTime, FrontMatterError> {
    match value {
        MetaValue::DateTime(t) => Ok(*t),
        other => Err(FrontMatterError::NotADateTime {
            field,
            found: other.kind().to_string(),
        }),
    }
}

fn optional_string(metadata: &Metadata, field: &'static str) -> Result<Option<String>, FrontMatterError> {
    match metadata.get(field) {
        None => Ok(None),
        Some(MetaValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FrontMatterError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn parse_tags(metadata: &Metadata) -> Result<Vec<String>, FrontMatterError> {
    match metadata.get("tags") {
        None => Ok(Vec::new()),
        Some(MetaValue::List(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(FrontMatterError::InvalidTags)
            })
            .collect(),
        Some(_) => Err(FrontMatterError::InvalidTags),
    }
}

fn parse_section(metadata: &Metadata) -> Result<String, FrontMatterError> {
    match metadata.get("section") {
        Some(MetaValue::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(MetaValue::Integer(n)) if *n != 0 => Ok(n.to_string()),
        None => Err(FrontMatterError::InvalidSection { attempted: None }),
        Some(other) => Err(FrontMatterError::InvalidSection {
            attempted: Some(describe(other)),
        }),
    }
}

fn describe(value: &MetaValue) -> String {
    match value {
        MetaValue::String(s) => format!("{s:?}"),
        MetaValue::Bool(b) => b.to_string(),
        MetaValue::Integer(n) => n.to_string(),
        MetaValue::Float(n) => n.to_string(),
        other => other.kind().to_string(),
    }
}

/// A missing or empty `authors` list credits [`default_author`].
fn parse_authors(metadata: &Metadata) -> Result<Vec<Author>, FrontMatterError> {
    let items = match metadata.get("authors") {
        None => return Ok(vec![default_author()]),
        Some(MetaValue::List(items)) if items.is_empty() => return Ok(vec![default_author()]),
        Some(MetaValue::List(items)) => items,
        Some(_) => {
            return Err(FrontMatterError::InvalidField {
                field: "authors",
                expected: "a list of author records",
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_author(item).map_err(|reason| FrontMatterError::InvalidAuthor { index, reason }))
        .collect()
}

fn parse_author(value: &MetaValue) -> Result<Author, String> {
    let MetaValue::Map(fields) = value else {
        return Err(format!("expected a mapping, found {}", value.kind()));
    };
    let required = |key: &str| -> Result<String, String> {
        match fields.get(key) {
            Some(MetaValue::String(s)) => Ok(s.clone()),
            Some(other) => Err(format!("`{key}` must be a string, found {}", other.kind())),
            None => Err(format!("missing `{key}`")),
        }
    };

    let gender = match fields.get("gender") {
        None | Some(MetaValue::Null) => Gender::Male,
        Some(MetaValue::String(s)) => match s.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            other => return Err(format!("unknown gender `{other}`")),
        },
        Some(other) => return Err(format!("`gender` must be a string, found {}", other.kind())),
    };
    let email = match fields.get("email") {
        None | Some(MetaValue::Null) => None,
        Some(MetaValue::String(s)) => Some(s.clone()),
        Some(other) => return Err(format!("`email` must be a string, found {}", other.kind())),
    };

    Ok(Author {
        first_name: required("first_name")?,
        last_name: required("last_name")?,
        username: required("username")?,
        url: required("url")?,
        gender,
        email,
    })
}

/// Reading time at 200 words per minute, never less than one minute.
///
/// Under an hour reads `"N min"`, otherwise whole hours as `"N h"`.
pub fn estimate_reading_time(text: &str) -> String {
    let words = WORD.find_iter(text).count();
    let minutes = (words / WORDS_PER_MINUTE + 1).max(1);
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h", minutes / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(yaml: &str) -> Metadata {
        let doc = format!("---\n{yaml}\n---\nbody");
        split_front_matter(&doc).unwrap().0
    }

    const VALID: &str = "title: Sample Blog Post\n\
publication_time: 2023-01-15T09:00:00\n\
section: Technology\n\
image: https://example.com/image.jpg";

    // =========================================================================
    // Splitting
    // =========================================================================

    #[test]
    fn split_separates_block_and_body() {
        let doc = "---\ntitle: Hello\n---\n# Heading\n\nText.\n";
        let (metadata, body) = split_front_matter(doc).unwrap();
        assert_eq!(metadata.get("title"), Some(&MetaValue::String("Hello".into())));
        assert_eq!(body, "# Heading\n\nText.");
    }

    #[test]
    fn split_without_fence_is_all_body() {
        let (metadata, body) = split_front_matter("# Just markdown\n").unwrap();
        assert!(metadata.is_empty());
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn split_unterminated_block_is_error() {
        let result = split_front_matter("---\ntitle: Hello\n# no closing fence");
        assert!(matches!(result, Err(FrontMatterError::Unterminated)));
    }

    #[test]
    fn split_rejects_non_mapping_block() {
        let result = split_front_matter("---\n- a\n- b\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::NotAMapping)));
    }

    #[test]
    fn split_invalid_yaml_is_error() {
        let result = split_front_matter("---\ntitle: [unclosed\n---\nbody");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn timestamps_resolve_to_datetime() {
        let m = meta("a: 2023-01-15T09:00:00\nb: 2023-01-15 09:00:00+01:00\nc: 2023-01-15\nd: January 15");
        assert!(matches!(m.get("a"), Some(MetaValue::DateTime(t)) if t.offset.is_none()));
        assert!(matches!(m.get("b"), Some(MetaValue::DateTime(t)) if t.offset.is_some()));
        assert!(matches!(m.get("c"), Some(MetaValue::Date(_))));
        assert!(matches!(m.get("d"), Some(MetaValue::String(_))));
    }

    #[test]
    fn iso_format_matches_input_shape() {
        let m = meta("a: 2023-01-15T09:00:00\nb: 2023-01-15T09:00:00.5Z\nc: 2023-01-15T09:00:00-05:30");
        let iso = |k: &str| match m.get(k) {
            Some(MetaValue::DateTime(t)) => t.iso_format(),
            other => panic!("{k} is not a date-time: {other:?}"),
        };
        assert_eq!(iso("a"), "2023-01-15T09:00:00");
        assert_eq!(iso("b"), "2023-01-15T09:00:00.500000+00:00");
        assert_eq!(iso("c"), "2023-01-15T09:00:00-05:30");
    }

    #[test]
    fn publish_times_order_by_instant() {
        let m = meta("early: 2023-01-15T09:00:00+02:00\nlate: 2023-01-15T08:00:00Z");
        let (Some(MetaValue::DateTime(early)), Some(MetaValue::DateTime(late))) =
            (m.get("early"), m.get("late"))
        else {
            panic!("expected date-times");
        };
        assert!(early < late);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn parse_valid_front_matter() {
        let fm = parse_front_matter(&meta(VALID), 731).unwrap();
        assert_eq!(fm.title, "Sample Blog Post");
        assert_eq!(fm.publication_time.iso_format(), "2023-01-15T09:00:00");
        assert_eq!(fm.modified_time, fm.publication_time);
        assert_eq!(fm.expiration_time.iso_format(), "2025-01-15T09:00:00");
        assert_eq!(fm.section, "Technology");
        assert_eq!(fm.image.as_deref(), Some("https://example.com/image.jpg"));
        assert_eq!(fm.language, "en");
        assert!(fm.tags.is_empty());
        assert!(!fm.draft);
        assert_eq!(fm.authors, vec![default_author()]);
    }

    #[test]
    fn default_author_carries_contact() {
        let author = default_author();
        assert_eq!(author.full_name(), "João Monteiro");
        assert_eq!(author.username, "Portugapt");
        assert_eq!(
            author.email.as_deref(),
            Some("monteiro (dot) joao (dot) ps (at) gmail (dot) com")
        );
    }

    #[test]
    fn expiration_is_never_before_publication() {
        let fm = parse_front_matter(&meta(VALID), 0).unwrap();
        assert_eq!(fm.expiration_time, fm.publication_time);
    }

    #[test]
    fn missing_title_is_error() {
        let yaml = "publication_time: 2023-01-15T09:00:00\nsection: Tech";
        let result = parse_front_matter(&meta(yaml), 731);
        assert!(matches!(result, Err(FrontMatterError::MissingTitle)));
    }

    #[test]
    fn string_publication_time_is_rejected() {
        let yaml = "title: T\npublication_time: last tuesday\nsection: Tech";
        let err = parse_front_matter(&meta(yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotADateTime { field: "publication_time", .. }));
    }

    #[test]
    fn date_only_publication_time_is_rejected() {
        let yaml = "title: T\npublication_time: 2023-01-15\nsection: Tech";
        let err = parse_front_matter(&meta(yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::NotADateTime { .. }));
    }

    #[test]
    fn tags_must_be_list_of_strings() {
        let not_list = format!("{VALID}\ntags: not-a-list");
        assert!(matches!(
            parse_front_matter(&meta(&not_list), 731),
            Err(FrontMatterError::InvalidTags)
        ));

        let mixed = format!("{VALID}\ntags: [rust, 42]");
        assert!(matches!(
            parse_front_matter(&meta(&mixed), 731),
            Err(FrontMatterError::InvalidTags)
        ));

        let ok = format!("{VALID}\ntags: [rust, web]");
        let fm = parse_front_matter(&meta(&ok), 731).unwrap();
        assert_eq!(fm.tags, vec!["rust", "web"]);
    }

    #[test]
    fn missing_section_is_error() {
        let yaml = "title: T\npublication_time: 2023-01-15T09:00:00";
        let err = parse_front_matter(&meta(yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidSection { attempted: None }));
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn empty_section_reports_attempted_value() {
        let yaml = "title: T\npublication_time: 2023-01-15T09:00:00\nsection: ''";
        let err = parse_front_matter(&meta(yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidSection { attempted: Some(ref v) } if v == "\"\""));
    }

    #[test]
    fn image_accepts_src_mapping() {
        let yaml = "title: T\npublication_time: 2023-01-15T09:00:00\nsection: Tech\nimage:\n  src: /img/cover.png\n  alt: Cover";
        let fm = parse_front_matter(&meta(yaml), 731).unwrap();
        assert_eq!(fm.image.as_deref(), Some("/img/cover.png"));
    }

    #[test]
    fn image_is_optional_at_this_level() {
        let yaml = "title: T\npublication_time: 2023-01-15T09:00:00\nsection: Tech";
        let fm = parse_front_matter(&meta(yaml), 731).unwrap();
        assert_eq!(fm.image, None);
    }

    #[test]
    fn explicit_authors_replace_default() {
        let yaml = format!(
            "{VALID}\nauthors:\n  - first_name: Ada\n    last_name: Lovelace\n    username: ada\n    url: https://ada.example\n    gender: female"
        );
        let fm = parse_front_matter(&meta(&yaml), 731).unwrap();
        assert_eq!(fm.authors.len(), 1);
        assert_eq!(fm.authors[0].username, "ada");
        assert_eq!(fm.authors[0].gender, Gender::Female);
    }

    #[test]
    fn invalid_author_names_index() {
        let yaml = format!("{VALID}\nauthors:\n  - first_name: Ada");
        let err = parse_front_matter(&meta(&yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidAuthor { index: 0, ref reason } if reason.contains("last_name")));
    }

    #[test]
    fn language_description_and_draft() {
        let yaml = format!("{VALID}\nlanguage: pt\ndescription: A post\ndraft: true\nthumbnail: /t.png");
        let fm = parse_front_matter(&meta(&yaml), 731).unwrap();
        assert_eq!(fm.language, "pt");
        assert_eq!(fm.description.as_deref(), Some("A post"));
        assert_eq!(fm.thumbnail.as_deref(), Some("/t.png"));
        assert!(fm.draft);
    }

    #[test]
    fn non_string_description_is_error() {
        let yaml = format!("{VALID}\ndescription: [a, b]");
        let err = parse_front_matter(&meta(&yaml), 731).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidField { field: "description", .. }));
    }

    #[test]
    fn modified_time_overrides_default() {
        let yaml = format!("{VALID}\nmodified_time: 2023-02-01T10:00:00");
        let fm = parse_front_matter(&meta(&yaml), 731).unwrap();
        assert_eq!(fm.modified_time.iso_format(), "2023-02-01T10:00:00");
    }

    // =========================================================================
    // Reading time
    // =========================================================================

    #[test]
    fn reading_time_short_text_is_one_min() {
        assert_eq!(
            estimate_reading_time("# Sample Blog Post\nThis is a sample blog post content."),
            "1 min"
        );
        assert_eq!(estimate_reading_time(""), "1 min");
    }

    #[test]
    fn reading_time_scales_with_words() {
        let text = "word ".repeat(400);
        assert_eq!(estimate_reading_time(&text), "3 min");
    }

    #[test]
    fn reading_time_switches_to_hours() {
        let text = "word ".repeat(200 * 59);
        assert_eq!(estimate_reading_time(&text), "1 h");
        let text = "word ".repeat(200 * 130);
        assert_eq!(estimate_reading_time(&text), "2 h");
    }
}
