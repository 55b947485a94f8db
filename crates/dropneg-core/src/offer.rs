#![forbid(unsafe_code)]

//! Drag offers: the raw field map published by a drag source, and the
//! validated [`OfferSpec`] the dialog is built from.
//!
//! # Validity
//!
//! An offer is accepted only when:
//!
//! 1. `be:types` is present, non-empty, and string-typed;
//! 2. if `be:types` contains [`FILE_SENTINEL`], `be:filetypes` is present,
//!    non-empty, and string-typed;
//! 3. `be:actions` is present, non-empty, and int32-typed.
//!
//! Checks run in that order and the first failure is reported. A sentinel
//! that is not the last type is tolerated and recorded as an
//! [`OfferDiagnostic`].
//!
//! # JSON
//!
//! [`RawOffer::from_json`] maps a JSON object onto fields: arrays of strings
//! become [`FieldValue::Strings`], arrays of integers in `i32` range become
//! [`FieldValue::Int32s`], a bare string or integer is a one-element list,
//! and anything else is kept as [`FieldValue::Other`] so the parser can
//! report it as wrongly typed.

use crate::action::DropAction;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Field listing the offered representations.
pub const FIELD_TYPES: &str = "be:types";
/// Field listing the representations available when dropping as a file.
pub const FIELD_FILETYPES: &str = "be:filetypes";
/// Field listing the permitted action codes.
pub const FIELD_ACTIONS: &str = "be:actions";
/// Field carrying a suggested name for the dropped clip.
pub const FIELD_CLIP_NAME: &str = "be:clip_name";
/// Field carrying human-readable descriptions parallel to `be:types`.
pub const FIELD_TYPE_DESCS: &str = "be:type_descriptions";
/// Field identifying the drag source. Carried through, never interpreted.
pub const FIELD_ORIGINATOR: &str = "be:originator";

/// Reserved type meaning "the data will be delivered as a saved file".
pub const FILE_SENTINEL: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// RawOffer
// ---------------------------------------------------------------------------

/// The type of a raw field, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A list of strings.
    Strings,
    /// A list of 32-bit integers.
    Int32s,
    /// Anything else.
    Other,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strings => write!(f, "string list"),
            Self::Int32s => write!(f, "int32 list"),
            Self::Other => write!(f, "unsupported type"),
        }
    }
}

/// The value of one field of a raw offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A list of strings.
    Strings(Vec<String>),
    /// A list of 32-bit integers.
    Int32s(Vec<i32>),
    /// A field of a type the dialog does not understand.
    Other {
        /// Name of the type, for diagnostics.
        type_name: String,
        /// Number of elements.
        count: usize,
    },
}

impl FieldValue {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Strings(_) => FieldKind::Strings,
            Self::Int32s(_) => FieldKind::Int32s,
            Self::Other { .. } => FieldKind::Other,
        }
    }

    /// Number of elements in the field.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) => v.len(),
            Self::Int32s(v) => v.len(),
            Self::Other { count, .. } => *count,
        }
    }

    /// Returns true if the field holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Strings(vec![s.clone()]),
            Value::Number(_) => match json_i32(value) {
                Some(n) => Self::Int32s(vec![n]),
                None => Self::other("number", 1),
            },
            Value::Array(items) if items.is_empty() => Self::Strings(Vec::new()),
            Value::Array(items) => {
                if let Some(strings) = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
                {
                    Self::Strings(strings)
                } else if let Some(ints) = items.iter().map(json_i32).collect::<Option<Vec<_>>>() {
                    Self::Int32s(ints)
                } else {
                    Self::other("mixed array", items.len())
                }
            }
            Value::Null => Self::other("null", 0),
            Value::Bool(_) => Self::other("bool", 1),
            Value::Object(map) => Self::other("object", map.len()),
        }
    }

    fn other(type_name: &str, count: usize) -> Self {
        Self::Other {
            type_name: type_name.to_string(),
            count,
        }
    }
}

fn json_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

/// The untrusted field map published by a drag source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOffer {
    fields: BTreeMap<String, FieldValue>,
}

impl RawOffer {
    /// Create an empty offer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an offer from a JSON object.
    pub fn from_json(text: &str) -> Result<Self, OfferError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Decode an offer from an already-parsed JSON value.
    pub fn from_json_value(value: &Value) -> Result<Self, OfferError> {
        let Value::Object(map) = value else {
            return Err(OfferError::NotAnObject);
        };
        let fields = map
            .iter()
            .map(|(name, v)| (name.clone(), FieldValue::from_json(v)))
            .collect();
        Ok(Self { fields })
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Remove a field.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Iterate over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a string-list field.
    #[must_use]
    pub fn with_strings<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_field(
            name,
            FieldValue::Strings(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Set an int32-list field.
    #[must_use]
    pub fn with_int32s(self, name: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Self {
        self.with_field(name, FieldValue::Int32s(values.into_iter().collect()))
    }

    /// Set `be:types`.
    #[must_use]
    pub fn with_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_strings(FIELD_TYPES, types)
    }

    /// Set `be:filetypes`.
    #[must_use]
    pub fn with_file_types<I, S>(self, file_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_strings(FIELD_FILETYPES, file_types)
    }

    /// Set `be:actions`.
    #[must_use]
    pub fn with_actions(self, actions: impl IntoIterator<Item = DropAction>) -> Self {
        self.with_int32s(FIELD_ACTIONS, actions.into_iter().map(DropAction::code))
    }

    /// Set `be:clip_name`.
    #[must_use]
    pub fn with_clip_name(self, name: impl Into<String>) -> Self {
        self.with_strings(FIELD_CLIP_NAME, [name.into()])
    }
}

// ---------------------------------------------------------------------------
// Errors and diagnostics
// ---------------------------------------------------------------------------

/// Why a required field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    /// The field is not in the offer.
    Absent,
    /// The field is present with no elements.
    Empty,
    /// The field has the wrong type.
    WrongType(FieldKind),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Empty => write!(f, "empty"),
            Self::WrongType(kind) => write!(f, "found {kind}"),
        }
    }
}

/// Errors produced while decoding or validating an offer.
#[derive(Debug)]
pub enum OfferError {
    /// A required field is absent, empty, or wrongly typed.
    MissingField {
        /// Field name.
        field: &'static str,
        /// Expected field type.
        expected: FieldKind,
        /// What was wrong with it.
        reason: MissingReason,
    },
    /// The JSON text could not be parsed.
    Json(serde_json::Error),
    /// The JSON value is not an object.
    NotAnObject,
}

impl OfferError {
    /// The offending field, for `MissingField` errors.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for OfferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField {
                field,
                expected,
                reason,
            } => write!(f, "offer field [{field}] must be a non-empty {expected} ({reason})"),
            Self::Json(e) => write!(f, "offer is not valid JSON: {e}"),
            Self::NotAnObject => write!(f, "offer JSON must be an object"),
        }
    }
}

impl std::error::Error for OfferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OfferError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Non-fatal findings recorded while parsing an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferDiagnostic {
    /// The file sentinel appears before the end of `be:types`.
    FileSentinelNotLast {
        /// Position of the misplaced sentinel.
        index: usize,
    },
    /// An optional field was present but unusable and has been ignored.
    IgnoredField {
        /// Field name.
        field: &'static str,
        /// Why it was ignored.
        reason: String,
    },
}

impl fmt::Display for OfferDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSentinelNotLast { index } => write!(
                f,
                "{FILE_SENTINEL} should only appear last in [{FIELD_TYPES}] (found at {index})"
            ),
            Self::IgnoredField { field, reason } => write!(f, "ignored [{field}]: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// OfferSpec
// ---------------------------------------------------------------------------

/// A validated offer. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSpec {
    types: Vec<String>,
    file_types: Vec<String>,
    actions: Vec<DropAction>,
    clip_name: Option<String>,
    type_descriptions: Vec<String>,
    diagnostics: Vec<OfferDiagnostic>,
}

impl OfferSpec {
    /// Validate and normalize a raw offer.
    pub fn parse(raw: &RawOffer) -> Result<Self, OfferError> {
        let mut diagnostics = Vec::new();

        let types = required_strings(raw, FIELD_TYPES)?;
        let last = types.len() - 1;
        let mut has_sentinel = false;
        for (index, ty) in types.iter().enumerate() {
            if ty == FILE_SENTINEL {
                has_sentinel = true;
                if index != last {
                    let diag = OfferDiagnostic::FileSentinelNotLast { index };
                    warn!(%diag, "offer diagnostic");
                    diagnostics.push(diag);
                }
            }
        }

        let file_types = if has_sentinel {
            required_strings(raw, FIELD_FILETYPES)?
        } else {
            if raw.get(FIELD_FILETYPES).is_some() {
                debug!(field = FIELD_FILETYPES, "no file sentinel offered; file types unused");
            }
            Vec::new()
        };

        let actions = match raw.get(FIELD_ACTIONS) {
            Some(FieldValue::Int32s(codes)) if !codes.is_empty() => {
                codes.iter().copied().map(DropAction).collect()
            }
            other => return Err(missing(FIELD_ACTIONS, FieldKind::Int32s, other)),
        };

        let clip_name = match raw.get(FIELD_CLIP_NAME) {
            None => None,
            Some(FieldValue::Strings(names)) if !names.is_empty() => Some(names[0].clone()),
            Some(value) => {
                ignore(&mut diagnostics, FIELD_CLIP_NAME, value);
                None
            }
        };

        let type_descriptions = match raw.get(FIELD_TYPE_DESCS) {
            None => Vec::new(),
            Some(FieldValue::Strings(descs)) if descs.len() == types.len() => descs.clone(),
            Some(value) => {
                ignore(&mut diagnostics, FIELD_TYPE_DESCS, value);
                Vec::new()
            }
        };

        Ok(Self {
            types,
            file_types,
            actions,
            clip_name,
            type_descriptions,
            diagnostics,
        })
    }

    /// All offered types in presentation order, sentinel included.
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Types that can be dropped directly (everything but the sentinel),
    /// paired with their menu label.
    pub fn direct_types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, ty)| ty.as_str() != FILE_SENTINEL)
            .map(|(i, ty)| {
                let label = self
                    .type_descriptions
                    .get(i)
                    .map_or(ty.as_str(), String::as_str);
                (ty.as_str(), label)
            })
    }

    /// File-branch types. Empty unless the sentinel was offered.
    #[must_use]
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    /// Permitted actions in presentation order.
    #[must_use]
    pub fn actions(&self) -> &[DropAction] {
        &self.actions
    }

    /// Whether the source can deliver the data as a file.
    #[must_use]
    pub fn offers_file(&self) -> bool {
        !self.file_types.is_empty()
    }

    /// Suggested name for the dropped clip.
    #[must_use]
    pub fn clip_name(&self) -> Option<&str> {
        self.clip_name.as_deref()
    }

    /// Non-fatal findings from parsing.
    #[must_use]
    pub fn diagnostics(&self) -> &[OfferDiagnostic] {
        &self.diagnostics
    }

    /// Whether `id` is one of the offered types (sentinel included).
    #[must_use]
    pub fn has_type(&self, id: &str) -> bool {
        self.types.iter().any(|t| t == id)
    }

    /// Whether `id` is one of the offered file types.
    #[must_use]
    pub fn has_file_type(&self, id: &str) -> bool {
        self.file_types.iter().any(|t| t == id)
    }

    /// Whether `action` is permitted.
    #[must_use]
    pub fn has_action(&self, action: DropAction) -> bool {
        self.actions.contains(&action)
    }
}

fn required_strings(raw: &RawOffer, field: &'static str) -> Result<Vec<String>, OfferError> {
    match raw.get(field) {
        Some(FieldValue::Strings(values)) if !values.is_empty() => Ok(values.clone()),
        other => Err(missing(field, FieldKind::Strings, other)),
    }
}

fn missing(field: &'static str, expected: FieldKind, found: Option<&FieldValue>) -> OfferError {
    let reason = match found {
        None => MissingReason::Absent,
        Some(value) if value.is_empty() => MissingReason::Empty,
        Some(value) => MissingReason::WrongType(value.kind()),
    };
    OfferError::MissingField {
        field,
        expected,
        reason,
    }
}

fn ignore(diagnostics: &mut Vec<OfferDiagnostic>, field: &'static str, value: &FieldValue) {
    let diag = OfferDiagnostic::IgnoredField {
        field,
        reason: format!("{} with {} element(s)", value.kind(), value.len()),
    };
    warn!(%diag, "offer diagnostic");
    diagnostics.push(diag);
}
