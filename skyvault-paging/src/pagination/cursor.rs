//! Opaque cursor tokens.
//!
//! A cursor is the URL-safe, unpadded base64 of a small JSON object:
//!
//! ```text
//! {"id":"42"}                                  sort-by id
//! {"id":"42","name":"report, final.pdf"}       sort-by name
//! {"id":"42","updated":"2024-01-15T10:00:00Z"} sort-by updated
//! ```
//!
//! The key set must match the sort key the cursor is decoded under, so a
//! token minted while sorting by name is rejected when sorting by date.
//!
//! Cursors are encoded, **not encrypted**. Clients can read them; never put
//! anything in a cursor that the client may not already see.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::PagingConfig;

use super::keyset::IdentityKind;
use super::options::SortBy;

/// A row that can anchor a page.
///
/// Implemented by whatever type the store returns; the assembler mints
/// cursors from the first and last item through it.
pub trait PageItem {
    /// String form of the row's unique identity.
    fn cursor_id(&self) -> String;

    /// Display name, used when sorting by name.
    fn cursor_name(&self) -> &str;

    /// Last-modified time, used when sorting by update time.
    fn cursor_updated(&self) -> DateTime<Utc>;
}

/// The secondary sort value carried by a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CursorKey {
    /// No secondary value; identity alone orders the rows.
    Identity,
    /// Anchor name.
    Name(String),
    /// Anchor update time.
    Updated(DateTime<Utc>),
}

/// Decoded anchor of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "cursor must be encoded with .encode() or planned with KeysetPlan"]
pub struct Cursor {
    /// Identity of the anchor row.
    pub id: String,
    /// Secondary sort value of the anchor row.
    pub key: CursorKey,
}

/// JSON shape of the cursor payload.
#[derive(Serialize)]
struct WireCursor {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<String>,
}

impl Cursor {
    /// Cursor for identity ordering.
    pub fn identity(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: CursorKey::Identity,
        }
    }

    /// Cursor for name ordering.
    pub fn name(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: CursorKey::Name(name.into()),
        }
    }

    /// Cursor for update-time ordering.
    pub fn updated(id: impl Into<String>, updated: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            key: CursorKey::Updated(updated),
        }
    }

    /// Mint a cursor from a row's own key values.
    pub fn for_item<T: PageItem + ?Sized>(item: &T, sort_by: SortBy) -> Self {
        let id = item.cursor_id();
        match sort_by {
            SortBy::Identity => Self::identity(id),
            SortBy::Name => Self::name(id, item.cursor_name()),
            SortBy::Updated => Self::updated(id, item.cursor_updated()),
        }
    }

    /// The sort key this cursor anchors.
    #[must_use]
    pub const fn sort_by(&self) -> SortBy {
        match self.key {
            CursorKey::Identity => SortBy::Identity,
            CursorKey::Name(_) => SortBy::Name,
            CursorKey::Updated(_) => SortBy::Updated,
        }
    }

    /// Encode as an opaque, URL-safe token.
    #[must_use]
    pub fn encode(&self) -> String {
        let (name, updated) = match &self.key {
            CursorKey::Identity => (None, None),
            CursorKey::Name(name) => (Some(name.clone()), None),
            CursorKey::Updated(ts) => (None, Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
        };
        let wire = WireCursor {
            id: self.id.clone(),
            name,
            updated,
        };
        // Serializing a struct of strings cannot fail.
        let json = serde_json::to_vec(&wire).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token under `sort_by`, using the process-wide length limit.
    ///
    /// An empty token means "no anchor" and decodes to `Ok(None)`.
    pub fn decode(raw: &str, sort_by: SortBy) -> Result<Option<Self>, CursorError> {
        Self::decode_with_limit(raw, sort_by, PagingConfig::global().max_cursor_len)
    }

    /// Decode a token under `sort_by`, rejecting tokens longer than `max_len`.
    pub fn decode_with_limit(
        raw: &str,
        sort_by: SortBy,
        max_len: usize,
    ) -> Result<Option<Self>, CursorError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let result = Self::parse(raw, sort_by, max_len);
        if let Err(err) = &result {
            tracing::debug!(%err, %sort_by, len = raw.len(), "rejected cursor");
        }
        result.map(Some)
    }

    fn parse(raw: &str, sort_by: SortBy, max_len: usize) -> Result<Self, CursorError> {
        if raw.len() > max_len {
            return Err(CursorError::TooLong {
                len: raw.len(),
                max: max_len,
            });
        }
        let json = URL_SAFE_NO_PAD
            .decode(raw)
            .map_err(|_| CursorError::Encoding)?;
        let fields: Map<String, Json> =
            serde_json::from_slice(&json).map_err(|_| CursorError::Malformed)?;

        // Every present key counts, and every value must be a string.
        let found = fields.len();
        let (mut id, mut name, mut updated) = (None, None, None);
        for (field, value) in fields {
            let Json::String(text) = value else {
                return Err(CursorError::Malformed);
            };
            match field.as_str() {
                "id" => id = Some(text),
                "name" => name = Some(text),
                "updated" => updated = Some(text),
                _ => return Err(CursorError::Malformed),
            }
        }
        let id = id.ok_or(CursorError::Malformed)?;

        let key = match (sort_by, name, updated) {
            (SortBy::Identity, None, None) => CursorKey::Identity,
            (SortBy::Name, Some(name), None) => CursorKey::Name(name),
            (SortBy::Updated, None, Some(ts)) => {
                let parsed = DateTime::parse_from_rfc3339(&ts)
                    .map_err(|_| CursorError::Timestamp(ts.clone()))?;
                CursorKey::Updated(parsed.with_timezone(&Utc))
            },
            _ => {
                return Err(CursorError::FieldMismatch {
                    sort_by,
                    found,
                    expected: sort_by.cursor_fields(),
                });
            },
        };

        Ok(Self { id, key })
    }
}

/// Error type for cursor decoding.
///
/// Every variant means the client sent an invalid cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The token is longer than the configured limit.
    #[error("cursor exceeds maximum length ({len} > {max} bytes)")]
    TooLong {
        /// Length of the rejected token.
        len: usize,
        /// Configured limit.
        max: usize,
    },
    /// The token is not URL-safe base64.
    #[error("invalid base64 encoding in cursor")]
    Encoding,
    /// The payload is not a cursor object.
    #[error("invalid cursor format (expected JSON object)")]
    Malformed,
    /// The payload's fields do not fit the requested sort key.
    #[error("cursor has {found} field(s), sort-by '{sort_by}' needs {expected}")]
    FieldMismatch {
        /// Sort key the cursor was decoded under.
        sort_by: SortBy,
        /// Fields present in the payload.
        found: usize,
        /// Fields the sort key requires.
        expected: usize,
    },
    /// The `updated` field is not an RFC 3339 timestamp.
    #[error("invalid cursor timestamp '{0}'")]
    Timestamp(String),
    /// The `id` field does not parse as the column's identity kind.
    #[error("cursor id '{value}' is not a valid {kind}")]
    Identity {
        /// Declared identity kind of the column.
        kind: IdentityKind,
        /// The rejected id.
        value: String,
    },
}

impl CursorError {
    /// Always `true`: every cursor error is an invalid-cursor error.
    #[inline]
    #[must_use]
    pub const fn is_invalid_cursor(&self) -> bool {
        true
    }

    /// Returns `true` if this is an encoding/format error.
    ///
    /// Includes everything except `TooLong`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        !self.is_limit_error()
    }

    /// Returns `true` if this is a size/limit error.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLong { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, nanos).single().unwrap()
    }

    fn encode_json(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(raw: &str, sort_by: SortBy) -> Result<Option<Cursor>, CursorError> {
        Cursor::decode_with_limit(raw, sort_by, 1024)
    }

    #[test]
    fn test_round_trip_each_key() {
        let cursors = [
            Cursor::identity("42"),
            Cursor::name("7", "quarterly report.pdf"),
            Cursor::updated("c0ffee", ts(1_705_312_800, 0)),
            Cursor::updated("c0ffee", ts(1_705_312_800, 123_456_789)),
            Cursor::updated("c0ffee", ts(1_705_312_800, 1_000)),
        ];
        for cursor in cursors {
            let encoded = cursor.encode();
            let decoded = decode(&encoded, cursor.sort_by()).unwrap();
            assert_eq!(decoded, Some(cursor));
        }
    }

    #[test]
    fn test_names_with_delimiters_round_trip() {
        let cursor = Cursor::name("1", r#"a,b "quoted" \ ü/📁"#);
        let decoded = decode(&cursor.encode(), SortBy::Name).unwrap();
        assert_eq!(decoded, Some(cursor));
    }

    #[test]
    fn test_encoding_is_url_safe() {
        let encoded = Cursor::name("1", "???>>>~~~").encode();
        assert!(
            encoded
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        );
    }

    #[test]
    fn test_empty_is_no_anchor() {
        assert_eq!(decode("", SortBy::Name).unwrap(), None);
        assert_eq!(decode("", SortBy::Identity).unwrap(), None);
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(1025);
        assert_eq!(
            decode(&long, SortBy::Identity),
            Err(CursorError::TooLong {
                len: 1025,
                max: 1024
            })
        );

        // Exactly at the limit reaches the decoder
        let at_limit = "a".repeat(1024);
        assert!(!matches!(
            decode(&at_limit, SortBy::Identity),
            Err(CursorError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_base64() {
        assert_eq!(decode("not base64!", SortBy::Name), Err(CursorError::Encoding));
        // Standard alphabet padding is not accepted
        assert_eq!(decode("eyJpZCI6IjEifQ==", SortBy::Identity), Err(CursorError::Encoding));
    }

    #[test]
    fn test_malformed_payload() {
        for json in ["[1,2]", "not json", r#"{"name":"a"}"#, r#"{"id":1}"#] {
            assert_eq!(
                decode(&encode_json(json), SortBy::Name),
                Err(CursorError::Malformed),
                "{json}"
            );
        }
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = encode_json(r#"{"id":"1","name":"a","size":10}"#);
        assert_eq!(decode(&raw, SortBy::Name), Err(CursorError::Malformed));
    }

    #[test]
    fn test_field_count_mismatch() {
        let identity = Cursor::identity("1").encode();
        assert_eq!(
            decode(&identity, SortBy::Name),
            Err(CursorError::FieldMismatch {
                sort_by: SortBy::Name,
                found: 1,
                expected: 2
            })
        );

        let named = Cursor::name("1", "a").encode();
        assert_eq!(
            decode(&named, SortBy::Identity),
            Err(CursorError::FieldMismatch {
                sort_by: SortBy::Identity,
                found: 2,
                expected: 1
            })
        );

        let both = encode_json(r#"{"id":"1","name":"a","updated":"2024-01-01T00:00:00Z"}"#);
        assert!(matches!(
            decode(&both, SortBy::Updated),
            Err(CursorError::FieldMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn test_null_fields_rejected() {
        for json in [
            r#"{"id":"1","name":null}"#,
            r#"{"id":"1","updated":null}"#,
            r#"{"id":"1","name":null,"updated":null}"#,
            r#"{"id":null}"#,
        ] {
            for sort_by in [SortBy::Identity, SortBy::Name, SortBy::Updated] {
                assert_eq!(
                    decode(&encode_json(json), sort_by),
                    Err(CursorError::Malformed),
                    "{json} under {sort_by}"
                );
            }
        }
    }

    #[test]
    fn test_cross_sort_key_replay_rejected() {
        let named = Cursor::name("1", "a").encode();
        assert!(matches!(
            decode(&named, SortBy::Updated),
            Err(CursorError::FieldMismatch { found: 2, .. })
        ));
    }

    #[test]
    fn test_bad_timestamp() {
        let raw = encode_json(r#"{"id":"1","updated":"yesterday"}"#);
        assert_eq!(
            decode(&raw, SortBy::Updated),
            Err(CursorError::Timestamp("yesterday".into()))
        );
    }

    #[test]
    fn test_offset_timestamp_normalized_to_utc() {
        let raw = encode_json(r#"{"id":"1","updated":"2024-01-15T12:00:00+02:00"}"#);
        let cursor = decode(&raw, SortBy::Updated).unwrap().unwrap();
        assert_eq!(cursor.key, CursorKey::Updated(ts(1_705_312_800, 0)));
    }

    #[test]
    fn test_error_classification() {
        let too_long = CursorError::TooLong { len: 2, max: 1 };
        assert!(too_long.is_limit_error());
        assert!(!too_long.is_format_error());
        assert!(CursorError::Encoding.is_format_error());
        assert!(CursorError::Malformed.is_format_error());
        assert!(CursorError::Timestamp(String::new()).is_invalid_cursor());
    }

    struct File {
        id: i64,
        name: &'static str,
        updated: DateTime<Utc>,
    }

    impl PageItem for File {
        fn cursor_id(&self) -> String {
            self.id.to_string()
        }

        fn cursor_name(&self) -> &str {
            self.name
        }

        fn cursor_updated(&self) -> DateTime<Utc> {
            self.updated
        }
    }

    #[test]
    fn test_for_item() {
        let file = File {
            id: 9,
            name: "notes.txt",
            updated: ts(1_700_000_000, 0),
        };
        assert_eq!(Cursor::for_item(&file, SortBy::Identity), Cursor::identity("9"));
        assert_eq!(Cursor::for_item(&file, SortBy::Name), Cursor::name("9", "notes.txt"));
        assert_eq!(
            Cursor::for_item(&file, SortBy::Updated),
            Cursor::updated("9", ts(1_700_000_000, 0))
        );
    }
}
