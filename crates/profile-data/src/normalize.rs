//! Normalization of backend responses into canonical domain types.
//!
//! The backend (and its older snapshots) is inconsistent about field names
//! and encodings:
//! - owning user as `user_id` or `userId`
//! - tag lists as a JSON array, a JSON-encoded array string, or a
//!   comma-separated string
//! - photo as `photo_url`, `photoUrl` or the first entry of `photos`,
//!   either absolute or relative to the API host
//! - match records carrying the other profile as `matched_profile`,
//!   `matchedProfile` or `profile`
//! - page envelopes as `{"content": [...]}` or a bare array
//!
//! Every variant is resolved here so the queue never branches on shape.

use crate::error::{ProfileDataError, Result};
use crate::types::{Candidate, MatchRecord, ProfileId};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

type Record = Map<String, Value>;

/// Convert a single profile object into a `Candidate`.
///
/// `base_url` is the normalized API base used to resolve relative photo
/// paths. Only `id` is mandatory; missing display fields become empty.
pub fn candidate_from_value(value: &Value, base_url: Option<&str>) -> Result<Candidate> {
    let record = as_record(value, "profile")?;

    let id = id_field(record, &["id"])?.ok_or_else(|| ProfileDataError::MissingField {
        field: "id".to_string(),
    })?;
    let user_id = id_field(record, &["user_id", "userId"])?.unwrap_or(id);

    let name = string_field(record, &["name", "first_name", "firstName"]).unwrap_or_default();
    let age = age_field(record)?;

    let photo_url = string_field(record, &["photo_url", "photoUrl"])
        .or_else(|| first_photo(record))
        .and_then(|path| resolve_photo_url(base_url, &path));

    Ok(Candidate {
        id,
        user_id,
        name,
        age,
        city: string_field(record, &["city"]).unwrap_or_default(),
        university: string_field(record, &["university"]).unwrap_or_default(),
        bio: string_field(record, &["bio"]).unwrap_or_default(),
        interests: tag_set(first_present(record, &["interests"])),
        goals: tag_set(first_present(record, &["goals"])),
        photo_url,
    })
}

/// Convert a page of profiles into candidates.
///
/// Malformed entries are skipped with a warning rather than failing the
/// whole page; an unrecognizable envelope is an error.
pub fn candidates_from_page(value: &Value, base_url: Option<&str>) -> Result<Vec<Candidate>> {
    let items = page_items(value)?;

    let mut candidates = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match candidate_from_value(item, base_url) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => warn!("Skipping profile at position {}: {}", idx, err),
        }
    }
    Ok(candidates)
}

/// Convert a single match record.
pub fn match_from_value(value: &Value, base_url: Option<&str>) -> Result<MatchRecord> {
    let record = as_record(value, "match")?;

    let profile_value = ["matched_profile", "matchedProfile", "profile"]
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
        .ok_or_else(|| ProfileDataError::MissingField {
            field: "matched_profile".to_string(),
        })?;

    Ok(MatchRecord {
        match_id: id_field(record, &["id", "match_id", "matchId"])?,
        profile: candidate_from_value(profile_value, base_url)?,
        matched_at: string_field(record, &["matched_at", "matchedAt"]),
    })
}

/// Convert the matches listing, skipping records without a usable profile.
pub fn matches_from_value(value: &Value, base_url: Option<&str>) -> Result<Vec<MatchRecord>> {
    let items = page_items(value)?;

    let mut matches = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match match_from_value(item, base_url) {
            Ok(record) => matches.push(record),
            Err(err) => warn!("Skipping match at position {}: {}", idx, err),
        }
    }
    Ok(matches)
}

/// Interpret any of the tag encodings as a set of trimmed, non-empty tags.
pub fn tag_set(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(clean_tag)
            .collect(),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            if raw.starts_with('[') {
                if let Ok(items) = serde_json::from_str::<Vec<String>>(raw) {
                    return items.iter().filter_map(|s| clean_tag(s)).collect();
                }
            }
            raw.split(',').filter_map(clean_tag).collect()
        }
        _ => BTreeSet::new(),
    }
}

/// Resolve a stored photo path against the API base URL.
///
/// - absolute `http(s)://` URLs are returned unchanged
/// - `/path` is appended to the base
/// - a bare file name lives under `/uploads/photos/`
pub fn resolve_photo_url(base_url: Option<&str>, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    let Some(base) = base_url else {
        return Some(path.to_string());
    };
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/uploads/photos/{}", base, path))
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn as_record<'a>(value: &'a Value, what: &str) -> Result<&'a Record> {
    value.as_object().ok_or_else(|| {
        ProfileDataError::UnexpectedShape(format!("expected {} object, got {}", what, kind_of(value)))
    })
}

fn page_items(value: &Value) -> Result<&Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(record) => record
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ProfileDataError::UnexpectedShape("object without a content array".to_string())
            }),
        other => Err(ProfileDataError::UnexpectedShape(format!(
            "expected array or page object, got {}",
            kind_of(other)
        ))),
    }
}

fn first_present<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
}

fn string_field(record: &Record, keys: &[&str]) -> Option<String> {
    match first_present(record, keys)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_field(record: &Record, keys: &[&str]) -> Result<Option<ProfileId>> {
    let Some((key, value)) = keys
        .iter()
        .filter_map(|key| record.get(*key).map(|v| (*key, v)))
        .find(|(_, v)| !v.is_null())
    else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| ProfileDataError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
    })
}

fn age_field(record: &Record) -> Result<Option<u32>> {
    match id_field(record, &["age"])? {
        Some(age) => u32::try_from(age)
            .map(Some)
            .map_err(|_| ProfileDataError::InvalidValue {
                field: "age".to_string(),
                value: age.to_string(),
            }),
        None => Ok(None),
    }
}

fn first_photo(record: &Record) -> Option<String> {
    record
        .get("photos")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn clean_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: Option<&str> = Some("https://api.example.test");

    #[test]
    fn test_candidate_from_snake_case_record() {
        let value = json!({
            "id": 7,
            "user_id": 7007,
            "name": "Maria",
            "age": 21,
            "city": "Saint Petersburg",
            "university": "SPbU",
            "interests": "[\"Design\", \"Photography\"]",
            "goals": "Friends, Projects",
            "bio": "Designer",
            "photo_url": "/uploads/photos/m.jpg"
        });

        let candidate = candidate_from_value(&value, BASE).unwrap();

        assert_eq!(candidate.id, 7);
        assert_eq!(candidate.user_id, 7007);
        assert_eq!(candidate.age, Some(21));
        assert!(candidate.interests.contains("Design"));
        assert!(candidate.interests.contains("Photography"));
        assert_eq!(candidate.goals.len(), 2);
        assert_eq!(
            candidate.photo_url.as_deref(),
            Some("https://api.example.test/uploads/photos/m.jpg")
        );
    }

    #[test]
    fn test_candidate_from_camel_case_record() {
        let value = json!({
            "id": "12",
            "userId": 99,
            "name": "Ivan",
            "interests": ["Sport", " Gym ", ""],
            "photos": ["ivan.png"]
        });

        let candidate = candidate_from_value(&value, BASE).unwrap();

        assert_eq!(candidate.id, 12);
        assert_eq!(candidate.user_id, 99);
        assert_eq!(candidate.interests.len(), 2);
        assert!(candidate.interests.contains("Gym"));
        assert_eq!(
            candidate.photo_url.as_deref(),
            Some("https://api.example.test/uploads/photos/ivan.png")
        );
    }

    #[test]
    fn test_candidate_requires_id() {
        let err = candidate_from_value(&json!({"name": "Nobody"}), BASE).unwrap_err();
        assert!(matches!(err, ProfileDataError::MissingField { .. }));

        let err = candidate_from_value(&json!({"id": "abc"}), BASE).unwrap_err();
        assert!(matches!(err, ProfileDataError::InvalidValue { .. }));
    }

    #[test]
    fn test_page_envelopes() {
        let page = json!({"content": [{"id": 1}, {"name": "broken"}, {"id": 2}], "total_elements": 3});
        let candidates = candidates_from_page(&page, BASE).unwrap();
        assert_eq!(candidates.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

        let bare = json!([{"id": 3}]);
        assert_eq!(candidates_from_page(&bare, BASE).unwrap().len(), 1);

        assert!(candidates_from_page(&json!({"items": []}), BASE).is_err());
    }

    #[test]
    fn test_match_field_name_variants() {
        let listing = json!([
            {"id": 1, "matched_profile": {"id": 10}, "matched_at": "2024-01-01T00:00:00"},
            {"id": 2, "matchedProfile": {"id": 20}},
            {"id": 3, "profile": {"id": 30}},
            {"id": 4, "matched_profile": null}
        ]);

        let matches = matches_from_value(&listing, BASE).unwrap();

        assert_eq!(
            matches.iter().map(|m| m.profile.id).collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
        assert_eq!(matches[0].matched_at.as_deref(), Some("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_resolve_photo_url() {
        assert_eq!(
            resolve_photo_url(BASE, "https://cdn.test/a.jpg").as_deref(),
            Some("https://cdn.test/a.jpg")
        );
        assert_eq!(resolve_photo_url(BASE, "   "), None);
        assert_eq!(resolve_photo_url(None, "a.jpg").as_deref(), Some("a.jpg"));
    }
}
