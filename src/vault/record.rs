//! `Record` and `RecordSet`: the plaintext inside the vault envelope.
//!
//! A record's `id` is its 1-based rank in name order.  It is not
//! persisted and is recomputed after every change to the set, so it is
//! only meaningful until the next insert, delete, or edit.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// Temporary id marking the record to locate after a re-sort.
const MOVED: usize = usize::MAX;

/// Timestamp format used in the persisted payload.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single credential entry.
///
/// Every persisted field has a serde default so payloads written by
/// older versions (or with fields missing) still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position in the owning `RecordSet` (1-based). Never persisted.
    #[serde(skip)]
    pub id: usize,

    /// Site, application, or device name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub mobile: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, with = "timestamp")]
    pub insert_time: Option<NaiveDateTime>,

    #[serde(default, with = "timestamp")]
    pub update_time: Option<NaiveDateTime>,
}

/// The user-editable part of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub username: String,
    pub password: String,
    pub description: String,
}

/// A partial edit: `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
}

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

impl Record {
    /// Create a record with both timestamps set to now.
    ///
    /// The name is trimmed and must not be empty.
    pub fn new(fields: RecordFields) -> Result<Self> {
        let name = fields.name.trim().to_string();
        if name.is_empty() {
            return Err(PassVaultError::EmptyRecordName);
        }

        let created = now();
        Ok(Self {
            id: 0,
            name,
            email: fields.email,
            mobile: fields.mobile,
            username: fields.username,
            password: fields.password,
            description: fields.description,
            insert_time: Some(created),
            update_time: Some(created),
        })
    }

    /// A copy of the editable fields.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            description: self.description.clone(),
        }
    }

    /// Apply `update`, touching `update_time` only if some value changed.
    ///
    /// Returns whether anything changed.
    pub fn apply(&mut self, update: RecordUpdate) -> Result<bool> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(PassVaultError::EmptyRecordName);
            }
        }

        let mut changed = false;
        changed |= replace_if_changed(&mut self.name, update.name.map(|n| n.trim().to_string()));
        changed |= replace_if_changed(&mut self.email, update.email);
        changed |= replace_if_changed(&mut self.mobile, update.mobile);
        changed |= replace_if_changed(&mut self.username, update.username);
        changed |= replace_if_changed(&mut self.password, update.password);
        changed |= replace_if_changed(&mut self.description, update.description);

        if changed {
            self.update_time = Some(now());
        }
        Ok(changed)
    }
}

fn replace_if_changed(field: &mut String, value: Option<String>) -> bool {
    match value {
        Some(v) if *field != v => {
            *field = v;
            true
        }
        _ => false,
    }
}

/// Records kept in name-ascending order with ids `1..=N`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records in any order; ids are reassigned.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut set = Self { records };
        set.renumber();
        set
    }

    /// Parse the persisted JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)
            .map_err(|e| PassVaultError::SerializationError(format!("records: {e}")))?;
        Ok(Self::from_records(records))
    }

    /// Serialize to the canonical JSON array stored inside the envelope.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.records)
            .map_err(|e| PassVaultError::SerializationError(format!("records: {e}")))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Look up a record by its current id.
    pub fn get(&self, id: usize) -> Result<&Record> {
        id.checked_sub(1)
            .and_then(|idx| self.records.get(idx))
            .ok_or(PassVaultError::RecordNotFound(id))
    }

    /// Insert a new record and return its id after re-sorting.
    pub fn insert(&mut self, fields: RecordFields) -> Result<usize> {
        let record = Record::new(fields)?;
        Ok(self.push_and_locate(record))
    }

    /// Edit the record with `id`.
    ///
    /// Returns `None` if no value changed, otherwise the record's new id,
    /// which differs from `id` if a rename changed its rank.
    pub fn update(&mut self, id: usize, update: RecordUpdate) -> Result<Option<usize>> {
        let idx = self.index_of(id)?;
        let record = &mut self.records[idx];
        if !record.apply(update)? {
            return Ok(None);
        }

        record.id = MOVED;
        Ok(Some(self.renumber_tracking(MOVED)))
    }

    /// Insert a copy of the record with `id`; returns the copy's id.
    pub fn duplicate(&mut self, id: usize) -> Result<usize> {
        let fields = self.get(id)?.fields();
        self.insert(fields)
    }

    /// Remove and return the record with `id`.
    pub fn remove(&mut self, id: usize) -> Result<Record> {
        let idx = self.index_of(id)?;
        let record = self.records.remove(idx);
        self.renumber();
        Ok(record)
    }

    fn index_of(&self, id: usize) -> Result<usize> {
        match id.checked_sub(1) {
            Some(idx) if idx < self.records.len() => Ok(idx),
            _ => Err(PassVaultError::RecordNotFound(id)),
        }
    }

    /// Append `record` behind any records with the same name, then
    /// re-sort and return where it landed.
    fn push_and_locate(&mut self, mut record: Record) -> usize {
        record.id = MOVED;
        self.records.push(record);
        self.renumber_tracking(MOVED)
    }

    fn renumber(&mut self) {
        self.renumber_tracking(0);
    }

    /// Stable sort by name and assign ids `1..=N`.  Returns the new id of
    /// the record whose old id was `marker`, or 0 if there is none.
    fn renumber_tracking(&mut self, marker: usize) -> usize {
        self.records.sort_by(|a, b| a.name.cmp(&b.name));

        let mut found = 0;
        for (idx, record) in self.records.iter_mut().enumerate() {
            if marker != 0 && record.id == marker {
                found = idx + 1;
            }
            record.id = idx + 1;
        }
        found
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Serde adapter for `Option<NaiveDateTime>` as `YYYY-MM-DD HH:MM:SS`.
///
/// `None` is written as JSON `null`; a missing, null, or empty value
/// reads back as `None`.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> RecordFields {
        RecordFields {
            name: name.to_string(),
            ..RecordFields::default()
        }
    }

    #[test]
    fn new_record_has_equal_timestamps() {
        let r = Record::new(fields("example.com")).unwrap();
        assert!(r.insert_time.is_some());
        assert_eq!(r.insert_time, r.update_time);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            Record::new(fields("   ")),
            Err(PassVaultError::EmptyRecordName)
        ));
    }

    #[test]
    fn name_is_trimmed() {
        let r = Record::new(fields("  github.com \n")).unwrap();
        assert_eq!(r.name, "github.com");
    }

    #[test]
    fn apply_without_real_change_keeps_update_time() {
        let mut r = Record::new(fields("a")).unwrap();
        let stamp = NaiveDateTime::parse_from_str("2020-01-01 00:00:00", TIMESTAMP_FORMAT).unwrap();
        r.update_time = Some(stamp);

        let changed = r
            .apply(RecordUpdate {
                name: Some("a".into()),
                email: Some(String::new()),
                ..RecordUpdate::default()
            })
            .unwrap();

        assert!(!changed);
        assert_eq!(r.update_time, Some(stamp));
    }

    #[test]
    fn apply_with_change_touches_update_time() {
        let mut r = Record::new(fields("a")).unwrap();
        let stamp = NaiveDateTime::parse_from_str("2020-01-01 00:00:00", TIMESTAMP_FORMAT).unwrap();
        r.insert_time = Some(stamp);
        r.update_time = Some(stamp);

        let changed = r
            .apply(RecordUpdate {
                password: Some("new-secret".into()),
                ..RecordUpdate::default()
            })
            .unwrap();

        assert!(changed);
        assert_eq!(r.password, "new-secret");
        assert_eq!(r.insert_time, Some(stamp));
        assert!(r.update_time > Some(stamp));
    }

    #[test]
    fn apply_rejects_blank_rename() {
        let mut r = Record::new(fields("a")).unwrap();
        assert!(r
            .apply(RecordUpdate {
                name: Some(" ".into()),
                ..RecordUpdate::default()
            })
            .is_err());
        assert_eq!(r.name, "a");
    }

    #[test]
    fn timestamps_use_the_persisted_format() {
        let mut r = Record::new(fields("a")).unwrap();
        let stamp = NaiveDateTime::parse_from_str("2024-03-05 07:08:09", TIMESTAMP_FORMAT).unwrap();
        r.insert_time = Some(stamp);

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["insert_time"], "2024-03-05 07:08:09");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn unset_timestamp_is_written_as_null() {
        let mut r = Record::new(fields("a")).unwrap();
        r.update_time = None;
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["update_time"].is_null());
    }

    #[test]
    fn get_rejects_out_of_range_ids() {
        let mut set = RecordSet::new();
        set.insert(fields("only")).unwrap();
        assert!(set.get(1).is_ok());
        assert!(matches!(set.get(0), Err(PassVaultError::RecordNotFound(0))));
        assert!(matches!(set.get(2), Err(PassVaultError::RecordNotFound(2))));
    }
}
