//! Student record types.

use serde::{Deserialize, Serialize};

/// One student's stored attributes.
///
/// All three fields are required; a record with a missing field never enters
/// the table. The student's id is the table key, not a field of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub age: u32,
    pub year: String,
}

/// A partial update to a [`StudentRecord`].
///
/// Every field is independently optional; absent fields leave the stored
/// value unchanged. This is the PUT request body schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub year: Option<String>,
}

impl StudentUpdate {
    /// Overwrites each field of `record` for which this update carries a value.
    pub fn apply(&self, record: &mut StudentRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(year) = &self.year {
            record.year = year.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> StudentRecord {
        StudentRecord {
            name: "john".to_owned(),
            age: 17,
            year: "senior".to_owned(),
        }
    }

    #[test]
    fn record_serializes_all_fields() {
        let json = serde_json::to_value(john()).unwrap();
        assert_eq!(json["name"], "john");
        assert_eq!(json["age"], 17);
        assert_eq!(json["year"], "senior");
    }

    #[test]
    fn record_requires_all_fields() {
        let result: Result<StudentRecord, _> = serde_json::from_str(r#"{"name":"mary"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_applies_present_fields_only() {
        let mut record = john();
        let update: StudentUpdate = serde_json::from_str(r#"{"age":18}"#).unwrap();
        update.apply(&mut record);
        assert_eq!(record.age, 18);
        assert_eq!(record.name, "john");
        assert_eq!(record.year, "senior");
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut record = john();
        StudentUpdate::default().apply(&mut record);
        assert_eq!(record, john());
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let update: StudentUpdate =
            serde_json::from_str(r#"{"age":18,"nickname":"j"}"#).unwrap();
        assert_eq!(update.age, Some(18));
        assert!(update.name.is_none());
    }
}
