//! Student records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::records::Record;

/// Student row from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_number: Option<String>,
    #[sqlx(rename = "class")]
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /addstudent`. Field names follow the form client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
    pub name: Option<String>,
    #[serde(rename = "rollNo")]
    pub roll_number: Option<String>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
}

impl Record for Student {
    type New = NewStudent;

    const TABLE: &'static str = "student";
    const NOUN: &'static str = "Student";
    const PLURAL: &'static str = "students";

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS student (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            roll_number VARCHAR(100),
            class VARCHAR(100),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    "#;

    const SELECT_ALL: &'static str = r#"
        SELECT id, name, roll_number, class, created_at
        FROM student
        ORDER BY id
    "#;

    const INSERT: &'static str = r#"
        INSERT INTO student (name, roll_number, class)
        VALUES ($1, $2, $3)
        RETURNING id
    "#;

    const DELETE: &'static str = "DELETE FROM student WHERE id = $1";

    fn insert_values(new: NewStudent) -> [Option<String>; 3] {
        [new.name, new.roll_number, new.class_name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_uses_form_field_names() {
        let body: NewStudent =
            serde_json::from_str(r#"{"name":"Alice","rollNo":"12","class":"5A"}"#).unwrap();
        assert_eq!(
            Student::insert_values(body),
            [Some("Alice".into()), Some("12".into()), Some("5A".into())]
        );
    }

    #[test]
    fn absent_fields_bind_as_null() {
        let body: NewStudent = serde_json::from_str(r#"{"rollNo":"7"}"#).unwrap();
        assert_eq!(Student::insert_values(body), [None, Some("7".into()), None]);
    }

    #[test]
    fn serializes_class_column_name() {
        let student = Student {
            id: 1,
            name: "Alice".into(),
            roll_number: Some("12".into()),
            class_name: Some("5A".into()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["class"], "5A");
        assert_eq!(json["roll_number"], "12");
        assert!(json.get("class_name").is_none());
    }
}
