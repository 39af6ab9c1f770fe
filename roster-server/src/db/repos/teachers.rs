//! Teacher records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::records::Record;

/// Teacher row from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub subject: Option<String>,
    #[sqlx(rename = "class")]
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /addteacher`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTeacher {
    pub name: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
}

impl Record for Teacher {
    type New = NewTeacher;

    const TABLE: &'static str = "teacher";
    const NOUN: &'static str = "Teacher";
    const PLURAL: &'static str = "teachers";

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS teacher (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            subject VARCHAR(255),
            class VARCHAR(100),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    "#;

    const SELECT_ALL: &'static str = r#"
        SELECT id, name, subject, class, created_at
        FROM teacher
        ORDER BY id
    "#;

    const INSERT: &'static str = r#"
        INSERT INTO teacher (name, subject, class)
        VALUES ($1, $2, $3)
        RETURNING id
    "#;

    const DELETE: &'static str = "DELETE FROM teacher WHERE id = $1";

    fn insert_values(new: NewTeacher) -> [Option<String>; 3] {
        [new.name, new.subject, new.class_name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_maps_subject_and_class() {
        let body: NewTeacher =
            serde_json::from_str(r#"{"name":"Bob","subject":"Physics","class":"9C"}"#).unwrap();
        assert_eq!(
            Teacher::insert_values(body),
            [Some("Bob".into()), Some("Physics".into()), Some("9C".into())]
        );
    }
}
