use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromSqliteRow;
use crate::validation::{payload_try_from_value, FromPayload, Validator};

/// An exercise kept for reuse across templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReusableExercise {
    pub id: i64,
    pub name: String,
    pub target_weight: f64,
    pub num_sets: i32,
}

impl FromSqliteRow for ReusableExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            target_weight: row.get("target_weight")?,
            num_sets: row.get("num_sets")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ReusableExerciseCreate {
    pub name: String,
    pub target_weight: f64,
    pub num_sets: i32,
}

impl FromPayload for ReusableExerciseCreate {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let name = v.string(obj, path, "name");
        let target_weight = v.float(obj, path, "target_weight");
        let num_sets = v.integer(obj, path, "num_sets");
        Some(Self {
            name: name?,
            target_weight: target_weight?,
            num_sets: num_sets?,
        })
    }
}

payload_try_from_value!(ReusableExerciseCreate);
