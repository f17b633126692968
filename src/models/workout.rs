use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromSqliteRow;
use crate::validation::{payload_try_from_value, FromPayload, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct WorkoutSetSubmission {
    pub lbs: Option<f64>,
    pub reps: Option<i32>,
}

impl FromPayload for WorkoutSetSubmission {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let lbs = v.nullable_float(obj, path, "lbs");
        let reps = v.nullable_integer(obj, path, "reps");
        Some(Self {
            lbs: lbs?,
            reps: reps?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ExerciseSubmission {
    pub name: String,
    pub sets: Vec<WorkoutSetSubmission>,
}

impl FromPayload for ExerciseSubmission {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let name = v.string(obj, path, "name");
        let sets = v.list(obj, path, "sets");
        Some(Self {
            name: name?,
            sets: sets?,
        })
    }
}

/// A finished workout as posted by the client. `date` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct WorkoutSubmission {
    pub date: String,
    pub exercises: Vec<ExerciseSubmission>,
}

impl FromPayload for WorkoutSubmission {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let date = v.string(obj, path, "date");
        let exercises = v.list(obj, path, "exercises");
        Some(Self {
            date: date?,
            exercises: exercises?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub date: String,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub name: String,
    pub position: i32,
}

impl FromSqliteRow for WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            name: row.get("name")?,
            position: row.get("position")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub exercise_id: i64,
    pub position: i32,
    pub lbs: Option<f64>,
    pub reps: Option<i32>,
}

impl FromSqliteRow for WorkoutSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            position: row.get("position")?,
            lbs: row.get("lbs")?,
            reps: row.get("reps")?,
        })
    }
}

/// A stored exercise with its sets ordered by position.
#[derive(Debug, Clone)]
pub struct WorkoutExerciseWithSets {
    pub exercise: WorkoutExercise,
    pub sets: Vec<WorkoutSet>,
}

payload_try_from_value!(WorkoutSetSubmission, ExerciseSubmission, WorkoutSubmission);
