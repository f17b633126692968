use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromSqliteRow;
use crate::validation::{payload_try_from_value, FromPayload, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct TemplateExerciseCreate {
    pub name: String,
    pub target_weight: f64,
    pub num_sets: i32,
}

impl FromPayload for TemplateExerciseCreate {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct TemplateCreate {
    pub label: String,
    pub focus: String,
    pub exercises: Vec<TemplateExerciseCreate>,
}

impl FromPayload for TemplateCreate {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let label = v.string(obj, path, "label");
        let focus = v.string(obj, path, "focus");
        let exercises = v.list(obj, path, "exercises");
        Some(Self {
            label: label?,
            focus: focus?,
            exercises: exercises?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub label: String,
    pub focus: String,
}

impl FromSqliteRow for Template {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            label: row.get("label")?,
            focus: row.get("focus")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub id: i64,
    pub template_id: i64,
    pub name: String,
    pub target_weight: f64,
    pub num_sets: i32,
    pub position: i32,
}

impl FromSqliteRow for TemplateExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            template_id: row.get("template_id")?,
            name: row.get("name")?,
            target_weight: row.get("target_weight")?,
            num_sets: row.get("num_sets")?,
            position: row.get("position")?,
        })
    }
}

/// A stored template with its exercises ordered by position.
#[derive(Debug, Clone)]
pub struct TemplateWithExercises {
    pub template: Template,
    pub exercises: Vec<TemplateExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExerciseResponse {
    pub id: i64,
    pub name: String,
    pub target_weight: f64,
    pub num_sets: i32,
    pub position: i32,
}

impl From<&TemplateExercise> for TemplateExerciseResponse {
    fn from(exercise: &TemplateExercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            target_weight: exercise.target_weight,
            num_sets: exercise.num_sets,
            position: exercise.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub id: i64,
    pub label: String,
    pub focus: String,
    pub exercises: Vec<TemplateExerciseResponse>,
}

impl From<&TemplateWithExercises> for TemplateResponse {
    fn from(stored: &TemplateWithExercises) -> Self {
        Self {
            id: stored.template.id,
            label: stored.template.label.clone(),
            focus: stored.template.focus.clone(),
            exercises: stored.exercises.iter().map(Into::into).collect(),
        }
    }
}

payload_try_from_value!(TemplateExerciseCreate, TemplateCreate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{MSG_INTEGER, MSG_NUMBER, MSG_REQUIRED};
    use serde_json::json;

    fn stored_day_b() -> TemplateWithExercises {
        TemplateWithExercises {
            template: Template {
                id: 7,
                label: "Day B".to_string(),
                focus: "Lower Body".to_string(),
            },
            exercises: vec![
                TemplateExercise {
                    id: 70,
                    template_id: 7,
                    name: "Squat".to_string(),
                    target_weight: 165.0,
                    num_sets: 3,
                    position: 0,
                },
                TemplateExercise {
                    id: 71,
                    template_id: 7,
                    name: "Romanian Deadlift".to_string(),
                    target_weight: 125.0,
                    num_sets: 3,
                    position: 1,
                },
            ],
        }
    }

    #[test]
    fn test_template_create_from_payload() {
        let template = TemplateCreate::from_payload(&json!({
            "label": "Day B",
            "focus": "Lower Body",
            "exercises": [
                {"name": "Squat", "target_weight": 165, "num_sets": 3},
                {"name": "Leg Curls", "target_weight": 80.5, "num_sets": 3},
            ],
        }))
        .unwrap();

        assert_eq!(template.label, "Day B");
        assert_eq!(template.focus, "Lower Body");
        assert_eq!(template.exercises[0].name, "Squat");
        assert_eq!(template.exercises[0].target_weight, 165.0);
        assert_eq!(template.exercises[1].name, "Leg Curls");
        assert_eq!(template.exercises[1].target_weight, 80.5);
    }

    #[test]
    fn test_template_exercise_fields_are_required() {
        let errors = TemplateExerciseCreate::from_payload(&json!({
            "name": "Squat",
            "target_weight": null,
            "num_sets": "3",
        }))
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field("target_weight").next().unwrap().message,
            MSG_NUMBER
        );
        assert_eq!(
            errors.for_field("num_sets").next().unwrap().message,
            MSG_INTEGER
        );
    }

    #[test]
    fn test_template_reports_all_missing_fields() {
        let errors = TemplateCreate::from_payload(&json!({})).unwrap_err();
        for field in ["label", "focus", "exercises"] {
            assert_eq!(
                errors.for_field(field).next().unwrap().message,
                MSG_REQUIRED
            );
        }
    }

    #[test]
    fn test_response_projection_copies_every_field() {
        let stored = stored_day_b();
        let response = TemplateResponse::from(&stored);

        assert_eq!(response.id, stored.template.id);
        assert_eq!(response.label, stored.template.label);
        assert_eq!(response.focus, stored.template.focus);
        assert_eq!(response.exercises.len(), stored.exercises.len());
        for (projected, source) in response.exercises.iter().zip(&stored.exercises) {
            assert_eq!(projected.id, source.id);
            assert_eq!(projected.name, source.name);
            assert_eq!(projected.target_weight, source.target_weight);
            assert_eq!(projected.num_sets, source.num_sets);
            assert_eq!(projected.position, source.position);
        }
    }

    #[test]
    fn test_response_serializes_without_internal_fields() {
        let response = TemplateResponse::from(&stored_day_b());
        let value = serde_json::to_value(&response).unwrap();
        let exercise = value["exercises"][0].as_object().unwrap();

        assert!(!exercise.contains_key("template_id"));
        assert_eq!(exercise["position"], 0);
        assert_eq!(value["label"], "Day B");
    }
}
