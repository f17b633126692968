use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    FromSqliteRow, Template, TemplateCreate, TemplateExercise, TemplateWithExercises,
};

#[derive(Clone)]
pub struct TemplateRepository {
    pool: DbPool,
}

fn load_exercises(conn: &Connection, template_id: i64) -> rusqlite::Result<Vec<TemplateExercise>> {
    let mut stmt = conn
        .prepare("SELECT * FROM template_exercises WHERE template_id = ? ORDER BY position")?;
    let exercises = stmt
        .query_map([template_id], TemplateExercise::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exercises)
}

impl TemplateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Store a template and its exercises in one transaction. Exercise
    /// positions follow the order of `new_template.exercises`.
    pub async fn create(&self, new_template: &TemplateCreate) -> Result<TemplateWithExercises> {
        let pool = self.pool.clone();
        let new_template = new_template.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO templates (label, focus) VALUES (?, ?)",
                rusqlite::params![new_template.label, new_template.focus],
            )?;
            let template = Template {
                id: tx.last_insert_rowid(),
                label: new_template.label,
                focus: new_template.focus,
            };

            let mut exercises = Vec::with_capacity(new_template.exercises.len());
            for (position, exercise) in new_template.exercises.into_iter().enumerate() {
                let position = i32::try_from(position)
                    .map_err(|_| AppError::BadRequest("Too many exercises".to_string()))?;
                tx.execute(
                    "INSERT INTO template_exercises
                         (template_id, name, target_weight, num_sets, position)
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![
                        template.id,
                        exercise.name,
                        exercise.target_weight,
                        exercise.num_sets,
                        position
                    ],
                )?;
                exercises.push(TemplateExercise {
                    id: tx.last_insert_rowid(),
                    template_id: template.id,
                    name: exercise.name,
                    target_weight: exercise.target_weight,
                    num_sets: exercise.num_sets,
                    position,
                });
            }

            tx.commit()?;
            tracing::debug!(
                "Created template {} with {} exercises",
                template.id,
                exercises.len()
            );
            Ok(TemplateWithExercises {
                template,
                exercises,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<TemplateWithExercises>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM templates WHERE id = ?")?;
            let template = stmt.query_row([id], Template::from_row).optional()?;

            match template {
                Some(template) => {
                    let exercises = load_exercises(&conn, template.id)?;
                    Ok(Some(TemplateWithExercises {
                        template,
                        exercises,
                    }))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all(&self) -> Result<Vec<TemplateWithExercises>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM templates ORDER BY id")?;
            let templates = stmt
                .query_map([], Template::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut result = Vec::with_capacity(templates.len());
            for template in templates {
                let exercises = load_exercises(&conn, template.id)?;
                result.push(TemplateWithExercises {
                    template,
                    exercises,
                });
            }
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM templates WHERE id = ?", [id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
