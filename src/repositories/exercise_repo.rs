use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, ReusableExercise, ReusableExerciseCreate};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ReusableExercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([id], ReusableExercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_all(&self) -> Result<Vec<ReusableExercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises ORDER BY name, id")?;
            let exercises = stmt
                .query_map([], ReusableExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, new_exercise: &ReusableExerciseCreate) -> Result<ReusableExercise> {
        let pool = self.pool.clone();
        let new_exercise = new_exercise.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (name, target_weight, num_sets) VALUES (?, ?, ?)",
                rusqlite::params![
                    new_exercise.name,
                    new_exercise.target_weight,
                    new_exercise.num_sets
                ],
            )?;
            Ok(ReusableExercise {
                id: conn.last_insert_rowid(),
                name: new_exercise.name,
                target_weight: new_exercise.target_weight,
                num_sets: new_exercise.num_sets,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM exercises WHERE id = ?", [id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
