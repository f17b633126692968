use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    FromSqliteRow, Workout, WorkoutExercise, WorkoutExerciseWithSets, WorkoutSet,
    WorkoutSubmission,
};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

fn to_position(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| AppError::BadRequest("Workout is too large".to_string()))
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Store a submitted workout. Exercises and their sets keep their
    /// submitted order as positions; exercises without sets are kept too.
    pub async fn save_submission(&self, submission: &WorkoutSubmission) -> Result<Workout> {
        let pool = self.pool.clone();
        let submission = submission.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute("INSERT INTO workouts (date) VALUES (?)", [&submission.date])?;
            let workout_id = tx.last_insert_rowid();

            let mut set_count = 0;
            for (exercise_index, exercise) in submission.exercises.iter().enumerate() {
                tx.execute(
                    "INSERT INTO workout_exercises (workout_id, name, position) VALUES (?, ?, ?)",
                    rusqlite::params![workout_id, exercise.name, to_position(exercise_index)?],
                )?;
                let exercise_id = tx.last_insert_rowid();

                for (set_index, set) in exercise.sets.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO workout_sets (exercise_id, position, lbs, reps)
                         VALUES (?, ?, ?, ?)",
                        rusqlite::params![exercise_id, to_position(set_index)?, set.lbs, set.reps],
                    )?;
                    set_count += 1;
                }
            }

            tx.commit()?;
            tracing::info!(
                "Saved workout {} for {} ({} exercises, {} sets)",
                workout_id,
                submission.date,
                submission.exercises.len(),
                set_count
            );
            Ok(Workout {
                id: workout_id,
                date: submission.date,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Exercises of a workout with their sets, both in submission order.
    pub async fn find_exercises(&self, workout_id: i64) -> Result<Vec<WorkoutExerciseWithSets>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_exercises WHERE workout_id = ? ORDER BY position",
            )?;
            let exercises = stmt
                .query_map([workout_id], WorkoutExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut sets_stmt =
                conn.prepare("SELECT * FROM workout_sets WHERE exercise_id = ? ORDER BY position")?;
            let mut result = Vec::with_capacity(exercises.len());
            for exercise in exercises {
                let sets = sets_stmt
                    .query_map([exercise.id], WorkoutSet::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                result.push(WorkoutExerciseWithSets { exercise, sets });
            }
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
