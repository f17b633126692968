pub mod exercise;
pub mod from_row;
pub mod template;
pub mod user;
pub mod workout;

pub use exercise::{ReusableExercise, ReusableExerciseCreate};
pub use from_row::FromSqliteRow;
pub use template::{
    Template, TemplateCreate, TemplateExercise, TemplateExerciseCreate, TemplateExerciseResponse,
    TemplateResponse, TemplateWithExercises,
};
pub use user::{ChangePasswordRequest, User};
pub use workout::{
    ExerciseSubmission, Workout, WorkoutExercise, WorkoutExerciseWithSets, WorkoutSet,
    WorkoutSetSubmission, WorkoutSubmission,
};
