#![allow(dead_code)]

use workout_tracker::db::{create_memory_pool, DbPool};
use workout_tracker::migrations::run_migrations_for_tests;
use workout_tracker::models::User;
use workout_tracker::repositories::UserRepository;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn all_users(pool: &DbPool) -> Vec<User> {
    let conn = pool.get().unwrap();
    UserRepository::new(&conn).find_all().unwrap()
}

pub fn find_user(pool: &DbPool, email: &str) -> Option<User> {
    let conn = pool.get().unwrap();
    UserRepository::new(&conn).find_by_email(email).unwrap()
}

pub fn create_test_user(pool: &DbPool, email: &str, password: &str) -> User {
    let conn = pool.get().unwrap();
    UserRepository::new(&conn).create(email, password).unwrap()
}

/// Make any insert of `email` into `users` fail.
pub fn reject_inserts_of(pool: &DbPool, email: &str) {
    let conn = pool.get().unwrap();
    conn.execute_batch(&format!(
        "CREATE TRIGGER reject_seed_email BEFORE INSERT ON users
         WHEN NEW.email = '{email}'
         BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;"
    ))
    .unwrap();
}
