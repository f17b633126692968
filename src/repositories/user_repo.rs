use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{Connection, OptionalExtension};

use crate::error::{AppError, Result};
use crate::models::{ChangePasswordRequest, FromSqliteRow, User};

/// User store over a borrowed connection, so callers decide the transaction.
/// A `rusqlite::Transaction` derefs to `Connection` and can be passed directly.
pub struct UserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare("SELECT * FROM users WHERE email = ?")?;
        let result = stmt.query_row([email], User::from_row).optional()?;
        Ok(result)
    }

    pub fn find_all(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare("SELECT * FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], User::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Insert a user, hashing `password` with a fresh salt.
    pub fn create(&self, email: &str, password: &str) -> Result<User> {
        let hashed_password = hash_password(password)?;
        self.conn.execute(
            "INSERT INTO users (email, hashed_password) VALUES (?, ?)",
            rusqlite::params![email, hashed_password],
        )?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            email: email.to_string(),
            hashed_password,
        })
    }

    /// Replace the stored hash with a freshly salted hash of `password`.
    pub fn set_password(&self, id: i64, password: &str) -> Result<bool> {
        let hashed_password = hash_password(password)?;
        let rows = self.conn.execute(
            "UPDATE users SET hashed_password = ? WHERE id = ?",
            rusqlite::params![hashed_password, id],
        )?;
        Ok(rows > 0)
    }

    pub fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_by_email(email)?;

        match user {
            Some(user) => {
                if verify_password(password, &user.hashed_password)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Returns `false` when the old password does not match.
    pub fn change_password(&self, email: &str, request: &ChangePasswordRequest) -> Result<bool> {
        let user = self
            .find_by_email(email)?
            .ok_or_else(|| AppError::NotFound(format!("User {email}")))?;

        if !verify_password(&request.old_password, &user.hashed_password)? {
            tracing::warn!("Password change rejected for {}: old password mismatch", email);
            return Ok(false);
        }

        self.set_password(user.id, &request.new_password)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
