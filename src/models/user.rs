use rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromSqliteRow;
use crate::validation::{child_path, payload_try_from_value, FromPayload, Validator};

pub const PASSWORD_MISMATCH: &str = "New password and confirmation do not match";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            hashed_password: row.get("hashed_password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl FromPayload for ChangePasswordRequest {
    fn read(v: &mut Validator, path: &str, value: &Value) -> Option<Self> {
        let obj = v.object(path, value)?;
        let old_password = v.string(obj, path, "old_password");
        let new_password = v.string(obj, path, "new_password");
        let confirm_password = v.string(obj, path, "confirm_password");

        // Only compared once both sides are well-formed strings
        if let (Some(new), Some(confirm)) = (&new_password, &confirm_password) {
            if new != confirm {
                v.reject(&child_path(path, "confirm_password"), PASSWORD_MISMATCH);
                return None;
            }
        }

        Some(Self {
            old_password: old_password?,
            new_password: new_password?,
            confirm_password: confirm_password?,
        })
    }
}

payload_try_from_value!(ChangePasswordRequest);
