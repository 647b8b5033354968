use ambiente_domain::{Reading, User};
use chrono::{DateTime, Utc};

/// Row shape of the `readings` table.
#[derive(Debug, Clone)]
pub struct ReadingRow {
    pub lumen: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub captured_at: DateTime<Utc>,
}

impl From<ReadingRow> for Reading {
    fn from(row: ReadingRow) -> Self {
        Reading {
            lumen: row.lumen,
            temperature: row.temperature,
            humidity: row.humidity,
            captured_at: row.captured_at,
        }
    }
}

/// Row shape of the `users` table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_row_converts_to_domain() {
        let row = ReadingRow {
            lumen: 550.0,
            temperature: 40.0,
            humidity: 65.0,
            captured_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        };

        let reading: Reading = row.into();
        assert_eq!(reading.lumen, 550.0);
        assert_eq!(reading.temperature, 40.0);
        assert_eq!(reading.humidity, 65.0);
    }
}
