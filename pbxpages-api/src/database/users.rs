use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::OptionalExtension;

pub async fn display_name(conn: AsyncDbConnection, extension: &str) -> Result<Option<String>> {
    let conn = conn.lock().await;

    let name = conn
        .query_row(
            "SELECT name FROM users WHERE extension = ?1 LIMIT 1",
            [extension],
            |row| row.get(0),
        )
        .optional()?;

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[tokio::test]
    async fn test_display_name_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        {
            let conn = db.connection.lock().unwrap();
            conn.execute(
                "INSERT INTO users (extension, name) VALUES ('103', 'Front Desk')",
                [],
            )
            .unwrap();
        }

        let found = display_name(db.async_connection.clone(), "103").await.unwrap();
        assert_eq!(found.as_deref(), Some("Front Desk"));

        let missing = display_name(db.async_connection.clone(), "999").await.unwrap();
        assert_eq!(missing, None);
    }
}
