use crate::database::AsyncDbConnection;
use anyhow::Result;
use shared_types::{ContactNumber, NumberType};

/// Every number in the contact manager belonging to the named group,
/// ordered by display name then number so callers can group
/// consecutive rows.
pub async fn list_for_group(conn: AsyncDbConnection, group: &str) -> Result<Vec<ContactNumber>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT cge.displayname, cen.number, cen.e164, cen.type
         FROM contact_group_entries AS cge
         LEFT JOIN contact_entry_numbers AS cen ON cen.entryid = cge.id
         WHERE cge.groupid = (SELECT cg.id FROM contact_groups AS cg WHERE cg.name = ?1)
         ORDER BY cge.displayname, cen.number",
    )?;

    let rows = stmt
        .query_map([group], |row| {
            Ok(ContactNumber {
                display_name: row.get(0)?,
                // LEFT JOIN: entries without numbers come back NULL
                number: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                e164: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                type_code: NumberType::from_code(
                    &row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                ),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use rusqlite::params;

    fn seeded_db(dir: &tempfile::TempDir) -> Database {
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        {
            let conn = db.connection.lock().unwrap();
            conn.execute("INSERT INTO contact_groups (name) VALUES ('Office')", [])
                .unwrap();
            let group_id = conn.last_insert_rowid();
            for (display_name, numbers) in [
                ("Alice", vec![("100", "+15550100", "internal")]),
                (
                    "Bob",
                    vec![
                        ("101", "+15550101", "internal"),
                        ("5550123", "+15550123", "cell"),
                    ],
                ),
            ] {
                conn.execute(
                    "INSERT INTO contact_group_entries (groupid, displayname) VALUES (?1, ?2)",
                    params![group_id, display_name],
                )
                .unwrap();
                let entry_id = conn.last_insert_rowid();
                for (number, e164, type_code) in numbers {
                    conn.execute(
                        "INSERT INTO contact_entry_numbers (entryid, number, e164, type)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![entry_id, number, e164, type_code],
                    )
                    .unwrap();
                }
            }
        }
        db
    }

    #[tokio::test]
    async fn test_list_for_group_orders_by_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = list_for_group(db.async_connection.clone(), "Office")
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].display_name, "Alice");
        assert_eq!(rows[0].number, "100");
        assert_eq!(rows[0].type_code, NumberType::Internal);
        assert_eq!(rows[1].display_name, "Bob");
        assert_eq!(rows[2].display_name, "Bob");
        assert_eq!(rows[2].e164, "+15550123");
    }

    #[tokio::test]
    async fn test_unknown_group_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let rows = list_for_group(db.async_connection.clone(), "Nowhere")
            .await
            .unwrap();

        assert!(rows.is_empty());
    }
}
