use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Mirror of the contact manager schema the directory export reads
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contact_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS contact_group_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            groupid INTEGER NOT NULL,
            displayname VARCHAR NOT NULL,
            FOREIGN KEY (groupid) REFERENCES contact_groups (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS contact_entry_numbers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entryid INTEGER NOT NULL,
            number VARCHAR NOT NULL,
            e164 VARCHAR NOT NULL DEFAULT '',
            type VARCHAR NOT NULL DEFAULT 'other',
            FOREIGN KEY (entryid) REFERENCES contact_group_entries (id)
        )",
        [],
    )?;

    // Extension to display-name mapping used by the status page
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            extension VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL
        )",
        [],
    )?;

    // Create indexes for performance
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_group_entries_group
            ON contact_group_entries(groupid, displayname)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entry_numbers_entry
            ON contact_entry_numbers(entryid)",
        [],
    )?;

    Ok(())
}
