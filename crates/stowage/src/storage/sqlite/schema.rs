//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    version INTEGER NOT NULL,
    source TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
"#;

pub const SELECT_DOCUMENT: &str = r#"
SELECT id, version, source
FROM documents
WHERE collection = ?1 AND id = ?2
"#;

pub const SELECT_VERSION: &str = r#"
SELECT version
FROM documents
WHERE collection = ?1 AND id = ?2
"#;

pub const SELECT_COLLECTION: &str = r#"
SELECT id, version, source
FROM documents
WHERE collection = ?1
ORDER BY id ASC
"#;

pub const INSERT_DOCUMENT: &str = r#"
INSERT INTO documents (collection, id, version, source, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const UPDATE_DOCUMENT: &str = r#"
UPDATE documents
SET version = ?3, source = ?4, updated_at = ?5
WHERE collection = ?1 AND id = ?2
"#;
