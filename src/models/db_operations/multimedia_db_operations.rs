use crate::models::{MultimediaEdit, MultimediaPost, MultimediaType, NewMultimedia, PostState};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("R2D2 Pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Insert did not return a multimedia id")]
    MissingId,
    #[error("No multimedia row matched id {0}")]
    NoRowAffected(i64),
    #[error("Multimedia {0} could not be read back after a write")]
    MissingRow(i64),
}

pub type DbResult<T> = Result<T, DbError>;

fn map_multimedia_row(row: &Row<'_>) -> rusqlite::Result<MultimediaPost> {
    Ok(MultimediaPost {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        kind: row.get("type")?,
        published_at: row.get("date_published")?,
        author_id: row.get("author_id")?,
        state: row.get("is_invalid")?,
    })
}

fn collect_multimedia<P: rusqlite::Params>(
    conn: &Connection,
    query: &str,
    params: P,
) -> DbResult<Vec<MultimediaPost>> {
    let mut stmt = conn.prepare(query)?;
    let rows = stmt.query_map(params, map_multimedia_row)?;

    let mut posts = Vec::new();
    for post in rows {
        posts.push(post?);
    }
    Ok(posts)
}

/// Inserts a new valid post stamped with the current server time and commits.
/// Returns the generated id.
pub fn insert_multimedia(conn: &Connection, post: &NewMultimedia) -> DbResult<i64> {
    let tx = conn.unchecked_transaction()?;
    let new_id: Option<i64> = tx
        .query_row(
            "INSERT INTO multimedia (title, content, type, date_published, is_invalid, author_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
            params![
                post.title,
                post.content,
                post.kind,
                Utc::now(),
                PostState::Valid,
                post.author_id
            ],
            |row| row.get(0),
        )
        .optional()?;

    let new_id = new_id.ok_or(DbError::MissingId)?;
    tx.commit()?;
    Ok(new_id)
}

pub fn read_all_multimedia(conn: &Connection) -> DbResult<Vec<MultimediaPost>> {
    collect_multimedia(
        conn,
        "SELECT id, title, content, type, date_published, author_id, is_invalid
         FROM multimedia
         WHERE is_invalid = ?1
         ORDER BY id",
        params![PostState::Valid],
    )
}

pub fn read_multimedia_by_id(conn: &Connection, id: i64) -> DbResult<Option<MultimediaPost>> {
    let post = conn
        .query_row(
            "SELECT id, title, content, type, date_published, author_id, is_invalid
             FROM multimedia
             WHERE id = ?1 AND is_invalid = ?2",
            params![id, PostState::Valid],
            map_multimedia_row,
        )
        .optional()?;
    Ok(post)
}

pub fn read_multimedia_by_type(
    conn: &Connection,
    kind: MultimediaType,
) -> DbResult<Vec<MultimediaPost>> {
    collect_multimedia(
        conn,
        "SELECT id, title, content, type, date_published, author_id, is_invalid
         FROM multimedia
         WHERE type = ?1 AND is_invalid = ?2
         ORDER BY id",
        params![kind, PostState::Valid],
    )
}

pub fn read_multimedia_by_author(
    conn: &Connection,
    author_id: i64,
) -> DbResult<Vec<MultimediaPost>> {
    collect_multimedia(
        conn,
        "SELECT m.id AS id, m.title AS title, m.content AS content, m.type AS type,
                m.date_published AS date_published, m.author_id AS author_id,
                m.is_invalid AS is_invalid
         FROM multimedia AS m
         INNER JOIN dashboard_user AS du ON m.author_id = du.id
         WHERE du.id = ?1 AND m.is_invalid = ?2
         ORDER BY m.id",
        params![author_id, PostState::Valid],
    )
}

/// Replaces title and content of a post and commits. Type, author and
/// publication date are left untouched.
pub fn update_multimedia(conn: &Connection, id: i64, edit: &MultimediaEdit) -> DbResult<i64> {
    let tx = conn.unchecked_transaction()?;
    let updated: Option<i64> = tx
        .query_row(
            "UPDATE multimedia SET title = ?1, content = ?2 WHERE id = ?3 RETURNING id",
            params![edit.title, edit.content, id],
            |row| row.get(0),
        )
        .optional()?;

    let updated = updated.ok_or(DbError::NoRowAffected(id))?;
    tx.commit()?;
    Ok(updated)
}

/// Marks a post as invalid and commits. The row is never deleted.
pub fn soft_delete_multimedia(conn: &Connection, id: i64) -> DbResult<i64> {
    let tx = conn.unchecked_transaction()?;
    let removed: Option<i64> = tx
        .query_row(
            "UPDATE multimedia SET is_invalid = ?1 WHERE id = ?2 RETURNING id",
            params![PostState::Invalid, id],
            |row| row.get(0),
        )
        .optional()?;

    let removed = removed.ok_or(DbError::NoRowAffected(id))?;
    tx.commit()?;
    Ok(removed)
}

pub fn multimedia_exists(conn: &Connection, id: i64) -> DbResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM multimedia WHERE id = ?1 AND is_invalid = ?2)",
        params![id, PostState::Valid],
        |row| row.get(0),
    )?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::db_operations::users_db_operations;
    use crate::setup::db_setup;

    fn setup_conn() -> (Connection, i64) {
        let mut conn = Connection::open_in_memory().unwrap();
        db_setup::setup_multimedia_db(&mut conn).unwrap();
        let author = users_db_operations::create_dashboard_user(&conn, "editor").unwrap();
        (conn, author)
    }

    fn new_post(title: &str, kind: MultimediaType, author_id: i64) -> NewMultimedia {
        NewMultimedia {
            title: title.to_string(),
            content: format!("{} body", title),
            kind,
            author_id,
        }
    }

    #[test]
    fn insert_then_read_back_by_id() {
        let (conn, author) = setup_conn();
        let before = Utc::now();

        let id = insert_multimedia(&conn, &new_post("Launch", MultimediaType::Image, author)).unwrap();
        let post = read_multimedia_by_id(&conn, id).unwrap().expect("post should exist");

        assert_eq!(post.id, id);
        assert_eq!(post.title, "Launch");
        assert_eq!(post.content, "Launch body");
        assert_eq!(post.kind, MultimediaType::Image);
        assert_eq!(post.author_id, author);
        assert_eq!(post.state, PostState::Valid);
        assert!(post.published_at >= before);
    }

    #[test]
    fn soft_delete_hides_post_but_keeps_row() {
        let (conn, author) = setup_conn();
        let id = insert_multimedia(&conn, &new_post("Gone", MultimediaType::Text, author)).unwrap();

        assert!(multimedia_exists(&conn, id).unwrap());
        assert_eq!(soft_delete_multimedia(&conn, id).unwrap(), id);

        assert!(!multimedia_exists(&conn, id).unwrap());
        assert!(read_multimedia_by_id(&conn, id).unwrap().is_none());
        assert!(read_all_multimedia(&conn).unwrap().is_empty());

        let stored: i64 = conn
            .query_row("SELECT COUNT(*) FROM multimedia WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, 1);
    }

    #[test]
    fn update_changes_only_title_and_content() {
        let (conn, author) = setup_conn();
        let id = insert_multimedia(&conn, &new_post("Draft", MultimediaType::Video, author)).unwrap();
        let original = read_multimedia_by_id(&conn, id).unwrap().unwrap();

        let edit = MultimediaEdit { title: "Final".to_string(), content: "New body".to_string() };
        assert_eq!(update_multimedia(&conn, id, &edit).unwrap(), id);

        let edited = read_multimedia_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(edited.title, "Final");
        assert_eq!(edited.content, "New body");
        assert_eq!(edited.kind, original.kind);
        assert_eq!(edited.author_id, original.author_id);
        assert_eq!(edited.published_at, original.published_at);
    }

    #[test]
    fn mutations_on_missing_rows_report_no_row_affected() {
        let (conn, _) = setup_conn();
        let edit = MultimediaEdit { title: "t".to_string(), content: "c".to_string() };

        assert!(matches!(update_multimedia(&conn, 42, &edit), Err(DbError::NoRowAffected(42))));
        assert!(matches!(soft_delete_multimedia(&conn, 42), Err(DbError::NoRowAffected(42))));
    }

    #[test]
    fn filters_by_type_and_author() {
        let (conn, author) = setup_conn();
        let other = users_db_operations::create_dashboard_user(&conn, "guest").unwrap();

        insert_multimedia(&conn, &new_post("a", MultimediaType::Text, author)).unwrap();
        insert_multimedia(&conn, &new_post("b", MultimediaType::Livestream, author)).unwrap();
        let hidden = insert_multimedia(&conn, &new_post("c", MultimediaType::Text, other)).unwrap();
        soft_delete_multimedia(&conn, hidden).unwrap();

        let texts = read_multimedia_by_type(&conn, MultimediaType::Text).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].title, "a");

        let by_author = read_multimedia_by_author(&conn, author).unwrap();
        assert_eq!(by_author.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);

        assert!(read_multimedia_by_author(&conn, other).unwrap().is_empty());
        assert!(read_multimedia_by_type(&conn, MultimediaType::Image).unwrap().is_empty());
    }
}
