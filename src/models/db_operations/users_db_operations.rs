use crate::models::DashboardUser;
use rusqlite::{params, Connection, Result as RusqliteResult};

/// The author-existence capability consumed by the multimedia handlers.
pub fn dashboard_user_exists(conn: &Connection, user_id: i64) -> RusqliteResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM dashboard_user WHERE id = ?1)",
        params![user_id],
        |row| row.get(0),
    )
}

pub fn create_dashboard_user(conn: &Connection, username: &str) -> RusqliteResult<i64> {
    conn.execute(
        "INSERT INTO dashboard_user (username) VALUES (?1)",
        params![username],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn read_all_dashboard_users(conn: &Connection) -> RusqliteResult<Vec<DashboardUser>> {
    let mut stmt = conn.prepare("SELECT id, username FROM dashboard_user ORDER BY id")?;
    let user_iter = stmt.query_map([], |row| {
        Ok(DashboardUser {
            id: row.get("id")?,
            username: row.get("username")?,
        })
    })?;

    let mut users = Vec::new();
    for user in user_iter {
        users.push(user?);
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::db_setup;

    #[test]
    fn created_users_exist_and_are_listed() {
        let mut conn = Connection::open_in_memory().unwrap();
        db_setup::setup_multimedia_db(&mut conn).unwrap();

        let first = create_dashboard_user(&conn, "ana").unwrap();
        let second = create_dashboard_user(&conn, "luis").unwrap();

        assert!(dashboard_user_exists(&conn, first).unwrap());
        assert!(dashboard_user_exists(&conn, second).unwrap());
        assert!(!dashboard_user_exists(&conn, second + 100).unwrap());

        let names: Vec<String> = read_all_dashboard_users(&conn)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["ana".to_string(), "luis".to_string()]);
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        db_setup::setup_multimedia_db(&mut conn).unwrap();

        create_dashboard_user(&conn, "ana").unwrap();
        assert!(create_dashboard_user(&conn, "ana").is_err());
    }
}
