use crate::error::MultimediaError;
use crate::helper::form_helpers;
use crate::models::db_operations::multimedia_db_operations::{self as multimedia_db, DbError, DbResult};
use crate::models::db_operations::users_db_operations;
use crate::models::{
    MultimediaEdit, MultimediaPost, MultimediaType, NewMultimedia, RemovalConfirmation,
    CONTENT_MAX_CHARS, TITLE_MAX_CHARS,
};
use crate::DbPool;
use actix_web::web;
use rusqlite::Connection;
use serde_json::{Map, Value};

// --- Validation messages ---
pub const INVALID_ARGUMENTS: &str = "Los argumentos dados no son válidos.";
pub const INVALID_TITLE: &str = "El título dado no es válido.";
pub const INVALID_CONTENT: &str = "El contenido dado no es válido.";
pub const INVALID_TYPE: &str = "El identificador del tipo de multimedia dado no es válido.";
pub const INVALID_POST_AUTHOR: &str = "El identificador del autor de la publicación dado no es válido.";
pub const INVALID_QUERY_AUTHOR: &str =
    "El identificador del autor de la publicación multimedia dado no es válido.";
pub const INVALID_ID: &str = "El identificador de la publicación multimedia no es válido.";
pub const INVALID_GIVEN_ID: &str = "El identificador de la publicación multimedia dado no es válido.";

// --- Not-found messages ---
pub const NONE_FOUND: &str = "Ninguna publicación multimedia fue encontrada.";
pub const NONE_FOUND_FOR_TYPE: &str = "Ninguna publicación del tipo de multimedia dado fue encontrada.";
pub const NONE_FOUND_FOR_AUTHOR: &str = "Ninguna publicación multimedia del autor dado fue encontrada.";

// --- Internal failure messages, one per operation ---
pub const ADD_FAILED: &str =
    "Ocurrió un error interno tratando de añadir una nueva publicación multimedia.";
pub const GET_ALL_FAILED: &str =
    "Ocurrió un error interno buscando todas las publicaciones multimedia.";
pub const GET_BY_ID_FAILED: &str =
    "Ocurrió un error interno buscando una publicación multimedia por su identificador.";
pub const GET_BY_TYPE_FAILED: &str =
    "Ocurrió un error interno buscando publicaciones del tipo de multimedia dado.";
pub const GET_BY_AUTHOR_FAILED: &str =
    "Ocurrió un error interno buscando publicaciones de multimedia del autor dado.";
pub const EDIT_FAILED: &str =
    "Ocurrió un error interno editando una publicación multimedia existente.";
pub const REMOVE_FAILED: &str =
    "Ocurrió un error interno removiendo una publicación multimedia existente.";

fn invalid(message: &str) -> MultimediaError {
    MultimediaError::Validation(message.to_string())
}

fn not_found(message: impl Into<String>) -> MultimediaError {
    MultimediaError::NotFound(message.into())
}

/// Runs `op` on a connection checked out from the pool for the duration of
/// the blocking section. The connection goes back to the pool when the
/// closure returns, on success and failure alike.
async fn with_connection<T, F>(
    pool: &web::Data<DbPool>,
    failure: &'static str,
    op: F,
) -> Result<T, MultimediaError>
where
    F: FnOnce(&Connection) -> Result<T, MultimediaError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let conn = pool
            .get()
            .map_err(DbError::from)
            .map_err(MultimediaError::persistence(failure))?;
        op(&conn)
    })
    .await
    .map_err(MultimediaError::persistence(failure))?
}

/// Reads back a post that was just written on the same connection.
fn fetch_written(conn: &Connection, id: i64) -> DbResult<MultimediaPost> {
    multimedia_db::read_multimedia_by_id(conn, id)?.ok_or(DbError::MissingRow(id))
}

fn validate_text(value: &Value, max_chars: usize) -> Option<String> {
    let text = value.as_str()?;
    (!text.is_empty() && text.chars().count() <= max_chars).then(|| text.to_string())
}

// `str::parse` accepts a leading `+`; path ids must not carry one.
fn parse_multimedia_id(raw: &str, message: &str) -> Result<i64, MultimediaError> {
    Some(raw)
        .filter(|raw| !raw.starts_with('+'))
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id >= 1)
        .ok_or_else(|| invalid(message))
}

/// Structural validation of a creation request. Author existence is checked
/// later, against the database, by `add_multimedia`.
pub fn validate_insert_attributes(
    attributes: &Map<String, Value>,
) -> Result<NewMultimedia, MultimediaError> {
    let author = attributes.get("duid").or_else(|| attributes.get("author_id"));
    let (Some(title), Some(content), Some(kind), Some(author)) = (
        attributes.get("title"),
        attributes.get("content"),
        attributes.get("type"),
        author,
    ) else {
        return Err(invalid(INVALID_ARGUMENTS));
    };

    let title = validate_text(title, TITLE_MAX_CHARS).ok_or_else(|| invalid(INVALID_TITLE))?;
    let content =
        validate_text(content, CONTENT_MAX_CHARS).ok_or_else(|| invalid(INVALID_CONTENT))?;
    let kind = kind
        .as_str()
        .and_then(|k| k.parse::<MultimediaType>().ok())
        .ok_or_else(|| invalid(INVALID_TYPE))?;
    let author_id = author
        .as_i64()
        .filter(|id| *id >= 1)
        .ok_or_else(|| invalid(INVALID_POST_AUTHOR))?;

    Ok(NewMultimedia { title, content, kind, author_id })
}

/// Validation of an edit request: only title and content are editable, any
/// other field is ignored.
pub fn validate_update_attributes(
    attributes: &Map<String, Value>,
) -> Result<MultimediaEdit, MultimediaError> {
    let (Some(title), Some(content)) = (attributes.get("title"), attributes.get("content")) else {
        return Err(invalid(INVALID_ARGUMENTS));
    };

    let title = validate_text(title, TITLE_MAX_CHARS).ok_or_else(|| invalid(INVALID_TITLE))?;
    let content =
        validate_text(content, CONTENT_MAX_CHARS).ok_or_else(|| invalid(INVALID_CONTENT))?;

    Ok(MultimediaEdit { title, content })
}

pub async fn add_multimedia(
    pool: &web::Data<DbPool>,
    body: &web::Bytes,
) -> Result<MultimediaPost, MultimediaError> {
    let attributes = form_helpers::parse_json_object(body)?;
    let new_post = validate_insert_attributes(&attributes)?;

    with_connection(pool, ADD_FAILED, move |conn| {
        let author_known = users_db_operations::dashboard_user_exists(conn, new_post.author_id)
            .map_err(MultimediaError::persistence(ADD_FAILED))?;
        if !author_known {
            return Err(invalid(INVALID_POST_AUTHOR));
        }

        let new_id = multimedia_db::insert_multimedia(conn, &new_post)
            .map_err(MultimediaError::persistence(ADD_FAILED))?;
        let post = fetch_written(conn, new_id).map_err(MultimediaError::persistence(ADD_FAILED))?;

        log::info!("Multimedia post {} created by dashboard user {}", post.id, post.author_id);
        Ok(post)
    })
    .await
}

pub async fn get_all_multimedia(
    pool: &web::Data<DbPool>,
) -> Result<Vec<MultimediaPost>, MultimediaError> {
    let posts = with_connection(pool, GET_ALL_FAILED, |conn| {
        multimedia_db::read_all_multimedia(conn).map_err(MultimediaError::persistence(GET_ALL_FAILED))
    })
    .await?;

    if posts.is_empty() {
        return Err(not_found(NONE_FOUND));
    }
    Ok(posts)
}

pub async fn get_multimedia_by_id(
    pool: &web::Data<DbPool>,
    raw_id: &str,
) -> Result<MultimediaPost, MultimediaError> {
    let mid = parse_multimedia_id(raw_id, INVALID_ID)?;
    let missing = move || not_found(format!("No existe una publicación multimedia con el identificador: {}", mid));

    with_connection(pool, GET_BY_ID_FAILED, move |conn| {
        let exists = multimedia_db::multimedia_exists(conn, mid)
            .map_err(MultimediaError::persistence(GET_BY_ID_FAILED))?;
        if !exists {
            return Err(missing());
        }

        multimedia_db::read_multimedia_by_id(conn, mid)
            .map_err(MultimediaError::persistence(GET_BY_ID_FAILED))?
            .ok_or_else(missing)
    })
    .await
}

pub async fn get_multimedia_by_type(
    pool: &web::Data<DbPool>,
    raw_type: &str,
) -> Result<Vec<MultimediaPost>, MultimediaError> {
    let kind: MultimediaType = raw_type.parse().map_err(|_| invalid(INVALID_TYPE))?;

    let posts = with_connection(pool, GET_BY_TYPE_FAILED, move |conn| {
        multimedia_db::read_multimedia_by_type(conn, kind)
            .map_err(MultimediaError::persistence(GET_BY_TYPE_FAILED))
    })
    .await?;

    if posts.is_empty() {
        return Err(not_found(NONE_FOUND_FOR_TYPE));
    }
    Ok(posts)
}

pub async fn get_multimedia_by_author(
    pool: &web::Data<DbPool>,
    raw_author: &str,
) -> Result<Vec<MultimediaPost>, MultimediaError> {
    let author_id = parse_multimedia_id(raw_author, INVALID_QUERY_AUTHOR)?;

    let posts = with_connection(pool, GET_BY_AUTHOR_FAILED, move |conn| {
        let author_known = users_db_operations::dashboard_user_exists(conn, author_id)
            .map_err(MultimediaError::persistence(GET_BY_AUTHOR_FAILED))?;
        if !author_known {
            return Err(invalid(INVALID_QUERY_AUTHOR));
        }

        multimedia_db::read_multimedia_by_author(conn, author_id)
            .map_err(MultimediaError::persistence(GET_BY_AUTHOR_FAILED))
    })
    .await?;

    if posts.is_empty() {
        return Err(not_found(NONE_FOUND_FOR_AUTHOR));
    }
    Ok(posts)
}

pub async fn edit_multimedia(
    pool: &web::Data<DbPool>,
    raw_id: &str,
    body: &web::Bytes,
) -> Result<MultimediaPost, MultimediaError> {
    let mid = parse_multimedia_id(raw_id, INVALID_GIVEN_ID)?;
    let attributes = form_helpers::parse_json_object(body)?;
    let edit = validate_update_attributes(&attributes)?;

    with_connection(pool, EDIT_FAILED, move |conn| {
        let exists = multimedia_db::multimedia_exists(conn, mid)
            .map_err(MultimediaError::persistence(EDIT_FAILED))?;
        if !exists {
            return Err(not_found(format!(
                "No existe una publicación multimedia con identificador: {}",
                mid
            )));
        }

        let updated_id = multimedia_db::update_multimedia(conn, mid, &edit)
            .map_err(MultimediaError::persistence(EDIT_FAILED))?;
        let post = fetch_written(conn, updated_id).map_err(MultimediaError::persistence(EDIT_FAILED))?;

        log::info!("Multimedia post {} edited", post.id);
        Ok(post)
    })
    .await
}

pub async fn remove_multimedia(
    pool: &web::Data<DbPool>,
    raw_id: &str,
) -> Result<RemovalConfirmation, MultimediaError> {
    let mid = parse_multimedia_id(raw_id, INVALID_GIVEN_ID)?;

    with_connection(pool, REMOVE_FAILED, move |conn| {
        let exists = multimedia_db::multimedia_exists(conn, mid)
            .map_err(MultimediaError::persistence(REMOVE_FAILED))?;
        if !exists {
            return Err(not_found(format!(
                "No existe una publicación multimedia con identificador: {}",
                mid
            )));
        }

        let removed_id = multimedia_db::soft_delete_multimedia(conn, mid)
            .map_err(MultimediaError::persistence(REMOVE_FAILED))?;

        log::info!("Multimedia post {} marked invalid", removed_id);
        Ok(RemovalConfirmation {
            mid: removed_id,
            message: format!(
                "Se removió la publicación multimedia con identificador: {}",
                removed_id
            ),
        })
    })
    .await
}
