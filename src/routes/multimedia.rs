use crate::error::MultimediaError;
use crate::helper::multimedia_helpers;
use crate::DbPool;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct MultimediaQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    author: Option<String>,
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected multimedia query string: {}", err);
        MultimediaError::Validation(multimedia_helpers::INVALID_ARGUMENTS.to_string()).into()
    });

    cfg.service(
        web::scope("/multimedia")
            .app_data(query_config)
            .route("", web::get().to(list_multimedia))
            .route("", web::post().to(add_multimedia))
            .route("/{mid}", web::get().to(get_multimedia_by_id))
            .route("/{mid}", web::put().to(edit_multimedia))
            .route("/{mid}", web::patch().to(edit_multimedia))
            .route("/{mid}", web::delete().to(remove_multimedia)),
    );
}

async fn add_multimedia(
    pool: web::Data<DbPool>,
    body: web::Bytes,
) -> Result<HttpResponse, MultimediaError> {
    let post = multimedia_helpers::add_multimedia(&pool, &body).await?;
    Ok(HttpResponse::Created().json(json!({ "Multimedia": post })))
}

/// GET /multimedia, optionally filtered by `?type=` or `?author=` (not both).
async fn list_multimedia(
    pool: web::Data<DbPool>,
    query: web::Query<MultimediaQuery>,
) -> Result<HttpResponse, MultimediaError> {
    let posts = match (query.kind.as_deref(), query.author.as_deref()) {
        (None, None) => multimedia_helpers::get_all_multimedia(&pool).await?,
        (Some(kind), None) => multimedia_helpers::get_multimedia_by_type(&pool, kind).await?,
        (None, Some(author)) => multimedia_helpers::get_multimedia_by_author(&pool, author).await?,
        (Some(_), Some(_)) => {
            return Err(MultimediaError::Validation(
                multimedia_helpers::INVALID_ARGUMENTS.to_string(),
            ))
        }
    };
    Ok(HttpResponse::Ok().json(json!({ "Multimedias": posts })))
}

async fn get_multimedia_by_id(
    pool: web::Data<DbPool>,
    mid: web::Path<String>,
) -> Result<HttpResponse, MultimediaError> {
    let post = multimedia_helpers::get_multimedia_by_id(&pool, &mid).await?;
    Ok(HttpResponse::Ok().json(json!({ "Multimedia": post })))
}

async fn edit_multimedia(
    pool: web::Data<DbPool>,
    mid: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, MultimediaError> {
    let post = multimedia_helpers::edit_multimedia(&pool, &mid, &body).await?;
    Ok(HttpResponse::Ok().json(json!({ "Multimedia": post })))
}

async fn remove_multimedia(
    pool: web::Data<DbPool>,
    mid: web::Path<String>,
) -> Result<HttpResponse, MultimediaError> {
    let confirmation = multimedia_helpers::remove_multimedia(&pool, &mid).await?;
    Ok(HttpResponse::Ok().json(json!({ "Multimedia": confirmation })))
}
