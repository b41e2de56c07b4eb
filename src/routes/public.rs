use actix_web::{web, HttpResponse, Responder};

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/is_server_active", web::get().to(is_server_active)));
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}
