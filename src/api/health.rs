use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "message": "HRMS API is running"
        }))
    ),
    tag = "Health"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "HRMS API is running"
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::lazy_pool;
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn reports_ok() {
        let app = crate::test_app!(lazy_pool());
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }
}
