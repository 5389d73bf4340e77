use actix_web::{web, HttpResponse};
use serde::Serialize;
use crate::configuration::PUBLIC_TURNSTILE_SITE_KEY;
use crate::routes::ErrorBody;

/// Public key the client-side widget is rendered with.
pub struct TurnstileSiteKey(pub Option<String>);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteKeyResponse<'a> {
    site_key: &'a str,
}

pub async fn turnstile_site_key(site_key: web::Data<TurnstileSiteKey>) -> HttpResponse {
    match site_key.0.as_deref().filter(|key| !key.is_empty()) {
        Some(site_key) => HttpResponse::Ok().json(SiteKeyResponse { site_key }),
        None => {
            tracing::error!("{} is not configured", PUBLIC_TURNSTILE_SITE_KEY);
            HttpResponse::InternalServerError().json(ErrorBody {
                error: format!("Service configuration error: {}", PUBLIC_TURNSTILE_SITE_KEY),
            })
        }
    }
}
