use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::HttpResponse;

mod health_check;
mod subscribe;
mod turnstile_site_key;

pub use health_check::health_check;
pub use subscribe::{subscribe, SubscribeError};
pub use turnstile_site_key::{turnstile_site_key, TurnstileSiteKey};

/// JSON body of every error answer.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Gives the payload limit rejection raised by actix's body extractors the
/// same JSON shape as the handlers' own errors.
pub fn payload_too_large<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    tracing::warn!("Request body exceeds the payload limit");
    let (req, _) = res.into_parts();
    let response = HttpResponse::PayloadTooLarge().json(ErrorBody {
        error: "Request body is too large".to_string(),
    });
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
