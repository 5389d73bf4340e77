use std::net::TcpListener;
use actix_web::dev::Server;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use crate::configuration::{Settings, SubscriptionSecrets};
use crate::resend_client::ResendClient;
use crate::routes::{health_check, payload_too_large, subscribe, turnstile_site_key, TurnstileSiteKey};
use crate::turnstile_client::TurnstileClient;


pub fn run(
    listener: TcpListener,
    secrets: SubscriptionSecrets,
    site_key: TurnstileSiteKey,
    turnstile_client: TurnstileClient,
    resend_client: ResendClient,
) -> std::io::Result<Server> {
    let secrets = web::Data::new(secrets);
    let site_key = web::Data::new(site_key);
    let turnstile_client = web::Data::new(turnstile_client);
    let resend_client = web::Data::new(resend_client);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandlers::new().handler(StatusCode::PAYLOAD_TOO_LARGE, payload_too_large))
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/subscribe", web::post().to(subscribe))
            .route("/api/turnstile/site_key", web::get().to(turnstile_site_key))
            .app_data(secrets.clone())
            .app_data(site_key.clone())
            .app_data(turnstile_client.clone())
            .app_data(resend_client.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Application {
    port: u16,
    server: Server,
}


impl Application {
    pub async fn build(configuration: Settings) -> Result<Application, anyhow::Error> {
        let secrets = SubscriptionSecrets::from(&configuration);
        if let Err(e) = secrets.resolve() {
            tracing::warn!("{}, subscriptions will be refused", e);
        }
        let site_key = TurnstileSiteKey(configuration.turnstile.site_key.clone());

        let turnstile_client = TurnstileClient::new(
            configuration.turnstile.base_url.clone(),
            configuration.turnstile.timeout(),
        )?;
        let resend_client = ResendClient::new(
            configuration.resend.base_url.clone(),
            configuration.resend.timeout(),
        )?;

        let address = format!("{}:{}", configuration.application.address, configuration.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, secrets, site_key, turnstile_client, resend_client)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }

}
