use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_web::dev::Server;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{BcryptCredentials, SessionService};
use crate::configuration::TokenSettings;
use crate::directory::IdentityDirectory;
use crate::logger::RequestLogger;
use crate::middleware::AuthenticationGate;
use crate::routes::{health_check, login, me, refresh_token, sign_up};
use crate::token::TokenVerifier;

pub fn run(
    listener: TcpListener,
    directory: Arc<dyn IdentityDirectory>,
    token_settings: TokenSettings,
) -> Result<Server, std::io::Error> {
    let session_service = web::Data::new(SessionService::new(
        directory,
        Arc::new(BcryptCredentials),
        &token_settings,
    ));
    let verifier = TokenVerifier::new(&token_settings);
    let public_paths = token_settings.public_paths.clone();

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(RequestLogger)
            .wrap(AuthenticationGate::new(
                verifier.clone(),
                public_paths.clone(),
            ))

            // Shared state
            .app_data(session_service.clone())

            // Public routes (allow-listed past the gate)
            .route("/health_check", web::get().to(health_check))
            .route("/api/members", web::post().to(sign_up))
            .route("/api/login", web::post().to(login))
            .route("/api/refreshToken", web::post().to(refresh_token))

            // Protected routes (security context required)
            .route("/api/me", web::get().to(me))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
