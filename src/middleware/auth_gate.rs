/// Authentication Gate
///
/// Per-request filter. Allow-listed paths bypass it entirely; everywhere
/// else it extracts the bearer token, verifies it as an access token, and
/// installs the resulting `SecurityContext` into request extensions. A
/// missing or failing token never short-circuits the request here — the
/// request stays unauthenticated and protected handlers reject it when they
/// try to extract the context.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{GateRejection, SecurityContext};
use crate::token::{TokenKind, TokenVerifier};

pub struct AuthenticationGate {
    verifier: TokenVerifier,
    public_paths: Vec<String>,
}

impl AuthenticationGate {
    pub fn new(verifier: TokenVerifier, public_paths: Vec<String>) -> Self {
        Self {
            verifier,
            public_paths,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthenticationGateService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
            public_paths: self.public_paths.clone(),
        }))
    }
}

pub struct AuthenticationGateService<S> {
    service: Rc<S>,
    verifier: TokenVerifier,
    public_paths: Vec<String>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if self.public_paths.iter().any(|p| p == req.path()) {
            return Box::pin(async move { service.call(req).await });
        }

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string));

        match bearer {
            // No token: the request proceeds unauthenticated
            None => {}
            Some(token) => match self.verifier.verify(&token, TokenKind::Access, Utc::now()) {
                Ok(verified) => {
                    tracing::debug!(
                        username = %verified.username,
                        "Access token verified"
                    );
                    req.extensions_mut()
                        .insert(SecurityContext::from_verified(verified));
                }
                Err(kind) => {
                    tracing::warn!(path = %req.path(), error = %kind, "Access token rejected");
                    req.extensions_mut().insert(GateRejection(kind));
                }
            },
        }

        Box::pin(async move { service.call(req).await })
    }
}
