//! Basic authentication extractor for management routes.
//!
//! Handlers that take an [`AdminAuth`] argument only run once the request's
//! `Authorization` header has been verified. Password verification is CPU
//! bound, so it runs on the blocking pool.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::Authenticator;
use crate::domain::{AdminIdentity, BasicCredentials, Error};

use super::state::HttpState;

/// Proof that the request carried valid management credentials.
#[derive(Debug, Clone)]
pub struct AdminAuth(AdminIdentity);

impl AdminAuth {
    /// Authenticated administrator.
    pub fn identity(&self) -> &AdminIdentity {
        &self.0
    }
}

fn credentials_from(
    req: &HttpRequest,
) -> Result<(Arc<dyn Authenticator>, BasicCredentials), Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication required"))?
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not ASCII"))?;
    let credentials = BasicCredentials::from_header(value).map_err(|err| {
        debug!(error = %err, "malformed authorization header");
        Error::unauthorized(err.to_string())
    })?;
    Ok((Arc::clone(&state.authenticator), credentials))
}

/// Rebuild an error on the request task so it captures the trace id.
fn on_request_task(error: Error) -> Error {
    if error.trace_id().is_some() {
        return error;
    }
    Error::new(error.code(), error.message())
}

impl FromRequest for AdminAuth {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let prepared = credentials_from(req);
        Box::pin(async move {
            let (authenticator, credentials) = prepared?;
            let username = credentials.username().to_owned();
            let outcome = web::block(move || authenticator.authenticate(&credentials))
                .await
                .map_err(|err| Error::internal(format!("authentication task failed: {err}")))?;
            match outcome {
                Ok(identity) => {
                    debug!(username = identity.username(), "management request authenticated");
                    Ok(Self(identity))
                }
                Err(err) => {
                    warn!(%username, "management authentication failed");
                    Err(on_request_task(err))
                }
            }
        })
    }
}
