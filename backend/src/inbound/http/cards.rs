//! Card registry endpoints.
//!
//! ```text
//! GET  /sync               registered card ids, unauthenticated
//! GET  /manage             management page
//! POST /add     uid=...    register a card, redirect to /manage
//! GET  /delete?delete=...  remove a card, redirect to /manage
//! ```
//!
//! Mutations never fail the request on business input: rejected, duplicate
//! and missing identifiers are logged by the registry and the client is sent
//! back to the management page. Store failures are logged here.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::ApiResult;
use super::auth::AdminAuth;
use super::manage_view::render_manage_page;
use super::state::HttpState;

/// Location every mutation redirects to.
pub const MANAGE_PATH: &str = "/manage";

/// Wire shape of one registered card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDto {
    /// Card identifier.
    pub id: String,
}

fn redirect_to_manage() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, MANAGE_PATH))
        .finish()
}

/// Body of `POST /add`.
#[derive(Debug, Deserialize)]
pub struct AddCardForm {
    /// Identifier to register.
    pub uid: Option<String>,
}

/// Query of `GET /delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteCardQuery {
    /// Identifier to remove.
    pub delete: Option<String>,
}

/// Registered card ids for reader devices.
#[get("/sync")]
pub async fn sync_cards(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CardDto>>> {
    let cards = state.cards.list().await?;
    Ok(web::Json(
        cards
            .into_iter()
            .map(|card| CardDto {
                id: card.id().to_string(),
            })
            .collect(),
    ))
}

/// Management page listing every registered card.
#[get("/manage")]
pub async fn manage(_admin: AdminAuth, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let cards = state.cards.list().await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_manage_page(&cards)))
}

/// Register the card named by the `uid` form field.
///
/// An unreadable form (wrong content type, oversized body) is treated as an
/// empty identifier and rejected by the registry.
#[post("/add")]
pub async fn add_card(
    _admin: AdminAuth,
    state: web::Data<HttpState>,
    form: Result<web::Form<AddCardForm>, actix_web::Error>,
) -> HttpResponse {
    let uid = match form {
        Ok(form) => form.into_inner().uid.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "add form unreadable");
            String::new()
        }
    };
    if let Err(err) = state.cards.add(&uid).await {
        error!(%uid, error = %err, "failed to add card");
    }
    redirect_to_manage()
}

/// Remove the card named by the `delete` query parameter.
#[get("/delete")]
pub async fn delete_card(
    _admin: AdminAuth,
    state: web::Data<HttpState>,
    query: Result<web::Query<DeleteCardQuery>, actix_web::Error>,
) -> HttpResponse {
    let uid = query
        .ok()
        .and_then(|query| query.into_inner().delete)
        .unwrap_or_default();
    if let Err(err) = state.cards.delete(&uid).await {
        error!(%uid, error = %err, "failed to delete card");
    }
    redirect_to_manage()
}
