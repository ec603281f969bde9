//! Realm-scoped HTTP routes used by the chat adapter.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{RealmPath, ValidatedJson};
use crate::notify;
use crate::services::{Invocation, Reply};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub can_manage_realm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub replies: Vec<Reply>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrefixResponse {
    pub prefix: String,
}

/// POST /api/realms/{realm_id}/commands
///
/// Runs one chat message through the command service. Replies are returned
/// in the body and, when a webhook is configured, relayed to it as well.
/// Messages that are not commands return an empty list.
async fn post_command(
    realm: RealmPath,
    body: ValidatedJson<CommandRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let author = request.author_id.trim();
    if author.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "author_id must not be empty",
        ));
    }

    let invocation = Invocation {
        realm: realm.0,
        author: UserId::new(author),
        content: request.content,
        can_manage_realm: request.can_manage_realm,
    };
    let outcome = app_state.commands.handle(&invocation).await?;

    if let Some(notifier) = &app_state.notifier {
        notify::relay(
            notifier.as_ref(),
            app_state.config.notify_timeout,
            &invocation.realm,
            &outcome.replies,
        )
        .await;
    }

    Ok(HttpResponse::Ok().json(CommandResponse {
        replies: outcome.replies,
    }))
}

/// POST /api/realms/{realm_id}/join
///
/// The bot was added to a realm; create it eagerly.
async fn post_join(
    realm: RealmPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state.registry.get_or_create(&realm.0);
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/realms/{realm_id}/prefix
async fn get_prefix(
    realm: RealmPath,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let prefix = app_state.commands.prefix_for(&realm.0).await;
    Ok(HttpResponse::Ok().json(PrefixResponse { prefix }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{realm_id}/commands").route(web::post().to(post_command)));
    cfg.service(web::resource("/{realm_id}/join").route(web::post().to(post_join)));
    cfg.service(web::resource("/{realm_id}/prefix").route(web::get().to(get_prefix)));
}
