//! Chat endpoints and the session cookie they share with the page.

use crate::{
    handlers::app_services,
    models::{ChatHistoryResponse, ChatMessage, ChatRequest, ChatResponse},
    services::{
        AppServices,
        chat::ChatReply,
        rate_limit::rate_limit_middleware,
        session::SESSION_COOKIE,
    },
};
use actix_web::{
    Error, HttpRequest, HttpResponse, Result,
    cookie::{Cookie, SameSite, time},
    web,
};
use paperclip::actix::api_v2_operation;
use uuid::Uuid;

/// Session id carried by the request's cookie, if well-formed
pub(crate) fn requested_session(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Session cookie whose max-age restarts with every turn, matching the
/// store's idle expiry
pub(crate) fn session_cookie(id: Uuid, services: &AppServices) -> Cookie<'static> {
    let max_age = i64::try_from(services.sessions.ttl().as_secs()).unwrap_or(i64::MAX);
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

/// Run one chat turn for the requesting session
///
/// The provider calls happen without holding the session lock; the
/// exchange is appended once the reply is known.
pub(crate) async fn run_turn(
    req: &HttpRequest,
    services: &AppServices,
    message: &str,
) -> (Uuid, ChatReply, Vec<ChatMessage>) {
    let (session_id, created) = services.sessions.open(requested_session(req));

    let reply = services.chat.reply(message).await;
    services.metrics.record_chat_reply(&reply);

    let conversation = services
        .sessions
        .record_turn(session_id, message, &reply.reply);

    tracing::info!(
        session_id = %session_id,
        new_session = created,
        route = reply.route.as_str(),
        candidate_city = ?reply.candidate_city,
        "Chat turn completed"
    );

    (session_id, reply, conversation)
}

/// Chat turn endpoint
///
/// A message containing a capitalized run of words is treated as a city
/// lookup; anything else goes to the text generator.
#[api_v2_operation(
    summary = "Chat Turn Endpoint",
    description = "Sends one chat message. Messages naming a capitalized city are answered with a weather summary for that city; other messages are answered by the text generation provider. The exchange is appended to the session's conversation, which is identified by the wx_session cookie.",
    tags("Chat"),
    responses(
        (status = 200, description = "Reply and the session's conversation", body = ChatResponse),
        (status = 400, description = "Bad Request - Empty message"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn chat(req: HttpRequest, body: web::Json<ChatRequest>) -> Result<HttpResponse, Error> {
    let services = app_services(&req)?;

    if body.message.trim().is_empty() {
        return Err(actix_web::error::ErrorBadRequest("Message cannot be empty"));
    }

    if let Err(response) = rate_limit_middleware(&req, &services.limiter) {
        return Ok(response);
    }

    let (session_id, reply, conversation) = run_turn(&req, services, &body.message).await;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(session_id, services))
        .json(ChatResponse {
            route: reply.route,
            candidate_city: reply.candidate_city,
            reply: reply.reply,
            conversation,
        }))
}

/// Conversation history endpoint
#[api_v2_operation(
    summary = "Chat History Endpoint",
    description = "Returns the conversation of the session identified by the wx_session cookie. Unknown or expired sessions have an empty history.",
    tags("Chat"),
    responses(
        (status = 200, description = "The session's conversation", body = ChatHistoryResponse)
    )
)]
pub async fn chat_history(req: HttpRequest) -> Result<web::Json<ChatHistoryResponse>, Error> {
    let services = app_services(&req)?;

    let conversation = requested_session(&req)
        .map(|id| services.sessions.transcript(id))
        .unwrap_or_default();

    Ok(web::Json(ChatHistoryResponse { conversation }))
}
