//! Chat integration tests: dispatch routes, sessions, and the chat form.

mod common;

use actix_web::{
    cookie::Cookie,
    http::{StatusCode, header},
    test,
};
use serde_json::{Value, json};
use weather_chat_dashboard::{
    TextGenerationConfig, create_app, services::chat::CHAT_INSTRUCTION_PREFIX,
    services::session::SESSION_COOKIE,
};
use wiremock::matchers::{body_partial_json, header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("session cookie")
}

#[actix_web::test]
async fn test_city_message_replies_with_summary() {
    let weather = MockServer::start().await;
    let text = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::current_body(295.15, 55, "scattered clouds")))
        .expect(1)
        .mount(&weather)
        .await;
    Mock::given(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::forecast_body()))
        .expect(0)
        .mount(&weather)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_partial_json(json!({
            "prompt": "The current weather is scattered clouds with a temperature of 22.0°C. Generate a short, friendly weather summary.",
            "max_tokens": 60
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::cohere_reply("Pleasant with some clouds.")))
        .expect(1)
        .mount(&text)
        .await;

    let config = common::config(&weather.uri(), common::cohere(&text.uri()));
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "Tell me about Paris"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    assert!(cookie.http_only().unwrap_or(false));

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["route"], "city_lookup");
    assert_eq!(json["candidate_city"], "Paris");
    assert_eq!(json["reply"], "Pleasant with some clouds.");

    let conversation = json["conversation"].as_array().unwrap();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0], json!({"speaker": "user", "text": "Tell me about Paris"}));
    assert_eq!(conversation[1], json!({"speaker": "assistant", "text": "Pleasant with some clouds."}));
}

#[actix_web::test]
async fn test_free_form_prompt_is_prefixed_verbatim() {
    let weather = MockServer::start().await;
    let text = MockServer::start().await;

    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header_matcher("authorization", "Bearer cohere-key"))
        .and(body_partial_json(json!({
            "prompt": format!("{CHAT_INSTRUCTION_PREFIX}hi"),
            "max_tokens": 100,
            "model": "command-r-plus"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::cohere_reply(
            "Inquiry not understood. Please ask about the weather.",
        )))
        .expect(1)
        .mount(&text)
        .await;

    let config = common::config(&weather.uri(), common::cohere(&text.uri()));
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "hi"}))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["route"], "free_form");
    assert!(json["candidate_city"].is_null());
    assert_eq!(json["reply"], "Inquiry not understood. Please ask about the weather.");
}

#[actix_web::test]
async fn test_unknown_city_reply_and_provider_error_text() {
    let weather = MockServer::start().await;
    let text = MockServer::start().await;

    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})))
        .mount(&weather)
        .await;
    Mock::given(path("/generate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api token"))
        .mount(&text)
        .await;

    let config = common::config(&weather.uri(), common::cohere(&text.uri()));
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "Weather in Atlantis"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["route"], "city_lookup");
    assert_eq!(json["reply"], "Sorry, I could not find weather for Atlantis.");

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .cookie(cookie.clone())
        .set_json(json!({"message": "hello there"}))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["route"], "free_form");
    assert_eq!(json["reply"], "cohere API error 401: invalid api token");
    assert_eq!(json["conversation"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_history_is_per_session() {
    let weather = MockServer::start().await;
    let config = common::config(&weather.uri(), TextGenerationConfig::default());
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "is it windy?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let alice = session_cookie(&resp);

    let req = test::TestRequest::get()
        .uri("/api/chat/history")
        .cookie(alice)
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    let conversation = json["conversation"].as_array().unwrap();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0]["text"], "is it windy?");
    assert!(conversation[1]["text"].as_str().unwrap().starts_with("[mock completion]"));

    let req = test::TestRequest::get().uri("/api/chat/history").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert!(json["conversation"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_empty_message_rejected() {
    let weather = MockServer::start().await;
    let config = common::config(&weather.uri(), TextGenerationConfig::default());
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_chat_form_redirects_to_chat_tab() {
    let weather = MockServer::start().await;
    let config = common::config(&weather.uri(), TextGenerationConfig::default());
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/chat")
        .set_form([("message", "any rain today?")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/?view=chat");
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get()
        .uri("/?view=chat")
        .cookie(cookie)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains(r#"<section id="chat" class="tab active">"#));
    assert!(html.contains("any rain today?"));
    assert!(html.contains("[mock completion] User: any rain today?"));
}

#[actix_web::test]
async fn test_session_cookie_refreshed_every_turn() {
    let weather = MockServer::start().await;
    let config = common::config(&weather.uri(), TextGenerationConfig::default());
    let app = test::init_service(create_app(&config, common::services(&config))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "is it sunny?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    let first = session_cookie(&resp);
    assert_eq!(first.max_age(), Some(actix_web::cookie::time::Duration::seconds(1800)));

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .cookie(first.clone())
        .set_json(json!({"message": "and tomorrow?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    let second = session_cookie(&resp);
    assert_eq!(second.value(), first.value());
    assert_eq!(second.max_age(), first.max_age());

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["conversation"].as_array().unwrap().len(), 4);
}
