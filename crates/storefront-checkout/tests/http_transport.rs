//! HttpTransport against a local warp endpoint
//!
//! The endpoint mimics the query view: multipart body, token header, JSON
//! verdict with a 400 status on rejection.

use futures::TryStreamExt;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use storefront_checkout::{
    ContactForm, ContactOutcome, HttpTransport, OrderSubmitter, QueryRequest, QueryTransport,
    SubmitOutcome, TransportError, CSRF_FIELD,
};
use storefront_test_utils::engine_with_items;
use tokio::sync::Mutex;
use warp::http::StatusCode;
use warp::hyper::body::Buf;
use warp::multipart::FormData;
use warp::Filter;

#[derive(Debug, Clone)]
struct Captured {
    token: Option<String>,
    fields: Vec<(String, String)>,
}

type Log = Arc<Mutex<Vec<Captured>>>;

async fn read_fields(mut form: FormData) -> Vec<(String, String)> {
    // Each part must be drained before the next one is pulled.
    let mut fields = Vec::new();
    while let Some(part) = form.try_next().await.unwrap() {
        let name = part.name().to_string();
        let data = part
            .stream()
            .try_fold(Vec::new(), |mut acc, buf| async move {
                acc.extend_from_slice(buf.chunk());
                Ok(acc)
            })
            .await
            .unwrap();
        fields.push((name, String::from_utf8(data).unwrap()));
    }
    fields
}

fn spawn_query_endpoint(log: Log) -> SocketAddr {
    let route = warp::post()
        .and(warp::path("send-query-email"))
        .and(warp::path::end())
        .and(warp::header::optional::<String>("x-csrftoken"))
        .and(warp::multipart::form())
        .and_then(move |token: Option<String>, form: FormData| {
            let log = log.clone();
            async move {
                let fields = read_fields(form).await;
                let complete = ["email", "message"]
                    .iter()
                    .all(|name| fields.iter().any(|(k, v)| k == name && !v.is_empty()));
                log.lock().await.push(Captured { token, fields });

                let reply = if complete {
                    warp::reply::with_status(
                        warp::reply::json(&json!({"success": true, "message": "Email sent successfully!"})),
                        StatusCode::OK,
                    )
                } else {
                    warp::reply::with_status(
                        warp::reply::json(&json!({"success": false, "error": "Missing email or message"})),
                        StatusCode::BAD_REQUEST,
                    )
                };
                Ok::<_, warp::Rejection>(reply)
            }
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn transport_for(addr: SocketAddr) -> HttpTransport {
    let url = format!("http://{addr}/send-query-email").parse().unwrap();
    HttpTransport::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn order_is_posted_as_multipart_with_token_header() {
    let log = Log::default();
    let transport = transport_for(spawn_query_endpoint(log.clone()));
    let (mut engine, _storage) = engine_with_items(&[("Hammer", "250"), ("Nails", "40")]);

    let outcome = OrderSubmitter::default()
        .checkout(&mut engine, "buyer@example.com", Some("tok-123"), &transport)
        .await
        .unwrap();

    assert!(outcome.is_accepted());
    assert!(engine.cart().is_empty());

    let log = log.lock().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].token.as_deref(), Some("tok-123"));
    assert_eq!(
        log[0].fields,
        vec![
            ("email".to_string(), "buyer@example.com".to_string()),
            (
                "message".to_string(),
                "Order Details:\nHammer (Qty: 1) - 250 Rs.\nNails (Qty: 1) - 40 Rs.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn rejection_body_is_read_despite_error_status() {
    let transport = transport_for(spawn_query_endpoint(Log::default()));

    let response = transport
        .send_query(QueryRequest {
            fields: vec![("email".into(), "a@example.com".into())],
            csrf_token: "tok".into(),
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Missing email or message"));
}

#[tokio::test]
async fn rejected_order_keeps_cart() {
    let transport = transport_for(spawn_query_endpoint(Log::default()));
    let (mut engine, _storage) = engine_with_items(&[("Hammer", "250")]);
    let before = engine.cart().clone();

    // An empty message is refused by the endpoint; force it through the
    // transport directly and fold the verdict back in.
    let response = transport
        .send_query(QueryRequest {
            fields: vec![("email".into(), "a@example.com".into()), ("message".into(), String::new())],
            csrf_token: "tok".into(),
        })
        .await
        .unwrap();
    let outcome = SubmitOutcome::from_response(response);
    outcome.apply(&mut engine).unwrap();

    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(engine.cart(), &before);
}

#[tokio::test]
async fn contact_form_is_passed_through() {
    let log = Log::default();
    let transport = transport_for(spawn_query_endpoint(log.clone()));
    let mut form = ContactForm::new()
        .with_field(CSRF_FIELD, "tok-9")
        .with_field("name", "Asha")
        .with_field("email", "asha@example.com")
        .with_field("message", "Bulk pricing?");

    let outcome = form.submit(&transport).await.unwrap();

    assert!(matches!(outcome, ContactOutcome::Sent));
    assert_eq!(form.field("message"), Some(""));

    let log = log.lock().await;
    assert_eq!(log[0].token.as_deref(), Some("tok-9"));
    let names: Vec<&str> = log[0].fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, [CSRF_FIELD, "name", "email", "message"]);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let route = warp::post().map(|| warp::reply::with_status("Server Error", StatusCode::INTERNAL_SERVER_ERROR));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let transport = HttpTransport::new(
        format!("http://{addr}/").parse().unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();

    let result = transport
        .send_query(QueryRequest {
            fields: vec![],
            csrf_token: "tok".into(),
        })
        .await;

    assert!(matches!(
        result,
        Err(TransportError::MalformedResponse { status: 500, .. })
    ));
}

#[tokio::test]
async fn connection_refused_is_unreachable() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let transport = transport_for(addr);
    let (mut engine, _storage) = engine_with_items(&[("Hammer", "250")]);

    let outcome = OrderSubmitter::default()
        .checkout(&mut engine, "buyer@example.com", Some("tok"), &transport)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        SubmitOutcome::TransportFailed(TransportError::Unreachable(_))
    ));
    assert_eq!(engine.cart().len(), 1);
}
