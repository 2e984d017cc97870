#[path = "../../client/tests/support/mod.rs"]
mod support;

use http::{HeaderMap, HeaderValue, Method};
use serde_json::{Value, json};

use sofa::{Query, RequestBody, Resource, Session, SessionConfig};
use support::{Action, TestServer};

fn quick_session() -> Session {
    Session::new(SessionConfig::no_retry()).expect("session")
}

#[test]
fn get_json_joins_path_and_query() {
    let server = TestServer::start(vec![Action::Respond(support::json(200, &json!({"rows": []})))]);
    let resource = Resource::with_session(&format!("{}/", server.base()), quick_session()).expect("resource");

    let query = Query::new()
        .param("include_docs", true)
        .param("keys", vec!["a", "b"])
        .param("limit", 10_i64);
    let resp = resource
        .get_json::<Value, _>(&["db", "_all_docs"], &query)
        .expect("get_json");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, json!({"rows": []}));
    let requests = server.requests();
    assert_eq!(requests[0].target, "/db/_all_docs?include_docs=true&keys=a&keys=b&limit=10");
}

#[test]
fn segments_are_escaped_on_the_wire() {
    let server = TestServer::start(vec![Action::Respond(support::json(200, &json!({})))]);
    let resource = Resource::with_session(&server.base(), quick_session()).expect("resource");

    resource
        .get(&["db", "_design/app"], &Query::new())
        .expect("get")
        .bytes()
        .expect("body");

    assert_eq!(server.requests()[0].target, "/db/_design%2Fapp");
}

#[test]
fn url_credentials_are_sent_as_basic_auth() {
    let server = TestServer::start(vec![Action::Respond(support::json(200, &json!({"ok": true})))]);
    let url = server.base().replace("http://", "http://joe:secret@");
    let resource = Resource::with_session(&url, quick_session()).expect("resource");
    assert!(!resource.url().contains("secret"));

    resource.get_json::<Value, _>(&["_session"], &Query::new()).expect("get");

    let request = &server.requests()[0];
    assert_eq!(request.header("authorization"), Some("Basic am9lOnNlY3JldA=="));
}

#[test]
fn default_headers_are_layered_under_request_headers() {
    let server = TestServer::start(vec![Action::Respond(support::json(200, &json!({})))]);
    let mut resource = Resource::with_session(&server.base(), quick_session()).expect("resource");
    resource
        .headers_mut()
        .insert("x-couch-full-commit", HeaderValue::from_static("true"));
    resource
        .headers_mut()
        .insert("x-trace", HeaderValue::from_static("default"));

    let mut extra = HeaderMap::new();
    extra.insert("x-trace", HeaderValue::from_static("override"));
    resource
        .request(Method::GET, &["db"], RequestBody::Empty, Some(extra), &Query::new())
        .expect("request")
        .bytes()
        .expect("body");

    let request = &server.requests()[0];
    assert_eq!(request.header("x-couch-full-commit"), Some("true"));
    assert_eq!(request.header("x-trace"), Some("override"));
}

#[test]
fn put_json_sends_json_body() {
    let server = TestServer::start(vec![Action::Respond(support::json(
        201,
        &json!({"ok": true, "id": "doc", "rev": "1-abc"}),
    ))]);
    let resource = Resource::with_session(&server.base(), quick_session()).expect("resource");

    let body = RequestBody::json(&json!({"name": "sofa"})).expect("encode");
    let resp = resource
        .put_json::<Value, _>(&["db", "doc"], body, &Query::new())
        .expect("put");
    assert_eq!(resp.status, 201);
    assert_eq!(resp.data["rev"], "1-abc");

    let request = &server.requests()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.header("content-type"), Some("application/json"));
    let sent: Value = serde_json::from_slice(&request.body).expect("json body");
    assert_eq!(sent, json!({"name": "sofa"}));
}

#[test]
fn non_json_response_is_decode_error() {
    let server = TestServer::start(vec![Action::Respond(support::response(
        200,
        &[("Content-Type", "text/plain")],
        b"hello",
    ))]);
    let resource = Resource::with_session(&server.base(), quick_session()).expect("resource");

    let err = resource
        .get_json::<Value, _>(&["greeting"], &Query::new())
        .expect_err("text body");
    assert!(err.is_decode());
}

#[test]
fn derived_resources_share_the_session_pool() {
    let server = TestServer::start(vec![
        Action::Respond(support::json(200, &json!({"a": 1}))),
        Action::Respond(support::json(200, &json!({"b": 2}))),
    ]);
    let root = Resource::with_session(&server.base(), quick_session()).expect("resource");
    let db = root.derive(&["db"]);

    root.get_json::<Value, _>(&["_up"], &Query::new()).expect("root");
    db.get_json::<Value, _>(&["doc"], &Query::new()).expect("child");

    let requests = server.requests();
    assert_eq!(requests[1].target, "/db/doc");
    assert_eq!(server.connections(), 1);
}

#[test]
fn http_errors_carry_couchdb_payload() {
    let server = TestServer::start(vec![Action::Respond(support::json(
        409,
        &json!({"error": "conflict", "reason": "Document update conflict."}),
    ))]);
    let resource = Resource::with_session(&server.base(), quick_session()).expect("resource");

    let err = resource
        .put(&["db", "doc"], RequestBody::Empty, &Query::new())
        .expect_err("conflict");
    assert!(err.is_conflict());
    let payload = err.payload().expect("payload");
    assert_eq!(payload.error(), Some("conflict"));
}
