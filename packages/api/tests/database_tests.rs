#[path = "../../client/tests/support/mod.rs"]
mod support;

use serde::{Deserialize, Serialize};
use serde_json::json;

use sofa::{Server, Session, SessionConfig};
use support::{Action, TestServer};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Recipe {
    name: String,
    eggs: u32,
}

fn server_for(test: &TestServer) -> Server {
    let session = Session::new(SessionConfig::no_retry()).expect("session");
    Server::with_session(&format!("{}/", test.base()), session).expect("server")
}

#[test]
fn version_reads_welcome_document() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        200,
        &json!({"couchdb": "Welcome", "version": "3.3.3"}),
    ))]);
    let server = server_for(&test);

    assert_eq!(server.version().expect("version"), "3.3.3");
    assert_eq!(test.requests()[0].target, "/");
}

#[test]
fn all_dbs_lists_names() {
    let test = TestServer::start(vec![Action::Respond(support::json(200, &json!(["_users", "recipes"])))]);
    let server = server_for(&test);

    assert_eq!(server.all_dbs().expect("all_dbs"), vec!["_users", "recipes"]);
    assert_eq!(test.requests()[0].target, "/_all_dbs");
}

#[test]
fn contains_maps_not_found_to_false() {
    let test = TestServer::start(vec![
        Action::Respond(support::response(200, &[], b"")),
        Action::Respond(support::response(404, &[], b"")),
    ]);
    let server = server_for(&test);

    assert!(server.contains("recipes").expect("present"));
    assert!(!server.contains("missing").expect("absent"));
    let requests = test.requests();
    assert_eq!(requests[0].method, "HEAD");
    assert_eq!(requests[1].target, "/missing");
}

#[test]
fn create_existing_database_is_conflict() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        412,
        &json!({"error": "file_exists", "reason": "The database could not be created, the file already exists."}),
    ))]);
    let server = server_for(&test);

    let err = server.create("recipes").expect_err("exists");
    assert!(err.is_precondition_failed());
    assert_eq!(err.payload().and_then(|p| p.error()), Some("file_exists"));
}

#[test]
fn invalid_database_name_never_reaches_the_server() {
    let test = TestServer::start(Vec::new());
    let server = server_for(&test);

    let err = server.create("Recipes").expect_err("invalid");
    assert!(err.is_builder());
    assert!(test.requests().is_empty());
}

#[test]
fn save_then_get_document() {
    let test = TestServer::start(vec![
        Action::Respond(support::json(201, &json!({"ok": true}))),
        Action::Respond(support::json(201, &json!({"ok": true, "id": "pancakes", "rev": "1-abc"}))),
        Action::Respond(support::json(
            200,
            &json!({"_id": "pancakes", "_rev": "1-abc", "name": "pancakes", "eggs": 2}),
        )),
    ]);
    let server = server_for(&test);

    let db = server.create("recipes").expect("create");
    let recipe = Recipe {
        name: "pancakes".into(),
        eggs: 2,
    };
    let rev = db.save("pancakes", &recipe).expect("save");
    assert_eq!(rev.id, "pancakes");
    assert_eq!(rev.rev, "1-abc");

    let fetched: Option<Recipe> = db.get("pancakes").expect("get");
    assert_eq!(fetched, Some(recipe));

    let requests = test.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].target, "/recipes");
    assert_eq!(requests[1].target, "/recipes/pancakes");
    let sent: serde_json::Value = serde_json::from_slice(&requests[1].body).expect("json");
    assert_eq!(sent, json!({"name": "pancakes", "eggs": 2}));
    assert_eq!(requests[2].method, "GET");
}

#[test]
fn missing_document_is_none() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        404,
        &json!({"error": "not_found", "reason": "missing"}),
    ))]);
    let server = server_for(&test);
    let db = server.database("recipes").expect("db");

    let doc: Option<serde_json::Value> = db.get("waffles").expect("get");
    assert!(doc.is_none());
}

#[test]
fn delete_sends_revision() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        200,
        &json!({"ok": true, "id": "pancakes", "rev": "2-def"}),
    ))]);
    let server = server_for(&test);
    let db = server.database("recipes").expect("db");

    let rev = db.delete("pancakes", "1-abc").expect("delete");
    assert_eq!(rev.rev, "2-def");

    let request = &test.requests()[0];
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.target, "/recipes/pancakes?rev=1-abc");
}

#[test]
fn stale_revision_is_conflict() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        409,
        &json!({"error": "conflict", "reason": "Document update conflict."}),
    ))]);
    let server = server_for(&test);
    let db = server.database("recipes").expect("db");

    let err = db.save("pancakes", &json!({"_rev": "0-old"})).expect_err("conflict");
    assert!(err.is_conflict());
    assert_eq!(err.payload().and_then(|p| p.reason()), Some("Document update conflict."));
}

#[test]
fn info_decodes_counts_and_keeps_extra_fields() {
    let test = TestServer::start(vec![Action::Respond(support::json(
        200,
        &json!({"db_name": "recipes", "doc_count": 3, "doc_del_count": 1, "update_seq": "5-g1"}),
    ))]);
    let server = server_for(&test);
    let db = server.database("recipes").expect("db");

    let info = db.info().expect("info");
    assert_eq!(info.db_name, "recipes");
    assert_eq!(info.doc_count, 3);
    assert_eq!(info.doc_del_count, 1);
    assert_eq!(info.other["update_seq"], "5-g1");
}
