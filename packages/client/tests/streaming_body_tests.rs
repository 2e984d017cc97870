mod support;

use std::io::Read;

use sofa_client::prelude::*;
use support::{Action, TestServer, chunked, response};

fn get(session: &Session, url: Url) -> Response {
    session
        .request(Method::GET, url, RequestBody::Empty, HeaderMap::new(), None)
        .expect("request")
}

fn streamed(resp: Response) -> StreamingResponseBody {
    match resp.into_body() {
        ResponseBody::Streamed(body) => body,
        other => panic!("expected a streamed body, got {other:?}"),
    }
}

fn large_body() -> Vec<u8> {
    (0..20_000u32).map(|i| b'a' + (i % 26) as u8).collect()
}

#[test]
fn large_body_is_streamed_and_released_at_end() {
    let data = large_body();
    let server = TestServer::start(vec![
        Action::Respond(response(200, &[], &data)),
        Action::Respond(response(200, &[], b"next")),
    ]);
    let session = Session::default();

    let mut body = streamed(get(&session, server.url("/db/_all_docs")));
    assert!(!body.is_chunked());
    assert_eq!(session.pool().total_idle(), 0);

    let head = body.read(Some(10)).expect("partial read");
    assert_eq!(head.as_ref(), &data[..10]);
    assert!(!body.is_closed());

    let rest = body.read(None).expect("rest");
    assert_eq!(rest.as_ref(), &data[10..]);
    assert!(body.is_closed());
    assert!(body.read(Some(10)).expect("after end").is_empty());
    assert_eq!(session.pool().total_idle(), 1);

    get(&session, server.url("/"));
    assert_eq!(server.connections(), 1);
}

#[test]
fn sized_read_spans_several_socket_reads() {
    let data = large_body();
    let server = TestServer::start(vec![Action::Respond(response(200, &[], &data))]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));

    let first = body.read(Some(9_000)).expect("first read");
    assert_eq!(first.as_ref(), &data[..9_000]);
    let second = body.read(Some(9_000)).expect("second read");
    assert_eq!(second.as_ref(), &data[9_000..18_000]);
    assert!(!body.is_closed());
    let last = body.read(Some(9_000)).expect("last read");
    assert_eq!(last.len(), data.len() - 18_000);
    assert!(body.is_closed());
}

#[test]
fn short_read_at_end_closes_body() {
    let data = large_body();
    let server = TestServer::start(vec![Action::Respond(response(200, &[], &data))]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));
    let all = body.read(Some(data.len() + 100)).expect("read");
    assert_eq!(all.len(), data.len());
    assert!(body.is_closed());
}

#[test]
fn chunks_are_yielded_in_order() {
    let server = TestServer::start(vec![Action::Respond(chunked(
        200,
        &[("Content-Type", "application/json")],
        &[b"foo", b"barbaz"],
    ))]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/db/_changes")));
    assert!(body.is_chunked());

    let chunks: Vec<Vec<u8>> = body
        .iter_chunks()
        .expect("chunked")
        .map(|chunk| chunk.expect("chunk").to_vec())
        .collect();
    assert_eq!(chunks, vec![b"foo".to_vec(), b"barbaz".to_vec()]);
    assert!(body.is_closed());
    assert_eq!(session.pool().total_idle(), 1);

    assert_eq!(body.iter_chunks().expect("still chunked").count(), 0);
}

#[test]
fn chunk_iteration_requires_chunked_encoding() {
    let server = TestServer::start(vec![Action::Respond(response(200, &[], &large_body()))]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));
    let err = body.iter_chunks().err().expect("not chunked");
    assert!(err.is_body());
}

#[test]
fn close_drains_and_releases() {
    let server = TestServer::start(vec![
        Action::Respond(response(200, &[], &large_body())),
        Action::Respond(response(200, &[], b"next")),
    ]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));
    body.read(Some(100)).expect("partial");
    body.close().expect("close");
    assert!(body.is_closed());
    body.close().expect("close is idempotent");
    assert_eq!(session.pool().total_idle(), 1);

    let next = get(&session, server.url("/"));
    assert_eq!(next.text().expect("text"), "next");
    assert_eq!(server.connections(), 1);
}

#[test]
fn dropped_body_discards_connection() {
    let server = TestServer::start(vec![
        Action::Respond(response(200, &[], &large_body())),
        Action::Respond(response(200, &[], b"next")),
    ]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));
    body.read(Some(100)).expect("partial");
    drop(body);
    assert_eq!(session.pool().total_idle(), 0);

    let next = get(&session, server.url("/"));
    assert_eq!(next.text().expect("text"), "next");
    assert_eq!(server.connections(), 2);
}

#[test]
fn body_implements_read() {
    let data = large_body();
    let server = TestServer::start(vec![Action::Respond(chunked(200, &[], &[&data[..9000], &data[9000..]]))]);
    let session = Session::default();
    let mut body = streamed(get(&session, server.url("/")));
    let mut out = Vec::new();
    body.read_to_end(&mut out).expect("read_to_end");
    assert_eq!(out, data);
    assert!(body.is_closed());
}

#[test]
fn connection_close_is_not_pooled() {
    let server = TestServer::start(vec![Action::RespondAndClose(response(
        200,
        &[("Connection", "close")],
        &large_body(),
    ))]);
    let session = Session::default();
    let resp = get(&session, server.url("/"));
    assert_eq!(resp.bytes().expect("body").len(), 20_000);
    assert_eq!(session.pool().total_idle(), 0);
}

#[test]
fn close_delimited_body_reads_to_eof() {
    let server = TestServer::start(vec![Action::RespondAndClose(
        b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nuntil the socket closes".to_vec(),
    )]);
    let session = Session::default();
    let resp = get(&session, server.url("/"));
    assert!(resp.body().is_streamed());
    assert_eq!(resp.text().expect("text"), "until the socket closes");
    assert_eq!(session.pool().total_idle(), 0);
}
