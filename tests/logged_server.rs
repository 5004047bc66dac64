//! End-to-end tests for the access log middleware over real connections.

use std::time::Duration;

use access_log::http::{handler_fn, ResponseWriter};
use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn hi_is_logged_as_ok_with_four_bytes() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|w, _req| {
        writeln!(w, "hi!").unwrap();
    }))
    .await;

    let res = common::client()
        .get(format!("http://{}/greet?lang=en", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "hi!\n");

    let entry = common::next_entry(&mut entries).await;
    assert_eq!(entry.method, "GET");
    assert_eq!(entry.url, "/greet?lang=en");
    assert_eq!(entry.status, Some(StatusCode::OK));
    assert_eq!(entry.size, 4);
}

#[tokio::test]
async fn explicit_status_and_body_are_reported() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|w, _req| {
        w.write_header(StatusCode::NOT_FOUND);
        w.write_all(b"not found\n").unwrap();
    }))
    .await;

    let res = common::client()
        .delete(format!("http://{}/items/1", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "not found\n");

    let entry = common::next_entry(&mut entries).await;
    assert_eq!(entry.method, "DELETE");
    assert_eq!(entry.status, Some(StatusCode::NOT_FOUND));
    assert_eq!(entry.size, 10);
}

#[tokio::test]
async fn silent_handler_reports_unset_status() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|_w, _req| {})).await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().is_empty());

    let entry = common::next_entry(&mut entries).await;
    assert_eq!(entry.status, None);
    assert_eq!(entry.size, 0);
}

#[tokio::test]
async fn duration_includes_handler_delay() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|w, _req| {
        std::thread::sleep(Duration::from_millis(50));
        w.write_header(StatusCode::NO_CONTENT);
    }))
    .await;

    let res = common::client()
        .get(format!("http://{}/slow", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 204);

    let entry = common::next_entry(&mut entries).await;
    assert!(entry.duration >= Duration::from_millis(50));
}

#[tokio::test]
async fn large_streamed_body_is_counted_in_full() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|w, _req| {
        let chunk = [b'x'; 1024];
        for _ in 0..256 {
            w.write_all(&chunk).unwrap();
        }
    }))
    .await;

    let res = common::client()
        .get(format!("http://{}/big", addr))
        .send()
        .await
        .expect("server unreachable");
    let body = res.bytes().await.unwrap();
    assert_eq!(body.len(), 256 * 1024);

    let entry = common::next_entry(&mut entries).await;
    assert_eq!(entry.size, 256 * 1024);
}

#[tokio::test]
async fn concurrent_requests_each_get_one_entry() {
    let (addr, mut entries) = common::start_logged_server(handler_fn(|w, req| {
        w.write_all(req.uri().path().as_bytes()).unwrap();
    }))
    .await;

    let client = common::client();
    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = format!("http://{}/r{}", addr, i);
        tasks.push(tokio::spawn(async move {
            client.get(url).send().await.unwrap().text().await.unwrap()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut urls = Vec::new();
    for _ in 0..20 {
        let entry = common::next_entry(&mut entries).await;
        assert_eq!(entry.size as usize, entry.url.len());
        urls.push(entry.url);
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 20);
}
