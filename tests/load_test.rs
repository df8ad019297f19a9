//! Concurrent load against the relay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_do_not_mix() {
    // 1. Upstream echoes each upload back
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = common::start_upstream(common::echo_upstream(hits.clone())).await;

    // 2. Relay in front of it
    let (relay_addr, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    // 3. Every task sends its own distinguishable payload
    let concurrency = 32;
    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for id in 0..concurrency {
        let client = client.clone();
        let url = common::relay_url(relay_addr);
        tasks.push(tokio::spawn(async move {
            let payload: Vec<u8> = format!("upload-{id}-")
                .into_bytes()
                .into_iter()
                .cycle()
                .take(2048 + id * 17)
                .collect();

            let response = client
                .post(&url)
                .multipart(common::upload_form(payload.clone(), "p.png", "image/png"))
                .send()
                .await
                .expect("Relay unreachable");

            assert_eq!(response.status(), 200);
            assert_eq!(response.headers()["content-type"], "image/png");
            let body = response.bytes().await.unwrap();
            (payload, body)
        }));
    }

    // 4. Each caller gets exactly its own bytes back
    for task in tasks {
        let (sent, received) = task.await.unwrap();
        assert_eq!(received.to_vec(), sent);
    }

    let elapsed = start.elapsed();
    println!("{concurrency} concurrent relays in {elapsed:?}");
    assert_eq!(hits.load(Ordering::SeqCst), concurrency);

    shutdown.trigger();
}
