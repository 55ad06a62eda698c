//! Database reselection: derivation policy and connection pinning.

mod support;

use kv_middleware::{KvClient, KvMiddlewareError, options};

use support::MockStore;

#[tokio::test]
async fn select_derives_a_client_pinned_to_the_new_database() {
    let store = MockStore::spawn().await;
    let client = KvClient::restricted(store.opts()).expect("client");

    client.set("shared", "db0").await.expect("set in db 0");

    let db1 = client.select(1).expect("select");
    let err = db1.get("shared").await.unwrap_err();
    assert!(matches!(err, KvMiddlewareError::NilReply));

    db1.set("shared", "db1").await.expect("set in db 1");
    assert_eq!(db1.get("shared").await.expect("get"), "db1");

    // The parent still sees its own database.
    assert_eq!(client.get("shared").await.expect("get"), "db0");
}

#[tokio::test]
async fn select_product_is_a_single_connection_view() {
    let store = MockStore::spawn().await;
    let client = KvClient::restricted(store.opts()).expect("client");

    let db2 = client.select(2).expect("select");
    let config = db2.config();
    assert_eq!(config.db(), 2);
    assert_eq!(config.max_active(), 1);
    assert_eq!(config.max_idle(), 0);
    assert!(!config.wait());
    assert!(config.idle_timeout().is_zero());
    assert!(config.max_conn_lifetime().is_zero());
    assert!(!config.is_selectable());
    assert_eq!(db2.stats().pool.max_active, 1);

    // Pinned: one connection, so holding it makes a second acquire fail.
    let held = db2.conn().await.expect("pinned connection");
    let err = db2.conn().await.unwrap_err();
    assert!(matches!(err, KvMiddlewareError::ConnectionError(_)));
    drop(held);
}

#[tokio::test]
async fn select_on_a_select_product_is_rejected() {
    let store = MockStore::spawn().await;
    let client = KvClient::restricted(store.opts()).expect("client");

    let derived = client.select(1).expect("first select");
    let err = derived.select(2).unwrap_err();
    assert!(matches!(err, KvMiddlewareError::PolicyError(_)));
}

#[tokio::test]
async fn select_in_cluster_mode_is_rejected() {
    let client = KvClient::restricted([
        options::host("127.0.0.1"),
        options::port(6379),
        options::cluster(true),
    ])
    .expect("client");

    let err = client.select(1).unwrap_err();
    assert!(matches!(err, KvMiddlewareError::PolicyError(_)));
}

#[tokio::test]
async fn select_product_is_always_restricted() {
    let store = MockStore::spawn().await;
    let client = KvClient::unrestricted(store.opts()).expect("client");

    let derived = client.select(1).expect("select");
    assert!(!derived.is_unrestricted());
    let err = derived.flush_db().await.unwrap_err();
    assert!(matches!(err, KvMiddlewareError::PolicyError(_)));
}
