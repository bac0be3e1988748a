//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use longlist_server::{create_app, AppState, Config, ListStore};
use std::sync::Arc;

pub(crate) fn test_config(catalog_size: usize) -> Config {
    Config {
        port: 0,
        catalog_size,
        item_label_prefix: "Item".to_string(),
        max_request_size: 1024 * 1024,
    }
}

pub(crate) fn setup_test_server(catalog_size: usize) -> (TestServer, Arc<ListStore>) {
    let config = test_config(catalog_size);
    let store = Arc::new(ListStore::from_config(&config));
    let state = AppState::with_store(config, store.clone());
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, store)
}
