use latte_core::Layer;

use super::*;

fn temp_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::new(dir.path().join("nested").join("local-storage.json"));
    (dir, store)
}

#[test]
fn missing_file_reads_as_empty() {
    let (_dir, store) = temp_store();
    assert_eq!(store.get("anything").unwrap(), None);
    assert_eq!(load_layers(&store), LayerState::default());
}

#[test]
fn set_creates_parent_dirs_and_preserves_other_keys() {
    let (_dir, store) = temp_store();
    store.set("theme", "dark").unwrap();
    store.set(LAYERS_KEY, "{}").unwrap();

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get(LAYERS_KEY).unwrap().as_deref(), Some("{}"));
}

#[test]
fn saved_layers_round_trip_under_map_layers_key() {
    let (_dir, store) = temp_store();
    let mut layers = LayerState::default();
    layers.set(Layer::Xmr, false);
    save_layers(&store, &layers).unwrap();

    let raw = store.get(LAYERS_KEY).unwrap().expect("stored value");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["XMR"], false);
    assert_eq!(json["userShops"], true);

    assert_eq!(load_layers(&store), layers);
}

#[test]
fn corrupt_layer_value_loads_default() {
    let (_dir, store) = temp_store();
    store.set(LAYERS_KEY, "{not json").unwrap();
    assert_eq!(load_layers(&store), LayerState::default());
}

#[test]
fn corrupt_store_file_loads_default_and_is_replaced_on_write() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "[1, 2, 3]").unwrap();

    assert!(matches!(store.get(LAYERS_KEY), Err(StoreError::Json { .. })));
    assert_eq!(load_layers(&store), LayerState::default());

    save_layers(&store, &LayerState::default()).unwrap();
    assert!(store.get(LAYERS_KEY).unwrap().is_some());
}

#[test]
fn partial_layer_value_fills_missing_keys_enabled() {
    let (_dir, store) = temp_store();
    store.set(LAYERS_KEY, r#"{"BTC":false}"#).unwrap();

    let layers = load_layers(&store);
    assert!(!layers.btc);
    assert!(layers.user_shops);
    assert_eq!(layers.active_count(), 4);
}
