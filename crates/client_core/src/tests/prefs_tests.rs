use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::prefs::{MemoryPreferenceStore, PreferenceStore, Preferences, TomlPreferenceStore};

#[test]
fn missing_file_yields_defaults() {
    let store = TomlPreferenceStore::new("/nonexistent/never-written/prefs.toml");
    assert_eq!(store.load().expect("load"), Preferences::default());
}

#[test]
fn round_trips_the_dark_mode_flag_through_a_nested_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("client_core_prefs_test_{suffix}"));
    let path = temp_root.join("nested").join("prefs.toml");

    let store = TomlPreferenceStore::new(&path);
    store
        .save(Preferences { dark_mode: true })
        .expect("save prefs");
    assert_eq!(
        store.load().expect("load prefs"),
        Preferences { dark_mode: true }
    );

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn memory_store_round_trips() {
    let store = MemoryPreferenceStore::default();
    assert!(!store.load().expect("load").dark_mode);
    store
        .save(Preferences { dark_mode: true })
        .expect("save prefs");
    assert!(store.load().expect("load").dark_mode);
}
