//! Tests for layered configuration loading.

use std::{
    env, fs,
    sync::{Mutex, MutexGuard, OnceLock},
};

use tempfile::TempDir;

use crm::config::ConfigLoader;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        env::remove_var("CRM_PROFILE");
        env::remove_var("CRM_API_BIND_ADDR");
        env::remove_var("CRM_LOG_LEVEL");
        env::remove_var("CRM_DATABASE_URL");
        env::remove_var("CRM_AUTH_BASE_URL");
        env::remove_var("CRM_AUTH_API_KEY");
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let dir = TempDir::new().unwrap();
    let cfg = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let dir = TempDir::new().unwrap();
    write_env_file(
        &dir,
        ".env",
        "CRM_PROFILE=test\nCRM_API_BIND_ADDR=127.0.0.1:3000\nCRM_LOG_LEVEL=debug\n",
    );
    write_env_file(&dir, ".env.test", "CRM_API_BIND_ADDR=127.0.0.1:4000\n");

    let cfg = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(cfg.profile, "test");
    // Profile-specific file wins over the base file.
    assert_eq!(cfg.api_bind_addr, "127.0.0.1:4000");
    assert_eq!(cfg.log_level, "debug");
    clear_env();
}

#[test]
fn process_env_wins_over_files() {
    let _guard = env_guard();
    clear_env();

    let dir = TempDir::new().unwrap();
    write_env_file(&dir, ".env", "CRM_LOG_LEVEL=debug\n");
    unsafe {
        env::set_var("CRM_LOG_LEVEL", "warn");
        env::set_var("CRM_AUTH_API_KEY", "from-process");
    }

    let cfg = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(cfg.log_level, "warn");
    assert_eq!(cfg.auth_api_key.as_deref(), Some("from-process"));
    clear_env();
}

#[test]
fn blank_auth_key_is_treated_as_absent() {
    let _guard = env_guard();
    clear_env();

    let dir = TempDir::new().unwrap();
    write_env_file(&dir, ".env", "CRM_AUTH_API_KEY=   \n");

    let cfg = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert!(cfg.auth_api_key.is_none());
    clear_env();
}
