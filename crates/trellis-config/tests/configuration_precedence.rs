//! Layer precedence checks for configuration loading.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use ortho_config::OrthoConfig;
use rstest::rstest;
use tempfile::TempDir;
use trellis_config::{Config, DEFAULT_LOG_FILTER, LogFormat};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` under edition 2024; the override is
        // restored in `Drop` while the mutex is still held.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn write_config(dir: &Path, body: &str) -> OsString {
    let path = dir.join("trellis.toml");
    fs::write(&path, body).expect("write configuration file");
    path.into_os_string()
}

fn load(args: Vec<OsString>) -> Config {
    let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
    Config::load_from_iter(args).expect("configuration should load")
}

#[test]
fn defaults_apply_without_overrides() {
    let config = load(vec![OsString::from("trellis")]);
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    assert_eq!(config.log_format(), LogFormat::Json);
}

#[rstest]
#[case::filter(&["--log-filter", "debug"], "debug", LogFormat::Json)]
#[case::format(&["--log-format", "compact"], DEFAULT_LOG_FILTER, LogFormat::Compact)]
fn cli_flags_override_defaults(
    #[case] flags: &[&str],
    #[case] filter: &str,
    #[case] format: LogFormat,
) {
    let mut args = vec![OsString::from("trellis")];
    args.extend(flags.iter().map(OsString::from));
    let config = load(args);
    assert_eq!(config.log_filter(), filter);
    assert_eq!(config.log_format(), format);
}

#[test]
fn file_values_apply_when_no_flag_is_given() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_config(dir.path(), "log_format = \"compact\"\n");
    let config = load(vec![
        OsString::from("trellis"),
        OsString::from("--config-path"),
        path,
    ]);
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
}

#[test]
fn cli_flag_beats_file_value() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_config(dir.path(), "log_filter = \"warn\"\n");
    let config = load(vec![
        OsString::from("trellis"),
        OsString::from("--config-path"),
        path,
        OsString::from("--log-filter"),
        OsString::from("trace"),
    ]);
    assert_eq!(config.log_filter(), "trace");
}

#[test]
fn environment_beats_defaults() {
    let _override = EnvOverride::set_var("TRELLIS_LOG_FILTER", OsStr::new("error"));
    let config = <Config as OrthoConfig>::load_from_iter(vec![OsString::from("trellis")])
        .expect("configuration should load");
    assert_eq!(config.log_filter(), "error");
}
