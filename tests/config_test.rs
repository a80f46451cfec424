use serial_test::serial;
use smsplate::config::{CONFIG_ENV, Config, LogLevel, load_config, resolve_config_path};
use smsplate::{KeySet, Repertoire, TemplateError};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::fmt::MakeWriter;

struct EnvVarGuard {
    key: &'static str,
    original: Option<OsString>,
}

impl EnvVarGuard {
    fn set(key: &'static str, value: &std::path::Path) -> Self {
        let original = env::var_os(key);
        unsafe {
            env::set_var(key, value);
        }
        Self { key, original }
    }
}

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            unsafe {
                env::set_var(self.key, value);
            }
        } else {
            unsafe {
                env::remove_var(self.key);
            }
        }
    }
}

const SAMPLE: &str = r#"
[general]
log_level = "debug"

[encoding]
repertoire = "gsm7"

[preview]
sample_size = 5

[[variables]]
key = "prenom"
label = "First Name"

[[variables]]
key = "ville"
label = "City"
"#;

#[test]
fn loads_explicit_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let cfg = load_config(Some(path.as_path())).expect("config should load");
    assert_eq!(cfg.general.log_level, LogLevel::Debug);
    assert_eq!(cfg.encoding.repertoire, Repertoire::Gsm7);
    assert_eq!(cfg.preview.sample_size, 5);

    let registry = cfg.registry();
    assert!(registry.contains_key("ville"));
    assert!(!registry.contains_key("nom"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("absent.toml");

    match load_config(Some(path.as_path())) {
        Err(TemplateError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn malformed_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("broken.toml");
    fs::write(&path, "[preview]\nsample_size = \"many\"\n").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(TemplateError::Config { .. })
    ));
}

#[test]
#[serial]
fn env_var_points_at_config() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("from_env.toml");
    fs::write(&path, "[preview]\nsample_size = 1\n").unwrap();

    let _guard = EnvVarGuard::set(CONFIG_ENV, &path);
    let cfg = load_config(None).expect("config from env should load");
    assert_eq!(cfg.preview.sample_size, 1);
    assert_eq!(cfg.registry().len(), 4);
}

#[test]
#[serial]
fn explicit_path_wins_over_env() {
    let tmp = tempdir().unwrap();
    let env_path = tmp.path().join("env.toml");
    let explicit = tmp.path().join("explicit.toml");
    fs::write(&env_path, "[preview]\nsample_size = 1\n").unwrap();
    fs::write(&explicit, "[preview]\nsample_size = 9\n").unwrap();

    let _guard = EnvVarGuard::set(CONFIG_ENV, &env_path);
    let cfg = load_config(Some(explicit.as_path())).unwrap();
    assert_eq!(cfg.preview.sample_size, 9);
}

#[test]
fn loading_a_file_emits_debug_event() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let cfg = tracing::subscriber::with_default(subscriber, || load_config(Some(path.as_path())))
        .expect("config should load");
    assert_eq!(cfg.preview.sample_size, 5);

    let output = logs.contents();
    assert!(output.contains("DEBUG"), "missing level in {output:?}");
    assert!(output.contains("loaded config"), "missing event in {output:?}");
    assert!(output.contains(&path.display().to_string()));
}

#[test]
fn unknown_log_level_in_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("levels.toml");
    fs::write(&path, "[general]\nlog_level = \"verbose\"\n").unwrap();

    match load_config(Some(path.as_path())) {
        Err(TemplateError::Config { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
#[serial]
fn env_var_resolves_config_path() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("resolved.toml");
    fs::write(&path, "").unwrap();

    let _guard = EnvVarGuard::set(CONFIG_ENV, &path);
    assert_eq!(resolve_config_path(None), Some(path.clone()));
}
