use std::io::Write;

use market_sim::{
    Error,
    config::{CONFIG_ENV_VAR, SEED_ENV_VAR, SimConfig, load_config_path, resolve_config},
    models::timeframe::Timeframe,
};
use serial_test::serial;
use tempfile::NamedTempFile;

fn write_config(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(body.as_bytes()).expect("write config");
    file
}

fn clear_env() {
    // Environment mutation is confined to #[serial] tests.
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
        std::env::remove_var(SEED_ENV_VAR);
    }
}

#[test]
fn loads_full_file() {
    let file = write_config(
        r##"
symbol = "BTC-USD"
start_price = 42000.0
timeframe = "1Y"
seed = 11

[generator]
bias = 0.5
volatility = 300.0
wick_range = 120.0
volume_floor = 10.0
volume_ceiling = 90.0

[updater]
step_scale = 40.0
tick_ms = 1000

[palette]
up = "#00ff00"
"##,
    );
    let cfg = load_config_path(file.path()).unwrap();
    assert_eq!(cfg.symbol, "BTC-USD");
    assert_eq!(cfg.timeframe, Timeframe::OneYear);
    assert_eq!(cfg.seed, Some(11));
    assert_eq!(cfg.generator.volatility, 300.0);
    assert_eq!(cfg.updater.period().as_millis(), 1000);
    assert_eq!(cfg.palette.up, "#00ff00");
    assert_eq!(cfg.palette.down, "#ef4444");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn bad_timeframe_is_parse_error() {
    let file = write_config("timeframe = \"5m\"\n");
    assert!(matches!(load_config_path(file.path()), Err(Error::Toml(_))));
}

#[test]
#[serial]
fn defaults_without_path_or_env() {
    clear_env();
    assert_eq!(resolve_config(None).unwrap(), SimConfig::default());
}

#[test]
#[serial]
fn env_var_names_the_file() {
    clear_env();
    let file = write_config("symbol = \"SOL-USD\"\n");
    unsafe { std::env::set_var(CONFIG_ENV_VAR, file.path()) };

    let cfg = resolve_config(None).unwrap();
    assert_eq!(cfg.symbol, "SOL-USD");
    clear_env();
}

#[test]
#[serial]
fn explicit_path_wins_over_env() {
    clear_env();
    let from_env = write_config("symbol = \"ENV\"\n");
    let explicit = write_config("symbol = \"FLAG\"\n");
    unsafe { std::env::set_var(CONFIG_ENV_VAR, from_env.path()) };

    let cfg = resolve_config(Some(explicit.path())).unwrap();
    assert_eq!(cfg.symbol, "FLAG");
    clear_env();
}

#[test]
#[serial]
fn seed_env_overrides_file() {
    clear_env();
    let file = write_config("seed = 1\n");
    unsafe { std::env::set_var(SEED_ENV_VAR, "99") };
    assert_eq!(resolve_config(Some(file.path())).unwrap().seed, Some(99));

    unsafe { std::env::set_var(SEED_ENV_VAR, "nope") };
    assert!(matches!(resolve_config(Some(file.path())), Err(Error::Config(_))));
    clear_env();
}
