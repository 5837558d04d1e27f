const fn unwrap_or_cargo_version(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Build version reported by `--version` and the healthcheck. `SIMPLEMON_VERSION`
/// at compile time overrides the Cargo package version.
pub const VERSION: &str = unwrap_or_cargo_version(option_env!("SIMPLEMON_VERSION"));
