/// Build version, overridable at compile time through `APP_VERSION` (set by the container build).
pub const VERSION: &str = match option_env!("APP_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Name reported to the document store so connections show up as this service.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
