use std::str::FromStr;

use crate::config::ConfigError;

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads an optional environment variable. Unset and blank values are `None`.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    get_env_var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads an optional environment variable and parses it into `T`.
///
/// Returns `Ok(None)` when the variable is unset or blank, and
/// [`ConfigError::InvalidEnvVar`] when it is set but does not parse.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env_var(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: e.to_string(),
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VAR: &str = "SHARED_UTILS_TEST_VAR";

    fn set(value: &str) {
        // Tests touching the environment run under #[serial].
        unsafe { std::env::set_var(VAR, value) };
    }

    fn clear() {
        unsafe { std::env::remove_var(VAR) };
    }

    #[test]
    #[serial]
    fn missing_var_is_reported_by_name() {
        clear();
        assert_eq!(
            get_env_var(VAR),
            Err(ConfigError::MissingEnvVar(VAR.to_string()))
        );
        assert_eq!(get_optional_env_var(VAR), None);
    }

    #[test]
    #[serial]
    fn blank_optional_var_is_none() {
        set("   ");
        assert_eq!(get_optional_env_var(VAR), None);
        clear();
    }

    #[test]
    #[serial]
    fn parses_numeric_values() {
        set(" 42 ");
        assert_eq!(parse_env_var::<u64>(VAR), Ok(Some(42)));

        set("forty-two");
        let err = parse_env_var::<u64>(VAR).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref value, .. } if value == "forty-two")
        );
        clear();
    }
}
