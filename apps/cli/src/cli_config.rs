use std::env;
use std::path::PathBuf;
use std::time::Duration;

use rolekeeper_core::{AppError, AppResult, MemberId};

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub superuser_id: MemberId,
    pub directory_path: PathBuf,
    pub command_prefix: String,
    pub call_timeout: Duration,
}

impl CliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let superuser_id = MemberId::new(required_env(&lookup, "ROLEKEEPER_SUPERUSER_ID")?)?;
        let directory_path = PathBuf::from(required_env(&lookup, "ROLEKEEPER_DIRECTORY_PATH")?);
        let command_prefix = lookup("ROLEKEEPER_COMMAND_PREFIX")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "!moe".to_owned());
        let call_timeout_ms = parse_env_u64(&lookup, "ROLEKEEPER_CALL_TIMEOUT_MS", 5000)?;

        if call_timeout_ms == 0 {
            return Err(AppError::Validation(
                "ROLEKEEPER_CALL_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            superuser_id,
            directory_path,
            command_prefix,
            call_timeout: Duration::from_millis(call_timeout_ms),
        })
    }
}

fn required_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use rolekeeper_core::AppError;

    use super::CliConfig;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CliConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        CliConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = config_from(&[
            ("ROLEKEEPER_SUPERUSER_ID", "100"),
            ("ROLEKEEPER_DIRECTORY_PATH", "fixtures/directory.json"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.superuser_id.as_str(), "100");
        assert_eq!(config.command_prefix, "!moe");
        assert_eq!(config.call_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn superuser_is_required() {
        let result = config_from(&[("ROLEKEEPER_DIRECTORY_PATH", "fixtures/directory.json")]);

        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("SUPERUSER")
        ));
    }

    #[test]
    fn zero_or_garbled_timeouts_are_rejected() {
        for timeout in ["0", "soon"] {
            let result = config_from(&[
                ("ROLEKEEPER_SUPERUSER_ID", "100"),
                ("ROLEKEEPER_DIRECTORY_PATH", "fixtures/directory.json"),
                ("ROLEKEEPER_CALL_TIMEOUT_MS", timeout),
            ]);
            assert!(matches!(result, Err(AppError::Validation(_))), "{timeout}");
        }
    }
}
