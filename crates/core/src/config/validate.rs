use super::{types::Config, AuthMethod, ConfigError};

/// Validate internal consistency of a loaded configuration.
///
/// Missing optional sections are fine (features degrade); a present section
/// with unusable values is not.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::ApiKey
        && !config.auth.api_key.as_ref().is_some_and(|k| !k.is_empty())
    {
        return Err(ConfigError::Invalid(
            "auth.method = \"api_key\" requires a non-empty auth.api_key".to_string(),
        ));
    }

    if let Some(roster) = &config.roster {
        if roster.service_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "roster.service_url must not be empty".to_string(),
            ));
        }
        if roster.service_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "roster.service_token must not be empty".to_string(),
            ));
        }
        if roster.student_sheet_id.trim().is_empty() || roster.teacher_sheet_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "roster.student_sheet_id and roster.teacher_sheet_id must not be empty"
                    .to_string(),
            ));
        }
    }

    if let Some(chat) = &config.chat {
        if chat.bot_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "chat.bot_token must not be empty".to_string(),
            ));
        }
        if chat.guild_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "chat.guild_id must not be empty".to_string(),
            ));
        }
    }

    let sched = &config.scheduler;
    if sched.bulletin_hour > 23 || sched.prompt_hour > 23 {
        return Err(ConfigError::Invalid(
            "scheduler hours must be in 0..=23".to_string(),
        ));
    }
    if !(-12..=14).contains(&sched.utc_offset_hours) {
        return Err(ConfigError::Invalid(
            "scheduler.utc_offset_hours must be in -12..=14".to_string(),
        ));
    }
    if sched.tick_secs == 0 {
        return Err(ConfigError::Invalid(
            "scheduler.tick_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base_config() -> Config {
        load_config_from_str(
            r#"
[auth]
method = "none"
"#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_config_is_valid() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn api_key_method_requires_key() {
        let config = load_config_from_str(
            r#"
[auth]
method = "api_key"
"#,
        )
        .unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_sheet_id_rejected() {
        let config = load_config_from_str(
            r#"
[auth]
method = "none"

[roster]
service_url = "https://sheets.example.com"
service_token = "tok"
student_sheet_id = ""
teacher_sheet_id = "t"
"#,
        )
        .unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn out_of_range_hour_rejected() {
        let mut config = base_config();
        config.scheduler.bulletin_hour = 24;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn out_of_range_offset_rejected() {
        let mut config = base_config();
        config.scheduler.utc_offset_hours = 15;
        assert!(validate_config(&config).is_err());
    }
}
