//! Settings validation utilities

use crate::settings::Settings;
use tracing_subscriber::EnvFilter;

/// Supported log output formats
pub const VALID_LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Settings validator
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate complete settings
    pub fn validate(settings: &Settings) -> ValidationReport {
        let mut report = ValidationReport::default();

        Self::validate_separator(settings, &mut report);
        Self::validate_logging(settings, &mut report);

        report
    }

    fn validate_separator(settings: &Settings, report: &mut ValidationReport) {
        let separator = &settings.separator;
        if separator.is_empty() {
            report.add_error("separator", "Separator cannot be empty");
            return;
        }

        if separator.contains('=') || separator.contains('\0') {
            report.add_error(
                "separator",
                format!("Separator {:?} cannot be used in environment variable names", separator),
            );
        } else if separator.chars().any(char::is_whitespace) {
            report.add_warning(
                "separator",
                "Separator contains whitespace, keys will need quoting in shells",
            );
        }
    }

    fn validate_logging(settings: &Settings, report: &mut ValidationReport) {
        // Anything tracing accepts as a filter is fine: `off`, `INFO`, `config=debug`, a bare target
        if let Err(e) = EnvFilter::try_new(&settings.log_level) {
            report.add_error(
                "log_level",
                format!("Invalid log filter '{}': {}", settings.log_level, e),
            );
        }

        if !VALID_LOG_FORMATS.contains(&settings.log_format.as_str()) {
            report.add_error(
                "log_format",
                format!(
                    "Invalid log format: {}. Valid formats: {:?}",
                    settings.log_format, VALID_LOG_FORMATS
                ),
            );
        }
    }
}

/// Errors and warnings found in a [`Settings`] value
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A single finding, tied to the settings field it concerns
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationReport {
    fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            field,
            message: message.into(),
        });
    }

    fn add_warning(&mut self, field: &'static str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_level(level: &str) -> ValidationReport {
        let settings = Settings {
            log_level: level.to_string(),
            ..Settings::default()
        };
        SettingsValidator::validate(&settings)
    }

    #[test]
    fn test_default_settings_are_valid() {
        let report = SettingsValidator::validate(&Settings::default());
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_separator_rules() {
        let mut settings = Settings::default();

        settings.separator = String::new();
        assert_eq!(SettingsValidator::validate(&settings).errors[0].field, "separator");

        settings.separator = "=".to_string();
        assert!(!SettingsValidator::validate(&settings).errors.is_empty());

        settings.separator = " ".to_string();
        let report = SettingsValidator::validate(&settings);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);

        settings.separator = "__".to_string();
        assert!(SettingsValidator::validate(&settings).errors.is_empty());
    }

    #[test]
    fn test_any_tracing_filter_is_accepted() {
        for level in ["off", "INFO", "warn", "mycrate", "config=debug,info"] {
            let report = with_level(level);
            assert!(report.errors.is_empty(), "{} rejected: {:?}", level, report.errors);
        }
    }

    #[test]
    fn test_malformed_filter_is_rejected() {
        let report = with_level("config=loud");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "log_level");
    }
}
