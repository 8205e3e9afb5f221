//! Output formatting functions.

use clap::ValueEnum;
use serde::Serialize;

use crate::models::SampleEntity;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Format a value as JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Format a sample entity for display.
pub fn format_sample(entity: &SampleEntity) -> String {
    format!(
        "{}\n  ID: {}\n  Description: {}\n  Created: {}\n  Updated: {}\n  Price: {}\n  Tags: [{}]",
        entity.title,
        entity.id,
        entity.description,
        entity.created_on.to_rfc3339(),
        entity.updated_on.to_rfc3339(),
        entity.price,
        entity.tags.join(", ")
    )
}

/// Format an optional sample entity in the chosen format.
pub fn format_optional_sample(entity: Option<&SampleEntity>, format: OutputFormat) -> String {
    match (entity, format) {
        (entity, OutputFormat::Json) => format_json(&entity),
        (Some(entity), OutputFormat::Pretty) => format_sample(entity),
        (None, OutputFormat::Pretty) => "Not found.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    fn entity() -> SampleEntity {
        SampleEntity {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            title: "Sample Record 001".to_string(),
            description: "Senectus eros.".to_string(),
            created_on: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            updated_on: Utc.with_ymd_and_hms(2024, 1, 16, 8, 0, 0).unwrap(),
            price: Decimal::new(24184, 2),
            tags: vec!["Senectus".to_string(), "Semper".to_string()],
        }
    }

    #[test]
    fn test_format_sample() {
        let output = format_sample(&entity());

        assert!(output.starts_with("Sample Record 001\n"));
        assert!(output.contains("ID: 550e8400-e29b-41d4-a716-446655440001"));
        assert!(output.contains("Price: 241.84"));
        assert!(output.contains("Tags: [Senectus, Semper]"));
    }

    #[test]
    fn test_format_json() {
        let output = format_json(&entity());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["title"], "Sample Record 001");
        assert_eq!(value["price"], "241.84");
        assert_eq!(value["tags"][1], "Semper");
    }

    #[test]
    fn test_format_missing() {
        assert_eq!(
            format_optional_sample(None, OutputFormat::Pretty),
            "Not found."
        );
        assert_eq!(format_optional_sample(None, OutputFormat::Json), "null");
    }
}
