use serde::de::DeserializeOwned;

/// Parse a kebab-case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('_', "-");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use dispatch_core::enums::{DispatchStatus, VehicleStatus};

    use super::parse_enum;

    #[test]
    fn parses_kebab_case_enum() {
        let status: DispatchStatus = parse_enum("in-progress", "status").expect("should parse");
        assert_eq!(status, DispatchStatus::InProgress);
    }

    #[test]
    fn parses_underscore_alias() {
        let status: VehicleStatus =
            parse_enum("out_of_service", "status").expect("should parse");
        assert_eq!(status, VehicleStatus::OutOfService);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<DispatchStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }
}
