use super::{Formatter, RunReport};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> String {
        serde_json::to_string(report).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn test_json_fields_flattened() {
        let json = JsonFormatter.format(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sample_overruns"], 10);
        assert_eq!(value["state"], "running");
        assert_eq!(value["input"], "tone.wav");
    }
}
