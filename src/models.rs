use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Raw form inputs, exactly as typed. JSON callers may send numbers instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionForm {
    #[serde(deserialize_with = "text_or_number")]
    pub store_id: String,
    #[serde(deserialize_with = "text_or_number")]
    pub sku_id: String,
    #[serde(deserialize_with = "text_or_number")]
    pub total_price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub base_price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub is_featured_sku: String,
    #[serde(deserialize_with = "text_or_number")]
    pub is_display_sku: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawField>::deserialize(deserializer)? {
        Some(RawField::Text(text)) => text,
        Some(RawField::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

impl PredictionForm {
    pub fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            store_id: int_prefix(&self.store_id),
            sku_id: int_prefix(&self.sku_id),
            total_price: float_prefix(&self.total_price),
            base_price: float_prefix(&self.base_price),
            is_featured_sku: int_prefix(&self.is_featured_sku),
            is_display_sku: int_prefix(&self.is_display_sku),
        }
    }
}

/// Body of `POST /predict`. Unparseable inputs are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub store_id: Option<i64>,
    pub sku_id: Option<i64>,
    pub total_price: Option<f64>,
    pub base_price: Option<f64>,
    pub is_featured_sku: Option<i64>,
    pub is_display_sku: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_units: f64,
    pub predicted_demand_percentage: f64,
    pub is_demand_high: DemandHigh,
}

/// The service reports high demand either as a flag or as a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DemandHigh {
    Flag(bool),
    Label(String),
}

impl fmt::Display for DemandHigh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandHigh::Flag(flag) => write!(f, "{flag}"),
            DemandHigh::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccuracyResponse {
    pub r2_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccuracyState {
    Pending,
    Loaded(f64),
    Unavailable,
    Failed,
}

impl AccuracyState {
    pub fn score(&self) -> Option<f64> {
        match self {
            AccuracyState::Loaded(score) => Some(*score),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            AccuracyState::Pending => "pending",
            AccuracyState::Loaded(_) => "loaded",
            AccuracyState::Unavailable => "unavailable",
            AccuracyState::Failed => "error",
        }
    }

    /// Banner text.
    pub fn display(&self) -> String {
        match self {
            AccuracyState::Pending => "Loading...".to_string(),
            AccuracyState::Loaded(score) => score.to_string(),
            AccuracyState::Unavailable => "Unavailable".to_string(),
            AccuracyState::Failed => "Error".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccuracyView {
    pub status: String,
    pub r2_score: Option<f64>,
    pub display: String,
}

impl From<AccuracyState> for AccuracyView {
    fn from(state: AccuracyState) -> Self {
        Self {
            status: state.status().to_string(),
            r2_score: state.score(),
            display: state.display(),
        }
    }
}

/// The latest applied prediction, as shown in the result card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPanel {
    pub label: String,
    pub predicted_units: f64,
    pub predicted_demand_percentage: f64,
    pub is_demand_high: DemandHigh,
    pub r2_score: Option<f64>,
    pub predicted_at: DateTime<Local>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartView {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub revision: u64,
}

/// Leading-integer parse: `"12abc"` is 12, `"0x1A"` is 26, `"abc"` is nothing.
/// Runs that overflow `i64` are nothing as well.
fn int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let negative = bytes.first() == Some(&b'-');

    if matches!(bytes.get(end..end + 2), Some(b"0x" | b"0X")) {
        let hex_start = end + 2;
        let mut hex_end = hex_start;
        while hex_end < bytes.len() && bytes[hex_end].is_ascii_hexdigit() {
            hex_end += 1;
        }
        if hex_end == hex_start {
            return None;
        }
        let magnitude = i64::from_str_radix(&text[hex_start..hex_end], 16).ok()?;
        return Some(if negative { -magnitude } else { magnitude });
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].parse().ok()
}

/// Leading-decimal parse: `"10.5kg"` is 10.5, `".5"` is 0.5, `"1e3"` is 1000.
fn float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let scan_digits = |mut cursor: usize| {
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        cursor
    };

    let int_start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = scan_digits(int_start);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = scan_digits(end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_end = scan_digits(cursor);
        if exp_end > cursor {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: [&str; 6]) -> PredictionForm {
        PredictionForm {
            store_id: fields[0].to_string(),
            sku_id: fields[1].to_string(),
            total_price: fields[2].to_string(),
            base_price: fields[3].to_string(),
            is_featured_sku: fields[4].to_string(),
            is_display_sku: fields[5].to_string(),
        }
    }

    #[test]
    fn request_body_uses_numeric_types() {
        let request = form(["1", "2", "10.5", "9.0", "1", "0"]).to_request();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "store_id": 1,
                "sku_id": 2,
                "total_price": 10.5,
                "base_price": 9.0,
                "is_featured_sku": 1,
                "is_display_sku": 0
            })
        );
        assert!(body["store_id"].is_i64());
        assert!(body["total_price"].is_f64());
    }

    #[test]
    fn invalid_inputs_are_sent_as_null() {
        let request = form(["", "abc", "", "x1", " ", "-"]).to_request();
        let body = serde_json::to_value(&request).unwrap();
        for field in [
            "store_id",
            "sku_id",
            "total_price",
            "base_price",
            "is_featured_sku",
            "is_display_sku",
        ] {
            assert!(body[field].is_null(), "{field} should be null");
        }
    }

    #[test]
    fn integer_fields_take_leading_digits() {
        assert_eq!(int_prefix("12abc"), Some(12));
        assert_eq!(int_prefix("  -3"), Some(-3));
        assert_eq!(int_prefix("+4"), Some(4));
        assert_eq!(int_prefix("10.9"), Some(10));
        assert_eq!(int_prefix("1e3"), Some(1));
        assert_eq!(int_prefix("."), None);
    }

    #[test]
    fn integer_fields_read_hex_and_drop_overflow() {
        assert_eq!(int_prefix("0x1A"), Some(26));
        assert_eq!(int_prefix("-0XffZ"), Some(-255));
        assert_eq!(int_prefix("0x"), None);
        assert_eq!(int_prefix("99999999999999999999"), None);
    }

    #[test]
    fn form_accepts_numbers_or_text() {
        let form: PredictionForm = serde_json::from_value(serde_json::json!({
            "store_id": 1,
            "sku_id": 2,
            "total_price": "10.5",
            "base_price": 9.0,
            "is_featured_sku": "1",
            "is_display_sku": null
        }))
        .unwrap();
        assert_eq!(form.store_id, "1");
        assert_eq!(form.base_price, "9.0");
        assert_eq!(form.is_display_sku, "");

        let request = form.to_request();
        assert_eq!(request.sku_id, Some(2));
        assert_eq!(request.base_price, Some(9.0));
        assert_eq!(request.is_display_sku, None);
    }

    #[test]
    fn float_fields_take_leading_number() {
        assert_eq!(float_prefix("10.5kg"), Some(10.5));
        assert_eq!(float_prefix(".5"), Some(0.5));
        assert_eq!(float_prefix("5."), Some(5.0));
        assert_eq!(float_prefix("-2.5e1x"), Some(-25.0));
        assert_eq!(float_prefix("3e"), Some(3.0));
        assert_eq!(float_prefix("."), None);
        assert_eq!(float_prefix("Infinity"), None);
    }

    #[test]
    fn demand_high_accepts_flag_or_label() {
        let flag: PredictionResponse = serde_json::from_str(
            r#"{"predicted_units":42,"predicted_demand_percentage":73.2,"is_demand_high":true}"#,
        )
        .unwrap();
        assert_eq!(flag.is_demand_high.to_string(), "true");

        let label: PredictionResponse = serde_json::from_str(
            r#"{"predicted_units":3.5,"predicted_demand_percentage":12,"is_demand_high":"No"}"#,
        )
        .unwrap();
        assert_eq!(label.is_demand_high.to_string(), "No");
        assert_eq!(label.predicted_demand_percentage, 12.0);
    }

    #[test]
    fn response_without_demand_flag_is_rejected() {
        let parsed = serde_json::from_str::<PredictionResponse>(
            r#"{"predicted_units":42,"predicted_demand_percentage":73.2}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn accuracy_banner_text() {
        assert_eq!(AccuracyState::Loaded(0.87).display(), "0.87");
        assert_eq!(AccuracyState::Unavailable.display(), "Unavailable");
        assert_eq!(AccuracyState::Failed.display(), "Error");
        assert_eq!(AccuracyState::Unavailable.score(), None);
    }
}
