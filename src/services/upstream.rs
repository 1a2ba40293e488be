//! Client side of the spreadsheet REST endpoint.

use reqwest::Client;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::record::Record;

/// Field of the upstream body holding the sheet rows.
const ROWS_FIELD: &str = "rows";

/// Build the shared upstream HTTP client.
pub fn build_client(timeout: std::time::Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(AppError::from)
}

/// GET `url` and parse the body as JSON, whatever the status code.
pub async fn fetch_json(client: &Client, url: &str) -> Result<Value, AppError> {
    let body = client.get(url).send().await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// GET `url` and extract its records. A non-success status is an error.
pub async fn fetch_records(client: &Client, url: &str) -> Result<Vec<Record>, AppError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let json: Value = serde_json::from_slice(&body)?;
    Ok(extract_rows(json))
}

/// Take the `rows` array out of an upstream body. Anything else is treated as
/// no data rather than an error.
pub fn extract_rows(body: Value) -> Vec<Record> {
    match body {
        Value::Object(mut fields) => match fields.remove(ROWS_FIELD) {
            Some(Value::Array(rows)) => rows.into_iter().map(Record::from_value).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_rows_array() {
        let records = extract_rows(json!({
            "rows": [
                { "patientId": "ICU-07", "clinicianDecision": "Approve" },
                { "patientId": "WD1-22" }
            ]
        }));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].patient_id.as_deref(), Some("WD1-22"));
    }

    #[test]
    fn missing_rows_is_empty() {
        assert!(extract_rows(json!({ "sheet1": [] })).is_empty());
        assert!(extract_rows(json!({ "errors": [{ "detail": "quota" }] })).is_empty());
    }

    #[test]
    fn malformed_but_valid_json_is_empty() {
        assert!(extract_rows(json!({ "rows": "not an array" })).is_empty());
        assert!(extract_rows(json!([1, 2, 3])).is_empty());
        assert!(extract_rows(Value::Null).is_empty());
    }

    #[test]
    fn non_object_rows_still_count() {
        let records = extract_rows(json!({ "rows": [null, 7, { "clinicianDecision": "decline" }] }));
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], Record::default());
    }
}
