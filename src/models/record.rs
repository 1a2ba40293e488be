//! Upstream audit-trail row and the decision classification shared by every tally.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label used when a grouping field is absent or empty.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of leading patient-id characters that identify the ward.
const WARD_PREFIX_LEN: usize = 3;

/// Clinician decision on a de-escalation recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Declined,
    Pending,
}

impl Decision {
    /// Classify the free-text decision field.
    ///
    /// Matching is a case-insensitive comparison with the literal values
    /// "approve" and "decline". Anything else, including an absent, empty or
    /// padded value, is pending, so every record lands in exactly one bucket.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("approve") => Self::Approved,
            Some(value) if value.eq_ignore_ascii_case("decline") => Self::Declined,
            _ => Self::Pending,
        }
    }

    /// Display label for the decision bucket.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Declined => "Declined",
            Self::Pending => "Pending",
        }
    }
}

/// One row of the antibiotic de-escalation audit trail.
///
/// Every field is optional: the sheet owns the schema and rows are often
/// half filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub current_antibiotic: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub de_escalation_recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub clinician_decision: Option<String>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub ai_confidence_score: Option<f64>,
}

impl Record {
    /// Build a record from an arbitrary JSON row. Non-object rows yield an empty record.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn decision(&self) -> Decision {
        Decision::classify(self.clinician_decision.as_deref())
    }

    /// Grouping key for the by-antibiotic breakdown.
    pub fn antibiotic_key(&self) -> &str {
        non_empty(self.current_antibiotic.as_deref()).unwrap_or(UNKNOWN_LABEL)
    }

    /// Grouping key for the by-ward breakdown: the first three characters of
    /// the patient id, or the whole id when it is shorter.
    pub fn ward_key(&self) -> &str {
        match non_empty(self.patient_id.as_deref()) {
            Some(id) => match id.char_indices().nth(WARD_PREFIX_LEN) {
                Some((end, _)) => &id[..end],
                None => id,
            },
            None => UNKNOWN_LABEL,
        }
    }

    /// Confidence score as a whole percentage, missing scores counting as zero.
    pub fn confidence_percent(&self) -> i64 {
        round_half_up(self.ai_confidence_score.unwrap_or(0.0) * 100.0)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Round to the nearest integer, halves rounding towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_id(id: &str) -> Record {
        Record {
            patient_id: Some(id.to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn decision_is_case_insensitive() {
        for raw in ["approve", "Approve", "APPROVE", "aPProve"] {
            assert_eq!(Decision::classify(Some(raw)), Decision::Approved, "{raw}");
        }
        for raw in ["decline", "Decline", "DECLINE"] {
            assert_eq!(Decision::classify(Some(raw)), Decision::Declined, "{raw}");
        }
    }

    #[test]
    fn missing_empty_or_unrecognised_decision_is_pending() {
        assert_eq!(Decision::classify(None), Decision::Pending);
        assert_eq!(Decision::classify(Some("")), Decision::Pending);
        assert_eq!(Decision::classify(Some("   ")), Decision::Pending);
        assert_eq!(Decision::classify(Some("Approved")), Decision::Pending);
        assert_eq!(Decision::classify(Some("defer")), Decision::Pending);
    }

    #[test]
    fn padded_decision_is_pending() {
        assert_eq!(Decision::classify(Some(" Approve ")), Decision::Pending);
        assert_eq!(Decision::classify(Some("decline\n")), Decision::Pending);
        let record = Record {
            clinician_decision: Some("Approve ".to_string()),
            ..Record::default()
        };
        assert_eq!(record.decision(), Decision::Pending);
    }

    #[test]
    fn ward_key_takes_first_three_characters() {
        assert_eq!(with_id("ICU-07").ward_key(), "ICU");
        assert_eq!(with_id("WD1-22").ward_key(), "WD1");
        assert_eq!(with_id("ICU").ward_key(), "ICU");
    }

    #[test]
    fn short_patient_id_is_used_whole() {
        assert_eq!(with_id("A1").ward_key(), "A1");
        assert_eq!(with_id("Z").ward_key(), "Z");
    }

    #[test]
    fn ward_key_does_not_split_multibyte_characters() {
        assert_eq!(with_id("ÄÖÜ-1").ward_key(), "ÄÖÜ");
    }

    #[test]
    fn missing_keys_default_to_unknown() {
        let record = Record::default();
        assert_eq!(record.ward_key(), UNKNOWN_LABEL);
        assert_eq!(record.antibiotic_key(), UNKNOWN_LABEL);

        let empty = Record {
            patient_id: Some(String::new()),
            current_antibiotic: Some(String::new()),
            ..Record::default()
        };
        assert_eq!(empty.ward_key(), UNKNOWN_LABEL);
        assert_eq!(empty.antibiotic_key(), UNKNOWN_LABEL);
    }

    #[test]
    fn deserializes_sheet_row() {
        let record = Record::from_value(json!({
            "id": 2,
            "patientId": "ICU-07",
            "patientName": "J. Doe",
            "currentAntibiotic": "Vancomycin",
            "deEscalationRecommendation": "Switch to cefazolin",
            "clinicianDecision": "Approve",
            "aiConfidenceScore": 0.92
        }));
        assert_eq!(record.patient_id.as_deref(), Some("ICU-07"));
        assert_eq!(record.decision(), Decision::Approved);
        assert_eq!(record.ai_confidence_score, Some(0.92));
        assert_eq!(record.confidence_percent(), 92);
    }

    #[test]
    fn lenient_fields_tolerate_wrong_types() {
        let record = Record::from_value(json!({
            "patientId": 10422,
            "currentAntibiotic": null,
            "clinicianDecision": ["Approve"],
            "aiConfidenceScore": "0.5"
        }));
        assert_eq!(record.patient_id.as_deref(), Some("10422"));
        assert_eq!(record.ward_key(), "104");
        assert_eq!(record.current_antibiotic, None);
        assert_eq!(record.decision(), Decision::Pending);
        assert_eq!(record.ai_confidence_score, Some(0.5));
    }

    #[test]
    fn non_object_row_is_empty_record() {
        assert_eq!(Record::from_value(json!(42)), Record::default());
        assert_eq!(Record::from_value(Value::Null), Record::default());
    }

    #[test]
    fn confidence_rounds_half_up() {
        let record = Record {
            ai_confidence_score: Some(0.125),
            ..Record::default()
        };
        assert_eq!(record.confidence_percent(), 13);
        assert_eq!(Record::default().confidence_percent(), 0);
    }
}
