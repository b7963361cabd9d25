//! Patient models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{blank_as_none, blank_as_none_parsed, normalize_optional};

/// Error returned when a gender or blood type string is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Patient gender as captured on the intake form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ParseEnumError {
                kind: "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// ABO/Rh blood type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            _ => Err(ParseEnumError {
                kind: "blood type",
                value: s.to_string(),
            }),
        }
    }
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Opaque id, assigned at creation and never changed
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_parsed")]
    pub blood_type: Option<BloodType>,
    /// Trimmed, non-empty allergy names in entry order
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Patient {
    /// Build a stored patient from form input.
    pub fn from_input(id: String, input: PatientInput, created_at: String) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            phone: input.phone,
            email: normalize_optional(input.email),
            address: normalize_optional(input.address),
            blood_type: input.blood_type,
            allergies: clean_allergies(input.allergies),
            created_at,
        }
    }

    /// "First Last", as shown in listings and pickers.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match against the full name, or substring match on phone.
    ///
    /// An empty filter matches everyone.
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.full_name().to_lowercase().contains(&needle)
            || self.phone.to_lowercase().contains(&needle)
    }

    /// Allergies joined back into the comma-separated form field text.
    pub fn allergies_text(&self) -> String {
        self.allergies.join(", ")
    }
}

/// Patient data as submitted from the intake/edit form.
///
/// `id` is `None` (or empty) for a new patient.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientInput {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<BloodType>,
    pub allergies: Vec<String>,
}

impl PatientInput {
    /// Create input for a new patient with required fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        gender: Gender,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            gender,
            phone: phone.into(),
            email: None,
            address: None,
            blood_type: None,
            allergies: Vec::new(),
        }
    }

    /// Input that replaces an existing patient wholesale.
    pub fn for_update(patient: &Patient) -> Self {
        Self {
            id: Some(patient.id.clone()),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            phone: patient.phone.clone(),
            email: patient.email.clone(),
            address: patient.address.clone(),
            blood_type: patient.blood_type,
            allergies: patient.allergies.clone(),
        }
    }

    /// The explicit target id, if any. Blank ids count as absent.
    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Split comma-separated allergy text into trimmed, non-empty entries.
pub fn parse_allergies(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}

fn clean_allergies(allergies: Vec<String>) -> Vec<String> {
    allergies
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Patient {
        let input = PatientInput::new(
            "Ann",
            "Lee",
            NaiveDate::from_ymd_opt(1980, 3, 14).unwrap(),
            Gender::Female,
            "555-1234",
        );
        Patient::from_input("p1".into(), input, chrono::Utc::now().to_rfc3339())
    }

    #[test]
    fn test_parse_allergies() {
        assert_eq!(
            parse_allergies(" penicillin, peanuts ,,latex , "),
            vec!["penicillin", "peanuts", "latex"]
        );
        assert!(parse_allergies("").is_empty());
        assert!(parse_allergies(" , ,").is_empty());
    }

    #[test]
    fn test_full_name_and_filter() {
        let patient = ann();
        assert_eq!(patient.full_name(), "Ann Lee");
        assert!(patient.matches_filter(""));
        assert!(patient.matches_filter("lee"));
        assert!(patient.matches_filter("N L"));
        assert!(patient.matches_filter("555-12"));
        assert!(!patient.matches_filter("999"));
    }

    #[test]
    fn test_from_input_normalizes() {
        let mut input = PatientInput::new(
            "Bo",
            "Ng",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            Gender::Male,
            "555",
        );
        input.email = Some("  ".into());
        input.address = Some("1 Main St".into());
        input.allergies = vec![" dust ".into(), "".into()];

        let patient = Patient::from_input("p2".into(), input, "now".into());
        assert_eq!(patient.email, None);
        assert_eq!(patient.address, Some("1 Main St".into()));
        assert_eq!(patient.allergies, vec!["dust"]);
        assert_eq!(patient.allergies_text(), "dust");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("unknown".parse::<Gender>().is_err());
        assert_eq!("ab-".parse::<BloodType>().unwrap(), BloodType::AbNegative);
        assert_eq!(BloodType::OPositive.to_string(), "O+");
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_json_layout() {
        let patient = ann();
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["dob"], "1980-03-14");
        assert_eq!(json["gender"], "female");
    }

    #[test]
    fn test_reads_blank_optional_fields() {
        let json = r#"{
            "id": "abc",
            "firstName": "Ann",
            "lastName": "Lee",
            "dob": "1980-03-14",
            "gender": "female",
            "phone": "555-1234",
            "email": "",
            "address": "",
            "bloodType": "",
            "allergies": [],
            "createdAt": "2024-06-01T10:00:00.000Z"
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.email, None);
        assert_eq!(patient.address, None);
        assert_eq!(patient.blood_type, None);

        let json = json.replace(r#""bloodType": """#, r#""bloodType": "B-""#);
        let patient: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(patient.blood_type, Some(BloodType::BNegative));
    }

    #[test]
    fn test_target_id() {
        let mut input = PatientInput::for_update(&ann());
        assert_eq!(input.target_id(), Some("p1"));
        input.id = Some("  ".into());
        assert_eq!(input.target_id(), None);
        input.id = None;
        assert_eq!(input.target_id(), None);
    }
}
