//! Advocate records as served by `GET /api/advocates`.

use serde::{Deserialize, Serialize};

/// A directory record. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advocate {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub degree: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub years_of_experience: u32,
    /// Numeric on the wire, so leading zeros and formatting are already gone.
    pub phone_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Response envelope: `{ "data": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvocatesResponse {
    pub data: Vec<Advocate>,
}

impl Advocate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_camel_case_envelope() {
        let body = r#"{
            "data": [{
                "id": 1,
                "firstName": "Jane",
                "lastName": "Doe",
                "city": "Austin",
                "degree": "MD",
                "specialties": ["Cardiology", "Sleep"],
                "yearsOfExperience": 5,
                "phoneNumber": 5551234567,
                "createdAt": "2024-01-01T00:00:00.000Z",
                "unrelated": true
            }]
        }"#;

        let response: AdvocatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.len(), 1);

        let jane = &response.data[0];
        assert_eq!(jane.full_name(), "Jane Doe");
        assert_eq!(jane.specialties, vec!["Cardiology", "Sleep"]);
        assert_eq!(jane.years_of_experience, 5);
        assert_eq!(jane.phone_number, 5551234567);
        assert_eq!(jane.created_at.as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn created_at_and_specialties_are_optional() {
        let body = r#"{"id":2,"firstName":"Bob","lastName":"Roe","city":"Boston",
            "degree":"PhD","yearsOfExperience":10,"phoneNumber":5559876543}"#;
        let bob: Advocate = serde_json::from_str(body).unwrap();
        assert!(bob.specialties.is_empty());
        assert_eq!(bob.created_at, None);
    }

    #[test]
    fn rejects_negative_experience() {
        let body = r#"{"id":3,"firstName":"A","lastName":"B","city":"C","degree":"D",
            "specialties":[],"yearsOfExperience":-1,"phoneNumber":1}"#;
        assert!(serde_json::from_str::<Advocate>(body).is_err());
    }
}
