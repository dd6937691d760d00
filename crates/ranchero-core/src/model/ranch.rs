//! Ranch (tenant) model.
//!
//! The dashboard runs single-tenant today, but every query threads the
//! active ranch id rather than baking the name into display strings, so a
//! second ranch is a fixture away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A ranch: the owning tenant for blocks and tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranch {
    pub id: String,
    pub name: String,
    /// URL-safe identifier, e.g. `rancho-don-enrique`.
    pub slug: String,
    /// Total area in acres.
    pub total_area: f64,
    pub established_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::Ranch;

    #[test]
    fn ranch_deserializes_from_fixture_shape() {
        let json = r#"{
            "id": "ranch-don-enrique",
            "name": "Rancho Don Enrique",
            "slug": "rancho-don-enrique",
            "totalArea": 87.4,
            "establishedDate": "1998-09-12",
            "isActive": true
        }"#;
        let ranch: Ranch = serde_json::from_str(json).expect("fixture shape");
        assert_eq!(ranch.slug, "rancho-don-enrique");
        assert!(ranch.description.is_none());
    }
}
