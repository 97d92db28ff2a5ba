use crate::{BirthData, BookQueryRequest, ChatRequest, TarotReadingRequest};

use serde_json::json;

/// **VALUE**: Verifies the tarot body matches what the tarot service expects.
///
/// **WHY THIS MATTERS**: The service rejects unknown spread names and requires
/// `include_interpretation`; a renamed field means a 422 on every reading.
///
/// **BUG THIS CATCHES**: Would catch a serde rename or a changed default spread.
#[test]
fn given_default_tarot_request_when_serialized_then_matches_service_shape() {
    let body = serde_json::to_value(TarotReadingRequest::new("What lies ahead?")).unwrap();

    assert_eq!(
        body,
        json!({
            "question": "What lies ahead?",
            "spread_type": "single_card",
            "deck": "rider_waite",
            "include_interpretation": true
        })
    );
}

#[test]
fn given_birth_data_without_optionals_when_serialized_then_omits_them() {
    let body = serde_json::to_value(BirthData::new("1990-08-08", "12:30", "Lisbon")).unwrap();

    assert_eq!(
        body,
        json!({
            "birth_date": "1990-08-08",
            "birth_time": "12:30",
            "birth_place": "Lisbon"
        })
    );
}

#[test]
fn given_builders_when_overriding_defaults_then_fields_change() {
    let chat = ChatRequest::new("hello");
    assert_eq!(chat.model, "dolphin-mistral");
    assert_eq!(chat.context, "spiritual guidance");

    let query = BookQueryRequest::new("stillness").with_category("philosophy");
    assert_eq!(query.category, "philosophy");

    let chart = BirthData::new("1990-08-08", "12:30", "Lisbon")
        .with_name("Ana")
        .with_coordinates(38.72, -9.14);
    assert_eq!(chart.name.as_deref(), Some("Ana"));
    assert_eq!(chart.longitude, Some(-9.14));
}
