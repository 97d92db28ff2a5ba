//! Request bodies accepted by the backend services.
//!
//! Field names follow the services' snake_case JSON.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_CONTEXT: &str = "spiritual guidance";
pub const DEFAULT_MODEL: &str = "dolphin-mistral";
pub const DEFAULT_SPREAD: &str = "single_card";
pub const DEFAULT_DECK: &str = "rider_waite";
pub const DEFAULT_BOOK_CATEGORY: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: String,
    pub model: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: DEFAULT_CHAT_CONTEXT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TarotReadingRequest {
    pub question: String,
    pub spread_type: String,
    pub deck: String,
    pub include_interpretation: bool,
}

impl TarotReadingRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            spread_type: DEFAULT_SPREAD.to_string(),
            deck: DEFAULT_DECK.to_string(),
            include_interpretation: true,
        }
    }

    pub fn with_spread(mut self, spread_type: impl Into<String>) -> Self {
        self.spread_type = spread_type.into();
        self
    }

    pub fn with_deck(mut self, deck: impl Into<String>) -> Self {
        self.deck = deck.into();
        self
    }
}

/// Birth details for chart and compatibility calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub birth_date: String,
    pub birth_time: String,
    pub birth_place: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl BirthData {
    pub fn new(
        birth_date: impl Into<String>,
        birth_time: impl Into<String>,
        birth_place: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            birth_date: birth_date.into(),
            birth_time: birth_time.into(),
            birth_place: birth_place.into(),
            latitude: None,
            longitude: None,
            timezone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    pub person1: BirthData,
    pub person2: BirthData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookQueryRequest {
    pub query: String,
    pub category: String,
    pub model: String,
}

impl BookQueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: DEFAULT_BOOK_CATEGORY.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}
