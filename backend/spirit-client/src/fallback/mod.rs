//! Canned offline payloads.
//!
//! When a live call fails, a caller may opt in to substituting one of these
//! payloads. Every payload is flagged `"offline": true` and its id carries
//! the `offline_` prefix so it can never be mistaken for a live result.

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use humantime::format_rfc3339_seconds;
use serde_json::{Value, json};

pub const OFFLINE_ID_PREFIX: &str = "offline_";

/// Operations with a canned fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackOperation {
    Models,
    TarotReading,
    AstrologyChart,
    BookQuery,
    SpiritualChat,
}

impl FallbackOperation {
    pub const ALL: [FallbackOperation; 5] = [
        FallbackOperation::Models,
        FallbackOperation::TarotReading,
        FallbackOperation::AstrologyChart,
        FallbackOperation::BookQuery,
        FallbackOperation::SpiritualChat,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FallbackOperation::Models => "models",
            FallbackOperation::TarotReading => "tarotReading",
            FallbackOperation::AstrologyChart => "astrologyChart",
            FallbackOperation::BookQuery => "bookQuery",
            FallbackOperation::SpiritualChat => "spiritualChat",
        }
    }

    /// Caller-facing operation names that select this payload.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            FallbackOperation::Models => &["models", "fetchModels"],
            FallbackOperation::TarotReading => &["tarotReading", "fetchTarotReading"],
            FallbackOperation::AstrologyChart => &["astrologyChart", "generateChart"],
            FallbackOperation::BookQuery => &["bookQuery", "queryBooks"],
            FallbackOperation::SpiritualChat => &["spiritualChat"],
        }
    }
}

impl Display for FallbackOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.name())
    }
}

impl FromStr for FallbackOperation {
    type Err = ();

    fn from_str(operation: &str) -> Result<Self, Self::Err> {
        FallbackOperation::ALL
            .into_iter()
            .find(|op| op.aliases().contains(&operation))
            .ok_or(())
    }
}

/// Static operation → payload table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Payload for `operation`, or `None` if the operation has no fallback.
    pub fn lookup(&self, operation: &str) -> Option<Value> {
        operation.parse::<FallbackOperation>().ok().map(payload)
    }

    pub fn contains(&self, operation: &str) -> bool {
        operation.parse::<FallbackOperation>().is_ok()
    }
}

fn offline_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("{OFFLINE_ID_PREFIX}{millis}")
}

fn now_rfc3339() -> String {
    format_rfc3339_seconds(SystemTime::now()).to_string()
}

pub fn payload(operation: FallbackOperation) -> Value {
    match operation {
        FallbackOperation::Models => {
            let modified_at = now_rfc3339();
            json!({
                "offline": true,
                "models": [
                    { "name": "dolphin-mistral:7b", "size": "4.1GB", "modified_at": modified_at },
                    { "name": "llama2:7b", "size": "3.8GB", "modified_at": modified_at },
                    { "name": "codellama:7b", "size": "3.9GB", "modified_at": modified_at }
                ]
            })
        }
        FallbackOperation::TarotReading => json!({
            "offline": true,
            "cards": [
                {
                    "position": "Present Situation",
                    "card": {
                        "name": "The Star",
                        "suit": "Major Arcana",
                        "keywords": ["hope", "inspiration", "guidance"]
                    },
                    "meaning": "A time of healing and renewed hope is upon you. Trust in divine guidance.",
                    "reversed": false
                }
            ],
            "interpretation": "The Star appears to remind you that even in darkness, there is always light. This is a time for healing, hope, and spiritual renewal. Trust that the universe is guiding you toward your highest good.",
            "insights": ["spiritual renewal", "divine guidance", "inner peace"],
            "reading_id": offline_id(),
            "generated_at": now_rfc3339()
        }),
        FallbackOperation::AstrologyChart => json!({
            "offline": true,
            "chart_data": {
                "sun": { "sign": "Leo", "degree": 15, "house": 5 },
                "moon": { "sign": "Pisces", "degree": 22, "house": 11 },
                "ascendant": { "sign": "Virgo", "degree": 8 }
            },
            "interpretation": "Your Leo sun brings natural leadership and creativity, while your Pisces moon adds intuition and compassion. Your Virgo ascendant provides practical wisdom to ground your spiritual insights.",
            "personality_traits": ["creative", "intuitive", "practical", "compassionate"],
            "chart_id": offline_id()
        }),
        FallbackOperation::BookQuery => json!({
            "offline": true,
            "response": "In times of uncertainty, remember that wisdom comes from within. The ancient texts teach us that every challenge is an opportunity for growth. Trust your inner voice and let love guide your decisions.",
            "sources": [
                { "title": "The Power of Now", "author": "Eckhart Tolle", "relevance": 0.9 },
                { "title": "The Alchemist", "author": "Paulo Coelho", "relevance": 0.8 }
            ],
            "query_id": offline_id()
        }),
        FallbackOperation::SpiritualChat => json!({
            "offline": true,
            "message": "I sense you're seeking guidance during this moment of disconnection. Remember that true wisdom comes from within. Take this quiet moment to connect with your inner self and trust that all answers you seek already reside in your heart."
        }),
    }
}
