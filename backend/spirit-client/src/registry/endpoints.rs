use super::normalize_path;

use models::ServiceId;

use std::borrow::Cow;

/// Named endpoints per service. `health` is added from the descriptor's health path.
const fn endpoint_table(service: ServiceId) -> &'static [(&'static str, &'static str)] {
    match service {
        ServiceId::SpiritualApi => &[("chat", "/chat"), ("models", "/models")],
        ServiceId::Tarot => &[
            ("reading", "/reading"),
            ("spreads", "/spreads"),
            ("cards", "/cards"),
        ],
        ServiceId::Astrology => &[
            ("birthChart", "/birth_chart"),
            ("compatibility", "/compatibility"),
            ("planets", "/planets"),
        ],
        ServiceId::BookChat => &[("query", "/query"), ("books", "/books"), ("stats", "/stats")],
        ServiceId::Gateway => &[
            ("models", "/api/models/available"),
            ("spiritual", "/api/spiritual"),
            ("tarot", "/api/tarot"),
            ("astrology", "/api/astrology"),
            ("bookChat", "/api/book-chat"),
        ],
    }
}

/// Path for `endpoint` on `service`. Unknown keys pass through as paths.
pub fn endpoint_path(service: ServiceId, endpoint: &str) -> Cow<'static, str> {
    if endpoint == "health" {
        return Cow::Borrowed(service.default_health_path());
    }

    endpoint_table(service)
        .iter()
        .find(|(key, _)| *key == endpoint)
        .map(|(_, path)| Cow::Borrowed(*path))
        .unwrap_or_else(|| Cow::Owned(normalize_path(endpoint)))
}

/// Known endpoint keys for `service`, including `health`.
pub fn endpoint_keys(service: ServiceId) -> impl Iterator<Item = &'static str> {
    endpoint_table(service)
        .iter()
        .map(|(key, _)| *key)
        .chain(std::iter::once("health"))
}
