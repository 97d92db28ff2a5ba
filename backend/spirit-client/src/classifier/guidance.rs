use crate::error::ErrorKind;

use rand::seq::SliceRandom;

const NETWORK: &[&str] = &[
    "The cosmic connection has been temporarily interrupted.",
    "The spiritual network needs a moment to realign.",
    "Divine signals are encountering interference.",
];

const SERVICE_UNAVAILABLE: &[&str] = &[
    "The spiritual guides are temporarily unavailable.",
    "Sacred services are in meditation. Please wait.",
    "The mystical realm is recharging its energy.",
];

const TIMEOUT: &[&str] = &[
    "The universe needs more time to process your request.",
    "Cosmic wisdom is taking longer than usual to manifest.",
    "The spiritual servers are contemplating deeply.",
];

const AUTHENTICATION: &[&str] = &[
    "Your spiritual credentials need renewal.",
    "The guardians require proper identification.",
    "Access to the sacred realm has been restricted.",
];

const VALIDATION: &[&str] = &[
    "The cosmic forces detected an irregularity in your request.",
    "Spiritual validation has revealed an inconsistency.",
    "The universe requires clarification of your intent.",
];

const RATE_LIMIT: &[&str] = &[
    "You're channeling spiritual energy too quickly. Please pause.",
    "The cosmos suggests a moment of meditation between requests.",
    "Divine wisdom has limits - please slow your spiritual seeking.",
];

const UNKNOWN: &[&str] = &[
    "An unexpected disturbance in the spiritual realm has occurred.",
    "Unknown energies are affecting the cosmic balance.",
    "The universe is experiencing mysterious fluctuations.",
];

pub fn phrases_for(kind: ErrorKind) -> &'static [&'static str] {
    match kind {
        ErrorKind::Network => NETWORK,
        ErrorKind::ServiceUnavailable => SERVICE_UNAVAILABLE,
        ErrorKind::Timeout => TIMEOUT,
        ErrorKind::Authentication => AUTHENTICATION,
        ErrorKind::Validation => VALIDATION,
        ErrorKind::RateLimit => RATE_LIMIT,
        ErrorKind::Unknown => UNKNOWN,
    }
}

/// Pick a user-facing phrase for `kind`.
pub fn phrase_for(kind: ErrorKind) -> &'static str {
    phrases_for(kind)
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(UNKNOWN[0])
}
