//! Crystal Ball: pick two competitors and an activity, score both with a dash of
//! luck, and let a text-generation provider narrate the upset.

pub mod config;
pub mod error;
pub mod matchup;
pub mod telemetry;
