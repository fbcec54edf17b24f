use serde::Deserialize;
use time::OffsetDateTime;

use super::Phase;

/// The session the authority currently considers active, as returned by
/// `GET /timer/current`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSession {
    #[serde(rename = "type")]
    pub phase: Phase,
    #[serde(
        rename = "startTime",
        deserialize_with = "timestamp::deserialize",
        default
    )]
    pub start_time: Option<OffsetDateTime>,
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// Remaining seconds as computed by the authority at response time.
    /// Preferred over re-parsing `startTime` when anchoring the local
    /// countdown, since it is immune to client/server clock skew.
    #[serde(rename = "timeLeft")]
    pub time_left_secs: f64,
}

impl ActiveSession {
    /// Whole seconds already elapsed according to the authority.
    pub fn elapsed_secs(&self) -> u64 {
        let left = self.time_left_secs.max(0.0).floor() as u64;
        self.duration_secs.saturating_sub(left)
    }
}

/// Response of `POST /timer/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartedSession {
    #[serde(rename = "type")]
    pub phase: Phase,
    #[serde(
        rename = "startTime",
        deserialize_with = "timestamp::deserialize",
        default
    )]
    pub start_time: Option<OffsetDateTime>,
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

/// Response of `POST /timer/complete`. Completing a work session increments
/// the server-side pomodoro counter before the recommendation is computed.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletedSession {
    #[serde(rename = "next_timer_type")]
    pub next_phase: Phase,
    pub pomodoro_count: u32,
}

/// The authority reports start timestamps either as ISO-8601 strings or as
/// unix epoch seconds; older deployments omit the UTC offset on the string
/// form.
mod timestamp {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => parse_iso(&raw).map(Some).map_err(D::Error::custom),
            Some(Value::Number(n)) => {
                let secs = n
                    .as_i64()
                    .ok_or_else(|| D::Error::custom("epoch timestamp out of range"))?;
                OffsetDateTime::from_unix_timestamp(secs)
                    .map(Some)
                    .map_err(D::Error::custom)
            }
            Some(other) => Err(D::Error::custom(format!(
                "unexpected timestamp value: {other}"
            ))),
        }
    }

    fn parse_iso(raw: &str) -> Result<OffsetDateTime, String> {
        if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(dt);
        }
        // Offset-less form such as "2024-05-02T09:30:00.123456"; the
        // authority's clock runs in UTC.
        let format = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        PrimitiveDateTime::parse(raw, &format)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_active(json: &str) -> ActiveSession {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_rfc3339_start_time() {
        let session = parse_active(
            r#"{"type": "work", "startTime": "2024-05-02T09:30:00Z", "duration": 1500, "timeLeft": 1200.0}"#,
        );
        assert_eq!(session.phase, Phase::Work);
        assert_eq!(session.start_time.unwrap().unix_timestamp(), 1714642200);
    }

    #[test]
    fn parses_offsetless_start_time_as_utc() {
        let session = parse_active(
            r#"{"type": "short_break", "startTime": "2024-05-02T09:30:00.123456", "duration": 300, "timeLeft": 299.5}"#,
        );
        assert_eq!(session.phase, Phase::ShortBreak);
        assert_eq!(session.start_time.unwrap().unix_timestamp(), 1714642200);
    }

    #[test]
    fn parses_epoch_start_time() {
        let session = parse_active(
            r#"{"type": "long_break", "startTime": 1714642200, "duration": 900, "timeLeft": 900.0}"#,
        );
        assert_eq!(session.start_time.unwrap().unix_timestamp(), 1714642200);
    }

    #[test]
    fn missing_start_time_is_none() {
        let session =
            parse_active(r#"{"type": "work", "duration": 1500, "timeLeft": 1500.0}"#);
        assert!(session.start_time.is_none());
    }

    #[test]
    fn elapsed_never_exceeds_duration() {
        let session =
            parse_active(r#"{"type": "work", "duration": 1500, "timeLeft": -3.0}"#);
        assert_eq!(session.elapsed_secs(), 1500);

        let session =
            parse_active(r#"{"type": "work", "duration": 1500, "timeLeft": 1200.9}"#);
        assert_eq!(session.elapsed_secs(), 300);
    }
}
