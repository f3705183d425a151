use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Entrance effect forwarded to the renderer. The engine only computes the
/// per-item start delay; the renderer owns the animation itself.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Effect {
    #[default]
    Clockwise,
    Counterclockwise,
    Radial,
    ScaleFade,
    Bounce,
    Spiral,
    Wave,
}

impl Effect {
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown effect '{}', using clockwise", name);
            Self::Clockwise
        })
    }

    /// Seconds between consecutive items starting their entrance.
    fn stagger(&self) -> f64 {
        match self {
            Self::Clockwise | Self::Counterclockwise => 0.05,
            Self::Radial | Self::Wave => 0.08,
            Self::ScaleFade => 0.06,
            Self::Bounce => 0.07,
            Self::Spiral => 0.09,
        }
    }

    pub fn delay(&self, index: usize, total: usize) -> Duration {
        let order = match self {
            Self::Counterclockwise => total.saturating_sub(index + 1),
            _ => index,
        };
        Duration::from_secs_f64(order as f64 * self.stagger())
    }
}

impl From<String> for Effect {
    fn from(name: String) -> Self {
        Self::parse_lenient(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(d: Duration) -> f64 {
        d.as_secs_f64()
    }

    #[test]
    fn test_delays() {
        assert_eq!(Effect::Clockwise.delay(0, 4), Duration::ZERO);
        assert!((secs(Effect::Radial.delay(2, 4)) - 0.16).abs() < 1e-6);
        assert!((secs(Effect::Spiral.delay(1, 4)) - 0.09).abs() < 1e-6);
        // reverse order: last item starts first
        assert_eq!(Effect::Counterclockwise.delay(3, 4), Duration::ZERO);
        assert!((secs(Effect::Counterclockwise.delay(0, 4)) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_lenient_names() {
        let cases = vec![
            ("\"scale-fade\"", Effect::ScaleFade),
            ("\"Bounce\"", Effect::Bounce),
            ("\"counterclockwise\"", Effect::Counterclockwise),
            ("\"sparkle\"", Effect::Clockwise),
        ];
        for (json, expected) in cases {
            let deserialized: Effect = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(Effect::ScaleFade.to_string(), "scale-fade");
    }
}
