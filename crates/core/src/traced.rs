// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing infrastructure for effects

use crate::effect::Effect;

/// Trait for operations that should be traced
///
/// Provides consistent naming and structured fields for logging.
pub trait TracedEffect {
    /// Effect name for log spans (e.g., "set_value", "set_timer")
    fn name(&self) -> &'static str;

    /// Key-value pairs for structured logging
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::SetValue { .. } => "set_value",
            Effect::MirrorScheduledValue { .. } => "mirror_value",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![
                ("event", event.name().to_string()),
                ("room", event.room().to_string()),
            ],
            Effect::SetValue {
                room,
                value,
                force_resend,
                origin,
            } => vec![
                ("room", room.clone()),
                ("value", value.to_string()),
                ("force_resend", force_resend.to_string()),
                ("origin", origin.to_string()),
            ],
            Effect::MirrorScheduledValue { room, value } => {
                vec![("room", room.clone()), ("value", value.to_string())]
            }
            Effect::SetTimer { id, duration } => vec![
                ("id", id.clone()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("id", id.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::ValueOrigin;
    use crate::value::Value;
    use std::time::Duration;

    #[test]
    fn set_value_fields() {
        let effect = Effect::SetValue {
            room: "bath".to_string(),
            value: Value::Int(22),
            force_resend: true,
            origin: ValueOrigin::Scheduled,
        };
        assert_eq!(effect.name(), "set_value");
        assert_eq!(
            effect.fields(),
            vec![
                ("room", "bath".to_string()),
                ("value", "22".to_string()),
                ("force_resend", "true".to_string()),
                ("origin", "scheduled".to_string()),
            ]
        );
    }

    #[test]
    fn timer_fields_use_milliseconds() {
        let effect = Effect::SetTimer {
            id: "room:bath:reschedule:1".to_string(),
            duration: Duration::from_secs(2),
        };
        assert_eq!(effect.name(), "set_timer");
        assert_eq!(effect.fields()[1], ("duration_ms", "2000".to_string()));
    }
}
