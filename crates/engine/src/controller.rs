// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing of control requests to rooms

use crate::{ControlError, RoomHandle};
use rk_core::{Expression, ManualRequest, Value};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Delay applied to reschedule requests so bursts collapse into one run
pub const RESCHEDULE_REQUEST_DELAY: Duration = Duration::from_secs(6);

/// Request to override a room's value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetValueRequest {
    pub room_name: String,
    #[serde(default, alias = "v")]
    pub value: Option<Value>,
    #[serde(default, alias = "x")]
    pub expression: Option<String>,
    #[serde(default)]
    pub force_resend: bool,
    /// Minutes until the schedule takes over again; the room default if unset
    #[serde(default)]
    pub reschedule_delay: Option<f64>,
}

/// Request to re-apply the schedule of one room, or of all rooms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RescheduleRequest {
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub cancel_running_timer: bool,
}

/// Routes control requests by room id
#[derive(Clone, Default)]
pub struct Controller {
    rooms: BTreeMap<String, RoomHandle>,
    expressions_from_events: bool,
}

impl Controller {
    pub fn new(expressions_from_events: bool) -> Self {
        Self {
            rooms: BTreeMap::new(),
            expressions_from_events,
        }
    }

    pub fn add_room(&mut self, handle: RoomHandle) {
        self.rooms.insert(handle.id().to_string(), handle);
    }

    pub fn room(&self, id: &str) -> Option<&RoomHandle> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomHandle> {
        self.rooms.values()
    }

    /// Validate a set-value request and forward it to its room
    pub async fn set_value(&self, request: SetValueRequest) -> Result<(), ControlError> {
        let manual = match (request.value, request.expression) {
            (Some(_), Some(_)) => {
                return Err(ControlError::InvalidRequest(
                    "value and expression are mutually exclusive".to_string(),
                ))
            }
            (None, None) => {
                return Err(ControlError::InvalidRequest(
                    "either value or expression is required".to_string(),
                ))
            }
            (Some(value), None) => ManualRequest::Value(value),
            (None, Some(_)) if !self.expressions_from_events => {
                return Err(ControlError::ExpressionsDisabled)
            }
            (None, Some(source)) => ManualRequest::Expression(Expression::new(source)),
        };

        let delay = match request.reschedule_delay {
            Some(minutes) if !minutes.is_finite() || minutes < 0.0 => {
                return Err(ControlError::InvalidRequest(format!(
                    "reschedule_delay must be a non-negative number of minutes, got {}",
                    minutes
                )))
            }
            Some(minutes) => Some(Duration::try_from_secs_f64(minutes * 60.0).map_err(|_| {
                ControlError::InvalidRequest(format!(
                    "reschedule_delay of {} minutes is out of range",
                    minutes
                ))
            })?),
            None => None,
        };

        let room = self
            .rooms
            .get(&request.room_name)
            .ok_or_else(|| ControlError::UnknownRoom(request.room_name.clone()))?;
        tracing::info!(room = room.id(), ?manual, force_resend = request.force_resend, "set value requested");
        room.request_manual_value(manual, request.force_resend, delay)
            .await?;
        Ok(())
    }

    /// Parse a set-value request from JSON and forward it
    pub async fn set_value_json(&self, json: &str) -> Result<(), ControlError> {
        self.set_value(serde_json::from_str(json)?).await
    }

    /// Re-apply schedules; returns the number of rooms addressed
    pub async fn reschedule(&self, request: RescheduleRequest) -> Result<usize, ControlError> {
        let targets: Vec<&RoomHandle> = match &request.room_name {
            Some(name) => vec![self
                .rooms
                .get(name)
                .ok_or_else(|| ControlError::UnknownRoom(name.clone()))?],
            None => self.rooms.values().collect(),
        };

        tracing::info!(
            rooms = targets.len(),
            cancel_running_timer = request.cancel_running_timer,
            "reschedule requested"
        );
        for room in &targets {
            room.reschedule(RESCHEDULE_REQUEST_DELAY, request.cancel_running_timer)
                .await?;
        }
        Ok(targets.len())
    }

    /// Stop every room
    pub async fn shutdown(&self) {
        for room in self.rooms.values() {
            room.shutdown().await;
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
