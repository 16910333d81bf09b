//! Modelo de reportes de averías
//!
//! El estado solo avanza: pending → in-progress → completed, o
//! in-progress → cancelled. Cada cambio queda en el historial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "fault_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FaultPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "fault_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FaultStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl FaultStatus {
    pub fn can_transition_to(&self, next: FaultStatus) -> bool {
        matches!(
            (self, next),
            (FaultStatus::Pending, FaultStatus::InProgress)
                | (FaultStatus::InProgress, FaultStatus::Completed)
                | (FaultStatus::InProgress, FaultStatus::Cancelled)
        )
    }

    pub fn is_open(&self) -> bool {
        matches!(self, FaultStatus::Pending | FaultStatus::InProgress)
    }
}

/// Entrada del historial de estados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: FaultStatus,
    pub timestamp: DateTime<Utc>,
    pub user: Uuid,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FaultReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub equipment_id: Uuid,
    pub priority: FaultPriority,
    pub status: FaultStatus,
    pub reported_by: Uuid,
    pub history: Json<Vec<StatusChange>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FaultReport {
    /// Aplica una transición en memoria y devuelve la entrada agregada
    pub fn transition(
        &mut self,
        next: FaultStatus,
        user: Uuid,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<StatusChange, FaultStatus> {
        if !self.status.can_transition_to(next) {
            return Err(self.status);
        }

        let change = StatusChange {
            status: next,
            timestamp: at,
            user,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };
        self.status = next;
        self.updated_at = at;
        self.history.0.push(change.clone());
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> FaultReport {
        let now = Utc::now();
        let reporter = Uuid::new_v4();
        FaultReport {
            id: Uuid::new_v4(),
            title: "Brake warning light".into(),
            description: "Light stays on after start".into(),
            equipment_id: Uuid::new_v4(),
            priority: FaultPriority::High,
            status: FaultStatus::Pending,
            reported_by: reporter,
            history: Json(vec![StatusChange {
                status: FaultStatus::Pending,
                timestamp: now,
                user: reporter,
                comment: None,
            }]),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_allowed_transitions() {
        use FaultStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_transition_appends_history() {
        let mut fault = report();
        let mechanic = Uuid::new_v4();
        let at = Utc::now();

        let change = fault
            .transition(FaultStatus::InProgress, mechanic, Some("  checking ".into()), at)
            .unwrap();

        assert_eq!(fault.status, FaultStatus::InProgress);
        assert_eq!(fault.history.0.len(), 2);
        assert_eq!(change.comment.as_deref(), Some("checking"));
        assert_eq!(fault.history.0.last(), Some(&change));
    }

    #[test]
    fn test_rejected_transition_leaves_report_untouched() {
        let mut fault = report();
        let err = fault
            .transition(FaultStatus::Completed, Uuid::new_v4(), None, Utc::now())
            .unwrap_err();

        assert_eq!(err, FaultStatus::Pending);
        assert_eq!(fault.status, FaultStatus::Pending);
        assert_eq!(fault.history.0.len(), 1);
    }

    #[test]
    fn test_open_statuses() {
        assert!(FaultStatus::Pending.is_open());
        assert!(FaultStatus::InProgress.is_open());
        assert!(!FaultStatus::Completed.is_open());
        assert!(!FaultStatus::Cancelled.is_open());
    }
}
