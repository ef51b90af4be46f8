use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    pub due_date: String,

    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new_incomplete(id: TaskId, title: String, due_date: String) -> Self {
        Self {
            id,
            title,
            due_date,
            is_completed: false,
        }
    }
}

/// Timestamp-derived id that never collides with an id already in `tasks`.
///
/// Two adds inside the same millisecond, or a clock that stepped backwards,
/// fall through to `max + 1`.
pub fn next_id(tasks: &[Task], now: DateTime<Utc>) -> TaskId {
    let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = tasks
        .iter()
        .map(|task| task.id)
        .max()
        .map_or(0, |max| max.saturating_add(1));
    stamp.max(floor)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Task, next_id};

    #[test]
    fn next_id_uses_clock_millis_on_empty_list() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(next_id(&[], now), 1_704_099_600_000);
    }

    #[test]
    fn next_id_skips_past_existing_ids_under_frozen_clock() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let first = next_id(&[], now);
        let tasks = vec![Task::new_incomplete(
            first,
            "a".to_string(),
            "2024-01-02".to_string(),
        )];
        assert_eq!(next_id(&tasks, now), first + 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let task = Task::new_incomplete(7, "Buy milk".to_string(), "2024-01-01".to_string());
        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Buy milk",
                "dueDate": "2024-01-01",
                "isCompleted": false
            })
        );
    }

    #[test]
    fn missing_completion_flag_defaults_to_false() {
        let task: Task =
            serde_json::from_str(r#"{"id":1,"title":"x","dueDate":"2024-01-01"}"#)
                .expect("parse");
        assert!(!task.is_completed);
    }
}
