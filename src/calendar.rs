use serde::Serialize;
use thiserror::Error;

use crate::models::Weekday;
use crate::store::StoreError;

/// Hour slots the calendar is laid out on, earliest first.
pub const HOURS: [&str; 13] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00", "19:00", "20:00",
];

/// An activity as handed over by the store, already joined with its trainer.
/// `trainer` is `None` when the activity points at a user that no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityListing {
    pub name: String,
    pub trainer: Option<String>,
    pub days: Vec<Weekday>,
    pub schedule: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub day: Weekday,
    pub activities: Vec<ScheduledSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledSlot {
    pub name: String,
    pub trainer: String,
    pub hour: String,
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("activity '{activity}' has no trainer")]
    MissingTrainer { activity: String },
    #[error("failed to fetch activities")]
    Store(#[from] StoreError),
}

/// Source of the activities the calendar is built from.
pub trait ActivityRepository: Send + Sync {
    /// All activities in store order, each with its trainer's display name.
    fn fetch_all_with_trainer_names(&self) -> Result<Vec<ActivityListing>, StoreError>;
}

/// Lays the activities out on the weekly grid.
///
/// Walks day, then hour, then activity, so each day's slots come out sorted by
/// hour with ties kept in input order. Hours outside [`HOURS`] are never looked
/// at. A matched activity without a trainer fails the whole calendar.
pub fn assemble_calendar(activities: &[ActivityListing]) -> Result<Vec<CalendarDay>, CalendarError> {
    let mut calendar: Vec<CalendarDay> = Weekday::ALL
        .iter()
        .map(|&day| CalendarDay {
            day,
            activities: Vec::new(),
        })
        .collect();

    for entry in &mut calendar {
        for hour in HOURS {
            for activity in activities {
                if activity.days.contains(&entry.day)
                    && activity.schedule.iter().any(|h| h == hour)
                {
                    let trainer = activity.trainer.clone().ok_or_else(|| {
                        CalendarError::MissingTrainer {
                            activity: activity.name.clone(),
                        }
                    })?;
                    entry.activities.push(ScheduledSlot {
                        name: activity.name.clone(),
                        trainer,
                        hour: hour.to_string(),
                    });
                }
            }
        }
    }

    Ok(calendar)
}

/// Fetches the current activities and assembles a fresh calendar from them.
pub fn build_calendar(repo: &dyn ActivityRepository) -> Result<Vec<CalendarDay>, CalendarError> {
    let activities = repo.fetch_all_with_trainer_names()?;
    assemble_calendar(&activities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, days: &[Weekday], schedule: &[&str]) -> ActivityListing {
        ActivityListing {
            name: name.to_string(),
            trainer: Some("Ana García".to_string()),
            days: days.to_vec(),
            schedule: schedule.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn slots_on(calendar: &[CalendarDay], day: Weekday) -> Vec<(String, String)> {
        calendar
            .iter()
            .find(|d| d.day == day)
            .unwrap()
            .activities
            .iter()
            .map(|s| (s.name.clone(), s.hour.clone()))
            .collect()
    }

    #[test]
    fn test_empty_input_still_has_six_days() {
        let calendar = assemble_calendar(&[]).unwrap();
        let days: Vec<Weekday> = calendar.iter().map(|d| d.day).collect();
        assert_eq!(days, Weekday::ALL.to_vec());
        assert!(calendar.iter().all(|d| d.activities.is_empty()));
    }

    #[test]
    fn test_single_day_single_hour() {
        let calendar = assemble_calendar(&[listing("Yoga", &[Weekday::Lunes], &["09:00"])]).unwrap();
        assert_eq!(calendar.len(), 6);
        assert_eq!(
            calendar[0].activities,
            vec![ScheduledSlot {
                name: "Yoga".into(),
                trainer: "Ana García".into(),
                hour: "09:00".into(),
            }]
        );
        let total: usize = calendar.iter().map(|d| d.activities.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_one_slot_per_day_hour_pair() {
        let calendar = assemble_calendar(&[listing(
            "Crossfit",
            &[Weekday::Lunes, Weekday::Martes],
            &["09:00", "10:00"],
        )])
        .unwrap();
        let total: usize = calendar.iter().map(|d| d.activities.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(
            slots_on(&calendar, Weekday::Martes),
            vec![
                ("Crossfit".to_string(), "09:00".to_string()),
                ("Crossfit".to_string(), "10:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_hours_outside_grid_are_ignored() {
        let calendar = assemble_calendar(&[listing(
            "Late spin",
            &[Weekday::Viernes],
            &["07:00", "21:00", "08:30"],
        )])
        .unwrap();
        assert!(calendar.iter().all(|d| d.activities.is_empty()));
    }

    #[test]
    fn test_slots_sorted_by_hour_then_input_order() {
        let activities = vec![
            listing("Pilates", &[Weekday::Jueves], &["18:00"]),
            listing("Boxeo", &[Weekday::Jueves], &["18:00", "08:00"]),
            listing("Zumba", &[Weekday::Jueves], &["12:00"]),
        ];
        let calendar = assemble_calendar(&activities).unwrap();
        assert_eq!(
            slots_on(&calendar, Weekday::Jueves),
            vec![
                ("Boxeo".to_string(), "08:00".to_string()),
                ("Zumba".to_string(), "12:00".to_string()),
                ("Pilates".to_string(), "18:00".to_string()),
                ("Boxeo".to_string(), "18:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_trainer_fails_when_matched() {
        let mut orphan = listing("Spinning", &[Weekday::Sabado], &["10:00"]);
        orphan.trainer = None;
        let err = assemble_calendar(&[orphan]).unwrap_err();
        assert!(matches!(err, CalendarError::MissingTrainer { ref activity } if activity == "Spinning"));
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let activities = vec![
            listing("Yoga", &[Weekday::Lunes, Weekday::Miercoles], &["09:00", "19:00"]),
            listing("HIIT", &[Weekday::Miercoles], &["09:00"]),
        ];
        let first = serde_json::to_vec(&assemble_calendar(&activities).unwrap()).unwrap();
        let second = serde_json::to_vec(&assemble_calendar(&activities).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    struct FailingRepo;

    impl ActivityRepository for FailingRepo {
        fn fetch_all_with_trainer_names(&self) -> Result<Vec<ActivityListing>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("connection refused")))
        }
    }

    #[test]
    fn test_build_calendar_propagates_store_error() {
        assert!(matches!(
            build_calendar(&FailingRepo),
            Err(CalendarError::Store(_))
        ));
    }
}
