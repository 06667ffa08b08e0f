//! Festival data tables.
//!
//! Event rosters, the organising committee, the day schedule, and event
//! results live in TOML files in the content root. Every file is optional;
//! a missing file is an empty table and the corresponding page renders its
//! empty state. Unknown keys are rejected, same as `config.toml`.
//!
//! ```text
//! content/
//! ├── events.toml      # [[event]]  name, category, image?, description?
//! ├── committee.toml   # [[group]]  title + [[group.member]] name, role, photo?
//! ├── schedule.toml    # [[day]]    title, date? + [[day.slot]] time, event, venue?
//! └── points.toml      # [[event]]  name, category? + [[event.result]]
//! ```
//!
//! ## Standings are computed
//!
//! `points.toml` holds only per-event results. The department standings
//! table is derived by summing points per department, so there is no second
//! hand-maintained standings list that can drift out of sync with the
//! results it claims to summarize.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{file}: {source}")]
    Toml {
        file: String,
        source: toml::de::Error,
    },
    #[error("{file}: {message}")]
    Validation { file: String, message: String },
}

/// All data tables for one build. Missing files are empty tables.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FestivalData {
    #[serde(default)]
    pub events: EventsTable,
    #[serde(default)]
    pub committee: CommitteeTable,
    #[serde(default)]
    pub schedule: ScheduleTable,
    #[serde(default)]
    pub points: PointsTable,
}

/// Contents of `events.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsTable {
    #[serde(rename = "event")]
    pub events: Vec<Event>,
}

/// A single festival event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Event {
    pub name: String,
    /// Grouping shown as section headings ("Outdoor Sports", "E-sports").
    pub category: String,
    /// Optional card image, relative to the content root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Contents of `committee.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitteeTable {
    #[serde(rename = "group")]
    pub groups: Vec<CommitteeGroup>,
}

/// A committee section (patrons, coordinators, volunteers, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitteeGroup {
    pub title: String,
    #[serde(default, rename = "member")]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Member {
    pub name: String,
    pub role: String,
    /// Optional portrait, relative to the content root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Contents of `schedule.toml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleTable {
    #[serde(rename = "day")]
    pub days: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleDay {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "slot")]
    pub slots: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSlot {
    pub time: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// Contents of `points.toml`: results only, standings are derived.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointsTable {
    #[serde(rename = "event")]
    pub events: Vec<EventResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "result")]
    pub results: Vec<Placement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    /// Placement label: "1st", "2nd", "Participation", ...
    pub position: String,
    /// Player or team names as displayed.
    pub players: String,
    pub department: String,
    pub points: u32,
}

/// One row of the derived standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub department: String,
    pub points: u32,
}

impl PointsTable {
    /// Derive department standings by summing placement points.
    ///
    /// Sorted by points descending; departments with equal points are
    /// ordered by name so the table is stable between builds.
    pub fn standings(&self) -> Vec<Standing> {
        let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
        for event in &self.events {
            for placement in &event.results {
                *totals.entry(placement.department.as_str()).or_default() +=
                    placement.points;
            }
        }
        let mut standings: Vec<Standing> = totals
            .into_iter()
            .map(|(department, points)| Standing {
                department: department.to_string(),
                points,
            })
            .collect();
        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.department.cmp(&b.department))
        });
        standings
    }
}

/// Load all data tables from the content root.
pub fn load_data(root: &Path) -> Result<FestivalData, DataError> {
    Ok(FestivalData {
        events: load_table(root, "events.toml")?,
        committee: load_table(root, "committee.toml")?,
        schedule: load_table(root, "schedule.toml")?,
        points: load_table(root, "points.toml")?,
    })
}

fn load_table<T: Default + for<'de> Deserialize<'de>>(
    root: &Path,
    file: &str,
) -> Result<T, DataError> {
    let path = root.join(file);
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|source| DataError::Toml {
        file: file.to_string(),
        source,
    })
}

/// Validate loaded data beyond what the type shapes enforce.
///
/// `check` runs this so a typo'd roster fails the build before any HTML
/// is written.
pub fn validate(data: &FestivalData) -> Result<(), DataError> {
    let fail = |file: &str, message: String| {
        Err(DataError::Validation {
            file: file.to_string(),
            message,
        })
    };
    for event in &data.events.events {
        if event.name.trim().is_empty() {
            return fail("events.toml", "event name must not be empty".into());
        }
    }
    for group in &data.committee.groups {
        for member in &group.members {
            if member.name.trim().is_empty() {
                return fail(
                    "committee.toml",
                    format!("member with empty name in group '{}'", group.title),
                );
            }
        }
    }
    for event in &data.points.events {
        for placement in &event.results {
            if placement.department.trim().is_empty() {
                return fail(
                    "points.toml",
                    format!("placement with empty department in '{}'", event.name),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_files_are_empty_tables() {
        let tmp = TempDir::new().unwrap();
        let data = load_data(tmp.path()).unwrap();
        assert!(data.events.events.is_empty());
        assert!(data.committee.groups.is_empty());
        assert!(data.schedule.days.is_empty());
        assert!(data.points.events.is_empty());
    }

    #[test]
    fn parse_events_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("events.toml"),
            r#"
[[event]]
name = "Cricket"
category = "Outdoor Sports"
image = "assets/events/cricket.jpg"

[[event]]
name = "Chess"
category = "Indoor Sports"
"#,
        )
        .unwrap();

        let data = load_data(tmp.path()).unwrap();
        assert_eq!(data.events.events.len(), 2);
        assert_eq!(data.events.events[0].name, "Cricket");
        assert_eq!(
            data.events.events[0].image.as_deref(),
            Some("assets/events/cricket.jpg")
        );
        assert!(data.events.events[1].image.is_none());
    }

    #[test]
    fn parse_committee_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("committee.toml"),
            r#"
[[group]]
title = "Patron"

[[group.member]]
name = "Prof. R. M. Pant"
role = "Vice Chancellor"
photo = "assets/team/vc.jpg"

[[group]]
title = "Coordinators"

[[group.member]]
name = "N. Barman"
role = "PhD Scholar, Department of Physics"
"#,
        )
        .unwrap();

        let data = load_data(tmp.path()).unwrap();
        assert_eq!(data.committee.groups.len(), 2);
        assert_eq!(data.committee.groups[0].members[0].role, "Vice Chancellor");
        assert!(data.committee.groups[1].members[0].photo.is_none());
    }

    #[test]
    fn parse_schedule_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("schedule.toml"),
            r#"
[[day]]
title = "Day 1"
date = "2 March"

[[day.slot]]
time = "09:00"
event = "Opening Ceremony"
venue = "Main Auditorium"

[[day.slot]]
time = "11:00"
event = "Chess (Round 1)"
"#,
        )
        .unwrap();

        let data = load_data(tmp.path()).unwrap();
        assert_eq!(data.schedule.days.len(), 1);
        assert_eq!(data.schedule.days[0].slots.len(), 2);
        assert_eq!(data.schedule.days[0].slots[1].venue, None);
    }

    #[test]
    fn unknown_key_rejected_with_file_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("events.toml"),
            r#"
[[event]]
name = "Cricket"
categry = "Outdoor Sports"
"#,
        )
        .unwrap();

        let err = load_data(tmp.path()).unwrap_err();
        assert!(matches!(err, DataError::Toml { ref file, .. } if file == "events.toml"));
    }

    #[test]
    fn standings_sum_points_per_department() {
        let table: PointsTable = toml::from_str(
            r#"
[[event]]
name = "Carrom (Men's Doubles)"
category = "Indoor Sports"

[[event.result]]
position = "1st"
players = "Aman and Nethai"
department = "Physics"
points = 10

[[event.result]]
position = "2nd"
players = "Giriraj and Pradeep"
department = "Chemistry"
points = 7

[[event]]
name = "Chess"

[[event.result]]
position = "1st"
players = "S. Biswas"
department = "Physics"
points = 10
"#,
        )
        .unwrap();

        let standings = table.standings();
        assert_eq!(
            standings,
            vec![
                Standing {
                    department: "Physics".to_string(),
                    points: 20
                },
                Standing {
                    department: "Chemistry".to_string(),
                    points: 7
                },
            ]
        );
    }

    #[test]
    fn standings_ties_break_by_name() {
        let table: PointsTable = toml::from_str(
            r#"
[[event]]
name = "Quiz"

[[event.result]]
position = "1st"
players = "Team"
department = "Zoology"
points = 5

[[event.result]]
position = "2nd"
players = "Team"
department = "Botany"
points = 5
"#,
        )
        .unwrap();

        let standings = table.standings();
        assert_eq!(standings[0].department, "Botany");
        assert_eq!(standings[1].department, "Zoology");
    }

    #[test]
    fn empty_points_means_empty_standings() {
        assert!(PointsTable::default().standings().is_empty());
    }

    #[test]
    fn validate_rejects_empty_event_name() {
        let mut data = FestivalData::default();
        data.events.events.push(Event {
            name: "  ".to_string(),
            category: "Sports".to_string(),
            image: None,
            description: None,
        });
        assert!(matches!(
            validate(&data),
            Err(DataError::Validation { .. })
        ));
    }

    #[test]
    fn validate_accepts_empty_tables() {
        assert!(validate(&FestivalData::default()).is_ok());
    }
}
