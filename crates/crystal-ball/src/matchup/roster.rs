use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::domain::{Activity, AttributeMap, Competitor};

/// Immutable competitor and activity lookup tables, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    competitors: BTreeMap<String, Competitor>,
    activities: BTreeMap<String, Activity>,
}

/// Which data file a load failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
    Athletes,
    Activities,
}

impl std::fmt::Display for RosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterSource::Athletes => f.write_str("athletes"),
            RosterSource::Activities => f.write_str("activities"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unable to read {source_kind} file {}: {source}", .path.display())]
    Io {
        source_kind: RosterSource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {source_kind} data: {source}")]
    Parse {
        source_kind: RosterSource,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} entry has a blank name")]
    BlankName(RosterSource),
    #[error("duplicate athlete '{0}'")]
    DuplicateCompetitor(String),
    #[error("duplicate activity '{0}'")]
    DuplicateActivity(String),
    #[error("'{owner}' lists attribute '{attribute}' more than once (keys are case-insensitive)")]
    DuplicateAttribute { owner: String, attribute: String },
}

#[derive(Debug, Deserialize)]
struct AthletesFile {
    athletes: Vec<AthleteRecord>,
}

#[derive(Debug, Deserialize)]
struct AthleteRecord {
    name: String,
    #[serde(default)]
    attributes: AttributeMap,
}

#[derive(Debug, Deserialize)]
struct ActivitiesFile {
    activities: Vec<ActivityRecord>,
}

#[derive(Debug, Deserialize)]
struct ActivityRecord {
    activity: String,
    #[serde(default)]
    attributes: AttributeMap,
}

impl Roster {
    /// Index the given competitors and activities, rejecting duplicate names and
    /// lower-casing every attribute key.
    pub fn new(
        competitors: Vec<Competitor>,
        activities: Vec<Activity>,
    ) -> Result<Self, RosterError> {
        let mut roster = Roster::default();

        for competitor in competitors {
            let name = normalized_name(&competitor.name, RosterSource::Athletes)?;
            let attributes = lowercase_keys(&name, competitor.attributes)?;
            if roster.competitors.contains_key(&name) {
                return Err(RosterError::DuplicateCompetitor(name));
            }
            roster
                .competitors
                .insert(name.clone(), Competitor::new(name, attributes));
        }

        for activity in activities {
            let name = normalized_name(&activity.name, RosterSource::Activities)?;
            let weights = lowercase_keys(&name, activity.weights)?;
            if roster.activities.contains_key(&name) {
                return Err(RosterError::DuplicateActivity(name));
            }
            roster
                .activities
                .insert(name.clone(), Activity::new(name, weights));
        }

        Ok(roster)
    }

    /// Parse the `{"athletes": [...]}` and `{"activities": [...]}` documents.
    pub fn from_readers<A, B>(athletes: A, activities: B) -> Result<Self, RosterError>
    where
        A: Read,
        B: Read,
    {
        let athletes: AthletesFile =
            serde_json::from_reader(athletes).map_err(|source| RosterError::Parse {
                source_kind: RosterSource::Athletes,
                source,
            })?;
        let activities: ActivitiesFile =
            serde_json::from_reader(activities).map_err(|source| RosterError::Parse {
                source_kind: RosterSource::Activities,
                source,
            })?;

        let competitors = athletes
            .athletes
            .into_iter()
            .map(|record| Competitor::new(record.name, record.attributes))
            .collect();
        let activities = activities
            .activities
            .into_iter()
            .map(|record| Activity::new(record.activity, record.attributes))
            .collect();

        Self::new(competitors, activities)
    }

    pub fn from_paths<P, Q>(athletes_path: P, activities_path: Q) -> Result<Self, RosterError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let athletes = open(athletes_path.as_ref(), RosterSource::Athletes)?;
        let activities = open(activities_path.as_ref(), RosterSource::Activities)?;
        Self::from_readers(athletes, activities)
    }

    pub fn competitor(&self, name: &str) -> Option<&Competitor> {
        self.competitors.get(name)
    }

    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.get(name)
    }

    pub fn competitor_names(&self) -> Vec<String> {
        self.competitors.keys().cloned().collect()
    }

    pub fn activity_names(&self) -> Vec<String> {
        self.activities.keys().cloned().collect()
    }
}

fn open(path: &Path, source_kind: RosterSource) -> Result<BufReader<File>, RosterError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| RosterError::Io {
            source_kind,
            path: path.to_path_buf(),
            source,
        })
}

fn normalized_name(raw: &str, source_kind: RosterSource) -> Result<String, RosterError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RosterError::BlankName(source_kind));
    }
    Ok(name.to_string())
}

fn lowercase_keys(owner: &str, attributes: AttributeMap) -> Result<AttributeMap, RosterError> {
    let mut normalized = AttributeMap::new();
    for (key, value) in attributes {
        let key = key.trim().to_lowercase();
        if normalized.insert(key.clone(), value).is_some() {
            return Err(RosterError::DuplicateAttribute {
                owner: owner.to_string(),
                attribute: key,
            });
        }
    }
    Ok(normalized)
}
