use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Cricket,
    Badminton,
    Tennis,
    Basketball,
    TableTennis,
    Pickleball,
    Volleyball,
    Squash,
}

impl Sport {
    pub const ALL: [Sport; 9] = [
        Sport::Football,
        Sport::Cricket,
        Sport::Badminton,
        Sport::Tennis,
        Sport::Basketball,
        Sport::TableTennis,
        Sport::Pickleball,
        Sport::Volleyball,
        Sport::Squash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Cricket => "cricket",
            Sport::Badminton => "badminton",
            Sport::Tennis => "tennis",
            Sport::Basketball => "basketball",
            Sport::TableTennis => "table_tennis",
            Sport::Pickleball => "pickleball",
            Sport::Volleyball => "volleyball",
            Sport::Squash => "squash",
        }
    }

    /// Icon shown next to venues offering this sport.
    pub fn icon(self) -> &'static str {
        match self {
            Sport::Football => "soccer-ball",
            Sport::Cricket => "cricket-bat",
            Sport::Badminton => "shuttlecock",
            Sport::Tennis => "tennis-ball",
            Sport::Basketball => "basketball",
            Sport::TableTennis => "ping-pong",
            Sport::Pickleball => "pickleball-paddle",
            Sport::Volleyball => "volleyball",
            Sport::Squash => "squash-racket",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == s)
            .ok_or_else(|| BookingError::Validation(format!("Unknown sport: {s}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    /// User who listed the court; only they may publish its slot templates.
    pub owner_id: String,
    pub name: String,
    pub venue: String,
    pub sport: Sport,
    pub created_at: DateTime<Utc>,
}

impl Court {
    pub fn ensure_owned_by(&self, user_id: &str) -> BookingResult<()> {
        if self.owner_id != user_id {
            return Err(BookingError::Authorization(format!(
                "Court {} belongs to another user",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourtRequest {
    pub name: String,
    pub venue: String,
    pub sport: Sport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtResponse {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub venue: String,
    pub sport: Sport,
    pub icon: String,
}

impl From<Court> for CourtResponse {
    fn from(court: Court) -> Self {
        Self {
            id: court.id,
            owner_id: court.owner_id,
            icon: court.sport.icon().to_string(),
            name: court.name,
            venue: court.venue,
            sport: court.sport,
        }
    }
}
