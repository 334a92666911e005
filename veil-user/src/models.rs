use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{photos, users};

// --- Profile enums ---
// Stored as Varchar; parsed at the boundary so out-of-enum values are
// rejected before they reach the row.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassYear {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
}

impl std::str::FromStr for ClassYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freshman" => Ok(ClassYear::Freshman),
            "sophomore" => Ok(ClassYear::Sophomore),
            "junior" => Ok(ClassYear::Junior),
            "senior" => Ok(ClassYear::Senior),
            "graduate" => Ok(ClassYear::Graduate),
            _ => Err(format!("unknown year: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookingFor {
    Friends,
    Dating,
    Relationship,
    Networking,
}

impl std::str::FromStr for LookingFor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friends" => Ok(LookingFor::Friends),
            "dating" => Ok(LookingFor::Dating),
            "relationship" => Ok(LookingFor::Relationship),
            "networking" => Ok(LookingFor::Networking),
            _ => Err(format!("unknown looking_for: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    Male,
    Female,
    Everyone,
}

impl std::str::FromStr for GenderPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(GenderPreference::Male),
            "female" => Ok(GenderPreference::Female),
            "everyone" => Ok(GenderPreference::Everyone),
            _ => Err(format!("unknown preference: {s}")),
        }
    }
}

// --- User ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub college: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub interests: serde_json::Value,
    pub looking_for: Option<String>,
    pub preference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub college: String,
}

#[derive(Debug, AsChangeset, Default)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub interests: Option<serde_json::Value>,
    pub looking_for: Option<String>,
    pub preference: Option<String>,
}

/// Profile shape served to other users: no email, no internal timestamps.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub college: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub year: Option<String>,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub interests: serde_json::Value,
    pub looking_for: Option<String>,
    pub photos: Vec<PhotoView>,
}

impl PublicProfile {
    pub fn from_parts(user: User, photos: Vec<Photo>) -> Self {
        Self {
            id: user.id,
            college: user.college,
            name: user.name,
            bio: user.bio,
            age: user.age,
            year: user.year,
            branch: user.branch,
            gender: user.gender,
            interests: user.interests,
            looking_for: user.looking_for,
            photos: photos.into_iter().map(PhotoView::from).collect(),
        }
    }
}

// --- Photo ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = photos)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub storage_key: String,
    pub is_main: bool,
    pub liked_by: serde_json::Value,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = photos)]
pub struct NewPhoto {
    pub user_id: Uuid,
    pub url: String,
    pub storage_key: String,
    pub is_main: bool,
    pub liked_by: serde_json::Value,
    pub like_count: i32,
}

/// Photo shape in API responses: the voter list stays server-side, only the
/// derived count is exposed.
#[derive(Debug, Serialize)]
pub struct PhotoView {
    pub id: Uuid,
    pub url: String,
    pub is_main: bool,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Photo> for PhotoView {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            is_main: photo.is_main,
            like_count: photo.like_count,
            created_at: photo.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_enum_parsing() {
        assert_eq!("junior".parse::<ClassYear>().unwrap(), ClassYear::Junior);
        assert!("5th-year".parse::<ClassYear>().is_err());
        assert_eq!("everyone".parse::<GenderPreference>().unwrap(), GenderPreference::Everyone);
        assert!("all".parse::<GenderPreference>().is_err());
        assert_eq!("dating".parse::<LookingFor>().unwrap(), LookingFor::Dating);
        assert!("".parse::<Gender>().is_err());
    }
}
