#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An immutable swipe decision. Unique per (user_id, vacancy_id) — enforced
/// by a database constraint, not a pre-check.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SwipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vacancy_id: String,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serde_lowercase() {
        let d: SwipeDirection = serde_json::from_str(r#""right""#).unwrap();
        assert_eq!(d, SwipeDirection::Right);
        assert_eq!(serde_json::to_string(&SwipeDirection::Left).unwrap(), r#""left""#);
    }

    #[test]
    fn test_direction_as_str() {
        assert_eq!(SwipeDirection::Right.as_str(), "right");
        assert_eq!(SwipeDirection::Left.as_str(), "left");
    }
}
