use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RowError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Roads,
    Drainage,
    Garbage,
    Streetlights,
    Water,
    Encroachment,
    Other,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 7] = [
        IssueCategory::Roads,
        IssueCategory::Drainage,
        IssueCategory::Garbage,
        IssueCategory::Streetlights,
        IssueCategory::Water,
        IssueCategory::Encroachment,
        IssueCategory::Other,
    ];

    /// Column value, also used as the translation key
    pub fn key(&self) -> &'static str {
        match self {
            IssueCategory::Roads => "roads",
            IssueCategory::Drainage => "drainage",
            IssueCategory::Garbage => "garbage",
            IssueCategory::Streetlights => "streetlights",
            IssueCategory::Water => "water",
            IssueCategory::Encroachment => "encroachment",
            IssueCategory::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            IssueCategory::Roads => "🛣",
            IssueCategory::Drainage => "🚰",
            IssueCategory::Garbage => "🗑",
            IssueCategory::Streetlights => "💡",
            IssueCategory::Water => "💧",
            IssueCategory::Encroachment => "🏗",
            IssueCategory::Other => "📋",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == value)
    }

    pub fn department(&self) -> &'static Department {
        Department::for_category(*self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum IssueStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [
        IssueStatus::Pending,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            IssueStatus::Pending => "pending",
            IssueStatus::InProgress => "inProgress",
            IssueStatus::Resolved => "resolved",
        }
    }

    /// Accepts the snake_case spelling some rows were written with.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(IssueStatus::Pending),
            "inProgress" | "in_progress" => Some(IssueStatus::InProgress),
            "resolved" => Some(IssueStatus::Resolved),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            IssueStatus::Pending => IssueStatus::InProgress,
            IssueStatus::InProgress => IssueStatus::Resolved,
            IssueStatus::Resolved => IssueStatus::Pending,
        }
    }
}

/// Municipal department an issue category is routed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub category: IssueCategory,
    pub name: &'static str,
    pub contact: &'static str,
}

static DEPARTMENTS: [Department; 7] = [
    Department {
        category: IssueCategory::Roads,
        name: "Roads & Infrastructure Dept.",
        contact: "roads@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Drainage,
        name: "Drainage & Sewage Dept.",
        contact: "drainage@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Garbage,
        name: "Solid Waste Management",
        contact: "swm@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Streetlights,
        name: "Electrical Division",
        contact: "electrical@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Water,
        name: "Water Supply Dept.",
        contact: "water@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Encroachment,
        name: "Town Planning Dept.",
        contact: "planning@hdmc.gov.in",
    },
    Department {
        category: IssueCategory::Other,
        name: "General Administration",
        contact: "admin@hdmc.gov.in",
    },
];

impl Department {
    pub fn all() -> &'static [Department] {
        &DEPARTMENTS
    }

    pub fn for_category(category: IssueCategory) -> &'static Department {
        // DEPARTMENTS is declared in IssueCategory::ALL order
        let index = IssueCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(DEPARTMENTS.len() - 1);
        &DEPARTMENTS[index]
    }
}

/// Issue row as returned by `select=*` on the issues table
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRow {
    pub id: String,
    #[serde(default)]
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub status: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub reports: i64,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

/// A validated issue
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    pub image_url: String,
    pub category: IssueCategory,
    pub description: String,
    pub location: Option<(f64, f64)>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub status: IssueStatus,
    pub likes: u32,
    pub reports: u32,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Option<String>,
}

impl TryFrom<IssueRow> for Issue {
    type Error = RowError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let category =
            IssueCategory::parse(&row.category).ok_or(RowError::UnknownCategory(row.category))?;
        let status = IssueStatus::parse(&row.status).ok_or(RowError::UnknownStatus(row.status))?;

        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(RowError::CoordinatesOutOfRange(lat, lon));
                }
                Some((lat, lon))
            }
            _ => None,
        };

        Ok(Issue {
            id: row.id,
            image_url: row.image_url,
            category,
            description: row.description,
            location,
            area: row.area.filter(|s| !s.is_empty()),
            city: row.city.filter(|s| !s.is_empty()),
            status,
            likes: counter("likes", row.likes)?,
            reports: counter("reports", row.reports)?,
            assigned_to: row.assigned_to.filter(|s| !s.is_empty()),
            created_at: row.created_at,
            updated_at: row.updated_at.unwrap_or(row.created_at),
            user_id: row.user_id,
        })
    }
}

fn counter(field: &'static str, value: i64) -> Result<u32, RowError> {
    u32::try_from(value).map_err(|_| RowError::NegativeCounter { field, value })
}

impl Issue {
    /// "area, city" when the issue was geocoded
    pub fn address(&self) -> Option<String> {
        self.area.as_ref().map(|area| match &self.city {
            Some(city) => format!("{}, {}", area, city),
            None => area.clone(),
        })
    }

    /// Address if known, otherwise the raw coordinates
    pub fn location_label(&self) -> Option<String> {
        self.address().or_else(|| {
            self.location
                .map(|(lat, lon)| format!("{:.4}, {:.4}", lat, lon))
        })
    }
}

/// Insert payload for the issues table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewIssue {
    pub image_url: String,
    pub category: IssueCategory,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub status: IssueStatus,
    pub likes: u32,
    pub reports: u32,
    pub assigned_to: String,
    pub user_id: Option<String>,
}

/// Partial update; only the set fields are sent
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<u32>,
}

impl IssuePatch {
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn likes(likes: u32) -> Self {
        Self {
            likes: Some(likes),
            ..Default::default()
        }
    }

    pub fn reports(reports: u32) -> Self {
        Self {
            reports: Some(reports),
            ..Default::default()
        }
    }

    pub fn apply(&self, issue: &mut Issue) {
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(likes) = self.likes {
            issue.likes = likes;
        }
        if let Some(reports) = self.reports {
            issue.reports = reports;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_row() -> IssueRow {
        serde_json::from_str(
            r#"{
                "id": "5b1c6a5e-0000-4000-8000-000000000001",
                "image_url": "https://x.supabase.co/storage/v1/object/public/issue-images/anonymous/1.jpg",
                "category": "roads",
                "description": "Pothole near the bus stand",
                "latitude": 15.3647,
                "longitude": 75.124,
                "area": "Vidyanagar",
                "city": "Hubballi",
                "status": "inProgress",
                "likes": 4,
                "reports": 1,
                "assigned_to": "Roads & Infrastructure Dept.",
                "created_at": "2024-11-02T09:15:00.123456+00:00",
                "updated_at": null,
                "user_id": null
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_row_converts_to_issue() {
        let issue = Issue::try_from(sample_row()).unwrap();
        assert_eq!(issue.category, IssueCategory::Roads);
        assert_eq!(issue.status, IssueStatus::InProgress);
        assert_eq!(issue.location, Some((15.3647, 75.124)));
        assert_eq!(issue.updated_at, issue.created_at);
        assert_eq!(issue.address().as_deref(), Some("Vidyanagar, Hubballi"));
    }

    #[test]
    fn test_row_rejects_unknown_values() {
        let mut row = sample_row();
        row.category = "potholes".to_string();
        assert_eq!(
            Issue::try_from(row).unwrap_err(),
            RowError::UnknownCategory("potholes".to_string())
        );

        let mut row = sample_row();
        row.latitude = Some(123.0);
        assert!(matches!(
            Issue::try_from(row),
            Err(RowError::CoordinatesOutOfRange(..))
        ));

        let mut row = sample_row();
        row.likes = -1;
        assert!(matches!(
            Issue::try_from(row),
            Err(RowError::NegativeCounter { field: "likes", .. })
        ));
    }

    #[test]
    fn test_location_label_falls_back_to_coordinates() {
        let mut row = sample_row();
        row.area = None;
        let issue = Issue::try_from(row).unwrap();
        assert_eq!(issue.location_label().as_deref(), Some("15.3647, 75.1240"));

        let mut row = sample_row();
        row.area = None;
        row.latitude = None;
        let issue = Issue::try_from(row).unwrap();
        assert_eq!(issue.location_label(), None);
    }

    #[test]
    fn test_department_lookup() {
        for category in IssueCategory::ALL {
            assert_eq!(Department::for_category(category).category, category);
        }
        assert_eq!(
            IssueCategory::Garbage.department().name,
            "Solid Waste Management"
        );
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"inProgress\""
        );
        assert_eq!(IssueStatus::parse("in_progress"), Some(IssueStatus::InProgress));

        let patch = IssuePatch::likes(5);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"likes":5}"#);
    }
}
