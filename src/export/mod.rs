use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::Issue;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// Issue row as written to an export file
#[derive(Debug, Serialize)]
pub struct ExportedIssue {
    pub id: String,
    pub category: String,
    pub status: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub likes: u32,
    pub reports: u32,
    pub assigned_to: Option<String>,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Issue> for ExportedIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            category: issue.category.key().to_string(),
            status: issue.status.key().to_string(),
            description: issue.description.clone(),
            latitude: issue.location.map(|l| l.0),
            longitude: issue.location.map(|l| l.1),
            area: issue.area.clone(),
            city: issue.city.clone(),
            likes: issue.likes,
            reports: issue.reports,
            assigned_to: issue.assigned_to.clone(),
            image_url: issue.image_url.clone(),
            created_at: issue.created_at.to_rfc3339(),
            updated_at: issue.updated_at.to_rfc3339(),
        }
    }
}

/// Export issues to a file
pub fn export_issues(issues: &[Issue], output_path: &Path, format: ExportFormat) -> Result<usize> {
    let rows: Vec<ExportedIssue> = issues.iter().map(ExportedIssue::from).collect();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Json => export_json(&rows, output_path)?,
        ExportFormat::Csv => export_csv(&rows, output_path)?,
    }

    tracing::info!(count = rows.len(), path = %output_path.display(), "Issues exported");
    Ok(rows.len())
}

/// `issues-YYYYmmdd-HHMMSS.<ext>` inside `dir`
pub fn default_export_path(dir: &Path, format: ExportFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("issues-{}.{}", stamp, format.extension()))
}

fn export_json(rows: &[ExportedIssue], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(rows: &[ExportedIssue], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "id",
        "category",
        "status",
        "description",
        "latitude",
        "longitude",
        "area",
        "city",
        "likes",
        "reports",
        "assigned_to",
        "image_url",
        "created_at",
        "updated_at",
    ])?;

    for row in rows {
        wtr.write_record([
            &row.id,
            &row.category,
            &row.status,
            &row.description,
            &row.latitude.map(|v| v.to_string()).unwrap_or_default(),
            &row.longitude.map(|v| v.to_string()).unwrap_or_default(),
            row.area.as_deref().unwrap_or(""),
            row.city.as_deref().unwrap_or(""),
            &row.likes.to_string(),
            &row.reports.to_string(),
            row.assigned_to.as_deref().unwrap_or(""),
            &row.image_url,
            &row.created_at,
            &row.updated_at,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
