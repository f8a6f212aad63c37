//! Defect Report
//!
//! Builds the content of the report sent to the building company: which
//! defects go in, how they are grouped, and a summary. `render_text` gives a
//! plain-text body for an email draft; page layout is left to the caller.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{BuildingCompany, Defect, Priority, Status, Trackable};

/// Images listed per defect
pub const MAX_IMAGES_PER_DEFECT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    pub include_images: bool,
    pub include_closed: bool,
    pub group_by_priority: bool,
    pub include_summary: bool,
    pub company_name: String,
    pub company_email: String,
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_images: true,
            include_closed: false,
            group_by_priority: true,
            include_summary: true,
            company_name: String::new(),
            company_email: String::new(),
            title: "Defect Report".to_string(),
        }
    }
}

impl ReportConfig {
    /// Default settings addressed to `company`
    pub fn for_company(company: &BuildingCompany) -> Self {
        Self {
            company_name: company.name.clone(),
            company_email: company.email.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ReportSummary {
    pub fn of(defects: &[Defect]) -> Self {
        let mut summary = Self {
            total: defects.len(),
            ..Self::default()
        };
        for defect in defects {
            match defect.status {
                Status::Open => summary.open += 1,
                Status::InProgress => summary.in_progress += 1,
                Status::Closed => summary.closed += 1,
                Status::Unknown => {}
            }
            match defect.priority {
                Priority::High => summary.high += 1,
                Priority::Medium => summary.medium += 1,
                Priority::Low => summary.low += 1,
                Priority::Unknown => {}
            }
        }
        summary
    }
}

/// One group of defects; `priority` is `None` for an ungrouped report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub priority: Option<Priority>,
    pub defects: Vec<Defect>,
}

impl ReportSection {
    pub fn heading(&self) -> String {
        match self.priority {
            Some(priority) => format!("{} Priority Defects ({})", priority.display_name(), self.defects.len()),
            None => format!("All Defects ({})", self.defects.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectReport {
    pub title: String,
    pub generated_on: NaiveDate,
    pub company_name: String,
    pub company_email: String,
    pub summary: Option<ReportSummary>,
    pub sections: Vec<ReportSection>,
    pub include_images: bool,
}

impl DefectReport {
    pub fn build(defects: &[Defect], config: &ReportConfig, today: NaiveDate) -> Self {
        let included: Vec<Defect> = defects
            .iter()
            .filter(|d| config.include_closed || !d.status.is_closed())
            .cloned()
            .collect();

        let summary = config.include_summary.then(|| ReportSummary::of(&included));

        let sections = if config.group_by_priority {
            Priority::ALL
                .into_iter()
                .chain([Priority::Unknown])
                .map(|priority| ReportSection {
                    priority: Some(priority),
                    defects: included
                        .iter()
                        .filter(|d| d.priority == priority)
                        .cloned()
                        .collect(),
                })
                .filter(|section| !section.defects.is_empty())
                .collect()
        } else if included.is_empty() {
            Vec::new()
        } else {
            vec![ReportSection {
                priority: None,
                defects: included,
            }]
        };

        Self {
            title: config.title.clone(),
            generated_on: today,
            company_name: config.company_name.clone(),
            company_email: config.company_email.clone(),
            summary,
            sections,
            include_images: config.include_images,
        }
    }

    pub fn defect_count(&self) -> usize {
        self.sections.iter().map(|s| s.defects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.defect_count() == 0
    }

    pub fn email_subject(&self) -> String {
        if self.company_name.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.company_name)
        }
    }

    /// `defect_report_YYYYMMDD_HHMMSS.pdf`
    pub fn file_name(at: NaiveDateTime) -> String {
        format!("defect_report_{}.pdf", at.format("%Y%m%d_%H%M%S"))
    }

    /// Image paths listed for one defect
    pub fn images_for(defect: &Defect) -> Vec<&str> {
        defect
            .images
            .iter()
            .map(String::as_str)
            .chain(
                defect
                    .attachments
                    .iter()
                    .filter(|a| a.is_image())
                    .map(|a| a.uri.as_str()),
            )
            .take(MAX_IMAGES_PER_DEFECT)
            .collect()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.title)?;
        writeln!(out, "Generated on {}", self.generated_on.format("%B %d, %Y"))?;
        if !self.company_name.is_empty() {
            writeln!(out, "For: {}", self.company_name)?;
        }

        if let Some(summary) = &self.summary {
            writeln!(out)?;
            writeln!(out, "Report Summary")?;
            writeln!(out, "Total Defects: {}", summary.total)?;
            writeln!(
                out,
                "Open: {} | In Progress: {} | Closed: {}",
                summary.open, summary.in_progress, summary.closed
            )?;
            writeln!(
                out,
                "High Priority: {} | Medium Priority: {} | Low Priority: {}",
                summary.high, summary.medium, summary.low
            )?;
        }

        if self.sections.is_empty() {
            writeln!(out)?;
            writeln!(out, "No defects to report.")?;
        }

        for section in &self.sections {
            writeln!(out)?;
            writeln!(out, "{}", section.heading())?;
            for defect in &section.defects {
                self.write_defect(out, defect)?;
            }
        }
        Ok(())
    }

    fn write_defect(&self, out: &mut String, defect: &Defect) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "* {} [{}]", defect.location, defect.status.as_str())?;
        writeln!(out, "  Category: {}", defect.category.display_name())?;
        writeln!(out, "  Priority: {}", defect.priority.display_name())?;
        writeln!(out, "  Created: {}", defect.created_at)?;
        if let Some(due) = &defect.due_date {
            writeln!(out, "  Due: {}", due)?;
        }
        if let Some(assignee) = &defect.assigned_to {
            writeln!(out, "  Assigned to: {}", assignee)?;
        }
        if !defect.description.is_empty() {
            writeln!(out, "  Description: {}", defect.description.replace('\n', "\n    "))?;
        }
        if !defect.notes.is_empty() {
            writeln!(out, "  Notes: {}", defect.notes.replace('\n', "\n    "))?;
        }
        if !defect.sub_tasks.is_empty() {
            writeln!(
                out,
                "  Sub-tasks: {}/{} done",
                defect.sub_tasks.len() - defect.incomplete_sub_tasks(),
                defect.sub_tasks.len()
            )?;
        }
        for attachment in &defect.attachments {
            writeln!(out, "  Attachment: {} ({})", attachment.name, attachment.mime_type)?;
        }
        if self.include_images {
            for path in Self::images_for(defect) {
                let name = path.rsplit('/').next().unwrap_or(path);
                writeln!(out, "  Image: {}", name)?;
            }
        }
        Ok(())
    }
}
