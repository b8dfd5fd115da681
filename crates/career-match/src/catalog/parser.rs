use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::{CatalogError, CompensationRange, EmploymentType, JobId, JobPosting};
use crate::skills::{Skill, SkillSet};

const SKILL_SEPARATOR: char = ';';

pub(crate) fn parse_postings<R: Read>(reader: R) -> Result<Vec<JobPosting>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut postings = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CatalogRow = record.deserialize(Some(&headers))?;
        postings.push(row.into_posting(line)?);
    }

    Ok(postings)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u64,
    title: String,
    employer: String,
    #[serde(default)]
    location: String,
    employment_type: String,
    salary_min: u32,
    salary_max: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    currency: Option<String>,
    #[serde(default)]
    skills: String,
    posted_at: String,
    #[serde(default)]
    applicants: u32,
}

impl CatalogRow {
    fn into_posting(self, line: u64) -> Result<JobPosting, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidRow { line, reason };

        let employment_type = EmploymentType::parse(&self.employment_type)
            .ok_or_else(|| invalid(format!("unknown employment type '{}'", self.employment_type)))?;
        let posted_at = parse_timestamp(&self.posted_at)
            .ok_or_else(|| invalid(format!("unparseable posted_at '{}'", self.posted_at)))?;

        Ok(JobPosting {
            id: JobId(self.id),
            title: self.title,
            employer: self.employer,
            location: self.location,
            employment_type,
            compensation: CompensationRange {
                lower: self.salary_min,
                upper: self.salary_max,
                currency: self.currency.unwrap_or_else(|| "USD".to_string()),
            },
            required_skills: parse_skill_list(&self.skills),
            posted_at,
            applicants: self.applicants,
        })
    }
}

fn parse_skill_list(raw: &str) -> SkillSet {
    raw.split(SKILL_SEPARATOR)
        .filter_map(|fragment| Skill::parse(fragment).ok())
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}
