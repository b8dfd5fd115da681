use chrono::{DateTime, Duration, Utc};

use super::{CompensationRange, EmploymentType, JobId, JobPosting};
use crate::skills::{Skill, SkillSet};

struct SeedPosting {
    id: u64,
    title: &'static str,
    employer: &'static str,
    location: &'static str,
    salary: (u32, u32),
    skills: &'static [&'static str],
    age_days: i64,
    applicants: u32,
}

const SEED_POSTINGS: &[SeedPosting] = &[
    SeedPosting {
        id: 1,
        title: "Senior Full-Stack Developer",
        employer: "TechCorp Innovation",
        location: "San Francisco, CA",
        salary: (140_000, 180_000),
        skills: &["JavaScript", "React", "Node.js", "TypeScript", "AWS"],
        age_days: 2,
        applicants: 45,
    },
    SeedPosting {
        id: 2,
        title: "Frontend Architect",
        employer: "Digital Solutions Inc",
        location: "Remote",
        salary: (130_000, 170_000),
        skills: &["React", "JavaScript", "TypeScript", "GraphQL"],
        age_days: 7,
        applicants: 67,
    },
    SeedPosting {
        id: 3,
        title: "React Developer",
        employer: "StartupXYZ",
        location: "New York, NY",
        salary: (120_000, 150_000),
        skills: &["React", "JavaScript", "Redux", "Node.js"],
        age_days: 3,
        applicants: 89,
    },
    SeedPosting {
        id: 4,
        title: "JavaScript Engineer",
        employer: "CloudTech Systems",
        location: "Austin, TX",
        salary: (110_000, 140_000),
        skills: &["JavaScript", "Node.js", "React", "MongoDB"],
        age_days: 5,
        applicants: 102,
    },
];

pub(super) fn postings(reference: DateTime<Utc>) -> Vec<JobPosting> {
    SEED_POSTINGS
        .iter()
        .map(|seed| JobPosting {
            id: JobId(seed.id),
            title: seed.title.to_string(),
            employer: seed.employer.to_string(),
            location: seed.location.to_string(),
            employment_type: EmploymentType::FullTime,
            compensation: CompensationRange {
                lower: seed.salary.0,
                upper: seed.salary.1,
                currency: "USD".to_string(),
            },
            required_skills: seed
                .skills
                .iter()
                .filter_map(|name| Skill::parse(name).ok())
                .collect::<SkillSet>(),
            posted_at: reference - Duration::days(seed.age_days),
            applicants: seed.applicants,
        })
        .collect()
}
