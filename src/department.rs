use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::applicant::Applicant;
use crate::enrolment::{Enrolment, RunSummary};
use crate::error::AdmissionError;
use crate::ranking;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    Mathematics,
    Physics,
    Biotech,
    Chemistry,
    Engineering,
}

impl Department {
    // Declaration order, matches index().
    pub const ALL: [Department; 5] = [
        Department::Mathematics,
        Department::Physics,
        Department::Biotech,
        Department::Chemistry,
        Department::Engineering,
    ];

    // Order in which departments take their pick within a wave.
    pub const ENROLMENT_ORDER: [Department; 5] = [
        Department::Mathematics,
        Department::Engineering,
        Department::Physics,
        Department::Biotech,
        Department::Chemistry,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Department::Mathematics => "Mathematics",
            Department::Physics => "Physics",
            Department::Biotech => "Biotech",
            Department::Chemistry => "Chemistry",
            Department::Engineering => "Engineering",
        }
    }

    // e.g. "mathematics.txt"
    pub fn file_name(self) -> String {
        format!("{}.txt", self.name().to_lowercase())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applicants admitted to one department. Kept in ranking order.
#[derive(Debug, Clone)]
pub struct Roster {
    department: Department,
    students: Vec<Applicant>,
}

impl Roster {
    pub fn new(department: Department) -> Self {
        Self {
            department,
            students: Vec::new(),
        }
    }

    pub fn department(&self) -> Department {
        self.department
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn applicants(&self) -> &[Applicant] {
        &self.students
    }

    pub fn admit(&mut self, applicants: Vec<Applicant>) {
        self.students.extend(applicants);
        let department = self.department;
        self.students.sort_by(|a, b| ranking::compare(a, b, department));
    }

    // "<full name> <score>" per line, no trailing newline.
    pub fn lines(&self) -> String {
        self.students
            .iter()
            .map(|s| format!("{} {:.2}", s.full_name(), s.score(self.department)))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned()
    }
}

// One row of result.csv
#[derive(Debug, Default, Clone, Serialize)]
pub struct DepartmentResult {
    pub department: String,
    pub capacity: usize,
    pub admitted: usize,
    pub first_wave: usize,
    pub second_wave: usize,
    pub third_wave: usize,
    pub later_waves: usize,
    pub lowest_score: Option<f64>, // empty when nobody was admitted
    pub vacant: usize,
}

impl DepartmentResult {
    pub fn new(roster: &Roster, capacity: usize, summary: &RunSummary) -> Self {
        let department = roster.department();
        let by_wave = |wave: usize| summary.admitted(wave, department);
        Self {
            department: department.name().to_owned(),
            capacity,
            admitted: roster.len(),
            first_wave: by_wave(1),
            second_wave: by_wave(2),
            third_wave: by_wave(3),
            later_waves: (4..=summary.waves()).map(by_wave).sum(),
            lowest_score: roster.applicants().last().map(|s| s.score(department)),
            vacant: capacity - roster.len(),
        }
    }

    pub fn collect(enrolment: &Enrolment, summary: &RunSummary) -> Vec<Self> {
        Department::ENROLMENT_ORDER
            .iter()
            .map(|d| Self::new(enrolment.roster(*d), enrolment.capacity(), summary))
            .collect()
    }

    pub fn write_csv(path: &Path, results: &[Self]) -> Result<(), AdmissionError> {
        let mut wtr = csv::Writer::from_path(path)?;
        for result in results {
            wtr.serialize(result)?;
        }
        wtr.flush().map_err(|e| AdmissionError::file(path, e))?;
        Ok(())
    }
}
