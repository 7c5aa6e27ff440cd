use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::department::Department;
use crate::error::AdmissionError;

pub type FullName = String; // "first last", unique key of an applicant

pub const PRIORITY_COUNT: usize = 3;
const FIELD_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grades {
    pub physics: f64,
    pub chemistry: f64,
    pub math: f64,
    pub computer_science: f64,
    pub admission: f64, // admission exam
}

// Composite score per department, indexed by Department::index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores([f64; 5]);

impl Scores {
    pub fn from_grades(g: &Grades) -> Self {
        let mut scores = [0.0; 5];
        for d in Department::ALL.iter() {
            let subject = match d {
                Department::Physics => (g.physics + g.math) / 2.0,
                Department::Chemistry => g.chemistry,
                Department::Mathematics => g.math,
                Department::Engineering => (g.computer_science + g.math) / 2.0,
                Department::Biotech => (g.chemistry + g.physics) / 2.0,
            };
            scores[d.index()] = subject.max(g.admission);
        }
        Scores(scores)
    }

    pub fn get(&self, department: Department) -> f64 {
        self.0[department.index()]
    }
}

/// A parsed applicant. Scores and priorities are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    full_name: FullName,
    scores: Scores,
    priorities: [Option<Department>; PRIORITY_COUNT], // None: unrecognised department name
}

impl Applicant {
    pub fn new(
        first_name: &str,
        last_name: &str,
        grades: Grades,
        priorities: [Option<Department>; PRIORITY_COUNT],
    ) -> Self {
        Self {
            full_name: format!("{} {}", first_name, last_name),
            scores: Scores::from_grades(&grades),
            priorities,
        }
    }

    /// Parses `first last physics chemistry math cs admission dep1 dep2 dep3`.
    pub fn from_line(line: &str) -> Result<Self, AdmissionError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(AdmissionError::FieldCount {
                line: None,
                found: fields.len(),
            });
        }

        let grades = Grades {
            physics: parse_grade("physics", fields[2])?,
            chemistry: parse_grade("chemistry", fields[3])?,
            math: parse_grade("math", fields[4])?,
            computer_science: parse_grade("computer science", fields[5])?,
            admission: parse_grade("admission", fields[6])?,
        };
        let priorities = [
            Department::from_name(fields[7]),
            Department::from_name(fields[8]),
            Department::from_name(fields[9]),
        ];
        Ok(Self::new(fields[0], fields[1], grades, priorities))
    }

    // One applicant per line. Blank lines are skipped.
    pub fn from_path(path: &Path) -> Result<Vec<Self>, AdmissionError> {
        let file = File::open(path).map_err(|e| AdmissionError::file(path, e))?;
        let mut applicants = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| AdmissionError::file(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let applicant = Self::from_line(&line).map_err(|e| e.at_line(i + 1))?;
            if applicant.priorities.iter().any(Option::is_none) {
                debug!(line = i + 1, applicant = %applicant.full_name, "unknown department in priorities");
            }
            applicants.push(applicant);
        }
        Ok(applicants)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn score(&self, department: Department) -> f64 {
        self.scores.get(department)
    }

    // 1-based; anything past the last priority never matches.
    pub fn priority(&self, rank: usize) -> Option<Department> {
        rank.checked_sub(1)
            .and_then(|i| self.priorities.get(i))
            .copied()
            .flatten()
    }
}

fn parse_grade(field: &'static str, value: &str) -> Result<f64, AdmissionError> {
    match value.parse::<f64>() {
        Ok(grade) if grade.is_finite() => Ok(grade),
        _ => Err(AdmissionError::Grade {
            line: None,
            field,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_fields_and_scores() {
        let a = Applicant::from_line("Jane Doe 80 70 60 90 75 Physics Biotech Engineering").unwrap();
        assert_eq!(a.full_name(), "Jane Doe");
        assert_eq!(a.score(Department::Physics), 75.0); // max(70, 75)
        assert_eq!(a.score(Department::Chemistry), 75.0);
        assert_eq!(a.score(Department::Mathematics), 75.0);
        assert_eq!(a.score(Department::Engineering), 75.0);
        assert_eq!(a.score(Department::Biotech), 75.0);
        assert_eq!(a.priority(1), Some(Department::Physics));
        assert_eq!(a.priority(2), Some(Department::Biotech));
        assert_eq!(a.priority(3), Some(Department::Engineering));
    }

    #[test]
    fn subject_grades_beat_low_admission() {
        let a = Applicant::from_line("Ada King 81 64 92 97 50 Mathematics Physics Chemistry").unwrap();
        assert_eq!(a.score(Department::Physics), 86.5);
        assert_eq!(a.score(Department::Chemistry), 64.0);
        assert_eq!(a.score(Department::Mathematics), 92.0);
        assert_eq!(a.score(Department::Engineering), 94.5);
        assert_eq!(a.score(Department::Biotech), 72.5);
    }

    #[test]
    fn unknown_department_never_matches() {
        let a = Applicant::from_line("Ada King 81 64 92 97 50 Mathematics Law Chemistry").unwrap();
        assert_eq!(a.priority(2), None);
        assert_eq!(a.priority(0), None);
        assert_eq!(a.priority(4), None);
    }

    #[test]
    fn rejects_malformed_records() {
        match Applicant::from_line("Ada King 81 64 92 97 Mathematics Physics Chemistry") {
            Err(AdmissionError::FieldCount { line: None, found: 9 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        match Applicant::from_line("Ada King 81 x 92 97 50 Mathematics Physics Chemistry") {
            Err(AdmissionError::Grade { field: "chemistry", .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Applicant::from_line("Ada King 81 64 NaN 97 50 Mathematics Physics Chemistry").is_err());
        assert!(Applicant::from_line("Ada King 81 64 92 inf 50 Mathematics Physics Chemistry").is_err());
    }

    #[test]
    fn reads_file_and_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ada King 81 64 92 97 50 Mathematics Physics Chemistry").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Bob Fox 70 70 70 70 70 Physics Biotech Chemistry").unwrap();
        let applicants = Applicant::from_path(file.path()).unwrap();
        assert_eq!(applicants.len(), 2);

        writeln!(file, "Eve Moss 70 70 seventy 70 70 Physics Biotech Chemistry").unwrap();
        match Applicant::from_path(file.path()) {
            Err(AdmissionError::Grade { line: Some(4), field: "math", .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn field_count_error_names_file_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ada King 81 64 92 97 50 Mathematics Physics Chemistry").unwrap();
        writeln!(file, "Bob Fox 70 70 70 70 70 Physics Biotech Chemistry Extra").unwrap();
        let err = Applicant::from_path(file.path()).unwrap_err();
        assert!(matches!(err, AdmissionError::FieldCount { line: Some(2), found: 11 }));
        assert_eq!(err.to_string(), "line 2: expected 10 fields, found 11");

        let err = Applicant::from_line("Ada King").unwrap_err();
        assert_eq!(err.to_string(), "expected 10 fields, found 2");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Applicant::from_path(&dir.path().join("applicants.txt")).unwrap_err();
        assert!(matches!(err, AdmissionError::File { .. }));
    }
}
