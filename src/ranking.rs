use std::cmp::Ordering;

use crate::applicant::Applicant;
use crate::department::Department;

// Higher score first, then full name ascending. Scores are finite, so partial_cmp
// never fails; 0.0 and -0.0 compare equal and fall through to the name.
pub fn compare(a: &Applicant, b: &Applicant, department: Department) -> Ordering {
    b.score(department)
        .partial_cmp(&a.score(department))
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.full_name().cmp(b.full_name()))
}

/// Applicants whose choice at `priority` is `department`, best first.
pub fn rank<'a, I>(applicants: I, department: Department, priority: usize) -> Vec<&'a Applicant>
where
    I: IntoIterator<Item = &'a Applicant>,
{
    let mut ranked: Vec<&Applicant> = applicants
        .into_iter()
        .filter(|a| a.priority(priority) == Some(department))
        .collect();
    ranked.sort_by(|a, b| compare(a, b, department));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics_applicant(line: &str) -> Applicant {
        Applicant::from_line(line).unwrap()
    }

    fn names(ranked: &[&Applicant]) -> Vec<String> {
        ranked.iter().map(|a| a.full_name().to_owned()).collect()
    }

    #[test]
    fn ties_break_on_full_name() {
        let applicants = vec![
            physics_applicant("Anna Lee 90 0 90 0 0 Physics Chemistry Biotech"),
            physics_applicant("Bob Fox 85 0 85 0 0 Physics Chemistry Biotech"),
            physics_applicant("Amy Lee 90 0 90 0 0 Physics Chemistry Biotech"),
        ];
        let ranked = rank(&applicants, Department::Physics, 1);
        assert_eq!(names(&ranked), vec!["Amy Lee", "Anna Lee", "Bob Fox"]);
    }

    #[test]
    fn filters_on_priority_level() {
        let applicants = vec![
            physics_applicant("Anna Lee 90 0 90 0 0 Physics Chemistry Biotech"),
            physics_applicant("Bob Fox 85 0 85 0 0 Chemistry Physics Biotech"),
        ];
        assert_eq!(names(&rank(&applicants, Department::Physics, 2)), vec!["Bob Fox"]);
        assert!(rank(&applicants, Department::Mathematics, 1).is_empty());
        assert!(rank(&applicants, Department::Physics, 4).is_empty());
    }

    #[test]
    fn signed_zero_scores_tie_on_name() {
        let applicants = vec![
            physics_applicant("Zed Zulu 0 0 0 0 0 Mathematics Chemistry Biotech"),
            physics_applicant("Amy Ames -0 -0 -0 -0 -0 Mathematics Chemistry Biotech"),
        ];
        let ranked = rank(&applicants, Department::Mathematics, 1);
        assert_eq!(names(&ranked), vec!["Amy Ames", "Zed Zulu"]);
    }

    #[test]
    fn higher_score_wins_regardless_of_name() {
        let a = physics_applicant("Zed Zulu 100 0 100 0 0 Physics Chemistry Biotech");
        let b = physics_applicant("Abe Ames 99 0 99 0 0 Physics Chemistry Biotech");
        assert_eq!(compare(&a, &b, Department::Physics), Ordering::Less);
        assert_eq!(compare(&b, &a, Department::Physics), Ordering::Greater);
        assert_eq!(compare(&a, &a, Department::Physics), Ordering::Equal);
    }
}
