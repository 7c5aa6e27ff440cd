use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::applicant::{Applicant, FullName};
use crate::department::{Department, Roster};
use crate::error::AdmissionError;
use crate::ranking;

/// Applicants not yet admitted anywhere, keyed by full name.
pub type Pool = BTreeMap<FullName, Applicant>;

/// Admissions per department, one entry per wave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    waves: Vec<[usize; 5]>,
}

impl RunSummary {
    pub fn waves(&self) -> usize {
        self.waves.len()
    }

    // wave is 1-based
    pub fn admitted(&self, wave: usize, department: Department) -> usize {
        wave.checked_sub(1)
            .and_then(|i| self.waves.get(i))
            .map_or(0, |counts| counts[department.index()])
    }

    pub fn total(&self) -> usize {
        self.waves.iter().flat_map(|w| w.iter()).sum()
    }
}

/// Seat allocation state for one run: the remaining pool and the five rosters.
///
/// Every applicant is either in the pool or in exactly one roster. Rosters
/// only grow and never exceed `capacity`.
#[derive(Debug, Clone)]
pub struct Enrolment {
    capacity: usize,
    rosters: Vec<Roster>, // indexed by Department::index
    pool: Pool,
}

impl Enrolment {
    pub fn new(capacity: usize, applicants: Vec<Applicant>) -> Self {
        let mut pool = Pool::new();
        for applicant in applicants {
            if let Some(previous) = pool.insert(applicant.full_name().to_owned(), applicant) {
                warn!(applicant = %previous.full_name(), "duplicate full name, keeping the later record");
            }
        }
        Self {
            capacity,
            rosters: Department::ALL.iter().map(|d| Roster::new(*d)).collect(),
            pool,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn roster(&self, department: Department) -> &Roster {
        &self.rosters[department.index()]
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Runs waves 1..=waves. Wave i considers each applicant's i-th choice.
    pub fn run(&mut self, waves: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        for wave in 1..=waves {
            let admitted = self.run_wave(wave);
            info!(
                wave,
                admitted = admitted.iter().sum::<usize>(),
                remaining = self.pool.len(),
                "wave finished"
            );
            summary.waves.push(admitted);
        }
        summary
    }

    fn run_wave(&mut self, priority: usize) -> [usize; 5] {
        let mut admitted = [0; 5];
        for department in Department::ENROLMENT_ORDER.iter() {
            admitted[department.index()] = self.fill(*department, priority);
        }
        admitted
    }

    // Admits the best pool applicants who chose `department` at `priority`,
    // up to the free seats. They leave the pool before the next department runs.
    fn fill(&mut self, department: Department, priority: usize) -> usize {
        let vacant = self.capacity.saturating_sub(self.roster(department).len());
        if vacant == 0 {
            return 0;
        }

        let chosen: Vec<FullName> = ranking::rank(self.pool.values(), department, priority)
            .into_iter()
            .take(vacant)
            .map(|a| a.full_name().to_owned())
            .collect();
        if chosen.is_empty() {
            return 0;
        }

        let students: Vec<Applicant> = chosen
            .iter()
            .filter_map(|name| self.pool.remove(name))
            .collect();
        let count = students.len();
        debug!(%department, priority, count, "admitted");
        self.rosters[department.index()].admit(students);
        count
    }

    /// Writes `<department>.txt` for every department into `dir`.
    ///
    /// All rosters are rendered before the first file is touched. A failed write
    /// leaves the files already written in place.
    pub fn write_rosters(&self, dir: &Path) -> Result<Vec<PathBuf>, AdmissionError> {
        let rendered: Vec<(PathBuf, String)> = Department::ENROLMENT_ORDER
            .iter()
            .map(|d| (dir.join(d.file_name()), self.roster(*d).lines()))
            .collect();

        fs::create_dir_all(dir).map_err(|e| AdmissionError::file(dir, e))?;
        let mut written = Vec::with_capacity(rendered.len());
        for (path, lines) in rendered {
            fs::write(&path, lines).map_err(|e| AdmissionError::file(&path, e))?;
            written.push(path);
        }
        Ok(written)
    }
}
