mod applicant;
mod config;
mod department;
mod enrolment;
mod error;
mod ranking;
mod telemetry;

use anyhow::Result;
use std::io;
use std::time::Instant;
use tracing::info;

use crate::applicant::Applicant;
use crate::config::Config;
use crate::department::DepartmentResult;
use crate::enrolment::Enrolment;

pub fn main() -> Result<()> {
    let begin = Instant::now();

    Config::from_args()?;
    let conf = Config::get()?;
    telemetry::init(&conf.log_level)?;
    info!(applicants = %conf.applicants_file.display(), waves = conf.waves, "configuration loaded");

    let capacity = match conf.capacity {
        Some(capacity) => capacity,
        None => {
            let stdin = io::stdin();
            config::read_capacity(stdin.lock())?
        }
    };

    let applicants = Applicant::from_path(&conf.applicants_file)?;
    info!(count = applicants.len(), capacity, "applicants loaded");

    let mut enrolment = Enrolment::new(capacity, applicants);
    let summary = enrolment.run(conf.waves);

    let written = enrolment.write_rosters(&conf.output_dir)?;
    info!(
        files = written.len(),
        admitted = summary.total(),
        unplaced = enrolment.pool().len(),
        "rosters written"
    );

    if conf.logging {
        let dir = conf.log_dir(capacity)?;
        let results = DepartmentResult::collect(&enrolment, &summary);
        DepartmentResult::write_csv(&dir.join("result.csv"), &results)?;
        info!(dir = %dir.display(), "result log written");
    }

    info!(elapsed = ?begin.elapsed(), "done");
    Ok(())
}
