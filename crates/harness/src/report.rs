// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use crate::{
    catalog::Study,
    layout::Layout,
    result::{RunResult, RunStatus},
};
use benchutil::{
    color::{self, YELLOW},
    Color, Marker,
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};
use tracing::{info, warn};

const ABLATION_COLUMNS: &str = "project,config,exploit_type,detection_time,timeout,oom,status";
const OVERHEAD_COLUMNS: &str = "project,config,detection_time,max_state_corpus,final_memory_mb,avg_memory_mb,state_growth_rate,status";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepCounts {
    pub total: usize,
    pub completed: usize,
    pub timeouts: usize,
    pub errors: usize,
}

impl SweepCounts {
    pub fn from_results(results: &[RunResult]) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            completed: count(RunStatus::Completed),
            timeouts: results.iter().filter(|r| r.timeout).count(),
            errors: count(RunStatus::Error),
        }
    }
}

/// Quotes a CSV cell when it needs it.
fn cell(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_owned()
    }
}

fn decimal(value: Option<f64>) -> String {
    value.map(|value| format!("{value:.2}")).unwrap_or_default()
}

pub fn csv_header(study: Study) -> &'static str {
    match study {
        Study::Ablation => ABLATION_COLUMNS,
        Study::StateOverhead => OVERHEAD_COLUMNS,
    }
}

pub fn csv_row(result: &RunResult, study: Study) -> String {
    let detection = result.detection_text();
    let cells = match study {
        Study::Ablation => vec![
            cell(&result.project),
            cell(&result.config),
            cell(result.exploit_type.as_deref().unwrap_or_default()),
            cell(&detection),
            result.timeout.to_string(),
            result.oom.to_string(),
            result.status.to_string(),
        ],
        Study::StateOverhead => {
            let summary = result.summary.clone().unwrap_or_default();
            vec![
                cell(&result.project),
                cell(&result.config),
                cell(&detection),
                summary
                    .max_state_corpus
                    .map(|max| max.to_string())
                    .unwrap_or_default(),
                decimal(summary.final_memory_mb),
                decimal(summary.avg_memory_mb),
                decimal(summary.state_growth_rate),
                result.status.to_string(),
            ]
        }
    };
    cells.join(",")
}

/// Rewrites `path` with one row per result.
pub fn write_csv(path: &Path, results: &[RunResult], study: Study) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}", csv_header(study))?;
    for result in results {
        writeln!(file, "{}", csv_row(result, study))?;
    }
    file.flush()
}

/// Rewrites `path` with every field of every result.
pub fn write_json(path: &Path, results: &[RunResult]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, results)?;
    writeln!(file)?;
    file.flush()
}

pub fn load_json(path: &Path) -> io::Result<Vec<RunResult>> {
    let file = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(file)?)
}

pub fn print_table(results: &[RunResult], study: Study) {
    let rule = "=".repeat(70);
    println!("\n{rule}");
    match study {
        Study::Ablation => {
            println!("SUMMARY TABLE");
            println!("{rule}");
            println!("{:<25} {:<15} {:<15}", "Project", "Config", "Time");
        }
        Study::StateOverhead => {
            println!("RQ3 RESULTS - State Overhead Analysis");
            println!("{rule}");
            println!(
                "{:<25} {:<15} {:<15} {:<12} {:<10}",
                "Project", "Config", "Max Corpus", "Mem(MB)", "Time"
            );
        }
    }
    println!("{}", "-".repeat(70));

    for result in results {
        let time = match result.status {
            RunStatus::Error => format!("{:<10}", "error").red(),
            _ => color::when(
                result.timeout,
                format!("{:<10}", result.detection_text()),
                YELLOW,
            ),
        };
        match study {
            Study::Ablation => {
                println!("{:<25} {:<15} {time}", result.project, result.config)
            }
            Study::StateOverhead => {
                let summary = result.summary.clone().unwrap_or_default();
                let corpus = summary
                    .max_state_corpus
                    .map(|max| max.to_string())
                    .unwrap_or_else(|| "-".to_owned());
                let memory = summary
                    .avg_memory_mb
                    .map(|mb| format!("{mb:.1}"))
                    .unwrap_or_else(|| "-".to_owned());
                println!(
                    "{:<25} {:<15} {corpus:<15} {memory:<12} {time}",
                    result.project, result.config
                );
            }
        }
    }

    let counts = SweepCounts::from_results(results);
    println!("{rule}");
    println!(
        "Completed: {} | Timeouts: {} | Errors: {} | Total: {}",
        counts.completed, counts.timeouts, counts.errors, counts.total
    );
    println!("{rule}");
}

/// Writes the sweep's CSV and JSON and prints the summary table.
pub fn save(layout: &Layout, results: &[RunResult]) -> io::Result<()> {
    if results.is_empty() {
        warn!("{} No results to save", Marker::Fail);
        return Ok(());
    }
    layout.create()?;

    let csv = layout.csv_path();
    write_csv(&csv, results, layout.study)?;
    info!("{} Results saved to: {}", Marker::Done, csv.display());

    let json = layout.json_path();
    write_json(&json, results)?;
    info!("{} Detailed metrics saved to: {}", Marker::Done, json.display());

    print_table(results, layout.study);
    Ok(())
}
