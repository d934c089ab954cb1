//! Модуль формирования отчетов
//!
//! Этот модуль содержит сборку сводки по партии и запись отчетов
//! в CSV, HTML и JSON файлы.

pub mod assembler;
pub mod audio;
pub mod csv;
pub mod html;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::json;

use crate::analysis::scorer::ScoredSegment;
use crate::error::Result;
use crate::report::assembler::BatchSummary;
use crate::SkippedSegment;

/// Пути к файлам, созданным при сохранении отчетов
#[derive(Debug, Clone)]
pub struct ReportPaths {
    /// CSV с необычными сегментами
    pub unusual_cases: PathBuf,
    /// CSV с полным анализом
    pub full_analysis: PathBuf,
    /// HTML отчет
    pub html_report: PathBuf,
    /// JSON сводка
    pub summary: PathBuf,
    /// Директория отчета
    pub report_directory: PathBuf,
}

/// Сохранить все отчеты по партии в директорию `<reports_dir>/<folder_name>`
///
/// Имена файлов включают метку времени, чтобы повторные запуски
/// не перезаписывали предыдущие отчеты.
pub fn save_reports<P: AsRef<Path>>(
    reports_dir: P,
    folder_name: &str,
    segments: &[ScoredSegment],
    summary: &BatchSummary,
    skipped: &[SkippedSegment],
) -> Result<ReportPaths> {
    let report_directory = reports_dir.as_ref().join(folder_name);
    std::fs::create_dir_all(&report_directory)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    let unusual_cases = report_directory.join(format!("unusual_cases_{}.csv", timestamp));
    csv::write_unusual_cases(&unusual_cases, segments)?;

    let full_analysis = report_directory.join(format!("full_analysis_{}.csv", timestamp));
    csv::write_full_analysis(&full_analysis, segments)?;

    let html_report = report_directory.join(format!("analysis_report_{}.html", timestamp));
    html::write_html_report(&html_report, segments, summary)?;

    let summary_path = report_directory.join(format!("summary_{}.json", timestamp));
    write_json_summary(&summary_path, segments, summary, skipped)?;

    log::info!(
        "Saved reports for '{}' to {}",
        folder_name,
        report_directory.display()
    );

    Ok(ReportPaths {
        unusual_cases,
        full_analysis,
        html_report,
        summary: summary_path,
        report_directory,
    })
}

/// Записать JSON сводку со списком необычных сегментов
fn write_json_summary(
    path: &Path,
    segments: &[ScoredSegment],
    summary: &BatchSummary,
    skipped: &[SkippedSegment],
) -> Result<()> {
    let unusual_cases: Vec<&ScoredSegment> = segments.iter().filter(|s| s.is_unusual).collect();
    let payload = json!({
        "summary": summary,
        "skipped_segments": skipped,
        "unusual_cases": unusual_cases,
    });

    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorer::score_segment;
    use crate::analysis::stats::aggregate;
    use crate::config::ThresholdConfig;
    use crate::report::assembler::assemble;
    use crate::segment::metrics;
    use crate::segment::parser::RawSegment;

    #[test]
    fn test_save_reports_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();

        let raws = vec![
            RawSegment::new("seg_000".to_string(), "hi".to_string(), 5.0, None),
            RawSegment::new(
                "seg_001".to_string(),
                "a perfectly ordinary sentence of speech".to_string(),
                3.0,
                None,
            ),
        ];
        let metrics_list: Vec<_> = raws.iter().map(|r| metrics::compute(r).unwrap()).collect();
        let stats = aggregate(&metrics_list).unwrap();
        let config = ThresholdConfig::default();
        let scored = raws
            .into_iter()
            .zip(metrics_list)
            .map(|(r, m)| score_segment(r, m, &stats, &config))
            .collect();
        let (segments, summary) = assemble(scored);

        let paths = save_reports(dir.path(), "video_01", &segments, &summary, &[]).unwrap();

        assert!(paths.unusual_cases.exists());
        assert!(paths.full_analysis.exists());
        assert!(paths.html_report.exists());
        assert!(paths.summary.exists());
        assert_eq!(paths.report_directory, dir.path().join("video_01"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();
        assert_eq!(json["summary"]["total_segments"], 2);
        assert_eq!(json["unusual_cases"].as_array().unwrap().len(), 1);
    }
}
