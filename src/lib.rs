//! Основной файл библиотеки transcript-anomaly
//!
//! Эта библиотека предоставляет инструменты для поиска необычных сегментов
//! в транскрипциях речи: по скорости речи, по соотношению текста и
//! длительности и по статистическому отклонению от корпуса партии.

pub mod analysis;
pub mod config;
pub mod error;
pub mod report;
pub mod segment;
pub mod utils;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::analysis::classifier::ReasonCode;
pub use crate::analysis::scorer::ScoredSegment;
pub use crate::analysis::stats::CorpusStats;
pub use crate::config::{AnalyzerConfig, ThresholdConfig};
pub use crate::error::{Result, TranscriptAnomalyError};
pub use crate::report::assembler::BatchSummary;
pub use crate::report::ReportPaths;
pub use crate::segment::metrics::SegmentMetrics;
pub use crate::segment::parser::RawSegment;

/// Сегмент, пропущенный из-за ошибки данных
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSegment {
    /// Идентификатор сегмента
    pub segment_id: String,
    /// Причина пропуска
    pub reason: String,
}

/// Результат анализа одной партии сегментов
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Оцененные сегменты в исходном порядке
    pub segments: Vec<ScoredSegment>,
    /// Сводка по партии
    pub summary: BatchSummary,
    /// Сегменты, пропущенные из-за ошибок данных
    pub skipped: Vec<SkippedSegment>,
}

/// Основная структура для работы с библиотекой
pub struct TranscriptAnalyzer {
    /// Конфигурация анализатора
    config: AnalyzerConfig,
}

impl TranscriptAnalyzer {
    /// Создать новый экземпляр TranscriptAnalyzer с указанной конфигурацией
    ///
    /// Конфигурация проверяется сразу: некорректные пороги отклоняются
    /// до начала какой-либо обработки.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Создать экземпляр TranscriptAnalyzer с настройками по умолчанию
    pub fn with_defaults() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    /// Текущая конфигурация анализатора
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Проанализировать партию сегментов в памяти
    ///
    /// Конвейер: метрики по каждому сегменту, статистика по корпусу,
    /// оценка отклонения, классификация причин, сборка сводки.
    /// Некорректные сегменты пропускаются или прерывают партию
    /// в зависимости от `skip_invalid_segments`.
    pub fn analyze_segments(&self, raw_segments: Vec<RawSegment>) -> Result<AnalysisOutcome> {
        log::info!("Analyzing batch of {} segments", raw_segments.len());

        // 1. Метрики по каждому сегменту
        let mut pairs = Vec::with_capacity(raw_segments.len());
        let mut skipped = Vec::new();
        for raw in raw_segments {
            match segment::metrics::compute(&raw) {
                Ok(metrics) => pairs.push((raw, metrics)),
                Err(e) if self.config.skip_invalid_segments => {
                    log::warn!("Skipping segment '{}': {}", raw.segment_id, e);
                    skipped.push(SkippedSegment {
                        segment_id: raw.segment_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    log::error!("Invalid segment aborted the batch: {}", e);
                    return Err(e);
                }
            }
        }

        // 2. Статистика по корпусу; пустая партия — фатальная ошибка,
        // частичный отчет без базовых показателей не формируется
        let metrics: Vec<SegmentMetrics> = pairs.iter().map(|(_, m)| m.clone()).collect();
        let stats = analysis::stats::aggregate(&metrics)?;
        log::info!(
            "Corpus baseline: mean {:.2} wps, std {:.2} wps over {} segments",
            stats.mean_wps,
            stats.std_wps,
            stats.n
        );

        // 3-4. Оценка отклонения и классификация причин
        let scored: Vec<ScoredSegment> = pairs
            .into_iter()
            .map(|(raw, m)| analysis::scorer::score_segment(raw, m, &stats, &self.config.thresholds))
            .collect();

        // 5. Сборка сводки
        let (segments, summary) = report::assembler::assemble(scored);
        log::info!(
            "Found {} unusual segments out of {} ({} skipped)",
            summary.unusual_count,
            summary.total_segments,
            skipped.len()
        );

        Ok(AnalysisOutcome {
            segments,
            summary,
            skipped,
        })
    }

    /// Проанализировать CSV файл с транскрипциями
    pub fn analyze_csv<P: AsRef<Path>>(&self, csv_path: P) -> Result<AnalysisOutcome> {
        log::info!("Analyzing CSV file: {}", csv_path.as_ref().display());

        let rows = segment::parser::parse_csv_file(&csv_path)?;
        let mut raw_segments = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();
        for row in rows {
            match row {
                Ok(raw) => raw_segments.push(raw),
                Err(e) if self.config.skip_invalid_segments => {
                    log::warn!("Skipping unparsable row: {}", e);
                    skipped.push(SkippedSegment {
                        segment_id: match &e {
                            TranscriptAnomalyError::InvalidSegment { segment_id, .. } => {
                                segment_id.clone()
                            }
                            _ => "unknown".to_string(),
                        },
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let mut outcome = self.analyze_segments(raw_segments)?;
        // Строки, отброшенные парсером, тоже попадают в список пропущенных
        outcome.skipped.extend(skipped);
        Ok(outcome)
    }

    /// Проанализировать папку с транскрипциями и сохранить отчеты
    ///
    /// Папка должна содержать файл `<folder_name>_transcripts.csv`.
    /// Отчеты сохраняются в `<reports_dir>/<folder_name>`; аудио клипы
    /// необычных сегментов копируются в поддиректорию `audio`.
    pub fn analyze_folder<P: AsRef<Path>>(
        &self,
        data_dir: P,
        folder_name: &str,
    ) -> Result<(AnalysisOutcome, ReportPaths)> {
        let csv_path = utils::folders::transcripts_csv_path(&data_dir, folder_name);
        let outcome = self.analyze_csv(&csv_path)?;

        let paths = report::save_reports(
            &self.config.reports_dir,
            folder_name,
            &outcome.segments,
            &outcome.summary,
            &outcome.skipped,
        )?;

        if self.config.copy_audio_clips {
            let folder_dir = data_dir.as_ref().join(folder_name);
            report::audio::copy_unusual_audio(
                &outcome.segments,
                &folder_dir,
                &paths.report_directory,
            )?;
        }

        Ok((outcome, paths))
    }

    /// Проанализировать все папки с транскрипциями в директории данных
    ///
    /// Успешно обработанные папки перемещаются в `archive_dir`, если он
    /// указан. Ошибка в одной папке логируется и не прерывает остальные.
    pub fn analyze_all_folders<P: AsRef<Path>>(
        &self,
        data_dir: P,
        archive_dir: Option<&Path>,
    ) -> Result<Vec<(String, AnalysisOutcome)>> {
        let folders = utils::folders::get_folders_to_analyze(&data_dir)?;
        if folders.is_empty() {
            log::info!("No folders found for analysis");
            return Ok(Vec::new());
        }
        log::info!("Found {} folders to analyze", folders.len());

        let mut results = Vec::new();
        for folder_name in folders {
            match self.analyze_folder(&data_dir, &folder_name) {
                Ok((outcome, _)) => {
                    if let Some(archive) = archive_dir {
                        utils::folders::archive_folder(&data_dir, archive, &folder_name)?;
                    }
                    results.push((folder_name, outcome));
                }
                Err(e) => {
                    log::error!("Error analyzing folder '{}': {}", folder_name, e);
                }
            }
        }

        Ok(results)
    }
}

/// Публичный API для удобного использования: анализ одного CSV файла
/// с настройками по умолчанию
pub fn analyze_transcripts<P: AsRef<Path>>(csv_path: P) -> Result<AnalysisOutcome> {
    TranscriptAnalyzer::with_defaults().analyze_csv(csv_path)
}
