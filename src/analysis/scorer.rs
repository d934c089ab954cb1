//! Модуль оценки отклонения сегмента
//!
//! Этот модуль объединяет абсолютные пороги и статистическое расстояние
//! от базовых показателей корпуса в единую оценку отклонения и вердикт
//! "необычен / обычен" для каждого сегмента.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{self, ReasonCode};
use crate::analysis::stats::CorpusStats;
use crate::config::ThresholdConfig;
use crate::segment::metrics::SegmentMetrics;
use crate::segment::parser::RawSegment;

/// Сегмент с вычисленными метриками, оценкой отклонения и причинами
///
/// Создается один раз и далее не изменяется; сборщик отчета читает
/// его только для чтения.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSegment {
    /// Исходный сегмент
    pub segment: RawSegment,
    /// Метрики сегмента
    pub metrics: SegmentMetrics,
    /// Неотрицательная оценка отклонения от нормы корпуса
    pub deviation_score: f64,
    /// Признак необычности сегмента
    pub is_unusual: bool,
    /// Причины, по которым сегмент признан необычным
    pub reasons: BTreeSet<ReasonCode>,
}

/// Вычислить оценку отклонения и вердикт для одного сегмента
///
/// Оценка равна `|z|`, когда стандартное отклонение корпуса положительно.
/// Для вырожденного корпуса (std == 0) оценка определяется как
/// нормированное абсолютное превышение порога `max_wps`:
/// `max(0, wps - max_wps) / max_wps`, чтобы оставаться определенной.
pub fn score(
    metrics: &SegmentMetrics,
    stats: &CorpusStats,
    config: &ThresholdConfig,
) -> (f64, bool) {
    let wps = metrics.words_per_second;

    let (deviation_score, z_outlier) = if stats.std_wps > 0.0 {
        let z = (wps - stats.mean_wps) / stats.std_wps;
        (z.abs(), z.abs() > config.z_score_limit)
    } else {
        ((wps - config.max_wps).max(0.0) / config.max_wps, false)
    };

    // Сравнения строгие, без допуска: значение ровно на пороге не помечается
    let too_fast = wps > config.max_wps;
    // Пустые сегменты (wps == 0 по определению) оценивает правило короткой
    // фразы, а не порог min_wps
    let too_slow = metrics.word_count > 0
        && config.min_wps.map_or(false, |min_wps| wps < min_wps);
    let short_phrase = metrics.word_count <= config.min_wps_threshold_words
        && metrics.duration_seconds >= config.min_wps_threshold_duration;

    let is_unusual = too_fast || too_slow || short_phrase || z_outlier;

    (deviation_score, is_unusual)
}

/// Полностью оценить сегмент: оценка отклонения плюс классификация причин
///
/// Набор причин непуст тогда и только тогда, когда сегмент необычен.
pub fn score_segment(
    segment: RawSegment,
    metrics: SegmentMetrics,
    stats: &CorpusStats,
    config: &ThresholdConfig,
) -> ScoredSegment {
    let (deviation_score, is_unusual) = score(&metrics, stats, config);
    let reasons = if is_unusual {
        classifier::classify(&metrics, stats, config)
    } else {
        BTreeSet::new()
    };

    debug_assert_eq!(is_unusual, !reasons.is_empty());

    ScoredSegment {
        segment,
        metrics,
        deviation_score,
        is_unusual,
        reasons,
    }
}
