//! Модуль сборки итоговых структур отчета
//!
//! Этот модуль сводит все оцененные сегменты в сводку по партии,
//! не выполняя никакого файлового вывода.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::ReasonCode;
use crate::analysis::scorer::ScoredSegment;

/// Сводка по одной партии сегментов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Общее количество проанализированных сегментов
    pub total_segments: usize,
    /// Количество необычных сегментов
    pub unusual_count: usize,
    /// Средняя скорость речи по корпусу (слов в секунду)
    pub mean_wps: f64,
    /// Стандартное отклонение скорости речи по корпусу
    pub std_wps: f64,
    /// Гистограмма причин: сколько сегментов несут каждый код
    pub reason_histogram: BTreeMap<ReasonCode, usize>,
}

/// Собрать сводку по партии из оцененных сегментов
///
/// Порядок сегментов сохраняется для последующего рендеринга.
/// Сегмент с несколькими причинами учитывается в нескольких корзинах
/// гистограммы.
pub fn assemble(scored: Vec<ScoredSegment>) -> (Vec<ScoredSegment>, BatchSummary) {
    let total_segments = scored.len();
    let unusual_count = scored.iter().filter(|s| s.is_unusual).count();

    let (mean_wps, std_wps) = if total_segments == 0 {
        (0.0, 0.0)
    } else {
        let n = total_segments as f64;
        let mean = scored
            .iter()
            .map(|s| s.metrics.words_per_second)
            .sum::<f64>()
            / n;
        let variance = scored
            .iter()
            .map(|s| (s.metrics.words_per_second - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, variance.max(0.0).sqrt())
    };

    let mut reason_histogram = BTreeMap::new();
    for segment in &scored {
        for reason in &segment.reasons {
            *reason_histogram.entry(*reason).or_insert(0) += 1;
        }
    }

    let summary = BatchSummary {
        total_segments,
        unusual_count,
        mean_wps,
        std_wps,
        reason_histogram,
    };

    (scored, summary)
}
