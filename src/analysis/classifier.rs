//! Модуль классификации причин необычности сегмента
//!
//! Оценка отвечает на вопрос "необычен ли сегмент", классификация — "почему".
//! Этот модуль перечисляет сработавшие правила отдельными кодами причин.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::stats::CorpusStats;
use crate::config::ThresholdConfig;
use crate::segment::metrics::SegmentMetrics;

/// Код причины, по которой сегмент помечен как необычный
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReasonCode {
    /// Слишком быстрая речь
    TooFast,
    /// Слишком медленная речь
    TooSlow,
    /// Короткая фраза с долгой длительностью
    ShortPhraseLongDuration,
    /// Статистический выброс относительно корпуса
    StatisticalOutlier,
}

impl ReasonCode {
    /// Получить строковое представление кода причины
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFast => "too_fast",
            Self::TooSlow => "too_slow",
            Self::ShortPhraseLongDuration => "short_phrase_long_duration",
            Self::StatisticalOutlier => "statistical_outlier",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Определить набор причин, по которым сегмент необычен
///
/// Каждое условие добавляет свой код независимо; сегмент может нести
/// несколько причин. Пустой набор означает, что сегмент обычный.
pub fn classify(
    metrics: &SegmentMetrics,
    stats: &CorpusStats,
    config: &ThresholdConfig,
) -> BTreeSet<ReasonCode> {
    let mut reasons = BTreeSet::new();

    if metrics.words_per_second > config.max_wps {
        reasons.insert(ReasonCode::TooFast);
    }

    // Пустые сегменты не сравниваются с порогом min_wps: их wps равен 0
    // по определению, а не из-за медленной речи
    if let Some(min_wps) = config.min_wps {
        if metrics.word_count > 0 && metrics.words_per_second < min_wps {
            reasons.insert(ReasonCode::TooSlow);
        }
    }

    if metrics.word_count <= config.min_wps_threshold_words
        && metrics.duration_seconds >= config.min_wps_threshold_duration
    {
        reasons.insert(ReasonCode::ShortPhraseLongDuration);
    }

    // Статистические правила отключены для вырожденных партий (std == 0)
    if stats.std_wps > 0.0 {
        let z = (metrics.words_per_second - stats.mean_wps) / stats.std_wps;
        if z > config.z_score_limit {
            reasons.insert(ReasonCode::StatisticalOutlier);
            reasons.insert(ReasonCode::TooFast);
        } else if z < -config.z_score_limit {
            reasons.insert(ReasonCode::StatisticalOutlier);
            reasons.insert(ReasonCode::TooSlow);
        }
    }

    reasons
}
