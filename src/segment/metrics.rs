//! Модуль для вычисления метрик сегмента
//!
//! Этот модуль содержит функции для вычисления количества слов
//! и скорости речи по одному сегменту транскрипции.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscriptAnomalyError};
use crate::segment::parser::RawSegment;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Метрики одного сегмента транскрипции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentMetrics {
    /// Количество слов в тексте сегмента
    pub word_count: usize,
    /// Длительность сегмента в секундах
    pub duration_seconds: f64,
    /// Скорость речи в словах в секунду
    pub words_per_second: f64,
}

/// Подсчитать количество слов в тексте
///
/// Текст нормализуется: пробельные символы схлопываются, пустой
/// или состоящий из одних пробелов текст дает 0 слов.
pub fn count_words(text: &str) -> usize {
    WHITESPACE_RE
        .split(text.trim())
        .filter(|w| !w.is_empty())
        .count()
}

/// Вычислить метрики одного сегмента
///
/// Неположительная длительность считается ошибкой данных и возвращает
/// `InvalidSegment`; политика пропуска или прерывания партии остается
/// за вызывающей стороной.
pub fn compute(segment: &RawSegment) -> Result<SegmentMetrics> {
    if !segment.duration_seconds.is_finite() || segment.duration_seconds <= 0.0 {
        return Err(TranscriptAnomalyError::invalid_segment(
            segment.segment_id.clone(),
            format!(
                "duration_seconds must be positive, got {}",
                segment.duration_seconds
            ),
        ));
    }

    let word_count = count_words(&segment.text);
    let words_per_second = if word_count == 0 {
        0.0
    } else {
        word_count as f64 / segment.duration_seconds
    };

    Ok(SegmentMetrics {
        word_count,
        duration_seconds: segment.duration_seconds,
        words_per_second,
    })
}
