//! Модуль обработки ошибок библиотеки transcript-anomaly
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при работе библиотеки.

use thiserror::Error;

/// Ошибки библиотеки transcript-anomaly
#[derive(Debug, Error)]
pub enum TranscriptAnomalyError {
    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректный сегмент (неположительная длительность и т.п.)
    #[error("Invalid segment '{segment_id}': {reason}")]
    InvalidSegment { segment_id: String, reason: String },

    /// Пустая партия сегментов
    #[error("Empty batch: corpus statistics require at least one segment")]
    EmptyBatch,

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ошибка парсинга CSV файла
    #[error("CSV parsing error: {0}")]
    CsvParsing(String),

    /// Ошибка записи отчета
    #[error("Report writing error: {0}")]
    ReportWriting(String),

    /// Файл не найден
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Неверный формат
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

impl TranscriptAnomalyError {
    /// Создать ошибку некорректного сегмента
    pub fn invalid_segment(segment_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            segment_id: segment_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<&str> for TranscriptAnomalyError {
    fn from(s: &str) -> Self {
        TranscriptAnomalyError::Other(s.to_string())
    }
}

impl From<String> for TranscriptAnomalyError {
    fn from(s: String) -> Self {
        TranscriptAnomalyError::Other(s)
    }
}

/// Тип Result для библиотеки transcript-anomaly
pub type Result<T> = std::result::Result<T, TranscriptAnomalyError>;
