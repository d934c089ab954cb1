//! Модуль конфигурации библиотеки transcript-anomaly
//!
//! Этот модуль содержит структуры для настройки порогов детектирования
//! и политики обработки партии сегментов.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscriptAnomalyError};

/// Пороговые значения для детектирования необычных сегментов
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Абсолютный порог "слишком быстрой" речи (слов в секунду)
    pub max_wps: f64,
    /// Необязательный абсолютный порог "слишком медленной" речи (слов в секунду)
    pub min_wps: Option<f64>,
    /// Минимальная длительность для правила "короткая фраза, долгая длительность" (секунды)
    pub min_wps_threshold_duration: f64,
    /// Максимальное количество слов для правила "короткая фраза, долгая длительность"
    pub min_wps_threshold_words: usize,
    /// Количество стандартных отклонений от среднего по корпусу,
    /// за пределами которого сегмент считается статистическим выбросом
    pub z_score_limit: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_wps: 15.0,
            min_wps: None,
            min_wps_threshold_duration: 4.0,
            min_wps_threshold_words: 3,
            z_score_limit: 2.0,
        }
    }
}

impl ThresholdConfig {
    /// Проверить корректность пороговых значений
    ///
    /// Некорректная конфигурация отклоняется до начала обработки,
    /// чтобы плохие пороги не приводили к бессмысленным оценкам.
    pub fn validate(&self) -> Result<()> {
        if !self.max_wps.is_finite() || self.max_wps <= 0.0 {
            return Err(TranscriptAnomalyError::Configuration(format!(
                "max_wps must be a positive finite number, got {}",
                self.max_wps
            )));
        }
        if let Some(min_wps) = self.min_wps {
            if !min_wps.is_finite() || min_wps < 0.0 {
                return Err(TranscriptAnomalyError::Configuration(format!(
                    "min_wps must be a non-negative finite number, got {}",
                    min_wps
                )));
            }
            if min_wps >= self.max_wps {
                return Err(TranscriptAnomalyError::Configuration(format!(
                    "min_wps ({}) must be less than max_wps ({})",
                    min_wps, self.max_wps
                )));
            }
        }
        if !self.min_wps_threshold_duration.is_finite() || self.min_wps_threshold_duration <= 0.0 {
            return Err(TranscriptAnomalyError::Configuration(format!(
                "min_wps_threshold_duration must be a positive finite number, got {}",
                self.min_wps_threshold_duration
            )));
        }
        if !self.z_score_limit.is_finite() || self.z_score_limit <= 0.0 {
            return Err(TranscriptAnomalyError::Configuration(format!(
                "z_score_limit must be a positive finite number, got {}",
                self.z_score_limit
            )));
        }
        Ok(())
    }
}

/// Конфигурация анализатора транскрипций
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Пороговые значения для детектирования
    pub thresholds: ThresholdConfig,
    /// Пропускать некорректные сегменты вместо прерывания всей партии
    pub skip_invalid_segments: bool,
    /// Копировать аудио файлы необычных сегментов в директорию отчета
    pub copy_audio_clips: bool,
    /// Директория для сохранения отчетов
    pub reports_dir: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            skip_invalid_segments: true,
            copy_audio_clips: true,
            reports_dir: "data/reports".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Проверить корректность конфигурации
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ThresholdConfig::default();
        assert_eq!(config.max_wps, 15.0);
        assert_eq!(config.min_wps, None);
        assert_eq!(config.min_wps_threshold_duration, 4.0);
        assert_eq!(config.min_wps_threshold_words, 3);
        assert_eq!(config.z_score_limit, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_max_wps_rejected() {
        let config = ThresholdConfig {
            max_wps: -1.0,
            ..ThresholdConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TranscriptAnomalyError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_z_score_limit_rejected() {
        let config = ThresholdConfig {
            z_score_limit: 0.0,
            ..ThresholdConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_wps_must_be_below_max_wps() {
        let config = ThresholdConfig {
            min_wps: Some(20.0),
            ..ThresholdConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ThresholdConfig {
            min_wps: Some(0.5),
            ..ThresholdConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
