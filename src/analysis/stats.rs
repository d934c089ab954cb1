//! Модуль статистики по корпусу сегментов
//!
//! Этот модуль содержит функции для вычисления распределительных
//! базовых показателей (среднее и стандартное отклонение) по партии.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscriptAnomalyError};
use crate::segment::metrics::SegmentMetrics;

/// Статистика по корпусу сегментов одной партии
///
/// Стандартное отклонение вычисляется по формуле генеральной совокупности
/// (деление на n). Для партии из одного сегмента отклонение равно 0,
/// что отключает статистические правила для вырожденных партий.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Средняя скорость речи (слов в секунду)
    pub mean_wps: f64,
    /// Стандартное отклонение скорости речи
    pub std_wps: f64,
    /// Средняя длительность сегмента
    pub mean_duration: f64,
    /// Стандартное отклонение длительности
    pub std_duration: f64,
    /// Среднее количество слов в сегменте
    pub mean_word_count: f64,
    /// Стандартное отклонение количества слов
    pub std_word_count: f64,
    /// Количество сегментов в партии
    pub n: usize,
}

/// Вычислить статистику по корпусу из метрик всех сегментов партии
///
/// Результат зависит только от набора значений: перестановка сегментов
/// меняет его не более чем на ошибку округления суммирования.
/// Пустая партия возвращает `EmptyBatch`: частичный отчет без валидной
/// статистики не имеет смысла.
pub fn aggregate(metrics: &[SegmentMetrics]) -> Result<CorpusStats> {
    if metrics.is_empty() {
        return Err(TranscriptAnomalyError::EmptyBatch);
    }

    let n = metrics.len();
    let (mean_wps, std_wps) = mean_std(metrics.iter().map(|m| m.words_per_second), n);
    let (mean_duration, std_duration) = mean_std(metrics.iter().map(|m| m.duration_seconds), n);
    let (mean_word_count, std_word_count) =
        mean_std(metrics.iter().map(|m| m.word_count as f64), n);

    Ok(CorpusStats {
        mean_wps,
        std_wps,
        mean_duration,
        std_duration,
        mean_word_count,
        std_word_count,
        n,
    })
}

/// Среднее и стандартное отклонение генеральной совокупности за два прохода
///
/// Дисперсия ограничивается снизу нулем: из-за ошибок округления
/// она не должна становиться отрицательной.
fn mean_std(values: impl Iterator<Item = f64> + Clone, n: usize) -> (f64, f64) {
    let mean = values.clone().sum::<f64>() / n as f64;
    if n <= 1 {
        return (mean, 0.0);
    }

    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, variance.max(0.0).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(word_count: usize, duration: f64) -> SegmentMetrics {
        SegmentMetrics {
            word_count,
            duration_seconds: duration,
            words_per_second: if word_count == 0 {
                0.0
            } else {
                word_count as f64 / duration
            },
        }
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            aggregate(&[]),
            Err(TranscriptAnomalyError::EmptyBatch)
        ));
    }

    #[test]
    fn test_single_segment_has_zero_std() {
        let stats = aggregate(&[metrics(10, 5.0)]).unwrap();
        assert_eq!(stats.n, 1);
        assert_eq!(stats.mean_wps, 2.0);
        assert_eq!(stats.std_wps, 0.0);
        assert_eq!(stats.std_duration, 0.0);
        assert_eq!(stats.std_word_count, 0.0);
    }

    #[test]
    fn test_mean_and_std() {
        // wps: 1.0, 2.0, 3.0 -> среднее 2.0, отклонение sqrt(2/3)
        let batch = vec![metrics(2, 2.0), metrics(4, 2.0), metrics(6, 2.0)];
        let stats = aggregate(&batch).unwrap();
        assert_eq!(stats.n, 3);
        assert!((stats.mean_wps - 2.0).abs() < 1e-12);
        assert!((stats.std_wps - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((stats.mean_duration - 2.0).abs() < 1e-12);
        assert!((stats.mean_word_count - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_order_independence() {
        // Суммирование f64 не ассоциативно, поэтому перестановка может
        // сдвинуть результат на последний ULP; сравниваем с допуском
        let batch = vec![
            metrics(3, 1.5),
            metrics(12, 4.0),
            metrics(1, 6.0),
            metrics(7, 2.0),
            metrics(0, 3.0),
        ];
        let forward = aggregate(&batch).unwrap();

        let mut reversed = batch.clone();
        reversed.reverse();
        let backward = aggregate(&reversed).unwrap();

        let mut rotated = batch.clone();
        rotated.rotate_left(2);
        let shifted = aggregate(&rotated).unwrap();

        for other in [&backward, &shifted] {
            assert!((forward.mean_wps - other.mean_wps).abs() < 1e-12);
            assert!((forward.std_wps - other.std_wps).abs() < 1e-12);
            assert!((forward.mean_duration - other.mean_duration).abs() < 1e-12);
            assert!((forward.std_duration - other.std_duration).abs() < 1e-12);
            assert!((forward.mean_word_count - other.mean_word_count).abs() < 1e-12);
            assert!((forward.std_word_count - other.std_word_count).abs() < 1e-12);
        }
        assert_eq!(forward.n, backward.n);
    }

    #[test]
    fn test_std_is_never_negative() {
        // Все значения одинаковые: дисперсия может уйти чуть ниже нуля
        // из-за округления, но результат обязан быть 0
        let batch = vec![metrics(3, 7.3); 20];
        let stats = aggregate(&batch).unwrap();
        assert!(stats.std_wps >= 0.0);
        assert!(stats.std_wps < 1e-9);
    }
}
