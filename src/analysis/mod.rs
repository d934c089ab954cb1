//! Модуль анализа партии сегментов
//!
//! Этот модуль содержит функции для вычисления статистики по корпусу,
//! оценки отклонения и классификации причин необычности сегментов.

pub mod classifier;
pub mod scorer;
pub mod stats;
