//! Модуль для работы с сегментами транскрипции
//!
//! Этот модуль содержит функции для загрузки сегментов из CSV файлов
//! и вычисления метрик по каждому сегменту.

pub mod metrics;
pub mod parser;
