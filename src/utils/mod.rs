//! Вспомогательные утилиты
//!
//! Этот модуль содержит функции для работы с директориями данных.

pub mod folders;
