//! Модуль для работы с директориями данных
//!
//! Этот модуль содержит функции для поиска папок с транскрипциями
//! и архивирования обработанных папок.

use std::path::{Path, PathBuf};

use chrono::Local;
use walkdir::WalkDir;

use crate::error::{Result, TranscriptAnomalyError};

/// Путь к CSV файлу транскрипций внутри папки
///
/// Соглашение: папка `<name>` содержит файл `<name>_transcripts.csv`.
pub fn transcripts_csv_path<P: AsRef<Path>>(data_dir: P, folder_name: &str) -> PathBuf {
    data_dir
        .as_ref()
        .join(folder_name)
        .join(format!("{}_transcripts.csv", folder_name))
}

/// Найти папки с транскрипциями для анализа
///
/// Возвращает имена папок первого уровня в `data_dir`, содержащих
/// файл `<name>_transcripts.csv`. Скрытые папки пропускаются.
pub fn get_folders_to_analyze<P: AsRef<Path>>(data_dir: P) -> Result<Vec<String>> {
    let data_dir = data_dir.as_ref();
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir)?;
        return Ok(Vec::new());
    }

    let mut folders = Vec::new();
    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if transcripts_csv_path(data_dir, &name).exists() {
            folders.push(name);
        }
    }

    folders.sort();
    Ok(folders)
}

/// Переместить обработанную папку в архив
///
/// При совпадении имени в архиве к нему добавляется метка времени.
pub fn archive_folder<P: AsRef<Path>, Q: AsRef<Path>>(
    data_dir: P,
    archive_dir: Q,
    folder_name: &str,
) -> Result<PathBuf> {
    let source_path = data_dir.as_ref().join(folder_name);
    if !source_path.exists() {
        return Err(TranscriptAnomalyError::FileNotFound(format!(
            "Folder to archive not found: {}",
            source_path.display()
        )));
    }

    std::fs::create_dir_all(archive_dir.as_ref())?;

    let mut dest_path = archive_dir.as_ref().join(folder_name);
    if dest_path.exists() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        dest_path = archive_dir
            .as_ref()
            .join(format!("{}_{}", folder_name, timestamp));
    }

    log::info!(
        "Moving '{}' to archive: {}",
        folder_name,
        dest_path.display()
    );
    std::fs::rename(&source_path, &dest_path)?;
    Ok(dest_path)
}
