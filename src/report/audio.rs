//! Модуль копирования аудио файлов необычных сегментов
//!
//! Этот модуль копирует аудио клипы помеченных сегментов в директорию
//! отчета, чтобы отчет можно было прослушивать автономно.

use std::path::{Path, PathBuf};

use crate::analysis::scorer::ScoredSegment;
use crate::error::Result;

/// Скопировать аудио файлы необычных сегментов в поддиректорию `audio`
///
/// Отсутствующий исходный файл логируется и пропускается: аудио носит
/// вспомогательный характер и не должно срывать формирование отчета.
/// Возвращает путь к директории с аудио и количество скопированных файлов.
pub fn copy_unusual_audio<P: AsRef<Path>, Q: AsRef<Path>>(
    segments: &[ScoredSegment],
    data_dir: P,
    report_dir: Q,
) -> Result<(PathBuf, usize)> {
    let audio_dir = report_dir.as_ref().join("audio");
    std::fs::create_dir_all(&audio_dir)?;

    let mut copied = 0;
    for segment in segments.iter().filter(|s| s.is_unusual) {
        let audio_file = match segment.segment.audio_path.as_deref() {
            Some(f) => f,
            None => continue,
        };

        let src_path = data_dir.as_ref().join(audio_file);
        if !src_path.exists() {
            log::warn!(
                "Audio file for segment '{}' not found: {}",
                segment.segment.segment_id,
                src_path.display()
            );
            continue;
        }

        let file_name = src_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| audio_file.into());
        let dst_path = audio_dir.join(file_name);
        std::fs::copy(&src_path, &dst_path)?;
        copied += 1;
    }

    log::info!("Copied {} audio clips to {}", copied, audio_dir.display());
    Ok((audio_dir, copied))
}
