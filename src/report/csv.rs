//! Модуль записи результатов анализа в CSV файлы
//!
//! Этот модуль содержит функции для сохранения полного анализа
//! и отдельного файла с необычными сегментами.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::scorer::ScoredSegment;
use crate::error::{Result, TranscriptAnomalyError};

const HEADER: &str =
    "segment_id,audio_file,text,duration_seconds,word_count,words_per_second,deviation_score,is_unusual,reasons";

/// Записать полный анализ всех сегментов в CSV файл
pub fn write_full_analysis<P: AsRef<Path>>(path: P, segments: &[ScoredSegment]) -> Result<()> {
    write_rows(path, segments.iter())
}

/// Записать только необычные сегменты в CSV файл
pub fn write_unusual_cases<P: AsRef<Path>>(path: P, segments: &[ScoredSegment]) -> Result<()> {
    write_rows(path, segments.iter().filter(|s| s.is_unusual))
}

fn write_rows<'a, P: AsRef<Path>>(
    path: P,
    segments: impl Iterator<Item = &'a ScoredSegment>,
) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(|e| {
        TranscriptAnomalyError::ReportWriting(format!(
            "Failed to create CSV file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", HEADER)?;
    for segment in segments {
        let reasons = segment
            .reasons
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(";");

        writeln!(
            writer,
            "{},{},{},{},{},{:.6},{:.6},{},{}",
            escape_field(&segment.segment.segment_id),
            escape_field(segment.segment.audio_path.as_deref().unwrap_or("")),
            escape_field(&segment.segment.text),
            segment.metrics.duration_seconds,
            segment.metrics.word_count,
            segment.metrics.words_per_second,
            segment.deviation_score,
            segment.is_unusual,
            reasons,
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Экранировать поле CSV, если оно содержит запятые, кавычки или переводы строк
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
