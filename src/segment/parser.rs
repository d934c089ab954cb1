//! Модуль для загрузки сегментов транскрипции из CSV файлов
//!
//! Этот модуль содержит функции для парсинга CSV файлов с колонками
//! `text` и `duration_seconds` (и необязательной колонкой `audio_file`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscriptAnomalyError};

/// Один сегмент транскрипции, прочитанный из CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSegment {
    /// Уникальный идентификатор сегмента в пределах партии
    pub segment_id: String,
    /// Текст транскрипции
    pub text: String,
    /// Длительность сегмента в секундах
    pub duration_seconds: f64,
    /// Путь к аудио файлу сегмента, если он известен
    pub audio_path: Option<String>,
}

impl RawSegment {
    /// Создать новый экземпляр RawSegment
    pub fn new(
        segment_id: String,
        text: String,
        duration_seconds: f64,
        audio_path: Option<String>,
    ) -> Self {
        Self {
            segment_id,
            text,
            duration_seconds,
            audio_path,
        }
    }
}

/// Результат разбора одной строки CSV: сегмент либо ошибка этой строки
pub type RowResult = std::result::Result<RawSegment, TranscriptAnomalyError>;

/// Парсинг CSV файла с транскрипциями
///
/// Ошибки уровня файла (файл не найден, отсутствуют обязательные колонки)
/// возвращаются как `Err`; ошибки отдельных строк (нечисловая длительность)
/// возвращаются поэлементно, чтобы вызывающая сторона могла решить,
/// пропустить строку или прервать партию.
pub fn parse_csv_file<P: AsRef<Path>>(csv_path: P) -> Result<Vec<RowResult>> {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    let path = csv_path.as_ref();
    let file = File::open(path).map_err(|e| {
        TranscriptAnomalyError::FileNotFound(format!(
            "Failed to open CSV file {}: {}",
            path.display(),
            e
        ))
    })?;

    let reader = BufReader::new(file);
    let mut lines = reader.lines().filter_map(|line| line.ok());

    let header_line = lines
        .next()
        .ok_or_else(|| TranscriptAnomalyError::CsvParsing("CSV file is empty".to_string()))?;
    let header = parse_csv_line(&header_line);

    let text_idx = column_index(&header, "text")?;
    let duration_idx = column_index(&header, "duration_seconds")?;
    let audio_idx = header.iter().position(|h| h.trim() == "audio_file");

    // Имя папки используется для генерации идентификаторов сегментов,
    // когда в CSV нет колонки audio_file
    let folder_name = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "batch".to_string());

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(
            &line,
            index,
            text_idx,
            duration_idx,
            audio_idx,
            &folder_name,
        ));
    }

    Ok(rows)
}

/// Парсинг одной строки с данными сегмента
fn parse_row(
    line: &str,
    index: usize,
    text_idx: usize,
    duration_idx: usize,
    audio_idx: Option<usize>,
    folder_name: &str,
) -> RowResult {
    let fields = parse_csv_line(line);
    let max_idx = text_idx.max(duration_idx).max(audio_idx.unwrap_or(0));
    let fallback_id = format!("{}_segment_{:03}", folder_name, index);

    if fields.len() <= max_idx {
        return Err(TranscriptAnomalyError::invalid_segment(
            fallback_id,
            format!("row has {} fields, expected at least {}", fields.len(), max_idx + 1),
        ));
    }

    let audio_path = audio_idx
        .map(|i| fields[i].trim().to_string())
        .filter(|v| !v.is_empty());

    // Идентификатор строится из имени аудио файла, если оно есть
    let segment_id = audio_path
        .as_deref()
        .map(audio_file_stem)
        .unwrap_or(fallback_id);

    let duration_field = fields[duration_idx].trim();
    let duration_seconds: f64 = duration_field.parse().map_err(|_| {
        TranscriptAnomalyError::invalid_segment(
            segment_id.clone(),
            format!("duration_seconds is not a number: '{}'", duration_field),
        )
    })?;

    Ok(RawSegment::new(
        segment_id,
        fields[text_idx].clone(),
        duration_seconds,
        audio_path,
    ))
}

/// Найти индекс обязательной колонки в заголовке
fn column_index(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            TranscriptAnomalyError::InvalidFormat(format!(
                "CSV file is missing required column '{}'",
                name
            ))
        })
}

/// Имя аудио файла без расширения
fn audio_file_stem(audio_file: &str) -> String {
    Path::new(audio_file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| audio_file.to_string())
}

/// Разбить строку CSV на поля с учетом кавычек
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // Удвоенная кавычка внутри закавыченного поля
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_basic_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "transcripts.csv",
            "text,duration_seconds\nhello world,2.5\nhi,5.0\n",
        );

        let rows = parse_csv_file(&path).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.text, "hello world");
        assert_eq!(first.duration_seconds, 2.5);
        assert!(first.audio_path.is_none());
        // Идентификатор генерируется из имени папки и номера строки
        assert!(first.segment_id.ends_with("_segment_000"));
        assert!(rows[1].as_ref().unwrap().segment_id.ends_with("_segment_001"));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "transcripts.csv",
            "text,duration_seconds,audio_file\n\"hello, \"\"world\"\"\",3.0,clip_001.wav\n",
        );

        let rows = parse_csv_file(&path).unwrap();
        let segment = rows[0].as_ref().unwrap();
        assert_eq!(segment.text, "hello, \"world\"");
        assert_eq!(segment.segment_id, "clip_001");
        assert_eq!(segment.audio_path.as_deref(), Some("clip_001.wav"));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "transcripts.csv", "text,length\nhello,2.5\n");

        let result = parse_csv_file(&path);
        assert!(matches!(
            result,
            Err(TranscriptAnomalyError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_non_numeric_duration_is_row_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "transcripts.csv",
            "text,duration_seconds\nhello,abc\nworld,1.0\n",
        );

        let rows = parse_csv_file(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(matches!(
            rows[0],
            Err(TranscriptAnomalyError::InvalidSegment { .. })
        ));
        assert!(rows[1].is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = parse_csv_file("no/such/file.csv");
        assert!(matches!(
            result,
            Err(TranscriptAnomalyError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_csv_line_splitting() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_line("\"a,b\",c"), vec!["a,b", "c"]);
        assert_eq!(parse_csv_line("a,,c"), vec!["a", "", "c"]);
    }
}
