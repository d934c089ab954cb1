//! Модуль генерации HTML отчета
//!
//! Этот модуль собирает автономный HTML отчет со сводными карточками,
//! гистограммой скорости речи и карточками необычных сегментов.

use std::path::Path;

use chrono::Local;

use crate::analysis::scorer::ScoredSegment;
use crate::error::{Result, TranscriptAnomalyError};
use crate::report::assembler::BatchSummary;

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background-color: #f8f9fa; color: #333; }
.container { max-width: 1200px; margin: 0 auto; }
.header { background: linear-gradient(135deg, #6c5ce7, #a8a4e6); color: white; padding: 20px; border-radius: 10px; margin-bottom: 20px; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.stat-card { background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.05); text-align: center; }
.stat-value { font-size: 24px; font-weight: bold; color: #6c5ce7; margin: 10px 0; }
.stat-label { color: #666; font-size: 14px; }
.chart-container { background: white; padding: 20px; border-radius: 8px; margin-bottom: 30px; }
.unusual-cases { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin-top: 20px; }
.case-card { background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.05); }
.severity-high { border-left: 4px solid #ff4757; }
.severity-medium { border-left: 4px solid #ffa502; }
.severity-low { border-left: 4px solid #2ed573; }
.metric { display: flex; justify-content: space-between; margin: 5px 0; font-size: 14px; }
.metric-value { font-weight: bold; }
.reasons { margin-top: 8px; font-size: 13px; color: #6c5ce7; }
.text-content { margin-top: 10px; padding: 10px; background: #f8f9fa; border-radius: 4px; font-size: 14px; }
.audio-player { margin: 10px 0; width: 100%; max-width: 400px; }
"#;

/// Сгенерировать HTML отчет по партии
pub fn render_report(segments: &[ScoredSegment], summary: &BatchSummary) -> String {
    let wps_values: Vec<f64> = segments
        .iter()
        .map(|s| s.metrics.words_per_second)
        .collect();
    // Данные гистограммы встраиваются прямо в страницу
    let hist_data = serde_json::to_string(&wps_values).unwrap_or_else(|_| "[]".to_string());

    let mut cases_html = String::new();
    for segment in segments.iter().filter(|s| s.is_unusual) {
        cases_html.push_str(&render_case_card(segment));
    }

    format!(
        r#"<html>
<head>
<title>Transcription Analysis Report</title>
<script src="https://cdn.plot.ly/plotly-latest.min.js"></script>
<style>{style}</style>
</head>
<body>
<div class="container">
    <div class="header">
        <h1>Transcription Analysis Report</h1>
        <p>Generated on: {generated}</p>
    </div>
    <div class="stats-grid">
        <div class="stat-card"><div class="stat-label">Total Segments</div><div class="stat-value">{total}</div></div>
        <div class="stat-card"><div class="stat-label">Average Words/Second</div><div class="stat-value">{mean_wps:.2}</div></div>
        <div class="stat-card"><div class="stat-label">Standard Deviation</div><div class="stat-value">{std_wps:.2}</div></div>
        <div class="stat-card"><div class="stat-label">Unusual Cases</div><div class="stat-value">{unusual}</div></div>
    </div>
    <div class="chart-container">
        <h2>Distribution of Words per Second</h2>
        <div id="histogram"></div>
    </div>
    <h2>Unusual Cases Analysis</h2>
    <div class="unusual-cases">
{cases}
    </div>
</div>
<script>
    const histData = {hist};
    Plotly.newPlot('histogram', [{{ x: histData, type: 'histogram', nbinsx: 30, marker: {{ color: '#6c5ce7', opacity: 0.7 }} }}], {{
        title: 'Distribution of Words per Second',
        xaxis: {{ title: 'Words per Second' }},
        yaxis: {{ title: 'Frequency' }},
        bargap: 0.05,
        showlegend: false
    }});
</script>
</body>
</html>
"#,
        style = STYLE,
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
        total = summary.total_segments,
        mean_wps = summary.mean_wps,
        std_wps = summary.std_wps,
        unusual = summary.unusual_count,
        cases = cases_html,
        hist = hist_data,
    )
}

/// Карточка одного необычного сегмента
fn render_case_card(segment: &ScoredSegment) -> String {
    // Серьезность определяется оценкой отклонения
    let severity = if segment.deviation_score > 3.0 {
        "high"
    } else if segment.deviation_score > 2.5 {
        "medium"
    } else {
        "low"
    };

    let reasons = segment
        .reasons
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let audio_html = segment
        .segment
        .audio_path
        .as_deref()
        .map(|audio_file| {
            let file_name = Path::new(audio_file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| audio_file.to_string());
            format!(
                r#"<audio class="audio-player" controls><source src="audio/{}" type="audio/wav"></audio>"#,
                escape_html(&file_name)
            )
        })
        .unwrap_or_default();

    format!(
        r#"        <div class="case-card severity-{severity}">
            <h3>{id}</h3>
            <div class="metric"><span>Duration</span><span class="metric-value">{duration:.2}s</span></div>
            <div class="metric"><span>Word Count</span><span class="metric-value">{words}</span></div>
            <div class="metric"><span>Words/Second</span><span class="metric-value">{wps:.2}</span></div>
            <div class="metric"><span>Deviation Score</span><span class="metric-value">{score:.2}</span></div>
            <div class="reasons">{reasons}</div>
            <div class="text-content">{text}</div>
            {audio}
        </div>
"#,
        severity = severity,
        id = escape_html(&segment.segment.segment_id),
        duration = segment.metrics.duration_seconds,
        words = segment.metrics.word_count,
        wps = segment.metrics.words_per_second,
        score = segment.deviation_score,
        reasons = escape_html(&reasons),
        text = escape_html(&segment.segment.text),
        audio = audio_html,
    )
}

/// Записать HTML отчет в файл
pub fn write_html_report<P: AsRef<Path>>(
    path: P,
    segments: &[ScoredSegment],
    summary: &BatchSummary,
) -> Result<()> {
    let html = render_report(segments, summary);
    std::fs::write(path.as_ref(), html).map_err(|e| {
        TranscriptAnomalyError::ReportWriting(format!(
            "Failed to write HTML report {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

/// Экранировать специальные символы HTML
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorer::score_segment;
    use crate::analysis::stats::aggregate;
    use crate::config::ThresholdConfig;
    use crate::report::assembler::assemble;
    use crate::segment::metrics;
    use crate::segment::parser::RawSegment;

    fn scored_batch() -> (Vec<ScoredSegment>, BatchSummary) {
        let raws = vec![
            RawSegment::new(
                "seg_000".to_string(),
                "normal speech with enough words here".to_string(),
                3.0,
                None,
            ),
            RawSegment::new(
                "seg_001".to_string(),
                "<hi>".to_string(),
                5.0,
                Some("clips/seg_001.wav".to_string()),
            ),
        ];
        let metrics_list: Vec<_> = raws.iter().map(|r| metrics::compute(r).unwrap()).collect();
        let stats = aggregate(&metrics_list).unwrap();
        let config = ThresholdConfig::default();
        let scored = raws
            .into_iter()
            .zip(metrics_list)
            .map(|(r, m)| score_segment(r, m, &stats, &config))
            .collect();
        assemble(scored)
    }

    #[test]
    fn test_report_contains_summary_and_cases() {
        let (segments, summary) = scored_batch();
        let html = render_report(&segments, &summary);

        assert!(html.contains("Transcription Analysis Report"));
        assert!(html.contains("Total Segments"));
        assert!(html.contains("seg_001"));
        // Текст экранируется
        assert!(html.contains("&lt;hi&gt;"));
        // Обычный сегмент не попадает в карточки
        assert!(!html.contains("<h3>seg_000</h3>"));
    }

    #[test]
    fn test_audio_player_uses_file_name() {
        let (segments, summary) = scored_batch();
        let html = render_report(&segments, &summary);
        assert!(html.contains("audio/seg_001.wav"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis_report.html");

        let (segments, summary) = scored_batch();
        write_html_report(&path, &segments, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("histogram"));
    }
}
