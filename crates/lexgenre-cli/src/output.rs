use std::io::Write;

use lexgenre_core::{DocumentMetrics, FlaggedItem, Label};
use lexgenre_ingest::ClassifiedDocument;
use lexgenre_layout::AnalyzedDocument;
use lexgenre_reporting::{PeriodStats, RunSummary};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Render a label, coloured by family.
fn paint_label(text: &str, label: Label, color: ColorMode) -> String {
    if !color.enabled() {
        return text.to_string();
    }
    match label {
        Label::Article | Label::Essay | Label::ArticleOrEssay => text.green().bold().to_string(),
        Label::Note | Label::Comment | Label::NoteOrComment => text.cyan().bold().to_string(),
        Label::Miscellaneous | Label::Unlabeled => text.dimmed().to_string(),
        Label::Error => text.red().bold().to_string(),
    }
}

fn print_metrics(w: &mut dyn Write, m: &DocumentMetrics) -> std::io::Result<()> {
    writeln!(
        w,
        "  Pages: {}  Words: {} (main {}, footnotes {})",
        m.page_count, m.total_words, m.main_words, m.footnote_words
    )?;
    if let Some(ratio) = m.footnote_ratio() {
        writeln!(w, "  Footnote/main ratio: {:.2}", ratio)?;
    }
    Ok(())
}

/// Print the outcome of classifying one document.
pub fn print_classification(
    w: &mut dyn Write,
    doc: &ClassifiedDocument,
    show_trace: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let id = &doc.identity;
    if color.enabled() {
        writeln!(w, "{} ({})", id.title.bold(), id.year)?;
    } else {
        writeln!(w, "{} ({})", id.title, id.year)?;
    }
    if !id.authors.is_empty() {
        writeln!(w, "  Authors: {}", id.authors)?;
    }
    print_metrics(w, &doc.metrics)?;

    let result = &doc.result;
    writeln!(
        w,
        "  Label: {}",
        paint_label(&result.display_label(), result.label, color)
    )?;

    if result.requires_manual_review {
        if color.enabled() {
            writeln!(w, "  {}", "Requires manual review".yellow())?;
        } else {
            writeln!(w, "  Requires manual review")?;
        }
    }
    for note in &result.errors {
        if color.enabled() {
            writeln!(w, "  {}", note.dimmed())?;
        } else {
            writeln!(w, "  {}", note)?;
        }
    }

    if show_trace {
        writeln!(w)?;
        writeln!(w, "Decision trace:")?;
        for line in result.render_trace().lines() {
            writeln!(w, "  {}", line)?;
        }
    }
    Ok(())
}

/// Print a document that was routed to manual review before classification.
pub fn print_flagged(
    w: &mut dyn Write,
    item: &FlaggedItem,
    color: ColorMode,
) -> std::io::Result<()> {
    let flags: Vec<&str> = item.flags.iter().map(|f| f.as_str()).collect();
    if color.enabled() {
        writeln!(w, "{} ({})", item.identity.title.bold(), item.identity.year)?;
        writeln!(w, "  {} {}", "FLAGGED:".yellow().bold(), flags.join(", "))?;
    } else {
        writeln!(w, "{} ({})", item.identity.title, item.identity.year)?;
        writeln!(w, "  FLAGGED: {}", flags.join(", "))?;
    }
    writeln!(
        w,
        "  Pages: {}  Words: {}  (not classified)",
        item.page_count, item.word_count
    )?;
    Ok(())
}

/// Per-page separator report followed by document metrics.
pub fn print_inspection(
    w: &mut dyn Write,
    file_name: &str,
    doc: &AnalyzedDocument,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "INSPECT:".bold().cyan(), file_name.bold())?;
    } else {
        writeln!(w, "INSPECT: {}", file_name)?;
    }
    writeln!(w, "Title guess: {}", doc.title_guess)?;
    writeln!(w)?;
    writeln!(w, "{:>5}  {:>10}  {:<8}  {:>9}", "Page", "Separator", "Source", "Discarded")?;

    for page in &doc.segmented.pages {
        let y = page
            .separator_y
            .map(|y| format!("{:.1}", y))
            .unwrap_or_else(|| "-".to_string());
        let source = match (page.found, page.carried) {
            (true, _) => "found",
            (false, true) => "carried",
            (false, false) => "none",
        };
        let line = format!(
            "{:>5}  {:>10}  {:<8}  {:>9}",
            page.page_number, y, source, page.discarded_primitives
        );
        if color.enabled() && page.separator_y.is_none() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }

    writeln!(w)?;
    writeln!(
        w,
        "Separators on {}/{} pages",
        doc.segmented.pages_with_separator(),
        doc.segmented.page_count()
    )?;
    print_metrics(w, &doc.metrics)?;
    writeln!(
        w,
        "  Characters: {} ({} non-whitespace)",
        doc.metrics.total_chars, doc.metrics.non_whitespace_chars
    )?;

    if doc.metrics.flags.is_empty() {
        writeln!(w, "  Flags: none")?;
    } else {
        let flags: Vec<&str> = doc.metrics.flags.iter().map(|f| f.as_str()).collect();
        if color.enabled() {
            writeln!(w, "  Flags: {}", flags.join(", ").yellow())?;
        } else {
            writeln!(w, "  Flags: {}", flags.join(", "))?;
        }
    }
    Ok(())
}

fn fmt_avg(v: Option<f64>, precision: usize) -> String {
    v.map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_period(w: &mut dyn Write, name: &str, p: &PeriodStats) -> std::io::Result<()> {
    writeln!(
        w,
        "  {}: {} documents, avg {} pages, avg {} words",
        name,
        p.documents,
        fmt_avg(p.avg_pages, 1),
        fmt_avg(p.avg_words, 0)
    )
}

/// Print the end-of-run summary.
pub fn print_run_summary(
    w: &mut dyn Write,
    s: &RunSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Summary".bold())?;
    } else {
        writeln!(w, "Summary")?;
    }
    writeln!(
        w,
        "  Classified: {}  Flagged: {}  Failed: {}",
        s.classified, s.flagged, s.failed
    )?;
    if let Some((lo, hi)) = s.year_range {
        writeln!(w, "  Year range: {} - {}", lo, hi)?;
    }
    writeln!(w, "  Average pages: {}", fmt_avg(s.overall.avg_pages, 1))?;
    writeln!(w, "  Average words: {}", fmt_avg(s.overall.avg_words, 0))?;
    if let Some(share) = s.multi_author_share {
        writeln!(w, "  Multi-author: {:.1}%", share * 100.0)?;
    }

    if !s.labels.is_empty() {
        writeln!(w)?;
        for lc in &s.labels {
            let name = paint_label(lc.label.as_str(), lc.label, color);
            if lc.label.is_confirmable() {
                writeln!(w, "  {:<24} {:>5} ({} confirmed)", name, lc.total, lc.confirmed)?;
            } else {
                writeln!(w, "  {:<24} {:>5}", name, lc.total)?;
            }
        }
    }

    if s.manual_review > 0 {
        let msg = format!("{} document(s) need manual review", s.manual_review);
        if color.enabled() {
            writeln!(w, "  {}", msg.yellow())?;
        } else {
            writeln!(w, "  {}", msg)?;
        }
    }

    writeln!(w)?;
    print_period(w, &format!("Before {}", s.comparison.year), &s.comparison.before)?;
    print_period(w, &format!("From {}", s.comparison.year), &s.comparison.after)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexgenre_core::{
        ArticleClassifier, ClassificationLog, DocumentIdentity, LineSegment, PageGeometry,
        PaperRecord, TextLine,
    };
    use lexgenre_layout::{LayoutConfig, analyze_pages};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn classified(words: usize, text: &str) -> ClassifiedDocument {
        let record = PaperRecord {
            title: "A Theory of Standing".into(),
            authors: "Jane Doe".into(),
            word_count: words,
            page_count: 12,
            main_text: text.into(),
            publication_year: 2004,
        };
        let result = ArticleClassifier::new().classify(&record);
        ClassifiedDocument {
            identity: DocumentIdentity {
                title: record.title.clone(),
                authors: record.authors.clone(),
                year: 2004,
                ..Default::default()
            },
            metrics: DocumentMetrics {
                total_words: words,
                main_words: words,
                page_count: 12,
                ..Default::default()
            },
            record,
            result,
        }
    }

    #[test]
    fn plain_classification_output() {
        let doc = classified(18_000, "ARTICLE");
        let out = render(|w| print_classification(w, &doc, false, ColorMode(false)));
        assert!(out.contains("A Theory of Standing (2004)"));
        assert!(out.contains("Label: Article (confirmed)"));
        assert!(!out.contains("Decision trace"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn error_label_mentions_review_and_trace() {
        let doc = classified(16_000, "ARTICLE NOTE");
        let out = render(|w| print_classification(w, &doc, true, ColorMode(false)));
        assert!(out.contains("Label: ERROR"));
        assert!(out.contains("Requires manual review"));
        assert!(out.contains("Decision trace:"));
        assert!(out.contains("section_headers"));
    }

    #[test]
    fn inspection_lists_every_page() {
        let pages = vec![
            PageGeometry::new(612.0, 792.0)
                .with_line(LineSegment::new(72.0, 480.0, 400.0, 480.0))
                .with_text_line(TextLine::new(100.0, 110.0, "body"))
                .with_text_line(TextLine::new(500.0, 510.0, "note")),
            PageGeometry::new(612.0, 792.0).with_text("more body"),
        ];
        let doc = analyze_pages(&pages, &LayoutConfig::default());
        let out = render(|w| print_inspection(w, "doc.json", &doc, ColorMode(false)));
        assert!(out.contains("INSPECT: doc.json"));
        assert!(out.contains("480.0"));
        assert!(out.contains("Separators on 1/2 pages"));
        assert!(out.contains("  Flags: none\n"));
    }

    #[test]
    fn summary_without_documents() {
        let s = lexgenre_reporting::summarize(&ClassificationLog::new(), 1, 0, 2005);
        let out = render(|w| print_run_summary(w, &s, ColorMode(false)));
        assert!(out.contains("Classified: 0  Flagged: 1  Failed: 0"));
        assert!(out.contains("Average pages: n/a"));
        assert!(out.contains("Before 2005: 0 documents"));
    }
}
