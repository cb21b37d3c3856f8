use lexgenre_core::{
    ArticleClassifier, ClassificationResult, DocumentIdentity, DocumentMetrics, FlaggedItem,
    PaperRecord,
};
use lexgenre_layout::LayoutConfig;

use crate::manifest::ManifestEntry;
use crate::{ExtractedDocument, IngestError, extract_document};

/// A document that passed the quality gate and went through the classifier.
#[derive(Debug, Clone)]
pub struct ClassifiedDocument {
    pub record: PaperRecord,
    pub identity: DocumentIdentity,
    pub metrics: DocumentMetrics,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    Classified(Box<ClassifiedDocument>),
    /// Routed to manual review by a quality flag; never classified.
    Flagged(FlaggedItem),
}

/// Merge manifest metadata with what the document itself provides.
///
/// Manifest values win, then dump metadata, then the first-page title guess.
pub fn identity_for(
    entry: &ManifestEntry,
    extracted: &ExtractedDocument,
) -> Result<DocumentIdentity, IngestError> {
    let meta = &extracted.metadata;
    let year = entry
        .year
        .or(meta.year)
        .ok_or_else(|| IngestError::MissingYear(entry.path.clone()))?;
    let title = entry
        .title
        .clone()
        .or_else(|| meta.title.clone())
        .unwrap_or_else(|| extracted.analysis.title_guess.clone());
    let authors = if entry.authors.trim().is_empty() {
        meta.authors.clone().unwrap_or_default()
    } else {
        entry.authors.clone()
    };

    Ok(DocumentIdentity {
        title,
        authors,
        year,
        source: entry
            .source
            .clone()
            .or_else(|| Some(entry.path.display().to_string())),
        journal: entry.journal.clone(),
        volume: entry.volume,
        issue: entry.issue,
    })
}

/// Run the quality gate and the classifier over an already extracted document.
pub fn classify_extracted(
    entry: &ManifestEntry,
    extracted: ExtractedDocument,
    classifier: &ArticleClassifier,
) -> Result<DocumentOutcome, IngestError> {
    let identity = identity_for(entry, &extracted)?;
    let analysis = extracted.analysis;

    if analysis.metrics.is_flagged() {
        tracing::info!(
            path = %entry.path.display(),
            flags = ?analysis.metrics.flags,
            "document flagged for manual review"
        );
        return Ok(DocumentOutcome::Flagged(FlaggedItem::new(
            &analysis.metrics,
            identity,
        )));
    }

    let record = PaperRecord {
        title: identity.title.clone(),
        authors: identity.authors.clone(),
        word_count: analysis.metrics.total_words,
        page_count: analysis.metrics.page_count,
        main_text: analysis.segmented.main_text,
        publication_year: identity.year,
    };
    let result = classifier.classify(&record);

    Ok(DocumentOutcome::Classified(Box::new(ClassifiedDocument {
        record,
        identity,
        metrics: analysis.metrics,
        result,
    })))
}

/// Extract, gate and classify one document.
///
/// Extraction problems are errors. A document the rules cannot resolve still
/// succeeds, with the `ERROR` label.
pub fn process_document(
    entry: &ManifestEntry,
    layout: &LayoutConfig,
    classifier: &ArticleClassifier,
) -> Result<DocumentOutcome, IngestError> {
    let extracted = extract_document(&entry.path, layout)?;
    classify_extracted(entry, extracted, classifier)
}
