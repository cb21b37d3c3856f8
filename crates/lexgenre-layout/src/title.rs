pub const UNKNOWN_TITLE: &str = "unknown title";

/// Guess a title from the text of the first page.
///
/// The first of the opening five non-empty lines whose length is strictly
/// between 20 and 200 characters wins. Otherwise the first non-empty line is
/// used, and [`UNKNOWN_TITLE`] when there is none.
pub fn extract_title(first_page_text: &str) -> String {
    let lines: Vec<&str> = first_page_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .take(5)
        .find(|l| {
            let len = l.chars().count();
            len > 20 && len < 200
        })
        .or_else(|| lines.first())
        .map(|l| l.to_string())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}
