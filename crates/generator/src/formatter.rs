//! Formatting pass applied to generated text before it is written

/// Formats generated file content
pub trait CodeFormatter: Send + Sync {
    fn name(&self) -> &str;

    fn format(&self, file_name: &str, content: &str) -> String;
}

/// Whitespace normalizer
///
/// Strips trailing whitespace, collapses more than two consecutive blank
/// lines and leaves exactly one trailing newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceFormatter;

impl CodeFormatter for WhitespaceFormatter {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn format(&self, _file_name: &str, content: &str) -> String {
        let mut formatted = String::with_capacity(content.len());
        let mut blank_run = 0;

        for line in content.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                blank_run += 1;
                if blank_run > 2 {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            formatted.push_str(line);
            formatted.push('\n');
        }

        let trimmed_len = formatted.trim_end_matches('\n').len();
        formatted.truncate(trimmed_len);
        formatted.push('\n');
        formatted
    }
}
