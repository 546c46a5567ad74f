//! Paragraph assembly: merge wrapped lines back into paragraphs.
//!
//! A line closes its paragraph when it ends like a sentence and the next line
//! looks like the start of a new one (uppercase first letter, or indented by
//! two spaces), or when it is the last line of the page. Empty marker lines
//! from the line grouper are hard breaks and are passed through as empty
//! entries. Text without letter case (Hangul, CJK) can only be split by the
//! indentation rule or by marker lines.

/// Characters that end a sentence, including closing quotes and brackets.
const SENTENCE_END: &[char] = &[
    '.', '?', '!', '"', '\'', '」', '』', '》', '）', '】', ')',
];

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn ends_with_sentence(line: &str) -> bool {
    line.trim_end().ends_with(SENTENCE_END)
}

fn starts_new_sentence(line: &str) -> bool {
    if is_blank(line) {
        return false;
    }
    line.starts_with("  ")
        || line
            .trim_start()
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
}

/// Merge lines into paragraphs. Empty output entries separate paragraphs.
pub fn assemble_paragraphs<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut processed = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_blank(line) {
            if !paragraph.is_empty() {
                processed.push(paragraph.join(" "));
                paragraph.clear();
            }
            processed.push(String::new());
            continue;
        }

        let is_last = i + 1 == lines.len();
        let next_new_sentence = lines
            .get(i + 1)
            .is_some_and(|next| starts_new_sentence(next.as_ref()));

        paragraph.push(line);

        if ends_with_sentence(line) && (next_new_sentence || is_last) {
            processed.push(paragraph.join(" "));
            paragraph.clear();
        }
    }

    if !paragraph.is_empty() {
        processed.push(paragraph.join(" "));
    }

    processed
}
