//! Heuristic formatting of model replies into display blocks

/// A display block extracted from unstructured model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Bullet(String),
    Numbered(u32, String),
    Paragraph(String),
}

/// Split a model reply into headings, list items, and paragraphs.
///
/// The model is prompted for plain text but tends to emit markdown-ish
/// structure anyway; this recognizes the common shapes and strips inline
/// `**bold**` markers so frontends can style blocks themselves.
pub fn format_reply(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(heading) = heading_text(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading(strip_bold(heading)));
        } else if let Some(item) = bullet_text(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Bullet(strip_bold(item)));
        } else if let Some((number, item)) = numbered_text(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Numbered(number, strip_bold(item)));
        } else {
            paragraph.push(trimmed);
        }
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(strip_bold(&paragraph.join(" "))));
        paragraph.clear();
    }
}

/// `# Heading`, `## Heading`, or a whole line wrapped in `**bold**`
fn heading_text(line: &str) -> Option<&str> {
    let after_hashes = line.trim_start_matches('#');
    if after_hashes.len() < line.len() {
        let text = after_hashes.trim_start();
        return (!text.is_empty()).then_some(text);
    }

    if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        let inner = &line[2..line.len() - 2];
        if !inner.contains("**") {
            return Some(inner);
        }
    }

    None
}

fn bullet_text(line: &str) -> Option<&str> {
    for prefix in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(rest.trim_start());
        }
    }
    None
}

/// `1. item` or `1) item`
fn numbered_text(line: &str) -> Option<(u32, &str)> {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let rest = &line[digits.len()..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    let rest = rest.strip_prefix(' ')?;

    let number = digits.parse().ok()?;
    Some((number, rest.trim_start()))
}

fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}
