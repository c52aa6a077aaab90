//! Page text sizing: cap the total, then split into overlapping chunks that
//! each fit one summarization prompt.

/// Maximum characters per chunk.
pub const CHUNK_CHARS: usize = 3000;
/// Characters carried over from the end of one chunk into the next.
pub const CHUNK_OVERLAP_CHARS: usize = 200;

/// Truncates `text` to at most `max_chars` characters.
pub fn cap_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Splits on newlines and packs lines into chunks of at most `chunk_chars`
/// characters. Consecutive chunks share trailing lines worth up to
/// `overlap_chars`. Lines longer than a chunk are cut into chunk-sized pieces.
pub fn split_into_chunks(text: &str, chunk_chars: usize, overlap_chars: usize) -> Vec<String> {
    let chunk_chars = chunk_chars.max(1);
    let pieces: Vec<&str> = text
        .split('\n')
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .flat_map(|line| hard_split(line, chunk_chars))
        .collect();

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    // Characters in `current` joined with '\n'
    let mut current_len = 0usize;

    for piece in pieces {
        let piece_len = piece.chars().count();

        if !current.is_empty() && current_len + 1 + piece_len > chunk_chars {
            chunks.push(current.join("\n"));

            while !current.is_empty()
                && (current_len > overlap_chars || current_len + 1 + piece_len > chunk_chars)
            {
                let removed = current.remove(0);
                current_len -= removed.chars().count() + usize::from(!current.is_empty());
            }
        }

        current_len += piece_len + usize::from(!current.is_empty());
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

fn hard_split(line: &str, chunk_chars: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let head = cap_chars(rest, chunk_chars);
        parts.push(head);
        rest = &rest[head.len()..];
    }
    parts
}
