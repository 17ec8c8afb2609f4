use postalert_core::config::MessageGrouping;

/// Maximum characters per Discord message (2000 is the limit; we use 1950 for safety).
const CHUNK_MAX: usize = 1950;

/// Split `text` into chunks of at most [`CHUNK_MAX`] characters, preferring
/// newline, then space boundaries so lines and words stay whole.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.chars().count() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.chars().count() > CHUNK_MAX {
        // Byte offset of the first character past the window.
        let limit = remaining
            .char_indices()
            .nth(CHUNK_MAX)
            .map(|(i, _)| i)
            .unwrap_or(remaining.len());
        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }

    chunks
}

/// Turn composed alerts into the webhook posts to send.
///
/// `PerTarget` keeps one post per alert; `Batched` joins them with a blank
/// line. Either way no post exceeds Discord's length limit.
pub fn group_messages(messages: Vec<String>, grouping: MessageGrouping) -> Vec<String> {
    if messages.is_empty() {
        return Vec::new();
    }
    match grouping {
        MessageGrouping::PerTarget => messages.iter().flat_map(|m| split_chunks(m)).collect(),
        MessageGrouping::Batched => split_chunks(&messages.join("\n\n")),
    }
}
