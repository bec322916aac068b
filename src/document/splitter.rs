/// Recursive character text splitter.
///
/// Splits text on the coarsest separator that yields pieces under
/// `chunk_size`, recursing into finer separators for oversized pieces, then
/// merges adjacent pieces back together so consecutive chunks share up to
/// `chunk_overlap` characters of context. Sizes are measured in characters.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Pick the first separator that actually occurs in the text; the
        // empty separator at the end of the ladder always matches.
        let (separator, remaining) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (sep.as_str(), &separators[i + 1..]))
            .unwrap_or(("", &[]));

        let pieces = split_on(text, separator);

        let mut chunks = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in pieces {
            if piece.chars().count() < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge_pieces(&fitting, separator));
                fitting.clear();
            }
            if remaining.is_empty() {
                // Nothing finer to split on, emit the oversized piece as-is.
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting, separator));
        }

        chunks
    }

    /// Greedily joins pieces up to `chunk_size`, then carries trailing pieces
    /// totalling at most `chunk_overlap` characters into the next chunk.
    fn merge_pieces(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = separator.chars().count();
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            let sep = if window.is_empty() { 0 } else { sep_len };

            if total + len + sep > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_pieces(&window, separator) {
                    chunks.push(chunk);
                }
                // Shrink the window until it fits in the overlap budget.
                while total > self.chunk_overlap
                    || (total + len + sep_len > self.chunk_size && total > 0)
                {
                    let first = window.remove(0).chars().count();
                    total -= first + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total += len + if window.is_empty() { 0 } else { sep_len };
            window.push(piece);
        }

        if let Some(chunk) = join_pieces(&window, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn split_on(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

fn join_pieces(pieces: &[&str], separator: &str) -> Option<String> {
    let joined = pieces.join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
