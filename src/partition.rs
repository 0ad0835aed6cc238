//! Script partitioning: cuts a script into the ordered parts that become
//! image search queries and captions.

const SENTENCE_TERMINATORS: [char; 3] = ['.', '?', '!'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionMode {
    /// Cut the script into up to `target_count` parts.
    #[default]
    Fresh,
    /// The script is already a single caption (regenerating one image).
    ReuseWhole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// One part per chunk of consecutive sentences.
    Sentences,
    /// One part per non-empty line.
    Lines,
}

impl SplitPolicy {
    /// Scripts with two or more non-empty lines are treated as one beat per
    /// line; a single block of prose is cut on sentence boundaries.
    pub fn detect(script: &str) -> Self {
        let lines = script.lines().filter(|line| !line.trim().is_empty()).count();
        if lines >= 2 {
            SplitPolicy::Lines
        } else {
            SplitPolicy::Sentences
        }
    }
}

/// Partition `script` into at most `target_count` non-empty parts, in
/// original text order.
///
/// Returns an empty vector when `target_count` is zero or the script is
/// blank; callers report that as "no content".
pub fn partition(script: &str, target_count: usize, mode: PartitionMode) -> Vec<String> {
    if target_count == 0 || script.trim().is_empty() {
        return Vec::new();
    }

    match mode {
        PartitionMode::ReuseWhole => vec![script.to_string()],
        PartitionMode::Fresh => match SplitPolicy::detect(script) {
            SplitPolicy::Lines => split_lines(script, target_count),
            SplitPolicy::Sentences => chunk_sentences(script, target_count),
        },
    }
}

/// Group sentences into `ceil(sentences / target_count)`-sized chunks joined
/// with `". "`. Chunks past `target_count` are dropped, not merged.
pub fn chunk_sentences(script: &str, target_count: usize) -> Vec<String> {
    if target_count == 0 {
        return Vec::new();
    }

    let sentences: Vec<&str> = script
        .split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect();

    let chunk_size = sentences.len().div_ceil(target_count).max(1);

    sentences
        .chunks(chunk_size)
        .map(|chunk| chunk.join(". ").trim().to_string())
        .take(target_count)
        .collect()
}

/// The first `target_count` non-empty lines, trimmed.
pub fn split_lines(script: &str, target_count: usize) -> Vec<String> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(target_count)
        .map(str::to_string)
        .collect()
}
