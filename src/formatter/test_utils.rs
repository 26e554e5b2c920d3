//! Shared helpers for formatter tests

/// Split text into chunks of `chunk_size` characters
pub fn chunk_str(s: &str, chunk_size: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut chunks = Vec::new();

    for chunk in chars.chunks(chunk_size) {
        chunks.push(chunk.iter().collect::<String>());
    }

    chunks
}

/// Cumulative buffer snapshots, as a socket delivers them token by token
pub fn cumulative_snapshots(s: &str, chunk_size: usize) -> Vec<String> {
    let mut buffer = String::new();
    chunk_str(s, chunk_size)
        .into_iter()
        .map(|chunk| {
            buffer.push_str(&chunk);
            buffer.clone()
        })
        .collect()
}

/// True when `output` contains a `"key":` fragment of raw JSON
pub fn contains_raw_json_key(output: &str) -> bool {
    regex::Regex::new(r#""[A-Za-z_]+"\s*:"#)
        .unwrap()
        .is_match(output)
}
