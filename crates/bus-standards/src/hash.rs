#![deny(unsafe_code)]

use sha2::Digest;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Dedupe key for a placeholder resource: one per raw text and target graph.
pub fn placeholder_key(text: &str, graph_id: &str) -> String {
    sha256_hex(format!("{text}_{graph_id}").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_on_text_and_graph() {
        assert_eq!(placeholder_key("E35N42-11", "g-1"), placeholder_key("E35N42-11", "g-1"));
        assert_ne!(placeholder_key("E35N42-11", "g-1"), placeholder_key("E35N42-11", "g-2"));
        assert_eq!(placeholder_key("a", "b").len(), 64);
    }
}
