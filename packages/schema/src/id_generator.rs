use crc32fast::Hasher;

/// Short stable seed derived from a document key (its title, file name, ...)
pub fn document_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes created while editing one document
///
/// Ids look like `column-<seed>-<n>`; the counter is shared across kinds so an
/// id is never handed out twice by the same generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: document_seed(key),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Next id, prefixed with the node kind (`section`, `row`, `column`, `text`, ...)
    pub fn next_id(&mut self, kind: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", kind, self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(document_seed("Welcome"), document_seed("Welcome"));
        assert_ne!(document_seed("Welcome"), document_seed("Receipt"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::from_seed("abc");

        assert_eq!(ids.next_id("row"), "row-abc-1");
        assert_eq!(ids.next_id("column"), "column-abc-2");
    }
}
