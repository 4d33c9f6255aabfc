// crates/neurochain-core/src/crypto.rs
//
// Content hashing for model fingerprints and block linkage.
//
// Block hashes are computed over a canonical JSON encoding: object keys sorted
// lexicographically at every depth, compact separators, arrays kept in order.
// The encoding is produced here rather than relying on serde_json's map type,
// whose key order depends on crate features enabled elsewhere in the build.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::block::Block;
use crate::error::NeuroError;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 digest of the given bytes as lowercase hex.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Returns `true` if `s` is a well-formed digest: 64 lowercase hex characters.
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Hash a block over its canonical JSON encoding.
pub fn hash_block(block: &Block) -> String {
    // Serializing a plain struct of strings and numbers cannot fail.
    let value = serde_json::to_value(block).unwrap_or(Value::Null);
    digest(canonical_json(&value).as_bytes())
}

/// Try-variant of [`hash_block`] for callers that want the serializer error.
pub fn try_hash_block(block: &Block) -> Result<String, NeuroError> {
    let value = serde_json::to_value(block)?;
    Ok(digest(canonical_json(&value).as_bytes()))
}

/// Encode a JSON value canonically: sorted keys, no insignificant whitespace.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Strings re-use serde_json's escaping rules.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Transaction;

    fn make_block() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000.25,
            transactions: vec![
                Transaction {
                    author: "alice".to_string(),
                    model_name: "resnet50".to_string(),
                    model_hash: digest(b"weights"),
                    timestamp: 1_700_000_000.125,
                },
                Transaction {
                    author: "bob".to_string(),
                    model_name: "bert-base".to_string(),
                    model_hash: digest(b"other weights"),
                    timestamp: 1_700_000_000.5,
                },
            ],
            proof: 35_293,
            previous_hash: digest(b"genesis"),
        }
    }

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest(b"abc").len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_is_digest() {
        assert!(is_digest(&digest(b"model")));
        assert!(!is_digest(""));
        assert!(!is_digest("abc"));
        assert!(!is_digest(&digest(b"model").to_uppercase()));
        let mut bad = digest(b"model");
        bad.replace_range(0..1, "g");
        assert!(!is_digest(&bad));
    }

    #[test]
    fn test_canonical_json_sorts_keys_without_whitespace() {
        let value = serde_json::json!({
            "z": 1,
            "a": {"y": [3, 2, 1], "b": "text"},
            "m": null
        });
        assert_eq!(
            canonical_json(&value),
            r#"{"a":{"b":"text","y":[3,2,1]},"m":null,"z":1}"#
        );
    }

    #[test]
    fn test_block_encoding_uses_wire_field_names() {
        let block = make_block();
        let value = serde_json::to_value(&block).unwrap();
        let encoded = canonical_json(&value);
        assert!(encoded.starts_with(r#"{"index":2,"nonce":35293,"previous_hash":""#));
        assert!(encoded.contains(r#""transactions":[{"author":"alice","model_hash":""#));
    }

    #[test]
    fn test_hash_block_deterministic() {
        let block = make_block();
        let h1 = hash_block(&block);
        let h2 = hash_block(&block.clone());
        assert_eq!(h1, h2);
        assert_eq!(h1, try_hash_block(&block).unwrap());
        assert!(is_digest(&h1));
    }

    #[test]
    fn test_hash_block_sensitive_to_every_field() {
        let base = make_block();
        let base_hash = hash_block(&base);

        let mut b = base.clone();
        b.index = 3;
        assert_ne!(hash_block(&b), base_hash);

        let mut b = base.clone();
        b.timestamp += 0.001;
        assert_ne!(hash_block(&b), base_hash);

        let mut b = base.clone();
        b.proof += 1;
        assert_ne!(hash_block(&b), base_hash);

        let mut b = base.clone();
        b.previous_hash = digest(b"elsewhere");
        assert_ne!(hash_block(&b), base_hash);

        let mut b = base.clone();
        b.transactions[0].author = "mallory".to_string();
        assert_ne!(hash_block(&b), base_hash);

        // Transaction order is significant.
        let mut b = base.clone();
        b.transactions.swap(0, 1);
        assert_ne!(hash_block(&b), base_hash);
    }
}
