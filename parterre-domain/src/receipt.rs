use serde::{Deserialize, Serialize};

/// Success record handed back for a purchase. The serialized form is cached
/// under the client's idempotency key and returned verbatim on retries, so
/// the field set here is the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub success: bool,
    pub tx_id: String,
}

impl Receipt {
    pub fn new(tx_id: String) -> Receipt {
        Receipt {
            success: true,
            tx_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_is_stable() {
        let receipt = Receipt::new("tx_0011223344".to_string());
        let first = serde_json::to_string(&receipt).unwrap();
        let second = serde_json::to_string(&receipt).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, r#"{"success":true,"txId":"tx_0011223344"}"#);
    }

    #[test]
    fn deserializes_cached_form() {
        let receipt: Receipt =
            serde_json::from_str(r#"{"success":true,"txId":"tx_abc"}"#).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.tx_id, "tx_abc");
    }
}
