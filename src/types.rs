use ethers_core::types::U256;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Length of a `0x`-prefixed, 20-byte hex address.
pub const ADDRESS_LEN: usize = 42;

/// One holder as reported by the explorer API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolderRecord {
    pub address: String,
    #[serde(rename = "amountHeld", deserialize_with = "decimal_u256")]
    pub amount_held: U256,
}

/// Body of `GET /v1/tokens/<contract>/holders?page=<n>`.
#[derive(Debug, Deserialize)]
pub struct HoldersResponse {
    pub result: Vec<HolderRecord>,
}

/// Amount owed to one address after deduction and scaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub address: String,
    #[serde(serialize_with = "u256_as_decimal")]
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerDraw {
    pub winners: Vec<String>,
    pub backups: Vec<String>,
}

/// The explorer reports balances as decimal strings; plain numbers show up for
/// small NFT balances.
fn decimal_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => U256::from_dec_str(s.trim()).map_err(de::Error::custom),
        Raw::Number(n) => Ok(U256::from(n)),
    }
}

fn u256_as_decimal<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// `0x` prefix and exactly 42 characters; the characters themselves are not
/// checked.
pub fn has_address_shape(candidate: &str) -> bool {
    candidate.starts_with("0x") && has_address_len(candidate)
}

/// Length in characters, not UTF-8 bytes.
pub fn has_address_len(candidate: &str) -> bool {
    candidate.chars().count() == ADDRESS_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_holder_page() {
        let body = r#"{"result":[
            {"address":"0x1dA9E7adfB6817D42b1c9a5321992B1EF97701Ab","amountHeld":"2000000000000"},
            {"address":"0x7D197D87Aa79E27bcdc3a62f819329deC6F81Ec2","amountHeld":7}
        ]}"#;

        let page: HoldersResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.result.len(), 2);
        assert_eq!(page.result[0].amount_held, U256::from(2_000_000_000_000u64));
        assert_eq!(page.result[1].amount_held, U256::from(7));
    }

    #[test]
    fn test_rejects_non_decimal_amount() {
        let body = r#"{"address":"0x00","amountHeld":"12abc"}"#;
        assert!(serde_json::from_str::<HolderRecord>(body).is_err());
    }

    #[test]
    fn test_amount_beyond_u64() {
        let body = r#"{"address":"0x00","amountHeld":"340282366920938463463374607431768211456"}"#;
        let record: HolderRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.amount_held, U256::from(u128::MAX) + U256::one());
    }

    #[test]
    fn test_allocation_serializes_decimal() {
        let allocation = Allocation {
            address: "0xabc".to_string(),
            amount: U256::from(800_000_000_000u64),
        };
        let json = serde_json::to_string(&allocation).unwrap();
        assert_eq!(json, r#"{"address":"0xabc","amount":"800000000000"}"#);
    }

    #[test]
    fn test_address_shape() {
        assert!(has_address_shape(&format!("0x{}", "a".repeat(40))));
        assert!(!has_address_shape(&format!("0x{}", "a".repeat(39))));
        assert!(!has_address_shape(&format!("1x{}", "a".repeat(40))));
        // 42 bytes, 41 characters
        assert!(!has_address_shape(&format!("0x{}é", "a".repeat(38))));
    }
}
