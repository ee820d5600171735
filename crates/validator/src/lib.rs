//! Structural and semantic validation of raw transaction records.
//!
//! Validation here is total: [`validate`] checks every field and always
//! returns, never panics. A record that fails is diverted into a
//! [`ValidationFailure`] rather than persisted; it never aborts a batch.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use bigdecimal::BigDecimal;
use indexer_types::{RawTransaction, TransactionRecord, ValidationFailure};

/// Validates a single raw transaction, returning either a persistable
/// [`TransactionRecord`] or a structured [`ValidationFailure`].
///
/// This function never panics and never raises: every field is checked and
/// the result fully describes the outcome.
pub fn validate(raw: &RawTransaction) -> Result<TransactionRecord, ValidationFailure> {
    let block_number = non_negative(raw.block_number, raw.block_number, "block_number")?;
    let transaction_index =
        non_negative(raw.transaction_index, raw.block_number, "transaction_index")?
            .try_into()
            .map_err(|_| {
                ValidationFailure::new(raw.block_number, "transaction_index exceeds u32 range")
            })?;
    let block_hash = parse_hash(&raw.block_hash, raw.block_number, "block_hash")?;
    let transaction_hash =
        parse_hash(&raw.transaction_hash, raw.block_number, "transaction_hash")?;
    let from_address = parse_address(&raw.from_address, raw.block_number, "from_address")?;
    let to_address = match raw.to_address.as_deref() {
        None => None,
        Some("") => {
            return Err(ValidationFailure::new(
                raw.block_number,
                "to_address: empty string is not a valid absent value, omit the field instead",
            ));
        }
        Some(addr) => Some(parse_address(addr, raw.block_number, "to_address")?),
    };
    let amount = parse_amount(&raw.amount, raw.block_number)?;

    Ok(TransactionRecord {
        block_number,
        block_hash,
        transaction_hash,
        transaction_index,
        from_address,
        to_address,
        amount,
        is_internal_call: raw.is_internal_call.unwrap_or(false),
    })
}

/// Validates a batch, splitting it into persistable records and a flat
/// failure report. Both the ingestion loop and the backfill driver use this
/// entry point so that one malformed transaction never aborts the rest of
/// the batch.
pub fn validate_batch(
    raws: &[RawTransaction],
) -> (Vec<TransactionRecord>, Vec<ValidationFailure>) {
    let mut records = Vec::with_capacity(raws.len());
    let mut failures = Vec::new();
    for raw in raws {
        match validate(raw) {
            Ok(record) => records.push(record),
            Err(failure) => failures.push(failure),
        }
    }
    (records, failures)
}

fn non_negative(value: i64, block_number: i64, field: &str) -> Result<u64, ValidationFailure> {
    u64::try_from(value)
        .map_err(|_| ValidationFailure::new(block_number, format!("{field} must be non-negative")))
}

fn parse_hash(raw: &str, block_number: i64, field: &str) -> Result<B256, ValidationFailure> {
    if raw.len() != 66 || !raw.starts_with("0x") {
        return Err(ValidationFailure::new(
            block_number,
            format!("{field} must be a 0x-prefixed 32-byte hex string (66 chars), got {raw:?}"),
        ));
    }
    B256::from_str(raw)
        .map_err(|e| ValidationFailure::new(block_number, format!("{field}: {e}")))
}

fn parse_address(raw: &str, block_number: i64, field: &str) -> Result<Address, ValidationFailure> {
    if raw.len() != 42 || !raw.starts_with("0x") {
        return Err(ValidationFailure::new(
            block_number,
            format!("{field} must be a 0x-prefixed 20-byte hex string (42 chars), got {raw:?}"),
        ));
    }
    Address::from_str(raw)
        .map_err(|e| ValidationFailure::new(block_number, format!("{field}: {e}")))
}

/// Verifies `raw` is an exact, non-negative, integer decimal string: digits
/// only, no sign, no fractional part. Rejects `""`, `"-1"`, `"1.5"`, `"+1"`,
/// and leading/trailing whitespace.
fn parse_amount(raw: &str, block_number: i64) -> Result<BigDecimal, ValidationFailure> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationFailure::new(
            block_number,
            format!("amount must be a non-negative integer decimal string, got {raw:?}"),
        ));
    }
    BigDecimal::from_str(raw)
        .map_err(|e| ValidationFailure::new(block_number, format!("amount: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base_raw() -> RawTransaction {
        RawTransaction {
            block_number: 100,
            block_hash: format!("0x{}", "11".repeat(32)),
            transaction_hash: format!("0x{}", "22".repeat(32)),
            transaction_index: 0,
            from_address: format!("0x{}", "33".repeat(20)),
            to_address: Some(format!("0x{}", "44".repeat(20))),
            amount: "0".to_string(),
            is_internal_call: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_record() {
        let raw = base_raw();
        let record = validate(&raw).expect("should validate");
        assert_eq!(record.block_number, 100);
        assert!(!record.is_internal_call);
    }

    #[test]
    fn contract_creation_has_no_to_address() {
        let mut raw = base_raw();
        raw.to_address = None;
        let record = validate(&raw).expect("should validate");
        assert_eq!(record.to_address, None);
    }

    #[test]
    fn empty_to_address_is_rejected_not_treated_as_absent() {
        let mut raw = base_raw();
        raw.to_address = Some(String::new());
        let failure = validate(&raw).unwrap_err();
        assert!(failure.reason.contains("to_address"));
    }

    #[rstest]
    #[case::negative("-1")]
    #[case::fractional("1.5")]
    #[case::plus_signed("+1")]
    #[case::non_numeric("abc")]
    #[case::empty("")]
    fn rejects_malformed_amounts(#[case] amount: &str) {
        let mut raw = base_raw();
        raw.amount = amount.to_string();
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn accepts_zero_amount() {
        let mut raw = base_raw();
        raw.amount = "0".to_string();
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn accepts_genesis_block_number() {
        let mut raw = base_raw();
        raw.block_number = 0;
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn rejects_negative_block_number() {
        let mut raw = base_raw();
        raw.block_number = -1;
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn rejects_malformed_hash_length() {
        let mut raw = base_raw();
        raw.block_hash = "0xdead".to_string();
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn validate_batch_splits_good_from_bad() {
        let good = base_raw();
        let mut bad = base_raw();
        bad.amount = "-5".to_string();

        let (records, failures) = validate_batch(&[good, bad]);
        assert_eq!(records.len(), 1);
        assert_eq!(failures.len(), 1);
    }
}
