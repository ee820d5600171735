//! Hand-written diesel table definitions.
//!
//! There is no `diesel print-schema` step in this workspace (no toolchain
//! invocation is part of the build), so these mirror `migrations/` by hand.
//! Keep them in lockstep.

diesel::table! {
    checkpoint (id) {
        id -> Text,
        block_number -> BigInt,
        block_hash -> Nullable<Text>,
        last_updated -> Timestamptz,
    }
}

diesel::table! {
    transactions (transaction_hash, block_number) {
        block_number -> BigInt,
        block_hash -> Text,
        transaction_hash -> Text,
        transaction_index -> Integer,
        from_address -> Text,
        to_address -> Nullable<Text>,
        amount -> Numeric,
        is_internal_call -> Bool,
    }
}

// Created and dropped within a single `bulk_ingest` transaction. Declared
// here, rather than generated, so the typed `insert_into`/`values` DSL below
// can target it; see `gateway::bulk_ingest`.
diesel::table! {
    transactions_staging (transaction_hash, block_number) {
        block_number -> BigInt,
        block_hash -> Text,
        transaction_hash -> Text,
        transaction_index -> Integer,
        from_address -> Text,
        to_address -> Nullable<Text>,
        amount -> Numeric,
        is_internal_call -> Bool,
    }
}
