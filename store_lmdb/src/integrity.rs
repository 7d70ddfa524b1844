//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the VSP issues any
//! fee address. A healthy database satisfies:
//! - every ticket row decodes,
//! - no two tickets share a fee address index,
//! - no ticket's fee address index is ahead of the persisted cursor.

use std::collections::HashMap;
use std::path::Path;

use vsp_store::AddressIndexStore;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

/// Summary of an integrity check run.
pub struct IntegrityReport {
    pub tickets_checked: u64,
    pub last_address_index: u32,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let last_address_index = env
        .get_last_address_index()
        .map_err(|e| LmdbError::Heed(e.to_string()))?;
    let mut report = IntegrityReport {
        tickets_checked: 0,
        last_address_index,
        errors: Vec::new(),
    };

    let rtxn = env.env.read_txn()?;
    let mut owners: HashMap<u32, String> = HashMap::new();
    for entry in env.tickets_db.iter(&rtxn)? {
        let (key, bytes) = entry?;
        report.tickets_checked += 1;
        let ticket: vsp_types::Ticket = match bincode::deserialize(bytes) {
            Ok(t) => t,
            Err(e) => {
                report
                    .errors
                    .push(format!("ticket row {} does not decode: {e}", hex::encode(key)));
                continue;
            }
        };
        if ticket.fee_address_index > last_address_index {
            report.errors.push(format!(
                "ticket {} uses fee address index {} beyond cursor {}",
                ticket.hash, ticket.fee_address_index, last_address_index
            ));
        }
        if let Some(other) = owners.insert(ticket.fee_address_index, ticket.hash.to_string()) {
            report.errors.push(format!(
                "fee address index {} issued to both {} and {}",
                ticket.fee_address_index, other, ticket.hash
            ));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
