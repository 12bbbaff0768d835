//! # State File
//!
//! The CLI keeps one [`Ledger`] per state file, wrapped in a
//! [`SealedState`] envelope. Loading checks the digest and the registry's
//! structural invariants; a file that fails either is refused rather than
//! repaired.
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so an interrupted write leaves the previous state intact.

use std::path::Path;

use anyhow::{bail, Context, Result};
use sreg_core::SealedState;
use sreg_state::{Ledger, RegistryError};

pub fn load_ledger(path: &Path) -> Result<Ledger> {
    if !path.exists() {
        bail!(
            "no registry deployed at {} (run `sreg deploy` first)",
            path.display()
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read state file: {}", path.display()))?;
    let sealed: SealedState<Ledger> = SealedState::from_json(&content)
        .with_context(|| format!("failed to parse state file: {}", path.display()))?;
    let ledger = sealed
        .unseal()
        .with_context(|| format!("state file failed integrity check: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        students = ledger.registry().student_count(),
        "loaded ledger"
    );
    Ok(ledger)
}

pub fn save_ledger(path: &Path, ledger: Ledger) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create state directory: {}", parent.display()))?;
    }
    let sealed = SealedState::seal(ledger)?;
    let json = sealed.to_json()?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("failed to write state file: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace state file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), digest = %sealed.digest, "saved ledger");
    Ok(())
}

/// Load, apply `op`, and save only if `op` succeeded.
pub fn update_ledger<T>(
    path: &Path,
    op: impl FnOnce(&mut Ledger) -> Result<T, RegistryError>,
) -> Result<T> {
    let mut ledger = load_ledger(path)?;
    let out = op(&mut ledger)?;
    save_ledger(path, ledger)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sreg_core::{Address, Wei};
    use sreg_state::RegistryConfig;

    const OWNER: Address = Address::repeat_byte(0x01);
    const ADA: Address = Address::repeat_byte(0xa1);

    fn deployed(path: &Path) {
        let mut ledger = Ledger::deploy(OWNER, RegistryConfig::default()).unwrap();
        ledger.fund(&ADA, Wei::ONE_ETHER).unwrap();
        ledger.pay_fee(&ADA, Wei::ONE_ETHER).unwrap();
        ledger.register(&ADA, "Ada", 19).unwrap();
        ledger.authorize_student_registration(&OWNER, &ADA).unwrap();
        save_ledger(path, ledger).unwrap();
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        deployed(&path);

        let ledger = load_ledger(&path).unwrap();
        assert_eq!(ledger.registry().get_student(1).unwrap().name, "Ada");
        assert_eq!(ledger.registry().custody_balance(), Wei::ONE_ETHER);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_state_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_ledger(&dir.path().join("ledger.json")).unwrap_err();
        assert!(err.to_string().contains("no registry deployed"));
    }

    #[test]
    fn tampered_balance_fails_integrity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        deployed(&path);

        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["state"]["registry"]["custody"] = serde_json::json!("5000000000000000000");
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let err = load_ledger(&path).unwrap_err();
        assert!(format!("{err:#}").contains("digest mismatch"));
    }

    #[test]
    fn broken_roster_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        deployed(&path);

        let mut doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["state"]["registry"]["roster"] = serde_json::json!([]);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let err = load_ledger(&path).unwrap_err();
        assert!(format!("{err:#}").contains("corrupt registry state"));
    }

    #[test]
    fn failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        deployed(&path);
        let before = std::fs::read_to_string(&path).unwrap();

        let result = update_ledger(&path, |l| l.register(&ADA, "Again", 40));
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
