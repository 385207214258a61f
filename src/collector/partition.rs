//! A/B (seamless update) partition layout detection.

use tracing::{debug, warn};

use crate::collector::props::PropertyStore;
use crate::error::Result;

pub const AB_UPDATE_KEY: &str = "ro.build.ab_update";
pub const SLOT_SUFFIX_KEY: &str = "ro.boot.slot_suffix";

/// Returns true for A/B devices.
///
/// `ab_update == "true"` wins; otherwise a `_a`/`_b` slot suffix counts.
/// A store failure is logged and reported as A-only.
///
/// Stores hand over trimmed values, so a suffix padded with whitespace
/// (`" _a "`) still counts; only the exact `_a`/`_b` tokens match after that.
pub fn classify(store: &dyn PropertyStore) -> bool {
    match try_classify(store) {
        Ok(is_ab) => {
            debug!(is_ab, "classified partition layout");
            is_ab
        }
        Err(err) => {
            warn!(error = %err, "A/B detection failed, assuming A-only");
            false
        }
    }
}

fn try_classify(store: &dyn PropertyStore) -> Result<bool> {
    if store.get(AB_UPDATE_KEY)?.as_deref() == Some("true") {
        return Ok(true);
    }
    Ok(store
        .get(SLOT_SUFFIX_KEY)?
        .is_some_and(|suffix| is_slot_suffix(&suffix)))
}

fn is_slot_suffix(suffix: &str) -> bool {
    matches!(suffix, "_a" | "_b")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::props::MapStore;
    use crate::error::Error;

    struct DeniedStore;

    impl PropertyStore for DeniedStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::PropertyAccess("permission denied".into()))
        }
    }

    #[test]
    fn ab_update_wins_regardless_of_suffix() {
        for suffix in ["", "_a", "_z", "garbage"] {
            let store = MapStore::new([(AB_UPDATE_KEY, "true"), (SLOT_SUFFIX_KEY, suffix)]);
            assert!(classify(&store), "suffix {suffix:?}");
        }
    }

    #[test]
    fn slot_suffix_alone_marks_ab() {
        let store = MapStore::new([(SLOT_SUFFIX_KEY, "_b")]);
        assert!(classify(&store));

        let store = MapStore::new([(AB_UPDATE_KEY, "false"), (SLOT_SUFFIX_KEY, "_a")]);
        assert!(classify(&store));
    }

    #[test]
    fn padded_slot_suffix_still_marks_ab() {
        for suffix in [" _a ", "_b\n", "\t_a"] {
            let store = MapStore::new([(SLOT_SUFFIX_KEY, suffix)]);
            assert!(classify(&store), "suffix {suffix:?}");
        }
    }

    #[test]
    fn missing_or_malformed_signals_mean_a_only() {
        assert!(!classify(&MapStore::default()));

        for suffix in ["_c", "a", "_ab", "_A", "__a"] {
            let store = MapStore::new([(AB_UPDATE_KEY, "TRUE"), (SLOT_SUFFIX_KEY, suffix)]);
            assert!(!classify(&store), "suffix {suffix:?}");
        }
    }

    #[test]
    fn store_failure_is_a_only() {
        assert!(!classify(&DeniedStore));
    }
}
