//! Property store access and the device property reader.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use crate::collector::runner::run_command_with_timeout;
use crate::error::{Error, Result};
use crate::types::{DeviceProps, UNKNOWN};

pub const RELEASE_KEY: &str = "ro.build.version.release";
pub const SDK_KEY: &str = "ro.build.version.sdk";
pub const ABI_LIST_KEY: &str = "ro.product.cpu.abilist";
pub const ABI_KEY: &str = "ro.product.cpu.abi";
pub const BRAND_KEY: &str = "ro.product.brand";
pub const MODEL_KEY: &str = "ro.product.model";
pub const VNDK_KEY: &str = "ro.vndk.version";
pub const FIRST_API_LEVEL_KEY: &str = "ro.product.first_api_level";

/// First SDK level (Android 10) where a missing VNDK/first-API value is
/// inferred as `sdk - 1`.
const INFER_FROM_SDK_MIN: u32 = 29;

/// Read-only lookup of platform properties by name.
///
/// An absent key is `Ok(None)`; `Err` means the store itself could not be
/// reached.
pub trait PropertyStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Live store backed by the device's `getprop` binary.
pub struct GetpropStore {
    program: String,
    timeout: Duration,
}

impl GetpropStore {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("getprop", timeout)
    }

    /// Store that queries `program` with the key as its only argument.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl PropertyStore for GetpropStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = run_command_with_timeout(&self.program, &[key], self.timeout)
            .map_err(|err| Error::PropertyAccess(err.to_string()))?;
        if result.exit_code != Some(0) {
            return Err(Error::PropertyAccess(format!(
                "{} {key} exited with {:?}: {}",
                self.program,
                result.exit_code,
                result.stderr.trim()
            )));
        }
        Ok(non_blank(&result.stdout))
    }
}

/// Store parsed from a captured `getprop` dump (`[key]: [value]` per line),
/// for reporting on a device other than the one running the tool.
#[derive(Debug, Default)]
pub struct DumpStore {
    props: HashMap<String, String>,
}

fn dump_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^\[([^\]]+)\]:\s*\[(.*)\]\s*$").expect("getprop dump pattern is valid")
    })
}

impl DumpStore {
    pub fn parse(text: &str) -> Self {
        let props = text
            .lines()
            .filter_map(|line| dump_line().captures(line.trim()))
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect::<HashMap<_, _>>();
        debug!(count = props.len(), "parsed getprop dump");
        Self { props }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            Error::PropertyAccess(format!("failed to read {}: {err}", path.display()))
        })?;
        Ok(Self::parse(&raw))
    }
}

impl PropertyStore for DumpStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.props.get(key).and_then(|v| non_blank(v)))
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MapStore {
    props: HashMap<String, String>,
}

impl MapStore {
    pub fn new<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            props: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertyStore for MapStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.props.get(key).and_then(|v| non_blank(v)))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct PropertyReader<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> PropertyReader<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    /// Best-effort read; every missing value resolves to a fallback.
    pub fn read(&self) -> DeviceProps {
        let sdk_level = self
            .lookup(SDK_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        let abi = self
            .lookup(ABI_LIST_KEY)
            .and_then(|list| list.split(',').next().and_then(non_blank))
            .or_else(|| self.lookup(ABI_KEY))
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());

        let props = DeviceProps {
            brand: self.lookup_or_unknown(BRAND_KEY),
            model: self.lookup_or_unknown(MODEL_KEY),
            os_release: self.lookup_or_unknown(RELEASE_KEY),
            sdk_level,
            abi,
            vndk_version: infer_api_level(self.lookup(VNDK_KEY), sdk_level),
            first_api_level: infer_api_level(self.lookup(FIRST_API_LEVEL_KEY), sdk_level),
        };
        info!(
            brand = %props.brand,
            model = %props.model,
            sdk = props.sdk_level,
            vndk = %props.vndk_version,
            "read device properties"
        );
        props
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                debug!(key, error = %err, "property lookup failed, treating as absent");
                None
            }
        }
    }

    fn lookup_or_unknown(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Devices launched on SDK N usually ship vendor VNDK N-1.
pub fn infer_api_level(raw: Option<String>, sdk_level: u32) -> String {
    match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ if sdk_level >= INFER_FROM_SDK_MIN => (sdk_level - 1).to_string(),
        _ => UNKNOWN.to_string(),
    }
}


#[cfg(all(test, unix))]
mod getprop_tests {
    use super::*;
    use crate::collector::partition::{self, AB_UPDATE_KEY, SLOT_SUFFIX_KEY};
    use crate::collector::runner::DEFAULT_TIMEOUT;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    const FAKE_GETPROP: &str = "#!/bin/sh\n\
        case \"$1\" in\n\
          ro.build.ab_update) echo true ;;\n\
          ro.boot.slot_suffix) echo ' _b ' ;;\n\
          ro.build.version.sdk) echo 34 ;;\n\
          ro.product.model) echo '  Pixel 8  ' ;;\n\
          ro.product.brand) echo 'device offline' >&2; exit 1 ;;\n\
          *) echo ;;\n\
        esac\n";

    fn fake_getprop(dir: &TempDir) -> GetpropStore {
        let path = dir.path().join("getprop");
        fs::write(&path, FAKE_GETPROP).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        GetpropStore::with_program(path.to_string_lossy(), DEFAULT_TIMEOUT)
    }

    #[test]
    fn blank_output_is_absent_and_values_are_trimmed() {
        let dir = TempDir::new().unwrap();
        let store = fake_getprop(&dir);
        assert_eq!(store.get(VNDK_KEY).unwrap(), None);
        assert_eq!(store.get(MODEL_KEY).unwrap().as_deref(), Some("Pixel 8"));
        assert_eq!(store.get(SLOT_SUFFIX_KEY).unwrap().as_deref(), Some("_b"));
        assert_eq!(store.get(AB_UPDATE_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn non_zero_exit_is_an_access_error() {
        let dir = TempDir::new().unwrap();
        match fake_getprop(&dir).get(BRAND_KEY) {
            Err(Error::PropertyAccess(msg)) => assert!(msg.contains("device offline"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn live_store_feeds_reader_and_classifier() {
        let dir = TempDir::new().unwrap();
        let store = fake_getprop(&dir);
        assert!(partition::classify(&store));

        let props = PropertyReader::new(&store).read();
        assert_eq!(props.brand, UNKNOWN);
        assert_eq!(props.model, "Pixel 8");
        assert_eq!(props.sdk_level, 34);
        assert_eq!(props.vndk_version, "33");
    }

    #[test]
    fn missing_binary_degrades_to_fallbacks() {
        let store = GetpropStore::with_program("/nonexistent/getprop", DEFAULT_TIMEOUT);
        assert!(matches!(store.get(SDK_KEY), Err(Error::PropertyAccess(_))));
        assert!(!partition::classify(&store));

        let props = PropertyReader::new(&store).read();
        assert_eq!(props.sdk_level, 0);
        assert_eq!(props.model, UNKNOWN);
        assert_eq!(props.vndk_version, UNKNOWN);
        assert_eq!(props.first_api_level, UNKNOWN);
        assert_eq!(props.abi, std::env::consts::ARCH);
    }
}
