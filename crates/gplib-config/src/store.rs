use std::collections::BTreeMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use gplib_types::{codec, TypedValue};

use crate::error::{ConfigError, ConfigResult};
use crate::fs::{FileSystem, OsFileSystem};
use crate::options::LoadOptions;
use crate::reconcile::{reconcile, write_map, Reconciled};

/// A configuration file reconciled against a map of typed defaults.
///
/// Construction is the only time the file is read or repaired:
///
/// 1. No file: the defaults are encoded and written. The values are what
///    that file decodes to, so a later load sees the same thing.
/// 2. Otherwise the file is parsed as a flat JSON object of strings. Any
///    parse failure is [`ConfigError::InvalidConfig`].
/// 3. Defaults missing from the file are added in their encoded form and the
///    whole map is written back once.
/// 4. Each entry is decoded as the kind of its default. Entries without a
///    default are sniffed.
///
/// After that the values change only through [`set`](Self::set). Nothing is
/// written on drop; call [`save`](Self::save) to persist assignments.
#[derive(Debug)]
pub struct ConfigStore<F: FileSystem = OsFileSystem> {
    fs: F,
    path: PathBuf,
    values: BTreeMap<String, TypedValue>,
    repaired: Vec<String>,
}

impl ConfigStore<OsFileSystem> {
    /// Open `path` on the real filesystem with default options.
    pub fn open(
        path: impl AsRef<Path>,
        defaults: BTreeMap<String, TypedValue>,
    ) -> ConfigResult<Self> {
        Self::open_with(OsFileSystem, path, defaults, LoadOptions::default())
    }
}

impl<F: FileSystem> ConfigStore<F> {
    /// Open `path` on any filesystem backend.
    pub fn open_with(
        fs: F,
        path: impl AsRef<Path>,
        defaults: BTreeMap<String, TypedValue>,
        options: LoadOptions,
    ) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let encoded: BTreeMap<String, String> = defaults
            .iter()
            .map(|(key, value)| (key.clone(), codec::encode(value)))
            .collect();

        let (values, repaired) = match reconcile(&fs, &path, &encoded, &options)? {
            Reconciled::Bootstrapped => {
                (decode_entries(&path, encoded, &defaults)?, Vec::new())
            }
            Reconciled::Loaded { entries, repaired } => {
                (decode_entries(&path, entries, &defaults)?, repaired)
            }
        };

        Ok(Self {
            fs,
            path,
            values,
            repaired,
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The filesystem backend the store was opened on.
    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Keys that were missing from an existing file and filled from the
    /// defaults during construction. Empty after a bootstrap.
    pub fn repaired(&self) -> &[String] {
        &self.repaired
    }

    /// All values, keyed by name.
    pub fn values(&self) -> &BTreeMap<String, TypedValue> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.values.get(key)
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn require(&self, key: &str) -> ConfigResult<&TypedValue> {
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Assign a value in memory. Returns the previous value, if any.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<TypedValue>,
    ) -> Option<TypedValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn contains_value(&self, value: &TypedValue) -> bool {
        self.values.values().any(|v| v == value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_string(&self, key: &str) -> ConfigResult<&str> {
        Ok(self.require(key)?.as_string()?)
    }

    pub fn get_integer(&self, key: &str) -> ConfigResult<i64> {
        Ok(self.require(key)?.as_integer()?)
    }

    pub fn get_decimal(&self, key: &str) -> ConfigResult<f64> {
        Ok(self.require(key)?.as_decimal()?)
    }

    pub fn get_float(&self, key: &str) -> ConfigResult<f32> {
        Ok(self.require(key)?.as_float()?)
    }

    pub fn get_boolean(&self, key: &str) -> ConfigResult<bool> {
        Ok(self.require(key)?.as_boolean()?)
    }

    pub fn get_date(&self, key: &str) -> ConfigResult<NaiveDateTime> {
        Ok(self.require(key)?.as_date()?)
    }

    /// Write every current value back to the file in canonical encoding.
    pub fn save(&self) -> ConfigResult<()> {
        let encoded: BTreeMap<String, String> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), codec::encode(value)))
            .collect();
        write_map(&self.fs, &self.path, &encoded)
    }
}

/// Panics if `key` is absent, like indexing a map.
impl<F: FileSystem> Index<&str> for ConfigStore<F> {
    type Output = TypedValue;

    fn index(&self, key: &str) -> &TypedValue {
        self.values
            .get(key)
            .unwrap_or_else(|| panic!("no config value for key {key:?}"))
    }
}

fn decode_entries(
    path: &Path,
    entries: BTreeMap<String, String>,
    defaults: &BTreeMap<String, TypedValue>,
) -> ConfigResult<BTreeMap<String, TypedValue>> {
    entries
        .into_iter()
        .map(|(key, raw)| {
            let value = match defaults.get(&key) {
                Some(default) => codec::decode(&raw, default.kind()).map_err(|e| {
                    ConfigError::InvalidConfig {
                        path: path.to_path_buf(),
                        key: Some(key.clone()),
                        message: e.to_string(),
                    }
                })?,
                None => codec::sniff(&raw),
            };
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFileSystem;
    use chrono::NaiveDate;
    use gplib_types::ValueKind;

    const PATH: &str = "config.json";

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn defaults() -> BTreeMap<String, TypedValue> {
        BTreeMap::from([
            ("name".to_string(), TypedValue::from("hello/world")),
            ("retries".to_string(), TypedValue::from(-42i64)),
            ("ratio".to_string(), TypedValue::from(1.23456f64)),
            ("scale".to_string(), TypedValue::from(0.5f32)),
            ("enabled".to_string(), TypedValue::from(true)),
            ("verbose".to_string(), TypedValue::from(false)),
            ("since".to_string(), TypedValue::from(date(1, 1, 1))),
            ("until".to_string(), TypedValue::from(date(9999, 12, 31))),
            ("nothing".to_string(), TypedValue::Null),
        ])
    }

    fn open(fs: &InMemoryFileSystem) -> ConfigResult<ConfigStore<&InMemoryFileSystem>> {
        ConfigStore::open_with(fs, PATH, defaults(), LoadOptions::default())
    }

    fn on_disk(fs: &InMemoryFileSystem) -> BTreeMap<String, String> {
        serde_json::from_str(&fs.contents(PATH).unwrap()).unwrap()
    }

    #[test]
    fn bootstrap_writes_defaults_and_returns_them() {
        let fs = InMemoryFileSystem::new();
        let store = open(&fs).unwrap();

        assert_eq!(store.values(), &defaults());
        assert_eq!(fs.write_count(), 1);
        let disk = on_disk(&fs);
        assert_eq!(disk["enabled"], "True");
        assert_eq!(disk["since"], "DATETIME0");
        assert_eq!(disk["nothing"], "");
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let fs = InMemoryFileSystem::new();
        let first = open(&fs).unwrap();
        let second = open(&fs).unwrap();

        assert_eq!(first.values(), second.values());
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn bootstrap_returns_what_a_reload_reads() {
        let at = |nanos| {
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_nano_opt(8, 30, 0, nanos)
                .unwrap()
        };
        let fine = at(150);
        let defaults = BTreeMap::from([
            ("fine".to_string(), TypedValue::from(fine)),
            ("empty".to_string(), TypedValue::from("")),
        ]);
        let fs = InMemoryFileSystem::new();

        let first =
            ConfigStore::open_with(&fs, PATH, defaults.clone(), LoadOptions::default()).unwrap();
        let second = ConfigStore::open_with(&fs, PATH, defaults, LoadOptions::default()).unwrap();

        assert_eq!(first.values(), second.values());
        assert_eq!(first["fine"], TypedValue::Date(at(100)));
        assert!(first["empty"].is_null());
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn every_kind_survives_a_reload() {
        let fs = InMemoryFileSystem::new();
        open(&fs).unwrap();
        let store = open(&fs).unwrap();

        assert_eq!(store.get_string("name").unwrap(), "hello/world");
        assert_eq!(store.get_integer("retries").unwrap(), -42);
        assert_eq!(store.get_decimal("ratio").unwrap(), 1.23456);
        assert_eq!(store.get_float("scale").unwrap(), 0.5);
        assert!(store.get_boolean("enabled").unwrap());
        assert!(!store.get_boolean("verbose").unwrap());
        assert_eq!(store.get_date("since").unwrap(), date(1, 1, 1));
        assert_eq!(store.get_date("until").unwrap(), date(9999, 12, 31));
        assert!(store["nothing"].is_null());
    }

    #[test]
    fn missing_keys_are_repaired_and_persisted() {
        let fs = InMemoryFileSystem::new()
            .with_file(PATH, r#"{ "name": "custom", "retries": "7" }"#);
        let store = open(&fs).unwrap();

        for key in defaults().keys() {
            assert!(store.contains_key(key), "{key} missing");
        }
        assert_eq!(store.get_string("name").unwrap(), "custom");
        assert_eq!(store.get_integer("retries").unwrap(), 7);
        assert_eq!(store["ratio"], TypedValue::Decimal(1.23456));
        assert_eq!(store["until"], TypedValue::Date(date(9999, 12, 31)));

        assert_eq!(store.repaired().len(), defaults().len() - 2);
        assert!(!store.repaired().iter().any(|k| k == "name"));
        assert_eq!(fs.write_count(), 1);
        let disk = on_disk(&fs);
        assert_eq!(disk["name"], "custom");
        assert_eq!(disk["ratio"], "1.23456");
        assert_eq!(disk["verbose"], "False");
        assert_eq!(disk.len(), defaults().len());
    }

    #[test]
    fn repaired_store_reloads_without_writing() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "name": "custom" }"#);
        let first = open(&fs).unwrap();
        let second = open(&fs).unwrap();
        assert_eq!(first.values(), second.values());
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn boolean_yes_is_invalid() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "enabled": "yes" }"#);
        let err = open(&fs).unwrap_err();
        match err {
            ConfigError::InvalidConfig { key, message, .. } => {
                assert_eq!(key.as_deref(), Some("enabled"));
                assert!(message.contains("yes"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integer_abc_is_invalid() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "retries": "abc" }"#);
        assert!(open(&fs).unwrap_err().is_invalid_config());
    }

    #[test]
    fn bad_date_is_invalid() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "since": "DATETIMEnever" }"#);
        assert!(open(&fs).unwrap_err().is_invalid_config());
    }

    #[test]
    fn bare_array_is_invalid_and_untouched() {
        let fs = InMemoryFileSystem::new().with_file(PATH, "[1, 2, 3]");
        let err = open(&fs).unwrap_err();
        assert!(err.is_invalid_config());
        assert_eq!(fs.write_count(), 0);
        assert_eq!(fs.contents(PATH).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn malformed_json_is_invalid() {
        let fs = InMemoryFileSystem::new().with_file(PATH, "{ \"name\": ");
        assert!(open(&fs).unwrap_err().is_invalid_config());
    }

    #[test]
    fn extra_keys_are_sniffed() {
        let fs = InMemoryFileSystem::new().with_file(
            PATH,
            r#"{ "flag": "True", "count": "42", "blank": "", "pi": "3.5", "word": "abc" }"#,
        );
        let store = open(&fs).unwrap();

        assert_eq!(store["flag"], TypedValue::Boolean(true));
        assert_eq!(store["count"], TypedValue::Integer(42));
        assert_eq!(store["blank"], TypedValue::Null);
        assert_eq!(store["pi"], TypedValue::Decimal(3.5));
        assert_eq!(store["word"].kind(), ValueKind::String);
    }

    #[test]
    fn schema_kind_wins_over_sniffing() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "name": "42", "ratio": "2" }"#);
        let store = open(&fs).unwrap();
        assert_eq!(store["name"], TypedValue::String("42".into()));
        assert_eq!(store["ratio"], TypedValue::Decimal(2.0));
    }

    #[test]
    fn empty_token_is_null_for_typed_key() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "retries": "" }"#);
        let store = open(&fs).unwrap();
        assert!(store["retries"].is_null());
        assert!(store.get_integer("retries").is_err());
    }

    #[test]
    fn write_failure_is_io_error() {
        let fs = InMemoryFileSystem::new();
        fs.set_read_only(true);
        let err = open(&fs).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn typed_getter_reports_mismatch_and_missing() {
        let fs = InMemoryFileSystem::new();
        let store = open(&fs).unwrap();
        assert!(matches!(
            store.get_integer("enabled"),
            Err(ConfigError::TypeMismatch(_))
        ));
        assert!(matches!(
            store.get_integer("absent"),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn set_is_in_memory_until_saved() {
        let fs = InMemoryFileSystem::new();
        let mut store = open(&fs).unwrap();

        let previous = store.set("retries", 3i64);
        assert_eq!(previous, Some(TypedValue::Integer(-42)));
        store.set("added", "new");
        assert!(store.contains_value(&TypedValue::from("new")));
        assert_eq!(on_disk(&fs)["retries"], "-42");

        store.save().unwrap();
        let disk = on_disk(&fs);
        assert_eq!(disk["retries"], "3");
        assert_eq!(disk["added"], "new");
        assert_eq!(fs.write_count(), 2);
    }

    #[test]
    fn iteration_and_size() {
        let fs = InMemoryFileSystem::new();
        let store = open(&fs).unwrap();
        assert_eq!(store.len(), defaults().len());
        assert!(!store.is_empty());
        assert_eq!(store.keys().count(), store.iter().count());
        assert_eq!(store.path(), Path::new(PATH));
        assert_eq!(store.file_system().write_count(), 1);
    }

    #[test]
    fn quiet_options_load_the_same_values() {
        let fs = InMemoryFileSystem::new().with_file(PATH, r#"{ "name": "x" }"#);
        let quiet = ConfigStore::open_with(&fs, PATH, defaults(), LoadOptions::quiet()).unwrap();
        let loud = open(&fs).unwrap();
        assert_eq!(quiet.values(), loud.values());
    }

    #[test]
    fn real_filesystem_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app/config.json");

        let first = ConfigStore::open(&path, defaults()).unwrap();
        assert!(path.is_file());
        let second = ConfigStore::open(&path, defaults()).unwrap();
        assert_eq!(first.values(), second.values());
    }
}
