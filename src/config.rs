//! Credential resolution with layered sources
//!
//! Precedence per field (highest to lowest):
//! 1. CLI flags: `--url`, `--username`, `--password`
//! 2. Environment variables: `ZFR_URL`, `ZFR_USERNAME`, `ZFR_PASSWORD`
//! 3. Config file: `[jira]` section with keys `url`, `user`, `password`
//!
//! The config file location itself comes from `--config`, then `ZFR_CONFIG`,
//! then `$HOME/zfr.cfg`. Only the default location may be missing.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, File, FileStoredFormat, Format, Value, ValueKind};
use ini::{Ini, ParseOption};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "ZFR_CONFIG";

/// Config file name looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = "zfr.cfg";

/// Ini section holding the Jira credentials.
pub const CONFIG_SECTION: &str = "jira";

/// A credential that must be resolved before talking to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    Url,
    Username,
    Password,
}

impl CredentialField {
    /// All fields, in the order they are checked and reported.
    pub const ALL: [CredentialField; 3] = [Self::Url, Self::Username, Self::Password];

    /// Long CLI flag name, without dashes.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    /// Full environment variable name.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Url => "ZFR_URL",
            Self::Username => "ZFR_USERNAME",
            Self::Password => "ZFR_PASSWORD",
        }
    }

    /// Key inside the `[jira]` config section.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Username => "user",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Fully resolved connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub config: Option<PathBuf>,
}

/// Snapshot of the process environment.
///
/// Resolution reads from this snapshot instead of the live environment,
/// which keeps it deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct EnvVars(HashMap<String, String>);

impl EnvVars {
    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self::from_os(std::env::vars_os())
    }

    fn from_os(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        vars.into_iter()
            .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (name, _) => {
                    debug!("skipping non UTF-8 environment variable {:?}", name);
                    None
                }
            })
            .collect()
    }

    /// Non-empty value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================
// Credential sources
// ============================================================

/// One layer of the credential lookup chain.
pub trait CredentialSource {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Value for `field`, if this source defines a non-empty one.
    fn lookup(&self, field: CredentialField) -> Option<String>;
}

/// Explicit command line flags.
pub struct FlagSource<'a> {
    overrides: &'a CliOverrides,
}

impl<'a> FlagSource<'a> {
    pub fn new(overrides: &'a CliOverrides) -> Self {
        Self { overrides }
    }
}

impl CredentialSource for FlagSource<'_> {
    fn name(&self) -> &'static str {
        "flag"
    }

    fn lookup(&self, field: CredentialField) -> Option<String> {
        let value = match field {
            CredentialField::Url => &self.overrides.url,
            CredentialField::Username => &self.overrides.username,
            CredentialField::Password => &self.overrides.password,
        };
        value.clone().filter(|v| !v.is_empty())
    }
}

/// `ZFR_URL`, `ZFR_USERNAME` and `ZFR_PASSWORD`, matched case-sensitively.
pub struct EnvSource<'a> {
    env: &'a EnvVars,
}

impl<'a> EnvSource<'a> {
    pub fn new(env: &'a EnvVars) -> Self {
        Self { env }
    }
}

impl CredentialSource for EnvSource<'_> {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn lookup(&self, field: CredentialField) -> Option<String> {
        self.env.get(field.env_var()).map(String::from)
    }
}

/// Ini format that keeps values verbatim.
///
/// Backslashes and quotes are ordinary characters, so a password such as
/// `p\w"d` reaches the server unchanged. Section and key names are
/// lowercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimIni;

impl Format for VerbatimIni {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<config::Map<String, Value>, Box<dyn std::error::Error + Send + Sync>> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        let mut root = config::Map::new();
        for (section, properties) in ini.iter() {
            let table: config::Map<String, Value> = properties
                .iter()
                .map(|(key, value)| (key.to_lowercase(), Value::new(uri, value.to_string())))
                .collect();
            match section {
                Some(name) => {
                    root.insert(name.to_lowercase(), Value::new(uri, ValueKind::Table(table)));
                }
                None => root.extend(table),
            }
        }
        Ok(root)
    }
}

impl FileStoredFormat for VerbatimIni {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["cfg", "ini"]
    }
}

/// `[jira]` section of the ini config file.
pub struct FileSource {
    config: Option<Config>,
}

impl FileSource {
    /// Source with no values, used when the default file does not exist.
    pub fn empty() -> Self {
        Self { config: None }
    }

    /// Load the config file at `location`.
    ///
    /// A missing file is an error only if the location was given explicitly.
    pub fn load(location: &ConfigLocation) -> ApplicationResult<Self> {
        let path = &location.path;
        if !path.is_file() {
            if location.explicit {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("default config file {} not present, skipping", path.display());
            return Ok(Self::empty());
        }

        debug!("loading config file {}", path.display());
        let config = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), VerbatimIni).required(true))
            .build()
            .map_err(|e| ApplicationError::Config {
                message: format!("parse {}: {}", path.display(), e),
            })?;
        Ok(Self {
            config: Some(config),
        })
    }
}

impl CredentialSource for FileSource {
    fn name(&self) -> &'static str {
        "config file"
    }

    fn lookup(&self, field: CredentialField) -> Option<String> {
        let key = format!("{}.{}", CONFIG_SECTION, field.config_key());
        self.config
            .as_ref()?
            .get_string(&key)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Query `sources` in order and return the first value found for `field`.
pub fn first_match(sources: &[&dyn CredentialSource], field: CredentialField) -> Option<String> {
    sources.iter().find_map(|source| {
        let value = source.lookup(field)?;
        debug!("{} resolved from {}", field, source.name());
        Some(value)
    })
}

/// Resolve all credential fields from an ordered chain of sources.
///
/// Every field is looked up before failing; the error names the first
/// missing field in `CredentialField::ALL` order.
pub fn resolve_with(sources: &[&dyn CredentialSource]) -> ApplicationResult<Credentials> {
    let [url, username, password] = CredentialField::ALL.map(|field| first_match(sources, field));

    match (url, username, password) {
        (Some(url), Some(username), Some(password)) => Ok(Credentials {
            url,
            username,
            password,
        }),
        (url, username, _) => {
            let field = if url.is_none() {
                CredentialField::Url
            } else if username.is_none() {
                CredentialField::Username
            } else {
                CredentialField::Password
            };
            Err(ApplicationError::MissingCredential { field })
        }
    }
}

// ============================================================
// Config file location
// ============================================================

/// Where the config file is expected, and whether the user asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Determine the config file location: `--config`, then `ZFR_CONFIG`, then `$HOME/zfr.cfg`.
pub fn resolve_config_path(cli: &CliOverrides, env: &EnvVars) -> ConfigLocation {
    if let Some(path) = &cli.config {
        return ConfigLocation {
            path: expand_path(path, env),
            explicit: true,
        };
    }
    if let Some(path) = env.get(CONFIG_ENV_VAR) {
        return ConfigLocation {
            path: expand_path(Path::new(path), env),
            explicit: true,
        };
    }
    let path = home_dir(env)
        .map(|home| home.join(DEFAULT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    ConfigLocation {
        path,
        explicit: false,
    }
}

/// Home directory: `$HOME` from the snapshot, else the platform default.
fn home_dir(env: &EnvVars) -> Option<PathBuf> {
    env.get("HOME").map(PathBuf::from).or_else(|| {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    })
}

/// Expand `~`, `$VAR` and `${VAR}` against the environment snapshot.
fn expand_path(path: &Path, env: &EnvVars) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full_with_context_no_errors(
        raw.as_ref(),
        || home_dir(env).map(|home| home.to_string_lossy().into_owned()),
        |var| env.get(var),
    );
    PathBuf::from(expanded.as_ref())
}

/// Resolve credentials from flags, environment and config file.
#[instrument(level = "debug", skip_all)]
pub fn resolve(cli: &CliOverrides, env: &EnvVars) -> ApplicationResult<Credentials> {
    let location = resolve_config_path(cli, env);
    debug!(
        "config file: {} (explicit: {})",
        location.path.display(),
        location.explicit
    );

    let flags = FlagSource::new(cli);
    let environment = EnvSource::new(env);
    let file = FileSource::load(&location)?;

    let sources: [&dyn CredentialSource; 3] = [&flags, &environment, &file];
    resolve_with(&sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Option<&'static str>);

    impl CredentialSource for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn lookup(&self, _field: CredentialField) -> Option<String> {
            self.1.map(String::from)
        }
    }

    #[test]
    fn given_two_sources_when_first_has_value_then_first_wins() {
        let high = Fixed("high", Some("a"));
        let low = Fixed("low", Some("b"));
        assert_eq!(
            first_match(&[&high, &low], CredentialField::Url),
            Some("a".to_string())
        );
    }

    #[test]
    fn given_first_source_empty_when_resolving_then_falls_through() {
        let high = Fixed("high", None);
        let low = Fixed("low", Some("b"));
        assert_eq!(
            first_match(&[&high, &low], CredentialField::Password),
            Some("b".to_string())
        );
    }

    #[test]
    fn given_no_sources_when_resolving_then_reports_url_first() {
        let err = resolve_with(&[]).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::MissingCredential {
                field: CredentialField::Url
            }
        ));
    }

    #[test]
    fn given_empty_flag_when_looking_up_then_treated_as_absent() {
        let cli = CliOverrides {
            url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(FlagSource::new(&cli).lookup(CredentialField::Url), None);
    }

    #[test]
    fn given_env_snapshot_when_looking_up_then_prefix_is_stripped() {
        let env: EnvVars = [("ZFR_USERNAME", "alice"), ("ZFR_URL", ""), ("OTHER", "x")]
            .into_iter()
            .collect();
        let source = EnvSource::new(&env);
        assert_eq!(
            source.lookup(CredentialField::Username),
            Some("alice".to_string())
        );
        assert_eq!(source.lookup(CredentialField::Url), None);
    }

    #[test]
    fn given_lowercase_env_name_when_looking_up_then_ignored() {
        let env: EnvVars = [("zfr_url", "https://lower")].into_iter().collect();
        assert_eq!(EnvSource::new(&env).lookup(CredentialField::Url), None);
    }

    #[cfg(unix)]
    #[test]
    fn given_non_utf8_variable_when_snapshotting_then_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = OsStr::from_bytes(&[0x66, 0xff, 0x6f]).to_os_string();
        let env = EnvVars::from_os([
            (OsString::from("ZFR_BAD_VALUE"), bad.clone()),
            (bad, OsString::from("x")),
            (OsString::from("ZFR_URL"), OsString::from("https://jira")),
        ]);
        assert_eq!(env.get("ZFR_BAD_VALUE"), None);
        assert_eq!(env.get("ZFR_URL"), Some("https://jira"));

        std::env::set_var("ZFR_TEST_NON_UTF8", OsStr::from_bytes(&[0x66, 0xff, 0x6f]));
        let process = EnvVars::from_process();
        std::env::remove_var("ZFR_TEST_NON_UTF8");
        assert_eq!(process.get("ZFR_TEST_NON_UTF8"), None);
    }

    #[test]
    fn given_backslashes_and_quotes_when_parsing_ini_then_values_verbatim() {
        let text = "[JIRA]\nUser = alice\npassword = p#ss;w\\ord\"x\"\n";
        let map = VerbatimIni.parse(None, text).unwrap();
        let jira = map.get("jira").cloned().unwrap().into_table().unwrap();
        assert_eq!(jira["user"].clone().into_string().unwrap(), "alice");
        assert_eq!(
            jira["password"].clone().into_string().unwrap(),
            r#"p#ss;w\ord"x""#
        );
    }

    #[test]
    fn given_credentials_when_debug_formatted_then_password_hidden() {
        let creds = Credentials {
            url: "https://jira".into(),
            username: "alice".into(),
            password: "s3cret".into(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("alice"));
    }

    #[test]
    fn given_tilde_config_flag_when_resolving_location_then_expands_home() {
        let env: EnvVars = [("HOME", "/home/alice")].into_iter().collect();
        let cli = CliOverrides {
            config: Some(PathBuf::from("~/conf/zfr.cfg")),
            ..Default::default()
        };
        let location = resolve_config_path(&cli, &env);
        assert_eq!(location.path, PathBuf::from("/home/alice/conf/zfr.cfg"));
        assert!(location.explicit);
    }

    #[test]
    fn given_nothing_configured_when_resolving_location_then_defaults_to_home() {
        let env: EnvVars = [("HOME", "/home/alice")].into_iter().collect();
        let location = resolve_config_path(&CliOverrides::default(), &env);
        assert_eq!(location.path, PathBuf::from("/home/alice/zfr.cfg"));
        assert!(!location.explicit);
    }
}
