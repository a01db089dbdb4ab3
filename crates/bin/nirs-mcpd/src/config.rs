use clap::{Parser, builder::BoolishValueParser};
use nirs_core::context::{
    DEFAULT_CATEGORY_MARKER,
    DEFAULT_DEMOS_DIR,
    DEFAULT_NAMESPACE_DIR,
    DEFAULT_SOURCE_EXTENSION,
};
use nirs_core::{SourceLayout, ToolboxContext};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_LOG_FILTER: &str = "info";
const FALLBACK_ROOT_DIR: &str = "nirs-toolbox";

#[derive(Parser, Debug)]
#[command(name = "nirs-mcpd", version, about = "NIRS toolbox MCP daemon.")]
struct CliArgs {
    /// Toolbox root; defaults to `$HOME/nirs-toolbox`.
    #[arg(long, env = "NIRS_TOOLBOX_PATH")]
    root: Option<String>,

    #[arg(long, env = "NIRS_NAMESPACE", default_value = DEFAULT_NAMESPACE_DIR)]
    namespace: String,

    #[arg(long, env = "NIRS_DEMOS_DIR", default_value = DEFAULT_DEMOS_DIR)]
    demos_dir: String,

    #[arg(long, env = "NIRS_SOURCE_EXTENSION", default_value = DEFAULT_SOURCE_EXTENSION)]
    extension: String,

    #[arg(long, env = "NIRS_CATEGORY_MARKER", default_value_t = DEFAULT_CATEGORY_MARKER)]
    marker: char,

    #[arg(
        long = "stdio",
        env = "NIRS_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "NIRS_MCP_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_http: bool,

    #[arg(long, env = "NIRS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(long, env = "NIRS_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,

    #[arg(skip = std::env::var_os("HOME").map(PathBuf::from))]
    home: Option<PathBuf>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct NirsConfig {
    pub root: PathBuf,
    pub namespace: String,
    pub demos_dir: String,
    pub layout: SourceLayout,
    pub enable_stdio: bool,
    pub enable_http: bool,
    pub mcp_http_addr: SocketAddr,
    pub log_filter: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
    RootNotFound(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::RootNotFound(path) => {
                write!(f, "toolbox root does not exist: {}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

impl NirsConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub fn toolbox_context(&self) -> ToolboxContext {
        ToolboxContext::new(&self.root)
            .with_namespace_dir(&self.namespace)
            .with_demos_dir(&self.demos_dir)
            .with_layout(self.layout.clone())
    }
}

impl TryFrom<CliArgs> for NirsConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let root = match args.root.filter(|value| !value.trim().is_empty()) {
            Some(root) => expand_home(root.trim(), args.home.as_deref()),
            None => args
                .home
                .as_deref()
                .map(|home| home.join(FALLBACK_ROOT_DIR))
                .ok_or(ConfigError::MissingSetting("NIRS_TOOLBOX_PATH"))?,
        };
        if !root.is_dir() {
            return Err(ConfigError::RootNotFound(root));
        }

        if args.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NIRS_NAMESPACE",
                value: args.namespace,
            });
        }
        let layout = SourceLayout::new(args.marker, args.extension.trim());
        if layout.extension.is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NIRS_SOURCE_EXTENSION",
                value: args.extension,
            });
        }
        if !args.enable_stdio && !args.enable_http {
            return Err(ConfigError::MissingSetting("NIRS_ENABLE_STDIO or NIRS_MCP_HTTP"));
        }

        Ok(Self {
            root,
            namespace: args.namespace,
            demos_dir: args.demos_dir,
            layout,
            enable_stdio: args.enable_stdio,
            enable_http: args.enable_http,
            mcp_http_addr: args.mcp_http_addr,
            log_filter: args.log_filter,
        })
    }
}

fn expand_home(value: &str, home: Option<&Path>) -> PathBuf {
    match (value.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with(['/', '\\']) => {
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args(home: &Path) -> CliArgs {
        CliArgs {
            root: None,
            namespace: DEFAULT_NAMESPACE_DIR.to_string(),
            demos_dir: DEFAULT_DEMOS_DIR.to_string(),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            marker: DEFAULT_CATEGORY_MARKER,
            enable_stdio: true,
            enable_http: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            home: Some(home.to_path_buf()),
        }
    }

    #[test]
    fn falls_back_to_toolbox_under_home() {
        let home = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(home.path().join(FALLBACK_ROOT_DIR)).expect("mkdir");

        let config = NirsConfig::try_from(base_args(home.path())).expect("config should parse");

        assert_eq!(config.root, home.path().join(FALLBACK_ROOT_DIR));
        assert_eq!(
            config.toolbox_context().namespace_dir(),
            home.path().join(FALLBACK_ROOT_DIR).join("+nirs")
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        let home = tempfile::tempdir().expect("tempdir");

        let err = NirsConfig::try_from(base_args(home.path())).expect_err("root is missing");

        assert!(matches!(err, ConfigError::RootNotFound(_)));
    }

    #[test]
    fn tilde_expands_against_home() {
        let home = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(home.path().join("tools/nirs")).expect("mkdir");
        let mut args = base_args(home.path());
        args.root = Some("~/tools/nirs".to_string());

        let config = NirsConfig::try_from(args).expect("config should parse");

        assert_eq!(config.root, home.path().join("tools/nirs"));
    }

    #[test]
    fn requires_a_transport() {
        let home = tempfile::tempdir().expect("tempdir");
        let mut args = base_args(home.path());
        args.root = Some(home.path().display().to_string());
        args.enable_stdio = false;

        let err = NirsConfig::try_from(args).expect_err("no transport");

        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }

    #[test]
    fn extension_dot_is_optional_but_not_empty() {
        let home = tempfile::tempdir().expect("tempdir");
        let mut args = base_args(home.path());
        args.root = Some(home.path().display().to_string());
        args.extension = ".src".to_string();
        let config = NirsConfig::try_from(args).expect("config should parse");
        assert_eq!(config.layout.extension, "src");

        let mut args = base_args(home.path());
        args.root = Some(home.path().display().to_string());
        args.extension = ".".to_string();
        let err = NirsConfig::try_from(args).expect_err("empty extension");
        assert!(matches!(err, ConfigError::InvalidSetting { name: "NIRS_SOURCE_EXTENSION", .. }));
    }
}
