use aim_migrate::{DEVELOPMENT_NETWORK, MIGRATE_CONF_FILENAME};
use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "aim")]
#[command(author, version, about = "Run the AIM token deployment migrations")]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "AIM_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The network to migrate, as named in the configuration file.
    ///
    /// On `development` the first node account deploys the contracts; any other
    /// network uses its configured default sender.
    #[arg(short, long, env = "AIM_NETWORK", default_value = DEVELOPMENT_NETWORK)]
    pub network: String,

    /// Path to the migration configuration file.
    ///
    /// A missing file is not an error: the built-in defaults are used.
    #[arg(long, alias = "conf", env = "AIM_CONFIG", default_value = MIGRATE_CONF_FILENAME)]
    pub config: String,

    /// Directory holding the compiled contract artifacts (overrides the config file).
    #[arg(long, env = "AIM_BUILD_DIR")]
    pub build_dir: Option<String>,

    /// Directory where deployment records are written (overrides the config file).
    #[arg(long, env = "AIM_OUTDATA")]
    pub outdata: Option<String>,
}
