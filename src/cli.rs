use clap::Parser;

use crate::config::{LogFormat, DEFAULT_CONFIG_FILE};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
///
/// Arogya
///
/// Health records, pharmacy booking, symptom triage, telemedicine rooms and
/// emergency alerts for rural clinics and community health workers.
///
pub struct Args {
    /// Optional path to an Arogya configuration file.
    ///
    /// Default is "arogya.toml".
    /// Configuration is loaded from this file, if present.
    /// Environment variables prefixed AROGYA_ override values defined in the file.
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_FILE, verbatim_doc_comment)]
    pub config_file: String,

    /// Log level or filter directive (e.g. "debug", "arogya_lib=trace").
    #[arg(short, long, env = "AROGYA_LOG__LEVEL")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(short = 'f', long, value_enum, env = "AROGYA_LOG__FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Port to listen on.
    #[arg(short, long, env = "AROGYA_SERVER__PORT")]
    pub port: Option<u16>,
}
