use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lexo_config::Config;

/// Enrich a word list with definitions, phonetics and examples from an AI API
#[derive(Debug, Parser)]
#[command(name = "lexophile", version)]
pub struct Args {
    /// Word list, one word per line
    #[arg(short, long)]
    pub word_list: Option<PathBuf>,

    /// Dataset file to create or resume
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    pub debug: bool,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log to the console only
    #[arg(long, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// JSON lines on the console
    #[arg(long)]
    pub log_json: bool,

    /// Seconds of backoff to spend on one word before giving up on it
    #[arg(long)]
    pub max_total_wait: Option<u64>,

    /// Pause after each successful request, in milliseconds
    #[arg(long)]
    pub request_delay_ms: Option<u64>,
}

impl Args {
    /// Config file (or environment) with command-line overrides applied
    pub fn build_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("Failed to load config")?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.word_list {
            config.pipeline.word_list = path.clone();
        }
        if let Some(path) = &self.output {
            config.pipeline.output = path.clone();
        }
        if let Some(secs) = self.max_total_wait {
            config.retry.max_total_wait_secs = secs;
        }
        if let Some(ms) = self.request_delay_ms {
            config.pipeline.request_delay_ms = ms;
        }

        config.log.debug |= self.debug;
        config.log.json |= self.log_json;
        if self.no_log_file {
            config.log.file = None;
        } else if let Some(path) = &self.log_file {
            config.log.file = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let args = Args::try_parse_from([
            "lexophile",
            "--word-list",
            "lists/gre.txt",
            "-o",
            "out/gre.json",
            "--debug",
            "--no-log-file",
            "--max-total-wait",
            "90",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.pipeline.word_list, PathBuf::from("lists/gre.txt"));
        assert_eq!(config.pipeline.output, PathBuf::from("out/gre.json"));
        assert_eq!(config.retry.max_total_wait_secs, 90);
        assert_eq!(config.pipeline.request_delay_ms, 1000);
        assert!(config.log.debug);
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_log_file_flags_conflict() {
        let result = Args::try_parse_from(["lexophile", "--log-file", "x.log", "--no-log-file"]);
        assert!(result.is_err());
    }
}
