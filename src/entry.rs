use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::run_local;
use crate::args::TesterArgs;
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, ValidationError};

struct LocalArgs {
    url: String,
    args: TesterArgs,
}

impl LocalArgs {
    fn new(args: TesterArgs) -> AppResult<Self> {
        let Some(url) = args.url.clone() else {
            tracing::error!("Missing URL (set --url, SERVER_URL, or provide it in config).");
            return Err(AppError::validation(ValidationError::MissingUrl));
        };
        Ok(Self { url, args })
    }
}

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::logger::init_logging(args.verbose, args.no_color);

    let local = LocalArgs::new(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_local(&local.url, local.args))
}

fn parse_args() -> AppResult<(TesterArgs, ArgMatches)> {
    let cmd = TesterArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    let matches = cmd.get_matches_from(raw_args);
    let args = TesterArgs::from_arg_matches(&matches)?;

    Ok((args, matches))
}
