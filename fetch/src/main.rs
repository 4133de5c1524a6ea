//! envm-fetch CLI entrypoint.
//!
//! Lists Go versions from the download listing, downloads a package for a
//! platform, and verifies it against its published checksum.

use clap::Parser;
use envm_fetch::acquisition::{AcquireRequest, PackageQuery, acquire_with, resolve_query};
use envm_fetch::artefact::download::HttpDownloader;
use envm_fetch::artefact::verification::verify_checksum;
use envm_fetch::catalog::{Catalog, VersionRecord};
use envm_fetch::catalog::collector::{Collector, HttpCatalogSource};
use envm_fetch::cli::{Cli, Command, FetchArgs, GlobalArgs, ListArgs, PlatformArgs, VerifyArgs};
use envm_fetch::config::FetchConfig;
use envm_fetch::dirs::SystemBaseDirs;
use envm_fetch::error::{FetchError, Result};
use envm_fetch::output::{format_human, format_json, write_stderr_line};
use envm_fetch::transport::FetchOptions;
use std::error::Error;
use std::io::Write;

/// Settings every subcommand runs with.
struct RunContext<'a> {
    global: &'a GlobalArgs,
    config: FetchConfig,
    options: FetchOptions,
}

impl RunContext<'_> {
    fn fetch_catalog(&self, stderr: &mut dyn Write) -> Result<Catalog> {
        if !self.global.quiet {
            write_stderr_line(stderr, format!("Reading {}...", self.config.source_url));
        }
        let collector = Collector::new(HttpCatalogSource::new(self.options.clone()));
        Ok(collector.fetch_catalog(&self.config.source_url)?)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger` with a default filter from `-v`/`-q`; `RUST_LOG`
/// takes precedence when set.
fn init_logging(global: &GlobalArgs) {
    let default_filter = global.log_level().to_string().to_lowercase();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = FetchConfig::resolve(
        cli.global.config.as_deref(),
        &SystemBaseDirs,
        &cli.global.overrides(),
    )?;
    let context = RunContext {
        global: &cli.global,
        options: config.fetch_options(),
        config,
    };

    match &cli.command {
        Command::List(args) => run_list(&context, args, stdout, stderr),
        Command::Fetch(args) => run_fetch(&context, args, stdout, stderr),
        Command::Verify(args) => run_verify(&context, args, stdout, stderr),
    }
}

fn run_list(
    context: &RunContext<'_>,
    args: &ListArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let catalog = context.fetch_catalog(stderr)?;
    let versions = selected_versions(&catalog, args);
    let rendered = if args.json {
        format_json(versions.iter().copied())?
    } else {
        format_human(versions.iter().copied())
    };
    writeln!(stdout, "{}", rendered.trim_end())?;
    Ok(())
}

/// Apply the zone filter of `args`.
fn selected_versions<'c>(catalog: &'c Catalog, args: &ListArgs) -> Vec<&'c VersionRecord> {
    if args.stable {
        catalog.stable_versions().collect()
    } else if args.archived {
        catalog.archived_versions().collect()
    } else {
        catalog.all_versions().collect()
    }
}

fn run_fetch(
    context: &RunContext<'_>,
    args: &FetchArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let catalog = context.fetch_catalog(stderr)?;
    let request = AcquireRequest {
        query: package_query(&args.version, &args.platform),
        dest_dir: &args.dest,
        progress: context.config.progress,
        quiet: context.global.quiet,
    };
    let downloader = HttpDownloader::new(context.options.clone());
    let path = acquire_with(&request, &catalog, &downloader, stderr)?;
    writeln!(stdout, "{path}")?;
    Ok(())
}

fn run_verify(
    context: &RunContext<'_>,
    args: &VerifyArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let catalog = context.fetch_catalog(stderr)?;
    let package = resolve_query(&catalog, &package_query(&args.version, &args.platform))?;
    verify_checksum(package, &args.file)?;
    writeln!(stdout, "{}: {} OK", args.file, package.algorithm)?;
    Ok(())
}

fn package_query<'a>(version: &'a str, platform: &'a PlatformArgs) -> PackageQuery<'a> {
    PackageQuery {
        version,
        kind: &platform.kind,
        os: &platform.os,
        arch: &platform.arch,
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_error_chain(&err, stderr);
            1
        }
    }
}

/// Print `err` followed by each underlying cause.
fn write_error_chain(err: &FetchError, stderr: &mut dyn Write) {
    write_stderr_line(stderr, format!("error: {err}"));
    let mut source = err.source();
    while let Some(cause) = source {
        write_stderr_line(stderr, format!("  caused by: {cause}"));
        source = cause.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envm_fetch::artefact::download::DownloadError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = FetchError::VersionNotFound {
            version: "1.99.0".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("version 1.99.0 is not listed"));
    }

    #[test]
    fn error_chain_includes_causes() {
        let err = FetchError::from(DownloadError::Download {
            url: "https://dl.test/go.tar.gz".to_owned(),
            source: Box::new(std::io::Error::other("connection reset")),
        });

        let mut stderr = Vec::new();
        write_error_chain(&err, &mut stderr);

        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(text.starts_with("error: installation package (https://dl.test/go.tar.gz) download failed\n"));
        assert!(text.contains("  caused by: connection reset"));
    }

    #[test]
    fn selected_versions_filters_by_zone() {
        use envm_fetch::catalog::Zone;

        let catalog = Catalog::new(
            vec![VersionRecord::new("1.21.0", Zone::Stable)],
            vec![VersionRecord::new("1.20.7", Zone::Archived)],
        );
        let args = ListArgs {
            archived: true,
            ..ListArgs::default()
        };
        let names: Vec<&str> = selected_versions(&catalog, &args)
            .into_iter()
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, ["1.20.7"]);
        assert_eq!(selected_versions(&catalog, &ListArgs::default()).len(), 2);
    }
}
