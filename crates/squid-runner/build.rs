//! Build script: render the CLI manual page into `OUT_DIR` for release
//! packaging.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;
use time::{OffsetDateTime, format_description::well_known::Iso8601};

#[path = "src/cli.rs"]
mod cli;

const FALLBACK_DATE: &str = "1970-01-01";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let cmd = cli::Cli::command();
    let binary_name = cmd.get_name().to_owned();
    let version = env::var("CARGO_PKG_VERSION").map_err(
        |_| "CARGO_PKG_VERSION must be set by Cargo; cannot render manual page without it.",
    )?;

    let man = Man::new(cmd)
        .section("1")
        .source(format!("{binary_name} {version}"))
        .date(manual_date());
    let mut buf = Vec::new();
    man.render(&mut buf)?;

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR must be set by Cargo")?);
    fs::create_dir_all(&out_dir)?;
    fs::write(out_dir.join(format!("{binary_name}.1")), buf)?;
    Ok(())
}

/// Derives the page date from `SOURCE_DATE_EPOCH` for reproducible builds.
fn manual_date() -> String {
    let Some(raw) = env::var("SOURCE_DATE_EPOCH").ok() else {
        return FALLBACK_DATE.into();
    };
    let formatted = raw
        .parse::<i64>()
        .ok()
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok())
        .and_then(|value| value.format(&Iso8601::DATE).ok());
    formatted.unwrap_or_else(|| {
        println!(
            "cargo:warning=Invalid SOURCE_DATE_EPOCH '{raw}'; falling back to {FALLBACK_DATE}"
        );
        FALLBACK_DATE.into()
    })
}
