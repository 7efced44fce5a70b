//! Man page generator for spimaster
//!
//! Writes `spimaster.1` and one page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

fn render(cmd: clap::Command, title: &str, dir: &Path) -> io::Result<PathBuf> {
    let man = clap_mangen::Man::new(cmd).title(title.to_uppercase());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    let path = dir.join(format!("{}.1", title));
    fs::write(&path, buffer)?;
    Ok(path)
}

fn main() -> io::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    let mut pages = vec![render(cmd.clone(), "spimaster", &output_dir)?];
    for sub in cmd.get_subcommands() {
        let title = format!("spimaster-{}", sub.get_name());
        pages.push(render(sub.clone(), &title, &output_dir)?);
    }

    for page in &pages {
        println!("Wrote {}", page.display());
    }
    println!("\nTo view the main page:");
    println!("  man -l {}", pages[0].display());

    Ok(())
}
