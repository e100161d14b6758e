use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use xshell::{Shell as Sh, cmd};

const BIN_NAME: &str = "filetime-fixer";

#[derive(Clone, Debug, Parser)]
enum Commands {
    /// Generate filetime-fixer(1) and filetime-fixer(5)
    ManPages(ManPageOptions),
    /// Generate shell completion scripts
    ShellCompletions(CompletionOptions),
}

#[derive(Clone, Debug, Parser)]
struct ManPageOptions {
    #[arg(long, default_value = "target/assets/man")]
    out: PathBuf,

    /// Only generate the command manual, skip the configuration manual
    /// (which needs go-md2man).
    #[arg(long)]
    no_config: bool,
}

#[derive(Clone, Debug, Parser)]
struct CompletionOptions {
    #[arg(long, default_value = "target/assets/completions")]
    out: PathBuf,

    #[arg(long, value_enum, default_values_t = [Shell::Bash, Shell::Fish, Shell::Zsh])]
    shell: Vec<Shell>,
}

fn main() -> anyhow::Result<()> {
    let sh = Sh::new()?;
    match Commands::parse() {
        Commands::ManPages(options) => man_pages(&sh, &options),
        Commands::ShellCompletions(options) => shell_completions(&sh, &options),
    }
}

fn man_pages(sh: &Sh, options: &ManPageOptions) -> anyhow::Result<()> {
    let out = &options.out;
    sh.create_dir(out)
        .with_context(|| format!("failed to create {out:?}"))?;
    clap_mangen::generate_to(filetime_fixer::command::Options::command(), out)?;
    if !options.no_config {
        config_man_page(sh, out)?;
    }
    Ok(())
}

/// Render docs/config.md with the example configuration inlined.
fn config_man_page(sh: &Sh, out: &Path) -> anyhow::Result<()> {
    let config_md = sh.read_file("docs/config.md")?;
    let example_config = sh.read_file("etc/example-config.toml")?;
    let rendered = config_md.replace("EXAMPLE_CONFIG_PLACEHOLDER", example_config.trim_end());

    let temp_dir = sh.create_temp_dir()?;
    let markdown = temp_dir.path().join("config.md");
    sh.write_file(&markdown, rendered)?;
    let page = out.join(format!("{BIN_NAME}.5"));
    cmd!(sh, "go-md2man -in {markdown} -out {page}")
        .run()
        .context("failed to run go-md2man")?;
    Ok(())
}

fn shell_completions(sh: &Sh, options: &CompletionOptions) -> anyhow::Result<()> {
    let out = &options.out;
    sh.create_dir(out)
        .with_context(|| format!("failed to create {out:?}"))?;
    let mut cli = filetime_fixer::command::Options::command();
    for shell in &options.shell {
        let path = clap_complete::generate_to(*shell, &mut cli, BIN_NAME, out)?;
        println!("generated {path:?}");
    }
    Ok(())
}
