//! Preset listing, printing and export.

use std::path::{Path, PathBuf};

use clap::Args;
use tapewarm_config::{TapePreset, factory_presets, list_user_presets, user_presets_dir};

use super::common::load_preset;

#[derive(Args)]
pub struct PresetsArgs {
    /// Print a preset as TOML
    #[arg(long, value_name = "NAME", conflicts_with = "save")]
    show: Option<String>,

    /// Export a preset to a file (requires --to)
    #[arg(long, value_name = "NAME", requires = "to")]
    save: Option<String>,

    /// Destination file for --save
    #[arg(long, value_name = "FILE", requires = "save")]
    to: Option<PathBuf>,

    /// Overwrite the --to file if it exists
    #[arg(long)]
    force: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.show {
        return show_preset(name);
    }
    if let (Some(name), Some(to)) = (&args.save, &args.to) {
        return save_preset(name, to, args.force);
    }
    list_presets();
    Ok(())
}

fn list_presets() {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:16} - {}", preset.name, desc);
    }
    println!();

    let dir = user_presets_dir();
    println!("User Presets ({}):", dir.display());
    println!("=============");
    let user_presets = list_user_presets();
    if user_presets.is_empty() {
        println!("  (none)");
        println!();
        println!("  Export one to start from: tapewarm presets --save \"Warm Ferric\" --to <file>");
    } else {
        for path in user_presets {
            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown");
            match TapePreset::load(&path) {
                Ok(preset) => {
                    let desc = preset.description.as_deref().unwrap_or("");
                    println!("  {:16} - {}", name, desc);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "{e}");
                    println!("  {:16} - (error loading)", name);
                }
            }
        }
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn save_preset(name: &str, to: &Path, force: bool) -> anyhow::Result<()> {
    if to.exists() && !force {
        anyhow::bail!("{} already exists. Use --force to overwrite.", to.display());
    }

    let preset = load_preset(name)?;
    preset.save(to)?;
    println!("Saved preset '{}' to {}", preset.name, to.display());
    Ok(())
}
