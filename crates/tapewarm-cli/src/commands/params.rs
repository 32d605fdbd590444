//! Control listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use tapewarm_tape::{
    MachineSpeed, PARAM_DESCRIPTORS, ParamDescriptor, ParamId, TapeFormulation, unit_label,
};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show example overrides
    #[arg(long)]
    examples: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    println!("Tape Machine Controls");
    println!("=====================");
    println!();
    println!(
        "  {:12}  {:18}  {:22}  {:8}  {}",
        "Id", "Name", "Range", "Default", "Unit"
    );
    println!(
        "  {:12}  {:18}  {:22}  {:8}  {}",
        "--", "----", "-----", "-------", "----"
    );

    for (id, desc) in ParamId::ALL.into_iter().zip(&PARAM_DESCRIPTORS) {
        let (range, default) = describe(id, desc);
        println!(
            "  {:12}  {:18}  {:22}  {:8}  {}",
            desc.id,
            desc.name,
            range,
            default,
            unit_label(desc.unit)
        );
    }

    println!();
    if args.examples {
        println!("Example Overrides");
        println!("-----------------");
        println!();
        println!("  tapewarm process in.wav out.wav --param wow=25 --param flutter=15");
        println!("  tapewarm process in.wav out.wav --param input_drive=6dB --param output=-3dB");
        println!("  tapewarm process in.wav out.wav --speed 7.5ips --tape chrome --param hiss=10%");
        println!("  tapewarm process in.wav out.wav --preset \"Worn Cassette\" --param age=90");
    } else {
        println!("Use 'tapewarm params --examples' for example overrides.");
    }

    Ok(())
}

/// Range and default as shown in the table; variant controls list names.
fn describe(id: ParamId, desc: &ParamDescriptor) -> (String, String) {
    match id {
        ParamId::Speed => (
            MachineSpeed::ALL.map(MachineSpeed::name).join(" | "),
            MachineSpeed::from_index(desc.default as usize).name().to_string(),
        ),
        ParamId::Formulation => (
            TapeFormulation::ALL.map(TapeFormulation::name).join(" | "),
            TapeFormulation::from_index(desc.default as usize)
                .name()
                .to_string(),
        ),
        _ => (
            format!("{} to {}", desc.min, desc.max),
            desc.default.to_string(),
        ),
    }
}
