use anyhow::{Result, anyhow};
use log::{info, warn};

use crate::{
    cli::AppendArgs,
    commands::{input_options, write_output},
    io_utils,
};

/// Loads every input and appends its rows, by column name, onto the first
/// input's table. Columns missing from a later file are left empty; columns
/// the first file lacks are dropped with a warning.
pub fn execute(args: &AppendArgs) -> Result<()> {
    let Some((first, rest)) = args.inputs.split_first() else {
        return Err(anyhow!("At least one input file must be provided"));
    };

    let mut table = io_utils::load_table(first, &input_options(first, &args.input_args)?)?;
    info!("✓ Loaded {} row(s) from {:?}", table.len(), first);

    for input in rest {
        let other = io_utils::load_table(input, &input_options(input, &args.input_args)?)?;
        let dropped = other
            .header()
            .names()
            .iter()
            .filter(|name| !name.is_empty() && !table.header().contains(name))
            .cloned()
            .collect::<Vec<_>>();
        if !dropped.is_empty() {
            warn!("Ignoring column(s) {dropped:?} from {input:?} not present in {first:?}");
        }
        table.append_all_from(&other);
        info!("✓ Appended {} row(s) from {:?}", other.len(), input);
    }

    info!("Writing {} data row(s) to output", table.len());
    write_output(&table, first, &args.input_args, &args.output_args)
}
