//! `mailsift import`

use anyhow::{Context, Result};
use mailsift_core::import_mbox_files;

use crate::cli::ImportArgs;

pub fn run(args: &ImportArgs) -> Result<()> {
    let table = import_mbox_files(&args.mbox_paths, &args.output_path)
        .with_context(|| format!("importing {} mbox file(s)", args.mbox_paths.len()))?;

    println!(
        "Imported {} emails from {} mbox file(s) into {}",
        table.len(),
        args.mbox_paths.len(),
        args.output_path.display()
    );
    Ok(())
}
