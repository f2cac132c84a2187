//! Ast command implementation: dump the annotated tree for debugging
//! component grammars, mirroring the teacher's own tree-dump habit.

use std::path::PathBuf;

pub fn run(file: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&file)?;
    let tree = compono::parse_document(&source);
    let dump = tree.to_string();

    if let Some(output_path) = output {
        std::fs::write(&output_path, &dump)?;
        eprintln!("Output written to: {}", output_path.display());
    } else {
        println!("{}", dump);
    }

    Ok(())
}
