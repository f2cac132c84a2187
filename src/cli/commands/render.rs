//! Render command implementation.

use std::path::PathBuf;

pub fn run(file: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&file)?;
    let html = compono::render_document(&source);

    if let Some(output_path) = output {
        std::fs::write(&output_path, &html)?;
        eprintln!("Output written to: {}", output_path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}
