use go_ora::{OraResult, DEFAULT_FDR_THRESHOLD, DEFAULT_OUTPUT_DIR};

/// Mitochondrial genes: cytochrome c oxidase, NADH dehydrogenase and ATP synthase subunits
const GENES: [&str; 3] = ["COX4I2", "ND1", "ATP6"];

fn main() -> OraResult<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .ok();

    let table = go_ora::run(&GENES, DEFAULT_OUTPUT_DIR, DEFAULT_FDR_THRESHOLD)?;
    println!("{} enriched GO terms", table.len());
    Ok(())
}
