use std::process;

use go_ora::{Analysis, Enrichr};

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .ok();

    let genes: Vec<String> = std::env::args().skip(1).collect();
    if genes.is_empty() {
        println!("Run a GO over-representation analysis for a list of genes\n\n");
        println!("Usage\nenrichment COX4I2 ND1 ATP6\n");
        process::exit(1)
    }

    let enrichr = Enrichr::new().expect("unable to create HTTP client");
    let table = Analysis::new(enrichr)
        .output_dir("resultados_gseapy")
        .run(&genes)
        .expect("enrichment analysis failed");

    println!("### TERMS ###");
    for term in table.top_by_adjusted_pvalue(10) {
        println!(
            "{}\t{}\t{:e}\t({})",
            term.gene_set(),
            term.term(),
            term.adjusted_pvalue(),
            term.genes_raw()
        );
    }
    println!("\nSignificant terms: {}", table.len());
}
