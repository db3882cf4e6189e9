use std::path::Path;
use std::process;

use go_ora::enrichment::export::read_csv;
use go_ora::{DotPlot, CSV_FILENAME, PLOT_FILENAME};

/// Renders the dot plot again from a previously written result table
fn main() {
    let mut args = std::env::args();
    let Some(dir) = args.nth(1) else {
        println!("Redraw the dot plot of an earlier analysis\n\n");
        println!("Usage\nreplot resultados_gseapy <N TERMS>\n");
        process::exit(1)
    };
    let dir = Path::new(&dir);
    let n_terms = args
        .next()
        .map(|arg| arg.parse::<usize>().unwrap_or(go_ora::TOP_TERMS))
        .unwrap_or(go_ora::TOP_TERMS);

    let table = read_csv(dir.join(CSV_FILENAME)).expect("unable to read result table");
    let plot = DotPlot::top(&table, n_terms);
    for row in plot.rows().iter().rev() {
        println!(
            "{:.2}\t{}\t{}",
            row.significance(),
            row.gene_count(),
            row.term()
        );
    }
    plot.render(dir.join(PLOT_FILENAME))
        .expect("unable to render dot plot");
}
