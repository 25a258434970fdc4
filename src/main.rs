//! fncmaps -- convert a correlation vector into a (network-ordered) FNC matrix.
//!
//! Reads a text file with n*(n-1)/2 numbers separated by whitespace or commas and writes the
//! reconstructed matrix as CSV. Set `RUST_LOG=debug` for details on what happens.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ndarray::{Array1, Array2};

use std::fs;
use std::io;
use std::path::PathBuf;

use fncmaps::{normalize, vec2mat, FillPolicy, NetworkReorderer, Symmetry, Vec2MatOptions};

#[derive(Parser, Debug)]
#[command(name = "fncmaps", version, about = "Convert correlation vectors into FNC matrices")]
struct Args {
    /// Text file holding the correlation vector.
    vector_file: PathBuf,

    /// Reorder the matrix into ICN network order (requires a 105x105 result).
    #[arg(long)]
    reorder: bool,

    /// ICN table to use for reordering. Defaults to $FNCMAPS_ICN_TABLE or resources/icn/ICNs_v2.csv.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Only fill the lower triangle instead of producing a symmetric matrix.
    #[arg(long)]
    lower_only: bool,

    /// Fill cells not covered by the vector with NaN instead of 0.
    #[arg(long)]
    fill_nan: bool,

    /// Scale the vector to [-1, 1] before conversion.
    #[arg(long)]
    normalize: bool,

    /// Output CSV file. The matrix is written to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also render the matrix as heatmap PNG.
    #[cfg(feature = "plot")]
    #[arg(long)]
    plot: Option<PathBuf>,
}


fn read_vector(path: &PathBuf) -> Result<Array1<f64>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read vector file '{}'", path.display()))?;
    let values = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().with_context(|| format!("Invalid number '{}'", s)))
        .collect::<Result<Vec<f64>>>()?;
    Ok(Array1::from(values))
}


fn write_matrix<W: io::Write>(mat: &Array2<f64>, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in mat.outer_iter() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}


fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut vec = read_vector(&args.vector_file)?;
    info!("Read correlation vector of length {}.", vec.len());
    if args.normalize {
        vec = normalize(&vec)?;
    }

    let options = Vec2MatOptions::default()
        .with_symmetry(if args.lower_only { Symmetry::LowerOnly } else { Symmetry::Full })
        .with_fill(if args.fill_nan { FillPolicy::NaN } else { FillPolicy::Zero });
    let mut mat = vec2mat(vec.view(), &options)?;

    let reorderer = match &args.table {
        Some(path) => NetworkReorderer::new(path),
        None => NetworkReorderer::from_env(),
    };
    if args.reorder {
        info!("Reordering with ICN table '{}'.", reorderer.table_path().display());
        mat = reorderer.reorder(mat.view())?;
    }

    #[cfg(feature = "plot")]
    {
        if let Some(png) = &args.plot {
            let layout = if args.reorder {
                Some(fncmaps::NetworkLayout::from_table(&reorderer.load_table()?))
            } else {
                None
            };
            fncmaps::plot::draw_heatmap(mat.view(), layout.as_ref(), &fncmaps::plot::HeatmapStyle::default(), png)?;
            info!("Heatmap written to '{}'.", png.display());
        }
    }

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
            write_matrix(&mat, file)?;
            info!("Matrix written to '{}'.", path.display());
        }
        None => write_matrix(&mat, io::stdout())?,
    }
    Ok(())
}
