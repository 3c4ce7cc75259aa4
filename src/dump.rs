//! Optional side outputs of a solve: the system matrix sparsity pattern as a
//! plain PBM image and the preprocessed structure as JSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use nalgebra_sparse::CsrMatrix;
use serde::Serialize;

use crate::error::FrameResult;
use crate::model::StructureMetadata;
use crate::preprocess::PreprocessedElement;

/// Write the sparsity pattern of `matrix` as a plain (P1) PBM image: one
/// pixel per entry, black where the entry is stored
pub fn write_matrix_image(path: &Path, matrix: &CsrMatrix<f64>) -> FrameResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pbm(&mut writer, matrix)?;
    writer.flush()?;

    info!(
        "Wrote {}x{} matrix pattern to {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(())
}

fn write_pbm(writer: &mut impl Write, matrix: &CsrMatrix<f64>) -> std::io::Result<()> {
    writeln!(writer, "P1")?;
    writeln!(writer, "{} {}", matrix.ncols(), matrix.nrows())?;

    let mut row_pixels = vec!["0"; matrix.ncols()];
    for row in matrix.row_iter() {
        row_pixels.fill("0");
        for (&col, &value) in row.col_indices().iter().zip(row.values()) {
            if value != 0.0 {
                row_pixels[col] = "1";
            }
        }
        // PBM lines must stay under 70 characters
        for chunk in row_pixels.chunks(35) {
            writeln!(writer, "{}", chunk.join(" "))?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct PreprocessedDump<'a> {
    metadata: &'a StructureMetadata,
    elements: &'a [PreprocessedElement],
}

/// Write the preprocessed elements, with their analysis points, nodal
/// actions and DOF numbers, as pretty JSON
pub fn write_preprocessed(
    path: &Path,
    metadata: &StructureMetadata,
    elements: &[PreprocessedElement],
) -> FrameResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &PreprocessedDump { metadata, elements })?;
    writer.flush()?;

    info!(
        "Wrote {} preprocessed elements to {}",
        elements.len(),
        path.display()
    );
    Ok(())
}
