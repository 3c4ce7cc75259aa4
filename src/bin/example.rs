//! Frame Solver Example - Simple Portal Frame

use anyhow::Context;
use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Portal Frame ===\n");

    let mut structure = Structure::new(StructureMetadata::new(1, 0).with_name("Portal frame"));

    structure.add_material(Material::steel("S275"))?;

    // W12x26 (approximate properties)
    // A = 7.65 in² = 0.00494 m²
    // Ix = 204 in⁴ = 8.49e-5 m⁴
    // Iy = 17.3 in⁴ = 7.2e-6 m⁴
    structure.add_section(Section::new(
        "W12x26",
        0.00494,
        8.49e-5,
        7.2e-6,
        5.34e-4,
        9.2e-5,
    ))?;

    //     N3 -------- N4
    //     |          |
    //     |          |
    //     N1        N2
    //   Fixed     Fixed

    let height = 4.0;
    let span = 6.0;

    structure.add_node(Node::fixed("N1", 0.0, 0.0))?;
    structure.add_node(Node::fixed("N2", span, 0.0))?;
    structure.add_node(Node::new("N3", 0.0, height))?;
    structure.add_node(Node::new("N4", span, height))?;

    let left = structure
        .element_builder("Col1", "N1", "N3", "S275", "W12x26")?
        // 10 kN wind at roof level
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fx, 1.0, 10e3))
        .build()?;
    let right = structure
        .element_builder("Col2", "N2", "N4", "S275", "W12x26")?
        .build()?;
    let beam = structure
        .element_builder("Beam", "N3", "N4", "S275", "W12x26")?
        // 20 kN/m dead load
        .add_distributed_load(DistributedLoad::uniform_downward(20e3))
        .build()?;

    structure.add_element(left)?;
    structure.add_element(right)?;
    structure.add_element(beam)?;

    println!("Running linear analysis...\n");
    let options = SolveOptions::default().with_own_weight().with_safety_checks();
    let solution = solve(&structure, &options).context("analysis failed")?;

    println!("Node Displacements:");
    for (id, disp) in &solution.node_displacements {
        println!(
            "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
            id,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    println!("\nReactions:");
    for (id, reaction) in solution.reactions() {
        println!(
            "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
            id,
            reaction.fx / 1000.0,
            reaction.fy / 1000.0,
            reaction.mz / 1000.0
        );
    }
    let total = solution.total_reaction();
    println!(
        "  Total: FX={:.2}kN, FY={:.2}kN",
        total.fx / 1000.0,
        total.fy / 1000.0
    );

    println!("\nElement Maxima:");
    for element in &solution.elements {
        println!(
            "  {}: |M|max={:.2}kN·m, |V|max={:.2}kN, |σ|max={:.2}MPa",
            element.element_id,
            element.max_bending_moment() / 1000.0,
            element.max_shear_force() / 1000.0,
            element.max_axial_stress() / 1e6
        );
    }

    println!(
        "\nSolved {} DOFs in {} iterations",
        solution.dof_count, solution.iterations
    );
    println!(
        "Max displacement: {:.4}mm, max moment: {:.2}kN·m",
        solution.max_displacement() * 1000.0,
        solution.max_bending_moment() / 1000.0
    );

    Ok(())
}
