use approx::assert_relative_eq;
use frame_solver::prelude::*;

const E: f64 = 200e9;
// 100 x 200 mm rectangle
const AREA: f64 = 0.02;
const INERTIA: f64 = 0.1 * 0.2 * 0.2 * 0.2 / 12.0;

fn options() -> SolveOptions {
    SolveOptions::default().with_tolerance(1e-10).with_max_iter(10_000)
}

fn new_structure() -> Structure {
    let mut structure = Structure::new(StructureMetadata::new(1, 0).with_name("test"));
    structure
        .add_material(Material::isotropic("steel", E, 0.3, 7850.0))
        .unwrap();
    structure
        .add_section(Section::rectangular("R100x200", 0.1, 0.2))
        .unwrap();
    structure
}

fn value_at(values: &[PointValue], t: f64) -> f64 {
    values
        .iter()
        .find(|v| (v.t - t).abs() < 1e-9)
        .map(|v| v.value)
        .unwrap_or_else(|| panic!("no analysis point at t = {t}"))
}

fn cantilever(length: f64, load: f64) -> Structure {
    let mut structure = new_structure();
    structure.add_node(Node::fixed("A", 0.0, 0.0)).unwrap();
    structure.add_node(Node::new("B", length, 0.0)).unwrap();
    let beam = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 1.0, load))
        .build()
        .unwrap();
    structure.add_element(beam).unwrap();
    structure
}

#[test]
fn cantilever_tip_load() {
    let (length, load) = (3.0, -10e3);
    let solution = solve(&cantilever(length, load), &options()).unwrap();

    // δ = PL³/3EI, θ = PL²/2EI
    let tip = solution.node_displacement("B").unwrap();
    assert_relative_eq!(tip.dy, load * length.powi(3) / (3.0 * E * INERTIA), max_relative = 1e-4);
    assert_relative_eq!(tip.rz, load * length.powi(2) / (2.0 * E * INERTIA), max_relative = 1e-4);
    assert_relative_eq!(tip.dx, 0.0, epsilon = 1e-12);

    let support = solution.reaction("A").unwrap();
    assert_relative_eq!(support.fx, 0.0, epsilon = 1e-3);
    assert_relative_eq!(support.fy, -load, max_relative = 1e-6);
    assert_relative_eq!(support.mz, -load * length, max_relative = 1e-6);

    // Hogging at the support, zero at the free end
    let beam = solution.element("AB").unwrap();
    assert_relative_eq!(value_at(&beam.bending_moment, 0.0), load * length, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.bending_moment, 1.0), 0.0, epsilon = 1.0);
    assert_relative_eq!(value_at(&beam.shear_force, 0.0), -load, max_relative = 1e-4);
    assert_relative_eq!(solution.max_bending_moment(), -load * length, max_relative = 1e-4);

    let section_modulus = 0.1 * 0.2 * 0.2 / 6.0;
    assert_relative_eq!(
        value_at(&beam.bending_stress, 0.0),
        load * length / section_modulus,
        max_relative = 1e-4
    );
}

#[test]
fn simply_supported_uniform_load() {
    let (span, q) = (6.0, 20e3);
    let mut structure = new_structure();
    structure.add_node(Node::pinned("A", 0.0, 0.0)).unwrap();
    structure
        .add_node(Node::new("B", span, 0.0).with_constraint(Constraint::new(true, false, true)))
        .unwrap();
    let beam = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .add_distributed_load(DistributedLoad::uniform_downward(q))
        .build()
        .unwrap();
    structure.add_element(beam).unwrap();

    let solution = solve(&structure, &options()).unwrap();
    let beam = solution.element("AB").unwrap();

    // δ = 5qL⁴/384EI, M = qL²/8
    assert_relative_eq!(
        value_at(&beam.global_y_displacement, 0.5),
        -5.0 * q * span.powi(4) / (384.0 * E * INERTIA),
        max_relative = 1e-4
    );
    assert_relative_eq!(value_at(&beam.bending_moment, 0.5), q * span * span / 8.0, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.shear_force, 0.0), q * span / 2.0, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.shear_force, 1.0), -q * span / 2.0, max_relative = 1e-4);

    assert_relative_eq!(solution.reaction("A").unwrap().fy, q * span / 2.0, max_relative = 1e-6);
    assert_relative_eq!(solution.reaction("B").unwrap().fy, q * span / 2.0, max_relative = 1e-6);
    assert_relative_eq!(solution.reaction("B").unwrap().fx, 0.0, epsilon = 1e-3);
}

#[test]
fn axial_bar_in_tension() {
    let (length, load) = (2.0, 1000.0);
    let mut structure = new_structure();
    structure.add_node(Node::pinned("A", 0.0, 0.0)).unwrap();
    structure
        .add_node(Node::new("B", length, 0.0).with_constraint(Constraint::new(true, false, true)))
        .unwrap();
    let bar = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .with_links(Constraint::DISPLACEMENT, Constraint::DISPLACEMENT)
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fx, 1.0, load))
        .build()
        .unwrap();
    structure.add_element(bar).unwrap();

    let solution = solve(&structure, &options()).unwrap();
    let bar = solution.element("AB").unwrap();

    assert_eq!(bar.axial_stress.len(), 2);
    for value in &bar.axial_stress {
        assert_relative_eq!(value.value, load / AREA, max_relative = 1e-6);
    }
    for value in &bar.local_y_displacement {
        assert_relative_eq!(value.value, 0.0, epsilon = 1e-12);
    }
    assert_relative_eq!(
        solution.node_displacement("B").unwrap().dx,
        load * length / (E * AREA),
        max_relative = 1e-6
    );
    assert_relative_eq!(solution.reaction("A").unwrap().fx, -load, max_relative = 1e-6);
}

fn two_bar_truss() -> Structure {
    let mut structure = new_structure();
    structure.add_node(Node::pinned("A", 0.0, 0.0)).unwrap();
    structure.add_node(Node::new("B", 2.0, 1.5)).unwrap();
    structure.add_node(Node::pinned("C", 4.0, 0.0)).unwrap();

    let left = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .with_links(Constraint::DISPLACEMENT, Constraint::DISPLACEMENT)
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 1.0, -1000.0))
        .build()
        .unwrap();
    let right = structure
        .element_builder("BC", "B", "C", "steel", "R100x200")
        .unwrap()
        .with_links(Constraint::DISPLACEMENT, Constraint::DISPLACEMENT)
        .build()
        .unwrap();
    structure.add_element(left).unwrap();
    structure.add_element(right).unwrap();
    structure
}

#[test]
fn truss_reactions_balance_loads() {
    let solution = solve(&two_bar_truss(), &options()).unwrap();

    let total = solution.total_reaction();
    assert_relative_eq!(total.fx, 0.0, epsilon = 1e-6);
    assert_relative_eq!(total.fy, 1000.0, max_relative = 1e-8);

    let left = solution.reaction("A").unwrap();
    let right = solution.reaction("C").unwrap();
    assert_relative_eq!(left.fy, 500.0, max_relative = 1e-6);
    assert_relative_eq!(right.fy, 500.0, max_relative = 1e-6);
    assert_relative_eq!(left.fx, 2000.0 / 3.0, max_relative = 1e-6);
    assert_relative_eq!(right.fx, -2000.0 / 3.0, max_relative = 1e-6);

    // Both bars carry N = -1000 / (2 · 0.6) in compression
    let compression = -1000.0 / 1.2;
    for id in ["AB", "BC"] {
        let bar = solution.element(id).unwrap();
        for value in &bar.axial_stress {
            assert_relative_eq!(value.value, compression / AREA, max_relative = 1e-6);
        }
        for value in &bar.bending_moment {
            assert_relative_eq!(value.value, 0.0, epsilon = 1e-3);
        }
    }
}

#[test]
fn frame_reactions_balance_loads() {
    let mut structure = new_structure();
    structure.add_node(Node::fixed("N1", 0.0, 0.0)).unwrap();
    structure.add_node(Node::fixed("N2", 6.0, 0.0)).unwrap();
    structure.add_node(Node::new("N3", 0.0, 4.0)).unwrap();
    structure.add_node(Node::new("N4", 6.0, 4.0)).unwrap();

    let column = structure
        .element_builder("C1", "N1", "N3", "steel", "R100x200")
        .unwrap()
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fx, 1.0, 5e3))
        .build()
        .unwrap();
    structure.add_element(column).unwrap();
    let column = structure
        .element_builder("C2", "N2", "N4", "steel", "R100x200")
        .unwrap()
        .add_distributed_load(DistributedLoad::new(LoadTerm::Fy, true, 0.2, 1e3, 0.8, 3e3))
        .build()
        .unwrap();
    structure.add_element(column).unwrap();
    let beam = structure
        .element_builder("B1", "N3", "N4", "steel", "R100x200")
        .unwrap()
        .add_distributed_load(DistributedLoad::uniform_downward(10e3))
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 0.3, -8e3))
        .add_concentrated_load(ConcentratedLoad::local(LoadTerm::Mz, 0.7, 2e3))
        .build()
        .unwrap();
    structure.add_element(beam).unwrap();

    let solution = solve(&structure, &options()).unwrap();
    let total = solution.total_reaction();

    // The local +y of the vertical right column points towards global -X
    // and its trapezoidal load resultant is 0.6 · 4 · 2e3
    let column_load = 0.6 * 4.0 * 2e3;
    assert_relative_eq!(total.fx, -5e3 + column_load, epsilon = 1e-2);
    assert_relative_eq!(total.fy, 10e3 * 6.0 + 8e3, max_relative = 1e-6);

    // Moment equilibrium about the origin, both supports lie on y = 0
    let mut moment = total.mz;
    for (id, reaction) in solution.reactions() {
        let x = if id == "N1" { 0.0 } else { 6.0 };
        moment += x * reaction.fy;
    }
    // The trapezoid resultant acts 1.4 m above its start at y = 0.8
    let column_load_height = 0.8 + 2.4 * (1e3 + 2.0 * 3e3) / (3.0 * (1e3 + 3e3));
    let applied = -4.0 * 5e3 + 3.0 * -60e3 + 1.8 * -8e3 + 2e3 + column_load_height * column_load;
    assert_relative_eq!(moment + applied, 0.0, epsilon = 1.0);
}

#[test]
fn released_end_transfers_no_moment() {
    let load = -10e3;
    let mut structure = new_structure();
    structure.add_node(Node::fixed("A", 0.0, 0.0)).unwrap();
    structure.add_node(Node::new("B", 2.0, 0.0)).unwrap();
    structure.add_node(Node::pinned("C", 4.0, 0.0)).unwrap();

    let cantilever = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 1.0, load))
        .build()
        .unwrap();
    let link = structure
        .element_builder("BC", "B", "C", "steel", "R100x200")
        .unwrap()
        .with_links(Constraint::DISPLACEMENT, Constraint::NIL)
        .build()
        .unwrap();
    structure.add_element(cantilever).unwrap();
    structure.add_element(link).unwrap();

    let solution = solve(&structure, &options()).unwrap();

    // The hinged element only rotates rigidly, so B deflects as a free tip
    let tip = solution.node_displacement("B").unwrap();
    assert_relative_eq!(tip.dy, load * 8.0 / (3.0 * E * INERTIA), max_relative = 1e-4);

    let link = solution.element("BC").unwrap();
    for value in link.bending_moment.iter().chain(&link.shear_force) {
        assert_relative_eq!(value.value, 0.0, epsilon = 1.0);
    }
    // The end of BC rotates independently of node B
    let link_rotation = value_at(&link.z_rotation, 0.0);
    assert_relative_eq!(link_rotation, -tip.dy / 2.0, max_relative = 1e-4);
    assert!((link_rotation - tip.rz).abs() > 1e-6);

    assert_relative_eq!(solution.reaction("C").unwrap().fy, 0.0, epsilon = 1.0);
    assert_relative_eq!(solution.reaction("A").unwrap().fy, -load, max_relative = 1e-6);
}

#[test]
fn own_weight_is_carried_by_supports() {
    let solution = solve(&cantilever(3.0, 0.0), &options().with_own_weight()).unwrap();

    let weight = 7850.0 * AREA * 3.0;
    let support = solution.reaction("A").unwrap();
    assert_relative_eq!(support.fy, weight, max_relative = 1e-6);
    assert_relative_eq!(support.mz, weight * 1.5, max_relative = 1e-6);
    assert!(solution.node_displacement("B").unwrap().dy < 0.0);
}

#[test]
fn unloaded_structure_does_not_move() {
    let solution = solve(&cantilever(3.0, 0.0), &options()).unwrap();

    assert_eq!(solution.iterations, 0);
    assert_eq!(solution.max_displacement(), 0.0);
    assert_eq!(solution.reaction("A").unwrap(), Reaction::default());
}

#[test]
fn solving_twice_gives_identical_results() {
    let structure = two_bar_truss();
    let first = solve(&structure, &options()).unwrap();
    let second = solve(&structure, &options()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn numbering_ignores_insertion_order() {
    let build = |reversed: bool| {
        let mut structure = new_structure();
        let mut nodes = vec![
            Node::fixed("N1", 0.0, 0.0),
            Node::new("N2", 0.0, 3.0),
            Node::new("N3", 4.0, 3.0),
            Node::pinned("N4", 4.0, 0.0),
        ];
        let mut elements = vec![("E1", "N1", "N2"), ("E2", "N2", "N3"), ("E3", "N4", "N3")];
        if reversed {
            nodes.reverse();
            elements.reverse();
        }
        for node in nodes {
            structure.add_node(node).unwrap();
        }
        for (id, start, end) in elements {
            let element = structure
                .element_builder(id, start, end, "steel", "R100x200")
                .unwrap()
                .add_concentrated_load(ConcentratedLoad::downward(0.5, 1e3))
                .build()
                .unwrap();
            structure.add_element(element).unwrap();
        }
        solve(&structure, &options()).unwrap()
    };

    let forward = build(false);
    let backward = build(true);

    assert_eq!(forward.dof_count, backward.dof_count);
    let forward_ids: Vec<_> = forward.elements.iter().map(|e| e.element_id.clone()).collect();
    let backward_ids: Vec<_> = backward.elements.iter().map(|e| e.element_id.clone()).collect();
    assert_eq!(forward_ids, backward_ids);

    for (id, displacement) in &forward.node_displacements {
        let other = backward.node_displacement(id).unwrap();
        assert_relative_eq!(displacement.dx, other.dx, max_relative = 1e-9, epsilon = 1e-15);
        assert_relative_eq!(displacement.dy, other.dy, max_relative = 1e-9, epsilon = 1e-15);
        assert_relative_eq!(displacement.rz, other.rz, max_relative = 1e-9, epsilon = 1e-15);
    }
}

#[test]
fn safety_checks_accept_a_sound_structure() {
    let solution = solve(&two_bar_truss(), &options().with_safety_checks());
    assert!(solution.is_ok());
}

#[test]
fn unsupported_structure_fails_to_solve() {
    let mut structure = new_structure();
    structure.add_node(Node::new("A", 0.0, 0.0)).unwrap();
    structure.add_node(Node::new("B", 3.0, 0.0)).unwrap();
    let beam = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 1.0, -1e3))
        .build()
        .unwrap();
    structure.add_element(beam).unwrap();

    let result = solve(&structure, &options().with_max_iter(500));
    assert!(result.is_err());
}

#[test]
fn dumps_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let matrix_path = dir.path().join("stiffness.pbm");
    let preprocessed_path = dir.path().join("preprocessed.json");

    let options = options()
        .with_matrix_dump(&matrix_path)
        .with_preprocessed_dump(&preprocessed_path);
    let solution = solve(&cantilever(3.0, -1e3), &options).unwrap();

    let image = std::fs::read_to_string(&matrix_path).unwrap();
    let header = format!("P1\n{0} {0}\n", solution.dof_count);
    assert!(image.starts_with(&header));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&preprocessed_path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["name"], "test");
    assert_eq!(json["elements"].as_array().unwrap().len(), 1);
    assert!(json["elements"][0]["nodes"][0]["dofs"].is_array());
}

fn portal_frame(stories: usize, bays: usize) -> Structure {
    let mut structure = Structure::new(StructureMetadata::new(1, 0));
    structure.add_material(Material::steel("steel")).unwrap();
    structure.add_section(Section::rectangular("column", 0.4, 0.4)).unwrap();
    structure.add_section(Section::rectangular("beam", 0.3, 0.6)).unwrap();

    for story in 0..=stories {
        for bay in 0..=bays {
            let id = format!("N{story}_{bay}");
            let (x, y) = (6.0 * bay as f64, 3.5 * story as f64);
            let node = if story == 0 {
                Node::fixed(&id, x, y)
            } else {
                Node::new(&id, x, y)
            };
            structure.add_node(node).unwrap();
        }
    }

    for story in 0..stories {
        for bay in 0..=bays {
            let mut column = structure
                .element_builder(
                    &format!("C{story}_{bay}"),
                    &format!("N{story}_{bay}"),
                    &format!("N{}_{bay}", story + 1),
                    "steel",
                    "column",
                )
                .unwrap();
            if bay == 0 {
                column = column.add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fx, 1.0, 1e4));
            }
            structure.add_element(column.build().unwrap()).unwrap();
        }
    }

    for story in 1..=stories {
        for bay in 0..bays {
            let beam = structure
                .element_builder(
                    &format!("B{story}_{bay}"),
                    &format!("N{story}_{bay}"),
                    &format!("N{story}_{}", bay + 1),
                    "steel",
                    "beam",
                )
                .unwrap()
                .add_distributed_load(DistributedLoad::uniform_downward(15e3))
                .build()
                .unwrap();
            structure.add_element(beam).unwrap();
        }
    }

    structure
}

#[test]
fn cantilever_with_default_options() {
    let (length, load) = (3.0, -10e3);
    let solution = solve(&cantilever(length, load), &SolveOptions::default()).unwrap();

    let tip = solution.node_displacement("B").unwrap();
    assert_relative_eq!(tip.dy, load * length.powi(3) / (3.0 * E * INERTIA), max_relative = 1e-4);
    assert_relative_eq!(tip.rz, load * length.powi(2) / (2.0 * E * INERTIA), max_relative = 1e-4);
    assert!(solution.iterations <= solution.dof_count);
}

#[test]
fn portal_frames_with_default_options() {
    for (stories, bays) in [(1, 1), (3, 2)] {
        let solution = solve(&portal_frame(stories, bays), &SolveOptions::default()).unwrap();
        assert!(solution.iterations <= solution.dof_count);

        let total = solution.total_reaction();
        let lateral = 1e4 * stories as f64;
        let gravity = 15e3 * 6.0 * (bays * stories) as f64;
        assert_relative_eq!(total.fx, -lateral, max_relative = 1e-4);
        assert_relative_eq!(total.fy, gravity, max_relative = 1e-4);

        // The frame sways with the lateral load
        let roof = solution.node_displacement(&format!("N{stories}_0")).unwrap();
        assert!(roof.dx > 0.0);
    }
}

#[test]
fn jacobi_preconditioner_agrees_with_cholesky() {
    let structure = cantilever(3.0, -10e3);
    let cholesky = solve(&structure, &options()).unwrap();
    let jacobi = solve(&structure, &options().with_preconditioner(Preconditioner::Jacobi)).unwrap();

    let (a, b) = (
        cholesky.node_displacement("B").unwrap(),
        jacobi.node_displacement("B").unwrap(),
    );
    assert_relative_eq!(a.dy, b.dy, max_relative = 1e-6);
    assert_relative_eq!(a.rz, b.rz, max_relative = 1e-6);
}

#[test]
fn shear_jumps_after_a_midspan_load() {
    let (span, load) = (4.0, 12e3);
    let mut structure = new_structure();
    structure.add_node(Node::pinned("A", 0.0, 0.0)).unwrap();
    structure
        .add_node(Node::new("B", span, 0.0).with_constraint(Constraint::new(true, false, true)))
        .unwrap();
    let beam = structure
        .element_builder("AB", "A", "B", "steel", "R100x200")
        .unwrap()
        .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 0.5, -load))
        .build()
        .unwrap();
    structure.add_element(beam).unwrap();

    let solution = solve(&structure, &SolveOptions::default()).unwrap();
    let beam = solution.element("AB").unwrap();

    // Values at the load point are taken just after it
    assert_relative_eq!(value_at(&beam.shear_force, 0.0), load / 2.0, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.shear_force, 0.5), -load / 2.0, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.shear_force, 1.0), -load / 2.0, max_relative = 1e-4);
    assert_relative_eq!(value_at(&beam.bending_moment, 0.5), load * span / 4.0, max_relative = 1e-4);
}
