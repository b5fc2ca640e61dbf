mod common;

use std::time::Duration;

use common::init_logging;
use common::random_costs;
use common::seeded_rng;
use common::MonotonicityBrancher;
use hamilton_solver::branching::branchers::LexicographicBrancher;
use hamilton_solver::branching::branchers::MinDomainBrancher;
use hamilton_solver::branching::Brancher;
use hamilton_solver::branching::Decision;
use hamilton_solver::branching::SelectionContext;
use hamilton_solver::constraints;
use hamilton_solver::optimisation::LinearSatUnsat;
use hamilton_solver::optimisation::LinearUnsatSat;
use hamilton_solver::optimisation::OptimisationDirection;
use hamilton_solver::optimisation::OptimisationStrategy;
use hamilton_solver::options::SolverOptions;
use hamilton_solver::propagators::HamiltonianShape;
use hamilton_solver::results::OptimisationResult;
use hamilton_solver::results::ProblemSolution;
use hamilton_solver::results::SatisfactionResult;
use hamilton_solver::results::SolutionReference;
use hamilton_solver::termination::Indefinite;
use hamilton_solver::variables::Arc;
use hamilton_solver::variables::GraphId;
use hamilton_solver::variables::GraphKind;
use hamilton_solver::variables::IntegerId;
use hamilton_solver::CostMatrix;
use hamilton_solver::Solver;

fn envelope_and_kernel(solver: &Solver, graph: GraphId) -> (Vec<Arc>, Vec<Arc>) {
    let view = solver.graph(graph);
    (view.envelope_arcs().collect(), view.kernel_arcs().collect())
}

#[test]
fn propagating_an_unchanged_model_again_changes_nothing() {
    init_logging();
    let mut rng = seeded_rng(11);
    let costs = random_costs(&mut rng, 6, GraphKind::Directed, 50);

    let mut solver = Solver::default();
    let graph = solver
        .new_complete_graph(6, GraphKind::Directed)
        .expect("at least one node");
    let objective = solver.new_bounded_integer(0, 1_000).expect("a valid range");
    solver
        .add_constraint(constraints::travelling_salesman(
            graph,
            HamiltonianShape::Circuit,
            costs,
            objective,
        ))
        .expect("a well-formed model");
    let at_fixpoint = envelope_and_kernel(&solver, graph);

    // Posting the structural propagators once more runs the root propagation again.
    solver
        .add_constraint(constraints::hamiltonian_circuit(graph))
        .expect("a well-formed constraint");

    assert_eq!(envelope_and_kernel(&solver, graph), at_fixpoint);
}

#[test]
fn domains_shrink_monotonically_along_every_branch() {
    let mut rng = seeded_rng(5);

    for kind in [GraphKind::Directed, GraphKind::Undirected] {
        let costs = random_costs(&mut rng, 6, kind, 30);
        let mut solver = Solver::default();
        let graph = solver
            .new_complete_graph(6, kind)
            .expect("at least one node");
        let objective = solver.new_bounded_integer(0, 1_000).expect("a valid range");
        solver
            .add_constraint(constraints::travelling_salesman(
                graph,
                HamiltonianShape::Circuit,
                costs,
                objective,
            ))
            .expect("a well-formed model");

        let mut brancher = MonotonicityBrancher::new(LexicographicBrancher::new(graph), graph);
        let result = solver.find_optimal_solution(
            &mut brancher,
            OptimisationDirection::Minimise,
            objective,
            OptimisationStrategy::LinearSatUnsat,
        );

        assert!(matches!(result, OptimisationResult::Optimal(_)));
        assert!(brancher.num_checked_nodes > 1);
    }
}

#[test]
fn every_solution_is_reported_to_the_callback() {
    let mut rng = seeded_rng(17);
    let costs = random_costs(&mut rng, 5, GraphKind::Directed, 20);

    let mut solver = Solver::default();
    let graph = solver
        .new_complete_graph(5, GraphKind::Directed)
        .expect("at least one node");
    let objective = solver.new_bounded_integer(0, 1_000).expect("a valid range");
    solver
        .add_constraint(constraints::travelling_salesman(
            graph,
            HamiltonianShape::Circuit,
            costs,
            objective,
        ))
        .expect("a well-formed model");

    let values = std::cell::RefCell::new(vec![]);
    let callback = |_: &Solver, solution: SolutionReference| {
        values.borrow_mut().push(solution.integer_value(objective));
    };
    let mut brancher = LexicographicBrancher::new(graph);
    let result = solver.optimise(
        &mut brancher,
        &mut Indefinite,
        LinearSatUnsat::new(OptimisationDirection::Minimise, objective, callback),
    );

    let OptimisationResult::Optimal(solution) = result else {
        panic!("the search is not limited");
    };
    let values = values.into_inner();
    // Every solution strictly improves on the previous one.
    assert!(values.windows(2).all(|pair| pair[1] < pair[0]));
    assert_eq!(values.last(), Some(&solution.integer_value(objective)));
    assert_eq!(solver.num_solutions(), values.len() as u64);
}

fn travelling_salesman_model(costs: &CostMatrix) -> (Solver, GraphId, IntegerId) {
    let mut solver = Solver::default();
    let graph = solver
        .new_complete_graph(costs.num_nodes(), GraphKind::Directed)
        .expect("at least one node");
    let objective = solver.new_bounded_integer(0, 1_000).expect("a valid range");
    solver
        .add_constraint(constraints::travelling_salesman(
            graph,
            HamiltonianShape::Circuit,
            costs.clone(),
            objective,
        ))
        .expect("a well-formed model");
    (solver, graph, objective)
}

#[test]
fn the_bottom_up_search_reports_its_solutions_to_the_callback() {
    let mut rng = seeded_rng(23);
    let costs = random_costs(&mut rng, 6, GraphKind::Directed, 30);

    let (mut top_down, graph, objective) = travelling_salesman_model(&costs);
    let mut brancher = LexicographicBrancher::new(graph);
    let OptimisationResult::Optimal(expected) = top_down.find_optimal_solution(
        &mut brancher,
        OptimisationDirection::Minimise,
        objective,
        OptimisationStrategy::LinearSatUnsat,
    ) else {
        panic!("the search is not limited");
    };

    let (mut bottom_up, graph, objective) = travelling_salesman_model(&costs);
    let values = std::cell::RefCell::new(vec![]);
    let callback = |_: &Solver, solution: SolutionReference| {
        values.borrow_mut().push(solution.integer_value(objective));
    };
    let mut brancher = LexicographicBrancher::new(graph);
    let result = bottom_up.optimise(
        &mut brancher,
        &mut Indefinite,
        LinearUnsatSat::new(OptimisationDirection::Minimise, objective, callback),
    );

    let OptimisationResult::Optimal(solution) = result else {
        panic!("the search is not limited");
    };
    let values = values.into_inner();
    // The feasibility check and, unless it was already optimal, the final solution.
    assert!(!values.is_empty() && values.len() <= 2);
    assert_eq!(values.last(), Some(&solution.integer_value(objective)));
    assert_eq!(
        solution.integer_value(objective),
        expected.integer_value(objective)
    );
}

#[test]
fn a_zero_time_limit_gives_up_before_the_first_decision() {
    let mut solver = Solver::with_options(SolverOptions::default());
    let graph = solver
        .new_complete_graph(6, GraphKind::Directed)
        .expect("at least one node");
    solver
        .add_constraint(constraints::hamiltonian_circuit(graph))
        .expect("a well-formed constraint");
    solver.set_time_limit(Duration::ZERO);

    let mut brancher = MinDomainBrancher::new(graph);
    let result = solver.find_solution(&mut brancher);

    assert!(matches!(result, SatisfactionResult::Unknown));
    assert_eq!(solver.num_decisions(), 0);
}

#[test]
fn the_model_can_be_extended_between_searches() {
    let mut solver = Solver::default();
    let graph = solver
        .new_complete_graph(5, GraphKind::Directed)
        .expect("at least one node");
    solver
        .add_constraint(constraints::hamiltonian_circuit(graph))
        .expect("a well-formed constraint");

    let mut brancher = LexicographicBrancher::new(graph);
    let first = solver.satisfy(&mut brancher, &mut Indefinite);
    assert!(matches!(first, SatisfactionResult::Satisfiable(_)));

    // Only the tour 0 -> 1 -> 2 -> 3 -> 4 -> 0 costs 5.
    let objective = solver.new_bounded_integer(0, 100).expect("a valid range");
    let costs = CostMatrix::from_fn(5, |from, to| {
        if to == (from + 1) % 5 {
            1
        } else {
            10
        }
    });
    solver
        .add_constraint(constraints::travelling_salesman(
            graph,
            HamiltonianShape::Circuit,
            costs,
            objective,
        ))
        .expect("a well-formed model");

    let second = solver.find_optimal_solution(
        &mut brancher,
        OptimisationDirection::Minimise,
        objective,
        OptimisationStrategy::LinearUnsatSat,
    );

    let OptimisationResult::Optimal(solution) = second else {
        panic!("the search is not limited");
    };
    assert_eq!(solution.integer_value(objective), 5);
    assert!((0..5).all(|node| solution.successor(graph, node) == Some((node + 1) % 5)));
}

#[test]
fn random_tie_breaking_still_finds_a_circuit() {
    for seed in 0..5 {
        let mut solver = Solver::default();
        let graph = solver
            .new_complete_graph(6, GraphKind::Undirected)
            .expect("at least one node");
        solver
            .add_constraint(constraints::hamiltonian_circuit(graph))
            .expect("a well-formed constraint");

        let mut brancher = MinDomainBrancher::with_random_tie_breaking(graph, seed);
        let result = solver.satisfy(&mut brancher, &mut Indefinite);

        let SatisfactionResult::Satisfiable(solution) = result else {
            panic!("a complete graph has a Hamiltonian circuit");
        };
        let view = solution.graph(graph);
        assert_eq!(view.num_kernel_arcs(), 6);
        assert!((0..6).all(|node| view.kernel_out_degree(node) == 2));
    }
}

/// Enforces a uniformly drawn undecided arc, using the generator of the solver.
struct RandomArcBrancher {
    graph: GraphId,
}

impl Brancher for RandomArcBrancher {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let graph = context.graph(self.graph);
        let undecided = graph
            .envelope_arcs()
            .filter(|arc| !graph.is_arc_in_kernel(arc.from, arc.to))
            .collect::<Vec<_>>();
        let index = context.random().generate_index(undecided.len())?;

        Some(Decision::EnforceArc {
            graph: self.graph,
            arc: undecided[index],
        })
    }
}

fn random_circuit(random_seed: u64) -> Vec<Arc> {
    let mut solver = Solver::with_options(SolverOptions { random_seed });
    let graph = solver
        .new_complete_graph(8, GraphKind::Directed)
        .expect("at least one node");
    solver
        .add_constraint(constraints::hamiltonian_circuit(graph))
        .expect("a well-formed constraint");

    let mut brancher = RandomArcBrancher { graph };
    let SatisfactionResult::Satisfiable(solution) = solver.find_solution(&mut brancher) else {
        panic!("a complete graph has a circuit");
    };
    assert_eq!(solution.arcs(graph).len(), 8);
    solution.arcs(graph)
}

#[test]
fn the_seed_of_the_solver_determines_random_decisions() {
    for random_seed in [1, 2, 3] {
        assert_eq!(random_circuit(random_seed), random_circuit(random_seed));
    }
}
