mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::cheapest_consistent_circuit;
use common::cheapest_consistent_path;
use common::init_logging;
use common::random_costs;
use common::seeded_rng;
use common::BoundCheckingBrancher;
use hamilton_solver::branching::branchers::LexicographicBrancher;
use hamilton_solver::branching::branchers::MinDomainBrancher;
use hamilton_solver::branching::Brancher;
use hamilton_solver::branching::BranchingStrategy;
use hamilton_solver::branching::Decision;
use hamilton_solver::branching::SelectionContext;
use hamilton_solver::constraints;
use hamilton_solver::optimisation::OptimisationDirection;
use hamilton_solver::optimisation::OptimisationStrategy;
use hamilton_solver::options::HeldKarpOptions;
use hamilton_solver::options::RelaxationKind;
use hamilton_solver::propagation::PropagatorHandle;
use hamilton_solver::propagators::ArcCostArgs;
use hamilton_solver::propagators::CheapestArcCuts;
use hamilton_solver::propagators::CutGenerator;
use hamilton_solver::propagators::HamiltonianShape;
use hamilton_solver::propagators::HeldKarpPropagator;
use hamilton_solver::results::OptimisationResult;
use hamilton_solver::results::ProblemSolution;
use hamilton_solver::results::SatisfactionResult;
use hamilton_solver::results::Solution;
use hamilton_solver::results::SolutionReference;
use hamilton_solver::termination::Indefinite;
use hamilton_solver::variables::GraphId;
use hamilton_solver::variables::GraphKind;
use hamilton_solver::variables::IntegerId;
use hamilton_solver::CostMatrix;
use hamilton_solver::GraphView;
use hamilton_solver::Solver;

/// An asymmetric instance whose only optimal tour is `0 -> 1 -> 2 -> 3 -> 4 -> 0`.
fn five_city_instance() -> CostMatrix {
    CostMatrix::new(vec![
        vec![0, 15, 12, 17, 9],
        vec![14, 0, 8, 20, 11],
        vec![6, 15, 0, 10, 18],
        vec![19, 7, 13, 0, 5],
        vec![4, 16, 21, 14, 0],
    ])
    .expect("a square matrix")
}

fn tsp_model(
    solver: &mut Solver,
    costs: &CostMatrix,
    kind: GraphKind,
) -> (GraphId, IntegerId, PropagatorHandle<HeldKarpPropagator>) {
    let graph = solver
        .new_complete_graph(costs.num_nodes(), kind)
        .expect("at least one node");
    let objective = solver.new_bounded_integer(0, 10_000).expect("a valid range");
    let held_karp = constraints::travelling_salesman(
        graph,
        HamiltonianShape::Circuit,
        costs.clone(),
        objective,
    )
    .post_with_bound(solver)
    .expect("a well-formed model");

    (graph, objective, held_karp)
}

fn tour_cost(solution: &Solution, graph: GraphId, costs: &CostMatrix) -> i64 {
    solution
        .arcs(graph)
        .into_iter()
        .map(|arc| costs.cost(arc.from, arc.to))
        .sum()
}

/// Follows the successors from node 0 and returns the order in which the nodes are visited.
fn visiting_order(solution: &Solution, graph: GraphId) -> Vec<usize> {
    let num_nodes = solution.graph(graph).num_nodes();
    let mut order = vec![0];
    while order.len() <= num_nodes {
        let last = order[order.len() - 1];
        let next = solution.successor(graph, last).expect("every node has a successor");
        if next == 0 {
            break;
        }
        order.push(next);
    }
    order
}

#[test]
fn the_optimal_asymmetric_tour_is_found() {
    init_logging();

    for strategy in [
        OptimisationStrategy::LinearSatUnsat,
        OptimisationStrategy::LinearUnsatSat,
    ] {
        for branching in [
            BranchingStrategy::Lexicographic,
            BranchingStrategy::MinDomain,
            BranchingStrategy::ReducedCost,
        ] {
            let costs = five_city_instance();
            let mut solver = Solver::default();
            let (graph, objective, held_karp) = tsp_model(&mut solver, &costs, GraphKind::Directed);

            let mut brancher = solver.brancher(branching, graph, Some(held_karp));
            let result = solver.find_optimal_solution(
                &mut brancher,
                OptimisationDirection::Minimise,
                objective,
                strategy,
            );

            assert!(result.is_complete());
            let OptimisationResult::Optimal(solution) = result else {
                panic!("{strategy} with {branching} branching did not prove optimality");
            };
            assert_eq!(solution.integer_value(objective), 42);
            assert_eq!(tour_cost(&solution, graph, &costs), 42);
            assert_eq!(visiting_order(&solution, graph), vec![0, 1, 2, 3, 4]);
            assert_eq!(solver.best_objective_value(), Some(42));
            assert!(solver.num_solutions() >= 1);
        }
    }
}

#[test]
fn optimal_tours_match_exhaustive_enumeration() {
    init_logging();
    let mut rng = seeded_rng(7);

    for kind in [GraphKind::Directed, GraphKind::Undirected] {
        for num_nodes in 4..=6 {
            for _ in 0..3 {
                let costs = random_costs(&mut rng, num_nodes, kind, 40);
                let mut solver = Solver::default();
                let (graph, objective, held_karp) = tsp_model(&mut solver, &costs, kind);

                let optimum = cheapest_consistent_circuit(solver.graph(graph), &costs)
                    .expect("a complete graph has a circuit");
                assert!(solver.lower_bound(objective) <= optimum);
                let root_bound = solver
                    .get_propagator(held_karp)
                    .and_then(|propagator| propagator.bound())
                    .expect("the relaxation ran at the root");
                assert!(root_bound <= optimum as f64 + 1e-6);

                let mut brancher = BoundCheckingBrancher {
                    inner: MinDomainBrancher::new(graph),
                    graph,
                    shape: HamiltonianShape::Circuit,
                    objective,
                    costs: costs.clone(),
                    num_checked_nodes: 0,
                };
                let result = solver.find_optimal_solution(
                    &mut brancher,
                    OptimisationDirection::Minimise,
                    objective,
                    OptimisationStrategy::LinearSatUnsat,
                );

                let OptimisationResult::Optimal(solution) = result else {
                    panic!("the search is not limited");
                };
                assert_eq!(solution.integer_value(objective), optimum);
                assert_eq!(tour_cost(&solution, graph, &costs), optimum);
                assert_eq!(solution.arcs(graph).len(), num_nodes);
                assert!(brancher.num_checked_nodes >= 1);
            }
        }
    }
}

#[test]
fn both_optimisation_strategies_agree() {
    let mut rng = seeded_rng(31);

    for _ in 0..5 {
        let costs = random_costs(&mut rng, 6, GraphKind::Directed, 25);
        let mut values = vec![];

        for strategy in [
            OptimisationStrategy::LinearSatUnsat,
            OptimisationStrategy::LinearUnsatSat,
        ] {
            let mut solver = Solver::default();
            let (graph, objective, _) = tsp_model(&mut solver, &costs, GraphKind::Directed);
            let mut brancher = MinDomainBrancher::new(graph);

            let result = solver.find_optimal_solution(
                &mut brancher,
                OptimisationDirection::Minimise,
                objective,
                strategy,
            );

            let OptimisationResult::Optimal(solution) = result else {
                panic!("the search is not limited");
            };
            values.push(solution.integer_value(objective));
        }

        assert_eq!(values[0], values[1]);
    }
}

#[test]
fn maximising_finds_the_most_expensive_tour() {
    let costs = five_city_instance();
    let mut solver = Solver::default();
    let (graph, objective, _) = tsp_model(&mut solver, &costs, GraphKind::Directed);
    let mut brancher = MinDomainBrancher::new(graph);

    let result = solver.find_optimal_solution(
        &mut brancher,
        OptimisationDirection::Maximise,
        objective,
        OptimisationStrategy::LinearSatUnsat,
    );

    let negated = CostMatrix::from_fn(5, |from, to| -costs.cost(from, to));
    let mut enumerated = Solver::default();
    let enumerated_graph = enumerated
        .new_complete_graph(5, GraphKind::Directed)
        .expect("at least one node");
    let most_expensive =
        -cheapest_consistent_circuit(enumerated.graph(enumerated_graph), &negated)
            .expect("a complete graph has a circuit");

    let OptimisationResult::Optimal(solution) = result else {
        panic!("the search is not limited");
    };
    assert_eq!(solution.integer_value(objective), most_expensive);
}

#[test]
fn an_exhausted_node_limit_reports_the_incumbent() {
    let mut rng = seeded_rng(3);
    let costs = random_costs(&mut rng, 7, GraphKind::Directed, 100);
    let mut solver = Solver::default();
    let (graph, objective, _) = tsp_model(&mut solver, &costs, GraphKind::Directed);
    solver.set_node_limit(0);
    let mut brancher = MinDomainBrancher::new(graph);

    let result = solver.find_optimal_solution(
        &mut brancher,
        OptimisationDirection::Minimise,
        objective,
        OptimisationStrategy::LinearSatUnsat,
    );

    assert!(matches!(result, OptimisationResult::Unknown));
    assert!(result.solution().is_none());
    assert!(!result.is_complete());
    assert_eq!(solver.best_objective_value(), None);
}

#[test]
fn optimal_paths_match_exhaustive_enumeration_for_both_relaxations() {
    init_logging();
    let mut rng = seeded_rng(41);
    let configurations = [
        (GraphKind::Directed, RelaxationKind::SpanningTree),
        (GraphKind::Undirected, RelaxationKind::SpanningTree),
        (GraphKind::Directed, RelaxationKind::ReducedGraph),
    ];

    for (kind, relaxation) in configurations {
        for num_nodes in 4..=6 {
            for (source, sink) in [(0, num_nodes - 1), (2, 0)] {
                let costs = random_costs(&mut rng, num_nodes, kind, 40);
                let mut solver = Solver::default();
                let graph = solver
                    .new_complete_graph(num_nodes, kind)
                    .expect("at least one node");
                let objective = solver.new_bounded_integer(0, 10_000).expect("a valid range");
                let optimum = cheapest_consistent_path(solver.graph(graph), &costs, source, sink)
                    .expect("a complete graph has a path");

                let options = HeldKarpOptions {
                    relaxation,
                    ..HeldKarpOptions::default()
                };
                let held_karp = constraints::travelling_salesman(
                    graph,
                    HamiltonianShape::Path { source, sink },
                    costs.clone(),
                    objective,
                )
                .with_options(options)
                .post_with_bound(&mut solver)
                .expect("a well-formed model");

                assert!(solver.lower_bound(objective) <= optimum);
                let root_bound = solver
                    .get_propagator(held_karp)
                    .and_then(|propagator| propagator.bound())
                    .expect("the relaxation ran at the root");
                assert!(root_bound <= optimum as f64 + 1e-6);

                let mut brancher = BoundCheckingBrancher {
                    inner: MinDomainBrancher::new(graph),
                    graph,
                    shape: HamiltonianShape::Path { source, sink },
                    objective,
                    costs: costs.clone(),
                    num_checked_nodes: 0,
                };
                let result = solver.find_optimal_solution(
                    &mut brancher,
                    OptimisationDirection::Minimise,
                    objective,
                    OptimisationStrategy::LinearSatUnsat,
                );

                let OptimisationResult::Optimal(solution) = result else {
                    panic!("the search is not limited");
                };
                assert!(brancher.num_checked_nodes >= 1);
                assert_eq!(
                    solution.integer_value(objective),
                    optimum,
                    "{kind:?} path from {source} to {sink} with {relaxation:?}"
                );
                assert_eq!(tour_cost(&solution, graph, &costs), optimum);
                assert_eq!(solution.arcs(graph).len(), num_nodes - 1);
            }
        }
    }
}

/// Counts how often the relaxation consults it, and otherwise behaves as [`CheapestArcCuts`].
#[derive(Debug)]
struct CountingCuts {
    num_calls: Rc<Cell<usize>>,
}

impl CutGenerator for CountingCuts {
    fn name(&self) -> &str {
        "CountingCuts"
    }

    fn lower_bound(
        &mut self,
        graph: GraphView,
        costs: &CostMatrix,
        shape: HamiltonianShape,
    ) -> Option<i64> {
        self.num_calls.set(self.num_calls.get() + 1);
        CheapestArcCuts.lower_bound(graph, costs, shape)
    }
}

#[test]
fn a_cut_generator_tightens_the_root_bound_without_losing_the_optimum() {
    let mut rng = seeded_rng(43);

    for kind in [GraphKind::Directed, GraphKind::Undirected] {
        let costs = random_costs(&mut rng, 6, kind, 50);
        let mut solver = Solver::default();
        let graph = solver
            .new_complete_graph(6, kind)
            .expect("at least one node");
        let objective = solver.new_bounded_integer(0, 10_000).expect("a valid range");
        let optimum = cheapest_consistent_circuit(solver.graph(graph), &costs)
            .expect("a complete graph has a circuit");
        let cut_bound = CheapestArcCuts
            .lower_bound(solver.graph(graph), &costs, HamiltonianShape::Circuit)
            .expect("every node has enough arcs");

        let num_calls = Rc::new(Cell::new(0));
        solver
            .add_constraint(
                constraints::travelling_salesman(
                    graph,
                    HamiltonianShape::Circuit,
                    costs.clone(),
                    objective,
                )
                .with_cut_generator(Box::new(CountingCuts {
                    num_calls: Rc::clone(&num_calls),
                })),
            )
            .expect("a well-formed model");

        assert!(num_calls.get() >= 1);
        // The envelope only shrinks, so the bound used at the root is at least the initial one.
        assert!(solver.lower_bound(objective) >= cut_bound);
        assert!(solver.lower_bound(objective) <= optimum);

        let mut brancher = MinDomainBrancher::new(graph);
        let result = solver.find_optimal_solution(
            &mut brancher,
            OptimisationDirection::Minimise,
            objective,
            OptimisationStrategy::LinearSatUnsat,
        );

        let OptimisationResult::Optimal(solution) = result else {
            panic!("the search is not limited");
        };
        assert_eq!(solution.integer_value(objective), optimum);
    }
}

#[test]
fn a_waiting_relaxation_stays_inactive_until_the_first_solution() {
    let costs = five_city_instance();
    // The tight upper bound lets an active relaxation filter at the root.
    let optimum = 42;

    let mut models = vec![];
    for wait_first_solution in [false, true] {
        let mut solver = Solver::default();
        let graph = solver
            .new_complete_graph(5, GraphKind::Directed)
            .expect("at least one node");
        let objective = solver.new_bounded_integer(0, optimum).expect("a valid range");
        let held_karp = constraints::travelling_salesman(
            graph,
            HamiltonianShape::Circuit,
            costs.clone(),
            objective,
        )
        .with_options(HeldKarpOptions {
            wait_first_solution,
            ..HeldKarpOptions::default()
        })
        .post_with_bound(&mut solver)
        .expect("a well-formed model");

        let root_bound = solver
            .get_propagator(held_karp)
            .and_then(|propagator| propagator.bound());
        models.push((solver, graph, objective, root_bound));
    }

    let (_, _, _, eager_bound) = &models[0];
    assert!(eager_bound.is_some());

    let (waiting, graph, objective, waiting_bound) = &mut models[1];
    assert_eq!(*waiting_bound, None);

    let mut brancher = MinDomainBrancher::new(*graph);
    let result = waiting.find_optimal_solution(
        &mut brancher,
        OptimisationDirection::Minimise,
        *objective,
        OptimisationStrategy::LinearSatUnsat,
    );

    let OptimisationResult::Optimal(solution) = result else {
        panic!("the search is not limited");
    };
    assert_eq!(solution.integer_value(*objective), optimum);
    assert_eq!(visiting_order(&solution, *graph), vec![0, 1, 2, 3, 4]);
}

/// Records the envelope and kernel sizes at every node until the first solution.
#[derive(Debug)]
struct TraceBrancher {
    inner: LexicographicBrancher,
    graph: GraphId,
    trace: Vec<(usize, usize)>,
    found_solution: bool,
}

impl TraceBrancher {
    fn new(graph: GraphId) -> Self {
        TraceBrancher {
            inner: LexicographicBrancher::new(graph),
            graph,
            trace: vec![],
            found_solution: false,
        }
    }
}

impl Brancher for TraceBrancher {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        if !self.found_solution {
            let graph = context.graph(self.graph);
            self.trace.push((graph.num_envelope_arcs(), graph.num_kernel_arcs()));
        }
        self.inner.next_decision(context)
    }

    fn on_solution(&mut self, solution: SolutionReference) {
        self.found_solution = true;
        self.inner.on_solution(solution)
    }
}

#[test]
fn a_waiting_relaxation_does_not_filter_before_the_first_solution() {
    let costs = five_city_instance();

    // The structural and arc-cost propagators alone.
    let mut without_relaxation = Solver::default();
    let graph = without_relaxation
        .new_complete_graph(5, GraphKind::Directed)
        .expect("at least one node");
    let objective = without_relaxation
        .new_bounded_integer(0, 42)
        .expect("a valid range");
    without_relaxation
        .add_constraint(constraints::hamiltonian_circuit(graph))
        .expect("a well-formed constraint");
    let _ = without_relaxation
        .add_propagator(ArcCostArgs {
            graph,
            shape: HamiltonianShape::Circuit,
            costs: costs.clone(),
            objective,
        })
        .expect("a well-formed model");
    let mut expected = TraceBrancher::new(graph);
    let result = without_relaxation.satisfy(&mut expected, &mut Indefinite);
    assert!(matches!(result, SatisfactionResult::Satisfiable(_)));

    let mut waiting = Solver::default();
    let graph = waiting
        .new_complete_graph(5, GraphKind::Directed)
        .expect("at least one node");
    let objective = waiting.new_bounded_integer(0, 42).expect("a valid range");
    let held_karp = constraints::travelling_salesman(
        graph,
        HamiltonianShape::Circuit,
        costs,
        objective,
    )
    .with_options(HeldKarpOptions {
        wait_first_solution: true,
        ..HeldKarpOptions::default()
    })
    .post_with_bound(&mut waiting)
    .expect("a well-formed model");
    let mut actual = TraceBrancher::new(graph);
    let result = waiting.satisfy(&mut actual, &mut Indefinite);
    assert!(matches!(result, SatisfactionResult::Satisfiable(_)));

    assert_eq!(actual.trace, expected.trace);
    assert!(waiting
        .get_propagator(held_karp)
        .is_some_and(|propagator| propagator.bound().is_none()));
}
