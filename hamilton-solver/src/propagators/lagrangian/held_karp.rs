use log::debug;

use super::spanning_tree::kruskal;
use super::spanning_tree::RootedForest;
use super::spanning_tree::WeightedArc;
use super::CutGenerator;
use super::HeldKarpOptions;
use super::RelaxationKind;
use crate::basic_types::ConfigurationError;
use crate::basic_types::ContradictionReason;
use crate::basic_types::CostMatrix;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::domain_events::DomainEvents;
use crate::engine::variables::Arc;
use crate::engine::variables::DomainRef;
use crate::engine::variables::GraphId;
use crate::engine::variables::GraphKind;
use crate::engine::variables::IntegerId;
use crate::engine::GraphView;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::HamiltonianShape;
use crate::propagators::StronglyConnectedComponents;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Margin by which a relaxation has to exceed the upper bound before anything is filtered.
const TOLERANCE: f64 = 0.001;
/// The smallest increase of the bound which counts as an improvement.
const MIN_IMPROVEMENT: f64 = 0.01;
/// Upper bounds beyond this value are treated as absent.
const UNBOUNDED: f64 = 1e15;

create_statistics_struct!(HeldKarpStatistics {
    calls: u64,
    subgradient_iterations: u64,
    arcs_removed: u64,
    arcs_enforced: u64,
    cut_bounds_used: u64,
    reduced_graph_fallbacks: u64,
});

/// The constructor of the [`HeldKarpPropagator`].
#[derive(Debug)]
pub struct HeldKarpArgs {
    pub graph: GraphId,
    pub shape: HamiltonianShape,
    pub costs: CostMatrix,
    pub objective: IntegerId,
    pub options: HeldKarpOptions,
    pub cut_generator: Option<Box<dyn CutGenerator>>,
}

impl PropagatorConstructor for HeldKarpArgs {
    type PropagatorImpl = HeldKarpPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError> {
        context.check_graph(self.graph)?;
        context.check_integer(self.objective)?;
        let graph = context.graph(self.graph);
        let num_nodes = graph.num_nodes();
        let kind = graph.kind();

        self.shape.validate(num_nodes)?;
        self.costs.check_dimension(num_nodes)?;
        if kind == GraphKind::Undirected {
            self.costs.check_symmetric()?;
            if self.shape == HamiltonianShape::Circuit && num_nodes < 3 {
                return Err(ConfigurationError::Unsupported(
                    "an undirected circuit needs at least three nodes",
                ));
            }
        }
        if self.options.relaxation == RelaxationKind::ReducedGraph
            && (kind == GraphKind::Undirected || !self.shape.is_path())
        {
            return Err(ConfigurationError::Unsupported(
                "the reduced graph relaxation requires a directed path",
            ));
        }

        context.register(DomainRef::Graph(self.graph), DomainEvents::ARCS);
        context.register(DomainRef::Integer(self.objective), DomainEvents::UPPER_BOUND);

        Ok(HeldKarpPropagator {
            graph: self.graph,
            shape: self.shape,
            kind,
            costs: self.costs,
            objective: self.objective,
            options: self.options,
            cut_generator: self.cut_generator,
            multipliers: Multipliers::new(num_nodes),
            best_multipliers: Multipliers::new(num_nodes),
            tree_arcs: vec![],
            best_bound: None,
            statistics: HeldKarpStatistics::default(),
        })
    }
}

/// The Lagrangian multipliers of the degree constraints.
///
/// Directed graphs dualise the in-degree and out-degree of every node separately; undirected
/// graphs only use `outgoing`, which then holds the multiplier of the degree of a node.
#[derive(Debug, Clone, PartialEq)]
struct Multipliers {
    outgoing: Vec<f64>,
    incoming: Vec<f64>,
}

impl Multipliers {
    fn new(num_nodes: usize) -> Multipliers {
        Multipliers {
            outgoing: vec![0.0; num_nodes],
            incoming: vec![0.0; num_nodes],
        }
    }
}

/// How an arc takes part in the relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArcClass {
    /// Part of the spanning tree (over all nodes but the root of a 1-tree).
    Tree,
    /// Incident to the root of an undirected 1-tree.
    RootEdge,
    /// Leaving the root of a directed 1-tree.
    RootOut,
    /// Entering the root of a directed 1-tree.
    RootIn,
    /// Connecting the component at the given position to the next one.
    Door(usize),
    /// Connecting non-consecutive components; never part of a solution.
    Skip,
}

/// One evaluation of the relaxation for fixed multipliers.
#[derive(Debug, Clone)]
struct Relaxation {
    candidates: Vec<WeightedArc>,
    class: Vec<ArcClass>,
    chosen: Vec<bool>,
    forest: RootedForest,
    weight: f64,
    offset: f64,
    out_degree: Vec<usize>,
    in_degree: Vec<usize>,
}

impl Relaxation {
    fn bound(&self) -> f64 {
        self.weight - self.offset
    }

    fn chosen_arcs(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.candidates.len()).filter(|&index| self.chosen[index])
    }

    /// The chosen arcs which an arc of the given class would replace.
    fn counterparts(&self, class: ArcClass) -> impl Iterator<Item = usize> + '_ {
        self.chosen_arcs()
            .filter(move |&index| class != ArcClass::Tree && self.class[index] == class)
    }

    /// The weight of the relaxation when the non-chosen candidate `index` is forced in.
    fn forced_weight(&self, index: usize) -> Option<f64> {
        let candidate = &self.candidates[index];
        let replaced = match self.class[index] {
            ArcClass::Skip => return None,
            ArcClass::Tree => self
                .forest
                .path(candidate.arc.from, candidate.arc.to)?
                .into_iter()
                .map(|on_path| self.candidates[on_path].weight)
                .max_by(f64::total_cmp)?,
            class => self
                .counterparts(class)
                .map(|chosen| self.candidates[chosen].weight)
                .max_by(f64::total_cmp)?,
        };
        Some(self.weight - replaced + candidate.weight)
    }

    /// The cheapest weight by which every chosen arc can be replaced, if it can be replaced.
    fn replacement_weights(&self, graph: GraphView) -> Vec<Option<f64>> {
        let mut replacements = vec![None; self.candidates.len()];
        let mut offer = |chosen: usize, weight: f64| {
            let current: &mut Option<f64> = &mut replacements[chosen];
            if current.map_or(true, |current| weight < current) {
                *current = Some(weight);
            }
        };

        for index in 0..self.candidates.len() {
            let candidate = &self.candidates[index];
            if self.chosen[index] || !graph.is_arc_in_envelope(candidate.arc.from, candidate.arc.to)
            {
                continue;
            }
            match self.class[index] {
                ArcClass::Skip => {}
                ArcClass::Tree => {
                    for on_path in self
                        .forest
                        .path(candidate.arc.from, candidate.arc.to)
                        .unwrap_or_default()
                    {
                        offer(on_path, candidate.weight);
                    }
                }
                class => {
                    for chosen in self.counterparts(class) {
                        offer(chosen, candidate.weight);
                    }
                }
            }
        }
        replacements
    }
}

/// Held-Karp bound for Hamiltonian circuits and paths with a cost on every arc.
///
/// The degree constraints are dualised with one multiplier per node (one per node and direction
/// for directed graphs), after which the cheapest 1-tree (circuits) or spanning tree (paths) is
/// a lower bound on the cost of every Hamiltonian structure. The multipliers are improved by
/// subgradient ascent and kept between calls.
///
/// With respect to the best relaxation found, an arc is removed when forcing it into the tree
/// exceeds the upper bound of the objective, and a tree arc is enforced when every replacement
/// exceeds it. Both checks use a strict comparison.
///
/// # Bibliography
/// \[1\] M. Held and R. M. Karp, ‘The traveling-salesman problem and minimum spanning trees’,
/// Operations Research, vol. 18, no. 6, pp. 1138–1162, 1970.
///
/// \[2\] J.-G. Fages and X. Lorca, ‘Improving the asymmetric TSP by considering graph
/// structure’, arXiv:1206.3437, 2012.
#[derive(Debug)]
pub struct HeldKarpPropagator {
    graph: GraphId,
    shape: HamiltonianShape,
    kind: GraphKind,
    costs: CostMatrix,
    objective: IntegerId,
    options: HeldKarpOptions,
    cut_generator: Option<Box<dyn CutGenerator>>,
    multipliers: Multipliers,
    best_multipliers: Multipliers,
    /// The arcs of the relaxation computed with the best multipliers in the latest call.
    tree_arcs: Vec<Arc>,
    best_bound: Option<f64>,
    statistics: HeldKarpStatistics,
}

impl HeldKarpPropagator {
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// The bound obtained in the latest call, if the propagator has run.
    pub fn bound(&self) -> Option<f64> {
        self.best_bound
    }

    /// The Lagrangian cost of an arc under the best multipliers.
    pub fn reduced_cost(&self, arc: Arc) -> f64 {
        Self::weight(&self.costs, self.kind, &self.best_multipliers, arc)
    }

    /// Whether the arc was part of the best relaxation in the latest call.
    pub fn is_tree_arc(&self, arc: Arc) -> bool {
        self.tree_arcs.contains(&arc.normalised(self.kind))
    }

    pub fn tree_arcs(&self) -> &[Arc] {
        &self.tree_arcs
    }

    fn weight(costs: &CostMatrix, kind: GraphKind, multipliers: &Multipliers, arc: Arc) -> f64 {
        let cost = costs.cost(arc.from, arc.to) as f64;
        match kind {
            GraphKind::Directed => {
                cost + multipliers.outgoing[arc.from] + multipliers.incoming[arc.to]
            }
            GraphKind::Undirected => {
                cost + multipliers.outgoing[arc.from] + multipliers.outgoing[arc.to]
            }
        }
    }

    fn out_target(&self, node: usize) -> usize {
        match self.kind {
            GraphKind::Directed => self.shape.out_degree(node),
            GraphKind::Undirected => self.shape.degree(node),
        }
    }

    fn in_target(&self, node: usize) -> usize {
        match self.kind {
            GraphKind::Directed => self.shape.in_degree(node),
            GraphKind::Undirected => 0,
        }
    }

    /// Assigns every candidate to its role in the relaxation.
    fn classify(&mut self, graph: GraphView, candidates: &[WeightedArc]) -> Vec<ArcClass> {
        let (shape, kind) = (self.shape, self.kind);
        let root_class = |arc: Arc| match (shape, kind) {
            (HamiltonianShape::Circuit, GraphKind::Undirected) if arc.from == 0 || arc.to == 0 => {
                Some(ArcClass::RootEdge)
            }
            (HamiltonianShape::Circuit, GraphKind::Directed) if arc.from == 0 => {
                Some(ArcClass::RootOut)
            }
            (HamiltonianShape::Circuit, GraphKind::Directed) if arc.to == 0 => {
                Some(ArcClass::RootIn)
            }
            _ => None,
        };

        if self.options.relaxation == RelaxationKind::ReducedGraph {
            if let Some(classes) = self.classify_by_components(graph, candidates) {
                return classes;
            }
            self.statistics.reduced_graph_fallbacks += 1;
        }

        candidates
            .iter()
            .map(|candidate| root_class(candidate.arc).unwrap_or(ArcClass::Tree))
            .collect()
    }

    /// Classifies the candidates according to the chain of strongly connected components, or
    /// returns `None` when the components do not form a chain from the source to the sink.
    fn classify_by_components(
        &self,
        graph: GraphView,
        candidates: &[WeightedArc],
    ) -> Option<Vec<ArcClass>> {
        let components = StronglyConnectedComponents::compute(graph);
        let num_components = components.num_components();
        let reduced_graph = components.reduced_graph(graph);

        let is_chain = (0..num_components.saturating_sub(1))
            .all(|component| reduced_graph[component].contains(&(component + 1)));
        let terminals_at_the_ends = match self.shape {
            HamiltonianShape::Path { source, sink } => {
                components.component_of(source) == 0
                    && components.component_of(sink) + 1 == num_components
            }
            HamiltonianShape::Circuit => false,
        };
        if !is_chain || !terminals_at_the_ends {
            return None;
        }

        Some(
            candidates
                .iter()
                .map(|candidate| {
                    let from = components.component_of(candidate.arc.from);
                    let to = components.component_of(candidate.arc.to);
                    if from == to {
                        ArcClass::Tree
                    } else if to == from + 1 {
                        ArcClass::Door(from)
                    } else {
                        ArcClass::Skip
                    }
                })
                .collect(),
        )
    }

    /// Computes the cheapest relaxation for the current multipliers.
    fn relax(&mut self, graph: GraphView) -> Result<Relaxation, ContradictionReason> {
        let num_nodes = graph.num_nodes();
        let candidates = graph
            .envelope_arcs()
            .map(|arc| WeightedArc {
                arc,
                weight: Self::weight(&self.costs, self.kind, &self.multipliers, arc),
                mandatory: graph.is_arc_in_kernel(arc.from, arc.to),
            })
            .collect::<Vec<_>>();
        let class = self.classify(graph, &candidates);

        let mut chosen = vec![false; candidates.len()];
        let tree = kruskal(num_nodes, &candidates, |index| class[index] == ArcClass::Tree);
        for &index in &tree {
            chosen[index] = true;
        }

        let num_pieces = match self.shape {
            // The root is an isolated node of the spanning tree of a 1-tree.
            HamiltonianShape::Circuit => 2,
            HamiltonianShape::Path { .. } => class
                .iter()
                .filter_map(|class| match class {
                    ArcClass::Door(position) => Some(position + 2),
                    _ => None,
                })
                .max()
                .unwrap_or(1),
        };
        if tree.len() + num_pieces != num_nodes {
            return Err(ContradictionReason::Disconnected);
        }

        // The arcs connecting the root of a 1-tree and the door arcs are chosen greedily per class.
        let quota = |class: ArcClass| match class {
            ArcClass::RootEdge => 2,
            ArcClass::RootOut | ArcClass::RootIn | ArcClass::Door(_) => 1,
            ArcClass::Tree | ArcClass::Skip => 0,
        };
        let mut greedy = (0..candidates.len())
            .filter(|&index| quota(class[index]) > 0)
            .collect::<Vec<_>>();
        greedy.sort_by(|&first, &second| candidates[first].preference(&candidates[second]));
        let mut used = vec![];
        for index in greedy {
            let taken = used.iter().filter(|&&(other, _)| other == class[index]).count();
            if taken < quota(class[index]) {
                used.push((class[index], index));
                chosen[index] = true;
            }
        }
        let required_classes = match (self.shape, self.kind) {
            (HamiltonianShape::Circuit, GraphKind::Undirected) => vec![(ArcClass::RootEdge, 2)],
            (HamiltonianShape::Circuit, GraphKind::Directed) => {
                vec![(ArcClass::RootOut, 1), (ArcClass::RootIn, 1)]
            }
            (HamiltonianShape::Path { .. }, _) => (0..num_pieces - 1)
                .map(|position| (ArcClass::Door(position), 1))
                .collect(),
        };
        for (required, count) in required_classes {
            if used.iter().filter(|&&(class, _)| class == required).count() < count {
                return Err(ContradictionReason::DegreeUnreachable);
            }
        }

        let forest = RootedForest::new(
            num_nodes,
            (0..candidates.len())
                .filter(|&index| {
                    chosen[index] && matches!(class[index], ArcClass::Tree | ArcClass::Door(_))
                })
                .map(|index| (index, candidates[index].arc)),
        );

        let mut out_degree = vec![0; num_nodes];
        let mut in_degree = vec![0; num_nodes];
        let mut weight = 0.0;
        for index in (0..candidates.len()).filter(|&index| chosen[index]) {
            let arc = candidates[index].arc;
            weight += candidates[index].weight;
            out_degree[arc.from] += 1;
            match self.kind {
                GraphKind::Directed => in_degree[arc.to] += 1,
                GraphKind::Undirected => out_degree[arc.to] += 1,
            }
        }
        let offset = (0..num_nodes)
            .map(|node| {
                self.out_target(node) as f64 * self.multipliers.outgoing[node]
                    + self.in_target(node) as f64 * self.multipliers.incoming[node]
            })
            .sum();

        Ok(Relaxation {
            candidates,
            class,
            chosen,
            forest,
            weight,
            offset,
            out_degree,
            in_degree,
        })
    }

    /// Moves the multipliers along the subgradient; returns `false` when the ascent cannot
    /// continue, either because the relaxation satisfies every degree constraint or because the
    /// step is not a finite number.
    fn take_step(&mut self, relaxation: &Relaxation, alpha: f64, upper_bound: f64) -> bool {
        let num_nodes = relaxation.out_degree.len();
        let out_gradient = (0..num_nodes)
            .map(|node| relaxation.out_degree[node] as f64 - self.out_target(node) as f64)
            .collect::<Vec<_>>();
        let in_gradient = (0..num_nodes)
            .map(|node| match self.kind {
                GraphKind::Directed => {
                    relaxation.in_degree[node] as f64 - self.in_target(node) as f64
                }
                GraphKind::Undirected => 0.0,
            })
            .collect::<Vec<_>>();

        let norm = out_gradient
            .iter()
            .chain(&in_gradient)
            .map(|gradient| gradient * gradient)
            .sum::<f64>();
        if norm == 0.0 {
            return false;
        }

        let bound = relaxation.bound();
        let mut target = if upper_bound >= UNBOUNDED {
            bound + bound.abs() + 1.0
        } else {
            upper_bound
        };
        if target < bound {
            target = bound + 0.1;
        }
        let step = alpha * (target - bound) / norm;
        if !step.is_finite() {
            return false;
        }

        for node in 0..num_nodes {
            self.multipliers.outgoing[node] += step * out_gradient[node];
            self.multipliers.incoming[node] += step * in_gradient[node];
        }
        true
    }

    fn update_lower_bound(
        &mut self,
        context: &mut PropagationContext,
        bound: f64,
    ) -> PropagationStatus {
        let lower_bound = if bound - bound.floor() < TOLERANCE {
            bound.floor()
        } else {
            bound.ceil()
        } as i64;

        if lower_bound > context.upper_bound(self.objective) {
            return Err(ContradictionReason::BoundExceeded.into());
        }
        if context.tighten_lower_bound(self.objective, lower_bound)? {
            debug!("held-karp raises the lower bound of the objective to {lower_bound}");
        }
        Ok(())
    }

    fn filter(
        &mut self,
        context: &mut PropagationContext,
        relaxation: &Relaxation,
    ) -> PropagationStatus {
        let threshold =
            context.upper_bound(self.objective) as f64 + relaxation.offset + TOLERANCE;

        let removable = (0..relaxation.candidates.len())
            .filter(|&index| !relaxation.chosen[index] && !relaxation.candidates[index].mandatory)
            .filter(|&index| {
                relaxation
                    .forced_weight(index)
                    .is_some_and(|forced| forced > threshold)
            })
            .map(|index| relaxation.candidates[index].arc)
            .collect::<Vec<_>>();
        for arc in removable {
            if context.remove_arc(self.graph, arc)? {
                self.statistics.arcs_removed += 1;
            }
        }

        let replacements = relaxation.replacement_weights(context.graph(self.graph));
        let mandatory = relaxation
            .chosen_arcs()
            .filter(|&index| !relaxation.candidates[index].mandatory)
            .filter(|&index| {
                replacements[index].map_or(true, |replacement| {
                    relaxation.weight - relaxation.candidates[index].weight + replacement
                        > threshold
                })
            })
            .map(|index| relaxation.candidates[index].arc)
            .collect::<Vec<_>>();
        for arc in mandatory {
            if context.enforce_arc(self.graph, arc)? {
                self.statistics.arcs_enforced += 1;
            }
        }

        Ok(())
    }
}

impl Propagator for HeldKarpPropagator {
    fn name(&self) -> &str {
        "HeldKarp"
    }

    fn wait_first_solution(&self) -> bool {
        self.options.wait_first_solution
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.statistics.calls += 1;

        if let Some(generator) = self.cut_generator.as_mut() {
            if let Some(bound) =
                generator.lower_bound(context.graph(self.graph), &self.costs, self.shape)
            {
                self.statistics.cut_bounds_used += 1;
                self.update_lower_bound(&mut context, bound as f64)?;
            }
        }

        let num_nodes = context.graph(self.graph).num_nodes();
        let iterations = self.options.iterations_per_round(self.kind, num_nodes);
        let mut alpha = self.options.alpha;
        let mut beta = self.options.beta;
        let mut remaining_failures = self.options.max_non_improving_rounds;

        let relaxation = self.relax(context.graph(self.graph))?;
        let mut best = relaxation.bound();
        self.best_multipliers = self.multipliers.clone();
        self.update_lower_bound(&mut context, best)?;
        self.filter(&mut context, &relaxation)?;

        'rounds: for _ in 0..self.options.max_rounds {
            let mut improved = false;

            for _ in 0..iterations {
                self.statistics.subgradient_iterations += 1;
                let relaxation = self.relax(context.graph(self.graph))?;
                let bound = relaxation.bound();
                if bound > best + MIN_IMPROVEMENT {
                    best = bound;
                    self.best_multipliers = self.multipliers.clone();
                    improved = true;
                }
                self.update_lower_bound(&mut context, bound)?;

                let upper_bound = context.upper_bound(self.objective) as f64;
                if !self.take_step(&relaxation, alpha, upper_bound) {
                    break 'rounds;
                }
            }

            let relaxation = self.relax(context.graph(self.graph))?;
            let bound = relaxation.bound();
            if bound > best + MIN_IMPROVEMENT {
                best = bound;
                self.best_multipliers = self.multipliers.clone();
                improved = true;
            }
            self.update_lower_bound(&mut context, bound)?;
            self.filter(&mut context, &relaxation)?;

            let upper_bound = context.upper_bound(self.objective) as f64;
            if !self.take_step(&relaxation, alpha, upper_bound) {
                break;
            }
            if !improved {
                remaining_failures = remaining_failures.saturating_sub(1);
                if remaining_failures == 0 {
                    break;
                }
            }
            alpha *= beta;
            beta /= 2.0;
        }

        // The ascent continues from the best multipliers in the next call.
        self.multipliers = self.best_multipliers.clone();
        let relaxation = self.relax(context.graph(self.graph))?;
        self.update_lower_bound(&mut context, relaxation.bound())?;
        self.filter(&mut context, &relaxation)?;

        self.best_bound = Some(relaxation.bound().max(best));
        self.tree_arcs = relaxation
            .chosen_arcs()
            .map(|index| relaxation.candidates[index].arc)
            .collect();

        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
