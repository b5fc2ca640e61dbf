use crate::basic_types::ConfigurationError;
use crate::basic_types::ContradictionReason;
use crate::basic_types::CostMatrix;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::domain_events::DomainEvents;
use crate::engine::variables::DomainRef;
use crate::engine::variables::GraphId;
use crate::engine::variables::GraphKind;
use crate::engine::variables::IntegerId;
use crate::engine::GraphView;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::HamiltonianShape;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(ArcCostStatistics {
    arcs_removed: u64,
    objective_tightenings: u64,
});

/// The constructor of the [`ArcCostPropagator`].
#[derive(Debug, Clone)]
pub struct ArcCostArgs {
    pub graph: GraphId,
    pub shape: HamiltonianShape,
    pub costs: CostMatrix,
    pub objective: IntegerId,
}

impl PropagatorConstructor for ArcCostArgs {
    type PropagatorImpl = ArcCostPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ConfigurationError> {
        context.check_graph(self.graph)?;
        context.check_integer(self.objective)?;
        let graph = context.graph(self.graph);
        self.shape.validate(graph.num_nodes())?;
        self.costs.check_dimension(graph.num_nodes())?;
        if graph.kind() == GraphKind::Undirected {
            self.costs.check_symmetric()?;
        }

        context.register(DomainRef::Graph(self.graph), DomainEvents::ARCS);
        context.register(DomainRef::Integer(self.objective), DomainEvents::UPPER_BOUND);

        Ok(ArcCostPropagator {
            graph: self.graph,
            shape: self.shape,
            costs: self.costs,
            objective: self.objective,
            statistics: ArcCostStatistics::default(),
        })
    }
}

/// The cheapest and most expensive way in which a node can meet its degree requirement on one
/// side, given the current domain.
#[derive(Debug, Clone, Copy)]
struct Contribution {
    cheapest: i64,
    most_expensive: i64,
    /// The most expensive optional arc used by `cheapest`; `None` when the kernel arcs already
    /// meet the requirement.
    costliest_optional: Option<i64>,
}

impl Contribution {
    /// The cheapest contribution of the node when `cost` has to be part of it.
    fn forced(&self, cost: i64) -> Option<i64> {
        self.costliest_optional
            .map(|costliest| self.cheapest + (cost - costliest).max(0))
    }
}

/// Links an integer objective to the total cost of the arcs in a Hamiltonian structure.
///
/// Every node has to be left (and entered) through as many arcs as its degree requires, so the
/// cheapest admissible arcs of each node give a lower bound on the objective and the most
/// expensive ones an upper bound. An optional arc is removed when every structure using it would
/// exceed the upper bound of the objective. Once the graph is instantiated both bounds meet and
/// the objective is fixed.
#[derive(Debug, Clone)]
pub struct ArcCostPropagator {
    graph: GraphId,
    shape: HamiltonianShape,
    costs: CostMatrix,
    objective: IntegerId,
    statistics: ArcCostStatistics,
}

impl ArcCostPropagator {
    /// Selects `required` arcs among the kernel arcs `kernel` and the optional arcs `optional`.
    fn contribution(
        required: usize,
        kernel: Vec<i64>,
        mut optional: Vec<i64>,
    ) -> Result<Contribution, Inconsistency> {
        if kernel.len() > required {
            return Err(ContradictionReason::DegreeExceeded.into());
        }
        let missing = required - kernel.len();
        if optional.len() < missing {
            return Err(ContradictionReason::DegreeUnreachable.into());
        }

        optional.sort_unstable();
        let kernel_cost = kernel.iter().sum::<i64>();
        let cheapest = kernel_cost + optional[..missing].iter().sum::<i64>();
        let most_expensive = kernel_cost + optional[optional.len() - missing..].iter().sum::<i64>();
        let costliest_optional = if missing == 0 {
            None
        } else {
            Some(optional[missing - 1])
        };

        Ok(Contribution {
            cheapest,
            most_expensive,
            costliest_optional,
        })
    }

    fn successor_contribution(
        &self,
        graph: GraphView,
        node: usize,
        required: usize,
    ) -> Result<Contribution, Inconsistency> {
        let (kernel, optional) = graph
            .envelope_successors(node)
            .partition::<Vec<_>, _>(|&to| graph.is_arc_in_kernel(node, to));
        Self::contribution(
            required,
            kernel.into_iter().map(|to| self.costs.cost(node, to)).collect(),
            optional.into_iter().map(|to| self.costs.cost(node, to)).collect(),
        )
    }

    fn predecessor_contribution(
        &self,
        graph: GraphView,
        node: usize,
        required: usize,
    ) -> Result<Contribution, Inconsistency> {
        let (kernel, optional) = graph
            .envelope_predecessors(node)
            .partition::<Vec<_>, _>(|&from| graph.is_arc_in_kernel(from, node));
        Self::contribution(
            required,
            kernel.into_iter().map(|from| self.costs.cost(from, node)).collect(),
            optional.into_iter().map(|from| self.costs.cost(from, node)).collect(),
        )
    }

    fn tighten_objective(
        &mut self,
        context: &mut PropagationContext,
        lower_bound: i64,
        upper_bound: i64,
    ) -> PropagationStatus {
        if context.tighten_lower_bound(self.objective, lower_bound)? {
            self.statistics.objective_tightenings += 1;
        }
        if context.tighten_upper_bound(self.objective, upper_bound)? {
            self.statistics.objective_tightenings += 1;
        }
        Ok(())
    }

    fn propagate_directed(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let num_nodes = graph.num_nodes();

        let mut successors = vec![None; num_nodes];
        let mut predecessors = vec![None; num_nodes];
        for node in 0..num_nodes {
            if self.shape.out_degree(node) > 0 {
                successors[node] = Some(self.successor_contribution(graph, node, 1)?);
            }
            if self.shape.in_degree(node) > 0 {
                predecessors[node] = Some(self.predecessor_contribution(graph, node, 1)?);
            }
        }

        let total = |contributions: &[Option<Contribution>], part: fn(&Contribution) -> i64| {
            contributions.iter().flatten().map(part).sum::<i64>()
        };
        let out_lower = total(&successors, |c| c.cheapest);
        let in_lower = total(&predecessors, |c| c.cheapest);
        let out_upper = total(&successors, |c| c.most_expensive);
        let in_upper = total(&predecessors, |c| c.most_expensive);

        self.tighten_objective(context, out_lower.max(in_lower), out_upper.min(in_upper))?;
        let upper_bound = context.upper_bound(self.objective);

        let graph = context.graph(self.graph);
        let removable = graph
            .envelope_arcs()
            .filter(|arc| !graph.is_arc_in_kernel(arc.from, arc.to))
            .filter(|arc| {
                let cost = self.costs.cost(arc.from, arc.to);
                let exceeds = |lower: i64, contribution: Option<Contribution>| {
                    contribution.is_some_and(|contribution| {
                        contribution.forced(cost).is_some_and(|forced| {
                            lower - contribution.cheapest + forced > upper_bound
                        })
                    })
                };
                exceeds(out_lower, successors[arc.from]) || exceeds(in_lower, predecessors[arc.to])
            })
            .collect::<Vec<_>>();

        for arc in removable {
            if context.remove_arc(self.graph, arc)? {
                self.statistics.arcs_removed += 1;
            }
        }
        Ok(())
    }

    fn propagate_undirected(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let graph = context.graph(self.graph);
        let num_nodes = graph.num_nodes();

        let contributions = (0..num_nodes)
            .map(|node| self.successor_contribution(graph, node, self.shape.degree(node)))
            .collect::<Result<Vec<_>, _>>()?;

        // Every edge is counted at both of its endpoints.
        let double_lower = contributions.iter().map(|c| c.cheapest).sum::<i64>();
        let double_upper = contributions.iter().map(|c| c.most_expensive).sum::<i64>();
        self.tighten_objective(
            context,
            halve_rounding_up(double_lower),
            double_upper.div_euclid(2),
        )?;
        let upper_bound = context.upper_bound(self.objective);

        let graph = context.graph(self.graph);
        let removable = graph
            .envelope_arcs()
            .filter(|arc| !graph.is_arc_in_kernel(arc.from, arc.to))
            .filter(|arc| {
                let cost = self.costs.cost(arc.from, arc.to);
                let (Some(forced_from), Some(forced_to)) = (
                    contributions[arc.from].forced(cost),
                    contributions[arc.to].forced(cost),
                ) else {
                    return false;
                };
                let double_forced = double_lower - contributions[arc.from].cheapest
                    - contributions[arc.to].cheapest
                    + forced_from
                    + forced_to;
                halve_rounding_up(double_forced) > upper_bound
            })
            .collect::<Vec<_>>();

        for arc in removable {
            if context.remove_arc(self.graph, arc)? {
                self.statistics.arcs_removed += 1;
            }
        }
        Ok(())
    }
}

fn halve_rounding_up(value: i64) -> i64 {
    (value + 1).div_euclid(2)
}

impl Propagator for ArcCostPropagator {
    fn name(&self) -> &str {
        "ArcCost"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if context.graph(self.graph).is_directed() {
            self.propagate_directed(&mut context)
        } else {
            self.propagate_undirected(&mut context)
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
