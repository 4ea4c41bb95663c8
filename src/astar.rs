//! A* over any hashable node type, written in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! but with an explicit, reusable [SearchContext] holding the per-search bookkeeping and a
//! deterministic first-found tie-break between frontier nodes of equal priority.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::warn;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Clone, Copy)]
struct SmallestCostHolder {
    estimated_cost: f64,
    sequence: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first; among equals the node that entered the frontier first.
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Search bookkeeping of one node: `g`, `h`, `f = g + h` and the predecessor on the best route
/// found so far. Absent entries read as `g = +inf` with no predecessor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scratch<C> {
    pub g: C,
    pub h: f64,
    pub f: f64,
    pub came_from: Option<usize>,
    /// Insertion sequence number while the node is in the open set.
    open: Option<usize>,
}

/// Owns the frontier and the scratch map so their allocations survive between searches.
#[derive(Clone, Debug)]
pub(crate) struct SearchContext<N, C> {
    to_see: BinaryHeap<SmallestCostHolder>,
    scratch: FxIndexMap<N, Scratch<C>>,
    sequence: usize,
    expansions: usize,
}

impl core::fmt::Debug for SmallestCostHolder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, #{}, @{})", self.estimated_cost, self.sequence, self.index)
    }
}

impl<N, C> Default for SearchContext<N, C> {
    fn default() -> Self {
        SearchContext {
            to_see: BinaryHeap::new(),
            scratch: FxIndexMap::default(),
            sequence: 0,
            expansions: 0,
        }
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    f64: From<C>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything the previous search learned; every node reads as unvisited again.
    pub fn reset(&mut self) {
        self.to_see.clear();
        self.scratch.clear();
        self.sequence = 0;
        self.expansions = 0;
    }

    /// Number of nodes expanded by the last search.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Bookkeeping left behind by the last search for a node, if it was ever reached.
    pub fn scratch(&self, node: &N) -> Option<&Scratch<C>> {
        self.scratch.get(node)
    }

    fn next_sequence(&mut self) -> usize {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }

    fn reverse_path(&self, goal: usize) -> Vec<N> {
        let mut path: Vec<N> = std::iter::successors(Some(goal), |&i| {
            self.scratch.get_index(i).and_then(|(_, s)| s.came_from)
        })
        .filter_map(|i| self.scratch.get_index(i).map(|(node, _)| node.clone()))
        .collect();
        path.reverse();
        path
    }

    /// Runs A* from `start` until `success` accepts a node, returning the route to it and its
    /// cost. `successors` yields each neighbour together with the cost of moving there. Gives up
    /// with [None] when the frontier runs dry or after `max_expansions` expanded nodes.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
        max_expansions: Option<usize>,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> f64,
        FS: FnMut(&N) -> bool,
    {
        self.reset();
        let h = heuristic(start);
        let sequence = self.next_sequence();
        self.scratch.insert(
            start.clone(),
            Scratch {
                g: C::zero(),
                h,
                f: f64::from(C::zero()) + h,
                came_from: None,
                open: Some(sequence),
            },
        );
        self.to_see.push(SmallestCostHolder {
            estimated_cost: f64::from(C::zero()) + h,
            sequence,
            index: 0,
        });
        while let Some(SmallestCostHolder {
            sequence, index, ..
        }) = self.to_see.pop()
        {
            let (node, cost) = {
                let Some((node, entry)) = self.scratch.get_index_mut(index) else {
                    continue;
                };
                // A node that was improved while waiting is pushed again under its original
                // sequence number; whichever copy comes out first closes it and the rest are
                // skipped here.
                if entry.open != Some(sequence) {
                    continue;
                }
                entry.open = None;
                (node.clone(), entry.g)
            };
            if success(&node) {
                return Some((self.reverse_path(index), cost));
            }
            if max_expansions.is_some_and(|max| self.expansions >= max) {
                warn!(
                    "Search abandoned after {} expansions without reaching the goal",
                    self.expansions
                );
                return None;
            }
            self.expansions += 1;
            for (successor, move_cost) in successors(&node) {
                let new_cost = cost + move_cost;
                let n; // index for successor
                let f; // estimated cost through successor
                let s; // frontier sequence number of successor
                match self.scratch.entry(successor) {
                    Vacant(e) => {
                        let h = heuristic(e.key());
                        n = e.index();
                        f = f64::from(new_cost) + h;
                        s = self.sequence;
                        self.sequence += 1;
                        e.insert(Scratch {
                            g: new_cost,
                            h,
                            f,
                            came_from: Some(index),
                            open: Some(s),
                        });
                    }
                    Occupied(mut e) => {
                        if new_cost < e.get().g {
                            n = e.index();
                            let entry = e.get_mut();
                            entry.g = new_cost;
                            entry.f = f64::from(new_cost) + entry.h;
                            entry.came_from = Some(index);
                            f = entry.f;
                            s = match entry.open {
                                Some(s) => s,
                                None => {
                                    let s = self.sequence;
                                    self.sequence += 1;
                                    entry.open = Some(s);
                                    s
                                }
                            };
                        } else {
                            continue;
                        }
                    }
                }
                self.to_see.push(SmallestCostHolder {
                    estimated_cost: f,
                    sequence: s,
                    index: n,
                });
            }
        }
        None
    }
}
