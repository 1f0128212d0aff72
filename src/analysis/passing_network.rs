//! Passing networks: where each player was involved in completed passes and
//! which pairs combined most often.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::events::models::{event_type, MatchEvent, THROW_IN};
use crate::events::view::EventLogView;
use crate::geometry::Position;

/// Largest node size, given to the team's most frequent passer.
pub const NODE_SIZE_SCALE: f64 = 1500.0;
/// Widest edge, given to the team's most frequent pair.
pub const EDGE_WIDTH_SCALE: f64 = 10.0;
/// Pairs with this many passes or fewer are pruned.
pub const MIN_PAIR_PASSES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowFallback {
    /// Use every completed pass of the team.
    #[default]
    FullMatch,
    /// Fail with `NotFound`.
    Reject,
}

/// The slice of the match a network was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassWindow {
    /// Passes strictly before the team's first substitution.
    UntilFirstSubstitution { sequence_index: u32 },
    /// The team never substituted.
    FullMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerNode {
    pub player: String,
    /// Mean of pass origins as passer and pass ends as receiver.
    pub position: Position,
    pub passes: u32,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassEdge {
    pub pair_key: String,
    pub players: (String, String),
    pub pass_count: u32,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassingNetwork {
    pub team: String,
    pub window: PassWindow,
    pub nodes: Vec<PlayerNode>,
    pub edges: Vec<PassEdge>,
}

impl PassingNetwork {
    pub fn node(&self, player: &str) -> Option<&PlayerNode> {
        self.nodes.iter().find(|n| n.player == player)
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&PassEdge> {
        let key = pair_key(a, b);
        self.edges.iter().find(|e| e.pair_key == key)
    }
}

/// Last whitespace-separated token of a player's name.
pub fn surname(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or(name)
}

/// Order-independent key for a pair of players.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}_{}", a, b)
    } else {
        format!("{}_{}", b, a)
    }
}

#[derive(Default)]
struct NodeAccumulator {
    sum_x: f64,
    sum_y: f64,
    touches: u32,
    passes: u32,
}

impl NodeAccumulator {
    fn add(&mut self, p: Position) {
        self.sum_x += p.x;
        self.sum_y += p.y;
        self.touches += 1;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassingNetworkBuilder {
    fallback: WindowFallback,
}

impl PassingNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// What to do when a team has no substitution.
    pub fn fallback(mut self, fallback: WindowFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Networks for both sides, in first-appearance order.
    pub fn build_all(&self, view: &EventLogView) -> Result<[PassingNetwork; 2]> {
        let [home, away] = view.two_teams()?;
        Ok([self.build(view, home)?, self.build(view, away)?])
    }

    pub fn build(&self, view: &EventLogView, team: &str) -> Result<PassingNetwork> {
        let window = self.window(view, team)?;

        let mut selection = view
            .select()
            .of_type(event_type::PASS)
            .for_team(team)
            .without_outcome()
            .excluding_sub_type(THROW_IN);
        if let PassWindow::UntilFirstSubstitution { sequence_index } = window {
            selection = selection.before(sequence_index);
        }
        let passes: Vec<&MatchEvent> = selection.iter().collect();

        let (nodes, pair_counts) = accumulate(&passes)?;
        let nodes = finish_nodes(nodes);
        let edges = finish_edges(pair_counts);

        debug!(
            "Passing network for {}: {} passes, {} players, {} links ({:?})",
            team,
            passes.len(),
            nodes.len(),
            edges.len(),
            window
        );

        Ok(PassingNetwork {
            team: team.to_string(),
            window,
            nodes,
            edges,
        })
    }

    fn window(&self, view: &EventLogView, team: &str) -> Result<PassWindow> {
        match view.first_substitution(team) {
            Ok(sub) => Ok(PassWindow::UntilFirstSubstitution {
                sequence_index: sub.sequence_index,
            }),
            Err(AnalyticsError::NotFound(msg)) => match self.fallback {
                WindowFallback::FullMatch => {
                    debug!("{}; using the full match", msg);
                    Ok(PassWindow::FullMatch)
                }
                WindowFallback::Reject => Err(AnalyticsError::NotFound(msg)),
            },
            Err(e) => Err(e),
        }
    }
}

type Accumulated<'a> = (Vec<(&'a str, NodeAccumulator)>, BTreeMap<String, (String, String, u32)>);

fn accumulate<'a>(passes: &[&'a MatchEvent]) -> Result<Accumulated<'a>> {
    // Insertion order is first involvement.
    let mut nodes: Vec<(&'a str, NodeAccumulator)> = Vec::new();
    let mut pairs: BTreeMap<String, (String, String, u32)> = BTreeMap::new();

    fn slot<'a, 'n>(
        nodes: &'n mut Vec<(&'a str, NodeAccumulator)>,
        name: &'a str,
    ) -> &'n mut NodeAccumulator {
        let idx = match nodes.iter().position(|(n, _)| *n == name) {
            Some(i) => i,
            None => {
                nodes.push((name, NodeAccumulator::default()));
                nodes.len() - 1
            }
        };
        &mut nodes[idx].1
    }

    for &pass in passes {
        let passer = pass.player_name.as_deref().map(surname).ok_or_else(|| {
            AnalyticsError::config(format!("pass {} has no passer", pass.sequence_index))
        })?;
        let origin = pass.location.ok_or_else(|| {
            AnalyticsError::config(format!("pass {} has no location", pass.sequence_index))
        })?;

        let entry = slot(&mut nodes, passer);
        entry.add(origin);
        entry.passes += 1;

        // Completed passes with no recorded receiver still count for the passer.
        let Some(receiver) = pass.pass_recipient_name.as_deref().map(surname) else {
            continue;
        };
        let end = pass.end_location.ok_or_else(|| {
            AnalyticsError::config(format!("pass {} has no end location", pass.sequence_index))
        })?;
        slot(&mut nodes, receiver).add(end);

        let key = pair_key(passer, receiver);
        let (a, b) = if passer <= receiver {
            (passer, receiver)
        } else {
            (receiver, passer)
        };
        pairs
            .entry(key)
            .or_insert_with(|| (a.to_string(), b.to_string(), 0))
            .2 += 1;
    }

    Ok((nodes, pairs))
}

fn finish_nodes(nodes: Vec<(&str, NodeAccumulator)>) -> Vec<PlayerNode> {
    let max_passes = nodes.iter().map(|(_, n)| n.passes).max().unwrap_or(0);
    nodes
        .into_iter()
        .map(|(name, acc)| {
            let touches = acc.touches.max(1) as f64;
            PlayerNode {
                player: name.to_string(),
                position: Position::new(acc.sum_x / touches, acc.sum_y / touches),
                passes: acc.passes,
                size: if max_passes == 0 {
                    0.0
                } else {
                    acc.passes as f64 / max_passes as f64 * NODE_SIZE_SCALE
                },
            }
        })
        .collect()
}

fn finish_edges(pairs: BTreeMap<String, (String, String, u32)>) -> Vec<PassEdge> {
    let kept: Vec<(String, (String, String, u32))> = pairs
        .into_iter()
        .filter(|(_, (_, _, count))| *count > MIN_PAIR_PASSES)
        .collect();
    let max_count = kept.iter().map(|(_, (_, _, c))| *c).max().unwrap_or(0);
    kept.into_iter()
        .map(|(pair_key, (a, b, pass_count))| PassEdge {
            pair_key,
            players: (a, b),
            pass_count,
            width: pass_count as f64 / max_count as f64 * EDGE_WIDTH_SCALE,
        })
        .collect()
}
