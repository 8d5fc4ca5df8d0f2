//! Headless "prevent frozen members" group simulation.
//!
//! A group of members drifts through the topic set one topic at a time.
//! Each member's interest in the current topic is the dot product of their
//! latent profile and the topic vector, scaled by `max_interest`; their
//! velocity follows from the interest. Members who lag the group velocity
//! by more than `recovery_threshold` are at risk, and members whose interest
//! sinks below `left_out_threshold` leave.
//!
//! While anyone is at risk the group is steered min-max: among neighbouring
//! topics on which every at-risk member would recover, pick the one whose
//! least interested member is most interested. With no such topic the group
//! halts.

use std::fmt;

use rand::Rng;
use tracing::{debug, warn};

use topicvec_core::config::GroupConfig;
use topicvec_core::types::TopicRecord;
use topicvec_core::vector::{check_dim, dot, normalize};
use topicvec_core::{Error, Result};

use crate::profile::uniform;
use crate::similarity::score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberState {
    Active,
    AtRisk,
    LeftOut,
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::AtRisk => f.write_str("at risk"),
            Self::LeftOut => f.write_str("left out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: usize,
    pub latent: Vec<f64>,
    pub interest: f64,
    pub velocity: f64,
    pub state: MemberState,
}

impl Member {
    pub fn new(id: usize, latent: Vec<f64>) -> Self {
        Self { id, latent, interest: 0.0, velocity: 0.0, state: MemberState::Active }
    }

    /// A unit-length latent profile dominated by one random dimension.
    pub fn random<R: Rng + ?Sized>(id: usize, dimension: usize, cfg: &GroupConfig, rng: &mut R) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidConfig("member profile needs at least one dimension".to_string()));
        }
        let primary = rng.gen_range(0..dimension);
        let raw: Vec<f64> = (0..dimension)
            .map(|k| if k == primary { uniform(rng, cfg.primary) } else { uniform(rng, cfg.residual) })
            .collect();
        Ok(Self::new(id, normalize(&raw, &format!("member {}", id))?))
    }

    pub fn interest_in(&self, topic: &[f64], max_interest: f64) -> Result<f64> {
        Ok(dot(&self.latent, topic)? * max_interest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    NoNeighbors,
    NoViableTopic,
    TooFewActive,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNeighbors => f.write_str("no neighbouring topics"),
            Self::NoViableTopic => f.write_str("no topic recovers every at-risk member"),
            Self::TooFewActive => f.write_str("too few members left"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// Nobody is at risk.
    Stay,
    SteerTo { topic: usize, min_interest: f64 },
    Halt(HaltReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: usize,
    /// Topic the round was spent on.
    pub topic: usize,
    pub group_velocity: f64,
    pub active: usize,
    pub at_risk: usize,
    pub left_out: usize,
    pub steering: Steering,
}

pub struct Group<'a> {
    topics: &'a [TopicRecord],
    members: Vec<Member>,
    current: usize,
    config: GroupConfig,
    halted: Option<HaltReason>,
    rounds: usize,
}

impl<'a> Group<'a> {
    pub fn new(topics: &'a [TopicRecord], members: Vec<Member>, start: usize, config: GroupConfig) -> Result<Self> {
        config.validate()?;
        let first = topics.get(start).ok_or_else(|| Error::malformed("group", format!("start topic {} out of range ({} topics)", start, topics.len())))?;
        let dim = first.vector.len();
        for t in topics {
            check_dim(dim, t.vector.len())?;
        }
        for m in &members {
            check_dim(dim, m.latent.len())?;
        }
        Ok(Self { topics, members, current: start, config, halted: None, rounds: 0 })
    }

    /// `config.group_size` random members starting on topic `start`.
    pub fn random<R: Rng + ?Sized>(topics: &'a [TopicRecord], start: usize, config: GroupConfig, rng: &mut R) -> Result<Self> {
        let dim = topics.first().map_or(0, |t| t.vector.len());
        let members = (0..config.group_size).map(|id| Member::random(id, dim, &config, rng)).collect::<Result<Vec<_>>>()?;
        Self::new(topics, members, start, config)
    }

    pub fn members(&self) -> &[Member] { &self.members }

    pub fn current(&self) -> usize { self.current }

    pub fn halted(&self) -> Option<HaltReason> { self.halted }

    fn count(&self, state: MemberState) -> usize {
        self.members.iter().filter(|m| m.state == state).count()
    }

    /// Recompute every member's interest and velocity on the current topic.
    pub fn update_interests(&mut self) -> Result<()> {
        let topic = &self.topics[self.current].vector;
        let (max_interest, max_velocity) = (self.config.max_interest, self.config.max_velocity);
        for m in &mut self.members {
            m.interest = m.interest_in(topic, max_interest)?;
            m.velocity = m.interest * max_velocity / max_interest;
        }
        Ok(())
    }

    /// Mean velocity of the members still in the group, 0 when none are.
    pub fn group_velocity(&self) -> f64 {
        let (sum, n) = self
            .members
            .iter()
            .filter(|m| m.state != MemberState::LeftOut)
            .fold((0.0, 0usize), |(sum, n), m| (sum + m.velocity, n + 1));
        if n == 0 { 0.0 } else { sum / n as f64 }
    }

    /// Apply the state transitions for the current interests. Leaving is
    /// permanent; the others move between active and at risk on the lag
    /// behind the group velocity.
    pub fn update_states(&mut self) {
        let left_out_threshold = self.config.left_out_threshold;
        for m in &mut self.members {
            if m.state != MemberState::LeftOut && m.interest < left_out_threshold {
                debug!(member = m.id, interest = m.interest, "member left out");
                m.state = MemberState::LeftOut;
            }
        }
        let v_group = self.group_velocity();
        let recovery = self.config.recovery_threshold;
        for m in &mut self.members {
            let lag = v_group - m.velocity;
            m.state = match m.state {
                MemberState::Active if lag > recovery => MemberState::AtRisk,
                MemberState::AtRisk if lag <= recovery => MemberState::Active,
                s => s,
            };
        }
    }

    /// Indices of the topics more similar than `threshold` to the current one.
    pub fn neighbor_topics(&self, threshold: f64) -> Result<Vec<usize>> {
        let current = &self.topics[self.current].vector;
        let mut out = Vec::new();
        for (i, t) in self.topics.iter().enumerate() {
            if i != self.current && score(current, &t.vector)? > threshold {
                out.push(i);
            }
        }
        Ok(out)
    }

    /// Choose the next topic for the at-risk members. Ties go to the lower
    /// topic index.
    pub fn min_max_steering(&self) -> Result<Steering> {
        let max_interest = self.config.max_interest;
        let at_risk: Vec<&Member> = self.members.iter().filter(|m| m.state == MemberState::AtRisk).collect();
        if at_risk.is_empty() {
            return Ok(Steering::Stay);
        }
        let neighbors = self.neighbor_topics(self.config.neighbor_threshold)?;
        if neighbors.is_empty() {
            return Ok(Steering::Halt(HaltReason::NoNeighbors));
        }

        let mut best: Option<(usize, f64)> = None;
        for i in neighbors {
            let topic = &self.topics[i].vector;
            let mut viable = true;
            for m in &at_risk {
                if m.interest_in(topic, max_interest)? <= self.config.recovery_threshold {
                    viable = false;
                    break;
                }
            }
            if !viable {
                continue;
            }
            let mut min_interest = f64::INFINITY;
            for m in &self.members {
                min_interest = min_interest.min(m.interest_in(topic, max_interest)?);
            }
            match best {
                Some((_, b)) if min_interest <= b => {}
                _ => best = Some((i, min_interest)),
            }
        }
        Ok(match best {
            Some((topic, min_interest)) => Steering::SteerTo { topic, min_interest },
            None => Steering::Halt(HaltReason::NoViableTopic),
        })
    }

    /// One round on the current topic: refresh interests and states, then
    /// steer. Returns `None` once the group has halted.
    pub fn step(&mut self) -> Result<Option<RoundReport>> {
        if self.halted.is_some() {
            return Ok(None);
        }
        self.update_interests()?;
        self.update_states();
        let topic = self.current;
        let active = self.count(MemberState::Active);
        let at_risk = self.count(MemberState::AtRisk);
        let steering = if active + at_risk < self.config.min_active_members {
            Steering::Halt(HaltReason::TooFewActive)
        } else {
            self.min_max_steering()?
        };
        match steering {
            Steering::SteerTo { topic: next, min_interest } => {
                debug!(from = topic, to = next, min_interest, "steering group");
                self.current = next;
            }
            Steering::Halt(reason) => {
                warn!(topic, %reason, "group halted");
                self.halted = Some(reason);
            }
            Steering::Stay => {}
        }
        self.rounds += 1;
        Ok(Some(RoundReport {
            round: self.rounds,
            topic,
            group_velocity: self.group_velocity(),
            active,
            at_risk,
            left_out: self.count(MemberState::LeftOut),
            steering,
        }))
    }

    /// Step until `config.rounds` rounds have run or the group halts.
    pub fn run(&mut self) -> Result<Vec<RoundReport>> {
        let mut reports = Vec::with_capacity(self.config.rounds);
        while reports.len() < self.config.rounds {
            match self.step()? {
                Some(report) => reports.push(report),
                None => break,
            }
        }
        Ok(reports)
    }
}
