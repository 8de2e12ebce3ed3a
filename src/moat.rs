//! # Moat — Connected Components of the Gaussian Prime Graph
//!
//! Can one walk to infinity stepping from Gaussian prime to Gaussian prime
//! with hops of bounded Euclidean length? The explorers here gather the
//! evidence for a fixed `jump_size`:
//!
//! - [`OctantMoat`] sieves a bounded octant and flood-fills components with
//!   an explicit work stack.
//! - [`VerticalMoat`] slides a tall sieve block right and up from a chosen
//!   real part, looking for a moat that separates the axis from the
//!   diagonal.
//! - [`SegmentedMoat`] counts the size of the origin's component without
//!   holding the whole octant in memory, carrying component ids across
//!   segment boundaries through a union-find.
//!
//! Apart from `1 + i`, every Gaussian prime has odd `a + b`, so a hop
//! between primes must have even `u + v`. The vertical explorer works far
//! from the origin and uses that parity-restricted stencil; the octant and
//! segmented explorers start at the ramified prime itself, whose hops are
//! parity-changing, and use the unrestricted stencil.

use crate::block::BlockSieve;
use crate::donut::OctantDonutSieve;
use crate::gint::GaussInt;
use crate::octant::OctantSieve;
use crate::sieve::Sieve;
use crate::smallprimes::isqrt;
use anyhow::{bail, ensure, Context, Result};
use tracing::{debug, info};

/// Displacements of Euclidean length in `(0, jump_size]`, optionally
/// restricted to jumps preserving odd coordinate sum.
pub fn nearest_neighbors(jump_size: f64, parity_restricted: bool) -> Vec<GaussInt> {
    let r = jump_size.floor() as i64;
    let js2 = jump_size * jump_size;
    let mut stencil = Vec::new();
    for u in -r..=r {
        for v in -r..=r {
            if (u == 0 && v == 0) || ((u * u + v * v) as f64) > js2 {
                continue;
            }
            if parity_restricted && u.abs() % 2 != v.abs() % 2 {
                continue;
            }
            stencil.push(GaussInt::new(u, v));
        }
    }
    stencil
}

// ---------------------------------------------------------------------------
// Octant moat
// ---------------------------------------------------------------------------

/// Flood-fill explorer over a fully sieved octant.
pub struct OctantMoat {
    norm_bound: u64,
    jump_size: f64,
    grid: Vec<Vec<bool>>,
    neighbors: Vec<GaussInt>,
    current_component: Vec<GaussInt>,
    all_components: Vec<Vec<GaussInt>>,
}

impl OctantMoat {
    pub fn new(norm_bound: u64, jump_size: f64, verbose: bool) -> Result<Self> {
        ensure!(norm_bound >= 2, "norm bound {} holds no primes", norm_bound);
        let mut sieve = OctantSieve::new(norm_bound, verbose)?;
        sieve.run()?;
        let root = isqrt(norm_bound) as i64;
        let mut grid = Vec::with_capacity((root + 1) as usize);
        for a in 0..=root {
            let height = a.min(isqrt(norm_bound - (a * a) as u64) as i64) + 1;
            let col: Vec<bool> = (0..height)
                .map(|b| sieve.survivor(a, b) && GaussInt::new(a, b).norm() > 1)
                .collect();
            grid.push(col);
        }
        Ok(OctantMoat {
            norm_bound,
            jump_size,
            grid,
            neighbors: nearest_neighbors(jump_size, false),
            current_component: Vec::new(),
            all_components: Vec::new(),
        })
    }

    #[inline]
    fn is_alive(&self, a: i64, b: i64) -> bool {
        a >= 0
            && b >= 0
            && (a as usize) < self.grid.len()
            && (b as usize) < self.grid[a as usize].len()
            && self.grid[a as usize][b as usize]
    }

    /// Explore the component containing `(a, b)`, marking every member
    /// visited. The component is returned sorted by `(norm, a, b)`, which
    /// makes the result independent of the traversal order.
    pub fn explore_component(&mut self, a: i64, b: i64) -> &[GaussInt] {
        self.current_component.clear();
        if !self.is_alive(a, b) {
            return &self.current_component;
        }
        let mut stack = vec![GaussInt::new(a, b)];
        self.grid[a as usize][b as usize] = false;
        while let Some(p) = stack.pop() {
            self.current_component.push(p);
            for q in &self.neighbors {
                let (na, nb) = (p.a + q.a, p.b + q.b);
                if self.is_alive(na, nb) {
                    self.grid[na as usize][nb as usize] = false;
                    stack.push(GaussInt::new(na, nb));
                }
            }
        }
        self.current_component.sort();
        &self.current_component
    }

    pub fn component_size(&self) -> usize {
        self.current_component.len()
    }

    /// Largest member of the current component in `(norm, a, b)` order.
    pub fn component_max_element(&self) -> Option<GaussInt> {
        self.current_component.last().copied()
    }

    pub fn current_component(&self) -> &[GaussInt] {
        &self.current_component
    }

    /// Exhaust the graph: explore every remaining component in scan order.
    pub fn explore_all_components(&mut self) -> &[Vec<GaussInt>] {
        for a in 0..self.grid.len() as i64 {
            for b in 0..self.grid[a as usize].len() as i64 {
                if self.is_alive(a, b) {
                    self.explore_component(a, b);
                    let comp = self.current_component.clone();
                    self.all_components.push(comp);
                }
            }
        }
        &self.all_components
    }

    /// Primes not reached by any exploration so far.
    pub fn unexplored(&self) -> Vec<GaussInt> {
        let mut left = Vec::new();
        for (a, col) in self.grid.iter().enumerate() {
            for (b, &alive) in col.iter().enumerate() {
                if alive {
                    left.push(GaussInt::new(a as i64, b as i64));
                }
            }
        }
        left
    }

    pub fn norm_bound(&self) -> u64 {
        self.norm_bound
    }

    pub fn jump_size(&self) -> f64 {
        self.jump_size
    }
}

// ---------------------------------------------------------------------------
// Vertical moat
// ---------------------------------------------------------------------------

const BLOCK_DX: i64 = 1_000;
const BLOCK_DY: i64 = 10_000;
const MAX_RIGHT_STEPS: u32 = 10;

/// One sieved block of the vertical explorer with its walk bookkeeping.
struct MoatBlock {
    x: i64,
    y: i64,
    grid: Vec<Vec<bool>>,
    upper_wall_y_punch: i64,
    count_visited: u64,
    farthest_right: i64,
}

/// Sliding-block explorer for a vertical moat at a fixed real part.
///
/// Starting from `(real_part, 0)`, each block is sieved, explored from its
/// left and upper walls, and the walk moves right when a component punches
/// the right wall or up to the lowest punching height otherwise. Reaching
/// `y ≥ x` means a moat separates the real axis from the octant diagonal.
pub struct VerticalMoat {
    real_part: i64,
    jump_size: f64,
    verbose: bool,
    dx: i64,
    dy: i64,
    sieving_primes: Vec<GaussInt>,
    neighbors: Vec<GaussInt>,
}

impl VerticalMoat {
    pub fn new(real_part: i64, jump_size: f64, verbose: bool) -> Result<Self> {
        Self::with_block_size(real_part, jump_size, verbose, BLOCK_DX, BLOCK_DY)
    }

    pub fn with_block_size(
        real_part: i64,
        jump_size: f64,
        verbose: bool,
        dx: i64,
        dy: i64,
    ) -> Result<Self> {
        ensure!(real_part >= 1, "real part must be positive");
        ensure!(dx >= 1 && dy >= 1, "block sides must be positive");
        // The factor 1.2 leaves slack for a run of right-steps.
        let bound =
            (1.2 * (std::f64::consts::SQRT_2 * real_part as f64 + (dx * dy) as f64)) as u64;
        if verbose {
            info!(norm_bound = bound, "precomputing sieving primes");
        }
        let mut sieve = OctantDonutSieve::new(bound, false)?;
        sieve.run()?;
        let sieving_primes = sieve.take_big_primes_sorted();
        Ok(VerticalMoat {
            real_part,
            jump_size,
            verbose,
            dx,
            dy,
            sieving_primes,
            neighbors: nearest_neighbors(jump_size, true),
        })
    }

    fn sieve_block(&self, x: i64, y: i64) -> Result<MoatBlock> {
        let mut sieve = BlockSieve::with_small_primes(x, y, self.dx, self.dy, &self.sieving_primes)?;
        sieve.run()?;
        let grid = (0..self.dx)
            .map(|u| {
                (0..self.dy)
                    .map(|v| {
                        sieve.survivor(x + u, y + v) && GaussInt::new(x + u, y + v).norm() > 1
                    })
                    .collect()
            })
            .collect();
        Ok(MoatBlock {
            x,
            y,
            grid,
            upper_wall_y_punch: self.dy,
            count_visited: 0,
            farthest_right: 0,
        })
    }

    /// Stack walk from `(a, b)` in block coordinates. In left-wall mode,
    /// returns true as soon as a jump lands past the right wall. In
    /// upper-wall mode, records the lowest height that reaches the right
    /// wall and treats a jump below the bottom wall as an invariant
    /// violation (the block is far taller than any jump).
    fn explore_at(&self, block: &mut MoatBlock, a: i64, b: i64, upper_wall: bool) -> Result<bool> {
        let mut stack = vec![GaussInt::new(a, b)];
        block.grid[a as usize][b as usize] = false;
        block.count_visited += 1;
        while let Some(p) = stack.pop() {
            for q in &self.neighbors {
                let (ga, gb) = (p.a + q.a, p.b + q.b);
                if upper_wall {
                    if ga >= self.dx && p.b < block.upper_wall_y_punch {
                        block.upper_wall_y_punch = p.b;
                    }
                    if gb < 0 {
                        bail!(
                            "punched through the lower wall at ({}, {}); exploration started at \
                             ({}, {}) in the block at ({}, {})",
                            ga,
                            gb,
                            a,
                            b,
                            block.x,
                            block.y
                        );
                    }
                } else if ga >= self.dx {
                    if self.verbose {
                        debug!(
                            "punched through the right wall at ({}, {}) from ({}, {}); moving \
                             the block right",
                            ga, gb, a, b
                        );
                    }
                    return Ok(true);
                }
                if ga >= 0
                    && ga < self.dx
                    && gb >= 0
                    && gb < self.dy
                    && block.grid[ga as usize][gb as usize]
                {
                    block.grid[ga as usize][gb as usize] = false;
                    block.count_visited += 1;
                    if !upper_wall && ga > block.farthest_right {
                        block.farthest_right = ga;
                    }
                    stack.push(GaussInt::new(ga, gb));
                }
            }
        }
        Ok(false)
    }

    /// Explore from every prime within a jump of the left wall. True means
    /// the right wall was punched and the block must move right.
    fn explore_left_wall(&self, block: &mut MoatBlock) -> Result<bool> {
        for a in 0..(self.jump_size.ceil() as i64).min(self.dx) {
            for b in 0..self.dy {
                if block.grid[a as usize][b as usize] && self.explore_at(block, a, b, false)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Explore from every prime within a jump of the upper wall, recording
    /// where explorations reach the right wall.
    fn explore_upper_wall(&self, block: &mut MoatBlock) -> Result<()> {
        let lowest = (self.dy as f64 - self.jump_size).ceil() as i64;
        for b in (lowest.max(0)..self.dy).rev() {
            for a in 0..self.dx {
                if block.grid[a as usize][b as usize] {
                    self.explore_at(block, a, b, true)?;
                }
            }
        }
        Ok(())
    }

    /// Run the walk until a moat is found or the component diverges.
    pub fn run(&self) -> Result<()> {
        let mut x = self.real_part;
        let mut y = 0i64;
        let mut consecutive_right_steps = 0u32;
        while y < x {
            if self.verbose {
                info!(x, y, "exploring block");
            }
            let mut block = self.sieve_block(x, y)?;
            let (next_x, next_y) = if self.explore_left_wall(&mut block)? {
                (x + self.dx, y)
            } else {
                self.explore_upper_wall(&mut block)?;
                if self.verbose {
                    info!(
                        farthest_right = block.farthest_right,
                        visited = block.count_visited,
                        "left wall contained"
                    );
                }
                (x, y + block.upper_wall_y_punch)
            };
            if next_x != x {
                consecutive_right_steps += 1;
                if consecutive_right_steps > MAX_RIGHT_STEPS {
                    bail!(
                        "stepped right {} times in a row; the component is likely infinite",
                        consecutive_right_steps
                    );
                }
            } else {
                consecutive_right_steps = 0;
            }
            x = next_x;
            y = next_y;
        }
        info!(
            jump_size = self.jump_size,
            "Gaussian moat present from the real axis to the octant boundary; the component \
             arising from this jump size is finite"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Segmented moat
// ---------------------------------------------------------------------------

const SEGMENT_WIDTH: i64 = 1_000;
const SEGMENT_MAX_REAL: i64 = 20_000;
const NO_COMPONENT: u32 = u32::MAX;

/// Union-find component counter over sliding octant segments.
///
/// Each segment `[x₀, x₀+w) × [0, x₀+w)` is block-sieved and flooded.
/// Components are seeded from the previous segment's right-boundary zone so
/// their ids survive the hand-off; components meeting across the boundary
/// are merged in the union-find, and sizes accumulate at the roots. A
/// component absent from the outgoing boundary can no longer grow and is
/// forgotten. The run ends when the origin component stops propagating.
pub struct SegmentedMoat {
    jump_size: f64,
    verbose: bool,
    segment_width: i64,
    max_real: i64,
    neighbors: Vec<GaussInt>,
    parent: Vec<u32>,
    comp_size: Vec<u64>,
    boundary: Vec<(i64, i64, u32)>,
    origin_id: Option<u32>,
}

impl SegmentedMoat {
    pub fn new(jump_size: f64, verbose: bool) -> Result<Self> {
        Self::with_segment_width(jump_size, verbose, SEGMENT_WIDTH, SEGMENT_MAX_REAL)
    }

    pub fn with_segment_width(
        jump_size: f64,
        verbose: bool,
        segment_width: i64,
        max_real: i64,
    ) -> Result<Self> {
        ensure!(segment_width >= 2, "segment width must cover the origin");
        ensure!(
            segment_width as f64 > jump_size,
            "segment width {} cannot carry jumps of size {}",
            segment_width,
            jump_size
        );
        Ok(SegmentedMoat {
            jump_size,
            verbose,
            segment_width,
            max_real,
            neighbors: nearest_neighbors(jump_size, false),
            parent: Vec::new(),
            comp_size: Vec::new(),
            boundary: Vec::new(),
            origin_id: None,
        })
    }

    fn find(&mut self, mut i: u32) -> u32 {
        while self.parent[i as usize] != i {
            let grandparent = self.parent[self.parent[i as usize] as usize];
            self.parent[i as usize] = grandparent;
            i = grandparent;
        }
        i
    }

    fn union(&mut self, i: u32, j: u32) {
        let (ri, rj) = (self.find(i), self.find(j));
        if ri == rj {
            return;
        }
        let (big, small) = if self.comp_size[ri as usize] >= self.comp_size[rj as usize] {
            (ri, rj)
        } else {
            (rj, ri)
        };
        self.parent[small as usize] = big;
        self.comp_size[big as usize] += self.comp_size[small as usize];
    }

    fn new_component(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        self.comp_size.push(0);
        id
    }

    /// Flood from `(a, b)` (absolute coordinates) through the segment,
    /// assigning `root` and merging into any differently-rooted region met
    /// on the way. Returns the number of newly visited primes.
    fn flood(
        &mut self,
        grid: &[Vec<bool>],
        comp: &mut [Vec<u32>],
        x0: i64,
        a: i64,
        b: i64,
        root: u32,
    ) -> u64 {
        let mut stack = vec![GaussInt::new(a, b)];
        comp[(a - x0) as usize][b as usize] = root;
        let mut visited = 1u64;
        while let Some(p) = stack.pop() {
            for qi in 0..self.neighbors.len() {
                let q = self.neighbors[qi];
                let (na, nb) = (p.a + q.a, p.b + q.b);
                let (u, v) = (na - x0, nb);
                if u < 0 || v < 0 || (u as usize) >= grid.len() {
                    continue;
                }
                if (v as usize) >= grid[u as usize].len() || !grid[u as usize][v as usize] {
                    continue;
                }
                let cell = comp[u as usize][v as usize];
                if cell == NO_COMPONENT {
                    comp[u as usize][v as usize] = root;
                    visited += 1;
                    stack.push(GaussInt::new(na, nb));
                } else if self.find(cell) != self.find(root) {
                    self.union(cell, root);
                }
            }
        }
        visited
    }

    fn explore_segment(&mut self, x0: i64) -> Result<()> {
        let w = self.segment_width;
        let height = x0 + w;
        let mut sieve = BlockSieve::new(x0, 0, w, height, false)?;
        sieve.run()?;

        // Octant-restricted prime grid for this segment.
        let grid: Vec<Vec<bool>> = (0..w)
            .map(|u| {
                let a = x0 + u;
                (0..=a.min(height - 1))
                    .map(|b| sieve.survivor(a, b) && GaussInt::new(a, b).norm() > 1)
                    .collect()
            })
            .collect();
        drop(sieve);
        let mut comp: Vec<Vec<u32>> = grid
            .iter()
            .map(|col| vec![NO_COMPONENT; col.len()])
            .collect();

        // Seed from the previous segment's boundary zone.
        let incoming = std::mem::take(&mut self.boundary);
        for &(pa, pb, id) in &incoming {
            let root = self.find(id);
            for qi in 0..self.neighbors.len() {
                let q = self.neighbors[qi];
                let (na, nb) = (pa + q.a, pb + q.b);
                let (u, v) = (na - x0, nb);
                if u < 0 || v < 0 || (u as usize) >= grid.len() {
                    continue;
                }
                if (v as usize) >= grid[u as usize].len() || !grid[u as usize][v as usize] {
                    continue;
                }
                let cell = comp[u as usize][v as usize];
                if cell == NO_COMPONENT {
                    let count = self.flood(&grid, &mut comp, x0, na, nb, root);
                    let r = self.find(root);
                    self.comp_size[r as usize] += count;
                } else if self.find(cell) != self.find(root) {
                    self.union(cell, root);
                }
            }
        }

        // Remaining primes form components first seen in this segment.
        for u in 0..grid.len() {
            for v in 0..grid[u].len() {
                if grid[u][v] && comp[u][v] == NO_COMPONENT {
                    let id = self.new_component();
                    let count = self.flood(&grid, &mut comp, x0, x0 + u as i64, v as i64, id);
                    let r = self.find(id);
                    self.comp_size[r as usize] += count;
                }
            }
        }

        if x0 == 0 {
            let id = comp[1][1];
            ensure!(id != NO_COMPONENT, "origin prime 1+i missing from the first segment");
            self.origin_id = Some(id);
        }

        // Outgoing boundary: primes within a jump of the segment's edge.
        let zone = (x0 + w - (self.jump_size.ceil() as i64)).max(x0);
        let mut outgoing = Vec::new();
        for u in (zone - x0)..w {
            for v in 0..grid[u as usize].len() as i64 {
                if grid[u as usize][v as usize] {
                    let id = comp[u as usize][v as usize];
                    let root = self.find(id);
                    outgoing.push((x0 + u, v, root));
                }
            }
        }
        self.boundary = outgoing;
        if self.verbose {
            info!(
                x0,
                components = self.parent.len(),
                boundary = self.boundary.len(),
                "segment explored"
            );
        }
        Ok(())
    }

    /// Count the origin component, segment by segment, until it stops
    /// reaching the outgoing boundary.
    pub fn run(&mut self) -> Result<u64> {
        let mut x0 = 0i64;
        loop {
            self.explore_segment(x0)?;
            let origin = self
                .origin_id
                .context("origin component id missing after the first segment")?;
            let root = self.find(origin);
            let boundary_ids: Vec<u32> = self.boundary.iter().map(|&(_, _, id)| id).collect();
            let still_open = boundary_ids.into_iter().any(|id| self.find(id) == root);
            if !still_open {
                return Ok(self.comp_size[root as usize]);
            }
            x0 += self.segment_width;
            ensure!(
                x0 <= self.max_real,
                "origin component still open at real part {}; raise the cap or treat it as \
                 likely infinite",
                x0
            );
        }
    }
}
