// priority-cut enumeration and iterative-refinement LUT6 mapping

use crate::ftb::{self, Truth6};
use crate::gate::{GateKind, Lb, Mode};
use crate::lit::{GateId, Lit, GID_FIRST_USER};
use crate::netlist::{Netlist, ObjKind};
use bumpalo::Bump;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Index;
use std::time::Instant;

//-------------------------------------------------------------------------
// Cut representation

/// A 6-feasible cut: sorted leaf ids plus a 32-bit abstraction (bit
/// `id & 31` OR-ed over the leaves) for O(1) rejection of impossible
/// unions and subsumptions. `sz > 6` marks the null cut.
#[derive(Clone, Copy, Debug)]
pub struct Cut {
    inputs: [GateId; 6],
    sz: u8,
    abstr: u32,
}

impl Cut {
    pub const NULL: Cut = Cut {
        inputs: [0; 6],
        sz: 7,
        abstr: 0,
    };

    pub fn empty() -> Cut {
        Cut {
            inputs: [0; 6],
            sz: 0,
            abstr: 0,
        }
    }

    pub fn unit(g: GateId) -> Cut {
        let mut cut = Cut::empty();
        cut.push(g);
        cut
    }

    pub fn size(&self) -> usize {
        self.sz as usize
    }

    pub fn is_null(&self) -> bool {
        self.sz > 6
    }

    fn push(&mut self, g: GateId) {
        debug_assert!(self.sz < 6);
        self.inputs[self.sz as usize] = g;
        self.sz += 1;
        self.abstr |= 1 << (g & 31);
    }

    pub fn leaves(&self) -> &[GateId] {
        &self.inputs[..self.sz as usize]
    }
}

impl Index<usize> for Cut {
    type Output = GateId;

    fn index(&self, i: usize) -> &GateId {
        &self.inputs[i]
    }
}

/// True iff every leaf of `c` is also a leaf of `d`. Both cuts must be
/// sorted and non-null.
fn subsumes(c: &Cut, d: &Cut) -> bool {
    debug_assert!(!c.is_null() && !d.is_null());
    if d.size() < c.size() {
        return false;
    }
    if c.abstr & !d.abstr != 0 {
        return false;
    }
    if c.size() == d.size() {
        return c.leaves() == d.leaves();
    }
    let mut j = 0;
    for i in 0..c.size() {
        while c[i] != d[j] {
            j += 1;
            if j == d.size() {
                return false;
            }
        }
    }
    true
}

/// Sorted merge of two cuts, or null if the union needs more than six
/// leaves.
fn combine_and(cut1: &Cut, cut2: &Cut) -> Cut {
    if (cut1.abstr | cut2.abstr).count_ones() > 6 {
        return Cut::NULL;
    }

    let mut result = Cut::empty();
    let (n1, n2) = (cut1.size(), cut2.size());
    let mut i = 0;
    let mut j = 0;
    while i < n1 && j < n2 {
        if result.size() == 6 {
            return Cut::NULL;
        }
        match cut1[i].cmp(&cut2[j]) {
            Ordering::Less => {
                result.push(cut1[i]);
                i += 1;
            }
            Ordering::Greater => {
                result.push(cut2[j]);
                j += 1;
            }
            Ordering::Equal => {
                result.push(cut1[i]);
                i += 1;
                j += 1;
            }
        }
    }
    if result.size() + (n1 - i) + (n2 - j) > 6 {
        return Cut::NULL;
    }
    while i < n1 {
        result.push(cut1[i]);
        i += 1;
    }
    while j < n2 {
        result.push(cut2[j]);
        j += 1;
    }
    result
}

/// Adds `cut` to `out` with subsumption tests in both directions. Returns
/// false when the cut is constant or trivial: the list is replaced by it
/// and enumeration for this node should stop.
fn apply_subsumption_and_add(cut: Cut, out: &mut Vec<Cut>) -> bool {
    if cut.size() <= 1 {
        // constant cut, buffer or inverter
        out.clear();
        out.push(cut);
        return false;
    }

    // in presence of subsumption the resulting cut set is no longer unique
    let mut k = 0;
    while k < out.len() {
        if subsumes(&out[k], &cut) {
            return true;
        }
        if subsumes(&cut, &out[k]) {
            out[k] = cut;
            let mut m = k + 1;
            while m < out.len() {
                debug_assert!(!subsumes(&out[m], &cut));
                if subsumes(&cut, &out[m]) {
                    out.swap_remove(m);
                } else {
                    m += 1;
                }
            }
            return true;
        }
        k += 1;
    }
    out.push(cut);
    true
}

//-------------------------------------------------------------------------
// Cut costs

#[derive(Clone, Copy)]
struct Cost {
    cut_size: u32,
    delay: f32,
    area: f32,
}

fn delay_cmp(x: &Cost, y: &Cost) -> Ordering {
    x.delay
        .partial_cmp(&y.delay)
        .unwrap()
        .then(x.area.partial_cmp(&y.area).unwrap())
        .then(x.cut_size.cmp(&y.cut_size))
}

fn area_cmp(x: &Cost, y: &Cost) -> Ordering {
    x.area
        .partial_cmp(&y.area)
        .unwrap()
        .then(x.delay.partial_cmp(&y.delay).unwrap())
        .then(x.cut_size.cmp(&y.cut_size))
}

//-------------------------------------------------------------------------
// FTB computation

fn sign_mask(s: bool) -> Truth6 {
    if s {
        !0
    } else {
        0
    }
}

/// Truth table of `w` over the leaves of `cut`: an explicit memoized
/// post-order walk of the cut's fanin cone.
pub fn compute_ftb(nl: &Netlist, w: Lit, cut: &Cut) -> Truth6 {
    let mut memo: HashMap<GateId, Truth6> = HashMap::new();
    let mut stack: Vec<GateId> = vec![w.id()];
    while let Some(&id) = stack.last() {
        if memo.contains_key(&id) {
            stack.pop();
            continue;
        }
        let val = match nl.kind(id) {
            GateKind::True => Some(!0u64),
            GateKind::False => Some(0u64),
            GateKind::Const => match nl.lb(id) {
                Lb::True => Some(!0u64),
                Lb::False => Some(0u64),
                Lb::Undef => panic!("ftb: undefined constant w{id} in mapped cone"),
            },
            _ if cut.leaves().contains(&id) => {
                let i = cut.leaves().iter().position(|&l| l == id).unwrap();
                Some(ftb::FTB6_PROJ[i])
            }
            GateKind::And => {
                let f0 = nl.fanin(id, 0);
                let f1 = nl.fanin(id, 1);
                match (memo.get(&f0.id()), memo.get(&f1.id())) {
                    (Some(&a), Some(&b)) => {
                        Some((a ^ sign_mask(f0.sign())) & (b ^ sign_mask(f1.sign())))
                    }
                    _ => {
                        if !memo.contains_key(&f1.id()) {
                            stack.push(f1.id());
                        }
                        if !memo.contains_key(&f0.id()) {
                            stack.push(f0.id());
                        }
                        None
                    }
                }
            }
            kind => panic!("ftb: unhandled gate kind {kind:?} at w{id}"),
        };
        if let Some(v) = val {
            memo.insert(id, v);
            stack.pop();
        }
    }
    memo[&w.id()] ^ sign_mask(w.sign())
}

//-------------------------------------------------------------------------
// Mapper

#[derive(Clone, Copy, Debug)]
pub struct Params {
    pub n_rounds: u32,
    pub cuts_per_node: usize,
    /// Scales the round-0 delay into the target arrival time; must be
    /// at least 1.
    pub delay_factor: f32,
    /// Admit every cut on nodes outside the current mapping instead of
    /// granting them one unit of artificial slack.
    pub map_for_area: bool,
    pub quiet: bool,
    /// Drop all cached cuts after the purely delay-driven round 0, so
    /// round 1 re-enumerates with departure data available.
    pub refresh_cuts_after_round_0: bool,
}

impl Default for Params {
    fn default() -> Params {
        Params {
            n_rounds: 4,
            cuts_per_node: 10,
            delay_factor: 1.0,
            map_for_area: false,
            quiet: false,
            refresh_cuts_after_round_0: true,
        }
    }
}

/// Result statistics of a mapping run.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapStats {
    pub cuts_enumerated: u64,
    pub mapped_area: u64,
    pub mapped_delay: f32,
    pub target_arrival: f32,
}

struct LutMap<'a, 'n> {
    p: Params,
    nl: &'n mut Netlist,
    mem: &'a Bump,

    cutmap: Vec<Option<&'a mut [Cut]>>,
    area_est: Vec<f32>,
    fanout_est: Vec<f32>,
    arrival: Vec<f32>,
    /// Longest path to any sink in the current mapping; infinity marks a
    /// deactivated node.
    depart: Vec<f32>,

    round: u32,
    cuts_enumerated: u64,
    target_arrival: f32,
    mapped_area: u64,
    mapped_delay: f32,

    tmp_cuts: Vec<Cut>,
}

fn is_const_kind(kind: GateKind) -> bool {
    matches!(kind, GateKind::False | GateKind::True | GateKind::Const)
}

impl<'a, 'n> LutMap<'a, 'n> {
    /// Trivial cut and stored cut list of a node, as enumeration inputs.
    /// Constants contribute the empty cut.
    fn node_cuts(&self, id: GateId) -> (Cut, &[Cut]) {
        if is_const_kind(self.nl.kind(id)) {
            (Cut::empty(), &[])
        } else {
            (
                Cut::unit(id),
                self.cutmap[id as usize].as_deref().unwrap_or(&[]),
            )
        }
    }

    fn generate_cuts_and(&self, w: GateId, out: &mut Vec<Cut>) {
        debug_assert_eq!(self.nl.kind(w), GateKind::And);
        debug_assert!(out.is_empty());

        let u = self.nl.fanin(w, 0);
        let v = self.nl.fanin(w, 1);
        let (triv_u, cs) = self.node_cuts(u.id());
        let (triv_v, ds) = self.node_cuts(v.id());

        // cross-product of {trivial, stored} x {trivial, stored}
        for i in 0..=cs.len() {
            let c = if i == 0 { &triv_u } else { &cs[i - 1] };
            for j in 0..=ds.len() {
                let d = if j == 0 { &triv_v } else { &ds[j - 1] };
                let cut = combine_and(c, d);
                if !cut.is_null() && !apply_subsumption_and_add(cut, out) {
                    return;
                }
            }
        }
    }

    fn evaluate_cuts(&mut self, w: GateId, cuts: &mut [Cut]) {
        assert!(!cuts.is_empty());
        assert!(self.fanout_est[w as usize] > 0.0);

        let mut order: Vec<(Cost, Cut)> = cuts
            .iter()
            .map(|&cut| {
                let mut delay = 0.0f32;
                let mut area = 1.0f32; // cut cost = 1
                for &l in cut.leaves() {
                    delay = delay.max(self.arrival[l as usize]);
                    area += self.area_est[l as usize];
                }
                (
                    Cost {
                        cut_size: cut.size() as u32,
                        delay,
                        area,
                    },
                    cut,
                )
            })
            .collect();
        order.sort_by(|a, b| delay_cmp(&a.0, &b.0));

        if self.round > 0 {
            let req_time = if self.depart[w as usize] == f32::INFINITY {
                if self.p.map_for_area {
                    f32::INFINITY
                } else {
                    // one unit of artificial slack
                    order[0].0.delay + 1.0
                }
            } else {
                self.target_arrival - (self.depart[w as usize] + 1.0)
            };

            // cuts meeting the required time compete on area and fill at
            // most half the list; the rest stay delay-sorted
            let (mut area_part, delay_part): (Vec<_>, Vec<_>) =
                order.iter().copied().partition(|(c, _)| c.delay <= req_time);
            area_part.sort_by(|a, b| area_cmp(&a.0, &b.0));
            let keep = area_part.len().min(self.p.cuts_per_node / 2);
            let mut rest = area_part.split_off(keep);
            rest.extend(delay_part);
            rest.sort_by(|a, b| delay_cmp(&a.0, &b.0));
            order = area_part;
            order.extend(rest);
        }

        for (slot, &(_, cut)) in cuts.iter_mut().zip(order.iter()) {
            *slot = cut;
        }
        self.area_est[w as usize] = order[0].0.area / self.fanout_est[w as usize];
        self.arrival[w as usize] = order[0].0.delay + 1.0;
    }

    fn generate_cuts(&mut self, w: GateId) {
        use GateKind::*;
        match self.nl.kind(w) {
            Null => {}
            // global sources and constants: only the trivial / empty cut
            Unbound | Conflict | False | True | Reset | Const | PI | FF => {
                self.cutmap[w as usize] = None;
                self.area_est[w as usize] = 0.0;
                self.arrival[w as usize] = 0.0;
            }
            And => {
                if self.cutmap[w as usize].is_none() {
                    let mut cuts = std::mem::take(&mut self.tmp_cuts);
                    cuts.clear();
                    self.generate_cuts_and(w, &mut cuts);
                    self.cuts_enumerated += cuts.len() as u64;
                    self.evaluate_cuts(w, &mut cuts);
                    cuts.truncate(self.p.cuts_per_node);
                    self.cutmap[w as usize] = Some(self.mem.alloc_slice_copy(&cuts));
                    self.tmp_cuts = cuts;
                } else {
                    let cuts = self.cutmap[w as usize].take().unwrap();
                    self.evaluate_cuts(w, cuts);
                    self.cutmap[w as usize] = Some(cuts);
                }
            }
            PO | Seq => {}
            kind => panic!("lutmap: unhandled gate kind {kind:?} at w{w}"),
        }
    }

    /// Recomputes departure times, the fanout counts induced by the
    /// current mapping, mapped area and delay; then either blends the
    /// fanout estimates or instantiates the final LUT network.
    fn update_fanout_est(&mut self, instantiate: bool) {
        let size = self.nl.size();
        let mut fanouts = vec![0u32; size as usize];
        self.mapped_area = 0;
        self.depart = vec![0.0; size as usize];

        for id in (0..size).rev() {
            let kind = self.nl.kind(id);
            if kind == GateKind::And {
                if fanouts[id as usize] > 0 {
                    let cut = self.cutmap[id as usize].as_deref().unwrap()[0];
                    self.mapped_area += 1; // cut cost = 1
                    for &l in cut.leaves() {
                        fanouts[l as usize] += 1;
                        let d = self.depart[id as usize] + 1.0;
                        if d > self.depart[l as usize] {
                            self.depart[l as usize] = d;
                        }
                    }
                } else {
                    self.depart[id as usize] = f32::INFINITY; // deactivated
                }
            } else if kind.is_co() {
                let f = self.nl.fanin(id, 0);
                if f.is_legal() {
                    fanouts[f.id() as usize] += 1;
                }
            }
        }

        self.mapped_delay = 0.0;
        for id in 0..size {
            if self.nl.kind(id).is_ci() && self.depart[id as usize] > self.mapped_delay {
                self.mapped_delay = self.depart[id as usize];
            }
        }

        if !instantiate {
            // blend new fanout counts with history; early rounds trust the
            // estimate, later rounds the current mapping
            let r = (self.round + 1) as f32;
            let alpha = 1.0 - 1.0 / (r * r * r * r + 1.0);
            let beta = 1.0 - alpha;
            for id in 0..size {
                if self.nl.kind(id) == GateKind::And {
                    self.fanout_est[id as usize] = alpha * (fanouts[id as usize].max(1) as f32)
                        + beta * self.fanout_est[id as usize];
                }
            }
        } else {
            self.instantiate();
        }
    }

    /// Turns the chosen cover into LUT6 gates in place, removes the AND
    /// layer and leaves the netlist compacted in Lut6 mode.
    fn instantiate(&mut self) {
        let size = self.nl.size();

        // FTBs are computed over the AND structure before it is rewritten
        let mut ftbs: Vec<Truth6> = Vec::with_capacity(self.mapped_area as usize);
        for id in 0..size {
            if self.nl.kind(id) == GateKind::And && self.depart[id as usize] != f32::INFINITY {
                let cut = self.cutmap[id as usize].as_deref().unwrap()[0];
                ftbs.push(compute_ftb(self.nl, Lit::positive(id), &cut));
            }
        }

        self.nl.thaw();
        self.nl.set_mode(Mode::FreeForm);
        let mut j = 0;
        for id in 0..size {
            if self.nl.kind(id) == GateKind::And && self.depart[id as usize] != f32::INFINITY {
                let cut = self.cutmap[id as usize].as_deref().unwrap()[0];
                let w = self.nl.change(Lit::positive(id), GateKind::Lut6);
                self.nl.set_ftb(w.id(), ftbs[j]);
                j += 1;
                for (pin, &l) in cut.leaves().iter().enumerate() {
                    self.nl.set_fanin(w, pin as u32, Lit::positive(l));
                }
            }
        }
        for id in (0..size).rev() {
            if self.nl.kind(id) == GateKind::And {
                self.nl.remove(id);
            }
        }

        fold_inverted_outputs(self.nl);
        self.nl.compact();
        self.nl.set_mode(Mode::Lut6);
        self.nl.assert_mode();
    }

    fn run(&mut self) -> MapStats {
        let size = self.nl.size() as usize;
        self.cutmap = (0..size).map(|_| None).collect();
        self.area_est = vec![0.0; size];
        self.arrival = vec![0.0; size];
        self.depart = vec![0.0; size];

        // seed fanout estimation with the actual fanout counts
        self.fanout_est = (0..size as GateId)
            .map(|id| self.nl.fanout_count().count(id) as f32)
            .collect();

        let mut stats = MapStats::default();
        for round in 0..self.p.n_rounds {
            self.round = round;
            self.cuts_enumerated = 0;

            let t0 = Instant::now();
            for id in 0..self.nl.size() {
                self.generate_cuts(id);
            }
            let t1 = Instant::now();

            let instantiate = round == self.p.n_rounds - 1;
            self.update_fanout_est(instantiate);
            let t2 = Instant::now();

            if round == 0 {
                self.target_arrival = self.mapped_delay * self.p.delay_factor;
                stats.cuts_enumerated = self.cuts_enumerated;
            }

            if !self.p.quiet {
                if round == 0 {
                    println!("cuts_enumerated={}", self.cuts_enumerated);
                }
                println!(
                    "round={}   mapped_area={}   mapped_delay={}   [enum: {:.2?}, blend: {:.2?}]",
                    round,
                    self.mapped_area,
                    self.mapped_delay,
                    t1 - t0,
                    t2 - t1
                );
            }

            // round 0 is purely delay-driven; dropping its cuts forces
            // re-enumeration with departure data available
            if round == 0 && !instantiate && self.p.refresh_cuts_after_round_0 {
                for c in self.cutmap.iter_mut() {
                    *c = None;
                }
            }
        }

        stats.mapped_area = self.mapped_area;
        stats.mapped_delay = self.mapped_delay;
        stats.target_arrival = self.target_arrival;
        stats
    }
}

/// Folds output inversion into LUTs whose every fanout edge is negated.
/// LUT inputs are sign-free by construction, so only sink edges can carry
/// signs; a unanimously negated LUT absorbs them into its table.
fn fold_inverted_outputs(nl: &mut Netlist) {
    let size = nl.size();
    let mut pos = vec![0u32; size as usize];
    let mut neg = vec![0u32; size as usize];
    for id in GID_FIRST_USER..size {
        if nl.kind(id) == GateKind::Null {
            continue;
        }
        for &f in nl.fanins(id) {
            if f.is_legal() && nl.kind(f.id()) == GateKind::Lut6 {
                if f.sign() {
                    neg[f.id() as usize] += 1;
                } else {
                    pos[f.id() as usize] += 1;
                }
            }
        }
    }

    let mut flip = vec![false; size as usize];
    for id in GID_FIRST_USER..size {
        if nl.kind(id) == GateKind::Lut6 && neg[id as usize] > 0 && pos[id as usize] == 0 {
            let ftb = nl.ftb(id);
            nl.set_ftb(id, !ftb);
            flip[id as usize] = true;
        }
    }

    for id in GID_FIRST_USER..size {
        if nl.kind(id) == GateKind::Null {
            continue;
        }
        for pin in 0..nl.gate_size(id) {
            let f = nl.fanin(id, pin);
            if f.is_legal() && flip[f.id() as usize] {
                nl.set_fanin(Lit::positive(id), pin, !f);
            }
        }
    }
}

/// Maps a combinational AIG onto LUT6 gates in place. The netlist is
/// compacted first if needed; it comes back canonical in Lut6 mode with
/// function tables attached.
pub fn lut_map(nl: &mut Netlist, p: Params) -> MapStats {
    assert!(p.n_rounds >= 1);
    assert!(p.cuts_per_node >= 2);
    assert!(p.delay_factor >= 1.0);

    if !nl.is_canonical() {
        if !p.quiet {
            eprintln!("Compacting ({} gates)...", nl.count());
        }
        nl.compact();
    }
    if !nl.has_obj(ObjKind::FanoutCount) {
        nl.add_obj(ObjKind::FanoutCount);
    }

    let mem = Bump::new();
    let mut lm = LutMap {
        p,
        nl,
        mem: &mem,
        cutmap: Vec::new(),
        area_est: Vec::new(),
        fanout_est: Vec::new(),
        arrival: Vec::new(),
        depart: Vec::new(),
        round: 0,
        cuts_enumerated: 0,
        target_arrival: 0.0,
        mapped_area: 0,
        mapped_delay: 0.0,
        tmp_cuts: Vec::new(),
    };
    lm.run()
}
