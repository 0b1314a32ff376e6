// generic netlist substrate: paged gate table, literal edges, numbering,
// listeners, side tables, garbage collection with compaction

use crate::ftb;
use crate::gate::{AttrKind, GateKind, Lb, Mode, DYNAMIC_SIZE, MAX_SIZE, NUM_KINDS};
use crate::lit::{GateId, Lit, GID_FIRST_USER, GID_NULL};
use smallvec::{smallvec, SmallVec};
use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

const PAGE_BITS: u32 = 10;
const PAGE_SIZE: u32 = 1 << PAGE_BITS;
const PAGE_MASK: u32 = PAGE_SIZE - 1;

/// One slot of the gate table. Up to three fanins live inline in the
/// record; larger gates spill to a heap buffer owned by the slot.
#[derive(Clone, Default)]
struct Gate {
    kind: GateKind,
    attr: u32,
    fanins: SmallVec<[Lit; 3]>,
}

//-------------------------------------------------------------------------
// Numbering allocator

/// Reusable dense-integer allocator, one per numbered gate kind.
#[derive(Clone, Default)]
pub struct NumAlloc {
    next: u32,
    free: BTreeSet<u32>,
}

impl NumAlloc {
    /// Returns the smallest available number.
    pub fn get(&mut self) -> u32 {
        if let Some(&n) = self.free.iter().next() {
            self.free.remove(&n);
            n
        } else {
            let n = self.next;
            self.next += 1;
            n
        }
    }

    /// Claims a specific number; the number must not be in use.
    pub fn pick(&mut self, n: u32) {
        if n < self.next {
            assert!(self.free.remove(&n), "numbering: {n} already in use");
        } else {
            for i in self.next..n {
                self.free.insert(i);
            }
            self.next = n + 1;
        }
    }

    pub fn release(&mut self, n: u32) {
        debug_assert!(n < self.next && !self.free.contains(&n));
        self.free.insert(n);
    }

    pub fn in_use(&self) -> u32 {
        self.next - self.free.len() as u32
    }

    fn reset_to(&mut self, n: u32) {
        self.free.clear();
        self.next = n;
    }
}

//-------------------------------------------------------------------------
// Remap

/// Result of compaction: translation from old ids to new literals.
/// Removed gates map to `Lit::NULL`.
pub struct Remap {
    pub new_lit: Vec<Lit>,
}

impl Remap {
    pub fn lit(&self, old: Lit) -> Lit {
        if old == Lit::NULL {
            return Lit::NULL;
        }
        let n = self.new_lit[old.id() as usize];
        if n == Lit::NULL {
            Lit::NULL
        } else {
            n ^ old.sign()
        }
    }

    /// Translates a gate id, losing any sign information.
    pub fn id(&self, old: GateId) -> GateId {
        self.new_lit[old as usize].id()
    }
}

//-------------------------------------------------------------------------
// Listener bus

pub const MSG_UPDATE: u32 = 1;
pub const MSG_ADD: u32 = 2;
pub const MSG_REMOVE: u32 = 4;
pub const MSG_COMPACT: u32 = 8;
pub const MSG_SUBST: u32 = 16;
pub const MSG_ALL: u32 = 31;

const MSGIDX_UPDATE: usize = 0;
const MSGIDX_ADD: usize = 1;
const MSGIDX_REMOVE: usize = 2;
const MSGIDX_COMPACT: usize = 3;
const MSGIDX_SUBST: usize = 4;
const NUM_MSGS: usize = 5;

/// Observer of netlist changes. Callbacks run synchronously on the
/// mutating call's stack, in registration order.
pub trait Listener {
    /// A fanin is about to change: `w[pin]` goes from `old` to `new`.
    fn updating(&mut self, w: Lit, pin: u32, old: Lit, new: Lit) {
        let _ = (w, pin, old, new);
    }

    /// A gate was added, before any fanins are connected.
    fn adding(&mut self, w: Lit) {
        let _ = w;
    }

    /// A gate is about to be removed. Fanouts are not disconnected; this
    /// message is the only signal of the change. `recreated` means the id
    /// will immediately be reused by a `change` in place.
    fn removing(&mut self, w: Lit, recreated: bool) {
        let _ = (w, recreated);
    }

    /// The netlist was compacted and ids have changed.
    fn compacting(&mut self, remap: &Remap) {
        let _ = remap;
    }

    /// User-generated: fanouts of `old` were logically transferred to
    /// `new`. Never emitted by the netlist itself.
    fn substituting(&mut self, old: Lit, new: Lit) {
        let _ = (old, new);
    }
}

//-------------------------------------------------------------------------
// Attached objects

/// Closed index of optional netlist-owned subsystems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjKind {
    FanoutCount,
}

pub const NUM_OBJS: usize = 1;

/// Subsystem owned by the netlist, kept consistent across compaction and
/// copied along with it.
pub trait NetlistObj {
    fn init(&mut self, nl: &Netlist);
    fn compact(&mut self, nl: &Netlist, remap: &Remap);
    fn boxed_copy(&self) -> Box<dyn NetlistObj>;
    fn as_any(&self) -> &dyn Any;
}

/// Per-gate fanout counts over the current structure.
#[derive(Clone, Default)]
pub struct FanoutCount {
    counts: Vec<u32>,
}

impl FanoutCount {
    pub fn count(&self, id: GateId) -> u32 {
        self.counts.get(id as usize).copied().unwrap_or(0)
    }
}

impl NetlistObj for FanoutCount {
    fn init(&mut self, nl: &Netlist) {
        self.counts.clear();
        self.counts.resize(nl.size() as usize, 0);
        for id in GID_FIRST_USER..nl.size() {
            if nl.kind(id) == GateKind::Null {
                continue;
            }
            for &f in nl.fanins(id) {
                if f.is_legal() {
                    self.counts[f.id() as usize] += 1;
                }
            }
        }
    }

    fn compact(&mut self, nl: &Netlist, _remap: &Remap) {
        // counts follow the structure; a recount over the compacted
        // netlist is exact
        self.init(nl);
    }

    fn boxed_copy(&self) -> Box<dyn NetlistObj> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//-------------------------------------------------------------------------
// Wire: transient (netlist, literal) view

#[derive(Clone, Copy)]
pub struct Wire<'n> {
    nl: &'n Netlist,
    lit: Lit,
}

impl<'n> Wire<'n> {
    pub fn lit(self) -> Lit {
        self.lit
    }

    pub fn id(self) -> GateId {
        self.lit.id()
    }

    pub fn sign(self) -> bool {
        self.lit.sign()
    }

    pub fn kind(self) -> GateKind {
        self.nl.kind(self.lit.id())
    }

    pub fn size(self) -> u32 {
        self.nl.gate_size(self.lit.id())
    }

    pub fn is_removed(self) -> bool {
        self.kind() == GateKind::Null
    }

    pub fn fanin(self, pin: u32) -> Wire<'n> {
        Wire {
            nl: self.nl,
            lit: self.nl.fanin(self.lit.id(), pin),
        }
    }

    pub fn fanins(self) -> &'n [Lit] {
        self.nl.fanins(self.lit.id())
    }

    pub fn num(self) -> u32 {
        self.nl.num(self.lit.id())
    }

    pub fn arg(self) -> u32 {
        self.nl.arg(self.lit.id())
    }

    pub fn lb(self) -> Lb {
        self.nl.lb(self.lit.id())
    }
}

impl std::ops::Not for Wire<'_> {
    type Output = Self;

    fn not(self) -> Self {
        Wire {
            nl: self.nl,
            lit: !self.lit,
        }
    }
}

impl std::fmt::Debug for Wire<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{:?}", self.lit, self.kind())
    }
}

//-------------------------------------------------------------------------
// Netlist

pub struct Netlist {
    pages: Vec<Box<[Gate]>>,
    size_: u32,
    /// 0 = mutable, 1 = read-only, 2 = canonical (read-only, compacted,
    /// topologically ordered).
    frozen: u8,
    mode: Mode,
    /// Kinds whose fanins general code may set. A hashing layer owning a
    /// kind's fanins removes its bit.
    strash_mask: u64,
    use_freelist: bool,
    freelist: Vec<GateId>,
    type_count: [u32; NUM_KINDS],
    /// For numbered kinds: gate id by number (`GID_NULL` marks a freed slot).
    type_list: [Vec<GateId>; NUM_KINDS],
    numbers: [NumAlloc; NUM_KINDS],
    /// Side table: 64-bit function tables of Lut6 gates, keyed by number.
    lut6_ftb: Vec<u64>,
    objs: [Option<Box<dyn NetlistObj>>; NUM_OBJS],
    listeners: [Vec<Rc<RefCell<dyn Listener>>>; NUM_MSGS],
}

fn ensure_page(pages: &mut Vec<Box<[Gate]>>, id: GateId) {
    let page = (id >> PAGE_BITS) as usize;
    while pages.len() <= page {
        pages.push(
            (0..PAGE_SIZE)
                .map(|_| Gate::default())
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        );
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Netlist::new()
    }
}

impl Netlist {
    pub fn new() -> Netlist {
        let mut nl = Netlist {
            pages: Vec::new(),
            size_: 0,
            frozen: 0,
            mode: Mode::FreeForm,
            strash_mask: Mode::FreeForm.mask(),
            use_freelist: true,
            freelist: Vec::new(),
            type_count: [0; NUM_KINDS],
            type_list: std::array::from_fn(|_| Vec::new()),
            numbers: std::array::from_fn(|_| NumAlloc::default()),
            lut6_ftb: Vec::new(),
            objs: std::array::from_fn(|_| None),
            listeners: std::array::from_fn(|_| Vec::new()),
        };
        nl.reinit();
        nl
    }

    // Pre-creates the reserved prefix. These gates bypass `add`: they are
    // infrastructure, not user gates, and produce no listener traffic.
    fn reinit(&mut self) {
        use GateKind::*;
        for (id, kind) in [Null, Unbound, Conflict, False, True, Reset].into_iter().enumerate() {
            let id = id as GateId;
            ensure_page(&mut self.pages, id);
            self.size_ = self.size_.max(id + 1);
            *self.gate_mut(id) = Gate {
                kind,
                attr: 0,
                fanins: SmallVec::new(),
            };
            self.type_count[kind as usize] += 1;
        }
    }

    /// Resets to an empty netlist (reserved prefix only). Mode, masks and
    /// listeners are retained; attached objects are dropped.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.size_ = 0;
        self.frozen = 0;
        self.freelist.clear();
        self.type_count = [0; NUM_KINDS];
        self.type_list = std::array::from_fn(|_| Vec::new());
        self.numbers = std::array::from_fn(|_| NumAlloc::default());
        self.lut6_ftb.clear();
        self.objs = std::array::from_fn(|_| None);
        self.reinit();
    }

    fn gate(&self, id: GateId) -> &Gate {
        debug_assert!(id < self.size_);
        &self.pages[(id >> PAGE_BITS) as usize][(id & PAGE_MASK) as usize]
    }

    fn gate_mut(&mut self, id: GateId) -> &mut Gate {
        debug_assert!(id < self.size_);
        &mut self.pages[(id >> PAGE_BITS) as usize][(id & PAGE_MASK) as usize]
    }

    //---------------------------------------------------------------------
    // Freeze and mode control

    pub fn freeze(&mut self) {
        if self.frozen == 0 {
            self.frozen = 1;
        }
    }

    pub fn thaw(&mut self) {
        self.frozen = 0;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen >= 1
    }

    /// Frozen, compacted and topologically ordered (reached via `compact`).
    pub fn is_canonical(&self) -> bool {
        self.frozen >= 2
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.strash_mask = mode.mask();
    }

    /// Restricts which kinds general code may set fanins on; used by a
    /// hashing layer to claim ownership of its kinds.
    pub fn set_strash_mask(&mut self, mask: u64) {
        self.strash_mask = mask;
    }

    /// Validates every gate against the current mode; aborts on violation.
    pub fn assert_mode(&self) {
        for id in GID_FIRST_USER..self.size_ {
            let kind = self.gate(id).kind;
            if kind == GateKind::Null {
                continue;
            }
            assert!(
                self.mode.admits(kind),
                "mode violation: w{id} has kind {kind:?}, illegal in {:?} mode",
                self.mode
            );
        }
    }

    //---------------------------------------------------------------------
    // Gate access

    pub fn wire(&self, lit: Lit) -> Wire<'_> {
        Wire { nl: self, lit }
    }

    pub fn kind(&self, id: GateId) -> GateKind {
        self.gate(id).kind
    }

    pub fn gate_size(&self, id: GateId) -> u32 {
        self.gate(id).fanins.len() as u32
    }

    pub fn fanin(&self, id: GateId, pin: u32) -> Lit {
        let g = self.gate(id);
        assert!(
            (pin as usize) < g.fanins.len(),
            "fanin: pin {pin} out of range on w{id} ({:?})",
            g.kind
        );
        g.fanins[pin as usize]
    }

    pub fn fanins(&self, id: GateId) -> &[Lit] {
        &self.gate(id).fanins
    }

    pub fn num(&self, id: GateId) -> u32 {
        debug_assert_eq!(self.gate(id).kind.attr_kind(), AttrKind::Num);
        self.gate(id).attr
    }

    pub fn arg(&self, id: GateId) -> u32 {
        debug_assert_eq!(self.gate(id).kind.attr_kind(), AttrKind::Arg);
        self.gate(id).attr
    }

    pub fn lb(&self, id: GateId) -> Lb {
        debug_assert_eq!(self.gate(id).kind.attr_kind(), AttrKind::Lb);
        Lb::from_attr(self.gate(id).attr)
    }

    pub fn arg_set(&mut self, id: GateId, v: u32) {
        assert_eq!(self.frozen, 0, "arg_set: netlist is frozen");
        assert_eq!(self.gate(id).kind.attr_kind(), AttrKind::Arg);
        self.gate_mut(id).attr = v;
    }

    pub fn lb_set(&mut self, id: GateId, v: Lb) {
        assert_eq!(self.frozen, 0, "lb_set: netlist is frozen");
        assert_eq!(self.gate(id).kind.attr_kind(), AttrKind::Lb);
        self.gate_mut(id).attr = v as u32;
    }

    //---------------------------------------------------------------------
    // Counts

    /// Number of slots in the gate table, usable as an iteration bound.
    pub fn size(&self) -> u32 {
        self.size_
    }

    /// Live user gates, excluding the reserved prefix.
    pub fn count(&self) -> u32 {
        self.size_ - self.type_count[GateKind::Null as usize] - (GID_FIRST_USER - 1)
    }

    pub fn n_removed(&self) -> u32 {
        self.type_count[GateKind::Null as usize] - 1
    }

    pub fn kind_count(&self, kind: GateKind) -> u32 {
        self.type_count[kind as usize]
    }

    /// The gate of a numbered kind carrying number `num`.
    pub fn enum_gate(&self, kind: GateKind, num: u32) -> Lit {
        debug_assert!(kind.is_numbered());
        Lit::positive(self.type_list[kind as usize][num as usize])
    }

    pub fn enum_size(&self, kind: GateKind) -> u32 {
        debug_assert!(kind.is_numbered());
        self.type_list[kind as usize].len() as u32
    }

    //---------------------------------------------------------------------
    // Adding and removing gates

    fn check_add(&self, kind: GateKind) {
        assert_eq!(self.frozen, 0, "add: netlist is frozen");
        assert!(!kind.is_reserved(), "add: {kind:?} is a reserved kind");
        assert!(
            self.mode.admits(kind),
            "add: {kind:?} not legal in {:?} mode",
            self.mode
        );
    }

    /// Adds a fixed-size gate; numbered kinds draw the next free number.
    pub fn add(&mut self, kind: GateKind) -> Lit {
        self.check_add(kind);
        let sz = kind.fixed_size();
        assert_ne!(sz, DYNAMIC_SIZE, "add: {kind:?} is dynamically sized");
        let attr = if kind.is_numbered() {
            self.numbers[kind as usize].get()
        } else {
            0
        };
        Lit::positive(self.add_internal(kind, sz, attr))
    }

    /// Adds a fixed-size gate with an explicit attribute. For numbered
    /// kinds the attribute is claimed from the allocator.
    pub fn add_with(&mut self, kind: GateKind, attr: u32) -> Lit {
        self.check_add(kind);
        let sz = kind.fixed_size();
        assert_ne!(sz, DYNAMIC_SIZE, "add: {kind:?} is dynamically sized");
        if kind.is_numbered() {
            self.numbers[kind as usize].pick(attr);
        }
        Lit::positive(self.add_internal(kind, sz, attr))
    }

    /// Adds a dynamically sized gate.
    pub fn add_dyn(&mut self, kind: GateKind, sz: u32) -> Lit {
        self.check_add(kind);
        assert_eq!(
            kind.fixed_size(),
            DYNAMIC_SIZE,
            "add_dyn: {kind:?} has fixed size"
        );
        let attr = if kind.is_numbered() {
            self.numbers[kind as usize].get()
        } else {
            0
        };
        Lit::positive(self.add_internal(kind, sz, attr))
    }

    fn add_internal(&mut self, kind: GateKind, sz: u32, attr: u32) -> GateId {
        assert!(sz <= MAX_SIZE);

        let id = if self.use_freelist && !self.freelist.is_empty() {
            let id = self.freelist.pop().unwrap();
            self.type_count[GateKind::Null as usize] -= 1;
            id
        } else {
            let id = self.size_;
            ensure_page(&mut self.pages, id);
            self.size_ += 1;
            id
        };

        *self.gate_mut(id) = Gate {
            kind,
            attr,
            fanins: smallvec![Lit::NULL; sz as usize],
        };
        self.type_count[kind as usize] += 1;

        if kind.is_numbered() {
            let list = &mut self.type_list[kind as usize];
            if list.len() <= attr as usize {
                list.resize(attr as usize + 1, GID_NULL);
            }
            assert_eq!(list[attr as usize], GID_NULL);
            list[attr as usize] = id;
        }

        let w = Lit::positive(id);
        for l in &self.listeners[MSGIDX_ADD] {
            l.borrow_mut().adding(w);
        }
        id
    }

    /// Removes a gate. Fanouts are not disconnected; the `Remove` message
    /// is the only signal. The id goes to the freelist when recycling is
    /// on, otherwise the slot waits for compaction.
    pub fn remove(&mut self, id: GateId) {
        self.remove_internal(id, false)
    }

    fn remove_internal(&mut self, id: GateId, recreate: bool) {
        assert_eq!(self.frozen, 0, "remove: netlist is frozen");
        assert!(id >= GID_FIRST_USER, "remove: w{id} is reserved");
        let kind = self.gate(id).kind;
        assert_ne!(kind, GateKind::Null, "remove: w{id} already removed");

        let w = Lit::positive(id);
        for l in &self.listeners[MSGIDX_REMOVE] {
            l.borrow_mut().removing(w, recreate);
        }

        if kind.is_numbered() {
            let n = self.gate(id).attr;
            self.numbers[kind as usize].release(n);
            self.type_list[kind as usize][n as usize] = GID_NULL;
        }
        self.type_count[kind as usize] -= 1;
        self.type_count[GateKind::Null as usize] += 1;
        *self.gate_mut(id) = Gate::default();
        if self.use_freelist {
            self.freelist.push(id);
        }
    }

    /// Re-adds a gate in place: removes `w` and immediately creates a gate
    /// of `kind` under the same id, so external attributes keyed by id
    /// stay valid.
    pub fn change(&mut self, w: Lit, kind: GateKind) -> Lit {
        let saved = self.use_freelist;
        self.use_freelist = true;
        self.remove_internal(w.id(), true);
        let ret = self.add(kind);
        assert_eq!(ret.id(), w.id());
        self.use_freelist = saved;
        ret
    }

    pub fn change_with(&mut self, w: Lit, kind: GateKind, attr: u32) -> Lit {
        let saved = self.use_freelist;
        self.use_freelist = true;
        self.remove_internal(w.id(), true);
        let ret = self.add_with(kind, attr);
        assert_eq!(ret.id(), w.id());
        self.use_freelist = saved;
        ret
    }

    pub fn is_recycling(&self) -> bool {
        self.use_freelist
    }

    pub fn set_recycling(&mut self, on: bool) {
        self.use_freelist = on;
    }

    /// Resets the numbering of a kind once all its gates are gone.
    pub fn clear_numbering(&mut self, kind: GateKind) {
        assert!(kind.is_numbered());
        assert_eq!(
            self.type_count[kind as usize], 0,
            "clear_numbering: {kind:?} gates still present"
        );
        self.numbers[kind as usize] = NumAlloc::default();
        self.type_list[kind as usize].clear();
    }

    //---------------------------------------------------------------------
    // Fanins

    pub fn set_fanin(&mut self, w: Lit, pin: u32, v: Lit) {
        assert_eq!(self.frozen, 0, "set_fanin: netlist is frozen");
        assert!(w.is_legal());
        let id = w.id();
        let g = self.gate(id);
        let kind = g.kind;
        assert!(
            (pin as usize) < g.fanins.len(),
            "set_fanin: pin {pin} out of range on w{id} ({kind:?})"
        );
        assert!(
            self.strash_mask & 1 << kind as u8 != 0,
            "set_fanin: {kind:?} fanins are owned by the hashing layer"
        );
        assert!(
            v == Lit::NULL || self.gate(v.id()).kind != GateKind::Null,
            "set_fanin: {v:?} names a removed gate"
        );

        let old = self.gate(id).fanins[pin as usize];
        for l in &self.listeners[MSGIDX_UPDATE] {
            l.borrow_mut().updating(w.abs(), pin, old, v);
        }
        self.gate_mut(id).fanins[pin as usize] = v;
    }

    //---------------------------------------------------------------------
    // Side tables

    pub fn ftb(&self, id: GateId) -> u64 {
        assert_eq!(self.gate(id).kind, GateKind::Lut6);
        self.lut6_ftb
            .get(self.gate(id).attr as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn set_ftb(&mut self, id: GateId, ftb: u64) {
        assert_eq!(self.gate(id).kind, GateKind::Lut6);
        let n = self.gate(id).attr as usize;
        if self.lut6_ftb.len() <= n {
            self.lut6_ftb.resize(n + 1, 0);
        }
        self.lut6_ftb[n] = ftb;
    }

    pub fn clear_ftbs(&mut self) {
        self.lut6_ftb.clear();
    }

    //---------------------------------------------------------------------
    // Listeners

    pub fn listen(&mut self, lis: Rc<RefCell<dyn Listener>>, msg_mask: u32) {
        for (bit, list) in [MSG_UPDATE, MSG_ADD, MSG_REMOVE, MSG_COMPACT, MSG_SUBST]
            .into_iter()
            .zip(self.listeners.iter_mut())
        {
            if msg_mask & bit != 0 {
                list.push(lis.clone());
            }
        }
    }

    pub fn unlisten(&mut self, lis: &Rc<RefCell<dyn Listener>>, msg_mask: u32) {
        for (bit, list) in [MSG_UPDATE, MSG_ADD, MSG_REMOVE, MSG_COMPACT, MSG_SUBST]
            .into_iter()
            .zip(self.listeners.iter_mut())
        {
            if msg_mask & bit != 0 {
                let pos = list
                    .iter()
                    .position(|l| Rc::ptr_eq(l, lis))
                    .expect("unlisten: listener not registered for message");
                list.remove(pos);
            }
        }
    }

    /// Tells listeners that fanouts of `old` were transferred to `new`.
    pub fn tell_subst(&self, mut old: Lit, mut new: Lit) {
        if old.sign() {
            old = !old;
            new = !new;
        }
        for l in &self.listeners[MSGIDX_SUBST] {
            l.borrow_mut().substituting(old, new);
        }
    }

    //---------------------------------------------------------------------
    // Attached objects

    pub fn has_obj(&self, kind: ObjKind) -> bool {
        self.objs[kind as usize].is_some()
    }

    pub fn add_obj(&mut self, kind: ObjKind) {
        assert!(!self.has_obj(kind), "add_obj: {kind:?} already attached");
        let mut obj: Box<dyn NetlistObj> = match kind {
            ObjKind::FanoutCount => Box::<FanoutCount>::default(),
        };
        obj.init(self);
        self.objs[kind as usize] = Some(obj);
    }

    pub fn remove_obj(&mut self, kind: ObjKind) {
        assert!(self.has_obj(kind), "remove_obj: {kind:?} not attached");
        self.objs[kind as usize] = None;
    }

    pub fn fanout_count(&self) -> &FanoutCount {
        self.objs[ObjKind::FanoutCount as usize]
            .as_ref()
            .expect("fanout-count object not attached")
            .as_any()
            .downcast_ref::<FanoutCount>()
            .unwrap()
    }

    //---------------------------------------------------------------------
    // Compaction

    /// Removes unreachable gates, closes the gaps left by removal, assigns
    /// dense ids in topological order and leaves the netlist canonical.
    pub fn compact(&mut self) -> Remap {
        self.compact_with(true, true)
    }

    pub fn compact_with(&mut self, remove_unreach: bool, set_canonical: bool) -> Remap {
        let old_size = self.size_;

        // Topological post-order over surviving user gates. Sources and
        // sinks are roots: the interface survives even when dangling.
        let mut state = vec![0u8; old_size as usize];
        let mut order: Vec<GateId> = Vec::new();
        for id in GID_FIRST_USER..old_size {
            let kind = self.gate(id).kind;
            if kind != GateKind::Null && (kind.is_ci() || kind.is_co()) {
                self.topo_visit(id, &mut state, &mut order);
            }
        }
        if !remove_unreach {
            for id in GID_FIRST_USER..old_size {
                if self.gate(id).kind != GateKind::Null {
                    self.topo_visit(id, &mut state, &mut order);
                }
            }
        }

        // New dense ids: reserved prefix fixed, then topo order.
        let mut remap = Remap {
            new_lit: vec![Lit::NULL; old_size as usize],
        };
        for id in 0..GID_FIRST_USER {
            remap.new_lit[id as usize] = Lit::positive(id);
        }
        let mut next = GID_FIRST_USER;
        for &id in &order {
            remap.new_lit[id as usize] = Lit::positive(next);
            next += 1;
        }
        let new_size = next;

        // Renumber attributes of numbered kinds in old-number order, so
        // numbers are preserved whenever no gate of the kind died. The
        // ftb side table is remapped alongside.
        let mut attr_remap = vec![0u32; old_size as usize];
        let mut new_type_list: [Vec<GateId>; NUM_KINDS] = std::array::from_fn(|_| Vec::new());
        let mut new_numbers: [NumAlloc; NUM_KINDS] = std::array::from_fn(|_| NumAlloc::default());
        let mut new_ftb: Vec<u64> = Vec::new();
        for k in 0..NUM_KINDS {
            for (old_num, &old_id) in self.type_list[k].iter().enumerate() {
                if old_id == GID_NULL || remap.new_lit[old_id as usize] == Lit::NULL {
                    continue;
                }
                let new_num = new_type_list[k].len() as u32;
                attr_remap[old_id as usize] = new_num;
                new_type_list[k].push(remap.id(old_id));
                if k == GateKind::Lut6 as usize {
                    new_ftb.push(self.lut6_ftb.get(old_num).copied().unwrap_or(0));
                }
            }
            new_numbers[k].reset_to(new_type_list[k].len() as u32);
        }

        // Move surviving gates into fresh pages, rewriting fanins.
        let mut new_pages: Vec<Box<[Gate]>> = Vec::new();
        let mut new_count = [0u32; NUM_KINDS];
        let moves = (0..GID_FIRST_USER).chain(order.iter().copied());
        for (new_id, old_id) in moves.enumerate() {
            let new_id = new_id as GateId;
            let mut g = std::mem::take(self.gate_mut(old_id));
            for f in g.fanins.iter_mut() {
                *f = remap.lit(*f);
            }
            if g.kind.is_numbered() {
                g.attr = attr_remap[old_id as usize];
            }
            new_count[g.kind as usize] += 1;
            ensure_page(&mut new_pages, new_id);
            new_pages[(new_id >> PAGE_BITS) as usize][(new_id & PAGE_MASK) as usize] = g;
        }

        self.pages = new_pages;
        self.size_ = new_size;
        self.type_count = new_count;
        self.type_list = new_type_list;
        self.numbers = new_numbers;
        self.lut6_ftb = new_ftb;
        self.freelist.clear();

        let mut objs = std::mem::take(&mut self.objs);
        for obj in objs.iter_mut().flatten() {
            obj.compact(self, &remap);
        }
        self.objs = objs;

        for l in &self.listeners[MSGIDX_COMPACT] {
            l.borrow_mut().compacting(&remap);
        }

        if set_canonical {
            self.frozen = 2;
        }
        remap
    }

    fn topo_visit(&self, root: GateId, state: &mut [u8], order: &mut Vec<GateId>) {
        if state[root as usize] != 0 {
            return;
        }
        let mut stack: Vec<(GateId, u32)> = vec![(root, 0)];
        state[root as usize] = 1;
        while let Some(&(id, pin)) = stack.last() {
            let fanins = self.fanins(id);
            if (pin as usize) < fanins.len() {
                stack.last_mut().unwrap().1 += 1;
                let f = fanins[pin as usize];
                if !f.is_legal() || f.id() < GID_FIRST_USER {
                    continue;
                }
                let fid = f.id();
                if self.gate(fid).kind == GateKind::Null {
                    continue;
                }
                match state[fid as usize] {
                    0 => {
                        state[fid as usize] = 1;
                        stack.push((fid, 0));
                    }
                    1 => panic!("compact: combinational loop through w{fid}"),
                    _ => {}
                }
            } else {
                state[id as usize] = 2;
                order.push(id);
                stack.pop();
            }
        }
    }

    //---------------------------------------------------------------------
    // Copying

    /// Clones gates, attributes, side tables and attached objects into
    /// `dst`. Listeners are not copied.
    pub fn copy_to(&self, dst: &mut Netlist) {
        dst.pages = self.pages.clone();
        dst.size_ = self.size_;
        dst.frozen = self.frozen;
        dst.mode = self.mode;
        dst.strash_mask = self.strash_mask;
        dst.use_freelist = self.use_freelist;
        dst.freelist = self.freelist.clone();
        dst.type_count = self.type_count;
        dst.type_list = self.type_list.clone();
        dst.numbers = self.numbers.clone();
        dst.lut6_ftb = self.lut6_ftb.clone();
        dst.objs = std::array::from_fn(|i| self.objs[i].as_ref().map(|o| o.boxed_copy()));
        dst.listeners = std::array::from_fn(|_| Vec::new());
    }

    pub fn duplicate(&self) -> Netlist {
        let mut dst = Netlist::new();
        self.copy_to(&mut dst);
        dst
    }

    //---------------------------------------------------------------------
    // Simulation

    /// Evaluates a canonical netlist on one input assignment. `pi_vals`
    /// and `ff_vals` are indexed by PI/FF number; the result holds PO
    /// values by PO number. Unconnected pins read as false.
    pub fn eval(&self, pi_vals: &[bool], ff_vals: &[bool]) -> Vec<bool> {
        assert!(self.is_canonical(), "eval: netlist must be canonical");
        let mut val = vec![false; self.size_ as usize];
        let lit_val = |val: &[bool], f: Lit| -> bool {
            if f.is_legal() {
                val[f.id() as usize] ^ f.sign()
            } else {
                false
            }
        };
        for id in 0..self.size_ {
            let g = self.gate(id);
            use GateKind::*;
            let v = match g.kind {
                Null | Unbound | Conflict | False | Reset => false,
                True => true,
                Const => self.lb(id) == Lb::True,
                PI => pi_vals[g.attr as usize],
                FF => ff_vals[g.attr as usize],
                And => lit_val(&val, g.fanins[0]) & lit_val(&val, g.fanins[1]),
                Xor => lit_val(&val, g.fanins[0]) ^ lit_val(&val, g.fanins[1]),
                Mux => {
                    if lit_val(&val, g.fanins[0]) {
                        lit_val(&val, g.fanins[2])
                    } else {
                        lit_val(&val, g.fanins[1])
                    }
                }
                Maj => {
                    let n = g.fanins.iter().filter(|&&f| lit_val(&val, f)).count();
                    n >= 2
                }
                Conj => g.fanins.iter().all(|&f| lit_val(&val, f)),
                Lut4 => {
                    let bits: Vec<bool> =
                        g.fanins.iter().map(|&f| lit_val(&val, f)).collect();
                    ftb::eval(g.attr as u64, &bits)
                }
                Lut6 => {
                    let bits: Vec<bool> =
                        g.fanins.iter().map(|&f| lit_val(&val, f)).collect();
                    ftb::eval(self.ftb(id), &bits)
                }
                PO | Seq => lit_val(&val, g.fanins[0]),
                Npn4 => panic!("eval: Npn4 needs a class table"),
            };
            val[id as usize] = v;
        }
        let mut out = vec![false; self.enum_size(GateKind::PO) as usize];
        for (num, &id) in self.type_list[GateKind::PO as usize].iter().enumerate() {
            if id != GID_NULL {
                out[num] = val[id as usize];
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use crate::gate::{GateKind, Lb, Mode};
    use crate::lit::{Lit, GID_FIRST_USER};
    use crate::netlist::{Listener, Netlist, ObjKind, Remap, MSG_ALL};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn new_aig() -> Netlist {
        let mut nl = Netlist::new();
        nl.set_mode(Mode::Aig);
        nl
    }

    fn add_and(nl: &mut Netlist, a: Lit, b: Lit) -> Lit {
        let w = nl.add(GateKind::And);
        nl.set_fanin(w, 0, a);
        nl.set_fanin(w, 1, b);
        w
    }

    fn add_po(nl: &mut Netlist, v: Lit) -> Lit {
        let w = nl.add(GateKind::PO);
        nl.set_fanin(w, 0, v);
        w
    }

    #[test]
    fn test_id_stability_under_insertion() {
        let mut nl = Netlist::new();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, !p1);
        // spilled fanins via a dynamic gate
        let c = nl.add_dyn(GateKind::Conj, 5);
        for pin in 0..5 {
            nl.set_fanin(c, pin, p0);
        }
        // push the table across several page boundaries
        for _ in 0..3000 {
            nl.add(GateKind::PI);
        }
        assert_eq!(nl.fanin(a.id(), 0), p0);
        assert_eq!(nl.fanin(a.id(), 1), !p1);
        assert_eq!(nl.gate_size(c.id()), 5);
        assert_eq!(nl.fanin(c.id(), 4), p0);
        assert_eq!(nl.kind(a.id()), GateKind::And);
    }

    #[test]
    fn test_freelist_recycling() {
        let mut nl = new_aig();
        assert!(nl.is_recycling());
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        let removed = nl.n_removed();
        nl.remove(a.id());
        assert_eq!(nl.n_removed(), removed + 1);
        let b = nl.add(GateKind::And);
        assert_eq!(b.id(), a.id());
        assert_eq!(nl.fanin(b.id(), 0), Lit::NULL);
        assert_eq!(nl.n_removed(), removed);
    }

    #[test]
    fn test_no_recycling_waits_for_compact() {
        let mut nl = new_aig();
        nl.set_recycling(false);
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        nl.remove(a.id());
        let b = nl.add(GateKind::And);
        assert_ne!(b.id(), a.id());
        assert_eq!(nl.kind(a.id()), GateKind::Null);
    }

    #[test]
    fn test_change_preserves_id() {
        let mut nl = Netlist::new();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        nl.set_recycling(false);
        let l = nl.change(a, GateKind::Lut6);
        assert_eq!(l.id(), a.id());
        assert_eq!(nl.kind(a.id()), GateKind::Lut6);
        assert_eq!(nl.gate_size(a.id()), 6);
        assert!(!nl.is_recycling());
    }

    #[test]
    fn test_compaction_dense_and_reachable() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let p2 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        let dangling = add_and(&mut nl, a, p2);
        let b = add_and(&mut nl, a, !p2);
        add_po(&mut nl, !b);

        let remap = nl.compact();
        assert!(nl.is_canonical());
        // dense prefix: every user slot below size is live, no gaps
        for id in GID_FIRST_USER..nl.size() {
            assert_ne!(nl.kind(id), GateKind::Null, "gap at w{id}");
        }
        assert_eq!(nl.n_removed(), 0);
        // dangling AND dropped, rest survives
        assert_eq!(remap.new_lit[dangling.id() as usize], Lit::NULL);
        assert_eq!(nl.kind_count(GateKind::And), 2);
        assert_eq!(nl.kind_count(GateKind::PI), 3);
        // fanins remapped and topologically ordered
        for id in GID_FIRST_USER..nl.size() {
            for &f in nl.fanins(id) {
                if f.is_legal() {
                    assert!(f.id() < id);
                    assert_ne!(nl.kind(f.id()), GateKind::Null);
                }
            }
        }
        // PI numbering preserved (no PI died)
        let b_new = remap.lit(b);
        assert_eq!(nl.fanin(nl.enum_gate(GateKind::PO, 0).id(), 0), !b_new);
    }

    #[test]
    fn test_compaction_keeps_interface() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let _unused_pi = nl.add(GateKind::PI);
        add_po(&mut nl, p0);
        nl.compact();
        assert_eq!(nl.kind_count(GateKind::PI), 2);
        assert_eq!(nl.kind_count(GateKind::PO), 1);
    }

    #[test]
    #[should_panic(expected = "frozen")]
    fn test_freeze_blocks_add() {
        let mut nl = new_aig();
        nl.freeze();
        nl.add(GateKind::PI);
    }

    #[test]
    #[should_panic(expected = "frozen")]
    fn test_freeze_blocks_remove() {
        let mut nl = new_aig();
        let p = nl.add(GateKind::PI);
        nl.freeze();
        nl.remove(p.id());
    }

    #[test]
    #[should_panic(expected = "frozen")]
    fn test_freeze_blocks_set_fanin() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        nl.freeze();
        nl.set_fanin(a, 0, p1);
    }

    #[test]
    fn test_thaw_reenables() {
        let mut nl = new_aig();
        nl.freeze();
        assert!(nl.is_frozen());
        nl.thaw();
        nl.add(GateKind::PI);
    }

    #[test]
    #[should_panic(expected = "not legal")]
    fn test_mode_blocks_add() {
        let mut nl = new_aig();
        nl.add(GateKind::Xor);
    }

    #[test]
    #[should_panic(expected = "mode violation")]
    fn test_assert_mode() {
        let mut nl = Netlist::new();
        nl.add(GateKind::Xor);
        nl.set_mode(Mode::Aig);
        nl.assert_mode();
    }

    #[test]
    #[should_panic(expected = "hashing layer")]
    fn test_strash_mask_blocks_set_fanin() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        nl.set_strash_mask(Mode::Aig.mask() & !(1 << GateKind::And as u8));
        nl.set_fanin(a, 0, p1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_pin_out_of_range() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let a = nl.add(GateKind::And);
        nl.set_fanin(a, 2, p0);
    }

    #[test]
    #[should_panic(expected = "removed gate")]
    fn test_set_fanin_to_removed() {
        let mut nl = new_aig();
        nl.set_recycling(false);
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        let b = nl.add(GateKind::And);
        nl.remove(a.id());
        nl.set_fanin(b, 0, a);
    }

    #[derive(Default)]
    struct Recorder {
        tag: u32,
        log: Rc<RefCell<Vec<(u32, String)>>>,
    }

    impl Listener for Recorder {
        fn updating(&mut self, w: Lit, pin: u32, old: Lit, new: Lit) {
            self.log
                .borrow_mut()
                .push((self.tag, format!("upd {w:?}[{pin}] {old:?}->{new:?}")));
        }
        fn adding(&mut self, w: Lit) {
            self.log.borrow_mut().push((self.tag, format!("add {w:?}")));
        }
        fn removing(&mut self, w: Lit, recreated: bool) {
            self.log
                .borrow_mut()
                .push((self.tag, format!("rem {w:?} {recreated}")));
        }
        fn compacting(&mut self, remap: &Remap) {
            self.log
                .borrow_mut()
                .push((self.tag, format!("cmp {}", remap.new_lit.len())));
        }
        fn substituting(&mut self, old: Lit, new: Lit) {
            self.log
                .borrow_mut()
                .push((self.tag, format!("sub {old:?}->{new:?}")));
        }
    }

    #[test]
    fn test_listener_completeness_and_order() {
        let mut nl = new_aig();
        let log: Rc<RefCell<Vec<(u32, String)>>> = Rc::default();
        let l1 = Rc::new(RefCell::new(Recorder {
            tag: 1,
            log: log.clone(),
        }));
        let l2 = Rc::new(RefCell::new(Recorder {
            tag: 2,
            log: log.clone(),
        }));
        nl.listen(l1.clone(), MSG_ALL);
        nl.listen(l2.clone(), MSG_ALL);

        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        nl.tell_subst(!a, !p0);
        nl.remove(a.id());

        let events = log.borrow().clone();
        // every op fired once per listener, in registration order
        let expected = [
            format!("add {p0:?}"),
            format!("add {p1:?}"),
            format!("add {a:?}"),
            format!("upd {a:?}[0] Lit::NULL->{p0:?}"),
            format!("upd {a:?}[1] Lit::NULL->{p1:?}"),
            format!("sub {a:?}->{p0:?}"),
            format!("rem {a:?} false"),
        ];
        assert_eq!(events.len(), expected.len() * 2);
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(events[2 * i], (1, want.clone()));
            assert_eq!(events[2 * i + 1], (2, want.clone()));
        }

        // unlisten stops delivery
        let l1: Rc<RefCell<dyn Listener>> = l1;
        nl.unlisten(&l1, MSG_ALL);
        log.borrow_mut().clear();
        nl.add(GateKind::PI);
        let events = log.borrow().clone();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, 2);
    }

    #[test]
    fn test_numbering_get_pick_clear() {
        let mut nl = Netlist::new();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        assert_eq!(nl.num(p0.id()), 0);
        assert_eq!(nl.num(p1.id()), 1);
        let p5 = nl.add_with(GateKind::PI, 5);
        assert_eq!(nl.num(p5.id()), 5);
        // holes filled smallest-first
        let p2 = nl.add(GateKind::PI);
        assert_eq!(nl.num(p2.id()), 2);
        assert_eq!(nl.enum_gate(GateKind::PI, 5), p5);

        nl.remove(p0.id());
        nl.remove(p1.id());
        nl.remove(p2.id());
        nl.remove(p5.id());
        nl.clear_numbering(GateKind::PI);
        let q = nl.add(GateKind::PI);
        assert_eq!(nl.num(q.id()), 0);
    }

    #[test]
    #[should_panic(expected = "already in use")]
    fn test_numbering_double_pick() {
        let mut nl = Netlist::new();
        nl.add_with(GateKind::PI, 3);
        nl.add_with(GateKind::PI, 3);
    }

    #[test]
    fn test_lb_attribute() {
        let mut nl = Netlist::new();
        let c = nl.add(GateKind::Const);
        assert_eq!(nl.lb(c.id()), Lb::False);
        nl.lb_set(c.id(), Lb::Undef);
        assert_eq!(nl.lb(c.id()), Lb::Undef);
    }

    #[test]
    fn test_ftb_side_table_survives_compact() {
        let mut nl = Netlist::new();
        nl.set_mode(Mode::Lut6);
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let dead = nl.add(GateKind::Lut6);
        let live = nl.add(GateKind::Lut6);
        nl.set_fanin(live, 0, p0);
        nl.set_fanin(live, 1, p1);
        nl.set_ftb(dead.id(), 0xdead);
        nl.set_ftb(live.id(), 0x8888888888888888);
        add_po(&mut nl, live);

        let remap = nl.compact();
        let live_new = remap.lit(live);
        assert_eq!(nl.kind_count(GateKind::Lut6), 1);
        assert_eq!(nl.num(live_new.id()), 0);
        assert_eq!(nl.ftb(live_new.id()), 0x8888888888888888);
    }

    #[test]
    fn test_fanout_count_object() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        let b = add_and(&mut nl, a, p0);
        add_po(&mut nl, b);
        nl.add_obj(ObjKind::FanoutCount);
        assert_eq!(nl.fanout_count().count(p0.id()), 2);
        assert_eq!(nl.fanout_count().count(a.id()), 1);
        assert_eq!(nl.fanout_count().count(b.id()), 1);

        let remap = nl.compact();
        assert_eq!(nl.fanout_count().count(remap.id(p0.id())), 2);
    }

    #[test]
    fn test_copy_to_detaches_listeners() {
        let mut nl = new_aig();
        let log: Rc<RefCell<Vec<(u32, String)>>> = Rc::default();
        let lis = Rc::new(RefCell::new(Recorder {
            tag: 1,
            log: log.clone(),
        }));
        nl.listen(lis, MSG_ALL);
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        add_po(&mut nl, !a);
        nl.add_obj(ObjKind::FanoutCount);

        let mut copy = nl.duplicate();
        assert_eq!(copy.size(), nl.size());
        assert_eq!(copy.count(), nl.count());
        assert_eq!(copy.fanin(a.id(), 1), p1);
        assert_eq!(copy.fanout_count().count(a.id()), 1);

        log.borrow_mut().clear();
        copy.add(GateKind::PI);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_eval_basic() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, !p1);
        add_po(&mut nl, !a);
        nl.compact();
        // !(p0 & !p1)
        assert_eq!(nl.eval(&[false, false], &[]), vec![true]);
        assert_eq!(nl.eval(&[true, false], &[]), vec![false]);
        assert_eq!(nl.eval(&[true, true], &[]), vec![true]);
    }

    #[test]
    fn test_wire_view() {
        let mut nl = new_aig();
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, !p1);
        let w = nl.wire(a);
        assert_eq!(w.kind(), GateKind::And);
        assert_eq!(w.size(), 2);
        assert_eq!(w.fanin(1).lit(), !p1);
        assert!(w.fanin(1).sign());
        assert_eq!(w.fanin(0).num(), 0);
        assert_eq!((!w).lit(), !a);
    }

    #[test]
    fn test_count_bookkeeping() {
        let mut nl = new_aig();
        assert_eq!(nl.count(), 0);
        let p0 = nl.add(GateKind::PI);
        let p1 = nl.add(GateKind::PI);
        let a = add_and(&mut nl, p0, p1);
        assert_eq!(nl.count(), 3);
        assert_eq!(nl.kind_count(GateKind::And), 1);
        nl.remove(a.id());
        assert_eq!(nl.count(), 2);
        assert_eq!(nl.kind_count(GateKind::And), 0);
        assert_eq!(nl.n_removed(), 1);
    }
}
