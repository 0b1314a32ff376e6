// gate kinds and per-kind metadata: sizes, attribute kinds, legal-mode masks

/// Arity sentinel for kinds whose fanin count is chosen at creation time.
pub const DYNAMIC_SIZE: u32 = u32::MAX;

/// Largest fanin count a gate may carry.
pub const MAX_SIZE: u32 = (1 << 25) - 1;

/// Closed alphabet of gate kinds. The discriminant doubles as the bit
/// position in mode and strash masks.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GateKind {
    /// Slot of a removed gate (and of the reserved id-0 slot).
    #[default]
    Null = 0,
    Unbound,
    Conflict,
    False,
    True,
    Reset,
    /// Ternary constant; the attribute holds its value.
    Const,
    PI,
    PO,
    FF,
    Seq,
    And,
    Xor,
    Mux,
    Maj,
    Npn4,
    Lut4,
    Lut6,
    /// Dynamic-arity conjunction, FreeForm mode only.
    Conj,
}

pub const NUM_KINDS: usize = GateKind::Conj as usize + 1;

/// How the per-gate attribute word is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrKind {
    /// Attribute is unused and must stay zero.
    None,
    /// Opaque payload, e.g. the 16-bit function table of a `Lut4`.
    Arg,
    /// Index handed out by the per-kind numbering allocator.
    Num,
    /// Ternary logic value.
    Lb,
}

/// Ternary logic value stored in `AttrKind::Lb` attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Lb {
    False = 0,
    True = 1,
    Undef = 2,
}

impl Lb {
    pub fn from_attr(attr: u32) -> Lb {
        match attr {
            0 => Lb::False,
            1 => Lb::True,
            2 => Lb::Undef,
            _ => panic!("invalid ternary attribute {attr}"),
        }
    }
}

impl GateKind {
    /// Fanin count fixed by the kind, or `DYNAMIC_SIZE`.
    pub fn fixed_size(self) -> u32 {
        use GateKind::*;
        match self {
            // FF is a source; its Seq partner (same number) holds the
            // next-state input, keeping the combinational graph acyclic.
            Null | Unbound | Conflict | False | True | Reset | Const | PI | FF => 0,
            PO | Seq => 1,
            And | Xor => 2,
            Mux | Maj => 3,
            Npn4 | Lut4 => 4,
            Lut6 => 6,
            Conj => DYNAMIC_SIZE,
        }
    }

    pub fn attr_kind(self) -> AttrKind {
        use GateKind::*;
        match self {
            Const => AttrKind::Lb,
            PI | PO | FF | Seq | Lut6 => AttrKind::Num,
            Npn4 | Lut4 => AttrKind::Arg,
            _ => AttrKind::None,
        }
    }

    /// Numbered kinds get a member list and a dense attribute after compaction.
    pub fn is_numbered(self) -> bool {
        self.attr_kind() == AttrKind::Num
    }

    /// Pre-created singletons; `Netlist::add` refuses them.
    pub fn is_reserved(self) -> bool {
        use GateKind::*;
        matches!(self, Null | Unbound | Conflict | False | True | Reset)
    }

    /// Combinational source in the mapping sense: PIs and flop outputs.
    pub fn is_ci(self) -> bool {
        matches!(self, GateKind::PI | GateKind::FF)
    }

    /// Combinational sink: POs and flop next-state inputs.
    pub fn is_co(self) -> bool {
        matches!(self, GateKind::PO | GateKind::Seq)
    }
}

const fn bit(k: GateKind) -> u64 {
    1u64 << k as u8
}

/// Restriction on which gate kinds may be added to a netlist. Reserved
/// kinds and `Const` are legal in every mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    FreeForm,
    Aig,
    Xig,
    Npn4,
    Lut4,
    Lut6,
}

const SOURCES_SINKS: u64 =
    bit(GateKind::PI) | bit(GateKind::PO) | bit(GateKind::FF) | bit(GateKind::Seq);

impl Mode {
    /// Bitmask over kind ids legal under this mode.
    pub fn mask(self) -> u64 {
        match self {
            Mode::FreeForm => {
                SOURCES_SINKS
                    | bit(GateKind::And)
                    | bit(GateKind::Xor)
                    | bit(GateKind::Mux)
                    | bit(GateKind::Maj)
                    | bit(GateKind::Npn4)
                    | bit(GateKind::Lut4)
                    | bit(GateKind::Lut6)
                    | bit(GateKind::Conj)
            }
            Mode::Aig => SOURCES_SINKS | bit(GateKind::And),
            Mode::Xig => {
                SOURCES_SINKS
                    | bit(GateKind::And)
                    | bit(GateKind::Xor)
                    | bit(GateKind::Mux)
                    | bit(GateKind::Maj)
            }
            Mode::Npn4 => SOURCES_SINKS | bit(GateKind::Npn4),
            Mode::Lut4 => SOURCES_SINKS | bit(GateKind::Lut4),
            Mode::Lut6 => SOURCES_SINKS | bit(GateKind::Lut6),
        }
    }

    pub fn admits(self, kind: GateKind) -> bool {
        kind.is_reserved() || kind == GateKind::Const || self.mask() & bit(kind) != 0
    }
}

#[cfg(test)]
mod test {
    use crate::gate::{AttrKind, GateKind, Mode, DYNAMIC_SIZE};

    #[test]
    fn test_metadata() {
        assert_eq!(GateKind::And.fixed_size(), 2);
        assert_eq!(GateKind::Lut6.fixed_size(), 6);
        assert_eq!(GateKind::Conj.fixed_size(), DYNAMIC_SIZE);
        assert_eq!(GateKind::Lut6.attr_kind(), AttrKind::Num);
        assert_eq!(GateKind::Lut4.attr_kind(), AttrKind::Arg);
        assert!(GateKind::PI.is_numbered());
        assert!(!GateKind::And.is_numbered());
    }

    #[test]
    fn test_mode_masks() {
        assert!(Mode::Aig.admits(GateKind::And));
        assert!(!Mode::Aig.admits(GateKind::Xor));
        assert!(!Mode::Aig.admits(GateKind::Lut6));
        assert!(Mode::Lut6.admits(GateKind::Lut6));
        assert!(!Mode::Lut6.admits(GateKind::And));
        assert!(Mode::Xig.admits(GateKind::Mux));
        assert!(!Mode::Xig.admits(GateKind::Conj));
        assert!(Mode::FreeForm.admits(GateKind::Conj));
        // constants are legal everywhere
        assert!(Mode::Aig.admits(GateKind::True));
        assert!(Mode::Lut6.admits(GateKind::Const));
    }
}
