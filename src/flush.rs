//! Flush directives and their strength ordering

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
///Flush directive passed with every codec write.
///
///Variants are declared from weakest to strongest. Codec families without a direct counterpart
///for a flag map it onto their closest operation (e.g. brotli has single `FLUSH` operation).
pub enum Flush {
    ///Let codec decide when to emit output (`Z_NO_FLUSH`, `BROTLI_OPERATION_PROCESS`)
    None,
    ///Complete current deflate block (`Z_BLOCK`)
    Block,
    ///Flush pending output, without byte alignment (`Z_PARTIAL_FLUSH`)
    Partial,
    ///Flush pending output, aligning on byte boundary (`Z_SYNC_FLUSH`)
    Sync,
    ///Same as `Sync`, but also resets compression state (`Z_FULL_FLUSH`)
    Full,
    ///Finish stream. No data should be submitted after it (`Z_FINISH`, `BROTLI_OPERATION_FINISH`)
    Finish,
}

impl Flush {
    ///All flags in rank order.
    pub const ALL: [Flush; 6] = [Flush::None, Flush::Block, Flush::Partial, Flush::Sync, Flush::Full, Flush::Finish];

    #[inline]
    ///Returns strength of the flag.
    pub const fn rank(self) -> u8 {
        match self {
            Flush::None => 0,
            Flush::Block => 1,
            Flush::Partial => 2,
            Flush::Sync => 3,
            Flush::Full => 4,
            Flush::Finish => 5,
        }
    }

    #[inline]
    ///Returns the stronger of `self` and `other`.
    ///
    ///On equal rank `other` is returned, which is the same flag.
    pub const fn strongest(self, other: Flush) -> Flush {
        if self.rank() > other.rank() {
            self
        } else {
            other
        }
    }

    ///Maps zlib numeric flush value onto `Flush`.
    ///
    ///Returns `None` for values outside of supported range (including `Z_TREES`)
    pub const fn from_zlib(value: i32) -> Option<Flush> {
        match value {
            0 => Some(Flush::None),
            1 => Some(Flush::Partial),
            2 => Some(Flush::Sync),
            3 => Some(Flush::Full),
            4 => Some(Flush::Finish),
            5 => Some(Flush::Block),
            _ => None,
        }
    }
}

impl Default for Flush {
    #[inline(always)]
    fn default() -> Self {
        Flush::None
    }
}
