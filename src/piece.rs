//! Piece kinds and piece instances.
//!
//! A [`PieceKind`] is shared, immutable behavior: a move rule plus the asset a
//! renderer draws. A [`Piece`] is one instance of a kind standing on a board.
//! Pieces compare by identity, never by kind: every piece gets a process-wide
//! unique [`PieceId`] when it is created, so two rooks are two different
//! pieces and a snapshot's pieces are different from their originals.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::rules::MoveRule;

static NEXT_PIECE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a piece instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u64);

impl PieceId {
    fn next() -> Self {
        PieceId(NEXT_PIECE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behavior and imagery shared by every piece of one category.
pub struct PieceKind {
    name: String,
    symbol: char,
    /// Opaque to the engine; interpreted by the renderer (usually an image path).
    asset: String,
    rule: Box<dyn MoveRule>,
}

impl PieceKind {
    pub fn new(
        name: impl Into<String>,
        symbol: char,
        asset: impl Into<String>,
        rule: impl MoveRule + 'static,
    ) -> Self {
        PieceKind {
            name: name.into(),
            symbol,
            asset: asset.into(),
            rule: Box::new(rule),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn rule(&self) -> &dyn MoveRule {
        self.rule.as_ref()
    }
}

impl fmt::Debug for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieceKind")
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .field("asset", &self.asset)
            .finish_non_exhaustive()
    }
}

/// A piece on a board.
///
/// Cloning a `Piece` clones the handle, not the piece: the clone has the same
/// id and refers to the same square on the board.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    kind: Arc<PieceKind>,
}

impl Piece {
    /// A brand-new piece of `kind` with a fresh identity.
    pub(crate) fn new(kind: Arc<PieceKind>) -> Self {
        Piece {
            id: PieceId::next(),
            kind,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> &Arc<PieceKind> {
        &self.kind
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Piece {}

impl std::hash::Hash for Piece {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name, self.id)
    }
}
