use itertools::Itertools;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// Represents a 2D coordinate on the minesweeper board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// A logical statement about the board: "exactly `count` of these cells are mines."
///
/// Sentences only ever range over cells whose status is still unknown. As cells
/// get classified, they are removed from the sentence (with `count` adjusted for
/// mines), so a sentence monotonically shrinks toward a conclusive state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    cells: HashSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: HashSet<Cell>, count: usize) -> Self {
        debug_assert!(count <= cells.len());
        Sentence { cells, count }
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Every cell in this sentence, if all of them must be mines.
    ///
    /// When the number of unknown cells equals the mine count, each one of them
    /// is a mine. Otherwise nothing can be concluded and the result is empty.
    pub fn known_mines(&self) -> HashSet<Cell> {
        if !self.cells.is_empty() && self.cells.len() == self.count {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Every cell in this sentence, if all of them must be safe.
    ///
    /// A count of zero means no mine lies among the listed cells.
    pub fn known_safes(&self) -> HashSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            HashSet::new()
        }
    }

    /// Updates the sentence with the fact that `cell` is a mine: the cell no
    /// longer needs tracking and one of the counted mines is accounted for.
    /// No-op if the cell is not part of this sentence.
    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            debug_assert!(self.count > 0);
            self.count -= 1;
        }
    }

    /// Updates the sentence with the fact that `cell` is safe: the cell is
    /// dropped, the mine count is unaffected. No-op if the cell is absent.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// A sentence with no cells and no mines carries no information.
    fn is_vacuous(&self) -> bool {
        self.cells.is_empty() && self.count == 0
    }
}

// --- Knowledge Base (sentences + forward chaining) ---

/// The evolving collection of sentences, together with the global sets of cells
/// already classified as safe or as mines.
///
/// Two invariants hold between calls: every globally classified cell has been
/// removed from every sentence, and `safes` and `mines` are disjoint. The
/// knowledge base only ever gains information; sentences are dropped once they
/// become vacuous, never un-learned.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    sentences: Vec<Sentence>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// Records a cell as safe and propagates the fact into every sentence.
    /// Returns whether the cell was newly classified.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        debug_assert!(!self.mines.contains(&cell));
        let newly = self.safes.insert(cell);
        if newly {
            for sentence in &mut self.sentences {
                sentence.mark_safe(cell);
            }
        }
        newly
    }

    /// Records a cell as a mine and propagates the fact into every sentence.
    /// Returns whether the cell was newly classified.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        debug_assert!(!self.safes.contains(&cell));
        let newly = self.mines.insert(cell);
        if newly {
            for sentence in &mut self.sentences {
                sentence.mark_mine(cell);
            }
        }
        newly
    }

    /// Appends a sentence unless it is vacuous or a structurally equal sentence
    /// is already present.
    pub fn insert(&mut self, sentence: Sentence) {
        if !sentence.is_vacuous() && !self.sentences.contains(&sentence) {
            self.sentences.push(sentence);
        }
    }

    /// Brings the knowledge base to a fixed point of the two inference rules:
    ///
    /// 1. Extraction: any sentence whose count is zero classifies all its cells
    ///    as safe; any sentence whose count equals its size classifies them all
    ///    as mines. Classifications are propagated into every sentence, which
    ///    can make further sentences conclusive, so the rule iterates until
    ///    quiescent on its own.
    /// 2. Subset resolution: for sentences A ⊆ B, the cells of B outside A hold
    ///    exactly `B.count - A.count` mines; the derived sentence is added when
    ///    novel.
    ///
    /// The rules alternate until a full pass changes nothing. Termination is
    /// guaranteed: extraction strictly shrinks sentences, and the universe of
    /// distinct sentences over a finite board is finite.
    pub fn saturate(&mut self) {
        loop {
            let mut changed = self.extract_certainties();
            changed |= self.resolve_subsets();
            self.sentences.retain(|s| !s.is_vacuous());
            if !changed {
                break;
            }
        }
    }

    /// Rule 1. Returns whether any cell was newly classified.
    fn extract_certainties(&mut self) -> bool {
        let mut changed = false;
        loop {
            let mut safe_cells = HashSet::new();
            let mut mine_cells = HashSet::new();
            for sentence in &self.sentences {
                safe_cells.extend(sentence.known_safes());
                mine_cells.extend(sentence.known_mines());
            }
            safe_cells.retain(|c| !self.safes.contains(c));
            mine_cells.retain(|c| !self.mines.contains(c));

            if safe_cells.is_empty() && mine_cells.is_empty() {
                break;
            }
            for cell in safe_cells {
                self.mark_safe(cell);
            }
            for cell in mine_cells {
                self.mark_mine(cell);
            }
            changed = true;
        }
        changed
    }

    /// Rule 2. Returns whether any novel sentence was appended.
    fn resolve_subsets(&mut self) -> bool {
        let mut derived = Vec::new();
        for (a, b) in self.sentences.iter().tuple_combinations() {
            // Equal sentences only resolve to the vacuous sentence.
            if a == b {
                continue;
            }
            for (sub, sup) in [(a, b), (b, a)] {
                if sub.cells.is_subset(&sup.cells) {
                    debug_assert!(sub.count <= sup.count);
                    derived.push(Sentence::new(&sup.cells - &sub.cells, sup.count - sub.count));
                }
            }
        }

        let before = self.sentences.len();
        for sentence in derived {
            self.insert(sentence);
        }
        self.sentences.len() > before
    }
}

// --- Agent (observations in, moves out) ---

/// A minesweeper player that deduces moves from revealed cell counts.
///
/// The host game loop feeds it one `record_observation` call per revealed cell
/// and asks for the next move: `choose_safe_move` when deduction suffices,
/// `choose_random_move` as the guessing fallback.
pub struct Agent {
    height: usize,
    width: usize,
    moves_made: HashSet<Cell>,
    kb: KnowledgeBase,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Self {
        Agent {
            height,
            width,
            moves_made: HashSet::new(),
            kb: KnowledgeBase::new(),
        }
    }

    /// Cells classified as safe so far (played or not).
    pub fn safes(&self) -> &HashSet<Cell> {
        self.kb.safes()
    }

    /// Cells classified as mines so far.
    pub fn mines(&self) -> &HashSet<Cell> {
        self.kb.mines()
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    /// Records a cell as safe, for hosts that learn this independently of any
    /// observation (e.g. a first-click guarantee).
    pub fn mark_safe(&mut self, cell: Cell) {
        self.kb.mark_safe(cell);
    }

    /// Records a cell as a mine known from outside the deduction loop.
    pub fn mark_mine(&mut self, cell: Cell) {
        self.kb.mark_mine(cell);
    }

    /// The full cycle for one revealed cell: record the move, mark the cell
    /// safe, turn the adjacent-mine count into a sentence over the unresolved
    /// neighbors, and saturate the knowledge base.
    ///
    /// Neighbors already known safe are left out of the new sentence; neighbors
    /// already known to be mines are left out with the count decremented, since
    /// they are certain and need no further tracking.
    pub fn record_observation(&mut self, cell: Cell, adjacent_mines: usize) {
        self.moves_made.insert(cell);
        self.kb.mark_safe(cell);

        let mut count = adjacent_mines;
        let mut frontier = HashSet::new();
        for neighbor in self.neighbors(cell) {
            if self.kb.safes().contains(&neighbor) {
                continue;
            }
            if self.kb.mines().contains(&neighbor) {
                debug_assert!(count > 0);
                count -= 1;
                continue;
            }
            frontier.insert(neighbor);
        }

        self.kb.insert(Sentence::new(frontier, count));
        self.kb.saturate();
    }

    /// Returns a cell known to be safe that has not been played yet, or `None`
    /// when deduction offers nothing. Pure query; which eligible cell comes
    /// back is arbitrary.
    pub fn choose_safe_move(&self) -> Option<Cell> {
        self.kb
            .safes()
            .iter()
            .find(|cell| !self.moves_made.contains(cell))
            .copied()
    }

    /// Returns a uniformly random cell that has neither been played nor been
    /// classified as a mine, or `None` when no such cell remains. The chosen
    /// cell may still turn out to be a mine; this is the guessing fallback.
    pub fn choose_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| Cell { row, col }))
            .filter(|cell| !self.moves_made.contains(cell) && !self.kb.mines().contains(cell))
            .collect();

        candidates.choose(rng).copied()
    }

    /// All in-bounds cells within one row and one column of `cell`, the cell
    /// itself excluded.
    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let height = self.height;
        let width = self.width;

        (-1..=1).flat_map(move |dr: isize| {
            (-1..=1).filter_map(move |dc: isize| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let row = cell.row as isize + dr;
                let col = cell.col as isize + dc;

                if row >= 0 && row < height as isize && col >= 0 && col < width as isize {
                    Some(Cell {
                        row: row as usize,
                        col: col as usize,
                    })
                } else {
                    None
                }
            })
        })
    }
}
